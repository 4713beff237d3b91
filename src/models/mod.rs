mod table;
mod value;

pub use table::Table;
pub use value::{ColumnType, Value, NULL_MARKERS};
