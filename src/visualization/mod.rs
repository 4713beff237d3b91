mod tables;
mod charts;

pub use tables::{
    format_page, print_page,
    format_section, format_table_artifact, format_metric, format_warning, format_value,
    format_catalog, print_catalog,
};
pub use charts::format_chart;
