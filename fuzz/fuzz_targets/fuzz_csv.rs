#![no_main]

use libfuzzer_sys::fuzz_target;
use logistics_dashboard::io::read_csv_from_bytes;

fuzz_target!(|data: &[u8]| {
    if let Ok(table) = read_csv_from_bytes(data, "fuzz") {
        assert_eq!(table.schema().len(), table.num_columns());
        if let Some(last) = table.num_rows().checked_sub(1) {
            assert_eq!(table.row(last).map(|r| r.len()), Some(table.num_columns()));
        }
    }
});
