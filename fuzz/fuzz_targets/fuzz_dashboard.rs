#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use logistics_dashboard::{
    analysis::AnalysisKind,
    dashboard::{Dashboard, LoadState},
    io::read_csv_from_bytes,
};

fuzz_target!(|data: &[u8]| {
    let load = LoadState::from_result(read_csv_from_bytes(data, "fuzz").map(Arc::new));
    let page = Dashboard::default().render(&load, &AnalysisKind::ALL);
    let _ = serde_json::to_string(&page);
});
