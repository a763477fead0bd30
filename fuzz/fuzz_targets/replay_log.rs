#![no_main]

use golden_workload::{LogRecord, ReplayLog};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut log) = ReplayLog::parse(content) else {
        return;
    };

    // every parsed operation is handed out exactly once
    let total = log.operation_count();
    let offsets: Vec<u64> = content
        .lines()
        .filter_map(|line| serde_json::from_str::<LogRecord>(line.trim()).ok())
        .map(|record| record.offset)
        .collect();
    let popped: usize = offsets.into_iter().map(|o| log.pop_at(o).len()).sum();
    assert_eq!(popped, total);
    assert!(log.is_empty());
});
