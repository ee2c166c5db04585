#![no_main]

use faraid_core::HeirComposition;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // from_signed must never panic: bad names and counts are Err, not crashes.
    if let Ok(s) = std::str::from_utf8(data) {
        let entries = s.lines().filter_map(|line| {
            let (name, count) = line.split_once('=')?;
            Some((name.to_string(), count.trim().parse::<i64>().ok()?))
        });
        let _ = HeirComposition::from_signed(entries);
    }
});
