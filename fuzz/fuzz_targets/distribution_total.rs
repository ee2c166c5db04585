#![no_main]

use faraid_core::{compute, HeirCategory, HeirComposition};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // One byte per category, low bits as the head count.
    let heirs: HeirComposition = HeirCategory::ALL
        .iter()
        .zip(data.iter())
        .map(|(category, byte)| (*category, u32::from(byte & 0x0f)))
        .collect();

    let result = compute(&heirs, 1000.0);

    assert_eq!(result.is_empty(), heirs.is_empty());
    assert!(result.is_balanced(), "unbalanced: {:?} -> {:?}", heirs, result);
    for entry in &result.entries {
        assert!(entry.percentage >= 0.0);
        assert!(entry.count <= heirs.get(entry.category));
    }
});
