#![no_main]

use blanktable::naming::{parse_count, NameAllocator, MAX_BATCH};
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

fuzz_target!(|data: &[u8]| {
    // Arbitrary user input for the batch size (invalid UTF-8 becomes replacement chars)
    let input = String::from_utf8_lossy(data);

    // Parsing should never panic, and accepted values stay in range
    if let Ok(count) = parse_count(&input) {
        assert!((1..=MAX_BATCH).contains(&count));

        let allocator: NameAllocator = NameAllocator::default();
        let names = allocator.allocate(count, &HashSet::new()).unwrap();
        assert_eq!(names.len(), count);
    }
});
