#![no_main]

use libfuzzer_sys::fuzz_target;
use e2ml::cli::parse_list;
use e2ml::hypothesis::{wilcoxon_signed_rank_test, TestType};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing must never panic; parsed samples go through the test
        // boundary, which must reject bad values with an error instead
        let _ = parse_list::<i64>(input);
        if let Ok(sample) = parse_list::<f64>(input) {
            if sample.len() <= 64 {
                let _ = wilcoxon_signed_rank_test(&sample, None, TestType::TwoSided);
            }
        }
    }
});
