#![no_main]

use evalcompare::regression::{compare_runs, ComparisonConfig};
use evalcompare::scores::RunScores;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing must never panic; a run that parses must compare against itself
        if let Ok(run) = RunScores::from_json_str(input) {
            let config = ComparisonConfig {
                bootstrap_iterations: 50,
                seed: Some(1),
                ..ComparisonConfig::default()
            };
            let report = compare_runs(&run, &run, &config).expect("valid run compares");
            assert!(report.passed);
        }
    }
});
