#![no_main]

use golden_core::scenario::Scenario;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(scenario) = Scenario::from_json(content) else {
        return;
    };

    // an accepted scenario must come back unchanged from its stored form
    let stored = serde_json::to_string(&scenario).expect("scenario serializes");
    let reloaded = Scenario::from_json(&stored).expect("stored scenario reloads");
    assert_eq!(reloaded, scenario);
});
