#![no_main]

use golden_core::error::describe_es_error;
use golden_deployment::elastic_cloud::describe_api_error;
use golden_usage::elasticsearch::parse_sum_response;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(body) = std::str::from_utf8(data) {
        let _ = parse_sum_response(body);
        let _ = describe_es_error(500, body);
        let _ = describe_api_error(400, body);
    }
});
