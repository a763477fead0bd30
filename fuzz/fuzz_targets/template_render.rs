#![no_main]

use std::collections::BTreeMap;

use golden_deployment::TemplateFile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(template) = TemplateFile::parse("fuzz", content) {
            let _ = template.render(&BTreeMap::new());
        }
    }
});
