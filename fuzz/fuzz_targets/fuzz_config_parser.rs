//! Fuzz target for configuration document decoding and validation.
//!
//! Goal: decoding, validation and compilation should **never panic** on any input,
//! in any supported encoding. They may return errors.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use htmlguard_settings::{DocumentFormat, load_document};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for format in [DocumentFormat::Yaml, DocumentFormat::Toml, DocumentFormat::Json] {
            if let Ok(document) = load_document(text, format) {
                // A validated document must compile.
                assert!(htmlguard_domain::compile_site(&document).is_ok());
            }
        }
    }
});
