//! Fuzz target for sanitization under the built-in global-default policy.
//!
//! Goal: sanitize never panics, and a second pass over its output changes nothing.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_sanitize
//! ```

#![no_main]

use htmlguard_domain::{SiteConfig, compile_site};
use htmlguard_settings::global_default;
use libfuzzer_sys::fuzz_target;
use std::sync::LazyLock;

static SITE: LazyLock<SiteConfig> = LazyLock::new(|| {
    let document = global_default().expect("preset is valid");
    compile_site(&document).expect("preset compiles")
});

fuzz_target!(|data: &[u8]| {
    if let Ok(html) = std::str::from_utf8(data) {
        let policy = SITE.policy_for("live");
        let once = policy.sanitize(html);
        let twice = policy.sanitize(once.sanitized_html());
        assert_eq!(once.sanitized_html(), twice.sanitized_html());
    }
});
