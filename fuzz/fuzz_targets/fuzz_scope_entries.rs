//! Fuzz target for scope-entry parsing and scope-map compilation.
//!
//! Goal: compilation never panics, and a compiled map answers lookups for any
//! node type and property name.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_scope_entries
//! ```

#![no_main]

use arbitrary::Arbitrary;
use htmlguard_domain::CompiledScopeMap;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    entries: Vec<String>,
    node_type: String,
    property: String,
}

fuzz_target!(|input: Input| {
    if let Ok(map) = CompiledScopeMap::compile(&input.entries, "process") {
        let _ = map.matches_types([input.node_type.as_str()], &input.property);
        let _ = map.to_string();
    }
});
