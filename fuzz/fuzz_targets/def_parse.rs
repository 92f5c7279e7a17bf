#![no_main]

use libfuzzer_sys::fuzz_target;
use schema::parse_definition;

fuzz_target!(|text: &str| {
    // Malformed definitions are errors, never panics.
    let _ = parse_definition("FUZZ.1.def", text);
});
