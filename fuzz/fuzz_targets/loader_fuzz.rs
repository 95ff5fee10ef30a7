//! Loader fuzz target: feed arbitrary bytes to the schema loader.
//! The loader must not panic; it should return Ok(MessageSchema) or
//! Err(SchemaError).
//! Build with: cargo fuzz run loader_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let _ = wiregen::parse_message(s);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run loader_fuzz");
}
