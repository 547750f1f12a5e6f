#![no_main]

use libfuzzer_sys::fuzz_target;
use qapigen::backend::{GeneratorConfig, MemoryWriter, gen_commands};
use qapigen_schema::Schema;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Fuzz the loader
        if let Ok(schema) = Schema::from_json(s) {
            // If loading succeeds, fuzz the generator
            let _ = gen_commands(&schema, &GeneratorConfig::new(), MemoryWriter::default());
        }
    }
});
