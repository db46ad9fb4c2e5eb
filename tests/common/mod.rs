#![allow(dead_code)]

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `content` to a temporary file ending in `.{ext}`.
    ///
    /// The file is removed when the returned handle drops.
    pub fn create_temp_spec(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("brrtguard_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        create_temp_spec(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> NamedTempFile {
        create_temp_spec(content, "json")
    }
}

pub mod petstore {
    use brrtguard::dispatcher::HandlerRegistry;
    use brrtguard::{load_contract, Gate, RuntimeConfig};

    pub const PETSTORE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/doc/petstore.yaml");

    /// Gate over the bundled petstore contract with the given handlers.
    pub fn gate_with(handlers: HandlerRegistry) -> Gate {
        let document = load_contract(PETSTORE_PATH).unwrap();
        Gate::new(document, handlers, RuntimeConfig::default()).unwrap()
    }

    /// Gate with no handlers: every accepted request gets the pass-through answer.
    pub fn pass_through_gate() -> Gate {
        gate_with(HandlerRegistry::new())
    }
}
