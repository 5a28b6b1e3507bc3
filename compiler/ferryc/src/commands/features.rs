//! The `features` command: list constructs the target cannot express.

use ferry_codegen::{Backend, Feature, PythonBackend};

pub fn list_features() {
    let backend = PythonBackend;
    let unsupported = backend.unsupported_features();
    println!("Constructs not supported by the {} target:", backend.name());
    println!();
    for feature in Feature::ALL {
        if unsupported.has(*feature) {
            println!("  {}", feature.description());
        }
    }
}
