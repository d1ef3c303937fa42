use std::env;
use std::path::PathBuf;

/// Set to a file path to also write the generated header there.
const HEADER_ENV: &str = "ALUMNI_FFI_HEADER";

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed={HEADER_ENV}");

    let (Ok(crate_dir), Ok(out_dir)) = (env::var("CARGO_MANIFEST_DIR"), env::var("OUT_DIR")) else {
        return;
    };

    // A header failure must not break the Rust build.
    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("ALUMNI_FFI_H")
        .with_documentation(true)
        .generate()
    {
        Ok(bindings) => bindings,
        Err(e) => {
            println!("cargo:warning=skipping C header generation: {e}");
            return;
        }
    };

    bindings.write_to_file(PathBuf::from(out_dir).join("alumni_ffi.h"));
    if let Ok(path) = env::var(HEADER_ENV) {
        bindings.write_to_file(path);
    }
}
