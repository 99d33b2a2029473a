use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=MINEX_LIB_DIR");
    println!("cargo:rerun-if-env-changed=MINEX_LIB_NAME");

    // Only the `ffi` build links the participant library.
    if env::var_os("CARGO_FEATURE_FFI").is_none() {
        return;
    }

    if let Some(dir) = env::var_os("MINEX_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
    let name = env::var("MINEX_LIB_NAME").unwrap_or_else(|_| "minexiii".to_string());
    println!("cargo:rustc-link-lib={}", name);
}
