fn main() {
    // Release pipelines stamp a build number via env or a BUILD_NUMBER file;
    // local builds fall back to 0.
    let build_number = std::env::var("GHPC_BUILD_NUMBER")
        .ok()
        .or_else(|| std::fs::read_to_string("BUILD_NUMBER").ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "0".to_string());

    println!("cargo:rustc-env=BUILD_NUMBER={build_number}");
    println!("cargo:rerun-if-changed=BUILD_NUMBER");
    println!("cargo:rerun-if-env-changed=GHPC_BUILD_NUMBER");
}
