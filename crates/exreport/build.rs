// Build script for exreport - embeds version at compile time

fn main() {
    // Release pipelines may set EXREPORT_VERSION; otherwise use Cargo.toml
    let version =
        std::env::var("EXREPORT_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=EXREPORT_VERSION={}", version);

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=EXREPORT_VERSION");
}
