// RustAudioLoopback - Build Script

fn main() {
    // ESP-IDF environment setup (MUST be first!). Only relevant when
    // building for the espidf target; the host library/test build has no
    // ESP-IDF toolchain environment to propagate.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Track partition file changes
    println!("cargo:rerun-if-changed=partitions.csv");
}
