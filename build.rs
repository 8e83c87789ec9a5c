//! Build script
//!
//! Puts `memory.x` where the linker finds it when building the firmware and
//! records the build time, which seeds the clock until a phone syncs it.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    // Only the thumb targets link against memory.x, host builds run the tests
    if env::var("TARGET").is_ok_and(|target| target.starts_with("thumb")) {
        File::create(out.join("memory.x"))
            .unwrap()
            .write_all(include_bytes!("memory.x"))
            .unwrap();
        println!("cargo:rustc-link-search={}", out.display());
    }

    // Seconds since the Unix epoch (UTC) at build time
    File::create(out.join("utc.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "const UTC_EPOCH: i64 = {:?};",
            chrono::Utc::now().timestamp()
        ))
        .unwrap();

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
