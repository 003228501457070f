//! Build script for pio-strand.

use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rustc-check-cfg=cfg(rust_analyzer)");

    // Host builds (tests) link with the native toolchain and need no memory.x.
    let target = env::var("TARGET").unwrap();
    let memory_x_source = if target.starts_with("thumbv8m") {
        // Pico 2 ARM
        "memory-pico2.x"
    } else if target.starts_with("thumbv6m") {
        // Pico 1
        "memory-pico1.x"
    } else {
        return;
    };

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let memory_x = fs::read_to_string(memory_x_source)
        .unwrap_or_else(|_| panic!("Failed to read {memory_x_source}"));
    let dest = out_dir.join("memory.x");
    fs::write(&dest, memory_x).expect("Failed to write memory.x");
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed={memory_x_source}");
}
