//! Build script: embeds the git hash for the version string and sanity-checks
//! GPU toolkits before whisper-rs-sys starts compiling against them.

use std::process::Command;

fn main() {
    if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        && output.status.success()
    {
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=GIT_HASH={}", hash);
    }
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");

    if cfg!(feature = "cuda") {
        require_tool(
            "nvcc",
            &["--version"],
            "CUDA toolkit not found. Install from https://developer.nvidia.com/cuda-downloads\n\
             or build another backend (e.g. --features vulkan).",
        );
    }
    if cfg!(feature = "vulkan") {
        require_tool(
            "vulkaninfo",
            &["--summary"],
            "Vulkan SDK not found. Install from https://vulkan.lunarg.com/",
        );
    }
    if cfg!(feature = "hipblas") {
        require_tool(
            "rocminfo",
            &[],
            "ROCm not found. Install from https://rocm.docs.amd.com/",
        );
    }
    if cfg!(feature = "openblas") {
        check_openblas();
    }
}

/// Panic with a readable message if `tool` cannot be invoked.
fn require_tool(tool: &str, args: &[&str], help: &str) {
    if Command::new(tool).args(args).output().is_err() {
        panic!("\n\n`{tool}` not found.\n{help}\n");
    }
    println!("cargo::warning={tool} detected");
}

fn check_openblas() {
    let pkg_config_ok = Command::new("pkg-config")
        .args(["--exists", "openblas"])
        .status()
        .is_ok_and(|s| s.success());

    let lib_exists = std::path::Path::new("/usr/lib/x86_64-linux-gnu/libopenblas.so").exists()
        || std::path::Path::new("/usr/lib/libopenblas.so").exists()
        || std::path::Path::new("/usr/lib64/libopenblas.so").exists();

    if !pkg_config_ok && !lib_exists {
        panic!("\n\nOpenBLAS not found. Install with: sudo apt install libopenblas-dev\n");
    }
    println!("cargo::warning=OpenBLAS detected");
}
