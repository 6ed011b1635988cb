use kernel_info::memory;
use std::{env, path::PathBuf};

fn main() {
    // Point to the linker script
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let ld = manifest_dir.join("kernel.ld");

    // Rebuild when inputs change
    println!("cargo:rerun-if-changed={}", ld.display());

    // Host builds (unit and integration tests) link normally.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("none") {
        return;
    }

    // The `compile_error!` in main.rs is authoritative; this only reports early.
    if let Ok(panic) = env::var("CARGO_CFG_PANIC")
        && panic != "abort"
    {
        println!("cargo::warning=the kernel image requires panic=abort, target reports {panic}");
    }

    // Sanity checks (fail fast during build)
    let kernel_base = memory::KERNEL_BASE;
    assert_eq!(
        kernel_base & ((1u64 << 21) - 1),
        0,
        "KERNEL_BASE must be 2 MiB aligned (got {kernel_base:#x})"
    );

    // Linker script
    println!("cargo:rustc-link-arg-bins=-T{}", ld.display());

    // Provide symbols to the linker script
    // (cargo:rustc-link-arg-bins passes args directly to the linker)
    println!("cargo:rustc-link-arg-bins=--defsym=KERNEL_BASE={kernel_base:#x}");
}
