//! Artifact removal.

use std::path::Path;

use anyhow::Result;

use crate::util::process::Runner;

/// Every artifact the build can produce, plus legacy object names from
/// earlier layouts (`blake3_avx512.o`). Fixed list; removal is idempotent.
pub const ARTIFACTS: &[&str] = &[
    "exchange-daemon",
    "client",
    "server",
    "mongo_client",
    "tests/test_runner",
    "obfuscator",
    "client.o",
    "server.o",
    "mongo_ops.o",
    "mongo_ops_server.o",
    "utils.o",
    "aes_gcm.o",
    "blake3.o",
    "blake3_dispatch.o",
    "blake3_portable.o",
    "blake3_sse2.o",
    "blake3_sse41.o",
    "blake3_avx2.o",
    "blake3_avx512.o",
];

/// Remove all build artifacts.
///
/// Bypasses the capability probe and the compilation matrix entirely: each
/// path is removed independently and a missing artifact is not an error.
pub fn clean(runner: &dyn Runner) -> Result<()> {
    for artifact in ARTIFACTS {
        runner.remove_file(Path::new(artifact))?;
    }

    eprintln!("     Removed {} artifact path(s)", ARTIFACTS.len());
    Ok(())
}
