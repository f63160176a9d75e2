//! Toolchain capability probing.
//!
//! Runs once per invocation, before any build step. Locates the C compiler
//! (fatal if absent) and resolves external-library build flags through
//! pkg-config. An unresolvable library yields empty flag sets; the build is
//! attempted anyway and any failure surfaces as an ordinary step failure.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::error::BuildError;
use crate::util::process::{CommandSpec, Runner};

/// External libraries whose build flags are resolved up front.
pub const PROBED_LIBRARIES: &[&str] = &["libmongoc-1.0"];

/// Candidate compiler names, tried in order after `$CC`.
const COMPILER_CANDIDATES: &[&str] = &["gcc", "cc", "clang"];

/// Which flags to request from the flag resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagMode {
    Compile,
    Link,
    Both,
}

/// Resolved build flags for one external library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryFlags {
    /// Compile flags (`pkg-config --cflags`).
    pub cflags: Vec<String>,
    /// Link flags (`pkg-config --libs`).
    pub libs: Vec<String>,
}

/// Snapshot of the host toolchain, computed once per invocation and
/// read-only thereafter.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Path to the C compiler.
    pub compiler: PathBuf,
    /// Path to pkg-config, if reachable.
    pub pkg_config: Option<PathBuf>,
    /// Resolved flags per probed library.
    pub libraries: BTreeMap<String, LibraryFlags>,
}

impl Capabilities {
    /// Resolved compile flags for a library (empty if unresolved).
    pub fn compile_flags(&self, lib: &str) -> Vec<String> {
        self.libraries
            .get(lib)
            .map(|f| f.cflags.clone())
            .unwrap_or_default()
    }

    /// Resolved link flags for a library (empty if unresolved).
    pub fn link_flags(&self, lib: &str) -> Vec<String> {
        self.libraries
            .get(lib)
            .map(|f| f.libs.clone())
            .unwrap_or_default()
    }

    /// Compile and link flags concatenated, for single-shot builds that
    /// compile and link in one compiler invocation.
    pub fn all_flags(&self, lib: &str) -> Vec<String> {
        let mut flags = self.compile_flags(lib);
        flags.extend(self.link_flags(lib));
        flags
    }
}

/// Detects toolchain presence and resolves external-library build flags.
pub struct CapabilityProbe<'a> {
    runner: &'a dyn Runner,
}

impl<'a> CapabilityProbe<'a> {
    /// Create a probe that issues its queries through the given runner.
    pub fn new(runner: &'a dyn Runner) -> Self {
        CapabilityProbe { runner }
    }

    /// Probe the environment once.
    ///
    /// A missing compiler is fatal. A missing flag resolver is not: every
    /// probed library degrades to empty flag sets.
    pub fn detect(&self) -> Result<Capabilities> {
        let compiler = find_compiler().ok_or(BuildError::CompilerNotFound)?;
        let pkg_config = find_tool("pkg-config");

        if pkg_config.is_none() {
            tracing::debug!("pkg-config not found, library flags degrade to empty");
        }

        let mut libraries = BTreeMap::new();
        for lib in PROBED_LIBRARIES {
            let flags = LibraryFlags {
                cflags: self.resolve_flags(lib, FlagMode::Compile),
                libs: self.resolve_flags(lib, FlagMode::Link),
            };
            libraries.insert((*lib).to_string(), flags);
        }

        Ok(Capabilities {
            compiler,
            pkg_config,
            libraries,
        })
    }

    /// Query pkg-config for a library's flags.
    ///
    /// Any failure (missing tool, unregistered library, non-zero exit)
    /// yields an empty flag set, never an error.
    pub fn resolve_flags(&self, lib: &str, mode: FlagMode) -> Vec<String> {
        let mut spec = CommandSpec::new("pkg-config");
        spec = match mode {
            FlagMode::Compile => spec.arg("--cflags"),
            FlagMode::Link => spec.arg("--libs"),
            FlagMode::Both => spec.args(["--cflags", "--libs"]),
        };
        spec = spec.arg(lib);

        match self.runner.capture(&spec) {
            Ok(captured) if captured.success => captured
                .stdout
                .split_whitespace()
                .map(String::from)
                .collect(),
            Ok(_) | Err(_) => {
                tracing::debug!("flag resolution failed for {lib}, using empty flags");
                Vec::new()
            }
        }
    }
}

/// Find the C compiler: `$CC` first, then the fixed candidate list.
pub fn find_compiler() -> Option<PathBuf> {
    if let Ok(cc) = std::env::var("CC") {
        if let Some(path) = find_tool(&cc) {
            return Some(path);
        }
    }

    COMPILER_CANDIDATES.iter().find_map(|name| find_tool(name))
}

/// Generic reachability check: absence is `None`, not an error.
pub fn find_tool(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
