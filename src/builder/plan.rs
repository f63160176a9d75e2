//! The compilation matrix.
//!
//! `BuildPlan` maps each target to its ordered compile/link steps as pure
//! data. Resolved library flags from the capability probe are folded in at
//! construction time, before any process runs. Per-target differences live
//! here as data; one generic execution routine consumes them all.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::target::Target;
use crate::ops::probe::Capabilities;

/// Directory holding the hash-library sources.
pub const HASH_DIR: &str = "deps/blake3";

/// The pkg-config name of the MongoDB C driver.
const MONGOC: &str = "libmongoc-1.0";

/// System libraries linked into the client and server binaries.
const SERVICE_LIBS: &[&str] = &["ssl", "crypto", "pthread"];

/// Instruction-set extensions the hash library is specialized for, with
/// the flags that enable each one. Every extension compiles in its own
/// translation unit so unsafe instructions never leak into the baseline
/// or dispatcher objects.
const HASH_EXTENSIONS: &[(&str, &[&str])] = &[
    ("sse2", &["-msse2"]),
    ("sse41", &["-mssse3", "-msse4.1"]),
    ("avx2", &["-mavx2"]),
];

/// A single source-to-object compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileStep {
    /// Source file.
    pub source: PathBuf,

    /// Output object file.
    pub output: PathBuf,

    /// Include directories.
    pub include_dirs: Vec<PathBuf>,

    /// Warning flags.
    pub warnings: Vec<String>,

    /// Preprocessor defines (names only, emitted as `-DNAME`).
    pub defines: Vec<String>,

    /// Extension-enabling compiler flags (e.g. `-msse2`).
    pub isa_flags: Vec<String>,

    /// Resolved library compile flags.
    pub lib_cflags: Vec<String>,
}

/// The final combination of inputs into one binary.
///
/// `inputs` holds object files for multi-step targets, or source files for
/// the single-shot daemon and mongo builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkStep {
    /// Output binary name.
    pub output: PathBuf,

    /// Ordered input files.
    pub inputs: Vec<PathBuf>,

    /// Resolved external-library link flags.
    pub lib_flags: Vec<String>,

    /// System libraries to link (without `-l` prefix).
    pub libs: Vec<String>,
}

/// An opaque external-collaborator invocation (the test runner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomStep {
    /// Program to execute.
    pub program: String,

    /// Arguments.
    pub args: Vec<String>,
}

/// A build step in the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildStep {
    /// Compile a source file to an object file.
    Compile(CompileStep),
    /// Link inputs into a binary.
    Link(LinkStep),
    /// Run an external program.
    Custom(CustomStep),
}

/// A complete build plan: all steps for one target, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    /// All build steps in execution order.
    pub steps: Vec<BuildStep>,
}

impl BuildPlan {
    /// Construct the plan for a target.
    ///
    /// `Clean` has no plan (callers route it to `ops::clean`); `All` is the
    /// concatenation of the daemon, client, server and mongo plans, in that
    /// order.
    pub fn for_target(target: Target, caps: &Capabilities) -> BuildPlan {
        let steps = match target {
            Target::Daemon => daemon_steps(caps),
            Target::Client => service_steps(
                caps,
                "src/client/client.c",
                "client.o",
                "src/db/mongo_ops.c",
                "mongo_ops.o",
                "client",
            ),
            Target::Server => service_steps(
                caps,
                "src/server/server.c",
                "server.o",
                "src/db/mongo_ops_server.c",
                "mongo_ops_server.o",
                "server",
            ),
            Target::Mongo => mongo_steps(caps),
            Target::Tests => vec![BuildStep::Custom(CustomStep {
                program: "python3".to_string(),
                args: vec!["tests.py".to_string()],
            })],
            Target::All => {
                let mut steps = daemon_steps(caps);
                steps.extend(Self::for_target(Target::Client, caps).steps);
                steps.extend(Self::for_target(Target::Server, caps).steps);
                steps.extend(mongo_steps(caps));
                steps
            }
            Target::Clean => Vec::new(),
        };

        BuildPlan { steps }
    }

    /// Get the number of compile steps.
    pub fn compile_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, BuildStep::Compile(_)))
            .count()
    }

    /// Get the number of link steps.
    pub fn link_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, BuildStep::Link(_)))
            .count()
    }

    /// Serialize the plan as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The daemon builds in one compiler invocation: sources straight to
/// binary, with the combined mongoc compile and link flags.
fn daemon_steps(caps: &Capabilities) -> Vec<BuildStep> {
    vec![BuildStep::Link(LinkStep {
        output: PathBuf::from("exchange-daemon"),
        inputs: vec![
            PathBuf::from("src/main.c"),
            PathBuf::from("src/db/mongo_ops.c"),
        ],
        lib_flags: caps.all_flags(MONGOC),
        libs: Vec::new(),
    })]
}

/// Single-shot build of the standalone database-access binary.
fn mongo_steps(caps: &Capabilities) -> Vec<BuildStep> {
    vec![BuildStep::Link(LinkStep {
        output: PathBuf::from("mongo_client"),
        inputs: vec![PathBuf::from("src/db/mongo_client.c")],
        lib_flags: caps.all_flags(MONGOC),
        libs: Vec::new(),
    })]
}

/// Shared recipe for the client and server binaries: four first-party
/// objects, the hash-library variant set, then one link step over every
/// object produced.
fn service_steps(
    caps: &Capabilities,
    main_source: &str,
    main_object: &str,
    db_source: &str,
    db_object: &str,
    binary: &str,
) -> Vec<BuildStep> {
    let mongoc_cflags = caps.compile_flags(MONGOC);

    let mut compile_steps = vec![
        common_step(main_source, main_object, mongoc_cflags.clone()),
        common_step(db_source, db_object, mongoc_cflags),
        common_step("src/utils/utils.c", "utils.o", Vec::new()),
        common_step("src/crypto/aes_gcm.c", "aes_gcm.o", Vec::new()),
    ];
    compile_steps.extend(hash_variant_steps());

    // The link step references exactly the objects produced above; deriving
    // the list keeps the object/compile-step invariant by construction.
    let objects: Vec<PathBuf> = compile_steps.iter().map(|s| s.output.clone()).collect();

    let mut steps: Vec<BuildStep> = compile_steps.into_iter().map(BuildStep::Compile).collect();
    steps.push(BuildStep::Link(LinkStep {
        output: PathBuf::from(binary),
        inputs: objects,
        lib_flags: caps.link_flags(MONGOC),
        libs: SERVICE_LIBS.iter().map(|s| (*s).to_string()).collect(),
    }));

    steps
}

/// A first-party object with the shared include paths and warnings.
fn common_step(source: &str, object: &str, lib_cflags: Vec<String>) -> CompileStep {
    CompileStep {
        source: PathBuf::from(source),
        output: PathBuf::from(object),
        include_dirs: vec![PathBuf::from("include"), PathBuf::from(HASH_DIR)],
        warnings: warnings(),
        defines: Vec::new(),
        isa_flags: Vec::new(),
        lib_cflags,
    }
}

/// The hash-library variant set: portable baseline, a dispatcher compiled
/// without AVX-512 references, and one object per supported extension.
fn hash_variant_steps() -> Vec<CompileStep> {
    let mut steps = vec![
        hash_step("blake3.c", "blake3.o", &[], &[]),
        // The AVX-512 object is intentionally not built; the define keeps
        // the dispatcher from referencing its symbols.
        hash_step(
            "blake3_dispatch.c",
            "blake3_dispatch.o",
            &["BLAKE3_NO_AVX512"],
            &[],
        ),
        hash_step("blake3_portable.c", "blake3_portable.o", &[], &[]),
    ];

    for (name, flags) in HASH_EXTENSIONS {
        steps.push(hash_step(
            &format!("blake3_{name}.c"),
            &format!("blake3_{name}.o"),
            &[],
            flags,
        ));
    }

    steps
}

fn hash_step(source: &str, object: &str, defines: &[&str], isa_flags: &[&str]) -> CompileStep {
    CompileStep {
        source: Path::new(HASH_DIR).join(source),
        output: PathBuf::from(object),
        include_dirs: vec![PathBuf::from(HASH_DIR)],
        warnings: warnings(),
        defines: defines.iter().map(|s| (*s).to_string()).collect(),
        isa_flags: isa_flags.iter().map(|s| (*s).to_string()).collect(),
        lib_cflags: Vec::new(),
    }
}

fn warnings() -> Vec<String> {
    vec!["-Wall".to_string(), "-Wextra".to_string()]
}
