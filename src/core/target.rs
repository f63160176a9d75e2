//! Buildable target identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named buildable unit (binary or pseudo-action such as `clean`).
///
/// Targets form a closed set; every variant maps to exactly one recipe in
/// the compilation matrix. Selecting a target never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// The `exchange-daemon` binary.
    Daemon,
    /// The `client` binary.
    Client,
    /// The `server` binary.
    Server,
    /// The `mongo_client` database-access binary.
    Mongo,
    /// The external test-runner program.
    Tests,
    /// Daemon, client, server and mongo, built in that order.
    All,
    /// Remove build artifacts.
    Clean,
}

impl Target {
    /// All targets, in declaration order.
    pub const ALL: [Target; 7] = [
        Target::Daemon,
        Target::Client,
        Target::Server,
        Target::Mongo,
        Target::Tests,
        Target::All,
        Target::Clean,
    ];

    /// The CLI-facing name of this target.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Daemon => "daemon",
            Target::Client => "client",
            Target::Server => "server",
            Target::Mongo => "mongo",
            Target::Tests => "tests",
            Target::All => "all",
            Target::Clean => "clean",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daemon" => Ok(Target::Daemon),
            "client" => Ok(Target::Client),
            "server" => Ok(Target::Server),
            "mongo" => Ok(Target::Mongo),
            "tests" => Ok(Target::Tests),
            "all" => Ok(Target::All),
            "clean" => Ok(Target::Clean),
            _ => Err(format!(
                "unrecognized target `{s}` (expected one of: daemon, client, server, mongo, tests, all, clean)"
            )),
        }
    }
}
