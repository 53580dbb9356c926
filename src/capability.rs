//! Probes for optional external tools.
//!
//! Probes never fail: a program that cannot be spawned, exits non-zero or
//! is missing from `PATH` is simply reported as unavailable.

use std::process::{Command, Stdio};

/// Check whether `program` runs and exits successfully with `args`.
pub fn is_command_available(program: &str, args: &[&str]) -> bool {
    let available = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);

    tracing::debug!(program, ?args, available, "probed external command");
    available
}

/// Check whether Graphviz `dot` is installed, for rendering diagrams.
pub fn is_graphviz_available() -> bool {
    is_command_available("dot", &["-V"])
}
