//! Pronunciation playback.
//!
//! Speech is fire-and-forget: the drill never waits for playback and never
//! fails because of it.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

/// Something that can say a term out loud.
pub trait Speaker: Send + Sync {
    /// Start speaking `text` and return immediately.
    fn speak(&self, text: &str);
}

/// Does nothing. Used when no speech program is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&self, text: &str) {
        debug!(text, "Speech disabled");
    }
}

/// Runs an external program with the text as its last argument,
/// e.g. `espeak -v es` or `say -v Monica`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    /// Create a speaker for `program` with no extra arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Parse a whitespace-separated command line. Returns `None` if empty.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// The program to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments placed before the text.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Speaker for CommandSpeaker {
    // Must be called inside a Tokio runtime so the child is reaped.
    fn speak(&self, text: &str) {
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(_) => debug!(program = %self.program, text, "Speaking"),
            Err(e) => warn!(program = %self.program, error = %e, "Could not start speech program"),
        }
    }
}
