use std::fmt::Display;

/// Console progress output shared by both pipelines.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Announce the start of a pipeline stage.
    pub fn step(&self, message: impl Display) {
        if !self.quiet {
            println!("{message}");
        }
    }

    /// Report a finished artifact.
    pub fn done(&self, message: impl Display) {
        if !self.quiet {
            println!("  ✓ {message}");
        }
    }
}
