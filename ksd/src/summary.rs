use std::fmt;

/// Per run counters, printed once everything has finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tasks: usize,
    pub descriptors: usize,
    pub token_timeouts: usize,
    pub network_errors: usize,
    pub malformed_responses: usize,
    /// Tasks which panicked before producing an outcome.
    pub aborted_tasks: usize,
    pub assets_written: usize,
    /// Subtitles downloaded but not stored (file system errors).
    pub write_errors: usize,
    pub unrecovered_lines: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} episodes, {} descriptors, {} token timeouts, {} network errors, \
            {} malformed responses, {} aborted tasks, {} subtitles written, \
            {} write errors, {} unrecovered lines",
            self.tasks,
            self.descriptors,
            self.token_timeouts,
            self.network_errors,
            self.malformed_responses,
            self.aborted_tasks,
            self.assets_written,
            self.write_errors,
            self.unrecovered_lines
        )
    }
}
