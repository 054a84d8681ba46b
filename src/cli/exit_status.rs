use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Every entry was processed without error
/// - `Failure` (1): The run completed but some entries carry an error
/// - `Error` (2): The run failed (configuration error, unreadable input, etc.)
/// - `Interrupted` (130): The run was interrupted (Ctrl-C, or an interrupted I/O error)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
    Interrupted,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code() as u8)
    }
}

impl ExitStatus {
    /// Numeric process exit code.
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::Error => 2,
            ExitStatus::Interrupted => 130,
        }
    }

    /// Status for a run that failed with `err`.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let interrupted = err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::Interrupted)
        });
        if interrupted {
            ExitStatus::Interrupted
        } else {
            ExitStatus::Error
        }
    }
}
