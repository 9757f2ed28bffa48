use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    NothingExtracted,
    InvalidArgs,
}

impl ExitCode {
    pub const fn as_i32(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::NothingExtracted => 1,
            ExitCode::InvalidArgs => 2,
        }
    }
}

#[derive(Debug)]
pub struct ExitError {
    pub code: ExitCode,
    pub err: anyhow::Error,
}

impl ExitError {
    pub fn new(code: ExitCode, err: anyhow::Error) -> Self {
        Self { code, err }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.err.fmt(f)
    }
}

impl std::error::Error for ExitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.err.as_ref())
    }
}

pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(exit) = err.downcast_ref::<ExitError>() {
        return exit.code.as_i32();
    }
    ExitCode::NothingExtracted.as_i32()
}

pub fn nothing_extracted() -> anyhow::Error {
    ExitError::new(
        ExitCode::NothingExtracted,
        anyhow::anyhow!("no screenshots were extracted"),
    )
    .into()
}

/// True for failures the extraction run has already printed itself.
pub fn is_reported(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ExitError>()
        .is_some_and(|exit| exit.code == ExitCode::NothingExtracted)
}

pub fn invalid_args_err(err: anyhow::Error) -> anyhow::Error {
    ExitError::new(ExitCode::InvalidArgs, err).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classified_errors_keep_their_code() {
        assert_eq!(
            exit_code(&invalid_args_err(anyhow::anyhow!("bad config"))),
            2
        );
    }

    #[test]
    fn unclassified_errors_mean_nothing_extracted() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(exit_code(&err), 1);
        assert!(!is_reported(&err));
    }

    #[test]
    fn nothing_extracted_is_already_reported() {
        let err = nothing_extracted();
        assert_eq!(exit_code(&err), 1);
        assert!(is_reported(&err));
        assert!(!is_reported(&invalid_args_err(anyhow::anyhow!("x"))));
    }
}
