use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to start `{command}`: {source}")]
    Spawn { command: String, source: std::io::Error },
    #[error("`{command}` did not finish within {secs}s")]
    Timeout { command: String, secs: u64 },
    #[error("`{command}` exited with {code:?}: {output}")]
    CommandFailed { command: String, code: Option<i32>, output: String },
    #[error("could not parse device output: {0}")]
    Parse(#[from] ParseError),
}

///
/// Raised when device output does not have the expected line shape
///
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected a `package:` line, got {0:?}")]
    UnexpectedLine(String),
}
