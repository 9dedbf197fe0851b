use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// rejected before any generation is attempted
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// the os refused to hand out randomness
    #[error("could not read system entropy: {0}")]
    EntropyUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
