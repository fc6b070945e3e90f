use sprout_client::{ClientError, Route};
use sprout_config::ConfigError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Not logged in. Run `sprout login` first (redirected to {0})")]
    NotLoggedIn(Route),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl From<inquire::InquireError> for CliError {
    fn from(err: inquire::InquireError) -> Self {
        Self::Prompt(err.to_string())
    }
}
