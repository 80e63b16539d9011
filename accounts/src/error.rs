use thiserror::Error;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 4;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Username must be at least 3 characters (got {0})")]
    UsernameTooShort(usize),

    #[error("Password must be at least 4 characters (got {0})")]
    PasswordTooShort(usize),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AccountError {
    /// Errors caused by what the player typed, as opposed to storage trouble
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AccountError::UsernameTaken
                | AccountError::UsernameTooShort(_)
                | AccountError::PasswordTooShort(_)
                | AccountError::UnknownUser(_)
        )
    }
}
