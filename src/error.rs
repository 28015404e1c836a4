use thiserror::Error;

/// Fallback text when a failed response carries nothing usable.
pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// No response was received at all.
    #[error("Network error: {0}")]
    Network(String),

    /// A response arrived with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The transport succeeded but the payload reported `success: false`.
    #[error("{0}")]
    Application(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    /// Another cart change for this product has not finished yet.
    #[error("An update for product {0} is already in progress")]
    Busy(i64),
}

impl ClientError {
    /// Text shown to the user in the single notification for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(msg) => format!("Unable to reach the server: {}", msg),
            ClientError::Http { message, .. } => message.clone(),
            ClientError::Application(msg) => msg.clone(),
            ClientError::Decode(msg) => format!("Unexpected response from server: {}", msg),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Busy(_) => self.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
