use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("prompt must be between {min} and {max} characters")]
    Validation { min: usize, max: usize },
    #[error("network failure: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("{message}")]
    Api { status: Option<u16>, message: String },
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn from_status(status: u16, reason: Option<&str>) -> Self {
        let message = match reason {
            Some(reason) => format!("HTTP {status}: {reason}"),
            None => format!("HTTP {status}"),
        };
        ClientError::Api {
            status: Some(status),
            message,
        }
    }

    /// Text shown in the error panel, without the variant's prefix.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation { min, max } => {
                format!("Prompt must be between {min} and {max} characters.")
            }
            ClientError::Network(_) => concat!(
                "Network connection failed. Please check your internet connection ",
                "and ensure the backend server is running."
            )
            .to_string(),
            ClientError::Timeout => "Request timed out. Please try again.".to_string(),
            ClientError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Api { .. } | ClientError::InvalidResponse(_) => {
                "Please try again.".to_string()
            }
            ClientError::Storage(_) => "Local storage is unavailable.".to_string(),
        }
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::Storage(format!("{err:#}"))
    }
}
