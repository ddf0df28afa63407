use serde::{Deserialize, Serialize};

/// Body returned by `POST /api/contact` once the message is on disk.
pub const SAVED_MESSAGE: &str = "Message saved successfully";

/// Body returned when the message could not be persisted.
pub const SAVE_FAILED_ERROR: &str = "Failed to save message";

/// Body returned for any other failure while handling a request.
pub const GENERIC_ERROR: &str = "Something went wrong!";

/// Body returned when required-field checking is enabled and a field is missing.
pub const MISSING_FIELDS_ERROR: &str = "Missing required fields";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedResponse {
    pub message: String,
}

impl SavedResponse {
    pub fn saved() -> Self {
        Self {
            message: SAVED_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
