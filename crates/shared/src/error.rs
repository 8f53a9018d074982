use serde::{Deserialize, Serialize};

/// Error payload the employee service returns on a failed PATCH.
///
/// The service is only contractually expected to carry a `message` field;
/// anything else in the body is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
