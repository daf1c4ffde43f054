use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub message: String,
    pub rows_processed: usize,
}

/// JSON body returned with every non-2xx response.
///
/// `details` never carries internal error text: it is either a validation
/// message the caller can act on or a fixed summary of the failure class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<String>,
}
