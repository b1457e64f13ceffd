use serde::{Deserialize, Serialize};

use crate::session::Notice;

/// Request body for a visitor review. `rating` tolerates numbers and
/// numeric strings; anything else counts as an inquiry.
#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub visitor_name: String,
    #[serde(default)]
    pub rating: Option<serde_json::Value>,
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitReviewResponse {
    pub notice: Notice,
}
