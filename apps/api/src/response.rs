//! Response envelope.
//!
//! Every endpoint answers the same JSON shape, success and failure alike:
//!
//! ```text
//!   { "success": true,  "data": ..., "count": 3 }   list responses
//!   { "success": true,  "data": ... }               single resources
//!   { "success": false, "error": "..." }            any failure
//! ```
//!
//! The frontend switches on `success` alone, so no endpoint may answer a
//! bare value or a different error shape.

use serde::Serialize;

/// Uniform response envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    /// Successful single-resource response
    pub fn ok(data: T) -> Self {
        Envelope {
            success: true,
            data: Some(data),
            count: None,
            error: None,
        }
    }

    /// Successful list response; `count` mirrors the list length
    pub fn ok_list(data: T, count: usize) -> Self {
        Envelope {
            success: true,
            data: Some(data),
            count: Some(count),
            error: None,
        }
    }
}

impl Envelope<()> {
    /// Failure response carrying only the error message
    pub fn failure(message: impl Into<String>) -> Self {
        Envelope {
            success: false,
            data: None,
            count: None,
            error: Some(message.into()),
        }
    }
}
