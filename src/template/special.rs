//! Zero-argument special tokens (`{% name %}`)
//!
//! Each occurrence is evaluated independently at call time.

use chrono::{Local, Utc};
use uuid::Uuid;

/// Expand a special token. Unknown names expand to the empty string.
pub fn expand(name: &str) -> String {
    match name {
        "uuid" => Uuid::new_v4().to_string(),
        "timestamp" => Utc::now().timestamp().to_string(),
        "datetime" => Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        "date" => Local::now().format("%Y-%m-%d").to_string(),
        "time" => Local::now().format("%H:%M:%S").to_string(),
        _ => String::new(),
    }
}
