use serde::Serialize;

use crate::error::Result;

/// One report as a single line of JSON, no trailing newline.
pub fn json_line<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}
