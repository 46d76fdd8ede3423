//! Result envelope returned by device operations

use serde::{Deserialize, Serialize};

/// Wraps the result code of a completed device operation.
///
/// For mutating calls `0` means success. For reads the code carries the raw
/// value, e.g. a register value or a work mode code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult {
    pub result_code: i32,
}

impl ApiResult {
    pub const OK: ApiResult = ApiResult { result_code: 0 };

    pub fn new(result_code: i32) -> Self {
        Self { result_code }
    }
}
