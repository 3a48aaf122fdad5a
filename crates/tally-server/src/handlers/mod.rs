//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod audit;
pub mod auth;
pub mod budget;
pub mod expenses;

// Re-export all handlers for use in router
pub use analytics::*;
pub use audit::*;
pub use auth::*;
pub use budget::*;
pub use expenses::*;

use crate::AppError;

/// Require both month and year query parameters, numeric
///
/// They arrive as strings so a malformed value still yields a 400 with the
/// API's `{"message"}` envelope instead of a bare extractor rejection.
pub(crate) fn require_month_year(
    month: Option<&str>,
    year: Option<&str>,
) -> Result<(u32, i32), AppError> {
    let (Some(month), Some(year)) = (month, year) else {
        return Err(AppError::bad_request("Please provide month and year"));
    };
    let month = month
        .parse()
        .map_err(|_| AppError::bad_request("Month and year must be numeric"))?;
    let year = year
        .parse()
        .map_err(|_| AppError::bad_request("Month and year must be numeric"))?;
    Ok((month, year))
}

/// Month and year are optional but travel together; a lone half is ignored
pub(crate) fn optional_month_year(
    month: Option<&str>,
    year: Option<&str>,
) -> Result<Option<(u32, i32)>, AppError> {
    match (month, year) {
        (Some(month), Some(year)) => require_month_year(Some(month), Some(year)).map(Some),
        _ => Ok(None),
    }
}
