//! Path extraction and typed path parameter helpers.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use pv_core::error::AppError;
use pv_core::types::id::ReportId;

use crate::error::ApiError;

/// Like `Path<T>`, but rejections use the API error body.
#[derive(Debug, Clone)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Parse a report id from a path segment.
pub fn parse_report_id(s: &str) -> Result<ReportId, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid report id: {s}")))
}

/// Parse a version number from a path segment.
///
/// Non-numeric input is a validation error. A number no version can
/// carry (below 1 or past `i32::MAX`) is reported as not found.
pub fn parse_version_number(s: &str) -> Result<i32, AppError> {
    let number: i64 = s
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid version number: {s}")))?;
    i32::try_from(number)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| AppError::not_found(format!("Version {number} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_core::error::ErrorKind;

    #[test]
    fn test_parse_version_number() {
        assert_eq!(parse_version_number(" 2 ").unwrap(), 2);
        assert_eq!(parse_version_number("2147483647").unwrap(), i32::MAX);

        assert!(parse_version_number("3000000000").unwrap_err().is_not_found());
        assert!(parse_version_number("0").unwrap_err().is_not_found());
        assert!(parse_version_number("-1").unwrap_err().is_not_found());

        assert_eq!(parse_version_number("latest").unwrap_err().kind, ErrorKind::Validation);
        assert_eq!(
            parse_version_number("99999999999999999999").unwrap_err().kind,
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_parse_report_id() {
        let id = ReportId::new();
        assert_eq!(parse_report_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_report_id("abc").unwrap_err().kind, ErrorKind::Validation);
    }
}
