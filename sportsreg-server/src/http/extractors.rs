//! Custom Axum extractors
//!
//! Wrap the stock extractors so their rejections use the JSON error body.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::extract::rejection::JsonRejection;
use axum::http::request::Parts;
use axum::Json;
use serde_json::Value;

use super::error::ApiError;
use crate::models::ValidationError;

/// JSON body whose parse failures become 400 `ApiError`s.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Extract and validate a numeric id from a single-segment path
pub struct ValidId(pub i64);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let id = id.parse::<i64>().ok().filter(|id| *id > 0).ok_or(ApiError::Validation(
            ValidationError::InvalidFormat {
                field: "id",
                reason: "must be a positive integer",
            },
        ))?;

        Ok(Self(id))
    }
}

/// Read an integer body field sent as a number, a whole float (`4.0`) or a
/// numeric string (`"4"`). Null and empty strings count as absent.
pub fn lenient_int(value: Option<Value>, field: &'static str) -> Result<Option<i64>, ValidationError> {
    let invalid = ValidationError::InvalidFormat {
        field,
        reason: "must be a whole number",
    };

    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        Some(_) => None,
    };

    parsed.map(Some).ok_or(invalid)
}

/// Integral, finite floats inside the exactly representable range.
fn whole(f: f64) -> Option<i64> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT).then_some(f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numbers_whole_floats_and_numeric_strings() {
        assert_eq!(lenient_int(Some(json!(4)), "rating"), Ok(Some(4)));
        assert_eq!(lenient_int(Some(json!(4.0)), "rating"), Ok(Some(4)));
        assert_eq!(lenient_int(Some(json!("9")), "event_id"), Ok(Some(9)));
        assert_eq!(lenient_int(Some(json!(" 3.0 ")), "rating"), Ok(Some(3)));
        assert_eq!(lenient_int(Some(json!(-2)), "rating"), Ok(Some(-2)));
    }

    #[test]
    fn absent_values() {
        assert_eq!(lenient_int(None, "rating"), Ok(None));
        assert_eq!(lenient_int(Some(Value::Null), "rating"), Ok(None));
        assert_eq!(lenient_int(Some(json!("  ")), "rating"), Ok(None));
    }

    #[test]
    fn rejects_fractions_and_non_numbers() {
        for value in [json!(4.5), json!("four"), json!(true), json!([1]), json!({"n": 1})] {
            assert!(matches!(
                lenient_int(Some(value), "rating"),
                Err(ValidationError::InvalidFormat { field: "rating", .. })
            ));
        }
    }
}
