use axum::{
    BoxError,
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::Value;

use crate::error::AppError;

/// Trims the top-level string fields of a JSON object body; blank strings become `null`.
/// Non-JSON requests and bodies that do not parse pass through untouched.
/// JSON bodies larger than `limit` bytes are rejected before parsing.
pub async fn sanitize_json_body(
    State(limit): State<usize>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !is_json(req.headers()) {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();
    let bytes = read_body(body, limit).await?;

    let bytes = match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut value) if value.is_object() => {
            sanitize_value(&mut value);
            let rewritten = serde_json::to_vec(&value)
                .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;
            parts.headers.remove(header::CONTENT_LENGTH);
            Bytes::from(rewritten)
        }
        _ => bytes,
    };

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, AppError> {
    let collected = Limited::new(body, limit)
        .collect()
        .await
        .map_err(body_read_error)?;
    Ok(collected.to_bytes())
}

/// Only an exceeded limit is a 413; any other read failure is the client's bad body.
fn body_read_error(err: BoxError) -> AppError {
    if err.downcast_ref::<LengthLimitError>().is_some() {
        tracing::debug!("json body over the size limit");
        return AppError::PayloadTooLarge;
    }
    tracing::debug!(error = %err, "json body could not be read");
    AppError::BadRequest(format!("Failed to read request body: {err}"))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

pub fn sanitize_value(value: &mut Value) {
    let Value::Object(fields) = value else {
        return;
    };
    for field in fields.values_mut() {
        if let Value::String(s) = field {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                *field = Value::Null;
            } else if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn top_level_strings_are_trimmed() {
        let mut body = json!({
            "email": "  ops@acme.co ",
            "company_name": "Acme",
            "price": 12.5,
            "description": "   ",
            "nested": { "kept": "  as is  " }
        });
        sanitize_value(&mut body);

        assert_eq!(
            body,
            json!({
                "email": "ops@acme.co",
                "company_name": "Acme",
                "price": 12.5,
                "description": null,
                "nested": { "kept": "  as is  " }
            })
        );
    }

    #[test]
    fn non_objects_are_left_alone() {
        let mut body = json!(["  a  "]);
        sanitize_value(&mut body);
        assert_eq!(body, json!(["  a  "]));
    }

    #[tokio::test]
    async fn body_over_the_limit_is_payload_too_large() {
        let err = read_body(Body::from("x".repeat(64)), 16).await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge));
    }

    #[tokio::test]
    async fn body_within_the_limit_is_read() {
        let bytes = read_body(Body::from("{\"a\":1}"), 16).await.unwrap();
        assert_eq!(&bytes[..], b"{\"a\":1}");
    }

    #[test]
    fn broken_stream_is_a_bad_request() {
        let err = body_read_error(Box::new(std::io::Error::other("connection reset")));
        let AppError::BadRequest(message) = err else {
            panic!("expected bad request");
        };
        assert!(message.contains("connection reset"));
    }
}
