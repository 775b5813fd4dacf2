//! Request body extractor accepting JSON or form-encoded bodies.
//!
//! Behaves like an express app with `json()` and `urlencoded()` mounted:
//! JSON bodies must be an object or array, form bodies become an object of
//! strings (repeated keys collect into an array), and a missing body or any
//! other content type yields `{}`. Bracketed form keys such as `a[b]` are
//! kept as literal keys, not expanded into nested objects. Size limits come from the router's
//! `DefaultBodyLimit`.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::Form;
use serde_json::{Map, Value};

use super::ApiError;

/// A decoded request body.
#[derive(Debug)]
pub struct Payload(pub Value);

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    fn of(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
            return BodyKind::Other;
        };
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json" || essence.ends_with("+json") {
            BodyKind::Json
        } else if essence == "application/x-www-form-urlencoded" {
            BodyKind::Form
        } else {
            BodyKind::Other
        }
    }
}

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match BodyKind::of(req.headers()) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::Body {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    })?;
                parse_json(&bytes).map(Payload)
            }
            BodyKind::Form => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::Body {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    })?;
                Ok(Payload(form_object(pairs)))
            }
            BodyKind::Other => Ok(Payload(Value::Object(Map::new()))),
        }
    }
}

fn parse_json(bytes: &[u8]) -> Result<Value, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        Ok(_) => Err(ApiError::Body {
            status: StatusCode::BAD_REQUEST,
            message: "JSON body must be an object or array".to_string(),
        }),
        Err(e) => Err(ApiError::Body {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid JSON body: {e}"),
        }),
    }
}

fn form_object(pairs: Vec<(String, String)>) -> Value {
    let mut object = Map::new();
    for (key, value) in pairs {
        match object.get_mut(&key) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                object.insert(key, Value::String(value));
            }
        }
    }
    Value::Object(object)
}
