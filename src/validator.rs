//! `ValidatedJson`: JSON body extraction followed by `validator` checks.
//! `ValidatedQuery`: query-string extraction with the same error shape.
//!
//! Every failure becomes a 400 carrying `{field, message}` details, with
//! field paths in the wire (camelCase, dotted) form.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};
use wayfare_core::{AppError, FieldError};

const DESERIALIZE_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";
const QUERY_DESERIALIZE_PREFIX: &str = "Failed to deserialize query string: ";

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn collect_details(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, &camel_case(field));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{path} is invalid"));
                    FieldError::new(path.clone(), message)
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_details(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details(&format!("{path}.{index}"), inner, out);
                }
            }
        }
    }
}

/// Flattens nested validation errors into field details, sorted by path.
pub fn validation_details(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut details = Vec::new();
    collect_details("", errors, &mut details);
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

fn backticked(text: &str) -> Option<&str> {
    text.split('`').nth(1)
}

/// Turns a serde failure such as ``vehicle.year: invalid type: string "x",
/// expected i32`` into a field-scoped detail where the field is known.
/// Accepts both JSON body and query string rejection texts.
fn rejection_detail(body_text: &str) -> Option<FieldError> {
    let message = body_text
        .strip_prefix(DESERIALIZE_PREFIX)
        .or_else(|| body_text.strip_prefix(QUERY_DESERIALIZE_PREFIX))?;
    let (path, reason) = match message.split_once(": ") {
        Some((path, reason)) if !path.contains(' ') => (path, reason),
        _ => ("", message),
    };

    if reason.starts_with("missing field") {
        let field = join_path(path, backticked(reason)?);
        return Some(FieldError::new(field.clone(), format!("{field} is required")));
    }
    if path.is_empty() {
        return None;
    }
    if reason.starts_with("unknown variant") {
        let value = backticked(reason).unwrap_or_default();
        return Some(FieldError::new(
            path,
            format!("{path} has an unsupported value '{value}'"),
        ));
    }
    if reason.starts_with("invalid type") || reason.starts_with("invalid value") {
        return Some(FieldError::new(path, format!("{path} has an invalid type")));
    }
    Some(FieldError::new(path, format!("{path} is invalid")))
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow::anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    match rejection_detail(&rejection.body_text()) {
        Some(detail) => AppError::validation(vec![detail]),
        None => AppError::bad_request(anyhow::anyhow!("Invalid request body")),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::validation(validation_details(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Query-string extraction with failures rendered in the JSON error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| {
                let body_text = rejection.body_text();
                tracing::debug!(rejection = %body_text, "Query rejected");
                match rejection_detail(&body_text) {
                    Some(detail) => AppError::validation(vec![detail]),
                    None => AppError::bad_request(anyhow::anyhow!("Invalid query parameters")),
                }
            })?;

        Ok(ValidatedQuery(value))
    }
}
