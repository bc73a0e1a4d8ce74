//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{ClientToken, CommentId, Error, PostId, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const TITLE: FieldName = FieldName::new("title");
pub(crate) const CONTENT: FieldName = FieldName::new("content");
pub(crate) const TEMP_ID: FieldName = FieldName::new("temp_id");
pub(crate) const USER_ID: FieldName = FieldName::new("userId");

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// A required text field; absent and blank values are both missing.
pub(crate) fn required_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn required_token(value: Option<String>) -> Result<ClientToken, Error> {
    ClientToken::new(required_text(value, TEMP_ID)?)
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn post_id(raw: i64) -> Result<PostId, Error> {
    PostId::new(raw)
}

pub(crate) fn comment_id(raw: i64) -> Result<CommentId, Error> {
    CommentId::new(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    #[case(Some("   ".to_owned()))]
    fn blank_and_absent_text_is_missing(#[case] value: Option<String>) {
        let error = required_text(value, TITLE).expect_err("missing");
        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(error.message(), "title is required");
        assert_eq!(
            error.details().and_then(|d| d.get("code")).and_then(Value::as_str),
            Some("missing_field")
        );
    }

    #[rstest]
    fn malformed_user_id_names_the_field() {
        let error = parse_user_id("nope", USER_ID).expect_err("invalid");
        assert_eq!(error.message(), "userId must be a valid UUID");
        assert_eq!(
            error.details().and_then(|d| d.get("value")).and_then(Value::as_str),
            Some("nope")
        );
    }

    #[rstest]
    fn temp_id_is_required_for_tokens() {
        let error = required_token(None).expect_err("missing");
        assert_eq!(error.message(), "temp_id is required");
    }
}
