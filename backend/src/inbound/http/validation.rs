//! Request shape validation shared by the objective handlers.
//!
//! Every failure is a `400` whose `details` carry the offending `field` in
//! its camelCase wire name and a stable `code`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use pagination::{PageRequest, PageRequestError};
use serde_json::json;

use crate::domain::{Error, ObjectiveValidationError, Progress, Weight};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidDate,
    InvalidEnum,
    OutOfRange,
    EmptyValue,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidDate => "invalid_date",
            Self::InvalidEnum => "invalid_enum",
            Self::OutOfRange => "out_of_range",
            Self::EmptyValue => "empty_value",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ValidationCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn value_error(field: FieldName, code: ValidationCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Reject blank strings before they reach the domain.
pub(crate) fn non_blank(value: String, field: FieldName) -> Result<String, Error> {
    if value.trim().is_empty() {
        return Err(field_error(
            field,
            ValidationCode::EmptyValue,
            format!("{} must not be empty", field.as_str()),
        ));
    }
    Ok(value)
}

/// Parse an ISO-8601 calendar date; full RFC 3339 timestamps are accepted
/// and truncated to their date.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|stamp| stamp.date_naive()))
        .map_err(|_| {
            value_error(
                field,
                ValidationCode::InvalidDate,
                format!("{} must be an ISO-8601 date", field.as_str()),
                value,
            )
        })
}

pub(crate) fn parse_optional_date(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value.map(|raw| parse_date(&raw, field)).transpose()
}

/// Parse one of the closed SCREAMING_SNAKE_CASE enumerations.
pub(crate) fn parse_enum<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = ObjectiveValidationError>,
{
    value.parse().map_err(|err: ObjectiveValidationError| {
        value_error(
            field,
            ValidationCode::InvalidEnum,
            format!("{}: {err}", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_optional_enum<T>(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<T>, Error>
where
    T: FromStr<Err = ObjectiveValidationError>,
{
    value.map(|raw| parse_enum(&raw, field)).transpose()
}

fn range_error(field: FieldName, err: &ObjectiveValidationError) -> Error {
    field_error(
        field,
        ValidationCode::OutOfRange,
        format!("{}: {err}", field.as_str()),
    )
}

pub(crate) fn parse_weight(value: Option<i64>) -> Result<Option<Weight>, Error> {
    const FIELD: FieldName = FieldName::new("weight");
    value
        .map(|raw| Weight::new(raw).map_err(|err| range_error(FIELD, &err)))
        .transpose()
}

pub(crate) fn parse_progress(value: Option<i64>) -> Result<Progress, Error> {
    const FIELD: FieldName = FieldName::new("progress");
    Progress::new(require(value, FIELD)?).map_err(|err| range_error(FIELD, &err))
}

/// Validate `page`/`limit` query parameters.
pub(crate) fn parse_page(page: Option<i64>, limit: Option<i64>) -> Result<PageRequest, Error> {
    PageRequest::new(page, limit).map_err(|err| {
        let field = match err {
            PageRequestError::PageOutOfRange { .. } => FieldName::new("page"),
            PageRequestError::LimitOutOfRange { .. } => FieldName::new("limit"),
        };
        field_error(field, ValidationCode::OutOfRange, err.to_string())
    })
}
