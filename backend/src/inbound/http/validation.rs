//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path and query parameters arrive as raw strings so malformed values are
//! reported through the catalogue error envelope instead of Actix's plain
//! text extractor errors.

use pagination::{PageRequest, PaginationError};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{CatalogueValidationError, Error, GeoPoint};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidNumber,
    InvalidPage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidPage => "invalid_page",
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

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const PAGE: FieldName = FieldName::new("page");
pub(crate) const STORE_ID: FieldName = FieldName::new("id");
pub(crate) const LONGITUDE: FieldName = FieldName::new("lng");
pub(crate) const LATITUDE: FieldName = FieldName::new("lat");

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_number_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a number"))
        .with_value(ErrorCode::InvalidNumber, value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse a page number and pair it with the configured page size.
pub(crate) fn parse_page(value: &str, page_size: u64) -> Result<PageRequest, Error> {
    let page: u64 = value
        .trim()
        .parse()
        .map_err(|_| invalid_number_error(PAGE, value))?;
    PageRequest::new(page, page_size).map_err(|err| match err {
        PaginationError::InvalidPage { .. } | PaginationError::OffsetOverflow { .. } => {
            ValidationError::new(PAGE.as_str(), err.to_string())
                .with_value(ErrorCode::InvalidPage, value)
        }
        PaginationError::InvalidPageSize { .. } => {
            Error::internal(format!("configured page size is invalid: {err}"))
        }
    })
}

fn parse_coordinate(value: Option<&str>, field: FieldName) -> Result<f64, Error> {
    let raw = value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| missing_field_error(field))?;
    raw.parse::<f64>()
        .map_err(|_| invalid_number_error(field, raw))
}

/// Parse `lng`/`lat` query parameters into a validated point.
pub(crate) fn parse_point(lng: Option<&str>, lat: Option<&str>) -> Result<GeoPoint, Error> {
    let longitude = parse_coordinate(lng, LONGITUDE)?;
    let latitude = parse_coordinate(lat, LATITUDE)?;
    GeoPoint::new(longitude, latitude)
        .map_err(|err| Error::from(CatalogueValidationError::from(err)))
}
