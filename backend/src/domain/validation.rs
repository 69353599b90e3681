//! Validation errors and helpers shared by store and review constructors.

use std::fmt;

use serde_json::json;

use super::Error;
use super::geo::GeoValidationError;
use super::slug::is_valid_slug;

/// Validation errors returned by store and review constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogueValidationError {
    EmptyField { field: &'static str },
    InvalidSlug { field: &'static str },
    UnsluggableName { field: &'static str },
    RatingOutOfRange { field: &'static str, rating: i64 },
    InvalidLimit { field: &'static str },
    Coordinates(GeoValidationError),
}

impl CatalogueValidationError {
    /// Name of the field that failed validation.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field }
            | Self::InvalidSlug { field }
            | Self::UnsluggableName { field }
            | Self::RatingOutOfRange { field, .. }
            | Self::InvalidLimit { field } => field,
            Self::Coordinates(error) => error.field(),
        }
    }
}

impl fmt::Display for CatalogueValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::InvalidSlug { field } => write!(
                f,
                "{field} must contain lowercase ASCII letters, digits, and hyphens"
            ),
            Self::UnsluggableName { field } => {
                write!(f, "{field} must contain at least one letter or digit")
            }
            Self::RatingOutOfRange { field, rating } => {
                write!(f, "{field} must be between 1 and 5 (got {rating})")
            }
            Self::InvalidLimit { field } => write!(f, "{field} must be greater than zero"),
            Self::Coordinates(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for CatalogueValidationError {}

impl From<GeoValidationError> for CatalogueValidationError {
    fn from(value: GeoValidationError) -> Self {
        Self::Coordinates(value)
    }
}

impl From<CatalogueValidationError> for Error {
    fn from(value: CatalogueValidationError) -> Self {
        let details = match &value {
            CatalogueValidationError::Coordinates(GeoValidationError::InvalidCoordinate {
                field,
                value,
            }) => json!({ "field": field, "code": "invalid_coordinate", "value": value }),
            CatalogueValidationError::RatingOutOfRange { field, rating } => {
                json!({ "field": field, "code": "rating_out_of_range", "value": rating })
            }
            other => json!({ "field": other.field() }),
        };
        Error::invalid_request(value.to_string()).with_details(details)
    }
}

/// Trim `value` and reject it when nothing remains.
pub(crate) fn trimmed_non_empty(
    value: &str,
    field: &'static str,
) -> Result<String, CatalogueValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogueValidationError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional text field, mapping blank input to `None`.
pub(crate) fn trimmed_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

pub(crate) fn validate_slug(
    value: String,
    field: &'static str,
) -> Result<String, CatalogueValidationError> {
    if !is_valid_slug(&value) {
        return Err(CatalogueValidationError::InvalidSlug { field });
    }
    Ok(value)
}

/// Trim every tag, drop blanks and repeated tags, keeping first-seen order.
pub(crate) fn normalise_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalised: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() || normalised.iter().any(|seen| seen == trimmed) {
            continue;
        }
        normalised.push(trimmed.to_owned());
    }
    normalised
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn trims_and_rejects_blank() {
        assert_eq!(trimmed_non_empty("  Cafe ", "name"), Ok("Cafe".to_owned()));
        assert_eq!(
            trimmed_non_empty("   ", "name"),
            Err(CatalogueValidationError::EmptyField { field: "name" })
        );
    }

    #[rstest]
    fn optional_blank_becomes_none() {
        assert_eq!(trimmed_optional(Some("  ".to_owned())), None);
        assert_eq!(trimmed_optional(Some(" hi ".to_owned())), Some("hi".to_owned()));
    }

    #[rstest]
    fn tags_are_trimmed_and_deduplicated() {
        let tags = vec![
            " Wifi ".to_owned(),
            String::new(),
            "Vegan".to_owned(),
            "Wifi".to_owned(),
        ];
        assert_eq!(normalise_tags(tags), ["Wifi", "Vegan"]);
    }

    #[rstest]
    fn converts_to_invalid_request_with_field_details() {
        let error: Error = CatalogueValidationError::EmptyField { field: "name" }.into();
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details().and_then(|d| d.get("field")),
            Some(&json!("name"))
        );
    }

    #[rstest]
    fn coordinate_errors_report_the_axis() {
        let geo = GeoValidationError::InvalidCoordinate {
            field: "lat",
            value: 91.0,
        };
        let error: Error = CatalogueValidationError::from(geo).into();
        let details = error.details().expect("details");
        assert_eq!(details["field"], json!("lat"));
        assert_eq!(details["code"], json!("invalid_coordinate"));
    }
}
