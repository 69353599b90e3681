//! Review entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{CatalogueValidationError, trimmed_non_empty};

/// Lowest accepted star rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted star rating.
pub const RATING_MAX: u8 = 5;

/// A star rating between [`RATING_MIN`] and [`RATING_MAX`] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw rating.
    ///
    /// # Examples
    /// ```
    /// use catalogue::domain::Rating;
    ///
    /// assert_eq!(Rating::new(4).map(|r| r.value()), Ok(4));
    /// assert!(Rating::new(6).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, CatalogueValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|rating| (RATING_MIN..=RATING_MAX).contains(rating))
            .map(Self)
            .ok_or(CatalogueValidationError::RatingOutOfRange {
                field: "rating",
                rating: value,
            })
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = CatalogueValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Input payload for [`Review::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author_id: Uuid,
    #[serde(default)]
    pub rating: Option<Rating>,
    pub store_id: Uuid,
}

/// A review of one store.
///
/// ## Invariants
/// - `text` is trimmed and non-empty.
/// - `rating`, when present, lies in `1..=5`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    id: Uuid,
    text: String,
    created: DateTime<Utc>,
    author_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<Rating>,
    store_id: Uuid,
}

impl Review {
    /// Validate and construct a review.
    pub fn new(draft: ReviewDraft) -> Result<Self, CatalogueValidationError> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn text(&self) -> &str {
        self.text.as_str()
    }
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
    pub fn author_id(&self) -> Uuid {
        self.author_id
    }
    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }
    pub fn store_id(&self) -> Uuid {
        self.store_id
    }
}

impl TryFrom<ReviewDraft> for Review {
    type Error = CatalogueValidationError;

    fn try_from(draft: ReviewDraft) -> Result<Self, Self::Error> {
        let text = trimmed_non_empty(&draft.text, "text")?;
        Ok(Self {
            id: draft.id,
            text,
            created: draft.created,
            author_id: draft.author_id,
            rating: draft.rating,
            store_id: draft.store_id,
        })
    }
}

impl<'de> Deserialize<'de> for Review {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        ReviewDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}
