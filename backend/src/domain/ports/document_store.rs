//! Driven port for the document database holding stores and reviews.
//!
//! The catalogue never talks to a database driver directly. Services build
//! queries from the small vocabulary in this module ([`Filter`],
//! [`FindQuery`], [`PipelineStage`]) and hand them to a [`DocumentStore`]
//! adapter. Adapters must provide:
//!
//! - a text index over `name` and `description` for [`Filter::Text`];
//! - a geospatial index over `location` for [`Filter::Near`];
//! - unique indexes on `id` and, for stores, `slug`, reported as
//!   [`DocumentStoreError::DuplicateKey`] on violation.

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::GeoPoint;

use super::define_port_error;

/// A stored JSON object.
pub type Document = Map<String, Value>;

/// Field name under which text-search relevance is attached.
pub const SCORE_FIELD: &str = "score";

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached.
        Connection { message: String } =>
            "document store connection failed: {message}",
        /// The store did not answer within the configured deadline.
        Timeout { operation: String } =>
            "document store {operation} timed out",
        /// The query was rejected or failed during execution.
        Query { message: String } =>
            "document store query failed: {message}",
        /// A unique index rejected the write.
        DuplicateKey { field: String, value: String } =>
            "duplicate {field}: {value}",
        /// A document could not be encoded or decoded.
        Serialization { message: String } =>
            "document serialisation failed: {message}",
    }
}

impl DocumentStoreError {
    /// Whether retrying the same call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}

/// The two collections the catalogue reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Stores,
    Reviews,
}

impl Collection {
    /// Collection name as used in documents and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stores => "stores",
            Self::Reviews => "reviews",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort direction for field sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One sort criterion. Earlier keys take precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// Order by a (possibly dotted) field.
    Field {
        field: String,
        direction: SortDirection,
    },
    /// Order by text relevance, most relevant first.
    TextScore,
}

impl SortKey {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Document predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Field equals value.
    Eq { field: String, value: Value },
    /// Field is absent or differs from value.
    Ne { field: String, value: Value },
    /// Array field holds value.
    Contains { field: String, value: Value },
    /// Field is present, whatever its value (empty arrays included).
    Exists { field: String },
    /// String field matches a regular expression.
    Pattern {
        field: String,
        pattern: String,
        case_insensitive: bool,
    },
    /// Text-index match on any of the query's words.
    Text { query: String },
    /// Point field within `max_distance_metres` of `origin`; results come
    /// back nearest first unless another sort is given.
    Near {
        field: String,
        origin: GeoPoint,
        max_distance_metres: f64,
    },
    /// Every inner filter matches.
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Self::Exists {
            field: field.into(),
        }
    }

    /// Case-insensitive regular expression match.
    pub fn pattern(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Pattern {
            field: field.into(),
            pattern: pattern.into(),
            case_insensitive: true,
        }
    }

    pub fn text(query: impl Into<String>) -> Self {
        Self::Text {
            query: query.into(),
        }
    }

    pub fn near(field: impl Into<String>, origin: GeoPoint, max_distance_metres: f64) -> Self {
        Self::Near {
            field: field.into(),
            origin,
            max_distance_metres,
        }
    }

    /// Combine filters, dropping redundant [`Filter::All`] entries.
    #[must_use]
    pub fn and(filters: Vec<Filter>) -> Self {
        let mut filters: Vec<Filter> = filters
            .into_iter()
            .filter(|filter| !matches!(filter, Filter::All))
            .collect();
        match filters.len() {
            0 => Filter::All,
            1 => filters.pop().unwrap_or(Filter::All),
            _ => Filter::And(filters),
        }
    }
}

/// A `find` request.
///
/// # Examples
/// ```
/// use catalogue::domain::ports::{Filter, FindQuery, SortKey};
///
/// let query = FindQuery::new(Filter::All)
///     .sort(vec![SortKey::descending("created")])
///     .skip(4)
///     .limit(4);
/// assert_eq!(query.limit_value(), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    filter: Filter,
    projection: Option<Vec<String>>,
    sort: Vec<SortKey>,
    limit: Option<u64>,
    skip: u64,
    with_text_score: bool,
}

impl FindQuery {
    #[must_use]
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            projection: None,
            sort: Vec::new(),
            limit: None,
            skip: 0,
            with_text_score: false,
        }
    }

    /// Return only the listed fields.
    #[must_use]
    pub fn projection<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.projection = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn sort(mut self, keys: Vec<SortKey>) -> Self {
        self.sort = keys;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Attach the text relevance under [`SCORE_FIELD`].
    #[must_use]
    pub fn with_text_score(mut self) -> Self {
        self.with_text_score = true;
        self
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }
    pub fn projection_fields(&self) -> Option<&[String]> {
        self.projection.as_deref()
    }
    pub fn sort_keys(&self) -> &[SortKey] {
        self.sort.as_slice()
    }
    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }
    pub fn skip_value(&self) -> u64 {
        self.skip
    }
    pub fn wants_text_score(&self) -> bool {
        self.with_text_score
    }
}

/// Field under which [`PipelineStage::GroupCount`] emits the group key.
pub const GROUP_KEY_FIELD: &str = "key";
/// Field under which [`PipelineStage::GroupCount`] emits the group size.
pub const GROUP_COUNT_FIELD: &str = "count";

/// One step of an aggregation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStage {
    /// Keep documents matching the filter.
    Match(Filter),
    /// Emit one document per element of an array field, with the field
    /// replaced by the element. Empty or missing arrays emit nothing.
    Unwind { field: String },
    /// Group by a field and emit `{ "key": value, "count": n }` per group.
    GroupCount { field: String },
    /// Left join: attach every document of `from` whose `foreign_field`
    /// equals this document's `local_field`, as an array under `as_field`.
    Lookup {
        from: Collection,
        local_field: String,
        foreign_field: String,
        as_field: String,
    },
    /// Stable sort by the given keys.
    Sort(Vec<SortKey>),
    /// Keep at most this many documents.
    Limit(u64),
}

/// Port for reading and writing catalogue documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return documents matching the query.
    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Document>, DocumentStoreError>;

    /// Run an aggregation pipeline over a collection.
    async fn aggregate(
        &self,
        collection: Collection,
        pipeline: &[PipelineStage],
    ) -> Result<Vec<Document>, DocumentStoreError>;

    /// Count documents matching the filter.
    async fn count(&self, collection: Collection, filter: &Filter)
    -> Result<u64, DocumentStoreError>;

    /// Insert a new document, enforcing unique indexes.
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<(), DocumentStoreError>;

    /// Replace the document whose `id` equals `id`.
    ///
    /// Returns `false` when no such document exists.
    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        document: Document,
    ) -> Result<bool, DocumentStoreError>;
}

/// Fixture implementation holding no documents and discarding writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentStore;

#[async_trait]
impl DocumentStore for FixtureDocumentStore {
    async fn find(
        &self,
        _collection: Collection,
        _query: &FindQuery,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        Ok(Vec::new())
    }

    async fn aggregate(
        &self,
        _collection: Collection,
        _pipeline: &[PipelineStage],
    ) -> Result<Vec<Document>, DocumentStoreError> {
        Ok(Vec::new())
    }

    async fn count(
        &self,
        _collection: Collection,
        _filter: &Filter,
    ) -> Result<u64, DocumentStoreError> {
        Ok(0)
    }

    async fn insert(
        &self,
        _collection: Collection,
        _document: Document,
    ) -> Result<(), DocumentStoreError> {
        Ok(())
    }

    async fn replace(
        &self,
        _collection: Collection,
        _id: Uuid,
        _document: Document,
    ) -> Result<bool, DocumentStoreError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn and_collapses_trivial_filters() {
        assert_eq!(Filter::and(vec![]), Filter::All);
        assert_eq!(Filter::and(vec![Filter::All, Filter::All]), Filter::All);
        assert_eq!(
            Filter::and(vec![Filter::All, Filter::exists("tags")]),
            Filter::exists("tags")
        );
        assert!(matches!(
            Filter::and(vec![Filter::exists("a"), Filter::exists("b")]),
            Filter::And(inner) if inner.len() == 2
        ));
    }

    #[rstest]
    #[case(DocumentStoreError::connection("refused"), true)]
    #[case(DocumentStoreError::timeout("find"), true)]
    #[case(DocumentStoreError::query("bad regex"), false)]
    #[case(DocumentStoreError::duplicate_key("slug", "cafe"), false)]
    #[case(DocumentStoreError::serialization("eof"), false)]
    fn classifies_retryable_errors(#[case] error: DocumentStoreError, #[case] expected: bool) {
        assert_eq!(error.is_retryable(), expected);
    }

    #[rstest]
    fn pattern_filters_default_to_case_insensitive() {
        assert!(matches!(
            Filter::pattern("slug", "^cafe$"),
            Filter::Pattern { case_insensitive: true, .. }
        ));
    }

    #[tokio::test]
    async fn fixture_store_is_empty() {
        let store = FixtureDocumentStore;
        let found = store
            .find(Collection::Stores, &FindQuery::new(Filter::All))
            .await
            .expect("fixture find");
        assert!(found.is_empty());
        let replaced = store
            .replace(Collection::Stores, Uuid::nil(), Document::new())
            .await
            .expect("fixture replace");
        assert!(!replaced);
    }
}
