//! Filter, sort and paging options for store queries
//!
//! A filter is a slice of [`FilterCondition`]s joined with AND. An empty
//! slice matches every document.
//!
//! ```rust
//! use users_service::store::{FilterCondition, FindOptions, OrderDirection};
//!
//! let filter = vec![FilterCondition::contains_ignore_case("name", "ali")];
//! let options = FindOptions::default()
//!     .sort_by("email", OrderDirection::Descending)
//!     .skip(6)
//!     .limit(6);
//! assert_eq!(filter.len(), 1);
//! assert_eq!(options.skip, 6);
//! ```

use chrono::DateTime;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

use super::Document;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Field is a string containing the value, ignoring case.
    /// The value is matched literally, never as a pattern.
    ContainsIgnoreCase,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContainsIgnoreCase => write!(f, "icontains"),
        }
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: Value,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Case-insensitive literal substring filter
    pub fn contains_ignore_case(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(
            field,
            FilterOperator::ContainsIgnoreCase,
            Value::String(needle.into()),
        )
    }
}

/// Options applied to a find call after filtering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Single-key sort; `None` keeps the store's natural order
    pub sort: Option<(String, OrderDirection)>,
    /// Number of matching documents to skip
    pub skip: u64,
    /// Maximum number of documents to return; `None` is unbounded
    pub limit: Option<u64>,
}

impl FindOptions {
    /// Sort by one field
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.sort = Some((field.into(), direction));
        self
    }

    /// Skip the first `skip` matches
    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Return at most `limit` matches
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A filter prepared for evaluation against in-process documents
#[derive(Debug)]
pub struct DocumentMatcher {
    predicates: Vec<(String, Regex)>,
}

impl DocumentMatcher {
    /// Compile every condition once
    pub fn new(conditions: &[FilterCondition]) -> Result<Self, String> {
        let mut predicates = Vec::with_capacity(conditions.len());
        for condition in conditions {
            let needle = match condition.operator {
                FilterOperator::ContainsIgnoreCase => condition.value.as_str(),
            };
            let needle = needle.ok_or_else(|| {
                format!(
                    "{} filter on '{}' needs a string value",
                    condition.operator, condition.field
                )
            })?;
            let regex = RegexBuilder::new(&regex::escape(needle))
                .case_insensitive(true)
                .build()
                .map_err(|e| e.to_string())?;
            predicates.push((condition.field.clone(), regex));
        }
        Ok(Self { predicates })
    }

    /// Whether the document satisfies every condition
    pub fn matches(&self, document: &Document) -> bool {
        self.predicates
            .iter()
            .all(|(field, regex)| match document.get(field) {
                Some(Value::String(s)) => regex.is_match(s),
                _ => false,
            })
    }
}

/// Order two documents on one field
///
/// Missing and null values sort first, then booleans, numbers and strings.
/// Two RFC 3339 strings compare as instants. Other JSON types compare equal
/// to each other.
pub fn compare_documents(
    a: &Document,
    b: &Document,
    field: &str,
    direction: OrderDirection,
) -> Ordering {
    let ordering = compare_values(a.get(field), b.get(field));
    match direction {
        OrderDirection::Ascending => ordering,
        OrderDirection::Descending => ordering.reverse(),
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => compare_strings(x, y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

// Fractional seconds vary in width, so bytewise order is not time order
fn compare_strings(x: &str, y: &str) -> Ordering {
    match (
        DateTime::parse_from_rfc3339(x),
        DateTime::parse_from_rfc3339(y),
    ) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => x.cmp(y),
    }
}
