//! Query parameters for the filtered user listing
//!
//! Raw query-string values are turned into a store filter, an optional
//! single-key sort and skip/limit paging. Malformed paging values never fail
//! the request; they fall back to the defaults.
//!
//! ```rust
//! use users_service::users::UserQueryParams;
//!
//! let query = UserQueryParams {
//!     page: Some("2".into()),
//!     limit: Some("3".into()),
//!     ..Default::default()
//! }
//! .build();
//!
//! assert_eq!(query.skip, 3);
//! assert_eq!(query.page_size, 3);
//! ```

use serde::Deserialize;

use crate::store::{FilterCondition, FindOptions, OrderDirection};

/// Page served when none (or garbage) is requested
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when none (or garbage) is requested
pub const DEFAULT_PAGE_SIZE: u64 = 6;

/// Raw query-string parameters of `/users/filter`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQueryParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Normalised query ready for the store
#[derive(Debug, Clone, PartialEq)]
pub struct UserQuery {
    /// Conjunctive filter; empty matches everything
    pub filter: Vec<FilterCondition>,
    /// Single-key sort, or natural order
    pub sort: Option<(String, OrderDirection)>,
    /// Documents skipped before the page starts
    pub skip: u64,
    /// Documents returned at most
    pub limit: u64,
    /// 1-indexed page
    pub page: u64,
    /// Same as `limit`
    pub page_size: u64,
}

impl UserQueryParams {
    /// Apply defaults and build the store query
    pub fn build(&self) -> UserQuery {
        let page = positive_or(self.page.as_deref(), DEFAULT_PAGE);
        let page_size = positive_or(self.limit.as_deref(), DEFAULT_PAGE_SIZE);

        let mut filter = Vec::new();
        if let Some(name) = non_empty(self.name.as_deref()) {
            filter.push(FilterCondition::contains_ignore_case("name", name));
        }
        if let Some(email) = non_empty(self.email.as_deref()) {
            filter.push(FilterCondition::contains_ignore_case("email", email));
        }

        let sort = non_empty(self.sort.as_deref()).map(|field| {
            // Only the exact lowercase "desc" flips the order
            let direction = if self.order.as_deref() == Some("desc") {
                OrderDirection::Descending
            } else {
                OrderDirection::Ascending
            };
            (field.to_string(), direction)
        });

        UserQuery {
            filter,
            sort,
            skip: (page - 1).saturating_mul(page_size),
            limit: page_size,
            page,
            page_size,
        }
    }
}

impl UserQuery {
    /// Store options for the page fetch
    pub fn find_options(&self) -> FindOptions {
        FindOptions {
            sort: self.sort.clone(),
            skip: self.skip,
            limit: Some(self.limit),
        }
    }

    /// Number of pages needed for `total` matching documents
    pub fn total_pages(&self, total: u64) -> u64 {
        total_pages(total, self.page_size)
    }
}

/// `ceil(total / page_size)`, zero when the page size is zero
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    match raw.map(str::parse::<u64>) {
        Some(Ok(n)) if n > 0 => n,
        _ => default,
    }
}
