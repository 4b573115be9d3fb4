//! Pagination windows and their construction rules.

use crate::error::{DomainError, DomainResult};

/// Limit used when the caller doesn't ask for one.
pub const DEFAULT_PAGINATION_LIMIT: usize = 10;

/// Largest limit a caller may ask for.
pub const MAX_PAGINATION_LIMIT: usize = 100;

/// Limits applied when building a [`Pagination`] from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGINATION_LIMIT,
            max_limit: MAX_PAGINATION_LIMIT,
        }
    }
}

impl PaginationConfig {
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }

    /// Builds a pagination window from raw caller input.
    ///
    /// A limit of zero or below falls back to the default; a limit above the
    /// maximum is clamped down to it. A limit below the default is kept as
    /// given. A negative offset is rejected.
    pub fn paginate(&self, limit: i64, offset: i64) -> DomainResult<Pagination> {
        if offset < 0 {
            return Err(DomainError::InvalidPagination { offset });
        }

        let limit = match usize::try_from(limit) {
            Ok(0) | Err(_) => self.default_limit,
            Ok(limit) => limit,
        };

        Ok(Pagination {
            limit: limit.min(self.max_limit),
            offset: offset as usize,
        })
    }
}

/// A limit/offset window applied by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: usize,
    offset: usize,
}

impl Pagination {
    /// Builds a window with the default [`PaginationConfig`].
    pub fn new(limit: i64, offset: i64) -> DomainResult<Self> {
        PaginationConfig::default().paginate(limit, offset)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGINATION_LIMIT,
            offset: 0,
        }
    }
}
