//! Query service: paged, filtered reads and single-record writes over the
//! record store.

pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod seed;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};
use crate::ids::IdGenerator;
use crate::store::{PageWindow, RecordStore};

/// A validated page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> ServiceResult<Self> {
        if page == 0 {
            return Err(ServiceError::Validation("page must be at least 1".into()));
        }
        if limit == 0 {
            return Err(ServiceError::Validation("limit must be greater than 0".into()));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            offset: (self.page - 1).saturating_mul(self.limit),
            limit: self.limit,
        }
    }
}

/// One page of a filtered listing. `total_count` counts every match, not just
/// the ones in `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total_count: 0,
        }
    }
}

#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn RecordStore>,
    ids: IdGenerator,
}

impl QueryService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let ids = IdGenerator::new(store.clone());
        Self { store, ids }
    }
}

/// Blank filter text means "no filter".
fn normalize_filter(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_offsets() {
        let first = PageRequest::new(1, 10).unwrap().window();
        assert_eq!(first, PageWindow { offset: 0, limit: 10 });

        let third = PageRequest::new(3, 25).unwrap().window();
        assert_eq!(third, PageWindow { offset: 50, limit: 25 });
    }

    #[test]
    fn zero_page_or_limit_is_rejected() {
        assert!(matches!(
            PageRequest::new(0, 10),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            PageRequest::new(1, 0),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn blank_filters_are_dropped() {
        assert_eq!(normalize_filter(None), None);
        assert_eq!(normalize_filter(Some("   ")), None);
        assert_eq!(normalize_filter(Some(" ali ")), Some("ali".to_string()));
    }
}
