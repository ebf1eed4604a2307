//! Page/limit handling shared by laundry search and order listing

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Normalised page request (page ≥ 1, limit ≥ 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Missing or non-positive values fall back to the defaults
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let clamp = |v: Option<i64>, default: u32| match v {
            Some(v) if v >= 1 => u32::try_from(v).unwrap_or(u32::MAX),
            _ => default,
        };
        Self {
            page: clamp(page, DEFAULT_PAGE),
            limit: clamp(limit, DEFAULT_LIMIT),
        }
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Offset as a SQL bind value; `None` when it cannot fit, which means
    /// the page lies past any stored row
    pub fn sql_offset(&self) -> Option<i64> {
        i64::try_from(self.offset()).ok()
    }

    /// Slice an already-ranked list; out-of-range pages are empty
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        items
            .into_iter()
            .skip(offset)
            .take(self.limit as usize)
            .collect()
    }

    pub fn pagination(&self, total: u64) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            total_pages: total.div_ceil(u64::from(self.limit)),
        }
    }
}

/// Pagination block attached to every paged response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub limit: u32,
    #[schema(example = 12)]
    pub total: u64,
    #[schema(example = 2)]
    pub total_pages: u64,
}
