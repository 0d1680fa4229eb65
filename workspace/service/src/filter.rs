use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::ServiceError;

/// Active-flag filter shared by farmer and product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn matches(&self, is_active: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => is_active,
            StatusFilter::Inactive => !is_active,
        }
    }

    pub fn active_only(&self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(true),
            StatusFilter::Inactive => Some(false),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ServiceError;

    /// Blank means no filter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            other => Err(ServiceError::Validation(format!(
                "Unknown status filter: {}",
                other
            ))),
        }
    }
}

/// Case-insensitive substring match; `needle` must already be lowercase.
pub(crate) fn contains_lower(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Normalizes a free-text search term: trimmed, lowercase, blank means none.
pub(crate) fn search_term(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Inclusive date range check; either bound may be open.
pub(crate) fn within(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
}
