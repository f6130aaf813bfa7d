//! Filter parameter types for list endpoints.
//!
//! Text filters are substring, case-insensitive; enum filters are exact
//! match. The composite `configuration` filter is parsed here so the
//! query layer only ever sees the structured form.

use serde::Deserialize;
use utoipa::ToSchema;

/// Filters accepted by the test plan list endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PlanFilter {
    /// Substring match on title, case-insensitive.
    pub title: Option<String>,
    /// Exact status match.
    pub status: Option<String>,
}

/// Filters accepted by the test case list endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CaseFilter {
    /// Substring match on title, case-insensitive.
    pub title: Option<String>,
    /// Exact status match.
    pub status: Option<String>,
    /// Exact match against the case's derived latest result.
    pub latest_result: Option<String>,
}

/// Filters accepted by the test result list endpoints.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ResultFilter {
    /// Substring match on the owning case's title, case-insensitive.
    pub case: Option<String>,
    /// Exact result match.
    pub result: Option<String>,
    /// Substring match on the tester's username, case-insensitive.
    pub tester: Option<String>,
    /// Composite `"{browser} on {os}"` filter, see [`ConfigurationFilter`].
    pub configuration: Option<String>,
}

/// Parsed form of the composite `configuration` filter.
///
/// The input is split on the literal `" on "` separator with surrounding
/// whitespace trimmed from each side. A missing separator, or more than
/// one occurrence of it, is not an error: it simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationFilter {
    /// No filter value supplied; all rows pass.
    Unset,
    /// Well-formed value; match browser and os case-insensitively.
    Exact { browser: String, os: String },
    /// Malformed value; matches zero rows.
    Invalid,
}

impl ConfigurationFilter {
    pub fn parse(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return Self::Unset;
        };
        if raw.trim().is_empty() {
            return Self::Unset;
        }

        let parts: Vec<&str> = raw.split(" on ").map(str::trim).collect();
        match parts.as_slice() {
            [browser, os] if !browser.is_empty() && !os.is_empty() => Self::Exact {
                browser: browser.to_lowercase(),
                os: os.to_lowercase(),
            },
            _ => Self::Invalid,
        }
    }
}
