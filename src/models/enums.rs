//! Domain enumerations.
//!
//! Single source of truth for every enumerated field: the schema layer
//! builds its CHECK constraints from `ALL`, serde validates request
//! payloads against the same variants, and the filter layer parses
//! query values with `parse`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Test plan lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl PlanStatus {
    pub const ALL: [Self; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Default for PlanStatus {
    fn default() -> Self {
        // New plans start in the first lifecycle state.
        Self::NotStarted
    }
}

/// Test case authoring status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Design,
    Ready,
    Closed,
}

impl CaseStatus {
    pub const ALL: [Self; 3] = [Self::Design, Self::Ready, Self::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Design => "design",
            Self::Ready => "ready",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "design" => Some(Self::Design),
            "ready" => Some(Self::Ready),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl Default for CaseStatus {
    fn default() -> Self {
        Self::Design
    }
}

/// Verdict of a test execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
    InProgress,
}

impl Verdict {
    pub const ALL: [Self; 3] = [Self::Pass, Self::Fail, Self::InProgress];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::InProgress => "in_progress",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pass" => Some(Self::Pass),
            "fail" => Some(Self::Fail),
            "in_progress" => Some(Self::InProgress),
            _ => None,
        }
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Browser the result was executed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
}

impl Browser {
    pub const ALL: [Self; 5] = [
        Self::Chrome,
        Self::Firefox,
        Self::Safari,
        Self::Edge,
        Self::Opera,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Safari => "safari",
            Self::Edge => "edge",
            Self::Opera => "opera",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "chrome" => Some(Self::Chrome),
            "firefox" => Some(Self::Firefox),
            "safari" => Some(Self::Safari),
            "edge" => Some(Self::Edge),
            "opera" => Some(Self::Opera),
            _ => None,
        }
    }
}

impl Default for Browser {
    fn default() -> Self {
        Self::Chrome
    }
}

/// Operating system the result was executed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Os {
    #[serde(rename = "windows10")]
    Windows10,
    #[serde(rename = "windows11")]
    Windows11,
    #[serde(rename = "macos")]
    MacOs,
    #[serde(rename = "linux")]
    Linux,
    #[serde(rename = "android")]
    Android,
    #[serde(rename = "ios")]
    Ios,
}

impl Os {
    pub const ALL: [Self; 6] = [
        Self::Windows10,
        Self::Windows11,
        Self::MacOs,
        Self::Linux,
        Self::Android,
        Self::Ios,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows10 => "windows10",
            Self::Windows11 => "windows11",
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "windows10" => Some(Self::Windows10),
            "windows11" => Some(Self::Windows11),
            "macos" => Some(Self::MacOs),
            "linux" => Some(Self::Linux),
            "android" => Some(Self::Android),
            "ios" => Some(Self::Ios),
            _ => None,
        }
    }
}

impl Default for Os {
    fn default() -> Self {
        Self::Windows11
    }
}

/// Outcome of a single executed step within a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Pass,
    Fail,
    Skip,
}

impl StepOutcome {
    pub const ALL: [Self; 3] = [Self::Pass, Self::Fail, Self::Skip];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pass" => Some(Self::Pass),
            "fail" => Some(Self::Fail),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

impl Default for StepOutcome {
    fn default() -> Self {
        // Steps not marked by the tester count as skipped.
        Self::Skip
    }
}

/// Build the quoted value list for a SQL CHECK constraint, e.g.
/// `'pass', 'fail', 'skip'`.
pub fn sql_value_list<T: Copy>(values: &[T], as_str: fn(&T) -> &'static str) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", as_str(v)))
        .collect::<Vec<_>>()
        .join(", ")
}
