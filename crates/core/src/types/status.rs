//! Fetch lifecycle status for cached catalog entries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a cached catalog entry.
///
/// Transitions are `NotFetched -> Fetching -> {Complete | NotFetched}`. A failed
/// fetch falls back to `NotFetched` so a later refresh can try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    NotFetched,
    Fetching,
    Complete,
}

impl FetchStatus {
    /// Stable lowercase name, used in logs and health responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFetched => "not_fetched",
            Self::Fetching => "fetching",
            Self::Complete => "complete",
        }
    }

    /// Whether moving from `self` to `next` is a legal lifecycle transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::NotFetched, Self::Fetching)
                | (Self::Fetching, Self::Complete | Self::NotFetched)
                | (Self::Complete, Self::NotFetched)
        )
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
