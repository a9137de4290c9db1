#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Audit classification of a recycling session or one of its transactions.
///
/// `accepted` and `rejected` are terminal: once a session carries either,
/// no further admin-initiated transition exists. `flagged` marks a session
/// for human review and is the only state an override may start from.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in
/// SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    /// Counted toward the user's balance; no review pending.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "accepted"))]
    Accepted,
    /// Held for manual review by an admin.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "flagged"))]
    Flagged,
    /// Points withheld; the scan was judged illegitimate.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "rejected"))]
    Rejected,
}

/// Terminal decision an admin may apply to a flagged session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditDecision {
    Accepted,
    Rejected,
}

/// Error returned when an override is attempted from a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot override a session in status '{from}': only flagged sessions accept a manual decision")]
pub struct TransitionError {
    pub from: AuditStatus,
}

impl AuditStatus {
    /// Returns true if no admin-initiated transition exists from this state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Flagged)
    }

    /// Apply a manual admin override.
    ///
    /// Permitted only while `Flagged`, and one-shot: the result is always a
    /// terminal state, so a second override on the same session fails.
    pub fn apply_override(self, decision: AuditDecision) -> Result<AuditStatus, TransitionError> {
        match self {
            Self::Flagged => Ok(decision.into()),
            from => Err(TransitionError { from }),
        }
    }

    /// All possible status values.
    pub const ALL: &'static [AuditStatus] = &[Self::Accepted, Self::Flagged, Self::Rejected];

    /// Returns the string representation (lowercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Flagged => "flagged",
            Self::Rejected => "rejected",
        }
    }
}

impl From<AuditDecision> for AuditStatus {
    fn from(decision: AuditDecision) -> Self {
        match decision {
            AuditDecision::Accepted => Self::Accepted,
            AuditDecision::Rejected => Self::Rejected,
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid audit status '{}'. Valid values: {}",
            self.invalid,
            AuditStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for AuditStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Self::Accepted),
            "flagged" => Ok(Self::Flagged),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}

/// Whether a session is still accepting transactions.
///
/// Never stored: derived from `ended_at` and `expires_at` against a supplied
/// clock instant, so a natural expiry needs no background job to flip a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Active,
    Closed,
}

impl LifecycleStatus {
    /// Derive the lifecycle state at instant `now`.
    ///
    /// A session is active iff it has not been explicitly ended and its
    /// expiry is still in the future.
    pub fn at(ended_at: Option<DateTime<Utc>>, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if ended_at.is_none() && now < expires_at {
            Self::Active
        } else {
            Self::Closed
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Closed => "closed",
        })
    }
}
