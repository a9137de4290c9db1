use serde::{Deserialize, Serialize};

use crate::audit::{AuditDecision, AuditStatus};

/// Point value applied when an item has neither a manual override nor a
/// category.
pub const DEFAULT_ITEM_VALUE: i32 = 5;

/// Resolve the effective point value of a recyclable item.
///
/// Priority order, first match wins:
/// 1. the item's own manual value, when set — `Some(0)` is a real override,
///    presence decides, not the value itself;
/// 2. the value of the item's category, when the item has one;
/// 3. [`DEFAULT_ITEM_VALUE`].
pub fn effective_value(manual_value: Option<i32>, category_value: Option<i32>) -> i32 {
    match (manual_value, category_value) {
        (Some(manual), _) => manual,
        (None, Some(category)) => category,
        (None, None) => DEFAULT_ITEM_VALUE,
    }
}

/// Per-status point sums of a recycling session.
///
/// Invariant: each bucket equals the sum of `points_awarded` over the
/// session's transactions carrying that status, so `total()` always equals
/// the sum over all transactions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PointTotals {
    pub accepted: i32,
    pub flagged: i32,
    pub rejected: i32,
}

impl PointTotals {
    /// Account for one appended transaction: exactly one bucket grows by
    /// `points_awarded`, matching the transaction's status.
    pub fn record(&mut self, status: AuditStatus, points_awarded: i32) {
        match status {
            AuditStatus::Accepted => self.accepted += points_awarded,
            AuditStatus::Flagged => self.flagged += points_awarded,
            AuditStatus::Rejected => self.rejected += points_awarded,
        }
    }

    /// Aggregate a session's transactions from scratch.
    pub fn from_transactions<I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = (AuditStatus, i32)>,
    {
        let mut totals = Self::default();
        for (status, points) in transactions {
            totals.record(status, points);
        }
        totals
    }

    /// Sum of points across all statuses.
    pub fn total(&self) -> i32 {
        self.accepted + self.flagged + self.rejected
    }

    /// Move the flagged bucket into the bucket chosen by a manual override.
    ///
    /// Mirrors the reclassification of the session's flagged transactions,
    /// keeping the sum invariant intact: `total()` is unchanged.
    pub fn resolve_flagged(&mut self, decision: AuditDecision) {
        let flagged = std::mem::take(&mut self.flagged);
        match decision {
            AuditDecision::Accepted => self.accepted += flagged,
            AuditDecision::Rejected => self.rejected += flagged,
        }
    }
}
