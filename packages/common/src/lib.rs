pub mod audit;
pub mod points;

pub use audit::{AuditDecision, AuditStatus, LifecycleStatus, TransitionError};
pub use points::{DEFAULT_ITEM_VALUE, PointTotals, effective_value};
