//! The dues aggregator and its endpoints.

mod breakdown_endpoint;
pub(crate) mod core;
mod dues_endpoint;
mod summary_endpoint;

pub use breakdown_endpoint::breakdown_endpoint;
pub use core::{
    DuesRow, MemberSummary, PendingBreakdown, PendingShare, all_member_dues, member_summary,
    pending_breakdown,
};
pub use dues_endpoint::dues_endpoint;
pub use summary_endpoint::summary_endpoint;
