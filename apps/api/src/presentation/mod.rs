//! Presentation Layer: pure functions that turn stored records into view payloads.
//! Nothing here touches the store or the oracles; `handlers` loads the records.

pub mod bands;
pub mod candidates;
pub mod dashboard;
pub mod details;
pub mod handlers;
pub mod highlight;

pub use candidates::{filter_and_sort, CandidateList, CandidateQuery};
pub use dashboard::{dashboard_summary, DashboardSummary};
pub use details::{analysis_details, AnalysisDetails};
