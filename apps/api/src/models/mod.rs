pub mod analysis;
pub mod job;
pub mod resume;

pub use analysis::{Analysis, AnalysisReport, HeatmapEntry, NewAnalysis};
pub use job::{JobDescription, NewJobDescription};
pub use resume::{ExtractedResume, NewResume, Resume};
