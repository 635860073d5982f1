//! The extraction pipeline: prompt → completion → interpret → normalize →
//! project. Stages are pure functions where possible; the processor wires
//! them to the collaborators and keeps the batch strictly sequential.

pub mod interpret;
pub mod mapper;
pub mod normalize;
pub mod prompt;
pub mod processor;
pub mod types;

pub use interpret::interpret;
pub use mapper::project_row;
pub use normalize::normalize;
pub use processor::RosterPipeline;
pub use prompt::build_prompt;
pub use types::{BatchSummary, CandidateRecord, NormalizedRecord, OutputRow};
