mod queries;
mod responses;

pub(crate) use queries::SequenceQuery;
pub use queries::ReleaseRequest;
pub use responses::{
    DemoResponse, DemoStep, HealthResponse, NextSequenceResponse, ReleaseResponse,
    ResetResponse, StatsResponse, StepOutcome,
};

pub const NEXT_SEQUENCE_PATH: &str = "/api/v1/sequence/next";
pub const STATS_PATH: &str = "/api/v1/sequence/stats";
pub const HEALTH_PATH: &str = "/api/v1/sequence/health";
pub const RELEASE_PATH: &str = "/api/v1/sequence/release";
pub const RESET_PATH: &str = "/api/v1/sequence/reset";
pub const DEMO_PATH_PREFIX: &str = "/api/v1/demo";
