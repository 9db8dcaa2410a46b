pub mod api;
mod client;
mod error;
mod helpers;
mod remote;

pub use api::{
    DemoResponse, DemoStep, HealthResponse, NextSequenceResponse, ReleaseRequest,
    ReleaseResponse, ResetResponse, StepOutcome,
};
pub use client::HttpGateway;
pub use error::{FailureKind, GatewayError, Operation};
pub use helpers::{require_identifier, require_path_segment};
pub use remote::SequenceApi;
