//! Operator dashboard for a distributed invoice sequence service.
//!
//! A [`session::DashboardSession`] owns the shared state; the [`scheduler::Scheduler`]
//! polls stats and health on independent timers, the [`orchestrator::ActionOrchestrator`]
//! runs operator actions, and presentation subscribes to [`events::DashboardEvent`]s.

pub mod chart;
pub mod config;
pub mod console;
pub mod events;
pub mod gateway;
pub mod notifications;
pub mod orchestrator;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use session::DashboardSession;
pub use types::DashboardError;
