mod poller;
mod task;

pub use poller::{PollCadence, Scheduler};
pub use task::ScheduledTask;
