//! Blocking client for the hosted workflow service.
//!
//! Only the handful of endpoints the planner needs are covered: agents, tasks,
//! executions and file upload.
mod client;
pub mod task;
mod types;

pub use client::JulepClient;
pub use types::{Agent, Execution, ExecutionStatus, FileRecord, Task};
