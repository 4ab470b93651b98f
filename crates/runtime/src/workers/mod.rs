//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the engine and runs the frame loop; clients
//! only ever reach it through commands.

mod simulation;

pub use simulation::{Command, SimulationWorker, WorkerSettings};
