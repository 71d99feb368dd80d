// ============================================================================
// Actors Module
// ============================================================================
//
// Actor-based infrastructure for the periodic work of the service.
//
// - scheduler: JobScheduler, running the assign and move triggers
//
// Note: Domain logic goes through the application handlers, NOT actors.
//       Actors only decide when those handlers run.
//
// ============================================================================

mod scheduler;

pub use scheduler::{Job, JobScheduler, RunJob, Shutdown};
