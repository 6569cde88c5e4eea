//! Railenv preview environment orchestrator.
//!
//! Clones a Railway environment per branch, points its deployments at that
//! branch, waits for the first deployment and publishes the primary
//! service's domain for the CI job.

pub use railenv_api as api;
pub use railenv_cli as cli;
pub use railenv_core as core;
pub use railenv_orchestrator as orchestrator;
