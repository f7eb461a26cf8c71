//! Workflow entry points shared by the binary and integration tests.

pub mod orchestration;

pub use orchestration::{run_bump_workflow, run_with_vcs, BumpWorkflowArgs, WorkflowResult};
