pub mod boundary;
pub mod bump;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod files;
pub mod template;
pub mod ui;
pub mod vcs;

pub use bump::{BumpOrchestrator, BumpResult};
pub use domain::{Version, VersionPattern};
pub use error::{BumpvError, Result};
pub use files::{FileTarget, FileUpdater};
