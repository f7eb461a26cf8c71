//! Version control abstraction layer
//!
//! The bump workflow only needs a few operations from a VCS: a dirty check,
//! a tag lookup, staging, committing and tagging. They are expressed by the [Vcs] trait so
//! the workflow can run against a real repository or a recording mock.
//!
//! - [repository::Git2Vcs]: implementation on top of the `git2` crate
//! - [mock::MockVcs]: records calls for tests
//!
//! `dirty_files` and `tag_exists` are checked before any file is touched.
//!
//! ```rust
//! # use bumpv::vcs::Vcs;
//! # use std::path::Path;
//! # fn example<V: Vcs>(vcs: &V) -> bumpv::Result<()> {
//! if vcs.dirty_files()?.is_empty() {
//!     vcs.add_path(Path::new("VERSION"))?;
//!     vcs.commit("Bump version: 1.2.3 → 1.3.0")?;
//!     vcs.tag("v1.3.0")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockVcs;
pub use repository::Git2Vcs;

use std::path::Path;

use crate::error::Result;

/// Operations the bump workflow requests from version control
///
/// Implementations map their native errors into [crate::error::BumpvError].
pub trait Vcs {
    /// Tracked files with uncommitted changes
    ///
    /// Untracked and ignored files are not reported.
    fn dirty_files(&self) -> Result<Vec<String>>;

    /// Whether a tag called `name` already exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Stage a file for the next commit
    ///
    /// # Arguments
    /// * `path` - Absolute path, or path relative to the current directory
    fn add_path(&self, path: &Path) -> Result<()>;

    /// Commit everything staged with `message`
    fn commit(&self, message: &str) -> Result<()>;

    /// Create a tag called `name` on the current HEAD commit
    fn tag(&self, name: &str) -> Result<()>;
}
