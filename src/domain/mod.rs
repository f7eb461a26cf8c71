//! Domain logic - version parsing, bumping and serialization, independent of
//! files and git

pub mod part;
pub mod pattern;
pub mod version;

pub use part::PartSpec;
pub use pattern::{VersionPattern, DEFAULT_PARSE, DEFAULT_SERIALIZE};
pub use version::Version;
