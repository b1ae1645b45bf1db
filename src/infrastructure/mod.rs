pub mod artifacts;
pub mod dataset;
pub mod observability;
pub mod persistence;

pub use artifacts::ArtifactPaths;
