pub mod artifacts;
pub mod batch;
pub mod config;
pub mod sanitizer;

pub use artifacts::{ArtifactKind, ArtifactPair, ArtifactSet, RawArtifact, SanitizedArtifact};
pub use config::SanitizerConfig;
pub use sanitizer::{
    extract_artifact_pair, extract_single_block, sanitize_code, sanitize_response, sanitize_style, Sanitizer,
};
