//! Term deposit subscription scoring.
//!
//! The [`subscription`] module holds the inference pipeline: threshold resolution, feature
//! engineering, schema-aligned encoding, classifier adapters, recommendations, and input
//! validation. [`config`], [`error`], and [`telemetry`] carry the service plumbing shared with
//! the API binary.

pub mod config;
pub mod error;
pub mod subscription;
pub mod telemetry;
