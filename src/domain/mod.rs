//! Domain layer containing the engagement engine's business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors, state machine)
//! - `detection` - Per-message scam scoring and classification
//! - `intel` - Identifier extraction and capped merging
//! - `engagement` - Session aggregate, state machine, and conversation policy
//! - `responses` - Reply catalog and random selection
//! - `reporting` - Final report construction

pub mod detection;
pub mod engagement;
pub mod foundation;
pub mod intel;
pub mod reporting;
pub mod responses;
