//! Coverage recommendation engine for small and medium business insurance.
//!
//! The [`advisory`] module holds the questionnaire facts model, the pure
//! recommendation and pricing engine, and the session service that wires the
//! engine to storage and notification collaborators.

pub mod advisory;
pub mod config;
pub mod error;
pub mod telemetry;
