//! Recruiting pipeline board over an applicant tracking system.
//!
//! [`pipeline`] holds the pure classification, reconciliation and filtering
//! rules; [`ats`] is the boundary with the remote store; [`board`] composes
//! both into a service with an HTTP surface.

pub mod ats;
pub mod board;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod telemetry;
