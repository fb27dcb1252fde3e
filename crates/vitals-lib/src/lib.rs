//! Core library for the vitals service
//!
//! This crate provides:
//! - Point-in-time host health reporting with threshold statuses
//! - An in-memory user registry with CRUD operations
//! - Prometheus metrics

pub mod health;
pub mod models;
pub mod observability;
pub mod registry;

pub use health::{
    HealthReport, HealthReporter, ResourceStatus, ServiceStatus, SystemReport, SERVICE_NAME,
};
pub use models::{User, UserDraft, ValidationError};
pub use observability::ServiceMetrics;
pub use registry::UserRegistry;
