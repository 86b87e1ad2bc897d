//! HTTP API handlers

pub mod diagnose;
pub mod health;
pub mod rules;

pub use diagnose::diagnosis_routes;
pub use health::health_routes;
pub use rules::rule_routes;
