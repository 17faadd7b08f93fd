//! Application services (use case implementations).

pub mod collector;
pub mod provisioning_service;

pub use collector::InputCollector;
pub use provisioning_service::{ProvisionReport, ProvisioningService, Stage};
