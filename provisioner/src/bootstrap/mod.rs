//! Settings and startup wiring for provisioning runs.

mod config;
mod startup;

pub use config::{DEFAULT_ADMIN_PASSWORD, ExampleDataSettings, ProvisionSettings};
pub use startup::{
    AdminAccount, FixtureSource, ProvisionPlan, ProvisionSummary, ProvisioningPorts, StartupError,
    load_fixture, run_provisioning, run_with_ports,
};
