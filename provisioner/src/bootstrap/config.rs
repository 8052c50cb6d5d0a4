//! Provisioning and example data settings loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::provisioner::{DEFAULT_CALL_TIMEOUT, DEFAULT_RUN_DEADLINE};
use crate::outbound::mongo::DEFAULT_DATABASE;

/// Development password used when no admin password is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_ADMIN_EMAIL: &str = "admin@scottlms.com";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_FIRST_NAME: &str = "Scott";
const DEFAULT_ADMIN_LAST_NAME: &str = "Administrator";

/// Settings controlling a provisioning run.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PROVISION")]
pub struct ProvisionSettings {
    /// Target database name.
    pub database: Option<String>,
    /// Bound on each administrative call, in seconds.
    pub call_timeout_secs: Option<u64>,
    /// Bound on the whole run, in seconds.
    pub run_deadline_secs: Option<u64>,
    /// Treat recorded step failures as a failed run.
    #[ortho_config(default = false)]
    pub strict: bool,
    pub admin_email: Option<String>,
    pub admin_username: Option<String>,
    pub admin_first_name: Option<String>,
    pub admin_last_name: Option<String>,
    /// Plaintext bootstrap password; hashed before it is stored.
    pub admin_password: Option<String>,
}

impl ProvisionSettings {
    pub fn database(&self) -> &str {
        self.database.as_deref().unwrap_or(DEFAULT_DATABASE)
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout_secs
            .map_or(DEFAULT_CALL_TIMEOUT, Duration::from_secs)
    }

    pub fn run_deadline(&self) -> Duration {
        self.run_deadline_secs
            .map_or(DEFAULT_RUN_DEADLINE, Duration::from_secs)
    }

    pub fn admin_email(&self) -> &str {
        self.admin_email.as_deref().unwrap_or(DEFAULT_ADMIN_EMAIL)
    }

    pub fn admin_username(&self) -> &str {
        self.admin_username
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_USERNAME)
    }

    pub fn admin_first_name(&self) -> &str {
        self.admin_first_name
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_FIRST_NAME)
    }

    pub fn admin_last_name(&self) -> &str {
        self.admin_last_name
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_LAST_NAME)
    }

    pub fn admin_password(&self) -> &str {
        self.admin_password
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_PASSWORD)
    }

    /// Whether the bootstrap account falls back to the development password.
    pub fn uses_default_admin_password(&self) -> bool {
        self.admin_password.is_none()
    }
}

/// Settings controlling example data seeding after provisioning.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXAMPLE_DATA")]
pub struct ExampleDataSettings {
    /// Seed the development fixture after a successful run.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Fixture file override; the bundled fixture is used when unset.
    pub fixture_path: Option<PathBuf>,
}
