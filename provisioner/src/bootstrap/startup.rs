//! Provisioning run orchestration.
//!
//! Builds the bootstrap account, loads the seed fixture, then drives the
//! schema provisioner and the example data seeder over whichever adapters
//! the caller supplies. [`run_provisioning`] wires the MongoDB and Argon2
//! adapters; [`run_with_ports`] accepts any port implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use example_data::{FixtureError, SeedFixture};
use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tracing::{info, warn};

use super::config::{ExampleDataSettings, ProvisionSettings};
use crate::domain::ports::{
    AccountRepository, CredentialHashError, CredentialHasher, ExampleDataSeedRepository,
    SchemaAdmin, StorageError,
};
use crate::domain::{
    AccountValidationError, EmailAddress, ExampleDataSeedOutcome, ExampleDataSeeder,
    ExampleDataSeedingError, NewUser, ProvisionerConfig, ProvisioningError, ProvisioningReport,
    Role, SchemaCatalog, SchemaProvisioner, Username,
};
use crate::outbound::Argon2CredentialHasher;
use crate::outbound::mongo::{
    MongoAccountRepository, MongoConfig, MongoExampleDataSeedRepository, MongoHandle,
    MongoSchemaAdmin,
};

/// Errors returned while preparing or executing a provisioning run.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Settings could not be loaded or were inconsistent.
    #[error("invalid settings: {message}")]
    Settings { message: String },
    /// The document store could not be reached.
    #[error("could not connect to the document store: {0}")]
    Connection(#[source] StorageError),
    /// The configured bootstrap account is invalid.
    #[error("invalid bootstrap account: {0}")]
    InvalidAccount(#[from] AccountValidationError),
    /// Hashing the bootstrap password failed.
    #[error("bootstrap password hashing failed: {0}")]
    Hashing(#[from] CredentialHashError),
    /// The fixture file could not be read.
    #[error("failed to read fixture at {path}: {source}")]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The fixture failed parsing or validation.
    #[error("fixture error: {0}")]
    Fixture(#[from] FixtureError),
    /// Provisioning aborted.
    #[error("provisioning aborted: {0}")]
    Provisioning(#[from] ProvisioningError),
    /// Example data seeding failed.
    #[error("example data seeding error: {0}")]
    Seeding(#[from] ExampleDataSeedingError),
}

impl StartupError {
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }
}

/// Administrative account ensured by every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl AdminAccount {
    fn to_new_user<H: CredentialHasher>(
        &self,
        hasher: &H,
        clock: &dyn Clock,
    ) -> Result<NewUser, StartupError> {
        Ok(NewUser {
            email: EmailAddress::new(self.email.as_str())?,
            username: Username::new(self.username.as_str())?,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: Role::Admin,
            hashed_password: hasher.hash_password(&self.password)?,
            is_active: true,
            created_at: clock.utc(),
        })
    }
}

/// Where the example data fixture comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureSource {
    /// The fixture compiled into the `example-data` crate.
    Bundled,
    /// A fixture file on disk.
    File(PathBuf),
}

/// Everything a run needs besides its adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionPlan {
    pub database: String,
    pub provisioner: ProvisionerConfig,
    pub admin: AdminAccount,
    /// Fixture to seed after provisioning; `None` disables seeding.
    pub example_data: Option<FixtureSource>,
}

impl ProvisionPlan {
    /// Build a plan from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Settings`] when a timeout is configured as
    /// zero seconds.
    pub fn from_settings(
        settings: &ProvisionSettings,
        example_data: &ExampleDataSettings,
    ) -> Result<Self, StartupError> {
        for (name, secs) in [
            ("call_timeout_secs", settings.call_timeout_secs),
            ("run_deadline_secs", settings.run_deadline_secs),
        ] {
            if secs == Some(0) {
                return Err(StartupError::settings(format!(
                    "{name} must be greater than zero"
                )));
            }
        }

        if settings.uses_default_admin_password() {
            warn!(
                email = settings.admin_email(),
                "bootstrap account uses the default development password"
            );
        }

        let example_data = example_data.enabled.then(|| {
            example_data
                .fixture_path
                .clone()
                .map_or(FixtureSource::Bundled, FixtureSource::File)
        });

        Ok(Self {
            database: settings.database().to_owned(),
            provisioner: ProvisionerConfig {
                call_timeout: settings.call_timeout(),
                run_deadline: settings.run_deadline(),
            },
            admin: AdminAccount {
                email: settings.admin_email().to_owned(),
                username: settings.admin_username().to_owned(),
                first_name: settings.admin_first_name().to_owned(),
                last_name: settings.admin_last_name().to_owned(),
                password: settings.admin_password().to_owned(),
            },
            example_data,
        })
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub report: ProvisioningReport,
    /// Seeding outcome, or `None` when seeding was disabled or skipped.
    pub seeding: Option<ExampleDataSeedOutcome>,
}

impl ProvisionSummary {
    /// Provisioning step failures plus rejected or skipped seed records.
    pub fn failure_count(&self) -> usize {
        self.report.failures.len()
            + self
                .seeding
                .as_ref()
                .map_or(0, |outcome| outcome.failures.len())
    }
}

/// Adapters a run drives.
pub struct ProvisioningPorts<S, A, R, H> {
    pub schema_admin: Arc<S>,
    pub accounts: Arc<A>,
    pub seeds: Arc<R>,
    pub hasher: Arc<H>,
    pub clock: Arc<dyn Clock>,
}

/// Provision the schema and optionally seed example data over `ports`.
///
/// The fixture is loaded before the store is touched so an invalid fixture
/// fails the run without side effects. Seeding only runs when provisioning
/// recorded no failures, and the fixture's administrator is seeded as the
/// bootstrap account so both resolve to the same user.
///
/// # Errors
///
/// Returns [`StartupError`] when the account or fixture is invalid, when
/// provisioning aborts, or when seeding fails.
pub async fn run_with_ports<S, A, R, H>(
    ports: ProvisioningPorts<S, A, R, H>,
    plan: &ProvisionPlan,
) -> Result<ProvisionSummary, StartupError>
where
    S: SchemaAdmin,
    A: AccountRepository,
    R: ExampleDataSeedRepository,
    H: CredentialHasher,
{
    let fixture = plan.example_data.as_ref().map(load_fixture).transpose()?;
    let admin = plan
        .admin
        .to_new_user(ports.hasher.as_ref(), ports.clock.as_ref())?;

    let provisioner = SchemaProvisioner::new(
        ports.schema_admin,
        ports.accounts,
        SchemaCatalog::lms(),
        plan.provisioner,
    );
    let report = provisioner.ensure_schema(&admin).await?;

    let seeding = match fixture {
        None => {
            info!(reason = "disabled", "example data seeding skipped");
            None
        }
        Some(_) if report.has_failures() => {
            warn!(
                failures = report.failures.len(),
                "example data seeding skipped; provisioning recorded failures"
            );
            None
        }
        Some(fixture) => {
            let seeder = ExampleDataSeeder::new(ports.seeds, ports.hasher, ports.clock)
                .with_bootstrap_admin(admin);
            Some(seeder.seed_fixture(&fixture).await?)
        }
    };

    Ok(ProvisionSummary { report, seeding })
}

/// Connect to MongoDB and run `plan` against it.
///
/// # Errors
///
/// Returns [`StartupError::Connection`] when the store cannot be reached and
/// any error [`run_with_ports`] returns.
pub async fn run_provisioning(
    connection_string: &str,
    plan: &ProvisionPlan,
) -> Result<ProvisionSummary, StartupError> {
    let config = MongoConfig::new(connection_string)
        .with_database(plan.database.as_str())
        .with_connect_timeout(plan.provisioner.call_timeout)
        .with_server_selection_timeout(plan.provisioner.call_timeout);
    let handle = MongoHandle::connect(&config)
        .await
        .map_err(StartupError::Connection)?;
    let database = handle.database();

    let ports = ProvisioningPorts {
        schema_admin: Arc::new(MongoSchemaAdmin::new(database.clone())),
        accounts: Arc::new(MongoAccountRepository::new(database)),
        seeds: Arc::new(MongoExampleDataSeedRepository::new(database)),
        hasher: Arc::new(Argon2CredentialHasher),
        clock: Arc::new(DefaultClock),
    };
    let summary = run_with_ports(ports, plan).await;
    handle.shutdown().await;
    summary
}

/// Load the fixture named by `source`.
///
/// # Errors
///
/// Returns [`StartupError::FixtureRead`] when a fixture file cannot be read
/// and [`StartupError::Fixture`] when it fails validation.
pub fn load_fixture(source: &FixtureSource) -> Result<SeedFixture, StartupError> {
    match source {
        FixtureSource::Bundled => Ok(SeedFixture::bundled()?),
        FixtureSource::File(path) => {
            let contents = read_fixture_file(path)?;
            Ok(SeedFixture::from_json(&contents)?)
        }
    }
}

fn read_fixture_file(path: &Path) -> Result<String, StartupError> {
    let read_error = |source: std::io::Error| StartupError::FixtureRead {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "fixture path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    dir.read_to_string(Path::new(file_name)).map_err(read_error)
}
