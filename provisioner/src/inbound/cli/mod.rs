//! Command-line surface of the `provision` binary.
//!
//! Flags override the values loaded from the environment by
//! [`ProvisionSettings`] and [`ExampleDataSettings`]; the connection string
//! comes from `--mongodb-url` or `MONGODB_URL`.

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use crate::bootstrap::{ExampleDataSettings, ProvisionSettings, ProvisionSummary};

pub use report::render_summary;

/// Environment variable holding the connection string.
pub const MONGODB_URL_ENV: &str = "MONGODB_URL";

/// `provision` command arguments.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "provision",
    about = "Provision the LMS document store: collections, validators, indexes and the bootstrap account",
    version
)]
pub struct ProvisionArgs {
    /// MongoDB connection string. Falls back to `MONGODB_URL` when omitted.
    #[arg(long = "mongodb-url", value_name = "url")]
    pub mongodb_url: Option<String>,
    /// Target database name.
    #[arg(long, value_name = "name")]
    pub database: Option<String>,
    /// Bound on each administrative call.
    #[arg(long = "call-timeout-secs", value_name = "seconds")]
    pub call_timeout_secs: Option<u64>,
    /// Bound on the whole run.
    #[arg(long = "run-deadline-secs", value_name = "seconds")]
    pub run_deadline_secs: Option<u64>,
    /// Seed the development fixture after provisioning.
    #[arg(long = "seed-example-data")]
    pub seed_example_data: bool,
    /// Fixture file to seed instead of the bundled one.
    #[arg(long = "fixture", value_name = "path")]
    pub fixture: Option<PathBuf>,
    /// Exit non-zero when any step failure was recorded.
    #[arg(long)]
    pub strict: bool,
}

impl ProvisionArgs {
    /// Overlay the flags that were given onto loaded settings.
    ///
    /// Boolean flags only ever switch behaviour on; leaving a flag out keeps
    /// the configured value.
    pub fn apply(&self, settings: &mut ProvisionSettings, example_data: &mut ExampleDataSettings) {
        if let Some(database) = &self.database {
            settings.database = Some(database.clone());
        }
        if let Some(secs) = self.call_timeout_secs {
            settings.call_timeout_secs = Some(secs);
        }
        if let Some(secs) = self.run_deadline_secs {
            settings.run_deadline_secs = Some(secs);
        }
        settings.strict |= self.strict;

        example_data.enabled |= self.seed_example_data;
        if let Some(path) = &self.fixture {
            example_data.fixture_path = Some(path.clone());
        }
    }
}

/// Errors resolving the connection string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionStringError {
    #[error("--mongodb-url must not be empty when provided")]
    EmptyFlag,
    #[error("connection string missing: set --mongodb-url or MONGODB_URL")]
    Missing,
    #[error("MONGODB_URL must not be empty")]
    EmptyEnvironment,
}

/// Pick the connection string from the flag, falling back to the value of
/// `MONGODB_URL`.
///
/// # Examples
///
/// ```
/// use provisioner::inbound::cli::resolve_connection_string;
///
/// let url = resolve_connection_string(None, Some("mongodb://db:27017".to_owned()));
/// assert_eq!(url.as_deref(), Ok("mongodb://db:27017"));
/// ```
pub fn resolve_connection_string(
    explicit: Option<String>,
    from_env: Option<String>,
) -> Result<String, ConnectionStringError> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(ConnectionStringError::EmptyFlag);
        }
        return Ok(value);
    }

    let value = from_env.ok_or(ConnectionStringError::Missing)?;
    if value.trim().is_empty() {
        return Err(ConnectionStringError::EmptyEnvironment);
    }
    Ok(value)
}

/// How a completed run should be reported to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    /// Step or seed failures were recorded and `--strict` was in effect.
    FailedStrict,
}

impl RunStatus {
    pub fn from_summary(summary: &ProvisionSummary, strict: bool) -> Self {
        if strict && summary.failure_count() > 0 {
            Self::FailedStrict
        } else {
            Self::Succeeded
        }
    }

    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Succeeded => ExitCode::SUCCESS,
            Self::FailedStrict => ExitCode::from(2),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for argument handling.

    use rstest::rstest;

    use super::*;
    use crate::domain::ports::StorageErrorKind;
    use crate::domain::{
        ExampleDataSeedOutcome, ProvisioningReport, ProvisioningStep, SeedFailure,
        SeedFailureCause, StepFailure,
    };

    fn settings() -> (ProvisionSettings, ExampleDataSettings) {
        (
            ProvisionSettings {
                database: Some("scottlms".to_owned()),
                call_timeout_secs: None,
                run_deadline_secs: Some(90),
                strict: false,
                admin_email: None,
                admin_username: None,
                admin_first_name: None,
                admin_last_name: None,
                admin_password: None,
            },
            ExampleDataSettings {
                enabled: false,
                fixture_path: None,
            },
        )
    }

    #[rstest]
    fn flags_parse_and_override_settings() {
        let args = ProvisionArgs::try_parse_from([
            "provision",
            "--database",
            "scottlms_dev",
            "--call-timeout-secs",
            "4",
            "--seed-example-data",
            "--fixture",
            "seed.json",
            "--strict",
        ])
        .expect("arguments parse");
        let (mut provision, mut example_data) = settings();

        args.apply(&mut provision, &mut example_data);

        assert_eq!(provision.database.as_deref(), Some("scottlms_dev"));
        assert_eq!(provision.call_timeout_secs, Some(4));
        assert_eq!(provision.run_deadline_secs, Some(90));
        assert!(provision.strict);
        assert!(example_data.enabled);
        assert_eq!(example_data.fixture_path, Some(PathBuf::from("seed.json")));
    }

    #[rstest]
    fn absent_flags_keep_settings() {
        let args = ProvisionArgs::try_parse_from(["provision"]).expect("arguments parse");
        let (mut provision, mut example_data) = settings();
        example_data.enabled = true;

        args.apply(&mut provision, &mut example_data);

        assert_eq!(provision.database.as_deref(), Some("scottlms"));
        assert!(example_data.enabled);
    }

    #[rstest]
    #[case(Some("mongodb://flag"), Some("mongodb://env"), Ok("mongodb://flag"))]
    #[case(None, Some("mongodb://env"), Ok("mongodb://env"))]
    #[case(Some("  "), Some("mongodb://env"), Err(ConnectionStringError::EmptyFlag))]
    #[case(None, None, Err(ConnectionStringError::Missing))]
    #[case(None, Some(""), Err(ConnectionStringError::EmptyEnvironment))]
    fn connection_string_resolution(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
        #[case] expected: Result<&str, ConnectionStringError>,
    ) {
        let resolved = resolve_connection_string(
            explicit.map(str::to_owned),
            from_env.map(str::to_owned),
        );
        assert_eq!(resolved.as_deref().map_err(Clone::clone), expected);
    }

    #[rstest]
    #[case(false, false, RunStatus::Succeeded)]
    #[case(true, false, RunStatus::Succeeded)]
    #[case(false, true, RunStatus::Succeeded)]
    #[case(true, true, RunStatus::FailedStrict)]
    fn strict_mode_turns_failures_into_a_failed_run(
        #[case] strict: bool,
        #[case] has_failure: bool,
        #[case] expected: RunStatus,
    ) {
        let mut report = ProvisioningReport::default();
        if has_failure {
            report.failures.push(StepFailure {
                step: ProvisioningStep::CreateIndex,
                target: "courses.title_text_description_text".to_owned(),
                kind: StorageErrorKind::Query,
                message: "storage query failed: conflict".to_owned(),
            });
        }
        let summary = ProvisionSummary {
            report,
            seeding: None,
        };

        assert_eq!(RunStatus::from_summary(&summary, strict), expected);
    }

    #[rstest]
    fn strict_mode_counts_seed_failures() {
        let summary = ProvisionSummary {
            report: ProvisioningReport::default(),
            seeding: Some(ExampleDataSeedOutcome {
                failures: vec![SeedFailure {
                    entity: "user",
                    key: "admin@scottlms.com".to_owned(),
                    cause: SeedFailureCause::Rejected {
                        kind: StorageErrorKind::DuplicateKey,
                        message: "duplicate key: username 'admin' is taken".to_owned(),
                    },
                }],
                ..ExampleDataSeedOutcome::default()
            }),
        };

        assert_eq!(RunStatus::from_summary(&summary, false), RunStatus::Succeeded);
        assert_eq!(RunStatus::from_summary(&summary, true), RunStatus::FailedStrict);
    }
}
