//! `provision` entry-point: converges a MongoDB database onto the LMS schema
//! and optionally seeds the development fixture.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use provisioner::bootstrap::{
    ExampleDataSettings, ProvisionPlan, ProvisionSettings, StartupError, run_provisioning,
};
use provisioner::inbound::cli::{
    MONGODB_URL_ENV, ProvisionArgs, RunStatus, render_summary, resolve_connection_string,
};

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> color_eyre::Result<ExitCode> {
    let args = ProvisionArgs::parse();

    let program = [OsString::from("provision")];
    let mut settings = ProvisionSettings::load_from_iter(program.clone())
        .map_err(|e| StartupError::settings(e.to_string()))?;
    let mut example_data = ExampleDataSettings::load_from_iter(program)
        .map_err(|e| StartupError::settings(e.to_string()))?;
    args.apply(&mut settings, &mut example_data);

    let connection_string =
        resolve_connection_string(args.mongodb_url.clone(), env::var(MONGODB_URL_ENV).ok())?;
    let plan = ProvisionPlan::from_settings(&settings, &example_data)?;
    let summary = run_provisioning(&connection_string, &plan)
        .await
        .wrap_err("provisioning run failed")?;

    for line in render_summary(&summary) {
        println!("{line}");
    }

    let status = RunStatus::from_summary(&summary, settings.strict);
    if status == RunStatus::FailedStrict {
        error!(
            failures = summary.failure_count(),
            "failures recorded in strict mode"
        );
    }
    Ok(status.exit_code())
}
