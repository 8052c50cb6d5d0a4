//! Shared helpers for provisioner integration tests.
//!
//! Integration tests compile as separate crates, so the world plumbing the
//! behaviour suites share lives here rather than in each test file.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use provisioner::bootstrap::{
    AdminAccount, FixtureSource, ProvisionPlan, ProvisionSummary, ProvisioningPorts,
    run_with_ports,
};
use provisioner::domain::ProvisionerConfig;
use provisioner::test_support::{FakeCredentialHasher, InMemoryStore};
use tokio::runtime::Runtime;

/// Wrapper for non-Clone runtime handle.
#[derive(Clone)]
pub struct RuntimeHandle(pub Arc<Runtime>);

impl RuntimeHandle {
    pub fn new() -> Self {
        Self(Arc::new(Runtime::new().expect("create runtime")))
    }
}

/// Clock pinned to a single instant.
pub struct FixtureClock(pub DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixture_clock() -> Arc<dyn Clock> {
    let now = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    Arc::new(FixtureClock(now))
}

/// Plan using the development administrator and default bounds.
pub fn plan(example_data: Option<FixtureSource>) -> ProvisionPlan {
    ProvisionPlan {
        database: "scottlms".to_owned(),
        provisioner: ProvisionerConfig::default(),
        admin: AdminAccount {
            email: "admin@scottlms.com".to_owned(),
            username: "admin".to_owned(),
            first_name: "Scott".to_owned(),
            last_name: "Administrator".to_owned(),
            password: "admin123".to_owned(),
        },
        example_data,
    }
}

/// Run `plan` against `store`, rendering errors as strings for slot storage.
pub fn run_against(
    runtime: &RuntimeHandle,
    store: &Arc<InMemoryStore>,
    plan: &ProvisionPlan,
) -> Result<ProvisionSummary, String> {
    let ports = ProvisioningPorts {
        schema_admin: Arc::clone(store),
        accounts: Arc::clone(store),
        seeds: Arc::clone(store),
        hasher: Arc::new(FakeCredentialHasher),
        clock: fixture_clock(),
    };
    runtime
        .0
        .block_on(run_with_ports(ports, plan))
        .map_err(|err| err.to_string())
}
