//! Behaviour-driven tests for example data seeding after provisioning.
//!
//! These scenarios validate that the development fixture is inserted once,
//! that repeat and disabled runs leave the store alone, and that fixture
//! problems surface before any write.

// `expect` is idiomatic in test code for failing fast on precondition violations.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::path::PathBuf;
use std::sync::Arc;

use provisioner::bootstrap::{FixtureSource, ProvisionSummary};
use provisioner::domain::ports::StorageError;
use provisioner::domain::{ExampleDataSeedOutcome, SeedCounts};
use provisioner::test_support::{FakeCredentialHasher, InMemoryStore, StoreOperation, cap_fs};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tempfile::TempDir;

mod support;

use support::{RuntimeHandle, plan, run_against};

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

/// Keeps fixture files alive for the scenario.
#[derive(Clone)]
struct ScratchDir(Arc<TempDir>);

#[derive(Default, ScenarioState)]
struct ExampleDataSeedingWorld {
    runtime: Slot<RuntimeHandle>,
    store: Slot<Arc<InMemoryStore>>,
    fixture_source: Slot<FixtureSource>,
    admin_email: Slot<String>,
    scratch: Slot<ScratchDir>,
    last_result: Slot<Result<ProvisionSummary, String>>,
}

impl ExampleDataSeedingWorld {
    fn store(&self) -> Arc<InMemoryStore> {
        self.store.get().expect("store should be set")
    }

    fn run(&self) {
        let runtime = self.runtime.get().expect("runtime should be set");
        let mut run_plan = plan(self.fixture_source.get());
        if let Some(email) = self.admin_email.get() {
            run_plan.admin.email = email;
        }
        let result = run_against(&runtime, &self.store(), &run_plan);
        self.last_result.set(result);
    }

    fn seeding(&self) -> Option<ExampleDataSeedOutcome> {
        self.last_result
            .get()
            .expect("run result should be set")
            .expect("run should succeed")
            .seeding
    }

    fn outcome(&self) -> ExampleDataSeedOutcome {
        self.seeding().expect("seeding should have run")
    }

    fn scratch_path(&self, file_name: &str) -> PathBuf {
        let scratch = ScratchDir(Arc::new(TempDir::new().expect("create scratch dir")));
        let path = scratch.0.path().join(file_name);
        self.scratch.set(scratch);
        path
    }

    fn error(&self) -> String {
        match self.last_result.get().expect("run result should be set") {
            Err(err) => err,
            Ok(summary) => panic!("expected failure, got {summary:?}"),
        }
    }
}

#[fixture]
fn world() -> ExampleDataSeedingWorld {
    ExampleDataSeedingWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an empty document store")]
fn an_empty_document_store(world: &ExampleDataSeedingWorld) {
    world.runtime.set(RuntimeHandle::new());
    world.store.set(Arc::new(InMemoryStore::new()));
}

#[given("example data seeding is enabled")]
fn example_data_seeding_is_enabled(world: &ExampleDataSeedingWorld) {
    world.fixture_source.set(FixtureSource::Bundled);
}

#[given("example data seeding is disabled")]
fn example_data_seeding_is_disabled(world: &ExampleDataSeedingWorld) {
    assert!(
        world.fixture_source.get().is_none(),
        "no fixture source should be configured"
    );
}

#[given("creating index {name} fails")]
fn creating_index_fails(world: &ExampleDataSeedingWorld, name: String) {
    world.store().fail_on(
        StoreOperation::CreateIndex,
        Some(&name),
        StorageError::query("index key specs conflict"),
    );
}

#[given("the bootstrap account email is {email}")]
fn the_bootstrap_account_email_is(world: &ExampleDataSeedingWorld, email: String) {
    world.admin_email.set(email);
}

#[given("writing seed user {email} fails with a validation error")]
fn writing_seed_user_fails(world: &ExampleDataSeedingWorld, email: String) {
    world.store().fail_on(
        StoreOperation::InsertUser,
        Some(&email),
        StorageError::validation_rejected("firstName must be a string"),
    );
}

#[given("a fixture file with malformed JSON")]
fn a_fixture_file_with_malformed_json(world: &ExampleDataSeedingWorld) {
    let path = world.scratch_path("seed.json");
    cap_fs::write_file(&path, b"{ not json").expect("write fixture file");
    world.fixture_source.set(FixtureSource::File(path));
}

#[given("a fixture file that does not exist")]
fn a_fixture_file_that_does_not_exist(world: &ExampleDataSeedingWorld) {
    let path = world.scratch_path("missing.json");
    world.fixture_source.set(FixtureSource::File(path));
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("a provisioning run with seeding completes")]
fn a_provisioning_run_with_seeding_completes(world: &ExampleDataSeedingWorld) {
    world.run();
    let result = world.last_result.get().expect("run result should be set");
    assert!(result.is_ok(), "expected success, got {result:?}");
}

#[when("a provisioning run with seeding completes again")]
fn a_provisioning_run_with_seeding_completes_again(world: &ExampleDataSeedingWorld) {
    a_provisioning_run_with_seeding_completes(world);
}

#[when("the provisioning run with seeding is attempted")]
fn the_provisioning_run_with_seeding_is_attempted(world: &ExampleDataSeedingWorld) {
    world.run();
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("{inserted:usize} users were inserted and {present:usize} was already present")]
fn users_were_inserted(world: &ExampleDataSeedingWorld, inserted: usize, present: usize) {
    assert_eq!(
        world.outcome().users,
        SeedCounts {
            inserted,
            already_present: present,
        }
    );
}

#[then("{courses:usize} courses and {enrollments:usize} enrollments were inserted")]
fn courses_and_enrollments_were_inserted(
    world: &ExampleDataSeedingWorld,
    courses: usize,
    enrollments: usize,
) {
    let outcome = world.outcome();
    assert_eq!(outcome.courses.inserted, courses);
    assert_eq!(outcome.enrollments.inserted, enrollments);
}

#[then("nothing was inserted")]
fn nothing_was_inserted(world: &ExampleDataSeedingWorld) {
    let outcome = world.outcome();
    assert_eq!(outcome.users.inserted, 0);
    assert_eq!(outcome.courses.inserted, 0);
    assert_eq!(outcome.enrollments.inserted, 0);
    assert_eq!(outcome.users.already_present, 12);
    assert_eq!(outcome.enrollments.already_present, 18);
}

#[then("the store holds {users:usize} users, {courses:usize} courses and {enrollments:usize} enrollments")]
fn the_store_holds(
    world: &ExampleDataSeedingWorld,
    users: usize,
    courses: usize,
    enrollments: usize,
) {
    let store = world.store();
    assert_eq!(store.user_count(), users);
    assert_eq!(store.course_count(), courses);
    assert_eq!(store.enrollment_count(), enrollments);
}

#[then("user {email} stores the hash of {password}")]
fn user_stores_the_hash_of(world: &ExampleDataSeedingWorld, email: String, password: String) {
    let user = world.store().user(&email).expect("user should be stored");
    assert_eq!(
        user.hashed_password,
        FakeCredentialHasher::expected_hash(&password)
    );
}

#[then("{count:usize} seed failures were recorded")]
fn seed_failures_were_recorded(world: &ExampleDataSeedingWorld, count: usize) {
    assert_eq!(world.outcome().failures.len(), count);
}

#[then("a {entity} seed failure is recorded for {key}")]
fn a_seed_failure_is_recorded(world: &ExampleDataSeedingWorld, entity: String, key: String) {
    let outcome = world.outcome();
    assert!(
        outcome
            .failures
            .iter()
            .any(|failure| failure.entity == entity && failure.key == key),
        "no {entity} failure for {key} in {:?}",
        outcome.failures
    );
}

#[then("no user has email {email}")]
fn no_user_has_email(world: &ExampleDataSeedingWorld, email: String) {
    assert!(world.store().user(&email).is_none());
}

#[then("seeding was skipped")]
fn seeding_was_skipped(world: &ExampleDataSeedingWorld) {
    assert!(world.seeding().is_none());
}

#[then("the run fails with a fixture error")]
fn the_run_fails_with_a_fixture_error(world: &ExampleDataSeedingWorld) {
    let error = world.error();
    assert!(error.starts_with("fixture error"), "unexpected error: {error}");
}

#[then("no collections exist")]
fn no_collections_exist(world: &ExampleDataSeedingWorld) {
    assert!(world.store().collection_names().is_empty());
}

#[then("the run fails naming the fixture path")]
fn the_run_fails_naming_the_fixture_path(world: &ExampleDataSeedingWorld) {
    let error = world.error();
    assert!(error.contains("missing.json"), "unexpected error: {error}");
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/example_data_seeding.feature",
    name = "Bundled fixture is seeded on first run"
)]
fn bundled_fixture_is_seeded_on_first_run(world: ExampleDataSeedingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data_seeding.feature",
    name = "Seeding twice inserts nothing new"
)]
fn seeding_twice_inserts_nothing_new(world: ExampleDataSeedingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data_seeding.feature",
    name = "Seeded accounts carry hashed credentials"
)]
fn seeded_accounts_carry_hashed_credentials(world: ExampleDataSeedingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data_seeding.feature",
    name = "Seeding is skipped when disabled"
)]
fn seeding_is_skipped_when_disabled(world: ExampleDataSeedingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data_seeding.feature",
    name = "Seeding is skipped after a recorded step failure"
)]
fn seeding_is_skipped_after_a_step_failure(world: ExampleDataSeedingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data_seeding.feature",
    name = "Invalid fixture file fails before touching the store"
)]
fn invalid_fixture_file_fails_early(world: ExampleDataSeedingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data_seeding.feature",
    name = "Missing fixture file reports its path"
)]
fn missing_fixture_file_reports_its_path(world: ExampleDataSeedingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data_seeding.feature",
    name = "Fixture administrator follows a custom bootstrap email"
)]
fn fixture_admin_follows_custom_bootstrap_email(world: ExampleDataSeedingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data_seeding.feature",
    name = "Rejected seed user is recorded and its courses are skipped"
)]
fn rejected_seed_user_is_recorded(world: ExampleDataSeedingWorld) {
    let _ = world;
}
