//! Test utilities for the provisioner crate.
//!
//! Compiled only with the `test-support` feature, which the crate's own
//! dev-dependency enables for integration tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    AccountRepository, CredentialHashError, CredentialHasher, ExampleDataSeedRepository,
    SchemaAdmin, StorageError, UpsertOutcome, UpsertStatus,
};
use crate::domain::{
    CollectionSpec, IndexSpec, NewCourse, NewEnrollment, NewUser, RecordId, ValidatorSpec,
};
use crate::domain::schema::{COURSES, ENROLLMENTS, USERS};

/// Name of the index every collection carries.
pub const ID_INDEX: &str = "_id_";

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    ListCollections,
    CreateCollection,
    CreateIndex,
    ListIndexNames,
    CountDocuments,
    InsertUser,
    InsertCourse,
    InsertEnrollment,
}

#[derive(Debug, Default)]
struct CollectionState {
    validator: Option<ValidatorSpec>,
    indexes: BTreeSet<String>,
}

impl CollectionState {
    fn new(validator: Option<ValidatorSpec>) -> Self {
        Self {
            validator,
            indexes: BTreeSet::from([ID_INDEX.to_owned()]),
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    collections: BTreeMap<String, CollectionState>,
    users: Vec<(RecordId, NewUser)>,
    courses: Vec<(RecordId, NewCourse)>,
    enrollments: Vec<(RecordId, NewEnrollment)>,
    next_id: u64,
    failures: HashMap<StoreOperation, Vec<(Option<String>, StorageError)>>,
    calls: HashMap<StoreOperation, usize>,
}

impl StoreState {
    fn next_record_id(&mut self) -> Result<RecordId, StorageError> {
        self.next_id += 1;
        RecordId::new(format!("{:024x}", self.next_id))
            .map_err(|err| StorageError::query(err.to_string()))
    }

    /// Count the call and return an injected failure matching `target`.
    fn check(&mut self, operation: StoreOperation, target: &str) -> Result<(), StorageError> {
        *self.calls.entry(operation).or_default() += 1;
        let injected = self.failures.get(&operation).and_then(|failures| {
            failures
                .iter()
                .find(|(only, _)| only.as_deref().is_none_or(|only| only == target))
                .map(|(_, error)| error.clone())
        });
        injected.map_or(Ok(()), Err)
    }

    /// Writes create their collection implicitly, as the real store does.
    fn touch(&mut self, collection: &str) {
        self.collections
            .entry(collection.to_owned())
            .or_insert_with(|| CollectionState::new(None));
    }

    fn document_count(&self, collection: &str) -> u64 {
        let count = match collection {
            USERS => self.users.len(),
            COURSES => self.courses.len(),
            ENROLLMENTS => self.enrollments.len(),
            _ => 0,
        };
        u64::try_from(count).unwrap_or(u64::MAX)
    }

    fn insert_user(&mut self, user: &NewUser) -> Result<UpsertOutcome, StorageError> {
        self.check(StoreOperation::InsertUser, user.email.as_str())?;
        self.touch(USERS);
        if let Some((id, _)) = self
            .users
            .iter()
            .find(|(_, existing)| existing.email == user.email)
        {
            return Ok(already_present(id));
        }
        if self
            .users
            .iter()
            .any(|(_, existing)| existing.username == user.username)
        {
            return Err(StorageError::duplicate_key(format!(
                "username '{}' is taken",
                user.username
            )));
        }
        let id = self.next_record_id()?;
        self.users.push((id.clone(), user.clone()));
        Ok(inserted(id))
    }
}

fn inserted(id: RecordId) -> UpsertOutcome {
    UpsertOutcome {
        id,
        status: UpsertStatus::Inserted,
    }
}

fn already_present(id: &RecordId) -> UpsertOutcome {
    UpsertOutcome {
        id: id.clone(),
        status: UpsertStatus::AlreadyPresent,
    }
}

/// In-memory document store implementing every provisioning port.
///
/// Natural keys are unique: a second write with the same key reports
/// [`UpsertStatus::AlreadyPresent`] and leaves the stored record untouched.
///
/// # Examples
///
/// ```rust
/// use provisioner::test_support::{InMemoryStore, StoreOperation};
/// use provisioner::domain::ports::StorageError;
///
/// let store = InMemoryStore::new();
/// store.fail_on(StoreOperation::CreateIndex, Some("email_1"), StorageError::query("bad key"));
/// assert!(store.collection_names().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `operation` fail with `error`, for every target or only for
    /// `target` (a collection name, index name or email).
    pub fn fail_on(&self, operation: StoreOperation, target: Option<&str>, error: StorageError) {
        self.state()
            .failures
            .entry(operation)
            .or_default()
            .push((target.map(str::to_owned), error));
    }

    /// Remove every injected failure.
    pub fn clear_failures(&self) {
        self.state().failures.clear();
    }

    /// Number of times `operation` was attempted.
    pub fn calls(&self, operation: StoreOperation) -> usize {
        self.state().calls.get(&operation).copied().unwrap_or_default()
    }

    /// Create a collection without a validator, as a stray write would.
    pub fn create_bare_collection(&self, name: &str) {
        self.state().touch(name);
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.state().collections.keys().cloned().collect()
    }

    pub fn has_validator(&self, collection: &str) -> bool {
        self.state()
            .collections
            .get(collection)
            .is_some_and(|state| state.validator.is_some())
    }

    pub fn index_names(&self, collection: &str) -> Vec<String> {
        self.state()
            .collections
            .get(collection)
            .map(|state| state.indexes.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn user(&self, email: &str) -> Option<NewUser> {
        self.state()
            .users
            .iter()
            .find(|(_, user)| user.email.as_str() == email)
            .map(|(_, user)| user.clone())
    }

    pub fn user_count(&self) -> usize {
        self.state().users.len()
    }

    pub fn course(&self, title: &str) -> Option<NewCourse> {
        self.state()
            .courses
            .iter()
            .find(|(_, course)| course.title == title)
            .map(|(_, course)| course.clone())
    }

    pub fn course_count(&self) -> usize {
        self.state().courses.len()
    }

    pub fn enrollment_count(&self) -> usize {
        self.state().enrollments.len()
    }
}

#[async_trait]
impl SchemaAdmin for InMemoryStore {
    async fn list_collection_names(&self) -> Result<Vec<String>, StorageError> {
        let mut state = self.state();
        state.check(StoreOperation::ListCollections, "database")?;
        Ok(state.collections.keys().cloned().collect())
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), StorageError> {
        let mut state = self.state();
        state.check(StoreOperation::CreateCollection, spec.name)?;
        if state.collections.contains_key(spec.name) {
            return Err(StorageError::already_exists(format!(
                "collection {} already exists",
                spec.name
            )));
        }
        state.collections.insert(
            spec.name.to_owned(),
            CollectionState::new(Some(spec.validator.clone())),
        );
        Ok(())
    }

    async fn create_index(&self, spec: &IndexSpec) -> Result<(), StorageError> {
        let mut state = self.state();
        state.check(StoreOperation::CreateIndex, spec.name)?;
        state.touch(spec.collection);
        let indexes = &mut state
            .collections
            .get_mut(spec.collection)
            .ok_or_else(|| StorageError::query(format!("collection {} missing", spec.collection)))?
            .indexes;
        if !indexes.insert(spec.name.to_owned()) {
            return Err(StorageError::already_exists(format!(
                "index {} already exists",
                spec.qualified_name()
            )));
        }
        Ok(())
    }

    async fn list_index_names(&self, collection: &str) -> Result<Vec<String>, StorageError> {
        let mut state = self.state();
        state.check(StoreOperation::ListIndexNames, collection)?;
        state
            .collections
            .get(collection)
            .map(|state| state.indexes.iter().cloned().collect())
            .ok_or_else(|| StorageError::query(format!("ns does not exist: {collection}")))
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, StorageError> {
        let mut state = self.state();
        state.check(StoreOperation::CountDocuments, collection)?;
        Ok(state.document_count(collection))
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn insert_user_if_absent(&self, user: &NewUser) -> Result<UpsertOutcome, StorageError> {
        self.state().insert_user(user)
    }
}

#[async_trait]
impl ExampleDataSeedRepository for InMemoryStore {
    async fn insert_user_if_absent(&self, user: &NewUser) -> Result<UpsertOutcome, StorageError> {
        self.state().insert_user(user)
    }

    async fn insert_course_if_absent(
        &self,
        course: &NewCourse,
    ) -> Result<UpsertOutcome, StorageError> {
        let mut state = self.state();
        state.check(StoreOperation::InsertCourse, &course.title)?;
        state.touch(COURSES);
        if let Some((id, _)) = state
            .courses
            .iter()
            .find(|(_, existing)| existing.title == course.title)
        {
            return Ok(already_present(id));
        }
        let id = state.next_record_id()?;
        state.courses.push((id.clone(), course.clone()));
        Ok(inserted(id))
    }

    async fn insert_enrollment_if_absent(
        &self,
        enrollment: &NewEnrollment,
    ) -> Result<UpsertOutcome, StorageError> {
        let mut state = self.state();
        let key = format!("{}/{}", enrollment.user_id, enrollment.course_id);
        state.check(StoreOperation::InsertEnrollment, &key)?;
        state.touch(ENROLLMENTS);
        if let Some((id, _)) = state.enrollments.iter().find(|(_, existing)| {
            existing.user_id == enrollment.user_id && existing.course_id == enrollment.course_id
        }) {
            return Ok(already_present(id));
        }
        let id = state.next_record_id()?;
        state.enrollments.push((id.clone(), enrollment.clone()));
        Ok(inserted(id))
    }
}

/// Deterministic stand-in for the Argon2 hasher.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeCredentialHasher;

impl FakeCredentialHasher {
    /// The hash this fake produces for `password`.
    pub fn expected_hash(password: &str) -> String {
        format!("fake-hash:{password}")
    }
}

impl CredentialHasher for FakeCredentialHasher {
    fn hash_password(&self, password: &str) -> Result<String, CredentialHashError> {
        Ok(Self::expected_hash(password))
    }
}

pub mod cap_fs {
    //! Capability-safe file helpers for tests.

    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Write bytes to a file through `cap_std`.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;
        let file_name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(file_name), contents)
    }
}
