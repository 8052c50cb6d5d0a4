//! Idempotent schema provisioning.
//!
//! The provisioner converges a database onto a [`SchemaCatalog`]:
//! - missing collections are created with their validators; existing ones
//!   are left as they are;
//! - every catalogue index is requested, with "already exists" counted as
//!   success;
//! - the bootstrap account is written with set-if-absent semantics;
//! - the resulting state is re-read for the report.
//!
//! Fatal storage failures abort the run. Every other failure is recorded in
//! the report and the run carries on, so a re-run converges.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::ports::{
    AccountRepository, SchemaAdmin, StorageError, StorageErrorKind, UpsertStatus,
};
use crate::domain::{CollectionSpec, IndexSpec, NewUser, SchemaCatalog};

/// Default bound on a single administrative call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);
/// Default bound on a whole provisioning run.
pub const DEFAULT_RUN_DEADLINE: Duration = Duration::from_secs(60);

/// Time budgets for a provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionerConfig {
    /// Bound on each administrative call; exceeding it is fatal.
    pub call_timeout: Duration,
    /// Bound on the whole run.
    pub run_deadline: Duration,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            run_deadline: DEFAULT_RUN_DEADLINE,
        }
    }
}

/// Named phase of a provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStep {
    ListCollections,
    CreateCollection,
    CreateIndex,
    BootstrapAccount,
    Verify,
}

impl ProvisioningStep {
    /// Stable snake-case label used in logs and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListCollections => "list_collections",
            Self::CreateCollection => "create_collection",
            Self::CreateIndex => "create_index",
            Self::BootstrapAccount => "bootstrap_account",
            Self::Verify => "verify",
        }
    }
}

impl fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a collection or index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Created,
    AlreadyPresent,
}

impl StepOutcome {
    /// Stable snake-case label used in logs and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::AlreadyPresent => "already_present",
        }
    }
}

/// Outcome for one catalogue collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOutcome {
    pub name: String,
    pub outcome: StepOutcome,
}

/// Outcome for one catalogue index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOutcome {
    pub collection: String,
    pub name: String,
    pub outcome: StepOutcome,
}

/// Outcome of the bootstrap account write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountReport {
    pub email: String,
    pub status: UpsertStatus,
}

/// A non-fatal failure recorded while the run carried on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: ProvisioningStep,
    /// Collection name, qualified index name or account email.
    pub target: String,
    pub kind: StorageErrorKind,
    pub message: String,
}

/// Post-run state of one catalogue collection.
///
/// Counts are `None` when the verification query itself failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub name: String,
    pub document_count: Option<u64>,
    pub index_count: Option<usize>,
}

/// State re-read from the store after provisioning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    /// Sorted collection names, or `None` when listing failed.
    pub collections: Option<Vec<String>>,
    pub summaries: Vec<CollectionSummary>,
}

/// Everything a provisioning run did and observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisioningReport {
    pub collections: Vec<CollectionOutcome>,
    pub indexes: Vec<IndexOutcome>,
    pub account: Option<AccountReport>,
    pub verification: Verification,
    pub failures: Vec<StepFailure>,
}

impl ProvisioningReport {
    /// Whether any step was recorded as failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Errors that abort a provisioning run.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// A step failed with a fatal classification.
    #[error("{step} failed for '{target}': {source}")]
    Fatal {
        step: ProvisioningStep,
        target: String,
        #[source]
        source: StorageError,
    },
    /// The run did not finish within its deadline.
    #[error("provisioning exceeded its {}s deadline", .deadline.as_secs())]
    DeadlineExceeded { deadline: Duration },
}

/// Service converging a database onto a schema catalogue.
#[derive(Clone)]
pub struct SchemaProvisioner<S, A> {
    schema_admin: Arc<S>,
    accounts: Arc<A>,
    catalog: SchemaCatalog,
    config: ProvisionerConfig,
}

impl<S, A> SchemaProvisioner<S, A> {
    /// Create a provisioner over the given adapters.
    pub fn new(
        schema_admin: Arc<S>,
        accounts: Arc<A>,
        catalog: SchemaCatalog,
        config: ProvisionerConfig,
    ) -> Self {
        Self {
            schema_admin,
            accounts,
            catalog,
            config,
        }
    }

    /// The catalogue this provisioner converges onto.
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }
}

impl<S, A> SchemaProvisioner<S, A>
where
    S: SchemaAdmin,
    A: AccountRepository,
{
    /// Ensure every catalogue collection and index exists and that `account`
    /// is present.
    ///
    /// Safe to call any number of times; existing collections, indexes and
    /// accounts are never modified.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Fatal`] on connection, permission or
    /// per-call timeout failures and [`ProvisioningError::DeadlineExceeded`]
    /// when the run outlives its deadline. Other failures are recorded in
    /// [`ProvisioningReport::failures`].
    pub async fn ensure_schema(
        &self,
        account: &NewUser,
    ) -> Result<ProvisioningReport, ProvisioningError> {
        let deadline = self.config.run_deadline;
        tokio::time::timeout(deadline, self.converge(account))
            .await
            .unwrap_or_else(|_| {
                error!(deadline_secs = deadline.as_secs(), "provisioning deadline exceeded");
                Err(ProvisioningError::DeadlineExceeded { deadline })
            })
    }

    async fn converge(&self, account: &NewUser) -> Result<ProvisioningReport, ProvisioningError> {
        let mut report = ProvisioningReport::default();

        let existing = self.existing_collections().await?;
        for spec in self.catalog.collections() {
            self.ensure_collection(spec, existing.as_ref(), &mut report)
                .await?;
        }
        for spec in self.catalog.indexes() {
            self.ensure_index(spec, &mut report).await?;
        }
        self.ensure_account(account, &mut report).await?;
        report.verification = self.verify().await;

        info!(
            failures = report.failures.len(),
            "provisioning run completed"
        );
        Ok(report)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<T, StorageError> {
        let limit = self.config.call_timeout;
        tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
            Err(StorageError::timed_out(format!(
                "no response within {}s",
                limit.as_secs()
            )))
        })
    }

    async fn existing_collections(&self) -> Result<Option<HashSet<String>>, ProvisioningError> {
        let step = ProvisioningStep::ListCollections;
        match self.bounded(self.schema_admin.list_collection_names()).await {
            Ok(names) => Ok(Some(names.into_iter().collect())),
            Err(err) if err.is_fatal() => Err(fatal(step, "database", err)),
            Err(err) => {
                warn!(
                    step = %step,
                    error = %err,
                    "collection listing failed; attempting to create every collection"
                );
                Ok(None)
            }
        }
    }

    async fn ensure_collection(
        &self,
        spec: &CollectionSpec,
        existing: Option<&HashSet<String>>,
        report: &mut ProvisioningReport,
    ) -> Result<(), ProvisioningError> {
        let step = ProvisioningStep::CreateCollection;
        let outcome = if existing.is_some_and(|names| names.contains(spec.name)) {
            StepOutcome::AlreadyPresent
        } else {
            match self.bounded(self.schema_admin.create_collection(spec)).await {
                Ok(()) => StepOutcome::Created,
                Err(err) if err.is_already_exists() => StepOutcome::AlreadyPresent,
                Err(err) => return absorb_failure(report, step, spec.name, err),
            }
        };

        info!(
            step = %step,
            collection = spec.name,
            outcome = outcome.as_str(),
            "collection ensured"
        );
        report.collections.push(CollectionOutcome {
            name: spec.name.to_owned(),
            outcome,
        });
        Ok(())
    }

    async fn ensure_index(
        &self,
        spec: &IndexSpec,
        report: &mut ProvisioningReport,
    ) -> Result<(), ProvisioningError> {
        let step = ProvisioningStep::CreateIndex;
        let outcome = match self.bounded(self.schema_admin.create_index(spec)).await {
            Ok(()) => StepOutcome::Created,
            Err(err) if err.is_already_exists() => StepOutcome::AlreadyPresent,
            Err(err) => return absorb_failure(report, step, &spec.qualified_name(), err),
        };

        info!(
            step = %step,
            collection = spec.collection,
            index = spec.name,
            outcome = outcome.as_str(),
            "index ensured"
        );
        report.indexes.push(IndexOutcome {
            collection: spec.collection.to_owned(),
            name: spec.name.to_owned(),
            outcome,
        });
        Ok(())
    }

    async fn ensure_account(
        &self,
        account: &NewUser,
        report: &mut ProvisioningReport,
    ) -> Result<(), ProvisioningError> {
        let step = ProvisioningStep::BootstrapAccount;
        let email = account.email.as_str();
        match self.bounded(self.accounts.insert_user_if_absent(account)).await {
            Ok(written) => {
                info!(
                    step = %step,
                    email,
                    outcome = written.status.as_str(),
                    "bootstrap account ensured"
                );
                report.account = Some(AccountReport {
                    email: email.to_owned(),
                    status: written.status,
                });
                Ok(())
            }
            Err(err) => absorb_failure(report, step, email, err),
        }
    }

    async fn verify(&self) -> Verification {
        let step = ProvisioningStep::Verify;
        let collections = self
            .bounded(self.schema_admin.list_collection_names())
            .await
            .map(|mut names| {
                names.sort();
                names
            })
            .inspect_err(|err| warn!(step = %step, error = %err, "collection listing failed"))
            .ok();

        let mut summaries = Vec::with_capacity(self.catalog.collections().len());
        for spec in self.catalog.collections() {
            let document_count = self
                .bounded(self.schema_admin.count_documents(spec.name))
                .await
                .inspect_err(|err| {
                    warn!(step = %step, collection = spec.name, error = %err, "document count failed");
                })
                .ok();
            let index_count = self
                .bounded(self.schema_admin.list_index_names(spec.name))
                .await
                .map(|names| names.len())
                .inspect_err(|err| {
                    warn!(step = %step, collection = spec.name, error = %err, "index listing failed");
                })
                .ok();
            summaries.push(CollectionSummary {
                name: spec.name.to_owned(),
                document_count,
                index_count,
            });
        }

        Verification {
            collections,
            summaries,
        }
    }
}

fn fatal(step: ProvisioningStep, target: &str, source: StorageError) -> ProvisioningError {
    error!(step = %step, object = target, error = %source, "fatal provisioning failure");
    ProvisioningError::Fatal {
        step,
        target: target.to_owned(),
        source,
    }
}

/// Record a non-fatal failure, or escalate a fatal one.
fn absorb_failure(
    report: &mut ProvisioningReport,
    step: ProvisioningStep,
    target: &str,
    err: StorageError,
) -> Result<(), ProvisioningError> {
    if err.is_fatal() {
        return Err(fatal(step, target, err));
    }

    warn!(step = %step, object = target, error = %err, "provisioning step failed; continuing");
    report.failures.push(StepFailure {
        step,
        target: target.to_owned(),
        kind: err.kind(),
        message: err.to_string(),
    });
    Ok(())
}

#[cfg(test)]
#[path = "provisioner_tests.rs"]
mod tests;
