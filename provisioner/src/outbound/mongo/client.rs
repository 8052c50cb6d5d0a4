//! MongoDB client construction and connectivity checks.
//!
//! [`MongoHandle::connect`] parses the connection string, applies the
//! configured timeouts and pings the server before any adapter is built, so
//! an unreachable store fails fast with a connection error.

use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::info;

use super::error_mapping::map_mongo_error;
use crate::domain::ports::StorageError;

/// Default database holding the LMS collections.
pub const DEFAULT_DATABASE: &str = "scottlms";
/// Application name reported to the server.
pub const DEFAULT_APP_NAME: &str = "lms-provisioner";

/// Connection settings for the document store.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use provisioner::outbound::mongo::MongoConfig;
///
/// let config = MongoConfig::new("mongodb://localhost:27017")
///     .with_database("scottlms_dev")
///     .with_connect_timeout(Duration::from_secs(5));
/// assert_eq!(config.database(), "scottlms_dev");
/// ```
#[derive(Debug, Clone)]
pub struct MongoConfig {
    connection_string: String,
    database: String,
    app_name: String,
    connect_timeout: Duration,
    server_selection_timeout: Duration,
}

impl MongoConfig {
    /// Create a configuration for `connection_string`.
    ///
    /// Defaults: database `scottlms`, connect and server-selection timeouts
    /// of 10 seconds.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            database: DEFAULT_DATABASE.to_owned(),
            app_name: DEFAULT_APP_NAME.to_owned(),
            connect_timeout: Duration::from_secs(10),
            server_selection_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = timeout;
        self
    }

    /// Name of the target database.
    pub fn database(&self) -> &str {
        &self.database
    }
}

/// A connected client together with the target database handle.
#[derive(Debug, Clone)]
pub struct MongoHandle {
    client: Client,
    database: Database,
}

impl MongoHandle {
    /// Connect and verify the server answers a ping.
    ///
    /// # Errors
    ///
    /// Returns a classified [`StorageError`] when the connection string is
    /// invalid or the server cannot be reached.
    pub async fn connect(config: &MongoConfig) -> Result<Self, StorageError> {
        let mut options = ClientOptions::parse(&config.connection_string)
            .await
            .map_err(map_mongo_error)?;
        options.app_name = Some(config.app_name.clone());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.server_selection_timeout);

        let client = Client::with_options(options).map_err(map_mongo_error)?;
        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(map_mongo_error)?;

        info!(database = config.database.as_str(), "connected to document store");
        Ok(Self { client, database })
    }

    /// Handle for the target database, passed explicitly to adapters.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Close the client's connections.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}
