use async_trait::async_trait;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::DatabaseConfig;
use crate::error::ApiError;
use crate::models::post::BlogPost;
use crate::query::PostQuery;
use crate::secrets::DbCredentials;

/// Opens one database connection per invocation. There is no pool.
#[async_trait]
pub trait PostConnector: Send + Sync {
    type Connection: PostConnection;

    async fn connect(&self, credentials: &DbCredentials) -> Result<Self::Connection, ApiError>;
}

/// An open connection that can run the blog post query.
#[async_trait]
pub trait PostConnection: Send {
    /// Runs `query` and projects each row.
    /// `Ok(None)` means the statement produced no result set at all.
    async fn fetch_posts(&mut self, query: &PostQuery) -> Result<Option<Vec<BlogPost>>, ApiError>;

    /// Releases the connection. Consumes it, so a connection closes at most once.
    async fn close(self) -> Result<(), ApiError>;
}

/// Connects to PostgreSQL over TLS with the configured endpoint.
#[derive(Clone)]
pub struct PgConnector {
    config: DatabaseConfig,
    tls: MakeTlsConnector,
}

impl PgConnector {
    /// The TLS connector is built once and reused by every connection attempt.
    /// Certificate checks follow `config.ssl_mode`: `prefer`/`require` only encrypt.
    pub fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        let tls_connector = TlsConnector::builder()
            .danger_accept_invalid_certs(!config.ssl_mode.verifies_certificate())
            .danger_accept_invalid_hostnames(!config.ssl_mode.verifies_hostname())
            .build()
            .map_err(|e| {
                error!("Failed to create TLS connector: {}", e);
                ApiError::Config(format!("TLS connector creation failed: {}", e))
            })?;

        Ok(PgConnector {
            config,
            tls: MakeTlsConnector::new(tls_connector),
        })
    }
}

#[async_trait]
impl PostConnector for PgConnector {
    type Connection = PgConnection;

    async fn connect(&self, credentials: &DbCredentials) -> Result<PgConnection, ApiError> {
        info!(
            "Connecting to PostgreSQL at {}:{}/{}",
            self.config.host, self.config.port, self.config.database
        );

        let pg_config = self
            .config
            .to_pg_config(&credentials.username, &credentials.password);

        let (client, connection) = pg_config
            .connect(self.tls.clone())
            .await
            .map_err(|e| ApiError::connection(format!("connect failed: {}", e)))?;

        // The driver future owns the socket and finishes once the client is dropped.
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {}", e);
            }
        });

        debug!("Connected to PostgreSQL");
        Ok(PgConnection {
            client,
            driver: Some(driver),
        })
    }
}

/// A live PostgreSQL session.
///
/// Dropping it without calling [`PostConnection::close`] still tears the session
/// down by aborting the driver task.
pub struct PgConnection {
    client: tokio_postgres::Client,
    driver: Option<JoinHandle<()>>,
}

#[async_trait]
impl PostConnection for PgConnection {
    async fn fetch_posts(&mut self, query: &PostQuery) -> Result<Option<Vec<BlogPost>>, ApiError> {
        debug!(sql = query.sql(), params = query.params().len(), "Executing blog post query");

        let rows = self
            .client
            .query(query.sql(), &query.bind_params())
            .await
            .map_err(ApiError::from)?;

        let posts = rows
            .iter()
            .map(BlogPost::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ApiError::from)?;

        Ok(Some(posts))
    }

    async fn close(mut self) -> Result<(), ApiError> {
        let driver = self.driver.take();
        // Dropping the client sends Terminate and lets the driver future finish.
        drop(self);

        if let Some(driver) = driver {
            driver
                .await
                .map_err(|e| ApiError::connection(format!("connection task did not shut down cleanly: {}", e)))?;
        }

        debug!("PostgreSQL connection closed");
        Ok(())
    }
}

impl Drop for PgConnection {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}
