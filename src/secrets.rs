use std::fmt;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::config::Region;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::SecretConfig;
use crate::error::ApiError;

/// Database login stored in the secret store as `{"username": .., "password": ..}`.
#[derive(Clone, Deserialize)]
pub struct DbCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl DbCredentials {
    pub fn from_secret_string(secret: &str) -> Result<Self, ApiError> {
        let credentials: DbCredentials = serde_json::from_str(secret)
            .map_err(|e| ApiError::secret(format!("secret is not a username/password object: {}", e)))?;

        if credentials.username.trim().is_empty() {
            return Err(ApiError::secret("secret has an empty username"));
        }

        Ok(credentials)
    }
}

/// Source of opaque secret strings addressed by name.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn secret_string(&self, secret_id: &str) -> Result<String, ApiError>;

    /// Fetches `secret_id` and decodes it as database credentials.
    async fn db_credentials(&self, secret_id: &str) -> Result<DbCredentials, ApiError> {
        let secret = self.secret_string(secret_id).await?;
        DbCredentials::from_secret_string(&secret)
    }
}

/// AWS Secrets Manager backed store.
#[derive(Clone)]
pub struct SecretsManagerStore {
    client: aws_sdk_secretsmanager::Client,
}

impl SecretsManagerStore {
    pub fn new(client: aws_sdk_secretsmanager::Client) -> Self {
        SecretsManagerStore { client }
    }

    /// Builds the SDK client once per cold start for the configured region.
    pub async fn from_config(config: &SecretConfig) -> Self {
        info!("Creating Secrets Manager client for region: {}", config.region);

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self::new(aws_sdk_secretsmanager::Client::new(&sdk_config))
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn secret_string(&self, secret_id: &str) -> Result<String, ApiError> {
        debug!("Fetching secret {}", secret_id);

        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                ApiError::secret(format!(
                    "GetSecretValue failed for {}: {}",
                    secret_id,
                    aws_sdk_secretsmanager::error::DisplayErrorContext(&e)
                ))
            })?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| ApiError::secret(format!("secret {} has no string value", secret_id)))
    }
}
