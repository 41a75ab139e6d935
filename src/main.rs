use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, info_span, Instrument};

use blog_post_retrieval::{
    config::Config,
    db::PgConnector,
    handlers::BlogPostsHandler,
    middleware::init_tracing,
    models::ApiResponse,
    secrets::{SecretStore, SecretsManagerStore},
    PostConnector,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize structured logging
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let connector = match PgConnector::new(config.database.clone()) {
        Ok(connector) => connector,
        Err(e) => {
            error!("Failed to prepare database connector: {}", e);
            std::process::exit(1);
        }
    };

    let secrets = SecretsManagerStore::from_config(&config.secret).await;
    let handler = BlogPostsHandler::new(secrets, connector, config.secret.name.clone());

    info!(
        "Serving blog posts from {}:{}/{} with secret {}",
        config.database.host, config.database.port, config.database.database, config.secret.name
    );

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| handle_event(&handler, event))).await
}

/// Runs one invocation inside a span tagged with the Lambda request id.
async fn handle_event<S, C>(
    handler: &BlogPostsHandler<S, C>,
    event: LambdaEvent<Value>,
) -> Result<ApiResponse, Error>
where
    S: SecretStore,
    C: PostConnector,
{
    let (payload, context) = event.into_parts();
    let span = info_span!("invocation", request_id = %context.request_id);

    let response = handler.handle(payload).instrument(span).await?;
    Ok(response)
}
