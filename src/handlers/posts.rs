// Blog post retrieval handler
// One invocation: event -> credentials -> connection -> query -> response

use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    db::{PostConnection, PostConnector},
    error::ApiResult,
    models::{
        event::GatewayEvent,
        post::BlogPost,
        response::ApiResponse,
        search::SearchRequest,
    },
    query::PostQuery,
    secrets::SecretStore,
};

/// Serves blog post requests against a secret store and a database connector.
pub struct BlogPostsHandler<S, C> {
    secrets: S,
    connector: C,
    secret_name: String,
}

impl<S, C> BlogPostsHandler<S, C>
where
    S: SecretStore,
    C: PostConnector,
{
    pub fn new(secrets: S, connector: C, secret_name: impl Into<String>) -> Self {
        BlogPostsHandler {
            secrets,
            connector,
            secret_name: secret_name.into(),
        }
    }

    /// Handles one raw event.
    ///
    /// Only an event that cannot be read is returned as `Err`; every other failure
    /// is turned into a 500 response.
    pub async fn handle(&self, payload: Value) -> ApiResult<ApiResponse> {
        let event = GatewayEvent::from_value(payload).map_err(|e| {
            error!("Rejecting malformed event: {}", e);
            e
        })?;

        if event.is_preflight() {
            info!("Answering CORS preflight");
            return Ok(ApiResponse::preflight());
        }

        let search = SearchRequest::from_query_parameters(event.query_string_parameters.as_ref());

        match self.retrieve(search.as_ref()).await {
            Ok(posts) => {
                info!("Returning {} blog posts", posts.len());
                Ok(ApiResponse::posts(posts))
            }
            Err(e) => Ok(e.into_response()),
        }
    }

    async fn retrieve(&self, search: Option<&SearchRequest>) -> ApiResult<Vec<BlogPost>> {
        info!("Getting DB credentials");
        let credentials = self.secrets.db_credentials(&self.secret_name).await?;

        info!("Attempting to connect to the DB");
        let mut connection = self.connector.connect(&credentials).await?;

        let outcome = run_query(&mut connection, search).await;

        // Close on every path once the connection exists; a close failure never
        // changes the response.
        if let Err(e) = connection.close().await {
            warn!("Error closing connection: {}", e);
        }

        outcome
    }
}

async fn run_query<T: PostConnection>(
    connection: &mut T,
    search: Option<&SearchRequest>,
) -> ApiResult<Vec<BlogPost>> {
    let query = PostQuery::for_request(search)?;
    let result_set = connection.fetch_posts(&query).await?;
    Ok(BlogPost::from_result_set(result_set))
}
