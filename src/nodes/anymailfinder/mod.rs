//! Anymailfinder node - find and verify email addresses.
//!
//! Each item runs validate → build → call → emit:
//! parameters are rendered against the item, resolved into an [`Action`],
//! sent through the [`ApiClient`], and the response is returned unmodified.

mod action;
mod description;
mod parameters;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::template::render_value;
use super::types::{Node, NodeContext, NodeResult};
use crate::client::{ApiClient, HttpApiClient};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::metrics;

pub use action::{
    Action, CompanyIdentifier, CompanyLookup, DecisionMakerLookup, EmailVerification,
    LinkedinLookup, Operation, PersonLookup, PersonName, Resource,
};
pub use description::{describe, NodeDescription};
pub use parameters::{AdditionalFields, NodeParameters, DEFAULT_LIMIT};

/// Node type name hosts register this node under.
pub const NODE_TYPE: &str = "anymailFinder";

/// Anymailfinder API node.
#[derive(Clone)]
pub struct AnymailfinderNode {
    client: Arc<dyn ApiClient>,
}

impl AnymailfinderNode {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self { client }
    }

    /// Build the node with a reqwest client from API configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpApiClient::from_config(config)?)))
    }

    /// Render and validate the parameters for one item without calling the API.
    pub fn resolve(&self, config: &Value, ctx: &NodeContext) -> Result<Action> {
        let rendered = render_value(config, ctx);
        NodeParameters::from_value(rendered, ctx.item_index)?.into_action(ctx.item_index)
    }
}

#[async_trait]
impl Node for AnymailfinderNode {
    fn node_type(&self) -> &str {
        NODE_TYPE
    }

    fn description(&self) -> &str {
        "Find and verify email addresses using Anymailfinder API"
    }

    #[instrument(
        name = "anymailfinder.execute",
        skip(self, config, ctx),
        fields(execution_id = %ctx.execution_id, item_index = ctx.item_index)
    )]
    async fn execute(&self, config: &Value, ctx: &NodeContext) -> Result<NodeResult> {
        let item_index = ctx.item_index;
        let action = self.resolve(config, ctx)?;
        let resource = action.resource();
        let request = action.to_request().map_err(|e| e.at_item(item_index))?;

        debug!(
            resource = %resource,
            operation = %action.operation(),
            "Dispatching Anymailfinder request"
        );

        let start = Instant::now();
        let outcome = self.client.send(&request).await;
        let duration = start.elapsed();
        metrics::record_request_duration(duration, resource.as_str());

        let data = match outcome {
            Ok(data) => {
                metrics::record_request(resource.as_str(), "success");
                data
            }
            Err(e) => {
                let status = match &e {
                    Error::Api { status, .. } => status.to_string(),
                    _ => "error".to_string(),
                };
                metrics::record_request(resource.as_str(), &status);
                return Err(e.at_item(item_index));
            }
        };

        Ok(NodeResult::with_metadata(
            data,
            json!({
                "resource": resource.as_str(),
                "operation": action.operation().as_str(),
                "duration_ms": duration.as_millis() as u64,
            }),
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::client::ApiRequest;
    use reqwest::Method;
    use std::sync::Mutex;

    /// Records every request and answers from a canned response function.
    pub(crate) struct RecordingClient {
        pub requests: Mutex<Vec<ApiRequest>>,
        respond: Box<dyn Fn(&ApiRequest) -> Result<Value> + Send + Sync>,
    }

    impl RecordingClient {
        pub fn new(respond: impl Fn(&ApiRequest) -> Result<Value> + Send + Sync + 'static) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            }
        }

        pub fn ok(response: Value) -> Self {
            Self::new(move |_| Ok(response.clone()))
        }

        pub fn sent(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiClient for RecordingClient {
        async fn send(&self, request: &ApiRequest) -> Result<Value> {
            self.requests.lock().unwrap().push(request.clone());
            (self.respond)(request)
        }
    }

    fn node(client: &Arc<RecordingClient>) -> AnymailfinderNode {
        AnymailfinderNode::new(client.clone())
    }

    #[tokio::test]
    async fn test_account_info_passthrough() {
        let response = json!({"credits_available": 420, "email": "me@acme.com"});
        let client = Arc::new(RecordingClient::ok(response.clone()));
        let ctx = NodeContext::new("exec-1");

        let result = node(&client)
            .execute(&json!({"resource": "accountInfo", "operation": "getInfo"}), &ctx)
            .await
            .unwrap();

        assert_eq!(result.data, response);
        assert_eq!(result.metadata["resource"], "accountInfo");
        assert_eq!(
            client.sent(),
            vec![ApiRequest {
                method: Method::GET,
                path: "/v5.0/meta/account.json",
                body: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_linkedin_request() {
        let client = Arc::new(RecordingClient::ok(json!({"email": "x@acme.com"})));
        let ctx = NodeContext::new("exec-1");

        node(&client)
            .execute(
                &json!({
                    "resource": "linkedinEmail",
                    "operation": "findEmail",
                    "linkedinUrl": "https://linkedin.com/in/x"
                }),
                &ctx,
            )
            .await
            .unwrap();

        let sent = client.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::POST);
        assert_eq!(sent[0].path, "/v5.1/find-email/linkedin-url");
        assert_eq!(
            sent[0].body,
            Some(json!({"linkedin_url": "https://linkedin.com/in/x"}))
        );
    }

    #[tokio::test]
    async fn test_validation_happens_before_network() {
        let client = Arc::new(RecordingClient::ok(json!({})));
        let ctx = NodeContext::new("exec-1").for_item(json!({}), 3);

        let err = node(&client)
            .execute(
                &json!({"resource": "decisionMaker", "domain": "{{ input.domain }}"}),
                &ctx,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingIdentifier { item_index: 3 }));
        assert!(client.sent().is_empty());
    }

    #[tokio::test]
    async fn test_parameters_rendered_from_item() {
        let client = Arc::new(RecordingClient::ok(json!({"email": "jane@acme.com"})));
        let ctx = NodeContext::new("exec-1").for_item(
            json!({"first": "Jane", "last": "Doe", "company": "acme.com"}),
            0,
        );

        node(&client)
            .execute(
                &json!({
                    "resource": "personEmail",
                    "fullName": "{{ input.first }} {{ input.last }}",
                    "domain": "{{ input.company }}"
                }),
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(
            client.sent()[0].body,
            Some(json!({"full_name": "Jane Doe", "domain": "acme.com"}))
        );
    }

    #[tokio::test]
    async fn test_api_failure_becomes_request_error() {
        let client = Arc::new(RecordingClient::new(|_| {
            Err(Error::Api {
                status: 402,
                body: "{\"error\":\"no_credits\"}".to_string(),
            })
        }));
        let ctx = NodeContext::new("exec-1").for_item(json!({}), 5);

        let err = node(&client)
            .execute(
                &json!({"resource": "emailVerification", "email": "jane@acme.com"}),
                &ctx,
            )
            .await
            .unwrap_err();

        match err {
            Error::Request {
                item_index,
                status,
                message,
            } => {
                assert_eq!(item_index, 5);
                assert_eq!(status, Some(402));
                assert!(message.contains("no_credits"));
            }
            other => panic!("expected request error, got {:?}", other),
        }
    }

    #[test]
    fn test_node_type() {
        let client = Arc::new(RecordingClient::ok(json!({})));
        let node = node(&client);
        assert_eq!(node.node_type(), "anymailFinder");
        assert!(node.description().contains("Anymailfinder"));
    }
}
