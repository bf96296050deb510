use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, header};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::compare::JsonComparator;
use crate::runner::ambient::{self, AmbientContext};
use crate::runner::error::RunnerError;
use crate::runner::failed::FailedInteraction;
use crate::runner::resolve::resolve_interactions;
use crate::runner::ScenarioRunner;
use crate::scenario::{FragmentLoader, Scenario, TurnRenderer};

pub const SENDER_FIELD_DEFAULT: &str = "sender";

/// Wire-level knobs the backend variants disagree on: the key carrying
/// the sender id, and an optional variable receiving the 1-based turn
/// index (used by flows that track a step id per exchange). One
/// parametrized protocol instead of one runner type per variant.
#[derive(Debug, Clone)]
pub struct RestProfile {
    pub sender_field: String,
    pub step_variable: Option<String>,
}

impl Default for RestProfile {
    fn default() -> Self {
        Self {
            sender_field: SENDER_FIELD_DEFAULT.to_string(),
            step_variable: None,
        }
    }
}

/// Request/response protocol: each user turn is one POST, answered by
/// exactly one synchronous bot response. Turns run strictly in order;
/// the first mismatch stops the scenario.
pub struct RestRunner {
    url: hyper::Uri,
    client: Client<HttpConnector, Full<Bytes>>,
    renderer: Arc<dyn TurnRenderer + Send + Sync>,
    fragments: Arc<dyn FragmentLoader + Send + Sync>,
    comparator: Arc<JsonComparator>,
    profile: RestProfile,
}

impl RestRunner {
    pub fn new(
        url: &str,
        renderer: Arc<dyn TurnRenderer + Send + Sync>,
        fragments: Arc<dyn FragmentLoader + Send + Sync>,
        comparator: Arc<JsonComparator>,
        profile: RestProfile,
    ) -> Result<Self, RunnerError> {
        let url: hyper::Uri = url.parse().map_err(|error| RunnerError::InvalidUrl {
            url: url.to_string(),
            detail: format!("{error}"),
        })?;

        let mut connector = HttpConnector::new();
        connector.set_nodelay(true);
        connector.set_keepalive(Some(Duration::from_secs(30)));
        connector.set_connect_timeout(Some(Duration::from_secs(5)));
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(30))
            .build(connector);

        Ok(Self {
            url,
            client,
            renderer,
            fragments,
            comparator,
            profile,
        })
    }

    async fn send_input(&self, scenario: &Scenario, input: &Value) -> Result<Value, RunnerError> {
        let transport = |detail: String| RunnerError::Transport {
            scenario: scenario.name.clone(),
            detail,
        };

        let body = serde_json::to_vec(input)
            .map_err(|error| transport(format!("failed to encode user input: {error}")))?;
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(|error| transport(format!("failed to build request: {error}")))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|error| transport(format!("failed sending user input {input}: {error}")))?;

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|error| transport(format!("failed reading response body: {error}")))?
            .to_bytes();

        if !status.is_success() {
            return Err(transport(format!(
                "server answered {status}: {}",
                String::from_utf8_lossy(&bytes)
            )));
        }

        serde_json::from_slice(&bytes).map_err(|error| {
            transport(format!(
                "{error}, server response received: {}",
                String::from_utf8_lossy(&bytes)
            ))
        })
    }

    fn build_user_input(
        &self,
        scenario: &Scenario,
        template: &str,
        sender_id: &str,
        rendered: Value,
    ) -> Result<Value, RunnerError> {
        let Value::Object(rendered_map) = rendered else {
            return Err(RunnerError::MalformedUserTurn {
                scenario: scenario.name.clone(),
                template: template.to_string(),
                detail: "expected a JSON object".to_string(),
            });
        };
        let mut input = Map::new();
        input.insert(
            self.profile.sender_field.clone(),
            Value::String(sender_id.to_string()),
        );
        input.extend(rendered_map);
        Ok(Value::Object(input))
    }
}

#[async_trait]
impl ScenarioRunner for RestRunner {
    async fn run(&self, scenario: &Scenario) -> Result<Option<FailedInteraction>, RunnerError> {
        let sender_id = ambient::sender_id(Utc::now(), &scenario.name);
        let ambient = AmbientContext::for_scenario(&sender_id);
        let interactions = resolve_interactions(scenario, self.fragments.as_ref())?;
        info!(
            target: "rest_runner",
            scenario = %scenario.name,
            turns = interactions.len(),
            sender_id = %sender_id,
            "starting scenario"
        );

        for (index, interaction) in interactions.iter().enumerate() {
            let ambient = match &self.profile.step_variable {
                Some(step_variable) => ambient
                    .clone()
                    .with_variable(step_variable, Value::from(index + 1)),
                None => ambient.clone(),
            };

            let rendered_user = self
                .renderer
                .render_user_turn(&interaction.user, ambient.variables())?;
            let user_input = self.build_user_input(
                scenario,
                &interaction.user.template,
                &sender_id,
                rendered_user,
            )?;

            let actual_output = self.send_input(scenario, &user_input).await?;
            let expected_output = self
                .renderer
                .render_bot_turn(&interaction.bot, ambient.variables())?;

            let diff = self.comparator.compare(&expected_output, &actual_output);
            if !diff.identical() {
                debug!(
                    target: "rest_runner",
                    scenario = %scenario.name,
                    turn = index + 1,
                    "bot output mismatch"
                );
                return Ok(Some(FailedInteraction {
                    user_input,
                    expected_output,
                    actual_output,
                    output_diff: diff,
                }));
            }
        }

        Ok(None)
    }
}
