use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::compare::JsonComparator;
use crate::runner::ambient::{self, AmbientContext};
use crate::runner::error::RunnerError;
use crate::runner::failed::FailedInteraction;
use crate::runner::resolve::resolve_interactions;
use crate::runner::stream::plan::MessagePlan;
use crate::runner::stream::session::StreamSession;
use crate::runner::ScenarioRunner;
use crate::scenario::{FragmentLoader, Scenario, TurnRenderer};

pub const EVENT_USER_UTTERED: &str = "user_uttered";
pub const EVENT_BOT_UTTERED: &str = "bot_uttered";
pub const EVENT_SESSION_REQUEST: &str = "session_request";

pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(6);

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Streaming protocol: bot messages arrive as asynchronous events on a
/// dedicated websocket, zero or more per user message. The pre-rendered
/// plan is consumed entry by entry; a resettable deadline is the only
/// way to detect that the bot has stopped responding.
///
/// One connection per scenario - the backend correlates events to the
/// connection, not to a sender id in the payload.
pub struct StreamRunner {
    url: String,
    renderer: Arc<dyn TurnRenderer + Send + Sync>,
    fragments: Arc<dyn FragmentLoader + Send + Sync>,
    comparator: Arc<JsonComparator>,
    response_timeout: Duration,
}

impl StreamRunner {
    pub fn new(
        url: &str,
        renderer: Arc<dyn TurnRenderer + Send + Sync>,
        fragments: Arc<dyn FragmentLoader + Send + Sync>,
        comparator: Arc<JsonComparator>,
        response_timeout: Duration,
    ) -> Self {
        Self {
            url: url.to_string(),
            renderer,
            fragments,
            comparator,
            response_timeout,
        }
    }

    async fn send_envelope(
        &self,
        sink: &mut WsSink,
        scenario: &Scenario,
        event: &str,
        data: Value,
    ) -> Result<(), RunnerError> {
        let envelope = json!({ "event": event, "data": data });
        sink.send(Message::Text(envelope.to_string()))
            .await
            .map_err(|error| RunnerError::Transport {
                scenario: scenario.name.clone(),
                detail: format!("failed sending {event}: {error}"),
            })
    }

    async fn drive(
        &self,
        scenario: &Scenario,
        mut session: StreamSession,
    ) -> Result<Option<FailedInteraction>, RunnerError> {
        let (socket, _) =
            connect_async(self.url.as_str())
                .await
                .map_err(|error| RunnerError::Transport {
                    scenario: scenario.name.clone(),
                    detail: format!("failed to connect to {}: {error}", self.url),
                })?;
        let (mut sink, mut source) = socket.split();

        self.send_envelope(
            &mut sink,
            scenario,
            EVENT_SESSION_REQUEST,
            json!({ "session_id": session.session_id() }),
        )
        .await?;

        for message in session.take_user_sends() {
            self.send_envelope(&mut sink, scenario, EVENT_USER_UTTERED, message)
                .await?;
        }

        let outcome = loop {
            if session.failure().is_some() {
                break session.take_failure();
            }
            if session.is_drained() {
                break None;
            }

            // The deadline restarts on every pass, i.e. after each send
            // or received event.
            tokio::select! {
                incoming = source.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let envelope: EventEnvelope = serde_json::from_str(&text).map_err(
                            |error| RunnerError::Transport {
                                scenario: scenario.name.clone(),
                                detail: format!("malformed event payload: {error}"),
                            },
                        )?;
                        if envelope.event != EVENT_BOT_UTTERED {
                            debug!(
                                target: "stream_runner",
                                scenario = %scenario.name,
                                event = %envelope.event,
                                "ignoring non-bot event"
                            );
                            continue;
                        }
                        for message in session.on_event(&envelope.data) {
                            self.send_envelope(&mut sink, scenario, EVENT_USER_UTTERED, message)
                                .await?;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(RunnerError::Transport {
                            scenario: scenario.name.clone(),
                            detail: "connection closed with messages outstanding".to_string(),
                        });
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(error)) => {
                        return Err(RunnerError::Transport {
                            scenario: scenario.name.clone(),
                            detail: format!("websocket error: {error}"),
                        });
                    }
                },
                _ = sleep(self.response_timeout) => {
                    warn!(
                        target: "stream_runner",
                        scenario = %scenario.name,
                        drained = session.is_drained(),
                        "response deadline expired"
                    );
                    break session.timeout_failure();
                }
            }
        };

        if let Err(error) = sink.send(Message::Close(None)).await {
            debug!(target: "stream_runner", scenario = %scenario.name, %error, "close failed");
        }

        Ok(outcome)
    }
}

#[async_trait]
impl ScenarioRunner for StreamRunner {
    async fn run(&self, scenario: &Scenario) -> Result<Option<FailedInteraction>, RunnerError> {
        let session_id = ambient::sender_id(Utc::now(), &scenario.name);
        let ambient = AmbientContext::for_scenario(&session_id);
        let interactions = resolve_interactions(scenario, self.fragments.as_ref())?;
        let plan = MessagePlan::build(&interactions, self.renderer.as_ref(), ambient.variables())?;
        info!(
            target: "stream_runner",
            scenario = %scenario.name,
            entries = plan.len(),
            session_id = %session_id,
            "starting scenario"
        );

        let session = StreamSession::new(plan, session_id, Arc::clone(&self.comparator));
        self.drive(scenario, session).await
    }
}
