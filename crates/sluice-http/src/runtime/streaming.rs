//! Server-sent events for long-running agent executions.
//!
//! Keeps the event-enum/`Sse`/`KeepAlive` shape of the original streaming
//! module; what's new is a distinguished `aborted` event carrying the
//! lifecycle core's `AbortSignal` whenever a hook stops an execution
//! mid-stream.

use axum::{
    BoxError,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use sluice_core::AbortSignal;
use std::time::Duration;
use tokio_stream::{StreamExt, wrappers::ReceiverStream};

/// Agent execution update types sent over the SSE stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AgentUpdate {
    /// Agent started processing.
    Started {
        session_id: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// Agent produced intermediate output.
    Partial {
        session_id: String,
        content: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// Agent completed processing.
    Completed {
        session_id: String,
        final_response: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// The execution was aborted before completing.
    Aborted {
        session_id: String,
        reason: String,
        state_saved: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// Keep-alive ping.
    Ping {
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl AgentUpdate {
    /// Build the `Aborted` update from the core's `AbortSignal`.
    pub fn from_abort_signal(signal: &AbortSignal) -> Self {
        AgentUpdate::Aborted {
            session_id: signal.session_key.to_string(),
            reason: signal.reason.clone(),
            state_saved: signal.state_saved,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Create a Server-Sent Events stream from agent updates, tagging each
/// event's SSE `event:` field with its variant name so clients can dispatch
/// without parsing the JSON body first.
pub fn create_sse_stream(
    updates: tokio::sync::mpsc::Receiver<AgentUpdate>,
) -> Sse<impl Stream<Item = Result<Event, BoxError>>> {
    let stream = ReceiverStream::new(updates).map(|update| {
        let event_type = match &update {
            AgentUpdate::Started { .. } => "started",
            AgentUpdate::Partial { .. } => "partial",
            AgentUpdate::Completed { .. } => "completed",
            AgentUpdate::Aborted { .. } => "aborted",
            AgentUpdate::Ping { .. } => "ping",
        };

        let json_data = serde_json::to_string(&update).map_err(|e| Box::new(e) as BoxError)?;

        Ok(Event::default()
            .event(event_type)
            .data(json_data)
            .id(uuid::Uuid::new_v4().to_string()))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(10))
            .text("keep-alive"),
    )
}

/// Sender half handed to a running execution so it can report updates
/// (including its own abort) to the SSE stream.
#[derive(Clone)]
pub struct StreamingAgentExecutor {
    pub update_sender: tokio::sync::mpsc::Sender<AgentUpdate>,
}

impl StreamingAgentExecutor {
    pub fn new() -> (Self, tokio::sync::mpsc::Receiver<AgentUpdate>) {
        let (tx, rx) = tokio::sync::mpsc::channel(100);
        (Self { update_sender: tx }, rx)
    }

    pub async fn send_update(
        &self,
        update: AgentUpdate,
    ) -> Result<(), tokio::sync::mpsc::error::SendError<AgentUpdate>> {
        self.update_sender.send(update).await
    }

    /// Report that the execution was aborted.
    pub async fn aborted(&self, signal: &AbortSignal) {
        let _ = self.send_update(AgentUpdate::from_abort_signal(signal)).await;
    }

    /// Report partial output.
    pub async fn partial(&self, session_id: &str, content: &str) {
        let _ = self
            .send_update(AgentUpdate::Partial {
                session_id: session_id.to_string(),
                content: content.to_string(),
                timestamp: chrono::Utc::now(),
            })
            .await;
    }
}

impl Default for StreamingAgentExecutor {
    fn default() -> Self {
        Self::new().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::SessionId;

    #[tokio::test]
    async fn abort_signal_becomes_aborted_update() {
        let (executor, mut receiver) = StreamingAgentExecutor::new();
        let session = SessionId::generate();
        let signal = AbortSignal::new(session.clone(), "drain", true);

        executor.aborted(&signal).await;

        let update = receiver.recv().await.unwrap();
        match update {
            AgentUpdate::Aborted {
                session_id,
                state_saved,
                ..
            } => {
                assert_eq!(session_id, session.to_string());
                assert!(state_saved);
            }
            _ => panic!("expected an Aborted update"),
        }
    }

    #[tokio::test]
    async fn partial_and_completed_updates_roundtrip_json() {
        let (executor, mut receiver) = StreamingAgentExecutor::new();
        executor.partial("sess-1", "working...").await;

        let update = receiver.recv().await.unwrap();
        let json = serde_json::to_string(&update).unwrap();
        let decoded: AgentUpdate = serde_json::from_str(&json).unwrap();
        match decoded {
            AgentUpdate::Partial { session_id, content, .. } => {
                assert_eq!(session_id, "sess-1");
                assert_eq!(content, "working...");
            }
            _ => panic!("expected a Partial update"),
        }
    }

    #[tokio::test]
    async fn sse_stream_consumes_receiver_without_panicking() {
        let (executor, receiver) = StreamingAgentExecutor::new();
        let _sse = create_sse_stream(receiver);

        executor
            .send_update(AgentUpdate::Started {
                session_id: "sess-1".to_string(),
                timestamp: chrono::Utc::now(),
            })
            .await
            .unwrap();
    }
}
