//! `POST /v1/agent/run` — the single request/resume endpoint.
//!
//! Session id synthesis and the resume path are transparent to the caller:
//! an absent or unparseable `session_id` starts a fresh session, and a
//! present one silently resumes whatever `sluice-memory` has on record for
//! it (including replaying the interrupted-marker system message via the
//! hook, regardless of `payload`).

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use sluice_core::lifecycle::RequestContext;
use sluice_core::{LifecycleError, SessionId};
use std::sync::Arc;
use tracing::{info, warn};

use crate::runtime::AppState;
use crate::runtime::agent::AgentHandleAdapter;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::hook::AgentAbortHook;

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub session_id: String,
    pub result: serde_json::Value,
}

pub async fn run_agent(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> RuntimeResult<Json<RunResponse>> {
    let session_id = request
        .session_id
        .as_deref()
        .and_then(|raw| match SessionId::parse(raw) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(raw, error = %e, "invalid session id, starting a fresh session");
                None
            }
        })
        .unwrap_or_else(SessionId::generate);

    if !state.controller.is_accepting() {
        return Err(RuntimeError::from(LifecycleError::NotAccepting {
            state: state.controller.current_state().as_str(),
        }));
    }

    let agent = state.agent_factory.create();

    if agent.load_if_exists(state.store.as_ref()).await? {
        info!(session = %session_id, "resuming session from saved state");
    }

    let context = Arc::new(RequestContext::new(
        session_id.clone(),
        state.agent_id.clone(),
        Arc::new(AgentHandleAdapter(agent.clone())),
        state.store.clone(),
    ));

    // Registration happens lazily, from inside the hook, on the agent's
    // first reasoning step -- not here on request arrival. The agent calls
    // `hook.complete()` itself once it stops, successfully or not.
    let hook = Arc::new(AgentAbortHook::new(state.controller, context.clone()));

    let result = agent.run(context.clone(), hook, request.payload).await;
    state.controller.unregister(&session_id);

    let result = result?;
    Ok(Json(RunResponse {
        session_id: session_id.to_string(),
        result,
    }))
}
