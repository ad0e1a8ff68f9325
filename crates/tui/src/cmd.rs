//! # Command Execution Layer
//!
//! This module translates application effects (`Effect`) into imperative
//! commands (`Cmd`) and executes them. It is the boundary where the pure
//! state updates of the app meet side effects such as HTTP requests.
//!
//! ## Design
//! - [`Cmd`] is the effectful command type.
//! - [`from_effects`] translates state-driven [`Effect`]s into [`Cmd`]s.
//! - [`run_cmds`] spawns each command and hands back the join handles so the
//!   runtime can await them next to terminal input.
//!
//! Navigation effects (modals) never reach this module; the runtime applies
//! them directly.

use composer_api::{ApiError, CompositionClient};
use composer_types::{CompositionPayload, Effect, ExecOutcome};
use tokio::task::{JoinHandle, spawn};
use tracing::{info, warn};

use crate::app::App;

/// Side-effectful commands executed outside of pure state updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// POST a composition to the server.
    SaveComposition(CompositionPayload),
}

/// Convert application [`Effect`]s into [`Cmd`] instances.
pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::SubmitComposition(payload) => Some(Cmd::SaveComposition(payload)),
            Effect::ShowModal(_) | Effect::CloseModal => None,
        })
        .collect()
}

/// Spawn every command on the Tokio runtime.
pub fn run_cmds(app: &App, commands: Vec<Cmd>) -> Vec<JoinHandle<ExecOutcome>> {
    commands
        .into_iter()
        .map(|command| match command {
            Cmd::SaveComposition(payload) => {
                let client = app.ctx.client.clone();
                spawn(async move { execute_save_composition(&client, &payload).await })
            }
        })
        .collect()
}

/// Convenience wrapper used by the runtime.
pub fn run_from_effects(app: &App, effects: Vec<Effect>) -> Vec<JoinHandle<ExecOutcome>> {
    run_cmds(app, from_effects(effects))
}

/// Send one composition and fold the result into an [`ExecOutcome`].
pub async fn execute_save_composition(client: &CompositionClient, payload: &CompositionPayload) -> ExecOutcome {
    let relation_count = payload.compositions.len();
    match client.save_composition(payload).await {
        Ok(response) => {
            info!(relation_count, status = %response.status, "composition accepted");
            ExecOutcome::CompositionSaved {
                status: response.status,
                relation_count,
            }
        }
        Err(error) => {
            warn!(%error, "composition request failed");
            ExecOutcome::CompositionFailed {
                message: failure_message(error),
            }
        }
    }
}

/// Error text for the status modal, ending with the innermost cause
/// ("connection refused", "operation timed out") when the summary omits it.
fn failure_message(error: ApiError) -> String {
    let error = anyhow::Error::from(error);
    let summary = error.to_string();
    let root = error.root_cause().to_string();
    if summary.contains(&root) {
        summary
    } else {
        format!("{summary}: {root}")
    }
}
