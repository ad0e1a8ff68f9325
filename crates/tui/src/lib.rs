//! # Composer TUI Library
//!
//! This library provides the terminal form used to describe service
//! relations and submit them to the composition server.
//!
//! ## Key Features
//!
//! - Relations table with an inline editor for the selected row
//! - `after` / `on_value` relation select with a conditional expected value
//! - Optional polling interval
//! - Asynchronous submission with a blocking status notification
//! - Activity log of the session
//!
//! ## Architecture
//!
//! Each UI element (relation editor, activity log, status modal) is a
//! separate component that handles its own events and renders itself.
//! Components return `Effect`s; the runtime turns them into background tasks
//! and feeds the results back as `Msg`s.

mod app;
mod cmd;
mod ui;

use anyhow::Result;
use composer_api::CompositionClient;
use composer_types::{CompositionPayload, ValidationPolicy};

use crate::app::{App, SharedCtx};
use crate::ui::components::composition::CompositionFormState;

/// Everything the terminal form needs to start.
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Client used for `/save_composition`
    pub client: CompositionClient,
    pub policy: ValidationPolicy,
    /// Relations to prefill the form with
    pub draft: Option<CompositionPayload>,
}

/// Runs the terminal form until the user quits.
///
/// # Errors
///
/// Terminal setup or teardown failures (raw mode, alternate screen) and
/// drawing errors.
pub async fn run(config: TuiConfig) -> Result<()> {
    let TuiConfig { client, policy, draft } = config;
    let composition = match draft.as_ref() {
        Some(payload) => CompositionFormState::from_payload(payload, policy),
        None => CompositionFormState::new(policy),
    };
    let ctx = SharedCtx {
        theme: ui::theme::load(),
        client,
    };
    ui::runtime::run_app(App::new(ctx, composition)).await
}
