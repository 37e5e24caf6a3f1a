// SPDX-License-Identifier: MIT OR Apache-2.0
//! Agent Studio - visual editor for multi-agent workflows
//!
//! Components are dragged from the palette onto a canvas, wired together by
//! dragging between connectors, and agent nodes are configured in a side
//! panel opened by double-clicking them.
//!
//! ## Architecture
//!
//! The canvas, graph store and configuration panel live in
//! `agent_studio_graph`. This crate hosts them in a winit window rendered with
//! egui-wgpu and adds the surrounding chrome.

mod app;
mod chrome;
mod settings;

use app::StudioApp;
use settings::{StudioSettings, SETTINGS_FILE_NAME};
use std::path::Path;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Directives added on top of `RUST_LOG`
const DEFAULT_DIRECTIVES: &[&str] = &["agent_studio=debug", "wgpu=warn", "naga=warn"];

fn main() {
    let env_filter = DEFAULT_DIRECTIVES
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(tracing_subscriber::EnvFilter::from_default_env(), |filter, directive| {
            filter.add_directive(directive)
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Agent Studio v{}", env!("CARGO_PKG_VERSION"));

    let settings = StudioSettings::load_or_default(Path::new(SETTINGS_FILE_NAME));

    if let Err(e) = StudioApp::run(settings) {
        tracing::error!("Studio crashed: {e}");
        std::process::exit(1);
    }
}
