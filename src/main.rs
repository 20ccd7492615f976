//! Signage Studio
//!
//! Desktop editor for digital-signage canvases: place images and videos on a
//! fixed-size canvas, give each a display slot on a timeline, and preview the
//! slideshow.

mod app;
mod components;
mod constants;
mod core;
mod hotkeys;
mod providers;
mod state;
mod timeline;
mod utils;

use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    // Missing .env is fine; the local store needs no configuration.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("signage_studio=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new()
        .with_window(
            WindowBuilder::new()
                .with_title("Signage Studio")
                .with_inner_size(LogicalSize::new(1440.0, 900.0))
                .with_resizable(true),
        )
        .with_menu(None);

    dioxus::LaunchBuilder::desktop().with_cfg(config).launch(app::App);
}
