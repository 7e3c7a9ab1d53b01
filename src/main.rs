//! BuddyBeam - Main Entry Point
//!
//! Initializes logging and configuration, picks the platform (remote
//! backend, or the in-memory demo when `BUDDYBEAM_OFFLINE=1`), and runs the
//! eframe application.

use eframe::egui;
use tracing_subscriber::EnvFilter;

use buddybeam::app::theme::styles;
use buddybeam::app::{views, AppState, Config};
use buddybeam::platform::memory::MemoryPlatform;
use buddybeam::platform::remote::RemotePlatform;
use buddybeam::platform::Platform;
use buddybeam::shared::session::Session;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load();
    if config.offline() {
        tracing::info!("starting BuddyBeam against the in-memory demo platform");
    } else {
        tracing::info!("starting BuddyBeam against {}", config.server_url());
    }
    let platform = build_platform(&config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([600.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "BuddyBeam",
        options,
        Box::new(move |cc| {
            styles::apply_global_theme(&cc.egui_ctx);
            Ok(Box::new(BuddyBeamApp {
                state: AppState::new(config, platform),
            }))
        }),
    )
}

fn build_platform(config: &Config) -> Platform {
    if config.offline() {
        MemoryPlatform::new(demo_session()).into_platform()
    } else {
        RemotePlatform::connect(config.server_url())
    }
}

/// The profile activated by sign-in when running without a backend.
fn demo_session() -> Session {
    Session {
        user_id: "demo-pilot".to_string(),
        display_name: "Demo Pilot".to_string(),
        photo_url: None,
        email: "demo@buddybeam.local".to_string(),
    }
}

/// Main application state
struct BuddyBeamApp {
    state: AppState,
}

impl eframe::App for BuddyBeamApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll();

        views::render_top_bar(ctx, &mut self.state);
        views::render_notifications(ctx, &mut self.state);
        views::render_main_panel(ctx, &mut self.state);

        // Channel senders cannot wake the UI thread; keep frames coming so
        // poll() sees new snapshots and results promptly.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
