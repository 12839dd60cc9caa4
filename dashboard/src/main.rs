use std::sync::{Arc, OnceLock};

use anyhow::{anyhow, Result};
use eframe::egui;

use silicon_dashboard::app::{render::render, AppRuntime, AppState, UiEvent};
use silicon_dashboard::config;
use silicon_dashboard::debug_hooks::{self, LogTarget};
use silicon_dashboard::worker::Worker;
use silicon_synth::GeneratorConfig;

struct DashboardApp {
    runtime: AppRuntime,
    frame: u64,
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frame += 1;
        self.runtime.poll_worker();

        let mut events: Vec<UiEvent> = Vec::new();
        ctx.input(|i| {
            if i.key_pressed(egui::Key::ArrowRight) {
                events.push(UiEvent::TabSelected {
                    tab: self.runtime.state.selected_tab.next(),
                });
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                events.push(UiEvent::TabSelected {
                    tab: self.runtime.state.selected_tab.prev(),
                });
            }
        });

        let st = &self.runtime.state;
        debug_hooks::log_frame(self.frame, &st.selected_tab.to_string());
        render(ctx, st, &mut events);
        self.runtime.handle_ui_events(events);

        if self.runtime.state.loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

fn main() -> Result<()> {
    let loaded = config::load();
    let cfg = loaded.config;
    debug_hooks::init_tracing(&cfg.log_filter, LogTarget::Stderr);
    debug_hooks::log_config(&loaded.source);

    // The worker starts before the window exists; it wakes the UI once the
    // context has been handed over.
    let repaint: Arc<OnceLock<egui::Context>> = Arc::new(OnceLock::new());
    let notify_handle = Arc::clone(&repaint);
    let worker = Worker::spawn(
        GeneratorConfig::default(),
        Box::new(move || {
            if let Some(ctx) = notify_handle.get() {
                ctx.request_repaint();
            }
        }),
    )?;
    let runtime = AppRuntime::new(AppState::from_config(&cfg), worker);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Silicon Commodity Risk Dashboard")
            .with_inner_size([cfg.window_width_px, cfg.window_height_px]),
        ..Default::default()
    };

    eframe::run_native(
        "Silicon Commodity Risk Dashboard",
        options,
        Box::new(move |cc| {
            let _ = repaint.set(cc.egui_ctx.clone());
            Box::new(DashboardApp { runtime, frame: 0 })
        }),
    )
    .map_err(|e| anyhow!("eframe: {e}"))
}
