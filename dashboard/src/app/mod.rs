pub mod event;
pub mod reducer;
pub mod render;
pub mod state;

pub use event::*;
pub use state::*;

use crate::worker::Worker;

/// App state plus the worker that feeds it. Shared by the GUI and the TUI.
pub struct AppRuntime {
    pub state: AppState,
    worker: Worker,
}

impl AppRuntime {
    /// Starts with a `Load` request so the first frame can show a spinner.
    pub fn new(state: AppState, worker: Worker) -> Self {
        let mut rt = Self { state, worker };
        rt.request(WorkerCommand::Load);
        rt
    }

    pub fn handle_event(&mut self, ev: AppEvent) {
        if let Some(cmd) = reducer::reduce(&mut self.state, ev) {
            self.request(cmd);
        }
    }

    pub fn handle_ui_events(&mut self, events: impl IntoIterator<Item = UiEvent>) {
        for ev in events {
            self.handle_event(AppEvent::Ui(ev));
        }
    }

    /// Applies everything the worker has produced. Returns true if anything
    /// arrived.
    pub fn poll_worker(&mut self) -> bool {
        let pending: Vec<WorkerEvent> = self.worker.try_iter().collect();
        let changed = !pending.is_empty();
        for ev in pending {
            self.handle_event(AppEvent::Worker(ev));
        }
        changed
    }

    fn request(&mut self, cmd: WorkerCommand) {
        self.state.loading = true;
        if let Err(err) = self.worker.send(cmd) {
            self.handle_event(AppEvent::Worker(WorkerEvent::GenerationFailed {
                message: err.to_string(),
            }));
        }
    }
}
