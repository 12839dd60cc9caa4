use super::event::*;
use super::state::*;
use crate::debug_hooks;

/// Applies one event to the state. Returns a command for the worker when the
/// event needs one.
pub fn reduce(state: &mut AppState, ev: AppEvent) -> Option<WorkerCommand> {
    match ev {
        AppEvent::Ui(u) => reduce_ui(state, u),
        AppEvent::Worker(w) => {
            reduce_worker(state, w);
            None
        }
    }
}

fn reduce_ui(state: &mut AppState, ev: UiEvent) -> Option<WorkerCommand> {
    match ev {
        UiEvent::TabSelected { tab } => {
            state.selected_tab = tab;
            None
        }
        UiEvent::CandleDaysChanged { days } => {
            state.candle_days = days;
            None
        }
        UiEvent::RegenerateRequested => {
            if state.loading {
                state.status = "Generation already running.".to_string();
                return None;
            }
            state.loading = true;
            state.status = "Regenerating...".to_string();
            Some(WorkerCommand::Regenerate)
        }
    }
}

fn reduce_worker(state: &mut AppState, ev: WorkerEvent) {
    match ev {
        WorkerEvent::DatasetReady {
            generation,
            dataset,
            views,
            elapsed_ms,
        } => {
            debug_hooks::log_dataset_applied(generation, dataset.len());
            state.status = format!("Generated in {elapsed_ms} ms.");
            state.dataset = Some(dataset);
            state.views = Some(views);
            state.generation = generation;
            state.last_elapsed_ms = Some(elapsed_ms);
            state.loading = false;
            state.last_error = None;
        }
        WorkerEvent::GenerationFailed { message } => {
            state.loading = false;
            state.status = "Generation failed.".to_string();
            state.last_error = Some(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use silicon_synth::{GeneratorConfig, SyntheticMarket, ViewSet};
    use std::sync::Arc;

    fn ready(generation: u64) -> AppEvent {
        let start = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2016, 2, 29).unwrap();
        let ds = SyntheticMarket::new(GeneratorConfig::with_range(start, end))
            .generate()
            .unwrap();
        let views = Box::new(ViewSet::compute(&ds));
        AppEvent::Worker(WorkerEvent::DatasetReady {
            generation,
            dataset: Arc::new(ds),
            views,
            elapsed_ms: 3,
        })
    }

    #[test]
    fn tab_and_window_selection() {
        let mut st = AppState::default();
        let cmd = reduce(
            &mut st,
            AppEvent::Ui(UiEvent::TabSelected {
                tab: Tab::Prediction,
            }),
        );
        assert_eq!(cmd, None);
        assert_eq!(st.selected_tab, Tab::Prediction);

        reduce(&mut st, AppEvent::Ui(UiEvent::CandleDaysChanged { days: 365 }));
        assert_eq!(st.candle_days, 365);
    }

    #[test]
    fn regenerate_is_debounced_while_loading() {
        let mut st = AppState::default();
        let first = reduce(&mut st, AppEvent::Ui(UiEvent::RegenerateRequested));
        assert_eq!(first, Some(WorkerCommand::Regenerate));
        assert!(st.loading);

        let second = reduce(&mut st, AppEvent::Ui(UiEvent::RegenerateRequested));
        assert_eq!(second, None);
        assert_eq!(st.status, "Generation already running.");
    }

    #[test]
    fn dataset_ready_replaces_views() {
        let mut st = AppState {
            loading: true,
            last_error: Some("old".into()),
            ..AppState::default()
        };
        reduce(&mut st, ready(4));

        assert!(!st.loading);
        assert_eq!(st.generation, 4);
        assert_eq!(st.rows(), 60);
        assert_eq!(st.last_error, None);
        assert_eq!(st.last_elapsed_ms, Some(3));
        let views = st.views.as_ref().unwrap();
        assert_eq!(views.price_action.candles.len(), 60);
        assert!(views.prediction.is_ok());
        assert!(st.status_line().starts_with("gen #4 | 60 days 2016-01-01 → 2016-02-29"));
    }

    #[test]
    fn failure_keeps_previous_dataset() {
        let mut st = AppState::default();
        reduce(&mut st, ready(1));
        st.loading = true;
        reduce(
            &mut st,
            AppEvent::Worker(WorkerEvent::GenerationFailed {
                message: "nope".into(),
            }),
        );
        assert!(!st.loading);
        assert_eq!(st.last_error.as_deref(), Some("nope"));
        assert_eq!(st.rows(), 60);
    }
}
