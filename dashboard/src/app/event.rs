use std::sync::Arc;

use silicon_synth::{TimeSeriesDataset, ViewSet};

use super::state::Tab;

#[derive(Debug)]
pub enum AppEvent {
    Ui(UiEvent),
    Worker(WorkerEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    TabSelected { tab: Tab },
    CandleDaysChanged { days: usize },
    RegenerateRequested,
}

#[derive(Debug)]
pub enum WorkerEvent {
    DatasetReady {
        generation: u64,
        dataset: Arc<TimeSeriesDataset>,
        views: Box<ViewSet>,
        elapsed_ms: u64,
    },
    GenerationFailed {
        message: String,
    },
}

/// Requests handled on the background worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCommand {
    /// Use the cached dataset, generating it on first use.
    Load,
    /// Drop the cache and rebuild from the fixed seed.
    Regenerate,
    Shutdown,
}
