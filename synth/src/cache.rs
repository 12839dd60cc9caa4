use std::sync::Arc;

use crate::dataset::TimeSeriesDataset;
use crate::error::SynthError;
use crate::generator::{GeneratorConfig, SyntheticMarket};

/// Memoized generator output.
///
/// Holds at most one dataset per generation. `invalidate` drops the cached
/// value; the next `get` reseeds and rebuilds it from the same config.
#[derive(Debug, Default)]
pub struct DatasetCache {
    market: SyntheticMarket,
    cached: Option<Arc<TimeSeriesDataset>>,
    generation: u64,
}

impl DatasetCache {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            market: SyntheticMarket::new(config),
            cached: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        self.market.config()
    }

    /// Number of datasets built so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    pub fn get(&mut self) -> Result<Arc<TimeSeriesDataset>, SynthError> {
        if let Some(ds) = &self.cached {
            return Ok(Arc::clone(ds));
        }

        let ds = Arc::new(self.market.generate()?);
        self.generation += 1;
        log::debug!("dataset cache filled; generation={}", self.generation);
        self.cached = Some(Arc::clone(&ds));
        Ok(ds)
    }

    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            log::debug!("dataset cache invalidated");
        }
    }

    /// Invalidate and rebuild in one step.
    pub fn regenerate(&mut self) -> Result<Arc<TimeSeriesDataset>, SynthError> {
        self.invalidate();
        self.get()
    }
}
