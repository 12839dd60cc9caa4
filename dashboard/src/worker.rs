//! Background generation thread.
//!
//! Owns the [`DatasetCache`]; the UI thread sends [`WorkerCommand`]s and drains
//! [`WorkerEvent`]s without blocking.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};

use silicon_synth::{DatasetCache, GeneratorConfig, ViewSet};

use crate::app::{WorkerCommand, WorkerEvent};
use crate::debug_hooks;

/// Called after each event is queued, so an idle UI can wake up.
pub type Notify = Box<dyn Fn() + Send + 'static>;

pub struct Worker {
    commands: Sender<WorkerCommand>,
    events: Receiver<WorkerEvent>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn(config: GeneratorConfig, notify: Notify) -> Result<Self> {
        let (cmd_tx, cmd_rx) = unbounded::<WorkerCommand>();
        let (ev_tx, ev_rx) = unbounded::<WorkerEvent>();

        let handle = thread::Builder::new()
            .name("synth-worker".into())
            .spawn(move || run(config, cmd_rx, ev_tx, notify))
            .context("spawn synth worker thread")?;

        Ok(Self {
            commands: cmd_tx,
            events: ev_rx,
            handle: Some(handle),
        })
    }

    pub fn send(&self, cmd: WorkerCommand) -> Result<()> {
        self.commands
            .send(cmd)
            .map_err(|_| anyhow!("synth worker has stopped"))
    }

    /// Pending events, without blocking.
    pub fn try_iter(&self) -> impl Iterator<Item = WorkerEvent> + '_ {
        self.events.try_iter()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<WorkerEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.commands.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run(
    config: GeneratorConfig,
    commands: Receiver<WorkerCommand>,
    events: Sender<WorkerEvent>,
    notify: Notify,
) {
    let days = config.day_count();
    let seed = config.seed;
    let mut cache = DatasetCache::new(config);

    for cmd in commands.iter() {
        let started = Instant::now();
        let result = match cmd {
            WorkerCommand::Load => {
                if !cache.is_cached() {
                    debug_hooks::log_generation_start("load", seed, days);
                }
                cache.get()
            }
            WorkerCommand::Regenerate => {
                debug_hooks::log_generation_start("regenerate", seed, days);
                cache.regenerate()
            }
            WorkerCommand::Shutdown => break,
        };

        let ev = match result {
            Ok(dataset) => {
                let views = Box::new(ViewSet::compute(&dataset));
                let elapsed_ms = started.elapsed().as_millis() as u64;
                debug_hooks::log_generation_done(cache.generation(), dataset.len(), elapsed_ms);
                WorkerEvent::DatasetReady {
                    generation: cache.generation(),
                    dataset,
                    views,
                    elapsed_ms,
                }
            }
            Err(err) => {
                debug_hooks::log_generation_failed(&err);
                WorkerEvent::GenerationFailed {
                    message: err.to_string(),
                }
            }
        };

        if events.send(ev).is_err() {
            break;
        }
        notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn short_config() -> GeneratorConfig {
        let start = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2016, 6, 30).unwrap();
        GeneratorConfig::with_range(start, end)
    }

    fn expect_ready(w: &Worker) -> (u64, Arc<silicon_synth::TimeSeriesDataset>) {
        match w.recv_timeout(Duration::from_secs(10)) {
            Some(WorkerEvent::DatasetReady {
                generation, dataset, ..
            }) => (generation, dataset),
            other => panic!("expected DatasetReady, got {other:?}"),
        }
    }

    #[test]
    fn load_then_regenerate() {
        let pings = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pings);
        let w = Worker::spawn(
            short_config(),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

        w.send(WorkerCommand::Load).unwrap();
        let (gen1, first) = expect_ready(&w);
        assert_eq!(gen1, 1);
        assert_eq!(first.len(), 182);

        w.send(WorkerCommand::Load).unwrap();
        let (gen_cached, cached) = expect_ready(&w);
        assert_eq!(gen_cached, 1);
        assert!(Arc::ptr_eq(&first, &cached));

        w.send(WorkerCommand::Regenerate).unwrap();
        let (gen2, second) = expect_ready(&w);
        assert_eq!(gen2, 2);
        assert_eq!(*first, *second);

        // joining the thread makes the last notify visible
        drop(w);
        assert_eq!(pings.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn bad_config_reports_failure() {
        let cfg = GeneratorConfig {
            volatility: -0.5,
            ..short_config()
        };
        let w = Worker::spawn(cfg, Box::new(|| {})).unwrap();
        w.send(WorkerCommand::Load).unwrap();
        match w.recv_timeout(Duration::from_secs(10)) {
            Some(WorkerEvent::GenerationFailed { message }) => {
                assert!(message.contains("invalid parameter volatility"), "{message}")
            }
            other => panic!("expected GenerationFailed, got {other:?}"),
        }
    }
}
