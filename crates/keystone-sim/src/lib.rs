pub mod error;
pub mod history;
pub mod router;
pub mod store;
pub mod structural;
pub mod timer;

#[cfg(test)]
mod test_harness;

pub use error::KeystoneError;
pub use router::{ActionKind, ActionPayload, ActionRequest, RouteError};
pub use store::{CollapseState, Outcome, StructureStore};
pub use timer::{CollapseTimer, TimerCommand};

use keystone_core::config::EngineConfig;
use keystone_core::material::MaterialTable;
use keystone_rules::loader::{load_engine_config, load_validated_materials};
use keystone_rules::{builtin_materials, material_or_default};
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

/// Primary public struct for the keystone-sim crate.
/// Owns the structure store, the collapse timer and the request queue.
/// Input producers `submit` requests; the host drains them and drives the
/// timer once per frame with `update`.
pub struct Workshop {
    store: StructureStore,
    timer: CollapseTimer,
    queue: VecDeque<ActionRequest>,
    materials: MaterialTable,
}

impl Default for Workshop {
    fn default() -> Self {
        Self::new(EngineConfig::default(), builtin_materials())
    }
}

impl Workshop {
    /// Create an empty workshop. The starting material is looked up by
    /// `config.default_material`, falling back to the first entry.
    pub fn new(config: EngineConfig, materials: MaterialTable) -> Self {
        let material = material_or_default(&materials, &config.default_material);
        let timer = CollapseTimer::new(config.tick_interval());
        Self {
            store: StructureStore::new(config, material),
            timer,
            queue: VecDeque::new(),
            materials,
        }
    }

    /// Load `materials/presets.ron` and `config/engine.ron` from a data
    /// directory.
    pub fn from_data_dir(dir: &Path) -> Result<Self, KeystoneError> {
        let materials_src = read_data_file(&dir.join("materials").join("presets.ron"))?;
        let engine_src = read_data_file(&dir.join("config").join("engine.ron"))?;
        let materials = load_validated_materials(&[materials_src.as_str()])?;
        let config = load_engine_config(&engine_src)?;
        Ok(Self::new(config, materials))
    }

    pub fn store(&self) -> &StructureStore {
        &self.store
    }

    pub fn timer(&self) -> &CollapseTimer {
        &self.timer
    }

    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    /// Number of queued requests not yet applied.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue a request for the next drain.
    pub fn submit(&mut self, request: ActionRequest) {
        self.queue.push_back(request);
    }

    /// Queue a request given by symbolic name. Unknown names and incomplete
    /// payloads are logged and dropped.
    pub fn submit_symbolic(&mut self, kind: &str, payload: &ActionPayload) -> Result<(), RouteError> {
        match ActionRequest::from_symbolic(kind, payload, &self.materials) {
            Ok(request) => {
                self.submit(request);
                Ok(())
            }
            Err(e) => {
                log::warn!("Ignoring action {kind}: {e}");
                Err(e)
            }
        }
    }

    /// Apply every queued request in arrival order.
    pub fn process_pending(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(self.queue.len());
        while let Some(request) = self.queue.pop_front() {
            outcomes.push(self.apply(request));
        }
        outcomes
    }

    /// Drain the queue, then apply `request` immediately.
    pub fn dispatch(&mut self, request: ActionRequest) -> Outcome {
        self.process_pending();
        self.apply(request)
    }

    /// Per-frame tick: drain queued requests, advance the collapse timer by
    /// `dt` and apply whatever it fires. Returns the fired commands.
    pub fn update(&mut self, dt: Duration) -> Vec<TimerCommand> {
        self.process_pending();
        self.timer.advance(dt, &self.store);

        let mut fired = Vec::new();
        while let Some(command) = self.timer.poll(&self.store) {
            let outcome = match command {
                TimerCommand::UpdateCountdown(n) => self.store.update_countdown(n),
                TimerCommand::Collapse => self.store.collapse(),
            };
            if let Err(e) = outcome {
                log::warn!("Timer command {command:?} refused: {e}");
                self.timer.cancel();
                break;
            }
            fired.push(command);
        }
        fired
    }

    /// Route one request. A request that leaves no warning active (cancel,
    /// collapse, undo of a confirm) disarms the timer; a freshly raised
    /// warning is picked up by the timer's epoch check.
    fn apply(&mut self, request: ActionRequest) -> Outcome {
        let outcome = router::route(&mut self.store, request);
        if !self.store.collapse_state().warning_active {
            self.timer.cancel();
        }
        outcome
    }
}

fn read_data_file(path: &Path) -> Result<String, KeystoneError> {
    std::fs::read_to_string(path).map_err(|source| KeystoneError::Io {
        path: path.to_path_buf(),
        source,
    })
}
