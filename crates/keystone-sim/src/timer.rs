//! Frame-driven countdown for an active collapse warning.
//!
//! The host feeds elapsed time through `advance` and then drains `poll`
//! until it returns `None`, applying each command to the store. The timer
//! never caches the countdown: every poll re-reads the store, and a warning
//! raised by a later confirm (new epoch) restarts the interval from zero.

use crate::store::StructureStore;
use std::time::Duration;

/// A transition the timer asks the owner to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    UpdateCountdown(u32),
    Collapse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Arming {
    epoch: u64,
    elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct CollapseTimer {
    interval: Duration,
    armed: Option<Arming>,
}

impl CollapseTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Disarm. Nothing fires until the store raises a new warning.
    pub fn cancel(&mut self) {
        if self.armed.take().is_some() {
            log::debug!("Collapse timer disarmed");
        }
    }

    /// Accumulate frame time toward the next countdown step.
    pub fn advance(&mut self, dt: Duration, store: &StructureStore) {
        if !self.sync(store) {
            return;
        }
        if let Some(arming) = self.armed.as_mut() {
            arming.elapsed += dt;
        }
    }

    /// Next due command, if any. Consumes one interval per step.
    pub fn poll(&mut self, store: &StructureStore) -> Option<TimerCommand> {
        if !self.sync(store) {
            return None;
        }
        let countdown = store.collapse_state().countdown;
        if countdown == 0 {
            self.armed = None;
            return Some(TimerCommand::Collapse);
        }

        let interval = self.interval;
        let arming = self.armed.as_mut()?;
        if arming.elapsed < interval {
            return None;
        }
        arming.elapsed -= interval;
        Some(TimerCommand::UpdateCountdown(countdown - 1))
    }

    /// Match the arming record to the store's current warning. Returns
    /// whether the timer is armed afterwards.
    fn sync(&mut self, store: &StructureStore) -> bool {
        if !store.collapse_state().warning_active {
            self.cancel();
            return false;
        }
        let epoch = store.warning_epoch();
        match self.armed {
            Some(arming) if arming.epoch == epoch => {}
            _ => {
                log::debug!("Collapse timer armed for warning {epoch}");
                self.armed = Some(Arming {
                    epoch,
                    elapsed: Duration::ZERO,
                });
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use keystone_core::config::EngineConfig;
    use keystone_rules::builtin_materials;

    const SECOND: Duration = Duration::from_secs(1);

    fn warned_store() -> StructureStore {
        let steel = builtin_materials().materials.remove(0);
        let mut store = StructureStore::new(EngineConfig::default(), steel);
        place_floating(&mut store, 5.0);
        store
    }

    fn place_floating(store: &mut StructureStore, x: f32) {
        let material = store.current_material().clone();
        store
            .place(Vec3::new(x, 1.5, 5.0), material)
            .expect("place");
        store.confirm_draft().expect("confirm");
    }

    /// Apply everything the timer has due, returning what fired.
    fn drain(timer: &mut CollapseTimer, store: &mut StructureStore) -> Vec<TimerCommand> {
        let mut fired = Vec::new();
        while let Some(command) = timer.poll(store) {
            match command {
                TimerCommand::UpdateCountdown(n) => store.update_countdown(n).expect("tick"),
                TimerCommand::Collapse => store.collapse().expect("collapse"),
            }
            fired.push(command);
        }
        fired
    }

    #[test]
    fn test_idle_without_warning() {
        let steel = builtin_materials().materials.remove(0);
        let store = StructureStore::new(EngineConfig::default(), steel);
        let mut timer = CollapseTimer::new(SECOND);
        timer.advance(SECOND * 10, &store);
        assert!(!timer.is_armed());
        assert_eq!(timer.poll(&store), None);
    }

    #[test]
    fn test_counts_down_then_collapses() {
        let mut store = warned_store();
        let mut timer = CollapseTimer::new(SECOND);

        timer.advance(Duration::from_millis(999), &store);
        assert!(drain(&mut timer, &mut store).is_empty());

        timer.advance(Duration::from_millis(1), &store);
        assert_eq!(drain(&mut timer, &mut store), vec![TimerCommand::UpdateCountdown(2)]);
        assert_eq!(store.collapse_state().countdown, 2);

        timer.advance(SECOND, &store);
        drain(&mut timer, &mut store);
        timer.advance(SECOND, &store);
        assert_eq!(
            drain(&mut timer, &mut store),
            vec![TimerCommand::UpdateCountdown(0), TimerCommand::Collapse]
        );
        assert!(store.confirmed_cubes().is_empty());
        assert!(!store.collapse_state().warning_active);
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_large_step_processed_one_interval_at_a_time() {
        let mut store = warned_store();
        let mut timer = CollapseTimer::new(SECOND);
        timer.advance(SECOND * 10, &store);
        assert_eq!(
            drain(&mut timer, &mut store),
            vec![
                TimerCommand::UpdateCountdown(2),
                TimerCommand::UpdateCountdown(1),
                TimerCommand::UpdateCountdown(0),
                TimerCommand::Collapse,
            ]
        );
    }

    #[test]
    fn test_no_tick_after_cancel() {
        let mut store = warned_store();
        let mut timer = CollapseTimer::new(SECOND);
        timer.advance(Duration::from_millis(500), &store);

        store.cancel_collapse().expect("cancel");
        timer.advance(SECOND * 5, &store);
        assert_eq!(timer.poll(&store), None);
        assert!(!timer.is_armed());
        assert_eq!(store.confirmed_cubes().len(), 1);
    }

    #[test]
    fn test_rearms_on_new_warning() {
        let mut store = warned_store();
        let mut timer = CollapseTimer::new(SECOND);
        timer.advance(Duration::from_millis(800), &store);
        assert_eq!(timer.poll(&store), None);

        // A second floating confirm raises a fresh warning mid-interval
        place_floating(&mut store, 8.0);
        timer.advance(Duration::from_millis(800), &store);
        assert_eq!(timer.poll(&store), None, "interval restarted for the new warning");

        timer.advance(Duration::from_millis(200), &store);
        assert_eq!(timer.poll(&store), Some(TimerCommand::UpdateCountdown(2)));
    }

    #[test]
    fn test_reads_countdown_from_store() {
        let mut store = warned_store();
        let mut timer = CollapseTimer::new(SECOND);
        store.update_countdown(1).expect("countdown");
        timer.advance(SECOND, &store);
        assert_eq!(timer.poll(&store), Some(TimerCommand::UpdateCountdown(0)));
    }

    #[test]
    fn test_explicit_cancel_then_same_warning_rearms() {
        let mut store = warned_store();
        let mut timer = CollapseTimer::new(SECOND);
        timer.advance(Duration::from_millis(900), &store);
        timer.cancel();
        assert!(!timer.is_armed());
        // Warning still active, so the next advance arms again from zero
        timer.advance(Duration::from_millis(900), &store);
        assert!(timer.is_armed());
        assert!(drain(&mut timer, &mut store).is_empty());
    }
}
