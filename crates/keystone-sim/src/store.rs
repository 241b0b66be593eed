//! The structure store: the single owner of cubes, history and collapse state.
//!
//! Every transition validates all of its preconditions before touching
//! anything, so a `Rejection` always means the store is exactly as it was.
//! Only applied transitions are recorded in history.

use crate::history::{History, HistoryEntry};
use crate::structural::{analyze, StabilityReport};
use keystone_core::config::{EngineConfig, UndoConfirmPolicy};
use keystone_core::constants::FIRST_CUBE_ID;
use keystone_core::cube::{Cube, CubeStatus};
use keystone_core::error::Rejection;
use keystone_core::material::MaterialDef;
use keystone_core::math::{cell_in_bounds, world_to_cell};
use keystone_core::types::{CubeId, GridCell, WorldPos};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Result of a store transition: applied, or rejected with the store untouched.
pub type Outcome = Result<(), Rejection>;

/// Collapse warning sub-state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseState {
    pub warning_active: bool,
    /// Confirmed cubes without ground support, as of the last confirm.
    pub unstable_ids: BTreeSet<CubeId>,
    /// Seconds left before the unstable cubes fall.
    pub countdown: u32,
}

impl CollapseState {
    fn stable(countdown_start: u32) -> Self {
        Self {
            warning_active: false,
            unstable_ids: BTreeSet::new(),
            countdown: countdown_start,
        }
    }
}

pub struct StructureStore {
    config: EngineConfig,
    draft_cubes: Vec<Cube>,
    confirmed_cubes: Vec<Cube>,
    current_material: Arc<MaterialDef>,
    /// Occupancy index over draft and confirmed cubes.
    cells: HashMap<GridCell, CubeId>,
    history: History,
    collapse: CollapseState,
    next_id: u64,
    /// Bumped every time a warning is raised so the timer can tell warnings apart.
    warning_epoch: u64,
}

impl StructureStore {
    pub fn new(config: EngineConfig, material: MaterialDef) -> Self {
        let collapse = CollapseState::stable(config.countdown_start);
        Self {
            config,
            draft_cubes: Vec::new(),
            confirmed_cubes: Vec::new(),
            current_material: Arc::new(material),
            cells: HashMap::new(),
            history: History::new(),
            collapse,
            next_id: FIRST_CUBE_ID,
            warning_epoch: 0,
        }
    }

    // --- Queries ---

    pub fn draft_cubes(&self) -> &[Cube] {
        &self.draft_cubes
    }

    pub fn confirmed_cubes(&self) -> &[Cube] {
        &self.confirmed_cubes
    }

    pub fn current_material(&self) -> &Arc<MaterialDef> {
        &self.current_material
    }

    pub fn collapse_state(&self) -> &CollapseState {
        &self.collapse
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Id the next placement will receive.
    pub fn next_id(&self) -> CubeId {
        CubeId(self.next_id)
    }

    pub fn warning_epoch(&self) -> u64 {
        self.warning_epoch
    }

    /// Live cubes, drafts first.
    pub fn cubes(&self) -> impl Iterator<Item = &Cube> {
        self.draft_cubes.iter().chain(self.confirmed_cubes.iter())
    }

    pub fn find(&self, id: CubeId) -> Option<&Cube> {
        self.cubes().find(|c| c.id == id)
    }

    pub fn cube_at(&self, cell: GridCell) -> Option<&Cube> {
        let id = *self.cells.get(&cell)?;
        self.find(id)
    }

    pub fn is_occupied(&self, cell: GridCell) -> bool {
        self.cells.contains_key(&cell)
    }

    // --- Transitions ---

    /// Place a draft cube at a world position.
    pub fn place(&mut self, pos: WorldPos, material: Arc<MaterialDef>) -> Result<CubeId, Rejection> {
        let cell = world_to_cell(pos)?;
        self.place_cell(cell, material)
    }

    /// Place a draft cube at a grid cell.
    pub fn place_cell(
        &mut self,
        cell: GridCell,
        material: Arc<MaterialDef>,
    ) -> Result<CubeId, Rejection> {
        if cell.y < 0 {
            return Err(Rejection::BelowGround { layer: cell.y });
        }
        if !cell_in_bounds(cell) {
            return Err(Rejection::out_of_bounds(cell));
        }
        if self.is_occupied(cell) {
            return Err(Rejection::Occupied { cell });
        }

        let id = CubeId(self.next_id);
        self.next_id += 1;
        self.cells.insert(cell, id);
        self.draft_cubes
            .push(Cube::new(id, cell, material, CubeStatus::Draft));
        self.history.push(HistoryEntry::Place { id });
        log::debug!("Placed draft {id} at {cell}");
        Ok(id)
    }

    pub fn delete_draft(&mut self, id: CubeId) -> Outcome {
        let Some(index) = self.draft_cubes.iter().position(|c| c.id == id) else {
            log::warn!("Delete of unknown draft {id} ignored");
            return Err(Rejection::UnknownDraft(id));
        };
        let cube = self.draft_cubes.remove(index);
        self.cells.remove(&cube.cell);
        self.history.push(HistoryEntry::DeleteDraft { cube });
        Ok(())
    }

    /// Remove a confirmed cube. The structure is not re-analyzed; the id is
    /// only dropped from the unstable set if it was listed there.
    pub fn delete_confirmed(&mut self, id: CubeId) -> Outcome {
        let Some(index) = self.confirmed_cubes.iter().position(|c| c.id == id) else {
            log::warn!("Delete of unknown confirmed cube {id} ignored");
            return Err(Rejection::UnknownConfirmed(id));
        };
        let cube = self.confirmed_cubes.remove(index);
        self.cells.remove(&cube.cell);
        self.history.push(HistoryEntry::DeleteConfirmed { cube });

        if self.collapse.unstable_ids.remove(&id) && self.collapse.unstable_ids.is_empty() {
            log::info!("Last unstable cube {id} deleted, warning cleared");
            self.reset_collapse();
        }
        Ok(())
    }

    /// Select the material for future placements. Not recorded.
    pub fn set_material(&mut self, material: Arc<MaterialDef>) {
        log::debug!("Current material: {}", material.name);
        self.current_material = material;
    }

    /// Commit every draft and re-run the support analysis over all
    /// confirmed cubes.
    pub fn confirm_draft(&mut self) -> Outcome {
        if self.draft_cubes.is_empty() {
            return Err(Rejection::NoDrafts);
        }

        let drafts = std::mem::take(&mut self.draft_cubes);
        self.confirmed_cubes.extend(
            drafts
                .iter()
                .cloned()
                .map(|c| c.with_status(CubeStatus::Confirmed)),
        );
        log::info!(
            "Confirmed {} drafts ({} cubes in structure)",
            drafts.len(),
            self.confirmed_cubes.len()
        );
        self.history.push(HistoryEntry::ConfirmDraft { drafts });

        let report = analyze(&self.confirmed_cubes);
        self.apply_report(report);
        Ok(())
    }

    /// Invert the most recent history entry.
    pub fn undo(&mut self) -> Outcome {
        match self.history.last() {
            None => return Err(Rejection::HistoryEmpty),
            Some(entry) if !entry.is_undoable() => {
                return Err(Rejection::NotUndoable(entry.tag()));
            }
            Some(HistoryEntry::Place { id }) => {
                let present = self.draft_cubes.iter().any(|c| c.id == *id);
                debug_assert!(present, "undo of place {id} but it is not a draft");
                if !present {
                    log::error!("Undo of place {id}: cube is no longer a draft");
                    return Err(Rejection::HistoryMismatch(*id));
                }
            }
            Some(_) => {}
        }

        let Some(entry) = self.history.pop() else {
            return Err(Rejection::HistoryEmpty);
        };
        log::debug!("Undo {}", entry.tag());

        match entry {
            HistoryEntry::Place { id } => {
                if let Some(index) = self.draft_cubes.iter().rposition(|c| c.id == id) {
                    let cube = self.draft_cubes.remove(index);
                    self.cells.remove(&cube.cell);
                }
                debug_assert_eq!(self.next_id, id.0 + 1, "id counter out of step with history");
                if self.next_id != id.0 + 1 {
                    log::error!(
                        "Undo of place {id}: id counter at {} out of step",
                        self.next_id
                    );
                }
                self.next_id = id.0;
            }
            HistoryEntry::DeleteDraft { cube } => {
                self.cells.insert(cube.cell, cube.id);
                self.draft_cubes.push(cube);
            }
            HistoryEntry::ConfirmDraft { drafts } => {
                let ids: BTreeSet<CubeId> = drafts.iter().map(|c| c.id).collect();
                self.confirmed_cubes.retain(|c| !ids.contains(&c.id));

                debug_assert!(self.draft_cubes.is_empty(), "drafts placed after confirm survived");
                let mut restored = drafts;
                restored.append(&mut self.draft_cubes);
                self.draft_cubes = restored;

                match self.config.undo_confirm {
                    UndoConfirmPolicy::ClearWarning => self.reset_collapse(),
                    UndoConfirmPolicy::Recompute => {
                        let report = analyze(&self.confirmed_cubes);
                        self.apply_report(report);
                    }
                }
            }
            // Filtered out above.
            HistoryEntry::DeleteConfirmed { .. } | HistoryEntry::Collapse { .. } => {}
        }
        Ok(())
    }

    /// Remove every cube listed as unstable and return to stable.
    pub fn collapse(&mut self) -> Outcome {
        if !self.collapse.warning_active {
            return Err(Rejection::NoActiveWarning);
        }

        let unstable = std::mem::take(&mut self.collapse.unstable_ids);
        let (removed, kept): (Vec<Cube>, Vec<Cube>) = std::mem::take(&mut self.confirmed_cubes)
            .into_iter()
            .partition(|c| unstable.contains(&c.id));
        self.confirmed_cubes = kept;
        for cube in &removed {
            self.cells.remove(&cube.cell);
        }
        log::info!("Collapse removed {} cubes", removed.len());
        self.history.push(HistoryEntry::Collapse { removed });
        self.reset_collapse();
        Ok(())
    }

    /// Dismiss the warning without removing anything. Not recorded.
    pub fn cancel_collapse(&mut self) -> Outcome {
        if !self.collapse.warning_active {
            return Err(Rejection::NoActiveWarning);
        }
        log::info!("Collapse cancelled");
        self.reset_collapse();
        Ok(())
    }

    /// Set the countdown shown for the active warning. Not recorded.
    pub fn update_countdown(&mut self, countdown: u32) -> Outcome {
        if !self.collapse.warning_active {
            return Err(Rejection::NoActiveWarning);
        }
        self.collapse.countdown = countdown;
        Ok(())
    }

    fn reset_collapse(&mut self) {
        self.collapse = CollapseState::stable(self.config.countdown_start);
    }

    fn apply_report(&mut self, report: StabilityReport) {
        if report.is_stable() {
            self.reset_collapse();
            return;
        }
        log::warn!(
            "{} cubes have no ground support, collapse in {}s",
            report.unstable.len(),
            self.config.countdown_start
        );
        self.warning_epoch += 1;
        self.collapse = CollapseState {
            warning_active: true,
            unstable_ids: report.unstable,
            countdown: self.config.countdown_start,
        };
    }
}
