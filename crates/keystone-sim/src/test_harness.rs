/// End-to-end scenarios driven through the `Workshop`: requests go through
/// the queue and router, time goes through `update`, assertions read the
/// store's query surface only.

#[cfg(test)]
mod tests {
    use crate::{ActionPayload, ActionRequest, TimerCommand, Workshop};
    use glam::Vec3;
    use keystone_core::config::{EngineConfig, UndoConfirmPolicy};
    use keystone_core::error::Rejection;
    use keystone_core::types::CubeId;
    use keystone_rules::builtin_materials;
    use std::collections::BTreeSet;
    use std::path::Path;
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(16);

    fn place(x: f32, y: f32, z: f32) -> ActionRequest {
        ActionRequest::PlaceDraft {
            position: Vec3::new(x, y, z),
            material: None,
        }
    }

    /// Run `seconds` of wall time at ~60 fps.
    fn run_for(workshop: &mut Workshop, seconds: f32) -> Vec<TimerCommand> {
        let frames = (seconds * 1000.0 / FRAME.as_millis() as f32).ceil() as usize;
        let mut fired = Vec::new();
        for _ in 0..frames {
            fired.extend(workshop.update(FRAME));
        }
        fired
    }

    fn draft_ids(workshop: &Workshop) -> Vec<u64> {
        workshop.store().draft_cubes().iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn test_stacked_pair_is_stable() {
        let mut w = Workshop::default();
        w.submit(place(0.0, 0.5, 0.0));
        w.submit(place(0.0, 1.5, 0.0));
        w.submit(ActionRequest::ConfirmDraft);
        assert!(w.process_pending().iter().all(Result::is_ok));

        let state = w.store().collapse_state();
        assert!(!state.warning_active);
        assert!(state.unstable_ids.is_empty());
        assert_eq!(w.store().confirmed_cubes().len(), 2);
    }

    #[test]
    fn test_lone_floating_cube_warns() {
        let mut w = Workshop::default();
        w.dispatch(place(5.0, 1.5, 5.0)).expect("place");
        w.dispatch(ActionRequest::ConfirmDraft).expect("confirm");

        let state = w.store().collapse_state();
        assert!(state.warning_active);
        assert_eq!(state.countdown, 3);
        assert_eq!(state.unstable_ids, BTreeSet::from([CubeId(1)]));
    }

    #[test]
    fn test_cancel_collapse_keeps_cube() {
        let mut w = Workshop::default();
        w.dispatch(place(5.0, 1.5, 5.0)).expect("place");
        w.dispatch(ActionRequest::ConfirmDraft).expect("confirm");
        run_for(&mut w, 1.5);
        assert_eq!(w.store().collapse_state().countdown, 2);

        w.dispatch(ActionRequest::CancelCollapse).expect("cancel");
        let state = w.store().collapse_state();
        assert!(!state.warning_active);
        assert!(state.unstable_ids.is_empty());
        assert_eq!(state.countdown, 3);
        assert_eq!(w.store().confirmed_cubes().len(), 1);
        assert!(!w.timer().is_armed());

        // No ticks arrive after the cancel
        assert!(run_for(&mut w, 5.0).is_empty());
        assert_eq!(w.store().confirmed_cubes().len(), 1);
    }

    #[test]
    fn test_countdown_runs_out_and_collapses() {
        let mut w = Workshop::default();
        w.dispatch(place(0.0, 0.5, 0.0)).expect("place grounded");
        w.dispatch(place(5.0, 1.5, 5.0)).expect("place floating");
        w.dispatch(ActionRequest::ConfirmDraft).expect("confirm");

        let fired = run_for(&mut w, 3.1);
        assert_eq!(
            fired,
            vec![
                TimerCommand::UpdateCountdown(2),
                TimerCommand::UpdateCountdown(1),
                TimerCommand::UpdateCountdown(0),
                TimerCommand::Collapse,
            ]
        );
        let remaining: Vec<u64> = w.store().confirmed_cubes().iter().map(|c| c.id.0).collect();
        assert_eq!(remaining, vec![1]);
        assert!(!w.store().collapse_state().warning_active);
        assert_eq!(w.store().collapse_state().countdown, 3);
    }

    #[test]
    fn test_no_collapse_before_countdown_ends() {
        let mut w = Workshop::default();
        w.dispatch(place(5.0, 1.5, 5.0)).expect("place");
        w.dispatch(ActionRequest::ConfirmDraft).expect("confirm");
        run_for(&mut w, 2.9);
        assert_eq!(w.store().collapse_state().countdown, 1);
        assert_eq!(w.store().confirmed_cubes().len(), 1);
    }

    #[test]
    fn test_place_two_delete_first_undo_twice() {
        let mut w = Workshop::default();
        w.dispatch(place(0.0, 0.5, 0.0)).expect("place a");
        w.dispatch(place(1.0, 0.5, 0.0)).expect("place b");
        w.dispatch(ActionRequest::DeleteDraft { id: CubeId(1) })
            .expect("delete a");

        w.dispatch(ActionRequest::Undo).expect("undo delete");
        let mut ids = draft_ids(&w);
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);

        w.dispatch(ActionRequest::Undo).expect("undo place b");
        assert_eq!(draft_ids(&w), vec![1]);
        assert_eq!(w.store().next_id(), CubeId(2));
    }

    #[test]
    fn test_undo_confirm_stops_countdown() {
        let mut w = Workshop::default();
        w.dispatch(place(5.0, 1.5, 5.0)).expect("place");
        w.dispatch(ActionRequest::ConfirmDraft).expect("confirm");
        run_for(&mut w, 1.2);

        w.dispatch(ActionRequest::Undo).expect("undo confirm");
        assert!(!w.timer().is_armed());
        assert!(run_for(&mut w, 5.0).is_empty());
        assert_eq!(draft_ids(&w), vec![1]);
        assert!(w.store().confirmed_cubes().is_empty());
    }

    #[test]
    fn test_recompute_policy_restarts_countdown() {
        let config = EngineConfig {
            undo_confirm: UndoConfirmPolicy::Recompute,
            ..EngineConfig::default()
        };
        let mut w = Workshop::new(config, builtin_materials());
        w.dispatch(place(5.0, 1.5, 5.0)).expect("place floating");
        w.dispatch(ActionRequest::ConfirmDraft).expect("confirm");
        w.dispatch(place(0.0, 0.5, 0.0)).expect("place grounded");
        w.dispatch(ActionRequest::ConfirmDraft).expect("confirm");
        run_for(&mut w, 1.2);
        assert_eq!(w.store().collapse_state().countdown, 2);

        w.dispatch(ActionRequest::Undo).expect("undo second confirm");
        assert_eq!(w.store().collapse_state().countdown, 3);
        let fired = run_for(&mut w, 3.1);
        assert_eq!(fired.last(), Some(&TimerCommand::Collapse));
        assert!(w.store().confirmed_cubes().is_empty());
        assert_eq!(draft_ids(&w), vec![2]);
    }

    #[test]
    fn test_rejections_leave_store_untouched() {
        let mut w = Workshop::default();
        w.dispatch(place(0.0, 0.5, 0.0)).expect("place");
        let history_len = w.store().history().len();

        assert_eq!(
            w.dispatch(place(0.0, 0.5, 0.0)),
            Err(Rejection::Occupied {
                cell: glam::IVec3::ZERO
            })
        );
        assert_eq!(
            w.dispatch(ActionRequest::DeleteDraft { id: CubeId(42) }),
            Err(Rejection::UnknownDraft(CubeId(42)))
        );
        assert_eq!(
            w.dispatch(ActionRequest::Collapse),
            Err(Rejection::NoActiveWarning)
        );
        assert_eq!(w.store().history().len(), history_len);
        assert_eq!(draft_ids(&w), vec![1]);
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut w = Workshop::default();
        w.submit(place(0.0, 0.5, 0.0));
        w.submit(ActionRequest::Undo);
        w.submit(place(3.0, 0.5, 0.0));
        assert_eq!(w.pending(), 3);

        let outcomes = w.process_pending();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(w.pending(), 0);
        // The undo removed the first placement, so the second reuses id 1
        assert_eq!(w.store().draft_cubes()[0].id, CubeId(1));
        assert_eq!(w.store().draft_cubes()[0].cell.x, 3);
    }

    #[test]
    fn test_symbolic_requests_through_workshop() {
        let mut w = Workshop::default();
        w.submit_symbolic(
            "SET_MATERIAL",
            &ActionPayload {
                material: Some("Concrete".into()),
                ..Default::default()
            },
        )
        .expect("known material");
        w.submit_symbolic(
            "PLACE_DRAFT",
            &ActionPayload {
                position: Some([2.0, 0.5, 2.0]),
                ..Default::default()
            },
        )
        .expect("place");
        assert!(w.submit_symbolic("TELEPORT", &ActionPayload::default()).is_err());
        assert_eq!(w.pending(), 2);

        w.update(FRAME);
        assert_eq!(w.store().draft_cubes()[0].material.name, "Concrete");
    }

    #[test]
    fn test_starting_material_from_config() {
        let config = EngineConfig {
            default_material: "Aluminum".into(),
            ..EngineConfig::default()
        };
        let w = Workshop::new(config, builtin_materials());
        assert_eq!(w.store().current_material().name, "Aluminum");

        let config = EngineConfig {
            default_material: "Granite".into(),
            ..EngineConfig::default()
        };
        let w = Workshop::new(config, builtin_materials());
        assert_eq!(w.store().current_material().name, "Steel");
    }

    #[test]
    fn test_from_data_dir() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
        let w = Workshop::from_data_dir(&dir).expect("shipped data loads");
        assert_eq!(w.materials().len(), 4);
        assert_eq!(w.store().current_material().name, "Steel");
        assert_eq!(w.timer().interval(), Duration::from_secs(1));

        let missing = Workshop::from_data_dir(Path::new("/nonexistent/keystone"));
        assert!(matches!(missing, Err(crate::KeystoneError::Io { .. })));
    }
}
