//! Translation of action requests into store transitions.
//!
//! Typed requests go straight to `route`. Hosts that speak in symbolic
//! names (`"PLACE_DRAFT"`, `"UNDO"`, ...) build a request with
//! `ActionRequest::from_symbolic`, which fails with a `RouteError` when the
//! name is unknown or the payload lacks a field.

use crate::store::{Outcome, StructureStore};
use keystone_core::cube::CubeStatus;
use keystone_core::direction::Direction;
use keystone_core::error::Rejection;
use keystone_core::material::{MaterialDef, MaterialTable};
use keystone_core::math::world_to_cell;
use keystone_core::types::{CubeId, WorldPos};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// A request to change the structure.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    /// Place a draft. `None` uses the current material.
    PlaceDraft {
        position: WorldPos,
        material: Option<Arc<MaterialDef>>,
    },
    /// Place a draft against one face of an existing cube.
    PlaceAdjacent {
        id: CubeId,
        face: Direction,
        material: Option<Arc<MaterialDef>>,
    },
    DeleteDraft { id: CubeId },
    DeleteConfirmed { id: CubeId },
    /// Delete by id, whichever list the cube is in.
    Delete { id: CubeId },
    /// Delete whatever cube sits at a position.
    DeleteAt { position: WorldPos },
    SetMaterial { material: Arc<MaterialDef> },
    ConfirmDraft,
    Undo,
    Collapse,
    CancelCollapse,
}

impl ActionRequest {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRequest::PlaceDraft { .. } => ActionKind::PlaceDraft,
            ActionRequest::PlaceAdjacent { .. } => ActionKind::PlaceAdjacent,
            ActionRequest::DeleteDraft { .. } => ActionKind::DeleteDraft,
            ActionRequest::DeleteConfirmed { .. } => ActionKind::DeleteConfirmed,
            ActionRequest::Delete { .. } => ActionKind::Delete,
            ActionRequest::DeleteAt { .. } => ActionKind::DeleteAt,
            ActionRequest::SetMaterial { .. } => ActionKind::SetMaterial,
            ActionRequest::ConfirmDraft => ActionKind::ConfirmDraft,
            ActionRequest::Undo => ActionKind::Undo,
            ActionRequest::Collapse => ActionKind::Collapse,
            ActionRequest::CancelCollapse => ActionKind::CancelCollapse,
        }
    }

    /// Delete request for a cube whose status is already known.
    pub fn delete(id: CubeId, status: CubeStatus) -> Self {
        match status {
            CubeStatus::Draft => ActionRequest::DeleteDraft { id },
            CubeStatus::Confirmed => ActionRequest::DeleteConfirmed { id },
        }
    }

    /// Build a request from a symbolic kind name and a loose payload.
    /// Material names are resolved against `materials`; a `color` field
    /// builds a custom material instead.
    pub fn from_symbolic(
        kind: &str,
        payload: &ActionPayload,
        materials: &MaterialTable,
    ) -> Result<Self, RouteError> {
        let kind: ActionKind = kind.parse()?;
        let request = match kind {
            ActionKind::PlaceDraft => ActionRequest::PlaceDraft {
                position: payload.position(kind)?,
                material: payload.material(materials)?,
            },
            ActionKind::PlaceAdjacent => ActionRequest::PlaceAdjacent {
                id: payload.id(kind)?,
                face: payload
                    .face
                    .ok_or(RouteError::MissingField { kind, field: "face" })?,
                material: payload.material(materials)?,
            },
            ActionKind::DeleteDraft => ActionRequest::DeleteDraft {
                id: payload.id(kind)?,
            },
            ActionKind::DeleteConfirmed => ActionRequest::DeleteConfirmed {
                id: payload.id(kind)?,
            },
            ActionKind::Delete => match (payload.id, payload.status) {
                (Some(id), Some(status)) => ActionRequest::delete(CubeId(id), status),
                (Some(id), None) => ActionRequest::Delete { id: CubeId(id) },
                (None, _) => ActionRequest::DeleteAt {
                    position: payload.position(kind)?,
                },
            },
            ActionKind::DeleteAt => ActionRequest::DeleteAt {
                position: payload.position(kind)?,
            },
            ActionKind::SetMaterial => ActionRequest::SetMaterial {
                material: payload
                    .material(materials)?
                    .ok_or(RouteError::MissingField {
                        kind,
                        field: "material",
                    })?,
            },
            ActionKind::ConfirmDraft => ActionRequest::ConfirmDraft,
            ActionKind::Undo => ActionRequest::Undo,
            ActionKind::Collapse => ActionRequest::Collapse,
            ActionKind::CancelCollapse => ActionRequest::CancelCollapse,
        };
        Ok(request)
    }
}

/// Symbolic action names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    PlaceDraft,
    PlaceAdjacent,
    DeleteDraft,
    DeleteConfirmed,
    Delete,
    DeleteAt,
    SetMaterial,
    ConfirmDraft,
    Undo,
    Collapse,
    CancelCollapse,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::PlaceDraft => "PLACE_DRAFT",
            ActionKind::PlaceAdjacent => "PLACE_ADJACENT",
            ActionKind::DeleteDraft => "DELETE_DRAFT",
            ActionKind::DeleteConfirmed => "DELETE_CONFIRMED",
            ActionKind::Delete => "DELETE",
            ActionKind::DeleteAt => "DELETE_AT",
            ActionKind::SetMaterial => "SET_MATERIAL",
            ActionKind::ConfirmDraft => "CONFIRM_DRAFT",
            ActionKind::Undo => "UNDO",
            ActionKind::Collapse => "COLLAPSE",
            ActionKind::CancelCollapse => "CANCEL_COLLAPSE",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = RouteError;

    /// Case-insensitive; `-` and `_` are interchangeable. `PLACE` and
    /// `CONFIRM` are accepted as short forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        let kind = match normalized.as_str() {
            "PLACE_DRAFT" | "PLACE" => ActionKind::PlaceDraft,
            "PLACE_ADJACENT" => ActionKind::PlaceAdjacent,
            "DELETE_DRAFT" => ActionKind::DeleteDraft,
            "DELETE_CONFIRMED" => ActionKind::DeleteConfirmed,
            "DELETE" => ActionKind::Delete,
            "DELETE_AT" => ActionKind::DeleteAt,
            "SET_MATERIAL" => ActionKind::SetMaterial,
            "CONFIRM_DRAFT" | "CONFIRM" => ActionKind::ConfirmDraft,
            "UNDO" => ActionKind::Undo,
            "COLLAPSE" => ActionKind::Collapse,
            "CANCEL_COLLAPSE" => ActionKind::CancelCollapse,
            _ => return Err(RouteError::UnknownAction(s.to_string())),
        };
        Ok(kind)
    }
}

/// Loose payload accompanying a symbolic action. Fields a kind does not
/// use are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionPayload {
    pub position: Option<[f32; 3]>,
    pub id: Option<u64>,
    pub status: Option<CubeStatus>,
    pub face: Option<Direction>,
    /// Material name from the loaded table.
    pub material: Option<String>,
    /// Hex color for a custom material.
    pub color: Option<String>,
}

impl ActionPayload {
    fn position(&self, kind: ActionKind) -> Result<WorldPos, RouteError> {
        self.position
            .map(WorldPos::from_array)
            .ok_or(RouteError::MissingField {
                kind,
                field: "position",
            })
    }

    fn id(&self, kind: ActionKind) -> Result<CubeId, RouteError> {
        self.id
            .map(CubeId)
            .ok_or(RouteError::MissingField { kind, field: "id" })
    }

    fn material(&self, materials: &MaterialTable) -> Result<Option<Arc<MaterialDef>>, RouteError> {
        if let Some(name) = &self.material {
            let material = materials
                .get(name)
                .ok_or_else(|| RouteError::UnknownMaterial(name.clone()))?;
            return Ok(Some(Arc::new(material.clone())));
        }
        if let Some(hex) = &self.color {
            let material =
                MaterialDef::custom(hex).ok_or_else(|| RouteError::BadColor(hex.clone()))?;
            return Ok(Some(Arc::new(material)));
        }
        Ok(None)
    }
}

/// Why a symbolic request could not be turned into an `ActionRequest`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("{kind} requires a '{field}' field")]
    MissingField {
        kind: ActionKind,
        field: &'static str,
    },

    #[error("unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("'{0}' is not a hex color")]
    BadColor(String),
}

/// Apply one request to the store.
pub fn route(store: &mut StructureStore, request: ActionRequest) -> Outcome {
    let kind = request.kind();
    let outcome = dispatch(store, request);
    if let Err(reason) = &outcome {
        log::debug!("{kind} rejected: {reason}");
    }
    outcome
}

fn dispatch(store: &mut StructureStore, request: ActionRequest) -> Outcome {
    match request {
        ActionRequest::PlaceDraft { position, material } => {
            let material = material.unwrap_or_else(|| store.current_material().clone());
            store.place(position, material).map(|_| ())
        }
        ActionRequest::PlaceAdjacent { id, face, material } => {
            let anchor = store.find(id).ok_or(Rejection::UnknownCube(id))?;
            let cell = face
                .step(anchor.cell)
                .ok_or_else(|| Rejection::out_of_bounds(anchor.cell))?;
            let material = material.unwrap_or_else(|| store.current_material().clone());
            store.place_cell(cell, material).map(|_| ())
        }
        ActionRequest::DeleteDraft { id } => store.delete_draft(id),
        ActionRequest::DeleteConfirmed { id } => store.delete_confirmed(id),
        ActionRequest::Delete { id } => {
            let status = store.find(id).ok_or(Rejection::UnknownCube(id))?.status;
            dispatch(store, ActionRequest::delete(id, status))
        }
        ActionRequest::DeleteAt { position } => {
            let cell = world_to_cell(position)?;
            let cube = store.cube_at(cell).ok_or(Rejection::EmptyCell { cell })?;
            let request = ActionRequest::delete(cube.id, cube.status);
            dispatch(store, request)
        }
        ActionRequest::SetMaterial { material } => {
            store.set_material(material);
            Ok(())
        }
        ActionRequest::ConfirmDraft => store.confirm_draft(),
        ActionRequest::Undo => store.undo(),
        ActionRequest::Collapse => store.collapse(),
        ActionRequest::CancelCollapse => store.cancel_collapse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec3, Vec3};
    use keystone_core::config::EngineConfig;
    use keystone_core::types::ActionTag;
    use keystone_rules::builtin_materials;

    fn store() -> StructureStore {
        let steel = builtin_materials().materials.remove(0);
        StructureStore::new(EngineConfig::default(), steel)
    }

    fn place_at(x: f32, y: f32, z: f32) -> ActionRequest {
        ActionRequest::PlaceDraft {
            position: Vec3::new(x, y, z),
            material: None,
        }
    }

    fn symbolic(kind: &str, payload: ActionPayload) -> Result<ActionRequest, RouteError> {
        ActionRequest::from_symbolic(kind, &payload, &builtin_materials())
    }

    #[test]
    fn test_place_defaults_to_current_material() {
        let mut s = store();
        route(&mut s, place_at(0.0, 0.5, 0.0)).expect("place");
        assert_eq!(s.draft_cubes()[0].material.name, "Steel");
    }

    #[test]
    fn test_delete_picks_list_by_status() {
        let mut s = store();
        route(&mut s, place_at(0.0, 0.5, 0.0)).expect("place");
        route(&mut s, ActionRequest::ConfirmDraft).expect("confirm");
        route(&mut s, place_at(1.0, 0.5, 0.0)).expect("place");

        route(&mut s, ActionRequest::Delete { id: CubeId(2) }).expect("delete draft");
        assert_eq!(s.history().last().map(|e| e.tag()), Some(ActionTag::DeleteDraft));

        route(&mut s, ActionRequest::Delete { id: CubeId(1) }).expect("delete confirmed");
        assert_eq!(
            s.history().last().map(|e| e.tag()),
            Some(ActionTag::DeleteConfirmed)
        );
        assert_eq!(s.cubes().count(), 0);

        assert_eq!(
            route(&mut s, ActionRequest::Delete { id: CubeId(1) }),
            Err(Rejection::UnknownCube(CubeId(1)))
        );
    }

    #[test]
    fn test_delete_at_position() {
        let mut s = store();
        route(&mut s, place_at(2.0, 0.5, 3.0)).expect("place");
        assert_eq!(
            route(
                &mut s,
                ActionRequest::DeleteAt {
                    position: Vec3::new(2.0, 1.5, 3.0)
                }
            ),
            Err(Rejection::EmptyCell {
                cell: IVec3::new(2, 1, 3)
            })
        );
        route(
            &mut s,
            ActionRequest::DeleteAt {
                position: Vec3::new(2.0, 0.5, 3.0),
            },
        )
        .expect("delete at");
        assert!(s.draft_cubes().is_empty());
    }

    #[test]
    fn test_place_adjacent() {
        let mut s = store();
        route(&mut s, place_at(0.0, 0.5, 0.0)).expect("place");
        route(
            &mut s,
            ActionRequest::PlaceAdjacent {
                id: CubeId(1),
                face: Direction::Up,
                material: None,
            },
        )
        .expect("place on top");
        assert_eq!(s.draft_cubes()[1].cell, IVec3::new(0, 1, 0));

        // Below a ground cube is underground
        assert_eq!(
            route(
                &mut s,
                ActionRequest::PlaceAdjacent {
                    id: CubeId(1),
                    face: Direction::Down,
                    material: None,
                }
            ),
            Err(Rejection::BelowGround { layer: -1 })
        );
        // Onto an occupied face
        assert_eq!(
            route(
                &mut s,
                ActionRequest::PlaceAdjacent {
                    id: CubeId(2),
                    face: Direction::Down,
                    material: None,
                }
            ),
            Err(Rejection::Occupied { cell: IVec3::ZERO })
        );
    }

    #[test]
    fn test_place_adjacent_past_grid_edge() {
        use keystone_core::constants::GRID_LIMIT;

        let mut s = store();
        let edge = GRID_LIMIT as f32;
        route(&mut s, place_at(edge, 0.5, 0.0)).expect("edge cell is buildable");
        let history_len = s.history().len();
        assert!(matches!(
            route(
                &mut s,
                ActionRequest::PlaceAdjacent {
                    id: CubeId(1),
                    face: Direction::East,
                    material: None,
                }
            ),
            Err(Rejection::OutOfBounds { .. })
        ));
        assert!(matches!(
            route(&mut s, place_at(3.0e9, 0.5, 0.0)),
            Err(Rejection::OutOfBounds { .. })
        ));
        assert_eq!(s.history().len(), history_len);
        route(&mut s, ActionRequest::ConfirmDraft).expect("confirm at the edge");
        assert!(!s.collapse_state().warning_active);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("PLACE_DRAFT".parse::<ActionKind>(), Ok(ActionKind::PlaceDraft));
        assert_eq!("place".parse::<ActionKind>(), Ok(ActionKind::PlaceDraft));
        assert_eq!("cancel-collapse".parse::<ActionKind>(), Ok(ActionKind::CancelCollapse));
        assert_eq!("Confirm".parse::<ActionKind>(), Ok(ActionKind::ConfirmDraft));
        assert_eq!(
            "EXPLODE".parse::<ActionKind>(),
            Err(RouteError::UnknownAction("EXPLODE".into()))
        );
        assert_eq!(ActionKind::DeleteConfirmed.to_string(), "DELETE_CONFIRMED");
    }

    #[test]
    fn test_symbolic_requests() {
        let request = symbolic(
            "PLACE_DRAFT",
            ActionPayload {
                position: Some([1.0, 0.5, 2.0]),
                material: Some("wood".into()),
                ..Default::default()
            },
        )
        .expect("place request");
        match request {
            ActionRequest::PlaceDraft { position, material } => {
                assert_eq!(position, Vec3::new(1.0, 0.5, 2.0));
                assert_eq!(material.map(|m| m.name.clone()), Some("Wood".to_string()));
            }
            other => panic!("unexpected request {other:?}"),
        }

        assert_eq!(
            symbolic(
                "DELETE",
                ActionPayload {
                    id: Some(4),
                    status: Some(CubeStatus::Confirmed),
                    ..Default::default()
                }
            ),
            Ok(ActionRequest::DeleteConfirmed { id: CubeId(4) })
        );
        assert_eq!(
            symbolic("UNDO", ActionPayload::default()),
            Ok(ActionRequest::Undo)
        );
    }

    #[test]
    fn test_symbolic_errors() {
        assert_eq!(
            symbolic("DELETE_DRAFT", ActionPayload::default()),
            Err(RouteError::MissingField {
                kind: ActionKind::DeleteDraft,
                field: "id"
            })
        );
        assert_eq!(
            symbolic("SET_MATERIAL", ActionPayload::default()),
            Err(RouteError::MissingField {
                kind: ActionKind::SetMaterial,
                field: "material"
            })
        );
        assert_eq!(
            symbolic(
                "SET_MATERIAL",
                ActionPayload {
                    material: Some("Unobtainium".into()),
                    ..Default::default()
                }
            ),
            Err(RouteError::UnknownMaterial("Unobtainium".into()))
        );
        assert_eq!(
            symbolic(
                "SET_MATERIAL",
                ActionPayload {
                    color: Some("#12345".into()),
                    ..Default::default()
                }
            ),
            Err(RouteError::BadColor("#12345".into()))
        );
    }

    #[test]
    fn test_custom_color_material() {
        let request = symbolic(
            "SET_MATERIAL",
            ActionPayload {
                color: Some("#ef4444".into()),
                ..Default::default()
            },
        )
        .expect("custom material");
        let mut s = store();
        route(&mut s, request).expect("set material");
        assert_eq!(s.current_material().name, "Custom");
        assert_eq!(s.current_material().density, 1000.0);
    }

    #[test]
    fn test_payload_from_ron() {
        let payload: ActionPayload =
            ron::from_str("(id: Some(3), status: Some(Draft))").expect("payload parses");
        assert_eq!(
            ActionRequest::from_symbolic("delete", &payload, &builtin_materials()),
            Ok(ActionRequest::DeleteDraft { id: CubeId(3) })
        );
    }
}
