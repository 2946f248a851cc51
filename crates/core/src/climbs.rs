#![forbid(unsafe_code)]

//! Climb records and the decoded-climb assembler.
//!
//! Two pipelines share the tokenizer: the lookup strategy resolves against
//! the hole and role registries and drops tokens either registry does not
//! know; the formula strategy keeps every token and attaches grid geometry
//! where the band table has it. Decoding never mutates the source climb.

use crate::frames;
use crate::grid;
use crate::holds::{BoardHold, GridHold, HoleRegistry};
use crate::roles::RoleRegistry;
use serde::Serialize;

/// One climb as read from the data source.
#[derive(Clone, Debug)]
pub struct ClimbRow {
    pub uuid: String,
    pub layout_id: i64,
    pub name: String,
    pub setter_username: Option<String>,
    pub description: Option<String>,
    pub frames: String,
    pub edge_left: Option<i64>,
    pub edge_right: Option<i64>,
    pub edge_bottom: Option<i64>,
    pub edge_top: Option<i64>,
    pub angle: i64,
    pub display_difficulty: Option<f64>,
    pub ascensionist_count: i64,
    pub quality_average: Option<f64>,
}

/// Lookup-pipeline output: the climb with its raw frame string replaced by
/// the resolved hold sequence.
#[derive(Clone, Debug, Serialize)]
pub struct DecodedClimb {
    pub uuid: String,
    pub layout_id: i64,
    pub name: String,
    pub setter_username: Option<String>,
    pub description: Option<String>,
    pub edge_left: Option<i64>,
    pub edge_right: Option<i64>,
    pub edge_bottom: Option<i64>,
    pub edge_top: Option<i64>,
    pub angle: i64,
    pub display_difficulty: Option<f64>,
    pub ascensionist_count: i64,
    pub quality_average: Option<f64>,
    pub holds: Vec<BoardHold>,
}

/// Formula-pipeline output.
#[derive(Clone, Debug, Serialize)]
pub struct SimplifiedClimb {
    pub name: String,
    pub angle: i64,
    pub holds: Vec<GridHold>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HoldPoint {
    pub x: String,
    pub y: String,
}

/// Start/finish projection for lightweight consumers.
#[derive(Clone, Debug, Serialize)]
pub struct ClimbSummary {
    pub name: String,
    pub start_holds: Vec<HoldPoint>,
    pub finish_holds: Vec<HoldPoint>,
    pub edge_left: Option<i64>,
    pub edge_right: Option<i64>,
    pub edge_bottom: Option<i64>,
    pub edge_top: Option<i64>,
}

/// Lookup-strategy resolution: a token becomes a hold only when both its
/// hole and its role are registered; unmatched tokens are dropped silently
/// and order is otherwise preserved.
pub fn resolve_holds(
    frames_str: &str,
    holes: &HoleRegistry,
    roles: &RoleRegistry,
) -> Vec<BoardHold> {
    let mut out = Vec::new();
    for token in frames::tokens(frames_str) {
        let (Some(hole), Some(role)) = (holes.get(token.hole_id), roles.get(token.role_id)) else {
            continue;
        };
        out.push(BoardHold {
            hole_id: token.hole_id,
            role_id: token.role_id,
            x: hole.x.clone(),
            y: hole.y.clone(),
            x_db: hole.x_db,
            y_db: hole.y_db,
            role_name: role.name.clone(),
            role_color: role.screen_color.clone(),
        });
    }
    out
}

/// Formula-strategy resolution: every token yields a hold; grid geometry is
/// attached only inside the band table, the role falls back to `"unknown"`.
pub fn resolve_grid_holds(frames_str: &str, roles: &RoleRegistry) -> Vec<GridHold> {
    frames::tokens(frames_str)
        .map(|token| {
            let position = grid::grid_position(token.hole_id);
            GridHold {
                hole_id: token.hole_id,
                role_name: roles.name_or_unknown(token.role_id).to_string(),
                row_num: position.map(|p| p.row_num),
                col_num: position.map(|p| p.col_num),
                hold_type: position.map(|p| p.hold_type),
            }
        })
        .collect()
}

pub fn decode_climb(
    climb: ClimbRow,
    holes: &HoleRegistry,
    roles: &RoleRegistry,
) -> DecodedClimb {
    let holds = resolve_holds(&climb.frames, holes, roles);
    DecodedClimb {
        uuid: climb.uuid,
        layout_id: climb.layout_id,
        name: climb.name,
        setter_username: climb.setter_username,
        description: climb.description,
        edge_left: climb.edge_left,
        edge_right: climb.edge_right,
        edge_bottom: climb.edge_bottom,
        edge_top: climb.edge_top,
        angle: climb.angle,
        display_difficulty: climb.display_difficulty,
        ascensionist_count: climb.ascensionist_count,
        quality_average: climb.quality_average,
        holds,
    }
}

pub fn simplify_climb(climb: &ClimbRow, roles: &RoleRegistry) -> SimplifiedClimb {
    SimplifiedClimb {
        name: climb.name.clone(),
        angle: climb.angle,
        holds: resolve_grid_holds(&climb.frames, roles),
    }
}

pub fn summarize_climb(climb: &DecodedClimb) -> ClimbSummary {
    let points = |role: &str| -> Vec<HoldPoint> {
        climb
            .holds
            .iter()
            .filter(|hold| hold.role_name == role)
            .map(|hold| HoldPoint {
                x: hold.x.clone(),
                y: hold.y.clone(),
            })
            .collect()
    };
    ClimbSummary {
        name: climb.name.clone(),
        start_holds: points("start"),
        finish_holds: points("finish"),
        edge_left: climb.edge_left,
        edge_right: climb.edge_right,
        edge_bottom: climb.edge_bottom,
        edge_top: climb.edge_top,
    }
}
