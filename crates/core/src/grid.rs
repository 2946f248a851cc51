#![forbid(unsafe_code)]

//! Formula-strategy grid geometry.
//!
//! Hole ids map onto board rows and columns through four disjoint id bands,
//! held in an ordered table and consulted by range lookup. The constants are
//! calibrated against one physical board layout and are never derived.

use serde::{Deserialize, Serialize};

/// Which physical hold set a grid id belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldType {
    Large,
    Small,
    BottomRow,
    TopRow,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPosition {
    pub row_num: f64,
    pub col_num: f64,
    pub hold_type: HoldType,
}

struct Band {
    first: u32,
    last: u32,
    hold_type: HoldType,
    position: fn(u32) -> (f64, f64),
}

const BANDS: [Band; 4] = [
    Band {
        first: 1090,
        last: 1395,
        hold_type: HoldType::Large,
        position: large_position,
    },
    Band {
        first: 1465,
        last: 1599,
        hold_type: HoldType::Small,
        position: small_position,
    },
    Band {
        first: 1073,
        last: 1089,
        hold_type: HoldType::BottomRow,
        position: bottom_row_position,
    },
    Band {
        first: 1447,
        last: 1464,
        hold_type: HoldType::TopRow,
        position: top_row_position,
    },
];

/// Main grid: 17 columns per row, rows and columns 1-indexed.
fn large_position(hole_id: u32) -> (f64, f64) {
    let index = hole_id - 1090;
    (f64::from(index / 17) + 1.0, f64::from(index % 17) + 1.0)
}

/// Staggered sub-grid: 9 holds per row on half-integer row lines; column
/// offset alternates between 0.5 and 1.5 with row parity.
fn small_position(hole_id: u32) -> (f64, f64) {
    let index = hole_id - 1465;
    let row_idx = index / 9;
    let start_col = if row_idx % 2 == 0 { 0.5 } else { 1.5 };
    (
        1.5 + f64::from(row_idx),
        start_col + f64::from((index % 9) * 2),
    )
}

/// Bottom edge row: row 0, columns counted right to left.
fn bottom_row_position(hole_id: u32) -> (f64, f64) {
    (0.0, f64::from(1089 - hole_id + 1))
}

/// Top edge row: row -1, columns descending from 17.5.
fn top_row_position(hole_id: u32) -> (f64, f64) {
    (-1.0, 17.5 - f64::from(hole_id - 1447))
}

/// Resolves a hole id against the band table; `None` outside every band.
pub fn grid_position(hole_id: u32) -> Option<GridPosition> {
    let band = BANDS
        .iter()
        .find(|band| (band.first..=band.last).contains(&hole_id))?;
    let (row_num, col_num) = (band.position)(hole_id);
    Some(GridPosition {
        row_num,
        col_num,
        hold_type: band.hold_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_band_is_a_17_column_grid() {
        for hole_id in 1090..=1395 {
            let position = grid_position(hole_id).unwrap();
            let index = hole_id - 1090;
            assert_eq!(position.hold_type, HoldType::Large);
            assert_eq!(position.row_num, f64::from(index / 17) + 1.0);
            assert_eq!(position.col_num, f64::from(index % 17) + 1.0);
        }
    }

    #[test]
    fn small_band_staggers_by_row_parity() {
        for hole_id in 1465..=1599 {
            let position = grid_position(hole_id).unwrap();
            let index = hole_id - 1465;
            let row_idx = index / 9;
            let start_col = if row_idx % 2 == 0 { 0.5 } else { 1.5 };
            assert_eq!(position.hold_type, HoldType::Small);
            assert_eq!(position.row_num, 1.5 + f64::from(row_idx));
            assert_eq!(position.col_num, start_col + f64::from((index % 9) * 2));
        }
    }

    #[test]
    fn bottom_row_counts_right_to_left() {
        for hole_id in 1073..=1089 {
            let position = grid_position(hole_id).unwrap();
            assert_eq!(position.hold_type, HoldType::BottomRow);
            assert_eq!(position.row_num, 0.0);
            assert_eq!(position.col_num, f64::from(1089 - hole_id + 1));
        }
        assert_eq!(grid_position(1089).unwrap().col_num, 1.0);
        assert_eq!(grid_position(1073).unwrap().col_num, 17.0);
    }

    #[test]
    fn top_row_descends_from_half_columns() {
        for hole_id in 1447..=1464 {
            let position = grid_position(hole_id).unwrap();
            assert_eq!(position.hold_type, HoldType::TopRow);
            assert_eq!(position.row_num, -1.0);
            assert_eq!(position.col_num, 17.5 - f64::from(hole_id - 1447));
        }
        assert_eq!(grid_position(1447).unwrap().col_num, 17.5);
        assert_eq!(grid_position(1464).unwrap().col_num, 0.5);
    }

    #[test]
    fn ids_outside_every_band_have_no_position() {
        for hole_id in [0, 1, 1072, 1396, 1446, 1600, 2000, u32::MAX] {
            assert!(grid_position(hole_id).is_none(), "hole {hole_id}");
        }
    }

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(grid_position(1090).unwrap().hold_type, HoldType::Large);
        assert_eq!(grid_position(1395).unwrap().hold_type, HoldType::Large);
        assert_eq!(grid_position(1465).unwrap().hold_type, HoldType::Small);
        assert_eq!(grid_position(1599).unwrap().hold_type, HoldType::Small);
    }

    #[test]
    fn hold_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&HoldType::BottomRow).unwrap(),
            "\"bottom_row\""
        );
        assert_eq!(serde_json::to_string(&HoldType::Large).unwrap(), "\"large\"");
    }
}
