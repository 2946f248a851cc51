#![forbid(unsafe_code)]

//! Hole registry and the resolved hold records.

use crate::grid::HoldType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference geometry for one hole under the lookup strategy: the `x,y`
/// pair parsed out of the hole's display name, plus the raw coordinates the
/// data source stores alongside.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoleGeometry {
    pub x: String,
    pub y: String,
    pub x_db: i64,
    pub y_db: i64,
}

#[derive(Clone, Debug, Default)]
pub struct HoleRegistry {
    holes: BTreeMap<u32, HoleGeometry>,
}

impl HoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hole, splitting its display name into the `x,y` pair.
    /// Names that do not split into exactly two comma-separated parts are
    /// skipped; returns whether the hole was registered.
    pub fn insert(&mut self, hole_id: u32, display_name: &str, x_db: i64, y_db: i64) -> bool {
        let parts: Vec<&str> = display_name.split(',').collect();
        let [x, y] = parts.as_slice() else {
            return false;
        };
        self.holes.insert(
            hole_id,
            HoleGeometry {
                x: (*x).to_string(),
                y: (*y).to_string(),
                x_db,
                y_db,
            },
        );
        true
    }

    pub fn get(&self, hole_id: u32) -> Option<&HoleGeometry> {
        self.holes.get(&hole_id)
    }

    pub fn contains(&self, hole_id: u32) -> bool {
        self.holes.contains_key(&hole_id)
    }

    pub fn len(&self) -> usize {
        self.holes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holes.is_empty()
    }
}

/// A resolved hold under the lookup strategy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardHold {
    pub hole_id: u32,
    pub role_id: u32,
    pub x: String,
    pub y: String,
    pub x_db: i64,
    pub y_db: i64,
    pub role_name: String,
    pub role_color: Option<String>,
}

/// A resolved hold under the formula strategy. The three geometry fields are
/// present together for ids inside one of the grid bands and absent together
/// otherwise; absent fields stay out of the serialized record entirely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridHold {
    pub hole_id: u32,
    #[serde(default)]
    pub role_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_num: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_num: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_type: Option<HoldType>,
}
