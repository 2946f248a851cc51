#![forbid(unsafe_code)]

//! Read-only SQLite access to a board database.
//!
//! The database is externally produced reference data: the store opens an
//! existing file, never creates or migrates one, and performs no writes.
//! One connection is acquired per run; dropping the store releases it on
//! error paths, `close()` surfaces release errors on the success path.

use bc_core::climbs::ClimbRow;
use bc_core::holds::HoleRegistry;
use bc_core::roles::RoleRegistry;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, params};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    MissingDatabase(PathBuf),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::MissingDatabase(path) => {
                write!(f, "database not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

#[derive(Clone, Debug)]
pub struct HoleRow {
    pub id: u32,
    pub product_id: i64,
    pub name: String,
    pub x: i64,
    pub y: i64,
}

#[derive(Clone, Debug)]
pub struct PlacementRoleRow {
    pub id: u32,
    pub product_id: i64,
    pub name: String,
    pub screen_color: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    pub column_type: String,
    pub notnull: bool,
    pub default_value: Option<String>,
    pub primary_key: i64,
}

#[derive(Clone, Debug)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

const CLIMB_COLUMNS: &str = "c.uuid, c.layout_id, c.name, c.setter_username, c.description, \
     c.frames, c.edge_left, c.edge_right, c.edge_bottom, c.edge_top, \
     cs.angle, cs.display_difficulty, cs.ascensionist_count, cs.quality_average";

// Enumeration order is pinned so every downstream artifact is stable
// across runs.
const CLIMB_FILTER: &str = "FROM climbs c \
     JOIN climb_stats cs ON c.uuid = cs.climb_uuid \
     WHERE c.is_listed = 1 AND c.is_draft = 0 \
       AND c.layout_id = ?1 AND cs.ascensionist_count > ?2 \
     ORDER BY cs.ascensionist_count DESC, c.uuid ASC";

#[derive(Debug)]
pub struct BoardStore {
    conn: Connection,
}

impl BoardStore {
    /// Opens an existing board database read-only; refuses a missing file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::MissingDatabase(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Releases the read connection, surfacing close-time errors.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_conn, err)| StoreError::Sql(err))
    }

    pub fn holes(&self, product_id: i64) -> Result<Vec<HoleRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, product_id, name, x, y FROM holes \
             WHERE product_id = ?1 ORDER BY id ASC",
        )?;
        let mut rows = stmt.query(params![product_id])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(HoleRow {
                id: row.get(0)?,
                product_id: row.get(1)?,
                name: row.get(2)?,
                x: row.get(3)?,
                y: row.get(4)?,
            });
        }
        Ok(out)
    }

    pub fn placement_roles(&self, product_id: i64) -> Result<Vec<PlacementRoleRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, product_id, name, screen_color FROM placement_roles \
             WHERE product_id = ?1 ORDER BY id ASC",
        )?;
        let mut rows = stmt.query(params![product_id])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(PlacementRoleRow {
                id: row.get(0)?,
                product_id: row.get(1)?,
                name: row.get(2)?,
                screen_color: row.get(3)?,
            });
        }
        Ok(out)
    }

    /// Listed, non-draft climbs on one layout with strictly more than
    /// `min_ascents` ascents, joined with their stats.
    pub fn popular_climbs(
        &self,
        layout_id: i64,
        min_ascents: i64,
    ) -> Result<Vec<ClimbRow>, StoreError> {
        let sql = format!("SELECT {CLIMB_COLUMNS} {CLIMB_FILTER}");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![layout_id, min_ascents])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(ClimbRow {
                uuid: row.get(0)?,
                layout_id: row.get(1)?,
                name: row.get(2)?,
                setter_username: row.get(3)?,
                description: row.get(4)?,
                frames: row.get(5)?,
                edge_left: row.get(6)?,
                edge_right: row.get(7)?,
                edge_bottom: row.get(8)?,
                edge_top: row.get(9)?,
                angle: row.get(10)?,
                display_difficulty: row.get(11)?,
                ascensionist_count: row.get(12)?,
                quality_average: row.get(13)?,
            });
        }
        Ok(out)
    }

    /// Frame strings only, same filter as `popular_climbs`; feeds the
    /// frequency pass without materializing full climb rows.
    pub fn popular_frames(
        &self,
        layout_id: i64,
        min_ascents: i64,
    ) -> Result<Vec<String>, StoreError> {
        let sql = format!("SELECT c.frames {CLIMB_FILTER}");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![layout_id, min_ascents])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(row.get::<_, String>(0)?);
        }
        Ok(out)
    }

    /// Every climb/stats column of the filtered population, dynamically
    /// typed. Schema-exploration support; column names come from the
    /// statement, values map to JSON by SQLite storage class.
    pub fn climb_attributes(
        &self,
        layout_id: i64,
        min_ascents: i64,
    ) -> Result<Vec<serde_json::Map<String, serde_json::Value>>, StoreError> {
        let sql = format!("SELECT c.*, cs.* {CLIMB_FILTER}");
        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut rows = stmt.query(params![layout_id, min_ascents])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = serde_json::Map::new();
            for (index, column) in columns.iter().enumerate() {
                record.insert(column.clone(), column_value(row.get_ref(index)?));
            }
            out.push(record);
        }
        Ok(out)
    }

    /// Every table in the database with its `table_info` columns.
    pub fn schema(&self) -> Result<Vec<TableSchema>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name ASC",
        )?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get::<_, String>(0)?);
        }
        drop(rows);
        drop(stmt);

        let mut out = Vec::new();
        for name in names {
            let columns = self.table_columns(&name)?;
            out.push(TableSchema { name, columns });
        }
        Ok(out)
    }

    fn table_columns(&self, table: &str) -> Result<Vec<ColumnInfo>, StoreError> {
        // pragma_table_info as a table-valued function keeps the table name
        // a bound parameter instead of spliced SQL.
        let mut stmt = self.conn.prepare(
            "SELECT cid, name, type, \"notnull\", dflt_value, pk \
             FROM pragma_table_info(?1) ORDER BY cid ASC",
        )?;
        let mut rows = stmt.query(params![table])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(ColumnInfo {
                cid: row.get(0)?,
                name: row.get(1)?,
                column_type: row.get(2)?,
                notnull: row.get::<_, i64>(3)? != 0,
                default_value: row.get(4)?,
                primary_key: row.get(5)?,
            });
        }
        Ok(out)
    }

    /// Builds the lookup-strategy hole registry for one product; rows whose
    /// display name does not split into an `x,y` pair are skipped.
    pub fn hole_registry(&self, product_id: i64) -> Result<HoleRegistry, StoreError> {
        let mut registry = HoleRegistry::new();
        for row in self.holes(product_id)? {
            registry.insert(row.id, &row.name, row.x, row.y);
        }
        Ok(registry)
    }

    pub fn role_registry(&self, product_id: i64) -> Result<RoleRegistry, StoreError> {
        let mut registry = RoleRegistry::new();
        for row in self.placement_roles(product_id)? {
            registry.insert(row.id, row.name, row.screen_color);
        }
        Ok(registry)
    }
}

fn column_value(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(v) => serde_json::Value::from(v),
        ValueRef::Real(v) => serde_json::Value::from(v),
        ValueRef::Text(v) => serde_json::Value::String(String::from_utf8_lossy(v).into_owned()),
        // The board tables carry no blob columns the decoder contracts for.
        ValueRef::Blob(_) => serde_json::Value::Null,
    }
}
