#![forbid(unsafe_code)]

//! bc_export — batch export of a board database into JSON artifacts.
//!
//! The full run surveys the schema, dumps holes and roles, counts hole
//! usage across the popular climbs, decodes every popular climb through the
//! lookup strategy, and writes summaries. The simplified run deduplicates
//! climbs by name and decodes them through the formula strategy.

use bc_core::aggregate::{dedup_by_name, hole_frequency};
use bc_core::climbs::{DecodedClimb, decode_climb, simplify_climb, summarize_climb};
use bc_core::roles::RoleRegistry;
use bc_storage::{BoardStore, StoreError};
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const DEFAULT_PRODUCT_ID: i64 = 1;
const DEFAULT_LAYOUT_ID: i64 = 1;
const DEFAULT_MIN_ASCENTS_FULL: i64 = 100;
const DEFAULT_MIN_ASCENTS_SIMPLIFIED: i64 = 50;
const DEFAULT_SUMMARY_LIMIT: usize = 20;

#[derive(Debug)]
struct ExportConfig {
    db_path: PathBuf,
    out_dir: PathBuf,
    product_id: i64,
    layout_id: i64,
    min_ascents: Option<i64>,
    summary_limit: usize,
    simplified: bool,
}

fn usage() -> &'static str {
    "bc_export — export board-climb JSON artifacts from a board database\n\n\
USAGE:\n\
  bc_export --db FILE [--out DIR] [--product-id ID] [--layout-id ID]\n\
            [--min-ascents N] [--summary-limit N] [--simplified]\n\n\
NOTES:\n\
  - `--db` / BC_DB names the SQLite board database (read-only).\n\
  - `--out` / BC_OUT names the artifact directory (default: current dir).\n\
  - default run writes schema.json, holes.json, roles.json,\n\
    hole_frequency.json, climbs.json, climbs_raw_attributes.json and\n\
    climb_summary.json; `--min-ascents` defaults to 100.\n\
  - `--simplified` writes climb_data.json (name-deduplicated climbs with\n\
    formula-strategy grid holds); `--min-ascents` defaults to 50.\n"
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_args(args: &[String]) -> Result<ExportConfig, String> {
    let mut db_path: Option<PathBuf> = env_var("BC_DB").map(PathBuf::from);
    let mut out_dir: Option<PathBuf> = env_var("BC_OUT").map(PathBuf::from);
    let mut product_id: i64 = env_var("BC_PRODUCT_ID")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PRODUCT_ID);
    let mut layout_id: i64 = env_var("BC_LAYOUT_ID")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_LAYOUT_ID);
    let mut min_ascents: Option<i64> = env_var("BC_MIN_ASCENTS").and_then(|v| v.parse().ok());
    let mut summary_limit: usize = env_var("BC_SUMMARY_LIMIT")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SUMMARY_LIMIT);
    let mut simplified = false;

    let mut i = 0usize;
    while i < args.len() {
        let a = args[i].as_str();
        match a {
            "--db" => {
                i += 1;
                let v = args.get(i).ok_or("--db requires FILE")?;
                db_path = Some(PathBuf::from(v));
            }
            "--out" => {
                i += 1;
                let v = args.get(i).ok_or("--out requires DIR")?;
                out_dir = Some(PathBuf::from(v));
            }
            "--product-id" => {
                i += 1;
                let v = args.get(i).ok_or("--product-id requires ID")?;
                product_id = v
                    .parse::<i64>()
                    .map_err(|_| "--product-id must be an integer")?;
            }
            "--layout-id" => {
                i += 1;
                let v = args.get(i).ok_or("--layout-id requires ID")?;
                layout_id = v
                    .parse::<i64>()
                    .map_err(|_| "--layout-id must be an integer")?;
            }
            "--min-ascents" => {
                i += 1;
                let v = args.get(i).ok_or("--min-ascents requires N")?;
                min_ascents = Some(
                    v.parse::<i64>()
                        .map_err(|_| "--min-ascents must be an integer")?,
                );
            }
            "--summary-limit" => {
                i += 1;
                let v = args.get(i).ok_or("--summary-limit requires N")?;
                summary_limit = v
                    .parse::<usize>()
                    .map_err(|_| "--summary-limit must be an integer")?;
            }
            "--simplified" => simplified = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(ExportConfig {
        db_path: db_path.ok_or("--db (or BC_DB) is required")?,
        out_dir: out_dir.unwrap_or_else(|| PathBuf::from(".")),
        product_id,
        layout_id,
        min_ascents,
        summary_limit,
        simplified,
    })
}

#[derive(Debug)]
enum ExportError {
    Store(StoreError),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "store: {err}"),
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Json(err) => write!(f, "json: {err}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<StoreError> for ExportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

fn write_artifact(out_dir: &Path, file_name: &str, value: &Value) -> Result<(), ExportError> {
    let path = out_dir.join(file_name);
    let pretty = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, pretty)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn schema_artifact(store: &BoardStore) -> Result<Value, ExportError> {
    let mut tables = serde_json::Map::new();
    for table in store.schema()? {
        let columns: Vec<Value> = table
            .columns
            .iter()
            .map(|col| {
                json!({
                    "id": col.cid,
                    "name": col.name,
                    "type": col.column_type,
                    "notnull": col.notnull,
                    "default_value": col.default_value,
                    "primary_key": col.primary_key,
                })
            })
            .collect();
        tables.insert(table.name, Value::Array(columns));
    }
    Ok(Value::Object(tables))
}

/// Descending-count frequency list rendered as an insertion-ordered
/// mapping, the shape the visualization side consumes.
fn frequency_artifact(frequency: &[(u32, u64)]) -> Value {
    let mut mapping = serde_json::Map::new();
    for (hole_id, count) in frequency {
        mapping.insert(hole_id.to_string(), Value::from(*count));
    }
    Value::Object(mapping)
}

fn run_full(store: &BoardStore, cfg: &ExportConfig) -> Result<(), ExportError> {
    let min_ascents = cfg.min_ascents.unwrap_or(DEFAULT_MIN_ASCENTS_FULL);

    write_artifact(&cfg.out_dir, "schema.json", &schema_artifact(store)?)?;

    let holes = store.holes(cfg.product_id)?;
    eprintln!("found {} holes for product_id={}", holes.len(), cfg.product_id);
    let holes_value: Vec<Value> = holes
        .iter()
        .map(|h| {
            json!({
                "id": h.id,
                "product_id": h.product_id,
                "name": h.name,
                "x": h.x,
                "y": h.y,
            })
        })
        .collect();
    write_artifact(&cfg.out_dir, "holes.json", &Value::Array(holes_value))?;

    let hole_registry = store.hole_registry(cfg.product_id)?;
    eprintln!("hole registry holds {} parsed entries", hole_registry.len());

    // The valid-id set for frequency counting is every fetched hole, not
    // just the ones whose display name parsed.
    let valid_ids: BTreeSet<u32> = holes.iter().map(|h| h.id).collect();
    let frames = store.popular_frames(cfg.layout_id, min_ascents)?;
    let frequency = hole_frequency(frames.iter().map(String::as_str), &valid_ids);
    eprintln!(
        "counted usage for {} holes across {} climbs with more than {min_ascents} ascents",
        frequency.len(),
        frames.len()
    );
    write_artifact(
        &cfg.out_dir,
        "hole_frequency.json",
        &frequency_artifact(&frequency),
    )?;

    let roles = store.placement_roles(cfg.product_id)?;
    let roles_value: Vec<Value> = roles
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "product_id": r.product_id,
                "name": r.name,
                "screen_color": r.screen_color,
            })
        })
        .collect();
    write_artifact(&cfg.out_dir, "roles.json", &Value::Array(roles_value))?;
    let role_registry = store.role_registry(cfg.product_id)?;

    let climbs = store.popular_climbs(cfg.layout_id, min_ascents)?;
    eprintln!(
        "found {} listed climbs with more than {min_ascents} ascents",
        climbs.len()
    );
    let decoded: Vec<DecodedClimb> = climbs
        .into_iter()
        .map(|climb| decode_climb(climb, &hole_registry, &role_registry))
        .collect();
    write_artifact(&cfg.out_dir, "climbs.json", &serde_json::to_value(&decoded)?)?;

    let attributes = store.climb_attributes(cfg.layout_id, min_ascents)?;
    let attributes_value: Vec<Value> = attributes.into_iter().map(Value::Object).collect();
    write_artifact(
        &cfg.out_dir,
        "climbs_raw_attributes.json",
        &Value::Array(attributes_value),
    )?;

    let summaries: Vec<Value> = decoded
        .iter()
        .take(cfg.summary_limit)
        .map(|climb| serde_json::to_value(summarize_climb(climb)))
        .collect::<Result<_, _>>()?;
    write_artifact(
        &cfg.out_dir,
        "climb_summary.json",
        &Value::Array(summaries),
    )?;

    Ok(())
}

fn run_simplified(store: &BoardStore, cfg: &ExportConfig) -> Result<(), ExportError> {
    let min_ascents = cfg.min_ascents.unwrap_or(DEFAULT_MIN_ASCENTS_SIMPLIFIED);

    let climbs = store.popular_climbs(cfg.layout_id, min_ascents)?;
    eprintln!(
        "found {} climbs with more than {min_ascents} ascents",
        climbs.len()
    );
    let unique = dedup_by_name(climbs);
    eprintln!("filtered down to {} unique climbs by name", unique.len());

    let roles = RoleRegistry::builtin();
    let simplified: Vec<Value> = unique
        .iter()
        .map(|climb| serde_json::to_value(simplify_climb(climb, &roles)))
        .collect::<Result<_, _>>()?;
    write_artifact(&cfg.out_dir, "climb_data.json", &Value::Array(simplified))
}

fn run(cfg: &ExportConfig) -> Result<(), ExportError> {
    let store = BoardStore::open(&cfg.db_path)?;
    eprintln!("connected to {}", cfg.db_path.display());
    std::fs::create_dir_all(&cfg.out_dir)?;

    let result = if cfg.simplified {
        run_simplified(&store, cfg)
    } else {
        run_full(&store, cfg)
    };

    match result {
        Ok(()) => {
            store.close()?;
            eprintln!("database connection closed");
            Ok(())
        }
        Err(err) => {
            // Dropping the store releases the connection on the error path.
            drop(store);
            Err(err)
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print!("{}", usage());
        return;
    }
    let cfg = match parse_args(&args) {
        Ok(cfg) => cfg,
        Err(message) => {
            eprintln!("bc_export: {message}");
            eprint!("{}", usage());
            std::process::exit(2);
        }
    };
    if let Err(err) = run(&cfg) {
        eprintln!("bc_export: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_args_requires_a_database() {
        let err = parse_args(&args(&["--out", "artifacts"])).unwrap_err();
        assert!(err.contains("--db"));
    }

    #[test]
    fn parse_args_defaults_match_the_full_run() {
        let cfg = parse_args(&args(&["--db", "board.db"])).expect("parse");
        assert_eq!(cfg.db_path, PathBuf::from("board.db"));
        assert_eq!(cfg.out_dir, PathBuf::from("."));
        assert_eq!(cfg.product_id, DEFAULT_PRODUCT_ID);
        assert_eq!(cfg.layout_id, DEFAULT_LAYOUT_ID);
        assert_eq!(cfg.min_ascents, None);
        assert_eq!(cfg.summary_limit, DEFAULT_SUMMARY_LIMIT);
        assert!(!cfg.simplified);
    }

    #[test]
    fn parse_args_reads_every_flag() {
        let cfg = parse_args(&args(&[
            "--db",
            "board.db",
            "--out",
            "artifacts",
            "--product-id",
            "3",
            "--layout-id",
            "8",
            "--min-ascents",
            "25",
            "--summary-limit",
            "5",
            "--simplified",
        ]))
        .expect("parse");
        assert_eq!(cfg.out_dir, PathBuf::from("artifacts"));
        assert_eq!(cfg.product_id, 3);
        assert_eq!(cfg.layout_id, 8);
        assert_eq!(cfg.min_ascents, Some(25));
        assert_eq!(cfg.summary_limit, 5);
        assert!(cfg.simplified);
    }

    #[test]
    fn parse_args_rejects_unknown_flags() {
        let err = parse_args(&args(&["--db", "board.db", "--bogus"])).unwrap_err();
        assert!(err.contains("--bogus"));
    }

    #[test]
    fn frequency_artifact_keeps_descending_order() {
        let value = frequency_artifact(&[(1164, 900), (1090, 250), (1465, 12)]);
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["1164", "1090", "1465"]);
        assert_eq!(value["1164"], Value::from(900u64));
    }
}
