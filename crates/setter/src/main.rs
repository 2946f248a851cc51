#![forbid(unsafe_code)]

//! bc_setter — pointer-plan computation for the automation boundary.
//!
//! Consumes the ingress payload (`{"holds": [...]}` forwarded as a single
//! JSON-encoded argument, a file, or stdin) and prints the pixel targets
//! the downstream automation collaborator would click. Holds without grid
//! coordinates are skipped silently. This binary never drives a pointer.

use bc_core::holds::GridHold;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;

// Calibration placeholders for the emulator window; override per setup.
const DEFAULT_ORIGIN_X: f64 = 500.0;
const DEFAULT_ORIGIN_Y: f64 = 200.0;
const DEFAULT_COL_SPACING: f64 = 40.0;
const DEFAULT_ROW_SPACING: f64 = 40.0;

#[derive(Clone, Debug, Deserialize)]
struct ClimbPayload {
    #[serde(default)]
    holds: Vec<GridHold>,
}

#[derive(Clone, Copy, Debug)]
struct Calibration {
    origin_x: f64,
    origin_y: f64,
    col_spacing: f64,
    row_spacing: f64,
}

#[derive(Debug)]
enum PayloadSource {
    Inline(String),
    File(PathBuf),
    Stdin,
}

#[derive(Debug)]
struct SetterConfig {
    payload: PayloadSource,
    calibration: Calibration,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct ClickTarget {
    hole_id: u32,
    role_name: String,
    row_num: f64,
    col_num: f64,
    pixel_x: i64,
    pixel_y: i64,
}

/// Maps every hold carrying both grid coordinates to a pixel target:
/// `pixel = origin + coordinate * spacing`, rounded to the nearest pixel.
/// Returns the plan and the number of holds skipped for missing geometry.
fn click_plan(holds: &[GridHold], calibration: Calibration) -> (Vec<ClickTarget>, usize) {
    let mut plan = Vec::new();
    let mut skipped = 0usize;
    for hold in holds {
        let (Some(row_num), Some(col_num)) = (hold.row_num, hold.col_num) else {
            skipped += 1;
            continue;
        };
        let pixel_x = (calibration.origin_x + col_num * calibration.col_spacing).round() as i64;
        let pixel_y = (calibration.origin_y + row_num * calibration.row_spacing).round() as i64;
        plan.push(ClickTarget {
            hole_id: hold.hole_id,
            role_name: hold.role_name.clone(),
            row_num,
            col_num,
            pixel_x,
            pixel_y,
        });
    }
    (plan, skipped)
}

fn usage() -> &'static str {
    "bc_setter — compute the click plan for a climb payload\n\n\
USAGE:\n\
  bc_setter [--payload-json JSON | --payload FILE]\n\
            [--origin-x PX] [--origin-y PX]\n\
            [--col-spacing PX] [--row-spacing PX]\n\n\
NOTES:\n\
  - the payload is a JSON body with a `holds` array, exactly as the\n\
    ingress endpoint forwards it; without a payload flag it is read\n\
    from stdin.\n\
  - calibration falls back to BC_ORIGIN_X / BC_ORIGIN_Y /\n\
    BC_COL_SPACING / BC_ROW_SPACING, then to the 500/200/40/40\n\
    placeholders.\n\
  - the plan is printed to stdout; no input device is touched.\n"
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_args(args: &[String]) -> Result<SetterConfig, String> {
    let mut payload: Option<PayloadSource> = None;
    let mut origin_x: f64 = env_var("BC_ORIGIN_X")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_ORIGIN_X);
    let mut origin_y: f64 = env_var("BC_ORIGIN_Y")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_ORIGIN_Y);
    let mut col_spacing: f64 = env_var("BC_COL_SPACING")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_COL_SPACING);
    let mut row_spacing: f64 = env_var("BC_ROW_SPACING")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_ROW_SPACING);

    let mut i = 0usize;
    while i < args.len() {
        let a = args[i].as_str();
        match a {
            "--payload-json" => {
                i += 1;
                let v = args.get(i).ok_or("--payload-json requires JSON")?;
                payload = Some(PayloadSource::Inline(v.to_string()));
            }
            "--payload" => {
                i += 1;
                let v = args.get(i).ok_or("--payload requires FILE")?;
                payload = Some(PayloadSource::File(PathBuf::from(v)));
            }
            "--origin-x" => {
                i += 1;
                let v = args.get(i).ok_or("--origin-x requires PX")?;
                origin_x = v.parse::<f64>().map_err(|_| "--origin-x must be a number")?;
            }
            "--origin-y" => {
                i += 1;
                let v = args.get(i).ok_or("--origin-y requires PX")?;
                origin_y = v.parse::<f64>().map_err(|_| "--origin-y must be a number")?;
            }
            "--col-spacing" => {
                i += 1;
                let v = args.get(i).ok_or("--col-spacing requires PX")?;
                col_spacing = v
                    .parse::<f64>()
                    .map_err(|_| "--col-spacing must be a number")?;
            }
            "--row-spacing" => {
                i += 1;
                let v = args.get(i).ok_or("--row-spacing requires PX")?;
                row_spacing = v
                    .parse::<f64>()
                    .map_err(|_| "--row-spacing must be a number")?;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(SetterConfig {
        payload: payload.unwrap_or(PayloadSource::Stdin),
        calibration: Calibration {
            origin_x,
            origin_y,
            col_spacing,
            row_spacing,
        },
    })
}

#[derive(Debug)]
enum SetterError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for SetterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Json(err) => write!(f, "json: {err}"),
        }
    }
}

impl std::error::Error for SetterError {}

impl From<std::io::Error> for SetterError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SetterError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

fn read_payload(source: &PayloadSource) -> Result<String, SetterError> {
    match source {
        PayloadSource::Inline(raw) => Ok(raw.clone()),
        PayloadSource::File(path) => Ok(std::fs::read_to_string(path)?),
        PayloadSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn run(cfg: &SetterConfig) -> Result<(), SetterError> {
    let raw = read_payload(&cfg.payload)?;
    let payload: ClimbPayload = serde_json::from_str(&raw)?;
    let (plan, skipped) = click_plan(&payload.holds, cfg.calibration);
    eprintln!(
        "planned {} clicks, skipped {skipped} holds without grid coordinates",
        plan.len()
    );
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
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
            eprintln!("bc_setter: {message}");
            eprint!("{}", usage());
            std::process::exit(2);
        }
    };
    if let Err(err) = run(&cfg) {
        eprintln!("bc_setter: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Calibration {
        Calibration {
            origin_x: DEFAULT_ORIGIN_X,
            origin_y: DEFAULT_ORIGIN_Y,
            col_spacing: DEFAULT_COL_SPACING,
            row_spacing: DEFAULT_ROW_SPACING,
        }
    }

    fn hold(hole_id: u32, row_num: Option<f64>, col_num: Option<f64>) -> GridHold {
        GridHold {
            hole_id,
            role_name: "middle".to_string(),
            row_num,
            col_num,
            hold_type: None,
        }
    }

    #[test]
    fn first_grid_cell_maps_to_the_default_origin_offsets() {
        let (plan, skipped) = click_plan(&[hold(1090, Some(1.0), Some(1.0))], defaults());
        assert_eq!(skipped, 0);
        assert_eq!(plan[0].pixel_x, 540);
        assert_eq!(plan[0].pixel_y, 240);
    }

    #[test]
    fn holds_without_grid_coordinates_are_skipped() {
        let holds = [
            hold(1090, Some(1.0), Some(2.0)),
            hold(9999, None, None),
            hold(1091, Some(3.0), None),
        ];
        let (plan, skipped) = click_plan(&holds, defaults());
        assert_eq!(plan.len(), 1);
        assert_eq!(skipped, 2);
        assert_eq!(plan[0].hole_id, 1090);
    }

    #[test]
    fn half_integer_columns_round_to_the_nearest_pixel() {
        let calibration = Calibration {
            origin_x: 500.0,
            origin_y: 200.0,
            col_spacing: 25.0,
            row_spacing: 40.0,
        };
        // 500 + 0.5 * 25 = 512.5 -> 513
        let (plan, _) = click_plan(&[hold(1464, Some(-1.0), Some(0.5))], calibration);
        assert_eq!(plan[0].pixel_x, 513);
        assert_eq!(plan[0].pixel_y, 160);
    }

    #[test]
    fn payload_accepts_holds_with_and_without_geometry() {
        let raw = r#"{"holds": [
            {"hole_id": 1090, "role_name": "start", "row_num": 1, "col_num": 1, "hold_type": "large"},
            {"hole_id": 9999, "role_name": "middle"}
        ]}"#;
        let payload: ClimbPayload = serde_json::from_str(raw).expect("parse payload");
        assert_eq!(payload.holds.len(), 2);
        let (plan, skipped) = click_plan(&payload.holds, defaults());
        assert_eq!(plan.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(plan[0].role_name, "start");
    }

    #[test]
    fn empty_payload_produces_an_empty_plan() {
        let payload: ClimbPayload = serde_json::from_str("{}").expect("parse payload");
        let (plan, skipped) = click_plan(&payload.holds, defaults());
        assert!(plan.is_empty());
        assert_eq!(skipped, 0);
    }

    #[test]
    fn parse_args_reads_calibration_flags() {
        let args: Vec<String> = [
            "--payload-json",
            "{\"holds\":[]}",
            "--origin-x",
            "10",
            "--origin-y",
            "20",
            "--col-spacing",
            "5",
            "--row-spacing",
            "6",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let cfg = parse_args(&args).expect("parse");
        assert_eq!(cfg.calibration.origin_x, 10.0);
        assert_eq!(cfg.calibration.origin_y, 20.0);
        assert_eq!(cfg.calibration.col_spacing, 5.0);
        assert_eq!(cfg.calibration.row_spacing, 6.0);
        match cfg.payload {
            PayloadSource::Inline(raw) => assert_eq!(raw, "{\"holds\":[]}"),
            other => panic!("unexpected payload source: {other:?}"),
        }
    }
}
