//! Capture text parsing.
//!
//! `BIS_fnc_UnitCapture` writes an SQF array which is also valid JSON:
//!
//! ```text
//! [[time,[px,py,pz],[dx,dy,dz],[ux,uy,uz],[vx,vy,vz]], ...]
//! ```
//!
//! The text is decoded into a loose `serde_json::Value` first so shape and
//! type problems can be reported per row and field.

use serde_json::Value;

use super::{CaptureSequence, KeyFrame};
use crate::util::{DVec3, Error, Result};

/// Elements in one capture row.
pub const ROW_LEN: usize = 5;

/// Row slot names, in order.
pub const ROW_FIELDS: [&str; ROW_LEN] = ["time", "position", "direction", "up", "velocity"];

/// Parse capture text into a sequence with `original_index` `0..n`.
pub fn parse_capture(raw: &str) -> Result<CaptureSequence> {
    let value: Value = serde_json::from_str(raw).map_err(Error::malformed)?;
    let rows = value
        .as_array()
        .ok_or_else(|| Error::malformed("expected an array of keyframes"))?;

    let mut seq = CaptureSequence::with_capacity(rows.len());
    for (row, cells) in rows.iter().enumerate() {
        seq.push_back(parse_row(row, cells)?);
    }

    tracing::debug!(frames = seq.len(), bytes = raw.len(), "parsed capture");
    Ok(seq)
}

fn parse_row(row: usize, value: &Value) -> Result<KeyFrame> {
    let cells = value
        .as_array()
        .ok_or_else(|| Error::malformed(format!("row {} is not an array", row)))?;

    if cells.len() != ROW_LEN {
        return Err(Error::WrongShape {
            row,
            field: "row",
            expected: ROW_LEN,
            actual: cells.len(),
        });
    }

    let time = parse_number(row, ROW_FIELDS[0], &cells[0])?;
    let position = parse_vec3(row, ROW_FIELDS[1], &cells[1])?;
    let direction = parse_vec3(row, ROW_FIELDS[2], &cells[2])?;
    let up = parse_vec3(row, ROW_FIELDS[3], &cells[3])?;
    let velocity = parse_vec3(row, ROW_FIELDS[4], &cells[4])?;

    Ok(KeyFrame::new(row, time, position, direction, up, velocity))
}

fn parse_number(row: usize, field: &'static str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or(Error::WrongType { row, field, expected: "number" })
}

fn parse_vec3(row: usize, field: &'static str, value: &Value) -> Result<DVec3> {
    let items = value
        .as_array()
        .ok_or(Error::WrongType { row, field, expected: "array of 3 numbers" })?;

    if items.len() != 3 {
        return Err(Error::WrongShape { row, field, expected: 3, actual: items.len() });
    }

    Ok(DVec3::new(
        parse_number(row, field, &items[0])?,
        parse_number(row, field, &items[1])?,
        parse_number(row, field, &items[2])?,
    ))
}
