// Point-file parsing and preset lookup for the heatmap-render CLI.

use std::io::BufRead;

use anyhow::{anyhow, bail, Context, Result};
use heatmap_raster::{Brightness, GradientTable, OpacityProfile};

// ============================================================================
// Point records
// ============================================================================

/// One line of a point file: `x,y` or `x,y,radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
    pub radius: Option<f64>,
}

/// Parse a point file. Fields may be separated by commas or whitespace;
/// blank lines and lines starting with `#` are skipped.
pub fn parse_points<R: BufRead>(reader: R) -> Result<Vec<PointRecord>> {
    let mut points = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", i + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        let num = |s: &str| -> Result<f64> {
            s.parse::<f64>()
                .with_context(|| format!("line {}: '{}' is not a number", i + 1, s))
        };
        let record = match fields.as_slice() {
            [x, y] => PointRecord {
                x: num(x)?,
                y: num(y)?,
                radius: None,
            },
            [x, y, r] => PointRecord {
                x: num(x)?,
                y: num(y)?,
                radius: Some(num(r)?),
            },
            _ => bail!("line {}: expected 'x,y' or 'x,y,radius'", i + 1),
        };
        points.push(record);
    }
    Ok(points)
}

// ============================================================================
// Preset lookup
// ============================================================================

pub fn gradient_by_name(name: &str) -> Result<GradientTable> {
    GradientTable::preset(name)
        .cloned()
        .ok_or_else(|| anyhow!("unknown gradient '{}'; run 'heatmap-render list'", name))
}

pub fn profile_by_name(name: &str) -> Result<OpacityProfile> {
    OpacityProfile::preset(name)
        .cloned()
        .ok_or_else(|| anyhow!("unknown opacity profile '{}'; run 'heatmap-render list'", name))
}

pub fn brightness_by_name(name: &str) -> Result<Brightness> {
    Brightness::from_name(name)
        .ok_or_else(|| anyhow!("unknown brightness function '{}'; run 'heatmap-render list'", name))
}
