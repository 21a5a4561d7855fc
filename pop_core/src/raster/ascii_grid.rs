/*
This file is part of the Population Calculator
Copyright (C) 2022 Novel-T

The Population Calculator is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
//! ESRI ASCII grid (`.asc`) support, the format GDAL calls AAIGrid.
//!
//! ```text
//! ncols        2
//! nrows        2
//! xllcorner    0
//! yllcorner    0
//! cellsize     1
//! NODATA_value -9999
//! 10 20
//! 30 40
//! ```
use std::cmp::min;
use std::collections::HashMap;
use std::fs::{create_dir_all, read_to_string, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Result};
use log::debug;
use ndarray::Array2;

use crate::errors::RasterError;
use crate::raster::{to_cell_value, GeoTransform, MemRaster, RasterInfo};

pub const EXT_ASCII_GRID: &str = "asc";

const KNOWN_KEYS: [&str; 10] = [
    "ncols", "nrows", "xllcorner", "xllcenter", "yllcorner", "yllcenter", "cellsize", "dx", "dy", "nodata_value"
];

fn header_complete(header: &HashMap<String, f64>) -> bool {
    let has = |key: &str| header.contains_key(key);

    has("ncols") && has("nrows")
        && (has("xllcorner") || has("xllcenter"))
        && (has("yllcorner") || has("yllcenter"))
        && (has("cellsize") || (has("dx") && has("dy")))
}

/// Reads the whole grid into memory
pub fn read_ascii_grid(path: &Path) -> Result<MemRaster, RasterError> {
    let open_err = |msg: String| RasterError::Open { path: path.to_path_buf(), msg };

    let text = read_to_string(path).map_err(|e| open_err(e.to_string()))?;

    let mut tokens = text.split_whitespace().peekable();
    let mut header: HashMap<String, f64> = HashMap::new();

    //Header is key value pairs until the first numeric token
    while let Some(tok) = tokens.peek() {
        if !tok.starts_with(|c: char| c.is_ascii_alphabetic()) {
            break;
        }
        let key = tok.to_ascii_lowercase();

        if !KNOWN_KEYS.contains(&key.as_str()) {
            //nan / inf cells after a full header are data, read as unreadable cells below
            if header_complete(&header) {
                break;
            }
            return Err(open_err(format!("Unknown header key '{}'", key)));
        }
        tokens.next();

        let value = tokens.next()
            .and_then(|v| v.parse::<f64>().ok())
            .ok_or_else(|| open_err(format!("Header key '{}' has no numeric value", key)))?;

        header.insert(key, value);
    }

    let get = |key: &str| header.get(key).copied();
    let require = |key: &str| get(key).ok_or_else(|| open_err(format!("Missing header key '{}'", key)));

    let num_cols = require("ncols")?;
    let num_rows = require("nrows")?;
    if num_cols < 0.0 || num_rows < 0.0 || num_cols.fract() != 0.0 || num_rows.fract() != 0.0 {
        return Err(open_err(format!("Invalid dimensions {} x {}", num_cols, num_rows)));
    }
    let num_cols = num_cols as usize;
    let num_rows = num_rows as usize;

    let (dx, dy) = match (get("cellsize"), get("dx"), get("dy")) {
        (Some(cs), _, _) => (cs, cs),
        (None, Some(dx), Some(dy)) => (dx, dy),
        _ => return Err(open_err("Missing cellsize (or dx / dy)".to_string())),
    };

    let left = match (get("xllcorner"), get("xllcenter")) {
        (Some(x), _) => x,
        (None, Some(x)) => x - dx / 2.0,
        _ => return Err(open_err("Missing xllcorner / xllcenter".to_string())),
    };
    let bottom = match (get("yllcorner"), get("yllcenter")) {
        (Some(y), _) => y,
        (None, Some(y)) => y - dy / 2.0,
        _ => return Err(open_err("Missing yllcorner / yllcenter".to_string())),
    };

    let transform = GeoTransform::north_up(left, bottom + dy * num_rows as f64, dx, -dy);
    let info = RasterInfo::new(num_cols, num_rows, transform, get("nodata_value"));

    let num_cells = num_cols.checked_mul(num_rows)
        .ok_or_else(|| open_err(format!("Grid of {} x {} cells is too large", num_cols, num_rows)))?;

    //Each value takes at least 2 bytes of text, the header cannot reserve more than the file holds
    let mut values = Vec::with_capacity(min(num_cells, text.len() / 2 + 1));
    for tok in tokens.take(num_cells) {
        let v = tok.parse::<f64>().ok()
            .and_then(to_cell_value)
            .ok_or_else(|| RasterError::Band {
                path: path.to_path_buf(),
                msg: format!("Unreadable cell value '{}' at index {}", tok, values.len()),
            })?;
        values.push(v);
    }

    if values.len() != num_cells {
        return Err(RasterError::Band {
            path: path.to_path_buf(),
            msg: format!("Expected {} cell values, found {}", num_cells, values.len()),
        });
    }

    debug!("Read ascii grid {:?}: {} cols x {} rows", path, num_cols, num_rows);

    let data = Array2::from_shape_vec((num_rows, num_cols), values)
        .map_err(|e| RasterError::Band { path: path.to_path_buf(), msg: e.to_string() })?;

    MemRaster::new(info, data).map_err(|e| match e {
        RasterError::Open { msg, .. } => open_err(msg),
        other => other,
    })
}

/// Writes a north up grid.  Cells are row major.
pub fn write_ascii_grid(path: &Path, info: &RasterInfo, values: &[i32]) -> Result<()> {
    let gt = &info.transform;

    if !gt.is_axis_aligned() || gt.pixel_height >= 0.0 {
        bail!("Only north up, axis aligned grids can be written as ascii grids: {:?}", gt.to_gdal());
    }
    if values.len() != info.num_cols * info.num_rows {
        bail!("Expected {} values, got {}", info.num_cols * info.num_rows, values.len());
    }

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            create_dir_all(parent)?;
        }
    }

    let mut f = BufWriter::new(File::create(path)?);

    writeln!(f, "ncols {}", info.num_cols)?;
    writeln!(f, "nrows {}", info.num_rows)?;
    writeln!(f, "xllcorner {}", gt.origin_x)?;
    writeln!(f, "yllcorner {}", info.bottom_y_coord())?;
    if gt.pixel_width == -gt.pixel_height {
        writeln!(f, "cellsize {}", gt.pixel_width)?;
    } else {
        writeln!(f, "dx {}", gt.pixel_width)?;
        writeln!(f, "dy {}", -gt.pixel_height)?;
    }
    if let Some(nd) = info.no_data_value {
        writeln!(f, "NODATA_value {}", nd)?;
    }

    if info.num_cols > 0 {
        for row in values.chunks(info.num_cols) {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
    }

    f.flush()?;

    Ok(())
}
