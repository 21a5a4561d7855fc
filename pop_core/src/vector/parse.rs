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
use std::fmt;
use std::str::FromStr;

use geo::Polygon;
use log::debug;
use serde_json::Value;

use crate::errors::GeometryError;
use crate::vector::{build_polygon, build_ring, HoleMode, Region};

pub const TYPE_POLYGON: &str = "Polygon";
pub const TYPE_MULTI_POLYGON: &str = "MultiPolygon";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
}

impl FromStr for GeometryKind {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TYPE_POLYGON => Ok(GeometryKind::Polygon),
            TYPE_MULTI_POLYGON => Ok(GeometryKind::MultiPolygon),
            _ => Err(GeometryError::Unsupported(s.to_string())),
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GeometryKind::Polygon => write!(f, "{}", TYPE_POLYGON),
            GeometryKind::MultiPolygon => write!(f, "{}", TYPE_MULTI_POLYGON),
        }
    }
}

/// A GeoJSON like geometry: the kind tag and its still unparsed coordinate tree
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryDescription {
    pub kind: GeometryKind,
    pub coordinates: Value,
}

impl GeometryDescription {
    pub fn new(kind: GeometryKind, coordinates: Value) -> Self {
        GeometryDescription { kind, coordinates }
    }

    /// Parses geometry text such as `{"type":"Polygon","coordinates":[...]}`
    pub fn from_text(text: &str) -> Result<Self, GeometryError> {
        let root: Value = serde_json::from_str(text)
            .map_err(|e| GeometryError::Format(format!("Failed to parse GeoJSON: {}", e)))?;

        Self::from_value(&root)
    }

    pub fn from_value(root: &Value) -> Result<Self, GeometryError> {
        let obj = root.as_object()
            .ok_or_else(|| GeometryError::Format("GeoJSON geometry must be a JSON object".to_string()))?;

        let kind: GeometryKind = obj.get("type")
            .and_then(Value::as_str)
            .unwrap_or("")
            .parse()?;

        let coordinates = obj.get("coordinates").cloned().unwrap_or(Value::Null);

        Ok(GeometryDescription { kind, coordinates })
    }

    pub fn to_region(&self, hole_mode: HoleMode) -> Result<Region, GeometryError> {
        parse_region(self.kind, &self.coordinates, hole_mode)
    }
}

type RawRing = Vec<(f64, f64)>;

/// Builds a Region from a coordinate tree.
///
/// Polygon trees are `[ring, ...]`, MultiPolygon trees are `[[ring, ...], ...]`, a ring is `[[x, y], ...]`.
/// Any nesting error aborts the whole region.
pub fn parse_region(kind: GeometryKind, coordinates: &Value, hole_mode: HoleMode) -> Result<Region, GeometryError> {
    let polygons = match kind {
        GeometryKind::Polygon => {
            let rings = read_polygon(coordinates, "Polygon")?;
            vec![polygon_from_rings(&rings, hole_mode)?]
        }
        GeometryKind::MultiPolygon => {
            let entries = coordinates.as_array()
                .ok_or_else(|| malformed("MultiPolygon coordinates", "an array of polygons"))?;

            let mut polygons = Vec::with_capacity(entries.len());
            for (poly_idx, entry) in entries.iter().enumerate() {
                let rings = read_polygon(entry, &format!("MultiPolygon polygon {}", poly_idx))?;

                match hole_mode {
                    HoleMode::Exclude => {
                        polygons.push(polygon_from_rings(&rings, hole_mode)?);
                    }
                    HoleMode::Ignore => {
                        for ring in rings.iter() {
                            polygons.push(build_polygon(build_ring(ring)?, vec![]));
                        }
                    }
                }
            }
            polygons
        }
    };

    debug!("Parsed {} into {} polygon(s) with hole mode {:?}", kind, polygons.len(), hole_mode);

    Ok(Region::new(polygons))
}

fn polygon_from_rings(rings: &[RawRing], hole_mode: HoleMode) -> Result<Polygon<f64>, GeometryError> {
    let outer = build_ring(&rings[0])?;

    let holes = match hole_mode {
        HoleMode::Exclude => rings[1..].iter().map(|r| build_ring(r)).collect::<Result<Vec<_>, _>>()?,
        HoleMode::Ignore => vec![],
    };

    Ok(build_polygon(outer, holes))
}

/// A non empty array of rings
fn read_polygon(value: &Value, ctx: &str) -> Result<Vec<RawRing>, GeometryError> {
    let rings = value.as_array()
        .ok_or_else(|| malformed(ctx, "an array of rings"))?;

    if rings.is_empty() {
        return Err(malformed(ctx, "at least one ring"));
    }

    rings.iter().enumerate()
        .map(|(ring_idx, ring)| read_ring(ring, &format!("{} ring {}", ctx, ring_idx)))
        .collect()
}

fn read_ring(value: &Value, ctx: &str) -> Result<RawRing, GeometryError> {
    let points = value.as_array()
        .ok_or_else(|| malformed(ctx, "an array of points"))?;

    points.iter().enumerate()
        .map(|(pt_idx, pt)| read_point(pt).ok_or_else(|| malformed(&format!("{} point {}", ctx, pt_idx), "[x, y]")))
        .collect()
}

/// Extra ordinates (z, m) are ignored
fn read_point(value: &Value) -> Option<(f64, f64)> {
    let coords = value.as_array()?;
    if coords.len() < 2 {
        return None;
    }
    Some((coords[0].as_f64()?, coords[1].as_f64()?))
}

fn malformed(ctx: &str, expected: &str) -> GeometryError {
    GeometryError::Malformed(format!("{}: expected {}", ctx, expected))
}
