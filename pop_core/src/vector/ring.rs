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
use geo::{Coord, LineString, Polygon};
use itertools::Itertools;

use crate::errors::GeometryError;

/// Minimum number of distinct vertices in a ring
pub const MIN_RING_POINTS: usize = 3;

/// Builds a closed ring from (x, y) pairs.
///
/// Appends the first point when the last one differs, closing an already closed ring is a no-op.
pub fn build_ring(points: &[(f64, f64)]) -> Result<LineString<f64>, GeometryError> {
    if let Some((x, y)) = points.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(GeometryError::Invalid(format!("Ring has a non finite coordinate ({}, {})", x, y)));
    }

    // + 0.0 so that -0.0 and 0.0 count as the same vertex
    let num_distinct = points.iter()
        .map(|(x, y)| ((x + 0.0).to_bits(), (y + 0.0).to_bits()))
        .unique()
        .count();

    if num_distinct < MIN_RING_POINTS {
        return Err(GeometryError::Invalid(format!(
            "Ring needs at least {} distinct points, got {}", MIN_RING_POINTS, num_distinct)));
    }

    let mut coords: Vec<Coord<f64>> = points.iter().map(|&(x, y)| Coord { x, y }).collect();

    let first = coords[0];
    if coords[coords.len() - 1] != first {
        coords.push(first);
    }

    Ok(LineString::new(coords))
}

/// Outer boundary plus holes
pub fn build_polygon(outer: LineString<f64>, holes: Vec<LineString<f64>>) -> Polygon<f64> {
    Polygon::new(outer, holes)
}
