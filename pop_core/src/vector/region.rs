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

use geo::{BoundingRect, Contains, Coord, Point, Polygon, Rect};
use rstar::{RTree, RTreeObject, AABB};
use serde::Deserialize;

/// How interior rings are treated when building a Region
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HoleMode {
    /// First ring of a polygon is the outer boundary, remaining rings are holes
    Exclude,
    /// Holes are not subtracted.  A Polygon keeps only its first ring and
    /// every ring of a MultiPolygon becomes its own filled polygon
    Ignore,
}

impl Default for HoleMode {
    fn default() -> Self {
        HoleMode::Exclude
    }
}

/// Bounding box of one polygon of the region, indexed by position
#[derive(Debug, Clone)]
struct PolygonEnvelope {
    idx: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for PolygonEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// The area being queried, one or more polygons
pub struct Region {
    polygons: Vec<Polygon<f64>>,
    rtree: RTree<PolygonEnvelope>,
    bbox: Option<Rect<f64>>,
}

impl Region {
    pub fn new(polygons: Vec<Polygon<f64>>) -> Self {
        let envelopes: Vec<PolygonEnvelope> = polygons.iter().enumerate()
            .filter_map(|(idx, p)| p.exterior().bounding_rect().map(|bbox| PolygonEnvelope { idx, bbox }))
            .collect();

        let bbox = envelopes.iter().map(|e| e.bbox).reduce(|a, b| {
            Rect::new(
                Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            )
        });

        Region {
            polygons,
            rtree: RTree::bulk_load(envelopes),
            bbox,
        }
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// None when the region has no polygons
    pub fn bounding_box(&self) -> Option<Rect<f64>> {
        self.bbox
    }

    /// True if (x, y) is strictly inside any polygon; points on a boundary are outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let point = Point::new(x, y);

        self.rtree
            .locate_in_envelope_intersecting(&AABB::from_point([x, y]))
            .any(|e| self.polygons[e.idx].contains(&point))
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Region")
            .field("num_polygons", &self.polygons.len())
            .field("bbox", &self.bbox)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{build_polygon, build_ring};

    fn square(x0: f64, y0: f64, size: f64) -> geo::LineString<f64> {
        build_ring(&[(x0, y0), (x0, y0 + size), (x0 + size, y0 + size), (x0 + size, y0)]).unwrap()
    }

    #[test]
    fn test_contains_strict_interior() {
        let region = Region::new(vec![build_polygon(square(0., 0., 2.), vec![])]);

        assert!(region.contains(1., 1.));
        assert!(region.contains(0.5, 1.5));

        //boundary and corners are outside
        assert!(!region.contains(0., 1.));
        assert!(!region.contains(2., 2.));
        assert!(!region.contains(3., 1.));
    }

    #[test]
    fn test_hole_is_excluded() {
        let region = Region::new(vec![build_polygon(square(0., 0., 10.), vec![square(4., 4., 2.)])]);

        assert!(region.contains(1., 1.));
        assert!(!region.contains(5., 5.));
        assert!(region.contains(7., 5.));
    }

    #[test]
    fn test_multi_polygon_bbox_and_contains() {
        let region = Region::new(vec![
            build_polygon(square(0., 0., 1.), vec![]),
            build_polygon(square(10., -5., 2.), vec![]),
        ]);

        let bbox = region.bounding_box().unwrap();
        assert_eq!(bbox.min(), Coord { x: 0., y: -5. });
        assert_eq!(bbox.max(), Coord { x: 12., y: 1. });

        assert!(region.contains(0.5, 0.5));
        assert!(region.contains(11., -4.));
        assert!(!region.contains(5., 0.));
    }

    #[test]
    fn test_empty_region() {
        let region = Region::new(vec![]);

        assert!(region.is_empty());
        assert!(region.bounding_box().is_none());
        assert!(!region.contains(0., 0.));
    }
}
