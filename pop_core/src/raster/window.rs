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
use std::cmp::{max, min};
use std::fmt;
use std::ops::Range;

use geo::Rect;
use log::{debug, warn};

use crate::raster::RasterInfo;
use crate::vector::Region;

/// Inclusive cell range of a raster, columns then rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub col_start: i64,
    pub col_end: i64,
    pub row_start: i64,
    pub row_end: i64,
}

impl Window {
    pub fn empty() -> Self {
        Window {
            col_start: 0,
            col_end: -1,
            row_start: 0,
            row_end: -1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.col_start > self.col_end || self.row_start > self.row_end
    }

    pub fn num_cols(&self) -> usize {
        if self.is_empty() { 0 } else { (self.col_end - self.col_start + 1) as usize }
    }

    pub fn num_rows(&self) -> usize {
        if self.is_empty() { 0 } else { (self.row_end - self.row_start + 1) as usize }
    }

    pub fn num_cells(&self) -> usize {
        self.num_cols() * self.num_rows()
    }

    pub fn cols(&self) -> Range<usize> {
        if self.is_empty() {
            return 0..0;
        }
        self.col_start as usize..self.col_end as usize + 1
    }

    pub fn rows(&self) -> Range<usize> {
        if self.is_empty() {
            return 0..0;
        }
        self.row_start as usize..self.row_end as usize + 1
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "empty window");
        }
        write!(f, "cols {} to {}, rows {} to {} ({} cells)",
               self.col_start, self.col_end, self.row_start, self.row_end, self.num_cells())
    }
}

/// Cells of the raster that can intersect the region's bounding box
pub fn resolve_window(region: &Region, info: &RasterInfo) -> Window {
    let window = match region.bounding_box() {
        Some(bbox) => window_for_bbox(&bbox, info),
        None => Window::empty(),
    };

    debug!("Resolved {} for region {:?}", window, region);

    window
}

/// Maps (min x, max y) and (max x, min y) to cell indices truncating toward zero,
/// then clips to the raster.  The result may be empty.
pub fn window_for_bbox(bbox: &Rect<f64>, info: &RasterInfo) -> Window {
    let gt = &info.transform;

    if !gt.is_axis_aligned() {
        warn!("Raster transform is rotated ({}, {}), window uses the axis aligned terms only",
              gt.row_rotation, gt.col_rotation);
    }

    let col_a = gt.col_index(bbox.min().x);
    let col_b = gt.col_index(bbox.max().x);
    let row_a = gt.row_index(bbox.max().y);
    let row_b = gt.row_index(bbox.min().y);

    //Only differs from (a, b) for south up or right to left rasters
    let (col_start, col_end) = (min(col_a, col_b), max(col_a, col_b));
    let (row_start, row_end) = (min(row_a, row_b), max(row_a, row_b));

    Window {
        col_start: max(0, col_start),
        col_end: min(info.num_cols as i64 - 1, col_end),
        row_start: max(0, row_start),
        row_end: min(info.num_rows as i64 - 1, row_end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::GeoTransform;
    use geo::Coord;

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rect<f64> {
        Rect::new(Coord { x: min_x, y: min_y }, Coord { x: max_x, y: max_y })
    }

    fn info_2x2() -> RasterInfo {
        RasterInfo::new(2, 2, GeoTransform::from_gdal([0., 1., 0., 2., 0., -1.]), Some(-9999.))
    }

    #[test]
    fn test_full_square() {
        let w = window_for_bbox(&rect(0., 0., 2., 2.), &info_2x2());

        assert_eq!(w, Window { col_start: 0, col_end: 1, row_start: 0, row_end: 1 });
        assert_eq!(w.num_cells(), 4);
        assert_eq!(w.rows(), 0..2);
    }

    #[test]
    fn test_top_left_quadrant() {
        let w = window_for_bbox(&rect(0., 1., 1., 2.), &info_2x2());

        //truncation gives index 1 for the max edges, the window is not shrunk to the exact cell
        assert_eq!(w, Window { col_start: 0, col_end: 1, row_start: 0, row_end: 1 });
    }

    #[test]
    fn test_inside_single_cell() {
        let w = window_for_bbox(&rect(1.2, 0.2, 1.8, 0.8), &info_2x2());
        assert_eq!(w, Window { col_start: 1, col_end: 1, row_start: 1, row_end: 1 });
        assert_eq!(w.cols(), 1..2);
    }

    #[test]
    fn test_outside_is_empty() {
        let info = info_2x2();

        let right = window_for_bbox(&rect(5., 0., 7., 2.), &info);
        assert!(right.is_empty());
        assert_eq!(right.num_rows(), 0);
        assert_eq!(right.rows(), 0..0);

        let above = window_for_bbox(&rect(0., 10., 2., 12.), &info);
        assert!(above.is_empty());

        let left = window_for_bbox(&rect(-7., 0., -5., 2.), &info);
        assert!(left.is_empty());
    }

    #[test]
    fn test_clipped_to_raster() {
        let info = RasterInfo::new(10, 5, GeoTransform::north_up(100., 50., 2., -2.), None);

        let w = window_for_bbox(&rect(90., 30., 105., 60.), &info);
        assert_eq!(w, Window { col_start: 0, col_end: 2, row_start: 0, row_end: 4 });

        let w = window_for_bbox(&rect(110., 44.5, 500., 47.), &info);
        assert_eq!(w, Window { col_start: 5, col_end: 9, row_start: 1, row_end: 2 });
    }

    #[test]
    fn test_south_up_raster() {
        let info = RasterInfo::new(4, 4, GeoTransform::north_up(0., 0., 1., 1.), None);

        let w = window_for_bbox(&rect(1.5, 1.5, 2.5, 2.5), &info);
        assert_eq!(w, Window { col_start: 1, col_end: 2, row_start: 1, row_end: 2 });
    }

    #[test]
    fn test_empty_region() {
        let w = resolve_window(&Region::new(vec![]), &info_2x2());
        assert!(w.is_empty());
        assert_eq!(w.to_string(), "empty window");
    }
}
