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
use float_cmp::{ApproxEq, F64Margin};

/// Affine transform between cell indices and coordinates, GDAL ordering:
/// `x = origin_x + col * pixel_width + row * row_rotation`,
/// `y = origin_y + col * col_rotation + row * pixel_height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    //Negative for north up rasters
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn from_gdal(gt: [f64; 6]) -> Self {
        GeoTransform {
            origin_x: gt[0],
            pixel_width: gt[1],
            row_rotation: gt[2],
            origin_y: gt[3],
            col_rotation: gt[4],
            pixel_height: gt[5],
        }
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [self.origin_x, self.pixel_width, self.row_rotation, self.origin_y, self.col_rotation, self.pixel_height]
    }

    /// Axis aligned north up transform
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        GeoTransform {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height,
        }
    }

    /// Coordinate of the center of the cell
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        let c = col as f64 + 0.5;
        let r = row as f64 + 0.5;
        (self.origin_x + c * self.pixel_width + r * self.row_rotation,
         self.origin_y + c * self.col_rotation + r * self.pixel_height)
    }

    /// Column containing x, truncated toward zero (not floored) so it can be negative
    /// or past the raster edge.  Rotation terms are ignored.
    pub fn col_index(&self, x: f64) -> i64 {
        ((x - self.origin_x) / self.pixel_width).trunc() as i64
    }

    pub fn row_index(&self, y: f64) -> i64 {
        ((y - self.origin_y) / self.pixel_height).trunc() as i64
    }

    pub fn is_axis_aligned(&self) -> bool {
        let margin = F64Margin { epsilon: f64::EPSILON * 5.0, ulps: 5 };
        self.row_rotation.approx_eq(0.0, margin) && self.col_rotation.approx_eq(0.0, margin)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.to_gdal().iter().any(|v| !v.is_finite()) {
            return Err(format!("Geo transform has non finite terms: {:?}", self.to_gdal()));
        }
        if self.pixel_width == 0.0 || self.pixel_height == 0.0 {
            return Err(format!("Pixel width / height cannot be 0: {} {}", self.pixel_width, self.pixel_height));
        }
        Ok(())
    }
}
