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

use crate::errors::RasterError;
use crate::raster::GeoTransform;

/// Dimensions, georeferencing and no data value of a single band raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterInfo {
    pub num_cols: usize,
    pub num_rows: usize,
    pub transform: GeoTransform,
    pub no_data_value: Option<f64>,
}

impl RasterInfo {
    pub fn new(num_cols: usize, num_rows: usize, transform: GeoTransform, no_data_value: Option<f64>) -> Self {
        RasterInfo {
            num_cols,
            num_rows,
            transform,
            no_data_value,
        }
    }

    /// The no data value as it would be stored in a cell
    pub fn nodata_cell_value(&self) -> Option<i32> {
        self.no_data_value.and_then(to_cell_value)
    }

    pub fn right_x_coord(&self) -> f64 {
        self.transform.origin_x + self.transform.pixel_width * self.num_cols as f64
    }

    pub fn bottom_y_coord(&self) -> f64 {
        self.transform.origin_y + self.transform.pixel_height * self.num_rows as f64
    }
}

impl fmt::Display for RasterInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let no_data = match self.no_data_value {
            Some(v) => v.to_string(),
            None => "none".to_string(),
        };
        write!(f, "Origin X,Y: {}, {}\nRight/Bottom: {},{}\nPixel Width/Height: {},{}\nRotation: {},{}\nRows: {} Cols: {}\nNo data value: {}",
               self.transform.origin_x,
               self.transform.origin_y,
               self.right_x_coord(),
               self.bottom_y_coord(),
               self.transform.pixel_width,
               self.transform.pixel_height,
               self.transform.row_rotation,
               self.transform.col_rotation,
               self.num_rows,
               self.num_cols,
               no_data
        )
    }
}

/// Row access to one band of whole number cells
pub trait RasterSource {
    fn info(&self) -> &RasterInfo;

    /// Fills `buf` (exactly `num_cols` long) with the cells of `row`
    fn read_row(&self, row: usize, buf: &mut [i32]) -> Result<(), RasterError>;
}

impl<R: RasterSource + ?Sized> RasterSource for &R {
    fn info(&self) -> &RasterInfo {
        (**self).info()
    }

    fn read_row(&self, row: usize, buf: &mut [i32]) -> Result<(), RasterError> {
        (**self).read_row(row, buf)
    }
}

impl<R: RasterSource + ?Sized> RasterSource for Box<R> {
    fn info(&self) -> &RasterInfo {
        (**self).info()
    }

    fn read_row(&self, row: usize, buf: &mut [i32]) -> Result<(), RasterError> {
        (**self).read_row(row, buf)
    }
}

/// Converts a stored number to the i32 cell representation: rounded to the nearest whole
/// number and clamped to the i32 range.  None for NaN / infinity.
#[inline]
pub fn to_cell_value(v: f64) -> Option<i32> {
    if !v.is_finite() {
        return None;
    }
    //float to int `as` casts saturate
    Some(v.round() as i32)
}

#[inline]
pub fn is_nodata(value: i32, nodata: Option<i32>) -> bool {
    nodata == Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell_value() {
        assert_eq!(to_cell_value(-9999.0), Some(-9999));
        assert_eq!(to_cell_value(12.4), Some(12));
        assert_eq!(to_cell_value(12.5), Some(13));
        assert_eq!(to_cell_value(-3.4028234663852886e38), Some(i32::MIN));
        assert_eq!(to_cell_value(1e20), Some(i32::MAX));
        assert_eq!(to_cell_value(f64::NAN), None);
        assert_eq!(to_cell_value(f64::NEG_INFINITY), None);
    }

    #[test]
    fn test_is_nodata() {
        let info = RasterInfo::new(2, 2, GeoTransform::north_up(0., 2., 1., -1.), Some(-9999.0));
        let nodata = info.nodata_cell_value();

        assert!(is_nodata(-9999, nodata));
        assert!(!is_nodata(0, nodata));
        assert!(!is_nodata(-9999, None));
    }

    #[test]
    fn test_display() {
        let info = RasterInfo::new(3, 4, GeoTransform::north_up(10., 20., 0.5, -0.5), None);
        let s = info.to_string();

        assert!(s.contains("Rows: 4 Cols: 3"), "{}", s);
        assert!(s.contains("Right/Bottom: 11.5,18"), "{}", s);
        assert!(s.contains("No data value: none"), "{}", s);
    }
}
