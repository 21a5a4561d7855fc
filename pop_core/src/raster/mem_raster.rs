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
use ndarray::Array2;

use crate::errors::RasterError;
use crate::raster::{RasterInfo, RasterSource};

/// Raster held fully in memory, rows x cols
#[derive(Debug, Clone)]
pub struct MemRaster {
    info: RasterInfo,
    data: Array2<i32>,
}

impl MemRaster {
    pub fn new(info: RasterInfo, data: Array2<i32>) -> Result<Self, RasterError> {
        if data.dim() != (info.num_rows, info.num_cols) {
            return Err(RasterError::Band {
                path: "memory".into(),
                msg: format!("Data shape {:?} does not match {} rows x {} cols",
                             data.dim(), info.num_rows, info.num_cols),
            });
        }

        info.transform.validate()
            .map_err(|msg| RasterError::Open { path: "memory".into(), msg })?;

        Ok(MemRaster { info, data })
    }

    /// Row major cell values
    pub fn from_vec(info: RasterInfo, values: Vec<i32>) -> Result<Self, RasterError> {
        let shape = (info.num_rows, info.num_cols);
        let data = Array2::from_shape_vec(shape, values)
            .map_err(|e| RasterError::Band { path: "memory".into(), msg: e.to_string() })?;
        Self::new(info, data)
    }

    pub fn data(&self) -> &Array2<i32> {
        &self.data
    }
}

impl RasterSource for MemRaster {
    fn info(&self) -> &RasterInfo {
        &self.info
    }

    fn read_row(&self, row: usize, buf: &mut [i32]) -> Result<(), RasterError> {
        if row >= self.info.num_rows || buf.len() != self.info.num_cols {
            return Err(RasterError::Read {
                row,
                msg: format!("Row buffer of {} for a {} x {} raster", buf.len(), self.info.num_rows, self.info.num_cols),
            });
        }

        for (dst, src) in buf.iter_mut().zip(self.data.row(row).iter()) {
            *dst = *src;
        }

        Ok(())
    }
}
