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
use std::path::{Path, PathBuf};

use gdal::Dataset;
use log::debug;

use crate::errors::RasterError;
use crate::raster::{GeoTransform, RasterInfo, RasterSource};

/// First band of any raster GDAL can open, read as i32
pub struct GdalRaster {
    path: PathBuf,
    dataset: Dataset,
    info: RasterInfo,
}

impl GdalRaster {
    pub fn open(path: &Path) -> Result<Self, RasterError> {
        let open_err = |msg: String| RasterError::Open { path: path.to_path_buf(), msg };
        let band_err = |msg: String| RasterError::Band { path: path.to_path_buf(), msg };

        let dataset = Dataset::open(path).map_err(|e| open_err(e.to_string()))?;

        if dataset.raster_count() < 1 {
            return Err(band_err("dataset has no raster bands".to_string()));
        }

        let no_data_value = {
            let band = dataset.rasterband(1).map_err(|e| band_err(e.to_string()))?;
            band.no_data_value()
        };

        let geo_transform = dataset.geo_transform().map_err(|e| open_err(e.to_string()))?;
        let transform = GeoTransform::from_gdal(geo_transform);
        transform.validate().map_err(open_err)?;

        let (num_cols, num_rows) = dataset.raster_size();

        let info = RasterInfo::new(num_cols, num_rows, transform, no_data_value);

        debug!("Opened raster {:?} with stats\n{}", path, info);

        Ok(GdalRaster {
            path: path.to_path_buf(),
            dataset,
            info,
        })
    }
}

impl RasterSource for GdalRaster {
    fn info(&self) -> &RasterInfo {
        &self.info
    }

    fn read_row(&self, row: usize, buf: &mut [i32]) -> Result<(), RasterError> {
        let read_err = |msg: String| RasterError::Read { row, msg };
        let num_cols = self.info.num_cols;

        if buf.len() != num_cols {
            return Err(read_err(format!("Row buffer of {} for {} cols", buf.len(), num_cols)));
        }

        let band = self.dataset.rasterband(1).map_err(|e| read_err(e.to_string()))?;

        let scanline = band.read_as::<i32>((0, row as isize), (num_cols, 1), (num_cols, 1), None)
            .map_err(|e| read_err(e.to_string()))?;

        buf.copy_from_slice(scanline.data());

        Ok(())
    }
}

impl Drop for GdalRaster {
    fn drop(&mut self) {
        debug!("Closing raster {:?}", self.path);
    }
}
