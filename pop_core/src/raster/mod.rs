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
use std::path::Path;
use std::sync::Once;

use log::debug;

use crate::errors::RasterError;

mod geo_transform;
mod raster_info;
mod window;
mod mem_raster;
mod ascii_grid;
#[cfg(feature = "gdal")]
mod gdal_raster;

mod test_util;

pub use geo_transform::*;
pub use raster_info::*;
pub use window::*;
pub use mem_raster::*;
pub use ascii_grid::*;
#[cfg(feature = "gdal")]
pub use gdal_raster::*;

pub use test_util::*;

static INIT: Once = Once::new();

/// Process wide backend registration, safe to call any number of times
pub fn init() {
    INIT.call_once(|| {
        #[cfg(feature = "gdal")]
        {
            gdal::DriverManager::register_all();
            debug!("Registered GDAL drivers, {} available", gdal::DriverManager::count());
        }

        debug!("Raster backends initialised");
    });
}

/// Opens the first band of the raster at `path`.
///
/// `.asc` files are read by the built in ascii grid reader, anything else needs the `gdal` feature.
pub fn open_raster(path: &Path) -> Result<Box<dyn RasterSource>, RasterError> {
    init();

    if !path.exists() {
        return Err(RasterError::Open { path: path.to_path_buf(), msg: "file does not exist".to_string() });
    }

    let is_ascii_grid = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(EXT_ASCII_GRID))
        .unwrap_or(false);

    if is_ascii_grid {
        return Ok(Box::new(read_ascii_grid(path)?));
    }

    open_with_gdal(path)
}

#[cfg(feature = "gdal")]
fn open_with_gdal(path: &Path) -> Result<Box<dyn RasterSource>, RasterError> {
    Ok(Box::new(GdalRaster::open(path)?))
}

#[cfg(not(feature = "gdal"))]
fn open_with_gdal(path: &Path) -> Result<Box<dyn RasterSource>, RasterError> {
    Err(RasterError::Open {
        path: path.to_path_buf(),
        msg: format!("only .{} grids are supported without the gdal feature", EXT_ASCII_GRID),
    })
}
