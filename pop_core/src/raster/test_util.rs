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

use anyhow::Result;
use uuid::Uuid;

use crate::raster::{write_ascii_grid, RasterInfo};

pub fn get_temp_filename(file_name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("pop_core");
    path.push(Uuid::new_v4().to_string());
    path.push(file_name);
    path
}

/// Writes `input_raster_data` (row major) to a fresh ascii grid in the temp directory
pub fn create_test_raster(in_file_name: &str, input_raster_info: &RasterInfo, input_raster_data: &[i32]) -> Result<PathBuf> {
    create_test_raster_with_path(&get_temp_filename(in_file_name), input_raster_info, input_raster_data)
}

pub fn create_test_raster_with_path(input_path: &Path, input_raster_info: &RasterInfo, input_raster_data: &[i32]) -> Result<PathBuf> {
    assert!(!input_path.exists());

    write_ascii_grid(input_path, input_raster_info, input_raster_data)?;

    assert!(input_path.exists());

    Ok(input_path.to_path_buf())
}
