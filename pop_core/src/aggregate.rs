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
use std::ops::Range;

use log::debug;
use rayon::prelude::*;

use crate::config::QueryOptions;
use crate::errors::QueryError;
use crate::raster::{is_nodata, GeoTransform, RasterSource, Window};
use crate::vector::Region;

/// Sums the cells of `window` whose centers are strictly inside `region`, skipping no data cells.
///
/// Rows are read one at a time on the calling thread, `rows_per_chunk` at a time, and the
/// containment tests of a chunk run on the rayon pool when `options.parallel` is set.
/// Row sums are whole numbers so the total does not depend on evaluation order.
pub fn aggregate<R: RasterSource + ?Sized>(region: &Region,
                                           raster: &R,
                                           window: &Window,
                                           options: &QueryOptions) -> Result<f64, QueryError>
{
    if window.is_empty() || region.is_empty() {
        debug!("Nothing to aggregate ({}, {} polygons)", window, region.polygons().len());
        return Ok(0.0);
    }

    let info = raster.info();
    let transform = &info.transform;
    let nodata = info.nodata_cell_value();
    let cols = window.cols();
    let rows = window.rows();

    let rows_per_chunk = max(1, options.rows_per_chunk);
    let num_chunks = num::Integer::div_ceil(&window.num_rows(), &rows_per_chunk);

    debug!("Aggregating {} in {} chunk(s) of {} rows, nodata {:?}, parallel {}",
           window, num_chunks, rows_per_chunk, nodata, options.parallel);

    let mut scanlines: Vec<Vec<i32>> = Vec::new();
    let mut rows_read = 0;
    let mut total: i64 = 0;

    for chunk_start in rows.clone().step_by(rows_per_chunk) {
        let chunk_end = min(chunk_start + rows_per_chunk, rows.end);
        let chunk_len = chunk_end - chunk_start;

        while scanlines.len() < chunk_len {
            scanlines.push(vec![0; info.num_cols]);
        }

        for (scanline, row) in scanlines.iter_mut().zip(chunk_start..chunk_end) {
            if options.is_cancelled() {
                debug!("Cancelled before row {}", row);
                return Err(QueryError::Cancelled { rows_read, rows_total: window.num_rows() });
            }
            raster.read_row(row, scanline)?;
            rows_read += 1;
        }

        let chunk = &scanlines[..chunk_len];

        let chunk_sum: i64 = if options.parallel {
            chunk.par_iter().enumerate()
                .map(|(i, scanline)| sum_row(region, transform, chunk_start + i, scanline, cols.clone(), nodata))
                .sum()
        } else {
            chunk.iter().enumerate()
                .map(|(i, scanline)| sum_row(region, transform, chunk_start + i, scanline, cols.clone(), nodata))
                .sum()
        };

        total += chunk_sum;
    }

    debug!("Read {} rows, total {}", rows_read, total);

    Ok(total as f64)
}

#[inline]
fn sum_row(region: &Region,
           transform: &GeoTransform,
           row: usize,
           scanline: &[i32],
           cols: Range<usize>,
           nodata: Option<i32>) -> i64
{
    let mut sum = 0i64;

    for col in cols {
        let value = scanline[col];

        if is_nodata(value, nodata) {
            continue;
        }

        let (x, y) = transform.cell_center(col, row);
        if region.contains(x, y) {
            sum += value as i64;
        }
    }

    sum
}
