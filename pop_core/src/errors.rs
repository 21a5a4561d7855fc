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
use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning geometry text into a Region
#[derive(Clone, PartialEq, Debug, Error)]
pub enum GeometryError {
    #[error("GeometryFormatError: {0}")]
    Format(String),
    #[error("UnsupportedGeometryError: unsupported geometry type '{0}'")]
    Unsupported(String),
    #[error("MalformedGeometryError: {0}")]
    Malformed(String),
    #[error("InvalidGeometryError: {0}")]
    Invalid(String),
}

#[derive(Clone, PartialEq, Debug, Error)]
pub enum RasterError {
    #[error("RasterOpenError: cannot open raster {path:?}: {msg}")]
    Open {
        path: PathBuf,
        msg: String,
    },
    #[error("RasterBandError: raster {path:?} has no readable band: {msg}")]
    Band {
        path: PathBuf,
        msg: String,
    },
    #[error("RasterReadError: failed reading row {row}: {msg}")]
    Read {
        row: usize,
        msg: String,
    },
}

#[derive(Clone, PartialEq, Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("QueryCancelled: cancelled after reading {rows_read} of {rows_total} rows")]
    Cancelled {
        rows_read: usize,
        rows_total: usize,
    },
}

impl QueryError {
    /// Name of the pipeline stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            QueryError::Geometry(_) => "geometry",
            QueryError::Raster(RasterError::Read { .. }) => "aggregation",
            QueryError::Raster(_) => "raster",
            QueryError::Cancelled { .. } => "aggregation",
        }
    }
}

/// The one error type returned by the public path based entry point.
#[derive(Clone, PartialEq, Debug, Error)]
#[error("Population computation failed in {} stage: {source}", .source.stage())]
pub struct ComputationError {
    #[from]
    source: QueryError,
}

impl ComputationError {
    pub fn kind(&self) -> &QueryError {
        &self.source
    }

    pub fn into_kind(self) -> QueryError {
        self.source
    }
}

impl From<GeometryError> for ComputationError {
    fn from(e: GeometryError) -> Self {
        QueryError::from(e).into()
    }
}

impl From<RasterError> for ComputationError {
    fn from(e: RasterError) -> Self {
        QueryError::from(e).into()
    }
}
