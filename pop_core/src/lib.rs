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
//! Population inside polygon / multipolygon regions of a gridded population raster.
//!
//! GeoJSON like geometry -> [`vector::Region`] -> [`raster::Window`] -> [`aggregate::aggregate`].
//! The entry point is [`calculate_population`].

pub mod errors;
pub mod config;
pub mod vector;
pub mod raster;
pub mod aggregate;
pub mod query;
pub mod util;

pub use errors::*;
pub use config::QueryOptions;
pub use query::*;
