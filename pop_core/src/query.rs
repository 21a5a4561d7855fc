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
use std::time::Instant;

use log::debug;

use crate::aggregate::aggregate;
use crate::config::QueryOptions;
use crate::errors::{ComputationError, QueryError};
use crate::raster::{open_raster, resolve_window, RasterSource};
use crate::util::format_duration;
use crate::vector::{GeometryDescription, Region};

/// Population of an already built region
pub fn region_population<R: RasterSource + ?Sized>(region: &Region, raster: &R, options: &QueryOptions) -> Result<f64, QueryError> {
    let window = resolve_window(region, raster.info());
    aggregate(region, raster, &window, options)
}

/// Population inside `geometry` for a raster the caller keeps open, e.g. for a batch of geometries
pub fn population_in<R: RasterSource + ?Sized>(geometry: &GeometryDescription, raster: &R, options: &QueryOptions) -> Result<f64, QueryError> {
    let region = geometry.to_region(options.hole_mode)?;
    region_population(&region, raster, options)
}

/// Takes ownership of the raster, which is closed when this returns whatever the outcome
pub fn query_population<R: RasterSource>(geometry: &GeometryDescription, raster: R, options: &QueryOptions) -> Result<f64, QueryError> {
    population_in(geometry, &raster, options)
}

/// Total population of the raster at `raster_path` inside the GeoJSON geometry `geometry_text`
pub fn calculate_population(geometry_text: &str, raster_path: &Path) -> Result<f64, ComputationError> {
    calculate_population_with_options(geometry_text, raster_path, &QueryOptions::default())
}

pub fn calculate_population_with_options(geometry_text: &str,
                                         raster_path: &Path,
                                         options: &QueryOptions) -> Result<f64, ComputationError>
{
    let now = Instant::now();

    //Geometry first, a bad geometry never opens the raster
    let region = GeometryDescription::from_text(geometry_text)?.to_region(options.hole_mode)?;

    let raster = open_raster(raster_path)?;

    let population = region_population(&region, &raster, options)?;

    debug!("Population {} from {:?} in {}", population, raster_path, format_duration(now.elapsed()));

    Ok(population)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{GeometryError, RasterError};
    use crate::raster::{create_test_raster, get_temp_filename, GeoTransform, MemRaster, RasterInfo};
    use crate::util::CancelToken;
    use crate::vector::HoleMode;
    use std::rc::Rc;
    use std::cell::Cell;

    const SQUARE: &str = r#"{"type":"Polygon","coordinates":[[[0,0],[0,2],[2,2],[2,0],[0,0]]]}"#;
    const QUADRANT: &str = r#"{"type":"Polygon","coordinates":[[[0,1],[0,2],[1,2],[1,1],[0,1]]]}"#;

    fn info_2x2() -> RasterInfo {
        RasterInfo::new(2, 2, GeoTransform::from_gdal([0., 1., 0., 2., 0., -1.]), Some(-9999.))
    }

    fn test_raster() -> std::path::PathBuf {
        create_test_raster("pop.asc", &info_2x2(), &[10, 20, 30, 40]).unwrap()
    }

    #[test]
    fn test_calculate_population() {
        let path = test_raster();

        assert_eq!(calculate_population(SQUARE, &path).unwrap(), 100.0);
        assert_eq!(calculate_population(QUADRANT, &path).unwrap(), 10.0);
    }

    #[test]
    fn test_idempotent() {
        let path = test_raster();

        let first = calculate_population(SQUARE, &path).unwrap();
        let second = calculate_population(SQUARE, &path).unwrap();
        assert_eq!(first, second);

        let raster = MemRaster::from_vec(info_2x2(), vec![10, 20, 30, 40]).unwrap();
        let geometry = GeometryDescription::from_text(QUADRANT).unwrap();
        let options = QueryOptions::default();
        assert_eq!(population_in(&geometry, &raster, &options).unwrap(),
                   population_in(&geometry, &raster, &options).unwrap());
    }

    #[test]
    fn test_geometry_errors_are_wrapped() {
        let path = test_raster();

        let e = calculate_population("{\"type\"", &path).unwrap_err();
        assert!(matches!(e.kind(), QueryError::Geometry(GeometryError::Format(_))));

        let e = calculate_population(r#"{"type":"LineString","coordinates":[[0,0],[1,1]]}"#, &path).unwrap_err();
        assert!(matches!(e.kind(), QueryError::Geometry(GeometryError::Unsupported(_))));

        let e = calculate_population(r#"{"type":"Polygon","coordinates":[]}"#, &path).unwrap_err();
        assert!(matches!(e.kind(), QueryError::Geometry(GeometryError::Malformed(_))));

        let e = calculate_population(r#"{"type":"Polygon","coordinates":[[[0,0],[1,1]]]}"#, &path).unwrap_err();
        assert!(matches!(e.kind(), QueryError::Geometry(GeometryError::Invalid(_))));
    }

    #[test]
    fn test_bad_geometry_checked_before_raster() {
        //raster does not exist but the geometry error comes first
        let e = calculate_population(r#"{"type":"Point","coordinates":[0,0]}"#,
                                     &get_temp_filename("absent.asc")).unwrap_err();
        assert!(matches!(e.kind(), QueryError::Geometry(GeometryError::Unsupported(_))));
    }

    #[test]
    fn test_raster_errors_are_wrapped() {
        let e = calculate_population(SQUARE, &get_temp_filename("absent.asc")).unwrap_err();
        assert!(matches!(e.kind(), QueryError::Raster(RasterError::Open { .. })));
        assert_eq!(e.kind().stage(), "raster");
    }

    #[test]
    fn test_options_are_used() {
        let info = RasterInfo::new(4, 4, GeoTransform::north_up(0., 4., 1., -1.), None);
        let path = create_test_raster("holes.asc", &info, &[1; 16]).unwrap();

        let donut = r#"{"type":"Polygon","coordinates":[
            [[0,0],[0,4],[4,4],[4,0],[0,0]],
            [[1,1],[1,3],[3,3],[3,1],[1,1]]
        ]}"#;

        assert_eq!(calculate_population(donut, &path).unwrap(), 12.0);

        let ignore = QueryOptions { hole_mode: HoleMode::Ignore, parallel: false, ..QueryOptions::default() };
        assert_eq!(calculate_population_with_options(donut, &path, &ignore).unwrap(), 16.0);

        let token = CancelToken::new();
        token.cancel();
        let cancelled = QueryOptions::default().with_cancel(token);
        let e = calculate_population_with_options(donut, &path, &cancelled).unwrap_err();
        assert!(matches!(e.kind(), QueryError::Cancelled { .. }));
    }

    /// Raster that records when it is dropped
    struct TrackedRaster {
        inner: MemRaster,
        dropped: Rc<Cell<bool>>,
    }

    impl RasterSource for TrackedRaster {
        fn info(&self) -> &RasterInfo {
            self.inner.info()
        }

        fn read_row(&self, row: usize, buf: &mut [i32]) -> Result<(), RasterError> {
            self.inner.read_row(row, buf)
        }
    }

    impl Drop for TrackedRaster {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    fn tracked() -> (TrackedRaster, Rc<Cell<bool>>) {
        let dropped = Rc::new(Cell::new(false));
        let raster = TrackedRaster {
            inner: MemRaster::from_vec(info_2x2(), vec![10, 20, 30, 40]).unwrap(),
            dropped: dropped.clone(),
        };
        (raster, dropped)
    }

    #[test]
    fn test_raster_released_on_every_path() {
        let (raster, dropped) = tracked();
        let geometry = GeometryDescription::from_text(SQUARE).unwrap();
        assert_eq!(query_population(&geometry, raster, &QueryOptions::default()).unwrap(), 100.0);
        assert!(dropped.get());

        let (raster, dropped) = tracked();
        let bad = GeometryDescription::from_text(r#"{"type":"Polygon","coordinates":[[]]}"#).unwrap();
        assert!(query_population(&bad, raster, &QueryOptions::default()).is_err());
        assert!(dropped.get());

        let (raster, dropped) = tracked();
        let token = CancelToken::new();
        token.cancel();
        let r = query_population(&geometry, raster, &QueryOptions::default().with_cancel(token));
        assert!(r.is_err());
        assert!(dropped.get());
    }
}
