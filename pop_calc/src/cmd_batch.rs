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
use std::fs::{read_to_string, remove_file, rename, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use pop_core::raster::{open_raster, RasterSource};
use pop_core::util::{format_duration, log_remaining_time};
use pop_core::vector::{GeometryDescription, Region};
use pop_core::{region_population, QueryOptions};
use serde_json::Value;
use structopt::StructOpt;

use crate::option_args::OptionArgs;

/// Produces a CSV with the feature index and the population inside it

#[derive(StructOpt)]
pub struct BatchArgs {

    #[structopt(long, parse(from_os_str), help="Population raster")]
    raster: PathBuf,

    #[structopt(long, parse(from_os_str), help="GeoJSON FeatureCollection, Feature or geometry")]
    features: PathBuf,

    #[structopt(long, parse(from_os_str), help="Path to CSV results")]
    output_csv: PathBuf,

    #[structopt(long)]
    clean: bool,

    #[structopt(flatten)]
    options: OptionArgs,
}

fn feature_geometry(feature: &Value) -> Result<GeometryDescription> {
    let geometry = feature.get("geometry").context("Feature has no geometry")?;
    Ok(GeometryDescription::from_value(geometry)?)
}

/// Geometries in file order
fn read_geometries(root: &Value) -> Result<Vec<GeometryDescription>> {
    match root.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = root.get("features")
                .and_then(Value::as_array)
                .context("FeatureCollection without a features array")?;

            features.iter().enumerate()
                .map(|(idx, f)| feature_geometry(f).with_context(|| format!("Feature {}", idx)))
                .collect()
        }
        Some("Feature") => Ok(vec![feature_geometry(root)?]),
        _ => Ok(vec![GeometryDescription::from_value(root)?]),
    }
}

/// Sibling of `path` written while the batch runs, renamed once every row is in
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

fn write_populations<R: RasterSource + ?Sized>(path: &Path,
                                               regions: &[Region],
                                               raster: &R,
                                               options: &QueryOptions) -> Result<()>
{
    let f = File::create(path).with_context(|| format!("Unable to create {:?}", path))?;
    let mut f = BufWriter::new(f);

    let now = Instant::now();
    let mut last_output = Instant::now();

    for (idx, region) in regions.iter().enumerate() {
        let population = region_population(region, raster, options)
            .with_context(|| format!("Feature {}", idx))?;

        f.write_all(format!("{}, {}\n", idx, population).as_bytes())?;

        if last_output.elapsed().as_secs() >= 1 {
            last_output = Instant::now();
            log_remaining_time(&now, idx as u32 + 1, regions.len() as u32);
        }
    }

    f.flush()?;

    Ok(())
}

pub fn run_batch(args: &BatchArgs, options: QueryOptions) -> Result<()> {

    if args.clean && args.output_csv.exists() {
        remove_file(&args.output_csv)?
    }

    if args.output_csv.exists() {
        println!("{:?} already exists, nothing to do", &args.output_csv);
        return Ok(());
    }

    let options = args.options.apply(options);

    let text = read_to_string(&args.features).with_context(|| format!("Unable to read {:?}", &args.features))?;
    let root: Value = serde_json::from_str(&text).with_context(|| format!("Invalid GeoJSON in {:?}", &args.features))?;

    //Every geometry is checked before the raster is opened or anything is written
    let regions = read_geometries(&root)?
        .iter()
        .enumerate()
        .map(|(idx, g)| g.to_region(options.hole_mode).with_context(|| format!("Feature {}", idx)))
        .collect::<Result<Vec<Region>>>()?;

    info!("{} geometries in {:?}", regions.len(), &args.features);

    let now = Instant::now();

    //One open raster for every geometry
    let raster = open_raster(&args.raster)?;

    let part_path = partial_path(&args.output_csv);

    if let Err(e) = write_populations(&part_path, &regions, &raster, &options) {
        if part_path.exists() {
            remove_file(&part_path)?;
        }
        return Err(e);
    }

    rename(&part_path, &args.output_csv)
        .with_context(|| format!("Unable to move {:?} to {:?}", &part_path, &args.output_csv))?;

    info!("Wrote {:?} in {}", &args.output_csv, format_duration(now.elapsed()));

    Ok(())
}
