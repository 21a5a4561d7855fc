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
use std::fs::read_to_string;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use pop_core::{calculate_population_with_options, QueryOptions};
use structopt::StructOpt;

use crate::option_args::OptionArgs;

#[derive(StructOpt)]
pub struct QueryArgs {

    #[structopt(long, parse(from_os_str), help="Population raster")]
    raster: PathBuf,

    #[structopt(long, help="GeoJSON geometry text")]
    geojson: Option<String>,

    #[structopt(long, parse(from_os_str), help="File holding a GeoJSON geometry")]
    geojson_file: Option<PathBuf>,

    #[structopt(flatten)]
    options: OptionArgs,
}

fn geometry_text(args: &QueryArgs) -> Result<String> {
    match (&args.geojson, &args.geojson_file) {
        (Some(text), None) => Ok(text.clone()),
        (None, Some(path)) => read_to_string(path).with_context(|| format!("Unable to read {:?}", path)),
        _ => bail!("Pass exactly one of --geojson or --geojson-file"),
    }
}

fn query(args: &QueryArgs, options: QueryOptions) -> Result<f64> {
    let text = geometry_text(args)?;
    let options = args.options.apply(options);

    let population = calculate_population_with_options(&text, &args.raster, &options)?;
    Ok(population)
}

pub fn run_query(args: &QueryArgs, options: QueryOptions) -> Result<()> {
    let population = query(args, options)?;
    println!("{}", population);
    Ok(())
}
