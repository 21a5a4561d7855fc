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
use anyhow::Result;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use structopt::StructOpt;

use crate::cmd_batch::{run_batch, BatchArgs};
use crate::cmd_query::{run_query, QueryArgs};
use crate::cmd_raster_info::{print_raster_info, RasterInfoArgs};
use crate::option_args::load_options;

mod cmd_batch;
mod cmd_query;
mod cmd_raster_info;
mod option_args;

#[derive(StructOpt)]
struct Cli {

    #[structopt(long, default_value = "Warn")]
    log_level: LevelFilter,

    #[structopt(long, parse(from_os_str), help="TOML file with query options")]
    config: Option<PathBuf>,

    #[structopt(subcommand)]
    cmd: Command
}

#[derive(StructOpt)]
enum Command {
    #[structopt(help="Prints the population inside one Polygon / MultiPolygon")]
    Query(QueryArgs),

    #[structopt(help="Population of every feature of a GeoJSON file, written to a CSV")]
    Batch(BatchArgs),

    #[structopt(help="Prints size, transform and no data value of a raster")]
    Info(RasterInfoArgs),
}

fn run() -> Result<()> {
    let args = Cli::from_args();

    SimpleLogger::new().with_level(args.log_level).init()?;

    match &args.cmd {
        Command::Query(r) => {
            run_query(r, load_options(&args.config)?)?;
        },
        Command::Batch(r) => {
            run_batch(r, load_options(&args.config)?)?;
        },
        Command::Info(r) => {
            print_raster_info(r)?;
        },
    }

    Ok(())
}

fn main() {
    run().unwrap();
}
