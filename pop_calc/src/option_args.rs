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

use anyhow::{Context, Result};
use log::debug;
use pop_core::vector::HoleMode;
use pop_core::QueryOptions;
use structopt::StructOpt;

/// Flags that override values from the --config file
#[derive(StructOpt, Default)]
pub struct OptionArgs {

    #[structopt(long, help="Holes are not subtracted, every ring is a filled polygon")]
    pub ignore_holes: bool,

    #[structopt(long, help="Evaluate cells on one thread")]
    pub serial: bool,
}

impl OptionArgs {
    pub fn apply(&self, mut options: QueryOptions) -> QueryOptions {
        if self.ignore_holes {
            options.hole_mode = HoleMode::Ignore;
        }
        if self.serial {
            options.parallel = false;
        }
        options
    }
}

pub fn load_options(config: &Option<PathBuf>) -> Result<QueryOptions> {
    let options = match config {
        Some(path) => QueryOptions::from_toml_file(path)
            .with_context(|| format!("Loading options from {:?}", path))?,
        None => QueryOptions::default(),
    };
    debug!("Options: {:?}", options);
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override() {
        let args = OptionArgs { ignore_holes: true, serial: true };
        let options = args.apply(QueryOptions::default());
        assert_eq!(options.hole_mode, HoleMode::Ignore);
        assert!(!options.parallel);

        let options = OptionArgs::default().apply(QueryOptions::default());
        assert_eq!(options.hole_mode, HoleMode::Exclude);
        assert!(options.parallel);
    }

    #[test]
    fn test_no_config() {
        let options = load_options(&None).unwrap();
        assert_eq!(options.rows_per_chunk, QueryOptions::default().rows_per_chunk);
    }
}
