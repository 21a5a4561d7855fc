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
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::util::CancelToken;
use crate::vector::HoleMode;

pub const DEFAULT_ROWS_PER_CHUNK: usize = 64;

/// Tuning for a query, loadable from TOML:
///
/// ```toml
/// hole_mode = "ignore"
/// parallel = false
/// rows_per_chunk = 128
/// ```
#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct QueryOptions {
    pub hole_mode: HoleMode,

    //Evaluate the cells of a chunk of rows on the rayon pool
    pub parallel: bool,

    pub rows_per_chunk: usize,

    #[serde(skip)]
    pub cancel: Option<CancelToken>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            hole_mode: HoleMode::default(),
            parallel: true,
            rows_per_chunk: DEFAULT_ROWS_PER_CHUNK,
            cancel: None,
        }
    }
}

impl QueryOptions {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let options: QueryOptions = toml::from_str(s).context("Invalid query options")?;
        Ok(options)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let s = read_to_string(path).with_context(|| format!("Unable to read config {:?}", path))?;
        Self::from_toml_str(&s).with_context(|| format!("In config {:?}", path))
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map(|c| c.is_cancelled()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let o = QueryOptions::from_toml_str("").unwrap();

        assert_eq!(o.hole_mode, HoleMode::Exclude);
        assert!(o.parallel);
        assert_eq!(o.rows_per_chunk, DEFAULT_ROWS_PER_CHUNK);
        assert!(!o.is_cancelled());
    }

    #[test]
    fn test_parse() {
        let o = QueryOptions::from_toml_str("hole_mode = \"ignore\"\nparallel = false\nrows_per_chunk = 8\n").unwrap();

        assert_eq!(o.hole_mode, HoleMode::Ignore);
        assert!(!o.parallel);
        assert_eq!(o.rows_per_chunk, 8);
    }

    #[test]
    fn test_rejects_unknown() {
        assert!(QueryOptions::from_toml_str("threads = 4").is_err());
        assert!(QueryOptions::from_toml_str("hole_mode = \"subtract\"").is_err());
        assert!(QueryOptions::from_toml_str("cancel = true").is_err());
    }

    #[test]
    fn test_cancel() {
        let token = CancelToken::new();
        let o = QueryOptions::default().with_cancel(token.clone());

        assert!(!o.is_cancelled());
        token.cancel();
        assert!(o.is_cancelled());
    }
}
