// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::error::AirshowerError;
use crate::event::TelId;

/// Process one or more event files through calibration, image
/// parameterization and geometry reconstruction.
#[derive(Parser, Debug, Default)]
#[clap(name = "airshower", author, version, about)]
pub struct Args {
    /// Path to an input event file. May be repeated; each `-i` must be
    /// paired with a corresponding `-o`.
    #[clap(short = 'i', long = "input", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Path to the output for the corresponding `-i`. Must be given the
    /// same number of times as `-i`.
    #[clap(short = 'o', long = "output", required = true)]
    pub outputs: Vec<PathBuf>,

    /// Path to a JSON configuration file. Omit to use default
    /// configuration for every component.
    #[clap(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Override every configured reconstructor's image quality predicate
    /// with an additional `leakage_intensity_width_2 < VALUE` clause.
    #[clap(short = 'l', long = "max-leakage2")]
    pub max_leakage2: Option<f64>,

    /// Restrict processing to this comma-separated list of telescope ids,
    /// e.g. `1,2,3`. Omit to use every telescope in the subarray.
    #[clap(short = 's', long = "subarray", value_delimiter = ',')]
    pub telescope_ids: Option<Vec<TelId>>,
}

impl Args {
    /// Validate the `-i`/`-o` pairing and return them zipped together.
    pub fn input_output_pairs(&self) -> Result<Vec<(PathBuf, PathBuf)>, AirshowerError> {
        if self.inputs.len() != self.outputs.len() {
            return Err(AirshowerError::Cli(format!(
                "got {} input path(s) but {} output path(s); -i and -o must be given the same number of times",
                self.inputs.len(),
                self.outputs.len()
            )));
        }
        Ok(self
            .inputs
            .iter()
            .cloned()
            .zip(self.outputs.iter().cloned())
            .collect())
    }
}
