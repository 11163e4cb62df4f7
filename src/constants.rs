// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. The pipeline should do as many
calculations as possible in double precision before converting to a lower
precision, if it is ever required.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Multiplier applied to `sqrt(max pixel area)` to get the hex-camera
/// neighbor-distance cutoff.
pub const HEX_NEIGHBOR_FACTOR: f64 = 1.4;

/// Multiplier applied to `sqrt(pixel area)` to get the square-camera
/// neighbor-distance cutoff.
pub const SQUARE_NEIGHBOR_FACTOR: f64 = 1.1;

/// Islands with a pixel count in `2..=5` are "small".
pub const SMALL_ISLAND_MAX: usize = 5;

/// Islands with a pixel count in `6..=50` are "medium". Above this, islands
/// are "large".
pub const MEDIUM_ISLAND_MAX: usize = 50;

/// Below this many surviving pixels (or non-positive intensity), all Hillas,
/// leakage, concentration and intensity statistics are undefined (NaN).
pub const MIN_PIXELS_FOR_HILLAS: usize = 3;

/// Pair weights below this threshold (`sin^2` of the angle between two
/// telescope axes) are dropped from the stereo intersection as effectively
/// parallel.
pub const PARALLEL_AXIS_EPSILON: f64 = 1e-6;

/// Linear systems with a condition number above this are treated as
/// numerically degenerate and rejected.
pub const MAX_CONDITION_NUMBER: f64 = 1e12;
