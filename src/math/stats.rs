// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Weighted moment helpers used throughout image parameterization.

/// `sum(w_i * x_i) / sum(w_i)`. Returns `NaN` if the weight sum is not
/// strictly positive.
pub fn weighted_mean<I: Iterator<Item = (f64, f64)>>(pairs: I) -> f64 {
    let (wsum, wxsum) = pairs.fold((0.0, 0.0), |(wsum, wxsum), (w, x)| (wsum + w, wxsum + w * x));
    if wsum > 0.0 {
        wxsum / wsum
    } else {
        f64::NAN
    }
}

/// The k-th weighted moment of `x` about zero: `sum(w_i * x_i^k) / sum(w_i)`.
pub fn weighted_moment<I: Iterator<Item = (f64, f64)>>(pairs: I, k: i32) -> f64 {
    let (wsum, wxsum) = pairs.fold((0.0, 0.0), |(wsum, wxsum), (w, x)| {
        (wsum + w, wxsum + w * x.powi(k))
    });
    if wsum > 0.0 {
        wxsum / wsum
    } else {
        f64::NAN
    }
}
