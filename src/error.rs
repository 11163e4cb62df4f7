// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all crate-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use crate::cleaning::CleaningError;
use crate::geom::CameraGeometryError;
use crate::image::QualityPredicateError;
use crate::io::WriterError;

/// The *only* publicly visible error from this crate.
#[derive(Error, Debug)]
pub enum AirshowerError {
    /// An error related to camera geometry construction.
    #[error("camera geometry error: {0}")]
    CameraGeometry(String),

    /// An error related to image cleaning configuration.
    #[error("image cleaning error: {0}")]
    Cleaning(String),

    /// An error related to parsing an `ImageQuery` predicate.
    #[error("quality predicate error: {0}")]
    QualityPredicate(String),

    /// An error from a [crate::io::Writer] backend.
    #[error("data writer error: {0}")]
    Writer(String),

    /// An error reading or parsing the JSON configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// An error setting up the CLI (mismatched `-i`/`-o` counts, missing
    /// files, and so on).
    #[error("{0}")]
    Cli(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl From<CameraGeometryError> for AirshowerError {
    fn from(e: CameraGeometryError) -> Self {
        Self::CameraGeometry(e.to_string())
    }
}

impl From<CleaningError> for AirshowerError {
    fn from(e: CleaningError) -> Self {
        Self::Cleaning(e.to_string())
    }
}

impl From<QualityPredicateError> for AirshowerError {
    fn from(e: QualityPredicateError) -> Self {
        Self::QualityPredicate(e.to_string())
    }
}

impl From<WriterError> for AirshowerError {
    fn from(e: WriterError) -> Self {
        Self::Writer(e.to_string())
    }
}

impl From<serde_json::Error> for AirshowerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<std::io::Error> for AirshowerError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
