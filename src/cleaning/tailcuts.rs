// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Two-threshold ("tailcuts") image cleaning.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::CameraGeometry;

#[derive(Error, Debug)]
pub enum CleaningError {
    #[error("boundary_thresh ({boundary}) must not exceed picture_thresh ({picture})")]
    InvalidThresholds { picture: f64, boundary: f64 },
}

/// Configuration for [Tailcuts].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TailcutsConfig {
    pub picture_thresh: f64,
    pub boundary_thresh: f64,
    #[serde(default)]
    pub keep_isolated_pixels: bool,
    #[serde(default)]
    pub min_number_picture_neighbors: usize,
}

impl TailcutsConfig {
    pub fn validate(&self) -> Result<(), CleaningError> {
        if self.boundary_thresh > self.picture_thresh {
            return Err(CleaningError::InvalidThresholds {
                picture: self.picture_thresh,
                boundary: self.boundary_thresh,
            });
        }
        Ok(())
    }
}

/// A pixel-survival mask producer. `Tailcuts` is presently the only
/// implementation, but this exists as a trait so a second cleaning
/// algorithm can be added without touching callers.
pub trait ImageCleaner {
    fn clean(&self, geom: &CameraGeometry, image: &[f64]) -> Vec<bool>;
}

/// The two-threshold cleaning algorithm.
#[derive(Clone, Copy, Debug)]
pub struct Tailcuts {
    pub config: TailcutsConfig,
}

impl Tailcuts {
    pub fn new(config: TailcutsConfig) -> Result<Self, CleaningError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl ImageCleaner for Tailcuts {
    fn clean(&self, geom: &CameraGeometry, image: &[f64]) -> Vec<bool> {
        let cfg = &self.config;
        let n = image.len();

        // P = picture candidates.
        let picture: Vec<bool> = image.iter().map(|&v| v >= cfg.picture_thresh).collect();

        // P' = picture pixels that also satisfy the neighbor constraint.
        let picture_prime: Vec<bool> = if cfg.keep_isolated_pixels || cfg.min_number_picture_neighbors == 0 {
            picture.clone()
        } else {
            (0..n)
                .map(|i| {
                    picture[i] && geom.count_neighbors_in(i, &picture) >= cfg.min_number_picture_neighbors
                })
                .collect()
        };

        // B = boundary candidates.
        let boundary: Vec<bool> = image.iter().map(|&v| v >= cfg.boundary_thresh).collect();

        let boundary_near_picture = geom.neighbors_of(&picture_prime);
        if cfg.keep_isolated_pixels {
            (0..n)
                .map(|i| (boundary[i] && boundary_near_picture[i]) || picture_prime[i])
                .collect()
        } else {
            let picture_near_boundary = geom.neighbors_of(&boundary);
            (0..n)
                .map(|i| {
                    (boundary[i] && boundary_near_picture[i])
                        || (picture_prime[i] && picture_near_boundary[i])
                })
                .collect()
        }
    }
}

/// `mask ∪ neighbors_of(mask)`.
pub fn dilate(geom: &CameraGeometry, mask: &[bool]) -> Vec<bool> {
    let grown = geom.neighbors_of(mask);
    mask.iter().zip(grown).map(|(&a, b)| a || b).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::CameraGeometry;

    fn cfg(picture: f64, boundary: f64, keep_isolated: bool, min_neighbors: usize) -> TailcutsConfig {
        TailcutsConfig {
            picture_thresh: picture,
            boundary_thresh: boundary,
            keep_isolated_pixels: keep_isolated,
            min_number_picture_neighbors: min_neighbors,
        }
    }

    #[test]
    fn empty_image_cleans_to_all_false() {
        let geom = CameraGeometry::square_grid(4);
        let image = vec![0.0; 16];
        let tc = Tailcuts::new(cfg(1.0, 1.0, false, 0)).unwrap();
        let mask = tc.clean(&geom, &image);
        assert!(mask.iter().all(|&m| !m));
    }

    #[test]
    fn constant_image_cleans_to_all_true() {
        let geom = CameraGeometry::square_grid(4);
        let image = vec![10.0; 16];
        let tc = Tailcuts::new(cfg(1.0, 1.0, false, 0)).unwrap();
        let mask = tc.clean(&geom, &image);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 16);
    }

    #[test]
    fn isolated_peak_with_no_boundary_neighbors_is_dropped() {
        // A lone picture pixel whose four neighbors are all below
        // boundary_thresh has no boundary pixel adjacent to it and no
        // picture pixel adjacent to a boundary pixel, so with
        // keep_isolated_pixels=false the whole mask comes out empty.
        let geom = CameraGeometry::square_grid(4);
        let mut image = vec![0.0; 16];
        image[10] = 10.0;
        let tc = Tailcuts::new(cfg(8.0, 1.0, false, 0)).unwrap();
        let mask = tc.clean(&geom, &image);
        assert!(mask.iter().all(|&m| !m));
    }

    #[test]
    fn invalid_thresholds_rejected() {
        assert!(Tailcuts::new(cfg(1.0, 2.0, false, 0)).is_err());
    }

    #[test]
    fn dilate_is_superset_of_mask() {
        let geom = CameraGeometry::square_grid(4);
        let mut mask = vec![false; 16];
        mask[5] = true;
        let dilated = dilate(&geom, &mask);
        for i in 0..16 {
            if mask[i] {
                assert!(dilated[i]);
            }
        }
        assert!(dilated.iter().filter(|&&m| m).count() > 1);
    }
}
