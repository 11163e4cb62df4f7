// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The static per-telescope pixel layout and neighbor adjacency.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use super::neighbors::{build_neighbor_matrix, Csr};

/// The shape of a camera pixel. Encoded as 1 (square) / 2 (hex) at
/// serialization boundaries; internally it is a proper enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum PixelShape {
    #[strum(serialize = "square")]
    Square,
    #[strum(serialize = "hex")]
    Hex,
}

impl PixelShape {
    pub fn max_row_sum(self) -> usize {
        match self {
            PixelShape::Square => 4,
            PixelShape::Hex => 8,
        }
    }
}

#[derive(Error, Debug)]
pub enum CameraGeometryError {
    #[error("camera geometry arrays have mismatched lengths: pix_x={pix_x}, pix_y={pix_y}, pix_area={pix_area}, pix_type={pix_type}")]
    MismatchedLengths {
        pix_x: usize,
        pix_y: usize,
        pix_area: usize,
        pix_type: usize,
    },

    #[error("pixel {pixel} has {got} neighbors, more than the maximum of {max} for its shape")]
    InvariantViolation {
        pixel: usize,
        got: usize,
        max: usize,
    },
}

/// A telescope's static pixel layout and neighbor graph.
#[derive(Clone, Debug)]
pub struct CameraGeometry {
    pub name: String,
    pub num_pixels: usize,
    /// Pixel centers on the focal plane \[meters\].
    pub pix_x: Vec<f64>,
    pub pix_y: Vec<f64>,
    pub pix_area: Vec<f64>,
    pub pix_type: Vec<PixelShape>,
    neighbors: Csr,
}

impl CameraGeometry {
    /// Build a camera geometry from its pixel layout, deriving the neighbor
    /// matrix from pairwise distance.
    pub fn from_pixels(
        name: impl Into<String>,
        pix_x: Vec<f64>,
        pix_y: Vec<f64>,
        pix_area: Vec<f64>,
        pix_type: Vec<PixelShape>,
    ) -> Result<Self, CameraGeometryError> {
        let n = pix_x.len();
        if pix_y.len() != n || pix_area.len() != n || pix_type.len() != n {
            return Err(CameraGeometryError::MismatchedLengths {
                pix_x: n,
                pix_y: pix_y.len(),
                pix_area: pix_area.len(),
                pix_type: pix_type.len(),
            });
        }
        let neighbors = build_neighbor_matrix(&pix_x, &pix_y, &pix_area, &pix_type);

        // Edge pixels may legitimately have fewer neighbors than the cap; we
        // only reject geometries where a pixel has *more* than the cap,
        // which would indicate a broken distance rule.
        for i in 0..n {
            let got = neighbors.row_len(i);
            let max = pix_type[i].max_row_sum();
            if got > max {
                return Err(CameraGeometryError::InvariantViolation { pixel: i, got, max });
            }
        }

        Ok(Self {
            name: name.into(),
            num_pixels: n,
            pix_x,
            pix_y,
            pix_area,
            pix_type,
            neighbors,
        })
    }

    pub fn neighbors(&self, i: usize) -> &[u32] {
        self.neighbors.row(i)
    }

    pub fn neighbor_count(&self, i: usize) -> usize {
        self.neighbors.row_len(i)
    }

    /// `{i : |N(i) ∩ S| > 0}` as a boolean mask.
    pub fn neighbors_of(&self, mask: &[bool]) -> Vec<bool> {
        self.neighbors.neighbors_of(mask)
    }

    pub fn count_neighbors_in(&self, i: usize, mask: &[bool]) -> usize {
        self.neighbors.count_neighbors_in(i, mask)
    }

    /// The "modal" (most well-connected, fully-interior) per-pixel neighbor
    /// count, used by leakage to define the outermost ring (pixels whose
    /// neighbor count is below this are on the camera edge).
    ///
    /// On any camera large enough that interior pixels outnumber edge
    /// pixels, the statistical mode of `neighbor_count` over all pixels
    /// equals the maximum achievable count for the pixel shape. On the
    /// small toy cameras used in tests, that is no longer true by simple
    /// frequency (edge pixels can outnumber interior ones), so this uses
    /// the maximum achieved count directly rather than a literal frequency
    /// mode -- the two coincide for real cameras and give the outer-ring
    /// definition leakage needs.
    pub fn modal_neighbor_count(&self) -> usize {
        (0..self.num_pixels)
            .map(|i| self.neighbor_count(i))
            .max()
            .unwrap_or(0)
    }

    /// The outermost ring of pixels: those whose neighbor count is below the
    /// camera's modal neighbor count.
    pub fn outer_ring(&self) -> Vec<bool> {
        let modal = self.modal_neighbor_count();
        (0..self.num_pixels)
            .map(|i| self.neighbor_count(i) < modal)
            .collect()
    }

    /// A square grid of `side * side` unit-area pixels at integer
    /// coordinates `0..side`, used by tests and the benchmark.
    pub fn square_grid(side: usize) -> Self {
        let mut pix_x = Vec::with_capacity(side * side);
        let mut pix_y = Vec::with_capacity(side * side);
        for y in 0..side {
            for x in 0..side {
                pix_x.push(x as f64);
                pix_y.push(y as f64);
            }
        }
        let n = side * side;
        Self::from_pixels(
            format!("square-{side}x{side}"),
            pix_x,
            pix_y,
            vec![1.0; n],
            vec![PixelShape::Square; n],
        )
        .expect("square grid geometry is well-formed")
    }

    /// A hexagonal camera with `rings` concentric rings of unit-circumradius
    /// hexagons around a central pixel, used by tests and the benchmark.
    pub fn hex_grid(rings: i32) -> Self {
        let size = 1.0_f64;
        let mut pix_x = Vec::new();
        let mut pix_y = Vec::new();
        for q in -rings..=rings {
            let r_lo = (-rings).max(-q - rings);
            let r_hi = rings.min(-q + rings);
            for r in r_lo..=r_hi {
                let x = size * 1.5 * q as f64;
                let y = size * 3f64.sqrt() * (r as f64 + q as f64 / 2.0);
                pix_x.push(x);
                pix_y.push(y);
            }
        }
        let n = pix_x.len();
        let area = 1.5 * 3f64.sqrt() * size * size;
        Self::from_pixels(
            format!("hex-{rings}"),
            pix_x,
            pix_y,
            vec![area; n],
            vec![PixelShape::Hex; n],
        )
        .expect("hex grid geometry is well-formed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_grid_row_sums_respect_invariant() {
        let geom = CameraGeometry::square_grid(4);
        for i in 0..geom.num_pixels {
            assert!(geom.neighbor_count(i) <= 4);
        }
        // Interior pixel (1,1) == index 5 has all 4 neighbors.
        assert_eq!(geom.neighbor_count(5), 4);
    }

    #[test]
    fn hex_grid_center_has_six_neighbors() {
        let geom = CameraGeometry::hex_grid(2);
        // The center pixel is pushed first (q=-rings iteration starts at
        // corner though); find the one at the origin.
        let center = (0..geom.num_pixels)
            .find(|&i| geom.pix_x[i].abs() < 1e-9 && geom.pix_y[i].abs() < 1e-9)
            .unwrap();
        assert_eq!(geom.neighbor_count(center), 6);
    }

    #[test]
    fn outer_ring_excludes_interior_pixels() {
        let geom = CameraGeometry::square_grid(4);
        let outer = geom.outer_ring();
        // Interior pixel (1,1) == index 5 should not be in the outer ring.
        assert!(!outer[5]);
        // Corner pixel 0 should be.
        assert!(outer[0]);
    }
}
