// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Compressed-sparse-row storage of a symmetric 0/1 neighbor-adjacency
//! matrix, plus the SpMV-shaped operations cleaning and parameterization
//! need (`neighbors_of`, per-row neighbor counts).

use super::PixelShape;
use crate::constants::{HEX_NEIGHBOR_FACTOR, SQUARE_NEIGHBOR_FACTOR};

/// A symmetric, zero-diagonal adjacency matrix stored as compressed sparse
/// rows keyed by pixel index.
#[derive(Clone, Debug)]
pub struct Csr {
    indptr: Vec<u32>,
    indices: Vec<u32>,
}

impl Csr {
    /// The neighbor indices of pixel `i`.
    pub fn row(&self, i: usize) -> &[u32] {
        let start = self.indptr[i] as usize;
        let end = self.indptr[i + 1] as usize;
        &self.indices[start..end]
    }

    /// Number of pixels represented.
    pub fn num_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    /// Number of neighbors of pixel `i`.
    pub fn row_len(&self, i: usize) -> usize {
        self.row(i).len()
    }

    /// `{i : |N(i) ∩ S| > 0}` as a boolean mask, i.e. one boolean SpMV.
    pub fn neighbors_of(&self, mask: &[bool]) -> Vec<bool> {
        (0..self.num_rows())
            .map(|i| self.row(i).iter().any(|&j| mask[j as usize]))
            .collect()
    }

    /// `|N(i) ∩ S|` for a boolean mask `S`.
    pub fn count_neighbors_in(&self, i: usize, mask: &[bool]) -> usize {
        self.row(i)
            .iter()
            .filter(|&&j| mask[j as usize])
            .count()
    }
}

/// Build the neighbor adjacency from pixel centers: two pixels are neighbors
/// iff their center distance is within the larger of the two pixels'
/// individual cutoffs (hex: `1.4 * sqrt(max pix_area)`; square:
/// `1.1 * sqrt(pix_area)`), which keeps the matrix symmetric even when pixel
/// areas vary slightly pixel-to-pixel.
pub fn build_neighbor_matrix(
    pix_x: &[f64],
    pix_y: &[f64],
    pix_area: &[f64],
    pix_type: &[PixelShape],
) -> Csr {
    let n = pix_x.len();
    let max_area = pix_area.iter().cloned().fold(0.0_f64, f64::max);
    let cutoff = |i: usize| -> f64 {
        match pix_type[i] {
            PixelShape::Hex => HEX_NEIGHBOR_FACTOR * max_area.sqrt(),
            PixelShape::Square => SQUARE_NEIGHBOR_FACTOR * pix_area[i].sqrt(),
        }
    };
    let cutoffs: Vec<f64> = (0..n).map(cutoff).collect();

    let mut rows: Vec<Vec<u32>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = pix_x[i] - pix_x[j];
            let dy = pix_y[i] - pix_y[j];
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= cutoffs[i].max(cutoffs[j]) {
                rows[i].push(j as u32);
                rows[j].push(i as u32);
            }
        }
    }

    let mut indptr = Vec::with_capacity(n + 1);
    let mut indices = Vec::new();
    indptr.push(0);
    for row in &mut rows {
        row.sort_unstable();
        indices.extend_from_slice(row);
        indptr.push(indices.len() as u32);
    }

    Csr { indptr, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_grid_center_pixel_has_four_neighbors() {
        // 3x3 grid of unit-area square pixels at integer coordinates.
        let mut pix_x = Vec::new();
        let mut pix_y = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                pix_x.push(x as f64);
                pix_y.push(y as f64);
            }
        }
        let pix_area = vec![1.0; 9];
        let pix_type = vec![PixelShape::Square; 9];
        let csr = build_neighbor_matrix(&pix_x, &pix_y, &pix_area, &pix_type);
        // Center pixel is index 4.
        assert_eq!(csr.row_len(4), 4);
        // Corner pixel is index 0.
        assert_eq!(csr.row_len(0), 2);
    }
}
