// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Morphology: connected-component ("island") analysis of the cleaning
//! mask over the camera's neighbor graph.

use serde::{Deserialize, Serialize};

use crate::constants::{MEDIUM_ISLAND_MAX, SMALL_ISLAND_MAX};
use crate::geom::CameraGeometry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyParameters {
    pub n_pixels: usize,
    pub n_islands: usize,
    pub n_small_islands: usize,
    pub n_medium_islands: usize,
    pub n_large_islands: usize,
}

impl MorphologyParameters {
    pub fn zero() -> Self {
        Self {
            n_pixels: 0,
            n_islands: 0,
            n_small_islands: 0,
            n_medium_islands: 0,
            n_large_islands: 0,
        }
    }
}

/// Union-find (disjoint set) with path compression and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (small, big) = if self.size[ra] < self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }
}

/// Classify island pixel counts. A singleton (size 1) counts as small.
fn classify(size: usize) -> Island {
    if size <= SMALL_ISLAND_MAX {
        Island::Small
    } else if size <= MEDIUM_ISLAND_MAX {
        Island::Medium
    } else {
        Island::Large
    }
}

enum Island {
    Small,
    Medium,
    Large,
}

pub fn morphology_parameters(geom: &CameraGeometry, mask: &[bool]) -> MorphologyParameters {
    let n = mask.len();
    let n_pixels = mask.iter().filter(|&&m| m).count();
    if n_pixels == 0 {
        return MorphologyParameters::zero();
    }

    let mut dsu = DisjointSet::new(n);
    for i in 0..n {
        if !mask[i] {
            continue;
        }
        for &j in geom.neighbors(i) {
            let j = j as usize;
            if mask[j] {
                dsu.union(i, j);
            }
        }
    }

    let mut island_sizes = std::collections::HashMap::new();
    for i in 0..n {
        if mask[i] {
            let root = dsu.find(i);
            *island_sizes.entry(root).or_insert(0usize) += 1;
        }
    }

    let mut n_small = 0;
    let mut n_medium = 0;
    let mut n_large = 0;
    for &size in island_sizes.values() {
        match classify(size) {
            Island::Small => n_small += 1,
            Island::Medium => n_medium += 1,
            Island::Large => n_large += 1,
        }
    }

    MorphologyParameters {
        n_pixels,
        n_islands: island_sizes.len(),
        n_small_islands: n_small,
        n_medium_islands: n_medium,
        n_large_islands: n_large,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_rows_on_five_by_five_form_two_small_islands() {
        let geom = CameraGeometry::square_grid(5);
        let mut mask = vec![false; 25];
        for x in 0..5 {
            mask[x] = true; // y = 0
            mask[4 * 5 + x] = true; // y = 4
        }
        let morph = morphology_parameters(&geom, &mask);
        assert_eq!(morph.n_pixels, 10);
        assert_eq!(morph.n_islands, 2);
        assert_eq!(morph.n_small_islands, 2);
        assert_eq!(morph.n_medium_islands, 0);
        assert_eq!(morph.n_large_islands, 0);
    }

    #[test]
    fn islands_sum_invariant_holds() {
        let geom = CameraGeometry::square_grid(8);
        let mut mask = vec![false; 64];
        for &i in &[0usize, 1, 8, 20, 21, 22, 29, 30, 38] {
            mask[i] = true;
        }
        let morph = morphology_parameters(&geom, &mask);
        assert_eq!(
            morph.n_islands,
            morph.n_small_islands + morph.n_medium_islands + morph.n_large_islands
        );
        let total: usize = morph.n_pixels;
        assert_eq!(total, mask.iter().filter(|&&m| m).count());
    }
}
