// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Benchmarks for the per-event hot path: cleaning and parameterizing one
//! camera image.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use airshower::cleaning::{ImageCleaner, Tailcuts, TailcutsConfig};
use airshower::geom::CameraGeometry;
use airshower::image::compute_image_parameters;

fn bright_disc_image(geom: &CameraGeometry, radius: f64) -> Vec<f64> {
    let cx = geom.pix_x.iter().sum::<f64>() / geom.pix_x.len() as f64;
    let cy = geom.pix_y.iter().sum::<f64>() / geom.pix_y.len() as f64;
    geom.pix_x
        .iter()
        .zip(&geom.pix_y)
        .map(|(&x, &y)| {
            let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            if d < radius {
                100.0 * (1.0 - d / radius)
            } else {
                0.5
            }
        })
        .collect()
}

fn tailcuts() -> Tailcuts {
    Tailcuts::new(TailcutsConfig {
        picture_thresh: 10.0,
        boundary_thresh: 5.0,
        keep_isolated_pixels: false,
        min_number_picture_neighbors: 2,
    })
    .unwrap()
}

fn bench_cleaning(c: &mut Criterion) {
    let mut group = c.benchmark_group("tailcuts_clean");
    let cleaner = tailcuts();

    for side in [20usize, 40, 80] {
        let geom = CameraGeometry::square_grid(side);
        let image = bright_disc_image(&geom, side as f64 / 4.0);
        group.throughput(Throughput::Elements(geom.num_pixels as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| black_box(cleaner.clean(&geom, &image)));
        });
    }
    group.finish();
}

fn bench_image_parameters(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_image_parameters");
    let cleaner = tailcuts();

    for side in [20usize, 40, 80] {
        let geom = CameraGeometry::square_grid(side);
        let image = bright_disc_image(&geom, side as f64 / 4.0);
        let mask = cleaner.clean(&geom, &image);
        group.throughput(Throughput::Elements(geom.num_pixels as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| black_box(compute_image_parameters(&geom, &image, &mask)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cleaning, bench_image_parameters);
criterion_main!(benches);
