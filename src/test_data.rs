use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Noisy samples of `sin(x)` on `[0, 2π]`, as a `1×n` design.
pub fn setup_data_sine(n: usize, noise: f64, seed: u64) -> (Array2<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let x = Array1::linspace(0.0, 2.0 * std::f64::consts::PI, n);
    let y = x.mapv(|v| v.sin() + noise * (rng.gen::<f64>() - 0.5));
    (x.insert_axis(ndarray::Axis(0)), y)
}

/// Noiseless plane `y = 1 + 2 x1 - x2` on a 2-D grid, as a `2×n²` design.
pub fn setup_data_plane(n: usize) -> (Array2<f64>, Array1<f64>) {
    let ticks = Array1::linspace(-1.0, 1.0, n);
    let x = Array2::from_shape_fn((2, n * n), |(d, i)| {
        if d == 0 {
            ticks[i / n]
        } else {
            ticks[i % n]
        }
    });
    let y = x
        .columns()
        .into_iter()
        .map(|c| 1.0 + 2.0 * c[0] - c[1])
        .collect();
    (x, y)
}
