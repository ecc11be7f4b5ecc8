use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::{Array1, Array2};
use npreg::methods::{LocalPolynomialKernel, SpatialAverage};
use npreg::NonParamRegression;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn setup_data(n: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(42);
    let x = Array2::from_shape_fn((2, n), |_| rng.gen_range(-2.0..2.0));
    let y = x
        .columns()
        .into_iter()
        .map(|c| c[0].sin() + 0.5 * c[1] * c[1] + 0.1 * rng.gen::<f64>())
        .collect();
    (x, y)
}

fn bench_evaluate(c: &mut Criterion) {
    let (x, y) = setup_data(1000);

    let mut group = c.benchmark_group("Evaluate");

    let mut constant = NonParamRegression::builder()
        .method(SpatialAverage::new())
        .build(&x, &y)
        .unwrap();
    constant.fit().unwrap();
    group.bench_function("SpatialAverage", |b| {
        b.iter(|| constant.evaluate(&x).unwrap())
    });

    let mut linear = NonParamRegression::builder()
        .method(LocalPolynomialKernel::new(1))
        .build(&x, &y)
        .unwrap();
    linear.fit().unwrap();
    group.bench_function("LocalLinear", |b| b.iter(|| linear.evaluate(&x).unwrap()));
    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
