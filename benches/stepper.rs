//! Benchmarks for the Gray-Scott stepper.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use gray_scott::{
    compute::{Field, Stepper},
    schema::{Parameters, SeedPattern, SimulationConfig},
    session::Session,
};

fn bench_stepper_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("stepper_step");

    for size in [64, 128, 256, 512, 1024] {
        let mut field = Field::create(size, size, SeedPattern::Center).expect("create field");
        let mut stepper = Stepper::new(size, size);
        let params = Parameters::default();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    stepper.step(black_box(&mut field), &params, 1.0);
                });
            },
        );
    }

    group.finish();
}

fn bench_session_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_tick");

    for steps_per_tick in [1, 5, 10] {
        let config = SimulationConfig {
            width: 256,
            height: 256,
            steps_per_tick,
            ..SimulationConfig::default()
        };
        let mut session = Session::new(&config).expect("create session");
        let mut token = session.play();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_steps", steps_per_tick)),
            &steps_per_tick,
            |b, _| {
                b.iter(|| {
                    token = session.tick(black_box(token)).expect("tick");
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_stepper_step, bench_session_tick);
criterion_main!(benches);
