//! # Resolver Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use bowl_if::Position;
use bowl_lib::{
    calib_store::{CalibrationStore, ServoReadings, SingleRpmRecord, SwingRecord},
    dataset::{Dataset, DatasetParams},
    failsafe::{FailsafeEnforcer, Limits},
    resolver::{ParamResolver, Sentinels},
    synth::{FormulaVariant, SynthEngine, SynthParams},
};

fn resolve_benchmark(c: &mut Criterion) {
    // ---- Build a partially populated calibration store ----

    let servo = ServoReadings {
        pan: Some(2900.0),
        pan_actual: Some(2901.0),
        tilt: Some(3300.0),
        tilt_actual: Some(3299.0),
        left_tilt: Some(1200.0),
        left_tilt_actual: Some(1201.0),
        right_tilt: Some(1200.0),
        right_tilt_actual: Some(1198.0),
    };

    let mut store = CalibrationStore::new();

    for speed in [80, 100, 120].iter() {
        for pos in Position::ALL.iter() {
            store.insert_straight(
                *speed,
                *pos,
                SingleRpmRecord {
                    rpm: Some(400.0),
                    servo,
                },
            );

            for level in [-3, -1, 2, 4].iter() {
                store.insert_swing(
                    *speed,
                    *level,
                    *pos,
                    SwingRecord {
                        l_rpm: Some(400.0 + 20.0 * *level as f64),
                        r_rpm: Some(400.0 - 20.0 * *level as f64),
                        servo,
                    },
                );
                store.insert_spin(
                    *speed,
                    *level,
                    *pos,
                    SingleRpmRecord {
                        rpm: Some(400.0),
                        servo,
                    },
                );
            }
        }
    }

    let params = DatasetParams {
        progress_every: 0,
        ..Default::default()
    };

    for variant in [FormulaVariant::Physical, FormulaVariant::Linear].iter() {
        let resolver = ParamResolver::new(
            &store,
            SynthEngine::new(SynthParams {
                variant: *variant,
                ..Default::default()
            }),
            FailsafeEnforcer::new(Limits::default()).with_output_decimals(params.decimals),
            Sentinels::default(),
        );

        c.bench_function(&format!("full pass, {:?}", variant), |b| {
            b.iter(|| Dataset::generate(&resolver, &params))
        });
    }
}

criterion_group!(benches, resolve_benchmark);
criterion_main!(benches);
