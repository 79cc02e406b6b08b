use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drive_score::{GearPosition, NullSink, ScoringConfig, ScoringEngine, Snapshot};

fn snapshot(i: usize) -> Snapshot {
    let t = i as f64 / 10.0;
    Snapshot {
        wheel_speed_kmh: 50.0 + 5.0 * (t * 0.3).sin(),
        engine_rpm: 1800.0 + 200.0 * (t * 0.5).sin(),
        accel_pedal_pct: 25.0 + 10.0 * (t * 0.7).sin(),
        driver_torque_request: 90.0,
        steering_angle_deg: 15.0 * (t * 1.1).sin(),
        lateral_accel_mps2: 1.0 * (t * 1.1).sin(),
        gear: GearPosition::Drive,
        ..Snapshot::at(t)
    }
}

fn bench_ingest(c: &mut Criterion) {
    // Full windows: 60 s of eco history at 10 Hz
    let mut engine = ScoringEngine::with_sink(ScoringConfig::default(), Box::new(NullSink));
    let mut i = 0;
    while i < 600 {
        engine.ingest(&snapshot(i));
        i += 1;
    }

    c.bench_function("ingest_10hz_full_window", |b| {
        b.iter(|| {
            engine.ingest(black_box(&snapshot(i)));
            i += 1;
        })
    });
}

criterion_group!(benches, bench_ingest);
criterion_main!(benches);
