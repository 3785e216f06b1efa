//! Performance benchmarks for the DSP module
//!
//! Run with: cargo bench -p trident_dsp

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use trident_dsp::{BandParameters, ChainCoefficients, Slope, StereoEngine};

fn steep_parameters() -> BandParameters {
    BandParameters {
        low_cut_freq: 80.0,
        low_cut_slope: Slope::Db48,
        peak_freq: 2500.0,
        peak_gain_db: 6.0,
        peak_q: 1.5,
        high_cut_freq: 12000.0,
        high_cut_slope: Slope::Db48,
    }
}

fn benchmark_block_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("stereo_engine");

    // Common buffer sizes in audio applications
    let buffer_sizes = [64, 128, 256, 512, 1024, 2048];
    let params = steep_parameters();

    for size in buffer_sizes {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("process_block_{}_frames", size), |b| {
            let mut engine = StereoEngine::new();
            engine.prepare(48000.0, size, &params).unwrap();
            let mut left: Vec<f32> = (0..size).map(|i| (i as f32 * 0.001).sin()).collect();
            let mut right: Vec<f32> = (0..size).map(|i| (i as f32 * 0.002).sin()).collect();

            b.iter(|| {
                engine.process_block(black_box(&params), black_box(&mut left), black_box(&mut right));
            });
        });

        group.bench_function(format!("process_interleaved_{}_frames", size), |b| {
            let mut engine = StereoEngine::new();
            engine.prepare(48000.0, size, &params).unwrap();
            let mut buffer: Vec<f32> = (0..size * 2).map(|i| (i as f32 * 0.001).sin()).collect();

            b.iter(|| {
                engine.process_interleaved(black_box(&params), black_box(&mut buffer));
            });
        });
    }

    group.finish();
}

fn benchmark_coefficient_refresh(c: &mut Criterion) {
    c.bench_function("chain_coefficients_from_parameters", |b| {
        let mut params = steep_parameters();
        let mut gain = 0.0_f32;

        b.iter(|| {
            // Simulate dragging the peak gain
            params.peak_gain_db = gain;
            black_box(ChainCoefficients::from_parameters(black_box(&params), 48000.0).unwrap());
            gain = (gain + 1.0) % 24.0;
        });
    });
}

criterion_group!(benches, benchmark_block_processing, benchmark_coefficient_refresh);

criterion_main!(benches);
