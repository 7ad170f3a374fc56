//! Benchmarks for bulk quantization
//!
//! Compares the integer targets against the float8 lookup kernel and
//! measures per-axis quantization of 2D weights.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use qlinear_common::{TensorData, TensorDataType};
use qlinear_quantization::{
    QuantParams, dequantize_array, quantize_data, quantize_initializer_per_axis,
};

/// Helper function to create benchmark data centred on zero
fn create_benchmark_data(size: usize) -> Vec<f32> {
    (0..size).map(|i| (i as f32 - size as f32 / 2.0) / (size as f32 / 4.0)).collect()
}

fn bench_quantize_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize_data");

    for size in [1024, 16384, 262144] {
        let data = create_benchmark_data(size);
        group.throughput(Throughput::Elements(size as u64));

        for kind in [TensorDataType::Uint8, TensorDataType::Int8, TensorDataType::Int16] {
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &data, |b, data| {
                b.iter(|| black_box(quantize_data(black_box(data), kind, true, false).unwrap()))
            });
        }

        group.bench_with_input(BenchmarkId::new("FLOAT8E4M3FN", size), &data, |b, data| {
            b.iter(|| {
                black_box(
                    quantize_data(black_box(data), TensorDataType::Float8E4M3FN, true, false)
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

fn bench_dequantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("dequantize_array");

    for size in [1024, 262144] {
        let data = create_benchmark_data(size);
        group.throughput(Throughput::Elements(size as u64));

        for kind in [TensorDataType::Int8, TensorDataType::Float8E4M3FN] {
            let r = quantize_data(&data, kind, true, false).unwrap();
            let params = QuantParams::new(r.zero_point, r.scale);
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &r.quantized, |b, q| {
                b.iter(|| black_box(dequantize_array(black_box(q), params)))
            });
        }
    }

    group.finish();
}

fn bench_per_axis(c: &mut Criterion) {
    let mut group = c.benchmark_group("per_axis");

    for (rows, cols) in [(64, 256), (512, 512)] {
        let init = TensorData::from_f32("w", vec![rows, cols], create_benchmark_data(rows * cols));
        group.throughput(Throughput::Elements((rows * cols) as u64));
        group.bench_with_input(
            BenchmarkId::new("int8_axis0", format!("{rows}x{cols}")),
            &init,
            |b, init| {
                b.iter(|| {
                    black_box(
                        quantize_initializer_per_axis(init, 0, TensorDataType::Int8, true, false)
                            .unwrap(),
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_quantize_data, bench_dequantize, bench_per_axis);
criterion_main!(benches);
