//! Benchmarks for gridflow-view using criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridflow_core::Record;
use gridflow_filter::RowFilter;
use gridflow_view::CacheDataSource;

type Row = (u32, i64);

struct Threshold {
    values: Vec<String>,
    min: i64,
}

impl RowFilter<Row> for Threshold {
    fn test(&self, record: &Record<Row>) -> bool {
        record.data().1 >= self.min
    }

    fn filter_values(&self) -> &[String] {
        &self.values
    }
}

fn threshold(min: i64) -> Box<Threshold> {
    Box::new(Threshold {
        values: vec![String::from("on")],
        min,
    })
}

fn sorted_source() -> CacheDataSource<u32, Row> {
    let mut src = CacheDataSource::new(|v: &Row| v.0);
    src.sort(|a: &Row, b: &Row| a.1.cmp(&b.1));
    src
}

fn populated(size: u32) -> CacheDataSource<u32, Row> {
    let mut src = sorted_source();
    for i in 0..size {
        src.set_data((i, i64::from((i * 31) % 1000)));
    }
    src
}

fn bulk_insert_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_insert");

    for size in [100u32, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(populated(size)));
        });
    }

    group.finish();
}

fn update_reposition_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_reposition");

    for size in [1000u32, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_batched(
                || populated(size),
                |mut src| {
                    // Move every tenth row to a new position.
                    for i in (0..size).step_by(10) {
                        src.update_data(&i, |v| v.1 = (v.1 + 499) % 1000);
                    }
                    black_box(src)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn windowed_read_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowed_read");

    let mut src = populated(10000);

    for window in [50usize, 500].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(window), window, |b, &window| {
            b.iter(|| {
                for offset in (0..5000).step_by(window) {
                    black_box(src.get_rows(offset, window));
                }
            });
        });
    }

    group.finish();
}

fn filter_reinforce_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_reinforce");

    for size in [1000u32, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_batched(
                || populated(size),
                |mut src| {
                    src.set_filter("col", "f-col", false, threshold(250));
                    src.set_filter("col", "f-col", true, threshold(500));
                    black_box(src)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn filter_rebuild_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_rebuild");

    for size in [1000u32, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_batched(
                || {
                    let mut src = populated(size);
                    src.set_filter("col", "f-col", false, threshold(500));
                    src
                },
                |mut src| {
                    // Broadening replacement forces a full rebuild.
                    src.set_filter("col", "f-col", false, threshold(250));
                    black_box(src)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bulk_insert_benchmark,
    update_reposition_benchmark,
    windowed_read_benchmark,
    filter_reinforce_benchmark,
    filter_rebuild_benchmark,
);

criterion_main!(benches);
