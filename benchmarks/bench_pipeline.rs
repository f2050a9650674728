use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use recipe_stats::decoder::RecordStream;
use recipe_stats::window::DeliveryWindow;
use recipe_stats::{process_stream, process_stream_sequential, CancellationToken, StatsConfig};

const RECORDS: usize = 50_000;

fn fixture(n: usize) -> Vec<u8> {
    const POSTCODES: [&str; 4] = ["10120", "10224", "10208", "10155"];
    const RECIPES: [&str; 5] = [
        "Mushroom Pie",
        "Creamy Dill Chicken",
        "Speedy Steak Fajitas",
        "Veggie Burger",
        "Hot Honey Barbecue Potato",
    ];
    const WINDOWS: [&str; 3] = [
        "Wednesday 9AM - 11AM",
        "Thursday 7AM - 5PM",
        "Saturday 10AM - 3PM",
    ];

    let items: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"postcode":"{}","recipe":"{}","delivery":"{}"}}"#,
                POSTCODES[i % POSTCODES.len()],
                RECIPES[(i * 3) % RECIPES.len()],
                WINDOWS[(i * 7) % WINDOWS.len()]
            )
        })
        .collect();
    format!("[{}]", items.join(",")).into_bytes()
}

fn bench_window_parse(c: &mut Criterion) {
    c.bench_function("window_parse", |b| {
        b.iter(|| black_box(DeliveryWindow::parse(black_box("Wednesday 9AM - 11AM"))));
    });
}

fn bench_decode(c: &mut Criterion) {
    let input = fixture(RECORDS);
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(RECORDS as u64));
    group.bench_function("record_stream", |b| {
        b.iter(|| {
            let stream = RecordStream::new(Cursor::new(input.as_slice()));
            black_box(stream.filter_map(Result::ok).count())
        });
    });
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let input = fixture(RECORDS);
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(RECORDS as u64));
    group.sample_size(20);

    group.bench_function("sequential", |b| {
        let config = StatsConfig::default();
        b.iter(|| {
            let outcome = process_stream_sequential(
                Cursor::new(input.clone()),
                &config,
                &CancellationToken::new(),
            );
            black_box(outcome.map(|o| o.rows_processed).unwrap_or(0))
        });
    });

    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("parallel", workers),
            &workers,
            |b, &workers| {
                let config = StatsConfig::default().with_workers(workers);
                b.iter(|| {
                    let outcome = process_stream(
                        Cursor::new(input.clone()),
                        &config,
                        &CancellationToken::new(),
                    );
                    black_box(outcome.map(|o| o.rows_processed).unwrap_or(0))
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    pipeline_benches,
    bench_window_parse,
    bench_decode,
    bench_pipeline
);
criterion_main!(pipeline_benches);
