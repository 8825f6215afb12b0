//! Performance benchmarks for the benchmark harness
//!
//! The harness itself must stay cheap next to the workloads it measures:
//! parsing client output and reducing large sample sets should never show
//! up in a run's wall time.

use bench_harness::{
    cli::Cli,
    collector::parse_client_output,
    config::{CliSource, ConfigParser},
    models::{LatencySample, SampleSet},
    output::{OutputFormat, ReportEmitter},
    process::ClientOutput,
    stats::StatisticsReducer,
};
use clap::Parser;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// Latency-looking lines, as a client would print them
fn create_sample_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{}", 0.25 + (i % 997) as f64 * 0.013))
        .collect()
}

/// A sample set spread over `clients` clients
fn create_sample_set(clients: usize, per_client: usize) -> SampleSet {
    let mut set = SampleSet::new();
    for client in 0..clients {
        let samples = (0..per_client)
            .filter_map(|i| LatencySample::new(1.0 + ((client * per_client + i) % 101) as f64 * 0.01).ok());
        set.extend_from_client(samples);
    }
    set
}

fn benchmark_sample_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_parsing");

    group.bench_function("parse_line", |b| {
        b.iter(|| black_box(LatencySample::parse_line(black_box(" 12.3456\r"))))
    });

    for size in [100, 1_000, 10_000].iter() {
        let output = ClientOutput {
            pid: Some(1),
            exit_code: Some(0),
            success: true,
            lines: create_sample_lines(*size),
        };

        group.bench_with_input(BenchmarkId::new("client_output", size), size, |b, _| {
            b.iter(|| black_box(parse_client_output(0, black_box(&output))))
        });
    }

    group.finish();
}

fn benchmark_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduction");
    let reducer = StatisticsReducer::new();

    // 50 clients is the self-contained default
    for per_client in [10, 100, 1_000, 10_000].iter() {
        let set = create_sample_set(50, *per_client);

        group.bench_with_input(BenchmarkId::new("reduce_50_clients", per_client), per_client, |b, _| {
            b.iter(|| black_box(reducer.reduce(black_box(&set))))
        });
    }

    group.finish();
}

fn benchmark_report(c: &mut Criterion) {
    let set = create_sample_set(50, 100);
    let result = match StatisticsReducer::new().reduce(&set) {
        Ok(result) => result,
        Err(e) => panic!("benchmark sample set must reduce: {}", e),
    };

    let mut group = c.benchmark_group("report");
    for format in [OutputFormat::Text, OutputFormat::Json] {
        let emitter = ReportEmitter::new(format);
        group.bench_function(format!("{:?}", format), |b| {
            b.iter(|| black_box(emitter.render(black_box(&result))))
        });
    }
    group.finish();
}

fn benchmark_config_parsing(c: &mut Criterion) {
    c.bench_function("config_parsing", |b| {
        b.iter(|| {
            let cli = Cli::try_parse_from(["run-benchmark", "50", "localhost", "--no-color"]);
            if let Ok(cli) = cli {
                let parser = ConfigParser::new(CliSource::External(cli));
                black_box(parser.build_with_lookup(|_| None)).ok();
            }
        })
    });
}

criterion_group!(
    benches,
    benchmark_sample_parsing,
    benchmark_reduction,
    benchmark_report,
    benchmark_config_parsing
);

criterion_main!(benches);
