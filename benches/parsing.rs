use std::fs;
use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pie::syntax::Lexer;
use pie::{parse_with_config, FunctionTypeMode, ParserConfig};

const FIXTURES: [&str; 4] = ["applications", "atoms", "declarations", "lambdas"];

fn load_fixtures() -> Vec<(&'static str, String)> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    FIXTURES
        .iter()
        .map(|name| {
            let source = fs::read_to_string(dir.join(format!("{name}.pie"))).unwrap();
            (*name, source)
        })
        .collect()
}

/// A larger program made of every fixture repeated.
fn large_program(fixtures: &[(&str, String)], copies: usize) -> String {
    let one: String = fixtures.iter().map(|(_, source)| format!("{source}\n")).collect();
    one.repeat(copies)
}

fn bench_parsing(c: &mut Criterion) {
    let fixtures = load_fixtures();
    let default = ParserConfig::default();
    let production = ParserConfig::default().with_function_types(FunctionTypeMode::Production);

    let mut group = c.benchmark_group("parsing");
    for (name, source) in &fixtures {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            b.iter(|| parse_with_config(black_box(source), &default).unwrap());
        });
    }

    let large = large_program(&fixtures, 200);
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("large", |b| {
        b.iter(|| parse_with_config(black_box(&large), &default).unwrap());
    });
    group.bench_function("large-function-types", |b| {
        b.iter(|| parse_with_config(black_box(&large), &production).unwrap());
    });
    group.finish();
}

fn bench_lexing(c: &mut Criterion) {
    let large = large_program(&load_fixtures(), 200);
    let mut group = c.benchmark_group("lexing");
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("tokenize", |b| {
        b.iter(|| Lexer::new(black_box(&large)).tokenize().unwrap());
    });
    group.finish();
}

criterion_group!(parsing, bench_parsing, bench_lexing);
criterion_main!(parsing);
