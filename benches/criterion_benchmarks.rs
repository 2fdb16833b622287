use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use seqdiff::align::{self, InsertDeleteAligner, SimilarityAligner, StringSimilarityAligner};
use seqdiff::compare::DefaultComparer;
use seqdiff::merge::{TakeLeftThenRight, merge_all};
use seqdiff::options::DiffOptions;
use seqdiff::sections::compute_sections;
use std::fs;
use std::path::Path;

/// Pseudo-random line ids; a large alphabet keeps hash buckets short.
fn gen_lines(size: usize, seed: u64) -> Vec<u32> {
    let mut s = seed;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        out.push(((s >> 33) % 1_000_003) as u32);
    }
    out
}

/// Replace every `stride`-th line and insert a fresh one after it.
fn mutate(base: &[u32], stride: usize, salt: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(base.len() + base.len() / stride.max(1) + 1);
    for (i, &line) in base.iter().enumerate() {
        if i % stride.max(1) == 0 {
            out.push(2_000_000 + salt + i as u32);
            out.push(3_000_000 + salt + i as u32);
        } else {
            out.push(line);
        }
    }
    out
}

fn count_sections(a: &[u32], b: &[u32], options: &DiffOptions) -> (usize, usize) {
    compute_sections(a, b, options, DefaultComparer)
        .unwrap()
        .fold((0, 0), |(total, matched), s| {
            (total + 1, matched + if s.is_match { s.length1 } else { 0 })
        })
}

fn write_match_snapshot() {
    let base = gen_lines(64 * 1024, 5);
    let mut csv = String::from("stride,sections,matched_lines,total_lines,matched_ratio\n");
    for stride in [16usize, 64, 256, 1024, 4096] {
        let changed = mutate(&base, stride, 0);
        let (sections, matched) = count_sections(&base, &changed, &DiffOptions::default());
        csv.push_str(&format!(
            "{stride},{sections},{matched},{},{}\n",
            base.len(),
            matched as f64 / base.len() as f64
        ));
    }
    let out_dir = Path::new("target/criterion/custom_reports");
    let _ = fs::create_dir_all(out_dir);
    let _ = fs::write(out_dir.join("match_snapshot.csv"), csv);
}

fn bench_sections_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("sections_lines_per_s");
    for size in [1024usize, 16 * 1024, 128 * 1024] {
        let base = gen_lines(size, 1);
        let changed = mutate(&base, 512, 0);
        g.throughput(Throughput::Elements(size as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let counts =
                    count_sections(black_box(&base), black_box(&changed), &DiffOptions::default());
                black_box(counts);
            });
        });
    }
    g.finish();
}

fn bench_patience(c: &mut Criterion) {
    write_match_snapshot();
    let mut g = c.benchmark_group("patience_vs_plain");
    let base = gen_lines(32 * 1024, 2);
    let changed = mutate(&base, 128, 0);
    for patience in [true, false] {
        let options = DiffOptions::default().with_patience(patience);
        g.bench_with_input(
            BenchmarkId::from_parameter(patience),
            &options,
            |b, options| {
                b.iter(|| black_box(count_sections(&base, &changed, options)));
            },
        );
    }
    g.finish();
}

fn bench_similarity_span(c: &mut Criterion) {
    let mut g = c.benchmark_group("similarity_span");
    let similarity = |a: &u32, b: &u32| 1.0 / (1.0 + a.abs_diff(*b) as f64);
    for len in [2usize, 5, 7] {
        let a = gen_lines(len, 3);
        let b = gen_lines(len + 1, 4);
        g.bench_with_input(BenchmarkId::from_parameter(len), &len, |bench, &len| {
            let aligner = SimilarityAligner::new(similarity);
            bench.iter(|| {
                let out = seqdiff::align::Aligner::align(&aligner, &a, 0, len, &b, 0, len + 1)
                    .unwrap();
                black_box(out.len());
            });
        });
    }
    g.finish();
}

fn bench_text_alignment(c: &mut Criterion) {
    let mut g = c.benchmark_group("text_alignment");
    let old: Vec<String> = (0..2000)
        .map(|i| format!("line {i}: the quick brown fox"))
        .collect();
    let new: Vec<String> = old
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i % 50 == 0 {
                line.replace("quick", "slow")
            } else {
                line.clone()
            }
        })
        .collect();
    g.throughput(Throughput::Elements(old.len() as u64));
    g.bench_function("string_similarity", |b| {
        b.iter(|| {
            let elements = align::diff(
                black_box(&old),
                black_box(&new),
                &DiffOptions::default(),
                DefaultComparer,
                StringSimilarityAligner::new(),
            )
            .unwrap();
            black_box(elements.len());
        });
    });
    g.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut g = c.benchmark_group("merge_lines_per_s");
    for size in [1024usize, 16 * 1024] {
        let base = gen_lines(size, 6);
        let left = mutate(&base, 97, 0);
        let right = mutate(&base, 89, 500_000);
        g.throughput(Throughput::Elements(size as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let merged = merge_all(
                    black_box(&base),
                    black_box(&left),
                    black_box(&right),
                    &DiffOptions::default(),
                    InsertDeleteAligner,
                    TakeLeftThenRight,
                    DefaultComparer,
                );
                black_box(merged.map(|m| m.len()).ok());
            });
        });
    }
    g.finish();
}

criterion_group!(
    benches,
    bench_sections_speed,
    bench_patience,
    bench_similarity_span,
    bench_text_alignment,
    bench_merge
);
criterion_main!(benches);
