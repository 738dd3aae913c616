use std::hint::black_box;
use std::path::PathBuf;

use criterion::{Criterion, criterion_group, criterion_main};

use media_rename::rename::{FileRef, FilterCriteria, PhraseIndexer, filter_files, partial_ratio};

const TITLES: [&str; 8] = [
    "The Matrix Reloaded",
    "The Dark Knight Rises",
    "Blade Runner 2049",
    "Mad Max Fury Road",
    "the.matrix.revolutions.1080p",
    "Dark Knight Returns Part 1",
    "[HD] Inception (2010)",
    "Fury Road Black and Chrome",
];

fn sample_files(count: usize) -> Vec<FileRef> {
    (0..count)
        .filter_map(|index| {
            let title = TITLES[index % TITLES.len()];
            FileRef::new(PathBuf::from(format!("/videos/{title} {index}.mp4"))).ok()
        })
        .collect()
}

fn bench_partial_ratio(c: &mut Criterion) {
    c.bench_function("partial_ratio", |b| {
        b.iter(|| partial_ratio(black_box("matrx"), black_box("the matrix reloaded 1080p")));
    });
}

fn bench_filter_files(c: &mut Criterion) {
    let files = sample_files(1000);
    let exact = FilterCriteria::new("knight");
    let fuzzy = FilterCriteria::new("knigth").fuzzy(true);

    c.bench_function("filter_files_exact", |b| {
        b.iter(|| filter_files(black_box(&files), black_box(&exact)));
    });
    c.bench_function("filter_files_fuzzy", |b| {
        b.iter(|| filter_files(black_box(&files), black_box(&fuzzy)));
    });
}

fn bench_phrase_groups(c: &mut Criterion) {
    let files = sample_files(500);
    let indexer = PhraseIndexer::default();

    c.bench_function("phrase_score", |b| {
        b.iter(|| indexer.score_phrase(black_box(&["Dark", "Knight", "Rises"])));
    });
    c.bench_function("phrase_plan", |b| {
        b.iter(|| indexer.plan(black_box(&files)));
    });
}

criterion_group!(benches, bench_partial_ratio, bench_filter_files, bench_phrase_groups);
criterion_main!(benches);
