#![warn(clippy::all, clippy::pedantic)]

use clac::{Engine, tokenize};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_tokenizer(c: &mut Criterion) {
    let line = "git commit -m 'fix the thing' --amend && git push origin main --force";

    c.bench_function("tokenize", |b| {
        b.iter(|| tokenize(black_box(line)));
    });
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    // Fresh resolution each iteration; the cache is cleared so the full
    // grammar walk is measured.
    group.bench_function("partial_subcommand", |b| {
        let mut engine = Engine::with_builtins();
        b.iter(|| {
            engine.clear_cache();
            engine.load_suggestions(black_box("git sta"))
        });
    });

    group.bench_function("nested_subcommand_walk", |b| {
        let mut engine = Engine::with_builtins();
        b.iter(|| {
            engine.clear_cache();
            engine.load_suggestions(black_box("git stash p"))
        });
    });

    group.bench_function("cached_repeat", |b| {
        let mut engine = Engine::with_builtins();
        engine.load_suggestions("git sta");
        b.iter(|| engine.load_suggestions(black_box("git sta")));
    });

    group.finish();
}

criterion_group!(benches, bench_tokenizer, bench_resolution);
criterion_main!(benches);
