//! Benchmarks for stack construction, graph validation, and template
//! rendering.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stackforge::blueprints::{wordpress, WordPressParams};
use stackforge::graph::ResourceGraph;
use stackforge::synth::Synthesizer;

fn bench_build(c: &mut Criterion) {
    let params = WordPressParams::default();
    c.bench_function("build_wordpress_stack", |b| {
        b.iter(|| wordpress(black_box(&params)).unwrap());
    });
}

fn bench_validate(c: &mut Criterion) {
    let stack = wordpress(&WordPressParams::default()).unwrap();
    c.bench_function("validate_reference_graph", |b| {
        b.iter(|| ResourceGraph::from_stack(black_box(&stack)).validate().unwrap());
    });
}

fn bench_render(c: &mut Criterion) {
    let stack = wordpress(&WordPressParams::default()).unwrap();
    c.bench_function("render_template_json", |b| {
        b.iter(|| {
            Synthesizer::render(black_box(&stack))
                .unwrap()
                .to_json()
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_build, bench_validate, bench_render);
criterion_main!(benches);
