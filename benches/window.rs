//! Benchmarks for the window calculator and view.

use std::path::PathBuf;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sandbox::app::{ItemsView, Model, Screen};
use sandbox::collection::{ExampleSpec, materialize};
use sandbox::ui::view;
use sandbox::ui::window::compute_window;

fn bench_compute_window(c: &mut Criterion) {
    let items: Vec<usize> = (0..10_000).collect();

    c.bench_function("compute_window", |b| {
        b.iter(|| compute_window(black_box(&items), black_box(5_000), black_box(40)))
    });
}

fn bench_view(c: &mut Criterion) {
    let source = PathBuf::from("bench.sandbox.json");
    let specs = (0..200)
        .map(|i| {
            ExampleSpec::value(
                format!("example {i}"),
                format!("\u{1b}[32mline one\u{1b}[0m\n\u{1b}[1mline two {i}\u{1b}[0m"),
            )
        })
        .collect();
    let mut list = ItemsView::new(source.clone(), materialize(&source, specs));
    list.selected_index = 100;
    let mut model = Model::new("**/*.sandbox.json", (120, 60));
    model.collection_paths = vec![source];
    model.screen = Screen::Items(list);

    c.bench_function("view_items", |b| b.iter(|| view(black_box(&model))));
}

criterion_group!(benches, bench_compute_window, bench_view);
criterion_main!(benches);
