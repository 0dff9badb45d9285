//! Reconciliation benchmark: measure full render and re-render cost.
//!
//! Target: < 1ms to re-render a 1000-row table with one changed cell

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weft::{create_element, text, Document, Element, NodeId, Props, Reconciler};

/// A table of `rows` rows with two cells each; `changed` gets a different label.
fn table(rows: usize, changed: Option<usize>) -> Element {
    create_element(
        "table",
        Props::new().with("id", "bench"),
        (0..rows).map(|row| {
            let label = if changed == Some(row) {
                format!("row {row} (edited)")
            } else {
                format!("row {row}")
            };
            create_element(
                "tr",
                Props::new().with("class", if row % 2 == 0 { "even" } else { "odd" }),
                [
                    create_element("td", Props::new(), [text(label).into()]).into(),
                    create_element("td", Props::new(), [format!("{}", row * 7).into()]).into(),
                ],
            )
            .into()
        }),
    )
}

fn fresh() -> (Reconciler<Document>, NodeId) {
    let mut doc = Document::new();
    let container = doc.create_container("body");
    (Reconciler::new(doc), container)
}

fn initial_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("initial_render");
    for rows in [100, 1000] {
        let element = table(rows, None);
        group.bench_with_input(BenchmarkId::new("rows", rows), &element, |b, element| {
            b.iter(|| {
                let (mut reconciler, container) = fresh();
                reconciler
                    .render_sync(black_box(element.clone()), container)
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn rerender_identical(c: &mut Criterion) {
    let (mut reconciler, container) = fresh();
    reconciler.render_sync(table(1000, None), container).unwrap();
    let element = table(1000, None);

    c.bench_function("rerender_1000_identical", |b| {
        b.iter(|| {
            reconciler
                .render_sync(black_box(element.clone()), container)
                .unwrap()
        });
    });
}

fn rerender_single_change(c: &mut Criterion) {
    let (mut reconciler, container) = fresh();
    reconciler.render_sync(table(1000, None), container).unwrap();
    let edited = table(1000, Some(500));
    let original = table(1000, None);

    c.bench_function("rerender_1000_single_change", |b| {
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let element = if flip { &edited } else { &original };
            reconciler
                .render_sync(black_box(element.clone()), container)
                .unwrap()
        });
    });
}

fn diff_props_only(c: &mut Criterion) {
    let prev: Props = (0..32).map(|i| (format!("attr{i}"), i64::from(i))).collect();
    let next: Props = (0..32)
        .map(|i| (format!("attr{i}"), i64::from(if i == 16 { -1 } else { i })))
        .collect();

    c.bench_function("diff_props_32_one_change", |b| {
        b.iter(|| weft::diff_props(black_box(&prev), black_box(&next)));
    });
}

criterion_group!(
    benches,
    initial_render,
    rerender_identical,
    rerender_single_change,
    diff_props_only,
);
criterion_main!(benches);
