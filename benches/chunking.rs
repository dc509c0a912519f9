//! Benchmarks for the chunk builder.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use strata::builder::SemanticChunker;
use strata::element::{DocumentElement, TableData};

fn synthetic_document(sections: usize, rows: usize) -> Vec<DocumentElement> {
    let mut elements = Vec::with_capacity(sections * 3);
    for s in 0..sections {
        let idx = elements.len();
        elements.push(DocumentElement::title(idx, format!("Section {s}"), Some(1)));
        let idx = elements.len();
        elements.push(DocumentElement::narrative(
            idx,
            "Quarterly figures for the region are summarised below.",
        ));
        let table = TableData::new(
            vec!["Region".into(), "Revenue".into(), "Margin".into()],
            (0..rows)
                .map(|r| vec![format!("R{r}"), format!("${},000", r * 3), format!("{}%", r % 40)])
                .collect(),
        );
        let idx = elements.len();
        elements.push(DocumentElement::table(idx, table));
    }
    elements
}

fn bench_build(c: &mut Criterion) {
    let chunker = SemanticChunker::default();
    let doc = synthetic_document(50, 200);

    c.bench_function("build_50x200", |bench| {
        bench.iter(|| black_box(chunker.build(black_box(&doc))))
    });
}

fn bench_build_parallel(c: &mut Criterion) {
    let chunker = SemanticChunker::default();
    let doc = synthetic_document(50, 200);

    c.bench_function("build_parallel_50x200", |bench| {
        bench.iter(|| black_box(chunker.build_parallel(black_box(&doc))))
    });
}

criterion_group!(benches, bench_build, bench_build_parallel);
criterion_main!(benches);
