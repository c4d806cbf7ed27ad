use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use redline::buffer::LineBuffer;
use redline::diff::diff_texts;
use redline::persist::MemoryPersister;
use redline::preview::InlineOverlay;
use redline::session::SessionController;

fn generate_pair(lines: usize, changes_per_100_lines: usize) -> (String, String) {
    let mut old = Vec::with_capacity(lines);
    let mut new = Vec::with_capacity(lines);
    let step = 100 / changes_per_100_lines;

    for i in 0..lines {
        let line = format!("let var_{} = {};", i, i);
        old.push(line.clone());
        if i % step == 0 {
            new.push(format!("let var_{} = {} + 1;", i, i));
        } else {
            new.push(line);
        }
    }
    // Trailing additions so every change kind shows up.
    for i in 0..lines / 100 {
        new.push(format!("log(var_{});", i));
    }

    (old.join("\n"), new.join("\n"))
}

fn benchmark_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_texts");

    for size in [100, 1000, 5000, 10000].iter() {
        let (old, new) = generate_pair(*size, 10);
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(old, new),
            |b, (old, new)| b.iter(|| diff_texts(black_box(old), black_box(new))),
        );
    }

    group.finish();
}

fn benchmark_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    for size in [100, 1000, 5000].iter() {
        let (old, new) = generate_pair(*size, 10);

        group.bench_with_input(
            BenchmarkId::new("preview", size),
            &(old.clone(), new.clone()),
            |b, (old, new)| {
                b.iter(|| {
                    let mut controller = SessionController::new(
                        LineBuffer::from_text(old),
                        InlineOverlay::default(),
                        MemoryPersister::new(),
                    );
                    controller.start_session(old, new, "bench.rs").unwrap();
                    black_box(controller.entries().len())
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("accept_all", size),
            &(old, new),
            |b, (old, new)| {
                b.iter(|| {
                    let mut controller = SessionController::new(
                        LineBuffer::from_text(old),
                        InlineOverlay::default(),
                        MemoryPersister::new(),
                    );
                    controller.start_session(old, new, "bench.rs").unwrap();
                    controller.accept_all().unwrap();
                    black_box(controller.text())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_diff, benchmark_session);
criterion_main!(benches);
