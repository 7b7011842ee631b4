use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vocstream::ReorderWindow;

const PACKETS: u64 = 1_000;

fn in_order(c: &mut Criterion) {
    c.bench_function("reorder window: strictly in-order", |b| {
        b.iter(|| {
            let mut rw = ReorderWindow::new(32, 2_147_483_647, |payload: u64| {
                black_box(payload);
            });
            for seq in 0..PACKETS {
                rw.add(seq, seq);
            }
        });
    });
}

/// Every other pair of adjacent packets swapped -- cheap, bounded disorder
/// that never triggers a flush-and-reseat.
fn locally_reordered(c: &mut Criterion) {
    c.bench_function("reorder window: adjacent pairs swapped", |b| {
        b.iter(|| {
            let mut rw = ReorderWindow::new(32, 2_147_483_647, |payload: u64| {
                black_box(payload);
            });
            let mut seq = 0u64;
            while seq + 1 < PACKETS {
                rw.add(seq + 1, seq + 1);
                rw.add(seq, seq);
                seq += 2;
            }
        });
    });
}

criterion_group!(benches, in_order, locally_reordered);
criterion_main!(benches);
