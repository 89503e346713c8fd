use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use millstock_core::ComponentId;
use millstock_ledger::{
    InventoryTransaction, MutationDelta, SnapshotPolicy, TransactionDraft, TransactionKind,
    running_balances,
};

/// Build a descending history of `len` alternating receipts/issues with
/// recorded `balance_after` on each row.
fn history(len: usize) -> (i64, Vec<InventoryTransaction>) {
    let component_id = ComponentId::new();
    let mut balance = 0i64;
    let mut asc = Vec::with_capacity(len);
    for i in 0..len {
        let quantity = if i % 2 == 0 { 25 } else { -17 };
        balance += quantity;
        let tx = TransactionDraft::new(
            component_id,
            TransactionKind::Adjustment,
            MutationDelta::Apply(quantity),
            SnapshotPolicy::CreateIfMissing,
        )
        .into_transaction(quantity, balance);
        asc.push(tx);
    }
    (balance, asc.into_iter().rev().collect())
}

fn bench_balance_reconstruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("balance_reconstruction");

    for len in [16usize, 256, 4096] {
        let (snapshot, desc) = history(len);
        group.throughput(Throughput::Elements(len as u64));

        // Derived-at-read: walk the window applying the recurrence.
        group.bench_with_input(BenchmarkId::new("derived", len), &desc, |b, desc| {
            b.iter(|| running_balances(black_box(snapshot), black_box(desc)))
        });

        // Denormalized: read balances straight off the rows.
        group.bench_with_input(BenchmarkId::new("denormalized", len), &desc, |b, desc| {
            b.iter(|| {
                desc.iter()
                    .map(|tx| black_box(tx.balance_after))
                    .collect::<Vec<_>>()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_balance_reconstruction);
criterion_main!(benches);
