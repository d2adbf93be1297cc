use bordero_core::{
    core::{recompute, LedgerEdit},
    ledger::{EventInfo, EventLedger, ProfitShare, RevenueLine},
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn ledger(rows: usize) -> EventLedger {
    let revenues = (0..rows)
        .map(|idx| {
            RevenueLine::new(format!("Canal {idx}"), Decimal::from(idx * 100), dec!(10)).unwrap()
        })
        .collect();
    EventLedger::new(
        EventInfo::new("Bench", "01/01/2024", "Teatro"),
        revenues,
        dec!(150),
        vec![
            ProfitShare::new("Bench", dec!(50), Decimal::ZERO),
            ProfitShare::new("Casa", dec!(50), Decimal::ZERO),
        ],
    )
    .unwrap()
}

fn bench_recompute(c: &mut Criterion) {
    let small = ledger(2);
    let large = ledger(500);
    let discount = LedgerEdit::RevenueDiscount {
        index: 1,
        amount: dec!(25.50),
    };
    let percentage = LedgerEdit::SharePercentage {
        index: 0,
        percentage: dec!(62.5),
    };

    c.bench_function("recompute_discount_2_rows", |b| {
        b.iter(|| recompute(black_box(&small), black_box(&discount)))
    });
    c.bench_function("recompute_discount_500_rows", |b| {
        b.iter(|| recompute(black_box(&large), black_box(&discount)))
    });
    c.bench_function("recompute_percentage", |b| {
        b.iter(|| recompute(black_box(&small), black_box(&percentage)))
    });
}

criterion_group!(benches, bench_recompute);
criterion_main!(benches);
