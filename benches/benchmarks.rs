use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use larder::stores::WishlistStore;
use larder::Store;

#[derive(Clone)]
struct State {
    counter: usize,
    items: Arc<Vec<u64>>,
}

fn state() -> State {
    State {
        counter: 0,
        items: Arc::new((0..64).collect()),
    }
}

fn store_creation_benchmark(c: &mut Criterion) {
    c.bench_function("store_creation", |b| {
        b.iter(|| Store::new(black_box(state())));
    });
}

fn store_read_benchmark(c: &mut Criterion) {
    let store = Store::new(state());

    c.bench_function("store_read", |b| {
        b.iter(|| {
            black_box(store.read(|s| s.counter));
        });
    });
}

fn store_update_benchmark(c: &mut Criterion) {
    let store = Store::new(state());

    c.bench_function("store_update", |b| {
        let mut i = 0;
        b.iter(|| {
            store.update(|state| {
                state.counter = black_box(i);
            });
            i += 1;
        });
    });
}

fn store_subscribe_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_subscribe");

    for subscriber_count in [1, 10, 100].iter() {
        let store = Store::new(state());

        // Selectors on a field the update never touches.
        let _subs: Vec<_> = (0..*subscriber_count)
            .map(|_| store.subscribe(|s: &State| s.items.clone(), |_| {}))
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    store.update(|state| state.counter = black_box(i));
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

fn wishlist_toggle_benchmark(c: &mut Criterion) {
    let wishlist = WishlistStore::new();
    for id in 0..100 {
        wishlist.add_to_wishlist(id);
    }
    let _count = wishlist.store().select(|s| s.item_ids.len());

    c.bench_function("wishlist_toggle", |b| {
        b.iter(|| wishlist.toggle_wishlist(black_box(50)));
    });
}

criterion_group!(
    benches,
    store_creation_benchmark,
    store_read_benchmark,
    store_update_benchmark,
    store_subscribe_benchmark,
    wishlist_toggle_benchmark,
);
criterion_main!(benches);
