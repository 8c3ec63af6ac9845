use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use std::collections::VecDeque;
use std::ops::Range;

use ordered_bst::linked::Tree;

/// Keys of `0..len` ordered so that inserting them produces a perfectly
/// balanced tree: each range contributes its midpoint before either half.
/// The tree never rebalances itself, so inserting `0..len` in order would
/// degenerate into a linked list and benchmark the worst case instead of the
/// typical one.
fn balanced_insertion_order(len: i32) -> Vec<i32> {
    let mut order = Vec::with_capacity(len as usize);
    let mut ranges: VecDeque<Range<i32>> = VecDeque::new();
    ranges.push_back(0..len);
    while let Some(range) = ranges.pop_front() {
        if range.is_empty() {
            continue;
        }
        let mid = range.start + (range.end - range.start) / 2;
        order.push(mid);
        ranges.push_back(range.start..mid);
        ranges.push_back(mid + 1..range.end);
    }
    order
}

/// Helper to bench a function on the BST.
/// It creates a group for the given name and closure and runs tests for
/// various tree sizes before finishing the group.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut Tree<i32>, i32)) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11, 15] {
        let num_nodes = 2i32.pow(num_levels) - 1;
        let largest_element_in_tree = num_nodes - 1;

        let mut tree = Tree::new();
        for key in balanced_insertion_order(num_nodes) {
            tree.insert(key).expect("balanced order holds unique keys");
        }

        let id = BenchmarkId::new("linked", largest_element_in_tree);
        group.bench_function(id, |b| {
            b.iter_custom(|iters| {
                let mut time = std::time::Duration::ZERO;
                for _ in 0..iters {
                    let mut tree = black_box(tree.clone());
                    let instant = std::time::Instant::now();
                    f(&mut tree, black_box(largest_element_in_tree));
                    let elapsed = instant.elapsed();
                    time += elapsed;
                }
                time
            })
        });
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "find", |tree, i| {
        let _found = black_box(tree.contains(&i));
    });
    bench_helper(c, "delete", |tree, i| {
        let _removed = tree.remove(&i);
    });

    bench_helper(c, "insert", |tree, i| {
        let _inserted = tree.insert(i + 1);
    });

    bench_helper(c, "find-miss", |tree, i| {
        let _found = black_box(tree.contains(&(i + 1)));
    });
    bench_helper(c, "delete-miss", |tree, i| {
        let _removed = tree.remove(&(i + 1));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
