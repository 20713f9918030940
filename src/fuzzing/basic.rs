use std::collections::HashMap;

use super::*;
use itertools::Itertools;

/// Highest interface among all routes covering `addr`, where a later route replaces an earlier
/// one with the same prefix.
fn reference(routes: &[(TestPrefix, u32)], addr: u32) -> u32 {
    let table: HashMap<TestPrefix, u32> = routes.iter().copied().collect();
    table
        .into_iter()
        .filter(|(p, _)| p.covers(addr))
        .map(|(_, t)| t)
        .max()
        .unwrap_or(0)
}

qc!(lookup, _lookup);
fn _lookup((routes, addrs): (Vec<(TestPrefix, u32)>, Vec<u32>)) -> bool {
    let trie = build(&routes);
    queries(&routes, &addrs)
        .into_iter()
        .all(|a| trie.search(a).interface == reference(&routes, a))
}

qc!(lookup_compressed, _lookup_compressed);
fn _lookup_compressed((routes, addrs): (Vec<(TestPrefix, u32)>, Vec<u32>)) -> bool {
    let mut trie = build(&routes);
    trie.compress();
    queries(&routes, &addrs)
        .into_iter()
        .all(|a| trie.search(a).interface == reference(&routes, a))
}

qc!(compression_keeps_results, _compression_keeps_results);
fn _compression_keeps_results((routes, addrs): (Vec<(TestPrefix, u32)>, Vec<u32>)) -> bool {
    let mut trie = build(&routes);
    let queries = queries(&routes, &addrs);
    let before = queries.iter().map(|a| trie.search(*a)).collect_vec();
    let count_before = trie.node_count();
    let removed = trie.compress();
    let after = queries.iter().map(|a| trie.search(*a)).collect_vec();

    trie.node_count() + removed == count_before
        && before
            .iter()
            .zip(after.iter())
            .all(|(b, a)| b.interface == a.interface)
}

qc!(inserted_routes_found, _inserted_routes_found);
fn _inserted_routes_found(routes: Vec<(TestPrefix, u32)>) -> bool {
    let mut trie = build(&routes);
    trie.compress();
    let table: HashMap<TestPrefix, u32> = routes.iter().copied().collect();
    table
        .into_iter()
        .all(|(p, t)| trie.search(p.0).interface >= t)
}

qc!(accesses_bounded, _accesses_bounded);
fn _accesses_bounded((routes, addrs): (Vec<(TestPrefix, u32)>, Vec<u32>)) -> bool {
    let mut trie = build(&routes);
    let bounded = |trie: &RouteTrie<TestPrefix>| {
        queries(&routes, &addrs)
            .into_iter()
            .all(|a| trie.search(a).accesses <= 32)
    };
    let uncompressed = bounded(&trie);
    trie.compress();
    uncompressed && bounded(&trie)
}

qc!(order_independent, _order_independent);
fn _order_independent((routes, addrs): (Vec<(TestPrefix, u32)>, Vec<u32>)) -> bool {
    // keep only the last interface of every prefix, so that the order does not matter.
    let unique = routes
        .iter()
        .rev()
        .unique_by(|(p, _)| *p)
        .copied()
        .collect_vec();
    let mut forward = build(&unique);
    let mut backward = build(&unique.iter().rev().copied().collect_vec());
    forward.compress();
    backward.compress();
    queries(&unique, &addrs)
        .into_iter()
        .all(|a| forward.search(a).interface == backward.search(a).interface)
}

qc!(clear_releases_all, _clear_releases_all);
fn _clear_releases_all(routes: Vec<(TestPrefix, u32)>) -> bool {
    let mut trie = build(&routes);
    let count = trie.node_count();
    let ok_uncompressed = trie.clear() == count && trie.node_count() == 0;

    let mut trie = build(&routes);
    trie.compress();
    let count = trie.node_count();
    ok_uncompressed && trie.clear() == count && trie.is_empty()
}
