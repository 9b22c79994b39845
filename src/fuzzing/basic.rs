use std::collections::HashMap;

use super::*;
use itertools::Itertools;

/// Longest matching prefix of `addr` in `model`, found by brute force.
fn model_lookup(model: &HashMap<TestPrefix, i32>, addr: u32) -> Option<(TestPrefix, i32)> {
    model
        .iter()
        .filter(|(p, _)| p.contains(addr))
        .max_by_key(|(p, _)| p.1)
        .map(|(p, t)| (*p, *t))
}

fn table_lookup(table: &LpmTable<i32>, addr: u32) -> Option<(TestPrefix, i32)> {
    table
        .lookup(&TestAddr(addr))
        .map(|e| (to_test_prefix(e.prefix()), *e.value()))
}

fn entries(table: &LpmTable<i32>) -> Vec<(TestPrefix, i32)> {
    table
        .iter()
        .map(|e| (to_test_prefix(e.prefix()), *e.value()))
        .sorted()
        .collect()
}

qc!(lookup_is_longest_match, _lookup_is_longest_match);
fn _lookup_is_longest_match((list, addrs): (Vec<(TestPrefix, i32)>, Vec<TestAddr>)) -> bool {
    let mut table = LpmTable::ipv4();
    let mut model = HashMap::new();

    for (p, t) in list {
        let _ = table.insert(p, t);
        model.insert(p, t);
    }

    // every inserted prefix must at least match its own network address
    let own = model.keys().map(|p| p.0).collect::<Vec<_>>();
    addrs
        .iter()
        .map(|a| a.0)
        .chain(own)
        .all(|a| table_lookup(&table, a) == model_lookup(&model, a))
}

qc!(modifications, _modifications);
fn _modifications(
    (list, addrs): (Vec<Operation<TestPrefix, i32>>, Vec<TestAddr>),
) -> bool {
    let mut table = LpmTable::ipv4();
    let mut model = HashMap::new();

    for op in list {
        match op {
            Operation::Add(p, t) => {
                if table.insert(p, t) != Ok(model.insert(p, t)) {
                    return false;
                }
            }
            Operation::Remove(p) => {
                if table.remove(&p) != Ok(model.remove(&p)) {
                    return false;
                }
            }
        }
    }

    table.len() == model.len()
        && entries(&table) == model.clone().into_iter().sorted().collect::<Vec<_>>()
        && addrs
            .iter()
            .all(|a| table_lookup(&table, a.0) == model_lookup(&model, a.0))
}

qc!(insert_remove_inverse, _insert_remove_inverse);
fn _insert_remove_inverse((mut table, p, t): (LpmTable<i32>, TestPrefix, i32)) -> bool {
    let _ = table.remove(&p);
    let before = table.clone();
    let nodes = table.node_count();

    table.insert(p, t) == Ok(None)
        && table.remove(&p) == Ok(Some(t))
        && table == before
        && table.node_count() == nodes
}

qc!(overlay, _overlay);
fn _overlay((mut table, p, a, b): (LpmTable<i32>, TestPrefix, i32, i32)) -> bool {
    let _ = table.remove(&p);
    let len = table.len();

    table.insert(p, a) == Ok(None)
        && table.insert(p, b) == Ok(Some(a))
        && table.len() == len + 1
        && table.get(&p) == Some(&b)
        && table
            .iter()
            .filter(|e| to_test_prefix(e.prefix()) == p)
            .count()
            == 1
}

qc!(remove_all_prunes, _remove_all_prunes);
fn _remove_all_prunes((table, rotate): (LpmTable<i32>, usize)) -> bool {
    let mut prefixes = table
        .iter()
        .map(|e| to_test_prefix(e.prefix()))
        .collect::<Vec<_>>();
    if !prefixes.is_empty() {
        let mid = rotate % prefixes.len();
        prefixes.rotate_left(mid);
    }

    let mut table = table;
    for p in prefixes {
        if table.remove(&p).ok().flatten().is_none() {
            return false;
        }
    }

    table.is_empty()
        && table.node_count() == 1
        && table.iter().next().is_none()
        && table.group_by_len().is_empty()
}

qc!(family_isolation, _family_isolation);
fn _family_isolation((table, addr, len): (LpmTable<i32>, u128, u8)) -> bool {
    let addr = addr.to_be_bytes();
    let len = len % 129;
    let mut modified = table.clone();

    modified.insert_octets(&addr, len, 0).is_err()
        && modified.remove_octets(&addr, len).is_err()
        && modified.lookup_octets(&addr).is_none()
        && modified == table
        && modified.node_count() == table.node_count()
}

qc!(grouped_by_length, _grouped_by_length);
fn _grouped_by_length(table: LpmTable<i32>) -> bool {
    let groups = table.group_by_len();
    groups.values().map(Vec::len).sum::<usize>() == table.len()
        && groups.iter().all(|(len, list)| {
            !list.is_empty()
                && list.iter().all(|e| e.prefix().prefix_len() == *len)
                && list
                    .iter()
                    .tuple_windows()
                    .all(|(a, b)| a.prefix().addr() < b.prefix().addr())
        })
}
