use std::collections::HashMap;
use std::hash::Hash;

/// Groups items by key. Groups come back in first-seen key order so callers
/// can stable-sort them without depending on hash iteration order.
pub fn group_by<I, K, F>(items: impl IntoIterator<Item = I>, mut key: F) -> Vec<(K, Vec<I>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&I) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<I>)> = Vec::new();
    for item in items {
        let value = key(&item);
        match positions.get(&value) {
            Some(&index) => groups[index].1.push(item),
            None => {
                positions.insert(value.clone(), groups.len());
                groups.push((value, vec![item]));
            }
        }
    }
    groups
}

/// Percentage rounded half-up; `empty` when there is nothing to divide by.
pub fn percentage(part: u64, whole: u64, empty: u32) -> u32 {
    if whole == 0 {
        return empty;
    }
    ((part as f64 * 100.0) / whole as f64).round() as u32
}

/// Mean rounded half-up, 0 for an empty set.
pub fn rounded_average(sum: u64, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u64
}
