use std::collections::HashSet;
use std::hash::Hash;

/// Drops repeated items, keeping the first occurrence of each in order.
pub fn unique<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
