// Burkhard-Keller tree: a metric-space index for range queries.
//
// Generic over the payload and the distance function. The function must be
// a true metric (non-negative, symmetric, triangle inequality) and must be
// deterministic; both are preconditions, not checked errors. Given those,
// every payload in the subtree hanging off a child edge labeled `d` is at
// distance exactly `d` from that node's payload, which is what lets a
// query skip subtrees that provably cannot contain a match.
//
// Nodes live in an arena (`Vec<Node>`) and reference children by index,
// so the self-referential tree needs no boxed recursion and its shape is
// trivial to inspect in tests. Node 0 is the root. The tree is
// append-only; deletion is not supported by this design.

use crate::error::BuildError;
use std::collections::BTreeMap;

#[derive(Debug)]
struct Node<T> {
    payload: T,
    /// Edge distance -> child arena index. `BTreeMap` so a query can take
    /// the `[d - radius, d + radius]` slice directly.
    children: BTreeMap<u32, usize>,
}

/// A BK-tree over payloads of type `T` under the metric `dist`.
#[derive(Debug)]
pub struct BkTree<T, D>
where
    D: Fn(&T, &T) -> u32,
{
    nodes: Vec<Node<T>>,
    dist: D,
}

impl<T, D> BkTree<T, D>
where
    D: Fn(&T, &T) -> u32,
{
    /// Bulk-build from a payload sequence. The first payload becomes the
    /// root; the rest are inserted in order, so construction is
    /// deterministic for a fixed order and metric. An empty sequence is an
    /// error: the tree has no root to hang anything on.
    pub fn new<I>(dist: D, payloads: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut iter = payloads.into_iter();
        let root = iter.next().ok_or(BuildError::EmptyIndex)?;
        let mut tree = BkTree {
            nodes: vec![Node {
                payload: root,
                children: BTreeMap::new(),
            }],
            dist,
        };
        for payload in iter {
            tree.add(payload);
        }
        Ok(tree)
    }

    /// Number of payloads in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a constructed tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert one payload: descend from the root, following the child
    /// edge matching the computed distance, until no such edge exists,
    /// then attach a new leaf there.
    pub fn add(&mut self, payload: T) {
        let mut current = 0usize;
        loop {
            let d = (self.dist)(&payload, &self.nodes[current].payload);
            match self.nodes[current].children.get(&d) {
                Some(&child) => current = child,
                None => {
                    let leaf = self.nodes.len();
                    self.nodes.push(Node {
                        payload,
                        children: BTreeMap::new(),
                    });
                    self.nodes[current].children.insert(d, leaf);
                    return;
                }
            }
        }
    }

    /// All payloads within `radius` of `probe`, as `(distance, payload)`
    /// pairs sorted ascending by distance (ties in arbitrary order).
    ///
    /// At each visited node the triangle inequality confines possible
    /// matches to child edges labeled within `[d - radius, d + radius]`;
    /// everything outside that band is pruned.
    pub fn query(&self, probe: &T, radius: u32) -> Vec<(u32, &T)> {
        let mut results = Vec::new();
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            let d = (self.dist)(probe, &node.payload);
            if d <= radius {
                results.push((d, &node.payload));
            }
            let low = d.saturating_sub(radius);
            let high = d.saturating_add(radius);
            for (_, &child) in node.children.range(low..=high) {
                stack.push(child);
            }
        }
        results.sort_by_key(|&(d, _)| d);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Absolute difference on integers: the simplest metric there is.
    fn abs_diff(a: &i64, b: &i64) -> u32 {
        a.abs_diff(*b) as u32
    }

    #[test]
    fn test_empty_sequence_is_an_error() {
        let result = BkTree::new(abs_diff, std::iter::empty::<i64>());
        assert!(matches!(result, Err(BuildError::EmptyIndex)));
    }

    #[test]
    fn test_radius_zero_returns_exact_matches_only() {
        let tree = BkTree::new(abs_diff, vec![5i64, 10, 15, 10]).unwrap();
        let hits = tree.query(&10, 0);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|&(d, &p)| d == 0 && p == 10));
        assert!(tree.query(&11, 0).is_empty());
    }

    #[test]
    fn test_results_sorted_by_distance() {
        let tree = BkTree::new(abs_diff, vec![1i64, 9, 4, 7, 2]).unwrap();
        let hits = tree.query(&3, 4);
        let distances: Vec<u32> = hits.iter().map(|&(d, _)| d).collect();
        let mut sorted = distances.clone();
        sorted.sort_unstable();
        assert_eq!(distances, sorted);
    }

    #[test]
    fn test_query_matches_linear_scan_and_is_monotonic() {
        let values: Vec<i64> = (0..100).map(|i| (i * 37 + 11) % 250).collect();
        let tree = BkTree::new(abs_diff, values.clone()).unwrap();
        let mut previous: Vec<i64> = Vec::new();
        for radius in 0..10 {
            let mut hits: Vec<i64> = tree.query(&120, radius).iter().map(|&(_, &p)| p).collect();
            hits.sort_unstable();
            let mut expected: Vec<i64> = values
                .iter()
                .copied()
                .filter(|v| abs_diff(v, &120) <= radius)
                .collect();
            expected.sort_unstable();
            assert_eq!(hits, expected, "radius {radius}");
            // Monotonicity: every hit at radius r is a hit at radius r+1.
            assert!(previous.iter().all(|v| hits.contains(v)));
            previous = hits;
        }
    }

    #[test]
    fn test_append_after_bulk_build() {
        let mut tree = BkTree::new(abs_diff, vec![50i64]).unwrap();
        tree.add(52);
        tree.add(48);
        assert_eq!(tree.len(), 3);
        let hits = tree.query(&50, 2);
        assert_eq!(hits.len(), 3);
        assert_eq!(*hits[0].1, 50);
    }
}
