//! K-d tree over tile mean colors
//!
//! Records are never removed. Queries return the exact k nearest records under
//! squared Euclidean RGB distance, ties ordered by insertion index, so results
//! are fully deterministic for a given record order.

use crate::analysis::color::ColorVector;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A candidate tile: its mean color and the filename it was sampled from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRecord {
    /// Mean color of the resized tile
    pub color: ColorVector,
    /// Corpus filename (also the converted tile filename)
    pub filename: String,
}

impl TileRecord {
    /// Create a record
    pub fn new(color: ColorVector, filename: impl Into<String>) -> Self {
        Self {
            color,
            filename: filename.into(),
        }
    }
}

/// One query result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor<'a> {
    /// The matched record
    pub record: &'a TileRecord,
    /// Squared distance to the query color
    pub distance_squared: u32,
}

#[derive(Debug, Clone)]
struct KdNode {
    record: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Nearest-neighbour structure over tile colors
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    records: Vec<TileRecord>,
    nodes: Vec<KdNode>,
    root: Option<usize>,
}

// Max-heap entry; the heap top is the current worst of the k best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    distance_squared: u32,
    record: usize,
}

impl SpatialIndex {
    /// Build a balanced tree over the records
    ///
    /// Splits on the axis with the widest color spread at each level, pivoting
    /// on the median. Record order is preserved for tie-breaking.
    pub fn build(records: Vec<TileRecord>) -> Self {
        let mut order: Vec<usize> = (0..records.len()).collect();
        let mut index = Self {
            nodes: Vec::with_capacity(records.len()),
            records,
            root: None,
        };
        index.root = index.build_subtree(&mut order);
        index
    }

    fn build_subtree(&mut self, order: &mut [usize]) -> Option<usize> {
        if order.is_empty() {
            return None;
        }

        let axis = self.widest_axis(order);
        let median = order.len() / 2;
        let records = &self.records;
        order.select_nth_unstable_by(median, |&a, &b| {
            Self::axis_value(records, a, axis)
                .cmp(&Self::axis_value(records, b, axis))
                .then(a.cmp(&b))
        });

        let record = order.get(median).copied()?;
        let node_index = self.nodes.len();
        self.nodes.push(KdNode {
            record,
            axis,
            left: None,
            right: None,
        });

        let (lower, upper) = order.split_at_mut(median);
        let left = self.build_subtree(lower);
        let right = self.build_subtree(upper.get_mut(1..).unwrap_or(&mut []));

        if let Some(node) = self.nodes.get_mut(node_index) {
            node.left = left;
            node.right = right;
        }
        Some(node_index)
    }

    fn widest_axis(&self, order: &[usize]) -> usize {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for &i in order {
            if let Some(record) = self.records.get(i) {
                for (axis, value) in record.color.channels().into_iter().enumerate() {
                    if let (Some(lo), Some(hi)) = (min.get_mut(axis), max.get_mut(axis)) {
                        *lo = (*lo).min(value);
                        *hi = (*hi).max(value);
                    }
                }
            }
        }

        let spread = |axis: usize| {
            max.get(axis)
                .zip(min.get(axis))
                .map_or(0, |(hi, lo)| hi.saturating_sub(*lo))
        };
        (0..3).max_by_key(|&axis| (spread(axis), 2 - axis)).unwrap_or(0)
    }

    fn axis_value(records: &[TileRecord], record: usize, axis: usize) -> u8 {
        records
            .get(record)
            .and_then(|r| r.color.channels().get(axis).copied())
            .unwrap_or(0)
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn records(&self) -> &[TileRecord] {
        &self.records
    }

    /// The `k` records closest to `query`, nearest first
    ///
    /// Returns `min(k, len)` records ordered by ascending distance, equal
    /// distances by insertion order. No record is filtered out here.
    pub fn nearest_k(&self, query: ColorVector, k: usize) -> Vec<Neighbor<'_>> {
        let k = k.min(self.records.len());
        if k == 0 {
            return Vec::new();
        }

        let mut best = BinaryHeap::with_capacity(k + 1);
        self.search(self.root, query, k, &mut best);

        best.into_sorted_vec()
            .into_iter()
            .filter_map(|entry| {
                self.records.get(entry.record).map(|record| Neighbor {
                    record,
                    distance_squared: entry.distance_squared,
                })
            })
            .collect()
    }

    fn search(
        &self,
        node: Option<usize>,
        query: ColorVector,
        k: usize,
        best: &mut BinaryHeap<HeapEntry>,
    ) {
        let Some(node) = node.and_then(|n| self.nodes.get(n)) else {
            return;
        };
        let Some(record) = self.records.get(node.record) else {
            return;
        };

        let candidate = HeapEntry {
            distance_squared: record.color.distance_squared(&query),
            record: node.record,
        };
        if best.len() < k {
            best.push(candidate);
        } else if best.peek().is_some_and(|worst| candidate < *worst) {
            best.pop();
            best.push(candidate);
        }

        let split = Self::axis_value(&self.records, node.record, node.axis);
        let probe = query.channels().get(node.axis).copied().unwrap_or(0);
        let (near, far) = match probe.cmp(&split) {
            Ordering::Less => (node.left, node.right),
            _ => (node.right, node.left),
        };

        self.search(near, query, k, best);

        // Equal distances still matter because a lower insertion index wins
        let plane = u32::from(probe.abs_diff(split));
        let plane_squared = plane * plane;
        if best.len() < k || best.peek().is_some_and(|worst| plane_squared <= worst.distance_squared)
        {
            self.search(far, query, k, best);
        }
    }
}

impl FromIterator<TileRecord> for SpatialIndex {
    fn from_iter<I: IntoIterator<Item = TileRecord>>(iter: I) -> Self {
        Self::build(iter.into_iter().collect())
    }
}
