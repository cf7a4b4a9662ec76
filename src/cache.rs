/*!
The array-offset cache (C5).

Scanning an array body to find its element boundaries is O(n) in the array's byte length.
Repeated indexing into the same array (e.g. `array_for_each` combined with `index`, or many
`get_path` calls walking the same array) would otherwise redo that scan every time. This module
memoizes the element start offsets for an array node, keyed by the identity of its buffer plus
its byte range, so two `Node`s that point at the same array share one cached computation
regardless of how many `Node` values were constructed to get there.

The cache tolerates concurrent double-computation: if two threads race to populate the same
key, both compute the offsets and `DashMap::entry` resolves to whichever insert wins; neither
thread blocks on the other's scan.
*/

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::lookup::scan_array_entries;
use crate::node::{Kind, Node};

type CacheKey = (usize, usize, usize);

static CACHE: Lazy<DashMap<CacheKey, Arc<Vec<usize>>>> = Lazy::new(DashMap::new);

fn key(node: &Node) -> CacheKey {
    (node.buffer.identity(), node.start, node.end)
}

/// The start offset of each element in an array node, computed once and cached.
pub(crate) fn array_offsets(node: &Node) -> Arc<Vec<usize>> {
    debug_assert_eq!(node.kind, Kind::Array);

    let k = key(node);
    if let Some(existing) = CACHE.get(&k) {
        return existing.clone();
    }

    let buf = node.buffer.as_slice();
    let body_start = node.start + 1;
    let body_end = node.end.saturating_sub(1).max(body_start);

    let mut offsets = Vec::new();
    scan_array_entries(buf, body_start, body_end, |elem_start, _elem_end| {
        offsets.push(elem_start);
        true
    });

    let offsets = Arc::new(offsets);
    CACHE.insert(k, offsets.clone());
    offsets
}

/// Array element count, via the same cached offsets `index` uses.
pub(crate) fn array_len(node: &Node) -> usize {
    array_offsets(node).len()
}
