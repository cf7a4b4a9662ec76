/*!
The iterator engine (C6): zero-allocation traversal over object fields, array elements, and
whole-document walks.

None of these build an intermediate collection of the document's values — each callback fires
as its entry is scanned, and returning `false` stops the scan immediately.
*/

use std::borrow::Cow;

use crate::cache;
use crate::lookup::scan_object_entries;
use crate::node::{kind_at, Kind, Node};
use crate::scan;
use crate::unescape::unescape_trusted;

/// Visit each `(key, value)` pair of an object node in source order.
pub(crate) fn for_each<'a>(node: &Node<'a>, mut f: impl FnMut(&str, Node<'a>) -> bool) {
    if node.kind != Kind::Object {
        return;
    }

    let buf = node.buffer.as_slice();
    let body_start = node.start + 1;
    let body_end = node.end.saturating_sub(1).max(body_start);

    scan_object_entries(buf, body_start, body_end, |key_start, key_end, value_start, value_end| {
        let raw_key = get_unchecked!(buf, key_start + 1..key_end.saturating_sub(1));
        let key_str = from_utf8_unchecked!(raw_key);

        let key: Cow<str> = if raw_key.contains(&b'\\') {
            // SAFETY: a raw key slice can't end on an unescaped `\`, see `scan::skip_string`.
            Cow::Owned(unsafe { unescape_trusted(key_str) })
        } else {
            Cow::Borrowed(key_str)
        };

        let kind = kind_at(buf, value_start, body_end).unwrap_or(Kind::Invalid);
        let child = node.with_range(value_start, value_end, kind);

        f(&key, child)
    });
}

/// Visit each `(index, value)` pair of an array node in source order, using the cached
/// element offsets (C5) rather than re-scanning from the start on every call.
pub(crate) fn array_for_each<'a>(node: &Node<'a>, mut f: impl FnMut(usize, Node<'a>) -> bool) {
    if node.kind != Kind::Array {
        return;
    }

    let offsets = cache::array_offsets(node);
    let buf = node.buffer.as_slice();
    let body_end = node.end.saturating_sub(1);

    for (i, &start) in offsets.iter().enumerate() {
        let end = scan::skip_value(buf, start, body_end);
        let kind = kind_at(buf, start, body_end).unwrap_or(Kind::Invalid);
        let child = node.with_range(start, end, kind);

        if !f(i, child) {
            break;
        }
    }
}

/// Depth-first, source-order walk over `root` and its descendants.
///
/// The callback receives the full dotted/indexed path to each node (empty for the root) and
/// the node itself. Returning `false` suppresses descent into that node's children; the walk
/// continues with the remaining siblings and ancestors.
pub(crate) fn walk<'a>(root: &Node<'a>, mut f: impl FnMut(&str, &Node<'a>) -> bool) {
    struct Frame<'a> {
        path: String,
        node: Node<'a>,
    }

    let mut stack: Vec<Frame<'a>> = vec![Frame {
        path: String::new(),
        node: root.clone(),
    }];

    while let Some(Frame { path, node }) = stack.pop() {
        if !f(&path, &node) {
            continue;
        }

        match node.kind {
            Kind::Object => {
                let mut children = Vec::new();
                for_each(&node, |k, child| {
                    let child_path = if path.is_empty() {
                        k.to_string()
                    } else {
                        format!("{}.{}", path, k)
                    };
                    children.push(Frame {
                        path: child_path,
                        node: child,
                    });
                    true
                });
                for frame in children.into_iter().rev() {
                    stack.push(frame);
                }
            }
            Kind::Array => {
                let mut children = Vec::new();
                array_for_each(&node, |i, child| {
                    children.push(Frame {
                        path: format!("{}[{}]", path, i),
                        node: child,
                    });
                    true
                });
                for frame in children.into_iter().rev() {
                    stack.push(frame);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Options;

    fn root(s: &'static str) -> crate::Node<'static> {
        crate::from_bytes(s.as_bytes(), Options::default())
    }

    #[test]
    fn for_each_visits_in_order() {
        let n = root(r#"{"a":1,"b":2,"c":3}"#);
        let mut keys = Vec::new();
        n.for_each(|k, v| {
            keys.push((k.to_string(), v.as_i64().unwrap()));
            true
        });
        assert_eq!(vec![("a".into(), 1), ("b".into(), 2), ("c".into(), 3)], keys);
    }

    #[test]
    fn for_each_stops_early() {
        let n = root(r#"{"a":1,"b":2,"c":3}"#);
        let mut seen = Vec::new();
        n.for_each(|k, _| {
            seen.push(k.to_string());
            k != "b"
        });
        assert_eq!(vec!["a", "b"], seen);
    }

    #[test]
    fn array_for_each_visits_in_order() {
        let n = root("[10,20,30]");
        let mut out = Vec::new();
        n.array_for_each(|i, v| {
            out.push((i, v.as_i64().unwrap()));
            true
        });
        assert_eq!(vec![(0, 10), (1, 20), (2, 30)], out);
    }

    #[test]
    fn walk_visits_depth_first_with_dotted_paths() {
        let n = root(r#"{"a":1,"b":{"c":2,"d":3}}"#);
        let mut visited = Vec::new();
        n.walk(|path, node| {
            if node.is_number() {
                visited.push((path.to_string(), node.as_i64().unwrap()));
            }
            true
        });
        assert_eq!(vec![("a".into(), 1), ("b.c".into(), 2), ("b.d".into(), 3)], visited);
    }

    #[test]
    fn walk_array_paths_use_brackets() {
        let n = root(r#"{"a":[1,2]}"#);
        let mut visited = Vec::new();
        n.walk(|path, node| {
            if node.is_number() {
                visited.push(path.to_string());
            }
            true
        });
        assert_eq!(vec!["a[0]", "a[1]"], visited);
    }

    #[test]
    fn walk_false_prunes_only_that_subtree() {
        let n = root(r#"{"a":{"x":1},"b":{"y":2}}"#);
        let mut visited = Vec::new();
        n.walk(|path, _| {
            visited.push(path.to_string());
            path != "a"
        });
        assert_eq!(vec!["", "a", "b", "b.y"], visited);
    }
}
