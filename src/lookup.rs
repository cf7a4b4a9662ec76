/*!
The lookup engine (C4): object field lookup, array indexing, and path expression evaluation.

Both object and array bodies are scanned from just after their opening bracket using
[`crate::scan::skip_value`] to jump over sibling values without looking inside them.
*/

use crate::node::{kind_at, Kind, Node};
use crate::scan;
use crate::unescape::unescape_trusted;

/// Visit each `(key_start, key_end, value_start, value_end)` entry of an object body
/// (the raw bytes between, but excluding, the enclosing `{`/`}`).
///
/// `f` returns `false` to stop early. Ranges are offsets into `buf`, and `key_start..key_end`
/// spans the key's raw bytes including its quotes.
pub(crate) fn scan_object_entries(
    buf: &[u8],
    body_start: usize,
    body_end: usize,
    mut f: impl FnMut(usize, usize, usize, usize) -> bool,
) {
    let mut pos = body_start;

    loop {
        pos = scan::skip_whitespace(buf, pos, body_end);
        if pos >= body_end || *get_unchecked!(buf, pos) != b'"' {
            break;
        }

        let key_start = pos;
        let key_end = scan::skip_value(buf, pos, body_end);

        pos = scan::skip_whitespace(buf, key_end, body_end);
        if pos >= body_end || *get_unchecked!(buf, pos) != b':' {
            break;
        }
        pos += 1;

        pos = scan::skip_whitespace(buf, pos, body_end);
        let value_start = pos;
        let value_end = scan::skip_value(buf, pos, body_end);

        if !f(key_start, key_end, value_start, value_end) {
            return;
        }

        pos = scan::skip_whitespace(buf, value_end, body_end);
        if pos < body_end && *get_unchecked!(buf, pos) == b',' {
            pos += 1;
        } else {
            break;
        }
    }
}

/// Visit each `(elem_start, elem_end)` entry of an array body.
pub(crate) fn scan_array_entries(
    buf: &[u8],
    body_start: usize,
    body_end: usize,
    mut f: impl FnMut(usize, usize) -> bool,
) {
    let mut pos = body_start;

    loop {
        pos = scan::skip_whitespace(buf, pos, body_end);
        if pos >= body_end {
            break;
        }

        let elem_start = pos;
        let elem_end = scan::skip_value(buf, pos, body_end);

        if elem_end == elem_start {
            break;
        }

        if !f(elem_start, elem_end) {
            return;
        }

        pos = scan::skip_whitespace(buf, elem_end, body_end);
        if pos < body_end && *get_unchecked!(buf, pos) == b',' {
            pos += 1;
        } else {
            break;
        }
    }
}

/// Byte-equality comparison between a raw (still-quoted-content) key and a target name.
///
/// For keys of length >= 8 a native int comparison of the first 8 bytes would normally be
/// used to accelerate the common case; here a direct slice comparison already compiles down
/// to the same word-at-a-time codegen so no manual unrolling is needed. Keys containing a
/// `\` are unescaped before comparing, since their raw bytes won't byte-match an unescaped
/// target.
fn key_matches(raw_key: &[u8], name: &str) -> bool {
    if raw_key.contains(&b'\\') {
        let s = from_utf8_unchecked!(raw_key);
        // SAFETY: `raw_key` was produced by `scan::skip_value` scanning a string, so it
        // can't end on an unescaped `\`.
        let unescaped = unsafe { unescape_trusted(s) };
        unescaped == name
    } else {
        raw_key.len() == name.len() && raw_key == name.as_bytes()
    }
}

/// Object field lookup (C4). Non-object nodes and missing keys produce an invalid node.
pub(crate) fn get<'a>(node: &Node<'a>, name: &str) -> Node<'a> {
    if node.kind != Kind::Object {
        return Node::invalid(node.buffer.clone());
    }

    let buf = node.buffer.as_slice();
    let body_start = node.start + 1;
    let body_end = node.end.saturating_sub(1).max(body_start);

    let mut found: Option<(usize, usize)> = None;

    scan_object_entries(buf, body_start, body_end, |key_start, key_end, value_start, value_end| {
        let raw_key = get_unchecked!(buf, key_start + 1..key_end.saturating_sub(1));
        if key_matches(raw_key, name) {
            found = Some((value_start, value_end));
            false
        } else {
            true
        }
    });

    match found {
        Some((start, end)) => {
            let kind = kind_at(buf, start, end).unwrap_or(Kind::Invalid);
            node.with_range(start, end, kind)
        }
        None => Node::invalid(node.buffer.clone()),
    }
}

/// Array index lookup (C4), preferring the array-offset cache (C5) when available.
pub(crate) fn index<'a>(node: &Node<'a>, i: usize) -> Node<'a> {
    if node.kind != Kind::Array {
        return Node::invalid(node.buffer.clone());
    }

    let offsets = crate::cache::array_offsets(node);
    let buf = node.buffer.as_slice();
    let body_end = node.end.saturating_sub(1);

    match offsets.get(i) {
        Some(&start) => {
            let end = scan::skip_value(buf, start, body_end);
            let kind = kind_at(buf, start, end).unwrap_or(Kind::Invalid);
            node.with_range(start, end, kind)
        }
        None => Node::invalid(node.buffer.clone()),
    }
}

/// Count the fields in an object's raw (brace-included) bytes.
pub(crate) fn object_field_count(raw: &[u8]) -> usize {
    if raw.len() < 2 {
        return 0;
    }

    let mut count = 0;
    scan_object_entries(raw, 1, raw.len() - 1, |_, _, _, _| {
        count += 1;
        true
    });
    count
}

/// Evaluate a dotted/indexed path expression against `node` (C4).
///
/// Grammar: `path := segment ( ('.' | '[' index ']') segment? )*`. An empty segment between
/// two dots (`a..b`) is tolerated as a no-op that re-enters the current object, matching the
/// behaviour documented in `DESIGN.md`.
pub(crate) fn get_path<'a>(node: &Node<'a>, path: &str) -> Node<'a> {
    let bytes = path.as_bytes();
    let mut i = 0;

    let (seg, next) = read_segment(bytes, i);
    i = next;

    let mut cursor = if seg.is_empty() {
        node.clone()
    } else {
        get(node, seg)
    };

    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                i += 1;
                let (seg, next) = read_segment(bytes, i);
                i = next;
                if !seg.is_empty() {
                    cursor = get(&cursor, seg);
                }
            }
            b'[' => {
                i += 1;
                let digits_start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }

                if i == digits_start || i >= bytes.len() || bytes[i] != b']' {
                    return Node::invalid(node.buffer.clone());
                }

                let idx: usize = match std::str::from_utf8(&bytes[digits_start..i])
                    .ok()
                    .and_then(|s| s.parse().ok())
                {
                    Some(idx) => idx,
                    None => return Node::invalid(node.buffer.clone()),
                };

                i += 1; // skip `]`
                cursor = index(&cursor, idx);

                // a segment may immediately follow `]` with no separator, per the grammar
                let (seg, next) = read_segment(bytes, i);
                i = next;
                if !seg.is_empty() {
                    cursor = get(&cursor, seg);
                }
            }
            _ => return Node::invalid(node.buffer.clone()),
        }
    }

    cursor
}

fn read_segment(bytes: &[u8], mut i: usize) -> (&str, usize) {
    let start = i;
    while i < bytes.len() && bytes[i] != b'.' && bytes[i] != b'[' {
        i += 1;
    }
    (std::str::from_utf8(&bytes[start..i]).unwrap_or(""), i)
}
