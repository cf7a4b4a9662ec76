/*!
The embedded-JSON expander (C7).

Many payloads encode structured data as JSON *strings*. This pass recognises a string whose
unescaped content is itself a single, complete, well-formed JSON value and splices that value
in as a real sub-document, so that `get_path` can reach into what was originally a quoted blob.

Rewriting walks the document with an explicit work stack rather than function-call recursion,
so object/array nesting depth never grows the Rust call stack. A string that itself decodes to
another JSON-encoded string is expanded again by a single bounded recursive call per encoding
layer — in practice that chain is shallow (one or two levels), unlike object/array nesting,
which can be attacker-controlled and deep.
*/

use std::borrow::Cow;

use crate::lookup::{scan_array_entries, scan_object_entries};
use crate::scan::{self, detect_kind};
use crate::unescape::unescape_trusted;
use crate::value::string_inner;
use crate::Kind;

enum Op {
    Byte(u8),
    Raw(usize, usize),
    Process(usize, usize),
}

/// Rewrite `input` with every nested-JSON-in-string value spliced in. Returns `None` if no
/// string in the document needed expanding, so the caller can keep the original buffer.
pub(crate) fn expand(input: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let changed = rewrite(input, 0, input.len(), &mut out);
    if changed {
        Some(out)
    } else {
        None
    }
}

fn rewrite(buf: &[u8], root_start: usize, root_end: usize, out: &mut Vec<u8>) -> bool {
    let mut changed = false;
    let mut stack = vec![Op::Process(root_start, root_end)];

    while let Some(op) = stack.pop() {
        match op {
            Op::Byte(b) => out.push(b),
            Op::Raw(s, e) => out.extend_from_slice(get_unchecked!(buf, s..e)),
            Op::Process(start, end) => {
                if start >= end {
                    continue;
                }

                match detect_kind(*get_unchecked!(buf, start)) {
                    Some(Kind::Object) => {
                        out.push(b'{');
                        let mut ops = Vec::new();
                        let mut first = true;

                        scan_object_entries(buf, start + 1, end - 1, |ks, ke, vs, ve| {
                            if !first {
                                ops.push(Op::Byte(b','));
                            }
                            first = false;
                            ops.push(Op::Raw(ks, ke));
                            ops.push(Op::Byte(b':'));
                            ops.push(Op::Process(vs, ve));
                            true
                        });

                        ops.push(Op::Byte(b'}'));
                        stack.extend(ops.into_iter().rev());
                    }
                    Some(Kind::Array) => {
                        out.push(b'[');
                        let mut ops = Vec::new();
                        let mut first = true;

                        scan_array_entries(buf, start + 1, end - 1, |es, ee| {
                            if !first {
                                ops.push(Op::Byte(b','));
                            }
                            first = false;
                            ops.push(Op::Process(es, ee));
                            true
                        });

                        ops.push(Op::Byte(b']'));
                        stack.extend(ops.into_iter().rev());
                    }
                    Some(Kind::String) => {
                        let raw = get_unchecked!(buf, start..end);
                        match try_expand_string(raw) {
                            Some(expanded) => {
                                changed = true;
                                out.extend_from_slice(&expanded);
                            }
                            None => out.extend_from_slice(raw),
                        }
                    }
                    _ => out.extend_from_slice(get_unchecked!(buf, start..end)),
                }
            }
        }
    }

    changed
}

/// If `raw` (a quoted string, including its quotes) unescapes to a single complete JSON value
/// with no trailing garbage, return its fully rewritten bytes.
fn try_expand_string(raw: &[u8]) -> Option<Vec<u8>> {
    let inner = string_inner(raw);
    let text = from_utf8_unchecked!(inner);

    let unescaped: Cow<str> = if inner.contains(&b'\\') {
        // SAFETY: `inner` is a scanned string body, can't end on an unescaped `\`.
        Cow::Owned(unsafe { unescape_trusted(text) })
    } else {
        Cow::Borrowed(text)
    };

    let bytes = unescaped.as_bytes();
    let value_start = scan::skip_whitespace(bytes, 0, bytes.len());

    if value_start >= bytes.len() {
        return None;
    }

    match bytes[value_start] {
        b'{' | b'[' | b'"' => {}
        _ => return None,
    }

    let value_end = scan::skip_value(bytes, value_start, bytes.len());
    if value_end == value_start {
        return None;
    }

    let trailing = scan::skip_whitespace(bytes, value_end, bytes.len());
    if trailing != bytes.len() {
        return None;
    }

    let mut out = Vec::with_capacity(value_end - value_start);
    rewrite(bytes, value_start, value_end, &mut out);
    Some(out)
}
