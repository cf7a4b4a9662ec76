/*!
The root factory (C8): turns a byte slice into a root [`Node`], after pre-validating it against
configurable limits and running the embedded-JSON expander (C7).
*/

use std::sync::Arc;

use crate::error::{self, Error};
use crate::expand;
use crate::lookup::{scan_array_entries, scan_object_entries};
use crate::node::{Buffer, Kind, Node};
use crate::scan;

/// Limits and behaviour for [`from_bytes`]. `0` means "unlimited" for every count-based limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Upper bound on bracket nesting depth. `0` means unlimited.
    pub max_depth: usize,
    /// Upper bound on a single string's byte length (its content, quotes excluded).
    pub max_string_len: usize,
    /// Upper bound on the number of keys in any one object level.
    pub max_object_keys: usize,
    /// Upper bound on the number of elements in any one array level.
    pub max_array_items: usize,
    /// Reject unbalanced brackets and trailing non-whitespace after the root value.
    pub strict_mode: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: 1000,
            max_string_len: 1024 * 1024,
            max_object_keys: 10_000,
            max_array_items: 100_000,
            strict_mode: false,
        }
    }
}

impl Options {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_string_len(mut self, max_string_len: usize) -> Self {
        self.max_string_len = max_string_len;
        self
    }

    pub fn with_max_object_keys(mut self, max_object_keys: usize) -> Self {
        self.max_object_keys = max_object_keys;
        self
    }

    pub fn with_max_array_items(mut self, max_array_items: usize) -> Self {
        self.max_array_items = max_array_items;
        self
    }

    pub fn with_strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }
}

/// Build a root [`Node`] over `input`.
///
/// Pre-validates nesting depth, string length, and key/item counts; on violation (or on empty/
/// unrecognised input) the returned node is [`Kind::Invalid`] rather than an error, matching
/// the rest of the navigation API. Successful construction runs the embedded-JSON expander and
/// binds the root to whichever buffer it returns.
pub fn from_bytes<'a>(input: &'a [u8], options: Options) -> Node<'a> {
    if validate(input, &options).is_err() {
        return Node::invalid(Buffer::Borrowed(input));
    }

    let end = input.len();
    let start = scan::skip_whitespace(input, 0, end);
    let value_end = scan::skip_value(input, start, end);
    let kind = scan::detect_kind(*get_unchecked!(input, start)).unwrap_or(Kind::Invalid);

    match expand::expand(get_unchecked!(input, start..value_end)) {
        Some(expanded) => {
            // the expander may rewrite a top-level JSON-encoded string into the document it
            // encodes, so the root's kind has to be read from the expanded bytes, not the
            // original string literal's.
            let kind = scan::detect_kind(*expanded.first().unwrap_or(&0)).unwrap_or(Kind::Invalid);
            let buf: Arc<[u8]> = Arc::from(expanded.into_boxed_slice());
            let expanded_end = buf.len();
            Node::new(Buffer::Owned(buf), 0, expanded_end, kind)
        }
        None => Node::new(Buffer::Borrowed(input), start, value_end, kind),
    }
}

fn brackets_balanced(input: &[u8], start: usize, end: usize) -> bool {
    let mut i = start;
    let mut depth: i64 = 0;

    while i < end {
        match *get_unchecked!(input, i) {
            b'"' => {
                i = scan::skip_value(input, i, end);
                continue;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
        i += 1;
    }

    depth == 0
}

/// Pre-validate `input` against `opts`'s limits, returning the specific reason construction
/// would be rejected. [`from_bytes`] only cares whether this succeeds; [`crate::decode_struct`]
/// surfaces the reason instead of letting a rejected root masquerade as a generic type mismatch
/// once it's handed to the decoder.
pub(crate) fn validate(input: &[u8], opts: &Options) -> Result<(), Error> {
    let end = input.len();
    let root_start = scan::skip_whitespace(input, 0, end);

    if root_start >= end || scan::detect_kind(*get_unchecked!(input, root_start)).is_none() {
        return Err(error::malformed("no recognisable value at the start of the input"));
    }

    let root_end = scan::skip_value(input, root_start, end);
    if root_end == root_start {
        return Err(error::malformed("value ended before it began"));
    }

    if opts.strict_mode {
        if !brackets_balanced(input, root_start, root_end) {
            return Err(error::malformed("unbalanced brackets"));
        }
        if scan::skip_whitespace(input, root_end, end) != end {
            return Err(error::malformed("trailing data after the root value"));
        }
    }

    let mut stack = vec![(root_start, root_end, 1usize)];

    while let Some((s, e, depth)) = stack.pop() {
        if opts.max_depth != 0 && depth > opts.max_depth {
            return Err(error::limit_exceeded("max_depth exceeded"));
        }

        match scan::detect_kind(*get_unchecked!(input, s)) {
            Some(Kind::Object) => {
                let body_start = s + 1;
                let body_end = e.saturating_sub(1).max(body_start);
                let mut count = 0usize;
                let mut limit_err = None;

                scan_object_entries(input, body_start, body_end, |_, _, vs, ve| {
                    count += 1;
                    if opts.max_object_keys != 0 && count > opts.max_object_keys {
                        limit_err = Some(error::limit_exceeded("max_object_keys exceeded"));
                        return false;
                    }
                    stack.push((vs, ve, depth + 1));
                    true
                });

                if let Some(e) = limit_err {
                    return Err(e);
                }
            }
            Some(Kind::Array) => {
                let body_start = s + 1;
                let body_end = e.saturating_sub(1).max(body_start);
                let mut count = 0usize;
                let mut limit_err = None;

                scan_array_entries(input, body_start, body_end, |es, ee| {
                    count += 1;
                    if opts.max_array_items != 0 && count > opts.max_array_items {
                        limit_err = Some(error::limit_exceeded("max_array_items exceeded"));
                        return false;
                    }
                    stack.push((es, ee, depth + 1));
                    true
                });

                if let Some(e) = limit_err {
                    return Err(e);
                }
            }
            Some(Kind::String) => {
                let inner_len = (e - s).saturating_sub(2);
                if opts.max_string_len != 0 && inner_len > opts.max_string_len {
                    return Err(error::limit_exceeded("max_string_len exceeded"));
                }
            }
            _ => {}
        }
    }

    Ok(())
}
