/*!
The node handle (C3).

A [`Node`] is an immutable triple of `(buffer, start, end, kind)`. It never owns a copy of the
value it points at — it borrows a range of whichever buffer it was produced from, either the
caller's original input or the engine-owned buffer produced by [`crate::expand`] when the
document contained embedded JSON strings.
*/

use std::sync::Arc;

use crate::error::{self, Error};
use crate::scan;
use crate::value;

/// The kind of value a [`Node`] points at.
///
/// `Invalid` stands in for absence: a missing object field, an out-of-range array index,
/// or a navigation step that failed for any other reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Invalid,
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Kind::Invalid => "invalid",
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Bool => "bool",
            Kind::Null => "null",
        };
        f.write_str(s)
    }
}

/// The buffer a [`Node`] reads from: either the caller's input, or a buffer the engine
/// allocated while expanding embedded JSON strings (see [`crate::expand`]).
///
/// Cloning a `Buffer` never copies bytes: the borrowed variant copies a reference, the
/// owned variant bumps an `Arc` refcount.
#[derive(Clone)]
pub(crate) enum Buffer<'a> {
    Borrowed(&'a [u8]),
    Owned(Arc<[u8]>),
}

impl<'a> Buffer<'a> {
    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Borrowed(b) => b,
            Buffer::Owned(b) => b,
        }
    }

    /// A stable address for the lifetime of this buffer, used as the array-offset cache key.
    #[inline]
    pub(crate) fn identity(&self) -> usize {
        self.as_slice().as_ptr() as usize
    }
}

/// A handle to a value inside a JSON document.
///
/// `Node`s are cheap to clone (a buffer reference/`Arc` bump plus two offsets) and read-only:
/// navigation (`get`, `get_path`, `index`, the iterators) produces new `Node`s without
/// mutating the one it was called on.
#[derive(Clone)]
pub struct Node<'a> {
    pub(crate) buffer: Buffer<'a>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) kind: Kind,
}

impl<'a> std::fmt::Debug for Node<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("range", &(self.start, self.end))
            .field("raw", &self.raw_str_lossy())
            .finish()
    }
}

impl<'a> Node<'a> {
    pub(crate) fn new(buffer: Buffer<'a>, start: usize, end: usize, kind: Kind) -> Self {
        Node {
            buffer,
            start,
            end,
            kind,
        }
    }

    pub(crate) fn invalid(buffer: Buffer<'a>) -> Self {
        Node {
            buffer,
            start: 0,
            end: 0,
            kind: Kind::Invalid,
        }
    }

    pub(crate) fn with_range(&self, start: usize, end: usize, kind: Kind) -> Self {
        Node {
            buffer: self.buffer.clone(),
            start,
            end,
            kind,
        }
    }

    /// True iff this node refers to a real value (a missing key, bad index, or failed
    /// path segment produces a non-existent node instead).
    #[inline]
    pub fn exists(&self) -> bool {
        self.kind != Kind::Invalid && self.end > self.start
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        self.kind == Kind::Object
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.kind == Kind::Array
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        self.kind == Kind::String
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        self.kind == Kind::Number
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        self.kind == Kind::Bool
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.kind == Kind::Null
    }

    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.kind == Kind::Invalid
    }

    /// Array element count, object field count, or string logical character count.
    /// Zero for numbers, bools, null and invalid nodes.
    pub fn len(&self) -> usize {
        match self.kind {
            Kind::Array => crate::cache::array_len(self),
            Kind::Object => crate::lookup::object_field_count(self.raw()),
            Kind::String => value::string_char_len(self.raw()),
            _ => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The substring of the working buffer this node occupies, quotes/braces/brackets included.
    #[inline]
    pub fn raw(&self) -> &[u8] {
        get_unchecked!(self.buffer.as_slice(), self.start..self.end)
    }

    fn raw_str_lossy(&self) -> String {
        String::from_utf8_lossy(self.raw()).into_owned()
    }

    /// Like [`Node::raw`], but returns an error unless this node is an object or array.
    pub fn json(&self) -> Result<&str, Error> {
        if self.is_object() || self.is_array() {
            Ok(from_utf8_unchecked!(self.raw()))
        } else {
            Err(error::type_mismatch("node is not a container").with_node(self.kind, (self.start, self.end)))
        }
    }

    /// Look up a field by name on an object node. Non-object nodes, and missing keys,
    /// produce an [`Kind::Invalid`] node.
    pub fn get(&self, name: &str) -> Node<'a> {
        crate::lookup::get(self, name)
    }

    /// Evaluate a dotted/indexed path expression, e.g. `"x.y[1]"`.
    pub fn get_path(&self, path: &str) -> Node<'a> {
        crate::lookup::get_path(self, path)
    }

    /// Index into an array node. Out-of-range indices produce an [`Kind::Invalid`] node.
    pub fn index(&self, i: usize) -> Node<'a> {
        crate::lookup::index(self, i)
    }

    /// Parse this node as a signed 64-bit integer.
    pub fn as_i64(&self) -> Result<i64, Error> {
        self.expect_number()?;
        value::parse_i64(self.raw()).map_err(|e| e.with_node(self.kind, (self.start, self.end)))
    }

    /// Parse this node as an unsigned 64-bit integer.
    pub fn as_u64(&self) -> Result<u64, Error> {
        self.expect_number()?;
        value::parse_u64(self.raw()).map_err(|e| e.with_node(self.kind, (self.start, self.end)))
    }

    /// Parse this node as a 64-bit float.
    pub fn as_f64(&self) -> Result<f64, Error> {
        self.expect_number()?;
        value::parse_f64(self.raw()).map_err(|e| e.with_node(self.kind, (self.start, self.end)))
    }

    /// Parse this node as a boolean.
    pub fn as_bool(&self) -> Result<bool, Error> {
        if !self.is_bool() {
            return Err(error::type_mismatch("node is not a bool").with_node(self.kind, (self.start, self.end)));
        }
        value::parse_bool(self.raw()).map_err(|e| e.with_node(self.kind, (self.start, self.end)))
    }

    /// Resolve this node's string content, unescaping if necessary.
    pub fn as_str(&self) -> Result<std::borrow::Cow<'_, str>, Error> {
        if !self.is_string() {
            return Err(error::type_mismatch("node is not a string").with_node(self.kind, (self.start, self.end)));
        }
        value::parse_string(self.raw()).map_err(|e| e.with_node(self.kind, (self.start, self.end)))
    }

    fn expect_number(&self) -> Result<(), Error> {
        if self.kind != Kind::Number {
            return Err(
                error::type_mismatch("node is not a number").with_node(self.kind, (self.start, self.end))
            );
        }
        Ok(())
    }

    /// Visit each `(key, value)` pair of an object node in source order. See [`crate::iter`].
    pub fn for_each(&self, f: impl FnMut(&str, Node<'a>) -> bool) {
        crate::iter::for_each(self, f)
    }

    /// Visit each `(index, value)` pair of an array node in source order. See [`crate::iter`].
    pub fn array_for_each(&self, f: impl FnMut(usize, Node<'a>) -> bool) {
        crate::iter::array_for_each(self, f)
    }

    /// Depth-first walk over this node and its descendants. See [`crate::iter`].
    pub fn walk(&self, f: impl FnMut(&str, &Node<'a>) -> bool) {
        crate::iter::walk(self, f)
    }

    /// Decode this node into a target type implementing [`crate::decode::Decode`].
    pub fn decode<T: crate::decode::Decode>(&self) -> Result<T, Error> {
        crate::decode::decode(self)
    }
}

/// Returns the `Kind` implied by the first non-whitespace byte at `pos`, or `None` if `pos`
/// is at or past `end`, or the byte doesn't start a recognised value.
pub(crate) fn kind_at(input: &[u8], pos: usize, end: usize) -> Option<Kind> {
    if pos >= end {
        return None;
    }
    scan::detect_kind(*get_unchecked!(input, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(s: &'static str) -> Node<'static> {
        crate::from_bytes(s.as_bytes(), Default::default())
    }

    #[test]
    fn exists_and_kind() {
        let n = node(r#"{"a":1}"#);
        assert!(n.exists());
        assert_eq!(Kind::Object, n.kind());
    }

    #[test]
    fn invalid_does_not_exist() {
        let n = node(r#"{"a":1}"#).get("missing");
        assert!(!n.exists());
        assert_eq!(Kind::Invalid, n.kind());
    }

    #[test]
    fn raw_includes_delimiters() {
        let n = node(r#"{"a":"x"}"#).get("a");
        assert_eq!(b"\"x\"", n.raw());
    }
}
