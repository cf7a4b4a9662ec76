/*!
# `lazyjson`

A lazy, in-place JSON access library. Rather than building a parse tree up front, a [`Node`]
is a cheap handle into a byte range of the document it was produced from; navigating (`get`,
`get_path`, `index`, iteration) scans just far enough to answer the question asked and never
materialises the parts of the document you didn't touch.

## ⚠️ CAREFUL

This crate contains unsafe code on its hot paths (skipping bounds checks once a range has
already been validated by the scanner) and is performance sensitive. Any changes need to be
carefully considered and should be tested against the benchmarks to make sure we don't regress.

Unchecked operations go through macros that fall back to their checked variant in test/debug
builds (or when the `checked` cfg is set) so a bug shows up as a panic in tests rather than UB
in release.
*/

#![cfg_attr(checked, deny(warnings))]
#![allow(clippy::missing_safety_doc)] // false positives on the unchecked macros

#[macro_use]
mod macros;

pub(crate) mod std_ext;

mod cache;
mod decode;
mod error;
mod expand;
mod iter;
mod lookup;
mod node;
mod root;
mod scan;
mod unescape;
mod value;

pub use decode::{Decode, Dynamic, Field, Struct};
pub use error::{Error, ErrorKind};
pub use node::{Kind, Node};
pub use root::{from_bytes, Options};

/// Decode a byte slice directly into a composite `T`, using the fast path that only builds a
/// child [`Node`] for keys that match one of `T`'s declared fields (see [`Struct`]).
pub fn decode_struct<T: Struct + 'static>(input: &[u8], options: Options) -> Result<T, Error> {
    root::validate(input, &options)?;
    let root = from_bytes(input, options);
    decode::decode_object_fast(&root)
}

#[cfg(test)]
mod tests;
