/*!
The struct decoder (C9): maps a [`Node`] tree onto a target composite value.

Composite ("struct") targets implement [`Struct`], hand-declaring their field table once; the
blanket [`Decode`] impl below resolves that table into a process-wide cache the first time each
concrete type is decoded. A `static` inside a generic function can't depend on that function's
type parameter, so the cache is a single `DashMap` keyed by `TypeId` instead of one cell per `T`.
*/

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::error::{self, Error};
use crate::node::{Kind, Node};

/// Implemented by any type that can be produced from a [`Node`].
pub trait Decode: Sized {
    fn decode(node: &Node) -> Result<Self, Error>;
}

pub(crate) fn decode<T: Decode>(node: &Node) -> Result<T, Error> {
    T::decode(node)
}

macro_rules! decode_number {
    ($ty:ty, $accessor:ident) => {
        impl Decode for $ty {
            fn decode(node: &Node) -> Result<Self, Error> {
                if node.is_null() {
                    return Ok(Default::default());
                }
                node.$accessor()
            }
        }
    };
}

decode_number!(i64, as_i64);
decode_number!(u64, as_u64);
decode_number!(f64, as_f64);

impl Decode for bool {
    fn decode(node: &Node) -> Result<Self, Error> {
        if node.is_null() {
            return Ok(false);
        }
        node.as_bool()
    }
}

impl Decode for String {
    fn decode(node: &Node) -> Result<Self, Error> {
        if node.is_null() {
            return Ok(String::new());
        }
        node.as_str().map(|s| s.into_owned())
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(node: &Node) -> Result<Self, Error> {
        if !node.exists() || node.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::decode(node)?))
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(node: &Node) -> Result<Self, Error> {
        if node.is_null() {
            return Ok(Vec::new());
        }
        if !node.is_array() {
            return Err(error::type_mismatch("expected an array").with_node(node.kind, (node.start, node.end)));
        }

        let mut out = Vec::with_capacity(node.len());
        let mut first_err = None;

        node.array_for_each(|i, child| {
            match T::decode(&child) {
                Ok(v) => out.push(v),
                Err(e) if first_err.is_none() => first_err = Some(e.with_field(i.to_string())),
                Err(_) => {}
            }
            true
        });

        match first_err {
            Some(e) => Err(e),
            None => Ok(out),
        }
    }
}

/// A fixed-length array target. Elements beyond `N` are dropped; a short input leaves the
/// remaining slots at their `Default` value.
impl<T: Decode + Default, const N: usize> Decode for [T; N] {
    fn decode(node: &Node) -> Result<Self, Error> {
        if !node.is_array() {
            return Err(error::type_mismatch("expected an array").with_node(node.kind, (node.start, node.end)));
        }

        let mut out: [T; N] = std::array::from_fn(|_| T::default());
        let mut first_err = None;

        node.array_for_each(|i, child| {
            if i >= N {
                return false;
            }
            match T::decode(&child) {
                Ok(v) => out[i] = v,
                Err(e) => {
                    first_err = Some(e.with_field(i.to_string()));
                    return false;
                }
            }
            true
        });

        match first_err {
            Some(e) => Err(e),
            None => Ok(out),
        }
    }
}

fn decode_map<T: Decode>(node: &Node) -> Result<Vec<(String, T)>, Error> {
    if !node.is_object() {
        return Err(error::type_mismatch("expected an object").with_node(node.kind, (node.start, node.end)));
    }

    let mut out = Vec::with_capacity(node.len());
    let mut first_err = None;

    node.for_each(|key, child| {
        match T::decode(&child) {
            Ok(v) => out.push((key.to_string(), v)),
            Err(e) if first_err.is_none() => first_err = Some(e.with_field(key)),
            Err(_) => {}
        }
        true
    });

    match first_err {
        Some(e) => Err(e),
        None => Ok(out),
    }
}

impl<T: Decode> Decode for HashMap<String, T> {
    fn decode(node: &Node) -> Result<Self, Error> {
        Ok(decode_map(node)?.into_iter().collect())
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(node: &Node) -> Result<Self, Error> {
        Ok(decode_map(node)?.into_iter().collect())
    }
}

/// A dynamically-typed decode target, used when the caller doesn't know the shape ahead of
/// time. Numbers resolve to `Int` when their raw bytes contain no `.`/`e`/`E` and integer
/// parsing succeeds, otherwise `Float`.
#[derive(Debug, Clone, PartialEq)]
pub enum Dynamic {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Dynamic>),
    Object(Vec<(String, Dynamic)>),
}

impl Decode for Dynamic {
    fn decode(node: &Node) -> Result<Self, Error> {
        match node.kind() {
            Kind::Null => Ok(Dynamic::Null),
            Kind::Bool => Ok(Dynamic::Bool(node.as_bool()?)),
            Kind::Number => match node.as_i64() {
                Ok(i) => Ok(Dynamic::Int(i)),
                Err(_) => Ok(Dynamic::Float(node.as_f64()?)),
            },
            Kind::String => Ok(Dynamic::String(node.as_str()?.into_owned())),
            Kind::Array => Ok(Dynamic::Array(Vec::<Dynamic>::decode(node)?)),
            Kind::Object => Ok(Dynamic::Object(decode_map::<Dynamic>(node)?)),
            Kind::Invalid => Err(error::not_found()),
        }
    }
}

/// A single field of a [`Struct`] target: its effective JSON name (already resolved for any
/// rename/suppress rule) and a setter that decodes the matching child node into the slot.
pub struct Field<T> {
    pub name: &'static str,
    pub set: fn(&mut T, &Node) -> Result<(), Error>,
}

impl<T> Field<T> {
    pub const fn new(name: &'static str, set: fn(&mut T, &Node) -> Result<(), Error>) -> Self {
        Field { name, set }
    }
}

/// Implemented by composite types decodable from a JSON object via a hand-declared field
/// table. `Default::default()` supplies the starting value so fields absent from the input
/// keep their zero value, matching the dispatch rules in `DESIGN.md`.
pub trait Struct: Sized + Default {
    fn fields() -> Vec<Field<Self>>;
}

// Process-wide, populated on first use per the field map's type identity. A generic function
// can't hold a per-`T` `static` directly (statics can't depend on a function's type
// parameters), so the memoization is keyed explicitly by `TypeId` instead.
static FIELD_CACHE: Lazy<DashMap<TypeId, Arc<dyn Any + Send + Sync>>> = Lazy::new(DashMap::new);

fn field_cache<T: Struct + 'static>() -> Arc<Vec<Field<T>>> {
    let type_id = TypeId::of::<T>();

    if let Some(existing) = FIELD_CACHE.get(&type_id) {
        if let Ok(fields) = existing.value().clone().downcast::<Vec<Field<T>>>() {
            return fields;
        }
    }

    let fields: Arc<Vec<Field<T>>> = Arc::new(T::fields());
    FIELD_CACHE.insert(type_id, fields.clone());
    fields
}

/// The fast path behind [`crate::decode_struct`]: scans the root object directly and only
/// builds a child [`Node`] for keys that actually match a declared field, instead of the
/// general path's one child `Node` per entry via [`Node::for_each`].
pub(crate) fn decode_object_fast<T: Struct + 'static>(node: &Node) -> Result<T, Error> {
    if node.is_null() {
        return Ok(T::default());
    }
    if !node.is_object() {
        return Err(error::type_mismatch("expected an object").with_node(node.kind, (node.start, node.end)));
    }

    let buf = node.buffer.as_slice();
    let body_start = node.start + 1;
    let body_end = node.end.saturating_sub(1).max(body_start);
    let fields = field_cache::<T>();

    let mut target = T::default();
    let mut first_err = None;

    crate::lookup::scan_object_entries(buf, body_start, body_end, |key_start, key_end, value_start, value_end| {
        let raw_key = get_unchecked!(buf, key_start + 1..key_end.saturating_sub(1));

        if let Some(field) = fields.iter().find(|f| raw_key == f.name.as_bytes()) {
            let kind = crate::node::kind_at(buf, value_start, body_end).unwrap_or(Kind::Invalid);
            let child = node.with_range(value_start, value_end, kind);

            if let Err(e) = (field.set)(&mut target, &child) {
                if first_err.is_none() {
                    first_err = Some(e.with_field(field.name));
                }
            }
        }

        true
    });

    match first_err {
        Some(e) => Err(e),
        None => Ok(target),
    }
}

impl<T: Struct + 'static> Decode for T {
    fn decode(node: &Node) -> Result<Self, Error> {
        if node.is_null() {
            return Ok(T::default());
        }
        if !node.is_object() {
            return Err(error::type_mismatch("expected an object").with_node(node.kind, (node.start, node.end)));
        }

        let mut target = T::default();
        let fields = field_cache::<T>();
        let mut first_err = None;

        node.for_each(|key, child| {
            if let Some(field) = fields.iter().find(|f| f.name == key) {
                if let Err(e) = (field.set)(&mut target, &child) {
                    if first_err.is_none() {
                        first_err = Some(e.with_field(field.name));
                    }
                }
            }
            true
        });

        match first_err {
            Some(e) => Err(e),
            None => Ok(target),
        }
    }
}
