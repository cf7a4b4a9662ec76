/*!
The error taxonomy surfaced by typed-value extraction, path evaluation, and struct decoding.

Navigation (`get`, `get_path`, `index`, iteration) never returns an [`Error`]; it produces
an [`Invalid`](crate::Kind::Invalid) node instead. Errors only appear once a caller asks for
a typed value or a decoded struct.
*/

use std::fmt;

use crate::Kind;

/// A structured error returned by typed extraction and decoding.
#[derive(Debug, Clone, thiserror::Error)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Context,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if !self.context.is_empty() {
            write!(f, " ({})", self.context)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct Context {
    node_kind: Option<Kind>,
    range: Option<(usize, usize)>,
    field: Option<String>,
}

impl Context {
    fn is_empty(&self) -> bool {
        self.node_kind.is_none() && self.range.is_none() && self.field.is_none()
    }
}

/// The kind of failure that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// A requested object field, array index, or path segment did not resolve.
    #[error("not found")]
    NotFound,
    /// A typed extraction was attempted on a node of the wrong kind, or a number's
    /// textual form doesn't match the requested numeric type (e.g. a fraction requested as an int).
    #[error("type mismatch")]
    TypeMismatch,
    /// A parsed number doesn't fit in the requested integer range.
    #[error("overflow")]
    Overflow,
    /// The scanner ran off the end of the input, or a literal didn't match `true`/`false`/`null`.
    #[error("malformed")]
    Malformed,
    /// A pre-validation limit (depth, string length, key/item count) was exceeded.
    #[error("limit exceeded")]
    LimitExceeded,
    /// Struct decoding couldn't map an input field's type onto the target slot's type.
    #[error("decode error")]
    Decode,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error {
            kind,
            message: message.into(),
            context: Context::default(),
        }
    }

    pub(crate) fn with_node(mut self, kind: Kind, range: (usize, usize)) -> Self {
        self.context.node_kind = Some(kind);
        self.context.range = Some(range);
        self
    }

    pub(crate) fn with_field(mut self, field: impl Into<String>) -> Self {
        self.context.field = Some(field.into());
        self
    }

    /// The category of failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The node kind observed at the point of failure, if known.
    pub fn node_kind(&self) -> Option<Kind> {
        self.context.node_kind
    }

    /// The byte range of the offending node within its working buffer, if known.
    pub fn range(&self) -> Option<(usize, usize)> {
        self.context.range
    }

    /// The struct field name involved in a decode failure, if any.
    pub fn field(&self) -> Option<&str> {
        self.context.field.as_deref()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;

        if let Some(kind) = self.node_kind {
            write!(f, "node={:?}", kind)?;
            wrote = true;
        }
        if let Some((start, end)) = self.range {
            write!(f, "{}range={}..{}", if wrote { ", " } else { "" }, start, end)?;
            wrote = true;
        }
        if let Some(field) = &self.field {
            write!(f, "{}field={}", if wrote { ", " } else { "" }, field)?;
        }

        Ok(())
    }
}

pub(crate) fn not_found() -> Error {
    Error::new(ErrorKind::NotFound, "value not found")
}

pub(crate) fn type_mismatch(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::TypeMismatch, message)
}

pub(crate) fn overflow(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Overflow, message)
}

pub(crate) fn malformed(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Malformed, message)
}

pub(crate) fn limit_exceeded(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::LimitExceeded, message)
}

pub(crate) fn decode(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Decode, message)
}
