//! The [`value`](self) module defines the dynamic [`Value`] type that is used
//! for arguments and return values of intercepted selectors.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

/// A dynamically typed value passed to or returned from a selector.
#[derive(Default, Clone)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Nil,

    /// A boolean.
    Bool(bool),

    /// A signed integer.
    Int(i64),

    /// A floating point number.
    Float(f64),

    /// A string.
    Str(String),

    /// An interned-like name, displayed as `:name`.
    Sym(String),

    /// An ordered list of values.
    List(Vec<Value>),

    /// Any other shared payload. Opaque values compare by pointer identity.
    Opaque(Arc<dyn Any + Send + Sync>),
}

/// The kind of a [`Value`], used by type checking matchers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    Sym,
    List,
    Opaque,
}

impl Value {
    /// Wrap an arbitrary payload into an opaque value.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    /// Create a symbol value.
    pub fn sym<S: Into<String>>(name: S) -> Self {
        Self::Sym(name.into())
    }

    /// Get the kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Nil => ValueKind::Nil,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Sym(_) => ValueKind::Sym,
            Self::List(_) => ValueKind::List,
            Self::Opaque(_) => ValueKind::Opaque,
        }
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(x) => Some(*x),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(x) => Some(*x),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(x) => Some(*x as f64),
            _ => None,
        }
    }

    /// Returns the string content of a string or symbol value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(x) | Self::Sym(x) => Some(x),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(x) => Some(x),
            _ => None,
        }
    }

    /// Downcast an opaque value to the payload type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Opaque(x) => x.downcast_ref(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            #[allow(clippy::cast_precision_loss)]
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => *a as f64 == *b,
            (Self::Str(a), Self::Str(b)) | (Self::Sym(a), Self::Sym(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                self.as_float()?.partial_cmp(&other.as_float()?)
            }
            (Self::Str(a), Self::Str(b)) | (Self::Sym(a), Self::Sym(b)) => a.partial_cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            _ if self == other => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(x) => write!(f, "{x}"),
            Self::Int(x) => write!(f, "{x}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(x) => write!(f, "{x:?}"),
            Self::Sym(x) => write!(f, ":{x}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Opaque(x) => write!(f, "#<opaque {:p}>", Arc::as_ptr(x)),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::Nil => "Nil",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Str => "Str",
            Self::Sym => "Sym",
            Self::List => "List",
            Self::Opaque => "Opaque",
        };

        write!(f, "{name}")
    }
}

macro_rules! impl_from {
    ($variant:ident: $( $type:ty ),+) => {
        $(
            impl From<$type> for Value {
                fn from(value: $type) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

impl_from!(Bool: bool);
impl_from!(Int: i8, i16, i32, i64, u8, u16, u32);
impl_from!(Float: f32, f64);
impl_from!(Str: &str, String);

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Nil
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}
