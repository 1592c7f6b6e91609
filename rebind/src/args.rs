//! The [`args`](self) module contains the types that describe one concrete
//! call of a selector: the [`Args`], the optional trailing [`Block`] and the
//! [`Invocation`] that bundles both.

use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::Value;

/// Positional and keyword arguments of a call.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Args {
    /// Positional arguments in call order.
    pub positional: Vec<Value>,

    /// Keyword arguments, sorted by name.
    pub keywords: BTreeMap<String, Value>,
}

impl Args {
    /// Create an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg<V: Into<Value>>(mut self, value: V) -> Self {
        self.positional.push(value.into());

        self
    }

    /// Add a keyword argument.
    #[must_use]
    pub fn kwarg<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.keywords.insert(name.into(), value.into());

        self
    }

    /// Returns `true` if there are neither positional nor keyword arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    /// Number of positional arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// Get the positional argument at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Get the keyword argument `name`.
    #[must_use]
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords.get(name)
    }
}

impl Args {
    /// Write the arguments without the surrounding parenthesis.
    pub(crate) fn fmt_list(&self, f: &mut Formatter<'_>) -> FmtResult {
        let positional = self.positional.iter().map(ToString::to_string);
        let keywords = self.keywords.iter().map(|(k, v)| format!("{k}: {v}"));
        for (i, s) in positional.chain(keywords).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{s}")?;
        }

        Ok(())
    }
}

impl Display for Args {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "(")?;
        self.fmt_list(f)?;
        write!(f, ")")
    }
}

impl From<Vec<Value>> for Args {
    fn from(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keywords: BTreeMap::new(),
        }
    }
}

impl From<()> for Args {
    fn from((): ()) -> Self {
        Self::default()
    }
}

/// Build positional [`Args`] from a list of values.
///
/// ```
/// let args = rebind::args![1, "two", 3.0];
///
/// assert_eq!(3, args.len());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($( $value:expr ),+ $(,)?) => {
        $crate::Args::from(vec![ $( $crate::Value::from($value) ),+ ])
    };
}

/// Trailing callable argument of a call.
#[derive(Clone)]
pub struct Block(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Block {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Yield `values` to the block.
    pub fn call(&self, values: &[Value]) -> Value {
        (self.0)(values)
    }
}

impl Debug for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Block")
    }
}

/// One concrete call: arguments plus the optional block.
#[derive(Default, Debug, Clone)]
pub struct Invocation {
    pub args: Args,
    pub block: Option<Block>,
}

impl Invocation {
    #[must_use]
    pub fn new(args: Args) -> Self {
        Self { args, block: None }
    }

    #[must_use]
    pub fn with_block(mut self, block: Block) -> Self {
        self.block = Some(block);

        self
    }
}

impl From<Args> for Invocation {
    fn from(args: Args) -> Self {
        Self::new(args)
    }
}

impl From<()> for Invocation {
    fn from((): ()) -> Self {
        Self::default()
    }
}
