//! The [`object`](self) module implements [`Object`], a bare subject with
//! dynamically defined methods.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::{Class, Invocation, MethodTable, Responder, Result, Selector, Subject, Value};

/// A bare subject: a label and a [`MethodTable`].
///
/// Useful whenever a test needs "some object" to double selectors on.
pub struct Object {
    label: String,
    table: MethodTable,
}

impl Object {
    /// Create a new object without any methods.
    pub fn new<S: Into<String>>(label: S) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            table: MethodTable::new(),
        })
    }

    /// Create a new object that inherits the methods of `class`.
    pub fn of_class<S: Into<String>>(label: S, class: &Arc<Class>) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            table: MethodTable::with_class(class.clone()),
        })
    }

    /// Create a new object that answers arbitrary selectors with `responder`.
    pub fn with_responder<S, R>(label: S, responder: R) -> Arc<Self>
    where
        S: Into<String>,
        R: Responder + 'static,
    {
        let table = MethodTable::new();
        table.set_responder(responder);

        Arc::new(Self {
            label: label.into(),
            table,
        })
    }

    /// Define `selector` on this object.
    pub fn define<S, F>(&self, selector: S, f: F)
    where
        S: Into<Selector>,
        F: Fn(&Invocation) -> Result<Value> + Send + Sync + 'static,
    {
        self.table.define(selector, f);
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Subject for Object {
    fn method_table(&self) -> &MethodTable {
        &self.table
    }

    fn describe(&self) -> String {
        format!("#<{}:{}>", self.label, self.table.id())
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Object")
            .field("label", &self.label)
            .field("table", &self.table)
            .finish()
    }
}
