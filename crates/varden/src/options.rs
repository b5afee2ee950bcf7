//! Form construction options.

use std::fmt;

use serde_json::{Map, Value};
use varden_schema::Schema;

/// Deep-copy strategy for value snapshots.
///
/// Implementations must not let `initial` and `current` share containers;
/// with owned `serde_json::Value`s any faithful copy satisfies that.
pub trait Cloner {
    fn deep_clone(&self, value: &Value) -> Value;
}

/// Default cloner: recursive copy of objects, arrays and scalars.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralCloner;

impl Cloner for StructuralCloner {
    fn deep_clone(&self, value: &Value) -> Value {
        match value {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(*b),
            Value::Number(n) => Value::Number(n.clone()),
            Value::String(s) => Value::String(s.clone()),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.deep_clone(item)).collect())
            }
            Value::Object(map) => {
                let mut copy = Map::with_capacity(map.len());
                for (key, val) in map {
                    copy.insert(key.clone(), self.deep_clone(val));
                }
                Value::Object(copy)
            }
        }
    }
}

impl<F> Cloner for F
where
    F: Fn(&Value) -> Value,
{
    fn deep_clone(&self, value: &Value) -> Value {
        self(value)
    }
}

/// Where the initial value tree comes from.
pub enum Initial {
    /// A literal, copied through the form's cloner every time it is needed.
    Value(Value),
    /// A producer invoked afresh at construction and on every reset.
    Factory(Box<dyn Fn() -> Value>),
}

impl Initial {
    pub(crate) fn produce(&self, cloner: &dyn Cloner) -> Value {
        match self {
            Initial::Value(value) => cloner.deep_clone(value),
            Initial::Factory(factory) => factory(),
        }
    }
}

impl Default for Initial {
    fn default() -> Self {
        Initial::Value(Value::Object(Map::new()))
    }
}

impl fmt::Debug for Initial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Initial::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Initial::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

pub(crate) type SubmitHandler = Box<dyn FnMut(Value)>;

/// Builder for [`crate::Form`].
///
/// ```
/// use varden::{Form, FormOptions};
/// use varden_schema::Shape;
/// use serde_json::json;
///
/// let form = Form::new(
///     FormOptions::new(Shape::object([("name", Shape::string().into())]))
///         .initial(json!({"name": "John"}))
///         .on_submit(|values| println!("{values}")),
/// )
/// .unwrap();
/// assert!(form.valid());
/// ```
pub struct FormOptions {
    pub(crate) schema: Box<dyn Schema>,
    pub(crate) initial: Initial,
    pub(crate) cloner: Box<dyn Cloner>,
    pub(crate) on_submit: SubmitHandler,
}

impl FormOptions {
    /// Options with an empty-object initial value, the structural cloner and
    /// a submit handler that does nothing.
    pub fn new(schema: impl Schema + 'static) -> Self {
        Self {
            schema: Box::new(schema),
            initial: Initial::default(),
            cloner: Box::new(StructuralCloner),
            on_submit: Box::new(|_| {}),
        }
    }

    pub fn initial(mut self, value: Value) -> Self {
        self.initial = Initial::Value(value);
        self
    }

    pub fn initial_with(mut self, factory: impl Fn() -> Value + 'static) -> Self {
        self.initial = Initial::Factory(Box::new(factory));
        self
    }

    pub fn cloner(mut self, cloner: impl Cloner + 'static) -> Self {
        self.cloner = Box::new(cloner);
        self
    }

    /// Handler receiving a deep copy of the values on a valid submit.
    ///
    /// The call is fire-and-forget: a handler with asynchronous work should
    /// hand the value to its own executor and return.
    pub fn on_submit(mut self, handler: impl FnMut(Value) + 'static) -> Self {
        self.on_submit = Box::new(handler);
        self
    }
}

impl fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOptions")
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}
