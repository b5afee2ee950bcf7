//! Declarative shape builders.
//!
//! Every builder converts into [`Shape`] and may carry a custom message that
//! replaces the default text of the issues its own checks produce. Issues
//! raised by nested shapes keep their own messages.

use regex::Regex;
use serde_json::Value;

use crate::{Schema, SchemaError, SchemaResult};

#[derive(Debug, Clone)]
pub enum Shape {
    Any,
    Boolean(BooleanShape),
    Number(NumberShape),
    String(StringShape),
    Array(ArrayShape),
    Object(ObjectShape),
    /// Accepts an absent key or `null` in addition to the inner shape.
    Optional(Box<Shape>),
}

impl Shape {
    pub fn any() -> Shape {
        Shape::Any
    }

    pub fn boolean() -> BooleanShape {
        BooleanShape::default()
    }

    pub fn number() -> NumberShape {
        NumberShape::default()
    }

    pub fn string() -> StringShape {
        StringShape::default()
    }

    pub fn array(item: impl Into<Shape>) -> ArrayShape {
        ArrayShape {
            item: Box::new(item.into()),
            min_items: None,
            max_items: None,
            message: None,
        }
    }

    /// Object with named fields, checked in the given order.
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Shape)>) -> ObjectShape {
        ObjectShape {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            message: None,
        }
    }

    pub fn optional(self) -> Shape {
        if matches!(self, Shape::Optional(_)) {
            self
        } else {
            Shape::Optional(Box::new(self))
        }
    }

    /// Collect every issue `value` has against this shape.
    pub fn check(&self, value: &Value) -> Vec<crate::SchemaIssue> {
        crate::check::check(self, value)
    }
}

impl Schema for Shape {
    fn validate(&self, value: &Value) -> Result<SchemaResult, SchemaError> {
        Ok(SchemaResult::from_issues(self.check(value)))
    }
}

macro_rules! shape_kind {
    ($ty:ident, $variant:ident) => {
        impl From<$ty> for Shape {
            fn from(shape: $ty) -> Shape {
                Shape::$variant(shape)
            }
        }

        impl $ty {
            /// Replace the default issue text for this shape's own checks.
            pub fn message(mut self, message: impl Into<String>) -> Self {
                self.message = Some(message.into());
                self
            }

            pub fn optional(self) -> Shape {
                Shape::from(self).optional()
            }
        }

        impl Schema for $ty {
            fn validate(&self, value: &Value) -> Result<SchemaResult, SchemaError> {
                Shape::from(self.clone()).validate(value)
            }
        }
    };
}

shape_kind!(BooleanShape, Boolean);
shape_kind!(NumberShape, Number);
shape_kind!(StringShape, String);
shape_kind!(ArrayShape, Array);
shape_kind!(ObjectShape, Object);

#[derive(Debug, Clone, Default)]
pub struct BooleanShape {
    pub(crate) message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NumberShape {
    pub(crate) min: Option<f64>,
    pub(crate) max: Option<f64>,
    pub(crate) integer: bool,
    pub(crate) message: Option<String>,
}

impl NumberShape {
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringShape {
    pub(crate) min_len: Option<usize>,
    pub(crate) max_len: Option<usize>,
    pub(crate) pattern: Option<Regex>,
    pub(crate) message: Option<String>,
}

impl StringShape {
    /// Minimum length in characters.
    pub fn min_len(mut self, min: usize) -> Self {
        self.min_len = Some(min);
        self
    }

    /// Maximum length in characters.
    pub fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ArrayShape {
    pub(crate) item: Box<Shape>,
    pub(crate) min_items: Option<usize>,
    pub(crate) max_items: Option<usize>,
    pub(crate) message: Option<String>,
}

impl ArrayShape {
    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ObjectShape {
    pub(crate) fields: Vec<(String, Shape)>,
    pub(crate) message: Option<String>,
}

impl ObjectShape {
    /// Append a field after the existing ones.
    pub fn field(mut self, name: impl Into<String>, shape: impl Into<Shape>) -> Self {
        self.fields.push((name.into(), shape.into()));
        self
    }
}
