//! Runtime checker for [`Shape`]: walks the value alongside the shape and
//! collects every issue instead of stopping at the first one.

use serde_json::Value;
use varden_path::PathKey;

use crate::shape::{ArrayShape, NumberShape, ObjectShape, StringShape};
use crate::{SchemaIssue, Shape};

pub(crate) fn check(shape: &Shape, value: &Value) -> Vec<SchemaIssue> {
    let mut checker = Checker {
        path: Vec::new(),
        issues: Vec::new(),
    };
    checker.visit(shape, Some(value));
    checker.issues
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn own_message(shape: &Shape) -> Option<&str> {
    match shape {
        Shape::Any | Shape::Optional(_) => None,
        Shape::Boolean(s) => s.message.as_deref(),
        Shape::Number(s) => s.message.as_deref(),
        Shape::String(s) => s.message.as_deref(),
        Shape::Array(s) => s.message.as_deref(),
        Shape::Object(s) => s.message.as_deref(),
    }
}

struct Checker {
    path: Vec<PathKey>,
    issues: Vec<SchemaIssue>,
}

impl Checker {
    fn report(&mut self, custom: Option<&str>, default: String) {
        let message = custom.map_or(default, str::to_string);
        self.issues.push(SchemaIssue::new(self.path.clone(), message));
    }

    fn mismatch(&mut self, custom: Option<&str>, expected: &str, value: &Value) {
        self.report(
            custom,
            format!("expected {expected}, received {}", type_name(value)),
        );
    }

    fn visit(&mut self, shape: &Shape, value: Option<&Value>) {
        let value = match (shape, value) {
            (Shape::Any, _) => return,
            (Shape::Optional(_), None | Some(Value::Null)) => return,
            (Shape::Optional(inner), value) => return self.visit(inner, value),
            (_, None | Some(Value::Null)) => {
                return self.report(own_message(shape), "required".to_string());
            }
            (_, Some(value)) => value,
        };

        match shape {
            Shape::Boolean(s) => {
                if !value.is_boolean() {
                    self.mismatch(s.message.as_deref(), "boolean", value);
                }
            }
            Shape::Number(s) => self.number(s, value),
            Shape::String(s) => self.string(s, value),
            Shape::Array(s) => self.array(s, value),
            Shape::Object(s) => self.object(s, value),
            Shape::Any | Shape::Optional(_) => {}
        }
    }

    fn number(&mut self, shape: &NumberShape, value: &Value) {
        let custom = shape.message.as_deref();
        let Some(num) = value.as_f64() else {
            return self.mismatch(custom, "number", value);
        };
        if shape.integer && num.fract() != 0.0 {
            self.report(custom, "must be an integer".to_string());
        }
        if let Some(min) = shape.min {
            if num < min {
                self.report(custom, format!("must be at least {min}"));
            }
        }
        if let Some(max) = shape.max {
            if num > max {
                self.report(custom, format!("must be at most {max}"));
            }
        }
    }

    fn string(&mut self, shape: &StringShape, value: &Value) {
        let custom = shape.message.as_deref();
        let Some(text) = value.as_str() else {
            return self.mismatch(custom, "string", value);
        };
        let len = text.chars().count();
        if let Some(min) = shape.min_len {
            if len < min {
                let default = if min == 1 {
                    "must not be empty".to_string()
                } else {
                    format!("must be at least {min} characters")
                };
                self.report(custom, default);
            }
        }
        if let Some(max) = shape.max_len {
            if len > max {
                self.report(custom, format!("must be at most {max} characters"));
            }
        }
        if let Some(pattern) = &shape.pattern {
            if !pattern.is_match(text) {
                self.report(custom, format!("must match {}", pattern.as_str()));
            }
        }
    }

    fn array(&mut self, shape: &ArrayShape, value: &Value) {
        let custom = shape.message.as_deref();
        let Some(items) = value.as_array() else {
            return self.mismatch(custom, "array", value);
        };
        if let Some(min) = shape.min_items {
            if items.len() < min {
                self.report(custom, format!("must contain at least {min} items"));
            }
        }
        if let Some(max) = shape.max_items {
            if items.len() > max {
                self.report(custom, format!("must contain at most {max} items"));
            }
        }
        for (idx, item) in items.iter().enumerate() {
            self.path.push(PathKey::Index(idx));
            self.visit(&shape.item, Some(item));
            self.path.pop();
        }
    }

    fn object(&mut self, shape: &ObjectShape, value: &Value) {
        let Some(map) = value.as_object() else {
            return self.mismatch(shape.message.as_deref(), "object", value);
        };
        for (name, field) in &shape.fields {
            self.path.push(PathKey::Name(name.clone()));
            self.visit(field, map.get(name));
            self.path.pop();
        }
    }
}
