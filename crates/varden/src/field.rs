//! Per-field accessors handed out by [`Form`].

use std::cell::Cell;
use std::fmt;
use std::rc::Weak;

use serde_json::Value;
use varden_path::CompiledPath;

use crate::cell::{Memo, Signal};
use crate::error::FormError;
use crate::form::{Form, FormInner};
use crate::reconcile::FieldTable;

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

/// Read/write view of one path in the current values.
#[derive(Clone)]
pub struct FieldValue {
    form: Form,
    path: CompiledPath,
    key: String,
}

impl FieldValue {
    pub(crate) fn new(form: Form, path: CompiledPath, key: String) -> Self {
        Self { form, path, key }
    }

    pub fn path(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> Option<Value> {
        self.form.read_at(&self.path)
    }

    /// Write through to the form, refreshing `dirty` and validating.
    pub fn set(&self, value: Value) -> Result<(), FormError> {
        self.form.write_field(&self.path, self.key.clone(), value)
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValue").field("path", &self.key).finish()
    }
}

/// Accessor for an array-valued field.
#[derive(Clone)]
pub struct ArrayFieldValue {
    form: Form,
    path: CompiledPath,
    key: String,
}

impl ArrayFieldValue {
    pub(crate) fn new(form: Form, path: CompiledPath, key: String) -> Self {
        Self { form, path, key }
    }

    pub fn path(&self) -> &str {
        &self.key
    }

    /// The stored value, or an empty array when nothing (or `null`) is stored.
    pub fn get(&self) -> Value {
        match self.form.read_at(&self.path) {
            None | Some(Value::Null) => Value::Array(Vec::new()),
            Some(value) => value,
        }
    }

    /// # Errors
    ///
    /// `FormError::InvalidShape` if `value` is not an array; nothing is
    /// written in that case.
    pub fn set(&self, value: Value) -> Result<(), FormError> {
        if !value.is_array() {
            return Err(FormError::InvalidShape {
                path: self.key.clone(),
                found: type_name(&value),
            });
        }
        self.form.write_field(&self.path, self.key.clone(), value)
    }
}

impl fmt::Debug for ArrayFieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayFieldValue")
            .field("path", &self.key)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusKind {
    Focus,
    Blur,
}

/// A focus change coming from a UI input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusEvent {
    pub kind: FocusKind,
}

impl FocusEvent {
    pub fn focus() -> Self {
        Self {
            kind: FocusKind::Focus,
        }
    }

    pub fn blur() -> Self {
        Self {
            kind: FocusKind::Blur,
        }
    }
}

/// Input accepted by [`FieldTouch::apply`]. Any focus event counts as a touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchSignal {
    Flag(bool),
    Focus(FocusEvent),
}

impl TouchSignal {
    pub fn touched(self) -> bool {
        match self {
            TouchSignal::Flag(flag) => flag,
            TouchSignal::Focus(_) => true,
        }
    }
}

impl From<bool> for TouchSignal {
    fn from(flag: bool) -> Self {
        TouchSignal::Flag(flag)
    }
}

impl From<FocusEvent> for TouchSignal {
    fn from(event: FocusEvent) -> Self {
        TouchSignal::Focus(event)
    }
}

/// Callback updating a field's `touched` flag.
#[derive(Clone)]
pub struct FieldTouch {
    form: Form,
    key: String,
}

impl FieldTouch {
    pub(crate) fn new(form: Form, key: String) -> Self {
        Self { form, key }
    }

    /// Mark the field touched.
    pub fn touch(&self) -> Result<(), FormError> {
        self.apply(true)
    }

    /// # Errors
    ///
    /// `FormError::UnregisteredField` if the field has no metadata.
    pub fn apply(&self, signal: impl Into<TouchSignal>) -> Result<(), FormError> {
        self.form.touch_key(&self.key, signal.into().touched())
    }
}

impl fmt::Debug for FieldTouch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTouch").field("path", &self.key).finish()
    }
}

/// The error to display for a field: its stored error once touched,
/// otherwise empty.
#[derive(Clone)]
pub struct FieldError {
    memo: Memo<String>,
}

impl FieldError {
    pub(crate) fn new(meta: &Signal<FieldTable>, key: String) -> Self {
        let memo = Memo::new(meta, move |table: &FieldTable| match table.get(&key) {
            Some(field) if field.touched => field.error.clone(),
            _ => String::new(),
        });
        Self { memo }
    }

    pub fn get(&self) -> String {
        self.memo.get()
    }
}

impl fmt::Debug for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldError").field(&self.memo).finish()
    }
}

/// Cleanup for a field accessor: removes the field's value from the form.
///
/// Call [`FieldDisposer::dispose`] when the consumer detaches. Dropping the
/// disposer does nothing, and it does not keep the form alive.
#[must_use = "call `dispose` when the field consumer detaches"]
pub struct FieldDisposer {
    form: Weak<FormInner>,
    path: CompiledPath,
    key: String,
    disposed: Cell<bool>,
}

impl FieldDisposer {
    pub(crate) fn new(form: &Form, path: CompiledPath, key: String) -> Self {
        Self {
            form: form.downgrade(),
            path,
            key,
            disposed: Cell::new(false),
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Remove the field's value. Only the first call has an effect, and a
    /// form that no longer exists is ignored.
    ///
    /// This goes through [`Form::reset_field`], so the schema runs against
    /// the remaining values and its failure is returned as
    /// `FormError::Schema`.
    pub fn dispose(&self) -> Result<(), FormError> {
        if self.disposed.replace(true) {
            return Ok(());
        }
        let Some(form) = Form::from_weak(&self.form) else {
            return Ok(());
        };
        tracing::trace!(path = %self.key, "field disposed");
        form.remove_at(&self.path).map(drop)
    }
}

impl fmt::Debug for FieldDisposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDisposer")
            .field("path", &self.key)
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

/// All accessors for one field, as returned by [`Form::use_field`].
#[derive(Debug)]
pub struct Field {
    pub value: FieldValue,
    pub touch: FieldTouch,
    pub error: FieldError,
    pub disposer: FieldDisposer,
}
