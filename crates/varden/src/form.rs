//! The form session: value snapshots, field metadata and validation wiring.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;
use varden_path::{read, remove, write, CompiledPath, PathCache};
use varden_schema::Schema;

use crate::cell::{Memo, ReadSignal, Signal};
use crate::error::FormError;
use crate::field::{
    ArrayFieldValue, Field, FieldDisposer, FieldError, FieldTouch, FieldValue,
};
use crate::options::{Cloner, FormOptions, Initial, SubmitHandler};
use crate::reconcile::{reconcile, FieldMeta, FieldTable};
use crate::validation::collect_issues;

/// Result of [`Form::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The handler received a copy of the values.
    Submitted,
    /// The last validation run had issues; every field is now touched.
    Invalid,
    /// The handler is still running (submit was called from inside it).
    Busy,
}

pub(crate) struct FormInner {
    schema: Box<dyn Schema>,
    initial_source: Initial,
    cloner: Box<dyn Cloner>,
    on_submit: RefCell<SubmitHandler>,
    initial: RefCell<Value>,
    values: Signal<Value>,
    meta: Signal<FieldTable>,
    valid: Signal<bool>,
    dirty: Memo<bool>,
    paths: RefCell<PathCache>,
}

/// A form session. Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct Form {
    pub(crate) inner: Rc<FormInner>,
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("values", &self.inner.values)
            .field("meta", &self.inner.meta)
            .field("valid", &self.inner.valid.get())
            .finish_non_exhaustive()
    }
}

impl Form {
    /// Build a session and run validation once.
    ///
    /// # Errors
    ///
    /// `FormError::Schema` if the schema itself fails.
    pub fn new(options: FormOptions) -> Result<Self, FormError> {
        let FormOptions {
            schema,
            initial,
            cloner,
            on_submit,
        } = options;

        let initial_values = initial.produce(&*cloner);
        let current_values = initial.produce(&*cloner);
        let meta = Signal::new(FieldTable::new());
        let dirty = Memo::new(&meta, |table: &FieldTable| {
            table.values().any(|field| field.dirty)
        });

        let form = Form {
            inner: Rc::new(FormInner {
                schema,
                initial_source: initial,
                cloner,
                on_submit: RefCell::new(on_submit),
                initial: RefCell::new(initial_values),
                values: Signal::new(current_values),
                meta,
                valid: Signal::new(true),
                dirty,
                paths: RefCell::new(PathCache::new()),
            }),
        };
        form.apply_validation()?;
        Ok(form)
    }

    pub(crate) fn from_weak(inner: &Weak<FormInner>) -> Option<Self> {
        inner.upgrade().map(|inner| Form { inner })
    }

    pub(crate) fn downgrade(&self) -> Weak<FormInner> {
        Rc::downgrade(&self.inner)
    }

    /// Compile `path` through the session cache and return it with its
    /// canonical string form, which keys the metadata table.
    pub(crate) fn resolve(&self, path: &str) -> Result<(CompiledPath, String), FormError> {
        let compiled = self
            .inner
            .paths
            .borrow_mut()
            .compile(path)
            .map_err(|source| FormError::invalid_path(path, source))?;
        let key = compiled.to_string();
        Ok((compiled, key))
    }

    fn apply_validation(&self) -> Result<(), FormError> {
        let issues = self
            .inner
            .values
            .with(|values| collect_issues(&*self.inner.schema, values))?;
        let valid = self.inner.meta.update(|table| reconcile(table, issues));
        self.inner.valid.set_if_changed(valid);
        Ok(())
    }

    /// Re-run validation against the current values.
    pub fn revalidate(&self) -> Result<(), FormError> {
        self.apply_validation()
    }

    /// Snapshot of the current values.
    pub fn values(&self) -> Value {
        self.inner.values.get()
    }

    pub fn values_signal(&self) -> ReadSignal<Value> {
        self.inner.values.clone().into()
    }

    /// Whether the most recent validation run reported no issues.
    pub fn valid(&self) -> bool {
        self.inner.valid.get()
    }

    pub fn valid_signal(&self) -> ReadSignal<bool> {
        self.inner.valid.clone().into()
    }

    /// Whether any registered field differs from its initial value.
    pub fn dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    pub fn meta(&self) -> FieldTable {
        self.inner.meta.get()
    }

    pub fn meta_signal(&self) -> ReadSignal<FieldTable> {
        self.inner.meta.clone().into()
    }

    pub fn field_meta(&self, path: &str) -> Option<FieldMeta> {
        let (_, key) = self.resolve(path).ok()?;
        self.inner.meta.with(|table| table.get(&key).cloned())
    }

    /// Rebuild `initial` and `current` from the initial source, clear every
    /// `touched` and `dirty` flag, then validate.
    pub fn reset(&self) -> Result<(), FormError> {
        let initial = self.inner.initial_source.produce(&*self.inner.cloner);
        let current = self.inner.initial_source.produce(&*self.inner.cloner);
        *self.inner.initial.borrow_mut() = initial;
        self.inner.values.set(current);
        self.inner.meta.update(|table| {
            for field in table.values_mut() {
                field.touched = false;
                field.dirty = false;
            }
        });
        tracing::debug!("form reset");
        self.apply_validation()
    }

    /// Remove the value at `path` from the current values and revalidate.
    ///
    /// `initial` and the field's metadata flags are left as they are. An
    /// array element leaves a hole, so sibling fields keep their paths.
    ///
    /// # Errors
    ///
    /// `FormError::InvalidPath` for a malformed path, `FormError::Schema` if
    /// the revalidation fails.
    pub fn reset_field(&self, path: &str) -> Result<Option<Value>, FormError> {
        let (compiled, _) = self.resolve(path)?;
        self.remove_at(&compiled)
    }

    pub(crate) fn remove_at(&self, compiled: &CompiledPath) -> Result<Option<Value>, FormError> {
        let removed = self.inner.values.update(|values| remove(values, compiled));
        tracing::trace!(path = %compiled, removed = removed.is_some(), "field value removed");
        self.apply_validation()?;
        Ok(removed)
    }

    /// Write `value` at `path`, update the field's dirty flag and validate.
    pub fn set_value(&self, path: &str, value: Value) -> Result<(), FormError> {
        let (compiled, key) = self.resolve(path)?;
        self.write_field(&compiled, key, value)
    }

    pub(crate) fn write_field(
        &self,
        compiled: &CompiledPath,
        key: String,
        value: Value,
    ) -> Result<(), FormError> {
        let dirty = read(&self.inner.initial.borrow(), compiled) != Some(&value);
        self.inner
            .values
            .try_update(|values| write(values, compiled, value))
            .map_err(|source| FormError::invalid_path(&key, source))?;
        tracing::trace!(path = %key, dirty, "field value written");
        self.inner.meta.update(|table| {
            table.entry(key).or_default().dirty = dirty;
        });
        self.apply_validation()
    }

    /// Current value at `path`; `None` when nothing is stored there.
    pub fn get_value(&self, path: &str) -> Result<Option<Value>, FormError> {
        let (compiled, _) = self.resolve(path)?;
        Ok(self.read_at(&compiled))
    }

    pub(crate) fn read_at(&self, compiled: &CompiledPath) -> Option<Value> {
        self.inner
            .values
            .with(|values| read(values, compiled).cloned())
    }

    /// Set the `touched` flag of a registered field.
    ///
    /// # Errors
    ///
    /// `FormError::UnregisteredField` if no metadata exists for `path`.
    pub fn set_touched(&self, path: &str, flag: bool) -> Result<(), FormError> {
        let (_, key) = self.resolve(path)?;
        self.touch_key(&key, flag)
    }

    pub(crate) fn touch_key(&self, key: &str, flag: bool) -> Result<(), FormError> {
        self.inner.meta.try_update(|table| match table.get_mut(key) {
            Some(field) => {
                field.touched = flag;
                Ok(())
            }
            None => Err(FormError::UnregisteredField {
                path: key.to_string(),
            }),
        })
    }

    fn register(&self, key: &str) {
        if self.inner.meta.with(|table| table.contains_key(key)) {
            return;
        }
        self.inner.meta.update(|table| {
            table.insert(key.to_string(), FieldMeta::default());
        });
    }

    /// Read/write accessor for `path`, registering its metadata.
    ///
    /// The returned disposer removes the value again when the consumer goes
    /// away.
    pub fn use_field_value(&self, path: &str) -> Result<(FieldValue, FieldDisposer), FormError> {
        let (compiled, key) = self.resolve(path)?;
        self.register(&key);
        let disposer = FieldDisposer::new(self, compiled.clone(), key.clone());
        Ok((FieldValue::new(self.clone(), compiled, key), disposer))
    }

    /// Like [`Form::use_field_value`], for array-valued fields.
    pub fn use_array_field_value(
        &self,
        path: &str,
    ) -> Result<(ArrayFieldValue, FieldDisposer), FormError> {
        let (compiled, key) = self.resolve(path)?;
        self.register(&key);
        let disposer = FieldDisposer::new(self, compiled.clone(), key.clone());
        Ok((ArrayFieldValue::new(self.clone(), compiled, key), disposer))
    }

    /// Callback setting the field's `touched` flag.
    pub fn use_field_touch(&self, path: &str) -> Result<FieldTouch, FormError> {
        let (_, key) = self.resolve(path)?;
        Ok(FieldTouch::new(self.clone(), key))
    }

    /// The field's error, visible only once the field is touched.
    pub fn use_field_error(&self, path: &str) -> Result<FieldError, FormError> {
        let (_, key) = self.resolve(path)?;
        Ok(FieldError::new(&self.inner.meta, key))
    }

    /// Value, touch and error accessors for one field.
    pub fn use_field(&self, path: &str) -> Result<Field, FormError> {
        let (value, disposer) = self.use_field_value(path)?;
        Ok(Field {
            value,
            touch: self.use_field_touch(path)?,
            error: self.use_field_error(path)?,
            disposer,
        })
    }

    pub fn use_array_field(
        &self,
        path: &str,
    ) -> Result<(ArrayFieldValue, FieldDisposer), FormError> {
        self.use_array_field_value(path)
    }

    /// Hand a copy of the values to the submit handler if the form is valid.
    ///
    /// An invalid form marks every field touched so all errors surface, and
    /// the handler is not called.
    pub fn submit(&self) -> SubmitOutcome {
        if !self.inner.valid.get() {
            self.inner.meta.update(|table| {
                for field in table.values_mut() {
                    field.touched = true;
                }
            });
            tracing::debug!("submit blocked by validation issues");
            return SubmitOutcome::Invalid;
        }

        let snapshot = self
            .inner
            .values
            .with(|values| self.inner.cloner.deep_clone(values));
        let Ok(mut handler) = self.inner.on_submit.try_borrow_mut() else {
            tracing::warn!("submit called while the submit handler is running");
            return SubmitOutcome::Busy;
        };
        let handler = &mut *handler;
        handler(snapshot);
        tracing::debug!("form submitted");
        SubmitOutcome::Submitted
    }
}
