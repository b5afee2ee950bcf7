//! Reactive form state.
//!
//! A [`Form`] owns two value trees (`initial` and `current`), a metadata
//! table with `touched`/`dirty`/`error` per dotted path, and a validity flag.
//! Every write goes through the path accessor, refreshes the field's dirty
//! flag against `initial`, and re-runs the schema; its issues are reconciled
//! into the metadata table.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use serde_json::json;
//! use varden::{Form, FormOptions, SubmitOutcome};
//! use varden_schema::Shape;
//!
//! let submitted = Rc::new(RefCell::new(None));
//! let sink = Rc::clone(&submitted);
//!
//! let form = Form::new(
//!     FormOptions::new(Shape::object([("name", Shape::string().non_empty().into())]))
//!         .initial(json!({"name": "John"}))
//!         .on_submit(move |values| *sink.borrow_mut() = Some(values)),
//! )
//! .unwrap();
//!
//! let field = form.use_field("name").unwrap();
//! field.value.set(json!("")).unwrap();
//! assert!(form.dirty());
//! assert!(!form.valid());
//! assert_eq!(field.error.get(), "");
//!
//! assert_eq!(form.submit(), SubmitOutcome::Invalid);
//! assert_eq!(field.error.get(), "must not be empty");
//!
//! field.value.set(json!("Jane")).unwrap();
//! assert_eq!(form.submit(), SubmitOutcome::Submitted);
//! assert_eq!(*submitted.borrow(), Some(json!({"name": "Jane"})));
//! ```

pub mod cell;
mod error;
mod field;
mod form;
mod options;
pub mod reconcile;
pub mod validation;

pub use error::FormError;
pub use field::{
    ArrayFieldValue, Field, FieldDisposer, FieldError, FieldTouch, FieldValue, FocusEvent,
    FocusKind, TouchSignal,
};
pub use form::{Form, SubmitOutcome};
pub use options::{Cloner, FormOptions, Initial, StructuralCloner};
pub use reconcile::{reconcile, FieldMeta, FieldTable};
pub use validation::{collect_issues, Issue};

pub use varden_path as path;
pub use varden_schema as schema;
