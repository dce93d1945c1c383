//! Assessment form state and lifecycle.
//!
//! A form is a flat mapping from field name to the raw string the user
//! typed or selected. Parsing is lenient by design: an unparseable number
//! reads as zero and an unknown select value reads as unselected, so every
//! field degrades to a zero-contribution default instead of rejecting the
//! submission.

use std::collections::HashMap;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════
// AssessmentForm
// ═══════════════════════════════════════════════════════════

/// Flat field-name → raw-value record backing one analyzer form.
#[derive(Debug, Clone, Default)]
pub struct AssessmentForm {
    fields: HashMap<String, String>,
}

impl AssessmentForm {
    /// Create an empty form — every accessor returns its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the raw value for a field, as typed.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Raw value of a field; empty string if never set.
    pub fn raw(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    /// Numeric field; unparseable or missing reads as `0.0`.
    pub fn number(&self, field: &str) -> f64 {
        self.raw(field).trim().parse().unwrap_or(0.0)
    }

    /// Whole-number field (age, counts); unparseable or missing reads as `0`.
    pub fn count(&self, field: &str) -> u32 {
        self.raw(field).trim().parse().unwrap_or(0)
    }

    /// Select field; an unknown or missing value reads as unselected.
    pub fn choice<T: FromStr>(&self, field: &str) -> Option<T> {
        T::from_str(self.raw(field)).ok()
    }

    /// Yes/no field; anything but an explicit "yes" reads as `false`.
    pub fn flag(&self, field: &str) -> bool {
        self.raw(field) == "yes"
    }

    /// Discard every field, returning the form to its all-default state.
    pub fn reset(&mut self) {
        self.fields.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════
// FormSession
// ═══════════════════════════════════════════════════════════

/// One form instance plus its latest assessment result.
///
/// Lifecycle: created empty, mutated field-by-field, submitted once into a
/// result, reset back to empty. Neither the input nor the result outlives
/// the session.
#[derive(Debug, Default)]
pub struct FormSession<R> {
    form: AssessmentForm,
    result: Option<R>,
}

impl<R> FormSession<R> {
    pub fn new() -> Self {
        Self {
            form: AssessmentForm::new(),
            result: None,
        }
    }

    pub fn form(&self) -> &AssessmentForm {
        &self.form
    }

    /// Update one field; any previous result is left as-is until the next
    /// submit, matching the original form behavior.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Consume the current input into a result via the domain's assessor.
    pub fn submit(&mut self, assess: impl FnOnce(&AssessmentForm) -> R) -> &R {
        self.result = Some(assess(&self.form));
        self.result.as_ref().expect("result just stored")
    }

    pub fn result(&self) -> Option<&R> {
        self.result.as_ref()
    }

    /// Discard both the input record and the result.
    pub fn reset(&mut self) {
        self.form.reset();
        self.result = None;
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
