//! Declarative entity validation.
//!
//! Every entity type lists its checks as an ordered set of [`Rule`]
//! descriptors and [`run`] evaluates them into an [`Errors`] collection.
//! An invalid record is not a fault: services return the errors to the
//! caller through [`SaveOutcome`] and nothing is written.

use serde::Serialize;

use crate::money::Money;

/// Field-scoped validation messages, in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Errors {
    entries: Vec<FieldMessages>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct FieldMessages {
    field: &'static str,
    messages: Vec<String>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed check against `field`. Messages for one field
    /// accumulate in the order they were added.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.entries.iter_mut().find(|e| e.field == field) {
            Some(entry) => entry.messages.push(message),
            None => self.entries.push(FieldMessages {
                field,
                messages: vec![message],
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Messages recorded against a single field.
    pub fn on(&self, field: &str) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.messages.as_slice())
            .unwrap_or(&[])
    }

    /// `"<Humanized field> <condition>"` strings, e.g. `"Name can't be blank"`.
    pub fn full_messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|entry| {
                let field = humanize(entry.field);
                entry
                    .messages
                    .iter()
                    .map(move |message| format!("{field} {message}"))
            })
            .collect()
    }
}

/// Result of a validate-then-persist operation. A rejected save leaves no
/// partial write behind; the errors are the caller's to inspect.
#[derive(Debug)]
pub enum SaveOutcome<T> {
    Saved(T),
    Rejected(Errors),
}

impl<T> SaveOutcome<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }

    pub fn saved(self) -> Option<T> {
        match self {
            SaveOutcome::Saved(value) => Some(value),
            SaveOutcome::Rejected(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&Errors> {
        match self {
            SaveOutcome::Saved(_) => None,
            SaveOutcome::Rejected(errors) => Some(errors),
        }
    }
}

/// The value a presence check inspects.
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    Text(Option<&'a str>),
    Number(Option<i64>),
    Reference(bool),
}

impl Field<'_> {
    fn is_blank(self) -> bool {
        match self {
            Field::Text(value) => blank(value),
            Field::Number(value) => value.is_none(),
            Field::Reference(present) => !present,
        }
    }
}

fn blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// One declarative check against one field.
#[derive(Debug, Clone, Copy)]
pub enum Rule<'a> {
    /// The field must be present and non-blank.
    Presence { field: &'static str, value: Field<'a> },
    /// Minimum text length. Absent and blank values are the presence
    /// rule's problem, not this one's.
    MinLength {
        field: &'static str,
        value: Option<&'a str>,
        min: usize,
    },
    /// The confirmation must equal the value it confirms. Skipped while
    /// the confirmed value is blank or the confirmation is absent.
    Confirmation {
        field: &'static str,
        confirms: &'static str,
        value: Option<&'a str>,
        confirmation: Option<&'a str>,
    },
    /// Composite monetary amount; one message per failed sub-check.
    Monetary {
        field: &'static str,
        value: Option<Money>,
    },
}

/// Evaluate `rules` in order into a fresh error collection. Pure, no I/O;
/// checks that need the store (email uniqueness) live with the services.
pub fn run(rules: &[Rule<'_>]) -> Errors {
    let mut errors = Errors::new();
    for rule in rules {
        apply(rule, &mut errors);
    }
    errors
}

fn apply(rule: &Rule<'_>, errors: &mut Errors) {
    match *rule {
        Rule::Presence { field, value } => {
            if value.is_blank() {
                errors.add(field, "can't be blank");
            }
        }
        Rule::MinLength { field, value, min } => {
            if let Some(value) = value {
                if !value.trim().is_empty() && value.chars().count() < min {
                    errors.add(
                        field,
                        format!("is too short (minimum is {min} characters)"),
                    );
                }
            }
        }
        Rule::Confirmation {
            field,
            confirms,
            value,
            confirmation,
        } => {
            if blank(value) || confirmation.is_none() {
                return;
            }
            if value != confirmation {
                errors.add(field, format!("doesn't match {}", humanize(confirms)));
            }
        }
        Rule::Monetary { field, value } => {
            for message in Money::amount_checks(value) {
                errors.add(field, message);
            }
        }
    }
}

/// `"password_confirmation"` -> `"Password confirmation"`.
pub(crate) fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}
