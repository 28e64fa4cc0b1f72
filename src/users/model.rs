use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::validation::{self, Errors, Field, Rule};

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Stored customer account. The email is kept in normalized form and the
/// password only as a salted one-way hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// Sign-up or profile-update input. Everything is optional at this
/// boundary; the rules decide what a saveable account needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl NewUser {
    fn rules(&self) -> Vec<Rule<'_>> {
        vec![
            Rule::Presence {
                field: "name",
                value: Field::Text(self.name.as_deref()),
            },
            Rule::Presence {
                field: "email",
                value: Field::Text(self.email.as_deref()),
            },
            Rule::Presence {
                field: "password",
                value: Field::Text(self.password.as_deref()),
            },
            Rule::MinLength {
                field: "password",
                value: self.password.as_deref(),
                min: PASSWORD_MIN_LENGTH,
            },
            Rule::Presence {
                field: "password_confirmation",
                value: Field::Text(self.password_confirmation.as_deref()),
            },
            Rule::Confirmation {
                field: "password_confirmation",
                confirms: "password",
                value: self.password.as_deref(),
                confirmation: self.password_confirmation.as_deref(),
            },
        ]
    }

    /// Run the checks that need no store access. Email uniqueness is the
    /// services' job.
    pub fn validate(&self) -> Errors {
        validation::run(&self.rules())
    }
}

/// Lower-cased, whitespace-trimmed form used for comparison and storage.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
