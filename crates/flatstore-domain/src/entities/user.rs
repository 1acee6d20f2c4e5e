//! User entity

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    validation::{ModelValidator, Validate, ValidationErrors},
    value_objects::UserId,
};

/// Stored user account
///
/// `password` holds a digest, never the clear text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Login email
    pub email: String,
    /// Password digest
    pub password: String,
    /// Identifier, generated for legacy records stored without one
    #[serde(default)]
    pub id: UserId,
}

impl User {
    /// New account from credentials and an already computed digest
    pub fn register(credentials: Credentials, password_digest: String) -> Self {
        Self {
            name: credentials.name,
            email: credentials.email,
            password: password_digest,
            id: UserId::generate(),
        }
    }
}

/// Validated login or registration payload
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Optional display name
    pub name: Option<String>,
    /// Login email
    pub email: String,
    /// Clear-text password
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Validate for Credentials {
    fn validate(payload: &Value) -> Result<Self, ValidationErrors> {
        let mut validator = ModelValidator::new(payload);
        let name = validator.optional_string("name");
        let email = validator.required_string("email");
        let password = validator.required_string("password");

        validator.finish(|| {
            Some(Self {
                name,
                email: email?,
                password: password?,
            })
        })
    }
}
