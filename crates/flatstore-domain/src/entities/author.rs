//! Author entity

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    validation::{ModelValidator, Validate, ValidationErrors},
    value_objects::AuthorId,
};

/// Stored author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    pub name: String,
    /// Identifier
    pub id: AuthorId,
}

impl Author {
    /// New author with a generated id
    pub fn create(draft: AuthorDraft) -> Self {
        Self {
            name: draft.name,
            id: AuthorId::generate(),
        }
    }

    /// Author `id` with the draft's fields
    pub fn revise(id: AuthorId, draft: AuthorDraft) -> Self {
        Self {
            name: draft.name,
            id,
        }
    }
}

/// Validated author fields supplied by a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDraft {
    /// Display name
    pub name: String,
}

impl Validate for AuthorDraft {
    fn validate(payload: &Value) -> Result<Self, ValidationErrors> {
        let mut validator = ModelValidator::new(payload);
        let name = validator.required_string("name");
        validator.finish(|| Some(Self { name: name? }))
    }
}
