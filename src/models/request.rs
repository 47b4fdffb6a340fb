//! Request models for the Gemini generateContent API.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::Part;

/// A request to the generateContent endpoint.
#[derive(Debug, Clone, Serialize, TypedBuilder)]
pub struct Request {
    /// The contents of the request, including the prompt and image parts.
    #[builder(setter(into))]
    pub contents: Vec<Content>,
}

/// A content object containing parts of the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// The role that produced this content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// The parts that make up the content.
    pub parts: Vec<Part>,
}

/// The author of a piece of content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Content supplied by the caller.
    User,
    /// Content produced by the model.
    Model,
}

impl Request {
    /// Creates a request containing a single user turn with the given parts.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: Some(Role::User),
                parts,
            }],
        }
    }

    /// Creates a request with the given text prompt.
    pub fn with_prompt(text: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::text(text)])
    }
}
