//! Common part model used in both requests and responses.

use serde::{Deserialize, Serialize};

/// A single part of a request or response content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// A text part containing a string value
    Text {
        /// The text content of the part
        text: String,
    },
    /// A part containing inline data
    InlineData {
        /// The inline data content of the part
        inline_data: InlineData,
    },
    /// A part referencing a file already uploaded to the provider
    FileData {
        /// The file reference content of the part
        file_data: FileData,
    },
}

impl Part {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates an inline data part from a MIME type and base64-encoded data.
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }

    /// Creates a file data part from a MIME type and provider file URI.
    pub fn file_data(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Self::FileData {
            file_data: FileData {
                mime_type: mime_type.into(),
                file_uri: file_uri.into(),
            },
        }
    }
}

/// A part containing inline data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    /// The MIME type of the inline data
    pub mime_type: String,
    /// The inline data content, base64-encoded
    pub data: String,
}

/// A part referencing a provider-hosted file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileData {
    /// The MIME type of the referenced file
    pub mime_type: String,
    /// The URI of the referenced file
    pub file_uri: String,
}
