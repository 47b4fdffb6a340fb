//! Data structures for the captioning API requests and responses.

mod model_params;
mod part;
mod request;
mod response;

pub use model_params::ModelParams;
pub use part::{FileData, InlineData, Part};
pub use request::{Content, Request, Role};
pub use response::{Candidate, FinishReason, Response, UsageMetadata};
