//! quizsmith-core: Quiz model, parsing, scoring, and sessions.
//!
//! This crate defines the data model, the parser that turns free-text model
//! output into structured questions, the scoring logic, and the provider
//! trait that the rest of quizsmith builds on.

pub mod chat;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod session;
pub mod traits;

pub use error::QuizError;
