//! quizsmith-report: Performance report generation.
//!
//! Renders scored quizzes as self-contained HTML.

pub mod html;
