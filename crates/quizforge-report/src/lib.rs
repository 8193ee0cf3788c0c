//! quizforge-report — Report generation for session history.

pub mod html;

pub use html::{generate_html, write_html_report};
