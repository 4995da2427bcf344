//! quickread-content — Built-in content and configuration.
//!
//! Implements the `quickread-core` content traits with Portuguese paragraphs,
//! quiz tables, and feedback messages, and loads `quickread.toml`.

pub mod config;
pub mod error;
pub mod feedback;
pub mod mock;
pub mod paragraphs;
pub mod quiz_tables;

pub use config::{
    create_controller, create_controller_with, load_config, load_config_from, QuickreadConfig,
};
pub use error::ContentError;
pub use feedback::FeedbackTable;
pub use paragraphs::StaticParagraphProvider;
pub use quiz_tables::QuizTables;
