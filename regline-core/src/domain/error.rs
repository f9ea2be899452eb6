// regline-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Duplicate source name '{0}' in catalog")]
    #[diagnostic(
        code(regline::domain::duplicate_source),
        help("Every import and script source must carry a unique name within its list.")
    )]
    DuplicateSource(String),

    #[error("Invalid field separator {separator:?} for source '{source_name}'")]
    #[diagnostic(
        code(regline::domain::invalid_separator),
        help("Separators must be single-byte ASCII, such as ',' or '^'.")
    )]
    InvalidSeparator { source_name: String, separator: char },
}
