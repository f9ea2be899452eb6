pub mod catalog;
pub mod project;

pub use catalog::load_catalog;
pub use project::{ProjectConfig, load_project_config};
