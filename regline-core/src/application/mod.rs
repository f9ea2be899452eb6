// regline-core/src/application/mod.rs

pub mod load;
pub mod pipeline;
pub mod script;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Cela permet au CLI de faire :
// `use regline_core::application::{run_pipeline, LoadExecutor, ScriptExecutor};`
// sans avoir à connaître la structure interne des fichiers.

pub use load::LoadExecutor;
pub use pipeline::run_pipeline;
pub use script::ScriptExecutor;
