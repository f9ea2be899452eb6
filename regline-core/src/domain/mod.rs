pub mod catalog;
pub mod error;
pub mod outcome;
pub mod resolve;
pub mod source;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
pub use outcome::{ExecutionOutcome, OutcomeStatus, RunReport};
pub use source::{ExistencePolicy, ImportSource, MatchKind, ResolvedFile, ScriptPhase, ScriptSource};
