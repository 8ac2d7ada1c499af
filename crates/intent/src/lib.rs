//! Interpretation of free-form infrastructure intents.
//!
//! Raw oracle output flows through this crate in one direction:
//! text -> [`oracle`] -> JSON payload -> [`validate`] -> [`Action`].
//! Every failure along the way is absorbed into `Action::Error`.

pub mod action;
pub mod config;
pub mod error;
pub mod oracle;
pub mod orchestrator;
pub mod prompt;
pub mod validate;

pub use action::*;
pub use config::OracleConfig;
pub use error::{OracleError, QueryError};
pub use oracle::{GeminiOracle, Oracle, OracleRequest};
pub use orchestrator::{QueryOrchestrator, QueryTicket, Submission};
pub use prompt::SystemInstruction;
pub use validate::Validator;
