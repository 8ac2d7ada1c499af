use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use catalog::RegionCatalog;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::error::QueryError;
use crate::oracle::{Oracle, OracleRequest, parse_payload};
use crate::prompt::SystemInstruction;
use crate::validate::Validator;

/// Identifies one dispatched query. Later tickets supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

impl QueryTicket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A resolved query together with the ticket it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: QueryTicket,
    pub action: Action,
}

/// Turns user text into a validated [`Action`].
///
/// The only component that performs outbound I/O. It never fails: empty input, oracle
/// outages, unparseable replies and schema violations all come back as `Action::Error`.
pub struct QueryOrchestrator<O> {
    oracle: O,
    catalog: Arc<RegionCatalog>,
    instruction: SystemInstruction,
    latest: AtomicU64,
}

impl<O: Oracle> QueryOrchestrator<O> {
    pub fn new(oracle: O, catalog: Arc<RegionCatalog>) -> Self {
        let instruction = SystemInstruction::build(&catalog);
        Self {
            oracle,
            catalog,
            instruction,
            latest: AtomicU64::new(0),
        }
    }

    pub fn catalog(&self) -> &Arc<RegionCatalog> {
        &self.catalog
    }

    pub fn instruction(&self) -> &SystemInstruction {
        &self.instruction
    }

    /// Interprets `user_text` and returns the validated action.
    pub async fn submit(&self, user_text: &str, credentials: &str) -> Action {
        match self.resolve(user_text, credentials).await {
            Ok(action) => {
                info!(action = %action.kind(), regions = ?action.region_codes(), "query resolved");
                action
            }
            Err(err) => {
                warn!(error = ?err, "query failed");
                err.into_action()
            }
        }
    }

    /// Like [`QueryOrchestrator::submit`], but issues a ticket first so that a caller with
    /// overlapping queries can discard results that were superseded while in flight.
    pub async fn dispatch(&self, user_text: &str, credentials: &str) -> Submission {
        let ticket = QueryTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        let action = self.submit(user_text, credentials).await;
        Submission { ticket, action }
    }

    /// `true` if no query was dispatched after `ticket`.
    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    async fn resolve(&self, user_text: &str, credentials: &str) -> Result<Action, QueryError> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(QueryError::InvalidInput { field: "query" });
        }
        let credentials = credentials.trim();
        if credentials.is_empty() {
            return Err(QueryError::InvalidInput { field: "API key" });
        }

        let key_prefix: String = credentials.chars().take(4).collect();
        debug!(%key_prefix, query = user_text, "interpreting query");

        let text = self
            .oracle
            .interpret(OracleRequest {
                user_text,
                system_instruction: self.instruction.as_str(),
                credentials,
            })
            .await?;

        let payload = parse_payload(&text)?;
        Validator::new(&self.catalog).check(&payload)
    }
}
