//! Read-only access to the remote statistics warehouse.
//!
//! ```text
//!   Warehouse::connect ──► WarehouseSession::query ──► WarehouseSession::close
//!          │ Err                     │ Ok / Err                 (always)
//!          ▼                         ▼
//!   Unavailable{Connect}    Ready(table) / Unavailable{Query}
//! ```
//!
//! [`fetch_table`] is the only entry point the UI uses. It never returns an
//! error: every failure becomes [`FetchOutcome::Unavailable`].

mod error;
pub mod snowflake;

pub use error::WarehouseError;
pub use snowflake::{SnowflakeConfig, SnowflakeWarehouse};

use std::fmt;

use crate::data::model::StatTable;

/// Query backing the cultural insights view.
pub const INSIGHTS_QUERY: &str = "SELECT * FROM cultural_insights LIMIT 10";
/// Query backing the tourism view.
pub const TOURISM_QUERY: &str = "SELECT * FROM tourism_data LIMIT 10";

/// Something that can open sessions against a tabular data source.
pub trait Warehouse {
    type Session: WarehouseSession;

    fn connect(&self) -> Result<Self::Session, WarehouseError>;
}

/// An open session. `close` consumes the session so it cannot be reused.
pub trait WarehouseSession {
    fn query(&mut self, sql: &str) -> Result<StatTable, WarehouseError>;

    fn close(self) -> Result<(), WarehouseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Connect,
    Query,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::Connect => write!(f, "Error connecting to the warehouse"),
            FetchStage::Query => write!(f, "Error fetching data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Ready(StatTable),
    Unavailable { stage: FetchStage, reason: String },
}

impl FetchOutcome {
    /// Text for the fallback notice, if the data is unavailable.
    pub fn notice(&self) -> Option<String> {
        match self {
            FetchOutcome::Ready(_) => None,
            FetchOutcome::Unavailable { stage, reason } => Some(format!("{stage}: {reason}")),
        }
    }
}

/// Run `sql` in a fresh session and close the session afterwards.
pub fn fetch_table<W: Warehouse>(warehouse: &W, sql: &str) -> FetchOutcome {
    let mut session = match warehouse.connect() {
        Ok(session) => session,
        Err(e) => {
            log::error!("Warehouse connection failed: {e}");
            return FetchOutcome::Unavailable {
                stage: FetchStage::Connect,
                reason: e.to_string(),
            };
        }
    };

    let result = session.query(sql);

    if let Err(e) = session.close() {
        log::warn!("Failed to close warehouse session: {e}");
    }

    match result {
        Ok(table) => {
            log::info!(
                "Fetched {} rows x {} columns for `{sql}`",
                table.num_rows(),
                table.columns.len()
            );
            FetchOutcome::Ready(table)
        }
        Err(e) => {
            log::error!("Warehouse query `{sql}` failed: {e}");
            FetchOutcome::Unavailable {
                stage: FetchStage::Query,
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeWarehouse {
        refuse_connect: bool,
        fail_query: bool,
        fail_close: bool,
        closed: Rc<Cell<u32>>,
    }

    struct FakeSession {
        fail_query: bool,
        fail_close: bool,
        closed: Rc<Cell<u32>>,
    }

    fn rejected(endpoint: &'static str) -> WarehouseError {
        WarehouseError::Rejected {
            endpoint,
            code: "002003".into(),
            message: "object does not exist".into(),
        }
    }

    impl Warehouse for FakeWarehouse {
        type Session = FakeSession;

        fn connect(&self) -> Result<FakeSession, WarehouseError> {
            if self.refuse_connect {
                return Err(rejected("login"));
            }
            Ok(FakeSession {
                fail_query: self.fail_query,
                fail_close: self.fail_close,
                closed: Rc::clone(&self.closed),
            })
        }
    }

    impl WarehouseSession for FakeSession {
        fn query(&mut self, _sql: &str) -> Result<StatTable, WarehouseError> {
            if self.fail_query {
                return Err(rejected("query"));
            }
            Ok(StatTable::from_rows(
                vec!["category".into(), "count".into()],
                vec![vec![CellValue::Text("Forts".into()), CellValue::Integer(3)]],
            ))
        }

        fn close(self) -> Result<(), WarehouseError> {
            self.closed.set(self.closed.get() + 1);
            if self.fail_close {
                return Err(rejected("close"));
            }
            Ok(())
        }
    }

    #[test]
    fn successful_fetch_closes_session() {
        let warehouse = FakeWarehouse::default();
        let outcome = fetch_table(&warehouse, INSIGHTS_QUERY);
        assert!(matches!(outcome, FetchOutcome::Ready(ref t) if t.num_rows() == 1));
        assert_eq!(outcome.notice(), None);
        assert_eq!(warehouse.closed.get(), 1);
    }

    #[test]
    fn query_failure_is_unavailable_and_still_closes() {
        let warehouse = FakeWarehouse {
            fail_query: true,
            ..Default::default()
        };
        let outcome = fetch_table(&warehouse, TOURISM_QUERY);
        assert!(matches!(
            outcome,
            FetchOutcome::Unavailable {
                stage: FetchStage::Query,
                ..
            }
        ));
        assert!(outcome.notice().unwrap().starts_with("Error fetching data"));
        assert_eq!(warehouse.closed.get(), 1);
    }

    #[test]
    fn connect_failure_is_unavailable() {
        let warehouse = FakeWarehouse {
            refuse_connect: true,
            ..Default::default()
        };
        let outcome = fetch_table(&warehouse, INSIGHTS_QUERY);
        assert!(matches!(
            outcome,
            FetchOutcome::Unavailable {
                stage: FetchStage::Connect,
                ..
            }
        ));
        assert_eq!(warehouse.closed.get(), 0);
    }

    #[test]
    fn close_failure_does_not_hide_the_result() {
        let warehouse = FakeWarehouse {
            fail_close: true,
            ..Default::default()
        };
        assert!(matches!(
            fetch_table(&warehouse, INSIGHTS_QUERY),
            FetchOutcome::Ready(_)
        ));
    }
}
