//! Unit-of-work boundary over one SQLite connection.
//!
//! # Responsibility
//! - Group repository statements into one atomic transaction.
//! - Leave commit/rollback decisions to the caller, never to repositories.
//!
//! # Invariants
//! - A session that is dropped without `commit` is rolled back.
//! - Writes issued through a session are visible to reads on the same session
//!   before commit, and to other connections only after commit.

use super::{DbError, DbResult};
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::ops::Deref;
use std::time::Instant;

/// One open transaction, usable anywhere a `&Connection` is expected.
pub struct Session<'conn> {
    tx: Transaction<'conn>,
    started_at: Instant,
}

impl<'conn> Session<'conn> {
    /// Begins an immediate transaction so the write lock is taken up front.
    pub fn begin(conn: &'conn mut Connection) -> DbResult<Self> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        debug!("event=session_begin module=db status=ok");
        Ok(Self {
            tx,
            started_at: Instant::now(),
        })
    }

    /// Makes every statement issued through this session durable.
    pub fn commit(self) -> DbResult<()> {
        let started_at = self.started_at;
        self.tx.commit()?;
        debug!(
            "event=session_commit module=db status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Discards every statement issued through this session.
    pub fn rollback(self) -> DbResult<()> {
        let started_at = self.started_at;
        self.tx.rollback()?;
        debug!(
            "event=session_rollback module=db status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

impl Deref for Session<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.tx
    }
}

/// Runs `work` inside a session, committing on `Ok` and rolling back on `Err`.
///
/// The error from `work` wins over a failed rollback; the rollback failure is
/// only logged.
pub fn with_session<T, E, F>(conn: &mut Connection, work: F) -> Result<T, E>
where
    F: FnOnce(&Session<'_>) -> Result<T, E>,
    E: From<DbError>,
{
    let session = Session::begin(conn)?;
    match work(&session) {
        Ok(value) => {
            session.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = session.rollback() {
                warn!(
                    "event=session_rollback module=db status=error error={}",
                    rollback_err
                );
            }
            Err(err)
        }
    }
}
