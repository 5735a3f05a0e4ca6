//! SQLite-based session storage.
//!
//! This is the persistence side of the tracker: the clock and tracker never
//! touch it themselves. Provides:
//! - Completed sessions (one row per finished session of any type)
//! - Per-day aggregates for the streak rollover
//! - Key-value store for the tracker counters and rollover bookkeeping

use std::path::Path;

use chrono::{DateTime, Days, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::{data_dir, migrations};
use crate::error::{DatabaseError, Result};
use crate::productivity::ProductivityTracker;
use crate::timer::SessionType;

const STATS_KEY: &str = "productivity_stats";
const ROLLOVER_DAY_KEY: &str = "last_rollover_day";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub session_type: SessionType,
    pub duration_min: u32,
    pub completed_at: DateTime<Utc>,
}

/// Totals for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: NaiveDate,
    pub work_sessions: u64,
    pub focus_min: u64,
    pub break_sessions: u64,
    pub break_min: u64,
}

/// SQLite database for session storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/focusclock.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("focusclock.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)?;
        Ok(Self { conn })
    }

    /// Record a completed session.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(
        &self,
        session_type: SessionType,
        duration_min: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sessions (session_type, duration_min, completed_at)
             VALUES (?1, ?2, ?3)",
            params![session_type.as_str(), duration_min, timestamp(completed_at)],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Record a completed session and persist the tracker that counted it.
    ///
    /// Both writes share one transaction, so the session history and the
    /// stored counters never disagree.
    ///
    /// # Errors
    /// Returns an error if either write fails; nothing is stored in that case.
    pub fn record_completion(
        &self,
        tracker: &ProductivityTracker,
        session_type: SessionType,
        duration_min: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<i64> {
        let json = serde_json::to_string(tracker)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO sessions (session_type, duration_min, completed_at)
             VALUES (?1, ?2, ?3)",
            params![session_type.as_str(), duration_min, timestamp(completed_at)],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![STATS_KEY, json],
        )?;
        tx.commit()?;
        Ok(id)
    }

    /// Most recent sessions first.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_type, duration_min, completed_at
             FROM sessions
             ORDER BY completed_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, session_type, duration_min, completed_at) = row?;
            let session_type = session_type
                .parse::<SessionType>()
                .map_err(DatabaseError::QueryFailed)?;
            let completed_at = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
                .with_timezone(&Utc);
            records.push(SessionRecord {
                id,
                session_type,
                duration_min,
                completed_at,
            });
        }
        Ok(records)
    }

    pub fn day_summary(&self, day: NaiveDate) -> Result<DaySummary> {
        let (start, end) = day_bounds(day);
        let mut stmt = self.conn.prepare(
            "SELECT session_type, COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM sessions
             WHERE completed_at >= ?1 AND completed_at < ?2
             GROUP BY session_type",
        )?;
        let rows = stmt.query_map(params![start, end], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        let mut summary = DaySummary {
            day,
            work_sessions: 0,
            focus_min: 0,
            break_sessions: 0,
            break_min: 0,
        };
        for row in rows {
            let (session_type, count, minutes) = row?;
            match session_type.parse::<SessionType>() {
                Ok(SessionType::Work) => {
                    summary.work_sessions += count;
                    summary.focus_min += minutes;
                }
                Ok(SessionType::ShortBreak | SessionType::LongBreak) => {
                    summary.break_sessions += count;
                    summary.break_min += minutes;
                }
                Err(_) => {}
            }
        }
        Ok(summary)
    }

    pub fn focus_minutes_on(&self, day: NaiveDate) -> Result<u64> {
        Ok(self.day_summary(day)?.focus_min)
    }

    /// Load the persisted tracker, recomputing its score.
    pub fn load_tracker(&self) -> Result<Option<ProductivityTracker>> {
        match self.kv_get(STATS_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save_tracker(&self, tracker: &ProductivityTracker) -> Result<()> {
        let json = serde_json::to_string(tracker)?;
        self.kv_set(STATS_KEY, &json)
    }

    pub fn last_rollover_day(&self) -> Result<Option<NaiveDate>> {
        match self.kv_get(ROLLOVER_DAY_KEY)? {
            Some(value) => {
                let day = value
                    .parse::<NaiveDate>()
                    .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
                Ok(Some(day))
            }
            None => Ok(None),
        }
    }

    pub fn set_last_rollover_day(&self, day: NaiveDate) -> Result<()> {
        self.kv_set(ROLLOVER_DAY_KEY, &day.to_string())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `[day 00:00Z, next day 00:00Z)` in the stored timestamp format.
fn day_bounds(day: NaiveDate) -> (String, String) {
    let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = day
        .checked_add_days(Days::new(1))
        .map(|next| next.and_time(chrono::NaiveTime::MIN).and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    (timestamp(start), timestamp(end))
}
