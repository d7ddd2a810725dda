use sqlx::SqlitePool;
use tracing::debug;

const SQL_CREATE_ACTIVITIES: &str = r#"
CREATE TABLE IF NOT EXISTS activities (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  description TEXT NULL,
  schedule TEXT NULL,
  max_participants INTEGER NULL
)
"#;

const SQL_CREATE_ACTIVITIES_NAME_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS ix_activities_name ON activities (name)
"#;

const SQL_CREATE_ACTIVITY_PARTICIPANTS: &str = r#"
CREATE TABLE IF NOT EXISTS activity_participants (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  activity_id INTEGER NOT NULL REFERENCES activities (id) ON DELETE CASCADE,
  email TEXT NOT NULL,
  signed_up_at TEXT NOT NULL
)
"#;

const SQL_CREATE_PARTICIPANT_EMAIL_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS ux_activity_participants_activity_email
  ON activity_participants (activity_id, email)
"#;

/// Creates missing tables and indexes. Safe to run on every start.
pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    for ddl in [
        SQL_CREATE_ACTIVITIES,
        SQL_CREATE_ACTIVITIES_NAME_INDEX,
        SQL_CREATE_ACTIVITY_PARTICIPANTS,
        SQL_CREATE_PARTICIPANT_EMAIL_INDEX,
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }
    debug!("database schema ensured");
    Ok(())
}
