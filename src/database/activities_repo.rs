use sqlx::SqliteConnection;

use crate::models::ActivityRow;

const SQL_LIST_ACTIVITIES: &str = r#"
SELECT
  id,
  name,
  description,
  schedule,
  max_participants
FROM activities
ORDER BY id ASC
"#;

pub async fn list_activities(conn: &mut SqliteConnection) -> sqlx::Result<Vec<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(SQL_LIST_ACTIVITIES)
        .fetch_all(conn)
        .await
}

// Names are not unique in the schema; the oldest row wins.
const SQL_FIND_ACTIVITY_BY_NAME: &str = r#"
SELECT
  id,
  name,
  description,
  schedule,
  max_participants
FROM activities
WHERE name = ?
ORDER BY id ASC
LIMIT 1
"#;

pub async fn find_activity_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> sqlx::Result<Option<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(SQL_FIND_ACTIVITY_BY_NAME)
        .bind(name)
        .fetch_optional(conn)
        .await
}

const SQL_ANY_ACTIVITY: &str = r#"
SELECT 1
FROM activities
LIMIT 1
"#;

pub async fn any_activity_exists(conn: &mut SqliteConnection) -> sqlx::Result<bool> {
    let row: Option<i64> = sqlx::query_scalar(SQL_ANY_ACTIVITY)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}

const SQL_INSERT_ACTIVITY: &str = r#"
INSERT INTO activities (
  name,
  description,
  schedule,
  max_participants
) VALUES (?, ?, ?, ?)
"#;

pub struct NewActivity<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub schedule: Option<&'a str>,
    pub max_participants: Option<i64>,
}

pub async fn insert_activity(
    conn: &mut SqliteConnection,
    activity: NewActivity<'_>,
) -> sqlx::Result<i64> {
    let res = sqlx::query(SQL_INSERT_ACTIVITY)
        .bind(activity.name)
        .bind(activity.description)
        .bind(activity.schedule)
        .bind(activity.max_participants)
        .execute(conn)
        .await?;
    Ok(res.last_insert_rowid())
}
