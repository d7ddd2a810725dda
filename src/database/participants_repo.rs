use chrono::{SecondsFormat, Utc};
use sqlx::SqliteConnection;

use crate::models::ActivityParticipantRow;

const SQL_LIST_PARTICIPANT_EMAILS: &str = r#"
SELECT email
FROM activity_participants
WHERE activity_id = ?
ORDER BY id ASC
"#;

pub async fn list_participant_emails(
    conn: &mut SqliteConnection,
    activity_id: i64,
) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(SQL_LIST_PARTICIPANT_EMAILS)
        .bind(activity_id)
        .fetch_all(conn)
        .await
}

const SQL_COUNT_PARTICIPANTS: &str = r#"
SELECT COUNT(*)
FROM activity_participants
WHERE activity_id = ?
"#;

pub async fn count_participants(
    conn: &mut SqliteConnection,
    activity_id: i64,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_PARTICIPANTS)
        .bind(activity_id)
        .fetch_one(conn)
        .await
}

const SQL_FIND_PARTICIPANT: &str = r#"
SELECT
  id,
  activity_id,
  email,
  signed_up_at
FROM activity_participants
WHERE activity_id = ?
  AND email = ?
LIMIT 1
"#;

pub async fn find_participant(
    conn: &mut SqliteConnection,
    activity_id: i64,
    email: &str,
) -> sqlx::Result<Option<ActivityParticipantRow>> {
    sqlx::query_as::<_, ActivityParticipantRow>(SQL_FIND_PARTICIPANT)
        .bind(activity_id)
        .bind(email)
        .fetch_optional(conn)
        .await
}

// The capacity check is repeated inside the statement so two concurrent
// signups cannot both take the last seat.
const SQL_INSERT_PARTICIPANT: &str = r#"
INSERT INTO activity_participants (
  activity_id,
  email,
  signed_up_at
)
SELECT a.id, ?2, ?3
FROM activities a
WHERE a.id = ?1
  AND (
    a.max_participants IS NULL
    OR (
      SELECT COUNT(*)
      FROM activity_participants p
      WHERE p.activity_id = a.id
    ) < a.max_participants
  )
"#;

pub struct NewParticipant<'a> {
    pub activity_id: i64,
    pub email: &'a str,
    pub signed_up_at: String,
}

impl<'a> NewParticipant<'a> {
    pub fn signing_up_now(activity_id: i64, email: &'a str) -> Self {
        Self {
            activity_id,
            email,
            signed_up_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

/// Returns the number of inserted rows: 0 when the activity is missing or full.
pub async fn insert_participant(
    conn: &mut SqliteConnection,
    participant: NewParticipant<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_PARTICIPANT)
        .bind(participant.activity_id)
        .bind(participant.email)
        .bind(participant.signed_up_at)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE_PARTICIPANT: &str = r#"
DELETE FROM activity_participants
WHERE id = ?
"#;

pub async fn delete_participant(
    conn: &mut SqliteConnection,
    participant_id: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_PARTICIPANT)
        .bind(participant_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{
        activities_repo::{insert_activity, NewActivity},
        connection::create_memory_pool,
        schema::ensure_schema,
    };
    use crate::error::is_unique_violation;

    async fn activity_with_capacity(conn: &mut SqliteConnection, max: Option<i64>) -> i64 {
        insert_activity(
            conn,
            NewActivity {
                name: "Debate Team",
                description: None,
                schedule: None,
                max_participants: max,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn insert_find_count_and_delete() {
        let pool = create_memory_pool().await.unwrap();
        ensure_schema(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let activity_id = activity_with_capacity(&mut conn, Some(3)).await;

        for email in ["ana@mergington.edu", "ben@mergington.edu"] {
            let n = insert_participant(&mut conn, NewParticipant::signing_up_now(activity_id, email))
                .await
                .unwrap();
            assert_eq!(n, 1);
        }
        assert_eq!(count_participants(&mut conn, activity_id).await.unwrap(), 2);
        assert_eq!(
            list_participant_emails(&mut conn, activity_id).await.unwrap(),
            vec!["ana@mergington.edu", "ben@mergington.edu"]
        );

        let ben = find_participant(&mut conn, activity_id, "ben@mergington.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ben.activity_id, activity_id);
        assert!(ben.signed_up_at.ends_with('Z'));

        assert_eq!(delete_participant(&mut conn, ben.id).await.unwrap(), 1);
        assert_eq!(delete_participant(&mut conn, ben.id).await.unwrap(), 0);
        assert!(find_participant(&mut conn, activity_id, "ben@mergington.edu")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn guarded_insert_refuses_when_full() {
        let pool = create_memory_pool().await.unwrap();
        ensure_schema(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let activity_id = activity_with_capacity(&mut conn, Some(1)).await;

        let first = insert_participant(
            &mut conn,
            NewParticipant::signing_up_now(activity_id, "ana@mergington.edu"),
        )
        .await
        .unwrap();
        let second = insert_participant(
            &mut conn,
            NewParticipant::signing_up_now(activity_id, "ben@mergington.edu"),
        )
        .await
        .unwrap();

        assert_eq!((first, second), (1, 0));
        assert_eq!(count_participants(&mut conn, activity_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn guarded_insert_ignores_unknown_activity() {
        let pool = create_memory_pool().await.unwrap();
        ensure_schema(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let n = insert_participant(&mut conn, NewParticipant::signing_up_now(99, "ana@mergington.edu"))
            .await
            .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn duplicate_email_hits_the_unique_index() {
        let pool = create_memory_pool().await.unwrap();
        ensure_schema(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let activity_id = activity_with_capacity(&mut conn, None).await;

        insert_participant(&mut conn, NewParticipant::signing_up_now(activity_id, "ana@mergington.edu"))
            .await
            .unwrap();
        let err = insert_participant(
            &mut conn,
            NewParticipant::signing_up_now(activity_id, "ana@mergington.edu"),
        )
        .await
        .unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
