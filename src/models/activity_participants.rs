// One signup of a student (by email) for one activity.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ActivityParticipantRow {
    pub id: i64,
    pub activity_id: i64,
    pub email: String,
    pub signed_up_at: String,
}
