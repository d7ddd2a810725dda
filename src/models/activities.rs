#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ActivityRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub schedule: Option<String>,
    // NULL means unlimited.
    pub max_participants: Option<i64>,
}

impl ActivityRow {
    pub fn is_full(&self, participant_count: i64) -> bool {
        self.max_participants
            .is_some_and(|max| participant_count >= max)
    }
}
