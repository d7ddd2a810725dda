use serde::{ser::SerializeMap, Serialize, Serializer};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::database::activities_repo;
use crate::database::participants_repo::{self, NewParticipant};
use crate::error::{is_unique_violation, AppError};

pub const ACTIVITY_NOT_FOUND: &str = "Activity not found";
pub const ACTIVITY_FULL: &str = "Activity is full";
pub const ALREADY_SIGNED_UP: &str = "Student is already signed up";
pub const NOT_SIGNED_UP: &str = "Student is not signed up for this activity";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityView {
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub max_participants: Option<i64>,
    pub participants: Vec<String>,
}

/// Activities keyed by name, kept in the order they were created.
/// Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitiesListing {
    entries: Vec<(String, ActivityView)>,
}

impl ActivitiesListing {
    /// A repeated name replaces the earlier value but keeps its position.
    pub fn insert(&mut self, name: String, view: ActivityView) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = view,
            None => self.entries.push((name, view)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
impl ActivitiesListing {
    pub fn get(&self, name: &str) -> Option<&ActivityView> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, view)| view)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for ActivitiesListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, view) in &self.entries {
            map.serialize_entry(name, view)?;
        }
        map.end()
    }
}

pub async fn list_activities(pool: &SqlitePool) -> Result<ActivitiesListing, AppError> {
    let mut conn = pool.acquire().await?;
    let activities = activities_repo::list_activities(&mut conn).await?;

    let mut listing = ActivitiesListing::default();
    for activity in activities {
        let participants = participants_repo::list_participant_emails(&mut conn, activity.id).await?;
        listing.insert(
            activity.name,
            ActivityView {
                description: activity.description,
                schedule: activity.schedule,
                max_participants: activity.max_participants,
                participants,
            },
        );
    }
    Ok(listing)
}

pub async fn signup(pool: &SqlitePool, activity_name: &str, email: &str) -> Result<String, AppError> {
    let mut conn = pool.acquire().await?;

    let Some(activity) = activities_repo::find_activity_by_name(&mut conn, activity_name).await? else {
        return Err(AppError::NotFound(ACTIVITY_NOT_FOUND.to_string()));
    };

    let current = participants_repo::count_participants(&mut conn, activity.id).await?;
    if activity.is_full(current) {
        debug!(activity = activity_name, current, "signup rejected: activity full");
        return Err(AppError::Conflict(ACTIVITY_FULL.to_string()));
    }

    if participants_repo::find_participant(&mut conn, activity.id, email)
        .await?
        .is_some()
    {
        debug!(activity = activity_name, email, "signup rejected: already signed up");
        return Err(AppError::BadRequest(ALREADY_SIGNED_UP.to_string()));
    }

    let inserted = match participants_repo::insert_participant(
        &mut conn,
        NewParticipant::signing_up_now(activity.id, email),
    )
    .await
    {
        Ok(n) => n,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::BadRequest(ALREADY_SIGNED_UP.to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    // Lost the race for the last seat after the count above.
    if inserted == 0 {
        return Err(AppError::Conflict(ACTIVITY_FULL.to_string()));
    }

    info!(activity = activity_name, email, "student signed up");
    Ok(format!("Signed up {email} for {activity_name}"))
}

pub async fn unregister(
    pool: &SqlitePool,
    activity_name: &str,
    email: &str,
) -> Result<String, AppError> {
    let mut conn = pool.acquire().await?;

    let Some(activity) = activities_repo::find_activity_by_name(&mut conn, activity_name).await? else {
        return Err(AppError::NotFound(ACTIVITY_NOT_FOUND.to_string()));
    };

    let Some(participant) = participants_repo::find_participant(&mut conn, activity.id, email).await?
    else {
        debug!(activity = activity_name, email, "unregister rejected: not signed up");
        return Err(AppError::BadRequest(NOT_SIGNED_UP.to_string()));
    };

    if participants_repo::delete_participant(&mut conn, participant.id).await? == 0 {
        return Err(AppError::BadRequest(NOT_SIGNED_UP.to_string()));
    }

    info!(activity = activity_name, email, "student unregistered");
    Ok(format!("Unregistered {email} from {activity_name}"))
}
