use sqlx::SqlitePool;
use tracing::info;

use crate::database::activities_repo::{self, NewActivity};
use crate::database::participants_repo::{self, NewParticipant};

pub struct SeedActivity {
    pub name: &'static str,
    pub description: &'static str,
    pub schedule: &'static str,
    pub max_participants: i64,
    pub participants: &'static [&'static str],
}

pub const SAMPLE_ACTIVITIES: &[SeedActivity] = &[
    SeedActivity {
        name: "Chess Club",
        description: "Learn strategies and compete in chess tournaments",
        schedule: "Fridays, 3:30 PM - 5:00 PM",
        max_participants: 12,
        participants: &["michael@mergington.edu", "daniel@mergington.edu"],
    },
    SeedActivity {
        name: "Programming Class",
        description: "Learn programming fundamentals and build software projects",
        schedule: "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
        max_participants: 20,
        participants: &["emma@mergington.edu", "sophia@mergington.edu"],
    },
    SeedActivity {
        name: "Gym Class",
        description: "Physical education and sports activities",
        schedule: "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
        max_participants: 30,
        participants: &["john@mergington.edu", "olivia@mergington.edu"],
    },
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: bool,
    pub activities: usize,
    pub participants: usize,
}

/// Inserts [`SAMPLE_ACTIVITIES`] unless the store already holds any activity.
/// Everything lands in one transaction.
pub async fn seed_if_empty(pool: &SqlitePool) -> sqlx::Result<SeedReport> {
    let mut tx = pool.begin().await?;

    if activities_repo::any_activity_exists(&mut tx).await? {
        info!("database already seeded");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport {
        seeded: true,
        ..Default::default()
    };
    for sample in SAMPLE_ACTIVITIES {
        let activity_id = activities_repo::insert_activity(
            &mut tx,
            NewActivity {
                name: sample.name,
                description: Some(sample.description),
                schedule: Some(sample.schedule),
                max_participants: Some(sample.max_participants),
            },
        )
        .await?;
        report.activities += 1;

        for email in sample.participants {
            report.participants += participants_repo::insert_participant(
                &mut tx,
                NewParticipant::signing_up_now(activity_id, email),
            )
            .await? as usize;
        }
    }

    tx.commit().await?;
    info!(
        activities = report.activities,
        participants = report.participants,
        "seeded database with sample activities"
    );
    Ok(report)
}
