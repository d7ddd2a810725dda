pub mod activities;
pub mod activity_participants;

pub use activities::ActivityRow;
pub use activity_participants::ActivityParticipantRow;
