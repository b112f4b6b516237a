pub mod partition;
pub mod schedule;
pub mod standings;
pub mod tournament;

pub use crate::domain::model::{
    Fixture, Group, GroupStandings, Legs, MatchResult, Participant, ParticipantId, ResultTable,
    StandingsRow, TimeSlot,
};
pub use crate::domain::ports::{ResultProvider, ResultSource, RosterProvider};
pub use crate::utils::error::Result;
