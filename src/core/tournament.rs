use crate::core::partition::{partition_groups, PartitionMode};
use crate::core::schedule::generate_schedule;
use crate::core::standings::compute_group_standings;
use crate::domain::model::{Fixture, Group, GroupStandings, Legs, Participant, TimeSlot};
use crate::domain::ports::{ResultProvider, ResultSource, RosterProvider};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentSettings {
    pub name: String,
    pub group_count: usize,
    pub legs: Legs,
    pub slots: Vec<TimeSlot>,
    pub mode: PartitionMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledGroup {
    pub group: Group,
    pub fixtures: Vec<Fixture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tournament {
    pub name: String,
    pub groups: Vec<ScheduledGroup>,
}

impl Tournament {
    /// 分組並排出所有組別的賽程；任何一組失敗就整體失敗
    pub fn build(participants: &[Participant], settings: &TournamentSettings) -> Result<Self> {
        let groups = partition_groups(participants, settings.group_count, &settings.mode)?;

        let groups = groups
            .into_iter()
            .map(|group| {
                let fixtures = generate_schedule(&group, settings.legs, &settings.slots)?;
                Ok(ScheduledGroup { group, fixtures })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "🗓️ {}: {} groups, {} fixtures",
            settings.name,
            groups.len(),
            groups.iter().map(|g| g.fixtures.len()).sum::<usize>()
        );

        Ok(Self {
            name: settings.name.clone(),
            groups,
        })
    }

    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.groups.iter().flat_map(|g| g.fixtures.iter())
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.groups.iter().flat_map(|g| g.group.members.iter())
    }

    /// Gameweeks that actually host a fixture, ascending.
    pub fn scheduled_slots(&self) -> Vec<TimeSlot> {
        self.fixtures()
            .map(|f| f.slot)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn standings<R: ResultProvider + ?Sized>(
        &self,
        results: &R,
        current_slot: TimeSlot,
    ) -> Vec<GroupStandings> {
        self.groups
            .iter()
            .map(|g| compute_group_standings(&g.group, &g.fixtures, results, current_slot))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TournamentReport {
    pub tournament: Tournament,
    pub current_slot: TimeSlot,
    pub standings: Vec<GroupStandings>,
}

pub struct TournamentEngine<P: RosterProvider, S: ResultSource> {
    roster: P,
    results: S,
    settings: TournamentSettings,
}

impl<P: RosterProvider, S: ResultSource> TournamentEngine<P, S> {
    pub fn new(roster: P, results: S, settings: TournamentSettings) -> Self {
        Self {
            roster,
            results,
            settings,
        }
    }

    pub fn settings(&self) -> &TournamentSettings {
        &self.settings
    }

    pub async fn draw(&self) -> Result<Tournament> {
        tracing::info!("👥 Fetching roster...");
        let participants = self.roster.participants().await?;
        tracing::info!("👥 Fetched {} participants", participants.len());

        Tournament::build(&participants, &self.settings)
    }

    /// `current_slot` 為 None 時向資料來源詢問目前的比賽週
    pub async fn run(&self, current_slot: Option<TimeSlot>) -> Result<TournamentReport> {
        let tournament = self.draw().await?;

        let current_slot = match current_slot {
            Some(slot) => slot,
            None => self.results.current_slot().await?,
        };
        tracing::info!("📅 Standings cutoff: {}", current_slot);

        let slots: Vec<TimeSlot> = tournament
            .scheduled_slots()
            .into_iter()
            .filter(|slot| *slot <= current_slot)
            .collect();
        let participants: Vec<Participant> = tournament.participants().cloned().collect();

        let results = if slots.is_empty() {
            tracing::info!("No scheduled gameweek has started yet, skipping result fetch");
            Default::default()
        } else {
            tracing::info!("📥 Fetching results for {} gameweeks...", slots.len());
            self.results.fetch_results(&participants, &slots).await?
        };
        tracing::debug!("Fetched {} scores", results.len());

        let standings = tournament.standings(&results, current_slot);
        Ok(TournamentReport {
            tournament,
            current_slot,
            standings,
        })
    }
}
