use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::utils::error::{CupError, Result};

/// 參賽者的穩定識別碼（FPL 的 entry id）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Equality and hashing only look at `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub manager: String,
}

impl Participant {
    pub fn new(id: u64, name: impl Into<String>, manager: impl Into<String>) -> Self {
        Self {
            id: ParticipantId(id),
            name: name.into(),
            manager: manager.into(),
        }
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Participant {}

impl Hash for Participant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub members: Vec<Participant>,
}

impl Group {
    pub fn new(name: impl Into<String>, members: Vec<Participant>) -> Result<Self> {
        let name = name.into();
        if members.is_empty() {
            return Err(CupError::validation(format!("group '{}' has no members", name)));
        }
        // 重複成員會排出自己對自己的比賽
        let mut seen = HashSet::with_capacity(members.len());
        if let Some(duplicate) = members.iter().find(|p| !seen.insert(p.id)) {
            return Err(CupError::validation(format!(
                "participant {} ({}) appears more than once in group '{}'",
                duplicate.id, duplicate.name, name
            )));
        }
        Ok(Self { name, members })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.members.iter().any(|p| p.id == id)
    }
}

/// 一個比賽週（gameweek）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlot(pub u32);

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GW{}", self.0)
    }
}

impl From<u32> for TimeSlot {
    fn from(value: u32) -> Self {
        TimeSlot(value)
    }
}

/// How many times each pair of group members meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Legs {
    Single,
    Double,
}

impl Legs {
    pub fn count(self) -> usize {
        match self {
            Legs::Single => 1,
            Legs::Double => 2,
        }
    }
}

impl TryFrom<u8> for Legs {
    type Error = CupError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Legs::Single),
            2 => Ok(Legs::Double),
            other => Err(CupError::validation(format!(
                "matches per opponent must be 1 or 2, got {}",
                other
            ))),
        }
    }
}

impl From<Legs> for u8 {
    fn from(legs: Legs) -> Self {
        legs.count() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub group: String,
    /// 1-based round number within the group's schedule
    pub round: usize,
    pub slot: TimeSlot,
    pub home: Participant,
    pub away: Participant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_score: i64,
    pub away_score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl MatchResult {
    pub fn outcome(&self) -> Outcome {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::AwayWin,
        }
    }

    /// Same match seen from the away side.
    pub fn reversed(&self) -> Self {
        Self {
            home_score: self.away_score,
            away_score: self.home_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub position: usize,
    pub participant: Participant,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub points_scored: i64,
    pub points_conceded: i64,
    pub points_difference: i64,
    pub ranking_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStandings {
    pub group: String,
    pub current_slot: TimeSlot,
    pub rows: Vec<StandingsRow>,
}

impl GroupStandings {
    pub fn has_played(&self) -> bool {
        self.rows.iter().any(|row| row.played > 0)
    }
}

/// 參賽者 -> 比賽週 -> 分數
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    scores: HashMap<ParticipantId, BTreeMap<TimeSlot, i64>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ParticipantId, slot: TimeSlot, score: i64) {
        self.scores.entry(id).or_default().insert(slot, score);
    }

    pub fn get(&self, id: ParticipantId, slot: TimeSlot) -> Option<i64> {
        self.scores.get(&id).and_then(|slots| slots.get(&slot)).copied()
    }

    /// 有成績的最晚比賽週
    pub fn latest_slot(&self) -> Option<TimeSlot> {
        self.scores
            .values()
            .filter_map(|slots| slots.keys().next_back())
            .max()
            .copied()
    }

    pub fn len(&self) -> usize {
        self.scores.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
