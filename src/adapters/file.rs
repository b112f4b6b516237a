use crate::adapters::fpl::LeagueStandingsResponse;
use crate::domain::model::{Participant, ParticipantId, ResultTable, TimeSlot};
use crate::domain::ports::{ResultSource, RosterProvider};
use crate::utils::error::{CupError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

/// 從存檔的聯賽排名 JSON（data.json）讀取名單
#[derive(Debug, Clone)]
pub struct LeagueSnapshot {
    path: PathBuf,
}

impl LeagueSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

pub fn parse_league_snapshot(content: &str) -> Result<Vec<Participant>> {
    let snapshot: LeagueStandingsResponse = serde_json::from_str(content)?;
    Ok(snapshot
        .standings
        .results
        .into_iter()
        .map(Participant::from)
        .collect())
}

#[async_trait]
impl RosterProvider for LeagueSnapshot {
    async fn participants(&self) -> Result<Vec<Participant>> {
        tracing::debug!("Reading league snapshot from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_league_snapshot(&content)
    }
}

/// `{ "<entry id>": { "<gameweek>": points } }`
///
/// Entries that do not parse are skipped with a warning, they simply count
/// as not played yet.
pub fn parse_results(content: &str) -> Result<ResultTable> {
    let raw: HashMap<String, serde_json::Value> = serde_json::from_str(content)?;

    let mut table = ResultTable::new();
    for (entry, value) in raw {
        let Ok(id) = entry.trim().parse::<u64>() else {
            tracing::warn!("Skipping results for invalid entry id '{}'", entry);
            continue;
        };
        let serde_json::Value::Object(gameweeks) = value else {
            tracing::warn!("Skipping results for entry {}: expected an object, got {}", id, value);
            continue;
        };
        for (gameweek, value) in gameweeks {
            match (gameweek.trim().parse::<u32>(), value.as_i64()) {
                (Ok(slot), Some(points)) => table.insert(ParticipantId(id), TimeSlot(slot), points),
                _ => tracing::warn!(
                    "Skipping malformed score for entry {} gameweek '{}': {}",
                    id,
                    gameweek,
                    value
                ),
            }
        }
    }
    Ok(table)
}

#[derive(Debug, Clone)]
pub struct ResultsFile {
    path: PathBuf,
    current: Option<TimeSlot>,
}

impl ResultsFile {
    pub fn new(path: impl Into<PathBuf>, current: Option<TimeSlot>) -> Self {
        Self {
            path: path.into(),
            current,
        }
    }

    async fn load(&self) -> Result<ResultTable> {
        tracing::debug!("Reading results from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_results(&content)
    }
}

#[async_trait]
impl ResultSource for ResultsFile {
    async fn fetch_results(
        &self,
        participants: &[Participant],
        slots: &[TimeSlot],
    ) -> Result<ResultTable> {
        let all = self.load().await?;
        let mut table = ResultTable::new();
        for participant in participants {
            for slot in slots {
                if let Some(points) = all.get(participant.id, *slot) {
                    table.insert(participant.id, *slot, points);
                }
            }
        }
        Ok(table)
    }

    /// 沒指定時取檔案裡最晚有成績的比賽週
    async fn current_slot(&self) -> Result<TimeSlot> {
        if let Some(current) = self.current {
            return Ok(current);
        }
        self.load()
            .await?
            .latest_slot()
            .ok_or_else(|| CupError::MissingConfigError {
                field: "tournament.current_gameweek".to_string(),
            })
    }
}
