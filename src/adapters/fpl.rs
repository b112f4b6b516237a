use crate::domain::model::{Participant, ParticipantId, ResultTable, TimeSlot};
use crate::domain::ports::{ResultSource, RosterProvider};
use crate::utils::error::{CupError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://fantasy.premierleague.com/api";

/// `leagues-classic/{id}/standings/` 的回應，也是離線快照 data.json 的格式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueStandingsResponse {
    pub standings: StandingsPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsPage {
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub page: u32,
    pub results: Vec<LeagueEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueEntry {
    pub entry: u64,
    pub entry_name: String,
    pub player_name: String,
}

impl From<LeagueEntry> for Participant {
    fn from(entry: LeagueEntry) -> Self {
        Participant::new(entry.entry, entry.entry_name, entry.player_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct EntryHistory {
    #[serde(default)]
    current: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct BootstrapStatic {
    events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
struct Event {
    id: u32,
    #[serde(default)]
    is_current: bool,
    #[serde(default)]
    finished: bool,
}

/// 取出 `{ "event": 3, "points": 57, ... }`，格式不對就略過
fn gameweek_points(value: &serde_json::Value) -> Option<(TimeSlot, i64)> {
    let event = value.get("event")?.as_u64()?;
    let points = value.get("points")?.as_i64()?;
    Some((TimeSlot(u32::try_from(event).ok()?), points))
}

#[derive(Debug, Clone)]
pub struct FplClient {
    client: Client,
    base_url: String,
    league_id: u64,
}

impl FplClient {
    pub fn new(base_url: impl Into<String>, league_id: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            league_id,
        }
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        league_id: u64,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            league_id,
        })
    }

    pub fn league_id(&self) -> u64 {
        self.league_id
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let endpoint = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        tracing::debug!("Making API request to: {}", endpoint);
        let response = self.client.get(&endpoint).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CupError::UnexpectedResponse {
                endpoint,
                status: status.as_u16(),
            });
        }
        Ok(Some(response.json::<T>().await?))
    }

    pub async fn league_page(&self, page: u32) -> Result<StandingsPage> {
        let path = format!(
            "/leagues-classic/{}/standings/?page_standings={}",
            self.league_id, page
        );
        match self.get_json::<LeagueStandingsResponse>(&path).await? {
            Some(response) => Ok(response.standings),
            None => Err(CupError::UnexpectedResponse {
                endpoint: path,
                status: 404,
            }),
        }
    }

    /// 某位參賽者每個比賽週的得分；查無此人時回傳空結果
    pub async fn entry_history(&self, id: ParticipantId) -> Result<Vec<(TimeSlot, i64)>> {
        let path = format!("/entry/{}/history/", id);
        let Some(history) = self.get_json::<EntryHistory>(&path).await? else {
            tracing::warn!("No history for entry {}, treating as not played", id);
            return Ok(Vec::new());
        };

        let mut points = Vec::with_capacity(history.current.len());
        for value in &history.current {
            match gameweek_points(value) {
                Some(entry) => points.push(entry),
                None => tracing::warn!("Skipping malformed history row for entry {}", id),
            }
        }
        Ok(points)
    }
}

#[async_trait]
impl RosterProvider for FplClient {
    async fn participants(&self) -> Result<Vec<Participant>> {
        let mut participants = Vec::new();
        let mut page = 1;
        loop {
            let standings = self.league_page(page).await?;
            tracing::debug!(
                "League {} page {}: {} entries",
                self.league_id,
                page,
                standings.results.len()
            );
            participants.extend(standings.results.into_iter().map(Participant::from));
            if !standings.has_next {
                break;
            }
            page += 1;
        }
        Ok(participants)
    }
}

#[async_trait]
impl ResultSource for FplClient {
    async fn fetch_results(
        &self,
        participants: &[Participant],
        slots: &[TimeSlot],
    ) -> Result<ResultTable> {
        let wanted: HashSet<TimeSlot> = slots.iter().copied().collect();
        let mut table = ResultTable::new();
        for participant in participants {
            for (slot, points) in self.entry_history(participant.id).await? {
                if wanted.contains(&slot) {
                    table.insert(participant.id, slot, points);
                }
            }
        }
        Ok(table)
    }

    async fn current_slot(&self) -> Result<TimeSlot> {
        let path = "/bootstrap-static/";
        let bootstrap = self
            .get_json::<BootstrapStatic>(path)
            .await?
            .ok_or_else(|| CupError::UnexpectedResponse {
                endpoint: path.to_string(),
                status: 404,
            })?;

        // 季前沒有 is_current，退而求其次用最後一個已結束的比賽週
        let current = bootstrap
            .events
            .iter()
            .find(|event| event.is_current)
            .or_else(|| bootstrap.events.iter().filter(|e| e.finished).max_by_key(|e| e.id))
            .map(|event| TimeSlot(event.id))
            .ok_or_else(|| CupError::MissingConfigError {
                field: "tournament.current_gameweek".to_string(),
            })?;
        Ok(current)
    }
}
