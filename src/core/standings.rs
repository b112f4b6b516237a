use crate::domain::model::{
    Fixture, Group, GroupStandings, MatchResult, Outcome, ParticipantId, StandingsRow, TimeSlot,
};
use crate::domain::ports::ResultProvider;
use std::collections::HashMap;

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

/// 已完賽才有結果：比賽週不晚於 `current_slot` 且雙方分數都已提供
pub fn result_for<R: ResultProvider + ?Sized>(
    fixture: &Fixture,
    results: &R,
    current_slot: TimeSlot,
) -> Option<MatchResult> {
    if fixture.slot > current_slot {
        return None;
    }
    let home_score = results.score(fixture.home.id, fixture.slot)?;
    let away_score = results.score(fixture.away.id, fixture.slot)?;
    Some(MatchResult {
        home_score,
        away_score,
    })
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    played: u32,
    won: u32,
    drawn: u32,
    lost: u32,
    scored: i64,
    conceded: i64,
}

impl Tally {
    /// `result` 以此參賽者為主隊的角度
    fn record(&mut self, result: MatchResult) {
        self.played += 1;
        self.scored += result.home_score;
        self.conceded += result.away_score;
        match result.outcome() {
            Outcome::HomeWin => self.won += 1,
            Outcome::Draw => self.drawn += 1,
            Outcome::AwayWin => self.lost += 1,
        }
    }

    fn ranking_points(&self) -> u32 {
        self.won * POINTS_FOR_WIN + self.drawn * POINTS_FOR_DRAW
    }
}

/// 每次都從頭計算整組積分榜。
///
/// Rows are ordered by ranking points, then points difference, then points
/// scored, all descending. Anything still tied keeps group member order.
pub fn compute_standings<R: ResultProvider + ?Sized>(
    group: &Group,
    fixtures: &[Fixture],
    results: &R,
    current_slot: TimeSlot,
) -> Vec<StandingsRow> {
    let mut tallies: HashMap<ParticipantId, Tally> =
        group.members.iter().map(|p| (p.id, Tally::default())).collect();

    let mut completed = 0usize;
    for fixture in fixtures {
        if !(group.contains(fixture.home.id) && group.contains(fixture.away.id)) {
            tracing::debug!(
                "Skipping fixture {} v {} outside {}",
                fixture.home.id,
                fixture.away.id,
                group.name
            );
            continue;
        }
        let Some(result) = result_for(fixture, results, current_slot) else {
            continue;
        };

        if let Some(home) = tallies.get_mut(&fixture.home.id) {
            home.record(result);
        }
        if let Some(away) = tallies.get_mut(&fixture.away.id) {
            away.record(result.reversed());
        }
        completed += 1;
    }
    tracing::debug!(
        "{}: {} of {} fixtures completed by {}",
        group.name,
        completed,
        fixtures.len(),
        current_slot
    );

    let mut rows: Vec<StandingsRow> = group
        .members
        .iter()
        .map(|participant| {
            let tally = tallies.get(&participant.id).copied().unwrap_or_default();
            StandingsRow {
                position: 0,
                participant: participant.clone(),
                played: tally.played,
                won: tally.won,
                drawn: tally.drawn,
                lost: tally.lost,
                points_scored: tally.scored,
                points_conceded: tally.conceded,
                points_difference: tally.scored - tally.conceded,
                ranking_points: tally.ranking_points(),
            }
        })
        .collect();

    // sort_by 是穩定排序，完全同分時保留原始順序
    rows.sort_by(|a, b| {
        b.ranking_points
            .cmp(&a.ranking_points)
            .then(b.points_difference.cmp(&a.points_difference))
            .then(b.points_scored.cmp(&a.points_scored))
    });
    for (index, row) in rows.iter_mut().enumerate() {
        row.position = index + 1;
    }
    rows
}

pub fn compute_group_standings<R: ResultProvider + ?Sized>(
    group: &Group,
    fixtures: &[Fixture],
    results: &R,
    current_slot: TimeSlot,
) -> GroupStandings {
    GroupStandings {
        group: group.name.clone(),
        current_slot,
        rows: compute_standings(group, fixtures, results, current_slot),
    }
}
