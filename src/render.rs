use crate::core::schedule::fixtures_by_slot;
use crate::core::tournament::{Tournament, TournamentReport};
use crate::domain::model::GroupStandings;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Tsv,
    Json,
}

#[derive(Debug, Serialize)]
struct StandingsRecord<'a> {
    group: &'a str,
    position: usize,
    team: &'a str,
    manager: &'a str,
    played: u32,
    won: u32,
    drawn: u32,
    lost: u32,
    points_scored: i64,
    points_conceded: i64,
    points_difference: i64,
    ranking_points: u32,
}

#[derive(Debug, Serialize)]
struct FixtureRecord<'a> {
    group: &'a str,
    round: usize,
    gameweek: u32,
    home: &'a str,
    away: &'a str,
}

pub fn render_fixtures(tournament: &Tournament) -> String {
    let mut out = String::new();
    for scheduled in &tournament.groups {
        let _ = writeln!(out, "### {} fixtures", scheduled.group.name);
        for (slot, fixtures) in fixtures_by_slot(&scheduled.fixtures) {
            let _ = writeln!(out, "{}", slot);
            for fixture in fixtures {
                let _ = writeln!(out, "  {} vs {}", fixture.home.name, fixture.away.name);
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_standings(standings: &[GroupStandings]) -> String {
    let mut out = String::new();
    for table in standings {
        let _ = writeln!(out, "### {} (after {})", table.group, table.current_slot);
        if !table.has_played() {
            let _ = writeln!(out, "No matches played yet for {}.", table.group);
        }

        let width = table
            .rows
            .iter()
            .map(|r| r.participant.name.chars().count())
            .max()
            .unwrap_or(4)
            .max(4);
        let _ = writeln!(
            out,
            "{:>3}  {:<width$}  {:>2} {:>2} {:>2} {:>2} {:>6} {:>6} {:>6} {:>4}",
            "#", "Team", "P", "W", "D", "L", "PF", "PA", "Diff", "Pts",
            width = width
        );
        for row in &table.rows {
            let _ = writeln!(
                out,
                "{:>3}  {:<width$}  {:>2} {:>2} {:>2} {:>2} {:>6} {:>6} {:>+6} {:>4}",
                row.position,
                row.participant.name,
                row.played,
                row.won,
                row.drawn,
                row.lost,
                row.points_scored,
                row.points_conceded,
                row.points_difference,
                row.ranking_points,
                width = width
            );
        }
        out.push('\n');
    }
    out
}

fn delimited_writer<W: Write>(writer: W, format: OutputFormat) -> csv::Writer<W> {
    let delimiter = if format == OutputFormat::Tsv { b'\t' } else { b',' };
    csv::WriterBuilder::new().delimiter(delimiter).from_writer(writer)
}

pub fn write_standings_delimited<W: Write>(
    writer: W,
    standings: &[GroupStandings],
    format: OutputFormat,
) -> Result<()> {
    let mut wtr = delimited_writer(writer, format);
    for table in standings {
        for row in &table.rows {
            wtr.serialize(StandingsRecord {
                group: &table.group,
                position: row.position,
                team: &row.participant.name,
                manager: &row.participant.manager,
                played: row.played,
                won: row.won,
                drawn: row.drawn,
                lost: row.lost,
                points_scored: row.points_scored,
                points_conceded: row.points_conceded,
                points_difference: row.points_difference,
                ranking_points: row.ranking_points,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_fixtures_delimited<W: Write>(
    writer: W,
    tournament: &Tournament,
    format: OutputFormat,
) -> Result<()> {
    let mut wtr = delimited_writer(writer, format);
    for fixture in tournament.fixtures() {
        wtr.serialize(FixtureRecord {
            group: &fixture.group,
            round: fixture.round,
            gameweek: fixture.slot.0,
            home: &fixture.home.name,
            away: &fixture.away.name,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// 依輸出格式把完整報告寫出
pub fn write_report<W: Write>(
    mut writer: W,
    report: &TournamentReport,
    format: OutputFormat,
    show_fixtures: bool,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if show_fixtures {
                writer.write_all(render_fixtures(&report.tournament).as_bytes())?;
            }
            writer.write_all(render_standings(&report.standings).as_bytes())?;
        }
        OutputFormat::Csv | OutputFormat::Tsv => {
            if show_fixtures {
                write_fixtures_delimited(&mut writer, &report.tournament, format)?;
                writer.write_all(b"\n")?;
            }
            write_standings_delimited(&mut writer, &report.standings, format)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}
