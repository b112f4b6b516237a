use anyhow::Result;
use fpl_cup::core::{ResultSource, RosterProvider};
use fpl_cup::domain::model::{Legs, Participant, ParticipantId, TimeSlot};
use fpl_cup::{CupError, FplClient, PartitionMode, TournamentEngine, TournamentSettings};
use httpmock::prelude::*;
use serde_json::json;

fn entry(id: u64) -> serde_json::Value {
    json!({
        "entry": id,
        "entry_name": format!("Team {}", id),
        "player_name": format!("Manager {}", id),
        "rank": id,
        "total": 1000 - id
    })
}

fn history(id: u64, gameweeks: u32) -> serde_json::Value {
    let current: Vec<serde_json::Value> = (1..=gameweeks)
        .map(|gw| json!({"event": gw, "points": id * 10 + gw as u64, "total_points": 0}))
        .collect();
    json!({ "current": current, "past": [], "chips": [] })
}

fn mock_league(server: &MockServer, league_id: u64, ids: &[u64]) {
    let (first, second) = ids.split_at(ids.len() / 2);
    let first: Vec<_> = first.iter().copied().map(entry).collect();
    let second: Vec<_> = second.iter().copied().map(entry).collect();

    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/leagues-classic/{}/standings/", league_id))
            .query_param("page_standings", "1");
        then.status(200)
            .json_body(json!({"standings": {"has_next": true, "page": 1, "results": first}}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/leagues-classic/{}/standings/", league_id))
            .query_param("page_standings", "2");
        then.status(200)
            .json_body(json!({"standings": {"has_next": false, "page": 2, "results": second}}));
    });
}

#[tokio::test]
async fn test_roster_follows_pagination() -> Result<()> {
    let server = MockServer::start();
    mock_league(&server, 857, &[1, 2, 3, 4, 5, 6]);

    let client = FplClient::new(server.base_url(), 857);
    let participants = client.participants().await?;

    let ids: Vec<u64> = participants.iter().map(|p| p.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(participants[0].name, "Team 1");
    assert_eq!(participants[0].manager, "Manager 1");
    Ok(())
}

#[tokio::test]
async fn test_unknown_league_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/leagues-classic/404/standings/");
        then.status(404);
    });

    let client = FplClient::new(server.base_url(), 404);
    let err = client.participants().await.unwrap_err();
    assert!(matches!(err, CupError::UnexpectedResponse { status: 404, .. }));
}

#[tokio::test]
async fn test_server_error_is_retryable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/bootstrap-static/");
        then.status(503);
    });

    let client = FplClient::new(server.base_url(), 1);
    let err = client.current_slot().await.unwrap_err();
    assert!(matches!(err, CupError::UnexpectedResponse { status: 503, .. }));
    assert_eq!(err.severity(), fpl_cup::utils::error::ErrorSeverity::Medium);
}

#[tokio::test]
async fn test_current_slot_from_bootstrap() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/bootstrap-static/");
        then.status(200).json_body(json!({
            "events": [
                {"id": 1, "is_current": false, "finished": true},
                {"id": 2, "is_current": true, "finished": false},
                {"id": 3, "is_current": false, "finished": false}
            ]
        }));
    });

    let client = FplClient::new(server.base_url(), 1);
    assert_eq!(client.current_slot().await?, TimeSlot(2));
    Ok(())
}

#[tokio::test]
async fn test_current_slot_falls_back_to_last_finished() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/bootstrap-static/");
        then.status(200).json_body(json!({
            "events": [
                {"id": 37, "is_current": false, "finished": true},
                {"id": 38, "is_current": false, "finished": true}
            ]
        }));
    });

    let client = FplClient::new(server.base_url(), 1);
    assert_eq!(client.current_slot().await?, TimeSlot(38));
    Ok(())
}

#[tokio::test]
async fn test_fetch_results_keeps_requested_gameweeks() -> Result<()> {
    let server = MockServer::start();
    let history_mock = server.mock(|when, then| {
        when.method(GET).path("/entry/7/history/");
        then.status(200).json_body(json!({
            "current": [
                {"event": 1, "points": 50},
                {"event": 2, "points": "??"},
                {"event": 3, "points": 61},
                {"event": 4, "points": 44}
            ]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/entry/8/history/");
        then.status(404);
    });

    let client = FplClient::new(server.base_url(), 1);
    let participants = vec![Participant::new(7, "Seven", "S"), Participant::new(8, "Eight", "E")];
    let table = client
        .fetch_results(&participants, &[TimeSlot(1), TimeSlot(2), TimeSlot(3)])
        .await?;

    history_mock.assert();
    assert_eq!(table.get(ParticipantId(7), TimeSlot(1)), Some(50));
    assert_eq!(table.get(ParticipantId(7), TimeSlot(2)), None);
    assert_eq!(table.get(ParticipantId(7), TimeSlot(3)), Some(61));
    assert_eq!(table.get(ParticipantId(7), TimeSlot(4)), None);
    assert_eq!(table.get(ParticipantId(8), TimeSlot(1)), None);
    Ok(())
}

#[tokio::test]
async fn test_engine_end_to_end_with_mock_api() -> Result<()> {
    let server = MockServer::start();
    let ids = [1u64, 2, 3, 4, 5, 6, 7, 8];
    mock_league(&server, 857, &ids);
    for id in ids {
        server.mock(|when, then| {
            when.method(GET).path(format!("/entry/{}/history/", id));
            then.status(200).json_body(history(id, 3));
        });
    }

    let client = FplClient::new(server.base_url(), 857);
    let settings = TournamentSettings {
        name: "Mock Cup".to_string(),
        group_count: 2,
        legs: Legs::Single,
        slots: vec![TimeSlot(1), TimeSlot(2), TimeSlot(3)],
        mode: PartitionMode::Balanced { seed: None },
    };
    let engine = TournamentEngine::new(client.clone(), client, settings);
    let report = engine.run(Some(TimeSlot(2))).await?;

    assert_eq!(report.current_slot, TimeSlot(2));
    assert_eq!(report.standings.len(), 2);
    for table in &report.standings {
        assert_eq!(table.rows.len(), 4);
        // 兩週、每週每人一場
        assert!(table.rows.iter().all(|r| r.played == 2));
    }

    // 分數 = id * 10 + gw，id 越大必勝
    let group_a = &report.standings[0];
    assert_eq!(group_a.group, "Group A");
    assert_eq!(group_a.rows[0].participant.id, ParticipantId(7));
    assert_eq!(group_a.rows[0].ranking_points, 6);
    Ok(())
}
