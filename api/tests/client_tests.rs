use frenzy_api::client::{ApiError, FrenzyApi};
use frenzy_api::{PickSubmission, Session};
use serde_json::json;

fn session() -> Session {
    Session { user_id: 7, token: "test-token".into() }
}

#[tokio::test]
async fn current_week_handles_nested_payloads_and_defaults_to_one() {
    let mut server = mockito::Server::new_async().await;
    let api = FrenzyApi::new(server.url());

    let m = server
        .mock("GET", "/admin/current_week")
        .with_body(json!({ "current_week": { "week_number": 6 } }).to_string())
        .create_async()
        .await;
    assert_eq!(api.fetch_current_week().await, 6);
    m.assert_async().await;

    let _m = server
        .mock("GET", "/admin/current_week")
        .with_status(500)
        .create_async()
        .await;
    assert_eq!(api.fetch_current_week().await, 1);
}

#[tokio::test]
async fn games_normalize_legacy_kickoff_fields() {
    let mut server = mockito::Server::new_async().await;
    let api = FrenzyApi::new(server.url());

    let _m = server
        .mock("GET", "/games/week/3")
        .with_body(
            json!([
                { "id": 1, "home_team": "Bears", "away_team": "Lions",
                  "start_time": "2024-09-22T17:00:00Z", "favorite": "Lions" },
                { "id": 2, "home_team": "Jets", "away_team": "Bills",
                  "kickoff_time": "not a date" }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let games = api.fetch_games(3).await.unwrap();
    assert_eq!(games.len(), 2);
    assert!(games[0].kickoff.is_some());
    assert_eq!(games[1].kickoff, None);
    assert_eq!(games[0].favorite.as_deref(), Some("Lions"));
}

#[tokio::test]
async fn week_pick_is_none_when_no_pick_exists() {
    let mut server = mockito::Server::new_async().await;
    let api = FrenzyApi::new(server.url());

    let _m = server
        .mock("GET", "/picks/week/2/private?user_id=7")
        .match_header("authorization", "Bearer test-token")
        .with_body("[]")
        .create_async()
        .await;

    let pick = api.fetch_week_pick(&session(), 2).await.unwrap();
    assert!(pick.is_none());
}

#[tokio::test]
async fn weekly_board_overlays_public_picks_without_clobbering_scores() {
    let mut server = mockito::Server::new_async().await;
    let api = FrenzyApi::new(server.url());

    let _board = server
        .mock("GET", "/leaderboard/week/3")
        .with_body(
            json!({
                "week": 3,
                "locked": false,
                "unlock_at_iso": "2020-01-05T17:00:00Z",
                "rows": [
                    { "user_id": 1, "display_name": "Amy", "total_points": 3 },
                    { "user_id": 2, "display_name": "Bob", "team": "Jets", "total_points": 1 }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _public = server
        .mock("GET", "/picks/week/3/public")
        .with_body(
            json!({
                "picks": [
                    { "user_id": 1, "first_name": "Amy", "team_pick": "Bears", "gotw_guess": 41 },
                    { "user_id": 2, "first_name": "Bob", "team_pick": "Packers" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (board, reveal) = api.load_weekly_board(3, false).await.unwrap();
    // unlock instant long past: reveal open
    assert!(!reveal.locked);
    let amy = board.rows.iter().find(|r| r.user_id == Some(1)).unwrap();
    assert_eq!(amy.team.as_deref(), Some("Bears"));
    assert_eq!(amy.gotw_prediction, Some(41));
    assert_eq!(amy.total_points, Some(3));
    // Bob's scored team is authoritative; the overlay must not replace it
    let bob = board.rows.iter().find(|r| r.user_id == Some(2)).unwrap();
    assert_eq!(bob.team.as_deref(), Some("Jets"));
}

#[tokio::test]
async fn weekly_board_falls_back_to_public_only_rows() {
    let mut server = mockito::Server::new_async().await;
    let api = FrenzyApi::new(server.url());

    let _board = server
        .mock("GET", "/leaderboard/week/5")
        .with_status(500)
        .create_async()
        .await;
    let _public = server
        .mock("GET", "/picks/week/5/public")
        .with_body(
            json!({
                "locked": true,
                "picks": [ { "first_name": "Amy" }, { "first_name": "Bob" } ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _games = server
        .mock("GET", "/games/week/5")
        .with_body("[]")
        .create_async()
        .await;

    let (board, reveal) = api.load_weekly_board(5, false).await.unwrap();
    assert_eq!(board.rows.len(), 2);
    assert_eq!(board.rows[0].total_points, None);
    // server-locked with no computable instant: locked indefinitely
    assert!(reveal.locked);
    assert_eq!(reveal.unlock_at, None);
}

#[tokio::test]
async fn weekly_board_errors_only_when_every_source_fails() {
    let mut server = mockito::Server::new_async().await;
    let api = FrenzyApi::new(server.url());

    let _board = server
        .mock("GET", "/leaderboard/week/9")
        .with_status(500)
        .create_async()
        .await;
    let _public = server
        .mock("GET", "/picks/week/9/public")
        .with_status(500)
        .create_async()
        .await;

    assert!(api.load_weekly_board(9, false).await.is_err());
}

#[tokio::test]
async fn qa_flag_is_forwarded_and_unlocks() {
    let mut server = mockito::Server::new_async().await;
    let api = FrenzyApi::new(server.url());

    let _board = server
        .mock("GET", "/leaderboard/week/3?qa=1")
        .with_body(
            json!({ "week": 3, "locked": true, "qa_mode": true, "rows": [] }).to_string(),
        )
        .create_async()
        .await;
    let _games = server
        .mock("GET", "/games/week/3")
        .with_body("[]")
        .create_async()
        .await;

    let (board, reveal) = api.load_weekly_board(3, true).await.unwrap();
    assert!(board.qa_mode);
    assert!(!reveal.locked, "QA override must beat the server lock flag");
}

#[tokio::test]
async fn submission_rejection_surfaces_the_backend_message() {
    let mut server = mockito::Server::new_async().await;
    let api = FrenzyApi::new(server.url());

    let _m = server
        .mock("POST", "/picks/submit")
        .match_header("authorization", "Bearer test-token")
        .with_status(400)
        .with_body(json!({ "error": "You already used Bears this season." }).to_string())
        .create_async()
        .await;

    let submission = PickSubmission {
        user_id: 7,
        week: 2,
        team: "Bears".into(),
        gotw_prediction: Some(41),
        potw_prediction: None,
    };
    match api.submit_pick(&session(), &submission).await {
        Err(ApiError::Rejected(msg)) => assert!(msg.contains("already used Bears")),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn overall_standings_tolerate_an_empty_result() {
    let mut server = mockito::Server::new_async().await;
    let api = FrenzyApi::new(server.url());

    let _m = server
        .mock("GET", "/leaderboard/overall")
        .with_body(json!({ "standings": [] }).to_string())
        .create_async()
        .await;
    assert!(api.fetch_overall().await.unwrap().is_empty());
}
