//! End-to-end scenarios from spec.md §8, driven through the dispatcher's
//! public API against an in-process `GameServer` — no real TCP socket,
//! channels stand in for the WebSocket transport.
//!
//! The host connection joins both `game-<pin>` and `host-<pin>` (spec.md
//! §4.4's `host:create-game` row), so any event whose broadcast side-effect
//! targets `game-<pin>` lands in the host's channel *twice*: once as the
//! broadcast, once as the direct reply to the event it initiated. Tests
//! below drain both where that applies.


use serde_json::json;
use test_helpers::{connect, create_test_server, sample_question, send};

fn data_of(frame: &trivia_server::protocol::messages::OutboundFrame) -> &serde_json::Value {
    &frame.data
}

/// S1 — happy path: host creates, two teams join, one question, both
/// submit, host reveals, host advances past the last question.
#[tokio::test]
async fn s1_happy_path_end_to_end() {
    let server = create_test_server();

    let mut host = connect(&server);
    send(&server, &host, "host:create-game", json!({ "hostName": "Alex" })).await;
    let create_reply = host.recv();
    let pin = data_of(&create_reply)["pin"].as_str().unwrap().to_string();
    assert_eq!(data_of(&create_reply)["success"], json!(true));

    let mut team_a = connect(&server);
    send(
        &server,
        &team_a,
        "team:join",
        json!({ "pin": pin, "teamName": "Pandas" }),
    )
    .await;
    let join_a_reply = team_a.recv();
    assert_eq!(data_of(&join_a_reply)["success"], json!(true));
    let team_a_id = data_of(&join_a_reply)["teamId"].as_str().unwrap().to_string();
    assert_eq!(host.recv().event, "team:joined");

    let mut team_b = connect(&server);
    send(
        &server,
        &team_b,
        "team:join",
        json!({ "pin": pin, "teamName": "Wolves" }),
    )
    .await;
    let join_b_reply = team_b.recv();
    assert_eq!(data_of(&join_b_reply)["success"], json!(true));
    let team_b_id = data_of(&join_b_reply)["teamId"].as_str().unwrap().to_string();
    assert_eq!(host.recv().event, "team:joined");

    send(
        &server,
        &host,
        "host:add-question",
        json!({ "pin": pin, "question": sample_question() }),
    )
    .await;
    let add_q_reply = host.recv();
    assert_eq!(data_of(&add_q_reply)["totalQuestions"], json!(1));

    send(&server, &host, "host:start-game", json!({ "pin": pin })).await;
    let started_a = team_a.recv();
    let started_b = team_b.recv();
    let started_host_broadcast = host.recv();
    let started_host_ack = host.recv();
    assert_eq!(data_of(&started_host_ack)["success"], json!(true));
    for started in [&started_a, &started_b, &started_host_broadcast] {
        assert_eq!(started.event, "game:started");
        let question = &data_of(started)["question"];
        assert_eq!(question["questionNumber"], json!(1));
        assert_eq!(question["totalQuestions"], json!(1));
        assert!(question.get("correctAnswer").is_none());
    }

    send(
        &server,
        &team_a,
        "team:submit-answer",
        json!({ "pin": pin, "teamId": team_a_id, "answer": 1 }),
    )
    .await;
    let submit_a_reply = team_a.recv();
    assert_eq!(data_of(&submit_a_reply)["success"], json!(true));
    assert_eq!(data_of(&submit_a_reply)["submitted"], json!(true));
    assert!(data_of(&submit_a_reply).get("correct").is_none());
    let submitted_broadcast = host.recv();
    assert_eq!(submitted_broadcast.event, "answer:submitted");

    send(
        &server,
        &team_b,
        "team:submit-answer",
        json!({ "pin": pin, "teamId": team_b_id, "answer": 2 }),
    )
    .await;
    team_b.recv(); // reply
    host.recv(); // answer:submitted broadcast

    send(&server, &host, "host:reveal-answer", json!({ "pin": pin })).await;
    let revealed_a = team_a.recv();
    let revealed_b = team_b.recv();
    let revealed_host_broadcast = host.recv();
    let revealed_host_reply = host.recv();
    for revealed in [&revealed_a, &revealed_b, &revealed_host_broadcast] {
        assert_eq!(revealed.event, "answer:revealed");
        assert_eq!(data_of(revealed)["correctAnswer"], json!(1));
    }
    assert_eq!(data_of(&revealed_host_reply)["success"], json!(true));
    let leaderboard = data_of(&revealed_host_reply)["leaderboard"].as_array().unwrap();
    assert_eq!(leaderboard.len(), 2);
    // Pandas submitted option 1 (the correct index), Wolves submitted 2.
    let pandas = leaderboard
        .iter()
        .find(|e| e["teamName"] == json!("Pandas"))
        .unwrap();
    assert!(pandas["score"].as_u64().unwrap() >= 100);
    let wolves = leaderboard
        .iter()
        .find(|e| e["teamName"] == json!("Wolves"))
        .unwrap();
    assert_eq!(wolves["score"], json!(0));

    send(&server, &host, "host:next-question", json!({ "pin": pin })).await;
    let ended_a = team_a.recv();
    let ended_host_broadcast = host.recv();
    let ended_host_reply = host.recv();
    assert_eq!(ended_a.event, "game:ended");
    assert_eq!(ended_host_broadcast.event, "game:ended");
    assert_eq!(data_of(&ended_host_reply)["ended"], json!(true));
}

/// S2 — unknown PIN.
#[tokio::test]
async fn s2_unknown_pin_is_rejected() {
    let server = create_test_server();
    let mut team = connect(&server);
    send(
        &server,
        &team,
        "team:join",
        json!({ "pin": "0000", "teamName": "Ghosts" }),
    )
    .await;
    let reply = team.recv();
    assert_eq!(data_of(&reply)["success"], json!(false));
    assert_eq!(data_of(&reply)["error"], json!("game not found"));
}

/// S3 — join after start.
#[tokio::test]
async fn s3_join_after_start_is_rejected() {
    let server = create_test_server();
    let mut host = connect(&server);
    send(&server, &host, "host:create-game", json!({ "hostName": "Alex" })).await;
    let pin = data_of(&host.recv())["pin"].as_str().unwrap().to_string();

    send(
        &server,
        &host,
        "host:add-question",
        json!({ "pin": pin, "question": sample_question() }),
    )
    .await;
    host.recv();
    send(&server, &host, "host:start-game", json!({ "pin": pin })).await;
    host.recv(); // game:started broadcast (host is in game-<pin>)
    host.recv(); // direct reply

    let mut late_team = connect(&server);
    send(
        &server,
        &late_team,
        "team:join",
        json!({ "pin": pin, "teamName": "Latecomers" }),
    )
    .await;
    let reply = late_team.recv();
    assert_eq!(data_of(&reply)["success"], json!(false));
    assert_eq!(data_of(&reply)["error"], json!("game already started"));
}

/// S4 — disconnect in lobby empties the session.
#[tokio::test]
async fn s4_disconnect_in_lobby_evicts_session() {
    let server = create_test_server();
    let mut host = connect(&server);
    send(&server, &host, "host:create-game", json!({ "hostName": "Alex" })).await;
    let pin = data_of(&host.recv())["pin"].as_str().unwrap().to_string();

    let team = connect(&server);
    send(
        &server,
        &team,
        "team:join",
        json!({ "pin": pin, "teamName": "Solo" }),
    )
    .await;
    host.recv(); // team:joined

    server.handle_disconnect(team.connection_id).await;

    let left = host.recv();
    assert_eq!(left.event, "team:left");
    assert_eq!(data_of(&left)["totalTeams"], json!(0));

    let mut late_joiner = connect(&server);
    send(
        &server,
        &late_joiner,
        "team:join",
        json!({ "pin": pin, "teamName": "TooLate" }),
    )
    .await;
    let reply = late_joiner.recv();
    assert_eq!(data_of(&reply)["success"], json!(false));
    assert_eq!(data_of(&reply)["error"], json!("game not found"));
}

/// Disconnect mid-game: spec.md §5 only calls for a `team:left` broadcast
/// "for each removal in a session still in `lobby`" — past lobby, the team's
/// score is retained and the disconnect is silent.
#[tokio::test]
async fn disconnect_during_question_does_not_emit_team_left() {
    let server = create_test_server();
    let mut host = connect(&server);
    send(&server, &host, "host:create-game", json!({ "hostName": "Alex" })).await;
    let pin = data_of(&host.recv())["pin"].as_str().unwrap().to_string();

    let team = connect(&server);
    send(
        &server,
        &team,
        "team:join",
        json!({ "pin": pin, "teamName": "Solo" }),
    )
    .await;
    host.recv(); // team:joined

    send(
        &server,
        &host,
        "host:add-question",
        json!({ "pin": pin, "question": sample_question() }),
    )
    .await;
    host.recv();
    send(&server, &host, "host:start-game", json!({ "pin": pin })).await;
    host.recv(); // game:started broadcast (host is in game-<pin>)
    host.recv(); // direct reply

    server.handle_disconnect(team.connection_id).await;

    // The session must still be reachable (not evicted) and the host must
    // not have received a `team:left` broadcast.
    host.assert_empty();
    let introspected = server.introspect(&pin).await;
    assert!(introspected.is_some());
}

/// S5 — double submit: first submission wins, and the resubmission must
/// not be visible to the submitting team (no `correct`/`points` leak).
#[tokio::test]
async fn s5_double_submit_first_wins() {
    let server = create_test_server();
    let mut host = connect(&server);
    send(&server, &host, "host:create-game", json!({ "hostName": "Alex" })).await;
    let pin = data_of(&host.recv())["pin"].as_str().unwrap().to_string();

    let mut team = connect(&server);
    send(
        &server,
        &team,
        "team:join",
        json!({ "pin": pin, "teamName": "Pandas" }),
    )
    .await;
    let team_id = data_of(&team.recv())["teamId"].as_str().unwrap().to_string();
    host.recv(); // team:joined

    send(
        &server,
        &host,
        "host:add-question",
        json!({ "pin": pin, "question": sample_question() }),
    )
    .await;
    host.recv();
    send(&server, &host, "host:start-game", json!({ "pin": pin })).await;
    team.recv();
    host.recv(); // broadcast
    host.recv(); // reply

    // Incorrect first, then correct: the incorrect first submission wins.
    send(
        &server,
        &team,
        "team:submit-answer",
        json!({ "pin": pin, "teamId": team_id, "answer": 0 }),
    )
    .await;
    team.recv();
    host.recv();

    send(
        &server,
        &team,
        "team:submit-answer",
        json!({ "pin": pin, "teamId": team_id, "answer": 1 }),
    )
    .await;
    team.recv();
    host.recv();

    send(&server, &host, "host:reveal-answer", json!({ "pin": pin })).await;
    team.recv(); // broadcast
    host.recv(); // broadcast
    let revealed_host_reply = host.recv();
    let leaderboard = data_of(&revealed_host_reply)["leaderboard"].as_array().unwrap();
    let pandas = leaderboard
        .iter()
        .find(|e| e["teamName"] == json!("Pandas"))
        .unwrap();
    assert_eq!(pandas["score"], json!(0));
}

/// S6 — late submission: correct answer past the time limit still scores
/// the base 100 points, no bonus and no penalty.
#[tokio::test]
async fn s6_late_submission_scores_base_points_only() {
    use trivia_server::session::Session;
    use trivia_server::protocol::types::Pin;

    let (session, _host_id) = Session::new(Pin::from_code(4321), "Alex".to_string());
    let team_id = session
        .add_team("Pandas".to_string(), uuid::Uuid::new_v4())
        .await
        .unwrap();
    session
        .add_question(trivia_server::protocol::messages::QuestionInput {
            text: "2+2?".to_string(),
            options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
            correct_answer: 1,
            time_limit_secs: Some(10),
            category: None,
        })
        .await
        .unwrap();
    session.start_game().await.unwrap();

    let now = chrono::Utc::now();
    let (correct, points) = session
        .submit_answer_at(team_id, 1, now + chrono::Duration::milliseconds(12_000))
        .await
        .unwrap();
    assert!(correct);
    assert_eq!(points, 100);
}
