//! Event Dispatcher (spec.md §4.4): decodes the envelope, routes by event
//! name, and enforces the ordering rule from §5 — mutate the session,
//! release its lock, broadcast, and only then reply to the caller.

use tracing::{info, warn, Instrument};

use crate::protocol::error::GameError;
use crate::protocol::messages::{
    AddQuestionPayload, AddQuestionReplyData, AnswerRevealedBroadcastData,
    AnswerSubmittedBroadcastData, ClientEvent, CreateGamePayload, CreateGameReplyData,
    ErrorReplyData, GameEndedBroadcastData, GameStartedBroadcastData, InboundFrame, JoinPayload,
    JoinReplyData, LeaderboardReplyData, NewQuestionBroadcastData, NextQuestionReplyData,
    OutboundFrame, PinOnlyPayload, PongData, RevealAnswerReplyData, SimpleSuccessData,
    SubmitAnswerPayload, SubmitAnswerReplyData, TeamJoinedBroadcastData,
};
use crate::protocol::types::ConnectionId;
use crate::session::NextOutcome;

use super::router::{game_room, host_room};
use super::GameServer;

pub async fn dispatch(server: &GameServer, connection_id: ConnectionId, frame: InboundFrame) {
    let ack = frame.ack.clone();
    let event_name = frame.event.clone();
    let span = tracing::info_span!("dispatch", event = %event_name);
    async move {
        match ClientEvent::parse(&frame) {
            Ok(event) => route(server, connection_id, event, &event_name, ack).await,
            Err(message) => {
                warn!(error = %message, "rejecting malformed frame");
                reply_error(
                    server,
                    connection_id,
                    &event_name,
                    ack,
                    GameError::BadRequest(message),
                );
            }
        }
    }
    .instrument(span)
    .await;
}

async fn route(
    server: &GameServer,
    connection_id: ConnectionId,
    event: ClientEvent,
    event_name: &str,
    ack: Option<String>,
) {
    match event {
        ClientEvent::HostCreateGame(payload) => {
            host_create_game(server, connection_id, payload, event_name, ack).await
        }
        ClientEvent::TeamJoin(payload) => {
            team_join(server, connection_id, payload, event_name, ack).await
        }
        ClientEvent::HostAddQuestion(payload) => {
            host_add_question(server, connection_id, payload, event_name, ack).await
        }
        ClientEvent::HostStartGame(payload) => {
            host_start_game(server, connection_id, payload, event_name, ack).await
        }
        ClientEvent::HostNextQuestion(payload) => {
            host_next_question(server, connection_id, payload, event_name, ack).await
        }
        ClientEvent::TeamSubmitAnswer(payload) => {
            team_submit_answer(server, connection_id, payload, event_name, ack).await
        }
        ClientEvent::HostRevealAnswer(payload) => {
            host_reveal_answer(server, connection_id, payload, event_name, ack).await
        }
        ClientEvent::GameGetLeaderboard(payload) => {
            game_get_leaderboard(server, connection_id, payload, event_name, ack).await
        }
        ClientEvent::Ping => server.router.emit_to(
            connection_id,
            OutboundFrame::reply("pong", PongData::default(), ack),
        ),
    }
}

fn reply_error(
    server: &GameServer,
    connection_id: ConnectionId,
    event_name: &str,
    ack: Option<String>,
    err: GameError,
) {
    server.router.emit_to(
        connection_id,
        OutboundFrame::reply(
            event_name,
            ErrorReplyData {
                success: false,
                error: err.to_string(),
                error_code: err.code(),
            },
            ack,
        ),
    );
}

async fn host_create_game(
    server: &GameServer,
    connection_id: ConnectionId,
    payload: CreateGamePayload,
    event_name: &str,
    ack: Option<String>,
) {
    if payload.host_name.trim().is_empty() {
        reply_error(
            server,
            connection_id,
            event_name,
            ack,
            GameError::BadRequest("hostName must not be empty".to_string()),
        );
        return;
    }
    match server.registry.create(payload.host_name) {
        Ok((session, host_id)) => {
            let pin = session.pin.as_str().to_string();
            server.router.join(connection_id, &game_room(&pin));
            server.router.join(connection_id, &host_room(&pin));
            info!(pin, "game created");
            server.router.emit_to(
                connection_id,
                OutboundFrame::reply(
                    event_name,
                    CreateGameReplyData {
                        success: true,
                        game_id: session.id,
                        pin,
                        host_id,
                    },
                    ack,
                ),
            );
        }
        Err(err) => reply_error(server, connection_id, event_name, ack, err),
    }
}

async fn team_join(
    server: &GameServer,
    connection_id: ConnectionId,
    payload: JoinPayload,
    event_name: &str,
    ack: Option<String>,
) {
    if payload.team_name.trim().is_empty() {
        reply_error(
            server,
            connection_id,
            event_name,
            ack,
            GameError::BadRequest("teamName must not be empty".to_string()),
        );
        return;
    }
    let Some(session) = server.registry.get(&payload.pin) else {
        reply_error(server, connection_id, event_name, ack, GameError::GameNotFound);
        return;
    };
    match session.add_team(payload.team_name.clone(), connection_id).await {
        Ok(team_id) => {
            server.router.join(connection_id, &game_room(&payload.pin));
            server.router.broadcast(
                &host_room(&payload.pin),
                OutboundFrame::broadcast(
                    "team:joined",
                    TeamJoinedBroadcastData {
                        team_id,
                        team_name: payload.team_name.clone(),
                    },
                ),
            );
            let game_state = session.snapshot().await;
            server.router.emit_to(
                connection_id,
                OutboundFrame::reply(
                    event_name,
                    JoinReplyData {
                        success: true,
                        team_id,
                        team_name: payload.team_name,
                        game_state,
                    },
                    ack,
                ),
            );
        }
        Err(err) => reply_error(server, connection_id, event_name, ack, err),
    }
}

async fn host_add_question(
    server: &GameServer,
    connection_id: ConnectionId,
    payload: AddQuestionPayload,
    event_name: &str,
    ack: Option<String>,
) {
    let Some(session) = server.registry.get(&payload.pin) else {
        reply_error(server, connection_id, event_name, ack, GameError::GameNotFound);
        return;
    };
    match session.add_question(payload.question).await {
        Ok(total_questions) => server.router.emit_to(
            connection_id,
            OutboundFrame::reply(
                event_name,
                AddQuestionReplyData {
                    success: true,
                    total_questions,
                },
                ack,
            ),
        ),
        Err(err) => reply_error(server, connection_id, event_name, ack, err),
    }
}

async fn host_start_game(
    server: &GameServer,
    connection_id: ConnectionId,
    payload: PinOnlyPayload,
    event_name: &str,
    ack: Option<String>,
) {
    let Some(session) = server.registry.get(&payload.pin) else {
        reply_error(server, connection_id, event_name, ack, GameError::GameNotFound);
        return;
    };
    match session.start_game().await {
        Ok(view) => {
            server.router.broadcast(
                &game_room(&payload.pin),
                OutboundFrame::broadcast("game:started", GameStartedBroadcastData { question: view }),
            );
            server.router.emit_to(
                connection_id,
                OutboundFrame::reply(event_name, SimpleSuccessData { success: true }, ack),
            );
        }
        Err(err) => reply_error(server, connection_id, event_name, ack, err),
    }
}

async fn host_next_question(
    server: &GameServer,
    connection_id: ConnectionId,
    payload: PinOnlyPayload,
    event_name: &str,
    ack: Option<String>,
) {
    let Some(session) = server.registry.get(&payload.pin) else {
        reply_error(server, connection_id, event_name, ack, GameError::GameNotFound);
        return;
    };
    match session.next_question().await {
        Ok(NextOutcome::Question(view)) => {
            server.router.broadcast(
                &game_room(&payload.pin),
                OutboundFrame::broadcast(
                    "question:new",
                    NewQuestionBroadcastData {
                        question: view.clone(),
                    },
                ),
            );
            server.router.emit_to(
                connection_id,
                OutboundFrame::reply(
                    event_name,
                    NextQuestionReplyData {
                        success: true,
                        ended: Some(false),
                        question: Some(view),
                    },
                    ack,
                ),
            );
        }
        Ok(NextOutcome::Ended(leaderboard)) => {
            let total_questions = session.questions_count().await;
            server.router.broadcast(
                &game_room(&payload.pin),
                OutboundFrame::broadcast(
                    "game:ended",
                    GameEndedBroadcastData {
                        final_leaderboard: leaderboard,
                        total_questions,
                    },
                ),
            );
            server.router.emit_to(
                connection_id,
                OutboundFrame::reply(
                    event_name,
                    NextQuestionReplyData {
                        success: true,
                        ended: Some(true),
                        question: None,
                    },
                    ack,
                ),
            );
        }
        Err(err) => reply_error(server, connection_id, event_name, ack, err),
    }
}

async fn team_submit_answer(
    server: &GameServer,
    connection_id: ConnectionId,
    payload: SubmitAnswerPayload,
    event_name: &str,
    ack: Option<String>,
) {
    let Some(session) = server.registry.get(&payload.pin) else {
        reply_error(server, connection_id, event_name, ack, GameError::GameNotFound);
        return;
    };
    match session.submit_answer(payload.team_id, payload.answer).await {
        // Correctness and points are withheld from both the submitting team
        // and the host until `host:reveal-answer` (spec.md §8 invariant 6 /
        // the S1 walkthrough's bare `{success:true, submitted:true}` reply).
        Ok((_correct, _points)) => {
            server.router.broadcast(
                &host_room(&payload.pin),
                OutboundFrame::broadcast(
                    "answer:submitted",
                    AnswerSubmittedBroadcastData {
                        team_id: payload.team_id,
                        answered: true,
                    },
                ),
            );
            server.router.emit_to(
                connection_id,
                OutboundFrame::reply(
                    event_name,
                    SubmitAnswerReplyData {
                        success: true,
                        submitted: true,
                    },
                    ack,
                ),
            );
        }
        Err(err) => reply_error(server, connection_id, event_name, ack, err),
    }
}

async fn host_reveal_answer(
    server: &GameServer,
    connection_id: ConnectionId,
    payload: PinOnlyPayload,
    event_name: &str,
    ack: Option<String>,
) {
    let Some(session) = server.registry.get(&payload.pin) else {
        reply_error(server, connection_id, event_name, ack, GameError::GameNotFound);
        return;
    };
    match session.reveal_answer().await {
        Ok((correct_answer, leaderboard)) => {
            server.router.broadcast(
                &game_room(&payload.pin),
                OutboundFrame::broadcast(
                    "answer:revealed",
                    AnswerRevealedBroadcastData {
                        correct_answer,
                        leaderboard: leaderboard.clone(),
                    },
                ),
            );
            server.router.emit_to(
                connection_id,
                OutboundFrame::reply(
                    event_name,
                    RevealAnswerReplyData {
                        success: true,
                        correct_answer,
                        leaderboard,
                    },
                    ack,
                ),
            );
        }
        Err(err) => reply_error(server, connection_id, event_name, ack, err),
    }
}

async fn game_get_leaderboard(
    server: &GameServer,
    connection_id: ConnectionId,
    payload: PinOnlyPayload,
    event_name: &str,
    ack: Option<String>,
) {
    let Some(session) = server.registry.get(&payload.pin) else {
        reply_error(server, connection_id, event_name, ack, GameError::GameNotFound);
        return;
    };
    let leaderboard = session.leaderboard().await;
    server.router.emit_to(
        connection_id,
        OutboundFrame::reply(
            event_name,
            LeaderboardReplyData {
                success: true,
                leaderboard,
            },
            ack,
        ),
    );
}
