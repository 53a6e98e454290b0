//! Wire types for the `{ event, data, ack? }` envelope described in spec.md
//! §6. Inbound frames are parsed in two steps (envelope, then a per-event
//! payload); outbound frames are built by handlers and carry the same
//! envelope shape back out.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::session::question::QuestionView;
use crate::session::team::LeaderboardEntry;

/// Raw shape of every inbound frame before `data` is interpreted.
#[derive(Debug, Deserialize)]
pub struct InboundFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub ack: Option<String>,
}

/// Raw shape of every outbound frame. `ack` is only set on replies; room
/// broadcasts leave it `None`.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundFrame {
    pub event: String,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ack: Option<String>,
}

impl OutboundFrame {
    pub fn reply(event: impl Into<String>, data: impl Serialize, ack: Option<String>) -> Self {
        Self {
            event: event.into(),
            data: serde_json::to_value(data).expect("reply payload always serializes"),
            ack,
        }
    }

    pub fn broadcast(event: impl Into<String>, data: impl Serialize) -> Self {
        Self {
            event: event.into(),
            data: serde_json::to_value(data).expect("broadcast payload always serializes"),
            ack: None,
        }
    }
}

// ---- inbound payloads -----------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGamePayload {
    pub host_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub pin: String,
    pub team_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default, rename = "timeLimit")]
    pub time_limit_secs: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddQuestionPayload {
    pub pin: String,
    pub question: QuestionInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinOnlyPayload {
    pub pin: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerPayload {
    pub pin: String,
    pub team_id: Uuid,
    pub answer: usize,
}

/// Every event this server understands, keyed by the envelope's `event`
/// field. Unknown event strings and payloads that fail to deserialize into
/// the matched variant both surface as `GameError::BadRequest`.
#[derive(Debug)]
pub enum ClientEvent {
    HostCreateGame(CreateGamePayload),
    TeamJoin(JoinPayload),
    HostAddQuestion(AddQuestionPayload),
    HostStartGame(PinOnlyPayload),
    HostNextQuestion(PinOnlyPayload),
    TeamSubmitAnswer(SubmitAnswerPayload),
    HostRevealAnswer(PinOnlyPayload),
    GameGetLeaderboard(PinOnlyPayload),
    Ping,
}

impl ClientEvent {
    pub fn parse(frame: &InboundFrame) -> Result<Self, String> {
        fn from_data<T: for<'de> Deserialize<'de>>(data: &Value) -> Result<T, String> {
            serde_json::from_value(data.clone()).map_err(|e| format!("invalid payload: {e}"))
        }

        match frame.event.as_str() {
            "host:create-game" => Ok(Self::HostCreateGame(from_data(&frame.data)?)),
            "team:join" => Ok(Self::TeamJoin(from_data(&frame.data)?)),
            "host:add-question" => Ok(Self::HostAddQuestion(from_data(&frame.data)?)),
            "host:start-game" => Ok(Self::HostStartGame(from_data(&frame.data)?)),
            "host:next-question" => Ok(Self::HostNextQuestion(from_data(&frame.data)?)),
            "team:submit-answer" => Ok(Self::TeamSubmitAnswer(from_data(&frame.data)?)),
            "host:reveal-answer" => Ok(Self::HostRevealAnswer(from_data(&frame.data)?)),
            "game:get-leaderboard" => Ok(Self::GameGetLeaderboard(from_data(&frame.data)?)),
            "ping" => Ok(Self::Ping),
            other => Err(format!("unknown event: {other}")),
        }
    }
}

// ---- outbound payloads -----------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReplyData {
    pub success: bool,
    pub error: String,
    pub error_code: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameReplyData {
    pub success: bool,
    pub game_id: Uuid,
    pub pin: String,
    pub host_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub state: &'static str,
    pub teams_count: usize,
    pub questions_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinReplyData {
    pub success: bool,
    pub team_id: Uuid,
    pub team_name: String,
    pub game_state: GameStateView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamJoinedBroadcastData {
    pub team_id: Uuid,
    pub team_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLeftBroadcastData {
    pub team_id: Uuid,
    pub team_name: String,
    pub total_teams: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddQuestionReplyData {
    pub success: bool,
    pub total_questions: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleSuccessData {
    pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStartedBroadcastData {
    pub question: QuestionView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuestionReplyData {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestionBroadcastData {
    pub question: QuestionView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEndedBroadcastData {
    pub final_leaderboard: Vec<LeaderboardEntry>,
    pub total_questions: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerReplyData {
    pub success: bool,
    pub submitted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmittedBroadcastData {
    pub team_id: Uuid,
    pub answered: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealAnswerReplyData {
    pub success: bool,
    pub correct_answer: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRevealedBroadcastData {
    pub correct_answer: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardReplyData {
    pub success: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize, Default)]
pub struct PongData {}
