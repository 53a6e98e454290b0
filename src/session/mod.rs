//! The session state machine (spec.md §4.2): `lobby` → `question` →
//! `answer-reveal` → `ended`, plus the team roster and scoring it carries.

pub mod question;
pub mod registry;
pub mod scoring;
pub mod team;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::protocol::messages::{GameStateView, QuestionInput};
use crate::protocol::types::{ConnectionId, HostId, Pin, QuestionId, TeamId};
use crate::protocol::GameError;

use question::Question;
use team::{leaderboard_from, Answer, LeaderboardEntry, Team};

pub use question::QuestionView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Lobby,
    Question,
    AnswerReveal,
    Ended,
}

impl SessionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Lobby => "lobby",
            SessionPhase::Question => "question",
            SessionPhase::AnswerReveal => "answer-reveal",
            SessionPhase::Ended => "ended",
        }
    }
}

/// What `next_question` produced: either the next question went live, or
/// the question list was exhausted and the session moved to `ended`.
pub enum NextOutcome {
    Question(QuestionView),
    Ended(Vec<LeaderboardEntry>),
}

/// Outcome of removing a connection's team from a session, used by the
/// disconnect path to decide whether to broadcast `team:left` and/or evict
/// the session.
pub struct TeamRemoved {
    pub team_id: TeamId,
    pub team_name: String,
    pub remaining_teams: usize,
    /// Whether the session was still in `lobby` at the moment of removal.
    /// `team:left` is only broadcast when this is true (spec.md §5: "for
    /// each removal in a session still in `lobby`") — sessions past lobby
    /// retain the team's score and disconnect silently.
    pub was_lobby: bool,
    pub session_now_empty_lobby: bool,
}

struct SessionInner {
    state: SessionPhase,
    /// -1 before the first question is activated; otherwise an index into
    /// `questions`.
    cursor: i64,
    questions: Vec<Question>,
    teams: HashMap<TeamId, Team>,
    team_order: Vec<TeamId>,
    question_activated_at: Option<DateTime<Utc>>,
}

impl SessionInner {
    fn current_question(&self) -> Option<&Question> {
        if self.cursor < 0 {
            return None;
        }
        self.questions.get(self.cursor as usize)
    }

    fn ordered_teams(&self) -> Vec<&Team> {
        self.team_order
            .iter()
            .filter_map(|id| self.teams.get(id))
            .collect()
    }
}

pub struct Session {
    pub id: Uuid,
    pub pin: Pin,
    pub host_id: HostId,
    pub host_name: String,
    inner: Mutex<SessionInner>,
}

impl Session {
    pub fn new(pin: Pin, host_name: String) -> (Self, HostId) {
        let host_id = Uuid::new_v4();
        let session = Self {
            id: Uuid::new_v4(),
            pin,
            host_id,
            host_name,
            inner: Mutex::new(SessionInner {
                state: SessionPhase::Lobby,
                cursor: -1,
                questions: Vec::new(),
                teams: HashMap::new(),
                team_order: Vec::new(),
                question_activated_at: None,
            }),
        };
        (session, host_id)
    }

    pub async fn state(&self) -> SessionPhase {
        self.inner.lock().await.state
    }

    pub async fn snapshot(&self) -> GameStateView {
        let inner = self.inner.lock().await;
        GameStateView {
            state: inner.state.as_str(),
            teams_count: inner.teams.len(),
            questions_count: inner.questions.len(),
        }
    }

    pub async fn teams_count(&self) -> usize {
        self.inner.lock().await.teams.len()
    }

    pub async fn questions_count(&self) -> usize {
        self.inner.lock().await.questions.len()
    }

    pub async fn add_team(
        &self,
        name: String,
        connection_id: ConnectionId,
    ) -> Result<TeamId, GameError> {
        let mut inner = self.inner.lock().await;
        if inner.state != SessionPhase::Lobby {
            return Err(GameError::GameAlreadyStarted);
        }
        let team = Team::new(name, connection_id);
        let id = team.id;
        inner.team_order.push(id);
        inner.teams.insert(id, team);
        Ok(id)
    }

    /// Removes any team owned by `connection_id`. A connection owns at most
    /// one team (there is no rejoin protocol — spec.md §3), so this removes
    /// zero or one team.
    pub async fn remove_team_by_connection(
        &self,
        connection_id: ConnectionId,
    ) -> Option<TeamRemoved> {
        let mut inner = self.inner.lock().await;
        let removed_id = inner
            .teams
            .values()
            .find(|t| t.connection_id == connection_id)
            .map(|t| t.id)?;
        let team = inner.teams.remove(&removed_id)?;
        inner.team_order.retain(|id| *id != removed_id);
        let remaining_teams = inner.teams.len();
        let was_lobby = inner.state == SessionPhase::Lobby;
        let session_now_empty_lobby = was_lobby && remaining_teams == 0;
        Some(TeamRemoved {
            team_id: team.id,
            team_name: team.name,
            remaining_teams,
            was_lobby,
            session_now_empty_lobby,
        })
    }

    pub async fn add_question(&self, input: QuestionInput) -> Result<usize, GameError> {
        let question = Question::from_input(input).map_err(GameError::BadRequest)?;
        let mut inner = self.inner.lock().await;
        inner.questions.push(question);
        Ok(inner.questions.len())
    }

    pub async fn start_game(&self) -> Result<QuestionView, GameError> {
        let mut inner = self.inner.lock().await;
        if inner.state != SessionPhase::Lobby {
            return Err(GameError::WrongState);
        }
        if inner.questions.is_empty() {
            return Err(GameError::NoQuestions);
        }
        inner.cursor = 0;
        inner.state = SessionPhase::Question;
        inner.question_activated_at = Some(Utc::now());
        let total = inner.questions.len();
        Ok(inner.questions[0].view(1, total))
    }

    pub async fn next_question(&self) -> Result<NextOutcome, GameError> {
        let mut inner = self.inner.lock().await;
        if inner.state != SessionPhase::Question && inner.state != SessionPhase::AnswerReveal {
            return Err(GameError::WrongState);
        }
        let next_index = inner.cursor + 1;
        if next_index as usize >= inner.questions.len() {
            inner.state = SessionPhase::Ended;
            inner.question_activated_at = None;
            let teams = inner.ordered_teams();
            return Ok(NextOutcome::Ended(leaderboard_from(&teams)));
        }
        inner.cursor = next_index;
        inner.state = SessionPhase::Question;
        inner.question_activated_at = Some(Utc::now());
        let total = inner.questions.len();
        let view = inner.questions[next_index as usize].view(next_index as usize + 1, total);
        Ok(NextOutcome::Question(view))
    }

    pub async fn submit_answer(
        &self,
        team_id: TeamId,
        option_index: usize,
    ) -> Result<(bool, u32), GameError> {
        self.submit_answer_at(team_id, option_index, Utc::now())
            .await
    }

    /// Same as `submit_answer` but takes an explicit timestamp, so tests can
    /// drive elapsed-time scenarios without real wall-clock delay.
    pub async fn submit_answer_at(
        &self,
        team_id: TeamId,
        option_index: usize,
        now: DateTime<Utc>,
    ) -> Result<(bool, u32), GameError> {
        let mut inner = self.inner.lock().await;
        if inner.state != SessionPhase::Question {
            return Err(GameError::GameNotAcceptingAnswers);
        }
        let cursor = inner.cursor;
        let (time_limit_secs, correct_answer) = {
            let question = inner
                .current_question()
                .ok_or(GameError::GameNotAcceptingAnswers)?;
            (question.time_limit_secs, question.correct_answer)
        };
        let activated_at = inner
            .question_activated_at
            .ok_or(GameError::GameNotAcceptingAnswers)?;

        if !inner.teams.contains_key(&team_id) {
            return Err(GameError::UnknownTeam);
        }

        let question_index = cursor as usize;
        if let Some(prior) = inner.teams[&team_id].answer_for(question_index) {
            return Ok((prior.correct, prior.points));
        }

        let elapsed_ms = now
            .signed_duration_since(activated_at)
            .num_milliseconds()
            .max(0) as u64;
        let correct = option_index == correct_answer;
        let points = scoring::score_answer(correct, elapsed_ms, time_limit_secs);

        let team = inner.teams.get_mut(&team_id).expect("checked above");
        team.record_answer(Answer {
            question_index,
            option_index,
            correct,
            points,
            elapsed_ms,
        });
        Ok((correct, points))
    }

    pub async fn reveal_answer(&self) -> Result<(usize, Vec<LeaderboardEntry>), GameError> {
        let mut inner = self.inner.lock().await;
        match inner.state {
            SessionPhase::Question => {
                inner.state = SessionPhase::AnswerReveal;
            }
            SessionPhase::AnswerReveal => {
                // idempotent: repeat reveals return the same snapshot
            }
            SessionPhase::Lobby | SessionPhase::Ended => return Err(GameError::WrongState),
        }
        let correct_answer = inner
            .current_question()
            .ok_or(GameError::WrongState)?
            .correct_answer;
        let teams = inner.ordered_teams();
        Ok((correct_answer, leaderboard_from(&teams)))
    }

    pub async fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let inner = self.inner.lock().await;
        let teams = inner.ordered_teams();
        leaderboard_from(&teams)
    }

    pub async fn current_question_id(&self) -> Option<QuestionId> {
        let inner = self.inner.lock().await;
        inner.current_question().map(|q| q.id)
    }
}
