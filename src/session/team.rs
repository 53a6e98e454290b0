use serde::Serialize;
use uuid::Uuid;

use crate::protocol::types::{ConnectionId, TeamId};

/// One recorded submission. Per spec.md §3, a team has at most one `Answer`
/// per question — the session enforces that before ever constructing one.
#[derive(Debug, Clone)]
pub struct Answer {
    pub question_index: usize,
    pub option_index: usize,
    pub correct: bool,
    pub points: u32,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub connection_id: ConnectionId,
    pub score: u32,
    pub answers: Vec<Answer>,
}

impl Team {
    pub fn new(name: String, connection_id: ConnectionId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            connection_id,
            score: 0,
            answers: Vec::new(),
        }
    }

    pub fn answer_for(&self, question_index: usize) -> Option<&Answer> {
        self.answers
            .iter()
            .find(|a| a.question_index == question_index)
    }

    /// Records an answer and adds its points to the running score. Callers
    /// must have already checked `answer_for` returns `None` — this does not
    /// re-check, so it must only be reached on a genuine first submission.
    pub fn record_answer(&mut self, answer: Answer) {
        self.score += answer.points;
        self.answers.push(answer);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub team_id: TeamId,
    pub team_name: String,
    pub score: u32,
    pub answers_count: usize,
}

/// Ranks teams by score, descending, breaking ties by join order (teams
/// are iterated in the order they appear in the caller's slice).
pub fn leaderboard_from(teams: &[&Team]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = teams
        .iter()
        .map(|t| LeaderboardEntry {
            team_id: t.id,
            team_name: t.name.clone(),
            score: t.score,
            answers_count: t.answers.len(),
        })
        .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}
