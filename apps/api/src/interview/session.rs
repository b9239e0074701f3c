//! Interview session data model. A session walks a fixed six-question
//! sequence; transitions are pure functions returning a new session value so
//! the store can compare-and-swap instead of mutating shared state in place.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recorded when the candidate submits nothing, either by omission or by
/// letting the countdown expire.
pub const NO_ANSWER: &str = "No answer given";

/// Fixed difficulty sequence for every interview.
pub const QUESTION_SEQUENCE: [Difficulty; 6] = [
    Difficulty::Easy,
    Difficulty::Easy,
    Difficulty::Medium,
    Difficulty::Medium,
    Difficulty::Hard,
    Difficulty::Hard,
];

pub const MAX_SCORE_PER_QUESTION: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Per-question answer time budget on the client.
    pub fn time_limit(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_secs(20),
            Difficulty::Medium => Duration::from_secs(60),
            Difficulty::Hard => Duration::from_secs(120),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(s)
    }
}

/// Immutable once generated; order fixed at session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub difficulty: Difficulty,
    pub question: String,
}

/// Append-only; never mutated after it is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub score: u32,
    pub feedback: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub name: String,
    pub skills: Vec<String>,
    pub questions: Vec<Question>,
    /// Only ever increases; the session is terminal once it reaches
    /// `questions.len()`.
    pub current_index: usize,
    pub total_score: u32,
    pub answers: Vec<AnswerRecord>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(name: String, skills: Vec<String>, questions: Vec<Question>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            skills,
            questions,
            current_index: 0,
            total_score: 0,
            answers: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    /// 120 for the standard six-question interview.
    pub fn max_score(&self) -> u32 {
        self.questions.len() as u32 * MAX_SCORE_PER_QUESTION
    }

    /// Pure transition: records the answer for the current question and
    /// advances the index. Returns the successor session value; `self` is
    /// untouched so a failed commit leaves no trace.
    pub fn with_answer(&self, record: AnswerRecord) -> Session {
        let mut next = self.clone();
        next.total_score += record.score;
        next.answers.push(record);
        next.current_index += 1;
        next
    }
}

/// Empty and whitespace-only answers become the sentinel.
pub fn normalize_answer(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        NO_ANSWER.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn six_questions() -> Vec<Question> {
        QUESTION_SEQUENCE
            .iter()
            .enumerate()
            .map(|(i, &difficulty)| Question {
                difficulty,
                question: format!("Q{i}"),
            })
            .collect()
    }

    fn record(score: u32) -> AnswerRecord {
        AnswerRecord {
            question: "Q".into(),
            answer: "A".into(),
            score,
            feedback: "fine".into(),
        }
    }

    #[test]
    fn index_advances_by_one_per_answer_and_never_decreases() {
        let mut session = Session::new("Jane".into(), vec!["React".into()], six_questions());
        for n in 1..=6 {
            let prev = session.current_index;
            session = session.with_answer(record(10));
            assert_eq!(session.current_index, n);
            assert!(session.current_index > prev);
        }
        assert!(session.is_complete());
    }

    #[test]
    fn total_is_sum_of_recorded_scores_bounded_by_120() {
        let mut session = Session::new("Jane".into(), vec![], six_questions());
        let scores = [0, 5, 20, 13, 20, 7];
        for s in scores {
            session = session.with_answer(record(s));
        }
        assert_eq!(session.total_score, scores.iter().sum::<u32>());
        assert_eq!(session.max_score(), 120);
        assert!(session.total_score <= session.max_score());
    }

    #[test]
    fn transition_leaves_original_untouched() {
        let session = Session::new("Jane".into(), vec![], six_questions());
        let next = session.with_answer(record(15));
        assert_eq!(session.current_index, 0);
        assert_eq!(session.answers.len(), 0);
        assert_eq!(next.current_index, 1);
        assert_eq!(next.answers.len(), 1);
    }

    #[test]
    fn current_question_none_when_complete() {
        let mut session = Session::new("Jane".into(), vec![], six_questions());
        for _ in 0..6 {
            session = session.with_answer(record(1));
        }
        assert!(session.current_question().is_none());
    }

    #[test]
    fn blank_answers_normalize_to_sentinel() {
        assert_eq!(normalize_answer(""), NO_ANSWER);
        assert_eq!(normalize_answer("   \n\t "), NO_ANSWER);
        assert_eq!(normalize_answer("  real answer "), "real answer");
    }

    #[test]
    fn sequence_is_two_of_each_difficulty_in_order() {
        use Difficulty::*;
        assert_eq!(QUESTION_SEQUENCE, [Easy, Easy, Medium, Medium, Hard, Hard]);
    }
}
