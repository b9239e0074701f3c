//! Interview orchestration: question generation at start, per-answer
//! evaluation, and the final summary. All intelligence is delegated to the
//! chat API; this module owns the state transitions around it.

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::prompts::{
    evaluation_prompt, question_prompt, summary_prompt, EVALUATION_MAX_TOKENS,
    QUESTION_MAX_TOKENS, SUMMARY_MAX_TOKENS,
};
use crate::interview::session::{
    normalize_answer, AnswerRecord, Question, Session, MAX_SCORE_PER_QUESTION, QUESTION_SEQUENCE,
};
use crate::interview::store::{SessionStore, StoreError};
use crate::llm_client::{strip_json_fences, ChatCompletions};

/// Fallback when the evaluator returns something that is not the expected
/// JSON shape. Degrade, don't fail: the candidate should never lose a
/// question to a malformed model reply.
const DEFAULT_SCORE: u32 = 10;
const DEFAULT_FEEDBACK: &str = "Partial answer.";

#[derive(Debug, Deserialize)]
struct Evaluation {
    score: u32,
    feedback: String,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Next {
        question: Question,
        score: u32,
        feedback: String,
    },
    Complete {
        summary: String,
        final_score: u32,
        answers: Vec<AnswerRecord>,
    },
}

/// Generates all six questions up front, then stores the session. Nothing is
/// persisted until every generation call has succeeded, so a mid-loop
/// failure leaves no orphaned session behind.
pub async fn start_interview(
    llm: &dyn ChatCompletions,
    store: &SessionStore,
    name: String,
    skills: Vec<String>,
) -> Result<Session, AppError> {
    let mut questions = Vec::with_capacity(QUESTION_SEQUENCE.len());
    for difficulty in QUESTION_SEQUENCE {
        let prompt = question_prompt(difficulty, &skills);
        let text = llm.complete(&prompt, QUESTION_MAX_TOKENS).await?;
        questions.push(Question {
            difficulty,
            question: text,
        });
    }

    let session = Session::new(name, skills, questions);
    info!("Interview {} started for {}", session.id, session.name);
    store.insert(session.clone()).await;
    Ok(session)
}

/// Evaluates the answer to the current question and advances the session.
/// The store commit is a compare-and-swap on the question index, so a
/// concurrent submission for the same session surfaces as a conflict and
/// the session is advanced exactly once.
pub async fn submit_answer(
    llm: &dyn ChatCompletions,
    store: &SessionStore,
    session_id: Uuid,
    raw_answer: &str,
) -> Result<SubmitOutcome, AppError> {
    let session = store
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Candidate {session_id} not found")))?;

    let current = session
        .current_question()
        .ok_or_else(|| AppError::Validation("Interview is already complete".to_string()))?
        .clone();

    let answer = normalize_answer(raw_answer);
    let (score, feedback) = evaluate_answer(llm, &current.question, &answer).await?;

    // The append happens only after a successful evaluation; an error above
    // leaves the stored session untouched.
    let next = session.with_answer(AnswerRecord {
        question: current.question,
        answer,
        score,
        feedback: feedback.clone(),
    });

    store
        .compare_and_swap(session.current_index, next.clone())
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound(format!("Candidate {session_id} not found")),
            StoreError::Conflict => {
                AppError::Conflict("Answer already submitted for this question".to_string())
            }
        })?;

    if let Some(question) = next.current_question() {
        return Ok(SubmitOutcome::Next {
            question: question.clone(),
            score,
            feedback,
        });
    }

    let summary = llm
        .complete(&summary_prompt(&next), SUMMARY_MAX_TOKENS)
        .await?;

    info!(
        "Interview {} complete: {}/{}",
        next.id,
        next.total_score,
        next.max_score()
    );

    Ok(SubmitOutcome::Complete {
        summary,
        final_score: next.total_score,
        answers: next.answers,
    })
}

async fn evaluate_answer(
    llm: &dyn ChatCompletions,
    question: &str,
    answer: &str,
) -> Result<(u32, String), AppError> {
    let raw = llm
        .complete(&evaluation_prompt(question, answer), EVALUATION_MAX_TOKENS)
        .await?;

    match serde_json::from_str::<Evaluation>(strip_json_fences(&raw)) {
        Ok(eval) => Ok((eval.score.min(MAX_SCORE_PER_QUESTION), eval.feedback)),
        Err(e) => {
            warn!("Evaluator returned malformed JSON ({e}): {raw}");
            Ok((DEFAULT_SCORE, DEFAULT_FEEDBACK.to_string()))
        }
    }
}
