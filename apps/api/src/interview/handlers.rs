//! Axum route handlers for the interview API. Wire types derive both
//! `Serialize` and `Deserialize` — the terminal client reuses them.

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::engine::{start_interview, submit_answer, SubmitOutcome};
use crate::interview::session::{AnswerRecord, Difficulty};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct StartRequest {
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub candidate_id: Uuid,
    pub question: String,
    pub difficulty: Difficulty,
}

/// `candidate_id` stays a string on the wire: an id in any unrecognized
/// format is just an unknown candidate, not a malformed request.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub candidate_id: String,
    pub answer: String,
}

/// Either the next question or the final summary. `Complete` keeps an
/// explicit null `nextQuestion` so clients can branch on one field.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerResponse {
    #[serde(rename_all = "camelCase")]
    Next {
        next_question: String,
        difficulty: Difficulty,
        score: u32,
        feedback: String,
    },
    #[serde(rename_all = "camelCase")]
    Complete {
        next_question: Option<String>,
        summary: String,
        final_score: u32,
        answers: Vec<AnswerRecord>,
    },
}

/// POST /api/interview/start
///
/// Body extraction is a `Result` so a missing or malformed field comes back
/// as a 400 in the standard error envelope rather than axum's default 422.
pub async fn handle_start(
    State(state): State<AppState>,
    request: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<StartResponse>, AppError> {
    let Json(request) = request.map_err(|e| AppError::Validation(e.body_text()))?;

    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    let skills: Vec<String> = request
        .skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if skills.is_empty() {
        return Err(AppError::Validation("skills cannot be empty".to_string()));
    }

    let session = start_interview(state.llm.as_ref(), &state.sessions, request.name, skills).await?;

    // Session::new guarantees the six-question sequence is non-empty.
    let first = session
        .current_question()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("new session has no questions")))?;

    Ok(Json(StartResponse {
        candidate_id: session.id,
        question: first.question.clone(),
        difficulty: first.difficulty,
    }))
}

/// POST /api/interview/answer
pub async fn handle_answer(
    State(state): State<AppState>,
    request: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, AppError> {
    let Json(request) = request.map_err(|e| AppError::Validation(e.body_text()))?;

    let candidate_id = Uuid::parse_str(&request.candidate_id).map_err(|_| {
        AppError::NotFound(format!("Candidate {} not found", request.candidate_id))
    })?;

    let outcome = submit_answer(
        state.llm.as_ref(),
        &state.sessions,
        candidate_id,
        &request.answer,
    )
    .await?;

    let response = match outcome {
        SubmitOutcome::Next {
            question,
            score,
            feedback,
        } => AnswerResponse::Next {
            next_question: question.question,
            difficulty: question.difficulty,
            score,
            feedback,
        },
        SubmitOutcome::Complete {
            summary,
            final_score,
            answers,
        } => AnswerResponse::Complete {
            next_question: None,
            summary,
            final_score,
            answers,
        },
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::interview::store::SessionStore;
    use crate::llm_client::{ChatCompletions, LlmError};
    use crate::routes::build_router;
    use crate::state::AppState;
    use async_trait::async_trait;

    /// Scripted fake: pops one canned reply per call and records prompts.
    struct ScriptedChat {
        replies: Mutex<Vec<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedChat {
        fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatCompletions for ScriptedChat {
        async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let mut replies = self.replies.lock().unwrap();
            assert!(!replies.is_empty(), "unexpected extra LLM call: {prompt}");
            replies.remove(0)
        }
    }

    fn state_with(chat: Arc<ScriptedChat>) -> AppState {
        AppState {
            llm: chat,
            sessions: SessionStore::new(Duration::from_secs(600)),
            config: Config {
                openai_api_key: "test-key".into(),
                openai_base_url: "http://localhost".into(),
                port: 0,
                session_ttl_secs: 600,
                rust_log: "info".into(),
            },
        }
    }

    async fn post_json(
        state: AppState,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn missing_start_field_is_a_400_in_the_error_envelope() {
        let state = state_with(Arc::new(ScriptedChat::new(vec![])));

        let (status, body) = post_json(
            state,
            "/api/interview/start",
            serde_json::json!({ "name": "Jane" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_candidate_id_reads_as_unknown_candidate() {
        let state = state_with(Arc::new(ScriptedChat::new(vec![])));

        let (status, body) = post_json(
            state,
            "/api/interview/answer",
            serde_json::json!({ "candidateId": "candidate_123", "answer": "x" }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn missing_answer_field_is_a_400_in_the_error_envelope() {
        let state = state_with(Arc::new(ScriptedChat::new(vec![])));

        let (status, body) = post_json(
            state,
            "/api/interview/answer",
            serde_json::json!({ "answer": "x" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn blank_skills_are_rejected() {
        let state = state_with(Arc::new(ScriptedChat::new(vec![])));

        let (status, body) = post_json(
            state,
            "/api/interview/start",
            serde_json::json!({ "name": "Jane", "skills": ["", "   "] }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn skills_are_trimmed_before_prompting() {
        let chat = Arc::new(ScriptedChat::new(
            (0..6).map(|i| Ok(format!("Question {i}?"))).collect(),
        ));
        let state = state_with(chat.clone());

        let (status, body) = post_json(
            state,
            "/api/interview/start",
            serde_json::json!({ "name": "Jane", "skills": ["  React  ", ""] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"], "Question 0?");

        let prompts = chat.prompts();
        assert!(prompts.iter().all(|p| p.contains("React")));
        assert!(prompts.iter().all(|p| !p.contains("  React")));
    }

    #[test]
    fn next_response_serializes_camel_case() {
        let response = AnswerResponse::Next {
            next_question: "Q2?".into(),
            difficulty: Difficulty::Medium,
            score: 14,
            feedback: "Good.".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["nextQuestion"], "Q2?");
        assert_eq!(json["difficulty"], "Medium");
        assert_eq!(json["score"], 14);
    }

    #[test]
    fn complete_response_has_null_next_question() {
        let response = AnswerResponse::Complete {
            next_question: None,
            summary: "Hire.".into(),
            final_score: 100,
            answers: vec![],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["nextQuestion"].is_null());
        assert_eq!(json["finalScore"], 100);
    }

    #[test]
    fn answer_response_round_trips_for_the_client() {
        let next: AnswerResponse = serde_json::from_str(
            r#"{"nextQuestion":"Q2?","difficulty":"Easy","score":9,"feedback":"ok"}"#,
        )
        .unwrap();
        assert!(matches!(next, AnswerResponse::Next { score: 9, .. }));

        let done: AnswerResponse = serde_json::from_str(
            r#"{"nextQuestion":null,"summary":"s","finalScore":60,"answers":[]}"#,
        )
        .unwrap();
        assert!(matches!(done, AnswerResponse::Complete { final_score: 60, .. }));
    }
}
