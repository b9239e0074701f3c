//! Client session controller: the candidate-facing half of the interview.
//!
//! Owns the chat transcript, the pending-answer buffer, and at most one
//! `QuestionTimer`. Everything arrives as a `ControllerEvent` and is handled
//! sequentially, so a submission in flight blocks any other submission, and
//! timer events from an already answered question are identified by epoch
//! and dropped. Auto-submit therefore fires at most once per question.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::interview::handlers::{AnswerRequest, AnswerResponse, StartRequest, StartResponse};
use crate::interview::session::{Difficulty, NO_ANSWER};
use crate::resume::fields::CandidateInfo;

pub mod timer;

use timer::QuestionTimer;

/// Transport seam to the interview API; the binary talks HTTP, tests script
/// the responses.
#[async_trait]
pub trait InterviewApi: Send + Sync {
    async fn start(&self, request: &StartRequest) -> Result<StartResponse>;
    async fn answer(&self, request: &AnswerRequest) -> Result<AnswerResponse>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Interviewer,
    Candidate,
    System,
}

#[derive(Debug, Clone)]
pub struct TranscriptLine {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// A full line of user input (a field value during intake, an answer
    /// during a question).
    UserInput(String),
    /// Countdown display update from the question timer.
    Tick { epoch: u64, remaining: u64 },
    /// The question's time budget elapsed.
    Deadline { epoch: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    CollectingFields,
    InQuestion,
    Finished,
    Failed,
}

/// What the UI should do after an event was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Continue,
    Countdown { remaining: u64 },
    Finished { final_score: u32, summary: String },
}

/// Intake prompts run in this fixed order, one value per user turn.
const FIELD_ORDER: [&str; 3] = ["name", "email", "phone"];

pub struct SessionController<A: InterviewApi> {
    api: A,
    events: mpsc::Sender<ControllerEvent>,
    transcript: Vec<TranscriptLine>,
    /// Text typed but not yet submitted; the deadline submits this.
    pending: String,
    fields: CandidateInfo,
    missing: VecDeque<&'static str>,
    skills: Vec<String>,
    candidate_id: Option<uuid::Uuid>,
    phase: Phase,
    epoch: u64,
    timer: Option<QuestionTimer>,
}

impl<A: InterviewApi> SessionController<A> {
    pub fn new(api: A, skills: Vec<String>, events: mpsc::Sender<ControllerEvent>) -> Self {
        Self {
            api,
            events,
            transcript: Vec::new(),
            pending: String::new(),
            fields: CandidateInfo {
                name: None,
                email: None,
                phone: None,
            },
            missing: VecDeque::new(),
            skills,
            candidate_id: None,
            phase: Phase::CollectingFields,
            epoch: 0,
            timer: None,
        }
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Updates the pending-answer buffer; the deadline auto-submits it.
    pub fn set_pending(&mut self, text: &str) {
        self.pending = text.to_string();
    }

    /// Seeds the controller with whatever the resume extraction found and
    /// either starts collecting the gaps or goes straight to the interview.
    pub async fn begin(&mut self, info: CandidateInfo) -> Result<Status> {
        self.fields = info;
        self.missing = FIELD_ORDER
            .iter()
            .copied()
            .filter(|&f| self.field(f).is_none())
            .collect();

        if self.missing.is_empty() {
            self.push(Speaker::Interviewer, "All info detected. Ready to start!");
            self.start_interview().await
        } else {
            self.push(
                Speaker::Interviewer,
                "Hello! I need some missing info before the interview.",
            );
            let first = self.missing[0];
            self.push(Speaker::Interviewer, &format!("Please enter your {first}:"));
            Ok(Status::Continue)
        }
    }

    pub async fn handle_event(&mut self, event: ControllerEvent) -> Result<Status> {
        match event {
            ControllerEvent::UserInput(text) => match self.phase {
                Phase::CollectingFields => self.record_field(text).await,
                Phase::InQuestion => self.submit(text).await,
                // input after completion or failure is ignored
                Phase::Finished | Phase::Failed => Ok(Status::Continue),
            },
            ControllerEvent::Tick { epoch, remaining } => {
                if epoch == self.epoch && self.phase == Phase::InQuestion {
                    Ok(Status::Countdown { remaining })
                } else {
                    Ok(Status::Continue) // stale timer event
                }
            }
            ControllerEvent::Deadline { epoch } => {
                if epoch == self.epoch && self.phase == Phase::InQuestion {
                    let buffered = std::mem::take(&mut self.pending);
                    self.submit(buffered).await
                } else {
                    Ok(Status::Continue) // stale timer event
                }
            }
        }
    }

    async fn record_field(&mut self, value: String) -> Result<Status> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Ok(Status::Continue);
        }

        let field = self
            .missing
            .pop_front()
            .context("no field awaiting input")?;
        self.push(Speaker::Candidate, &value);
        *self.field_mut(field) = Some(value);

        if let Some(&next) = self.missing.front() {
            self.push(Speaker::Interviewer, &format!("Please enter your {next}:"));
            Ok(Status::Continue)
        } else {
            self.push(
                Speaker::Interviewer,
                "Thanks! Ready to start the interview.",
            );
            self.start_interview().await
        }
    }

    async fn start_interview(&mut self) -> Result<Status> {
        let name = self
            .fields
            .name
            .clone()
            .context("candidate name is required to start")?;
        let request = StartRequest {
            name,
            skills: self.skills.clone(),
        };

        let response = match self.api.start(&request).await {
            Ok(r) => r,
            Err(e) => {
                self.fail();
                return Err(e);
            }
        };

        self.candidate_id = Some(response.candidate_id);
        self.ask(response.question, response.difficulty);
        Ok(Status::Continue)
    }

    /// Submits an answer, manually or via the deadline. The timer is
    /// cancelled first so the deadline can never race a manual submission.
    async fn submit(&mut self, answer: String) -> Result<Status> {
        self.timer = None;
        self.pending.clear();

        let answer = {
            let trimmed = answer.trim();
            if trimmed.is_empty() {
                NO_ANSWER.to_string()
            } else {
                trimmed.to_string()
            }
        };
        self.push(Speaker::Candidate, &answer);

        let candidate_id = self.candidate_id.context("no active interview")?;
        let request = AnswerRequest {
            candidate_id: candidate_id.to_string(),
            answer,
        };

        let response = match self.api.answer(&request).await {
            Ok(r) => r,
            Err(e) => {
                self.fail();
                return Err(e);
            }
        };

        match response {
            AnswerResponse::Next {
                next_question,
                difficulty,
                score,
                feedback,
            } => {
                self.push(Speaker::System, &format!("Score: {score}/20 — {feedback}"));
                self.ask(next_question, difficulty);
                Ok(Status::Continue)
            }
            AnswerResponse::Complete {
                summary,
                final_score,
                ..
            } => {
                self.phase = Phase::Finished;
                self.push(Speaker::Interviewer, "Interview completed!");
                self.push(
                    Speaker::System,
                    &format!("Final score: {final_score}/120"),
                );
                self.push(Speaker::Interviewer, &summary);
                Ok(Status::Finished {
                    final_score,
                    summary,
                })
            }
        }
    }

    /// Presents a question and arms a fresh timer under a new epoch; events
    /// from any previous timer are stale from here on.
    fn ask(&mut self, question: String, difficulty: Difficulty) {
        self.push(
            Speaker::Interviewer,
            &format!("({difficulty}) {question}"),
        );
        self.phase = Phase::InQuestion;
        self.epoch += 1;
        self.timer = Some(QuestionTimer::start(
            self.epoch,
            difficulty.time_limit(),
            self.events.clone(),
        ));
    }

    fn fail(&mut self) {
        self.timer = None;
        self.phase = Phase::Failed;
    }

    fn push(&mut self, speaker: Speaker, text: &str) {
        self.transcript.push(TranscriptLine {
            speaker,
            text: text.to_string(),
        });
    }

    fn field(&self, name: &str) -> &Option<String> {
        match name {
            "name" => &self.fields.name,
            "email" => &self.fields.email,
            _ => &self.fields.phone,
        }
    }

    fn field_mut(&mut self, name: &str) -> &mut Option<String> {
        match name {
            "name" => &mut self.fields.name,
            "email" => &mut self.fields.email,
            _ => &mut self.fields.phone,
        }
    }
}
