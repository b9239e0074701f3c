//! Terminal interview client. Uploads a resume, fills any missing contact
//! fields through the chat intake, then runs the six-question loop against
//! the API with a live countdown.
//!
//! Usage: interviewee [resume.pdf|resume.docx]
//! Env:   CRUCIBLE_URL (default http://localhost:8080)

use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crucible_api::controller::{
    ControllerEvent, InterviewApi, Phase, SessionController, Speaker, Status,
};
use crucible_api::interview::handlers::{
    AnswerRequest, AnswerResponse, StartRequest, StartResponse,
};
use crucible_api::resume::fields::CandidateInfo;
use crucible_api::resume::handlers::ExtractResponse;

/// The original client's hardcoded skill set.
const DEFAULT_SKILLS: [&str; 3] = ["React", "Node.js", "JavaScript"];

struct HttpInterviewApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInterviewApi {
    fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn post_json<Req: serde::Serialize, Resp: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{path} returned {status}: {body}");
        }
        response
            .json::<Resp>()
            .await
            .with_context(|| format!("unexpected response shape from {path}"))
    }

    async fn upload_resume(&self, path: &Path) -> Result<ExtractResponse> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        let mime = match path.extension().and_then(|e| e.to_str()) {
            Some("pdf") => "application/pdf",
            _ => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        };
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/api/resume/extract", self.base_url))
            .multipart(form)
            .send()
            .await
            .context("resume upload failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("resume extraction returned {status}: {body}");
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl InterviewApi for HttpInterviewApi {
    async fn start(&self, request: &StartRequest) -> Result<StartResponse> {
        self.post_json("/api/interview/start", request).await
    }

    async fn answer(&self, request: &AnswerRequest) -> Result<AnswerResponse> {
        self.post_json("/api/interview/answer", request).await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let base_url =
        std::env::var("CRUCIBLE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let api = HttpInterviewApi::new(base_url);

    let info = match std::env::args().nth(1) {
        Some(path) => {
            let extracted = api.upload_resume(Path::new(&path)).await?;
            println!("Resume processed.");
            extracted.candidate_info
        }
        None => {
            println!("No resume given; I'll ask for your details instead.");
            CandidateInfo {
                name: None,
                email: None,
                phone: None,
            }
        }
    };

    let (events_tx, mut events_rx) = mpsc::channel(64);
    let skills = DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect();
    let mut controller = SessionController::new(api, skills, events_tx);

    let mut printed = 0;
    let status = controller.begin(info).await?;
    printed = print_new_lines(&controller, printed);
    if render(&status) {
        return Ok(());
    }

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let event = tokio::select! {
            Some(event) = events_rx.recv() => event,
            line = stdin.next_line() => match line? {
                Some(line) => ControllerEvent::UserInput(line),
                None => break, // stdin closed
            },
        };

        let status = controller.handle_event(event).await?;
        printed = print_new_lines(&controller, printed);
        if render(&status) {
            break;
        }
        if controller.phase() == Phase::Failed {
            anyhow::bail!("interview aborted");
        }
    }

    Ok(())
}

/// Prints transcript lines added since the last call; returns the new mark.
fn print_new_lines<A: InterviewApi>(controller: &SessionController<A>, printed: usize) -> usize {
    let transcript = controller.transcript();
    for line in &transcript[printed..] {
        match line.speaker {
            Speaker::Interviewer => println!("AI:  {}", line.text),
            Speaker::Candidate => println!("You: {}", line.text),
            Speaker::System => println!("     {}", line.text),
        }
    }
    transcript.len()
}

/// Renders the countdown; returns true once the interview is over.
fn render(status: &Status) -> bool {
    match status {
        Status::Countdown { remaining } => {
            print!("\r     {remaining:>3}s remaining ");
            let _ = std::io::stdout().flush();
            false
        }
        Status::Finished { final_score, .. } => {
            println!("Done — final score {final_score}/120.");
            true
        }
        Status::Continue => false,
    }
}
