//! All LLM prompt constants for the interview module. Templates use
//! `{placeholder}` substitution; token budgets sit next to the prompt they
//! bound.

use crate::interview::session::{Difficulty, Session};

pub const QUESTION_MAX_TOKENS: u32 = 150;
pub const EVALUATION_MAX_TOKENS: u32 = 150;
pub const SUMMARY_MAX_TOKENS: u32 = 250;

/// Question generation. Replace `{difficulty}` and `{skills}`.
const QUESTION_PROMPT_TEMPLATE: &str = "You are an AI interviewer. \
    Generate a {difficulty} technical interview question for a Full Stack \
    developer skilled in {skills}. Return only the question text.";

/// Answer evaluation — asks for a strict JSON payload.
/// Replace `{question}` and `{answer}`.
const EVALUATION_PROMPT_TEMPLATE: &str = r#"Question: {question}
Answer: {answer}

Task: Evaluate this answer for correctness, completeness, and clarity. Give a score from 0 to 20 and a one-sentence feedback. Respond in JSON like { "score": 15, "feedback": "..." }"#;

/// Final hiring summary. Replace `{name}`, `{skills}`, `{scores}`, `{total}`
/// and `{max}`.
const SUMMARY_PROMPT_TEMPLATE: &str = r#"Candidate Name: {name}
Skills: {skills}
Scores: {scores}
Total Score: {total}/{max}
Task: Provide a short professional summary of the candidate and a clear hiring recommendation."#;

pub fn question_prompt(difficulty: Difficulty, skills: &[String]) -> String {
    QUESTION_PROMPT_TEMPLATE
        .replace("{difficulty}", &difficulty.to_string())
        .replace("{skills}", &skills.join(", "))
}

pub fn evaluation_prompt(question: &str, answer: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

pub fn summary_prompt(session: &Session) -> String {
    let scores = session
        .answers
        .iter()
        .map(|a| format!("{}/20 for Q: {}", a.score, a.question))
        .collect::<Vec<_>>()
        .join("\n");

    SUMMARY_PROMPT_TEMPLATE
        .replace("{name}", &session.name)
        .replace("{skills}", &session.skills.join(", "))
        .replace("{scores}", &scores)
        .replace("{total}", &session.total_score.to_string())
        .replace("{max}", &session.max_score().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_prompt_names_difficulty_and_skills() {
        let p = question_prompt(Difficulty::Medium, &["React".into(), "Node.js".into()]);
        assert!(p.contains("Medium"));
        assert!(p.contains("React, Node.js"));
        assert!(p.contains("Return only the question text."));
    }

    #[test]
    fn evaluation_prompt_embeds_question_and_answer() {
        let p = evaluation_prompt("What is ownership?", "A memory model.");
        assert!(p.starts_with("Question: What is ownership?"));
        assert!(p.contains("Answer: A memory model."));
        assert!(p.contains(r#"{ "score": 15, "feedback": "..." }"#));
    }
}
