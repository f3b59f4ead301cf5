//! Game-code agent boundary: generate JavaScript games from lecture text and
//! validate game code.
//!
//! The remote implementation lives in `openai.rs`. This module holds the trait,
//! the static syntax check, reply parsing, and the local fallback agent.

use std::sync::LazyLock;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::Serialize;

use crate::domain::ValidationResult;
use crate::errors::{AgentError, ValidationError};
use crate::util::fill_template;

const FALLBACK_GAME_TEMPLATE: &str = include_str!("assets/fallback_game.js");
const MAX_QUESTIONS: usize = 5;
/// Counted in UTF-16 code units, like a browser's `String.length`.
const MIN_SENTENCE_LEN: usize = 20;

static JS_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```javascript(.*?)```").expect("valid regex"));
static SHORT_JS_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```js(.*?)```").expect("valid regex"));
static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("valid regex"));
static BARE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(function|const|let).*?\{(?s:.*?)\}").expect("valid regex"));

#[async_trait]
pub trait GameAgent: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;
    async fn generate_game_code(&self, content: &str) -> Result<String, AgentError>;
    async fn validate_game_code(&self, source: &str) -> Result<ValidationResult, AgentError>;
}

/// Brace/paren counting plus a declaration check. Not a parser.
pub fn check_syntax(code: &str) -> Result<(), ValidationError> {
    if !["function", "const", "let"].iter().any(|k| code.contains(k)) {
        return Err(ValidationError::NoDeclarations);
    }
    if code.matches('{').count() != code.matches('}').count() {
        return Err(ValidationError::UnbalancedBraces);
    }
    if code.matches('(').count() != code.matches(')').count() {
        return Err(ValidationError::UnbalancedParens);
    }
    Ok(())
}

pub fn invalid_result(e: &ValidationError) -> ValidationResult {
    ValidationResult { is_valid: false, score: 0, feedback: format!("Invalid: {e}") }
}

/// Heuristic score for code that already passed `check_syntax`.
pub fn local_score(code: &str) -> u8 {
    let mut score: u8 = 50;
    if code.contains("document.") {
        score += 15;
    }
    if code.contains("addEventListener") || code.contains("onclick") {
        score += 15;
    }
    if code.contains("score") {
        score += 10;
    }
    if code.len() >= 500 {
        score += 10;
    }
    score.min(100)
}

pub fn validate_locally(code: &str) -> ValidationResult {
    match check_syntax(code) {
        Ok(()) => ValidationResult {
            is_valid: true,
            score: local_score(code),
            feedback: "Valid: JavaScript code structure looks good".into(),
        },
        Err(e) => invalid_result(&e),
    }
}

/// Pull game code out of a free-form model reply: a ```javascript fence,
/// then ```js, then any fence, then the first bare declaration block.
pub fn extract_game_code(reply: &str) -> Option<String> {
    [&*JS_FENCE, &*SHORT_JS_FENCE, &*ANY_FENCE]
        .into_iter()
        .find_map(|re| re.captures(reply).and_then(|c| c.get(1)))
        .map(|m| m.as_str().trim().to_string())
        .or_else(|| BARE_CODE.find(reply).map(|m| m.as_str().to_string()))
        .filter(|code| !code.is_empty())
}

#[derive(Debug, Serialize)]
struct BlankQuestion {
    question: String,
    answer: String,
    #[serde(rename = "wrongAnswers")]
    wrong_answers: Vec<String>,
}

fn blank_questions<R: Rng + ?Sized>(content: &str, rng: &mut R) -> Vec<BlankQuestion> {
    content
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.encode_utf16().count() > MIN_SENTENCE_LEN)
        .take(MAX_QUESTIONS)
        .enumerate()
        .filter_map(|(i, sentence)| {
            let words: Vec<&str> = sentence.split_whitespace().collect();
            let key = *words.choose(rng)?;
            let incomplete = sentence.replacen(key, "_____", 1);

            let mut wrong: Vec<String> = Vec::new();
            for _ in 0..3 {
                if let Some(w) = words.choose(rng) {
                    if *w != key && w.len() > 2 && !wrong.iter().any(|x| x == w) {
                        wrong.push((*w).to_string());
                    }
                }
            }

            Some(BlankQuestion {
                question: format!(
                    "Question {}: Fill in the blank in this sentence from the lecture: \"{}\"",
                    i + 1,
                    incomplete
                ),
                answer: key.to_string(),
                wrong_answers: wrong,
            })
        })
        .collect()
}

/// Self-contained fill-in-the-blank quiz built from the lecture's sentences.
pub fn fallback_game_script<R: Rng + ?Sized>(content: &str, rng: &mut R) -> String {
    let questions = blank_questions(content, rng);
    let json = serde_json::to_string(&questions).unwrap_or_else(|_| "[]".into());
    fill_template(FALLBACK_GAME_TEMPLATE, &[("questions", &json)])
}

/// Offline agent: template quiz generation and static validation.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalGameAgent;

#[async_trait]
impl GameAgent for LocalGameAgent {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate_game_code(&self, content: &str) -> Result<String, AgentError> {
        let script = fallback_game_script(content, &mut rand::thread_rng());
        Ok(script)
    }

    async fn validate_game_code(&self, source: &str) -> Result<ValidationResult, AgentError> {
        Ok(validate_locally(source))
    }
}
