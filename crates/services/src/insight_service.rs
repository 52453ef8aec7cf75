use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::InsightError;
use mastery_core::model::{
    Domain, Enabler, ExamDifficulty, Insight, ProjectLifecycle, Question, QuestionId, Task, TaskId,
};

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct InsightConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl InsightConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("MASTERY_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("MASTERY_AI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("MASTERY_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Client for the external insight generator.
///
/// Prompt in, validated-shape JSON out; any OpenAI-compatible
/// chat-completions endpoint satisfies the contract. The service is
/// disabled (not an error) when no API key is configured, and every
/// request failure maps to an `InsightError` at this boundary.
#[derive(Clone)]
pub struct InsightService {
    client: Client,
    config: Option<InsightConfig>,
}

impl InsightService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(InsightConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<InsightConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Deep-dive insight for one enabler under a lifecycle lens.
    ///
    /// # Errors
    ///
    /// Returns `InsightError` when the service is disabled, the request
    /// fails, or the response does not match the insight shape.
    pub async fn enabler_insight(
        &self,
        task: &Task,
        domain: &Domain,
        enabler: &Enabler,
        lifecycle: ProjectLifecycle,
    ) -> Result<Insight, InsightError> {
        let prompt = enabler_insight_prompt(task, domain, enabler, lifecycle);
        let body = self.generate(&prompt).await?;
        parse_insight(&body)
    }

    /// Synthesized insight across the enablers the user has selected.
    ///
    /// # Errors
    ///
    /// Returns `InsightError::EmptySelection` before any network call when
    /// no descriptions are given; otherwise as `enabler_insight`.
    pub async fn task_synthesis(
        &self,
        task: &Task,
        domain: &Domain,
        enabler_descriptions: &[String],
    ) -> Result<Insight, InsightError> {
        if enabler_descriptions.is_empty() {
            return Err(InsightError::EmptySelection);
        }

        let prompt = task_synthesis_prompt(task, domain, enabler_descriptions);
        let body = self.generate(&prompt).await?;
        parse_insight(&body)
    }

    /// A batch of simulation questions for the given domains.
    ///
    /// The batch is validated fail-closed: one malformed question rejects
    /// the whole batch and no session is created from it.
    ///
    /// # Errors
    ///
    /// Returns `InsightError::InvalidBatch` for malformed questions,
    /// `InsightError::EmptyBatch` for an empty one, or transport/parse
    /// errors as for `enabler_insight`.
    pub async fn exam_questions(
        &self,
        domain_names: &[String],
        difficulty: ExamDifficulty,
    ) -> Result<Vec<Question>, InsightError> {
        let prompt = exam_questions_prompt(domain_names, difficulty);
        let body = self.generate(&prompt).await?;
        parse_question_batch(&body)
    }

    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let config = self.config.as_ref().ok_or(InsightError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InsightError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(InsightError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

//
// ─── PROMPTS ───────────────────────────────────────────────────────────────────
//

fn enabler_insight_prompt(
    task: &Task,
    domain: &Domain,
    enabler: &Enabler,
    lifecycle: ProjectLifecycle,
) -> String {
    format!(
        "As an expert Senior Project Manager with 20+ years of experience, provide deep \
         insights for the PMP enabler \"{}\" under the task \"{}\" within the \"{}\" domain, \
         viewed through a {lifecycle} project lifecycle. Focus on practical reality vs \
         theoretical framework, and give a few catchy tips or mnemonics for the exam.\n\n\
         Respond with a single JSON object (no prose, no markdown) with keys: \
         \"summary\" (string), \"bestPractices\" (array of strings), \"commonPitfalls\" \
         (array of strings), \"modernPerspective\" (string), \"tipsToRemember\" (array of \
         strings), and optionally \"mnemonic\" (string), \"ittos\" (object with \"inputs\", \
         \"tools\", \"outputs\" string arrays), \"interconnectivity\" (string).",
        enabler.description(),
        task.name(),
        domain.name(),
    )
}

fn task_synthesis_prompt(task: &Task, domain: &Domain, descriptions: &[String]) -> String {
    format!(
        "As an expert Senior Project Manager, synthesize the PMP task \"{}\" in the \"{}\" \
         domain across these selected enablers:\n- {}\n\nExplain how they work together in \
         practice and what the exam expects. Respond with a single JSON object (no prose, \
         no markdown) with keys: \"summary\", \"bestPractices\", \"commonPitfalls\", \
         \"modernPerspective\", \"tipsToRemember\", and optionally \"mnemonic\", \"ittos\", \
         \"interconnectivity\".",
        task.name(),
        domain.name(),
        descriptions.join("\n- "),
    )
}

fn exam_questions_prompt(domain_names: &[String], difficulty: ExamDifficulty) -> String {
    format!(
        "Generate {count} situational PMP exam questions at {difficulty} difficulty covering \
         the domains: {domains}. Prefer servant-leadership and value-delivery scenarios over \
         rote tool questions.\n\nRespond with a single JSON array (no prose, no markdown) of \
         objects with keys: \"id\" (string), \"question\" (string), \"options\" (array of 4 \
         strings), \"correctAnswerIndex\" (integer index into options), \"explanation\" \
         (string), \"domain\" (string), and optionally \"taskId\" (string).",
        count = difficulty.question_count(),
        domains = domain_names.join(", "),
    )
}

//
// ─── RESPONSE PARSING ──────────────────────────────────────────────────────────
//

/// Wire shape of one generated question, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDraft {
    id: String,
    question: String,
    options: Vec<String>,
    correct_answer_index: usize,
    explanation: String,
    domain: String,
    #[serde(default)]
    task_id: Option<String>,
}

fn parse_insight(body: &str) -> Result<Insight, InsightError> {
    let insight: Insight = serde_json::from_str(strip_code_fences(body))?;
    Ok(insight)
}

fn parse_question_batch(body: &str) -> Result<Vec<Question>, InsightError> {
    let drafts: Vec<QuestionDraft> = serde_json::from_str(strip_code_fences(body))?;
    if drafts.is_empty() {
        return Err(InsightError::EmptyBatch);
    }

    let mut questions = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let question = Question::new(
            QuestionId::new(draft.id),
            draft.question,
            draft.options,
            draft.correct_answer_index,
            draft.explanation,
            draft.domain,
            draft.task_id.map(TaskId::new),
        )?;
        questions.push(question);
    }
    Ok(questions)
}

/// Models occasionally wrap the JSON payload in a markdown code fence even
/// when told not to; strip it before parsing.
fn strip_code_fences(body: &str) -> &str {
    let trimmed = body.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use mastery_core::model::{Curriculum, QuestionError, TaskId};

    const VALID_BATCH: &str = r#"[
        {
            "id": "q1",
            "question": "A stakeholder escalates a conflict. What first?",
            "options": ["Escalate to sponsor", "Evaluate the conflict source", "Replace the team member", "Ignore it"],
            "correctAnswerIndex": 1,
            "explanation": "Evaluate before acting.",
            "domain": "People",
            "taskId": "p2"
        },
        {
            "id": "q2",
            "question": "The backlog is too large for the release. What next?",
            "options": ["Cut quality", "Prioritize by value", "Extend deadline unilaterally", "Add overtime"],
            "correctAnswerIndex": 1,
            "explanation": "Value-based prioritization.",
            "domain": "Process"
        }
    ]"#;

    #[test]
    fn disabled_without_api_key() {
        let service = InsightService::new(None);
        assert!(!service.enabled());
    }

    #[tokio::test]
    async fn disabled_service_rejects_requests() {
        let service = InsightService::new(None);
        let curriculum = Curriculum::builtin();
        let domain = &curriculum.domains()[0];
        let task = &domain.tasks()[0];

        let err = service
            .task_synthesis(task, domain, &["Identify risks".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, InsightError::Disabled));
    }

    #[tokio::test]
    async fn empty_selection_is_rejected_before_any_request() {
        // Even a disabled service reports the precondition failure first.
        let service = InsightService::new(None);
        let curriculum = Curriculum::builtin();
        let domain = &curriculum.domains()[0];
        let task = &domain.tasks()[0];

        let err = service.task_synthesis(task, domain, &[]).await.unwrap_err();
        assert!(matches!(err, InsightError::EmptySelection));
    }

    #[test]
    fn parses_valid_question_batch() {
        let questions = parse_question_batch(VALID_BATCH).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].task_id(), Some(&TaskId::new("p2")));
        assert_eq!(questions[1].task_id(), None);
        assert!(questions[0].is_correct(1));
    }

    #[test]
    fn batch_with_out_of_range_answer_is_rejected_entirely() {
        let body = r#"[
            {
                "id": "q1",
                "question": "Valid question?",
                "options": ["A", "B"],
                "correctAnswerIndex": 0,
                "explanation": "",
                "domain": "People"
            },
            {
                "id": "q2",
                "question": "Broken question?",
                "options": ["A", "B"],
                "correctAnswerIndex": 2,
                "explanation": "",
                "domain": "People"
            }
        ]"#;

        let err = parse_question_batch(body).unwrap_err();
        assert!(matches!(
            err,
            InsightError::InvalidBatch(QuestionError::CorrectIndexOutOfRange { index: 2, options: 2 })
        ));
    }

    #[test]
    fn batch_with_too_few_options_is_rejected() {
        let body = r#"[
            {
                "id": "q1",
                "question": "One option only?",
                "options": ["A"],
                "correctAnswerIndex": 0,
                "explanation": "",
                "domain": "Process"
            }
        ]"#;

        let err = parse_question_batch(body).unwrap_err();
        assert!(matches!(
            err,
            InsightError::InvalidBatch(QuestionError::TooFewOptions(1))
        ));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let err = parse_question_batch("[]").unwrap_err();
        assert!(matches!(err, InsightError::EmptyBatch));
    }

    #[test]
    fn missing_required_question_field_is_a_parse_error() {
        let body = r#"[{ "id": "q1", "options": ["A", "B"], "correctAnswerIndex": 0 }]"#;
        let err = parse_question_batch(body).unwrap_err();
        assert!(matches!(err, InsightError::Parse(_)));
    }

    #[test]
    fn code_fences_are_stripped() {
        let fenced = format!("```json\n{VALID_BATCH}\n```");
        let questions = parse_question_batch(&fenced).unwrap();
        assert_eq!(questions.len(), 2);

        let insight_body = r#"```json
        {
            "summary": "s",
            "bestPractices": [],
            "commonPitfalls": [],
            "modernPerspective": "m",
            "tipsToRemember": []
        }
        ```"#;
        let insight = parse_insight(insight_body).unwrap();
        assert_eq!(insight.summary, "s");
    }

    #[test]
    fn malformed_insight_fails_closed() {
        let err = parse_insight(r#"{"summary": "only a summary"}"#).unwrap_err();
        assert!(matches!(err, InsightError::Parse(_)));
    }

    #[test]
    fn prompts_carry_context() {
        let curriculum = Curriculum::builtin();
        let domain = &curriculum.domains()[0];
        let task = &domain.tasks()[1];
        let enabler = &task.enablers()[0];

        let prompt = enabler_insight_prompt(task, domain, enabler, ProjectLifecycle::Agile);
        assert!(prompt.contains("Manage conflicts"));
        assert!(prompt.contains("Identify conflict sources"));
        assert!(prompt.contains("agile"));

        let prompt = exam_questions_prompt(&["People".into(), "Process".into()], ExamDifficulty::Hard);
        assert!(prompt.contains("20"));
        assert!(prompt.contains("People, Process"));
    }
}
