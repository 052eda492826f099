//! Evaluation orchestrator
//!
//! Composes the generative model, the response normalizer, the level mapper,
//! and (for placement tests) deterministic multiple-choice grading into one
//! `AssessmentResult`.
//!
//! Failure policy is deliberately asymmetric:
//! - speaking/writing: a model *network* failure aborts the request, but an
//!   unparsable response degrades to an `Unknown` result;
//! - placement: any model failure (network or parse) silently degrades to
//!   the multiple-choice percentage; the submission is never rejected for
//!   a model problem.

use serde::Deserialize;
use std::sync::Arc;

use crate::models::{
    placement_questions, AssessmentKind, AssessmentResult, QuestionKind, SubScores,
};
use crate::services::generation_client::{GenerateError, GenerationClient};
use crate::services::grader;
use crate::services::level_mapper;
use crate::services::response_normalizer::{normalize, Normalized};

/// Minimum trimmed length for a free-writing answer to reach the model
const FREE_WRITING_MIN_CHARS: usize = 20;

/// Structured fields the model is asked to return; all optional so a
/// partially-conforming response still contributes what it has
#[derive(Debug, Default, Deserialize)]
struct ModelEvaluation {
    #[allow(dead_code)]
    level: Option<String>,
    confidence: Option<f64>,
    #[serde(default)]
    scores: ModelScores,
    explanation: Option<String>,
    improvements: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelScores {
    vocabulary: Option<f64>,
    grammar: Option<f64>,
    cohesion: Option<f64>,
}

/// Evaluation orchestrator service
pub struct Evaluator {
    generation: Arc<GenerationClient>,
}

impl Evaluator {
    pub fn new(generation: Arc<GenerationClient>) -> Self {
        Self { generation }
    }

    /// Evaluate a speaking transcript or writing sample
    ///
    /// Network failures propagate (the whole request aborts with no partial
    /// persistence); an unparsable model response degrades to an `Unknown`
    /// result carrying the raw text.
    pub async fn evaluate_sample(
        &self,
        kind: AssessmentKind,
        text: &str,
    ) -> Result<AssessmentResult, GenerateError> {
        let prompt = build_evaluation_prompt(kind, text);
        let output = self.generation.generate(&prompt).await?;

        let result = match normalize(&output) {
            Normalized::Parsed(value) | Normalized::Degraded(value) => {
                match serde_json::from_value::<ModelEvaluation>(value) {
                    Ok(eval) => result_from_model(eval),
                    Err(e) => {
                        tracing::warn!(error = %e, "Model JSON did not match evaluation shape");
                        AssessmentResult::unknown(output)
                    }
                }
            }
            Normalized::Failed { raw } => {
                tracing::warn!(kind = kind.as_str(), "Model output not JSON-recoverable");
                AssessmentResult::unknown(raw)
            }
        };

        Ok(result)
    }

    /// Evaluate a placement submission
    ///
    /// Multiple-choice answers are graded against the server-held bank; a
    /// qualifying free-writing answer additionally goes through the model.
    /// The model can only improve on the MCQ baseline; its failure never
    /// fails the submission.
    pub async fn evaluate_placement(
        &self,
        answers: &[Option<String>],
        claimed_level: Option<&str>,
    ) -> AssessmentResult {
        let questions = placement_questions();
        let summary = grader::grade(questions, answers);
        let mcq_percent = summary.percent as f64;

        // Baseline: MCQ percentage stands in for every dimension
        let mut scores = SubScores::uniform(mcq_percent);
        let mut confidence = summary.accuracy();
        let mut explanation = format!(
            "Placement graded from {} of {} multiple-choice answers correct.",
            summary.correct_count, summary.total_graded
        );
        let mut improvements = None;
        let mut writing_evaluated = false;

        if let Some(text) = qualifying_free_writing(answers) {
            match self.evaluate_free_writing(text).await {
                Some(eval) => {
                    // Model-supplied scores override the MCQ-derived value
                    // per dimension; absent keys keep the baseline.
                    if let Some(v) = eval.scores.vocabulary {
                        scores.vocabulary = v;
                    }
                    if let Some(g) = eval.scores.grammar {
                        scores.grammar = g;
                    }
                    if let Some(c) = eval.scores.cohesion {
                        scores.cohesion = c;
                    }
                    if let Some(conf) = eval.confidence {
                        confidence = conf.clamp(0.0, 1.0);
                    }
                    if let Some(text) = eval.explanation {
                        explanation = text;
                    }
                    improvements = eval.improvements;
                    writing_evaluated = true;
                }
                None => {
                    tracing::warn!(
                        "Free-writing evaluation unavailable; falling back to multiple-choice scores"
                    );
                }
            }
        }

        let (level, overall) = level_mapper::map_to_level(&scores);

        AssessmentResult {
            level,
            confidence,
            overall_score: overall,
            scores,
            explanation,
            improvements,
            details: Some(serde_json::json!({
                "grading": summary,
                "claimed_level": claimed_level,
                "writing_evaluated": writing_evaluated,
            })),
        }
    }

    /// Model pass over a free-writing answer; None on any failure
    async fn evaluate_free_writing(&self, text: &str) -> Option<ModelEvaluation> {
        let prompt = build_evaluation_prompt(AssessmentKind::Writing, text);
        let output = match self.generation.generate(&prompt).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "Model call failed during placement");
                return None;
            }
        };

        let value = normalize(&output).into_value()?;
        serde_json::from_value(value).ok()
    }
}

/// First free-writing answer long enough to be worth scoring
fn qualifying_free_writing(answers: &[Option<String>]) -> Option<&str> {
    placement_questions()
        .iter()
        .enumerate()
        .filter(|(_, q)| matches!(q.kind, QuestionKind::FreeWriting))
        .find_map(|(i, _)| {
            let text = answers.get(i)?.as_deref()?.trim();
            (text.len() >= FREE_WRITING_MIN_CHARS).then_some(text)
        })
}

/// Build an assessment result from a structured model evaluation
///
/// The level always comes from the mapper over the (defaulted) scores; the
/// model's own level claim is informational only.
fn result_from_model(eval: ModelEvaluation) -> AssessmentResult {
    let scores = SubScores {
        vocabulary: eval.scores.vocabulary.unwrap_or(0.0),
        grammar: eval.scores.grammar.unwrap_or(0.0),
        cohesion: eval.scores.cohesion.unwrap_or(0.0),
    };
    let (level, overall) = level_mapper::map_to_level(&scores);

    AssessmentResult {
        level,
        confidence: eval.confidence.unwrap_or(0.0).clamp(0.0, 1.0),
        overall_score: overall,
        scores,
        explanation: eval.explanation.unwrap_or_default(),
        improvements: eval.improvements,
        details: None,
    }
}

/// Evaluation prompt demanding exactly the JSON schema the pipeline parses
fn build_evaluation_prompt(kind: AssessmentKind, text: &str) -> String {
    let sample_label = match kind {
        AssessmentKind::Speaking => "transcribed speech sample",
        _ => "writing sample",
    };

    format!(
        "You are an English proficiency examiner. Evaluate the learner's {sample_label} below.\n\
         Respond with exactly one JSON object and nothing else, using this schema:\n\
         {{\"level\": \"A1|A2|B1|B2|C1|C2\", \"confidence\": <number 0-1>, \
         \"scores\": {{\"vocabulary\": <0-100>, \"grammar\": <0-100>, \"cohesion\": <0-100>}}, \
         \"explanation\": \"<short rationale>\", \"improvements\": \"<concrete suggestions>\"}}\n\
         \n\
         Sample:\n\"\"\"\n{text}\n\"\"\""
    )
}
