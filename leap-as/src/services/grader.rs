//! Multiple-choice grading
//!
//! Grades positionally-submitted answers against the server-held question
//! bank. Only the bank's answer keys decide correctness; nothing the client
//! sends is trusted beyond the selected values themselves.

use serde::Serialize;

use crate::models::{Question, QuestionKind};

/// Per-question grading detail
#[derive(Debug, Clone, Serialize)]
pub struct QuestionGrade {
    pub question_id: &'static str,
    /// The value the client selected, if any
    pub selected: Option<String>,
    pub correct: bool,
}

/// Grading summary over one submission
#[derive(Debug, Clone, Serialize)]
pub struct GradeSummary {
    pub correct_count: u32,
    /// Number of multiple-choice questions graded
    pub total_graded: u32,
    /// Rounded percentage of correct answers
    pub percent: u32,
    pub per_question: Vec<QuestionGrade>,
}

impl GradeSummary {
    /// Fraction of graded questions answered correctly, 0.0 - 1.0
    pub fn accuracy(&self) -> f64 {
        self.correct_count as f64 / self.total_graded.max(1) as f64
    }
}

/// Grade answers against the question bank
///
/// Answers align with questions by position. A question is correct iff a
/// selected value was supplied at its position AND it equals the canonical
/// answer; missing selections are graded incorrect, never skipped.
/// Free-writing questions do not count toward `total_graded`.
pub fn grade(questions: &[Question], answers: &[Option<String>]) -> GradeSummary {
    let mut correct_count = 0u32;
    let mut total_graded = 0u32;
    let mut per_question = Vec::new();

    for (index, question) in questions.iter().enumerate() {
        let QuestionKind::MultipleChoice { answer } = question.kind else {
            continue;
        };

        total_graded += 1;
        let selected = answers.get(index).and_then(|a| a.clone());
        let correct = selected.as_deref() == Some(answer);
        if correct {
            correct_count += 1;
        }

        per_question.push(QuestionGrade {
            question_id: question.id,
            selected,
            correct,
        });
    }

    // max(...,1) guards division by zero when no multiple-choice questions exist
    let percent =
        (correct_count as f64 / total_graded.max(1) as f64 * 100.0).round() as u32;

    GradeSummary {
        correct_count,
        total_graded,
        percent,
        per_question,
    }
}
