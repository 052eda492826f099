//! Placement test question bank
//!
//! Questions are fixed and server-defined. Grading only ever consults the
//! answer keys held here; client-declared correctness is never trusted.

use serde::Serialize;

/// Question kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Single-answer multiple choice; holds the canonical answer value
    MultipleChoice { answer: &'static str },
    /// Free-writing prompt, evaluated by the generative model
    FreeWriting,
}

/// One placement question
#[derive(Debug, Clone)]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub kind: QuestionKind,
    /// Options presented to the client (multiple choice only)
    pub options: &'static [&'static str],
}

impl Question {
    pub fn is_multiple_choice(&self) -> bool {
        matches!(self.kind, QuestionKind::MultipleChoice { .. })
    }
}

/// Public view of a question (answer key stripped)
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: &'static str,
    pub prompt: &'static str,
    pub kind: &'static str,
    pub options: &'static [&'static str],
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        QuestionView {
            id: q.id,
            prompt: q.prompt,
            kind: match q.kind {
                QuestionKind::MultipleChoice { .. } => "multiple-choice",
                QuestionKind::FreeWriting => "free-writing",
            },
            options: q.options,
        }
    }
}

/// The fixed placement question set, in presentation order
///
/// Answers submitted by the client are matched positionally against this
/// list.
pub fn placement_questions() -> &'static [Question] {
    &PLACEMENT_QUESTIONS
}

static PLACEMENT_QUESTIONS: [Question; 6] = [
    Question {
        id: "pq-01",
        prompt: "She ___ to the gym every morning before work.",
        kind: QuestionKind::MultipleChoice { answer: "goes" },
        options: &["go", "goes", "going", "gone"],
    },
    Question {
        id: "pq-02",
        prompt: "If I ___ more time, I would learn another language.",
        kind: QuestionKind::MultipleChoice { answer: "had" },
        options: &["have", "had", "would have", "has"],
    },
    Question {
        id: "pq-03",
        prompt: "The report ___ by the committee before the deadline.",
        kind: QuestionKind::MultipleChoice {
            answer: "was reviewed",
        },
        options: &["reviewed", "was reviewed", "has review", "is reviewing"],
    },
    Question {
        id: "pq-04",
        prompt: "Hardly ___ the station when the train departed.",
        kind: QuestionKind::MultipleChoice {
            answer: "had we reached",
        },
        options: &[
            "we had reached",
            "had we reached",
            "we reached",
            "did we reached",
        ],
    },
    Question {
        id: "pq-05",
        prompt: "Choose the word closest in meaning to \"meticulous\".",
        kind: QuestionKind::MultipleChoice { answer: "thorough" },
        options: &["careless", "thorough", "rapid", "generous"],
    },
    Question {
        id: "pq-06",
        prompt: "In a few sentences, describe a place you would like to visit and why.",
        kind: QuestionKind::FreeWriting,
        options: &[],
    },
];
