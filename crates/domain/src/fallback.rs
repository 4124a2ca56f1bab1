//! Deterministic fallback content
//!
//! Served when no provider is eligible or every attempt failed. Selection is
//! a pure function of the question number so a retried request gets the same
//! canned question regardless of prior state.

use crate::entities::{EvaluationScores, ResponseEvaluation};

/// Codename reported when fallback content is served instead of a provider
pub const FALLBACK_MODEL: &str = "Fallback";

/// Canned interview questions, served in question-number order
pub const FALLBACK_QUESTIONS: [&str; 5] = [
    "Tell me about yourself and your professional background.",
    "Describe a challenging problem you solved recently. What was your approach?",
    "What interests you about this role, and why do you think you are a good fit?",
    "Tell me about a time you disagreed with a teammate. How did you resolve it?",
    "Where do you see yourself in five years, and what are you doing to get there?",
];

/// Select the canned question for a 1-indexed question number.
///
/// `question_number = 1` selects the first question; numbering wraps around
/// the list, so with 5 questions number 6 selects the first again.
#[must_use]
pub fn fallback_question(question_number: u32) -> &'static str {
    let index = question_number.saturating_sub(1) as usize % FALLBACK_QUESTIONS.len();
    FALLBACK_QUESTIONS[index]
}

/// The fixed evaluation served when no evaluator is available.
///
/// The flat 7/7/7/7 scores are a deliberate simplification carried over from
/// the original service contract; do not "improve" them.
#[must_use]
pub fn fallback_evaluation() -> ResponseEvaluation {
    ResponseEvaluation {
        scores: EvaluationScores {
            clarity: 7,
            confidence: 7,
            content: 7,
            tone: 7,
        },
        feedback: "Good answer. Focus on structuring your response with a clear \
                   beginning, middle, and end, and back your points with concrete examples."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_number_one_selects_first() {
        assert_eq!(fallback_question(1), FALLBACK_QUESTIONS[0]);
    }

    #[test]
    fn numbering_wraps_around_the_list() {
        assert_eq!(fallback_question(6), fallback_question(1));
        assert_eq!(fallback_question(12), fallback_question(2));
    }

    #[test]
    fn zero_is_clamped_to_the_first_question() {
        assert_eq!(fallback_question(0), FALLBACK_QUESTIONS[0]);
    }

    #[test]
    fn fallback_evaluation_scores_are_flat_sevens() {
        let eval = fallback_evaluation();
        assert_eq!(eval.scores.clarity, 7);
        assert_eq!(eval.scores.confidence, 7);
        assert_eq!(eval.scores.content, 7);
        assert_eq!(eval.scores.tone, 7);
        assert!(!eval.feedback.is_empty());
    }
}
