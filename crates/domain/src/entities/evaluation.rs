//! Response evaluation payload

use serde::{Deserialize, Serialize};

/// Per-dimension scores for an evaluated answer, each on a 1-10 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationScores {
    /// How clearly the answer was structured
    pub clarity: u8,
    /// How confident the delivery sounded
    pub confidence: u8,
    /// How substantive the answer was
    pub content: u8,
    /// How appropriate the tone was
    pub tone: u8,
}

/// Evaluation of one candidate response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEvaluation {
    /// Dimension scores
    pub scores: EvaluationScores,
    /// Free-form feedback text
    pub feedback: String,
}
