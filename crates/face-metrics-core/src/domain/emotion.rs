//! Emotion classification result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The fixed emotion categories, in classifier output order.
///
/// The classifier produces a 7-length probability vector whose positions
/// correspond to these labels one-to-one. Order must not change.
pub const EMOTION_LABELS: [&str; 7] = [
    "angry", "disgust", "fear", "happy", "sad", "surprise", "neutral",
];

/// Result of classifying the emotion of a single face.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionResult {
    /// The argmax emotion label.
    pub predicted_emotion: String,
    /// Probability of the predicted emotion, in `[0, 1]`.
    pub confidence: f32,
    /// Probability for every label, in `[0, 1]`, summing to ~1.0.
    pub all_probabilities: BTreeMap<String, f32>,
}

impl EmotionResult {
    /// Builds a result from a probability vector in [`EMOTION_LABELS`] order.
    #[must_use]
    pub fn from_probabilities(probabilities: [f32; 7]) -> Self {
        let (argmax, _) = probabilities
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |(best_i, best_p), (i, &p)| {
                if p > best_p {
                    (i, p)
                } else {
                    (best_i, best_p)
                }
            });

        let all_probabilities = EMOTION_LABELS
            .iter()
            .zip(probabilities.iter())
            .map(|(label, &p)| ((*label).to_string(), p))
            .collect();

        Self {
            predicted_emotion: EMOTION_LABELS[argmax].to_string(),
            confidence: probabilities[argmax],
            all_probabilities,
        }
    }
}
