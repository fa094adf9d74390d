//! ML inference engine using Candle.
//!
//! Provides device selection, safetensors model loading (with a tolerant
//! fallback path for training checkpoints), and the emotion CNN.

mod emotion_net;
mod loader;

pub use emotion_net::{get_device, preprocess_face, EmotionClassifier, INPUT_SIZE, NUM_CLASSES};
pub use loader::{load_checkpoint_tolerant, load_safetensors};

/// Numerically stable softmax over a logit slice.
#[must_use]
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0, -1.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_preserves_argmax() {
        let probs = softmax(&[0.1, 5.0, -2.0]);
        assert!(probs[1] > probs[0] && probs[1] > probs[2]);
    }

    #[test]
    fn test_softmax_handles_large_logits() {
        let probs = softmax(&[1000.0, 999.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(probs[0] > probs[1]);
    }
}
