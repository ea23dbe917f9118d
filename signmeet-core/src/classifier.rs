//! Sign-classification collaborator interface.
//!
//! The model itself lives outside this system; the core only consumes the
//! `(label, confidence)` result. A failed inference is treated by callers as
//! a zero-confidence result, never as a fatal error.

use async_trait::async_trait;

use crate::Result;

/// A single classification result
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Predicted label, absent when the model produced nothing usable
    pub label: Option<String>,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl Classification {
    /// The result used when no model is available or inference failed
    #[must_use]
    pub const fn none() -> Self {
        Self {
            label: None,
            confidence: 0.0,
        }
    }
}

/// Image-to-label classifier seam
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a raw image frame. No side effects.
    async fn classify(&self, image: &[u8]) -> Result<Classification>;

    /// Whether a usable model is loaded behind this classifier
    fn is_loaded(&self) -> bool {
        true
    }
}

/// Classifier used when no model is configured; always yields no label.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullClassifier;

#[async_trait]
impl Classifier for NullClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Classification> {
        Ok(Classification::none())
    }

    fn is_loaded(&self) -> bool {
        false
    }
}
