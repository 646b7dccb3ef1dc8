//! Page topic classification
//!
//! The crawler treats classification as a black box: any [`Classifier`] maps
//! page text to a label and a confidence score, or fails. A crawl works the
//! same with no classifier at all; nodes then simply carry no classification.

mod keyword;

pub use keyword::{Category, KeywordClassifier};

use crate::ClassifyError;
use serde::Serialize;

/// Topic label assigned to a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// Category name
    pub label: String,

    /// Confidence in the label, between 0.0 and 1.0
    pub confidence: f64,
}

impl Classification {
    /// Creates a classification, clamping the confidence into `0.0..=1.0`
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };

        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Maps page text to a topic
///
/// Implementations may be CPU-heavy; the crawler runs them on the blocking
/// thread pool.
pub trait Classifier: Send + Sync {
    /// Classifies the visible text of a page
    fn classify(&self, text: &str) -> Result<Classification, ClassifyError>;
}

impl<F> Classifier for F
where
    F: Fn(&str) -> Result<Classification, ClassifyError> + Send + Sync,
{
    fn classify(&self, text: &str) -> Result<Classification, ClassifyError> {
        self(text)
    }
}
