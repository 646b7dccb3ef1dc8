use crate::classify::{Classification, Classifier};
use crate::config::ClassifierConfig;
use crate::ClassifyError;
use std::collections::HashSet;

/// A named set of keywords
#[derive(Debug, Clone)]
pub struct Category {
    pub label: String,
    keywords: HashSet<String>,
}

impl Category {
    /// Creates a category; keywords are matched case-insensitively
    pub fn new<I, S>(label: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            label: label.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    fn hits(&self, words: &[String]) -> usize {
        words.iter().filter(|w| self.keywords.contains(*w)).count()
    }
}

/// Bag-of-words classifier over configured keyword categories
///
/// The page text is split into lowercase words and every category counts how
/// many of them are its keywords. The category with the most hits wins (the
/// earlier category on ties); the confidence is its share of all hits.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    categories: Vec<Category>,
}

impl KeywordClassifier {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Builds the classifier from the `[[classifier.category]]` config tables
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            config
                .category
                .iter()
                .map(|c| Category::new(c.label.clone(), &c.keywords))
                .collect(),
        )
    }

    /// Returns true if no category is configured
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Result<Classification, ClassifyError> {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        if words.is_empty() {
            return Err(ClassifyError::EmptyInput);
        }

        let mut best: Option<(&Category, usize)> = None;
        let mut total_hits = 0;

        for category in &self.categories {
            let hits = category.hits(&words);
            total_hits += hits;
            if hits > best.map(|(_, h)| h).unwrap_or(0) {
                best = Some((category, hits));
            }
        }

        match best {
            Some((category, hits)) => Ok(Classification::new(
                category.label.clone(),
                hits as f64 / total_hits as f64,
            )),
            None => Err(ClassifyError::Failed(
                "no category keyword found in page text".to_string(),
            )),
        }
    }
}
