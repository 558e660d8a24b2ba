//! Offline reply generation.
//!
//! Used whenever the remote completion path is disabled or fails:
//! classifier rules first, then two-operand arithmetic, then the `default` category.

pub mod arithmetic;
pub mod catalog;
pub mod classifier;
pub mod selector;

pub use arithmetic::{ArithmeticEvaluator, EvaluationFailure, EVALUATION_APOLOGY};
pub use catalog::{Category, ResponseCatalog};
pub use classifier::{ClassificationRule, Classifier};
pub use selector::ResponseSelector;

use rand::Rng;

/// Classifier and arithmetic evaluator bundled in routing order.
///
/// Immutable after construction and safe to share across conversations.
#[derive(Debug, Clone, Default)]
pub struct FallbackResponder {
    classifier: Classifier,
    evaluator: ArithmeticEvaluator,
}

impl FallbackResponder {
    pub fn new(classifier: Classifier, evaluator: ArithmeticEvaluator) -> Self {
        Self {
            classifier,
            evaluator,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn evaluator(&self) -> &ArithmeticEvaluator {
        &self.evaluator
    }

    pub fn respond<R: Rng>(
        &self,
        text: &str,
        catalog: &ResponseCatalog,
        selector: &mut ResponseSelector<R>,
    ) -> String {
        if let Some(category) = self.classifier.classify_rule(text) {
            tracing::debug!("Fallback matched category '{}'", category);
            return selector.select(catalog, category).to_string();
        }

        if let Some(answer) = self.evaluator.try_evaluate(text) {
            tracing::debug!("Fallback answered arithmetic expression");
            return answer;
        }

        selector.select(catalog, Category::Default).to_string()
    }
}
