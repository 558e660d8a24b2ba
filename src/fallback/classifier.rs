//! Ordered pattern rules mapping user text to a [`Category`].

use super::catalog::Category;
use once_cell::sync::Lazy;
use regex::Regex;

/// A single (pattern, category) pair.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pattern: Regex,
    category: Category,
}

impl ClassificationRule {
    pub fn new(pattern: &str, category: Category) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            category,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, normalized: &str) -> bool {
        self.pattern.is_match(normalized)
    }
}

/// Rule table in priority order. First match wins.
///
/// Matching is plain substring/regex on lower-cased text, so a message that hits
/// several rules resolves to the earliest one ("hello, can you calculate 2+2" is a greeting).
const STANDARD_RULES: &[(&str, Category)] = &[
    (
        r"^(hi|hello|hey|good morning|good afternoon|good evening|greetings)",
        Category::Greetings,
    ),
    (r"how are you|how's it going|how do you do", Category::HowAreYou),
    (r"what's your name|who are you|your name", Category::Name),
    (r"weather|temperature|rain|sunny|cloudy", Category::Weather),
    (r"what time|current time|time is it", Category::Time),
    (r"what date|today's date|what day", Category::Date),
    (
        r"programming|coding|code|javascript|python|html|css|development",
        Category::Programming,
    ),
    (r"math|calculate|equation|formula|number", Category::Math),
    (r"help|what can you do|capabilities|assist", Category::Help),
    (r"thank you|thanks|appreciate", Category::Thanks),
];

static COMPILED_STANDARD_RULES: Lazy<Vec<ClassificationRule>> = Lazy::new(|| {
    STANDARD_RULES
        .iter()
        .filter_map(|(pattern, category)| match ClassificationRule::new(pattern, *category) {
            Ok(rule) => Some(rule),
            Err(e) => {
                tracing::error!("Invalid classification pattern for {}: {}", category, e);
                None
            }
        })
        .collect()
});

/// Lower-case and trim, the form every rule is matched against.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Maps free text to a response category using an ordered rule list.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Classifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// Classifier with the built-in rule table.
    pub fn standard() -> Self {
        Self::new(COMPILED_STANDARD_RULES.clone())
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// First matching rule's category, without falling through to `Default`.
    pub fn classify_rule(&self, text: &str) -> Option<Category> {
        let normalized = normalize(text);
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(ClassificationRule::category)
    }

    pub fn classify(&self, text: &str) -> Category {
        self.classify_rule(text).unwrap_or(Category::Default)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}
