//! Canned reply catalog.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response category a message is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Greetings,
    HowAreYou,
    Name,
    Weather,
    Time,
    Date,
    Programming,
    Math,
    Help,
    Thanks,
    Default,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Greetings,
        Category::HowAreYou,
        Category::Name,
        Category::Weather,
        Category::Time,
        Category::Date,
        Category::Programming,
        Category::Math,
        Category::Help,
        Category::Thanks,
        Category::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Greetings => "greetings",
            Category::HowAreYou => "howAreYou",
            Category::Name => "name",
            Category::Weather => "weather",
            Category::Time => "time",
            Category::Date => "date",
            Category::Programming => "programming",
            Category::Math => "math",
            Category::Help => "help",
            Category::Thanks => "thanks",
            Category::Default => "default",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const GREETINGS: &[&str] = &[
    "Hello! How can I assist you today?",
    "Hi there! What would you like to know?",
    "Hey! I'm here to help. What's on your mind?",
    "Greetings! How may I be of service?",
];

const HOW_ARE_YOU: &[&str] = &[
    "I'm doing great, thank you for asking! How are you?",
    "I'm functioning perfectly and ready to help! How about you?",
    "I'm excellent! Thanks for checking in. What can I do for you?",
];

const NAME: &[&str] = &[
    "I'm JASS GPT, your AI assistant!",
    "You can call me JASS GPT. I'm here to help!",
    "I'm JASS GPT - your virtual AI companion!",
];

const WEATHER: &[&str] = &[
    "I can't access live weather data. Try weather.com or a weather app.",
    "Weather updates are best from your local weather app.",
    "I recommend checking weather websites for real-time data.",
];

const PROGRAMMING: &[&str] = &[
    "I can help with programming! What language or problem are you working on?",
    "Programming is fun! Tell me what you're building.",
    "Need help with code? Let me know the language or error!",
];

const MATH: &[&str] = &[
    "Need help with math? Give me the problem!",
    "Math is cool! What would you like me to solve?",
    "Give me the equation, and I'll help you with it.",
];

const HELP: &[&str] = &[
    "I can help with general questions, math, programming, writing, and more!",
    "Need help? Ask me anything: programming, math, general info, or casual chat!",
    "I'm here to assist! Just type your question.",
];

const THANKS: &[&str] = &["You're welcome!", "Happy to help!", "Any time! Need anything else?"];

const DEFAULT: &[&str] = &[
    "Can you tell me more about that?",
    "I'm here to help! Could you clarify your question?",
    "Interesting! Could you provide more context?",
    "Let's explore that together. Could you expand a little?",
];

/// Immutable category -> candidate replies mapping.
///
/// Time and date replies are rendered from the snapshot passed to [`ResponseCatalog::new`],
/// so every selection from one catalog agrees on a single "now".
#[derive(Debug, Clone)]
pub struct ResponseCatalog {
    entries: HashMap<Category, Vec<String>>,
    snapshot: DateTime<Local>,
}

impl ResponseCatalog {
    pub fn new<Tz: TimeZone>(now: DateTime<Tz>) -> Self {
        let now = now.with_timezone(&Local);
        let time = now.format("%-I:%M:%S %p").to_string();
        let date = now.format("%-m/%-d/%Y").to_string();

        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let mut entries = HashMap::with_capacity(Category::ALL.len());
        entries.insert(Category::Greetings, owned(GREETINGS));
        entries.insert(Category::HowAreYou, owned(HOW_ARE_YOU));
        entries.insert(Category::Name, owned(NAME));
        entries.insert(Category::Weather, owned(WEATHER));
        entries.insert(
            Category::Time,
            vec![
                format!("The current time is: {}", time),
                format!("Right now it's {}", time),
                format!("The time is {}", time),
            ],
        );
        entries.insert(
            Category::Date,
            vec![
                format!("Today's date is: {}", date),
                format!("Today is {}", date),
                format!("The current date is {}", date),
            ],
        );
        entries.insert(Category::Programming, owned(PROGRAMMING));
        entries.insert(Category::Math, owned(MATH));
        entries.insert(Category::Help, owned(HELP));
        entries.insert(Category::Thanks, owned(THANKS));
        entries.insert(Category::Default, owned(DEFAULT));

        Self {
            entries,
            snapshot: now,
        }
    }

    /// Catalog for the current local time.
    pub fn now() -> Self {
        Self::new(Local::now())
    }

    /// Candidate replies for `category`. Never empty.
    pub fn responses(&self, category: Category) -> &[String] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, category: Category, reply: &str) -> bool {
        self.responses(category).iter().any(|r| r == reply)
    }

    pub fn snapshot(&self) -> DateTime<Local> {
        self.snapshot
    }
}

impl Default for ResponseCatalog {
    fn default() -> Self {
        Self::now()
    }
}
