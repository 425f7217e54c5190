/// Intent classification
///
/// A message is lowercased and split into alphanumeric words, then run
/// through [`RULES`] in order. The first predicate that matches decides the
/// intent.

use serde::Serialize;
use std::fmt;

/// What the user wants the assistant to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Create,
    Update,
    Delete,
    List,
    Status,
    Help,
    Greeting,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Create => "create",
            Intent::Update => "update",
            Intent::Delete => "delete",
            Intent::List => "list",
            Intent::Status => "status",
            Intent::Help => "help",
            Intent::Greeting => "greeting",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased message plus its word tokens
#[derive(Debug, Clone)]
pub struct Tokens {
    text: String,
    words: Vec<String>,
}

impl Tokens {
    pub fn new(message: &str) -> Self {
        let text = message.to_lowercase();
        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { text, words }
    }

    /// True if `word` appears as a whole word
    pub fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn has_any(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.has_word(w))
    }

    /// True if `phrase` appears anywhere in the lowercased text
    pub fn has_phrase(&self, phrase: &str) -> bool {
        self.text.contains(phrase)
    }

    pub fn mentions_task(&self) -> bool {
        self.has_any(&["task", "tasks"])
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

type Rule = (fn(&Tokens) -> bool, Intent);

/// Ordered classification rules, first match wins
pub const RULES: &[Rule] = &[
    (is_create, Intent::Create),
    (is_update, Intent::Update),
    (is_delete, Intent::Delete),
    (is_list, Intent::List),
    (is_status, Intent::Status),
    (is_help, Intent::Help),
    (is_greeting, Intent::Greeting),
];

fn is_create(t: &Tokens) -> bool {
    t.has_any(&["create", "add", "new", "make"]) && t.mentions_task()
}

fn is_update(t: &Tokens) -> bool {
    t.has_any(&["update", "edit", "change", "modify", "mark", "set"]) && t.mentions_task()
}

fn is_delete(t: &Tokens) -> bool {
    t.has_any(&["delete", "remove"]) && t.mentions_task()
}

fn is_list(t: &Tokens) -> bool {
    t.has_any(&["list", "show", "display"]) || t.has_phrase("my tasks")
}

fn is_status(t: &Tokens) -> bool {
    t.has_any(&["status", "progress", "statistics", "stats"])
}

fn is_help(t: &Tokens) -> bool {
    t.has_any(&["help", "commands"])
}

fn is_greeting(t: &Tokens) -> bool {
    t.has_any(&["hi", "hello", "hey"])
}

pub fn extract_intent(message: &str) -> Intent {
    let tokens = Tokens::new(message);
    RULES
        .iter()
        .find(|(matches, _)| matches(&tokens))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::Unknown)
}
