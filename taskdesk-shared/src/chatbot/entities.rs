/// Entity extraction from free-text chat messages
///
/// Each extractor is independent and best effort: it returns `None` (or a
/// default) rather than failing when the message doesn't carry the entity.
///
/// # Example
///
/// ```
/// use taskdesk_shared::chatbot::entities::{extract_priority, extract_task_id, extract_title};
///
/// assert_eq!(extract_title("Create task: Buy milk").as_deref(), Some("Buy milk"));
/// assert_eq!(extract_task_id("mark task #12 as done"), Some(12));
/// assert_eq!(extract_priority("add task call bank, urgent"), 1);
/// ```

use regex::Regex;

use super::intent::Tokens;
use crate::models::category::Category;
use crate::models::task::{TaskStatus, DEFAULT_PRIORITY};

/// Titles built from loose words stop after this many
const TITLE_WORD_LIMIT: usize = 10;

/// Words that end a loose-word title
const FILLER_WORDS: [&str; 4] = ["with", "priority", "status", "description"];

const PRIORITY_KEYWORDS: [(&str, i32); 6] = [
    ("high", 1),
    ("important", 1),
    ("urgent", 1),
    ("medium", 2),
    ("normal", 2),
    ("low", 3),
];

lazy_static::lazy_static! {
    static ref TASK_ID: Regex =
        Regex::new(r"(?i)(?:\btasks?\b|#|\bid\b|\bnumber\b)[\s:#]*(\d+)").unwrap();

    static ref TITLE_PREFIX: Regex = Regex::new(
        r"(?i)^.*?\b(?:create|add|make|new)\b(?:\s+(?:a|an|the)\b)?(?:\s+new\b)?(?:\s+tasks?\b)?(?:\s+(?:called|named|titled)\b)?"
    )
    .unwrap();

    static ref LIST_SUFFIX: Regex =
        Regex::new(r"(?i)\s+(?:to|in|on)\s+(?:my\s+)?(?:todo\s+list|task\s+list|tasks?|list)\b").unwrap();

    static ref QUOTED: Regex = Regex::new(r#""([^"]+)"|“([^”]+)”"#).unwrap();

    static ref DESCRIPTION_MARKER: Regex = Regex::new(r"(?i)\b(?:description|desc)\s*:").unwrap();

    static ref DESCRIPTION_CLAUSE: Regex =
        Regex::new(r"(?i)\b(?:description|desc)\s*:\s*(.+)$").unwrap();

    static ref TRAILING_ATTRIBUTES: Regex = Regex::new(
        r"(?i)\s*\b(?:with\s+)?(?:(?:high|medium|normal|low|urgent|important)\s+)?(?:priority|status)\b"
    )
    .unwrap();

    static ref NEW_TITLE_CLAUSE: Regex =
        Regex::new(r#"(?i)\b(?:title\s*(?:to|as|:|=)|rename\b.*?\bto)\s*(?:"([^"]+)"|([^,]+))"#).unwrap();

    static ref EXPLICIT_PRIORITY: Regex = Regex::new(r"(?i)\bpriority\s*[=:]?\s*([1-3])\b").unwrap();
}

/// First integer following a "task", "#", "id" or "number" token
pub fn extract_task_id(message: &str) -> Option<i64> {
    TASK_ID
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Title for a new task
///
/// Quoted text wins. Otherwise everything up to and including the intent
/// phrase ("can you create a new task called") is dropped and the text after a colon is used, or failing that
/// the first few loose words.
pub fn extract_title(message: &str) -> Option<String> {
    if let Some(quoted) = first_quoted(message) {
        return non_empty(quoted);
    }

    let rest = TITLE_PREFIX.replace(message, "");
    let body = match DESCRIPTION_MARKER.find(&rest) {
        Some(m) => &rest[..m.start()],
        None => &rest[..],
    };

    let title = match body.split_once(':') {
        Some((_, after)) => after.split(',').next().unwrap_or_default().to_string(),
        None => leading_words(body),
    };

    non_empty(title.trim().trim_end_matches(['.', '!', '?']))
}

fn first_quoted(message: &str) -> Option<&str> {
    QUOTED
        .captures(message)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
}

fn leading_words(text: &str) -> String {
    let text = match LIST_SUFFIX.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    };

    let mut words: Vec<&str> = Vec::new();
    for word in text.split_whitespace().take(TITLE_WORD_LIMIT) {
        let bare = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();

        if FILLER_WORDS.contains(&bare.as_str()) {
            // "buy milk high priority" keeps "buy milk"
            if bare == "priority" {
                while words.last().is_some_and(|w| priority_keyword(w).is_some()) {
                    words.pop();
                }
            }
            break;
        }

        if let Some((head, _)) = word.split_once(',') {
            if !head.is_empty() {
                words.push(head);
            }
            break;
        }

        words.push(word);
    }

    words.join(" ")
}

/// Text after "description:" or "desc:", without trailing priority/status
pub fn extract_marked_description(message: &str) -> Option<String> {
    let caps = DESCRIPTION_CLAUSE.captures(message)?;
    let clause = caps.get(1)?.as_str();
    non_empty(strip_trailing_attributes(clause))
}

/// Marked description, else the clause after the first comma
pub fn extract_description(message: &str) -> Option<String> {
    if let Some(description) = extract_marked_description(message) {
        return Some(description);
    }

    let unquoted = QUOTED.replace_all(message, "");
    let (_, after) = unquoted.split_once(',')?;
    non_empty(strip_trailing_attributes(after))
}

fn strip_trailing_attributes(clause: &str) -> &str {
    let clause = match TRAILING_ATTRIBUTES.find(clause) {
        Some(m) => &clause[..m.start()],
        None => clause,
    };
    clause.trim().trim_end_matches([',', '.', ';']).trim_end()
}

/// Replacement title in an update ("title to X", "rename task 3 to X")
pub fn extract_new_title(message: &str) -> Option<String> {
    let caps = NEW_TITLE_CLAUSE.captures(message)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let raw = match DESCRIPTION_MARKER.find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    };
    non_empty(raw.trim().trim_end_matches(['.', '!', '?']))
}

/// Message with quoted text, title and description clauses removed
///
/// Keeps keyword extractors from reading "done" out of a new title like
/// "Done shopping".
pub fn without_free_text(message: &str) -> String {
    let text = DESCRIPTION_CLAUSE.replace(message, "");
    let text = NEW_TITLE_CLAUSE.replace(&text, "");
    QUOTED.replace_all(&text, "").into_owned()
}

fn priority_keyword(word: &str) -> Option<i32> {
    let word = word.to_lowercase();
    PRIORITY_KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == word)
        .map(|(_, priority)| *priority)
}

/// Explicit "priority=N" / "priority: N", else a priority keyword
pub fn priority_opt(message: &str) -> Option<i32> {
    if let Some(caps) = EXPLICIT_PRIORITY.captures(message) {
        return caps.get(1).and_then(|m| m.as_str().parse().ok());
    }

    let tokens = Tokens::new(message);
    PRIORITY_KEYWORDS
        .iter()
        .find(|(keyword, _)| tokens.has_word(keyword))
        .map(|(_, priority)| *priority)
}

pub fn extract_priority(message: &str) -> i32 {
    priority_opt(message).unwrap_or(DEFAULT_PRIORITY)
}

pub fn extract_status(message: &str) -> Option<TaskStatus> {
    let tokens = Tokens::new(message);

    if tokens.has_phrase("not started") {
        Some(TaskStatus::Pending)
    } else if tokens.has_any(&["completed", "complete", "done", "finished"]) {
        Some(TaskStatus::Completed)
    } else if tokens.has_any(&["progress", "working", "started"]) {
        Some(TaskStatus::Progress)
    } else if tokens.has_any(&["pending", "todo"]) {
        Some(TaskStatus::Pending)
    } else {
        None
    }
}

/// Category whose name occurs in the message; the longest name wins
pub fn extract_category<'a>(message: &str, categories: &'a [Category]) -> Option<&'a Category> {
    let text = message.to_lowercase();

    categories
        .iter()
        .filter(|c| {
            let name = c.name.trim().to_lowercase();
            !name.is_empty() && text.contains(&name)
        })
        .max_by_key(|c| c.name.trim().chars().count())
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id() {
        assert_eq!(extract_task_id("delete task 5"), Some(5));
        assert_eq!(extract_task_id("mark #42 done"), Some(42));
        assert_eq!(extract_task_id("update Task: 7 to high"), Some(7));
        assert_eq!(extract_task_id("remove id 3"), Some(3));
        assert_eq!(extract_task_id("task number 9"), Some(9));
        assert_eq!(extract_task_id("delete the task"), None);
        assert_eq!(extract_task_id("buy 3 apples"), None);
    }

    #[test]
    fn test_title_after_colon() {
        assert_eq!(extract_title("Create task: Buy milk").as_deref(), Some("Buy milk"));
        assert_eq!(
            extract_title("add task: Call mom, she asked yesterday").as_deref(),
            Some("Call mom")
        );
        assert_eq!(
            extract_title("new task: Pay rent description: before Friday").as_deref(),
            Some("Pay rent")
        );
    }

    #[test]
    fn test_title_quoted() {
        assert_eq!(
            extract_title(r#"create a task "Buy milk, eggs" with high priority"#).as_deref(),
            Some("Buy milk, eggs")
        );
        assert_eq!(extract_title("add task “Water plants”").as_deref(), Some("Water plants"));
    }

    #[test]
    fn test_title_loose_words() {
        assert_eq!(
            extract_title("Add a new task called Renew passport with high priority").as_deref(),
            Some("Renew passport")
        );
        assert_eq!(
            extract_title("create task buy milk high priority").as_deref(),
            Some("buy milk")
        );
        assert_eq!(
            extract_title("add buy groceries to my tasks").as_deref(),
            Some("buy groceries")
        );
        assert_eq!(
            extract_title("make task water the plants, then rest").as_deref(),
            Some("water the plants")
        );
        assert_eq!(
            extract_title("add task one two three four five six seven eight nine ten eleven")
                .as_deref(),
            Some("one two three four five six seven eight nine ten")
        );
    }

    #[test]
    fn test_title_after_leading_words() {
        assert_eq!(
            extract_title("Can you create a new task buy milk").as_deref(),
            Some("buy milk")
        );
        assert_eq!(
            extract_title("please add task: Call mom").as_deref(),
            Some("Call mom")
        );
        assert_eq!(extract_title("Urgent: add task pay rent").as_deref(), Some("pay rent"));
    }

    #[test]
    fn test_title_missing() {
        assert_eq!(extract_title("create task"), None);
        assert_eq!(extract_title("add a new task:"), None);
        assert_eq!(
            extract_title("add another task: x").as_deref(),
            Some("x")
        );
    }

    #[test]
    fn test_description() {
        assert_eq!(
            extract_description("Create task: Pay rent description: before Friday").as_deref(),
            Some("before Friday")
        );
        assert_eq!(
            extract_description("add task call bank desc: ask about card, priority 1").as_deref(),
            Some("ask about card")
        );
        assert_eq!(
            extract_description("Create task: Buy milk, from the corner shop with high priority")
                .as_deref(),
            Some("from the corner shop")
        );
        assert_eq!(extract_description("Create task: Buy milk"), None);
        assert_eq!(extract_description("add task x, high priority"), None);
        // Commas inside quotes don't start a description
        assert_eq!(extract_description(r#"add task "a, b""#), None);
    }

    #[test]
    fn test_priority() {
        assert_eq!(priority_opt("create task x priority=1"), Some(1));
        assert_eq!(priority_opt("create task x priority: 2"), Some(2));
        assert_eq!(priority_opt("Urgent: add task x"), Some(1));
        assert_eq!(priority_opt("normal task"), Some(2));
        assert_eq!(priority_opt("low effort task"), Some(3));
        assert_eq!(priority_opt("task x"), None);
        assert_eq!(priority_opt("task x priority 7"), None);
        assert_eq!(extract_priority("Create task: Buy milk"), 3);
        // "highway" is not "high"
        assert_eq!(extract_priority("add task drive highway"), 3);
    }

    #[test]
    fn test_status() {
        assert_eq!(extract_status("mark task 1 as done"), Some(TaskStatus::Completed));
        assert_eq!(extract_status("task 1 is Finished"), Some(TaskStatus::Completed));
        assert_eq!(extract_status("set task 1 to not started"), Some(TaskStatus::Pending));
        assert_eq!(extract_status("set task 1 to started"), Some(TaskStatus::Progress));
        assert_eq!(extract_status("I'm working on task 2"), Some(TaskStatus::Progress));
        assert_eq!(extract_status("show todo"), Some(TaskStatus::Pending));
        assert_eq!(
            extract_status("move task 3 from pending to progress"),
            Some(TaskStatus::Progress)
        );
        assert_eq!(extract_status("task 3 todo: started working"), Some(TaskStatus::Progress));
        assert_eq!(extract_status("show everything"), None);
    }

    #[test]
    fn test_new_title() {
        assert_eq!(
            extract_new_title("change task 3 title to Buy oat milk").as_deref(),
            Some("Buy oat milk")
        );
        assert_eq!(
            extract_new_title(r#"update task 3 title: "Call dad", priority 1"#).as_deref(),
            Some("Call dad")
        );
        assert_eq!(
            extract_new_title("rename task 4 to Done shopping").as_deref(),
            Some("Done shopping")
        );
        assert_eq!(extract_new_title("mark task 3 done"), None);
    }

    #[test]
    fn test_without_free_text() {
        let rest = without_free_text("change task 3 title to Done shopping");
        assert_eq!(extract_status(&rest), None);
        assert_eq!(extract_task_id(&rest), Some(3));

        let rest = without_free_text("update task 2 description: urgent errands");
        assert_eq!(priority_opt(&rest), None);
    }

    #[test]
    fn test_category_longest_match() {
        let categories = vec![
            Category { id: 1, name: "Work".to_string() },
            Category { id: 2, name: "Homework".to_string() },
            Category { id: 3, name: "Garden".to_string() },
        ];

        let found = extract_category("add task essay for homework", &categories).unwrap();
        assert_eq!(found.id, 2);

        let found = extract_category("create task: email boss WORK", &categories).unwrap();
        assert_eq!(found.id, 1);

        assert!(extract_category("add task buy milk", &categories).is_none());
        assert!(extract_category("anything", &[]).is_none());
    }
}
