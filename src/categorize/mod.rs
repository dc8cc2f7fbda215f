//! Keyword categorization of free-text descriptions, with an AI fallback.

use tracing::{debug, warn};

use crate::ai::{prompts, AiProvider};
use crate::domain::{Bucket, EntryKind};

pub const OTHER: &str = "Other";
pub const SALARY: &str = "Salary";
pub const OTHER_INCOME: &str = "Other Income";

/// Ordered keyword table; the first category with a matching keyword wins.
/// Keywords match whole words (plurals included); a trailing `*` marks a stem.
const EXPENSE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Subscriptions",
        &[
            "netflix", "spotify", "hulu", "disney", "subscription", "icloud", "youtube", "patreon",
            "prime",
        ],
    ),
    (
        "Housing",
        &["rent", "mortgage", "landlord", "hoa", "apartment"],
    ),
    (
        "Utilities",
        &[
            "electric", "electricity", "power", "water", "internet", "wifi", "phone", "mobile",
            "utility", "utilities", "heating",
        ],
    ),
    (
        "Groceries",
        &[
            "grocer*", "supermarket", "market", "walmart", "costco", "aldi", "lidl", "food",
            "vegetables", "fruit",
        ],
    ),
    (
        "Dining",
        &[
            "coffee", "cafe", "restaurant", "lunch", "dinner", "breakfast", "pizza", "burger",
            "sushi", "takeout", "starbucks", "bar", "drinks",
        ],
    ),
    (
        "Transport",
        &[
            "uber", "lyft", "taxi", "gas", "fuel", "petrol", "bus", "train", "metro", "parking",
            "toll", "car",
        ],
    ),
    (
        "Health",
        &[
            "pharmacy", "doctor", "dentist", "medicine", "hospital", "gym", "clinic", "insurance",
        ],
    ),
    (
        "Education",
        &["tuition", "course", "books", "school", "university", "udemy"],
    ),
    (
        "Travel",
        &["flight", "hotel", "airbnb", "vacation", "trip", "airline"],
    ),
    (
        "Entertainment",
        &["movie", "cinema", "concert", "game", "games", "steam", "theater", "tickets"],
    ),
    (
        "Shopping",
        &[
            "amazon", "clothes", "shoes", "shirt", "jacket", "mall", "ikea", "electronics",
            "gift",
        ],
    ),
];

const INCOME_KEYWORDS: &[(&str, &[&str])] = &[
    (SALARY, &["salary", "paycheck", "payroll", "wage", "wages"]),
    ("Freelance", &["freelance", "client", "invoice", "gig", "contract"]),
    ("Investments", &["dividend", "dividends", "interest", "stocks"]),
    ("Gifts", &["gift", "birthday"]),
];

const BUCKETS: &[(&str, Bucket)] = &[
    ("Housing", Bucket::Needs),
    ("Utilities", Bucket::Needs),
    ("Groceries", Bucket::Needs),
    ("Transport", Bucket::Needs),
    ("Health", Bucket::Needs),
    ("Education", Bucket::Needs),
    ("Dining", Bucket::Wants),
    ("Entertainment", Bucket::Wants),
    ("Shopping", Bucket::Wants),
    ("Subscriptions", Bucket::Wants),
    ("Travel", Bucket::Wants),
    ("Savings", Bucket::Savings),
    ("Investments", Bucket::Savings),
    ("Debt", Bucket::Savings),
];

/// Every expense category the categorizer can produce.
pub fn expense_categories() -> Vec<&'static str> {
    EXPENSE_KEYWORDS
        .iter()
        .map(|(category, _)| *category)
        .chain(std::iter::once(OTHER))
        .collect()
}

/// Matches description words against the keyword table.
pub fn categorize(description: &str, kind: EntryKind) -> Option<&'static str> {
    let table = match kind {
        EntryKind::Expense => EXPENSE_KEYWORDS,
        EntryKind::Income => INCOME_KEYWORDS,
    };
    let lowered = description.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();
    table.iter().find_map(|(category, keywords)| {
        let hit = tokens
            .iter()
            .any(|token| keywords.iter().any(|keyword| keyword_matches(keyword, token)));
        hit.then_some(*category)
    })
}

fn keyword_matches(keyword: &str, token: &str) -> bool {
    if let Some(stem) = keyword.strip_suffix('*') {
        return token.starts_with(stem);
    }
    match token.strip_prefix(keyword) {
        Some(rest) => matches!(rest, "" | "s" | "es"),
        None => false,
    }
}

/// Keyword match first, then the AI (constrained to known categories), then `Other`.
pub fn categorize_with_fallback(
    description: &str,
    kind: EntryKind,
    provider: Option<&dyn AiProvider>,
) -> String {
    if let Some(category) = categorize(description, kind) {
        return category.to_string();
    }
    let fallback = match kind {
        EntryKind::Expense => OTHER,
        EntryKind::Income => OTHER_INCOME,
    };
    let Some(provider) = provider else {
        return fallback.to_string();
    };
    if kind == EntryKind::Income {
        return fallback.to_string();
    }
    let known = expense_categories();
    let prompt = prompts::categorization_prompt(description, &known);
    match provider.complete(&prompt) {
        Ok(text) => {
            let answer = crate::ai::strip_code_fence(&text)
                .trim()
                .trim_matches('"')
                .to_string();
            match known
                .iter()
                .find(|category| category.eq_ignore_ascii_case(&answer))
            {
                Some(category) => {
                    debug!(description, category, "AI categorized entry");
                    category.to_string()
                }
                None => {
                    warn!(description, answer = %answer, "AI proposed unknown category");
                    fallback.to_string()
                }
            }
        }
        Err(err) => {
            warn!(description, error = %err, "AI categorization failed");
            fallback.to_string()
        }
    }
}

/// Bucket a category counts towards when comparing against a budgeting rule.
pub fn bucket_for_category(category: &str) -> Bucket {
    BUCKETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(category))
        .map(|(_, bucket)| *bucket)
        .unwrap_or(Bucket::Wants)
}
