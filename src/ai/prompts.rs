//! Prompt text sent to the generative-AI service.

use chrono::NaiveDate;

const COMMAND_PROMPT: &str = r#"You convert short personal-finance notes into one JSON object.

Today is {TODAY}.

Return ONLY a JSON object with this schema (omit fields that do not apply):
{
  "action": "expense" | "income" | "budget" | "goal" | "contribute" | "debt" | "debt_payment" | "recurring" | "rule",
  "amount": number,            // positive, required except for "rule"
  "category": string,          // for expense, income, budget, recurring
  "description": string,       // free text for expense, income, recurring
  "name": string,              // goal name or debt counterparty
  "direction": "payable" | "receivable", // debt: payable = I borrowed
  "months": integer,           // debt installments
  "frequency": "daily" | "weekly" | "monthly" | "yearly",
  "rule": string,              // e.g. "50/30/20"
  "date": "YYYY-MM-DD",         // when the entry happened
  "deadline": "YYYY-MM-DD"      // goal: target date
}

Known expense categories: {CATEGORIES}.

Note: "{INPUT}"
"#;

const CATEGORY_PROMPT: &str = r#"Pick the single best spending category for this transaction description.
Answer with exactly one of: {CATEGORIES}.

Description: "{INPUT}"
"#;

const NARRATION_PROMPT: &str = r#"You are a friendly personal-finance coach. Write a short (3-4 sentences)
plain-text summary of this monthly report. Mention the net result, the biggest
spending category, and any category that went over budget. No Markdown.

Report (JSON):
{REPORT}
"#;

pub fn command_prompt(input: &str, today: NaiveDate, categories: &[&str]) -> String {
    COMMAND_PROMPT
        .replace("{TODAY}", &today.to_string())
        .replace("{CATEGORIES}", &categories.join(", "))
        .replace("{INPUT}", &sanitize(input))
}

pub fn categorization_prompt(description: &str, categories: &[&str]) -> String {
    CATEGORY_PROMPT
        .replace("{CATEGORIES}", &categories.join(", "))
        .replace("{INPUT}", &sanitize(description))
}

pub fn narration_prompt(report_json: &str) -> String {
    NARRATION_PROMPT.replace("{REPORT}", report_json)
}

fn sanitize(input: &str) -> String {
    input.replace('"', "'").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_prompt_embeds_input_and_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let prompt = command_prompt("paid \"mike\" back", today, &["Dining", "Other"]);
        assert!(prompt.contains("Today is 2024-06-01."));
        assert!(prompt.contains("Note: \"paid 'mike' back\""));
        assert!(prompt.contains("Dining, Other"));
    }
}
