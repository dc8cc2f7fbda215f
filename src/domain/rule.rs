use serde::{Deserialize, Serialize};

/// Spending bucket targeted by a budgeting rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Needs,
    Wants,
    Savings,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Needs, Bucket::Wants, Bucket::Savings];

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Needs => "Needs",
            Bucket::Wants => "Wants",
            Bucket::Savings => "Savings",
        }
    }
}

/// A named percentage split of income across needs, wants and savings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetRule {
    pub name: String,
    pub needs: u8,
    pub wants: u8,
    pub savings: u8,
}

impl BudgetRule {
    pub fn new(needs: u8, wants: u8, savings: u8) -> Result<Self, String> {
        let total = needs as u16 + wants as u16 + savings as u16;
        if total != 100 {
            return Err(format!(
                "rule percentages must add up to 100, got {}",
                total
            ));
        }
        let name = if wants == 0 {
            format!("{}/{}", needs, savings)
        } else {
            format!("{}/{}/{}", needs, wants, savings)
        };
        Ok(Self {
            name,
            needs,
            wants,
            savings,
        })
    }

    /// Parses `needs/wants/savings` or the two-part `needs/savings` shorthand.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let parts: Vec<&str> = raw.trim().split('/').map(str::trim).collect();
        let numbers = parts
            .iter()
            .map(|part| {
                part.trim_end_matches('%')
                    .parse::<u8>()
                    .map_err(|_| format!("invalid rule percentage `{}`", part))
            })
            .collect::<Result<Vec<u8>, String>>()?;
        match numbers.as_slice() {
            [needs, wants, savings] => Self::new(*needs, *wants, *savings),
            [needs, savings] => Self::new(*needs, 0, *savings),
            _ => Err(format!("rule `{}` must look like 50/30/20", raw.trim())),
        }
    }

    pub fn presets() -> Vec<BudgetRule> {
        [(50, 30, 20), (70, 20, 10), (60, 20, 20), (80, 0, 20)]
            .into_iter()
            .filter_map(|(needs, wants, savings)| Self::new(needs, wants, savings).ok())
            .collect()
    }

    pub fn percent(&self, bucket: Bucket) -> u8 {
        match bucket {
            Bucket::Needs => self.needs,
            Bucket::Wants => self.wants,
            Bucket::Savings => self.savings,
        }
    }
}

impl Default for BudgetRule {
    fn default() -> Self {
        Self {
            name: "50/30/20".into(),
            needs: 50,
            wants: 30,
            savings: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_and_two_part_rules() {
        let rule = BudgetRule::parse("70/20/10").unwrap();
        assert_eq!((rule.needs, rule.wants, rule.savings), (70, 20, 10));
        let rule = BudgetRule::parse("80/20").unwrap();
        assert_eq!((rule.needs, rule.wants, rule.savings), (80, 0, 20));
        assert_eq!(rule.name, "80/20");
    }

    #[test]
    fn rejects_rules_not_summing_to_hundred() {
        let err = BudgetRule::parse("50/30/30").unwrap_err();
        assert!(err.contains("110"), "unexpected error: {err}");
        assert!(BudgetRule::parse("fifty/30/20").is_err());
        assert!(BudgetRule::parse("100").is_err());
    }

    #[test]
    fn presets_are_valid() {
        let presets = BudgetRule::presets();
        assert_eq!(presets.len(), 4);
        assert_eq!(presets[0], BudgetRule::default());
    }
}
