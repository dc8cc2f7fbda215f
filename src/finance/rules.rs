//! Budgeting-rule allocation: split income across needs, wants and savings.

use serde::{Deserialize, Serialize};

use crate::categorize::bucket_for_category;
use crate::domain::{
    common::{from_cents, to_cents},
    Bucket, BudgetRule, Transaction,
};

/// How each bucket is spread over suggested sub-categories (percent of the bucket).
const SUBCATEGORY_TABLE: &[(Bucket, &[(&str, u8)])] = &[
    (
        Bucket::Needs,
        &[
            ("Housing", 50),
            ("Groceries", 20),
            ("Utilities", 15),
            ("Transport", 15),
        ],
    ),
    (
        Bucket::Wants,
        &[
            ("Dining", 35),
            ("Entertainment", 25),
            ("Shopping", 25),
            ("Subscriptions", 15),
        ],
    ),
    (
        Bucket::Savings,
        &[
            ("Emergency fund", 40),
            ("Investments", 40),
            ("Debt payoff", 20),
        ],
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAllocation {
    pub name: String,
    pub percent: u8,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketAllocation {
    pub bucket: Bucket,
    pub percent: u8,
    pub amount: f64,
    pub subcategories: Vec<SubAllocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAllocation {
    pub rule: BudgetRule,
    pub income: f64,
    pub buckets: Vec<BucketAllocation>,
}

impl RuleAllocation {
    pub fn bucket(&self, bucket: Bucket) -> Option<&BucketAllocation> {
        self.buckets.iter().find(|entry| entry.bucket == bucket)
    }
}

/// Splits `income` according to `rule`.
///
/// Amounts are whole cents. Bucket rounding remainder lands on savings so the
/// buckets always add up to the income exactly; inside a bucket the remainder
/// lands on the first (largest) sub-category.
pub fn allocate(income: f64, rule: &BudgetRule) -> RuleAllocation {
    let income_cents = to_cents(income.max(0.0));
    let mut bucket_cents: Vec<(Bucket, i64)> = Bucket::ALL
        .iter()
        .map(|bucket| (*bucket, income_cents * rule.percent(*bucket) as i64 / 100))
        .collect();
    let assigned: i64 = bucket_cents.iter().map(|(_, cents)| cents).sum();
    if let Some((_, savings)) = bucket_cents
        .iter_mut()
        .find(|(bucket, _)| *bucket == Bucket::Savings)
    {
        *savings += income_cents - assigned;
    }

    let buckets = bucket_cents
        .into_iter()
        .map(|(bucket, cents)| BucketAllocation {
            bucket,
            percent: rule.percent(bucket),
            amount: from_cents(cents),
            subcategories: distribute(bucket, cents),
        })
        .collect();

    RuleAllocation {
        rule: rule.clone(),
        income: from_cents(income_cents),
        buckets,
    }
}

fn distribute(bucket: Bucket, cents: i64) -> Vec<SubAllocation> {
    let table = SUBCATEGORY_TABLE
        .iter()
        .find(|(entry, _)| *entry == bucket)
        .map(|(_, rows)| *rows)
        .unwrap_or(&[]);
    if cents == 0 {
        return table
            .iter()
            .map(|(name, percent)| SubAllocation {
                name: name.to_string(),
                percent: *percent,
                amount: 0.0,
            })
            .collect();
    }
    let mut shares: Vec<i64> = table
        .iter()
        .map(|(_, percent)| cents * *percent as i64 / 100)
        .collect();
    let remainder = cents - shares.iter().sum::<i64>();
    if let Some(first) = shares.first_mut() {
        *first += remainder;
    }
    table
        .iter()
        .zip(shares)
        .map(|((name, percent), share)| SubAllocation {
            name: name.to_string(),
            percent: *percent,
            amount: from_cents(share),
        })
        .collect()
}

/// Actual spending in a bucket next to the rule's allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStatus {
    pub bucket: Bucket,
    pub allocated: f64,
    pub actual: f64,
    pub remaining: f64,
    pub over: bool,
}

/// Compares expenses (already filtered to one month) with an allocation.
pub fn compare<'a, I>(allocation: &RuleAllocation, expenses: I) -> Vec<BucketStatus>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut actual_cents = [0i64; 3];
    for txn in expenses.into_iter().filter(|txn| txn.is_expense()) {
        let slot = bucket_index(bucket_for_category(&txn.category));
        actual_cents[slot] += to_cents(txn.amount);
    }
    allocation
        .buckets
        .iter()
        .map(|entry| {
            let actual = actual_cents[bucket_index(entry.bucket)];
            let allocated = to_cents(entry.amount);
            BucketStatus {
                bucket: entry.bucket,
                allocated: entry.amount,
                actual: from_cents(actual),
                remaining: from_cents(allocated - actual),
                over: actual > allocated,
            }
        })
        .collect()
}

fn bucket_index(bucket: Bucket) -> usize {
    match bucket {
        Bucket::Needs => 0,
        Bucket::Wants => 1,
        Bucket::Savings => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fifty_thirty_twenty_on_round_income() {
        let allocation = allocate(4000.0, &BudgetRule::default());
        let amounts: Vec<f64> = allocation.buckets.iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![2000.0, 1200.0, 800.0]);
        let needs = allocation.bucket(Bucket::Needs).unwrap();
        assert_eq!(needs.subcategories[0].name, "Housing");
        assert_eq!(needs.subcategories[0].amount, 1000.0);
    }

    #[test]
    fn rounding_remainders_keep_totals_exact() {
        let rule = BudgetRule::new(33, 33, 34).unwrap();
        let allocation = allocate(100.01, &rule);
        let total: i64 = allocation
            .buckets
            .iter()
            .map(|bucket| to_cents(bucket.amount))
            .sum();
        assert_eq!(total, 10001);
        for bucket in &allocation.buckets {
            let sub_total: i64 = bucket
                .subcategories
                .iter()
                .map(|sub| to_cents(sub.amount))
                .sum();
            assert_eq!(sub_total, to_cents(bucket.amount));
        }
        // 33% of 10001 cents is 3300; savings takes 3300 + 1 + remainder.
        assert_eq!(allocation.bucket(Bucket::Needs).unwrap().amount, 33.0);
        assert_eq!(allocation.bucket(Bucket::Savings).unwrap().amount, 34.01);
    }

    #[test]
    fn compare_flags_overspent_buckets() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
        let allocation = allocate(1000.0, &BudgetRule::default());
        let expenses = vec![
            Transaction::expense(400.0, "Housing", "rent", date),
            Transaction::expense(350.0, "Dining", "dinners", date),
            Transaction::income(1000.0, "Salary", "pay", date),
        ];
        let statuses = compare(&allocation, &expenses);
        assert_eq!(statuses[0].actual, 400.0);
        assert!(!statuses[0].over);
        assert_eq!(statuses[1].actual, 350.0);
        assert!(statuses[1].over);
        assert_eq!(statuses[1].remaining, -50.0);
        assert_eq!(statuses[2].actual, 0.0);
    }
}
