mod common;

use common::{date, setup_manager};
use finbar_core::cli::output::render_table;
use finbar_core::core::services::ReportService;
use finbar_core::currency::MoneyFormat;
use finbar_core::domain::MonthKey;
use finbar_core::parser::parse;
use insta::assert_snapshot;

#[test]
fn report_table_layout() {
    let (mut manager, _) = setup_manager();
    for line in ["salary 4000", "spent 1200 on rent", "budget dining 100", "spent 30 on lunch"] {
        manager
            .apply(parse(line, date(2024, 6, 3)).unwrap(), None)
            .unwrap();
    }
    let money = MoneyFormat::new("USD", "en-US");
    let report = ReportService::monthly(manager.active(), MonthKey::new(2024, 6).unwrap());
    let rows: Vec<Vec<String>> = report
        .lines
        .iter()
        .map(|line| {
            vec![
                line.category.clone(),
                line.planned.map(|value| money.format(value)).unwrap_or_else(|| "-".into()),
                money.format(line.actual),
                line.variance.map(|value| money.format(value)).unwrap_or_else(|| "-".into()),
                line.status.label().to_string(),
            ]
        })
        .collect();
    let rendered = render_table(&["Category", "Planned", "Actual", "Variance", "Status"], &rows);
    assert_snapshot!(rendered, @r"
    Category  Planned  Actual     Variance  Status
    --------  -------  ---------  --------  ---------
    Housing   -        $1,200.00  -         unplanned
    Dining    $100.00  $30.00     $70.00    under
    ");
}
