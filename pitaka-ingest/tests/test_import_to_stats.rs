use chrono::NaiveDate;
use pitaka_core::{
    resolve_gesture, Category, Expense, Period, PeriodPolicy, StatsQuery, StatsReport,
    SwipeCommand, SwipeConfig, DEFAULT_TREND_MONTHS,
};
use pitaka_ingest::parsers::parse_expense_csv_reader;
use pitaka_ingest::pointer::translate_all;
use pitaka_ingest::{MouseAdapter, MouseEvent};

const EXPORT: &str = "\
date,amount,category,payment,note
2025-01-10,200,food,cash,groceries
2025-02-03,120,transport,gcash,grab
2025-02-20,80,food,card,coffee
2025-03-01,1500,bills,gcash,rent share
";

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn imported() -> Vec<Expense> {
    parse_expense_csv_reader(EXPORT.as_bytes())
        .unwrap()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            Expense::new(i as i64 + 1, row.amount, row.category, row.payment, row.date)
                .with_note(row.note)
        })
        .collect()
}

#[test]
fn test_imported_rows_feed_year_report() {
    let items = imported();
    let q = StatsQuery::new(Period::Year, PeriodPolicy::Calendar, ymd(2025, 3, 15));
    let report = StatsReport::build(&items, &q, DEFAULT_TREND_MONTHS);

    assert_eq!(report.aggregate.count, 4);
    assert_eq!(report.aggregate.total, 1900.0);
    assert_eq!(report.aggregate.by_category[&Category::Food].total, 280.0);
    assert_eq!(report.trend.len(), 3);
    assert_eq!(report.trend[0].width_percent, 100.0);
    assert_eq!(report.aggregate.highest.as_ref().map(|e| e.id), Some(4));
    assert_eq!(report.aggregate.lowest.as_ref().map(|e| e.id), Some(3));
}

#[test]
fn test_mouse_drag_on_imported_row() {
    let items = imported();
    let drag = vec![
        MouseEvent::MouseDown { client_x: 320.0, button: 0 },
        MouseEvent::MouseMove { client_x: 260.0 },
        MouseEvent::MouseMove { client_x: 140.0 },
        MouseEvent::MouseUp { client_x: 140.0 },
    ];
    let events = translate_all(&mut MouseAdapter::default(), drag);
    let cmd = resolve_gesture(&items[1], events, SwipeConfig::default());
    assert_eq!(cmd, SwipeCommand::Delete(2));
}
