use chrono::{Duration, NaiveDate};
use pitaka_core::{
    group_by_day, recompute, resolve_gesture, trend_bars, Aggregate, Bucket, Category,
    CategoryFilter, Expense, MonthKey, Period, PeriodPolicy, PointerEvent, StatsQuery,
    SwipeCommand, SwipeConfig, SwipeOutcome, SwipeTracker,
};
use std::collections::BTreeMap;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A year of deterministic, slightly irregular spending.
fn year_of_spending() -> Vec<Expense> {
    let cats = ["food", "transport", "bills", "shopping", "health", "entertainment", "debt", "other", "pets"];
    let pays = ["cash", "gcash", "card"];
    let start = ymd(2024, 6, 1);
    (0..400)
        .map(|i: i64| {
            let date = start + Duration::days(i * 37 % 365);
            let amount = 12.35 + ((i * 7919) % 2500) as f64 / 4.0;
            Expense::new(
                i + 1,
                amount,
                cats[(i as usize) % cats.len()],
                pays[(i as usize * 5) % pays.len()],
                date,
            )
            .with_note(format!("entry {i}"))
        })
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6 * b.abs().max(1.0)
}

fn assert_consistent(agg: &Aggregate) {
    let cat_total: f64 = agg.by_category.values().map(|b| b.total).sum();
    let pay_total: f64 = agg.by_payment.values().map(|b| b.total).sum();
    let month_total: f64 = agg.monthly.values().map(|b| b.total).sum();
    let cat_count: usize = agg.by_category.values().map(|b| b.count).sum();
    assert!(close(cat_total, agg.total), "{cat_total} != {}", agg.total);
    assert!(close(pay_total, agg.total), "{pay_total} != {}", agg.total);
    assert!(close(month_total, agg.total));
    assert_eq!(cat_count, agg.count);
    assert!(agg.average.is_finite());
    assert!(agg.daily_average.is_finite());
}

#[test]
fn test_breakdowns_sum_to_total_for_every_selector() {
    let items = year_of_spending();
    let anchors = [ymd(2024, 6, 1), ymd(2024, 12, 31), ymd(2025, 3, 1), ymd(2025, 5, 20)];

    for policy in [PeriodPolicy::Calendar, PeriodPolicy::Rolling] {
        for period in Period::ALL {
            for anchor in anchors {
                let agg = recompute(&items, &StatsQuery::new(period, policy, anchor));
                assert_consistent(&agg);
            }
        }
    }
}

#[test]
fn test_filters_narrow_consistently() {
    let items = year_of_spending();
    let base = StatsQuery::new(Period::All, PeriodPolicy::Calendar, ymd(2025, 1, 1));
    let all = recompute(&items, &base);
    assert_eq!(all.count, 400);

    let food = recompute(&items, &base.clone().with_category(CategoryFilter::Only(Category::Food)));
    assert_consistent(&food);
    assert_eq!(food.by_category.len(), 1);
    assert!(close(food.total, all.by_category[&Category::Food].total));

    let searched = recompute(&items, &base.with_search("ENTRY 39"));
    // "entry 39" plus "entry 390".."entry 399"
    assert_eq!(searched.count, 11);
}

#[test]
fn test_empty_selection_is_zero_not_nan() {
    let items = year_of_spending();
    let q = StatsQuery::new(Period::Week, PeriodPolicy::Calendar, ymd(1990, 1, 1));
    let agg = recompute(&items, &q);
    assert_eq!(agg.count, 0);
    assert_eq!(agg.average, 0.0);
    assert_eq!(agg.daily_average, 0.0);
    assert!(agg.highest.is_none());
    assert!(trend_bars(&agg.monthly, 12).is_empty());
}

#[test]
fn test_recompute_at_date_limits_never_panics() {
    let mut items = year_of_spending();
    items.push(Expense::new(999, 5.0, "food", "cash", NaiveDate::MAX));
    items.push(Expense::new(1000, 7.0, "food", "cash", NaiveDate::MIN));

    for policy in [PeriodPolicy::Calendar, PeriodPolicy::Rolling] {
        for period in Period::ALL {
            for anchor in [NaiveDate::MAX, NaiveDate::MIN] {
                let agg = recompute(&items, &StatsQuery::new(period, policy, anchor));
                assert_consistent(&agg);
            }
        }
    }

    let q = StatsQuery::new(Period::Week, PeriodPolicy::Calendar, NaiveDate::MAX);
    assert_eq!(recompute(&items, &q).count, 1);

    let far = StatsQuery::new(Period::Year, PeriodPolicy::Calendar, ymd(2025, 3, 1)).shifted(i32::MAX);
    assert_eq!(far.anchor, ymd(2025, 3, 1));
}

#[test]
fn test_day_groups_partition_the_filtered_set() {
    let items = year_of_spending();
    let q = StatsQuery::new(Period::Year, PeriodPolicy::Calendar, ymd(2024, 8, 1));
    let filtered = q.apply(&items);
    let groups = group_by_day(filtered.iter().copied());

    let regrouped: usize = groups.iter().map(|g| g.items.len()).sum();
    assert_eq!(regrouped, filtered.len());
    for w in groups.windows(2) {
        assert!(w[0].key > w[1].key);
    }
    for g in &groups {
        assert!(g.items.iter().all(|e| e.date == g.key));
    }
}

#[test]
fn test_highest_and_lowest_are_extremes() {
    let items = year_of_spending();
    let agg = recompute(&items, &StatsQuery::new(Period::All, PeriodPolicy::Rolling, ymd(2025, 1, 1)));
    let max = items.iter().map(|e| e.amount).fold(f64::MIN, f64::max);
    let min = items.iter().map(|e| e.amount).fold(f64::MAX, f64::min);
    assert_eq!(agg.highest.unwrap().amount, max);
    assert_eq!(agg.lowest.unwrap().amount, min);
}

#[test]
fn test_trend_widths_from_month_totals() {
    let monthly: BTreeMap<MonthKey, Bucket> = [("2025-01", 100.0), ("2025-02", 50.0), ("2025-03", 25.0)]
        .into_iter()
        .map(|(k, total)| (k.parse().unwrap(), Bucket { total, count: 1 }))
        .collect();
    let widths: BTreeMap<String, f64> = trend_bars(&monthly, 12)
        .into_iter()
        .map(|b| (b.month.to_string(), b.width_percent))
        .collect();
    assert_eq!(widths["2025-01"], 100.0);
    assert_eq!(widths["2025-02"], 50.0);
    assert_eq!(widths["2025-03"], 25.0);
}

fn gesture(from: f64, to: f64) -> Vec<PointerEvent> {
    vec![
        PointerEvent::Down { x: from },
        PointerEvent::Move { x: (from + to) / 2.0 },
        PointerEvent::Move { x: to },
        PointerEvent::Up,
    ]
}

fn lunch() -> Expense {
    Expense::new(9, 180.0, "food", "gcash", ymd(2025, 3, 3)).with_note("lunch")
}

#[test]
fn test_swipe_between_min_and_edit_is_noop() {
    let mut t = SwipeTracker::new(SwipeConfig::default());
    let outcomes: Vec<SwipeOutcome> = gesture(200.0, 140.0).into_iter().map(|e| t.handle(e)).collect();
    assert_eq!(outcomes.last(), Some(&SwipeOutcome::None));
    assert_eq!(t.offset(), 0.0);
    assert_eq!(resolve_gesture(&lunch(), gesture(200.0, 140.0), SwipeConfig::default()), SwipeCommand::None);
}

#[test]
fn test_swipe_past_edit_threshold_edits() {
    let mut t = SwipeTracker::new(SwipeConfig::default());
    for e in gesture(200.0, 90.0) {
        t.handle(e);
    }
    assert_eq!(t.offset(), 80.0);
    t.settle();
    assert_eq!(t.offset(), 0.0);
    assert_eq!(
        resolve_gesture(&lunch(), gesture(200.0, 90.0), SwipeConfig::default()),
        SwipeCommand::Edit(lunch())
    );
}

#[test]
fn test_swipe_past_delete_threshold_deletes() {
    let mut t = SwipeTracker::new(SwipeConfig::default());
    for e in gesture(200.0, 30.0) {
        t.handle(e);
    }
    assert_eq!(t.offset(), 200.0);
    assert_eq!(
        resolve_gesture(&lunch(), gesture(200.0, 30.0), SwipeConfig::default()),
        SwipeCommand::Delete(9)
    );
}

#[test]
fn test_tap_never_acts() {
    let tap = [PointerEvent::Down { x: 120.0 }, PointerEvent::Up];
    assert_eq!(resolve_gesture(&lunch(), tap, SwipeConfig::default()), SwipeCommand::None);

    // Even on a row left shifted by an earlier edit swipe.
    let mut t = SwipeTracker::new(SwipeConfig::default());
    for e in gesture(200.0, 90.0) {
        t.handle(e);
    }
    assert_eq!(t.handle(PointerEvent::Down { x: 120.0 }), SwipeOutcome::None);
    assert_eq!(t.handle(PointerEvent::Up), SwipeOutcome::None);
    assert_eq!(t.offset(), 0.0);
}
