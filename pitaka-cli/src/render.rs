//! Plain-text rendering for the records and stats commands.

use pitaka_core::{Category, Expense, Payment, RecordsView, StatsReport};
use std::fmt::Write;

const BAR_WIDTH: usize = 24;

/// `₱1,234.50`
pub fn money(currency: &str, amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{currency}{grouped}.{frac}")
}

fn category_text(c: &Category) -> String {
    match (c.icon(), c.label()) {
        (Some(icon), Some(label)) => format!("{icon} {label}"),
        _ => c.tag().to_string(),
    }
}

fn payment_text(p: &Payment) -> String {
    match (p.icon(), p.label()) {
        (Some(icon), Some(label)) => format!("{icon} {label}"),
        _ => p.tag().to_string(),
    }
}

pub fn expense_line(currency: &str, e: &Expense) -> String {
    let mut line = format!(
        "#{:<5} {}  {:>12}  {}  {}",
        e.id,
        e.date.format("%Y-%m-%d"),
        money(currency, e.amount),
        category_text(&e.category),
        payment_text(&e.payment),
    );
    if !e.note.is_empty() {
        let _ = write!(line, "  \"{}\"", e.note);
    }
    line
}

pub fn records(currency: &str, view: &RecordsView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Today  {}", money(currency, view.today_total));
    if view.today.is_empty() {
        let _ = writeln!(out, "  (nothing yet)");
    }
    for e in &view.today {
        let _ = writeln!(out, "  {}", expense_line(currency, e));
    }

    for day in &view.previous {
        let _ = writeln!(
            out,
            "\n{}  {}",
            day.key.format("%a, %b %-d %Y"),
            money(currency, day.total)
        );
        for e in &day.items {
            let _ = writeln!(out, "  {}", expense_line(currency, e));
        }
    }
    out
}

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.min(BAR_WIDTH))
}

pub fn stats(currency: &str, report: &StatsReport) -> String {
    let agg = &report.aggregate;
    let q = &report.query;
    let mut out = String::new();

    let _ = writeln!(out, "{} ({}, anchor {})", report.label, q.policy, q.anchor);
    if let pitaka_core::CategoryFilter::Only(c) = &q.category {
        let _ = writeln!(out, "Category: {}", category_text(c));
    }
    if !q.search.is_empty() {
        let _ = writeln!(out, "Search: \"{}\"", q.search);
    }

    let _ = writeln!(out, "\nTotal          {}", money(currency, agg.total));
    let _ = writeln!(out, "Transactions   {}", agg.count);
    let _ = writeln!(out, "Average        {}", money(currency, agg.average));
    let _ = writeln!(out, "Daily average  {} over {} day(s)", money(currency, agg.daily_average), agg.days_with_expenses());
    if let Some(h) = &agg.highest {
        let _ = writeln!(out, "Highest        {}", expense_line(currency, h));
    }
    if let Some(l) = &agg.lowest {
        let _ = writeln!(out, "Lowest         {}", expense_line(currency, l));
    }

    if !agg.by_category.is_empty() {
        let _ = writeln!(out, "\nBy category");
        for (c, b) in agg.ranked_categories() {
            let _ = writeln!(
                out,
                "  {:<18} {:>12}  {:>5.1}%  ({})",
                category_text(c),
                money(currency, b.total),
                b.share_of(agg.total),
                b.count
            );
        }
    }
    if !agg.by_payment.is_empty() {
        let _ = writeln!(out, "\nBy payment");
        for (p, b) in agg.ranked_payments() {
            let _ = writeln!(
                out,
                "  {:<18} {:>12}  {:>5.1}%  ({})",
                payment_text(p),
                money(currency, b.total),
                b.share_of(agg.total),
                b.count
            );
        }
    }

    if !report.trend.is_empty() {
        let _ = writeln!(out, "\nMonthly trend");
        for t in &report.trend {
            let _ = writeln!(
                out,
                "  {:<9} {:<width$} {}",
                t.month.label(),
                bar(t.width_percent),
                money(currency, t.total),
                width = BAR_WIDTH
            );
        }
    }

    if agg.count == 0 {
        let _ = writeln!(out, "\nNo expenses match.");
    }
    out
}
