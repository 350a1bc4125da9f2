// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_user, maybe_print_json, month_window, parse_date, pretty_table};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("cards", sub)) => cards(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CategoryTotal {
    pub category: Option<String>,
    pub color: Option<String>,
    pub total: f64,
}

#[derive(Debug, Serialize)]
pub struct DailyPoint {
    /// Two-digit day of month.
    pub day: String,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Serialize)]
pub struct BudgetSnapshot {
    pub limit: f64,
    pub used: f64,
}

#[derive(Debug, Serialize)]
pub struct BudgetGauge {
    pub limit: f64,
    pub used: f64,
    pub pct: u32,
}

#[derive(Debug, Serialize)]
pub struct MonthlySummary {
    pub income: f64,
    pub expense: f64,
    pub by_category: Vec<CategoryTotal>,
    pub daily: Vec<DailyPoint>,
    pub budget: Option<BudgetSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct CardsSummary {
    pub balance: f64,
    pub income: f64,
    pub expense: f64,
    pub budget: Option<BudgetGauge>,
}

#[derive(Debug, Default)]
pub struct SummaryFilter<'a> {
    pub month: Option<&'a str>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub category: Option<&'a str>,
}

/// Percent of the limit used, rounded, clamped to 100. A limit of zero or
/// less yields 0 rather than dividing. The clamp is one-sided: over-budget
/// displays as 100, callers keep the unclamped used/limit pair.
pub fn budget_pct(used: Decimal, limit: Decimal) -> u32 {
    if limit <= Decimal::ZERO {
        return 0;
    }
    let pct = (used / limit * Decimal::from(100)).round();
    pct.to_u32().unwrap_or(0).min(100)
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or_default()
}

struct TxRow {
    date: NaiveDate,
    amount: Decimal,
    category: Option<String>,
    color: Option<String>,
}

/// Streams the owner's transactions through the filters. All filter values
/// degrade gracefully: a malformed month means no month filter, a category
/// of digits matches the id, anything else matches the name case-insensitively.
fn filtered_rows(
    conn: &Connection,
    owner_id: i64,
    filter: &SummaryFilter<'_>,
    window: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<TxRow>> {
    let mut sql = String::from(
        "SELECT t.date, t.amount, c.name, c.color \
         FROM transactions t \
         LEFT JOIN categories c ON t.category_id=c.id \
         WHERE t.owner_id=?",
    );
    let mut params_vec: Vec<String> = vec![owner_id.to_string()];

    if let Some(start) = filter.start {
        sql.push_str(" AND t.date>=?");
        params_vec.push(start.to_string());
    }
    if let Some(end) = filter.end {
        sql.push_str(" AND t.date<=?");
        params_vec.push(end.to_string());
    }
    if let Some(cat) = filter.category {
        if !cat.is_empty() && cat.chars().all(|c| c.is_ascii_digit()) {
            sql.push_str(" AND t.category_id=?");
        } else {
            sql.push_str(" AND LOWER(c.name)=LOWER(?)");
        }
        params_vec.push(cat.to_string());
    }
    if let Some((start, next_start)) = window {
        sql.push_str(" AND t.date>=? AND t.date<?");
        params_vec.push(start.to_string());
        params_vec.push(next_start.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date_s: String = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let category: Option<String> = r.get(2)?;
        let color: Option<String> = r.get(3)?;
        let date = NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")
            .with_context(|| format!("Invalid stored date '{}'", date_s))?;
        let amount = amount_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid stored amount '{}'", amount_s))?;
        out.push(TxRow {
            date,
            amount,
            category,
            color,
        });
    }
    Ok(out)
}

/// Signed income and non-negative expense magnitude for a transaction set.
fn totals(rows: &[TxRow]) -> (Decimal, Decimal) {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for row in rows {
        if row.amount > Decimal::ZERO {
            income += row.amount;
        } else {
            expense += -row.amount;
        }
    }
    (income, expense)
}

/// First budget whose month falls within [start, next_start).
fn budget_for_window(
    conn: &Connection,
    owner_id: i64,
    window: (NaiveDate, NaiveDate),
) -> Result<Option<Decimal>> {
    let (start, next_start) = window;
    let limit_s: Option<String> = conn
        .query_row(
            "SELECT total_limit FROM budgets \
             WHERE owner_id=?1 AND month>=?2 AND month<?3 ORDER BY id LIMIT 1",
            params![owner_id, start.to_string(), next_start.to_string()],
            |r| r.get(0),
        )
        .optional()?;
    match limit_s {
        Some(s) => {
            let limit = s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid budget limit '{}'", s))?;
            Ok(Some(limit))
        }
        None => Ok(None),
    }
}

pub fn monthly_summary(
    conn: &Connection,
    owner_id: i64,
    filter: &SummaryFilter<'_>,
) -> Result<MonthlySummary> {
    let window = filter.month.and_then(month_window);
    let rows = filtered_rows(conn, owner_id, filter, window)?;

    let (income, expense) = totals(&rows);

    let mut by_cat: HashMap<(Option<String>, Option<String>), Decimal> = HashMap::new();
    for row in &rows {
        *by_cat
            .entry((row.category.clone(), row.color.clone()))
            .or_insert(Decimal::ZERO) += row.amount;
    }
    let by_category = by_cat
        .into_iter()
        .map(|((category, color), total)| CategoryTotal {
            category,
            color,
            total: to_f64(total),
        })
        .collect();

    // Income and expense are kept apart per day so a day with both still
    // shows two non-zero values, never a net.
    let mut by_day: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for row in &rows {
        let entry = by_day
            .entry(row.date)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        if row.amount > Decimal::ZERO {
            entry.0 += row.amount;
        } else {
            entry.1 += -row.amount;
        }
    }
    let daily = by_day
        .into_iter()
        .map(|(date, (inc, exp))| DailyPoint {
            day: date.format("%d").to_string(),
            income: to_f64(inc),
            expense: to_f64(exp),
        })
        .collect();

    let budget = match window {
        Some(w) => budget_for_window(conn, owner_id, w)?.map(|limit| BudgetSnapshot {
            limit: to_f64(limit),
            used: to_f64(expense),
        }),
        None => None,
    };

    Ok(MonthlySummary {
        income: to_f64(income),
        expense: to_f64(expense),
        by_category,
        daily,
        budget,
    })
}

pub fn cards_summary(conn: &Connection, owner_id: i64, month: Option<&str>) -> Result<CardsSummary> {
    let window = month.and_then(month_window);

    let mut stmt = conn.prepare("SELECT balance FROM accounts WHERE owner_id=?1")?;
    let mut rows = stmt.query(params![owner_id])?;
    let mut balance = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let s: String = r.get(0)?;
        balance += s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid stored balance '{}'", s))?;
    }

    let filter = SummaryFilter::default();
    let tx_rows = filtered_rows(conn, owner_id, &filter, window)?;
    let (income, expense) = totals(&tx_rows);

    let budget = match window {
        Some(w) => budget_for_window(conn, owner_id, w)?.map(|limit| BudgetGauge {
            limit: to_f64(limit),
            used: to_f64(expense),
            pct: budget_pct(expense, limit),
        }),
        None => None,
    };

    Ok(CardsSummary {
        balance: to_f64(balance),
        income: to_f64(income),
        expense: to_f64(expense),
        budget,
    })
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let start = match sub.get_one::<String>("start") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let end = match sub.get_one::<String>("end") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let filter = SummaryFilter {
        month: sub.get_one::<String>("month").map(|s| s.as_str()),
        start,
        end,
        category: sub.get_one::<String>("category").map(|s| s.as_str()),
    };
    let summary = monthly_summary(conn, owner_id, &filter)?;

    if !maybe_print_json(json_flag, jsonl_flag, &summary)? {
        println!("Income:  {:.2}", summary.income);
        println!("Expense: {:.2}", summary.expense);
        if let Some(b) = &summary.budget {
            println!("Budget:  {:.2} used of {:.2}", b.used, b.limit);
        }
        let cat_rows: Vec<Vec<String>> = summary
            .by_category
            .iter()
            .map(|c| {
                vec![
                    c.category.clone().unwrap_or("(uncategorized)".into()),
                    c.color.clone().unwrap_or_default(),
                    format!("{:.2}", c.total),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Color", "Total"], cat_rows));
        let day_rows: Vec<Vec<String>> = summary
            .daily
            .iter()
            .map(|d| {
                vec![
                    d.day.clone(),
                    format!("{:.2}", d.income),
                    format!("{:.2}", d.expense),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Day", "Income", "Expense"], day_rows));
    }
    Ok(())
}

fn cards(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let summary = cards_summary(conn, owner_id, sub.get_one::<String>("month").map(|s| s.as_str()))?;

    if !maybe_print_json(json_flag, jsonl_flag, &summary)? {
        println!("Balance: {:.2}", summary.balance);
        println!("Income:  {:.2}", summary.income);
        println!("Expense: {:.2}", summary.expense);
        match &summary.budget {
            Some(b) => println!("Budget:  {:.2} used of {:.2} ({}%)", b.used, b.limit, b.pct),
            None => println!("Budget:  none"),
        }
    }
    Ok(())
}
