// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::commands::reports::{cards_summary, monthly_summary, SummaryFilter};
use fintrack::db;
use rusqlite::{params, Connection};

fn base_conn() -> (Connection, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO users(username) VALUES ('alice')", [])
        .unwrap();
    let owner_id: i64 = conn
        .query_row("SELECT id FROM users WHERE username='alice'", [], |r| {
            r.get(0)
        })
        .unwrap();
    (conn, owner_id)
}

fn add_account(conn: &Connection, owner_id: i64, name: &str, balance: &str) -> i64 {
    conn.execute(
        "INSERT INTO accounts(owner_id, name, balance) VALUES (?1,?2,?3)",
        params![owner_id, name, balance],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn add_category(conn: &Connection, owner_id: i64, name: &str, kind: &str, color: &str) -> i64 {
    conn.execute(
        "INSERT INTO categories(owner_id, name, type, color) VALUES (?1,?2,?3,?4)",
        params![owner_id, name, kind, color],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn add_tx(
    conn: &Connection,
    owner_id: i64,
    account_id: i64,
    category_id: Option<i64>,
    date: &str,
    amount: &str,
) {
    conn.execute(
        "INSERT INTO transactions(owner_id, account_id, category_id, date, amount) VALUES (?1,?2,?3,?4,?5)",
        params![owner_id, account_id, category_id, date, amount],
    )
    .unwrap();
}

fn add_budget(conn: &Connection, owner_id: i64, month: &str, limit: &str) {
    conn.execute(
        "INSERT INTO budgets(owner_id, month, total_limit) VALUES (?1,?2,?3)",
        params![owner_id, month, limit],
    )
    .unwrap();
}

#[test]
fn monthly_totals_are_window_scoped() {
    let (conn, owner) = base_conn();
    let acc = add_account(&conn, owner, "Main", "0");
    add_tx(&conn, owner, acc, None, "2025-07-31", "999");
    add_tx(&conn, owner, acc, None, "2025-08-01", "100");
    add_tx(&conn, owner, acc, None, "2025-08-15", "-30");
    add_tx(&conn, owner, acc, None, "2025-09-01", "-777");

    let filter = SummaryFilter {
        month: Some("2025-08"),
        ..Default::default()
    };
    let s = monthly_summary(&conn, owner, &filter).unwrap();
    assert_eq!(s.income, 100.0);
    assert_eq!(s.expense, 30.0);
    // income - expense equals the signed sum of the window
    assert_eq!(s.income - s.expense, 70.0);
}

#[test]
fn december_window_rolls_into_next_year() {
    let (conn, owner) = base_conn();
    let acc = add_account(&conn, owner, "Main", "0");
    add_tx(&conn, owner, acc, None, "2025-12-31", "-40");
    add_tx(&conn, owner, acc, None, "2026-01-01", "-60");

    let filter = SummaryFilter {
        month: Some("2025-12"),
        ..Default::default()
    };
    let s = monthly_summary(&conn, owner, &filter).unwrap();
    assert_eq!(s.expense, 40.0);
    assert_eq!(s.income, 0.0);
}

#[test]
fn malformed_month_is_silently_ignored() {
    let (conn, owner) = base_conn();
    let acc = add_account(&conn, owner, "Main", "0");
    add_tx(&conn, owner, acc, None, "2025-07-01", "10");
    add_tx(&conn, owner, acc, None, "2025-08-01", "20");

    let filter = SummaryFilter {
        month: Some("banana"),
        ..Default::default()
    };
    let s = monthly_summary(&conn, owner, &filter).unwrap();
    assert_eq!(s.income, 30.0);
    assert!(s.budget.is_none());
}

#[test]
fn daily_series_never_nets_same_day() {
    let (conn, owner) = base_conn();
    let acc = add_account(&conn, owner, "Main", "0");
    add_tx(&conn, owner, acc, None, "2025-08-10", "100");
    add_tx(&conn, owner, acc, None, "2025-08-10", "-30");

    let filter = SummaryFilter {
        month: Some("2025-08"),
        ..Default::default()
    };
    let s = monthly_summary(&conn, owner, &filter).unwrap();
    assert_eq!(s.daily.len(), 1);
    assert_eq!(s.daily[0].day, "10");
    assert_eq!(s.daily[0].income, 100.0);
    assert_eq!(s.daily[0].expense, 30.0);
}

#[test]
fn by_category_groups_name_and_color() {
    let (conn, owner) = base_conn();
    let acc = add_account(&conn, owner, "Main", "0");
    let rent = add_category(&conn, owner, "Rent", "EXPENSE", "#ef4444");
    let food = add_category(&conn, owner, "Groceries", "EXPENSE", "#22c55e");
    add_tx(&conn, owner, acc, Some(rent), "2025-08-01", "-1200");
    add_tx(&conn, owner, acc, Some(food), "2025-08-05", "-40");
    add_tx(&conn, owner, acc, Some(food), "2025-08-12", "-60");

    let filter = SummaryFilter {
        month: Some("2025-08"),
        ..Default::default()
    };
    let s = monthly_summary(&conn, owner, &filter).unwrap();
    assert_eq!(s.by_category.len(), 2);
    let rent_row = s
        .by_category
        .iter()
        .find(|c| c.category.as_deref() == Some("Rent"))
        .unwrap();
    assert_eq!(rent_row.total, -1200.0);
    assert_eq!(rent_row.color.as_deref(), Some("#ef4444"));
    let food_row = s
        .by_category
        .iter()
        .find(|c| c.category.as_deref() == Some("Groceries"))
        .unwrap();
    assert_eq!(food_row.total, -100.0);
}

#[test]
fn monthly_budget_snapshot_for_expense_only_month() {
    let (conn, owner) = base_conn();
    let acc = add_account(&conn, owner, "Main", "0");
    add_budget(&conn, owner, "2025-08-01", "3000");
    add_tx(&conn, owner, acc, None, "2025-08-03", "-120.50");
    add_tx(&conn, owner, acc, None, "2025-08-20", "-79.50");

    let filter = SummaryFilter {
        month: Some("2025-08"),
        ..Default::default()
    };
    let s = monthly_summary(&conn, owner, &filter).unwrap();
    assert_eq!(s.income, 0.0);
    assert_eq!(s.expense, 200.0);
    let b = s.budget.unwrap();
    assert_eq!(b.limit, 3000.0);
    assert_eq!(b.used, 200.0);
}

#[test]
fn monthly_budget_absent_without_window() {
    let (conn, owner) = base_conn();
    add_budget(&conn, owner, "2025-08-01", "3000");
    let s = monthly_summary(&conn, owner, &SummaryFilter::default()).unwrap();
    assert!(s.budget.is_none());
}

#[test]
fn category_filter_matches_name_case_insensitively() {
    let (conn, owner) = base_conn();
    let acc = add_account(&conn, owner, "Main", "0");
    let rent = add_category(&conn, owner, "Rent", "EXPENSE", "#ef4444");
    add_tx(&conn, owner, acc, Some(rent), "2025-08-01", "-1200");
    add_tx(&conn, owner, acc, None, "2025-08-02", "-50");

    let filter = SummaryFilter {
        category: Some("rent"),
        ..Default::default()
    };
    let s = monthly_summary(&conn, owner, &filter).unwrap();
    assert_eq!(s.expense, 1200.0);

    // All-digit filters match the category id instead
    let id = rent.to_string();
    let filter = SummaryFilter {
        category: Some(&id),
        ..Default::default()
    };
    let s = monthly_summary(&conn, owner, &filter).unwrap();
    assert_eq!(s.expense, 1200.0);
}

#[test]
fn owners_never_see_each_other() {
    let (conn, alice) = base_conn();
    conn.execute("INSERT INTO users(username) VALUES ('bob')", [])
        .unwrap();
    let bob: i64 = conn
        .query_row("SELECT id FROM users WHERE username='bob'", [], |r| {
            r.get(0)
        })
        .unwrap();
    let a_acc = add_account(&conn, alice, "Main", "500");
    let b_acc = add_account(&conn, bob, "Main", "900");
    add_tx(&conn, alice, a_acc, None, "2025-08-01", "100");
    add_tx(&conn, bob, b_acc, None, "2025-08-01", "-40");

    let s = cards_summary(&conn, alice, Some("2025-08")).unwrap();
    assert_eq!(s.balance, 500.0);
    assert_eq!(s.income, 100.0);
    assert_eq!(s.expense, 0.0);
}

#[test]
fn cards_balance_sums_accounts() {
    let (conn, owner) = base_conn();
    add_account(&conn, owner, "Checking", "1000.50");
    add_account(&conn, owner, "Savings", "999.50");

    let s = cards_summary(&conn, owner, None).unwrap();
    assert_eq!(s.balance, 2000.0);
    assert!(s.budget.is_none());
}

#[test]
fn cards_budget_pct_is_clamped_at_100() {
    let (conn, owner) = base_conn();
    let acc = add_account(&conn, owner, "Main", "0");
    add_budget(&conn, owner, "2025-08-01", "100");
    add_tx(&conn, owner, acc, None, "2025-08-04", "-150");

    let s = cards_summary(&conn, owner, Some("2025-08")).unwrap();
    let b = s.budget.unwrap();
    assert_eq!(b.used, 150.0);
    assert_eq!(b.limit, 100.0);
    assert_eq!(b.pct, 100);
}

#[test]
fn cards_budget_pct_guards_zero_limit() {
    let (conn, owner) = base_conn();
    let acc = add_account(&conn, owner, "Main", "0");
    add_budget(&conn, owner, "2025-08-01", "0");
    add_tx(&conn, owner, acc, None, "2025-08-04", "-150");

    let s = cards_summary(&conn, owner, Some("2025-08")).unwrap();
    let b = s.budget.unwrap();
    assert_eq!(b.pct, 0);
}
