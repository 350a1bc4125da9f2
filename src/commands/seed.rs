// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::CategoryKind;
use crate::utils::{get_or_create_category, id_for_account};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const INCOME_CATEGORIES: &[(&str, &str)] = &[("Salary", "#7c3aed"), ("Freelance", "#0ea5e9")];
const EXPENSE_CATEGORIES: &[(&str, &str)] = &[
    ("Rent", "#ef4444"),
    ("Groceries", "#22c55e"),
    ("Transport", "#f59e0b"),
    ("Dining", "#06b6d4"),
];

/// Demo dataset for one user: a funded account, colored categories, a budget
/// and a month of transactions. Safe to run repeatedly.
pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let username = m.get_one::<String>("name").unwrap();

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO users(username) VALUES (?1) ON CONFLICT(username) DO NOTHING",
        params![username],
    )?;
    let owner_id: i64 = tx.query_row(
        "SELECT id FROM users WHERE username=?1",
        params![username],
        |r| r.get(0),
    )?;

    tx.execute(
        "INSERT INTO accounts(owner_id, name, currency, balance) VALUES (?1,'Main Account','USD','2000')
         ON CONFLICT(owner_id, name) DO NOTHING",
        params![owner_id],
    )?;
    let account_id = id_for_account(&tx, owner_id, "Main Account")?;

    let mut income_ids = Vec::new();
    for (name, color) in INCOME_CATEGORIES {
        income_ids.push(seed_category(&tx, owner_id, name, CategoryKind::Income, color)?);
    }
    let mut expense_ids = Vec::new();
    for (name, color) in EXPENSE_CATEGORIES {
        expense_ids.push(seed_category(&tx, owner_id, name, CategoryKind::Expense, color)?);
    }

    tx.execute(
        "INSERT INTO budgets(owner_id, month, total_limit) VALUES (?1,'2025-08-01','3000')
         ON CONFLICT(owner_id, month) DO NOTHING",
        params![owner_id],
    )?;

    let existing: i64 = tx.query_row(
        "SELECT COUNT(*) FROM transactions WHERE owner_id=?1 AND date>='2025-08-01' AND date<'2025-09-01'",
        params![owner_id],
        |r| r.get(0),
    )?;
    if existing == 0 {
        seed_tx(&tx, owner_id, account_id, income_ids[0], "2025-08-01", "5000", "Monthly salary")?;
        seed_tx(&tx, owner_id, account_id, income_ids[1], "2025-08-20", "1500", "Freelance project")?;
        let expenses: &[(&str, &str)] = &[
            ("2025-08-05", "-120"),
            ("2025-08-07", "-45"),
            ("2025-08-10", "-60"),
            ("2025-08-12", "-35"),
            ("2025-08-15", "-150"),
            ("2025-08-18", "-80"),
            ("2025-08-23", "-55"),
            ("2025-08-27", "-95"),
        ];
        for (i, (date, amount)) in expenses.iter().enumerate() {
            let cat = expense_ids[i % expense_ids.len()];
            seed_tx(&tx, owner_id, account_id, cat, date, amount, "")?;
        }
    }
    tx.commit()?;

    println!("Seeded demo data for '{}'", username);
    Ok(())
}

fn seed_category(
    tx: &Transaction<'_>,
    owner_id: i64,
    name: &str,
    kind: CategoryKind,
    color: &str,
) -> Result<i64> {
    let id = get_or_create_category(tx, owner_id, name, kind)?;
    tx.execute(
        "UPDATE categories SET color=?1 WHERE id=?2 AND color='#4f46e5'",
        params![color, id],
    )?;
    Ok(id)
}

fn seed_tx(
    tx: &Transaction<'_>,
    owner_id: i64,
    account_id: i64,
    category_id: i64,
    date: &str,
    amount: &str,
    description: &str,
) -> Result<()> {
    tx.execute(
        "INSERT INTO transactions(owner_id, account_id, category_id, date, amount, description)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![owner_id, account_id, category_id, date, amount, description],
    )?;
    Ok(())
}
