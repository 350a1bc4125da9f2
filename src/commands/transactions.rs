// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    id_for_account, id_for_category, id_for_user, maybe_print_json, parse_amount, parse_date,
    pretty_table,
};
use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let account_name = sub.get_one::<String>("account").unwrap();
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.as_str())
        .unwrap_or("");
    let is_transfer = sub.get_flag("transfer");

    let account_id = id_for_account(conn, owner_id, account_name)?;
    let category_id = match sub.get_one::<String>("category") {
        Some(cat) => Some(id_for_category(conn, owner_id, cat)?),
        None => None,
    };

    conn.execute(
        "INSERT INTO transactions(owner_id, account_id, category_id, date, amount, description, is_transfer)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            owner_id,
            account_id,
            category_id,
            date.to_string(),
            amount.to_string(),
            description,
            is_transfer
        ],
    )?;
    println!(
        "Recorded {} on {} (acct: {})",
        amount, date, account_name
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.account.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Account", "Amount", "Category", "Description"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub account: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

/// Owner-scoped transaction listing, newest first (date DESC, id DESC).
/// A category filter that is all digits matches the category id, anything
/// else matches the name case-insensitively.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let mut sql = String::from(
        "SELECT t.date, a.name, t.amount, c.name, t.description \
         FROM transactions t \
         LEFT JOIN accounts a ON t.account_id=a.id \
         LEFT JOIN categories c ON t.category_id=c.id \
         WHERE t.owner_id=?",
    );
    let mut params_vec: Vec<String> = vec![owner_id.to_string()];

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(start) = sub.get_one::<String>("start") {
        sql.push_str(" AND t.date>=?");
        params_vec.push(parse_date(start)?.to_string());
    }
    if let Some(end) = sub.get_one::<String>("end") {
        sql.push_str(" AND t.date<=?");
        params_vec.push(parse_date(end)?.to_string());
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND a.name=?");
        params_vec.push(acct.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        if !cat.is_empty() && cat.chars().all(|c| c.is_ascii_digit()) {
            sql.push_str(" AND t.category_id=?");
        } else {
            sql.push_str(" AND LOWER(c.name)=LOWER(?)");
        }
        params_vec.push(cat.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        let account: Option<String> = r.get(1)?;
        let amount: String = r.get(2)?;
        let category: Option<String> = r.get(3)?;
        let description: String = r.get(4)?;
        data.push(TransactionRow {
            date,
            account: account.unwrap_or_default(),
            amount,
            category: category.unwrap_or_default(),
            description,
        });
    }
    Ok(data)
}
