// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_category, id_for_user, maybe_print_json, parse_amount, parse_month, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let limit = parse_amount(sub.get_one::<String>("limit").unwrap())?;
    let items: Vec<(String, String)> = sub
        .get_many::<String>("item")
        .unwrap_or_default()
        .map(|raw| {
            raw.split_once('=')
                .map(|(c, a)| (c.trim().to_string(), a.trim().to_string()))
                .ok_or_else(|| anyhow!("Invalid item '{}', expected Category=amount", raw))
        })
        .collect::<Result<_>>()?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO budgets(owner_id, month, total_limit) VALUES (?1,?2,?3)
         ON CONFLICT(owner_id, month) DO UPDATE SET total_limit=excluded.total_limit",
        params![owner_id, month.to_string(), limit.to_string()],
    )?;
    let budget_id: i64 = tx.query_row(
        "SELECT id FROM budgets WHERE owner_id=?1 AND month=?2",
        params![owner_id, month.to_string()],
        |r| r.get(0),
    )?;

    // Items are replaced wholesale, never diffed.
    tx.execute("DELETE FROM budget_items WHERE budget_id=?1", params![budget_id])?;
    for (cat_name, amount_raw) in &items {
        let cat_id = id_for_category(&tx, owner_id, cat_name)?;
        let item_limit = parse_amount(amount_raw)?;
        tx.execute(
            "INSERT INTO budget_items(budget_id, category_id, item_limit) VALUES (?1,?2,?3)",
            params![budget_id, cat_id, item_limit.to_string()],
        )?;
    }
    tx.commit()?;
    println!(
        "Budget set for {} = {} ({} item(s))",
        month.format("%Y-%m"),
        limit,
        items.len()
    );
    Ok(())
}

#[derive(Serialize)]
pub struct BudgetItemRow {
    pub category: String,
    pub limit: String,
}

#[derive(Serialize)]
pub struct BudgetRow {
    pub month: String,
    pub total_limit: String,
    pub items: Vec<BudgetItemRow>,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut sql = String::from(
        "SELECT id, month, total_limit FROM budgets WHERE owner_id=?",
    );
    let mut params_vec: Vec<String> = vec![owner_id.to_string()];
    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND month=?");
        params_vec.push(parse_month(month)?.to_string());
    }
    sql.push_str(" ORDER BY month DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;

    let mut data = Vec::new();
    for row in rows {
        let (budget_id, month, total_limit) = row?;
        let mut istmt = conn.prepare(
            "SELECT c.name, i.item_limit FROM budget_items i \
             JOIN categories c ON i.category_id=c.id \
             WHERE i.budget_id=?1 ORDER BY c.name",
        )?;
        let irows = istmt.query_map(params![budget_id], |r| {
            Ok(BudgetItemRow {
                category: r.get(0)?,
                limit: r.get(1)?,
            })
        })?;
        let items = irows.collect::<std::result::Result<Vec<_>, _>>()?;
        data.push(BudgetRow {
            month,
            total_limit,
            items,
        });
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|b| {
                let items = b
                    .items
                    .iter()
                    .map(|i| format!("{}={}", i.category, i.limit))
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![b.month.clone(), b.total_limit.clone(), items]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Limit", "Items"], rows));
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    conn.execute(
        "DELETE FROM budgets WHERE owner_id=?1 AND month=?2",
        params![owner_id, month.to_string()],
    )?;
    println!("Removed budget for {}", month.format("%Y-%m"));
    Ok(())
}
