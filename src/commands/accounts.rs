// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Account;
use crate::utils::{id_for_user, maybe_print_json, parse_amount, pretty_table};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap();
            let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
            let balance = parse_amount(sub.get_one::<String>("balance").unwrap())?;
            conn.execute(
                "INSERT INTO accounts(owner_id, name, currency, balance) VALUES (?1,?2,?3,?4)",
                params![owner_id, name, ccy, balance.to_string()],
            )
            .with_context(|| format!("Account '{}' already exists", name))?;
            println!("Added account '{}' ({}, balance {})", name, ccy, balance);
        }
        Some(("list", sub)) => {
            let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let mut stmt = conn.prepare(
                "SELECT id, name, currency, balance FROM accounts WHERE owner_id=?1 ORDER BY name",
            )?;
            let rows = stmt.query_map(params![owner_id], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, name, currency, balance_s) = row?;
                let balance = balance_s
                    .parse()
                    .with_context(|| format!("Invalid balance '{}' for account {}", balance_s, name))?;
                data.push(Account {
                    id,
                    name,
                    currency,
                    balance,
                });
            }
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|a| {
                        vec![
                            a.name.clone(),
                            a.currency.clone(),
                            format!("{:.2}", a.balance),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Name", "Currency", "Balance"], rows));
            }
        }
        Some(("rm", sub)) => {
            let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute(
                "DELETE FROM accounts WHERE owner_id=?1 AND name=?2",
                params![owner_id, name],
            )?;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
