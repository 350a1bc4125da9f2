// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_user, parse_date};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs::File;
use std::io::{self, Write};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let owner_id = id_for_user(conn, m.get_one::<String>("user").unwrap())?;

    let mut sql = String::from(
        "SELECT t.date, t.amount, t.description, c.name, a.name \
         FROM transactions t \
         LEFT JOIN accounts a ON t.account_id=a.id \
         LEFT JOIN categories c ON t.category_id=c.id \
         WHERE t.owner_id=?",
    );
    let mut params_vec: Vec<String> = vec![owner_id.to_string()];
    if let Some(start) = m.get_one::<String>("start") {
        sql.push_str(" AND t.date>=?");
        params_vec.push(parse_date(start)?.to_string());
    }
    if let Some(end) = m.get_one::<String>("end") {
        sql.push_str(" AND t.date<=?");
        params_vec.push(parse_date(end)?.to_string());
    }
    if let Some(cat) = m.get_one::<String>("category") {
        if !cat.is_empty() && cat.chars().all(|c| c.is_ascii_digit()) {
            sql.push_str(" AND t.category_id=?");
        } else {
            sql.push_str(" AND LOWER(c.name)=LOWER(?)");
        }
        params_vec.push(cat.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let mut cur = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
    let mut rows: Vec<[String; 5]> = Vec::new();
    while let Some(r) = cur.next()? {
        let category: Option<String> = r.get(3)?;
        let account: Option<String> = r.get(4)?;
        rows.push([
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            category.unwrap_or_default(),
            account.unwrap_or_default(),
        ]);
    }

    match m.get_one::<String>("out") {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("Create export file {}", path))?;
            write_csv(file, &rows)?;
            println!("Exported {} transaction(s) to {}", rows.len(), path);
        }
        None => {
            write_csv(io::stdout().lock(), &rows)?;
        }
    }
    Ok(())
}

fn write_csv<W: Write>(mut out: W, rows: &[[String; 5]]) -> Result<()> {
    // BOM so spreadsheet tools open UTF-8 cleanly
    out.write_all("\u{feff}".as_bytes())?;
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["date", "amount", "description", "category", "account"])?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
