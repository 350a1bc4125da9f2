// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::CategoryKind;
use crate::utils::{
    get_or_create_account, get_or_create_category, id_for_user, parse_amount, parse_date,
};
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use rusqlite::{params, Connection, Transaction};
use rust_decimal::Decimal;
use std::collections::{hash_map::Entry, HashMap};
use std::fs::File;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let username = m.get_one::<String>("user").unwrap();
    let path = m.get_one::<String>("path").unwrap().trim();
    let delimiter = m.get_one::<String>("delimiter").unwrap();
    let dry_run = m.get_flag("dry-run");

    let delim = match delimiter.as_bytes() {
        [b] => *b,
        _ => return Err(anyhow!("Delimiter must be a single byte, got '{}'", delimiter)),
    };
    let owner_id = id_for_user(conn, username)?;

    let file = File::open(path).with_context(|| format!("Open CSV {}", path))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delim)
        .from_reader(file);

    let cols = column_index(rdr.headers()?);
    for required in ["date", "amount"] {
        if !cols.contains_key(required) {
            return Err(anyhow!("CSV missing required column: {}", required));
        }
    }

    let tx = conn.transaction()?;
    let mut account_cache: HashMap<String, i64> = HashMap::new();
    let mut category_cache: HashMap<(String, CategoryKind), i64> = HashMap::new();

    let mut created = 0usize;
    let mut skipped = 0usize;
    let mut errors = 0usize;

    // Rows are streamed one at a time; a bad row is reported and skipped,
    // never fatal for the batch.
    for (i, result) in rdr.records().enumerate() {
        let line = i + 2; // header is line 1
        let outcome = result.map_err(anyhow::Error::from).and_then(|rec| {
            import_row(
                &tx,
                owner_id,
                &cols,
                &rec,
                dry_run,
                &mut account_cache,
                &mut category_cache,
            )
        });
        match outcome {
            Ok(()) => created += 1,
            Err(e) => {
                errors += 1;
                skipped += 1;
                eprintln!("Line {}: {}", line, e);
            }
        }
    }
    tx.commit()?;

    let mut msg = format!(
        "Imported {} row(s). Skipped {}. Errors {}.",
        created, skipped, errors
    );
    if dry_run {
        msg = format!("[DRY RUN] {}", msg);
    }
    println!("{}", msg);
    Ok(())
}

/// Header names matched case-insensitively after trimming.
fn column_index(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

fn field<'a>(rec: &'a StringRecord, cols: &HashMap<String, usize>, name: &str) -> &'a str {
    cols.get(name)
        .and_then(|&i| rec.get(i))
        .unwrap_or("")
        .trim()
}

fn import_row(
    tx: &Transaction<'_>,
    owner_id: i64,
    cols: &HashMap<String, usize>,
    rec: &StringRecord,
    dry_run: bool,
    account_cache: &mut HashMap<String, i64>,
    category_cache: &mut HashMap<(String, CategoryKind), i64>,
) -> Result<()> {
    let date = parse_date(field(rec, cols, "date"))?;
    let amount = parse_amount(field(rec, cols, "amount"))?;

    let description = field(rec, cols, "description");
    let cat_raw = field(rec, cols, "category");
    let cat_name = if cat_raw.is_empty() {
        if amount > Decimal::ZERO {
            "Income"
        } else {
            "Uncategorized"
        }
    } else {
        cat_raw
    };
    let acc_raw = field(rec, cols, "account");
    let acc_name = if acc_raw.is_empty() { "Wallet" } else { acc_raw };
    let ccy_raw = field(rec, cols, "currency");
    let currency = if ccy_raw.is_empty() { "USD" } else { ccy_raw };

    // An explicit type column wins over the sign of the amount.
    let kind = field(rec, cols, "type")
        .parse::<CategoryKind>()
        .unwrap_or_else(|_| CategoryKind::from_amount(amount));

    let account_id = match account_cache.entry(acc_name.to_string()) {
        Entry::Occupied(entry) => *entry.get(),
        Entry::Vacant(entry) => *entry.insert(get_or_create_account(tx, owner_id, acc_name, currency)?),
    };
    let category_id = match category_cache.entry((cat_name.to_string(), kind)) {
        Entry::Occupied(entry) => *entry.get(),
        Entry::Vacant(entry) => *entry.insert(get_or_create_category(tx, owner_id, cat_name, kind)?),
    };

    if dry_run {
        // The lookups above already ran: dry-run still creates missing
        // accounts and categories (documented in the subcommand help).
        let short: String = description.chars().take(30).collect();
        println!(
            "[DRY] {} {} {}/{} {} {}",
            date,
            amount,
            cat_name,
            kind.as_str(),
            acc_name,
            short
        );
        return Ok(());
    }

    tx.execute(
        "INSERT INTO transactions(owner_id, account_id, category_id, date, amount, description)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            owner_id,
            account_id,
            category_id,
            date.to_string(),
            amount.to_string(),
            description
        ],
    )?;
    Ok(())
}
