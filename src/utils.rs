// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::CategoryKind;

/// Accepted transaction date formats, tried in order; first match wins.
/// Ambiguous dates like 01/02/2025 therefore always resolve as DD/MM/YYYY.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported date format: '{0}'")]
    Date(String),
    #[error("Invalid amount: '{0}'")]
    Amount(String),
}

pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(ParseError::Date(s.to_string()))
}

/// Exact decimal parse; thousands separators are stripped first.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseError> {
    let trimmed = s.trim();
    trimmed
        .replace(',', "")
        .parse::<Decimal>()
        .map_err(|_| ParseError::Amount(trimmed.to_string()))
}

/// Strict YYYY-MM parse for commands that require a month argument.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

/// Half-open window [first-of-month, first-of-next-month) for "YYYY-MM".
/// Malformed input yields None; report filters treat that as "no month filter".
pub fn month_window(s: &str) -> Option<(NaiveDate, NaiveDate)> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 2 {
        return None;
    }
    let y: i32 = parts[0].parse().ok()?;
    let m: u32 = parts[1].parse().ok()?;
    let start = NaiveDate::from_ymd_opt(y, m, 1)?;
    let next_start = NaiveDate::from_ymd_opt(y + (m / 12) as i32, (m % 12) + 1, 1)?;
    Some((start, next_start))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_user(conn: &Connection, username: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM users WHERE username=?1")?;
    let id: i64 = stmt
        .query_row(params![username], |r| r.get(0))
        .with_context(|| format!("User '{}' not found. Create it first.", username))?;
    Ok(id)
}

pub fn id_for_account(conn: &Connection, owner_id: i64, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM accounts WHERE owner_id=?1 AND name=?2")?;
    let id: i64 = stmt
        .query_row(params![owner_id, name], |r| r.get(0))
        .with_context(|| format!("Account '{}' not found", name))?;
    Ok(id)
}

/// First category matching the name, regardless of kind.
pub fn id_for_category(conn: &Connection, owner_id: i64, name: &str) -> Result<i64> {
    let mut stmt =
        conn.prepare("SELECT id FROM categories WHERE owner_id=?1 AND name=?2 ORDER BY id")?;
    let id: i64 = stmt
        .query_row(params![owner_id, name], |r| r.get(0))
        .with_context(|| format!("Category '{}' not found", name))?;
    Ok(id)
}

/// Atomic get-or-create keyed on UNIQUE(owner_id, name). The currency only
/// applies when the account is created; an existing account keeps its own.
pub fn get_or_create_account(
    conn: &Connection,
    owner_id: i64,
    name: &str,
    currency: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO accounts(owner_id, name, currency) VALUES (?1,?2,?3)
         ON CONFLICT(owner_id, name) DO NOTHING",
        params![owner_id, name, currency],
    )?;
    id_for_account(conn, owner_id, name)
}

/// Atomic get-or-create keyed on UNIQUE(owner_id, name, type).
pub fn get_or_create_category(
    conn: &Connection,
    owner_id: i64,
    name: &str,
    kind: CategoryKind,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO categories(owner_id, name, type) VALUES (?1,?2,?3)
         ON CONFLICT(owner_id, name, type) DO NOTHING",
        params![owner_id, name, kind.as_str()],
    )?;
    let mut stmt =
        conn.prepare("SELECT id FROM categories WHERE owner_id=?1 AND name=?2 AND type=?3")?;
    let id: i64 = stmt
        .query_row(params![owner_id, name, kind.as_str()], |r| r.get(0))
        .with_context(|| format!("Category '{}' ({}) not found", name, kind.as_str()))?;
    Ok(id)
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
