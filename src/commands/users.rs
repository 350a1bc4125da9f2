// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("INSERT INTO users(username) VALUES (?1)", params![name])
                .with_context(|| format!("User '{}' already exists", name))?;
            println!("Added user '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare("SELECT username, created_at FROM users ORDER BY username")?;
            let rows = stmt.query_map([], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (u, c) = row?;
                data.push(vec![u, c]);
            }
            println!("{}", pretty_table(&["Username", "Created"], data));
        }
        _ => {}
    }
    Ok(())
}
