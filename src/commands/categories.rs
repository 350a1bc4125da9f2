// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, CategoryKind};
use crate::utils::{id_for_user, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap();
            let kind: CategoryKind = sub.get_one::<String>("type").unwrap().parse()?;
            let color = sub.get_one::<String>("color").unwrap();
            conn.execute(
                "INSERT INTO categories(owner_id, name, type, color) VALUES (?1,?2,?3,?4)",
                params![owner_id, name, kind.as_str(), color],
            )
            .with_context(|| format!("Category '{}' ({}) already exists", name, kind.as_str()))?;
            println!("Added category '{}' ({})", name, kind.as_str());
        }
        Some(("list", sub)) => {
            let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let mut stmt = conn.prepare(
                "SELECT id, name, type, color FROM categories WHERE owner_id=?1 ORDER BY type, name",
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
                let (id, name, type_s, color) = row?;
                data.push(Category {
                    id,
                    name,
                    kind: type_s.parse()?,
                    color,
                });
            }
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.name.clone(),
                            c.kind.as_str().to_string(),
                            c.color.clone(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Name", "Type", "Color"], rows));
            }
        }
        Some(("rm", sub)) => {
            let owner_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute(
                "DELETE FROM categories WHERE owner_id=?1 AND name=?2",
                params![owner_id, name],
            )?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
