// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::commands::reports::cards_summary;
use fintrack::{cli, commands::seed, db};
use rusqlite::Connection;

fn run_seed(conn: &mut Connection, name: &str) {
    let matches = cli::build_cli().get_matches_from(["fintrack", "seed", name]);
    if let Some(("seed", seed_m)) = matches.subcommand() {
        seed::handle(conn, seed_m).unwrap();
    } else {
        panic!("no seed subcommand");
    }
}

#[test]
fn seed_builds_a_reportable_dataset() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    run_seed(&mut conn, "demo");

    let owner_id: i64 = conn
        .query_row("SELECT id FROM users WHERE username='demo'", [], |r| {
            r.get(0)
        })
        .unwrap();

    let s = cards_summary(&conn, owner_id, Some("2025-08")).unwrap();
    assert_eq!(s.balance, 2000.0);
    assert_eq!(s.income, 6500.0);
    assert!(s.expense > 0.0);
    let b = s.budget.unwrap();
    assert_eq!(b.limit, 3000.0);
    assert!(b.pct > 0);
}

#[test]
fn seed_is_idempotent() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    run_seed(&mut conn, "demo");
    run_seed(&mut conn, "demo");

    let users: i64 = conn
        .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
        .unwrap();
    let accounts: i64 = conn
        .query_row("SELECT COUNT(*) FROM accounts", [], |r| r.get(0))
        .unwrap();
    let categories: i64 = conn
        .query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))
        .unwrap();
    let txs: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(users, 1);
    assert_eq!(accounts, 1);
    assert_eq!(categories, 6);
    assert_eq!(txs, 10);
}
