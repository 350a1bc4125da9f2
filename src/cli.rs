// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .required(true)
        .help("Owner username; every record is scoped to one owner")
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Emit pretty JSON instead of a table")
}

fn jsonl_flag() -> Arg {
    Arg::new("jsonl")
        .long("jsonl")
        .action(ArgAction::SetTrue)
        .help("Emit one JSON object per line")
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .about("Personal finance tracker: accounts, categories, budgets, CSV import, monthly reports")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Manage owners")
                .subcommand(
                    Command::new("add")
                        .about("Add an owner")
                        .arg(Arg::new("name").required(true).help("Username")),
                )
                .subcommand(Command::new("list").about("List owners")),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add an account")
                        .arg(user_arg())
                        .arg(Arg::new("name").required(true).help("Account name"))
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .default_value("USD")
                                .help("Currency code"),
                        )
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .allow_hyphen_values(true)
                                .help("Opening balance"),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .about("List accounts")
                        .arg(user_arg())
                        .arg(json_flag())
                        .arg(jsonl_flag()),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove an account and its transactions")
                        .arg(user_arg())
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(user_arg())
                        .arg(Arg::new("name").required(true).help("Category name"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("INCOME or EXPENSE"),
                        )
                        .arg(
                            Arg::new("color")
                                .long("color")
                                .default_value("#4f46e5")
                                .help("Display color, hex like #AABBCC"),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .about("List categories")
                        .arg(user_arg())
                        .arg(json_flag())
                        .arg(jsonl_flag()),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a category; its transactions keep no category")
                        .arg(user_arg())
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction (positive amount = income, negative = expense)")
                        .arg(user_arg())
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("Transaction date"),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Signed decimal amount"),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .help("Account name"),
                        )
                        .arg(Arg::new("category").long("category").help("Category name"))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .help("Free-text description"),
                        )
                        .arg(
                            Arg::new("transfer")
                                .long("transfer")
                                .action(ArgAction::SetTrue)
                                .help("Mark as a transfer between accounts"),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month").help("Filter to YYYY-MM"))
                        .arg(Arg::new("start").long("start").help("Earliest date, inclusive"))
                        .arg(Arg::new("end").long("end").help("Latest date, inclusive"))
                        .arg(Arg::new("account").long("account").help("Account name"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Category id or name"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .help("Maximum rows"),
                        )
                        .arg(json_flag())
                        .arg(jsonl_flag()),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage monthly budgets")
                .subcommand(
                    Command::new("set")
                        .about("Set the budget for a month; existing items are replaced wholesale")
                        .arg(user_arg())
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .required(true)
                                .help("Month as YYYY-MM"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .required(true)
                                .help("Total spending limit for the month"),
                        )
                        .arg(
                            Arg::new("item")
                                .long("item")
                                .action(ArgAction::Append)
                                .help("Per-category sub-limit as Category=amount; repeatable"),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .about("List budgets")
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month").help("Only this YYYY-MM"))
                        .arg(json_flag())
                        .arg(jsonl_flag()),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove the budget for a month")
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregate views over transactions")
                .subcommand(
                    Command::new("monthly")
                        .about("Income/expense totals, category breakdown, daily series, budget")
                        .arg(user_arg())
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .help("Month as YYYY-MM; malformed values are ignored"),
                        )
                        .arg(Arg::new("start").long("start").help("Earliest date, inclusive"))
                        .arg(Arg::new("end").long("end").help("Latest date, inclusive"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Category id or name"),
                        )
                        .arg(json_flag())
                        .arg(jsonl_flag()),
                )
                .subcommand(
                    Command::new("cards")
                        .about("Dashboard cards: total balance, income, expense, budget use")
                        .arg(user_arg())
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .help("Month as YYYY-MM; malformed values are ignored"),
                        )
                        .arg(json_flag())
                        .arg(jsonl_flag()),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import transactions from a delimited file")
                .long_about(
                    "Import transactions from a delimited file.\n\n\
                     Required columns: date, amount\n\
                     Optional columns: description, category, type (INCOME|EXPENSE), account, currency\n\n\
                     Positive amounts are treated as INCOME, negative as EXPENSE, unless a 'type'\n\
                     column says otherwise. Bad rows are reported and skipped, never fatal.\n\
                     Note: --dry-run still creates missing accounts and categories.",
                )
                .arg(user_arg())
                .arg(
                    Arg::new("path")
                        .long("path")
                        .required(true)
                        .help("Path to the CSV file"),
                )
                .arg(
                    Arg::new("delimiter")
                        .long("delimiter")
                        .default_value(",")
                        .help("Field delimiter, a single byte"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Parse and resolve lookups only; do not write transactions"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export transactions as CSV (BOM-prefixed for spreadsheets)")
                .arg(user_arg())
                .arg(Arg::new("start").long("start").help("Earliest date, inclusive"))
                .arg(Arg::new("end").long("end").help("Latest date, inclusive"))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("Category id or name"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .help("Output file; stdout when omitted"),
                ),
        )
        .subcommand(
            Command::new("seed")
                .about("Seed a demo dataset for a user")
                .arg(Arg::new("name").required(true).help("Username to seed")),
        )
}
