// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).value_parser(value_parser!(i64))
}

fn today_arg() -> Arg {
    Arg::new("today")
        .long("today")
        .help("Reference date YYYY-MM-DD (defaults to the local date)")
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("year").long("year").help("Calendar year, e.g. 2025"))
        .arg(Arg::new("month").long("month").help("Month YYYY-MM"))
        .arg(Arg::new("from").long("from").help("Start date YYYY-MM-DD"))
        .arg(Arg::new("to").long("to").help("End date YYYY-MM-DD"))
}

pub fn build_cli() -> Command {
    Command::new("ledgerkeep")
        .about("Small-business ledger: recurring entries, statement import, amortization, balance sheet")
        .version(crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("BANK")
                                .help("BANK|CASH|OTHER"),
                        )
                        .arg(Arg::new("balance").long("balance").default_value("0"))
                        .arg(
                            Arg::new("inactive")
                                .long("inactive")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .arg(
                            Arg::new("active")
                                .long("active")
                                .action(ArgAction::SetTrue)
                                .help("Only active accounts"),
                        )
                        .arg(json_flag()),
                )
                .subcommand(Command::new("activate").arg(id_arg()))
                .subcommand(Command::new("deactivate").arg(id_arg()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("INCOME|EXPENSE"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("label").long("label").required(true))
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("category").long("category").default_value("Divers"))
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(period_args(
                    Command::new("list")
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("type").long("type"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(json_flag()),
                ))
                .subcommand(
                    Command::new("search")
                        .arg(Arg::new("query").required(true))
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("label").long("label"))
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("recur")
                .about("Recurring transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("label").long("label").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Signed amount; negative for an expense"),
                        )
                        .arg(Arg::new("category").long("category").default_value("Divers"))
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("start").long("start").required(true))
                        .arg(Arg::new("end").long("end"))
                        .arg(Arg::new("note").long("note"))
                        .arg(today_arg()),
                )
                .subcommand(
                    Command::new("list")
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include inactive templates"),
                        )
                        .arg(json_flag()),
                )
                .subcommand(Command::new("generate").arg(today_arg()).arg(json_flag()))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("label").long("label"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("end").long("end"))
                        .arg(
                            Arg::new("from")
                                .long("from")
                                .help("Only rewrite occurrences on or after this date"),
                        )
                        .arg(
                            Arg::new("deactivate")
                                .long("deactivate")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(today_arg()),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("asset")
                .about("Fixed assets")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("cost").long("cost").required(true))
                        .arg(
                            Arg::new("quantity")
                                .long("quantity")
                                .default_value("1")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("years")
                                .long("years")
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("as-of").long("as-of"))
                        .arg(json_flag()),
                )
                .subcommand(Command::new("schedule").arg(id_arg()).arg(json_flag()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(period_args(Command::new("result").arg(json_flag())))
                .subcommand(
                    Command::new("monthly")
                        .arg(Arg::new("year").long("year"))
                        .arg(json_flag()),
                )
                .subcommand(period_args(
                    Command::new("by-category")
                        .arg(Arg::new("type").long("type"))
                        .arg(json_flag()),
                ))
                .subcommand(period_args(Command::new("by-account").arg(json_flag()))),
        )
        .subcommand(
            Command::new("bilan")
                .about("Balance sheet")
                .subcommand(
                    Command::new("show")
                        .arg(Arg::new("as-of").long("as-of"))
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("set-equity")
                        .arg(
                            Arg::new("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("as-of").long("as-of")),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("statement")
                        .arg(Arg::new("path").required(true))
                        .arg(json_flag()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(period_args(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )),
        )
}
