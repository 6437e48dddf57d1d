//! split-engine CLI
//!
//! Compute balances and a settle-up plan from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle a group described in a JSON file
//! split-engine settle --input group.json
//!
//! # Output as JSON
//! split-engine settle --input group.json --format json
//!
//! # Generate a random group for testing
//! split-engine generate --members 6 --expenses 40
//! ```

use chrono::NaiveDate;
use split_engine::core::error::SplitError;
use split_engine::core::expense::Expense;
use split_engine::core::group::Group;
use split_engine::core::member::{Member, MemberId};
use split_engine::core::money::parse_amount;
use split_engine::core::settlement::{Settlement, SettlementStatus};
use split_engine::core::split::{equal_splits, Split};
use split_engine::simulation::generator::{generate_random_group, GroupConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"split-engine — shared expense balances and settle-up plans

USAGE:
    split-engine <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute balances and the transfers that settle a group
    generate    Generate a random group (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>      Path to JSON group file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --members <N>       Number of members (default: 5)
    --expenses <N>      Number of expenses (default: 20)
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG            Log filter, e.g. split_engine=debug

EXAMPLES:
    split-engine settle --input group.json
    split-engine settle --input group.json --format json
    split-engine generate --members 8 --expenses 60 --output group.json"#
    );
}

/// JSON schema for a group file.
#[derive(serde::Deserialize, serde::Serialize)]
struct GroupFile {
    #[serde(default)]
    name: String,
    members: Vec<Member>,
    #[serde(default)]
    expenses: Vec<ExpenseInput>,
    #[serde(default)]
    settlements: Vec<SettlementInput>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ExpenseInput {
    #[serde(default)]
    title: String,
    amount: String,
    paid_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    /// Explicit shares.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    splits: Vec<SplitInput>,
    /// Split the amount equally between these members instead.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    split_between: Vec<String>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct SplitInput {
    member: String,
    amount: String,
    #[serde(default)]
    paid: bool,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct SettlementInput {
    from: String,
    to: String,
    amount: String,
    #[serde(default)]
    status: SettlementStatus,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn expense_from_input(input: ExpenseInput) -> Result<Expense, SplitError> {
    let amount = parse_amount(&input.amount)?;
    let splits = if input.split_between.is_empty() {
        input
            .splits
            .iter()
            .map(|s| -> Result<Split, SplitError> {
                let split = Split::new(MemberId::new(&s.member), parse_amount(&s.amount)?);
                Ok(if s.paid { split.paid() } else { split })
            })
            .collect::<Result<Vec<_>, SplitError>>()?
    } else {
        let members: Vec<MemberId> = input.split_between.iter().map(MemberId::new).collect();
        equal_splits(amount, &members)?
    };

    let mut expense = Expense::new(MemberId::new(&input.paid_by), amount, splits).with_title(input.title);
    if let Some(category) = input.category {
        expense = expense.with_category(category);
    }
    if let Some(date) = input.date {
        expense = expense.with_date(date);
    }
    Ok(expense)
}

fn settlement_from_input(input: SettlementInput) -> Result<Settlement, SplitError> {
    let mut settlement = Settlement::new(
        MemberId::new(&input.from),
        MemberId::new(&input.to),
        parse_amount(&input.amount)?,
    );
    if input.status == SettlementStatus::Confirmed {
        settlement.confirm();
    }
    Ok(settlement)
}

fn load_group(path: &str) -> Group {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        fail(format!("reading file '{}': {}", path, e));
    });

    let file: GroupFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "members": [ {{ "id": "a", "name": "Alice" }}, {{ "id": "b", "name": "Bob" }} ],
  "expenses": [ {{ "title": "Dinner", "amount": "100", "paid_by": "a", "split_between": ["a", "b"] }} ],
  "settlements": [ {{ "from": "b", "to": "a", "amount": "20", "status": "confirmed" }} ]
}}"#
        );
        process::exit(1);
    });

    let build = || -> Result<Group, SplitError> {
        let expenses = file
            .expenses
            .into_iter()
            .map(expense_from_input)
            .collect::<Result<Vec<_>, _>>()?;
        let settlements = file
            .settlements
            .into_iter()
            .map(settlement_from_input)
            .collect::<Result<Vec<_>, _>>()?;
        Group::from_parts(file.name, file.members, expenses, settlements)
    };
    build().unwrap_or_else(|e| fail(e))
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    fail("--input requires a file path");
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    fail("--format requires 'text' or 'json'");
                });
            }
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| fail("--input <FILE> is required"));
    let group = load_group(&path);
    let plan = group.settlement_plan().unwrap_or_else(|e| fail(e));

    if format == "json" {
        let json = serde_json::to_string_pretty(&plan).unwrap_or_else(|e| fail(e));
        println!("{}", json);
    } else {
        if !group.name.is_empty() {
            println!("Group: {}\n", group.name);
        }
        println!("{}", plan);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--members" => {
                i += 1;
                config.member_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--members requires a number"));
            }
            "--expenses" => {
                i += 1;
                config.expense_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--expenses requires a number"));
            }
            "--output" => {
                i += 1;
                output_path = Some(
                    args.get(i)
                        .cloned()
                        .unwrap_or_else(|| fail("--output requires a file path")),
                );
            }
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }

    let group = generate_random_group(&config);

    let output = GroupFile {
        name: group.name.clone(),
        members: group.members().to_vec(),
        expenses: group
            .expenses()
            .iter()
            .map(|e| ExpenseInput {
                title: e.title().to_string(),
                amount: e.amount().to_string(),
                paid_by: e.paid_by().to_string(),
                category: e.category().map(str::to_string),
                date: e.date(),
                splits: e
                    .splits()
                    .iter()
                    .map(|s| SplitInput {
                        member: s.member_id.to_string(),
                        amount: s.amount.to_string(),
                        paid: s.paid,
                    })
                    .collect(),
                split_between: Vec::new(),
            })
            .collect(),
        settlements: Vec::new(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| fail(e));

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            fail(format!("writing to '{}': {}", path, e));
        });
        eprintln!(
            "Generated {} expenses across {} members → {}",
            group.expenses().len(),
            group.members().len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
