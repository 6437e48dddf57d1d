//! A weekend trip among four friends.
//!
//! Shows how a group's expenses turn into balances and a short list of
//! transfers, and how confirming those transfers settles the group.

use rust_decimal_macros::dec;
use split_engine::prelude::*;

fn main() -> Result<(), SplitError> {
    println!("╔═══════════════════════════════════════╗");
    println!("║  split-engine: Weekend Trip Example   ║");
    println!("╚═══════════════════════════════════════╝\n");

    let mut group = Group::new("Weekend trip");
    for (id, name) in [("1", "Alice"), ("2", "Bob"), ("3", "Charlie"), ("4", "Diana")] {
        group.add_member(Member::new(id, name))?;
    }
    let everyone: Vec<MemberId> = group.members().iter().map(|m| m.id.clone()).collect();

    group.add_expense(
        Expense::new(MemberId::new("4"), dec!(450), equal_splits(dec!(450), &everyone)?)
            .with_title("Cabin")
            .with_category("Travel"),
    )?;
    group.add_expense(
        Expense::new(MemberId::new("2"), dec!(85.50), equal_splits(dec!(85.50), &everyone[..3])?)
            .with_title("Groceries")
            .with_category("Groceries"),
    )?;
    group.add_expense(
        Expense::new(
            MemberId::new("1"),
            dec!(65),
            equal_splits(dec!(65), &[MemberId::new("1"), MemberId::new("2"), MemberId::new("4")])?,
        )
        .with_title("Movie night")
        .with_category("Entertainment"),
    )?;

    // --- Before settling ---
    println!("━━━ Before settling ━━━\n");
    let plan = group.settlement_plan()?;
    println!("{}", plan);

    // --- Everyone pays what the plan suggests ---
    println!("━━━ After confirming every transfer ━━━\n");
    for tx in plan.transactions() {
        let id = group.record_transaction(tx)?;
        group.confirm_settlement(id)?;
    }
    println!("{}", group.settlement_plan()?);

    Ok(())
}
