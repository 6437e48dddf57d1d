//! Random group generation for benchmarks and the CLI `generate` command.

use crate::core::expense::Expense;
use crate::core::group::Group;
use crate::core::member::{Member, MemberId};
use crate::core::split::equal_splits;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of members in the group.
    pub member_count: usize,
    /// Number of expenses to record.
    pub expense_count: usize,
    /// Minimum expense amount, in cents.
    pub min_cents: i64,
    /// Maximum expense amount, in cents.
    pub max_cents: i64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            member_count: 5,
            expense_count: 20,
            min_cents: 100,
            max_cents: 50_000,
        }
    }
}

/// Generate a group where each expense is paid by a random member and split
/// equally between a random non-empty subset of members.
pub fn generate_random_group(config: &GroupConfig) -> Group {
    let mut rng = rand::thread_rng();

    let members: Vec<Member> = (0..config.member_count)
        .map(|i| {
            let id = format!("M{:03}", i);
            let name = format!("Member {}", id);
            Member::new(id, name)
        })
        .collect();
    let ids: Vec<MemberId> = members.iter().map(|m| m.id.clone()).collect();

    let mut group = match Group::from_parts("generated", members, Vec::new(), Vec::new()) {
        Ok(group) => group,
        Err(e) => {
            log::warn!("could not build generated group: {}", e);
            return Group::new("generated");
        }
    };
    if ids.is_empty() {
        return group;
    }

    let lo = config.min_cents.max(1);
    let hi = config.max_cents.max(lo + 1);
    for n in 0..config.expense_count {
        let amount = Decimal::new(rng.gen_range(lo..hi), 2);
        let payer = ids[rng.gen_range(0..ids.len())].clone();

        let share_count = rng.gen_range(1..=ids.len());
        let participants: Vec<MemberId> = ids
            .choose_multiple(&mut rng, share_count)
            .cloned()
            .collect();

        if let Ok(splits) = equal_splits(amount, &participants) {
            let expense = Expense::new(payer, amount, splits).with_title(format!("Expense {}", n + 1));
            if let Err(e) = group.add_expense(expense) {
                log::warn!("skipping generated expense: {}", e);
            }
        }
    }

    group
}
