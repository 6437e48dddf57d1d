use crate::core::member::MemberId;
use crate::core::money::{round_cents, EPSILON};
use crate::core::settlement::Transaction;
use crate::optimization::balances::Balance;
use rust_decimal::Decimal;

/// Propose payments that bring every balance back to zero.
///
/// # Algorithm
///
/// Greedy largest-debtor / largest-creditor matching. This is not an exact
/// minimum-transfer solver (that problem is NP-hard), but it never emits
/// more than `n - 1` transfers for `n` unsettled members.
///
/// 1. Drop members within a cent of zero. Split the rest into debtors and
///    creditors.
/// 2. Sort both by magnitude, largest first. Ties keep input order.
/// 3. Walk both lists with one pointer each. Transfer the smaller of the two
///    outstanding magnitudes, then advance whichever side dropped below a
///    cent (both when they match).
///
/// Remainders under a cent are absorbed, never emitted. The input is not
/// modified.
///
/// # Examples
///
/// ```
/// use split_engine::core::member::MemberId;
/// use split_engine::optimization::balances::Balance;
/// use split_engine::optimization::optimizer::optimize_settlements;
/// use rust_decimal_macros::dec;
///
/// let balances = vec![
///     Balance { member_id: MemberId::new("a"), name: "A".into(), amount: dec!(50) },
///     Balance { member_id: MemberId::new("b"), name: "B".into(), amount: dec!(-50) },
/// ];
/// let txs = optimize_settlements(&balances);
/// assert_eq!(txs.len(), 1);
/// assert_eq!(txs[0].amount, dec!(50.00));
/// ```
pub fn optimize_settlements(balances: &[Balance]) -> Vec<Transaction> {
    // Working copies: (member, outstanding magnitude)
    let mut debtors: Vec<(&MemberId, Decimal)> = balances
        .iter()
        .filter(|b| b.amount < -EPSILON)
        .map(|b| (&b.member_id, -b.amount))
        .collect();
    let mut creditors: Vec<(&MemberId, Decimal)> = balances
        .iter()
        .filter(|b| b.amount > EPSILON)
        .map(|b| (&b.member_id, b.amount))
        .collect();

    debtors.sort_by(|a, b| b.1.cmp(&a.1));
    creditors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut transactions = Vec::with_capacity(debtors.len() + creditors.len());
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let transfer = debtors[i].1.min(creditors[j].1);

        if transfer > EPSILON {
            let tx = Transaction {
                from: debtors[i].0.clone(),
                to: creditors[j].0.clone(),
                amount: round_cents(transfer),
            };
            log::trace!("proposed {}", tx);
            transactions.push(tx);
        }

        debtors[i].1 -= transfer;
        creditors[j].1 -= transfer;

        if debtors[i].1 < EPSILON {
            i += 1;
        }
        if creditors[j].1 < EPSILON {
            j += 1;
        }
    }

    log::debug!(
        "{} debtors and {} creditors settled with {} transfers",
        debtors.len(),
        creditors.len(),
        transactions.len()
    );
    transactions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn balances(entries: &[(&str, Decimal)]) -> Vec<Balance> {
        entries
            .iter()
            .map(|(id, amount)| Balance {
                member_id: MemberId::new(*id),
                name: id.to_uppercase(),
                amount: *amount,
            })
            .collect()
    }

    #[test]
    fn test_one_creditor_three_debtors() {
        let input = balances(&[
            ("a", dec!(600)),
            ("b", dec!(-200)),
            ("c", dec!(-200)),
            ("d", dec!(-200)),
        ]);
        let txs = optimize_settlements(&input);
        assert_eq!(txs.len(), 3);
        for (tx, from) in txs.iter().zip(["b", "c", "d"]) {
            assert_eq!(tx.from, MemberId::new(from));
            assert_eq!(tx.to, MemberId::new("a"));
            assert_eq!(tx.amount, dec!(200.00));
        }
    }

    #[test]
    fn test_exact_pair_advances_both() {
        let txs = optimize_settlements(&balances(&[("a", dec!(50)), ("b", dec!(-50))]));
        assert_eq!(
            txs,
            vec![Transaction {
                from: MemberId::new("b"),
                to: MemberId::new("a"),
                amount: dec!(50.00),
            }]
        );
    }

    #[test]
    fn test_dust_is_not_settled() {
        let txs = optimize_settlements(&balances(&[("a", dec!(0.005)), ("b", dec!(-0.005))]));
        assert!(txs.is_empty());
    }

    #[test]
    fn test_exactly_one_cent_is_absorbed() {
        let txs = optimize_settlements(&balances(&[("a", dec!(0.01)), ("b", dec!(-0.01))]));
        assert!(txs.is_empty());
    }

    #[test]
    fn test_two_cents_are_settled() {
        let txs = optimize_settlements(&balances(&[("a", dec!(0.02)), ("b", dec!(-0.02))]));
        assert_eq!(
            txs,
            vec![Transaction {
                from: MemberId::new("b"),
                to: MemberId::new("a"),
                amount: dec!(0.02),
            }]
        );
    }

    #[test]
    fn test_empty_and_all_zero() {
        assert!(optimize_settlements(&[]).is_empty());
        let zeros = balances(&[("a", Decimal::ZERO), ("b", Decimal::ZERO)]);
        assert!(optimize_settlements(&zeros).is_empty());
    }

    #[test]
    fn test_largest_matched_first() {
        let input = balances(&[
            ("a", dec!(10)),
            ("b", dec!(70)),
            ("c", dec!(-30)),
            ("d", dec!(-50)),
        ]);
        let txs = optimize_settlements(&input);
        assert_eq!(txs[0].from, MemberId::new("d"));
        assert_eq!(txs[0].to, MemberId::new("b"));
        assert_eq!(txs[0].amount, dec!(50));
        assert_eq!(txs.len(), 3);
        assert_eq!(txs[1].from, MemberId::new("c"));
        assert_eq!(txs[1].to, MemberId::new("b"));
        assert_eq!(txs[1].amount, dec!(20));
        assert_eq!(txs[2].to, MemberId::new("a"));
        assert_eq!(txs[2].amount, dec!(10));
    }

    #[test]
    fn test_input_not_mutated() {
        let input = balances(&[("a", dec!(25)), ("b", dec!(-25))]);
        let before = input.clone();
        optimize_settlements(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_sub_cent_remainder_absorbed() {
        // Balances that do not quite conserve: the 0.004 left on a is dust.
        let input = balances(&[("a", dec!(10.004)), ("b", dec!(-10))]);
        let txs = optimize_settlements(&input);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, dec!(10));
    }
}
