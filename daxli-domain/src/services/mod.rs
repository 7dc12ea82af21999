pub mod balance_aggregator;
pub mod debt_simplifier;
pub mod remainder_rounding;

pub use balance_aggregator::BalanceAggregator;
pub use debt_simplifier::{DebtSimplifier, apply_transfers};
pub use remainder_rounding::{ExactBalances, round_to_units};

use crate::model::{ExpenseRecord, MemberBalances, MemberId, Transfer};

/// Net integer balance per member for a set of expenses.
///
/// See [`BalanceAggregator::aggregate`].
pub fn compute_net_balances<'e, E, I, F, P>(
    members: &[MemberId],
    expenses: I,
    participants_of: F,
) -> MemberBalances
where
    E: ExpenseRecord + 'e,
    I: IntoIterator<Item = &'e E>,
    F: Fn(&'e E) -> P,
    P: IntoIterator<Item = MemberId>,
{
    BalanceAggregator.aggregate(members, expenses, participants_of)
}

/// Suggested transfers that bring every balance to zero.
///
/// See [`DebtSimplifier::simplify`].
pub fn simplify_debts(balances: &MemberBalances) -> Vec<Transfer> {
    DebtSimplifier.simplify(balances)
}
