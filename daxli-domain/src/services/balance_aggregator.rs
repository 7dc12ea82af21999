use crate::{
    model::{ExactAmount, ExpenseRecord, MemberBalances, MemberId},
    services::remainder_rounding::{ExactBalances, round_to_units},
};
use fxhash::FxHashSet;
use std::num::NonZeroUsize;

/// Net balance aggregation service
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Compute each member's net balance from a sequence of expenses
    ///
    /// Every expense credits its payer with the full amount and debits each
    /// distinct participant with an exact `amount / n` share. The exact nets
    /// are rounded to whole units only at the end, see
    /// [`round_to_units`](crate::services::remainder_rounding::round_to_units).
    ///
    /// # Arguments
    /// * `members` - Household members; every one gets an entry, even at zero
    /// * `expenses` - Expense records in any order
    /// * `participants_of` - Who consumed a given expense
    ///
    /// # Returns
    /// Integer balances in member order. They sum to zero whenever every
    /// expense with a non-zero amount has at least one participant.
    pub fn aggregate<'e, E, I, F, P>(
        &self,
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
        let mut ledger = Ledger::new(members);
        let mut expense_count = 0usize;
        let mut unshared_count = 0usize;

        for expense in expenses {
            expense_count += 1;
            let amount = expense.amount();
            let payer = expense.payer();

            *ledger.net_mut(payer) += &ExactAmount::from(amount);

            let mut participants: Vec<MemberId> = participants_of(expense).into_iter().collect();
            dedup_in_order(&mut participants);

            let Some(parts) = NonZeroUsize::new(participants.len()) else {
                unshared_count += 1;
                tracing::warn!(
                    payer = payer.0,
                    amount = amount.amount(),
                    "Expense has no participants; it only counts as paid"
                );
                continue;
            };

            let share = ExactAmount::share(amount, parts);
            for participant in participants {
                *ledger.net_mut(participant) -= &share;
            }
        }

        tracing::debug!(
            member_count = ledger.net.len(),
            expense_count,
            unshared_count,
            "Aggregated expenses into exact net balances"
        );

        round_to_units(&ledger.net)
    }
}

/// Exact running net per member: paid minus consumed.
struct Ledger {
    net: ExactBalances,
}

impl Ledger {
    fn new(members: &[MemberId]) -> Self {
        Self {
            net: members
                .iter()
                .map(|&member| (member, ExactAmount::zero()))
                .collect(),
        }
    }

    // Outsiders get their own entry so the totals still cancel out.
    fn net_mut(&mut self, member: MemberId) -> &mut ExactAmount {
        if !self.net.contains_key(&member) {
            tracing::warn!(
                member = member.0,
                "Expense references a member outside the supplied member set"
            );
        }
        self.net.entry(member).or_default()
    }
}

fn dedup_in_order(members: &mut Vec<MemberId>) {
    let mut seen = FxHashSet::default();
    members.retain(|member| seen.insert(*member));
}
