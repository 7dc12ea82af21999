use crate::{
    error::BalanceError,
    model::{
        DashboardSummary, Ledger, LedgerExpense, MemberSpending, PeriodClosure, PersonBalance,
    },
    validation::{ExpenseValidator, ZeroParticipantPolicy},
};
use daxli_domain::{
    ExpenseRecord, MemberBalances, MemberId, Money, Transfer, apply_transfers,
    compute_net_balances, simplify_debts,
};
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::IndexMap;
use std::borrow::Cow;

/// An active expense that passed validation, with the participants to use.
struct Validated<'e> {
    expense: &'e LedgerExpense,
    participants: Cow<'e, [MemberId]>,
}

impl ExpenseRecord for Validated<'_> {
    fn payer(&self) -> MemberId {
        self.expense.payer
    }

    fn amount(&self) -> Money {
        self.expense.amount
    }
}

/// Household-level use cases on top of the balance engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct BalanceService {
    validator: ExpenseValidator,
}

impl BalanceService {
    pub fn new(policy: ZeroParticipantPolicy) -> Self {
        Self {
            validator: ExpenseValidator::new(policy),
        }
    }

    /// Net balances over the ledger's active expenses.
    ///
    /// Fails on the first expense the validator refuses; archived expenses
    /// are never looked at. The active total must fit in `Money`, which
    /// bounds every balance and transfer derived from it.
    pub fn net_balances(&self, ledger: &Ledger) -> Result<MemberBalances, BalanceError> {
        let validated = self.validate_active(ledger)?;
        Ok(compute_net_balances(
            ledger.members(),
            &validated,
            |record| record.participants.iter().copied(),
        ))
    }

    pub fn dashboard(&self, ledger: &Ledger) -> Result<DashboardSummary, BalanceError> {
        let balances = self.net_balances(ledger)?;
        let transfers = settle(&balances)?;

        let mut spending: IndexMap<MemberId, Money, FxBuildHasher> = ledger
            .members()
            .iter()
            .map(|&member| (member, Money::ZERO))
            .collect();
        let household_total = active_total(ledger)?;
        let mut expense_count = 0usize;
        for expense in ledger.active_expenses() {
            *spending.entry(expense.payer).or_insert(Money::ZERO) += expense.amount;
            expense_count += 1;
        }
        let max_spent = spending.values().copied().max().unwrap_or(Money::ZERO);

        tracing::debug!(
            member_count = balances.len(),
            expense_count,
            transfer_count = transfers.len(),
            household_total = household_total.amount(),
            "Built household dashboard"
        );

        Ok(DashboardSummary {
            balances: balances
                .into_iter()
                .map(|(id, balance)| PersonBalance { id, balance })
                .collect(),
            transfers,
            household_total,
            expense_count,
            spending_by_person: spending
                .into_iter()
                .map(|(member, spent)| MemberSpending { member, spent })
                .collect(),
            max_spent,
        })
    }

    /// Close the current period under `label`.
    ///
    /// Computes the transfers that settle every active expense and lists
    /// those expenses for archiving. The ledger itself is not changed.
    pub fn close_period(
        &self,
        ledger: &Ledger,
        label: &str,
    ) -> Result<PeriodClosure, BalanceError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(BalanceError::EmptyClosureLabel);
        }
        let archived: Vec<_> = ledger.active_expenses().map(|expense| expense.id).collect();
        if archived.is_empty() {
            return Err(BalanceError::NothingToSettle);
        }

        let balances = self.net_balances(ledger)?;
        let transfers = settle(&balances)?;
        let total = active_total(ledger)?;

        tracing::info!(
            label,
            archived_count = archived.len(),
            transfer_count = transfers.len(),
            total = total.amount(),
            "Closed household period"
        );

        Ok(PeriodClosure {
            label: label.into(),
            archived,
            transfers,
            total,
        })
    }

    fn validate_active<'e>(&self, ledger: &'e Ledger) -> Result<Vec<Validated<'e>>, BalanceError> {
        let members: FxHashSet<MemberId> = ledger.members().iter().copied().collect();
        let validated = ledger
            .active_expenses()
            .map(|expense| -> Result<Validated<'e>, BalanceError> {
                let participants = self.validator.validate(&members, expense)?;
                Ok(Validated {
                    expense,
                    participants,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        active_total(ledger)?;
        Ok(validated)
    }
}

/// Sum of the active amounts, or `TotalOverflow` when it leaves `i64`.
fn active_total(ledger: &Ledger) -> Result<Money, BalanceError> {
    ledger
        .active_expenses()
        .try_fold(Money::ZERO, |total, expense| total.checked_add(expense.amount))
        .ok_or_else(|| {
            tracing::warn!(
                expense_count = ledger.active_expenses().count(),
                "Active expenses overflow the money range"
            );
            BalanceError::TotalOverflow
        })
}

/// Simplifies balances that must already sum to zero, then checks the result.
fn settle(balances: &MemberBalances) -> Result<Vec<Transfer>, BalanceError> {
    let total: Money = balances.values().sum();
    if !total.is_zero() {
        tracing::warn!(
            total = total.amount(),
            "Refusing to simplify balances that do not sum to zero"
        );
        return Err(BalanceError::ImbalancedTotal(total));
    }

    let transfers = simplify_debts(balances);
    let remaining = apply_transfers(balances, &transfers);
    if let Some((&member, &left)) = remaining.iter().find(|(_, balance)| !balance.is_zero()) {
        tracing::error!(
            member = member.0,
            remaining = left.amount(),
            "Suggested transfers do not settle the household"
        );
        return Err(BalanceError::InconsistentTransfers {
            member,
            remaining: left,
        });
    }

    Ok(transfers)
}
