use daxli_domain::{ExpenseRecord, MemberId, Money, Transfer};
use smol_str::SmolStr;
use std::{collections::HashMap, fmt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(pub u64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An expense as the household records it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerExpense {
    pub id: ExpenseId,
    pub title: SmolStr,
    pub payer: MemberId,
    pub amount: Money,
    pub participants: Vec<MemberId>,
    /// Closed by an earlier settlement; excluded from balances.
    pub archived: bool,
}

impl ExpenseRecord for LedgerExpense {
    fn payer(&self) -> MemberId {
        self.payer
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

/// Snapshot of one household: its current members and its expenses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    members: Vec<MemberId>,
    expenses: Vec<LedgerExpense>,
}

impl Ledger {
    pub fn new(members: Vec<MemberId>, expenses: Vec<LedgerExpense>) -> Self {
        Self { members, expenses }
    }

    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    pub fn expenses(&self) -> &[LedgerExpense] {
        &self.expenses
    }

    pub fn active_expenses(&self) -> impl Iterator<Item = &LedgerExpense> + '_ {
        self.expenses.iter().filter(|expense| !expense.archived)
    }
}

/// A parsed ledger together with the display names it declared.
#[derive(Debug)]
pub struct ParsedLedger {
    pub ledger: Ledger,
    pub names: HashMap<MemberId, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonBalance {
    pub id: MemberId,
    pub balance: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberSpending {
    pub member: MemberId,
    pub spent: Money,
}

/// Everything a household overview needs, computed from active expenses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub balances: Vec<PersonBalance>,
    pub transfers: Vec<Transfer>,
    pub household_total: Money,
    pub expense_count: usize,
    pub spending_by_person: Vec<MemberSpending>,
    pub max_spent: Money,
}

impl DashboardSummary {
    pub fn for_member(&self, member: MemberId) -> ViewerSummary {
        let i_owe: Money = self
            .transfers
            .iter()
            .filter(|transfer| transfer.from == member)
            .map(|transfer| transfer.amount)
            .sum();
        let owed_to_me: Money = self
            .transfers
            .iter()
            .filter(|transfer| transfer.to == member)
            .map(|transfer| transfer.amount)
            .sum();
        let total_spent = self
            .spending_by_person
            .iter()
            .find(|spending| spending.member == member)
            .map_or(Money::ZERO, |spending| spending.spent);

        ViewerSummary {
            owed_to_me,
            i_owe,
            net: owed_to_me - i_owe,
            total_spent,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}

/// One member's view of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerSummary {
    pub owed_to_me: Money,
    pub i_owe: Money,
    /// Positive when the others owe this member.
    pub net: Money,
    pub total_spent: Money,
}

/// Outcome of closing the current period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodClosure {
    /// Groups the archived expenses in the archive, e.g. "2026-10".
    pub label: SmolStr,
    /// Active expenses the caller should now mark archived.
    pub archived: Vec<ExpenseId>,
    pub transfers: Vec<Transfer>,
    pub total: Money,
}
