#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    ExactAmount, Expense, ExpenseRecord, MemberBalances, MemberId, MemberSet, Money, Transfer,
};
pub use services::{
    BalanceAggregator, DebtSimplifier, apply_transfers, compute_net_balances, simplify_debts,
};
