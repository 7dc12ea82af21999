use crate::model::ExpenseId;
use daxli_domain::{MemberId, Money};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpenseValidationError {
    #[error("Expense {expense} must have a positive amount")]
    NonPositiveAmount { expense: ExpenseId },
    #[error("Payer {payer} of expense {expense} is not a household member")]
    UnknownPayer { expense: ExpenseId, payer: MemberId },
    #[error("Participant {participant} of expense {expense} is not a household member")]
    UnknownParticipant {
        expense: ExpenseId,
        participant: MemberId,
    },
    #[error("Expense {expense} has no participants")]
    NoParticipants { expense: ExpenseId },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    #[error(transparent)]
    InvalidExpense(#[from] ExpenseValidationError),
    #[error("Net balances sum to {0} instead of zero")]
    ImbalancedTotal(Money),
    #[error("Suggested transfers leave {member} with {remaining} outstanding")]
    InconsistentTransfers { member: MemberId, remaining: Money },
    #[error("Active expenses add up to more than the largest supported amount")]
    TotalOverflow,
    #[error("There are no active expenses to settle")]
    NothingToSettle,
    #[error("A period closure needs a non-empty label")]
    EmptyClosureLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerParseError {
    #[error("Ledger declares no members")]
    MissingMembers,
    #[error("Undefined member '{name}' at line {line}")]
    UndefinedMember { name: String, line: usize },
    #[error("Member '{name}' is declared twice (line {line})")]
    DuplicateMember { name: String, line: usize },
    #[error("Amount {amount} at line {line} is too large")]
    AmountOutOfRange { amount: u64, line: usize },
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown zero-participant policy '{0}' (expected reject, payer or accept)")]
pub struct ParsePolicyError(pub String);
