#![warn(clippy::uninlined_format_args)]

pub mod balance_service;
pub mod error;
pub mod model;
pub mod ports;
pub mod validation;

pub use balance_service::BalanceService;
pub use error::{BalanceError, ExpenseValidationError, LedgerParseError, ParsePolicyError};
pub use model::{
    DashboardSummary, ExpenseId, Ledger, LedgerExpense, MemberSpending, ParsedLedger,
    PeriodClosure, PersonBalance, ViewerSummary,
};
pub use ports::{LedgerParser, MemberDirectory};
pub use validation::{ExpenseValidator, ZeroParticipantPolicy};
