use crate::{error::ExpenseValidationError, error::ParsePolicyError, model::LedgerExpense};
use daxli_domain::MemberId;
use fxhash::FxHashSet;
use std::{borrow::Cow, str::FromStr};

/// What to do with an expense that lists nobody as participant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroParticipantPolicy {
    /// Refuse the expense.
    #[default]
    Reject,
    /// Treat the payer as the only participant.
    PayerOnly,
    /// Count it as paid but consumed by nobody. Balances then no longer sum
    /// to zero.
    Accept,
}

impl FromStr for ZeroParticipantPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "payer" | "payer_only" | "payer-only" => Ok(Self::PayerOnly),
            "accept" => Ok(Self::Accept),
            _ => Err(ParsePolicyError(s.to_owned())),
        }
    }
}

/// Boundary checks applied before expenses reach the balance engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpenseValidator {
    policy: ZeroParticipantPolicy,
}

impl ExpenseValidator {
    pub fn new(policy: ZeroParticipantPolicy) -> Self {
        Self { policy }
    }

    /// Checks one expense against the household's members.
    ///
    /// # Returns
    /// The participants the engine should use: the recorded ones, or the
    /// payer alone under [`ZeroParticipantPolicy::PayerOnly`].
    pub fn validate<'e>(
        &self,
        members: &FxHashSet<MemberId>,
        expense: &'e LedgerExpense,
    ) -> Result<Cow<'e, [MemberId]>, ExpenseValidationError> {
        if expense.amount.signum() <= 0 {
            return Err(ExpenseValidationError::NonPositiveAmount {
                expense: expense.id,
            });
        }

        if !members.contains(&expense.payer) {
            return Err(ExpenseValidationError::UnknownPayer {
                expense: expense.id,
                payer: expense.payer,
            });
        }

        if let Some(&participant) = expense
            .participants
            .iter()
            .find(|participant| !members.contains(participant))
        {
            return Err(ExpenseValidationError::UnknownParticipant {
                expense: expense.id,
                participant,
            });
        }

        if !expense.participants.is_empty() {
            return Ok(Cow::Borrowed(&expense.participants));
        }

        match self.policy {
            ZeroParticipantPolicy::Reject => Err(ExpenseValidationError::NoParticipants {
                expense: expense.id,
            }),
            ZeroParticipantPolicy::PayerOnly => Ok(Cow::Owned(vec![expense.payer])),
            ZeroParticipantPolicy::Accept => {
                tracing::warn!(
                    expense = expense.id.0,
                    amount = expense.amount.amount(),
                    "Accepting expense without participants; balances will not sum to zero"
                );
                Ok(Cow::Borrowed(&expense.participants))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExpenseId;
    use daxli_domain::Money;
    use rstest::{fixture, rstest};

    #[fixture]
    fn members() -> FxHashSet<MemberId> {
        [MemberId(1), MemberId(2)].into_iter().collect()
    }

    fn expense(payer: u64, amount: i64, participants: &[u64]) -> LedgerExpense {
        LedgerExpense {
            id: ExpenseId(10),
            title: "Groceries".into(),
            payer: MemberId(payer),
            amount: Money::from_i64(amount),
            participants: participants.iter().copied().map(MemberId).collect(),
            archived: false,
        }
    }

    #[rstest]
    #[case::zero_amount(
        expense(1, 0, &[1]),
        ExpenseValidationError::NonPositiveAmount { expense: ExpenseId(10) }
    )]
    #[case::negative_amount(
        expense(1, -5, &[1]),
        ExpenseValidationError::NonPositiveAmount { expense: ExpenseId(10) }
    )]
    #[case::unknown_payer(
        expense(7, 100, &[1]),
        ExpenseValidationError::UnknownPayer { expense: ExpenseId(10), payer: MemberId(7) }
    )]
    #[case::unknown_participant(
        expense(1, 100, &[2, 9]),
        ExpenseValidationError::UnknownParticipant {
            expense: ExpenseId(10),
            participant: MemberId(9),
        }
    )]
    #[case::no_participants(
        expense(1, 100, &[]),
        ExpenseValidationError::NoParticipants { expense: ExpenseId(10) }
    )]
    fn rejects_invalid_expenses(
        members: FxHashSet<MemberId>,
        #[case] input: LedgerExpense,
        #[case] expected: ExpenseValidationError,
    ) {
        let validator = ExpenseValidator::default();
        assert_eq!(validator.validate(&members, &input), Err(expected));
    }

    #[rstest]
    #[case::reject_keeps_recorded(ZeroParticipantPolicy::Reject, &[1, 2], &[1, 2])]
    #[case::payer_only_fills_in_payer(ZeroParticipantPolicy::PayerOnly, &[], &[2])]
    #[case::accept_keeps_empty(ZeroParticipantPolicy::Accept, &[], &[])]
    fn resolves_participants_by_policy(
        members: FxHashSet<MemberId>,
        #[case] policy: ZeroParticipantPolicy,
        #[case] recorded: &[u64],
        #[case] expected: &[u64],
    ) {
        let input = expense(2, 100, recorded);
        let participants = ExpenseValidator::new(policy)
            .validate(&members, &input)
            .expect("expense should be accepted");
        let ids: Vec<u64> = participants.iter().map(|member| member.0).collect();
        assert_eq!(ids, expected);
    }

    #[rstest]
    #[case::reject("reject", Ok(ZeroParticipantPolicy::Reject))]
    #[case::payer("payer", Ok(ZeroParticipantPolicy::PayerOnly))]
    #[case::payer_only_mixed_case(" Payer_Only ", Ok(ZeroParticipantPolicy::PayerOnly))]
    #[case::accept("ACCEPT", Ok(ZeroParticipantPolicy::Accept))]
    #[case::unknown("ignore", Err(ParsePolicyError("ignore".to_owned())))]
    fn parses_policy_names(
        #[case] input: &str,
        #[case] expected: Result<ZeroParticipantPolicy, ParsePolicyError>,
    ) {
        assert_eq!(input.parse::<ZeroParticipantPolicy>(), expected);
    }
}
