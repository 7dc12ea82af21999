use crate::model::{MemberBalances, MemberId, Money, Transfer};

/// Suggested-payment service
///
/// Greedy largest-to-largest matching: the biggest remaining debtor pays the
/// biggest remaining creditor until one side is exhausted. Not a
/// minimum-transfer solver, but deterministic and at most
/// `debtors + creditors - 1` transfers long.
pub struct DebtSimplifier;

impl DebtSimplifier {
    /// Reduce net balances to a list of point-to-point transfers
    ///
    /// `balances` must sum to zero; members at zero never appear in the output.
    /// Equal amounts keep the order in which members appear in `balances`.
    pub fn simplify(&self, balances: &MemberBalances) -> Vec<Transfer> {
        let mut creditors: Vec<(MemberId, Money)> = balances
            .iter()
            .filter(|(_, balance)| balance.signum() > 0)
            .map(|(&member, &balance)| (member, balance))
            .collect();
        let mut debtors: Vec<(MemberId, Money)> = balances
            .iter()
            .filter(|(_, balance)| balance.signum() < 0)
            .map(|(&member, &balance)| (member, balance.abs()))
            .collect();

        // sort_by is stable
        creditors.sort_by(|(_, a), (_, b)| b.cmp(a));
        debtors.sort_by(|(_, a), (_, b)| b.cmp(a));

        let mut transfers =
            Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
        let (mut i, mut j) = (0, 0);

        while i < debtors.len() && j < creditors.len() {
            let (debtor, owed) = &mut debtors[i];
            let (creditor, due) = &mut creditors[j];

            let pay = (*owed).min(*due);
            if !pay.is_zero() {
                transfers.push(Transfer {
                    from: *debtor,
                    to: *creditor,
                    amount: pay,
                });
                *owed -= pay;
                *due -= pay;
            }

            if owed.is_zero() {
                i += 1;
            }
            if due.is_zero() {
                j += 1;
            }
        }

        let unmatched: Money = debtors[i..]
            .iter()
            .chain(&creditors[j..])
            .map(|(_, amount)| *amount)
            .sum();
        if !unmatched.is_zero() {
            tracing::warn!(
                unmatched = unmatched.amount(),
                member_count = balances.len(),
                "Debt simplification received balances that do not sum to zero"
            );
        }

        tracing::debug!(
            creditor_count = creditors.len(),
            debtor_count = debtors.len(),
            transfer_count = transfers.len(),
            "Simplified net balances into transfers"
        );

        transfers
    }
}

/// Balances left after every transfer has been paid.
///
/// Paying moves `amount` from the debtor's debt to the creditor's claim, so a
/// complete settlement leaves every balance at zero.
pub fn apply_transfers(balances: &MemberBalances, transfers: &[Transfer]) -> MemberBalances {
    let mut remaining = balances.clone();
    for transfer in transfers {
        *remaining.entry(transfer.from).or_insert(Money::ZERO) += transfer.amount;
        *remaining.entry(transfer.to).or_insert(Money::ZERO) -= transfer.amount;
    }
    remaining
}
