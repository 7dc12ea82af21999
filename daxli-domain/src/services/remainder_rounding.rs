//! Integer rounding of exact net balances that keeps the total intact.
//!
//! Every balance is rounded down first. Rounding down can only lose value, so
//! the floors sum to at most the exact total; the missing whole units
//! (`residual`) are then handed out one each, largest fractional remainder
//! first, with the larger `MemberId` winning exact ties.

use crate::model::{ExactAmount, MemberBalances, MemberId, Money};
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

/// Exact net balance per member, in supply order.
pub type ExactBalances = IndexMap<MemberId, ExactAmount, FxBuildHasher>;

/// Rounds exact balances to whole units using the largest-remainder method.
///
/// When the exact balances sum to zero, the result sums to zero as well.
/// A positive exact total (an expense nobody consumed) leaves a non-positive
/// residual; the floors are then returned unchanged.
pub fn round_to_units(exact: &ExactBalances) -> MemberBalances {
    let mut rounded =
        MemberBalances::with_capacity_and_hasher(exact.len(), FxBuildHasher::default());
    let mut remainders: Vec<(MemberId, ExactAmount)> = Vec::with_capacity(exact.len());
    let mut floor_sum = BigInt::zero();

    for (&member, value) in exact {
        let floor = value.floor();
        rounded.insert(member, to_money(member, &floor));
        floor_sum += floor;
        remainders.push((member, value.fract()));
    }

    let residual = -floor_sum;
    if !residual.is_positive() {
        tracing::debug!(
            member_count = exact.len(),
            %residual,
            "Net balance rounding needed no redistribution"
        );
        return rounded;
    }

    rank_remainders(&mut remainders);

    let award_count = residual.to_usize().unwrap_or(usize::MAX);
    if award_count > remainders.len() {
        tracing::error!(
            %residual,
            member_count = exact.len(),
            "Rounding residual exceeds the number of members"
        );
    }

    let awarded: Vec<u64> = remainders
        .iter()
        .take(award_count)
        .map(|(member, _)| member.0)
        .collect();
    for (member, _) in remainders.iter().take(award_count) {
        if let Some(balance) = rounded.get_mut(member) {
            *balance = balance.checked_add(Money::from_i64(1)).unwrap_or(*balance);
        }
    }

    tracing::debug!(
        member_count = exact.len(),
        %residual,
        awarded = ?awarded,
        "Net balance rounding redistributed residual units"
    );

    rounded
}

/// Saturates at the `i64` bounds. Callers that keep the household total
/// within `i64` never reach them.
fn to_money(member: MemberId, floor: &BigInt) -> Money {
    floor.to_i64().map_or_else(
        || {
            tracing::error!(
                member = member.0,
                %floor,
                "Net balance exceeds the representable money range"
            );
            if floor.is_negative() {
                Money::from_i64(i64::MIN)
            } else {
                Money::from_i64(i64::MAX)
            }
        },
        Money::from_i64,
    )
}

/// Sorts by fractional remainder descending, then by member id descending.
fn rank_remainders(remainders: &mut [(MemberId, ExactAmount)]) {
    remainders.sort_by(|(id_a, rem_a), (id_b, rem_b)| {
        rem_b.cmp(rem_a).then_with(|| id_b.cmp(id_a))
    });
}
