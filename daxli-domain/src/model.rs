use fxhash::FxBuildHasher;
use indexmap::{IndexMap, IndexSet};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use rust_decimal::Decimal;
use std::{
    fmt,
    iter::Sum,
    num::NonZeroUsize,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(pub u64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Members in the order they were supplied; duplicates collapse.
pub type MemberSet = IndexSet<MemberId, FxBuildHasher>;

/// Net balance per member (positive: is owed money, negative: owes money).
///
/// Iteration follows the order members were supplied.
pub type MemberBalances = IndexMap<MemberId, Money, FxBuildHasher>;

/// Whole amount in the minor currency unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn amount(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// `None` when the sum leaves the `i64` range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    /// Interprets the amount as `scale` decimal places of a major unit
    /// (e.g. 1234 at scale 2 is 12.34).
    ///
    /// Returns `None` when `scale` exceeds what `Decimal` can represent.
    pub fn to_major_units(self, scale: u32) -> Option<Decimal> {
        Decimal::try_new(self.0, scale).ok()
    }
}

impl TryFrom<u64> for Money {
    type Error = std::num::TryFromIntError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Exact rational amount of minor units.
///
/// Backed by an arbitrary-precision fraction kept in lowest terms, so sums
/// over many distinct split sizes never overflow and equality is equality
/// of value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExactAmount(BigRational);

impl ExactAmount {
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    /// One of `parts` equal shares of `amount`, without rounding.
    pub fn share(amount: Money, parts: NonZeroUsize) -> Self {
        Self(BigRational::new(
            BigInt::from(amount.amount()),
            BigInt::from(parts.get()),
        ))
    }

    /// Largest integer not greater than the value.
    pub fn floor(&self) -> BigInt {
        self.0.floor().to_integer()
    }

    /// `self - floor(self)`, always in `[0, 1)`.
    pub fn fract(&self) -> Self {
        Self(&self.0 - self.0.floor())
    }
}

impl Default for ExactAmount {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Money> for ExactAmount {
    fn from(value: Money) -> Self {
        Self(BigRational::from_integer(BigInt::from(value.amount())))
    }
}

impl fmt::Display for ExactAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for ExactAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<'a> AddAssign<&'a ExactAmount> for ExactAmount {
    fn add_assign(&mut self, rhs: &'a ExactAmount) {
        self.0 += &rhs.0;
    }
}

impl<'a> SubAssign<&'a ExactAmount> for ExactAmount {
    fn sub_assign(&mut self, rhs: &'a ExactAmount) {
        self.0 -= &rhs.0;
    }
}

impl Neg for ExactAmount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sub for ExactAmount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Anything that can be aggregated as a shared cost.
pub trait ExpenseRecord {
    fn payer(&self) -> MemberId;
    fn amount(&self) -> Money;
}

/// One shared cost: `payer` paid `amount`, consumed equally by `participants`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub payer: MemberId,
    pub amount: Money,
    participants: MemberSet,
}

impl Expense {
    pub fn new(
        payer: MemberId,
        amount: Money,
        participants: impl IntoIterator<Item = MemberId>,
    ) -> Self {
        Self {
            payer,
            amount,
            participants: participants.into_iter().collect(),
        }
    }

    pub fn participants(&self) -> &MemberSet {
        &self.participants
    }
}

impl ExpenseRecord for Expense {
    fn payer(&self) -> MemberId {
        self.payer
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

/// `from` should pay `amount` to `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}
