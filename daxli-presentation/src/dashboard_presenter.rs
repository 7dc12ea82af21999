use crate::{
    currency::{CurrencyFormat, format_amount},
    text_table::{Alignment, TextTableBuilder},
};
use daxli_application::{DashboardSummary, MemberDirectory, MemberSpending, PersonBalance};
use daxli_domain::{MemberId, Money, Transfer};
use std::{borrow::Cow, fmt};

pub const NO_PAYMENTS_NEEDED: &str = "No payments needed";

/// Width of the bar drawn for the biggest spender.
const BAR_WIDTH: usize = 20;

pub struct DashboardPresenter;

/// Rendered sections of the household overview.
pub struct DashboardView {
    pub balance_table: String,
    pub spending_table: String,
    /// `None` when everyone is already even.
    pub payment_table: Option<String>,
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Balances")?;
        writeln!(f, "{}", self.balance_table)?;
        writeln!(f, "Spending")?;
        writeln!(f, "{}", self.spending_table)?;
        writeln!(f, "Suggested payments")?;
        match &self.payment_table {
            Some(table) => write!(f, "{table}"),
            None => writeln!(f, "{NO_PAYMENTS_NEEDED}"),
        }
    }
}

impl DashboardPresenter {
    pub fn render(
        summary: &DashboardSummary,
        member_directory: &dyn MemberDirectory,
        format: &CurrencyFormat,
    ) -> DashboardView {
        let payment_table = if summary.is_settled() {
            None
        } else {
            Some(Self::build_payment_table(
                &summary.transfers,
                member_directory,
                format,
            ))
        };

        DashboardView {
            balance_table: Self::build_balance_table(&summary.balances, member_directory, format),
            spending_table: Self::build_spending_table(summary, member_directory, format),
            payment_table,
        }
    }

    pub fn build_balance_table(
        person_balances: &[PersonBalance],
        member_directory: &dyn MemberDirectory,
        format: &CurrencyFormat,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right, Alignment::Left])
            .headers(&[
                Cow::Borrowed("Member"),
                Cow::Borrowed("Balance"),
                Cow::Borrowed("Status"),
            ]);

        for person in person_balances {
            let sign = if person.balance.signum() > 0 { "+" } else { "" };
            builder = builder.row([
                format_member_label(person.id, member_directory),
                Cow::Owned(format!("{sign}{}", format_amount(person.balance, format))),
                Cow::Borrowed(balance_status(person.balance)),
            ]);
        }

        builder.build()
    }

    pub fn build_spending_table(
        summary: &DashboardSummary,
        member_directory: &dyn MemberDirectory,
        format: &CurrencyFormat,
    ) -> String {
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right, Alignment::Left])
            .headers(&[
                Cow::Borrowed("Member"),
                Cow::Borrowed("Spent"),
                Cow::Borrowed("Share"),
            ])
            .rows(
                summary
                    .spending_by_person
                    .iter()
                    .map(|&MemberSpending { member, spent }| {
                        [
                            format_member_label(member, member_directory),
                            Cow::Owned(format_amount(spent, format)),
                            Cow::Owned(spending_bar(spent, summary.max_spent)),
                        ]
                    }),
            )
            .footer([
                Cow::Owned(match summary.expense_count {
                    1 => "Total (1 expense)".to_owned(),
                    count => format!("Total ({count} expenses)"),
                }),
                Cow::Owned(format_amount(summary.household_total, format)),
                Cow::Borrowed(""),
            ])
            .build()
    }

    pub fn build_payment_table(
        transfers: &[Transfer],
        member_directory: &dyn MemberDirectory,
        format: &CurrencyFormat,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[
                Cow::Borrowed("From"),
                Cow::Borrowed("To"),
                Cow::Borrowed("Amount"),
            ]);

        for transfer in transfers {
            builder = builder.row([
                format_member_label(transfer.from, member_directory),
                format_member_label(transfer.to, member_directory),
                Cow::Owned(format_amount(transfer.amount, format)),
            ]);
        }

        builder.build()
    }
}

fn balance_status(balance: Money) -> &'static str {
    match balance.signum() {
        1.. => "owed",
        ..=-1 => "owes",
        _ => "settled",
    }
}

/// Bar scaled against the biggest spender, who gets the full width.
fn spending_bar(spent: Money, max_spent: Money) -> String {
    if max_spent.signum() <= 0 || spent.signum() <= 0 {
        return String::new();
    }
    let width = i128::from(spent.amount()) * BAR_WIDTH as i128 / i128::from(max_spent.amount());
    "#".repeat(usize::try_from(width).unwrap_or(0).min(BAR_WIDTH))
}

fn format_member_label<'a>(
    member_id: MemberId,
    member_directory: &'a dyn MemberDirectory,
) -> Cow<'a, str> {
    match member_directory.display_name(member_id) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(member_id.to_string()),
    }
}
