use daxli_domain::Money;
use rust_decimal::Decimal;
use smol_str::SmolStr;

/// How minor units are shown to people.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub code: SmolStr,
    /// Number of minor-unit digits after the decimal point. Dinar amounts are
    /// whole, so the default is 0.
    pub scale: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            code: SmolStr::new_static("IQD"),
            scale: 0,
        }
    }
}

impl CurrencyFormat {
    pub fn new(code: impl Into<SmolStr>, scale: u32) -> Self {
        Self {
            code: code.into(),
            scale,
        }
    }
}

/// `1234567` at scale 0 becomes `1,234,567 IQD`.
pub fn format_amount(money: Money, format: &CurrencyFormat) -> String {
    let number = match money.to_major_units(format.scale) {
        Some(major) => group_thousands(major),
        // Scale beyond what Decimal supports: show raw minor units.
        None => group_digits(&money.amount().unsigned_abs().to_string(), money.signum() < 0),
    };

    if format.code.is_empty() {
        number
    } else {
        format!("{number} {}", format.code)
    }
}

fn group_thousands(value: Decimal) -> String {
    let negative = value.is_sign_negative() && !value.is_zero();
    let text = value.abs().to_string();
    match text.split_once('.') {
        Some((whole, frac)) => format!("{}.{frac}", group_digits(whole, negative)),
        None => group_digits(&text, negative),
    }
}

fn group_digits(digits: &str, negative: bool) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
