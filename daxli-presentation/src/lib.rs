#![warn(clippy::uninlined_format_args)]

pub mod currency;
pub mod dashboard_presenter;
pub mod text_table;

pub use currency::{CurrencyFormat, format_amount};
pub use dashboard_presenter::{DashboardPresenter, DashboardView};
