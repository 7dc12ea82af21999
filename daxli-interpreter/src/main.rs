mod bootstrap;

use std::{borrow::Cow, fs, path::PathBuf, process};

use bootstrap::{AppConfig, init_logging};
use clap::Parser;
use daxli_application::{
    BalanceService, DashboardSummary, LedgerParser, MemberDirectory, ParsedLedger,
};
use daxli_domain::MemberId;
use daxli_infrastructure::DaxliLedgerParser;
use daxli_presentation::{CurrencyFormat, DashboardPresenter, format_amount};

type CliResult<T> = Result<T, Cow<'static, str>>;

#[derive(Parser, Debug)]
#[command(name = "daxli_interpreter")]
#[command(about = "Household balances and suggested payments from a ledger file")]
struct Cli {
    /// Ledger file to read.
    ledger: PathBuf,

    /// Also print this member's own summary.
    #[arg(long, value_name = "NAME")]
    viewer: Option<String>,

    /// Close the period: report what would be archived and paid.
    #[arg(long)]
    close: bool,

    /// Archive label for the closed period.
    #[arg(long, default_value = "current period", requires = "close")]
    label: String,
}

fn main() {
    let cli = Cli::parse();
    init_logging();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: &Cli) -> CliResult<()> {
    let config = AppConfig::from_env().map_err(|err| err.to_string())?;

    let source = fs::read_to_string(&args.ledger)
        .map_err(|err| format!("Failed to read '{}': {err}", args.ledger.display()))?;

    let parser = DaxliLedgerParser::with_currency(config.currency.code.clone());
    let parsed = parser.parse(&source).map_err(|err| err.to_string())?;

    let service = BalanceService::new(config.policy);
    let summary = service
        .dashboard(&parsed.ledger)
        .map_err(|err| err.to_string())?;

    print!(
        "{}",
        DashboardPresenter::render(&summary, &parsed.names, &config.currency)
    );

    if let Some(name) = &args.viewer {
        let member = find_member(&parsed, name)?;
        print_viewer(&summary, member, &parsed.names, &config.currency);
    }

    if args.close {
        let closure = service
            .close_period(&parsed.ledger, &args.label)
            .map_err(|err| err.to_string())?;
        println!();
        println!(
            "Closing {}: {} expenses archived, {} total, {} payments to make",
            closure.label,
            closure.archived.len(),
            format_amount(closure.total, &config.currency),
            closure.transfers.len()
        );
    }

    Ok(())
}

fn find_member(parsed: &ParsedLedger, name: &str) -> CliResult<MemberId> {
    parsed
        .ledger
        .members()
        .iter()
        .copied()
        .find(|&member| parsed.names.display_name(member) == Some(name))
        .ok_or_else(|| format!("Unknown member '{name}'").into())
}

fn print_viewer(
    summary: &DashboardSummary,
    member: MemberId,
    directory: &dyn MemberDirectory,
    format: &CurrencyFormat,
) {
    let viewer = summary.for_member(member);
    let name = directory.display_name(member).unwrap_or_default();
    println!();
    println!("{name}");
    println!("  owed to you: {}", format_amount(viewer.owed_to_me, format));
    println!("  you owe:     {}", format_amount(viewer.i_owe, format));
    println!("  net:         {}", format_amount(viewer.net, format));
    println!("  you paid:    {}", format_amount(viewer.total_spent, format));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("daxli_interpreter").chain(args.iter().copied()))
    }

    #[rstest]
    #[case::path_only(&["house.ledger"], None, false, "current period")]
    #[case::viewer(&["house.ledger", "--viewer", "Bob"], Some("Bob"), false, "current period")]
    #[case::flags_first(
        &["--close", "--viewer", "Ali", "house.ledger"],
        Some("Ali"),
        true,
        "current period"
    )]
    #[case::labelled_close(
        &["house.ledger", "--close", "--label", "2026-10"],
        None,
        true,
        "2026-10"
    )]
    fn parses_arguments(
        #[case] input: &[&str],
        #[case] viewer: Option<&str>,
        #[case] close: bool,
        #[case] label: &str,
    ) {
        let cli = parse(input).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(cli.ledger, PathBuf::from("house.ledger"));
        assert_eq!(cli.viewer.as_deref(), viewer);
        assert_eq!(cli.close, close);
        assert_eq!(cli.label, label);
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::missing_viewer_name(&["house.ledger", "--viewer"])]
    #[case::second_path(&["a.ledger", "b.ledger"])]
    #[case::unknown_flag(&["a.ledger", "--verbose"])]
    #[case::label_without_close(&["a.ledger", "--label", "2026-10"])]
    fn rejects_bad_arguments(#[case] input: &[&str]) {
        assert!(parse(input).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
