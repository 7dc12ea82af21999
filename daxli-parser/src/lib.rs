#![warn(clippy::uninlined_format_args)]

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{
        tag, tag_no_case, take_till, take_till1, take_until, take_while_m_n, take_while1,
    },
    character::complete::{char, digit1, multispace1, one_of, satisfy, u64},
    combinator::{map_res, not, opt, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, terminated},
};

/// `member <id> <name>`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDecl<'a> {
    pub id: u64,
    pub name: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Participants<'a> {
    /// Every member declared so far.
    All,
    Nobody,
    Named(Vec<&'a str>),
}

/// `[Title] <payer> paid <amount> for <participants>`
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseEntry<'a> {
    pub title: Option<&'a str>,
    pub payer: &'a str,
    pub amount: u64,
    pub currency: Option<&'a str>,
    pub participants: Participants<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Settle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    Member(MemberDecl<'a>),
    Expense(ExpenseEntry<'a>),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementWithLine<'a> {
    pub line: usize,
    pub statement: Statement<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerFile<'a> {
    pub statements: Vec<StatementWithLine<'a>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(is_name_char)(input)
}

/// Case-insensitive word that must not run into a following name.
fn keyword<'a>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag_no_case(word), not(satisfy(is_name_char)))
}

fn sp(input: &str) -> IResult<&str, &str> {
    fn comment(input: &str) -> IResult<&str, &str> {
        delimited(tag("/*"), take_until("*/"), tag("*/")).parse(input)
    }

    fn line_comment(input: &str) -> IResult<&str, &str> {
        recognize((tag("//"), take_till(|c| c == '\n'))).parse(input)
    }

    recognize(many0(alt((multispace1, comment, line_comment)))).parse(input)
}

// 1500, 1,500 or 1_500
fn amount(input: &str) -> IResult<&str, u64> {
    map_res(
        recognize((digit1, many0((one_of(",_"), digit1)))),
        |digits: &str| {
            digits
                .chars()
                .filter(char::is_ascii_digit)
                .collect::<String>()
                .parse::<u64>()
        },
    )
    .parse(input)
}

// IQD, USD, ...
fn currency(input: &str) -> IResult<&str, &str> {
    terminated(
        take_while_m_n(3, 3, |c: char| c.is_ascii_uppercase()),
        not(satisfy(is_name_char)),
    )
    .parse(input)
}

fn title(input: &str) -> IResult<&str, &str> {
    delimited(char('['), take_till1(|c| c == ']'), char(']'))
        .map(str::trim)
        .parse(input)
}

fn participants(input: &str) -> IResult<&str, Participants<'_>> {
    alt((
        keyword("all").map(|_| Participants::All),
        keyword("nobody").map(|_| Participants::Nobody),
        separated_list1((sp, char(','), sp), identifier).map(Participants::Named),
    ))
    .parse(input)
}

fn member_decl(input: &str) -> IResult<&str, MemberDecl<'_>> {
    (keyword("member"), sp, u64, sp, identifier)
        .map(|(_, _, id, _, name)| MemberDecl { id, name })
        .parse(input)
}

fn expense_entry(input: &str) -> IResult<&str, ExpenseEntry<'_>> {
    (
        opt(terminated(title, sp)),
        identifier, // payer
        sp,
        keyword("paid"),
        sp,
        amount,
        opt(preceded(sp, currency)),
        sp,
        keyword("for"),
        sp,
        participants,
    )
        .map(
            |(title, payer, _, _, _, amount, currency, _, _, _, participants)| ExpenseEntry {
                title,
                payer,
                amount,
                currency,
                participants,
            },
        )
        .parse(input)
}

fn command(input: &str) -> IResult<&str, Command> {
    keyword("!settle").map(|_| Command::Settle).parse(input)
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        member_decl.map(Statement::Member),
        command.map(Statement::Command),
        expense_entry.map(Statement::Expense),
    ))
    .parse(input)
}

fn statement_with_sp(input: &str) -> IResult<&str, Statement<'_>> {
    (sp, statement, sp).map(|(_, stmt, _)| stmt).parse(input)
}

fn syntax_error_detail(err: nom::Err<nom::error::Error<&str>>) -> String {
    match err {
        nom::Err::Incomplete(_) => "unexpected end of line".to_owned(),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let near = e.input.trim();
            if near.is_empty() {
                "unexpected end of line".to_owned()
            } else {
                format!("unexpected input near '{near}'")
            }
        }
    }
}

/// Parse a whole ledger file, one statement per line.
pub fn parse_ledger(input: &str) -> Result<LedgerFile<'_>, ParseError> {
    let mut statements = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let (rest, _) = sp(line).map_err(|e| ParseError::SyntaxError {
            line: idx + 1,
            detail: syntax_error_detail(e),
        })?;
        if rest.trim().is_empty() {
            continue;
        }
        match statement_with_sp(rest) {
            Ok((rest, stmt)) => {
                if !rest.trim().is_empty() {
                    return Err(ParseError::SyntaxError {
                        line: idx + 1,
                        detail: format!("unparsed input '{}'", rest.trim()),
                    });
                }
                statements.push(StatementWithLine {
                    line: idx + 1,
                    statement: stmt,
                });
            }
            Err(e) => {
                return Err(ParseError::SyntaxError {
                    line: idx + 1,
                    detail: syntax_error_detail(e),
                });
            }
        }
    }

    Ok(LedgerFile { statements })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn single(input: &str) -> Statement<'_> {
        let file = parse_ledger(input).expect("should parse");
        assert_eq!(file.statements.len(), 1);
        file.statements.into_iter().next().expect("one statement").statement
    }

    #[rstest]
    #[case::plain("300", 300)]
    #[case::comma_separated("1,500", 1_500)]
    #[case::underscore_separated("2_000_000", 2_000_000)]
    fn test_amount(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(amount(input), Ok(("", expected)));
    }

    #[test]
    fn test_amount_overflow_is_error() {
        assert!(amount("99999999999999999999999").is_err());
    }

    #[rstest]
    #[case::simple("member 1 Alice", 1, "Alice")]
    #[case::upper_case_keyword("MEMBER 42 Bob", 42, "Bob")]
    #[case::arabic_name("member 7 علي", 7, "علي")]
    #[case::trailing_comment("member 3 Carol // flatmate", 3, "Carol")]
    fn test_member_decl(#[case] input: &str, #[case] id: u64, #[case] name: &str) {
        assert_eq!(single(input), Statement::Member(MemberDecl { id, name }));
    }

    #[rstest]
    #[case::named(
        "Alice paid 300 for Alice, Bob",
        None,
        "Alice",
        300,
        None,
        Participants::Named(vec!["Alice", "Bob"])
    )]
    #[case::titled(
        "[Weekly groceries] Bob paid 1,500 IQD for all",
        Some("Weekly groceries"),
        "Bob",
        1_500,
        Some("IQD"),
        Participants::All
    )]
    #[case::nobody(
        "Alice paid 500 for nobody",
        None,
        "Alice",
        500,
        None,
        Participants::Nobody
    )]
    #[case::name_starting_with_keyword(
        "Alice PAID 10 FOR Allison",
        None,
        "Alice",
        10,
        None,
        Participants::Named(vec!["Allison"])
    )]
    #[case::inline_comment(
        "Bob paid /* cash */ 40 for Bob,Alice",
        None,
        "Bob",
        40,
        None,
        Participants::Named(vec!["Bob", "Alice"])
    )]
    fn test_expense_entry(
        #[case] input: &str,
        #[case] title: Option<&str>,
        #[case] payer: &str,
        #[case] amount: u64,
        #[case] currency: Option<&str>,
        #[case] participants: Participants<'static>,
    ) {
        assert_eq!(
            single(input),
            Statement::Expense(ExpenseEntry {
                title,
                payer,
                amount,
                currency,
                participants,
            })
        );
    }

    #[test]
    fn test_settle_command() {
        assert_eq!(
            single("  !settle  // end of month"),
            Statement::Command(Command::Settle)
        );
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        let input = "\n// members\nmember 1 Alice\n\n/* nothing */\n!settle\n";
        let file = parse_ledger(input).expect("should parse");
        let lines: Vec<usize> = file.statements.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 6]);
    }

    #[rstest]
    #[case::missing_for("member 1 Alice\nAlice paid 100 Bob", 2)]
    #[case::missing_amount("Alice paid for Bob", 1)]
    #[case::trailing_garbage("member 1 Alice\n\n!settle now", 3)]
    #[case::unknown_command("!variables", 1)]
    #[case::dangling_comma("Alice paid 100 for Bob,", 1)]
    fn test_syntax_error_lines(#[case] input: &str, #[case] line: usize) {
        match parse_ledger(input) {
            Err(ParseError::SyntaxError { line: actual, .. }) => assert_eq!(actual, line),
            Ok(file) => panic!("expected syntax error, got {file:?}"),
        }
    }
}
