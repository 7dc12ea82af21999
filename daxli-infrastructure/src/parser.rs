use daxli_application::{
    ExpenseId, Ledger, LedgerExpense, LedgerParseError, LedgerParser, ParsedLedger,
};
use daxli_domain::{MemberId, Money};
use daxli_parser::{
    Command as ParserCommand, ExpenseEntry, MemberDecl, ParseError, Participants,
    Statement as ParserStatement, parse_ledger,
};
use fxhash::FxHashMap;
use smol_str::SmolStr;
use std::collections::HashMap;

/// Ledger-file adapter for the application's [`LedgerParser`] port.
#[derive(Default)]
pub struct DaxliLedgerParser {
    currency: Option<SmolStr>,
}

impl DaxliLedgerParser {
    /// Warn about amounts written with a currency suffix other than `code`.
    pub fn with_currency(code: impl Into<SmolStr>) -> Self {
        Self {
            currency: Some(code.into()),
        }
    }
}

impl LedgerParser for DaxliLedgerParser {
    fn parse(&self, content: &str) -> Result<ParsedLedger, LedgerParseError> {
        let file = parse_ledger(content).map_err(|err| match err {
            ParseError::SyntaxError { line, detail } => {
                LedgerParseError::SyntaxError { line, detail }
            }
        })?;

        let mut builder = LedgerBuilder::default();
        for stmt in file.statements {
            let daxli_parser::StatementWithLine { line, statement } = stmt;
            match statement {
                ParserStatement::Member(decl) => builder.declare(decl, line)?,
                ParserStatement::Expense(entry) => {
                    let mismatch = match (&self.currency, entry.currency) {
                        (Some(expected), Some(written)) if expected.as_str() != written => {
                            Some((expected.as_str(), written))
                        }
                        _ => None,
                    };
                    if let Some((expected, written)) = mismatch {
                        tracing::warn!(
                            line,
                            expected,
                            written,
                            "Amount uses a different currency; the number is taken as is"
                        );
                    }
                    builder.record(entry, line)?;
                }
                ParserStatement::Command(ParserCommand::Settle) => builder.archive_all(line),
            }
        }

        builder.finish()
    }
}

#[derive(Default)]
struct LedgerBuilder {
    members: Vec<MemberId>,
    names: HashMap<MemberId, String>,
    by_name: FxHashMap<String, MemberId>,
    expenses: Vec<LedgerExpense>,
}

impl LedgerBuilder {
    fn declare(&mut self, decl: MemberDecl<'_>, line: usize) -> Result<(), LedgerParseError> {
        let id = MemberId(decl.id);
        if self.names.contains_key(&id) || self.by_name.contains_key(decl.name) {
            return Err(LedgerParseError::DuplicateMember {
                name: decl.name.to_owned(),
                line,
            });
        }
        self.members.push(id);
        self.names.insert(id, decl.name.to_owned());
        self.by_name.insert(decl.name.to_owned(), id);
        Ok(())
    }

    fn resolve(&self, name: &str, line: usize) -> Result<MemberId, LedgerParseError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| LedgerParseError::UndefinedMember {
                name: name.to_owned(),
                line,
            })
    }

    fn record(&mut self, entry: ExpenseEntry<'_>, line: usize) -> Result<(), LedgerParseError> {
        let payer = self.resolve(entry.payer, line)?;
        let amount =
            Money::try_from(entry.amount).map_err(|_| LedgerParseError::AmountOutOfRange {
                amount: entry.amount,
                line,
            })?;
        let participants = match entry.participants {
            Participants::All => self.members.clone(),
            Participants::Nobody => Vec::new(),
            Participants::Named(names) => names
                .into_iter()
                .map(|name| self.resolve(name, line))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let id = ExpenseId(self.expenses.len() as u64 + 1);
        self.expenses.push(LedgerExpense {
            id,
            title: entry.title.map(SmolStr::new).unwrap_or_default(),
            payer,
            amount,
            participants,
            archived: false,
        });
        Ok(())
    }

    fn archive_all(&mut self, line: usize) {
        let mut archived = 0usize;
        for expense in self.expenses.iter_mut().filter(|expense| !expense.archived) {
            expense.archived = true;
            archived += 1;
        }
        tracing::debug!(line, archived, "Archived expenses at settle command");
    }

    fn finish(self) -> Result<ParsedLedger, LedgerParseError> {
        if self.members.is_empty() {
            return Err(LedgerParseError::MissingMembers);
        }
        Ok(ParsedLedger {
            ledger: Ledger::new(self.members, self.expenses),
            names: self.names,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn parser() -> DaxliLedgerParser {
        DaxliLedgerParser::default()
    }

    const HEADER: &str = "member 1 Alice\nmember 2 Bob\nmember 3 Carol\n";

    #[rstest]
    fn test_resolves_names_and_groups(parser: DaxliLedgerParser) {
        let content = format!(
            "{HEADER}[Groceries] Alice paid 300 for Alice, Bob\nBob paid 1,500 IQD for all\nCarol paid 90 for nobody\n"
        );
        let parsed = parser.parse(&content).expect("valid ledger");
        let ledger = parsed.ledger;

        assert_eq!(ledger.members(), &[MemberId(1), MemberId(2), MemberId(3)]);
        assert_eq!(parsed.names.get(&MemberId(2)).map(String::as_str), Some("Bob"));

        let expenses = ledger.expenses();
        assert_eq!(expenses.len(), 3);
        assert_eq!(expenses[0].id, ExpenseId(1));
        assert_eq!(expenses[0].title, "Groceries");
        assert_eq!(expenses[0].participants, vec![MemberId(1), MemberId(2)]);
        assert_eq!(expenses[1].amount, Money::from_i64(1_500));
        assert_eq!(
            expenses[1].participants,
            vec![MemberId(1), MemberId(2), MemberId(3)]
        );
        assert_eq!(expenses[2].payer, MemberId(3));
        assert!(expenses[2].participants.is_empty());
    }

    #[rstest]
    fn test_all_means_members_declared_so_far(parser: DaxliLedgerParser) {
        let content = "member 1 Alice\nmember 2 Bob\nAlice paid 10 for all\nmember 3 Carol\n";
        let parsed = parser.parse(content).expect("valid ledger");
        assert_eq!(
            parsed.ledger.expenses()[0].participants,
            vec![MemberId(1), MemberId(2)]
        );
    }

    #[rstest]
    fn test_settle_archives_earlier_expenses(parser: DaxliLedgerParser) {
        let content = format!(
            "{HEADER}Alice paid 30 for all\n!settle\nBob paid 20 for Alice, Bob\n"
        );
        let parsed = parser.parse(&content).expect("valid ledger");
        let archived: Vec<bool> = parsed
            .ledger
            .expenses()
            .iter()
            .map(|expense| expense.archived)
            .collect();
        assert_eq!(archived, vec![true, false]);
        assert_eq!(parsed.ledger.active_expenses().count(), 1);
    }

    #[rstest]
    #[case::undefined_payer(
        "member 1 Alice\nDave paid 10 for Alice",
        LedgerParseError::UndefinedMember { name: "Dave".to_owned(), line: 2 }
    )]
    #[case::undefined_participant(
        "member 1 Alice\nAlice paid 10 for Alice, Eve",
        LedgerParseError::UndefinedMember { name: "Eve".to_owned(), line: 2 }
    )]
    #[case::used_before_declared(
        "member 1 Alice\nAlice paid 10 for Bob\nmember 2 Bob",
        LedgerParseError::UndefinedMember { name: "Bob".to_owned(), line: 2 }
    )]
    #[case::duplicate_name(
        "member 1 Alice\nmember 2 Alice",
        LedgerParseError::DuplicateMember { name: "Alice".to_owned(), line: 2 }
    )]
    #[case::duplicate_id(
        "member 1 Alice\n\nmember 1 Bob",
        LedgerParseError::DuplicateMember { name: "Bob".to_owned(), line: 3 }
    )]
    #[case::amount_out_of_range(
        "member 1 Alice\nAlice paid 9223372036854775808 for Alice",
        LedgerParseError::AmountOutOfRange { amount: 9_223_372_036_854_775_808, line: 2 }
    )]
    #[case::no_members("// empty household\n", LedgerParseError::MissingMembers)]
    fn test_errors(
        parser: DaxliLedgerParser,
        #[case] content: &str,
        #[case] expected: LedgerParseError,
    ) {
        assert_eq!(parser.parse(content).map(|_| ()), Err(expected));
    }

    #[rstest]
    fn test_syntax_error_keeps_line(parser: DaxliLedgerParser) {
        match parser.parse("member 1 Alice\nAlice gave 10 to Bob") {
            Err(LedgerParseError::SyntaxError { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_currency_is_still_parsed() {
        let parser = DaxliLedgerParser::with_currency("IQD");
        let parsed = parser
            .parse("member 1 Alice\nAlice paid 25 USD for Alice")
            .expect("currency suffix only warns");
        assert_eq!(parsed.ledger.expenses()[0].amount, Money::from_i64(25));
    }
}
