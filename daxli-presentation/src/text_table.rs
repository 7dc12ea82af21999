use std::{borrow::Cow, fmt::Write};

const COLUMN_GAP: &str = "  ";

#[derive(Default)]
pub struct TextTableBuilder<'a, Seq> {
    headers: &'a [Cow<'a, str>],
    rows: Vec<Seq>,
    footer: Option<Seq>,
    alignments: Cow<'a, [Alignment]>,
}

#[derive(Clone, Copy, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl<'a, Seq> TextTableBuilder<'a, Seq>
where
    Seq: AsRef<[Cow<'a, str>]> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignments(mut self, alignments: &'a [Alignment]) -> Self {
        self.alignments = Cow::Borrowed(alignments);
        self
    }

    pub fn headers(mut self, headers: &'a [Cow<'a, str>]) -> Self {
        self.headers = headers;
        if self.alignments.is_empty() {
            self.alignments = Cow::Owned(vec![Alignment::default(); self.headers.len()]);
        }
        self
    }

    pub fn row(mut self, row: Seq) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Seq>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// A closing row drawn below a second rule, e.g. totals.
    pub fn footer(mut self, footer: Seq) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn build(self) -> String {
        let col_count = self.headers.len();
        if col_count == 0 {
            return String::new();
        }

        let mut col_widths: Vec<usize> = self.headers.iter().map(|h| text_width(h)).collect();
        for row in self.rows.iter().chain(self.footer.as_ref()) {
            for (i, cell) in row.as_ref().iter().enumerate().take(col_count) {
                col_widths[i] = col_widths[i].max(text_width(cell));
            }
        }

        let rule = col_widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);

        let mut table = String::with_capacity(256);
        self.write_line(&mut table, self.headers, &col_widths);
        let _ = writeln!(&mut table, "{rule}");
        for row in &self.rows {
            self.write_line(&mut table, row.as_ref(), &col_widths);
        }
        if let Some(footer) = &self.footer {
            let _ = writeln!(&mut table, "{rule}");
            self.write_line(&mut table, footer.as_ref(), &col_widths);
        }
        table
    }

    fn write_line(&self, out: &mut String, cells: &[Cow<'a, str>], col_widths: &[usize]) {
        let mut line = String::new();
        for (i, width) in col_widths.iter().enumerate() {
            if i > 0 {
                line.push_str(COLUMN_GAP);
            }
            let cell = cells.get(i).map_or("", |cell| cell.as_ref());
            let alignment = self.alignments.get(i).copied().unwrap_or_default();
            pad(&mut line, cell, *width, alignment);
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}

fn pad(out: &mut String, text: &str, width: usize, alignment: Alignment) {
    let fill = width.saturating_sub(text_width(text));
    let (left, right) = match alignment {
        Alignment::Left => (0, fill),
        Alignment::Center => (fill / 2, fill - fill / 2),
        Alignment::Right => (fill, 0),
    };
    out.extend(std::iter::repeat_n(' ', left));
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', right));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_simple_table() {
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed("Name"), Cow::Borrowed("Balance")])
            .row([Cow::Borrowed("Alice"), Cow::Borrowed("+100")])
            .row([Cow::Borrowed("Bob"), Cow::Borrowed("-100")])
            .build();

        assert_eq!(
            table,
            "Name   Balance\n\
             -----  -------\n\
             Alice     +100\n\
             Bob       -100\n"
        );
    }

    #[rstest]
    fn test_footer_gets_its_own_rule() {
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed("Who"), Cow::Borrowed("Spent")])
            .rows([[Cow::Borrowed("Ali"), Cow::Borrowed("5")]])
            .footer([Cow::Borrowed("Total"), Cow::Borrowed("5")])
            .build();

        assert_eq!(
            table,
            "Who    Spent\n\
             -----  -----\n\
             Ali        5\n\
             -----  -----\n\
             Total      5\n"
        );
    }

    #[rstest]
    #[case::left(Alignment::Left, "ab   |")]
    #[case::center(Alignment::Center, " ab  |")]
    #[case::right(Alignment::Right, "   ab|")]
    fn test_pad(#[case] alignment: Alignment, #[case] expected: &str) {
        let mut out = String::new();
        pad(&mut out, "ab", 5, alignment);
        out.push('|');
        assert_eq!(out, expected);
    }

    #[test]
    fn test_without_headers_is_empty() {
        let table: String = TextTableBuilder::<[Cow<'static, str>; 1]>::new().build();
        assert!(table.is_empty());
    }
}
