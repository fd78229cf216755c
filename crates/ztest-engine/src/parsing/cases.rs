use std::{collections::BTreeMap, sync::OnceLock};

use log::trace;
use regex::Regex;
use serde::Serialize;

use super::{
    grammar::CASE_KEYWORD,
    token::{Item, Token},
};

static SLUG_SEPARATOR: OnceLock<Regex> = OnceLock::new();

/// One test case: a header and the items scoped to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Case {
    /// Dotted numeric order from the header, e.g. `1.2`.
    pub order: String,
    pub name: Option<String>,
    /// 1-based line of the case header.
    pub line: usize,
    pub items: Vec<Item>,
}

impl Case {
    /// The first item with this label.
    pub fn item(&self, label: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.label == label)
    }

    pub fn items_named<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Item> {
        self.items.iter().filter(move |item| item.label == label)
    }

    /// `TEST <order>: <name>`, or `TEST <order>:` for an anonymous case.
    pub fn title(&self) -> String {
        match &self.name {
            Some(name) => format!("{CASE_KEYWORD} {}: {name}", self.order),
            None => format!("{CASE_KEYWORD} {}:", self.order),
        }
    }

    /// The title with every run of characters other than word characters and
    /// `.` replaced by `_`.
    pub fn slug(&self) -> String {
        let re = SLUG_SEPARATOR
            .get_or_init(|| Regex::new(r"[^.\w]+").expect("Invalid slug separator regex"));
        re.replace_all(&self.title(), "_").into_owned()
    }
}

/// Everything declared before the first case header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preamble {
    /// Verbatim text before the preamble sentinel line.
    pub code: Option<String>,
    /// Global items by label. A later declaration replaces an earlier one.
    pub globals: BTreeMap<String, Item>,
}

impl Preamble {
    pub fn global(&self, label: &str) -> Option<&Item> {
        self.globals.get(label)
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.globals.is_empty()
    }
}

/// The result of parsing one case file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedFile {
    pub preamble: Preamble,
    pub cases: Vec<Case>,
}

impl ParsedFile {
    /// Cases whose name matches `filter`. Anonymous cases match against `""`.
    pub fn select<'a>(&'a self, filter: &'a Regex) -> impl Iterator<Item = &'a Case> {
        self.cases
            .iter()
            .filter(move |case| filter.is_match(case.name.as_deref().unwrap_or("")))
    }
}

/// Identity of the case currently collecting items.
#[derive(Debug)]
struct Header {
    order: String,
    name: Option<String>,
    line: usize,
}

/// Folds a finalized token stream into a [`ParsedFile`].
///
/// Tokens are pushed one at a time; a case is emitted when the next header
/// arrives or on [`Cases::finish`], and only if it collected at least one item.
#[derive(Debug, Default)]
pub struct Cases {
    preamble: Preamble,
    header: Option<Header>,
    items: Vec<Item>,
    out: Vec<Case>,
}

impl Cases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        match token {
            Token::Preamble { text, .. } => self.preamble.code = Some(text),
            Token::Global(item) => {
                self.preamble.globals.insert(item.label.clone(), item);
            }
            Token::Item(item) => self.items.push(item),
            Token::CaseHeader { order, name, line } => {
                self.flush_case();
                self.header = Some(Header { order, name, line });
            }
        }
    }

    pub fn finish(mut self) -> ParsedFile {
        // EOF flush
        self.flush_case();
        ParsedFile {
            preamble: self.preamble,
            cases: self.out,
        }
    }

    /// Pushes every token and finishes.
    pub fn group(mut self, tokens: impl IntoIterator<Item = Token>) -> ParsedFile {
        for token in tokens {
            self.push(token);
        }
        self.finish()
    }

    fn flush_case(&mut self) {
        let header = self.header.take();
        if self.items.is_empty() {
            if let Some(h) = header {
                trace!("dropping empty case {} at line {}", h.order, h.line);
            }
            return;
        }

        // Items pushed without any header fall into an anonymous case.
        let Header { order, name, line } = header.unwrap_or(Header {
            order: String::new(),
            name: None,
            line: 0,
        });
        self.out.push(Case {
            order,
            name,
            line,
            items: std::mem::take(&mut self.items),
        });
    }
}
