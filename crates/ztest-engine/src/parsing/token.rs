use serde::Serialize;

/// An ordered, de-duplicated set of lower-case modifier keywords.
///
/// Parsed from the words between an item label and its value separator, e.g.
/// `eval like` in `--- response_body eval like`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Options(Vec<String>);

impl Options {
    /// Splits a whitespace-separated keyword list, keeping first occurrences.
    pub fn parse(words: &str) -> Self {
        words.split_whitespace().collect()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.iter().any(|k| k == keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Options {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut out: Vec<String> = vec![];
        for word in iter {
            if !out.iter().any(|k| k == word) {
                out.push(word.to_string());
            }
        }
        Self(out)
    }
}

/// A labelled value inside a case or the global scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// The label after `---`, e.g. `request`. Opaque to the parser.
    pub label: String,
    pub options: Options,
    /// `None` only for a headless item superseded by another construct before
    /// any body was seen.
    pub value: Option<String>,
    /// 1-based line of the item header.
    pub line: usize,
}

impl Item {
    pub fn new(label: impl Into<String>, options: Options, value: Option<String>, line: usize) -> Self {
        Self {
            label: label.into(),
            options,
            value,
            line,
        }
    }

    pub fn has_option(&self, keyword: &str) -> bool {
        self.options.contains(keyword)
    }

    /// The value, or `""` for an item that never received one.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// One token of the flat stream produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Token {
    /// Verbatim text before the preamble sentinel line.
    Preamble { text: String, line: usize },
    /// `=== TEST <order>: <name>`
    CaseHeader {
        order: String,
        name: Option<String>,
        line: usize,
    },
    /// An item scoped to the case opened by the closest preceding header.
    Item(Item),
    /// An item declared before the first case header.
    Global(Item),
}

impl Token {
    pub fn line(&self) -> usize {
        match self {
            Token::Preamble { line, .. } | Token::CaseHeader { line, .. } => *line,
            Token::Item(item) | Token::Global(item) => item.line,
        }
    }

    pub fn is_case_header(&self) -> bool {
        matches!(self, Token::CaseHeader { .. })
    }
}
