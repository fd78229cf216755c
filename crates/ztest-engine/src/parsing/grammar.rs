use std::sync::OnceLock;

use regex::Regex;
use ztest_config::GrammarConfig;

use super::error::GrammarError;

/// Word following `===` in a case header.
pub const CASE_KEYWORD: &str = "TEST";

const LABEL: &str = r"(\w+)";
const OPTIONS: &str = r"((?:[ \t]+[a-z][a-z0-9_]*)*)";
const LINE_END: &str = r"(?:\n|\z)";

static STANDARD: OnceLock<Grammar> = OnceLock::new();

/// The compiled recognizer patterns for one [`GrammarConfig`].
///
/// Anchored patterns (`\A`) match at the start of the remaining input and
/// consume through the end of their line. `boundary` searches for where a
/// headless item body ends; `preamble` and `case_line` locate the preamble
/// sentinel and the first case header.
#[derive(Debug)]
pub struct Grammar {
    pub(crate) comment: Regex,
    pub(crate) blank: Regex,
    pub(crate) case_header: Regex,
    /// Searching form of `case_header`; finds any case header line.
    pub(crate) case_line: Regex,
    pub(crate) inline_item: Regex,
    pub(crate) item_head: Regex,
    pub(crate) boundary: Regex,
    pub(crate) preamble: Option<Regex>,
    pub(crate) fence_chars: Vec<char>,
}

impl Grammar {
    pub fn new(config: &GrammarConfig) -> Result<Self, GrammarError> {
        config.validate()?;

        let markers = config
            .comment_markers
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");
        let heredoc = regex::escape(&config.heredoc_sentinel);
        let case_prefix = format!(r"=== {CASE_KEYWORD} (\d+(?:\.\d+)?):");

        let boundary = format!(
            r"(?m)^(?:[ \t]*(?:{markers})|=== {CASE_KEYWORD} \d+(?:\.\d+)?:|--- \w+(?:[ \t]+[a-z][a-z0-9_]*)*[ \t]*(?::|\r?$))|^[ \t]*(?P<heredoc>{heredoc})[ \t\r]*$"
        );

        let preamble = if config.preamble {
            let sentinel = regex::escape(&config.preamble_sentinel);
            Some(Regex::new(&format!(r"(?m)^{sentinel}[ \t\r]*$"))?)
        } else {
            None
        };

        Ok(Self {
            comment: Regex::new(&format!(r"\A[ \t]*(?:{markers})[^\n]*{LINE_END}"))?,
            blank: Regex::new(r"\A(?:[ \t\r]*(?:\n|\z))+")?,
            case_header: Regex::new(&format!(r"\A{case_prefix}([^\n]*){LINE_END}"))?,
            case_line: Regex::new(&format!(r"(?m)^{case_prefix}"))?,
            inline_item: Regex::new(&format!(
                r"\A--- {LABEL}{OPTIONS}[ \t]*:([^\n]*){LINE_END}"
            ))?,
            item_head: Regex::new(&format!(r"\A--- {LABEL}{OPTIONS}[ \t\r]*{LINE_END}"))?,
            boundary: Regex::new(&boundary)?,
            preamble,
            fence_chars: config.fence_chars.clone(),
        })
    }

    /// The grammar built from [`GrammarConfig::default`], compiled once.
    pub fn standard() -> &'static Grammar {
        STANDARD.get_or_init(|| {
            Grammar::new(&GrammarConfig::default()).expect("Invalid standard grammar")
        })
    }

    pub fn is_fence_char(&self, c: char) -> bool {
        self.fence_chars.contains(&c)
    }
}
