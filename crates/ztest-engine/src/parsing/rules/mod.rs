//! # Rule Set
//!
//! Independent recognizers over the remaining input. Each one either declines
//! or consumes a prefix; the lexer decides what the consumed text means.
//!
//! ## Modules
//!
//! - **`fence`**: `StringFence` for verbatim blocks delimited by a repeated
//!   fence run
//! - **`body`**: `scan_body` for the forward search that ends a headless item
//!
//! ## Precedence
//!
//! Rules are tried in [`Rule::ANCHORED`] order and the first match wins. Only
//! [`Rule::ItemBody`] searches forward; it runs when nothing else matched and
//! a headless item is waiting for its body.

pub mod body;
pub mod fence;

pub use body::{ItemBody, scan_body};
pub use fence::{StringBlock, StringFence};

use super::{grammar::Grammar, token::Options};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Comment,
    Blank,
    CaseHeader,
    InlineItem,
    ItemHead,
    StringBlock,
    ItemBody,
}

/// The result of an anchored recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch<'a> {
    Comment {
        len: usize,
    },
    Blank {
        len: usize,
    },
    CaseHeader {
        order: &'a str,
        name: Option<&'a str>,
        len: usize,
    },
    InlineItem {
        label: &'a str,
        options: Options,
        value: &'a str,
        len: usize,
    },
    ItemHead {
        label: &'a str,
        options: Options,
        len: usize,
    },
    StringBlock(StringBlock<'a>),
}

impl Rule {
    /// Recognizers anchored at the current position, in priority order.
    pub const ANCHORED: [Rule; 6] = [
        Rule::Comment,
        Rule::Blank,
        Rule::CaseHeader,
        Rule::InlineItem,
        Rule::ItemHead,
        Rule::StringBlock,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rule::Comment => "comment_line",
            Rule::Blank => "blank_line",
            Rule::CaseHeader => "case_line",
            Rule::InlineItem => "item_line",
            Rule::ItemHead => "item_head",
            Rule::StringBlock => "string_block",
            Rule::ItemBody => "item_block",
        }
    }

    /// Runs this recognizer at the start of `rest`.
    ///
    /// [`Rule::ItemBody`] never matches here; use [`scan_body`].
    pub fn recognize<'a>(self, grammar: &Grammar, rest: &'a str) -> Option<RuleMatch<'a>> {
        match self {
            Rule::Comment => grammar
                .comment
                .find(rest)
                .map(|m| RuleMatch::Comment { len: m.end() }),
            Rule::Blank => grammar
                .blank
                .find(rest)
                .filter(|m| !m.is_empty())
                .map(|m| RuleMatch::Blank { len: m.end() }),
            Rule::CaseHeader => grammar.case_header.captures(rest).map(|caps| {
                let name = caps.get(2).map_or("", |m| m.as_str()).trim();
                RuleMatch::CaseHeader {
                    order: caps.get(1).map_or("", |m| m.as_str()),
                    name: (!name.is_empty()).then_some(name),
                    len: caps.get_match().end(),
                }
            }),
            Rule::InlineItem => grammar.inline_item.captures(rest).map(|caps| {
                RuleMatch::InlineItem {
                    label: caps.get(1).map_or("", |m| m.as_str()),
                    options: Options::parse(&caps[2]),
                    value: caps.get(3).map_or("", |m| m.as_str().trim()),
                    len: caps.get_match().end(),
                }
            }),
            Rule::ItemHead => grammar.item_head.captures(rest).map(|caps| RuleMatch::ItemHead {
                label: caps.get(1).map_or("", |m| m.as_str()),
                options: Options::parse(&caps[2]),
                len: caps.get_match().end(),
            }),
            Rule::StringBlock => {
                StringFence::block(rest, |c| grammar.is_fence_char(c)).map(RuleMatch::StringBlock)
            }
            Rule::ItemBody => None,
        }
    }
}

impl RuleMatch<'_> {
    pub fn rule(&self) -> Rule {
        match self {
            RuleMatch::Comment { .. } => Rule::Comment,
            RuleMatch::Blank { .. } => Rule::Blank,
            RuleMatch::CaseHeader { .. } => Rule::CaseHeader,
            RuleMatch::InlineItem { .. } => Rule::InlineItem,
            RuleMatch::ItemHead { .. } => Rule::ItemHead,
            RuleMatch::StringBlock(_) => Rule::StringBlock,
        }
    }

    /// Bytes of input this match consumes.
    pub fn consumed(&self) -> usize {
        match self {
            RuleMatch::Comment { len }
            | RuleMatch::Blank { len }
            | RuleMatch::CaseHeader { len, .. }
            | RuleMatch::InlineItem { len, .. }
            | RuleMatch::ItemHead { len, .. } => *len,
            RuleMatch::StringBlock(block) => block.len,
        }
    }
}

/// Tries every anchored recognizer in priority order.
pub fn recognize<'a>(grammar: &Grammar, rest: &'a str) -> Option<RuleMatch<'a>> {
    Rule::ANCHORED
        .iter()
        .find_map(|rule| rule.recognize(grammar, rest))
}
