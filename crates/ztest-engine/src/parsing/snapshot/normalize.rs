use std::fmt;

use serde::Serialize;

use crate::parsing::{cases::ParsedFile, token::Item};

/// Snapshot of a parsed file for testing with `insta`.
#[derive(Debug, Serialize)]
pub struct Snap {
    /// Verbatim preamble code, if any.
    pub code: Option<String>,
    /// Global items in label order.
    pub globals: Vec<ItemSnap>,
    pub cases: Vec<CaseSnap>,
}

#[derive(Debug, Serialize)]
pub struct CaseSnap {
    pub order: String,
    pub name: Option<String>,
    pub line: usize,
    pub items: Vec<ItemSnap>,
}

#[derive(Debug, Serialize)]
pub struct ItemSnap {
    pub label: String,
    /// Options joined by a single space; empty when there are none.
    pub options: String,
    pub line: usize,
    pub value: Option<String>,
}

/// Converts a parsed file into a serializable snapshot for testing.
pub fn normalize(parsed: &ParsedFile) -> Snap {
    Snap {
        code: parsed.preamble.code.clone(),
        globals: parsed.preamble.globals.values().map(item_snap).collect(),
        cases: parsed
            .cases
            .iter()
            .map(|c| CaseSnap {
                order: c.order.clone(),
                name: c.name.clone(),
                line: c.line,
                items: c.items.iter().map(item_snap).collect(),
            })
            .collect(),
    }
}

fn item_snap(item: &Item) -> ItemSnap {
    ItemSnap {
        label: item.label.clone(),
        options: item.options.iter().collect::<Vec<_>>().join(" "),
        line: item.line,
        value: item.value.clone(),
    }
}

impl fmt::Display for ItemSnap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if !self.options.is_empty() {
            write!(f, " [{}]", self.options)?;
        }
        match &self.value {
            Some(value) => write!(f, " @{} = {value:?}", self.line),
            None => write!(f, " @{} = <none>", self.line),
        }
    }
}

/// One line per preamble part, case and item; items are indented under
/// their case. No trailing newline.
impl fmt::Display for Snap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec![];
        if let Some(code) = &self.code {
            lines.push(format!("preamble: {code:?}"));
        }
        for g in &self.globals {
            lines.push(format!("global {g}"));
        }
        for c in &self.cases {
            match &c.name {
                Some(name) => lines.push(format!("case {} {name:?} @{}", c.order, c.line)),
                None => lines.push(format!("case {} <anonymous> @{}", c.order, c.line)),
            }
            for item in &c.items {
                lines.push(format!("  {item}"));
            }
        }
        write!(f, "{}", lines.join("\n"))
    }
}
