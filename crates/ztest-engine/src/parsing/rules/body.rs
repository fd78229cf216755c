use crate::parsing::grammar::Grammar;

/// The body of a headless item, found by searching forward for the next
/// boundary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBody {
    pub value: String,
    /// Bytes consumed. Past the sentinel line for a heredoc, otherwise up to
    /// the boundary.
    pub len: usize,
    /// Whether a heredoc sentinel ended the body.
    pub heredoc: bool,
}

/// Scans `rest` for the end of a headless item body.
///
/// Boundaries are comment lines, case headers, item lines and the heredoc
/// sentinel. A heredoc body keeps every byte before the sentinel; any other
/// body is trimmed. Without a boundary the body is the rest of the input.
pub fn scan_body(grammar: &Grammar, rest: &str) -> ItemBody {
    let Some(caps) = grammar.boundary.captures(rest) else {
        return ItemBody {
            value: rest.trim().to_string(),
            len: rest.len(),
            heredoc: false,
        };
    };

    let whole = caps.get_match();

    match caps.name("heredoc") {
        Some(sentinel) => {
            let mut len = whole.end();
            if rest[len..].starts_with('\n') {
                len += 1;
            }
            ItemBody {
                value: rest[..sentinel.start()].to_string(),
                len,
                heredoc: true,
            }
        }
        None => ItemBody {
            value: rest[..whole.start()].trim().to_string(),
            len: whole.start(),
            heredoc: false,
        },
    }
}
