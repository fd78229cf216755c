use crate::parsing::{cases::ParsedFile, token::Token};

/// Validates lexer and grouper output invariants.
///
/// Asserts that:
/// - Token lines never decrease
/// - No `Global` token follows the first case header
/// - Every case header with at least one item produced exactly one case
/// - No case is empty and every item sits below its case header
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(tokens: &[Token], parsed: &ParsedFile) {
    for pair in tokens.windows(2) {
        assert!(
            pair[0].line() <= pair[1].line(),
            "token lines go backwards: {:?} then {:?}",
            pair[0],
            pair[1]
        );
    }

    if let Some(first_header) = tokens.iter().position(Token::is_case_header) {
        assert!(
            !tokens[first_header..]
                .iter()
                .any(|t| matches!(t, Token::Global(_))),
            "global item after the first case header"
        );
    }

    let mut populated = 0;
    let mut open = false;
    for token in tokens {
        match token {
            Token::CaseHeader { .. } => open = false,
            Token::Item(_) if !open => {
                populated += 1;
                open = true;
            }
            _ => {}
        }
    }
    assert_eq!(
        parsed.cases.len(),
        populated,
        "case count does not match populated case headers"
    );

    for case in &parsed.cases {
        assert!(!case.items.is_empty(), "empty case at line {}", case.line);
        for item in &case.items {
            assert!(
                item.line > case.line,
                "item {:?} at line {} is not below case header at line {}",
                item.label,
                item.line,
                case.line
            );
        }
    }
}
