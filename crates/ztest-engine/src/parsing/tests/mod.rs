//! Parser tests over complete case files.
//!
//! Token-level expectations check the lexer; grouped expectations check the
//! whole pipeline and the invariants in `snapshot::invariants`.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::parsing::{
    Grammar, ParseError, ParsedFile, parse_document, snapshot, token::Item, token::Token, tokenize,
};

fn lex(text: &str) -> Vec<Token> {
    tokenize(text, Grammar::standard(), false).unwrap()
}

fn parse(text: &str) -> ParsedFile {
    let tokens = lex(text);
    let parsed = parse_document(text).unwrap();
    snapshot::invariants(&tokens, &parsed);
    parsed
}

fn item(token: &Token) -> &Item {
    match token {
        Token::Item(item) | Token::Global(item) => item,
        other => panic!("expected an item, got {other:?}"),
    }
}

fn options(item: &Item) -> Vec<&str> {
    item.options.iter().collect()
}

// Preamble

#[rstest]
#[case::at_end("import sys\n__DATA__", "import sys\n")]
#[case::leading_blank("\nimport sys\n\n__DATA__", "\nimport sys\n\n")]
#[case::trailing_newline("\nimport sys\n\n__DATA__\n", "\nimport sys\n\n")]
#[case::trailing_blank_lines("\nimport sys\n\n__DATA__\n\n", "\nimport sys\n\n")]
fn preamble_is_verbatim(#[case] text: &str, #[case] code: &str) {
    let tokens = lex(text);
    assert_eq!(
        tokens,
        vec![Token::Preamble {
            text: code.to_string(),
            line: 1,
        }]
    );
}

#[test]
fn later_sentinel_is_body_text() {
    let tokens = lex("a\n__DATA__\n=== TEST 1: t\n--- request\n__DATA__\n");
    assert_eq!(tokens.len(), 3);
    assert_eq!(item(&tokens[2]).text(), "__DATA__");
}

#[test]
fn sentinel_inside_a_case_keeps_every_case() {
    let parsed = parse("=== TEST 1: a\n--- request: GET /\n=== TEST 2: b\n--- response_body\n__DATA__\n");
    assert!(parsed.preamble.is_empty());
    assert_eq!(parsed.cases.len(), 2);
    assert_eq!(
        parsed.cases[1].item("response_body").map(Item::text),
        Some("__DATA__")
    );
}

#[test]
fn sentinel_inside_a_fence_is_verbatim() {
    let parsed = parse("=== TEST 1: a\n--- response_body\n```\n__DATA__\n```\n");
    assert!(parsed.preamble.is_empty());
    assert_eq!(parsed.cases.len(), 1);
    assert_eq!(
        parsed.cases[0].item("response_body").map(Item::text),
        Some("\n__DATA__\n")
    );
}

#[test]
fn preamble_sentinel_is_ignored_when_disabled() {
    let config = ztest_config::GrammarConfig {
        preamble: false,
        ..Default::default()
    };
    let grammar = Grammar::new(&config).unwrap();
    let err = tokenize("import sys\n__DATA__\n", &grammar, false).unwrap_err();
    assert_eq!(err.line(), 1);
}

// Cases

#[test]
fn case_header_after_preamble() {
    let tokens = lex("\nimport sys\n\n__DATA__\n\n=== TEST 1: sanity\n");
    assert_eq!(tokens.len(), 2);
    assert_eq!(
        tokens[1],
        Token::CaseHeader {
            order: "1".into(),
            name: Some("sanity".into()),
            line: 6,
        }
    );
}

#[test]
fn head_at_end_of_input_gets_empty_value() {
    let tokens = lex("\nimport sys\n\n__DATA__\n\n=== TEST 1: sanity\n--- request\n");
    assert_eq!(tokens.len(), 3);
    assert_eq!(item(&tokens[2]).line, 7);
    assert_eq!(item(&tokens[2]).label, "request");
    assert_eq!(item(&tokens[2]).value.as_deref(), Some(""));
}

#[rstest]
#[case::head_and_body("\n=== TEST 1: sanity\n--- request eval\nGET /\n", &["eval"])]
#[case::inline("\n=== TEST 1: sanity\n--- request: GET /\n", &[])]
#[case::inline_with_option("\n=== TEST 1: sanity\n--- request eval: GET /\n", &["eval"])]
fn request_item_forms(#[case] text: &str, #[case] expected: &[&str]) {
    let tokens = lex(text);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].line(), 2);

    let request = item(&tokens[1]);
    assert_eq!(request.line, 3);
    assert_eq!(request.label, "request");
    assert_eq!(request.text(), "GET /");
    assert_eq!(options(request), expected);
}

#[test]
fn two_item_case() {
    let parsed = parse("=== TEST 1: sanity\n--- request\nGET /\n--- response_body\nhello\n");
    assert_eq!(parsed.cases.len(), 1);

    let case = &parsed.cases[0];
    assert_eq!((case.order.as_str(), case.name.as_deref()), ("1", Some("sanity")));
    let items: Vec<_> = case.items.iter().map(|i| (i.label.as_str(), i.text())).collect();
    assert_eq!(items, vec![("request", "GET /"), ("response_body", "hello")]);
}

#[test]
fn header_without_items_yields_no_case() {
    let parsed = parse("=== TEST 1: empty\n=== TEST 2: full\n--- request: GET /\n");
    assert_eq!(parsed.cases.len(), 1);
    assert_eq!(parsed.cases[0].order, "2");
}

#[test]
fn second_case_header() {
    let tokens = lex("\n=== TEST 1: sanity 1\n--- request eval: GET /\n\n=== TEST 2: sanity 2\n");
    assert_eq!(tokens.len(), 3);
    assert_eq!(
        tokens[2],
        Token::CaseHeader {
            order: "2".into(),
            name: Some("sanity 2".into()),
            line: 5,
        }
    );
}

#[test]
fn bodies_are_trimmed() {
    let text = r#"
=== TEST 1: sanity 1
--- request eval: GET /
--- response_body
hello

=== TEST 2: sanity 2
--- request
GET /

--- response_body

world
"#;
    let tokens = lex(text);
    assert_eq!(tokens.len(), 6);
    assert_eq!((item(&tokens[2]).line, item(&tokens[2]).text()), (4, "hello"));
    assert_eq!((item(&tokens[4]).line, item(&tokens[4]).text()), (8, "GET /"));
    assert_eq!((item(&tokens[5]).line, item(&tokens[5]).text()), (11, "world"));
}

#[test]
fn fenced_body_is_verbatim() {
    let text = r#"
=== TEST 1: sanity 1
--- request eval: GET /
--- request_headers
Host: www.google.com

--- response_body
```
hello

```
"#;
    let tokens = lex(text);
    assert_eq!(tokens.len(), 4);
    assert_eq!(item(&tokens[2]).text(), "Host: www.google.com");
    assert_eq!(item(&tokens[3]).line, 7);
    assert_eq!(item(&tokens[3]).text(), "\nhello\n\n");
}

#[test]
fn comments_between_cases() {
    let text = r#"
# this is a comment
=== TEST 1.1: sanity 1
--- request eval: GET /

=== TEST 1.2: sanity 2
// this is a comment
# this is a comment too
--- request eval: GET /
"#;
    let tokens = lex(text);
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[1].line(), 4);
    assert_eq!(item(&tokens[3]).line, 9);

    let parsed = parse(text);
    assert!(parsed.preamble.is_empty());
    assert_eq!(parsed.cases.len(), 2);
    assert_eq!(parsed.cases[0].title(), "TEST 1.1: sanity 1");
    assert_eq!(parsed.cases[1].title(), "TEST 1.2: sanity 2");
    assert_eq!(parsed.cases[1].items.len(), 1);
}

const FULL_FILE: &str = r#"
import sys

__DATA__
=== TEST 1: sanity

--- http_config
gzip on;

--- request
GET /
--- response_body like
^Hello [a-z]$

--- request
GET /
--- response_body eval like
r"^Hello [a-z]$"

=== TEST 2:
--- request eval: GET /
"#;

#[test]
fn full_file_tokens() {
    let tokens = lex(FULL_FILE);
    assert_eq!(tokens.len(), 9);

    let body = item(&tokens[4]);
    assert_eq!(body.line, 12);
    assert_eq!(body.label, "response_body");
    assert_eq!(options(body), vec!["like"]);
    assert_eq!(body.text(), "^Hello [a-z]$");

    assert_eq!(options(item(&tokens[6])), vec!["eval", "like"]);
    assert_eq!(
        tokens[7],
        Token::CaseHeader {
            order: "2".into(),
            name: None,
            line: 20,
        }
    );
}

#[test]
fn full_file_cases() {
    let parsed = parse(FULL_FILE);
    assert_eq!(parsed.preamble.code.as_deref().map(str::trim), Some("import sys"));
    assert_eq!(parsed.cases.len(), 2);
    assert_eq!(parsed.cases[0].title(), "TEST 1: sanity");
    assert_eq!(parsed.cases[0].items.len(), 5);
    assert_eq!(parsed.cases[0].items_named("request").count(), 2);
    assert_eq!(parsed.cases[1].title(), "TEST 2:");
    assert_eq!(parsed.cases[1].items.len(), 1);
}

#[test]
fn full_file_snapshot() {
    let snap = snapshot::normalize(&parse(FULL_FILE));
    insta::assert_snapshot!(snap.to_string(), @r#"
    preamble: "\nimport sys\n\n"
    case 1 "sanity" @5
      http_config @7 = "gzip on;"
      request @10 = "GET /"
      response_body [like] @12 = "^Hello [a-z]$"
      request @15 = "GET /"
      response_body [eval like] @17 = "r\"^Hello [a-z]$\""
    case 2 <anonymous> @20
      request [eval] @21 = "GET /"
    "#);
}

#[test]
fn superseded_heads_have_no_value() {
    let text = r#"
import sys

__DATA__

=== TEST 1: sanity

--- http_config
# pass
--- server_config

--- request
--- response_body_like
^Hello
--- error_code
"#;
    let tokens = lex(text);
    assert_eq!(tokens.len(), 7);

    assert_eq!(item(&tokens[2]).value, None);
    assert_eq!((item(&tokens[3]).line, item(&tokens[3]).value.as_deref()), (10, None));
    assert_eq!(item(&tokens[4]).value, None);
    assert_eq!(
        (item(&tokens[5]).line, item(&tokens[5]).text()),
        (13, "^Hello")
    );
    assert_eq!(
        (item(&tokens[6]).line, item(&tokens[6]).value.as_deref()),
        (15, Some(""))
    );
}

#[test]
fn string_blocks_after_comments_and_heads() {
    let text = r#"
import sys

__DATA__

=== TEST 1: sanity
--- http_config
# this is a comment
```
gzip on;
```
--- request
--- response_body_like eval
~~~"""
--- request"""~~~
--- error_code
"#;
    let tokens = lex(text);
    assert_eq!(tokens.len(), 6);

    assert_eq!(item(&tokens[2]).line, 7);
    assert_eq!(item(&tokens[2]).text().trim(), "gzip on;");

    let body = item(&tokens[4]);
    assert_eq!(body.line, 13);
    assert_eq!(options(body), vec!["eval"]);
    assert_eq!(body.text(), "\"\"\"\n--- request\"\"\"");
}

// Heredoc sentinel

#[test]
fn heredoc_keeps_body_verbatim() {
    let text = "\n--- config\n__EOF__\n\n--- response_body\nhello\n__EOF__ world\n__EOF__\n";
    let tokens = lex(text);
    assert_eq!(tokens.len(), 2);

    assert!(matches!(tokens[0], Token::Global(_)));
    assert_eq!((item(&tokens[0]).line, item(&tokens[0]).text()), (2, ""));
    assert_eq!(item(&tokens[1]).line, 5);
    assert_eq!(item(&tokens[1]).text(), "hello\n__EOF__ world\n");

    let parsed = parse(text);
    assert!(parsed.cases.is_empty());
    assert_eq!(parsed.preamble.globals.len(), 2);
}

#[test]
fn heredoc_keeps_leading_space() {
    let tokens = lex("\n--- config\n __EOF__\n");
    assert_eq!(tokens.len(), 1);
    assert_eq!(item(&tokens[0]).text(), " ");
}

#[test]
fn sentinel_must_stand_alone_on_its_line() {
    let parsed = parse("=== TEST 1: a\n--- response_body\nvalue=__EOF__\nmore\n");
    assert_eq!(
        parsed.cases[0].item("response_body").map(Item::text),
        Some("value=__EOF__\nmore")
    );
}

#[test]
fn blank_lines_before_heredoc_are_skipped() {
    let tokens = lex("\n--- config\n\n__EOF__\n\n--- request\nGET /\n");
    assert_eq!(tokens.len(), 2);
    assert_eq!((item(&tokens[0]).line, item(&tokens[0]).text()), (2, ""));
    assert_eq!((item(&tokens[1]).line, item(&tokens[1]).text()), (6, "GET /"));
}

// String blocks

#[test]
fn tilde_fence_wraps_backticks() {
    let text = "\n=== TEST 1: sanity\n--- request eval\n~~~\n```\nGET ''.join(['1'*1, '2*2, '3'*3])\n```\n~~~\n";
    let tokens = lex(text);
    assert_eq!(tokens.len(), 2);
    assert_eq!(item(&tokens[1]).line, 3);
    assert_eq!(options(item(&tokens[1])), vec!["eval"]);
    assert_eq!(
        item(&tokens[1]).text(),
        "\n```\nGET ''.join(['1'*1, '2*2, '3'*3])\n```\n"
    );
}

#[rstest]
#[case::backticks_around_quotes(
    "\n=== TEST 1: sanity\n--- request eval\n```\"\"\"\nGET ''.join(['/', '1'*1, '2'*2, '3'*3])\n\"\"\"```\n"
)]
#[case::bare_quotes_are_body_text(
    "\n=== TEST 1: sanity\n--- request eval\n\"\"\"\nGET ''.join(['/', '1'*1, '2'*2, '3'*3])\n\"\"\"\n"
)]
fn triple_quotes_survive(#[case] text: &str) {
    let tokens = lex(text);
    assert_eq!(tokens.len(), 2);
    assert_eq!(item(&tokens[1]).line, 3);
    assert_eq!(
        item(&tokens[1]).text(),
        "\"\"\"\nGET ''.join(['/', '1'*1, '2'*2, '3'*3])\n\"\"\""
    );
}

// Comments

#[test]
fn comment_between_head_and_body() {
    let tokens = lex("\n=== TEST 1: sanity\n--- request eval\n// this is a comment\n\"\"\"\nGET /\n\"\"\"\n");
    assert_eq!(tokens.len(), 2);
    assert_eq!(item(&tokens[1]).text(), "\"\"\"\nGET /\n\"\"\"");
}

#[test]
fn comment_ends_body() {
    let tokens = lex("\n# sanity test\n=== TEST 1: sanity\n--- request eval\nGET /\n// this is a comment\n");
    assert_eq!(tokens.len(), 2);
    assert_eq!((item(&tokens[1]).line, item(&tokens[1]).text()), (4, "GET /"));
}

#[test]
fn comment_after_empty_preamble() {
    let tokens = lex("\n__DATA__\n# sanity test\n=== TEST 1: sanity\n--- request eval\nGET /\n// this is a comment\n");
    assert_eq!(tokens.len(), 3);
    assert_eq!(
        tokens[0],
        Token::Preamble {
            text: "\n".into(),
            line: 1,
        }
    );
    assert_eq!((item(&tokens[2]).line, item(&tokens[2]).text()), (5, "GET /"));
}

// Errors

#[rstest]
#[case::stray_text(
    "\nimport sys\n\n__DATA__\n\n1",
    ParseError::UnexpectedText { line: 6, fragment: "1".into() }
)]
#[case::stray_string_block(
    "\nimport sys\n\n__DATA__\n\n```1```\n",
    ParseError::UnexpectedStringBlock { line: 6, fragment: "```1```".into() }
)]
#[case::text_after_string_block(
    "\nimport sys\n\n__DATA__\n\n--- request\n```\n```\n1\n```\n",
    ParseError::UnexpectedText { line: 9, fragment: "1".into() }
)]
#[case::second_heredoc_sentinel(
    "\nimport sys\n\n__DATA__\n\n--- request\n__EOF__\n__EOF__\n",
    ParseError::UnexpectedText { line: 8, fragment: "__EOF__".into() }
)]
fn parse_errors(#[case] text: &str, #[case] expected: ParseError) {
    assert_eq!(parse_document(text).unwrap_err(), expected);
}

#[test]
fn error_message_names_line_and_fragment() {
    let err = parse_document("=== TEST 1: t\nstray\n").unwrap_err();
    assert_eq!(err.to_string(), "line 2: unexpected text: stray");
}
