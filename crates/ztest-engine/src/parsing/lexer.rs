use log::{debug, trace};

use super::{
    error::ParseError,
    grammar::Grammar,
    rules::{self, Rule, RuleMatch},
    token::{Item, Token},
};

/// What the lexer expects at the current position.
#[derive(Debug)]
enum LexState {
    AwaitingHeadOrHeader,
    /// A headless item whose body has not been seen yet.
    BodyPending(Item),
}

/// Turns case file text into a flat token stream.
///
/// Cheap to construct; all compiled state lives in the [`Grammar`].
pub struct Lexer<'g> {
    grammar: &'g Grammar,
    verbose: bool,
}

impl<'g> Lexer<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            verbose: false,
        }
    }

    /// Logs every recognizer hit and emitted token at `debug` level instead
    /// of `trace`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, ParseError> {
        let mut scan = Scan {
            grammar: self.grammar,
            text,
            verbose: self.verbose,
            pos: 0,
            line: 1,
            state: LexState::AwaitingHeadOrHeader,
            tokens: vec![],
        };
        scan.run()?;
        Ok(scan.finish())
    }
}

/// Owned state of one tokenize call.
struct Scan<'a> {
    grammar: &'a Grammar,
    text: &'a str,
    verbose: bool,
    pos: usize,
    /// 1-based line of `pos`.
    line: usize,
    state: LexState,
    tokens: Vec<Token>,
}

impl<'a> Scan<'a> {
    fn run(&mut self) -> Result<(), ParseError> {
        self.lex_preamble();

        let text = self.text;
        while self.pos < text.len() {
            let rest = &text[self.pos..];
            match rules::recognize(self.grammar, rest) {
                Some(m) => self.apply(m, rest)?,
                None if self.body_pending() => self.lex_item_body(rest)?,
                None => {
                    return Err(ParseError::UnexpectedText {
                        line: self.line,
                        fragment: first_line(rest),
                    });
                }
            }
        }
        Ok(())
    }

    fn lex_preamble(&mut self) {
        let Some(sentinel) = &self.grammar.preamble else {
            return;
        };
        let text = self.text;
        let Some(m) = sentinel.find(text) else {
            return;
        };
        // A sentinel after the first case header is case content.
        if self.grammar.case_line.is_match(&text[..m.start()]) {
            trace!("preamble sentinel at byte {} follows a case header", m.start());
            return;
        }

        let tail = &text[m.end()..];
        let len = m.end() + tail.len() - tail.trim_start_matches('\n').len();
        self.log_rule("preamble", &text[..len]);
        self.push(Token::Preamble {
            text: text[..m.start()].to_string(),
            line: 1,
        });
        self.advance(len);
    }

    fn apply(&mut self, m: RuleMatch<'_>, rest: &str) -> Result<(), ParseError> {
        let line = self.line;
        let consumed = m.consumed();
        self.log_rule(m.rule().name(), &rest[..consumed]);

        match m {
            RuleMatch::Comment { .. } | RuleMatch::Blank { .. } => {}
            RuleMatch::CaseHeader { order, name, .. } => {
                self.flush_pending();
                self.push(Token::CaseHeader {
                    order: order.to_string(),
                    name: name.map(str::to_string),
                    line,
                });
            }
            RuleMatch::InlineItem {
                label,
                options,
                value,
                ..
            } => {
                self.flush_pending();
                self.push(Token::Item(Item::new(
                    label,
                    options,
                    Some(value.to_string()),
                    line,
                )));
            }
            RuleMatch::ItemHead { label, options, .. } => {
                self.flush_pending();
                self.state = LexState::BodyPending(Item::new(label, options, None, line));
            }
            RuleMatch::StringBlock(block) => match self.take_state() {
                LexState::BodyPending(mut item) => {
                    item.value = Some(block.content.to_string());
                    self.push(Token::Item(item));
                }
                LexState::AwaitingHeadOrHeader => {
                    return Err(ParseError::UnexpectedStringBlock {
                        line,
                        fragment: rest[..consumed].trim_end().to_string(),
                    });
                }
            },
        }

        self.advance(consumed);
        Ok(())
    }

    fn lex_item_body(&mut self, rest: &str) -> Result<(), ParseError> {
        let mut item = match self.take_state() {
            LexState::BodyPending(item) => item,
            LexState::AwaitingHeadOrHeader => {
                return Err(ParseError::UnexpectedBlock {
                    line: self.line,
                    fragment: first_line(rest),
                });
            }
        };

        let body = rules::scan_body(self.grammar, rest);
        self.log_rule(Rule::ItemBody.name(), &rest[..body.len]);
        item.value = Some(body.value);
        self.push(Token::Item(item));
        self.advance(body.len);
        Ok(())
    }

    /// Emits a pending head that another construct superseded before any
    /// body was seen.
    fn flush_pending(&mut self) {
        if let LexState::BodyPending(item) = self.take_state() {
            self.push(Token::Item(item));
        }
    }

    fn finish(mut self) -> Vec<Token> {
        // EOF: only blank or comment lines followed the head.
        if let LexState::BodyPending(mut item) = self.take_state() {
            item.value = Some(String::new());
            self.push(Token::Item(item));
        }

        let mut scoped = false;
        self.tokens
            .into_iter()
            .map(|token| {
                scoped |= token.is_case_header();
                match token {
                    Token::Item(item) if !scoped => Token::Global(item),
                    token => token,
                }
            })
            .collect()
    }

    fn body_pending(&self) -> bool {
        matches!(self.state, LexState::BodyPending(_))
    }

    fn take_state(&mut self) -> LexState {
        std::mem::replace(&mut self.state, LexState::AwaitingHeadOrHeader)
    }

    fn advance(&mut self, len: usize) {
        let consumed = &self.text[self.pos..self.pos + len];
        self.line += consumed.matches('\n').count();
        self.pos += len;
    }

    fn push(&mut self, token: Token) {
        if self.verbose {
            debug!("got token: {token:?}");
        } else {
            trace!("got token: {token:?}");
        }
        self.tokens.push(token);
    }

    fn log_rule(&self, rule: &str, text: &str) {
        if self.verbose {
            debug!("[{rule}] line {}: {text:?}", self.line);
        } else {
            trace!("[{rule}] line {}: {text:?}", self.line);
        }
    }
}

fn first_line(rest: &str) -> String {
    rest.lines().next().unwrap_or_default().to_string()
}
