//! Lexical analysis (tokenization) of a single input line.
//!
//! Produces plain string tokens after applying POSIX-like quoting rules:
//! single quotes preserve everything literally, double quotes preserve
//! whitespace and allow a small set of backslash escapes, and an unquoted
//! backslash escapes any following character.

/// Characters a backslash may escape inside double quotes.
const DOUBLE_QUOTE_ESCAPES: [char; 5] = ['"', '\\', '$', '`', '\n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Unquoted,
    SingleQuote,
    DoubleQuote,
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    state: LexingState,
    buffer: String,
    tokens: Vec<String>,
}

impl LexingFSM {
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            state: LexingState::Unquoted,
            buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Runs the machine over the whole input and returns the tokens.
    ///
    /// An unterminated quote is not an error: whatever was accumulated is
    /// emitted as the last token.
    fn make_tokens(mut self) -> Vec<String> {
        while let Some(ch) = self.read_char() {
            match self.state {
                LexingState::Unquoted => self.handle_unquoted(ch),
                LexingState::SingleQuote => self.handle_single_quote(ch),
                LexingState::DoubleQuote => self.handle_double_quote(ch),
            }
        }

        if self.state != LexingState::Unquoted {
            tracing::debug!(state = ?self.state, "unterminated quote at end of line");
        }

        self.finish_token();
        self.tokens
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn handle_unquoted(&mut self, ch: char) {
        match ch {
            '\\' => match self.read_char() {
                Some(next) => self.buffer.push(next),
                // Nothing left to escape.
                None => self.buffer.push('\\'),
            },
            '\'' => self.state = LexingState::SingleQuote,
            '"' => self.state = LexingState::DoubleQuote,
            ' ' | '\t' => self.finish_token(),
            c => self.buffer.push(c),
        }
    }

    fn handle_single_quote(&mut self, ch: char) {
        match ch {
            '\'' => self.state = LexingState::Unquoted,
            c => self.buffer.push(c),
        }
    }

    fn handle_double_quote(&mut self, ch: char) {
        match ch {
            '"' => self.state = LexingState::Unquoted,
            '\\' => match self.peek_char() {
                Some(next) if DOUBLE_QUOTE_ESCAPES.contains(&next) => {
                    self.read_char();
                    self.buffer.push(next);
                }
                // The backslash stays and the next character is handled
                // on its own iteration.
                _ => self.buffer.push('\\'),
            },
            c => self.buffer.push(c),
        }
    }

    fn finish_token(&mut self) {
        if !self.buffer.is_empty() {
            self.tokens.push(std::mem::take(&mut self.buffer));
        }
    }
}

/// Splits one input line into tokens.
///
/// Tokens are returned in the order they appear in the line and are never
/// empty; an empty or whitespace-only line yields no tokens.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    let tokens = LexingFSM::new(line).make_tokens();
    tracing::trace!(?tokens, "tokenized line");
    tokens
}
