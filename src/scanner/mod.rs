//! The scanner turns raw source bytes into a layout-normalized token stream.
//!
//! Indentation is the load-bearing part: at the start of every physical line
//! the scanner compares the line's leading-whitespace column against a stack
//! of open indentation levels and emits synthetic `Indent`/`Dedent` tokens,
//! and at every newline it decides whether the previous token can end a
//! statement and emits a synthetic `Semicolon` if so. Inside unclosed
//! brackets the layout machinery is suspended entirely, so expressions may
//! span lines freely.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::token::{self, File, Location, Pos, TokenKind};

/// Scanner mode bit: emit `Comment` tokens instead of skipping them.
pub const SCAN_COMMENTS: u32 = 1 << 0;

/// Callback invoked for every scan error. The scanner itself always
/// resynchronizes and keeps going.
pub type ErrorHandler<'a> = Box<dyn FnMut(Location, &str) + 'a>;

/// Tabs in leading whitespace advance the indentation column to the next
/// multiple of this width, independent of any printer setting.
const TAB_WIDTH: usize = 8;

/// A single scanned token: its position, kind, and literal text (empty for
/// punctuation and layout tokens; `"\n"` for inserted semicolons).
pub type Scanned = (Pos, TokenKind, String);

pub struct Scanner<'a> {
    file: Arc<File>,
    src: &'a str,
    err: ErrorHandler<'a>,
    mode: u32,

    ch: Option<char>,
    offset: usize,
    rd_offset: usize,
    line_offset: usize,

    // layout state
    indents: Vec<usize>,
    pending: VecDeque<Scanned>,
    depth: usize,
    prev: TokenKind,
    at_line_start: bool,
    eof_done: bool,
    seen_token: bool,

    pub error_count: usize,
}

impl<'a> Scanner<'a> {
    /// `file` must have been registered with size `src.len()`.
    pub fn new(file: Arc<File>, src: &'a str, err: ErrorHandler<'a>, mode: u32) -> Scanner<'a> {
        assert_eq!(file.size() as usize, src.len(), "file size mismatch");

        let mut s = Scanner {
            file,
            src,
            err,
            mode,
            ch: None,
            offset: 0,
            rd_offset: 0,
            line_offset: 0,
            indents: vec![0],
            pending: VecDeque::new(),
            depth: 0,
            prev: TokenKind::Illegal,
            at_line_start: true,
            eof_done: false,
            seen_token: false,
            error_count: 0,
        };
        s.advance();
        s
    }

    fn error(&mut self, offset: usize, msg: &str) {
        self.error_count += 1;
        let location = self.file.position(self.file.pos(offset as u32));
        (self.err)(location, msg);
    }

    fn pos_at(&self, offset: usize) -> Pos {
        self.file.pos(offset as u32)
    }

    /// Move to the next rune. Records line starts as newlines are crossed.
    fn advance(&mut self) {
        if self.ch == Some('\n') {
            self.line_offset = self.rd_offset;
            self.file.add_line(self.rd_offset as u32);
        }
        self.offset = self.rd_offset;
        match self.src[self.rd_offset..].chars().next() {
            Some(c) => {
                self.rd_offset += c.len_utf8();
                self.ch = Some(c);
            }
            None => self.ch = None,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.rd_offset..].chars().next()
    }

    /// Produce the next token.
    pub fn scan(&mut self) -> Scanned {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return tok;
            }

            if self.at_line_start && self.depth == 0 {
                self.begin_line();
                continue;
            }

            self.skip_blanks();

            let Some(ch) = self.ch else {
                if !self.eof_done {
                    self.finish_eof();
                    continue;
                }
                return (self.pos_at(self.src.len()), TokenKind::Eof, String::new());
            };

            if ch == '\n' {
                // only reachable at depth 0
                let pos = self.pos_at(self.offset);
                let insert = can_end_statement(self.prev);
                self.advance();
                self.at_line_start = true;
                if insert {
                    self.prev = TokenKind::Semicolon;
                    return (pos, TokenKind::Semicolon, "\n".to_string());
                }
                continue;
            }

            if let Some(tok) = self.scan_token() {
                return tok;
            }
        }
    }

    /// Skip spaces, tabs and carriage returns. Newlines are only plain
    /// whitespace while inside unclosed brackets.
    fn skip_blanks(&mut self) {
        while let Some(c) = self.ch {
            match c {
                ' ' | '\t' | '\r' => self.advance(),
                '\n' if self.depth > 0 => self.advance(),
                _ => break,
            }
        }
    }

    /// Handle the start of a physical line at depth 0: skip blank and
    /// comment-only lines, then compare the first code line's indentation
    /// column against the indent stack.
    fn begin_line(&mut self) {
        loop {
            let col = self.indent_column();

            match self.ch {
                None => {
                    self.at_line_start = false;
                    return;
                }
                Some('\n') => {
                    // blank line: no layout tokens
                    self.advance();
                    continue;
                }
                _ => {}
            }

            // a line whose only content is comments leaves the indent state
            // untouched
            loop {
                match self.ch {
                    Some('/') if matches!(self.peek(), Some('/') | Some('*')) => {
                        if let Some(tok) = self.scan_token() {
                            self.pending.push_back(tok);
                        }
                    }
                    Some(' ' | '\t' | '\r') => self.advance(),
                    _ => break,
                }
            }
            match self.ch {
                Some('\n') => {
                    self.advance();
                    continue;
                }
                None => {
                    self.at_line_start = false;
                    return;
                }
                _ => {}
            }

            // code follows on this line (possibly after a block comment);
            // the measured column governs it
            self.apply_layout(col);
            self.at_line_start = false;
            return;
        }
    }

    /// Measure the leading-whitespace column of the current line. Tabs
    /// expand to the next multiple of `TAB_WIDTH`.
    fn indent_column(&mut self) -> usize {
        let mut col = 0;
        while let Some(c) = self.ch {
            match c {
                ' ' => col += 1,
                '\t' => col = (col / TAB_WIDTH + 1) * TAB_WIDTH,
                '\r' => {}
                _ => break,
            }
            self.advance();
        }
        col
    }

    fn apply_layout(&mut self, col: usize) {
        let pos = self.pos_at(self.offset);
        let top = *self.indents.last().unwrap();

        if col == top {
            return;
        }
        if col > top {
            self.indents.push(col);
            self.pending
                .push_back((pos, TokenKind::Indent, String::new()));
            return;
        }

        while *self.indents.last().unwrap() > col {
            self.indents.pop();
            self.pending
                .push_back((pos, TokenKind::Dedent, String::new()));
        }
        if *self.indents.last().unwrap() != col {
            self.error(self.offset, "inconsistent indentation");
            // re-align on the unexpected column so following lines scan
            // cleanly
            self.indents.push(col);
            self.pending
                .push_back((pos, TokenKind::Indent, String::new()));
        }
    }

    /// Drain open indent levels, terminate the last declaration, and mark
    /// the stream as finished.
    fn finish_eof(&mut self) {
        let pos = self.pos_at(self.src.len());
        while self.indents.len() > 1 {
            self.indents.pop();
            self.pending
                .push_back((pos, TokenKind::Dedent, String::new()));
        }
        if self.seen_token {
            self.pending
                .push_back((pos, TokenKind::Semicolon, "\n".to_string()));
        }
        self.eof_done = true;
    }

    /// Scan one real token at the current offset. Returns `None` when the
    /// token was a comment that the mode says to skip.
    fn scan_token(&mut self) -> Option<Scanned> {
        let start = self.offset;
        let pos = self.pos_at(start);
        let ch = self.ch.expect("scan_token at EOF");

        let (kind, literal) = if is_letter(ch) {
            let lit = self.scan_identifier();
            (token::lookup(&lit), lit)
        } else if ch.is_ascii_digit() {
            self.scan_number(false)
        } else {
            self.advance();
            match ch {
                '"' => (TokenKind::Str, self.scan_string(start)),
                '\'' => (TokenKind::Char, self.scan_char(start)),
                '`' => (TokenKind::Str, self.scan_raw_string(start)),
                ':' => (self.switch2(TokenKind::Colon, TokenKind::Define), String::new()),
                '.' => {
                    if self.ch.map(|c| c.is_ascii_digit()).unwrap_or(false) {
                        self.scan_number(true)
                    } else if self.ch == Some('.') && self.peek() == Some('.') {
                        self.advance();
                        self.advance();
                        (TokenKind::Ellipsis, String::new())
                    } else {
                        (TokenKind::Period, String::new())
                    }
                }
                ',' => (TokenKind::Comma, String::new()),
                ';' => (TokenKind::Semicolon, ";".to_string()),
                '(' => {
                    self.depth += 1;
                    (TokenKind::LParen, String::new())
                }
                ')' => {
                    self.depth = self.depth.saturating_sub(1);
                    (TokenKind::RParen, String::new())
                }
                '[' => {
                    self.depth += 1;
                    (TokenKind::LBracket, String::new())
                }
                ']' => {
                    self.depth = self.depth.saturating_sub(1);
                    (TokenKind::RBracket, String::new())
                }
                '{' => {
                    self.depth += 1;
                    (TokenKind::LBrace, String::new())
                }
                '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    (TokenKind::RBrace, String::new())
                }
                '+' => (
                    self.switch3(TokenKind::Add, TokenKind::AddAssign, '+', TokenKind::Inc),
                    String::new(),
                ),
                '-' => (
                    self.switch3(TokenKind::Sub, TokenKind::SubAssign, '-', TokenKind::Dec),
                    String::new(),
                ),
                '*' => (self.switch2(TokenKind::Mul, TokenKind::MulAssign), String::new()),
                '/' => {
                    if self.ch == Some('/') || self.ch == Some('*') {
                        let lit = self.scan_comment(start);
                        self.line_directive(&lit, start);

                        // a comment closing a statement's line gets the
                        // inserted semicolon first, so the comment trails
                        // the statement in the token stream
                        let insert_semi = self.depth == 0
                            && can_end_statement(self.prev)
                            && self.rest_of_line_blank();

                        if insert_semi {
                            self.prev = TokenKind::Semicolon;
                            if self.mode & SCAN_COMMENTS != 0 {
                                self.pending.push_back((pos, TokenKind::Comment, lit));
                            }
                            return Some((pos, TokenKind::Semicolon, "\n".to_string()));
                        }
                        if self.mode & SCAN_COMMENTS == 0 {
                            return None;
                        }
                        return Some((pos, TokenKind::Comment, lit));
                    }
                    (self.switch2(TokenKind::Quo, TokenKind::QuoAssign), String::new())
                }
                '%' => (self.switch2(TokenKind::Rem, TokenKind::RemAssign), String::new()),
                '^' => (self.switch2(TokenKind::Xor, TokenKind::XorAssign), String::new()),
                '<' => {
                    if self.ch == Some('-') {
                        self.advance();
                        (TokenKind::Arrow, String::new())
                    } else {
                        (
                            self.switch4(
                                TokenKind::Lss,
                                TokenKind::Leq,
                                '<',
                                TokenKind::Shl,
                                TokenKind::ShlAssign,
                            ),
                            String::new(),
                        )
                    }
                }
                '>' => (
                    self.switch4(
                        TokenKind::Gtr,
                        TokenKind::Geq,
                        '>',
                        TokenKind::Shr,
                        TokenKind::ShrAssign,
                    ),
                    String::new(),
                ),
                '=' => (self.switch2(TokenKind::Assign, TokenKind::Eql), String::new()),
                '!' => (self.switch2(TokenKind::Not, TokenKind::Neq), String::new()),
                '&' => {
                    if self.ch == Some('^') {
                        self.advance();
                        (
                            self.switch2(TokenKind::AndNot, TokenKind::AndNotAssign),
                            String::new(),
                        )
                    } else {
                        (
                            self.switch3(TokenKind::And, TokenKind::AndAssign, '&', TokenKind::LAnd),
                            String::new(),
                        )
                    }
                }
                '|' => (
                    self.switch3(TokenKind::Or, TokenKind::OrAssign, '|', TokenKind::LOr),
                    String::new(),
                ),
                _ => {
                    self.error(start, &format!("illegal character {ch:?}"));
                    (TokenKind::Illegal, ch.to_string())
                }
            }
        };

        self.seen_token = true;
        self.prev = kind;
        Some((pos, kind, literal))
    }

    fn switch2(&mut self, tok0: TokenKind, tok1: TokenKind) -> TokenKind {
        if self.ch == Some('=') {
            self.advance();
            tok1
        } else {
            tok0
        }
    }

    fn switch3(&mut self, tok0: TokenKind, tok1: TokenKind, ch2: char, tok2: TokenKind) -> TokenKind {
        if self.ch == Some('=') {
            self.advance();
            tok1
        } else if self.ch == Some(ch2) {
            self.advance();
            tok2
        } else {
            tok0
        }
    }

    fn switch4(
        &mut self,
        tok0: TokenKind,
        tok1: TokenKind,
        ch2: char,
        tok2: TokenKind,
        tok3: TokenKind,
    ) -> TokenKind {
        if self.ch == Some('=') {
            self.advance();
            tok1
        } else if self.ch == Some(ch2) {
            self.advance();
            if self.ch == Some('=') {
                self.advance();
                tok3
            } else {
                tok2
            }
        } else {
            tok0
        }
    }

    fn scan_identifier(&mut self) -> String {
        let start = self.offset;
        while let Some(c) = self.ch {
            if is_letter(c) || c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        self.src[start..self.offset].to_string()
    }

    fn scan_digits(&mut self, radix: u32) {
        while let Some(c) = self.ch {
            if c.is_digit(radix) || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scan an integer, float, or imaginary literal. `seen_dot` is true when
    /// the caller already consumed a leading `.` followed by a digit.
    fn scan_number(&mut self, seen_dot: bool) -> (TokenKind, String) {
        let start = if seen_dot { self.offset - 1 } else { self.offset };
        let mut kind = TokenKind::Int;

        if seen_dot {
            kind = TokenKind::Float;
            self.scan_digits(10);
        } else if self.ch == Some('0') {
            self.advance();
            match self.ch {
                Some('x') | Some('X') => {
                    self.advance();
                    let before = self.offset;
                    self.scan_digits(16);
                    if self.offset == before {
                        self.error(start, "hexadecimal literal has no digits");
                    }
                }
                Some('b') | Some('B') => {
                    self.advance();
                    self.scan_digits(2);
                }
                Some('o') | Some('O') => {
                    self.advance();
                    self.scan_digits(8);
                }
                _ => {
                    // octal by leading zero, but may turn out to be a float
                    self.scan_digits(10);
                }
            }
        } else {
            self.scan_digits(10);
        }

        if self.ch == Some('.') && !seen_dot {
            kind = TokenKind::Float;
            self.advance();
            self.scan_digits(10);
        }

        if let Some('e' | 'E') = self.ch {
            kind = TokenKind::Float;
            self.advance();
            if let Some('+' | '-') = self.ch {
                self.advance();
            }
            let before = self.offset;
            self.scan_digits(10);
            if self.offset == before {
                self.error(start, "exponent has no digits");
            }
        }

        if self.ch == Some('i') {
            kind = TokenKind::Imag;
            self.advance();
        }

        (kind, self.src[start..self.offset].to_string())
    }

    /// Scan one escape sequence after a consumed backslash. `quote` is the
    /// closing delimiter of the surrounding literal.
    fn scan_escape(&mut self, quote: char) {
        let start = self.offset;
        let (n, radix) = match self.ch {
            Some(c) if c == quote => {
                self.advance();
                return;
            }
            Some('a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\') => {
                self.advance();
                return;
            }
            Some('0'..='7') => (3, 8),
            Some('x') => {
                self.advance();
                (2, 16)
            }
            Some('u') => {
                self.advance();
                (4, 16)
            }
            Some('U') => {
                self.advance();
                (8, 16)
            }
            _ => {
                self.error(start, "unknown escape sequence");
                return;
            }
        };

        for _ in 0..n {
            match self.ch {
                Some(c) if c.is_digit(radix) => self.advance(),
                _ => {
                    self.error(self.offset, "invalid digit in escape sequence");
                    return;
                }
            }
        }
    }

    fn scan_string(&mut self, start: usize) -> String {
        loop {
            match self.ch {
                None | Some('\n') => {
                    self.error(start, "string literal not terminated");
                    break;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.scan_escape('"');
                }
                Some(_) => self.advance(),
            }
        }
        self.src[start..self.offset].to_string()
    }

    fn scan_raw_string(&mut self, start: usize) -> String {
        loop {
            match self.ch {
                None => {
                    self.error(start, "raw string literal not terminated");
                    break;
                }
                Some('`') => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }
        self.src[start..self.offset].to_string()
    }

    fn scan_char(&mut self, start: usize) -> String {
        let mut n = 0;
        loop {
            match self.ch {
                None | Some('\n') => {
                    self.error(start, "character literal not terminated");
                    break;
                }
                Some('\'') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.scan_escape('\'');
                    n += 1;
                }
                Some(_) => {
                    self.advance();
                    n += 1;
                }
            }
        }
        if n != 1 {
            self.error(start, "illegal character literal");
        }
        self.src[start..self.offset].to_string()
    }

    fn scan_comment(&mut self, start: usize) -> String {
        // the leading '/' is consumed; self.ch is '/' or '*'
        if self.ch == Some('/') {
            while let Some(c) = self.ch {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
        } else {
            self.advance(); // consume '*'
            let mut terminated = false;
            while let Some(c) = self.ch {
                self.advance();
                if c == '*' && self.ch == Some('/') {
                    self.advance();
                    terminated = true;
                    break;
                }
            }
            if !terminated {
                self.error(start, "comment not terminated");
            }
        }
        self.src[start..self.offset].to_string()
    }

    /// Whether only blanks remain between the cursor and the end of the
    /// physical line.
    fn rest_of_line_blank(&self) -> bool {
        let mut rest = self.src[self.offset..].chars();
        loop {
            match rest.next() {
                None | Some('\n') => return true,
                Some(' ' | '\t' | '\r') => {}
                Some(_) => return false,
            }
        }
    }

    /// Recognize `//line filename:line` directives and install the
    /// corresponding position override for the following line.
    fn line_directive(&mut self, literal: &str, start: usize) {
        let Some(rest) = literal.strip_prefix("//line ") else {
            return;
        };
        // the directive must be the first token of its line
        if start != self.line_offset {
            return;
        }
        let Some((filename, line)) = rest.trim_end().rsplit_once(':') else {
            return;
        };
        if let Ok(line) = line.parse::<usize>() {
            if line > 0 {
                // effective at the start of the next line, which then
                // resolves as `line`
                self.file
                    .add_line_info(self.rd_offset as u32, filename.to_string(), line);
            }
        }
    }
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Whether a token may end a statement, making a following newline act as a
/// terminator.
fn can_end_statement(tok: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        tok,
        Ident
            | Int
            | Float
            | Imag
            | Char
            | Str
            | RParen
            | RBracket
            | RBrace
            | Break
            | Continue
            | Fallthrough
            | Return
            | Inc
            | Dec
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorList;
    use crate::token::FileSet;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn scan_all(src: &str, mode: u32) -> (Vec<(TokenKind, String)>, ErrorList) {
        let fset = FileSet::new();
        let file = fset.add_file("test.igo", None, src.len() as u32);
        let errors = Rc::new(RefCell::new(ErrorList::new()));
        let sink = Rc::clone(&errors);
        let mut s = Scanner::new(
            file,
            src,
            Box::new(move |loc, msg| sink.borrow_mut().add(loc, msg)),
            mode,
        );

        let mut out = Vec::new();
        loop {
            let (_, kind, lit) = s.scan();
            if kind == TokenKind::Eof {
                break;
            }
            out.push((kind, lit));
        }
        let errors = errors.borrow().clone();
        (out, errors)
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        scan_all(src, 0).0.into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn flat_statements_get_semicolons() {
        use TokenKind::*;
        assert_eq!(
            kinds("x = 1\ny = 2\n"),
            vec![Ident, Assign, Int, Semicolon, Ident, Assign, Int, Semicolon]
        );
    }

    #[test]
    fn indent_and_dedent_around_block() {
        use TokenKind::*;
        let src = "func f()\n\treturn 1\n";
        assert_eq!(
            kinds(src),
            vec![
                Func, Ident, LParen, RParen, Semicolon, Indent, Return, Int, Semicolon, Dedent,
                Semicolon,
            ]
        );
    }

    #[test]
    fn eof_drains_open_levels() {
        use TokenKind::*;
        let src = "func f()\n\tif x\n\t\tg()";
        let toks = kinds(src);
        let dedents = toks.iter().filter(|k| **k == Dedent).count();
        assert_eq!(dedents, 2);
        assert_eq!(toks.last(), Some(&Semicolon));
    }

    #[test]
    fn no_layout_inside_parens() {
        use TokenKind::*;
        let src = "f(\n\t1,\n\t2,\n)\n";
        assert_eq!(
            kinds(src),
            vec![Ident, LParen, Int, Comma, Int, Comma, RParen, Semicolon]
        );
    }

    #[test]
    fn blank_and_comment_lines_keep_state() {
        use TokenKind::*;
        let src = "func f()\n\tx = 1\n\n\t// note\n\ty = 2\n";
        let toks = kinds(src);
        // exactly one indent/dedent pair despite the interior lines
        assert_eq!(toks.iter().filter(|k| **k == Indent).count(), 1);
        assert_eq!(toks.iter().filter(|k| **k == Dedent).count(), 1);
    }

    #[test]
    fn comments_emitted_on_request() {
        use TokenKind::*;
        let src = "x = 1 // trailing\n";
        // the inserted semicolon precedes the trailing comment, so the
        // comment visibly trails the terminated statement
        let (toks, _) = scan_all(src, SCAN_COMMENTS);
        assert_eq!(
            toks.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            vec![Ident, Assign, Int, Semicolon, Comment]
        );
        assert_eq!(toks[4].1, "// trailing");

        let (toks, _) = scan_all(src, 0);
        assert!(toks.iter().all(|(k, _)| *k != Comment));
        assert_eq!(
            toks.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            vec![Ident, Assign, Int, Semicolon]
        );
    }

    #[test]
    fn inconsistent_indentation_reports_error() {
        let src = "func f()\n\t\tx = 1\n\ty = 2\n";
        let (_, errors) = scan_all(src, 0);
        assert_eq!(errors.len(), 1);
        assert!(errors.iter().next().unwrap().message.contains("indentation"));
    }

    #[test]
    fn literals() {
        use TokenKind::*;
        let (toks, errors) = scan_all("0x2a 3.14 1e9 2i 'x' \"s\\n\" `raw`\n", 0);
        assert!(errors.is_empty());
        assert_eq!(
            toks.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            vec![Int, Float, Float, Imag, Char, Str, Str, Semicolon]
        );
        assert_eq!(toks[0].1, "0x2a");
        assert_eq!(toks[5].1, "\"s\\n\"");
    }

    #[test]
    fn unterminated_string_recovers() {
        let (toks, errors) = scan_all("x = \"oops\ny = 1\n", 0);
        assert_eq!(errors.len(), 1);
        // scanning continued on the next line
        assert!(toks.iter().any(|(k, l)| *k == TokenKind::Ident && l == "y"));
    }

    #[test]
    fn operators_compose() {
        use TokenKind::*;
        assert_eq!(
            kinds("a &^= b << 2\n"),
            vec![Ident, AndNotAssign, Ident, Shl, Int, Semicolon]
        );
        assert_eq!(kinds("c <- v\n"), vec![Ident, Arrow, Ident, Semicolon]);
        assert_eq!(kinds("i++\n"), vec![Ident, Inc, Semicolon]);
    }

    #[test]
    fn line_directive_remaps_positions() {
        let fset = FileSet::new();
        let src = "//line lib.igo:100\nx = 1\n";
        let file = fset.add_file("gen.igo", None, src.len() as u32);
        let mut s = Scanner::new(Arc::clone(&file), src, Box::new(|_, _| {}), 0);
        loop {
            let (pos, kind, _) = s.scan();
            if kind == TokenKind::Ident {
                let loc = file.position(pos);
                assert_eq!(loc.filename, "lib.igo");
                assert_eq!(loc.line, 100);
            }
            if kind == TokenKind::Eof {
                break;
            }
        }
    }
}
