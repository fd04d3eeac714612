//! Recursive-descent parser for the indented form.
//!
//! The parser consumes the scanner's layout-normalized token stream and
//! produces a fully scoped [`SourceFile`]: identifiers are declared and
//! resolved as the tree is built, lead and line comments are attached to the
//! declarations they belong to, and syntax errors are recovered from at
//! curated anchor tokens so a single mistake does not take the rest of the
//! file down with it.

mod declaration;
mod expression;
mod statement;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use log::trace;

use crate::ast::{
    Binding, Comment, CommentGroup, DeclRef, Ident, ObjKind, Object, Scope, SharedScope,
    SourceFile,
};
use crate::error::ErrorList;
use crate::scanner::{Scanned, Scanner, SCAN_COMMENTS};
use crate::token::{File, FileSet, Pos, TokenKind};

/// Retain comments in the AST.
pub const PARSE_COMMENTS: u32 = 1 << 0;
/// Emit a trace of parsed productions through the `log` facade.
pub const TRACE: u32 = 1 << 1;
/// Report declaration errors (redeclarations, undefined labels).
pub const DECLARATION_ERRORS: u32 = 1 << 2;
/// Report all errors: no per-line deduplication, no 10-error cap.
pub const ALL_ERRORS: u32 = 1 << 3;
/// Stop parsing after the package clause.
pub const PACKAGE_CLAUSE_ONLY: u32 = 1 << 4;
/// Stop parsing after the import declarations.
pub const IMPORTS_ONLY: u32 = 1 << 5;

/// Errors tolerated before the parser bails out (without `ALL_ERRORS`).
const ERROR_CAP: usize = 10;

/// Parse one source file in indented form.
///
/// Returns the file (possibly partial, when error recovery succeeded) and
/// every collected diagnostic, sorted by position. The file is `None` only
/// when the error cap triggered a bailout.
pub fn parse_file(
    fset: &FileSet,
    filename: &str,
    src: &str,
    mode: u32,
) -> (Option<SourceFile>, ErrorList) {
    let file = fset.add_file(filename, None, src.len() as u32);
    let errors = Rc::new(RefCell::new(ErrorList::new()));

    let mut parser = Parser::new(Arc::clone(&file), src, Rc::clone(&errors), mode);
    let parsed = parser.parse_source_file();

    let mut errors = errors.borrow().clone();
    errors.sort();
    if mode & ALL_ERRORS == 0 {
        errors.remove_multiples();
    }
    (parsed, errors)
}

pub(crate) struct Parser<'a> {
    file: Arc<File>,
    scanner: Scanner<'a>,
    errors: Rc<RefCell<ErrorList>>,
    mode: u32,

    // current token
    pub(crate) pos: Pos,
    pub(crate) tok: TokenKind,
    pub(crate) lit: String,
    // previous token; the layout grammar frequently asks what came before
    pub(crate) ptok: TokenKind,
    pub(crate) prev_pos: Pos,

    // one-token pushback used where the grammar needs to see past an
    // inserted semicolon
    peeked: Option<Scanned>,

    // comment bookkeeping
    comments: Vec<CommentGroup>,
    pub(crate) lead_comment: Option<CommentGroup>,
    pub(crate) line_comment: Option<CommentGroup>,

    // scoping
    pub(crate) top_scope: SharedScope,
    pub(crate) pkg_scope: SharedScope,
    pub(crate) unresolved: Vec<Rc<Ident>>,
    label_scope: Option<SharedScope>,
    targets: Vec<Vec<Rc<Ident>>>,

    // error recovery
    sync_pos: Pos,
    sync_cnt: u32,
    pub(crate) bailout: bool,

    trace_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(file: Arc<File>, src: &'a str, errors: Rc<RefCell<ErrorList>>, mode: u32) -> Parser<'a> {
        let sink = Rc::clone(&errors);
        let scanner = Scanner::new(
            Arc::clone(&file),
            src,
            Box::new(move |loc, msg| sink.borrow_mut().add(loc, msg)),
            SCAN_COMMENTS,
        );

        let pkg_scope = Scope::new(None);
        let mut p = Parser {
            file,
            scanner,
            errors,
            mode,
            pos: Pos::NONE,
            tok: TokenKind::Illegal,
            lit: String::new(),
            ptok: TokenKind::Illegal,
            prev_pos: Pos::NONE,
            peeked: None,
            comments: Vec::new(),
            lead_comment: None,
            line_comment: None,
            top_scope: Rc::clone(&pkg_scope),
            pkg_scope,
            unresolved: Vec::new(),
            label_scope: None,
            targets: Vec::new(),
            sync_pos: Pos::NONE,
            sync_cnt: 0,
            bailout: false,
            trace_depth: 0,
        };
        p.next();
        p
    }

    // ----- token stream ---------------------------------------------------

    fn next0(&mut self) {
        self.ptok = self.tok;
        self.prev_pos = self.pos;
        let (pos, tok, lit) = match self.peeked.take() {
            Some(t) => t,
            None => self.scanner.scan(),
        };
        self.pos = pos;
        self.tok = tok;
        self.lit = lit;
    }

    /// The kind of the token after the current one, without consuming
    /// anything.
    pub(crate) fn peek(&mut self) -> TokenKind {
        if self.peeked.is_none() {
            self.peeked = Some(self.scanner.scan());
        }
        self.peeked.as_ref().map(|(_, tok, _)| *tok).unwrap()
    }

    fn consume_comment(&mut self) -> (Comment, usize) {
        let mut endline = self.file.line(self.pos);
        if self.lit.as_bytes().get(1) == Some(&b'*') {
            endline += self.lit.matches('\n').count();
        }
        let comment = Comment {
            slash: self.pos,
            text: self.lit.clone(),
        };
        self.next0();
        (comment, endline)
    }

    /// Collect a group of adjacent comments: successive comments at most `n`
    /// lines apart, with no interposed tokens.
    fn consume_comment_group(&mut self, n: usize) -> (CommentGroup, usize) {
        let mut list = Vec::new();
        let mut endline = self.file.line(self.pos);
        while self.tok == TokenKind::Comment && self.file.line(self.pos) <= endline + n {
            let (comment, el) = self.consume_comment();
            endline = el;
            list.push(comment);
        }
        let group = CommentGroup { list };
        if self.mode & PARSE_COMMENTS != 0 {
            self.comments.push(group.clone());
        }
        (group, endline)
    }

    /// Advance past comments, classifying them as lead or line comments of
    /// the surrounding tokens.
    pub(crate) fn next(&mut self) {
        self.lead_comment = None;
        self.line_comment = None;
        let prev = self.pos;
        self.next0();

        if self.tok == TokenKind::Comment {
            if prev.is_valid() && self.file.line(self.pos) == self.file.line(prev) {
                // the comment starts on the same line as the previous token;
                // if the next token is on a different line it trails that
                // token
                let (group, endline) = self.consume_comment_group(0);
                if self.file.line(self.pos) != endline {
                    self.line_comment = Some(group);
                }
            }

            // only a group ending immediately above the next token leads it
            let mut last = None;
            while self.tok == TokenKind::Comment {
                last = Some(self.consume_comment_group(1));
            }
            if let Some((group, endline)) = last {
                if endline + 1 == self.file.line(self.pos) {
                    self.lead_comment = Some(group);
                }
            }
        }
    }

    // ----- diagnostics ----------------------------------------------------

    pub(crate) fn error(&mut self, pos: Pos, msg: impl Into<String>) {
        let location = self.file.position(pos);
        let mut errors = self.errors.borrow_mut();

        if self.mode & ALL_ERRORS == 0 {
            // discard errors reported on the same line as the last one; they
            // are usually knock-on effects
            if let Some(last) = errors.iter().last() {
                if last.location.line == location.line {
                    return;
                }
            }
            if errors.len() >= ERROR_CAP {
                self.bailout = true;
                return;
            }
        }
        errors.add(location, msg.into());
    }

    pub(crate) fn error_expected(&mut self, pos: Pos, what: &str) {
        let mut msg = format!("expected {what}");
        if pos == self.pos {
            // make the error more specific
            if self.tok == TokenKind::Semicolon && self.lit == "\n" {
                msg += ", found newline";
            } else if self.tok.is_literal() {
                msg += &format!(", found '{}' {}", self.tok, self.lit);
            } else {
                msg += &format!(", found '{}'", self.tok);
            }
        }
        self.error(pos, msg);
    }

    pub(crate) fn expect(&mut self, tok: TokenKind) -> Pos {
        let pos = self.pos;
        if self.tok != tok {
            self.error_expected(pos, &format!("'{tok}'"));
        }
        self.next();
        pos
    }

    /// Consume a statement terminator. A `Dedent`, closing bracket, or EOF
    /// terminates implicitly, as does a just-consumed `Dedent`, semicolon,
    /// or comment. The trailing keyword of an empty `struct`/`interface`
    /// body also ends its line without a terminator of its own.
    pub(crate) fn expect_semi(&mut self) {
        match self.tok {
            TokenKind::Semicolon => self.next(),
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Dedent | TokenKind::Eof => {}
            _ if matches!(
                self.ptok,
                TokenKind::Semicolon
                    | TokenKind::Dedent
                    | TokenKind::Comment
                    | TokenKind::Struct
                    | TokenKind::Interface
            ) => {}
            _ => {
                self.error_expected(self.pos, "';'");
                self.sync_stmt();
            }
        }
    }

    pub(crate) fn at_comma(&mut self, context: &str, follow: TokenKind) -> bool {
        if self.tok == TokenKind::Comma {
            return true;
        }
        if self.tok != follow {
            let mut msg = "missing ','".to_string();
            if self.tok == TokenKind::Semicolon && self.lit == "\n" {
                msg += " before newline";
            }
            let pos = self.pos;
            self.error(pos, format!("{msg} in {context}"));
            return true; // sync: treat as if the comma were present
        }
        false
    }

    /// Clamp `pos` into the file's range; bad nodes built during recovery
    /// must not carry positions past EOF.
    pub(crate) fn safe_pos(&self, pos: Pos) -> Pos {
        let max = self.file.pos(self.file.size());
        if pos > max {
            max
        } else {
            pos
        }
    }

    // ----- tracing --------------------------------------------------------

    pub(crate) fn trace_begin(&mut self, name: &str) {
        if self.mode & TRACE != 0 {
            trace!("{:1$}{name} (", "", self.trace_depth * 2);
            self.trace_depth += 1;
        }
    }

    pub(crate) fn trace_end(&mut self) {
        if self.mode & TRACE != 0 {
            self.trace_depth = self.trace_depth.saturating_sub(1);
            trace!("{:1$})", "", self.trace_depth * 2);
        }
    }

    // ----- scopes and resolution -----------------------------------------

    pub(crate) fn open_scope(&mut self) {
        self.top_scope = Scope::new(Some(Rc::clone(&self.top_scope)));
    }

    pub(crate) fn close_scope(&mut self) {
        let outer = self.top_scope.borrow().outer.clone();
        self.top_scope = outer.expect("cannot close package scope");
    }

    pub(crate) fn open_label_scope(&mut self) {
        self.label_scope = Some(Scope::new(self.label_scope.take()));
        self.targets.push(Vec::new());
    }

    pub(crate) fn close_label_scope(&mut self) {
        let scope = self.label_scope.take().expect("no open label scope");
        // resolve forward-referenced labels against this scope
        if let Some(targets) = self.targets.pop() {
            for ident in targets {
                match scope.borrow().lookup(&ident.name) {
                    Some(obj) => *ident.obj.borrow_mut() = Binding::Resolved(obj),
                    None => {
                        if self.mode & DECLARATION_ERRORS != 0 {
                            let pos = ident.pos();
                            let name = ident.name.clone();
                            self.error(pos, format!("label {name} undefined"));
                        }
                    }
                }
            }
        }
        self.label_scope = scope.borrow().outer.clone();
    }

    /// Declare `idents` in `scope`, pointing each at a fresh object. On
    /// collision the identifier is left pointing at its new object but the
    /// scope keeps the original, and a redeclaration error is reported.
    pub(crate) fn declare(
        &mut self,
        decl: DeclRef,
        data: Option<usize>,
        scope: &SharedScope,
        kind: ObjKind,
        idents: &[Rc<Ident>],
    ) {
        for ident in idents {
            if !matches!(*ident.obj.borrow(), Binding::Unbound) {
                // internal invariant: each identifier is declared once
                let pos = ident.pos();
                self.error(pos, "internal error: identifier already declared or resolved");
                continue;
            }

            let obj = Object::new(kind, ident.name.clone());
            *obj.decl.borrow_mut() = decl.clone();
            obj.data.set(data);
            *ident.obj.borrow_mut() = Binding::Resolved(Rc::clone(&obj));

            if ident.is_blank() {
                continue;
            }
            if let Some(alt) = scope.borrow_mut().insert(obj) {
                if self.mode & DECLARATION_ERRORS != 0 {
                    let prev = match alt.pos() {
                        p if p.is_valid() => {
                            format!("\n\tprevious declaration at {}", self.file.position(p))
                        }
                        _ => String::new(),
                    };
                    let pos = ident.pos();
                    let name = ident.name.clone();
                    self.error(pos, format!("{name} redeclared in this block{prev}"));
                }
            }
        }
    }

    /// Declare the new variables of a `:=`; identifiers already declared in
    /// the current scope re-bind to their existing object.
    pub(crate) fn short_var_decl(&mut self, decl: DeclRef, list: &[crate::ast::Expr]) {
        let mut new_vars = 0;
        for x in list {
            match x {
                crate::ast::Expr::Ident(ident) => {
                    let obj = Object::new(ObjKind::Var, ident.name.clone());
                    *obj.decl.borrow_mut() = decl.clone();
                    *ident.obj.borrow_mut() = Binding::Resolved(Rc::clone(&obj));
                    if !ident.is_blank() {
                        match self.top_scope.borrow_mut().insert(obj) {
                            Some(alt) => *ident.obj.borrow_mut() = Binding::Resolved(alt),
                            None => new_vars += 1,
                        }
                    }
                }
                _ => {
                    let pos = x.pos();
                    self.error_expected(pos, "identifier on left side of ':='");
                }
            }
        }
        if new_vars == 0 && self.mode & DECLARATION_ERRORS != 0 {
            if let Some(first) = list.first() {
                let pos = first.pos();
                self.error(pos, "no new variables on left side of ':='");
            }
        }
    }

    /// Resolve an identifier against the open scopes. On a miss the
    /// identifier is marked unresolved and queued for the end-of-file pass
    /// (when `collect` is set).
    pub(crate) fn try_resolve(&mut self, x: &crate::ast::Expr, collect: bool) {
        let crate::ast::Expr::Ident(ident) = x else {
            return;
        };
        if !matches!(*ident.obj.borrow(), Binding::Unbound) {
            self.error(
                ident.pos(),
                "internal error: identifier already declared or resolved",
            );
            return;
        }
        if ident.is_blank() {
            return;
        }

        let mut scope = Some(Rc::clone(&self.top_scope));
        while let Some(s) = scope {
            if let Some(obj) = s.borrow().lookup(&ident.name) {
                *ident.obj.borrow_mut() = Binding::Resolved(obj);
                return;
            }
            scope = s.borrow().outer.clone();
        }

        if collect {
            *ident.obj.borrow_mut() = Binding::Unresolved;
            self.unresolved.push(Rc::clone(ident));
        }
    }

    pub(crate) fn resolve(&mut self, x: &crate::ast::Expr) {
        self.try_resolve(x, true);
    }

    /// Resolve an identifier whose resolution was deferred and never caught
    /// up with; anything already bound is left alone.
    pub(crate) fn resolve_if_unbound(&mut self, x: &crate::ast::Expr) {
        if let crate::ast::Expr::Ident(ident) = x {
            if matches!(*ident.obj.borrow(), Binding::Unbound) {
                self.resolve(x);
            }
        }
    }

    pub(crate) fn label_scope_handle(&self) -> Option<SharedScope> {
        self.label_scope.clone()
    }

    pub(crate) fn file_line(&self, pos: Pos) -> usize {
        self.file.line(pos)
    }

    /// Remember a branch target for resolution when the enclosing label
    /// scope closes.
    pub(crate) fn add_target(&mut self, label: &Rc<Ident>) {
        if let Some(targets) = self.targets.last_mut() {
            targets.push(Rc::clone(label));
        }
    }

    // ----- error recovery -------------------------------------------------

    /// Advance to the next statement anchor. The no-progress counter forces
    /// consumption of one token after ten fruitless syncs at one position.
    pub(crate) fn sync_stmt(&mut self) {
        use TokenKind::*;
        loop {
            match self.tok {
                Break | Const | Continue | Defer | Fallthrough | For | Go | Goto | If | Return
                | Select | Switch | Type | Var => {
                    if self.pos == self.sync_pos && self.sync_cnt < 10 {
                        self.sync_cnt += 1;
                        return;
                    }
                    if self.pos > self.sync_pos {
                        self.sync_pos = self.pos;
                        self.sync_cnt = 0;
                        return;
                    }
                }
                Eof => return,
                _ => {}
            }
            if self.bailout {
                return;
            }
            self.next();
        }
    }

    /// Advance to the next declaration anchor.
    pub(crate) fn sync_decl(&mut self) {
        use TokenKind::*;
        loop {
            match self.tok {
                Const | Type | Var | Func | Import => {
                    if self.pos == self.sync_pos && self.sync_cnt < 10 {
                        self.sync_cnt += 1;
                        return;
                    }
                    if self.pos > self.sync_pos {
                        self.sync_pos = self.pos;
                        self.sync_cnt = 0;
                        return;
                    }
                }
                Eof => return,
                _ => {}
            }
            if self.bailout {
                return;
            }
            self.next();
        }
    }

    // ----- file -----------------------------------------------------------

    fn parse_source_file(&mut self) -> Option<SourceFile> {
        self.trace_begin("File");

        let doc = self.lead_comment.take();
        let package_pos = self.expect(TokenKind::Package);
        let name = self.parse_ident();
        if name.name == "_" {
            let pos = name.pos();
            self.error(pos, "invalid package name _");
        }
        self.expect_semi();

        let mut decls = Vec::new();
        if self.mode & PACKAGE_CLAUSE_ONLY == 0 {
            // import declarations first; the scanner's final semicolon (and
            // any other stray one) is not a declaration
            while !self.bailout {
                match self.tok {
                    TokenKind::Semicolon => self.next(),
                    TokenKind::Import => decls.push(self.parse_gen_decl(TokenKind::Import)),
                    _ => break,
                }
            }

            if self.mode & IMPORTS_ONLY == 0 {
                while self.tok != TokenKind::Eof && !self.bailout {
                    if self.tok == TokenKind::Semicolon {
                        self.next();
                        continue;
                    }
                    decls.push(self.parse_decl());
                }
            }
        }

        if self.bailout {
            self.trace_end();
            return None;
        }

        // resolve what the package scope can now answer
        let mut still_unresolved = Vec::new();
        for ident in self.unresolved.drain(..) {
            debug_assert!(ident.obj.borrow().is_unresolved());
            match self.pkg_scope.borrow().lookup(&ident.name) {
                Some(obj) => *ident.obj.borrow_mut() = Binding::Resolved(obj),
                None => still_unresolved.push(ident),
            }
        }

        self.trace_end();
        Some(SourceFile {
            doc,
            package_pos,
            name,
            decls,
            scope: Rc::clone(&self.pkg_scope),
            unresolved: still_unresolved,
            comments: std::mem::take(&mut self.comments),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Decl, Expr, Spec, Stmt};

    fn parse(src: &str, mode: u32) -> (Option<SourceFile>, ErrorList) {
        let fset = FileSet::new();
        parse_file(&fset, "test.igo", src, mode)
    }

    fn parse_ok(src: &str) -> SourceFile {
        let (file, errors) = parse(src, PARSE_COMMENTS | DECLARATION_ERRORS);
        assert!(errors.is_empty(), "unexpected errors: {errors}");
        file.expect("no bailout expected")
    }

    fn only_func(file: &SourceFile) -> &crate::ast::FuncDecl {
        file.decls
            .iter()
            .find_map(|d| match d {
                Decl::Func(f) => Some(f),
                _ => None,
            })
            .expect("expected a function declaration")
    }

    #[test]
    fn simple_file() {
        let file = parse_ok("package main\n\nfunc main()\n\tx := 1\n\tprint(x)\n");
        assert_eq!(file.name.name, "main");
        let func = only_func(&file);
        assert_eq!(func.name.name, "main");
        let body = func.body.as_ref().unwrap();
        assert!(!body.small);
        assert_eq!(body.list.len(), 2);
        // `print` is not declared anywhere: it survives as unresolved
        assert_eq!(file.unresolved.len(), 1);
        assert_eq!(file.unresolved[0].name, "print");
    }

    #[test]
    fn short_form_block() {
        let file = parse_ok("package p\n\nfunc f(x int) int\n\tif x > 0: return 1\n\treturn 0\n");
        let func = only_func(&file);
        let body = func.body.as_ref().unwrap();
        let Stmt::If(if_stmt) = &body.list[0] else {
            panic!("expected if statement");
        };
        assert!(if_stmt.body.small);
        assert_eq!(if_stmt.body.list.len(), 1);
        assert!(matches!(if_stmt.body.list[0], Stmt::Return(_)));
        assert!(if_stmt.els.is_none());
        assert!(if_stmt.body.opening < if_stmt.body.closing);
    }

    #[test]
    fn do_sugar_appends_callback() {
        let file = parse_ok("package p\n\nfunc g()\n\tf(1, 2) do (x int): return x * 2\n");
        let func = only_func(&file);
        let body = func.body.as_ref().unwrap();
        let Stmt::Expr(expr) = &body.list[0] else {
            panic!("expected expression statement");
        };
        let Expr::Call(call) = &expr.x else {
            panic!("expected call expression");
        };
        assert_eq!(call.args.len(), 3);
        let Expr::FuncLit(lit) = &call.args[2] else {
            panic!("expected trailing function literal");
        };
        assert_eq!(lit.typ.params.list.len(), 1);
        assert!(lit.body.small);
    }

    #[test]
    fn method_receiver_declares_self() {
        let file =
            parse_ok("package p\n\ntype MyType struct\n\nfunc MyType.foo(n int) int: return n\n");
        let func = only_func(&file);
        let recv = func.recv.as_ref().expect("expected a receiver");
        assert_eq!(recv.list[0].names[0].name, "self");
        let Expr::Ident(base) = &recv.list[0].typ else {
            panic!("expected plain receiver type");
        };
        assert_eq!(base.name, "MyType");
        // the receiver type resolved against the package scope
        assert!(base.obj.borrow().object().is_some());
        assert_eq!(func.name.name, "foo");
    }

    #[test]
    fn pointer_receiver() {
        let file = parse_ok("package p\n\ntype T struct\n\nfunc *T.reset():\n");
        let func = only_func(&file);
        let recv = func.recv.as_ref().unwrap();
        assert!(matches!(recv.list[0].typ, Expr::Star(_)));
    }

    #[test]
    fn redeclaration_reports_previous_position() {
        let (_, errors) = parse(
            "package p\n\nvar x int\nvar x string\n",
            DECLARATION_ERRORS,
        );
        assert_eq!(errors.len(), 1);
        let err = errors.iter().next().unwrap();
        assert!(err.message.contains("x redeclared in this block"));
        assert!(err.message.contains("previous declaration at"));
    }

    #[test]
    fn error_cap_triggers_bailout() {
        let mut src = String::from("package p\n");
        for _ in 0..50 {
            src.push_str("var +\n");
        }
        let (file, errors) = parse(&src, 0);
        assert!(file.is_none(), "bailout should drop the file");
        assert!(!errors.is_empty());
        assert!(errors.len() <= 10);
    }

    #[test]
    fn all_errors_lifts_the_cap() {
        let mut src = String::from("package p\n");
        for _ in 0..20 {
            src.push_str("var +\n");
        }
        let (file, errors) = parse(&src, ALL_ERRORS);
        assert!(file.is_some());
        assert!(errors.len() > 10);
    }

    #[test]
    fn parenthesized_continuation() {
        let file = parse_ok("package p\n\nfunc h()\n\tf(\n\t\t1,\n\t\t2,\n\t)\n");
        let func = only_func(&file);
        let Stmt::Expr(expr) = &func.body.as_ref().unwrap().list[0] else {
            panic!("expected expression statement");
        };
        let Expr::Call(call) = &expr.x else {
            panic!("expected call");
        };
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn grouped_declarations_carry_layout_parens() {
        let file = parse_ok("package p\n\nconst\n\ta = 1\n\tb = 2\n");
        let Decl::Gen(gen) = &file.decls[0] else {
            panic!("expected gen decl");
        };
        assert!(gen.is_group());
        assert_eq!(gen.specs.len(), 2);
        // iota indices recorded on the constant objects
        let Spec::Value(spec) = &gen.specs[1] else {
            panic!("expected value spec");
        };
        let obj = spec.names[0].obj.borrow().object().unwrap();
        assert_eq!(obj.data.get(), Some(1));
    }

    #[test]
    fn lead_and_line_comments_attach() {
        let file = parse_ok(
            "package p\n\n// Foo does things.\nfunc Foo()\n\tx := 1 // trailing\n\tprint(x)\n",
        );
        let func = only_func(&file);
        let doc = func.doc.as_ref().expect("expected doc comment");
        assert_eq!(doc.list[0].text, "// Foo does things.");
        assert_eq!(file.comments.len(), 2);
        // comment groups stay sorted by position
        assert!(file.comments[0].pos() < file.comments[1].pos());
    }

    #[test]
    fn labels_resolve_within_function() {
        let file = parse_ok("package p\n\nfunc loopy()\n\tloop: for true\n\t\tbreak loop\n");
        let func = only_func(&file);
        let Stmt::Labeled(labeled) = &func.body.as_ref().unwrap().list[0] else {
            panic!("expected labeled statement");
        };
        assert_eq!(labeled.label.name, "loop");
    }

    #[test]
    fn undefined_label_reported() {
        let (_, errors) = parse(
            "package p\n\nfunc f()\n\tfor true\n\t\tbreak missing\n",
            DECLARATION_ERRORS,
        );
        assert_eq!(errors.len(), 1);
        assert!(errors.iter().next().unwrap().message.contains("label missing undefined"));
    }

    #[test]
    fn type_switch_guard() {
        let file = parse_ok(
            "package p\n\nfunc classify(v interface)\n\tswitch x := v.(type)\n\t\tcase int\n\t\t\tprint(x)\n\t\tdefault: return\n",
        );
        let func = only_func(&file);
        let Stmt::TypeSwitch(sw) = &func.body.as_ref().unwrap().list[0] else {
            panic!("expected type switch");
        };
        assert_eq!(sw.body.list.len(), 2);
    }

    #[test]
    fn select_statement() {
        let file = parse_ok(
            "package p\n\nfunc wait(a chan int, b chan int)\n\tselect\n\t\tcase v := <-a\n\t\t\tprint(v)\n\t\tcase b <- 1: return\n\t\tdefault: return\n",
        );
        let func = only_func(&file);
        let Stmt::Select(sel) = &func.body.as_ref().unwrap().list[0] else {
            panic!("expected select");
        };
        assert_eq!(sel.body.list.len(), 3);
    }

    #[test]
    fn imports_only_mode() {
        let (file, errors) = parse(
            "package p\n\nimport \"fmt\"\n\nfunc ignored()\n\tx := 1\n",
            IMPORTS_ONLY,
        );
        assert!(errors.is_empty(), "unexpected errors: {errors}");
        let file = file.unwrap();
        assert_eq!(file.imports().len(), 1);
        assert_eq!(file.decls.len(), 1);
    }

    #[test]
    fn range_statement() {
        let file = parse_ok("package p\n\nfunc sum(xs []int) int\n\ttotal := 0\n\tfor _, x := range xs\n\t\ttotal += x\n\treturn total\n");
        let func = only_func(&file);
        let Stmt::Range(range) = &func.body.as_ref().unwrap().list[1] else {
            panic!("expected range statement");
        };
        assert!(range.key.is_some());
        assert!(range.value.is_some());
    }

    #[test]
    fn empty_body_is_colon_form() {
        let file = parse_ok("package p\n\nfunc stub():\n");
        let func = only_func(&file);
        let body = func.body.as_ref().unwrap();
        assert!(body.small);
        assert!(body.list.is_empty());
    }

    #[test]
    fn struct_forms() {
        let file = parse_ok(
            "package p\n\ntype Empty struct\n\ntype Point struct: x, y int\n\ntype Shape struct\n\torigin Point\n\tname string\n",
        );
        let shapes: Vec<_> = file
            .decls
            .iter()
            .filter_map(|d| match d {
                Decl::Gen(g) => g.specs.first(),
                _ => None,
            })
            .collect();
        let Some(Spec::Type(empty)) = shapes.first().copied() else {
            panic!("expected type spec");
        };
        let Expr::Struct(s) = &empty.typ else {
            panic!("expected struct type");
        };
        assert!(s.fields.list.is_empty());

        let Some(Spec::Type(point)) = shapes.get(1).copied() else {
            panic!("expected type spec");
        };
        let Expr::Struct(s) = &point.typ else {
            panic!("expected struct type");
        };
        assert_eq!(s.fields.list.len(), 1);
        assert_eq!(s.fields.list[0].names.len(), 2);

        let Some(Spec::Type(shape)) = shapes.get(2).copied() else {
            panic!("expected type spec");
        };
        let Expr::Struct(s) = &shape.typ else {
            panic!("expected struct type");
        };
        assert_eq!(s.fields.list.len(), 2);
    }

    #[test]
    fn scope_lookup_finds_most_recent() {
        let file = parse_ok("package p\n\nvar x = 1\n\nfunc f()\n\tprint(x)\n");
        let obj = file.scope.borrow().lookup("x").expect("x in package scope");
        assert_eq!(obj.kind, crate::ast::ObjKind::Var);
        assert!(obj.pos().is_valid());
    }
}
