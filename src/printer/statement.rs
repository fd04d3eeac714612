//! Statement printing, including the block-shape decision.

use crate::ast::*;
use crate::token::TokenKind;

use super::Printer;

/// Statements simple enough to share the header line after a colon.
fn is_small_stmt(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::Return(_) | Stmt::Branch(_) | Stmt::Empty(_) | Stmt::IncDec(_)
    )
}

impl<'a> Printer<'a> {
    /// Print a block body in the shape that fits it:
    ///
    /// - empty body: a lone `:`;
    /// - a single small statement with no interposed comment: `: stmt`;
    /// - anything else: an indented statement list.
    pub(crate) fn adj_block(&mut self, block: &BlockStmt) {
        let stmts: &[Stmt] = &block.list;

        if stmts.is_empty() {
            self.word(":");
            return;
        }

        if stmts.len() == 1 && is_small_stmt(&stmts[0]) && !self.comment_before(block.end()) {
            self.word(":");
            self.blank();
            self.stmt(&stmts[0]);
            return;
        }

        self.indent += 1;
        self.stmt_list(stmts);
        self.indent -= 1;
    }

    pub(crate) fn stmt_list(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.flush_comments_before(stmt.pos());
            self.linebreak_to(self.source_line(stmt.pos()));
            self.stmt(stmt);
            self.print_trailing_comments();
        }
    }

    pub(crate) fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Bad(s) => {
                self.set_pos(s.from);
                self.word("/* bad statement */");
            }
            Stmt::Decl(d) => self.decl(d),
            Stmt::Empty(_) => {}
            Stmt::Labeled(s) => {
                self.ident(&s.label);
                self.word(":");
                self.blank();
                self.stmt(&s.stmt);
            }
            Stmt::Expr(s) => {
                self.tail_do = true;
                self.expr(&s.x);
                self.tail_do = false;
            }
            Stmt::Send(s) => {
                self.expr(&s.chan);
                self.blank();
                self.word("<-");
                self.blank();
                self.expr(&s.value);
            }
            Stmt::IncDec(s) => {
                self.expr(&s.x);
                self.set_pos(s.tok_pos);
                self.word(s.tok.text());
            }
            Stmt::Assign(s) => {
                self.expr_list(&s.lhs);
                self.blank();
                self.set_pos(s.tok_pos);
                self.word(s.tok.text());
                self.blank();
                self.tail_do = true;
                self.expr_list(&s.rhs);
                self.tail_do = false;
            }
            Stmt::Go(s) => {
                self.set_pos(s.go_pos);
                self.word("go");
                self.blank();
                self.tail_do = true;
                self.expr(&s.call);
                self.tail_do = false;
            }
            Stmt::Defer(s) => {
                self.set_pos(s.defer_pos);
                self.word("defer");
                self.blank();
                self.tail_do = true;
                self.expr(&s.call);
                self.tail_do = false;
            }
            Stmt::Return(s) => {
                self.set_pos(s.return_pos);
                self.word("return");
                if !s.results.is_empty() {
                    self.blank();
                    self.tail_do = true;
                    self.expr_list(&s.results);
                    self.tail_do = false;
                }
            }
            Stmt::Branch(s) => {
                self.set_pos(s.tok_pos);
                self.word(s.tok.text());
                if let Some(label) = &s.label {
                    self.blank();
                    self.ident(label);
                }
            }
            Stmt::Block(s) => {
                // a bare block has no header of its own
                self.indent += 1;
                self.stmt_list(&s.list);
                self.indent -= 1;
            }
            Stmt::If(s) => self.if_stmt(s),
            Stmt::Case(s) => self.case_clause(s),
            Stmt::Switch(s) => self.switch_stmt(s),
            Stmt::TypeSwitch(s) => self.type_switch_stmt(s),
            Stmt::Comm(s) => self.comm_clause(s),
            Stmt::Select(s) => self.select_stmt(s),
            Stmt::For(s) => self.for_stmt(s),
            Stmt::Range(s) => self.range_stmt(s),
        }
    }

    fn if_stmt(&mut self, s: &IfStmt) {
        self.set_pos(s.if_pos);
        self.word("if");
        self.blank();
        if let Some(init) = &s.init {
            self.stmt(init);
            self.word(";");
            self.blank();
        }
        self.expr(&s.cond);
        self.adj_block(&s.body);

        if let Some(els) = &s.els {
            self.linebreak_to(self.source_line(els.pos()));
            self.word("else");
            match els {
                Stmt::If(_) => {
                    self.blank();
                    self.stmt(els);
                }
                Stmt::Block(block) => self.adj_block(block),
                other => {
                    // trusted input should not get here; keep the output
                    // parseable anyway
                    self.blank();
                    self.stmt(other);
                }
            }
        }
    }

    fn clause_body(&mut self, colon_form: bool, body: &[Stmt], end: crate::token::Pos) {
        if body.is_empty() {
            self.word(":");
            return;
        }
        if colon_form && body.len() == 1 && is_small_stmt(&body[0]) && !self.comment_before(end) {
            self.word(":");
            self.blank();
            self.stmt(&body[0]);
            return;
        }
        self.indent += 1;
        self.stmt_list(body);
        self.indent -= 1;
    }

    fn case_clause(&mut self, s: &CaseClause) {
        self.set_pos(s.case_pos);
        if s.list.is_empty() {
            self.word("default");
        } else {
            self.word("case");
            self.blank();
            self.expr_list(&s.list);
        }
        let end = s
            .body
            .last()
            .map(Stmt::end)
            .unwrap_or_else(|| s.colon.add(1));
        self.clause_body(s.colon.is_valid(), &s.body, end);
    }

    fn comm_clause(&mut self, s: &CommClause) {
        self.set_pos(s.case_pos);
        match &s.comm {
            Some(comm) => {
                self.word("case");
                self.blank();
                self.stmt(comm);
            }
            None => self.word("default"),
        }
        let end = s
            .body
            .last()
            .map(Stmt::end)
            .unwrap_or_else(|| s.colon.add(1));
        self.clause_body(s.colon.is_valid(), &s.body, end);
    }

    fn switch_stmt(&mut self, s: &SwitchStmt) {
        self.set_pos(s.switch_pos);
        self.word("switch");
        if let Some(init) = &s.init {
            self.blank();
            self.stmt(init);
            self.word(";");
        }
        if let Some(tag) = &s.tag {
            self.blank();
            self.expr(tag);
        }
        self.clause_block(&s.body);
    }

    fn type_switch_stmt(&mut self, s: &TypeSwitchStmt) {
        self.set_pos(s.switch_pos);
        self.word("switch");
        if let Some(init) = &s.init {
            self.blank();
            self.stmt(init);
            self.word(";");
        }
        self.blank();
        self.stmt(&s.assign);
        self.clause_block(&s.body);
    }

    fn select_stmt(&mut self, s: &SelectStmt) {
        self.set_pos(s.select_pos);
        self.word("select");
        self.clause_block(&s.body);
    }

    fn clause_block(&mut self, body: &BlockStmt) {
        self.indent += 1;
        self.stmt_list(&body.list);
        self.indent -= 1;
    }

    fn for_stmt(&mut self, s: &ForStmt) {
        self.set_pos(s.for_pos);
        self.word("for");

        if s.init.is_some() || s.post.is_some() {
            self.blank();
            if let Some(init) = &s.init {
                self.stmt(init);
            }
            self.word(";");
            self.blank();
            if let Some(cond) = &s.cond {
                self.expr(cond);
            }
            self.word(";");
            if let Some(post) = &s.post {
                self.blank();
                self.stmt(post);
            }
        } else if let Some(cond) = &s.cond {
            self.blank();
            self.expr(cond);
        }

        self.adj_block(&s.body);
    }

    fn range_stmt(&mut self, s: &RangeStmt) {
        self.set_pos(s.for_pos);
        self.word("for");
        self.blank();
        if let Some(key) = &s.key {
            self.expr(key);
            if let Some(value) = &s.value {
                self.word(",");
                self.blank();
                self.expr(value);
            }
            self.blank();
            if matches!(s.tok, TokenKind::Assign | TokenKind::Define) {
                self.set_pos(s.tok_pos);
                self.word(s.tok.text());
                self.blank();
            }
        }
        self.word("range");
        self.blank();
        self.expr(&s.x);
        self.adj_block(&s.body);
    }
}
