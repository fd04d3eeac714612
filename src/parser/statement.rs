//! Statement productions, including the two block forms of the indented
//! syntax.

use std::rc::Rc;

use crate::ast::*;
use crate::token::{Pos, TokenKind};

use super::Parser;

/// Context for [`Parser::parse_simple_stmt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StmtMode {
    Basic,
    /// A label declaration is acceptable.
    LabelOk,
    /// A range clause is acceptable.
    RangeOk,
}

impl<'a> Parser<'a> {
    // ----- blocks ---------------------------------------------------------

    /// A block in one of the layout forms:
    ///
    /// - `: stmt` — one small statement on the header line (`small` set);
    /// - a lone `:` at the end of the header line — empty body;
    /// - newline plus `Indent` statements `Dedent` — the general form.
    fn parse_block_body(&mut self) -> BlockStmt {
        match self.tok {
            TokenKind::Colon => {
                let opening = self.pos;
                let header_line = self.file_line(opening);
                self.next();

                if self.file_line(self.pos) != header_line || self.tok == TokenKind::Eof {
                    // nothing follows the colon: empty body
                    return BlockStmt {
                        opening,
                        list: Vec::new(),
                        closing: opening,
                        small: true,
                    };
                }

                let stmt = self.parse_stmt();
                // the closing position is the terminating newline-semicolon,
                // which the statement has already consumed
                let closing = if self.ptok == TokenKind::Semicolon {
                    self.prev_pos
                } else {
                    self.pos
                };
                BlockStmt {
                    opening,
                    list: vec![stmt],
                    closing,
                    small: true,
                }
            }
            _ => {
                if self.tok == TokenKind::Semicolon && self.lit == "\n" {
                    self.next();
                }
                let opening = self.expect(TokenKind::Indent);
                let list = self.parse_stmt_list();
                let closing = self.expect(TokenKind::Dedent);
                BlockStmt {
                    opening,
                    list,
                    closing,
                    small: false,
                }
            }
        }
    }

    pub(crate) fn parse_block_stmt(&mut self) -> BlockStmt {
        self.open_scope();
        let block = self.parse_block_body();
        self.close_scope();
        block
    }

    /// A function body: the block runs in `scope` with a fresh label scope.
    pub(crate) fn parse_body(&mut self, scope: SharedScope) -> BlockStmt {
        self.top_scope = scope;
        self.open_label_scope();
        let block = self.parse_block_body();
        self.close_label_scope();
        self.close_scope();
        block
    }

    pub(crate) fn parse_stmt_list(&mut self) -> Vec<Stmt> {
        let mut list = Vec::new();
        while !matches!(
            self.tok,
            TokenKind::Case | TokenKind::Default | TokenKind::Dedent | TokenKind::Eof
        ) && !self.bailout
        {
            list.push(self.parse_stmt());
        }
        list
    }

    // ----- simple statements ----------------------------------------------

    fn make_cond(&mut self, s: Option<Stmt>, what: &str) -> Expr {
        match s {
            Some(Stmt::Expr(expr)) => {
                // a bare identifier followed by a short-form colon deferred
                // its resolution as a possible label; it is a condition
                self.resolve_if_unbound(&expr.x);
                expr.x
            }
            Some(other) => {
                let pos = other.pos();
                self.error_expected(pos, what);
                Expr::Bad(BadExpr {
                    from: pos,
                    to: self.safe_pos(self.pos),
                })
            }
            None => {
                let pos = self.pos;
                self.error_expected(pos, what);
                Expr::Bad(BadExpr {
                    from: pos,
                    to: self.safe_pos(pos),
                })
            }
        }
    }

    /// Parse an assignment, send, inc/dec, labeled, or expression statement.
    /// The second result reports whether a range clause was consumed.
    pub(crate) fn parse_simple_stmt(&mut self, mode: StmtMode) -> (Stmt, bool) {
        use TokenKind::*;

        let x = self.parse_lhs_list();

        match self.tok {
            Define | Assign | AddAssign | SubAssign | MulAssign | QuoAssign | RemAssign
            | AndAssign | OrAssign | XorAssign | ShlAssign | ShrAssign | AndNotAssign => {
                let (tok_pos, tok) = (self.pos, self.tok);
                self.next();

                let mut is_range = false;
                let rhs = if mode == StmtMode::RangeOk
                    && self.tok == Range
                    && (tok == Define || tok == Assign)
                {
                    let range_pos = self.pos;
                    self.next();
                    let y = self.parse_rhs();
                    is_range = true;
                    vec![Expr::Unary(UnaryExpr {
                        op_pos: range_pos,
                        op: Range,
                        x: Box::new(y),
                    })]
                } else {
                    self.parse_rhs_list()
                };

                let stmt = AssignStmt {
                    lhs: x,
                    tok_pos,
                    tok,
                    rhs,
                };
                if tok == Define {
                    let names = stmt
                        .lhs
                        .iter()
                        .filter_map(|x| match x {
                            Expr::Ident(ident) => Some((ident.name.clone(), ident.pos())),
                            _ => None,
                        })
                        .collect();
                    self.short_var_decl(DeclRef::AssignStmt { names }, &stmt.lhs);
                }
                return (Stmt::Assign(Box::new(stmt)), is_range);
            }
            _ => {}
        }

        let mut iter = x.into_iter();
        let x0 = iter.next().expect("expression list is never empty");
        if let Some(extra) = iter.next() {
            let pos = extra.pos();
            self.error_expected(pos, "1 expression");
        }

        match self.tok {
            Colon if mode == StmtMode::LabelOk => {
                if let Expr::Ident(label) = &x0 {
                    let colon = self.pos;
                    self.next();
                    let label = Rc::clone(label);
                    let stmt = self.parse_stmt();
                    if let Some(scope) = self.label_scope_handle() {
                        let decl = DeclRef::LabeledStmt {
                            label: label.name.clone(),
                            pos: label.pos(),
                        };
                        self.declare(decl, None, &scope, ObjKind::Label, &[Rc::clone(&label)]);
                    }
                    return (
                        Stmt::Labeled(Box::new(LabeledStmt { label, colon, stmt })),
                        false,
                    );
                }
                // fall through: a stray colon after a non-identifier
                let pos = self.pos;
                self.error(pos, "illegal label declaration");
                self.resolve_if_unbound(&x0);
                (Stmt::Expr(Box::new(ExprStmt { x: x0 })), false)
            }
            Arrow => {
                let arrow = self.pos;
                self.next();
                let value = self.parse_rhs();
                (
                    Stmt::Send(Box::new(SendStmt {
                        chan: x0,
                        arrow,
                        value,
                    })),
                    false,
                )
            }
            Inc | Dec => {
                let stmt = IncDecStmt {
                    x: x0,
                    tok_pos: self.pos,
                    tok: self.tok,
                };
                self.next();
                (Stmt::IncDec(Box::new(stmt)), false)
            }
            _ => (Stmt::Expr(Box::new(ExprStmt { x: x0 })), false),
        }
    }

    fn parse_call_expr(&mut self, what: &str) -> Option<Expr> {
        let x = self.parse_rhs_or_type();
        match x.unparen() {
            Expr::Call(_) => Some(x),
            Expr::Bad(_) => None, // error already reported
            _ => {
                let pos = x.pos();
                self.error(pos, format!("function must be invoked in {what} statement"));
                None
            }
        }
    }

    fn parse_go_stmt(&mut self) -> Stmt {
        let pos = self.expect(TokenKind::Go);
        let call = self.parse_call_expr("go");
        self.expect_semi();
        match call {
            Some(call) => Stmt::Go(Box::new(GoStmt { go_pos: pos, call })),
            None => Stmt::Bad(BadStmt {
                from: pos,
                to: self.safe_pos(self.pos),
            }),
        }
    }

    fn parse_defer_stmt(&mut self) -> Stmt {
        let pos = self.expect(TokenKind::Defer);
        let call = self.parse_call_expr("defer");
        self.expect_semi();
        match call {
            Some(call) => Stmt::Defer(Box::new(DeferStmt {
                defer_pos: pos,
                call,
            })),
            None => Stmt::Bad(BadStmt {
                from: pos,
                to: self.safe_pos(self.pos),
            }),
        }
    }

    fn parse_return_stmt(&mut self) -> Stmt {
        let pos = self.expect(TokenKind::Return);
        let mut results = Vec::new();
        if !matches!(
            self.tok,
            TokenKind::Semicolon | TokenKind::Dedent | TokenKind::Case | TokenKind::Default | TokenKind::Eof
        ) {
            results = self.parse_rhs_list();
        }
        self.expect_semi();
        Stmt::Return(Box::new(ReturnStmt {
            return_pos: pos,
            results,
        }))
    }

    fn parse_branch_stmt(&mut self, tok: TokenKind) -> Stmt {
        let pos = self.expect(tok);
        let mut label = None;
        if tok != TokenKind::Fallthrough && self.tok == TokenKind::Ident {
            let ident = self.parse_ident();
            self.add_target(&ident);
            label = Some(ident);
        }
        self.expect_semi();
        Stmt::Branch(BranchStmt {
            tok_pos: pos,
            tok,
            label,
        })
    }

    // ----- if -------------------------------------------------------------

    fn parse_if_stmt(&mut self) -> Stmt {
        let pos = self.expect(TokenKind::If);
        self.open_scope();

        let mut init = None;
        let cond;
        if self.at_block_start() {
            let p = self.pos;
            self.error_expected(p, "condition");
            cond = Expr::Bad(BadExpr {
                from: p,
                to: self.safe_pos(p),
            });
        } else {
            let (s, _) = self.parse_simple_stmt(StmtMode::Basic);
            if self.tok == TokenKind::Semicolon && self.lit == ";" {
                self.next();
                init = Some(s);
                cond = self.parse_rhs();
            } else {
                cond = self.make_cond(Some(s), "boolean expression");
            }
        }

        let body = self.parse_block_stmt();
        let els = if self.tok == TokenKind::Else {
            self.next();
            if self.tok == TokenKind::If {
                Some(self.parse_if_stmt())
            } else if self.at_block_start() {
                Some(Stmt::Block(Box::new(self.parse_block_stmt())))
            } else {
                let p = self.pos;
                self.error_expected(p, "if statement or block");
                Some(Stmt::Bad(BadStmt {
                    from: p,
                    to: self.safe_pos(p),
                }))
            }
        } else {
            None
        };

        self.close_scope();
        Stmt::If(Box::new(IfStmt {
            if_pos: pos,
            init,
            cond,
            body,
            els,
        }))
    }

    // ----- switch and select ----------------------------------------------

    /// Consume the layout tokens opening an indented clause list, if any.
    fn open_clause_block(&mut self) -> Option<Pos> {
        if self.tok == TokenKind::Semicolon && self.lit == "\n" && self.peek() == TokenKind::Indent
        {
            self.next();
        }
        if self.tok == TokenKind::Indent {
            Some(self.expect(TokenKind::Indent))
        } else {
            None
        }
    }

    /// The colon-or-indented body shared by case and communication clauses.
    fn parse_clause_body(&mut self) -> (Pos, Vec<Stmt>) {
        match self.tok {
            TokenKind::Colon => {
                let colon = self.pos;
                let header_line = self.file_line(colon);
                self.next();
                let body = if self.file_line(self.pos) == header_line && self.tok != TokenKind::Eof
                {
                    self.parse_stmt_list()
                } else {
                    Vec::new()
                };
                (colon, body)
            }
            _ => {
                if self.tok == TokenKind::Semicolon && self.lit == "\n" {
                    self.next();
                }
                if self.tok == TokenKind::Indent {
                    self.next();
                    let body = self.parse_stmt_list();
                    self.expect(TokenKind::Dedent);
                    (Pos::NONE, body)
                } else {
                    let pos = self.pos;
                    self.error_expected(pos, "':' or indented clause body");
                    (Pos::NONE, Vec::new())
                }
            }
        }
    }

    fn parse_case_clause(&mut self, type_switch: bool) -> Stmt {
        let pos = self.pos;
        let list = if self.tok == TokenKind::Case {
            self.next();
            if type_switch {
                self.parse_type_list()
            } else {
                self.parse_rhs_list()
            }
        } else {
            self.expect(TokenKind::Default);
            Vec::new()
        };

        self.open_scope();
        let (colon, body) = self.parse_clause_body();
        self.close_scope();

        Stmt::Case(Box::new(CaseClause {
            case_pos: pos,
            list,
            colon,
            body,
        }))
    }

    fn is_type_switch_assert(x: &Expr) -> bool {
        matches!(x, Expr::TypeAssert(assert) if assert.typ.is_none())
    }

    fn is_type_switch_guard(&self, s: &Option<Stmt>) -> bool {
        match s {
            Some(Stmt::Expr(expr)) => Self::is_type_switch_assert(&expr.x),
            Some(Stmt::Assign(assign)) => {
                assign.tok == TokenKind::Define
                    && assign.lhs.len() == 1
                    && assign.rhs.len() == 1
                    && Self::is_type_switch_assert(&assign.rhs[0])
            }
            _ => false,
        }
    }

    fn parse_switch_stmt(&mut self) -> Stmt {
        let pos = self.expect(TokenKind::Switch);
        self.open_scope();

        let mut s1 = None;
        let mut s2 = None;
        if !self.at_block_start() {
            if !(self.tok == TokenKind::Semicolon && self.lit == ";") {
                s2 = Some(self.parse_simple_stmt(StmtMode::Basic).0);
            }
            if self.tok == TokenKind::Semicolon && self.lit == ";" {
                self.next();
                s1 = s2.take();
                if !self.at_block_start() {
                    s2 = Some(self.parse_simple_stmt(StmtMode::Basic).0);
                }
            }
        }

        let type_switch = self.is_type_switch_guard(&s2);
        let opening = self.open_clause_block();
        let mut clauses = Vec::new();
        if opening.is_some() {
            while matches!(self.tok, TokenKind::Case | TokenKind::Default) && !self.bailout {
                clauses.push(self.parse_case_clause(type_switch));
            }
        }
        let closing = match opening {
            Some(_) => self.expect(TokenKind::Dedent),
            None => Pos::NONE,
        };
        let body = BlockStmt {
            opening: opening.unwrap_or(Pos::NONE),
            list: clauses,
            closing,
            small: false,
        };

        self.close_scope();

        if type_switch {
            return Stmt::TypeSwitch(Box::new(TypeSwitchStmt {
                switch_pos: pos,
                init: s1,
                assign: s2.expect("guard exists when type_switch is set"),
                body,
            }));
        }
        let tag = s2.map(|s| self.make_cond(Some(s), "switch expression"));
        Stmt::Switch(Box::new(SwitchStmt {
            switch_pos: pos,
            init: s1,
            tag,
            body,
        }))
    }

    fn parse_comm_clause(&mut self) -> Stmt {
        let pos = self.pos;
        self.open_scope();

        let comm = if self.tok == TokenKind::Case {
            self.next();
            let lhs = self.parse_lhs_list();
            if self.tok == TokenKind::Arrow {
                // send: ch <- value
                if lhs.len() > 1 {
                    let p = lhs[0].pos();
                    self.error_expected(p, "1 expression");
                }
                let arrow = self.pos;
                self.next();
                let value = self.parse_rhs();
                let chan = lhs.into_iter().next().expect("lhs list is never empty");
                Some(Stmt::Send(Box::new(SendStmt { chan, arrow, value })))
            } else if matches!(self.tok, TokenKind::Assign | TokenKind::Define) {
                // receive with assignment
                if lhs.len() > 2 {
                    let p = lhs[0].pos();
                    self.error_expected(p, "1 or 2 expressions");
                }
                let (tok_pos, tok) = (self.pos, self.tok);
                self.next();
                let rhs = self.parse_rhs();
                let stmt = AssignStmt {
                    lhs,
                    tok_pos,
                    tok,
                    rhs: vec![rhs],
                };
                if tok == TokenKind::Define {
                    let names = stmt
                        .lhs
                        .iter()
                        .filter_map(|x| match x {
                            Expr::Ident(ident) => Some((ident.name.clone(), ident.pos())),
                            _ => None,
                        })
                        .collect();
                    self.short_var_decl(DeclRef::AssignStmt { names }, &stmt.lhs);
                }
                Some(Stmt::Assign(Box::new(stmt)))
            } else {
                // bare receive
                if lhs.len() > 1 {
                    let p = lhs[0].pos();
                    self.error_expected(p, "1 expression");
                }
                let x = lhs.into_iter().next().expect("lhs list is never empty");
                self.resolve_if_unbound(&x);
                Some(Stmt::Expr(Box::new(ExprStmt { x })))
            }
        } else {
            self.expect(TokenKind::Default);
            None
        };

        let (colon, body) = self.parse_clause_body();
        self.close_scope();

        Stmt::Comm(Box::new(CommClause {
            case_pos: pos,
            comm,
            colon,
            body,
        }))
    }

    fn parse_select_stmt(&mut self) -> Stmt {
        let pos = self.expect(TokenKind::Select);
        let opening = self.open_clause_block();
        let mut clauses = Vec::new();
        if opening.is_some() {
            while matches!(self.tok, TokenKind::Case | TokenKind::Default) && !self.bailout {
                clauses.push(self.parse_comm_clause());
            }
        }
        let closing = match opening {
            Some(_) => self.expect(TokenKind::Dedent),
            None => Pos::NONE,
        };
        Stmt::Select(Box::new(SelectStmt {
            select_pos: pos,
            body: BlockStmt {
                opening: opening.unwrap_or(Pos::NONE),
                list: clauses,
                closing,
                small: false,
            },
        }))
    }

    // ----- for ------------------------------------------------------------

    fn parse_for_stmt(&mut self) -> Stmt {
        let pos = self.expect(TokenKind::For);
        self.open_scope();

        let mut s1 = None;
        let mut s2 = None;
        let mut s3 = None;
        let mut is_range = false;
        if !self.at_block_start() {
            if !(self.tok == TokenKind::Semicolon && self.lit == ";") {
                let (s, r) = self.parse_simple_stmt(StmtMode::RangeOk);
                s2 = Some(s);
                is_range = r;
            }
            if !is_range && self.tok == TokenKind::Semicolon && self.lit == ";" {
                self.next();
                s1 = s2.take();
                if !(self.tok == TokenKind::Semicolon && self.lit == ";") && !self.at_block_start()
                {
                    s2 = Some(self.parse_simple_stmt(StmtMode::Basic).0);
                }
                if self.tok == TokenKind::Semicolon && self.lit == ";" {
                    self.next();
                } else if !self.at_block_start() {
                    let p = self.pos;
                    self.error_expected(p, "';'");
                }
                if !self.at_block_start() {
                    s3 = Some(self.parse_simple_stmt(StmtMode::Basic).0);
                }
            }
        }

        let body = self.parse_block_stmt();
        self.close_scope();

        if is_range {
            let Some(Stmt::Assign(assign)) = s2 else {
                unreachable!("range clause is always an assignment");
            };
            let mut lhs = assign.lhs.into_iter();
            let (key, value) = (lhs.next(), lhs.next());
            if let Some(extra) = lhs.next() {
                let p = extra.pos();
                self.error_expected(p, "at most 2 expressions");
            }
            let Some(Expr::Unary(range)) = assign.rhs.into_iter().next() else {
                unreachable!("range clause carries its marker");
            };
            return Stmt::Range(Box::new(RangeStmt {
                for_pos: pos,
                key,
                value,
                tok_pos: assign.tok_pos,
                tok: assign.tok,
                x: *range.x,
                body,
            }));
        }

        let cond = s2.map(|s| self.make_cond(Some(s), "boolean expression"));
        Stmt::For(Box::new(ForStmt {
            for_pos: pos,
            init: s1,
            cond,
            post: s3,
            body,
        }))
    }

    // ----- dispatch -------------------------------------------------------

    pub(crate) fn parse_stmt(&mut self) -> Stmt {
        use TokenKind::*;
        self.trace_begin("Statement");

        let stmt = match self.tok {
            Const | Type | Var => {
                let decl = self.parse_gen_decl(self.tok);
                Stmt::Decl(Box::new(decl))
            }
            // tokens that may start an expression
            Ident | Int | Float | Imag | Char | Str | Func | LParen | LBracket | Struct | Map
            | Chan | Interface | Arrow | Add | Sub | Mul | And | Xor | Not => {
                let (s, _) = self.parse_simple_stmt(StmtMode::LabelOk);
                if !matches!(s, Stmt::Labeled(_)) {
                    self.expect_semi();
                }
                s
            }
            Go => self.parse_go_stmt(),
            Defer => self.parse_defer_stmt(),
            Return => self.parse_return_stmt(),
            Break | Continue | Goto | Fallthrough => self.parse_branch_stmt(self.tok),
            If => self.parse_if_stmt(),
            Switch => self.parse_switch_stmt(),
            Select => self.parse_select_stmt(),
            For => self.parse_for_stmt(),
            Semicolon => {
                let stmt = Stmt::Empty(EmptyStmt {
                    semicolon: self.pos,
                });
                self.next();
                stmt
            }
            Indent => Stmt::Block(Box::new(self.parse_block_stmt())),
            _ => {
                let pos = self.pos;
                self.error_expected(pos, "statement");
                self.sync_stmt();
                Stmt::Bad(BadStmt {
                    from: pos,
                    to: self.safe_pos(self.pos),
                })
            }
        };

        self.trace_end();
        stmt
    }
}
