//! Expression and type productions.

use std::rc::Rc;

use crate::ast::*;
use crate::token::{Pos, TokenKind, LOWEST_PREC};

use super::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_ident(&mut self) -> Rc<Ident> {
        let pos = self.pos;
        let name = if self.tok == TokenKind::Ident {
            let name = self.lit.clone();
            self.next();
            name
        } else {
            self.expect(TokenKind::Ident); // report the error
            "_".to_string()
        };
        Ident::new(pos, name)
    }

    pub(crate) fn parse_ident_list(&mut self) -> Vec<Rc<Ident>> {
        let mut list = vec![self.parse_ident()];
        while self.tok == TokenKind::Comma {
            self.next();
            list.push(self.parse_ident());
        }
        list
    }

    // ----- expression lists ----------------------------------------------

    pub(crate) fn parse_expr_list(&mut self, lhs: bool) -> Vec<Expr> {
        let mut list = vec![self.parse_expr(lhs)];
        while self.tok == TokenKind::Comma {
            self.next();
            list.push(self.parse_expr(lhs));
        }
        list
    }

    /// Parse a left-hand side list, deferring resolution until the parser
    /// knows whether `:=` declares the identifiers.
    pub(crate) fn parse_lhs_list(&mut self) -> Vec<Expr> {
        let list = self.parse_expr_list(true);
        match self.tok {
            TokenKind::Define => {} // declared by short_var_decl
            TokenKind::Colon => {}  // label; declared by the labeled statement
            _ => {
                for x in &list {
                    self.resolve(x);
                }
            }
        }
        list
    }

    pub(crate) fn parse_rhs_list(&mut self) -> Vec<Expr> {
        self.parse_expr_list(false)
    }

    pub(crate) fn parse_rhs(&mut self) -> Expr {
        self.parse_expr(false)
    }

    // ----- types ----------------------------------------------------------

    pub(crate) fn parse_type(&mut self) -> Expr {
        match self.try_type() {
            Some(typ) => typ,
            None => {
                let pos = self.pos;
                self.error_expected(pos, "type");
                self.next();
                Expr::Bad(BadExpr {
                    from: pos,
                    to: self.safe_pos(self.pos),
                })
            }
        }
    }

    pub(crate) fn try_type(&mut self) -> Option<Expr> {
        let typ = self.try_ident_or_type();
        if let Some(typ) = &typ {
            self.resolve(typ);
        }
        typ
    }

    fn try_ident_or_type(&mut self) -> Option<Expr> {
        use TokenKind::*;
        match self.tok {
            Ident => Some(self.parse_type_name()),
            LBracket => Some(self.parse_array_type()),
            Struct => Some(self.parse_struct_type()),
            Mul => Some(self.parse_pointer_type()),
            Func => {
                let typ = self.parse_func_type().0;
                Some(Expr::Func(FuncTypeExpr { typ: Box::new(typ) }))
            }
            Interface => Some(self.parse_interface_type()),
            Map => Some(self.parse_map_type()),
            Chan | Arrow => Some(self.parse_chan_type()),
            LParen => {
                let lparen = self.pos;
                self.next();
                let typ = self.parse_type();
                let rparen = self.expect(RParen);
                Some(Expr::Paren(ParenExpr {
                    lparen,
                    x: Box::new(typ),
                    rparen,
                }))
            }
            _ => None,
        }
    }

    /// A (possibly package-qualified) type name.
    fn parse_type_name(&mut self) -> Expr {
        let ident = self.parse_ident();
        if self.tok == TokenKind::Period {
            self.next();
            // the qualifier must denote a package in scope
            let x = Expr::Ident(Rc::clone(&ident));
            self.resolve(&x);
            let sel = self.parse_ident();
            return Expr::Selector(SelectorExpr {
                x: Box::new(x),
                sel,
            });
        }
        Expr::Ident(ident)
    }

    fn parse_array_type(&mut self) -> Expr {
        let lbrack = self.expect(TokenKind::LBracket);
        let len = match self.tok {
            TokenKind::Ellipsis => {
                let pos = self.pos;
                self.next();
                Some(Box::new(Expr::Ellipsis(Ellipsis {
                    ellipsis: pos,
                    elt: None,
                })))
            }
            TokenKind::RBracket => None,
            _ => Some(Box::new(self.parse_rhs())),
        };
        self.expect(TokenKind::RBracket);
        let elt = self.parse_type();
        Expr::Array(ArrayType {
            lbrack,
            len,
            elt: Box::new(elt),
        })
    }

    fn parse_pointer_type(&mut self) -> Expr {
        let star = self.expect(TokenKind::Mul);
        let base = self.parse_type();
        Expr::Star(StarExpr {
            star,
            x: Box::new(base),
        })
    }

    fn parse_map_type(&mut self) -> Expr {
        let pos = self.expect(TokenKind::Map);
        self.expect(TokenKind::LBracket);
        let key = self.parse_type();
        self.expect(TokenKind::RBracket);
        let value = self.parse_type();
        Expr::Map(MapType {
            map_pos: pos,
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    fn parse_chan_type(&mut self) -> Expr {
        let pos = self.pos;
        let dir;
        if self.tok == TokenKind::Chan {
            self.next();
            if self.tok == TokenKind::Arrow {
                self.next();
                dir = ChanDir::Send;
            } else {
                dir = ChanDir::SendRecv;
            }
        } else {
            self.expect(TokenKind::Arrow);
            self.expect(TokenKind::Chan);
            dir = ChanDir::Recv;
        }
        let value = self.parse_type();
        Expr::Chan(ChanType {
            begin: pos,
            dir,
            value: Box::new(value),
        })
    }

    // ----- struct and interface bodies ------------------------------------

    /// A struct type body in one of the layout forms: an indented field
    /// list, a colon with a single field on the same line, or nothing at all
    /// for the empty struct.
    pub(crate) fn parse_struct_type(&mut self) -> Expr {
        let pos = self.expect(TokenKind::Struct);
        let scope = Scope::new(None); // struct scope, for duplicate fields
        let fields = self.parse_composite_body(&scope, Parser::parse_field_decl);
        Expr::Struct(StructType {
            struct_pos: pos,
            fields,
        })
    }

    pub(crate) fn parse_interface_type(&mut self) -> Expr {
        let pos = self.expect(TokenKind::Interface);
        let scope = Scope::new(None);
        let methods = self.parse_composite_body(&scope, Parser::parse_method_spec);
        Expr::Interface(InterfaceType {
            interface_pos: pos,
            methods,
        })
    }

    /// The shared layout skeleton of struct and interface bodies.
    fn parse_composite_body(
        &mut self,
        scope: &SharedScope,
        member: fn(&mut Parser<'a>, &SharedScope, bool) -> Field,
    ) -> FieldList {
        match self.tok {
            TokenKind::Indent => {
                let opening = self.pos;
                self.next();
                let mut list = Vec::new();
                while self.tok != TokenKind::Dedent && self.tok != TokenKind::Eof && !self.bailout {
                    list.push(member(self, scope, true));
                }
                let closing = self.expect(TokenKind::Dedent);
                FieldList {
                    opening,
                    list,
                    closing,
                }
            }
            TokenKind::Colon => {
                let opening = self.pos;
                self.next();
                let field = member(self, scope, false);
                FieldList {
                    opening,
                    list: vec![field],
                    closing: self.prev_pos,
                }
            }
            _ => FieldList {
                opening: Pos::NONE,
                list: Vec::new(),
                closing: Pos::NONE,
            },
        }
    }

    fn parse_field_decl(&mut self, scope: &SharedScope, consume_semi: bool) -> Field {
        let doc = self.lead_comment.take();

        let (list, typ) = self.parse_var_list(false);

        let tag = if self.tok == TokenKind::Str {
            let tag = BasicLit {
                value_pos: self.pos,
                kind: self.tok,
                value: self.lit.clone(),
            };
            self.next();
            Some(tag)
        } else {
            None
        };

        let (names, typ) = match typ {
            Some(typ) => (self.make_ident_list(list), typ),
            None => {
                // embedded type: a single (possibly starred) type name
                let mut list = list;
                let typ = if list.len() == 1 {
                    list.pop().unwrap()
                } else {
                    let pos = self.pos;
                    self.error_expected(pos, "anonymous field");
                    Expr::Bad(BadExpr {
                        from: list.first().map(Expr::pos).unwrap_or(pos),
                        to: self.safe_pos(self.pos),
                    })
                };
                (Vec::new(), typ)
            }
        };

        if consume_semi {
            self.expect_semi();
        }
        let comment = self.line_comment.take();

        self.resolve(&typ);
        let field = Field {
            doc,
            names,
            typ,
            tag,
            comment,
        };
        let decl = DeclRef::Field {
            names: field
                .names
                .iter()
                .map(|n| (n.name.clone(), n.pos()))
                .collect(),
        };
        let names = field.names.clone();
        self.declare(decl, None, scope, ObjKind::Var, &names);
        field
    }

    fn parse_method_spec(&mut self, scope: &SharedScope, consume_semi: bool) -> Field {
        let doc = self.lead_comment.take();

        let x = self.parse_type_name();
        let (names, typ) = match (&x, self.tok) {
            (Expr::Ident(ident), TokenKind::LParen) => {
                let method_scope = Scope::new(None);
                let (params, results) = self.parse_signature(&method_scope);
                let typ = FuncType {
                    func_pos: Pos::NONE,
                    params,
                    results,
                };
                (
                    vec![Rc::clone(ident)],
                    Expr::Func(FuncTypeExpr { typ: Box::new(typ) }),
                )
            }
            _ => {
                // embedded interface
                self.resolve(&x);
                (Vec::new(), x)
            }
        };

        if consume_semi {
            self.expect_semi();
        }
        let comment = self.line_comment.take();

        let field = Field {
            doc,
            names,
            typ,
            tag: None,
            comment,
        };
        let decl = DeclRef::Field {
            names: field
                .names
                .iter()
                .map(|n| (n.name.clone(), n.pos()))
                .collect(),
        };
        let names = field.names.clone();
        self.declare(decl, None, scope, ObjKind::Func, &names);
        field
    }

    // ----- signatures -----------------------------------------------------

    fn try_var_type(&mut self, is_param: bool) -> Option<Expr> {
        if is_param && self.tok == TokenKind::Ellipsis {
            let pos = self.pos;
            self.next();
            let elt = match self.try_ident_or_type() {
                Some(typ) => Some(Box::new(typ)),
                None => {
                    self.error(pos, "'...' parameter is missing type");
                    None
                }
            };
            return Some(Expr::Ellipsis(Ellipsis { ellipsis: pos, elt }));
        }
        self.try_ident_or_type()
    }

    fn parse_var_type(&mut self, is_param: bool) -> Expr {
        match self.try_var_type(is_param) {
            Some(typ) => typ,
            None => {
                let pos = self.pos;
                self.error_expected(pos, "type");
                self.next();
                Expr::Bad(BadExpr {
                    from: pos,
                    to: self.safe_pos(self.pos),
                })
            }
        }
    }

    /// A comma-separated list of names-or-types followed by an optional
    /// type; the caller decides which reading applies.
    fn parse_var_list(&mut self, is_param: bool) -> (Vec<Expr>, Option<Expr>) {
        let mut list = Vec::new();
        loop {
            list.push(self.parse_var_type(is_param));
            if self.tok != TokenKind::Comma {
                break;
            }
            self.next();
        }
        let typ = self.try_var_type(is_param);
        (list, typ)
    }

    fn make_ident_list(&mut self, list: Vec<Expr>) -> Vec<Rc<Ident>> {
        list.into_iter()
            .map(|x| match x {
                Expr::Ident(ident) => ident,
                other => {
                    let pos = other.pos();
                    self.error_expected(pos, "identifier");
                    Ident::new(pos, "_")
                }
            })
            .collect()
    }

    fn parse_parameter_list(&mut self, scope: &SharedScope, ellipsis_ok: bool) -> Vec<Field> {
        let mut params = Vec::new();
        let (list, typ) = self.parse_var_list(ellipsis_ok);

        if let Some(typ) = typ {
            // IdentifierList Type, possibly repeated
            let names = self.make_ident_list(list);
            self.resolve(&typ);
            let decl = DeclRef::Field {
                names: names.iter().map(|n| (n.name.clone(), n.pos())).collect(),
            };
            self.declare(decl, None, scope, ObjKind::Var, &names);
            params.push(Field {
                doc: None,
                names,
                typ,
                tag: None,
                comment: None,
            });

            if !self.at_comma("parameter list", TokenKind::RParen) {
                return params;
            }
            self.next();

            while self.tok != TokenKind::RParen && self.tok != TokenKind::Eof {
                let names = self.parse_ident_list();
                let typ = self.parse_var_type(ellipsis_ok);
                self.resolve(&typ);
                let decl = DeclRef::Field {
                    names: names.iter().map(|n| (n.name.clone(), n.pos())).collect(),
                };
                self.declare(decl, None, scope, ObjKind::Var, &names);
                params.push(Field {
                    doc: None,
                    names,
                    typ,
                    tag: None,
                    comment: None,
                });
                if !self.at_comma("parameter list", TokenKind::RParen) {
                    break;
                }
                self.next();
            }
        } else {
            // Type { "," Type }: anonymous parameters
            for typ in list {
                self.resolve(&typ);
                params.push(Field {
                    doc: None,
                    names: Vec::new(),
                    typ,
                    tag: None,
                    comment: None,
                });
            }
        }
        params
    }

    pub(crate) fn parse_parameters(&mut self, scope: &SharedScope, ellipsis_ok: bool) -> FieldList {
        let opening = self.expect(TokenKind::LParen);
        let list = if self.tok != TokenKind::RParen {
            self.parse_parameter_list(scope, ellipsis_ok)
        } else {
            Vec::new()
        };
        let closing = self.expect(TokenKind::RParen);
        FieldList {
            opening,
            list,
            closing,
        }
    }

    fn parse_result(&mut self, scope: &SharedScope) -> Option<FieldList> {
        if self.tok == TokenKind::LParen {
            return Some(self.parse_parameters(scope, false));
        }
        let typ = self.try_type()?;
        Some(FieldList {
            opening: Pos::NONE,
            list: vec![Field {
                doc: None,
                names: Vec::new(),
                typ,
                tag: None,
                comment: None,
            }],
            closing: Pos::NONE,
        })
    }

    pub(crate) fn parse_signature(&mut self, scope: &SharedScope) -> (FieldList, Option<FieldList>) {
        let params = self.parse_parameters(scope, true);
        let results = self.parse_result(scope);
        (params, results)
    }

    pub(crate) fn parse_func_type(&mut self) -> (FuncType, SharedScope) {
        let pos = self.expect(TokenKind::Func);
        let scope = Scope::new(Some(Rc::clone(&self.top_scope)));
        let (params, results) = self.parse_signature(&scope);
        (
            FuncType {
                func_pos: pos,
                params,
                results,
            },
            scope,
        )
    }

    fn parse_func_type_or_lit(&mut self) -> Expr {
        let (typ, scope) = self.parse_func_type();
        if !self.at_block_start() {
            return Expr::Func(FuncTypeExpr { typ: Box::new(typ) });
        }
        let body = self.parse_body(scope);
        Expr::FuncLit(FuncLit { typ, body })
    }

    /// Whether the current token opens a block body: a colon short form, or
    /// the inserted newline-semicolon followed by an indent.
    pub(crate) fn at_block_start(&mut self) -> bool {
        match self.tok {
            TokenKind::Colon | TokenKind::Indent => true,
            TokenKind::Semicolon if self.lit == "\n" => self.peek() == TokenKind::Indent,
            _ => false,
        }
    }

    // ----- operands and primaries ----------------------------------------

    fn parse_operand(&mut self, lhs: bool) -> Expr {
        use TokenKind::*;
        match self.tok {
            Ident => {
                let ident = self.parse_ident();
                let x = Expr::Ident(ident);
                if !lhs {
                    self.resolve(&x);
                }
                x
            }
            Int | Float | Imag | Char | Str => {
                let lit = BasicLit {
                    value_pos: self.pos,
                    kind: self.tok,
                    value: self.lit.clone(),
                };
                self.next();
                Expr::BasicLit(lit)
            }
            LParen => {
                let lparen = self.pos;
                self.next();
                let x = self.parse_rhs_or_type();
                let rparen = self.expect(RParen);
                Expr::Paren(ParenExpr {
                    lparen,
                    x: Box::new(x),
                    rparen,
                })
            }
            Func => self.parse_func_type_or_lit(),
            _ => {
                if let Some(typ) = self.try_ident_or_type() {
                    return typ;
                }
                let pos = self.pos;
                self.error_expected(pos, "operand");
                self.sync_stmt();
                Expr::Bad(BadExpr {
                    from: pos,
                    to: self.safe_pos(self.pos),
                })
            }
        }
    }

    fn parse_selector_or_type_assertion(&mut self, x: Expr) -> Expr {
        // the '.' is already consumed
        if self.tok == TokenKind::LParen {
            self.next();
            let typ = if self.tok == TokenKind::Type {
                // x.(type): only valid in a type switch header
                self.next();
                None
            } else {
                Some(Box::new(self.parse_type()))
            };
            self.expect(TokenKind::RParen);
            return Expr::TypeAssert(TypeAssertExpr {
                x: Box::new(x),
                typ,
            });
        }
        let sel = self.parse_ident();
        Expr::Selector(SelectorExpr {
            x: Box::new(x),
            sel,
        })
    }

    fn parse_index_or_slice(&mut self, x: Expr) -> Expr {
        let lbrack = self.expect(TokenKind::LBracket);
        let mut low = None;
        if self.tok != TokenKind::Colon {
            low = Some(self.parse_rhs());
        }
        if self.tok == TokenKind::Colon {
            self.next();
            let high = if self.tok != TokenKind::RBracket {
                Some(Box::new(self.parse_rhs()))
            } else {
                None
            };
            let rbrack = self.expect(TokenKind::RBracket);
            return Expr::Slice(SliceExpr {
                x: Box::new(x),
                lbrack,
                low: low.map(Box::new),
                high,
                rbrack,
            });
        }

        let rbrack = self.expect(TokenKind::RBracket);
        let index = low.unwrap_or_else(|| {
            self.error_expected(lbrack, "index expression");
            Expr::Bad(BadExpr {
                from: lbrack,
                to: rbrack,
            })
        });
        Expr::Index(IndexExpr {
            x: Box::new(x),
            lbrack,
            index: Box::new(index),
            rbrack,
        })
    }

    fn parse_call_or_conversion(&mut self, fun: Expr) -> Expr {
        let lparen = self.expect(TokenKind::LParen);
        let mut args = Vec::new();
        let mut ellipsis = Pos::NONE;
        while self.tok != TokenKind::RParen && self.tok != TokenKind::Eof && !ellipsis.is_valid() {
            args.push(self.parse_rhs_or_type());
            if self.tok == TokenKind::Ellipsis {
                ellipsis = self.pos;
                self.next();
            }
            if !self.at_comma("argument list", TokenKind::RParen) {
                break;
            }
            self.next();
        }
        let rparen = self.expect(TokenKind::RParen);

        let mut call = CallExpr {
            fun: Box::new(fun),
            lparen,
            args,
            ellipsis,
            rparen,
        };

        // trailing callback sugar: call(args) do (params) results: body
        if self.tok == TokenKind::Do {
            let do_pos = self.pos;
            self.next();
            let scope = Scope::new(Some(Rc::clone(&self.top_scope)));
            let (params, results) = self.parse_signature(&scope);
            let typ = FuncType {
                func_pos: do_pos,
                params,
                results,
            };
            let body = self.parse_body(scope);
            call.args.push(Expr::FuncLit(FuncLit { typ, body }));
        }

        Expr::Call(call)
    }

    fn parse_element(&mut self, key_ok: bool) -> Expr {
        if self.tok == TokenKind::LBrace {
            return self.parse_literal_value(None);
        }

        let x = self.parse_expr(key_ok);
        if key_ok {
            if self.tok == TokenKind::Colon {
                let colon = self.pos;
                self.next();
                // struct field keys stay unresolved for a later pass
                self.try_resolve(&x, false);
                let value = self.parse_element(false);
                return Expr::KeyValue(KeyValueExpr {
                    key: Box::new(x),
                    colon,
                    value: Box::new(value),
                });
            }
            self.resolve(&x);
        }
        x
    }

    fn parse_literal_value(&mut self, typ: Option<Expr>) -> Expr {
        let lbrace = self.expect(TokenKind::LBrace);
        let mut elts = Vec::new();
        while self.tok != TokenKind::RBrace && self.tok != TokenKind::Eof {
            elts.push(self.parse_element(true));
            if !self.at_comma("composite literal", TokenKind::RBrace) {
                break;
            }
            self.next();
        }
        let rbrace = self.expect(TokenKind::RBrace);
        Expr::CompositeLit(CompositeLit {
            typ: typ.map(Box::new),
            lbrace,
            elts,
            rbrace,
        })
    }

    fn is_literal_type(x: &Expr) -> bool {
        match x {
            Expr::Bad(_) | Expr::Ident(_) | Expr::Array(_) | Expr::Struct(_) | Expr::Map(_) => true,
            Expr::Selector(sel) => matches!(*sel.x, Expr::Ident(_)),
            _ => false,
        }
    }

    fn parse_primary_expr(&mut self, lhs: bool) -> Expr {
        let mut lhs = lhs;
        let mut x = self.parse_operand(lhs);
        loop {
            match self.tok {
                TokenKind::Period => {
                    self.next();
                    if lhs {
                        self.resolve(&x);
                        lhs = false;
                    }
                    x = self.parse_selector_or_type_assertion(x);
                }
                TokenKind::LBracket => {
                    if lhs {
                        self.resolve(&x);
                        lhs = false;
                    }
                    x = self.parse_index_or_slice(x);
                }
                TokenKind::LParen => {
                    if lhs {
                        self.resolve(&x);
                        lhs = false;
                    }
                    x = self.parse_call_or_conversion(x);
                }
                TokenKind::LBrace if Self::is_literal_type(&x) => {
                    if lhs {
                        self.resolve(&x);
                        lhs = false;
                    }
                    x = self.parse_literal_value(Some(x));
                }
                _ => break,
            }
        }
        x
    }

    fn parse_unary_expr(&mut self, lhs: bool) -> Expr {
        use TokenKind::*;
        match self.tok {
            Add | Sub | Not | Xor | And => {
                let (pos, op) = (self.pos, self.tok);
                self.next();
                let x = self.parse_unary_expr(false);
                Expr::Unary(UnaryExpr {
                    op_pos: pos,
                    op,
                    x: Box::new(x),
                })
            }
            Arrow => {
                let pos = self.pos;
                self.next();
                if self.tok == Chan {
                    // <-chan T
                    self.next();
                    let value = self.parse_type();
                    Expr::Chan(ChanType {
                        begin: pos,
                        dir: ChanDir::Recv,
                        value: Box::new(value),
                    })
                } else {
                    let x = self.parse_unary_expr(false);
                    Expr::Unary(UnaryExpr {
                        op_pos: pos,
                        op: Arrow,
                        x: Box::new(x),
                    })
                }
            }
            Mul => {
                let pos = self.pos;
                self.next();
                let x = self.parse_unary_expr(false);
                Expr::Star(StarExpr {
                    star: pos,
                    x: Box::new(x),
                })
            }
            _ => self.parse_primary_expr(lhs),
        }
    }

    pub(crate) fn parse_binary_expr(&mut self, lhs: bool, prec1: u8) -> Expr {
        let mut lhs = lhs;
        let mut x = self.parse_unary_expr(lhs);
        loop {
            let op = self.tok;
            let oprec = op.precedence();
            if oprec < prec1 {
                return x;
            }
            let pos = self.expect(op);
            if lhs {
                self.resolve(&x);
                lhs = false;
            }
            let y = self.parse_binary_expr(false, oprec + 1);
            x = Expr::Binary(BinaryExpr {
                x: Box::new(x),
                op_pos: pos,
                op,
                y: Box::new(y),
            });
        }
    }

    /// Parse an expression. With `lhs` set, identifier resolution is
    /// deferred until the caller knows whether the expression is being
    /// assigned to, declared, or read.
    pub(crate) fn parse_expr(&mut self, lhs: bool) -> Expr {
        self.parse_binary_expr(lhs, LOWEST_PREC + 1)
    }

    pub(crate) fn parse_rhs_or_type(&mut self) -> Expr {
        self.parse_expr(false)
    }

    /// A list of types, as in type-switch case clauses.
    pub(crate) fn parse_type_list(&mut self) -> Vec<Expr> {
        let mut list = vec![self.parse_type()];
        while self.tok == TokenKind::Comma {
            self.next();
            list.push(self.parse_type());
        }
        list
    }
}
