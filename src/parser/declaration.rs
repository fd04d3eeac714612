//! Declaration and specification productions.

use std::rc::Rc;

use crate::ast::*;
use crate::token::{Pos, TokenKind};

use super::Parser;

impl<'a> Parser<'a> {
    /// An `import`, `const`, `var`, or `type` declaration. A keyword alone
    /// on its line followed by an indented spec list forms a group; the
    /// `Indent`/`Dedent` positions stand in for the parentheses of the
    /// canonical form.
    pub(crate) fn parse_gen_decl(&mut self, keyword: TokenKind) -> Decl {
        self.trace_begin("GenDecl");

        let doc = self.lead_comment.take();
        let pos = self.expect(keyword);

        let mut specs = Vec::new();
        let mut lparen = Pos::NONE;
        let mut rparen = Pos::NONE;

        if self.tok == TokenKind::Indent {
            lparen = self.pos;
            self.next();
            let mut iota = 0;
            while self.tok != TokenKind::Dedent && self.tok != TokenKind::Eof && !self.bailout {
                specs.push(self.parse_spec(keyword, iota));
                iota += 1;
            }
            rparen = self.expect(TokenKind::Dedent);
            self.expect_semi();
        } else {
            specs.push(self.parse_spec(keyword, 0));
        }

        self.trace_end();
        Decl::Gen(GenDecl {
            doc,
            tok_pos: pos,
            tok: keyword,
            lparen,
            specs,
            rparen,
        })
    }

    fn parse_spec(&mut self, keyword: TokenKind, iota: usize) -> Spec {
        match keyword {
            TokenKind::Import => self.parse_import_spec(),
            TokenKind::Type => self.parse_type_spec(),
            _ => self.parse_value_spec(keyword, iota),
        }
    }

    fn parse_import_spec(&mut self) -> Spec {
        let doc = self.lead_comment.take();

        let name = match self.tok {
            TokenKind::Period => {
                let pos = self.pos;
                self.next();
                Some(Ident::new(pos, "."))
            }
            TokenKind::Ident => Some(self.parse_ident()),
            _ => None,
        };

        let path = if self.tok == TokenKind::Str {
            let lit = BasicLit {
                value_pos: self.pos,
                kind: self.tok,
                value: self.lit.clone(),
            };
            self.next();
            lit
        } else {
            let pos = self.pos;
            self.expect(TokenKind::Str); // report the error
            BasicLit {
                value_pos: pos,
                kind: TokenKind::Str,
                value: String::new(),
            }
        };
        self.expect_semi();
        let comment = self.line_comment.take();

        Spec::Import(ImportSpec {
            doc,
            name,
            path,
            comment,
        })
    }

    fn parse_value_spec(&mut self, keyword: TokenKind, iota: usize) -> Spec {
        let doc = self.lead_comment.take();

        let names = self.parse_ident_list();
        let typ = self.try_type();
        let values = if self.tok == TokenKind::Assign {
            self.next();
            self.parse_rhs_list()
        } else {
            Vec::new()
        };

        if keyword == TokenKind::Var && typ.is_none() && values.is_empty() {
            let pos = self.pos;
            self.error(pos, "missing variable type or initialization");
        }

        self.expect_semi();
        let comment = self.line_comment.take();

        let (kind, data) = match keyword {
            TokenKind::Const => (ObjKind::Const, Some(iota)),
            _ => (ObjKind::Var, None),
        };
        let decl = DeclRef::ValueSpec {
            names: names.iter().map(|n| (n.name.clone(), n.pos())).collect(),
        };
        let scope = Rc::clone(&self.top_scope);
        self.declare(decl, data, &scope, kind, &names);

        Spec::Value(ValueSpec {
            doc,
            names,
            typ,
            values,
            comment,
        })
    }

    fn parse_type_spec(&mut self) -> Spec {
        let doc = self.lead_comment.take();

        let name = self.parse_ident();
        // declare before parsing the type so self-referential types resolve
        let decl = DeclRef::TypeSpec {
            name: name.name.clone(),
            pos: name.pos(),
        };
        let scope = Rc::clone(&self.top_scope);
        self.declare(decl, None, &scope, ObjKind::Type, &[Rc::clone(&name)]);

        let typ = self.parse_type();
        self.expect_semi();
        let comment = self.line_comment.take();

        Spec::Type(TypeSpec {
            doc,
            name,
            typ,
            comment,
        })
    }

    /// A function or method declaration. A method is written
    /// `func TypeName.name(...)` or `func *TypeName.name(...)`; its receiver
    /// is declared in the function scope under the synthetic name `self`.
    pub(crate) fn parse_func_decl(&mut self) -> Decl {
        self.trace_begin("FunctionDecl");

        let doc = self.lead_comment.take();
        let pos = self.expect(TokenKind::Func);
        let scope = Scope::new(Some(Rc::clone(&self.top_scope)));

        let mut recv_type = None;
        let name;
        if self.tok == TokenKind::Mul {
            let star = self.pos;
            self.next();
            let base = self.parse_ident();
            let base_expr = Expr::Ident(base);
            self.resolve(&base_expr);
            self.expect(TokenKind::Period);
            recv_type = Some(Expr::Star(StarExpr {
                star,
                x: Box::new(base_expr),
            }));
            name = self.parse_ident();
        } else {
            let first = self.parse_ident();
            if self.tok == TokenKind::Period {
                self.next();
                let base_expr = Expr::Ident(first);
                self.resolve(&base_expr);
                recv_type = Some(base_expr);
                name = self.parse_ident();
            } else {
                name = first;
            }
        }

        let recv = recv_type.map(|typ| {
            let self_ident = Ident::new(typ.pos(), "self");
            let decl = DeclRef::Field {
                names: vec![(self_ident.name.clone(), self_ident.pos())],
            };
            self.declare(decl, None, &scope, ObjKind::Var, &[Rc::clone(&self_ident)]);
            FieldList {
                opening: Pos::NONE,
                list: vec![Field {
                    doc: None,
                    names: vec![self_ident],
                    typ,
                    tag: None,
                    comment: None,
                }],
                closing: Pos::NONE,
            }
        });

        let (params, results) = self.parse_signature(&scope);
        let typ = FuncType {
            func_pos: pos,
            params,
            results,
        };

        let body = if self.at_block_start() {
            Some(self.parse_body(scope))
        } else {
            None
        };
        self.expect_semi();

        if recv.is_none() && name.name != "init" {
            // init functions never refer to each other, so they stay out of
            // the package scope
            let decl = DeclRef::FuncDecl {
                name: name.name.clone(),
                pos: name.pos(),
            };
            let scope = Rc::clone(&self.pkg_scope);
            self.declare(decl, None, &scope, ObjKind::Func, &[Rc::clone(&name)]);
        }

        self.trace_end();
        Decl::Func(FuncDecl {
            doc,
            recv,
            name,
            typ,
            body,
        })
    }

    pub(crate) fn parse_decl(&mut self) -> Decl {
        self.trace_begin("Declaration");
        let decl = match self.tok {
            TokenKind::Const | TokenKind::Var | TokenKind::Type => self.parse_gen_decl(self.tok),
            TokenKind::Func => self.parse_func_decl(),
            _ => {
                let pos = self.pos;
                self.error_expected(pos, "declaration");
                self.sync_decl();
                Decl::Bad(BadDecl {
                    from: pos,
                    to: self.safe_pos(self.pos),
                })
            }
        };
        self.trace_end();
        decl
    }
}
