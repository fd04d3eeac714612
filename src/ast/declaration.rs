//! Declaration and specification nodes.

use std::rc::Rc;

use crate::token::{Pos, TokenKind};

use super::{BasicLit, BlockStmt, CommentGroup, Expr, FieldList, FuncType, Ident};

#[derive(Debug, Clone)]
pub enum Decl {
    Bad(BadDecl),
    Gen(GenDecl),
    Func(FuncDecl),
}

#[derive(Debug, Clone)]
pub struct BadDecl {
    pub from: Pos,
    pub to: Pos,
}

/// An `import`, `const`, `var`, or `type` declaration.
///
/// For a grouped declaration written with a colon header and an indented
/// spec list, `lparen`/`rparen` carry the `Indent`/`Dedent` positions; for a
/// single-spec declaration both are invalid.
#[derive(Debug, Clone)]
pub struct GenDecl {
    pub doc: Option<CommentGroup>,
    pub tok_pos: Pos,
    pub tok: TokenKind,
    pub lparen: Pos,
    pub specs: Vec<Spec>,
    pub rparen: Pos,
}

impl GenDecl {
    /// Whether this declaration was written as a group.
    pub fn is_group(&self) -> bool {
        self.lparen.is_valid()
    }
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub doc: Option<CommentGroup>,
    /// The receiver field list for methods, `None` for plain functions.
    pub recv: Option<FieldList>,
    pub name: Rc<Ident>,
    pub typ: FuncType,
    pub body: Option<BlockStmt>,
}

#[derive(Debug, Clone)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, Clone)]
pub struct ImportSpec {
    pub doc: Option<CommentGroup>,
    pub name: Option<Rc<Ident>>,
    pub path: BasicLit,
    pub comment: Option<CommentGroup>,
}

impl ImportSpec {
    pub fn pos(&self) -> Pos {
        match &self.name {
            Some(name) => name.pos(),
            None => self.path.pos(),
        }
    }

    pub fn end(&self) -> Pos {
        self.path.end()
    }
}

/// A constant or variable specification.
#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub doc: Option<CommentGroup>,
    pub names: Vec<Rc<Ident>>,
    pub typ: Option<Expr>,
    pub values: Vec<Expr>,
    pub comment: Option<CommentGroup>,
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub doc: Option<CommentGroup>,
    pub name: Rc<Ident>,
    pub typ: Expr,
    pub comment: Option<CommentGroup>,
}

impl Spec {
    pub fn pos(&self) -> Pos {
        match self {
            Spec::Import(s) => s.pos(),
            Spec::Value(s) => s.names.first().map(|n| n.pos()).unwrap_or(Pos::NONE),
            Spec::Type(s) => s.name.pos(),
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Spec::Import(s) => s.end(),
            Spec::Value(s) => {
                if let Some(value) = s.values.last() {
                    value.end()
                } else if let Some(typ) = &s.typ {
                    typ.end()
                } else {
                    s.names.last().map(|n| n.end()).unwrap_or(Pos::NONE)
                }
            }
            Spec::Type(s) => s.typ.end(),
        }
    }
}

impl Decl {
    pub fn pos(&self) -> Pos {
        match self {
            Decl::Bad(d) => d.from,
            Decl::Gen(d) => d.tok_pos,
            Decl::Func(d) => d.typ.pos(),
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Decl::Bad(d) => d.to,
            Decl::Gen(d) => {
                if d.rparen.is_valid() {
                    d.rparen.add(1)
                } else {
                    d.specs.last().map(Spec::end).unwrap_or_else(|| {
                        d.tok_pos.add(d.tok.text().len() as u32)
                    })
                }
            }
            Decl::Func(d) => match &d.body {
                Some(body) => body.end(),
                None => d.typ.end(),
            },
        }
    }
}
