//! Statement nodes.

use std::rc::Rc;

use crate::token::{Pos, TokenKind};

use super::{Decl, Expr, Ident};

#[derive(Debug, Clone)]
pub enum Stmt {
    Bad(BadStmt),
    Decl(Box<Decl>),
    Empty(EmptyStmt),
    Labeled(Box<LabeledStmt>),
    Expr(Box<ExprStmt>),
    Send(Box<SendStmt>),
    IncDec(Box<IncDecStmt>),
    Assign(Box<AssignStmt>),
    Go(Box<GoStmt>),
    Defer(Box<DeferStmt>),
    Return(Box<ReturnStmt>),
    Branch(BranchStmt),
    Block(Box<BlockStmt>),
    If(Box<IfStmt>),
    Case(Box<CaseClause>),
    Switch(Box<SwitchStmt>),
    TypeSwitch(Box<TypeSwitchStmt>),
    Comm(Box<CommClause>),
    Select(Box<SelectStmt>),
    For(Box<ForStmt>),
    Range(Box<RangeStmt>),
}

#[derive(Debug, Clone)]
pub struct BadStmt {
    pub from: Pos,
    pub to: Pos,
}

#[derive(Debug, Clone)]
pub struct EmptyStmt {
    pub semicolon: Pos,
}

#[derive(Debug, Clone)]
pub struct LabeledStmt {
    pub label: Rc<Ident>,
    pub colon: Pos,
    pub stmt: Stmt,
}

#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub x: Expr,
}

#[derive(Debug, Clone)]
pub struct SendStmt {
    pub chan: Expr,
    pub arrow: Pos,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct IncDecStmt {
    pub x: Expr,
    pub tok_pos: Pos,
    pub tok: TokenKind,
}

#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub tok_pos: Pos,
    pub tok: TokenKind,
    pub rhs: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct GoStmt {
    pub go_pos: Pos,
    pub call: Expr,
}

#[derive(Debug, Clone)]
pub struct DeferStmt {
    pub defer_pos: Pos,
    pub call: Expr,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub return_pos: Pos,
    pub results: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct BranchStmt {
    pub tok_pos: Pos,
    pub tok: TokenKind,
    pub label: Option<Rc<Ident>>,
}

/// A statement list with its delimiters.
///
/// `small` is true when the body was written in the colon-prefixed
/// single-statement form; printers may use it as a layout hint but it never
/// changes semantics. For layout-delimited blocks, `opening`/`closing` carry
/// the `Indent`/`Dedent` positions.
#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub opening: Pos,
    pub list: Vec<Stmt>,
    pub closing: Pos,
    pub small: bool,
}

impl BlockStmt {
    pub fn pos(&self) -> Pos {
        if self.opening.is_valid() {
            self.opening
        } else {
            self.list.first().map(Stmt::pos).unwrap_or(Pos::NONE)
        }
    }

    pub fn end(&self) -> Pos {
        if self.closing.is_valid() {
            self.closing.add(1)
        } else {
            self.list.last().map(Stmt::end).unwrap_or(Pos::NONE)
        }
    }
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub if_pos: Pos,
    pub init: Option<Stmt>,
    pub cond: Expr,
    pub body: BlockStmt,
    pub els: Option<Stmt>,
}

#[derive(Debug, Clone)]
pub struct CaseClause {
    pub case_pos: Pos,
    /// Empty for `default`.
    pub list: Vec<Expr>,
    pub colon: Pos,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub switch_pos: Pos,
    pub init: Option<Stmt>,
    pub tag: Option<Expr>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone)]
pub struct TypeSwitchStmt {
    pub switch_pos: Pos,
    pub init: Option<Stmt>,
    /// The guard: an `x := y.(type)` assignment or a bare `y.(type)`
    /// expression statement.
    pub assign: Stmt,
    pub body: BlockStmt,
}

#[derive(Debug, Clone)]
pub struct CommClause {
    pub case_pos: Pos,
    /// `None` for `default`.
    pub comm: Option<Stmt>,
    pub colon: Pos,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct SelectStmt {
    pub select_pos: Pos,
    pub body: BlockStmt,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub for_pos: Pos,
    pub init: Option<Stmt>,
    pub cond: Option<Expr>,
    pub post: Option<Stmt>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone)]
pub struct RangeStmt {
    pub for_pos: Pos,
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    pub tok_pos: Pos,
    /// `Assign` or `Define`; `Illegal` when no key/value clause is present.
    pub tok: TokenKind,
    pub x: Expr,
    pub body: BlockStmt,
}

impl Stmt {
    pub fn pos(&self) -> Pos {
        match self {
            Stmt::Bad(s) => s.from,
            Stmt::Decl(d) => d.pos(),
            Stmt::Empty(s) => s.semicolon,
            Stmt::Labeled(s) => s.label.pos(),
            Stmt::Expr(s) => s.x.pos(),
            Stmt::Send(s) => s.chan.pos(),
            Stmt::IncDec(s) => s.x.pos(),
            Stmt::Assign(s) => s.lhs.first().map(Expr::pos).unwrap_or(s.tok_pos),
            Stmt::Go(s) => s.go_pos,
            Stmt::Defer(s) => s.defer_pos,
            Stmt::Return(s) => s.return_pos,
            Stmt::Branch(s) => s.tok_pos,
            Stmt::Block(s) => s.pos(),
            Stmt::If(s) => s.if_pos,
            Stmt::Case(s) => s.case_pos,
            Stmt::Switch(s) => s.switch_pos,
            Stmt::TypeSwitch(s) => s.switch_pos,
            Stmt::Comm(s) => s.case_pos,
            Stmt::Select(s) => s.select_pos,
            Stmt::For(s) => s.for_pos,
            Stmt::Range(s) => s.for_pos,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Stmt::Bad(s) => s.to,
            Stmt::Decl(d) => d.end(),
            Stmt::Empty(s) => s.semicolon.add(1),
            Stmt::Labeled(s) => s.stmt.end(),
            Stmt::Expr(s) => s.x.end(),
            Stmt::Send(s) => s.value.end(),
            Stmt::IncDec(s) => s.tok_pos.add(2),
            Stmt::Assign(s) => s.rhs.last().map(Expr::end).unwrap_or(s.tok_pos),
            Stmt::Go(s) => s.call.end(),
            Stmt::Defer(s) => s.call.end(),
            Stmt::Return(s) => s
                .results
                .last()
                .map(Expr::end)
                .unwrap_or_else(|| s.return_pos.add(6)),
            Stmt::Branch(s) => match &s.label {
                Some(label) => label.end(),
                None => s.tok_pos.add(s.tok.text().len() as u32),
            },
            Stmt::Block(s) => s.end(),
            Stmt::If(s) => match &s.els {
                Some(els) => els.end(),
                None => s.body.end(),
            },
            Stmt::Case(s) => s.body.last().map(Stmt::end).unwrap_or_else(|| {
                if s.colon.is_valid() {
                    s.colon.add(1)
                } else {
                    s.list.last().map(Expr::end).unwrap_or_else(|| s.case_pos.add(7))
                }
            }),
            Stmt::Switch(s) => s.body.end(),
            Stmt::TypeSwitch(s) => s.body.end(),
            Stmt::Comm(s) => s.body.last().map(Stmt::end).unwrap_or_else(|| {
                if s.colon.is_valid() {
                    s.colon.add(1)
                } else {
                    s.comm.as_ref().map(|c| c.end()).unwrap_or_else(|| s.case_pos.add(7))
                }
            }),
            Stmt::Select(s) => s.body.end(),
            Stmt::For(s) => s.body.end(),
            Stmt::Range(s) => s.body.end(),
        }
    }
}
