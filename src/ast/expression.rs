//! Expression nodes, including the type-as-expression forms.

use std::cell::RefCell;
use std::rc::Rc;

use crate::token::{Pos, TokenKind};

use super::{Binding, BlockStmt, FieldList};

#[derive(Debug, Clone)]
pub enum Expr {
    Bad(BadExpr),
    Ident(Rc<Ident>),
    Ellipsis(Ellipsis),
    BasicLit(BasicLit),
    FuncLit(FuncLit),
    CompositeLit(CompositeLit),
    Paren(ParenExpr),
    Selector(SelectorExpr),
    Index(IndexExpr),
    Slice(SliceExpr),
    TypeAssert(TypeAssertExpr),
    Call(CallExpr),
    Star(StarExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    KeyValue(KeyValueExpr),

    // type forms
    Array(ArrayType),
    Struct(StructType),
    Func(FuncTypeExpr),
    Interface(InterfaceType),
    Map(MapType),
    Chan(ChanType),
}

/// A placeholder for an expression that failed to parse.
#[derive(Debug, Clone)]
pub struct BadExpr {
    pub from: Pos,
    pub to: Pos,
}

/// An identifier. Reference counted so the parser can re-resolve it against
/// the package scope after the tree is in place.
#[derive(Debug)]
pub struct Ident {
    pub name_pos: Pos,
    pub name: String,
    pub obj: RefCell<Binding>,
}

impl Ident {
    pub fn new(name_pos: Pos, name: impl Into<String>) -> Rc<Ident> {
        Rc::new(Ident {
            name_pos,
            name: name.into(),
            obj: RefCell::new(Binding::Unbound),
        })
    }

    pub fn pos(&self) -> Pos {
        self.name_pos
    }

    pub fn end(&self) -> Pos {
        self.name_pos.add(self.name.len() as u32)
    }

    /// The blank identifier never binds.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// `...` in parameter lists and array types.
#[derive(Debug, Clone)]
pub struct Ellipsis {
    pub ellipsis: Pos,
    pub elt: Option<Box<Expr>>,
}

/// A literal of basic type; the text is kept verbatim.
#[derive(Debug, Clone)]
pub struct BasicLit {
    pub value_pos: Pos,
    pub kind: TokenKind,
    pub value: String,
}

impl BasicLit {
    pub fn pos(&self) -> Pos {
        self.value_pos
    }

    pub fn end(&self) -> Pos {
        self.value_pos.add(self.value.len() as u32)
    }
}

#[derive(Debug, Clone)]
pub struct FuncLit {
    pub typ: FuncType,
    pub body: BlockStmt,
}

#[derive(Debug, Clone)]
pub struct CompositeLit {
    pub typ: Option<Box<Expr>>,
    pub lbrace: Pos,
    pub elts: Vec<Expr>,
    pub rbrace: Pos,
}

#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub lparen: Pos,
    pub x: Box<Expr>,
    pub rparen: Pos,
}

#[derive(Debug, Clone)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Rc<Ident>,
}

#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub lbrack: Pos,
    pub index: Box<Expr>,
    pub rbrack: Pos,
}

#[derive(Debug, Clone)]
pub struct SliceExpr {
    pub x: Box<Expr>,
    pub lbrack: Pos,
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
    pub rbrack: Pos,
}

/// `x.(T)`, or `x.(type)` inside a type switch header when `typ` is `None`.
#[derive(Debug, Clone)]
pub struct TypeAssertExpr {
    pub x: Box<Expr>,
    pub typ: Option<Box<Expr>>,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub lparen: Pos,
    pub args: Vec<Expr>,
    pub ellipsis: Pos,
    pub rparen: Pos,
}

/// `*x`: a pointer type or a dereference, depending on context.
#[derive(Debug, Clone)]
pub struct StarExpr {
    pub star: Pos,
    pub x: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op_pos: Pos,
    pub op: TokenKind,
    pub x: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    pub op_pos: Pos,
    pub op: TokenKind,
    pub y: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct KeyValueExpr {
    pub key: Box<Expr>,
    pub colon: Pos,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct ArrayType {
    pub lbrack: Pos,
    /// `None` for slice types; an `Ellipsis` for `[...]T`.
    pub len: Option<Box<Expr>>,
    pub elt: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct StructType {
    pub struct_pos: Pos,
    pub fields: FieldList,
}

#[derive(Debug, Clone)]
pub struct FuncType {
    pub func_pos: Pos,
    pub params: FieldList,
    pub results: Option<FieldList>,
}

impl FuncType {
    pub fn pos(&self) -> Pos {
        if self.func_pos.is_valid() {
            self.func_pos
        } else {
            self.params.pos()
        }
    }

    pub fn end(&self) -> Pos {
        match &self.results {
            Some(results) => results.end(),
            None => self.params.end(),
        }
    }
}

/// A function type in expression position.
#[derive(Debug, Clone)]
pub struct FuncTypeExpr {
    pub typ: Box<FuncType>,
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    pub interface_pos: Pos,
    pub methods: FieldList,
}

#[derive(Debug, Clone)]
pub struct MapType {
    pub map_pos: Pos,
    pub key: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    SendRecv,
    Send,
    Recv,
}

#[derive(Debug, Clone)]
pub struct ChanType {
    pub begin: Pos,
    pub dir: ChanDir,
    pub value: Box<Expr>,
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Bad(x) => x.from,
            Expr::Ident(x) => x.pos(),
            Expr::Ellipsis(x) => x.ellipsis,
            Expr::BasicLit(x) => x.pos(),
            Expr::FuncLit(x) => x.typ.pos(),
            Expr::CompositeLit(x) => x
                .typ
                .as_ref()
                .map(|t| t.pos())
                .unwrap_or(x.lbrace),
            Expr::Paren(x) => x.lparen,
            Expr::Selector(x) => x.x.pos(),
            Expr::Index(x) => x.x.pos(),
            Expr::Slice(x) => x.x.pos(),
            Expr::TypeAssert(x) => x.x.pos(),
            Expr::Call(x) => x.fun.pos(),
            Expr::Star(x) => x.star,
            Expr::Unary(x) => x.op_pos,
            Expr::Binary(x) => x.x.pos(),
            Expr::KeyValue(x) => x.key.pos(),
            Expr::Array(x) => x.lbrack,
            Expr::Struct(x) => x.struct_pos,
            Expr::Func(x) => x.typ.pos(),
            Expr::Interface(x) => x.interface_pos,
            Expr::Map(x) => x.map_pos,
            Expr::Chan(x) => x.begin,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Expr::Bad(x) => x.to,
            Expr::Ident(x) => x.end(),
            Expr::Ellipsis(x) => match &x.elt {
                Some(elt) => elt.end(),
                None => x.ellipsis.add(3),
            },
            Expr::BasicLit(x) => x.end(),
            Expr::FuncLit(x) => x.body.end(),
            Expr::CompositeLit(x) => x.rbrace.add(1),
            Expr::Paren(x) => x.rparen.add(1),
            Expr::Selector(x) => x.sel.end(),
            Expr::Index(x) => x.rbrack.add(1),
            Expr::Slice(x) => x.rbrack.add(1),
            Expr::TypeAssert(x) => match &x.typ {
                Some(typ) => typ.end().add(1),
                None => x.x.end(),
            },
            Expr::Call(x) => x.rparen.add(1),
            Expr::Star(x) => x.x.end(),
            Expr::Unary(x) => x.x.end(),
            Expr::Binary(x) => x.y.end(),
            Expr::KeyValue(x) => x.value.end(),
            Expr::Array(x) => x.elt.end(),
            Expr::Struct(x) => x.fields.end(),
            Expr::Func(x) => x.typ.end(),
            Expr::Interface(x) => x.methods.end(),
            Expr::Map(x) => x.value.end(),
            Expr::Chan(x) => x.value.end(),
        }
    }

    /// Remove any enclosing parentheses.
    pub fn unparen(&self) -> &Expr {
        match self {
            Expr::Paren(p) => p.x.unparen(),
            other => other,
        }
    }
}
