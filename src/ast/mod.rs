//! The abstract syntax tree shared by both surface forms, plus the
//! `Scope`/`Object` tables used for identifier resolution.
//!
//! Every node exposes `pos()` and `end()` so that downstream tools can map
//! it back to source. Identifiers are reference counted: the parser may
//! re-resolve them against the package scope after the tree is built.

mod declaration;
mod expression;
mod imports;
mod scope;
mod statement;

pub use declaration::*;
pub use expression::*;
pub use imports::*;
pub use scope::*;
pub use statement::*;

use std::rc::Rc;

use crate::token::Pos;

/// A single `//` or `/* */` comment.
#[derive(Debug, Clone)]
pub struct Comment {
    /// Position of the leading `/`.
    pub slash: Pos,
    /// Comment text including the markers.
    pub text: String,
}

impl Comment {
    pub fn pos(&self) -> Pos {
        self.slash
    }

    pub fn end(&self) -> Pos {
        self.slash.add(self.text.len() as u32)
    }
}

/// A run of comments with no other tokens and no blank lines between them.
#[derive(Debug, Clone)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    pub fn pos(&self) -> Pos {
        self.list.first().map(Comment::pos).unwrap_or(Pos::NONE)
    }

    pub fn end(&self) -> Pos {
        self.list.last().map(Comment::end).unwrap_or(Pos::NONE)
    }
}

/// A field declaration in a struct type, method list, or parameter/result
/// list.
#[derive(Debug, Clone)]
pub struct Field {
    pub doc: Option<CommentGroup>,
    /// Field/parameter names; empty for anonymous fields.
    pub names: Vec<Rc<Ident>>,
    pub typ: Expr,
    pub tag: Option<BasicLit>,
    pub comment: Option<CommentGroup>,
}

impl Field {
    pub fn pos(&self) -> Pos {
        match self.names.first() {
            Some(name) => name.pos(),
            None => self.typ.pos(),
        }
    }

    pub fn end(&self) -> Pos {
        match &self.tag {
            Some(tag) => tag.end(),
            None => self.typ.end(),
        }
    }
}

/// A list of fields. The opening/closing positions are those of the
/// enclosing brackets, or of the layout tokens standing in for them; both
/// may be invalid for layout-only lists.
#[derive(Debug, Clone)]
pub struct FieldList {
    pub opening: Pos,
    pub list: Vec<Field>,
    pub closing: Pos,
}

impl FieldList {
    pub fn pos(&self) -> Pos {
        if self.opening.is_valid() {
            self.opening
        } else {
            self.list.first().map(Field::pos).unwrap_or(Pos::NONE)
        }
    }

    pub fn end(&self) -> Pos {
        if self.closing.is_valid() {
            self.closing.add(1)
        } else {
            self.list.last().map(Field::end).unwrap_or(Pos::NONE)
        }
    }

    /// Total number of declared names; anonymous fields count as one.
    pub fn num_fields(&self) -> usize {
        self.list.iter().map(|f| f.names.len().max(1)).sum()
    }
}

/// The root node of a parsed source file.
#[derive(Debug)]
pub struct SourceFile {
    pub doc: Option<CommentGroup>,
    pub package_pos: Pos,
    pub name: Rc<Ident>,
    pub decls: Vec<Decl>,
    /// The package scope, holding all file-level declarations.
    pub scope: SharedScope,
    /// Identifiers that could not be resolved within this file; the surface
    /// for a later type-checking pass.
    pub unresolved: Vec<Rc<Ident>>,
    /// All comment groups, in strict source order.
    pub comments: Vec<CommentGroup>,
}

impl SourceFile {
    pub fn pos(&self) -> Pos {
        self.package_pos
    }

    pub fn end(&self) -> Pos {
        self.decls
            .last()
            .map(Decl::end)
            .unwrap_or_else(|| self.name.end())
    }

    /// The import specs of all import declarations, in source order.
    pub fn imports(&self) -> Vec<&ImportSpec> {
        let mut specs = Vec::new();
        for decl in &self.decls {
            if let Decl::Gen(gen) = decl {
                if gen.tok == crate::token::TokenKind::Import {
                    for spec in &gen.specs {
                        if let Spec::Import(import) = spec {
                            specs.push(import);
                        }
                    }
                }
            }
        }
        specs
    }
}
