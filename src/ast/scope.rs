//! Name resolution tables: scopes form a chain toward the package scope,
//! objects describe one bound name each.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use crate::token::Pos;

/// Cheaply clonable handle to a scope; the parser threads these through
/// nested blocks.
pub type SharedScope = Rc<RefCell<Scope>>;

/// What kind of entity an [`Object`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjKind {
    Bad,
    Package,
    Const,
    Type,
    Var,
    Func,
    Label,
}

impl Display for ObjKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ObjKind::Bad => "bad",
            ObjKind::Package => "package",
            ObjKind::Const => "const",
            ObjKind::Type => "type",
            ObjKind::Var => "var",
            ObjKind::Func => "func",
            ObjKind::Label => "label",
        };
        f.write_str(s)
    }
}

/// A back reference from an object to its declaring node, reduced to the
/// node kind and its `(name, position)` pairs. This keeps `Object::pos()`
/// computable without shared pointers back into the tree.
#[derive(Debug, Clone, Default)]
pub enum DeclRef {
    #[default]
    None,
    Field {
        names: Vec<(String, Pos)>,
    },
    ImportSpec {
        name: Option<(String, Pos)>,
        path_pos: Pos,
    },
    ValueSpec {
        names: Vec<(String, Pos)>,
    },
    TypeSpec {
        name: String,
        pos: Pos,
    },
    FuncDecl {
        name: String,
        pos: Pos,
    },
    LabeledStmt {
        label: String,
        pos: Pos,
    },
    AssignStmt {
        names: Vec<(String, Pos)>,
    },
    Scope,
}

/// The descriptor of one bound name.
///
/// The type slot deliberately does not exist here: types are attached by a
/// later checking pass, not by this crate.
#[derive(Debug)]
pub struct Object {
    pub kind: ObjKind,
    pub name: String,
    pub decl: RefCell<DeclRef>,
    /// For constants, the `iota` index of the declaring spec.
    pub data: Cell<Option<usize>>,
}

impl Object {
    pub fn new(kind: ObjKind, name: impl Into<String>) -> Rc<Object> {
        Rc::new(Object {
            kind,
            name: name.into(),
            decl: RefCell::new(DeclRef::None),
            data: Cell::new(None),
        })
    }

    /// The source position of the identifier that declared this object, or
    /// `Pos::NONE` when it cannot be computed.
    pub fn pos(&self) -> Pos {
        fn find(names: &[(String, Pos)], want: &str) -> Pos {
            names
                .iter()
                .find(|(name, _)| name == want)
                .map(|(_, pos)| *pos)
                .unwrap_or(Pos::NONE)
        }

        match &*self.decl.borrow() {
            DeclRef::None | DeclRef::Scope => Pos::NONE,
            DeclRef::Field { names } => find(names, &self.name),
            DeclRef::ImportSpec { name, path_pos } => match name {
                Some((name, pos)) if name == &self.name => *pos,
                Some(_) => Pos::NONE,
                None => *path_pos,
            },
            DeclRef::ValueSpec { names } => find(names, &self.name),
            DeclRef::TypeSpec { name, pos } | DeclRef::FuncDecl { name, pos } => {
                if name == &self.name {
                    *pos
                } else {
                    Pos::NONE
                }
            }
            DeclRef::LabeledStmt { label, pos } => {
                if label == &self.name {
                    *pos
                } else {
                    Pos::NONE
                }
            }
            DeclRef::AssignStmt { names } => find(names, &self.name),
        }
    }
}

/// The resolution state of an identifier.
///
/// The three states are distinct on purpose: `Unresolved` records that
/// resolution was attempted and failed, while `Unbound` means no attempt
/// applies (blank identifiers, field names, labels not yet resolved).
#[derive(Debug, Clone, Default)]
pub enum Binding {
    #[default]
    Unbound,
    Unresolved,
    Resolved(Rc<Object>),
}

impl Binding {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Binding::Unresolved)
    }

    pub fn object(&self) -> Option<Rc<Object>> {
        match self {
            Binding::Resolved(obj) => Some(Rc::clone(obj)),
            _ => None,
        }
    }
}

/// A mapping from names to objects plus a pointer to the enclosing scope.
#[derive(Debug, Default)]
pub struct Scope {
    pub outer: Option<SharedScope>,
    objects: HashMap<String, Rc<Object>>,
}

impl Scope {
    pub fn new(outer: Option<SharedScope>) -> SharedScope {
        Rc::new(RefCell::new(Scope {
            outer,
            objects: HashMap::new(),
        }))
    }

    /// Find `name` in this scope only; enclosing scopes are the caller's
    /// business.
    pub fn lookup(&self, name: &str) -> Option<Rc<Object>> {
        self.objects.get(name).map(Rc::clone)
    }

    /// Insert `obj`; on collision the scope is unchanged and the previously
    /// declared object is returned.
    pub fn insert(&mut self, obj: Rc<Object>) -> Option<Rc<Object>> {
        if let Some(existing) = self.objects.get(&obj.name) {
            return Some(Rc::clone(existing));
        }
        self.objects.insert(obj.name.clone(), obj);
        None
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_collision() {
        let scope = Scope::new(None);
        let a = Object::new(ObjKind::Var, "x");
        assert!(scope.borrow_mut().insert(Rc::clone(&a)).is_none());

        let b = Object::new(ObjKind::Var, "x");
        let prior = scope.borrow_mut().insert(b).unwrap();
        assert!(Rc::ptr_eq(&prior, &a));
    }

    #[test]
    fn lookup_ignores_outer() {
        let outer = Scope::new(None);
        outer
            .borrow_mut()
            .insert(Object::new(ObjKind::Var, "x"));
        let inner = Scope::new(Some(Rc::clone(&outer)));

        assert!(inner.borrow().lookup("x").is_none());
        assert!(inner.borrow().outer.as_ref().unwrap().borrow().lookup("x").is_some());
    }

    #[test]
    fn object_pos_matches_declaring_name() {
        let obj = Object::new(ObjKind::Var, "y");
        *obj.decl.borrow_mut() = DeclRef::ValueSpec {
            names: vec![
                ("x".to_string(), Pos::from_u32(10)),
                ("y".to_string(), Pos::from_u32(13)),
            ],
        };
        assert_eq!(obj.pos(), Pos::from_u32(13));

        let stray = Object::new(ObjKind::Var, "z");
        assert_eq!(stray.pos(), Pos::NONE);
    }
}
