//! Composite keys used instead of object identity.

use serde::Serialize;
use std::fmt;

/// `(module id, name)`: one enum declaration, or a name scoped to one module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclKey {
    pub module: String,
    pub name: String,
}

impl DeclKey {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for DeclKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.module, self.name)
    }
}

/// `(declaration, member)`: one member of one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DefKey {
    pub decl: DeclKey,
    pub member: String,
}

impl DefKey {
    pub fn new(decl: DeclKey, member: impl Into<String>) -> Self {
        Self {
            decl,
            member: member.into(),
        }
    }
}

impl fmt::Display for DefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.decl, self.member)
    }
}

/// A name bound in a module: visible locally (import) or exposed (export).
///
/// Default exports use the synthetic name `default`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Binding {
    Import(DeclKey),
    Export(DeclKey),
}

impl Binding {
    pub fn import(module: impl Into<String>, local: impl Into<String>) -> Self {
        Self::Import(DeclKey::new(module, local))
    }

    pub fn export(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Export(DeclKey::new(module, name))
    }

    pub fn key(&self) -> &DeclKey {
        match self {
            Self::Import(k) | Self::Export(k) => k,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Import(k) => write!(f, "import {}", k),
            Self::Export(k) => write!(f, "export {}", k),
        }
    }
}
