//! Const enum declaration extraction from the TypeScript AST.
//!
//! Looks at top-level statements and `export` wrappers only:
//! - `const enum E { ... }`
//! - `export const enum E { ... }`
//! - `declare const enum E { ... }` / `export declare const enum E { ... }`
//!
//! Plain (non-const) enums are ignored. Each member initializer is classified
//! once into a [`MemberInit`] variant so later phases dispatch on the tag
//! instead of re-inspecting AST shapes.

use std::collections::HashMap;

use swc_ecma_ast::{
    Decl, ExportDecl, Expr, Lit, MemberExpr, MemberProp, Module, ModuleDecl, ModuleItem, Stmt,
    TsEnumDecl, TsEnumMemberId, UnaryExpr, UnaryOp,
};

use super::value::{Literal, PrefixOp};
use crate::common::DeclKey;
use crate::parse::ModuleInfo;

/// Classified initializer of one enum member.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberInit {
    /// Numeric, string, or substitution-free template literal
    Literal(Literal),
    /// `-1`, `+2`, `~0`, `!"x"`
    UnaryLiteral(PrefixOp, Literal),
    /// `Other.Member`, `Other["Member"]`, or a bare earlier member of the
    /// same enum (`qualifier == None`)
    MemberRef {
        qualifier: Option<String>,
        member: String,
    },
    /// No initializer: implicit ordinal
    NoInit,
    /// Anything else, with a short description of the expression
    Unsupported(String),
}

/// A member in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMemberDef {
    pub name: String,
    pub init: MemberInit,
}

/// One `const enum` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    /// Declared with `export` directly on the declaration
    pub exported: bool,
    pub members: Vec<EnumMemberDef>,
}

impl EnumDecl {
    /// Position of a member by name.
    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }
}

fn unwrap_parens(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(p) = expr {
        expr = &p.expr;
    }
    expr
}

fn literal_of(expr: &Expr) -> Option<Literal> {
    match unwrap_parens(expr) {
        Expr::Lit(Lit::Num(n)) => Some(Literal::Number(n.value)),
        Expr::Lit(Lit::Str(s)) => Some(Literal::Str(s.value.to_string())),
        Expr::Tpl(t) if t.exprs.is_empty() && t.quasis.len() == 1 => t.quasis[0]
            .cooked
            .as_ref()
            .map(|cooked| Literal::Str(cooked.to_string())),
        _ => None,
    }
}

fn prefix_op(op: UnaryOp) -> Option<PrefixOp> {
    match op {
        UnaryOp::Minus => Some(PrefixOp::Minus),
        UnaryOp::Plus => Some(PrefixOp::Plus),
        UnaryOp::Tilde => Some(PrefixOp::Tilde),
        UnaryOp::Bang => Some(PrefixOp::Bang),
        _ => None,
    }
}

fn describe(expr: &Expr) -> &'static str {
    match expr {
        Expr::Bin(_) => "binary expression",
        Expr::Call(_) => "call expression",
        Expr::Tpl(_) => "template literal with substitutions",
        Expr::Lit(_) => "literal that is neither a number nor a string",
        Expr::Cond(_) => "conditional expression",
        Expr::Object(_) | Expr::Array(_) => "object or array literal",
        _ => "non-constant expression",
    }
}

fn classify_member_ref(member_expr: &MemberExpr) -> MemberInit {
    let qualifier = match unwrap_parens(&member_expr.obj) {
        Expr::Ident(ident) => ident.sym.to_string(),
        _ => return MemberInit::Unsupported("member access on a non-identifier".to_string()),
    };
    let member = match &member_expr.prop {
        MemberProp::Ident(ident) => ident.sym.to_string(),
        MemberProp::Computed(computed) => match literal_of(&computed.expr) {
            Some(Literal::Str(name)) => name,
            _ => return MemberInit::Unsupported("computed member access".to_string()),
        },
        _ => return MemberInit::Unsupported("private member access".to_string()),
    };
    MemberInit::MemberRef {
        qualifier: Some(qualifier),
        member,
    }
}

/// Classifies a member initializer into its tagged variant.
pub fn classify_init(init: Option<&Expr>) -> MemberInit {
    let Some(expr) = init else {
        return MemberInit::NoInit;
    };
    let expr = unwrap_parens(expr);

    if let Some(literal) = literal_of(expr) {
        return MemberInit::Literal(literal);
    }

    match expr {
        Expr::Unary(UnaryExpr { op, arg, .. }) => match (prefix_op(*op), literal_of(arg)) {
            (Some(prefix), Some(literal)) => MemberInit::UnaryLiteral(prefix, literal),
            (Some(_), None) => {
                MemberInit::Unsupported("unary operator on a non-literal operand".to_string())
            }
            (None, _) => MemberInit::Unsupported(format!("unary {:?} expression", op)),
        },
        Expr::Member(member_expr) => classify_member_ref(member_expr),
        Expr::Ident(ident) => MemberInit::MemberRef {
            qualifier: None,
            member: ident.sym.to_string(),
        },
        other => MemberInit::Unsupported(describe(other).to_string()),
    }
}

fn member_name(id: &TsEnumMemberId) -> String {
    match id {
        TsEnumMemberId::Ident(ident) => ident.sym.to_string(),
        TsEnumMemberId::Str(s) => s.value.to_string(),
    }
}

fn to_decl(decl: &TsEnumDecl, exported: bool) -> EnumDecl {
    EnumDecl {
        name: decl.id.sym.to_string(),
        exported,
        members: decl
            .members
            .iter()
            .map(|m| EnumMemberDef {
                name: member_name(&m.id),
                init: classify_init(m.init.as_deref()),
            })
            .collect(),
    }
}

/// Extract all top-level const enum declarations from a parsed module.
pub fn extract_enums(module: &Module) -> Vec<EnumDecl> {
    let mut results = Vec::new();

    for item in &module.body {
        match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::TsEnum(decl))) if decl.is_const => {
                results.push(to_decl(decl, false));
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                decl: Decl::TsEnum(decl),
                ..
            })) if decl.is_const => {
                results.push(to_decl(decl, true));
            }
            _ => {}
        }
    }

    results
}

/// Every known const enum declaration, keyed by `(module id, name)`.
#[derive(Debug, Clone, Default)]
pub struct DeclarationIndex {
    decls: HashMap<DeclKey, EnumDecl>,
}

impl DeclarationIndex {
    /// Collects declarations from all modules; a repeated key keeps the last one.
    pub fn collect(modules: &[ModuleInfo]) -> Self {
        let mut decls = HashMap::new();
        for module in modules {
            for decl in &module.enums {
                decls.insert(DeclKey::new(module.id.clone(), decl.name.clone()), decl.clone());
            }
        }
        Self { decls }
    }

    pub fn get(&self, key: &DeclKey) -> Option<&EnumDecl> {
        self.decls.get(key)
    }

    pub fn contains(&self, key: &DeclKey) -> bool {
        self.decls.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Declarations in key order.
    pub fn sorted(&self) -> Vec<(&DeclKey, &EnumDecl)> {
        let mut entries: Vec<_> = self.decls.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_typescript;
    use std::path::Path;

    fn enums_of(source: &str) -> Vec<EnumDecl> {
        let module = parse_typescript(Path::new("test.ts"), source, false).unwrap();
        extract_enums(&module)
    }

    #[test]
    fn test_extract_const_enum() {
        let result = enums_of("const enum Color { Red, Green, Blue }");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Color");
        assert!(!result[0].exported);
        let names: Vec<_> = result[0].members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Green", "Blue"]);
        assert!(result[0].members.iter().all(|m| m.init == MemberInit::NoInit));
    }

    #[test]
    fn test_plain_enum_ignored() {
        assert!(enums_of("enum Plain { A, B }").is_empty());
        assert!(enums_of("export enum Plain { A }").is_empty());
    }

    #[test]
    fn test_exported_and_declared_forms() {
        let result = enums_of(
            r#"
export const enum A { X }
declare const enum B { Y }
export declare const enum C { Z }
"#,
        );
        assert_eq!(result.len(), 3);
        assert!(result[0].exported);
        assert!(!result[1].exported);
        assert!(result[2].exported);
    }

    #[test]
    fn test_nested_enum_not_top_level() {
        let result = enums_of("function f() { const enum Inner { A } return 0; }");
        assert!(result.is_empty());
    }

    #[test]
    fn test_classify_literals() {
        let result = enums_of(
            r#"
const enum E {
    Num = 5,
    Hex = 0x10,
    Text = "five",
    Tpl = `plain`,
    Paren = (7),
}
"#,
        );
        let inits: Vec<_> = result[0].members.iter().map(|m| m.init.clone()).collect();
        assert_eq!(inits[0], MemberInit::Literal(Literal::Number(5.0)));
        assert_eq!(inits[1], MemberInit::Literal(Literal::Number(16.0)));
        assert_eq!(inits[2], MemberInit::Literal(Literal::Str("five".into())));
        assert_eq!(inits[3], MemberInit::Literal(Literal::Str("plain".into())));
        assert_eq!(inits[4], MemberInit::Literal(Literal::Number(7.0)));
    }

    #[test]
    fn test_classify_unary() {
        let result = enums_of(r#"const enum E { A = -1, B = ~0, C = !"x", D = +2 }"#);
        let inits: Vec<_> = result[0].members.iter().map(|m| m.init.clone()).collect();
        assert_eq!(inits[0], MemberInit::UnaryLiteral(PrefixOp::Minus, Literal::Number(1.0)));
        assert_eq!(inits[1], MemberInit::UnaryLiteral(PrefixOp::Tilde, Literal::Number(0.0)));
        assert_eq!(inits[2], MemberInit::UnaryLiteral(PrefixOp::Bang, Literal::Str("x".into())));
        assert_eq!(inits[3], MemberInit::UnaryLiteral(PrefixOp::Plus, Literal::Number(2.0)));
    }

    #[test]
    fn test_classify_member_refs() {
        let result = enums_of(r#"const enum E { A = Other.Y, B = Other["Z"], C = A }"#);
        let inits: Vec<_> = result[0].members.iter().map(|m| m.init.clone()).collect();
        assert_eq!(
            inits[0],
            MemberInit::MemberRef { qualifier: Some("Other".into()), member: "Y".into() }
        );
        assert_eq!(
            inits[1],
            MemberInit::MemberRef { qualifier: Some("Other".into()), member: "Z".into() }
        );
        assert_eq!(inits[2], MemberInit::MemberRef { qualifier: None, member: "A".into() });
    }

    #[test]
    fn test_classify_unsupported() {
        let result = enums_of("const enum E { A = 1 << 2, B = f(), C = -x, D = `a${1}` }");
        for member in &result[0].members {
            assert!(
                matches!(member.init, MemberInit::Unsupported(_)),
                "{} should be unsupported",
                member.name
            );
        }
    }

    #[test]
    fn test_string_member_names() {
        let result = enums_of(r#"const enum E { "with-dash" = 1, plain = 2 }"#);
        assert_eq!(result[0].members[0].name, "with-dash");
        assert_eq!(result[0].member_index("plain"), Some(1));
    }
}
