//! Import and export statement extraction.
//!
//! Records, in statement order, every statement that can make a const enum
//! visible under some name in another module. Namespace imports,
//! `export * as ns`, `import x = require(...)` and dynamic imports are not
//! statically followable and are ignored.

use swc_ecma_ast::{
    Decl, ExportDecl, ExportSpecifier, Expr, ImportSpecifier, Module, ModuleDecl,
    ModuleExportName, ModuleItem,
};

/// One named binding of an `import` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Name exported by the source module (`default` for default imports)
    pub imported: String,
    /// Name visible in the importing module
    pub local: String,
}

/// `import { A, B as C } from "source"` / `import D from "source"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStmt {
    pub source: String,
    pub specifiers: Vec<ImportBinding>,
}

/// Statements that expose a name to other modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStmt {
    /// `export const enum Name {}`
    Declared { name: String },
    /// `export { orig as exported }` without a source, or `export default orig`
    Local { orig: String, exported: String },
    /// `export { orig as exported } from "source"`
    Reexport {
        source: String,
        orig: String,
        exported: String,
    },
    /// `export * from "source"`
    Star { source: String },
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string(),
    }
}

fn import_specifiers(specifiers: &[ImportSpecifier]) -> Vec<ImportBinding> {
    specifiers
        .iter()
        .filter_map(|spec| match spec {
            ImportSpecifier::Named(named) => {
                let local = named.local.sym.to_string();
                let imported = named
                    .imported
                    .as_ref()
                    .map(export_name)
                    .unwrap_or_else(|| local.clone());
                Some(ImportBinding { imported, local })
            }
            ImportSpecifier::Default(default) => Some(ImportBinding {
                imported: "default".to_string(),
                local: default.local.sym.to_string(),
            }),
            ImportSpecifier::Namespace(_) => None,
        })
        .collect()
}

fn named_exports(
    specifiers: &[ExportSpecifier],
    source: Option<&str>,
    exports: &mut Vec<ExportStmt>,
) {
    for spec in specifiers {
        let (orig, exported) = match spec {
            ExportSpecifier::Named(named) => {
                let orig = export_name(&named.orig);
                let exported = named
                    .exported
                    .as_ref()
                    .map(export_name)
                    .unwrap_or_else(|| orig.clone());
                (orig, exported)
            }
            // `export v from "mod"`
            ExportSpecifier::Default(default) => {
                ("default".to_string(), default.exported.sym.to_string())
            }
            ExportSpecifier::Namespace(_) => continue,
        };
        exports.push(match source {
            Some(source) => ExportStmt::Reexport {
                source: source.to_string(),
                orig,
                exported,
            },
            None => ExportStmt::Local { orig, exported },
        });
    }
}

/// Extracts import and export statements from a parsed module.
pub fn extract_bindings(module: &Module) -> (Vec<ImportStmt>, Vec<ExportStmt>) {
    let mut imports = Vec::new();
    let mut exports = Vec::new();

    for item in &module.body {
        let ModuleItem::ModuleDecl(decl) = item else {
            continue;
        };
        match decl {
            ModuleDecl::Import(import) => {
                let specifiers = import_specifiers(&import.specifiers);
                if !specifiers.is_empty() {
                    imports.push(ImportStmt {
                        source: import.src.value.to_string(),
                        specifiers,
                    });
                }
            }
            ModuleDecl::ExportDecl(ExportDecl {
                decl: Decl::TsEnum(decl),
                ..
            }) if decl.is_const => {
                exports.push(ExportStmt::Declared {
                    name: decl.id.sym.to_string(),
                });
            }
            ModuleDecl::ExportNamed(named) => {
                let source = named.src.as_ref().map(|s| s.value.to_string());
                named_exports(&named.specifiers, source.as_deref(), &mut exports);
            }
            ModuleDecl::ExportDefaultExpr(default) => {
                if let Expr::Ident(ident) = &*default.expr {
                    exports.push(ExportStmt::Local {
                        orig: ident.sym.to_string(),
                        exported: "default".to_string(),
                    });
                }
            }
            ModuleDecl::ExportAll(all) => {
                exports.push(ExportStmt::Star {
                    source: all.src.value.to_string(),
                });
            }
            _ => {}
        }
    }

    (imports, exports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_typescript;
    use std::path::Path;

    fn bindings_of(source: &str) -> (Vec<ImportStmt>, Vec<ExportStmt>) {
        let module = parse_typescript(Path::new("test.ts"), source, false).unwrap();
        extract_bindings(&module)
    }

    #[test]
    fn test_named_and_default_imports() {
        let (imports, _) = bindings_of(
            r#"
import { Color, Size as S } from "./enums";
import Def from "./def";
import * as ns from "./ns";
"#,
        );
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].source, "./enums");
        assert_eq!(
            imports[0].specifiers,
            vec![
                ImportBinding { imported: "Color".into(), local: "Color".into() },
                ImportBinding { imported: "Size".into(), local: "S".into() },
            ]
        );
        assert_eq!(
            imports[1].specifiers,
            vec![ImportBinding { imported: "default".into(), local: "Def".into() }]
        );
    }

    #[test]
    fn test_export_forms() {
        let (_, exports) = bindings_of(
            r#"
export const enum Own { A }
export enum NotConst { B }
export { Color as Colour } from "./enums";
export { default as Named, Plain as default } from "./other";
export { Local as Alias };
export default Own;
export * from "./barrel";
export * as ns from "./ns";
"#,
        );
        assert_eq!(
            exports,
            vec![
                ExportStmt::Declared { name: "Own".into() },
                ExportStmt::Reexport {
                    source: "./enums".into(),
                    orig: "Color".into(),
                    exported: "Colour".into()
                },
                ExportStmt::Reexport {
                    source: "./other".into(),
                    orig: "default".into(),
                    exported: "Named".into()
                },
                ExportStmt::Reexport {
                    source: "./other".into(),
                    orig: "Plain".into(),
                    exported: "default".into()
                },
                ExportStmt::Local { orig: "Local".into(), exported: "Alias".into() },
                ExportStmt::Local { orig: "Own".into(), exported: "default".into() },
                ExportStmt::Star { source: "./barrel".into() },
            ]
        );
    }

    #[test]
    fn test_side_effect_import_ignored() {
        let (imports, _) = bindings_of(r#"import "./polyfill";"#);
        assert!(imports.is_empty());
    }
}
