//! Comprehensive test suite for constinline-core.

use crate::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (relative, content) in files {
        write_file(&dir.path().join(relative), content);
    }
    dir
}

fn analyze(dir: &TempDir) -> Session {
    ConstInline::new(dir.path()).analyze().unwrap()
}

fn entry(session: &Session, relative: &str, token: &str) -> Option<String> {
    session
        .table()
        .entries_for_path(&session.root().join(relative))
        .and_then(|entries| entries.get(token).cloned())
}

// Core Test 1: Single-hop import
#[test]
fn test_single_hop_import() {
    let dir = setup_project(&[
        ("src/colors.ts", "export const enum Color { Red, Green }"),
        (
            "src/app.ts",
            "import { Color } from './colors';\nexport const c = Color.Green;",
        ),
    ]);
    let session = analyze(&dir);

    assert_eq!(entry(&session, "src/app.ts", "Color.Green").as_deref(), Some("1"));
    assert_eq!(entry(&session, "src/app.ts", "Color.Red").as_deref(), Some("0"));
}

// Core Test 2: Ordinals and literal kinds
#[test]
fn test_ordinals_and_literals() {
    let dir = setup_project(&[
        (
            "src/enums.ts",
            r#"
export const enum Plain { A, B, C }
export const enum Offset { A = 5, B, C }
export const enum Text { A = "a", B = 'b' }
export const enum Signed { Neg = -1, Inv = ~0, Not = !"x" }
"#,
        ),
        (
            "src/app.ts",
            "import { Plain, Offset, Text, Signed } from './enums';",
        ),
    ]);
    let session = analyze(&dir);
    let get = |token: &str| entry(&session, "src/app.ts", token);

    assert_eq!(get("Plain.C").as_deref(), Some("2"));
    assert_eq!(get("Offset.A").as_deref(), Some("5"));
    assert_eq!(get("Offset.B").as_deref(), Some("6"));
    assert_eq!(get("Offset.C").as_deref(), Some("7"));
    assert_eq!(get("Text.A").as_deref(), Some("\"a\""));
    assert_eq!(get("Text.B").as_deref(), Some("\"b\""));
    assert_eq!(get("Signed.Neg").as_deref(), Some("-1"));
    assert_eq!(get("Signed.Inv").as_deref(), Some("~0"));
    assert_eq!(get("Signed.Not").as_deref(), Some("!\"x\""));
}

// Core Test 3: Re-export chains equal direct imports
#[test]
fn test_reexport_chain_equals_direct_import() {
    let dir = setup_project(&[
        ("src/core/status.ts", "export const enum Status { Idle, Busy = 4, Done }"),
        ("src/core/index.ts", "export { Status } from './status';"),
        ("src/public.ts", "export { Status as PublicStatus } from './core';"),
        ("src/direct.ts", "import { Status } from './core/status';"),
        ("src/chained.ts", "import { PublicStatus as Status } from './public';"),
    ]);
    let session = analyze(&dir);

    let table = session.table();
    let direct = table.entries_for_path(&session.root().join("src/direct.ts")).unwrap();
    let chained = table.entries_for_path(&session.root().join("src/chained.ts")).unwrap();
    assert_eq!(direct, chained);
    assert_eq!(direct.get("Status.Done").map(String::as_str), Some("5"));
}

// Core Test 4: Cross-enum references, including through a re-export
#[test]
fn test_cross_enum_reference_through_reexport() {
    let dir = setup_project(&[
        ("src/base.ts", "export const enum Base { X = 10, Y = 'y' }"),
        ("src/barrel.ts", "export { Base as B } from './base';"),
        (
            "src/derived.ts",
            "import { B } from './barrel';\nexport const enum Derived { A = B.X, C, D = B.Y }",
        ),
        ("src/app.ts", "import { Derived } from './derived';"),
    ]);
    let session = analyze(&dir);

    assert_eq!(entry(&session, "src/app.ts", "Derived.A").as_deref(), Some("10"));
    assert_eq!(entry(&session, "src/app.ts", "Derived.C").as_deref(), Some("11"));
    assert_eq!(entry(&session, "src/app.ts", "Derived.D").as_deref(), Some("\"y\""));
}

// Core Test 5: Cyclic and dangling re-exports
#[test]
fn test_cyclic_and_dangling_reexports() {
    let dir = setup_project(&[
        ("src/x.ts", "export { Y as X } from './y';"),
        ("src/y.ts", "export { X as Y } from './x';"),
        ("src/dangling.ts", "export { Gone } from './missing';"),
        ("src/ok.ts", "export const enum Ok { Yes = 1 }"),
        (
            "src/app.ts",
            "import { X } from './x';\nimport { Gone } from './dangling';\nimport { Ok } from './ok';",
        ),
    ]);
    let session = analyze(&dir);

    let entries = session
        .table()
        .entries_for_path(&session.root().join("src/app.ts"))
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries.get("Ok.Yes").map(String::as_str), Some("1"));
}

// Core Test 6: Default export rename
#[test]
fn test_default_export_rename() {
    let dir = setup_project(&[
        ("src/my-enum.ts", "const enum MyEnum { Member = 3 }\nexport default MyEnum;"),
        ("src/app.ts", "import Foo from './my-enum';\nconst v = Foo.Member;"),
    ]);
    let session = analyze(&dir);

    assert_eq!(entry(&session, "src/app.ts", "Foo.Member").as_deref(), Some("3"));
    assert_eq!(
        session.transform(
            &session.root().join("src/app.ts").to_string_lossy(),
            "const v = Foo.Member;"
        ),
        Some("const v = 3;".to_string())
    );
}

// Core Test 7: Idempotence
#[test]
fn test_two_runs_are_byte_identical() {
    let dir = setup_project(&[
        ("src/a.ts", "export const enum A { X, Y, Z }"),
        ("src/b.ts", "export { A as B } from './a';\nexport const enum Own { Q = 'q' }"),
        ("src/c.ts", "import { B } from './b';\nimport { Own } from './b';"),
        ("src/d.ts", "export * from './a';"),
        ("src/e.ts", "import { A as E } from './d';"),
    ]);
    let first = analyze(&dir);
    let second = analyze(&dir);

    assert_eq!(
        first.table().to_json().unwrap(),
        second.table().to_json().unwrap()
    );
    assert_eq!(first.table().digest().unwrap(), second.table().digest().unwrap());
}

// Core Test 8: tsconfig aliases equal relative resolution
#[test]
fn test_alias_resolution_equals_relative() {
    let dir = setup_project(&[
        (
            "tsconfig.json",
            r#"{
  // aliases
  "compilerOptions": {
    "baseUrl": ".",
    "paths": { "@enums/*": ["src/enums/*"] },
  },
}"#,
        ),
        ("src/enums/level.ts", "export const enum Level { Low, High }"),
        ("src/feature/aliased.ts", "import { Level } from '@enums/level';"),
        ("src/feature/relative.ts", "import { Level } from '../enums/level';"),
    ]);
    let session = analyze(&dir);

    let table = session.table();
    let aliased = table.entries_for_path(&session.root().join("src/feature/aliased.ts"));
    let relative = table.entries_for_path(&session.root().join("src/feature/relative.ts"));
    assert!(aliased.is_some());
    assert_eq!(aliased, relative);
}

// Core Test 9: Star re-exports and index barrels
#[test]
fn test_star_reexport_through_index_barrel() {
    let dir = setup_project(&[
        ("src/enums/color.ts", "export const enum Color { Red = 'red' }"),
        ("src/enums/size.ts", "export const enum Size { S = 1 }"),
        (
            "src/enums/index.ts",
            "export * from './color';\nexport * from './size';",
        ),
        ("src/app.ts", "import { Color, Size } from './enums';"),
    ]);
    let session = analyze(&dir);

    assert_eq!(entry(&session, "src/app.ts", "Color.Red").as_deref(), Some("\"red\""));
    assert_eq!(entry(&session, "src/app.ts", "Size.S").as_deref(), Some("1"));
}

// Core Test 10: Markup script blocks
#[cfg(feature = "markup")]
#[test]
fn test_markup_script_blocks() {
    let dir = setup_project(&[
        ("src/mode.ts", "export const enum Mode { Light, Dark }"),
        (
            "src/Toggle.vue",
            "<template>\n  <button />\n</template>\n<script setup lang=\"ts\">\nimport { Mode } from './mode';\nconst m = Mode.Dark;\n</script>\n",
        ),
        ("src/Plain.vue", "<script>\nexport default {}\n</script>\n"),
    ]);
    let session = analyze(&dir);

    assert_eq!(entry(&session, "src/Toggle.vue", "Mode.Dark").as_deref(), Some("1"));
    let id = format!(
        "{}?vue&type=script&setup=true&lang.ts",
        session.root().join("src/Toggle.vue").display()
    );
    let out = session.transform(&id, "const m = Mode.Dark;").unwrap();
    assert_eq!(out, "const m = 1;");
}

// Core Test 11: Boundary-aware substitution through the session
#[test]
fn test_transform_respects_boundaries() {
    let dir = setup_project(&[
        ("src/colors.ts", "export const enum Color { Red, RedDark }"),
        ("src/app.ts", "import { Color } from './colors';"),
    ]);
    let session = analyze(&dir);
    let id = session.root().join("src/app.ts");

    let out = session
        .transform(
            &id.to_string_lossy(),
            "f(Color.Red, Color.RedDark, theme.Color.Red, MyColor.Red)",
        )
        .unwrap();
    assert_eq!(out, "f(0, 1, theme.Color.Red, MyColor.Red)");
}

// Core Test 12: inline_local toggle
#[test]
fn test_inline_local_toggle() {
    let dir = setup_project(&[("src/local.ts", "const enum Local { A = 7 }\nuse(Local.A);")]);

    let on = analyze(&dir);
    assert_eq!(entry(&on, "src/local.ts", "Local.A").as_deref(), Some("7"));

    let off = ConstInline::new(dir.path()).inline_local(false).analyze().unwrap();
    assert!(off.table().is_empty());
}

// Core Test 13: Fatal errors
#[test]
fn test_parse_failure_is_fatal() {
    let dir = setup_project(&[
        ("src/ok.ts", "export const enum Ok { A }"),
        ("src/broken.ts", "export const enum Broken {\n  A = ,\n}"),
    ]);
    let err = ConstInline::new(dir.path()).analyze().unwrap_err();
    match err {
        InlineError::Parse { path, line, .. } => {
            assert!(path.ends_with("src/broken.ts"));
            assert_eq!(line, Some(2));
        }
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn test_unsupported_initializer_is_fatal() {
    let dir = setup_project(&[("src/flags.ts", "export const enum Flags { A = 1 << 0 }")]);
    let err = ConstInline::new(dir.path()).analyze().unwrap_err();
    assert!(matches!(
        err,
        InlineError::UnsupportedMember { ref enum_name, ref member, .. }
            if enum_name == "Flags" && member == "A"
    ));
}

// Vendor directories and excluded directories
#[test]
fn test_vendor_files_pass_through() {
    let dir = setup_project(&[
        ("src/colors.ts", "export const enum Color { Red }"),
        ("src/app.ts", "import { Color } from './colors';"),
        ("node_modules/pkg/index.ts", "export const enum Pkg { A }"),
    ]);
    let session = analyze(&dir);

    assert_eq!(session.stats().modules, 2);
    let vendored = session.root().join("node_modules/pkg/index.ts");
    assert_eq!(session.transform(&vendored.to_string_lossy(), "Pkg.A"), None);
}

// Modules sharing one id across extensions
#[test]
fn test_ts_and_tsx_collapse_to_one_id() {
    let dir = setup_project(&[
        ("src/shared.ts", "export const enum Shared { A = 1 }"),
        ("src/shared.tsx", "export const el = <div />;"),
        ("src/app.ts", "import { Shared } from './shared';"),
    ]);
    let session = analyze(&dir);

    assert_eq!(session.stats().modules, 3);
    let id = module_id(&session.root().join("src/shared.ts"));
    assert_eq!(
        session.module_path(&id),
        Some(session.root().join("src/shared.ts").as_path())
    );
    assert_eq!(entry(&session, "src/app.ts", "Shared.A").as_deref(), Some("1"));
}

// transform_file reads from disk
#[test]
fn test_transform_file() {
    let dir = setup_project(&[
        ("src/colors.ts", "export const enum Color { Red, Green }"),
        (
            "src/app.ts",
            "import { Color } from './colors';\nexport const g = Color.Green;\n",
        ),
        ("src/other.ts", "export const nothing = 1;"),
    ]);
    let session = analyze(&dir);

    let out = session
        .transform_file(&session.root().join("src/app.ts"))
        .unwrap()
        .unwrap();
    assert!(out.ends_with("export const g = 1;\n"));
    assert_eq!(
        session.transform_file(&session.root().join("src/other.ts")).unwrap(),
        None
    );
}

// constinline.toml drives the builder
#[test]
fn test_config_file_restricts_source_dir() {
    let dir = setup_project(&[
        ("constinline.toml", "source_dir = \"app\"\nfile_pattern = \"**/*.ts\"\n"),
        ("app/colors.ts", "export const enum Color { Red }"),
        ("app/main.ts", "import { Color } from './colors';"),
        ("scripts/tool.ts", "import { Color } from '../app/colors';"),
    ]);
    let session = ConstInline::from_config(dir.path()).unwrap().analyze().unwrap();

    assert_eq!(session.stats().modules, 2);
    assert!(entry(&session, "scripts/tool.ts", "Color.Red").is_none());
    assert_eq!(entry(&session, "app/main.ts", "Color.Red").as_deref(), Some("0"));
}

// Empty projects produce an empty table
#[test]
fn test_empty_project() {
    let dir = setup_project(&[("src/readme.md", "# nothing")]);
    let session = analyze(&dir);
    assert!(session.table().is_empty());
    assert_eq!(session.table().to_json().unwrap(), "{}");
}
