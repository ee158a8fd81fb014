//! Member value evaluation.
//!
//! Every member becomes one node keyed by [`DefKey`]. Literal members and a
//! leading un-initialized member are seeds; every other member waits on
//! exactly one upstream member:
//! - `MemberRef` copies the value of the referenced member
//! - `NoInit` takes the previous member's numeric value plus one
//!
//! Values then flow through [`Propagation`]. Members whose upstream never
//! resolves (unresolved import, reference cycle) are left out.

use std::collections::HashMap;

use tracing::debug;

use super::enum_extractor::{DeclarationIndex, EnumDecl, MemberInit};
use super::value::MemberValue;
use crate::bindings::BindingGraph;
use crate::common::{DeclKey, DefKey, Propagation};
use crate::error::{InlineError, InlineResult};

/// How a non-seed member obtains its value from its upstream member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Copy,
    Increment,
}

/// Member dependency graph: each node has at most one upstream.
struct MemberGraph {
    rules: HashMap<DefKey, Rule>,
    dependents: HashMap<DefKey, Vec<DefKey>>,
    seeds: Vec<(DefKey, MemberValue)>,
}

impl MemberGraph {
    fn new() -> Self {
        Self {
            rules: HashMap::new(),
            dependents: HashMap::new(),
            seeds: Vec::new(),
        }
    }

    fn wait_on(&mut self, node: DefKey, upstream: DefKey, rule: Rule) {
        self.dependents.entry(upstream).or_default().push(node.clone());
        self.rules.insert(node, rule);
    }

    /// Builds rules for every declaration, raising the static errors.
    fn build(index: &DeclarationIndex, bindings: &BindingGraph) -> InlineResult<Self> {
        let mut graph = Self::new();

        for (decl_key, decl) in index.sorted() {
            for (position, member) in decl.members.iter().enumerate() {
                let node = DefKey::new(decl_key.clone(), member.name.clone());
                match &member.init {
                    MemberInit::Literal(literal) => {
                        graph.seeds.push((node, MemberValue::literal(literal.clone())));
                    }
                    MemberInit::UnaryLiteral(op, literal) => {
                        graph
                            .seeds
                            .push((node, MemberValue::prefixed(*op, literal.clone())));
                    }
                    MemberInit::NoInit if position == 0 => {
                        graph.seeds.push((node, MemberValue::ordinal(0.0)));
                    }
                    MemberInit::NoInit => {
                        let previous = &decl.members[position - 1].name;
                        let upstream = DefKey::new(decl_key.clone(), previous.clone());
                        graph.wait_on(node, upstream, Rule::Increment);
                    }
                    MemberInit::MemberRef { qualifier, member: target } => {
                        let upstream = match qualifier {
                            None => local_member(decl_key, decl, &member.name, target)?,
                            Some(qualifier) => match qualified_member(
                                index,
                                bindings,
                                decl_key,
                                &member.name,
                                qualifier,
                                target,
                            )? {
                                Some(upstream) => upstream,
                                None => continue,
                            },
                        };
                        graph.wait_on(node, upstream, Rule::Copy);
                    }
                    MemberInit::Unsupported(kind) => {
                        return Err(InlineError::unsupported_member(
                            &decl_key.module,
                            &decl.name,
                            &member.name,
                            format!("initializer is a {}", kind),
                        ));
                    }
                }
            }
        }

        Ok(graph)
    }
}

/// Bare identifier: must name a member of the same enum.
fn local_member(
    decl_key: &DeclKey,
    decl: &EnumDecl,
    member: &str,
    target: &str,
) -> InlineResult<DefKey> {
    if decl.member_index(target).is_none() {
        return Err(InlineError::unsupported_member(
            &decl_key.module,
            &decl.name,
            member,
            format!("`{}` is not a member of `{}`", target, decl.name),
        ));
    }
    Ok(DefKey::new(decl_key.clone(), target))
}

/// `Qualifier.Member`: the qualifier is a const enum of the same module or an
/// imported binding. `Ok(None)` means the import never resolved.
fn qualified_member(
    index: &DeclarationIndex,
    bindings: &BindingGraph,
    decl_key: &DeclKey,
    member: &str,
    qualifier: &str,
    target: &str,
) -> InlineResult<Option<DefKey>> {
    let module = &decl_key.module;
    let local = DeclKey::new(module.clone(), qualifier);

    let target_decl = if index.contains(&local) {
        local
    } else if bindings.has_import(module, qualifier) {
        match bindings.import_target(module, qualifier) {
            Some(resolved) => resolved.clone(),
            None => {
                debug!(
                    module = %module,
                    member = %format!("{}.{}", decl_key.name, member),
                    qualifier,
                    "reference through unresolved import, member excluded"
                );
                return Ok(None);
            }
        }
    } else {
        return Err(InlineError::unsupported_member(
            module,
            &decl_key.name,
            member,
            format!(
                "`{}` is neither a const enum nor an imported binding",
                qualifier
            ),
        ));
    };

    let Some(decl) = index.get(&target_decl) else {
        debug!(target = %target_decl, "import resolved to an unknown declaration");
        return Ok(None);
    };
    if decl.member_index(target).is_none() {
        return Err(InlineError::unsupported_member(
            module,
            &decl_key.name,
            member,
            format!("`{}` has no member `{}`", qualifier, target),
        ));
    }

    Ok(Some(DefKey::new(target_decl, target)))
}

impl Propagation for MemberGraph {
    type Node = DefKey;
    type Value = MemberValue;
    type Error = InlineError;

    fn dependents(&self, node: &DefKey) -> Vec<DefKey> {
        self.dependents.get(node).cloned().unwrap_or_default()
    }

    fn derive(
        &self,
        node: &DefKey,
        upstream: &MemberValue,
    ) -> Result<Option<MemberValue>, InlineError> {
        match self.rules.get(node) {
            Some(Rule::Copy) => Ok(Some(upstream.clone())),
            Some(Rule::Increment) => match upstream.numeric() {
                Some(n) => Ok(Some(MemberValue::ordinal(n + 1.0))),
                None => Err(InlineError::unsupported_member(
                    &node.decl.module,
                    &node.decl.name,
                    &node.member,
                    format!("implicit value follows non-numeric value {}", upstream),
                )),
            },
            None => Ok(None),
        }
    }
}

/// Computed values of every resolvable member.
#[derive(Debug, Clone, Default)]
pub struct EnumValues {
    values: HashMap<DefKey, MemberValue>,
}

impl EnumValues {
    /// Evaluates every declaration in the index.
    pub fn evaluate(index: &DeclarationIndex, bindings: &BindingGraph) -> InlineResult<Self> {
        let mut graph = MemberGraph::build(index, bindings)?;
        let seeds = std::mem::take(&mut graph.seeds);
        let values = graph.propagate_from(seeds)?;

        let unresolved = graph
            .rules
            .keys()
            .filter(|key| !values.contains_key(*key))
            .count();
        if unresolved > 0 {
            debug!(unresolved, "members left unresolved (cycles or unresolved imports)");
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &DefKey) -> Option<&MemberValue> {
        self.values.get(key)
    }

    /// Resolved members of one declaration, in declaration order.
    pub fn members_of<'a>(
        &'a self,
        key: &'a DeclKey,
        decl: &'a EnumDecl,
    ) -> impl Iterator<Item = (&'a str, &'a MemberValue)> + 'a {
        decl.members.iter().filter_map(move |member| {
            self.values
                .get(&DefKey::new(key.clone(), member.name.clone()))
                .map(|value| (member.name.as_str(), value))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_source;
    use crate::resolve::Resolver;
    use std::path::Path;

    /// Parses `(path, source)` pairs and evaluates them as one project.
    fn evaluate(files: &[(&str, &str)]) -> InlineResult<(DeclarationIndex, EnumValues)> {
        let modules: Vec<_> = files
            .iter()
            .filter_map(|(path, source)| parse_source(Path::new(path), source).unwrap())
            .collect();
        let resolver = Resolver::for_modules(&modules, Vec::new());
        let index = DeclarationIndex::collect(&modules);
        let bindings = BindingGraph::build(&modules, &resolver, &index);
        let values = EnumValues::evaluate(&index, &bindings)?;
        Ok((index, values))
    }

    fn text(values: &EnumValues, module: &str, decl: &str, member: &str) -> Option<String> {
        values
            .get(&DefKey::new(DeclKey::new(module, decl), member))
            .map(|v| v.to_literal_text())
    }

    #[test]
    fn test_ordinals() {
        let (_, values) = evaluate(&[("/p/a.ts", "const enum E { A, B, C }")]).unwrap();
        assert_eq!(text(&values, "/p/a", "E", "A").as_deref(), Some("0"));
        assert_eq!(text(&values, "/p/a", "E", "B").as_deref(), Some("1"));
        assert_eq!(text(&values, "/p/a", "E", "C").as_deref(), Some("2"));
    }

    #[test]
    fn test_ordinals_continue_after_explicit() {
        let (_, values) =
            evaluate(&[("/p/a.ts", "const enum E { A = 5, B, C, D = -3, F }")]).unwrap();
        assert_eq!(text(&values, "/p/a", "E", "B").as_deref(), Some("6"));
        assert_eq!(text(&values, "/p/a", "E", "C").as_deref(), Some("7"));
        assert_eq!(text(&values, "/p/a", "E", "D").as_deref(), Some("-3"));
        assert_eq!(text(&values, "/p/a", "E", "F").as_deref(), Some("-2"));
    }

    #[test]
    fn test_strings_quoted() {
        let (_, values) = evaluate(&[("/p/a.ts", r#"const enum S { A = "a", B = 'b' }"#)]).unwrap();
        assert_eq!(text(&values, "/p/a", "S", "A").as_deref(), Some("\"a\""));
        assert_eq!(text(&values, "/p/a", "S", "B").as_deref(), Some("\"b\""));
    }

    #[test]
    fn test_same_enum_reference() {
        let (_, values) = evaluate(&[("/p/a.ts", "const enum E { A = 4, B = A, C }")]).unwrap();
        assert_eq!(text(&values, "/p/a", "E", "B").as_deref(), Some("4"));
        assert_eq!(text(&values, "/p/a", "E", "C").as_deref(), Some("5"));
    }

    #[test]
    fn test_cross_enum_reference_through_import() {
        let (_, values) = evaluate(&[
            ("/p/base.ts", "export const enum Base { X = 10, Y }"),
            (
                "/p/derived.ts",
                "import { Base } from './base';\nexport const enum Derived { A = Base.Y, B }",
            ),
        ])
        .unwrap();
        assert_eq!(text(&values, "/p/derived", "Derived", "A").as_deref(), Some("11"));
        assert_eq!(text(&values, "/p/derived", "Derived", "B").as_deref(), Some("12"));
    }

    #[test]
    fn test_qualified_reference_within_module() {
        let (_, values) = evaluate(&[(
            "/p/a.ts",
            "const enum E { A = O.X, B }\nconst enum O { X = 3 }",
        )])
        .unwrap();
        assert_eq!(text(&values, "/p/a", "E", "A").as_deref(), Some("3"));
        assert_eq!(text(&values, "/p/a", "E", "B").as_deref(), Some("4"));
    }

    #[test]
    fn test_overflowing_literal_is_infinity() {
        let (_, values) = evaluate(&[("/p/a.ts", "const enum Big { A = 1e400, B = 1e15 }")]).unwrap();
        assert_eq!(text(&values, "/p/a", "Big", "A").as_deref(), Some("Infinity"));
        assert_eq!(text(&values, "/p/a", "Big", "B").as_deref(), Some("1000000000000000"));
    }

    #[test]
    fn test_reference_cycle_is_excluded() {
        let (_, values) = evaluate(&[("/p/a.ts", "const enum E { A = B, B = A, C = 1 }")]).unwrap();
        assert_eq!(text(&values, "/p/a", "E", "A"), None);
        assert_eq!(text(&values, "/p/a", "E", "B"), None);
        assert_eq!(text(&values, "/p/a", "E", "C").as_deref(), Some("1"));
    }

    #[test]
    fn test_unresolved_import_is_excluded() {
        let (_, values) = evaluate(&[(
            "/p/a.ts",
            "import { Ext } from 'external-lib';\nconst enum E { A = Ext.X, B, C = 2 }",
        )])
        .unwrap();
        assert_eq!(text(&values, "/p/a", "E", "A"), None);
        assert_eq!(text(&values, "/p/a", "E", "B"), None);
        assert_eq!(text(&values, "/p/a", "E", "C").as_deref(), Some("2"));
    }

    #[test]
    fn test_unsupported_initializer_is_fatal() {
        let err = evaluate(&[("/p/a.ts", "const enum E { A = 1 << 2 }")]).unwrap_err();
        match err {
            InlineError::UnsupportedMember { enum_name, member, .. } => {
                assert_eq!(enum_name, "E");
                assert_eq!(member, "A");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_qualifier_is_fatal() {
        let err = evaluate(&[("/p/a.ts", "const enum E { A = Nowhere.X }")]).unwrap_err();
        assert!(err.to_string().contains("neither a const enum"));
    }

    #[test]
    fn test_missing_target_member_is_fatal() {
        let err = evaluate(&[("/p/a.ts", "const enum O { X }\nconst enum E { A = O.Y }")])
            .unwrap_err();
        assert!(err.to_string().contains("has no member"));
    }

    #[test]
    fn test_ordinal_after_string_is_fatal() {
        let err = evaluate(&[("/p/a.ts", r#"const enum E { A = "a", B }"#)]).unwrap_err();
        assert!(matches!(err, InlineError::UnsupportedMember { ref member, .. } if member == "B"));
    }

    #[test]
    fn test_members_of_in_declaration_order() {
        let (index, values) = evaluate(&[("/p/a.ts", "const enum E { Z = 3, A }")]).unwrap();
        let key = DeclKey::new("/p/a", "E");
        let decl = index.get(&key).unwrap();
        let names: Vec<_> = values.members_of(&key, decl).map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Z", "A"]);
    }
}
