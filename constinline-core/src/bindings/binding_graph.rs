//! Export/import binding resolution.
//!
//! Every import and export statement becomes a fact about one [`Binding`]:
//! either it is defined directly by a declaration, or it follows another
//! binding. Following edges go into a `petgraph` graph (upstream → follower)
//! and resolved declarations flow along them with [`Propagation`], so a
//! barrel chain of any length resolves in one pass.
//!
//! `export * from "mod"` has no per-name fact: the reexporting module
//! forwards every non-default name of `mod` it does not export explicitly,
//! which is expanded lazily in [`Propagation::dependents`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::convert::Infallible;

use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use super::binding_extractor::ExportStmt;
use crate::common::{Binding, DeclKey, Propagation};
use crate::enums::DeclarationIndex;
use crate::parse::ModuleInfo;
use crate::resolve::Resolver;

/// Where a binding gets its target from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Upstream {
    Declared(DeclKey),
    Follows(Binding),
}

/// Binding facts as a dependency graph.
struct FactGraph {
    graph: DiGraphMap<u32, ()>,
    nodes: Vec<Binding>,
    ids: HashMap<Binding, u32>,
    /// source module id → modules that `export *` from it, sorted
    star_reexporters: HashMap<String, Vec<String>>,
    /// Export bindings with an explicit fact; star forwarding skips them
    explicit_exports: HashSet<DeclKey>,
}

impl FactGraph {
    fn node(&mut self, binding: &Binding) -> u32 {
        if let Some(&id) = self.ids.get(binding) {
            return id;
        }
        let id = self.nodes.len() as u32;
        self.nodes.push(binding.clone());
        self.ids.insert(binding.clone(), id);
        self.graph.add_node(id);
        id
    }
}

impl Propagation for FactGraph {
    type Node = Binding;
    type Value = DeclKey;
    type Error = Infallible;

    fn dependents(&self, node: &Binding) -> Vec<Binding> {
        let mut followers: Vec<Binding> = match self.ids.get(node) {
            Some(&id) => self
                .graph
                .neighbors(id)
                .map(|n| self.nodes[n as usize].clone())
                .collect(),
            None => Vec::new(),
        };

        if let Binding::Export(key) = node {
            if key.name != "default" {
                if let Some(reexporters) = self.star_reexporters.get(&key.module) {
                    for module in reexporters {
                        let forwarded = DeclKey::new(module.clone(), key.name.clone());
                        if !self.explicit_exports.contains(&forwarded) {
                            followers.push(Binding::Export(forwarded));
                        }
                    }
                }
            }
        }

        followers
    }

    fn derive(&self, _node: &Binding, upstream: &DeclKey) -> Result<Option<DeclKey>, Infallible> {
        Ok(Some(upstream.clone()))
    }
}

/// Resolved import and export bindings of the whole project.
#[derive(Debug, Clone, Default)]
pub struct BindingGraph {
    resolved: HashMap<Binding, DeclKey>,
    /// `(module, local)` of every import fact, resolved or not
    import_facts: HashSet<DeclKey>,
    /// module id → local name → declaration, for resolved imports only
    imports_by_module: HashMap<String, BTreeMap<String, DeclKey>>,
}

impl BindingGraph {
    /// Collects binding facts from every module and resolves them.
    ///
    /// Modules are visited in the order given; a later fact for the same
    /// binding replaces an earlier one.
    pub fn build(modules: &[ModuleInfo], resolver: &Resolver, index: &DeclarationIndex) -> Self {
        let mut facts: HashMap<Binding, Upstream> = HashMap::new();
        let mut star_reexporters: HashMap<String, Vec<String>> = HashMap::new();

        for module in modules {
            let id = &module.id;
            for export in &module.exports {
                match export {
                    ExportStmt::Declared { name } => {
                        facts.insert(
                            Binding::export(id.clone(), name.clone()),
                            Upstream::Declared(DeclKey::new(id.clone(), name.clone())),
                        );
                    }
                    ExportStmt::Local { orig, exported } => {
                        let local = DeclKey::new(id.clone(), orig.clone());
                        let upstream = if index.contains(&local) {
                            Upstream::Declared(local)
                        } else {
                            Upstream::Follows(Binding::Import(local))
                        };
                        facts.insert(Binding::export(id.clone(), exported.clone()), upstream);
                    }
                    ExportStmt::Reexport { source, orig, exported } => {
                        let target = resolver.resolve(source, id);
                        facts.insert(
                            Binding::export(id.clone(), exported.clone()),
                            Upstream::Follows(Binding::export(target, orig.clone())),
                        );
                    }
                    ExportStmt::Star { source } => {
                        let target = resolver.resolve(source, id);
                        star_reexporters.entry(target).or_default().push(id.clone());
                    }
                }
            }
            for import in &module.imports {
                let target = resolver.resolve(&import.source, id);
                for spec in &import.specifiers {
                    facts.insert(
                        Binding::import(id.clone(), spec.local.clone()),
                        Upstream::Follows(Binding::export(target.clone(), spec.imported.clone())),
                    );
                }
            }
        }

        for reexporters in star_reexporters.values_mut() {
            reexporters.sort();
            reexporters.dedup();
        }

        let mut sorted: Vec<(&Binding, &Upstream)> = facts.iter().collect();
        sorted.sort();

        let mut graph = FactGraph {
            graph: DiGraphMap::new(),
            nodes: Vec::new(),
            ids: HashMap::new(),
            star_reexporters,
            explicit_exports: HashSet::new(),
        };
        let mut seeds = Vec::new();
        let mut import_facts = HashSet::new();

        for (binding, upstream) in &sorted {
            let follower = graph.node(binding);
            match binding {
                Binding::Export(key) => {
                    graph.explicit_exports.insert(key.clone());
                }
                Binding::Import(key) => {
                    import_facts.insert(key.clone());
                }
            }
            match upstream {
                Upstream::Declared(decl) => seeds.push(((*binding).clone(), decl.clone())),
                Upstream::Follows(target) => {
                    let source = graph.node(target);
                    graph.graph.add_edge(source, follower, ());
                }
            }
        }

        let resolved = match graph.propagate_from(seeds) {
            Ok(resolved) => resolved,
            Err(never) => match never {},
        };

        for (binding, _) in &sorted {
            if !resolved.contains_key(*binding) {
                debug!(binding = %binding, "binding never resolved, dropped");
            }
        }

        let mut imports_by_module: HashMap<String, BTreeMap<String, DeclKey>> = HashMap::new();
        for (binding, decl) in &resolved {
            if let Binding::Import(key) = binding {
                imports_by_module
                    .entry(key.module.clone())
                    .or_default()
                    .insert(key.name.clone(), decl.clone());
            }
        }

        Self {
            resolved,
            import_facts,
            imports_by_module,
        }
    }

    /// Declaration a local import name of `module` resolves to.
    pub fn import_target(&self, module: &str, local: &str) -> Option<&DeclKey> {
        self.resolved.get(&Binding::import(module, local))
    }

    /// Declaration an exported name of `module` resolves to.
    pub fn export_target(&self, module: &str, name: &str) -> Option<&DeclKey> {
        self.resolved.get(&Binding::export(module, name))
    }

    /// Whether `module` imports a binding named `local`, resolved or not.
    pub fn has_import(&self, module: &str, local: &str) -> bool {
        self.import_facts.contains(&DeclKey::new(module, local))
    }

    /// Resolved imports of one module, ordered by local name.
    pub fn imports_of(&self, module: &str) -> impl Iterator<Item = (&str, &DeclKey)> {
        self.imports_by_module
            .get(module)
            .into_iter()
            .flat_map(|imports| imports.iter().map(|(local, decl)| (local.as_str(), decl)))
    }

    /// Number of resolved bindings.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}
