//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for any
//! UI. It dispatches to commands, normalizes inputs (selectors, node paths)
//! and returns structured `Result<CmdResult>` values. No business logic, no
//! printing.
//!
//! `FilterApi<S: FilterStore>` is generic over the storage backend:
//! - Production: `FilterApi<FileStore>`
//! - Testing: `FilterApi<InMemoryStore>`

use crate::catalog::EquipmentType;
use crate::commands;
use crate::config::GridFilterConfig;
use crate::error::{FilterError, Result};
use crate::model::GroupNode;
use crate::store::FilterStore;
use crate::wire::WireGroup;
use uuid::Uuid;

pub struct FilterApi<S: FilterStore> {
    store: S,
    paths: commands::GridFilterPaths,
}

impl<S: FilterStore> FilterApi<S> {
    pub fn new(store: S, paths: commands::GridFilterPaths) -> Self {
        Self { store, paths }
    }

    pub fn create_filter(
        &mut self,
        name: String,
        description: String,
        directory: Option<String>,
        equipment_type: Option<EquipmentType>,
        tree: GroupNode,
    ) -> Result<commands::CmdResult> {
        let config = GridFilterConfig::load(&self.paths.data_dir)?;
        let input = commands::NewFilter {
            name,
            description,
            directory,
            equipment_type,
            tree,
        };
        commands::create::run(&mut self.store, &config, input)
    }

    pub fn update_filter(
        &mut self,
        selector: &str,
        update: commands::FilterUpdate,
    ) -> Result<commands::CmdResult> {
        let selector = parse_selector(selector);
        commands::update::run(&mut self.store, &selector, update)
    }

    pub fn get_filter(&self, selector: &str) -> Result<commands::CmdResult> {
        commands::get::run(&self.store, &parse_selector(selector))
    }

    pub fn list_filters(&self, equipment: Option<EquipmentType>) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, equipment)
    }

    pub fn delete_filters<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<commands::CmdResult> {
        let selectors: Vec<_> = selectors
            .iter()
            .map(|s| parse_selector(s.as_ref()))
            .collect();
        commands::delete::run(&mut self.store, &selectors)
    }

    pub fn remove_rule(&mut self, selector: &str, path: &str) -> Result<commands::CmdResult> {
        let path = parse_path(path)?;
        commands::remove_rule::run(&mut self.store, &parse_selector(selector), &path)
    }

    pub fn check(&self, wire: &WireGroup) -> Result<commands::CmdResult> {
        commands::check::run(wire)
    }

    pub fn fields(&self, equipment: Option<EquipmentType>) -> Result<commands::CmdResult> {
        commands::fields::run(equipment)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn paths(&self) -> &commands::GridFilterPaths {
        &self.paths
    }
}

/// A UUID, a 1-based list index, or else a name.
fn parse_selector(input: &str) -> commands::FilterSelector {
    let input = input.trim();
    if let Ok(id) = Uuid::parse_str(input) {
        return commands::FilterSelector::Id(id);
    }
    if let Ok(index) = input.parse::<usize>() {
        return commands::FilterSelector::Index(index);
    }
    commands::FilterSelector::Name(input.to_string())
}

/// Parse a node path written as `0.1.2` (commas and slashes also accepted).
pub fn parse_path(input: &str) -> Result<Vec<usize>> {
    let path = input
        .split(['.', ',', '/'])
        .map(|part| part.trim().parse::<usize>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| FilterError::Api(format!("Invalid node path: {}", input)))?;
    if path.first() != Some(&0) {
        return Err(FilterError::Api(format!(
            "Node paths start at the root (0): {}",
            input
        )));
    }
    Ok(path)
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, FilterSelector, FilterUpdate, GridFilterPaths, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::generator_tree;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    fn api(dir: &TempDir) -> FilterApi<InMemoryStore> {
        FilterApi::new(
            InMemoryStore::new(),
            GridFilterPaths {
                data_dir: dir.path().to_path_buf(),
            },
        )
    }

    #[test]
    fn selectors_are_normalized() {
        let id = Uuid::new_v4();
        assert_eq!(parse_selector(&id.to_string()), FilterSelector::Id(id));
        assert_eq!(parse_selector(" 2 "), FilterSelector::Index(2));
        assert_eq!(parse_selector("Gens"), FilterSelector::Name("Gens".into()));
    }

    #[test]
    fn paths_are_parsed() {
        assert_eq!(parse_path("0.1.2").unwrap(), vec![0, 1, 2]);
        assert_eq!(parse_path("0,3").unwrap(), vec![0, 3]);
        assert!(parse_path("1.0").is_err());
        assert!(parse_path("0.a").is_err());
        assert!(parse_path("").is_err());
    }

    #[test]
    fn create_uses_stored_config() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        api.config(ConfigAction::Set(
            "default_equipment_type".into(),
            "battery".into(),
        ))
        .unwrap();

        let result = api
            .create_filter("Gens".into(), String::new(), None, None, generator_tree())
            .unwrap();
        assert_eq!(
            result.affected_filters[0].equipment_type,
            EquipmentType::Battery
        );
        assert_eq!(api.list_filters(None).unwrap().listed_filters.len(), 1);
    }

    #[test]
    fn dispatches_by_name_and_index() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        api.create_filter("Gens".into(), String::new(), None, None, generator_tree())
            .unwrap();

        assert_eq!(api.get_filter("Gens").unwrap().affected_filters.len(), 1);
        api.remove_rule("1", "0.0").unwrap();
        assert_eq!(api.get_filter("1").unwrap().report.unwrap().rule_count, 1);
        api.delete_filters(&["Gens"]).unwrap();
        assert!(api.list_filters(None).unwrap().listed_filters.is_empty());
    }
}
