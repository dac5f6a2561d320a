use super::FilterStore;
use crate::error::{FilterError, Result};
use crate::model::FilterRecord;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    filters: HashMap<Uuid, FilterRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FilterStore for InMemoryStore {
    fn create_filter(&mut self, filter: &FilterRecord) -> Result<()> {
        if self.filters.contains_key(&filter.id) {
            return Err(FilterError::Store(format!(
                "Filter already exists: {}",
                filter.id
            )));
        }
        self.filters.insert(filter.id, filter.clone());
        Ok(())
    }

    fn save_filter(&mut self, filter: &FilterRecord) -> Result<()> {
        match self.filters.get_mut(&filter.id) {
            Some(slot) => {
                *slot = filter.clone();
                Ok(())
            }
            None => Err(FilterError::FilterNotFound(filter.id)),
        }
    }

    fn get_filter(&self, id: &Uuid) -> Result<FilterRecord> {
        self.filters
            .get(id)
            .cloned()
            .ok_or(FilterError::FilterNotFound(*id))
    }

    fn list_filters(&self) -> Result<Vec<FilterRecord>> {
        let mut filters: Vec<_> = self.filters.values().cloned().collect();
        filters.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(filters)
    }

    fn delete_filter(&mut self, id: &Uuid) -> Result<()> {
        if self.filters.remove(id).is_none() {
            return Err(FilterError::FilterNotFound(*id));
        }
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::catalog::{EquipmentType, OperatorType};
    use crate::model::{Combinator, GroupNode, RuleNode, RuleValue};
    use crate::rules::export_tree;

    /// A valid two-rule generator tree: `AND[ nominalVoltage = 225, name contains GEN ]`.
    pub fn generator_tree() -> GroupNode {
        GroupNode::new(Combinator::And)
            .with_rule(RuleNode::new(
                "nominalVoltage",
                Some(OperatorType::Equals),
                RuleValue::single(225.0),
            ))
            .with_rule(RuleNode::new(
                "name",
                Some(OperatorType::Contains),
                RuleValue::single("GEN"),
            ))
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_filters(mut self, count: usize) -> Self {
            for i in 0..count {
                let filter = FilterRecord::new(
                    format!("Test Filter {}", i + 1),
                    String::new(),
                    "/".to_string(),
                    EquipmentType::Generator,
                    export_tree(&generator_tree()),
                );
                self.store.create_filter(&filter).unwrap();
            }
            self
        }

        /// Store one filter and return its id.
        pub fn add_filter(&mut self, name: &str, equipment_type: EquipmentType) -> Uuid {
            let filter = FilterRecord::new(
                name.to_string(),
                String::new(),
                "/".to_string(),
                equipment_type,
                export_tree(&generator_tree()),
            );
            self.store.create_filter(&filter).unwrap();
            filter.id
        }
    }
}
