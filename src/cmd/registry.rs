//! Per-command argument table: declaration order plus a name index.

use std::collections::HashMap;

use super::argument::ArgumentSpec;

#[derive(Debug)]
pub struct ArgumentRegistry<C> {
    specs: Vec<ArgumentSpec<C>>,
    index: HashMap<String, usize>,
}

impl<C> Default for ArgumentRegistry<C> {
    fn default() -> Self {
        Self {
            specs: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<C> ArgumentRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition. Hands the spec back if its name is already taken.
    pub fn insert(&mut self, spec: ArgumentSpec<C>) -> Result<(), ArgumentSpec<C>> {
        if self.contains(&spec.info.name) {
            return Err(spec);
        }
        self.index.insert(spec.info.name.clone(), self.specs.len());
        self.specs.push(spec);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentSpec<C>> {
        self.position(name).map(|i| &self.specs[i])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ArgumentSpec<C>> {
        self.specs.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.specs.len()
    }

    pub(crate) fn specs(&self) -> &[ArgumentSpec<C>] {
        &self.specs
    }

    pub(crate) fn index(&self) -> &HashMap<String, usize> {
        &self.index
    }
}
