use std::collections::HashMap;

/// Maps interesting-number names (e.g. `"it"`) to their position in the
/// array the host produces for each evaluation.
///
/// Built once from the builder's name list. Numeric comparison predicates
/// resolve their variable through this registry at parse time.
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl VariableRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a name at the next position. Returns `None` if the name is
    /// already taken.
    pub(crate) fn register(&mut self, name: &str) -> Option<usize> {
        if self.indices.contains_key(name) {
            return None;
        }
        let idx = self.names.len();
        self.indices.insert(name.to_owned(), idx);
        self.names.push(name.to_owned());
        Some(idx)
    }

    /// Look up the array position of a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// The number of declared variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in array order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get() {
        let mut reg = VariableRegistry::new();
        assert_eq!(reg.register("it"), Some(0));
        assert_eq!(reg.get("it"), Some(0));
    }

    #[test]
    fn duplicate_register_is_rejected() {
        let mut reg = VariableRegistry::new();
        reg.register("it");
        assert_eq!(reg.register("it"), None);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn positions_follow_declaration_order() {
        let mut reg = VariableRegistry::new();
        for name in ["light", "depth", "hour"] {
            reg.register(name);
        }
        assert_eq!(reg.get("depth"), Some(1));
        assert_eq!(reg.iter().collect::<Vec<_>>(), ["light", "depth", "hour"]);
    }

    #[test]
    fn get_missing_returns_none() {
        let reg = VariableRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.get("it"), None);
    }
}
