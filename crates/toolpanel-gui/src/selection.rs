//! Expanded-row tracking.
//!
//! Independent of connection state: toggling a row never touches the
//! directory, and the set survives snapshot replacements.

/// Server names whose tool list is expanded, in the order they were opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    names: Vec<String>,
}

impl ExpansionSet {
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Flip `name` and return whether it is now expanded.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(pos) = self.names.iter().position(|n| n == name) {
            self.names.remove(pos);
            false
        } else {
            self.names.push(name.to_string());
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores() {
        let mut set = ExpansionSet::new();
        assert!(set.toggle("fs"));
        assert!(set.contains("fs"));
        assert!(!set.toggle("fs"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut set = ExpansionSet::new();
        set.toggle("web");
        set.toggle("fs");
        set.toggle("git");
        set.toggle("fs");
        assert_eq!(set.iter().collect::<Vec<_>>(), ["web", "git"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_unknown_names_are_allowed() {
        let mut set = ExpansionSet::new();
        assert!(set.toggle("not-listed"));
        set.clear();
        assert!(!set.contains("not-listed"));
    }
}
