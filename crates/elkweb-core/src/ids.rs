use crate::error::TransformError;
use rustc_hash::FxHashSet;
use std::fmt;

/// Identifier scopes of the External Graph.
///
/// Ids only have to be unique within their own scope: a node and an edge may share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdScope {
    Node,
    Edge,
    Port,
    Label,
    Section,
}

impl IdScope {
    pub const ALL: [IdScope; 5] = [
        IdScope::Node,
        IdScope::Edge,
        IdScope::Port,
        IdScope::Label,
        IdScope::Section,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Port => "port",
            Self::Label => "label",
            Self::Section => "edge section",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Node => 0,
            Self::Edge => 1,
            Self::Port => 2,
            Self::Label => 3,
            Self::Section => 4,
        }
    }
}

impl fmt::Display for IdScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-transformation uniqueness tracker.
///
/// One registry covers exactly one transformation pass. Reusing it across passes would report
/// ids of the previous graph as duplicates.
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    seen: [FxHashSet<String>; 5],
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` in `scope`, failing if it is absent or was already recorded there.
    pub fn check_and_remember(
        &mut self,
        id: Option<&str>,
        scope: IdScope,
    ) -> Result<(), TransformError> {
        let Some(id) = id else {
            return Err(TransformError::MissingIdentifier { scope });
        };
        let set = &mut self.seen[scope.index()];
        if set.contains(id) {
            return Err(TransformError::DuplicateIdentifier {
                scope,
                id: id.to_string(),
            });
        }
        set.insert(id.to_string());
        Ok(())
    }

    pub fn contains(&self, scope: IdScope, id: &str) -> bool {
        self.seen[scope.index()].contains(id)
    }

    pub fn len(&self, scope: IdScope) -> usize {
        self.seen[scope.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.iter().all(|s| s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::{IdRegistry, IdScope};
    use crate::error::TransformError;

    #[test]
    fn registry_rejects_missing_id() {
        let mut reg = IdRegistry::new();
        assert_eq!(
            reg.check_and_remember(None, IdScope::Port),
            Err(TransformError::MissingIdentifier {
                scope: IdScope::Port
            })
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn registry_rejects_repeated_id_in_same_scope() {
        let mut reg = IdRegistry::new();
        reg.check_and_remember(Some("a"), IdScope::Node).unwrap();
        let err = reg.check_and_remember(Some("a"), IdScope::Node).unwrap_err();
        assert_eq!(err.id(), Some("a"));
        assert_eq!(err.to_string(), "Duplicate id: a.");
    }

    #[test]
    fn registry_scopes_are_independent() {
        let mut reg = IdRegistry::new();
        for scope in IdScope::ALL {
            reg.check_and_remember(Some("shared"), scope).unwrap();
        }
        for scope in IdScope::ALL {
            assert!(reg.contains(scope, "shared"));
            assert_eq!(reg.len(scope), 1);
        }
    }
}
