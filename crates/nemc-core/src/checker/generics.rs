//! Generic instantiation cache.
//!
//! Every distinct combination of a generic declaration plus the concrete
//! parameters it is invoked with is instantiated (monomorphised) exactly
//! once; subsequent uses of the same `(declaration, parameters)` pair
//! reuse the cached result instead of re-running the checker over the
//! declaration's body again.

use std::collections::HashMap;

use super::type_matcher::Parameter;
use super::types::Type;

/// Stable identity for a generic declaration (function or struct), derived
/// from its name plus defining span so that two distinct declarations
/// that happen to share a name (in different scopes) do not collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclId {
    pub name: String,
    pub defined_at: String,
}

fn parameter_key(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| match p {
            Parameter::Type(t) => t.canonical(),
            Parameter::Value(v) => format!("{v:?}"),
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct InstantiationCache {
    instantiated: HashMap<(DeclId, String), Type>,
}

impl InstantiationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, decl: &DeclId, parameters: &[Parameter]) -> Option<&Type> {
        self.instantiated.get(&(decl.clone(), parameter_key(parameters)))
    }

    pub fn insert(&mut self, decl: DeclId, parameters: &[Parameter], instantiated_type: Type) {
        self.instantiated.insert((decl, parameter_key(parameters)), instantiated_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit_for_same_parameters() {
        let mut cache = InstantiationCache::new();
        let decl = DeclId { name: "identity".into(), defined_at: "main.ny:1".into() };
        let params = vec![Parameter::Type(Type::Boolean)];
        cache.insert(decl.clone(), &params, Type::Function {
            params: vec![Type::Boolean],
            return_value: Box::new(Type::Boolean),
        });
        assert!(cache.get(&decl, &params).is_some());
    }

    #[test]
    fn test_cache_miss_for_different_parameters() {
        let cache = InstantiationCache::new();
        let decl = DeclId { name: "identity".into(), defined_at: "main.ny:1".into() };
        let params = vec![Parameter::Type(Type::Boolean)];
        assert!(cache.get(&decl, &params).is_none());
    }
}
