//! Inference context wrapper holding the current `Environment` cursor
//! during type checking. Cloned frequently (cheap, `Rc`-backed) to snapshot
//! environment state when constructing nested AST nodes; equality is
//! intentionally degenerate (always true) because context identity is not
//! semantically relevant to type equality comparisons.
use super::environment::Environment;

#[derive(Debug, Clone)]
pub struct Context {
    pub environment: Environment,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            environment: Environment::new(),
        }
    }
}

impl<'a> From<&'a mut Context> for &'a Context {
    fn from(value: &'a mut Context) -> Self {
        value
    }
}

impl PartialEq for Context {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for Context {}
