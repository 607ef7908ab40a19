//! Parent-linked environment graph.
//!
//! Generalises the teacher's flat scope stack into a tree of nodes, one per
//! lexical construct (workspace, function body, test body, block, loop
//! body, declaration body). Each node owns its own variable/constant/type
//! table and a back-link to its parent; lookups walk upward until a binding
//! is found or the root is reached. `inside`/`outscope` walk the same chain
//! looking only at `kind`, which is how contract statements and
//! `break`/`continue` validation decide whether they are lexically
//! permitted. Behaviour (concept) implementations are registered at the
//! root so they stay visible everywhere, mirroring the teacher's single
//! shared `methods` table.

use std::{cell::RefCell, collections::HashMap, fmt::Display, rc::Rc};

use crate::parser::ast::Expression;

use super::{types::Type, TypeInformation};

/// What a given environment node represents lexically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EnvironmentKind {
    Workspace,
    Function,
    Test,
    Block,
    Loop,
    Declaration,
}

#[derive(Clone)]
struct StoredVariable {
    #[allow(dead_code)]
    value: Expression<TypeInformation>,
    type_id: Rc<RefCell<Option<Type>>>,
    mutable: bool,
}

#[derive(Clone, Default)]
struct Frame {
    variables: HashMap<String, StoredVariable>,
    constants: HashMap<String, Type>,
    types: HashMap<String, Type>,
}

struct Node {
    kind: EnvironmentKind,
    frame: Frame,
    parent: Option<Rc<RefCell<Node>>>,
}

/// Cursor into the environment graph. Entering a scope pushes a new node as
/// a child of the current one; exiting pops back to the parent. The graph
/// itself is never torn down on exit, so earlier nodes remain reachable
/// from anything still holding a reference to them.
#[derive(Clone)]
pub struct Environment {
    current: Rc<RefCell<Node>>,
    /// Behaviour implementations, keyed by the implementing type's
    /// canonical string and then behaviour name, shared across the whole
    /// graph (registered once at checking time, read from anywhere).
    concepts: Rc<RefCell<HashMap<Type, HashMap<String, Type>>>>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("kind", &self.current.borrow().kind)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAddError {
    pub name: String,
}

impl Display for TypeAddError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Type '{}' has already been defined", self.name)
    }
}

impl std::error::Error for TypeAddError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableAddError {
    pub name: String,
}

impl Display for VariableAddError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' has already been defined", self.name)
    }
}

impl std::error::Error for VariableAddError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodAddError {
    pub name: String,
}

impl Display for MethodAddError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "method or field '{}' has already been defined", self.name)
    }
}

impl std::error::Error for MethodAddError {}

impl Environment {
    pub fn new() -> Self {
        Environment {
            current: Rc::new(RefCell::new(Node {
                kind: EnvironmentKind::Workspace,
                frame: Frame::default(),
                parent: None,
            })),
            concepts: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Push a fresh node of `kind` as a child of the current node.
    pub fn enter(&mut self, kind: EnvironmentKind) {
        let child = Rc::new(RefCell::new(Node {
            kind,
            frame: Frame::default(),
            parent: Some(Rc::clone(&self.current)),
        }));
        self.current = child;
    }

    /// Pop back to the parent node, if any.
    pub fn exit(&mut self) {
        let parent = self.current.borrow().parent.clone();
        if let Some(parent) = parent {
            self.current = parent;
        }
    }

    /// Enter an anonymous block scope; kept as a direct counterpart of the
    /// teacher's `enter_scope`/`exit_scope` calls that did not care about
    /// lexical kind.
    pub fn enter_scope(&mut self) {
        self.enter(EnvironmentKind::Block);
    }

    pub fn exit_scope(&mut self) {
        self.exit();
    }

    /// True if the current node or any ancestor has the given kind.
    pub fn inside(&self, kind: EnvironmentKind) -> bool {
        let mut node = Some(Rc::clone(&self.current));
        while let Some(n) = node {
            let borrowed = n.borrow();
            if borrowed.kind == kind {
                return true;
            }
            node = borrowed.parent.clone();
        }
        false
    }

    pub fn outscope(&self, kind: EnvironmentKind) -> bool {
        !self.inside(kind)
    }

    pub fn add_variable(
        &mut self,
        name: impl ToString,
        value: Expression<TypeInformation>,
        mutable: bool,
    ) -> Result<(), VariableAddError> {
        let name = name.to_string();
        if self.resolve_name(&name).is_some() {
            return Err(VariableAddError { name });
        }
        let type_id = value.get_info().type_id.clone();
        self.current
            .borrow_mut()
            .frame
            .variables
            .insert(name, StoredVariable { value, type_id, mutable });
        Ok(())
    }

    fn get_variable(&self, name: &str) -> Option<Rc<RefCell<Option<Type>>>> {
        let mut node = Some(Rc::clone(&self.current));
        while let Some(n) = node {
            let borrowed = n.borrow();
            if let Some(v) = borrowed.frame.variables.get(name) {
                return Some(Rc::clone(&v.type_id));
            }
            node = borrowed.parent.clone();
        }
        None
    }

    pub fn is_variable_mutable(&mut self, name: impl ToString) -> Option<bool> {
        let name = name.to_string();
        let mut node = Some(Rc::clone(&self.current));
        while let Some(n) = node {
            let borrowed = n.borrow();
            if let Some(v) = borrowed.frame.variables.get(&name) {
                return Some(v.mutable);
            }
            node = borrowed.parent.clone();
        }
        None
    }

    pub fn update_variable(
        &mut self,
        name: impl ToString,
        value: Expression<TypeInformation>,
    ) -> Result<(), VariableAddError> {
        let name = name.to_string();
        let mut node = Some(Rc::clone(&self.current));
        while let Some(n) = node {
            let mut borrowed = n.borrow_mut();
            if let Some(existing) = borrowed.frame.variables.get_mut(&name) {
                existing.type_id = value.get_info().type_id.clone();
                existing.value = value;
                return Ok(());
            }
            node = borrowed.parent.clone();
        }
        Err(VariableAddError { name })
    }

    pub fn add_type(&mut self, name: impl ToString, type_id: Type) -> Result<(), TypeAddError> {
        let name = name.to_string();
        if self.get_type(&name).is_some() {
            return Err(TypeAddError { name });
        }
        self.current.borrow_mut().frame.types.insert(name, type_id);
        Ok(())
    }

    pub fn get_type(&self, name: impl ToString) -> Option<Type> {
        let name = name.to_string();
        let mut node = Some(Rc::clone(&self.current));
        while let Some(n) = node {
            let borrowed = n.borrow();
            if let Some(t) = borrowed.frame.types.get(&name) {
                return Some(t.clone());
            }
            node = borrowed.parent.clone();
        }
        None
    }

    fn get_constant(&self, name: &str) -> Option<Type> {
        let mut node = Some(Rc::clone(&self.current));
        while let Some(n) = node {
            let borrowed = n.borrow();
            if let Some(t) = borrowed.frame.constants.get(name) {
                return Some(t.clone());
            }
            node = borrowed.parent.clone();
        }
        None
    }

    pub fn add_constant(
        &mut self,
        name: impl ToString,
        type_id: Type,
    ) -> Result<(), VariableAddError> {
        let name = name.to_string();
        if self.resolve_name(&name).is_some() {
            return Err(VariableAddError { name });
        }
        self.current
            .borrow_mut()
            .frame
            .constants
            .insert(name, type_id);
        Ok(())
    }

    /// Resolve either a constant (preferred) or a variable to a shared type
    /// slot.
    pub fn resolve_name(&mut self, name: impl ToString) -> Option<Rc<RefCell<Option<Type>>>> {
        let name = name.to_string();
        self.get_constant(&name)
            .map(|t| Rc::new(RefCell::new(Some(t))))
            .or_else(|| self.get_variable(&name))
    }

    pub fn add_method_to_type(
        &mut self,
        type_id: Type,
        method_name: impl ToString,
        method_type: Type,
    ) -> Result<(), MethodAddError> {
        assert!(
            matches!(method_type, Type::Function { .. }),
            "tried to add non function as method"
        );
        let method_name = method_name.to_string();

        if let Type::Struct(_, props) = &type_id {
            if props.iter().any(|(name, _)| *name == method_name) {
                return Err(MethodAddError { name: method_name });
            }
        };

        let mut current_methods = {
            self.concepts
                .borrow()
                .get(&type_id)
                .cloned()
                .unwrap_or_default()
        };

        if current_methods.contains_key(&method_name) {
            return Err(MethodAddError { name: method_name });
        }

        current_methods.insert(method_name, method_type);
        self.concepts.borrow_mut().insert(type_id, current_methods);

        Ok(())
    }

    pub fn resolve_property_for_type(
        &mut self,
        type_id: Type,
        property: impl ToString,
    ) -> Option<Type> {
        let property_name = property.to_string();

        if let Type::Struct(_, props) = &type_id {
            if let Some(prop) = props
                .iter()
                .find(|(name, _)| *name == property_name)
                .map(|(_, prop)| prop.clone())
            {
                return Some(prop);
            }
        }

        self.concepts
            .borrow()
            .get(&type_id)
            .and_then(|methods| methods.get(&property_name))
            .cloned()
    }

    /// Record that `type_id` extends `behaviour_name`, i.e. implements all
    /// of its required method signatures. Used by `extend ... behaves ...`
    /// declarations, distinct from `add_method_to_type` (which attaches a
    /// single associated function).
    pub fn add_behaviour(
        &mut self,
        type_id: Type,
        behaviour_name: impl ToString,
    ) -> Result<(), MethodAddError> {
        let behaviour_name = behaviour_name.to_string();
        let mut methods = self.concepts.borrow().get(&type_id).cloned().unwrap_or_default();
        let marker = format!("@behaves:{behaviour_name}");
        if methods.contains_key(&marker) {
            return Err(MethodAddError { name: behaviour_name });
        }
        methods.insert(marker, Type::Unknown);
        self.concepts.borrow_mut().insert(type_id, methods);
        Ok(())
    }

    pub fn implements(&self, type_id: &Type, behaviour_name: &str) -> bool {
        let marker = format!("@behaves:{behaviour_name}");
        self.concepts
            .borrow()
            .get(type_id)
            .map(|m| m.contains_key(&marker))
            .unwrap_or(false)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crate::{
        checker::{context::Context, types::Type, TypeInformation},
        lexer::Span,
        parser::ast::{Expression, Id},
    };

    use super::{Environment, EnvironmentKind};

    fn id_expr() -> Expression<TypeInformation> {
        Expression::Id(Id {
            name: "foo".into(),
            info: TypeInformation {
                type_id: Rc::new(RefCell::new(Some(Type::Integer))),
                context: Context::default(),
            },
            position: Span::default(),
        })
    }

    #[test]
    fn test_new() {
        let env = Environment::new();
        assert!(env.inside(EnvironmentKind::Workspace));
    }

    #[test]
    fn test_add_variable() {
        let mut env = Environment::new();
        env.add_variable("foo", id_expr(), false).unwrap();
        assert!(env.resolve_name("foo").is_some());
    }

    #[test]
    fn test_add_override() {
        let mut env = Environment::new();
        env.add_variable("foo", id_expr(), false).unwrap();
        assert!(env.add_variable("foo", id_expr(), false).is_err());
    }

    #[test]
    fn test_enter_scope() {
        let mut env = Environment::new();
        env.enter(EnvironmentKind::Loop);
        assert!(env.inside(EnvironmentKind::Loop));
        env.exit();
        assert!(env.outscope(EnvironmentKind::Loop));
    }

    #[test]
    fn test_shared_variable_values() {
        let mut env = Environment::new();
        env.add_variable("foo", id_expr(), true).unwrap();
        env.enter_scope();
        let slot = env.resolve_name("foo").unwrap();
        assert_eq!(*slot.borrow(), Some(Type::Integer));
        env.exit_scope();
    }
}
