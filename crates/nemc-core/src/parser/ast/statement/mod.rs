mod assignment;
mod constant;
mod declaration;
mod initialisation;
mod instance;
mod method_declaration;
mod struct_declaration;
mod while_loop;

pub use self::assignment::*;
pub use self::constant::*;
pub use self::declaration::*;
pub use self::initialisation::*;
pub use self::instance::*;
pub use self::method_declaration::*;
pub use self::struct_declaration::*;
pub use self::while_loop::*;

use crate::lexer::Span;
use crate::{
    grammar::{self, FromGrammar},
    parser::ast::AstNode,
};

use super::{Expression, Function, If};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<T> {
    Function(Function<T>),
    If(If<T>),
    WhileLoop(WhileLoop<T>),
    Initialization(Initialisation<T>),
    Constant(Constant<T>),
    Assignment(Assignment<T>),
    Expression(Expression<T>),
    YieldingExpression(Expression<T>),
    Return(Expression<T>),
    Comment(String),
    Declaration(Declaration<T>),
    StructDeclaration(StructDeclaration<T>),
}

/// Everything that is allowed at toplevel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevelStatement<T> {
    Comment(String),
    Function(Function<T>),
    Constant(Constant<T>),
    Declaration(Declaration<T>),
    StructDeclaration(StructDeclaration<T>),
    Instance(Instance<T>),
}

impl FromGrammar<grammar::ToplevelStatement> for TopLevelStatement<()> {
    fn transform(item: rust_sitter::Spanned<grammar::ToplevelStatement>, source: &str) -> Self {
        let rust_sitter::Spanned { value, .. } = item;

        match value {
            grammar::ToplevelStatement::FunctionDeclaration(function) => {
                TopLevelStatement::Function(Function::transform(function, source))
            }
            grammar::ToplevelStatement::Constant(constant) => {
                TopLevelStatement::Constant(Constant::transform(constant, source))
            }
            grammar::ToplevelStatement::Declaration(declaration) => {
                TopLevelStatement::Declaration(Declaration::transform(declaration, source))
            }
            grammar::ToplevelStatement::StructDeclaration(declaration) => {
                TopLevelStatement::StructDeclaration(StructDeclaration::transform(declaration, source))
            }
            grammar::ToplevelStatement::Instance(instance) => {
                TopLevelStatement::Instance(Instance::transform(instance, source))
            }
            grammar::ToplevelStatement::Comment(comment) => {
                TopLevelStatement::Comment(comment.value.content)
            }
        }
    }
}

impl FromGrammar<grammar::Statement> for Statement<()> {
    fn transform(item: rust_sitter::Spanned<grammar::Statement>, source: &str) -> Self {
        let rust_sitter::Spanned { value, .. } = item;

        match value {
            grammar::Statement::FunctionDeclaration(function) => {
                Statement::Function(Function::transform(function, source))
            }
            grammar::Statement::VariableDeclaration(declaration) => {
                Statement::Initialization(Initialisation::transform(declaration, source))
            }
            grammar::Statement::Assignment(assignment) => {
                Statement::Assignment(Assignment::transform(assignment, source))
            }
            grammar::Statement::WhileStatement(while_statement) => {
                Statement::WhileLoop(WhileLoop::transform(while_statement, source))
            }
            grammar::Statement::Constant(constant) => {
                Statement::Constant(Constant::transform(constant, source))
            }
            grammar::Statement::Expression { inner, .. } => {
                Statement::Expression(Expression::transform(inner, source))
            }
            grammar::Statement::YieldingExpression(inner) => {
                Statement::YieldingExpression(Expression::transform(inner, source))
            }
            grammar::Statement::Return { inner, .. } => {
                Statement::Return(Expression::transform(inner, source))
            }
            grammar::Statement::Declaration(declaration) => {
                Statement::Declaration(Declaration::transform(declaration, source))
            }
            grammar::Statement::StructDeclaration(declaration) => {
                Statement::StructDeclaration(StructDeclaration::transform(declaration, source))
            }
            grammar::Statement::Comment(comment) => Statement::Comment(comment.value.content),
        }
    }
}

impl From<Statement<()>> for AstNode {
    fn from(value: Statement<()>) -> Self {
        AstNode::Statement(value)
    }
}

impl<T> Statement<T>
where
    T: Clone,
{
    pub fn get_info(&self) -> T {
        match self {
            Statement::Function(Function { info, .. }) => info.clone(),
            Statement::If(If { info, .. }) => info.clone(),
            Statement::WhileLoop(WhileLoop { info, .. }) => info.clone(),
            Statement::Initialization(Initialisation { info, .. }) => info.clone(),
            Statement::Constant(Constant { info, .. }) => info.clone(),
            Statement::Assignment(Assignment { info, .. }) => info.clone(),
            Statement::Expression(exp) => exp.get_info(),
            Statement::YieldingExpression(exp) => exp.get_info(),
            Statement::Return(exp) => exp.get_info(),
            Statement::Comment(_) => unimplemented!("Comments to not have type information"),
            Statement::Declaration(Declaration { info, .. }) => info.clone(),
            Statement::StructDeclaration(StructDeclaration { info, .. }) => info.clone(),
        }
    }

    pub fn position(&self) -> Span {
        match self {
            Statement::Function(Function { position, .. }) => position.clone(),
            Statement::If(If { position, .. }) => position.clone(),
            Statement::WhileLoop(WhileLoop { position, .. }) => position.clone(),
            Statement::Initialization(Initialisation { position, .. }) => position.clone(),
            Statement::Constant(Constant { position, .. }) => position.clone(),
            Statement::Assignment(Assignment { position, .. }) => position.clone(),
            Statement::Expression(exp) => exp.position(),
            Statement::YieldingExpression(exp) => exp.position(),
            Statement::Return(exp) => exp.position(),
            Statement::Comment(_) => todo!(),
            Statement::Declaration(Declaration { position, .. }) => position.clone(),
            Statement::StructDeclaration(StructDeclaration { position, .. }) => position.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        ast::{Id, Num},
        test_helpers::*,
    };

    use super::*;

    #[test]
    fn test_basic_constant() {
        let result = parse_statement("const foo: i32 = 42;").unwrap();
        let Statement::Constant(constant) = result else {
            panic!("expected a constant statement")
        };
        assert_eq!(constant.id.name, "foo");
        assert!(matches!(constant.value, Expression::Num(Num::Integer(42, ..))));
    }

    #[test]
    fn test_basic_return() {
        let result = parse_statement("return 42;").unwrap();
        assert!(matches!(
            result,
            Statement::Return(Expression::Num(Num::Integer(42, ..)))
        ));
    }

    #[test]
    fn test_if_else_without_semicolon() {
        let result = parse_statement("if (x) { 3 + 4 } else { 42 + 1337 }").unwrap();
        assert!(matches!(result, Statement::YieldingExpression(Expression::If(_))));
    }

    #[test]
    fn test_if_else_with_semicolon() {
        let result = parse_statement("if (x) { 3 + 4 } else { 42 + 1337 };").unwrap();
        assert!(matches!(result, Statement::Expression(Expression::If(_))));
    }

    #[test]
    fn test_simple_assignment() {
        let result = parse_statement("x = 42;").unwrap();
        let Statement::Assignment(assignment) = result else {
            panic!("expected an assignment statement")
        };
        assert!(matches!(assignment.lvalue, LValue::Id(Id { ref name, .. }) if name == "x"));
        assert!(matches!(assignment.rvalue, Expression::Num(Num::Integer(42, ..))));
    }
}
