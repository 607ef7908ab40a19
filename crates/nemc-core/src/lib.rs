use parser::ast::TopLevelStatement;

pub mod checker;
pub mod codegen;
pub mod grammar;
pub mod lexer;
pub mod parser;

type Ast<T> = Vec<TopLevelStatement<T>>;
