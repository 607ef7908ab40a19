//! Statement lowering. Each [`Statement`] lowers to zero or more
//! target-language statement lines, joined by the caller into a function
//! or block body. A [`Block`] used in *statement* position drops any
//! trailing value (it is a `YieldingExpression` only when the surrounding
//! construct actually consumes the block's result, e.g. an `if` used as a
//! value); a block used in *value* position (see [`codegen_block_as_value`])
//! instead returns that trailing expression's text for the caller to
//! splice into an enclosing expression.

use crate::checker::ValidatedTypeInformation;
use crate::parser::ast::{Assignment, Block, Declaration, Initialisation, LValue, Statement};

use super::context::CodegenContext;
use super::expression::CodeGen;
use super::naming;
use super::toplevel::codegen_function_signature;
use super::types::lower_type;

/// Lowers every statement in `block` and joins them with newlines; the
/// block's trailing `YieldingExpression`, if any, lowers to a plain
/// expression statement (its value is discarded).
pub fn codegen_block(block: &Block<ValidatedTypeInformation>, ctx: &CodegenContext) -> String {
    block
        .statements
        .iter()
        .map(|stmt| stmt.codegen(ctx))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lowers `block` for use in an expression context: every statement but the
/// last lowers normally, and the last statement (expected to be a
/// `YieldingExpression` per the "yielding expression must be block-final"
/// invariant) contributes its expression text as the block's value. A block
/// with no yielding final statement has no target-language value and
/// should only be reached from a `void`-typed `if`/`when` arm; it lowers to
/// a comma expression ending in a placeholder so the generated code still
/// compiles.
pub fn codegen_block_as_value(
    block: &Block<ValidatedTypeInformation>,
    ctx: &CodegenContext,
) -> String {
    let Some((last, init)) = block.statements.split_last() else {
        return "/* empty block */ (void)0".to_string();
    };

    let prefix = init
        .iter()
        .map(|stmt| stmt.codegen(ctx))
        .collect::<Vec<_>>()
        .join("\n");

    let value = match last {
        Statement::YieldingExpression(expr) => expr.codegen(ctx),
        other => {
            let text = other.codegen(ctx);
            return format!("({prefix}\n{text}\n, (void)0)");
        }
    };

    if prefix.is_empty() {
        value
    } else {
        format!("({prefix}\n, {value})")
    }
}

impl CodeGen for Statement<ValidatedTypeInformation> {
    type ReturnValue = String;

    fn codegen(&self, ctx: &CodegenContext) -> String {
        match self {
            Statement::Function(function) => {
                // A nested function declaration: emit its definition inline
                // (the target language nests lambdas, not named functions,
                // so this is hoisted to a file-scope static function keyed
                // by its mangled name and simply referenced here).
                let mangled = naming::mangle(&function.id.name);
                ctx.store_function(&function.id.name, mangled.clone());
                codegen_function_signature(function, ctx, "static ");
                String::new()
            }
            Statement::If(if_expr) => {
                format!(
                    "if ({}) {{\n{}\n}} else {{\n{}\n}}",
                    if_expr.condition.codegen(ctx),
                    codegen_block(&if_expr.then_block, ctx),
                    codegen_block(&if_expr.else_block, ctx),
                )
            }
            Statement::WhileLoop(while_loop) => {
                format!(
                    "while ({}) {{\n{}\n}}",
                    while_loop.condition.codegen(ctx),
                    codegen_block(&while_loop.block, ctx),
                )
            }
            Statement::Initialization(init) => init.codegen(ctx),
            Statement::Constant(constant) => {
                // Local constants fold the same way top-level ones do;
                // lower them as a `const` binding in place.
                let ty = lower_type(ctx, &constant.info.type_id);
                let mangled = naming::mangle(&constant.id.name);
                ctx.store_constant(&constant.id.name, mangled.clone());
                format!("const {ty} {mangled} = {};", constant.value.codegen(ctx))
            }
            Statement::Assignment(assignment) => assignment.codegen(ctx),
            Statement::Expression(expr) => format!("{};", expr.codegen(ctx)),
            Statement::YieldingExpression(expr) => format!("{};", expr.codegen(ctx)),
            Statement::Return(expr) => format!("return {};", expr.codegen(ctx)),
            Statement::Comment(text) => format!("// {text}"),
            Statement::Declaration(declaration) => declaration.codegen(ctx),
            Statement::StructDeclaration(struct_decl) => {
                super::toplevel::codegen_struct_declaration(struct_decl, ctx);
                String::new()
            }
        }
    }
}

impl CodeGen for Initialisation<ValidatedTypeInformation> {
    type ReturnValue = String;

    fn codegen(&self, ctx: &CodegenContext) -> String {
        let ty = lower_type(ctx, &self.info.type_id);
        let mangled = naming::mangle(&self.id.name);
        ctx.store_variable(&self.id.name, mangled.clone());
        let qualifier = if self.mutable { "" } else { "const " };
        format!(
            "{qualifier}{ty} {mangled} = {};",
            self.value.codegen(ctx)
        )
    }
}

impl CodeGen for Declaration<ValidatedTypeInformation> {
    type ReturnValue = String;

    fn codegen(&self, ctx: &CodegenContext) -> String {
        // An extern declaration with no initialiser: forward-declares a
        // name the linker resolves from elsewhere (native interop code
        // under `cpp/`, per the package layout).
        let ty = lower_type(ctx, &self.info.type_id);
        let mangled = naming::mangle(&self.name.name);
        ctx.store_variable(&self.name.name, mangled.clone());
        format!("extern {ty} {mangled};")
    }
}

impl CodeGen for Assignment<ValidatedTypeInformation> {
    type ReturnValue = String;

    fn codegen(&self, ctx: &CodegenContext) -> String {
        let lhs = match &self.lvalue {
            LValue::Id(id) => id.codegen(ctx),
            LValue::Postfix(postfix) => postfix.codegen(ctx),
        };
        format!("{lhs} = {};", self.rvalue.codegen(ctx))
    }
}
