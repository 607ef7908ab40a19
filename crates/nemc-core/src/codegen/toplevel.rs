//! Top-level declaration lowering: functions, constants, extern
//! declarations, struct declarations and instance (method) blocks. This is
//! the orchestration layer that walks a checked and validated program and
//! drives the expression/statement/type lowering in the sibling modules.

use crate::checker::types::Type;
use crate::checker::ValidatedTypeInformation;
use crate::parser::ast::{
    Block, Constant, Declaration, Function, Instance, Statement, StructDeclaration,
    TopLevelStatement,
};

use super::context::CodegenContext;
use super::expression::CodeGen;
use super::naming;
use super::types::lower_type;

/// Lowers a function body for use as a function's own body (as opposed to
/// [`super::statement::codegen_block_as_value`], which wraps the block in an
/// IIFE for splicing into an arbitrary expression): the trailing
/// `YieldingExpression`, if any, becomes the function's `return`.
fn codegen_function_body(block: &Block<ValidatedTypeInformation>, ctx: &CodegenContext) -> String {
    let Some((last, init)) = block.statements.split_last() else {
        return String::new();
    };

    let prefix = init
        .iter()
        .map(|stmt| stmt.codegen(ctx))
        .collect::<Vec<_>>()
        .join("\n");

    let last_code = match last {
        Statement::YieldingExpression(expr) => format!("return {};", expr.codegen(ctx)),
        other => other.codegen(ctx),
    };

    if prefix.is_empty() {
        last_code
    } else {
        format!("{prefix}\n{last_code}")
    }
}

fn function_param_types(function: &Function<ValidatedTypeInformation>) -> (Vec<Type>, Type) {
    match &function.info.type_id {
        Type::Function {
            params,
            return_value,
        } => (params.clone(), (**return_value).clone()),
        other => (Vec::new(), other.clone()),
    }
}

/// Emits `function`'s forward declaration (`declare`) and definition
/// (`define`). `prefix` carries a target-language storage qualifier, e.g.
/// `"static "` for a function nested inside another one. `receiver` carries
/// the mangled struct type name when this is an instance method, in which
/// case an explicit `this` reference parameter is prepended and bound as a
/// constant in the body's scope, mirroring the checker's own `this`-as-
/// constant binding (see `checker::typed_ast::statement::instance`).
fn emit_function(
    function: &Function<ValidatedTypeInformation>,
    ctx: &CodegenContext,
    mangled_name: &str,
    prefix: &str,
    receiver: Option<&str>,
) {
    let (param_types, return_type) = function_param_types(function);
    let return_code = lower_type(ctx, &return_type);

    let mut params_decl = Vec::new();
    if let Some(receiver_ty) = receiver {
        params_decl.push(format!("{receiver_ty}& this_"));
    }
    for (param, ty) in function.parameters.iter().zip(param_types.iter()) {
        params_decl.push(format!(
            "{} {}",
            lower_type(ctx, ty),
            naming::mangle(&param.name.name)
        ));
    }
    let params_joined = params_decl.join(", ");

    ctx.writer
        .borrow_mut()
        .declare_line(format!("{prefix}{return_code} {mangled_name}({params_joined});"));

    ctx.enter_scope();
    if receiver.is_some() {
        ctx.store_constant("this", "this_");
    }
    for param in &function.parameters {
        ctx.store_variable(&param.name.name, naming::mangle(&param.name.name));
    }
    let body = codegen_function_body(&function.body, ctx);
    ctx.exit_scope();

    ctx.writer.borrow_mut().define_line(format!(
        "{prefix}{return_code} {mangled_name}({params_joined}) {{\n{body}\n}}"
    ));
}

/// Emits a free function's signature and body, storing its mangled name so
/// call sites (including recursive self-calls) resolve it. Used both for
/// top-level functions and for `Statement::Function` (nested functions),
/// which pass `"static "` as `prefix`.
pub fn codegen_function_signature(
    function: &Function<ValidatedTypeInformation>,
    ctx: &CodegenContext,
    prefix: &str,
) {
    let mangled = naming::mangle(&function.id.name);
    ctx.store_function(&function.id.name, mangled.clone());
    emit_function(function, ctx, &mangled, prefix, None);
}

/// Emits a struct's field layout. Behaviour-implementor vptr slots are
/// unreachable under the current grammar (no `extend ... behaves ...`
/// surface syntax exists yet, see `DESIGN.md`), so only user-declared
/// fields are emitted.
pub fn codegen_struct_declaration(
    struct_decl: &StructDeclaration<ValidatedTypeInformation>,
    ctx: &CodegenContext,
) {
    let name = naming::mangle(&struct_decl.id.name);
    ctx.writer.borrow_mut().declare_line(format!("struct {name};"));

    let mut def = String::new();
    def.push_str(&format!("struct {name} {{\n"));
    for field in &struct_decl.fields {
        let field_type = lower_type(ctx, &field.info.type_id);
        def.push_str(&format!(
            "    {field_type} {};\n",
            naming::mangle(&field.name.name)
        ));
    }
    def.push_str("};\n");
    ctx.writer.borrow_mut().define_line(def);
}

/// Emits every method body in `instance` as a free function taking an
/// explicit `this` reference, named `{Struct}_{method}`. `MethodDeclaration`
/// entries (signature-only, no body) describe behaviour requirements that
/// the current AST has no implementor-resolution story for yet and are
/// skipped; see `DESIGN.md`.
pub fn codegen_instance(instance: &Instance<ValidatedTypeInformation>, ctx: &CodegenContext) {
    let target_type = Type::try_from((&instance.name, &instance.info.context))
        .expect("instance target type was already resolved during checking");
    let target_name = match &target_type {
        Type::Struct(name, _) => name.clone(),
        other => naming::mangle(&other.canonical()),
    };
    let receiver_type_text = lower_type(ctx, &target_type);

    for function in &instance.functions {
        let mangled = naming::join(&[target_name.as_str(), function.id.name.as_str()]);
        ctx.store_method(&target_name, &function.id.name, mangled.clone());
        emit_function(function, ctx, &mangled, "", Some(&receiver_type_text));
    }
}

/// Emits an extern declaration: a name the linker resolves from native
/// sources shipped alongside the package (`cpp/`, per the package layout).
pub fn codegen_declaration(declaration: &Declaration<ValidatedTypeInformation>, ctx: &CodegenContext) {
    let ty = lower_type(ctx, &declaration.info.type_id);
    let mangled = naming::mangle(&declaration.name.name);
    ctx.store_variable(&declaration.name.name, mangled.clone());
    ctx.writer
        .borrow_mut()
        .declare_line(format!("extern {ty} {mangled};"));
}

/// Emits a top-level constant as a `const` global.
pub fn codegen_constant(constant: &Constant<ValidatedTypeInformation>, ctx: &CodegenContext) {
    let ty = lower_type(ctx, &constant.info.type_id);
    let mangled = naming::mangle(&constant.id.name);
    ctx.store_constant(&constant.id.name, mangled.clone());
    ctx.writer
        .borrow_mut()
        .declare_line(format!("extern const {ty} {mangled};"));
    ctx.writer.borrow_mut().define_line(format!(
        "const {ty} {mangled} = {};",
        constant.value.codegen(ctx)
    ));
}

/// Mangled name given to the user's `main` function. It cannot keep its
/// source name verbatim because the emitted entry-point trampoline (see
/// `codegen::render_entry_point`) owns the real C++ `main`, and calls this
/// one.
pub const MANGLED_USER_MAIN: &str = "nemesis_user_main";

/// Top-level entry point run by `nemc-cli`'s `build`/`test` commands: walks
/// every validated top-level statement in source order, emits it, and
/// returns the rendered translation unit plus the mangled names of any
/// discovered test functions.
///
/// Test-function discovery: the current grammar has no attribute or
/// annotation syntax, so a top-level function is treated as a test function
/// when its source name starts with `test_`. This convention is recorded
/// as a deliberate, documented choice in `DESIGN.md` rather than an
/// oversight.
pub fn generate(statements: &[TopLevelStatement<ValidatedTypeInformation>]) -> GeneratedProgram {
    let ctx = CodegenContext::default();
    let mut main_return_is_void = true;
    let mut has_main = false;

    for statement in statements {
        match statement {
            TopLevelStatement::Comment(text) => {
                ctx.writer.borrow_mut().define_line(format!("// {text}"));
            }
            TopLevelStatement::Function(function) if function.id.name == "main" => {
                has_main = true;
                let (_, return_type) = function_param_types(function);
                main_return_is_void = matches!(return_type, Type::Void);
                ctx.store_function("main", MANGLED_USER_MAIN.to_string());
                emit_function(function, &ctx, MANGLED_USER_MAIN, "", None);
            }
            TopLevelStatement::Function(function) => {
                codegen_function_signature(function, &ctx, "");
                if function.id.name.starts_with("test_") {
                    ctx.test_functions
                        .borrow_mut()
                        .push(naming::mangle(&function.id.name));
                }
            }
            TopLevelStatement::Constant(constant) => codegen_constant(constant, &ctx),
            TopLevelStatement::Declaration(declaration) => codegen_declaration(declaration, &ctx),
            TopLevelStatement::StructDeclaration(struct_decl) => {
                codegen_struct_declaration(struct_decl, &ctx)
            }
            TopLevelStatement::Instance(instance) => codegen_instance(instance, &ctx),
        }
    }

    GeneratedProgram {
        source: ctx.writer.borrow().render(),
        test_functions: ctx.test_functions.borrow().clone(),
        has_entry_point: has_main,
        main_return_is_void,
    }
}

/// The rendered output of a full code generation pass, plus the bookkeeping
/// `nemc-cli` needs to decide what to emit around it (an entry-point
/// trampoline, or a test driver).
pub struct GeneratedProgram {
    pub source: String,
    pub test_functions: Vec<String>,
    pub has_entry_point: bool,
    pub main_return_is_void: bool,
}
