//! Lowering of [`Type`] values to target-language type text, and emission
//! of the structural types (variants, ranges, anonymous tuples) that only
//! exist at the target level because the source language treats them
//! structurally.

use crate::checker::types::{FloatWidth, IntWidth, Type};

use super::context::CodegenContext;
use super::naming;

fn int_bits(width: &IntWidth) -> u32 {
    match width {
        IntWidth::W8 => 8,
        IntWidth::W16 => 16,
        IntWidth::W32 => 32,
        IntWidth::W64 => 64,
    }
}

/// Lowers a fully-resolved [`Type`] to the target-language spelling used in
/// declarations, casts and `sizeof`-like positions. Structural types that
/// need a one-time emitted declaration (variant, range, anonymous tuple)
/// are emitted as a side effect of the first lowering that needs them.
pub fn lower_type(ctx: &CodegenContext, ty: &Type) -> String {
    match ty {
        Type::Void => "void".to_string(),
        Type::Boolean => "bool".to_string(),
        Type::Character => "char32_t".to_string(),
        Type::Chars(n) => format!("std::array<char32_t, {n}>"),
        Type::String => "std::string".to_string(),
        Type::Integer { width, signed } => {
            let prefix = if *signed { "" } else { "u" };
            format!("{prefix}int{}_t", int_bits(width))
        }
        Type::Rational => "nemesis::rational".to_string(),
        Type::FloatingPoint(FloatWidth::W32) => "float".to_string(),
        Type::FloatingPoint(FloatWidth::W64) => "double".to_string(),
        Type::Complex => "nemesis::complex".to_string(),
        Type::Unknown => unreachable!("codegen received a node with an unresolved type"),
        Type::Reference(inner) => format!("{}*", lower_type(ctx, inner)),
        Type::Tuple(members) => ctx.ensure_tuple(members),
        Type::Slice(inner) => format!("nemesis::slice<{}>", lower_type(ctx, inner)),
        Type::Array(inner, len) => format!("std::array<{}, {len}>", lower_type(ctx, inner)),
        Type::Struct(name, _) => naming::mangle(name),
        Type::Variant(members) => ctx.ensure_variant(members),
        Type::Function {
            params,
            return_value,
        } => {
            let params = params
                .iter()
                .map(|p| lower_type(ctx, p))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}(*)({params})", lower_type(ctx, return_value))
        }
        Type::Range(inner) => ctx.ensure_range(inner),
        Type::Behaviour(name) => format!("{}_vtable*", naming::mangle(name)),
        Type::Generic(name) => {
            unreachable!("generic parameter `{name}` reached codegen uninstantiated")
        }
    }
}

/// Emits a variant's tagged-union declaration (`declare`: opaque shell) and
/// definition (`define`: tag + union, designated constructors `V_init_H`,
/// checked accessors `V_as_H`).
pub fn emit_variant(ctx: &CodegenContext, name: &str, members: &[Type]) {
    ctx.writer.borrow_mut().declare_line(format!("struct {name};"));

    let member_types: Vec<String> = members.iter().map(|m| lower_type(ctx, m)).collect();
    let tags: Vec<u64> = members
        .iter()
        .map(|m| CodegenContext::type_tag(&m.canonical()))
        .collect();

    let mut def = String::new();
    def.push_str(&format!("struct {name} {{\n"));
    def.push_str("    std::uint64_t __tag;\n");
    def.push_str("    union {\n");
    for (member_ty, tag) in member_types.iter().zip(&tags) {
        def.push_str(&format!("        {member_ty} __m_{tag:016x};\n"));
    }
    def.push_str("    } __storage;\n");
    def.push('\n');
    for (member_ty, tag) in member_types.iter().zip(&tags) {
        def.push_str(&format!(
            "    static {name} V_init_{tag:016x}({member_ty} value) {{\n"
        ));
        def.push_str(&format!("        {name} result;\n"));
        def.push_str(&format!("        result.__tag = {tag}ull;\n"));
        def.push_str(&format!("        result.__storage.__m_{tag:016x} = value;\n"));
        def.push_str("        return result;\n");
        def.push_str("    }\n");
    }
    def.push('\n');
    for (member_ty, tag) in member_types.iter().zip(&tags) {
        def.push_str(&format!(
            "    {member_ty}& V_as_{tag:016x}(const char* loc) {{\n"
        ));
        def.push_str(&format!("        if (__tag != {tag}ull) {{\n"));
        def.push_str(
            "            nemesis::runtime_crash(\"variant access to inactive member\", loc);\n",
        );
        def.push_str("        }\n");
        def.push_str(&format!("        return __storage.__m_{tag:016x};\n"));
        def.push_str("    }\n");
    }
    def.push_str("};\n");

    ctx.writer.borrow_mut().define_line(def);
}

/// Emits a range wrapper: a bounds-checked value holder whose constructor
/// asserts the runtime value falls within the bounds recorded on it.
pub fn emit_range(ctx: &CodegenContext, name: &str, inner: &Type) {
    ctx.writer.borrow_mut().declare_line(format!("struct {name};"));

    let inner_ty = lower_type(ctx, inner);
    let def = format!(
        "struct {name} {{\n    {inner_ty} __value;\n    {inner_ty} __lo;\n    {inner_ty} __hi;\n    bool __hi_inclusive;\n\n    {name}({inner_ty} value, {inner_ty} lo, {inner_ty} hi, bool hi_inclusive)\n        : __value(value), __lo(lo), __hi(hi), __hi_inclusive(hi_inclusive) {{\n        bool in_range = value >= lo && (hi_inclusive ? value <= hi : value < hi);\n        if (!in_range) {{\n            nemesis::runtime_crash(\"range constructor bounds check failed\", __FILE__);\n        }}\n    }}\n\n    {inner_ty} unwrap() const {{ return __value; }}\n}};\n"
    );
    ctx.writer.borrow_mut().define_line(def);
}

/// Emits an anonymous structural tuple as a named struct (named by a hash
/// of its canonical form, since the source has no nominal name for it).
pub fn emit_tuple(ctx: &CodegenContext, name: &str, members: &[Type]) {
    ctx.writer.borrow_mut().declare_line(format!("struct {name};"));

    let mut def = String::new();
    def.push_str(&format!("struct {name} {{\n"));
    for (i, member) in members.iter().enumerate() {
        let member_ty = lower_type(ctx, member);
        def.push_str(&format!("    {member_ty} _{i};\n"));
    }
    def.push_str("};\n");
    ctx.writer.borrow_mut().define_line(def);
}
