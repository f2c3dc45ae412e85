use swc_common::{SourceMap, SourceMapper, Spanned};
use swc_ecma_ast::{
    AssignOp, AssignTarget, Callee, Decorator, Expr, ExprOrSpread, Lit, MemberProp, Prop,
    PropName, PropOrSpread, SimpleAssignTarget,
};

use crate::core::syntax::{ArgumentExpr, ArgumentLabel, Marker, MarkerArgument};

/// Dotted text of an identifier or member chain: `Register`, `decorators.Register`.
pub fn dotted_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            let object = dotted_name(&member.obj)?;
            Some(format!("{}.{}", object, prop.sym))
        }
        _ => None,
    }
}

/// Lower a decorator into a marker.
///
/// `@X` has no arguments, `@X(...)` keeps its argument list. Decorators whose
/// callee is not a name (`@(factory())`) are not markers.
pub fn lower_decorator(decorator: &Decorator, source_map: &SourceMap) -> Option<Marker> {
    if is_parenthesized(decorator, source_map) {
        return None;
    }

    match &*decorator.expr {
        Expr::Call(call) => {
            let Callee::Expr(callee) = &call.callee else {
                return None;
            };
            let name = dotted_name(callee)?;
            let arguments = call
                .args
                .iter()
                .enumerate()
                .flat_map(|(index, arg)| {
                    lower_argument(arg, source_map)
                        .into_iter()
                        .map(move |lowered| lowered.at(index))
                })
                .collect();
            Some(Marker { name, arguments })
        }
        expr => dotted_name(expr).map(|name| Marker {
            name,
            arguments: Vec::new(),
        }),
    }
}

/// `@(expr)`. The parser drops the parentheses, so only the source text tells.
fn is_parenthesized(decorator: &Decorator, source_map: &SourceMap) -> bool {
    source_map
        .span_to_snippet(decorator.span)
        .is_ok_and(|text| text.trim_start_matches('@').trim_start().starts_with('('))
}

/// Lower one call argument.
///
/// An object literal expands into one colon-labeled argument per property,
/// so a single call argument may produce several marker arguments.
fn lower_argument(arg: &ExprOrSpread, source_map: &SourceMap) -> Vec<MarkerArgument> {
    if arg.spread.is_some() {
        return vec![MarkerArgument::positional(ArgumentExpr::Other(
            "a spread argument",
        ))];
    }

    match &*arg.expr {
        Expr::Assign(assign) if assign.op == AssignOp::Assign => {
            if let AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) = &assign.left {
                vec![MarkerArgument::labeled(
                    ArgumentLabel::Equals(binding.id.sym.to_string()),
                    lower_value(&assign.right, source_map),
                )]
            } else {
                vec![MarkerArgument::positional(ArgumentExpr::Other(
                    "an assignment",
                ))]
            }
        }
        Expr::Object(object) => object
            .props
            .iter()
            .map(|prop| lower_property(prop, source_map))
            .collect(),
        expr => vec![MarkerArgument::positional(lower_value(expr, source_map))],
    }
}

fn lower_property(prop: &PropOrSpread, source_map: &SourceMap) -> MarkerArgument {
    let PropOrSpread::Prop(prop) = prop else {
        return MarkerArgument::positional(ArgumentExpr::Other("a spread property"));
    };

    match &**prop {
        Prop::KeyValue(kv) => match property_name(&kv.key) {
            Some(key) => MarkerArgument::labeled(
                ArgumentLabel::Colon(key),
                lower_value(&kv.value, source_map),
            ),
            None => MarkerArgument::positional(ArgumentExpr::Other("a computed property")),
        },
        Prop::Shorthand(ident) => MarkerArgument::labeled(
            ArgumentLabel::Colon(ident.sym.to_string()),
            ArgumentExpr::Identifier(ident.sym.to_string()),
        ),
        _ => MarkerArgument::positional(ArgumentExpr::Other("an object member")),
    }
}

fn property_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string_lossy().to_string()),
        _ => None,
    }
}

/// Classify an argument expression by shape.
fn lower_value(expr: &Expr, source_map: &SourceMap) -> ArgumentExpr {
    match expr {
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => ArgumentExpr::MemberAccess {
                member: prop.sym.to_string(),
            },
            MemberProp::Computed(_) => ArgumentExpr::Other("a computed member access"),
            MemberProp::PrivateName(_) => ArgumentExpr::Other("a private member access"),
        },
        Expr::Lit(Lit::Str(s)) => ArgumentExpr::Literal(s.value.to_string_lossy().to_string()),
        Expr::Lit(lit) => match source_map.span_to_snippet(lit.span()) {
            Ok(text) => ArgumentExpr::Literal(text),
            Err(_) => ArgumentExpr::Other("an unreadable literal"),
        },
        Expr::Ident(ident) => ArgumentExpr::Identifier(ident.sym.to_string()),
        Expr::Tpl(_) => ArgumentExpr::Other("a template literal"),
        Expr::Call(_) => ArgumentExpr::Other("a call expression"),
        Expr::Paren(_) => ArgumentExpr::Other("a parenthesized expression"),
        _ => ArgumentExpr::Other("an unsupported expression"),
    }
}
