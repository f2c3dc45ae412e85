use thiserror::Error;

use crate::core::syntax::SourceContext;

/// Failures that abort a collection pass.
///
/// Every variant is fatal: the pass stops at the first one and no generated
/// unit is produced for any registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error(
        "registry argument of `{type_name}` must be a string literal, an identifier or a member access, found {found}"
    )]
    InvalidRegisterArgument {
        type_name: String,
        found: &'static str,
        context: SourceContext,
    },

    #[error(
        "`{second}` and `{first}` are both registered into `{registry_name}` but extend different base types (`{second_base}` vs `{first_base}`)"
    )]
    ConflictingBaseType {
        registry_name: String,
        first: String,
        first_base: String,
        first_context: SourceContext,
        second: String,
        second_base: String,
        second_context: SourceContext,
    },

    #[error("registry `{registry_name}` exists without a canonical member")]
    NullMatchInvariantViolation { registry_name: String },

    #[error("`{type_name}` is marked with `@{marker}` but no registry name argument was found")]
    MissingRegisterArgument {
        type_name: String,
        marker: String,
        context: SourceContext,
    },

    #[error("`{type_name}` is registered into `{registry_name}` but declares no base type")]
    MissingBaseType {
        type_name: String,
        registry_name: String,
        context: SourceContext,
    },

    #[error("registry name `{registry_name}` of `{type_name}` is not a valid identifier")]
    InvalidRegistryName {
        type_name: String,
        registry_name: String,
        context: SourceContext,
    },

    #[error(
        "`{type_name}` is registered into `{registry_name}` but is not exported from its module"
    )]
    UnexportedRegisteredType {
        type_name: String,
        registry_name: String,
        context: SourceContext,
    },
}

impl RegisterError {
    /// Short kebab-case name shown next to the diagnostic.
    pub fn code(&self) -> &'static str {
        match self {
            RegisterError::InvalidRegisterArgument { .. } => "invalid-register-argument",
            RegisterError::ConflictingBaseType { .. } => "conflicting-base-type",
            RegisterError::NullMatchInvariantViolation { .. } => "null-match",
            RegisterError::MissingRegisterArgument { .. } => "missing-register-argument",
            RegisterError::MissingBaseType { .. } => "missing-base-type",
            RegisterError::InvalidRegistryName { .. } => "invalid-registry-name",
            RegisterError::UnexportedRegisteredType { .. } => "unexported-registered-type",
        }
    }

    /// Primary source position to point at, if the error has one.
    pub fn context(&self) -> Option<&SourceContext> {
        match self {
            RegisterError::InvalidRegisterArgument { context, .. }
            | RegisterError::MissingRegisterArgument { context, .. }
            | RegisterError::MissingBaseType { context, .. }
            | RegisterError::InvalidRegistryName { context, .. }
            | RegisterError::UnexportedRegisteredType { context, .. } => Some(context),
            RegisterError::ConflictingBaseType { second_context, .. } => Some(second_context),
            RegisterError::NullMatchInvariantViolation { .. } => None,
        }
    }

    /// Extra note shown under the diagnostic.
    pub fn note(&self) -> Option<String> {
        match self {
            RegisterError::ConflictingBaseType {
                first,
                first_base,
                first_context,
                registry_name,
                ..
            } => Some(format!(
                "`{}` registered `{}` first with base type `{}` at {}",
                first,
                registry_name,
                if first_base.is_empty() {
                    "<none>"
                } else {
                    first_base.as_str()
                },
                first_context.location
            )),
            RegisterError::NullMatchInvariantViolation { .. } => {
                Some("this is a bug in reggen, please report it".to_string())
            }
            _ => None,
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            RegisterError::InvalidRegisterArgument { .. } => {
                Some("use @Register(\"Name\"), @Register(Name) or @Register(Registries.Name)")
            }
            RegisterError::MissingRegisterArgument { .. } => {
                Some("pass the registry name as the first decorator argument")
            }
            RegisterError::MissingBaseType { .. } => {
                Some("add an `extends` or `implements` clause, or disable `requireBaseType`")
            }
            RegisterError::InvalidRegistryName { .. } => Some(
                "use letters, digits, `_` or `$`, not starting with a digit",
            ),
            RegisterError::UnexportedRegisteredType { .. } => Some(
                "export the class from the top level of its module so the generated file can import it",
            ),
            _ => None,
        }
    }
}
