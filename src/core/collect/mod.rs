//! Registry collection - discovery and grouping of registered classes.
//!
//! The collector is a fold over the class declarations of a whole project, in
//! walk order. Each declaration carrying a register marker contributes exactly
//! one [`RegisterMatch`], which is appended to the [`RegistryGroup`] named by
//! the marker's registry argument. Groups are validated as members arrive: the
//! first member of a group fixes the base type every later member must share.
//!
//! ## Argument resolution
//!
//! The registry name is taken from the first marker argument that matches, by
//! precedence:
//!
//! 1. `@Register(registerTypeName = X)`
//! 2. `@Register({ registerTypeName: X })`
//! 3. `@Register(X)` (unlabeled argument at index 0)
//!
//! `X` may be a string (or other) literal, a bare identifier, or a member
//! access whose trailing member is used (`Registries.Inventory` → `Inventory`).
//! The resulting name ends up in a file name and in a TypeScript identifier, so
//! it has to be an identifier itself.

use indexmap::{IndexMap, map::Entry};

use crate::core::{
    error::RegisterError,
    syntax::{
        ArgumentExpr, ArgumentLabel, ClassDeclaration, Marker, ModuleOrigin, SourceContext,
        is_identifier,
    },
};


/// Substring a decorator name must contain to count as a register marker.
pub const DEFAULT_MARKER: &str = "Register";

/// Parameter name carrying the registry name.
pub const DEFAULT_REGISTRY_ARGUMENT: &str = "registerTypeName";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    pub marker: String,
    pub registry_argument: String,
    /// Reject matches without a base type instead of grouping them.
    pub require_base_type: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            registry_argument: DEFAULT_REGISTRY_ARGUMENT.to_string(),
            require_base_type: false,
        }
    }
}

/// One registered class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterMatch {
    pub namespace: String,
    pub self_type_name: String,
    /// First entry of the inheritance list; empty if there is none.
    pub base_type_name: String,
    pub registry_name: String,
    pub context: SourceContext,
    /// Present when the class lives in an ES module and must be imported.
    pub module: Option<ModuleOrigin>,
}

/// All matches sharing one registry name, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryGroup {
    members: Vec<RegisterMatch>,
}

impl RegistryGroup {
    fn new(first: RegisterMatch) -> Self {
        Self {
            members: vec![first],
        }
    }

    /// The first inserted member. Its namespace and base type stand for the group.
    pub fn canonical(&self) -> Option<&RegisterMatch> {
        self.members.first()
    }

    pub fn members(&self) -> &[RegisterMatch] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Registry name → group, in the order registry names were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryGroups {
    groups: IndexMap<String, RegistryGroup>,
}

impl RegistryGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a match to its group, enforcing base type homogeneity.
    pub fn insert(&mut self, found: RegisterMatch) -> Result<(), RegisterError> {
        match self.groups.entry(found.registry_name.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(RegistryGroup::new(found));
            }
            Entry::Occupied(entry) => {
                let group = entry.into_mut();
                let canonical =
                    group
                        .canonical()
                        .ok_or_else(|| RegisterError::NullMatchInvariantViolation {
                            registry_name: found.registry_name.clone(),
                        })?;

                if canonical.base_type_name != found.base_type_name {
                    return Err(RegisterError::ConflictingBaseType {
                        registry_name: found.registry_name,
                        first: canonical.self_type_name.clone(),
                        first_base: canonical.base_type_name.clone(),
                        first_context: canonical.context.clone(),
                        second: found.self_type_name,
                        second_base: found.base_type_name,
                        second_context: found.context,
                    });
                }

                group.members.push(found);
            }
        }
        Ok(())
    }

    pub fn get(&self, registry_name: &str) -> Option<&RegistryGroup> {
        self.groups.get(registry_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryGroup)> {
        self.groups
            .iter()
            .map(|(name, group)| (name.as_str(), group))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of registered classes across all groups.
    pub fn match_count(&self) -> usize {
        self.groups.values().map(RegistryGroup::len).sum()
    }

    #[cfg(test)]
    pub(crate) fn insert_empty_group(&mut self, registry_name: &str) {
        self.groups.insert(
            registry_name.to_string(),
            RegistryGroup {
                members: Vec::new(),
            },
        );
    }
}

/// Run the collection pass over declarations in walk order.
///
/// Stops at the first error; a failed pass yields no groups at all.
pub fn collect_registries<'a, I>(
    declarations: I,
    options: &CollectOptions,
) -> Result<RegistryGroups, RegisterError>
where
    I: IntoIterator<Item = &'a ClassDeclaration>,
{
    declarations
        .into_iter()
        .try_fold(RegistryGroups::new(), |mut groups, declaration| {
            if let Some(found) = match_declaration(declaration, options)? {
                groups.insert(found)?;
            }
            Ok(groups)
        })
}

/// Build the match for one declaration, or `None` if it carries no register marker.
pub fn match_declaration(
    declaration: &ClassDeclaration,
    options: &CollectOptions,
) -> Result<Option<RegisterMatch>, RegisterError> {
    let Some(marker) = find_register_marker(declaration, &options.marker) else {
        return Ok(None);
    };

    let missing_argument = || RegisterError::MissingRegisterArgument {
        type_name: declaration.name.clone(),
        marker: marker.name.clone(),
        context: declaration.context.clone(),
    };

    let argument =
        locate_registry_argument(marker, &options.registry_argument).ok_or_else(missing_argument)?;
    let registry_name = resolve_argument_text(argument, declaration)?;
    if registry_name.is_empty() {
        return Err(missing_argument());
    }
    if !is_identifier(&registry_name) {
        return Err(RegisterError::InvalidRegistryName {
            type_name: declaration.name.clone(),
            registry_name,
            context: declaration.context.clone(),
        });
    }
    if let Some(origin) = &declaration.module
        && origin.export.is_none()
    {
        return Err(RegisterError::UnexportedRegisteredType {
            type_name: declaration.name.clone(),
            registry_name,
            context: declaration.context.clone(),
        });
    }

    let base_type_name = declaration.base_types.first().cloned().unwrap_or_default();
    if options.require_base_type && base_type_name.is_empty() {
        return Err(RegisterError::MissingBaseType {
            type_name: declaration.name.clone(),
            registry_name,
            context: declaration.context.clone(),
        });
    }

    Ok(Some(RegisterMatch {
        namespace: declaration.namespace.clone(),
        self_type_name: declaration.name.clone(),
        base_type_name,
        registry_name,
        context: declaration.context.clone(),
        module: declaration.module.clone(),
    }))
}

/// First marker whose name contains `marker` (case-sensitive). Later ones are ignored.
pub fn find_register_marker<'a>(
    declaration: &'a ClassDeclaration,
    marker: &str,
) -> Option<&'a Marker> {
    declaration
        .markers
        .iter()
        .find(|candidate| candidate.name.contains(marker))
}

/// Locate the argument holding the registry name.
///
/// The positional fallback only considers the call argument at index 0, so an
/// object literal in first position (even an empty one) rules it out.
pub fn locate_registry_argument<'a>(
    marker: &'a Marker,
    argument_name: &str,
) -> Option<&'a ArgumentExpr> {
    let labeled = |want_equals: bool| {
        marker.arguments.iter().find_map(|arg| {
            let label = arg.label.as_ref()?;
            let is_equals = matches!(label, ArgumentLabel::Equals(_));
            (is_equals == want_equals && label.name() == argument_name).then_some(&arg.value)
        })
    };

    labeled(true).or_else(|| labeled(false)).or_else(|| {
        marker
            .arguments
            .iter()
            .find(|arg| arg.index == 0)
            .filter(|arg| arg.label.is_none())
            .map(|arg| &arg.value)
    })
}

/// Textual value of a registry argument.
pub fn resolve_argument_text(
    argument: &ArgumentExpr,
    declaration: &ClassDeclaration,
) -> Result<String, RegisterError> {
    match argument {
        ArgumentExpr::MemberAccess { member } => Ok(member.clone()),
        ArgumentExpr::Literal(text) => Ok(text.clone()),
        ArgumentExpr::Identifier(name) => Ok(name.clone()),
        ArgumentExpr::Other(found) => Err(RegisterError::InvalidRegisterArgument {
            type_name: declaration.name.clone(),
            found: *found,
            context: declaration.context.clone(),
        }),
    }
}
