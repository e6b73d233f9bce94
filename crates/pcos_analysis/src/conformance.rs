//! Interface conformance checking.
//!
//! A declaration whose doc names `@implements i-x` must supply every member
//! of `i-x`'s contract (its params and props, matched by name) and every
//! modifier the interface lists. Extra members on the implementer are fine.

use pcos_foundation::{AnalysisConfig, Diagnostic, DiagnosticCode, Severity};
use pcos_syntax::{DeclKind, Declaration, DocBlock};
use rayon::prelude::*;
use tracing::trace;

use crate::registry::ProjectRegistry;

/// One member of an interface contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractMember<'a> {
    /// Member name.
    pub name: &'a str,
    /// Declared type tag, if any.
    pub ty: Option<&'a str>,
    /// Props are always required; params unless optional or defaulted.
    pub required: bool,
}

/// The contract of an interface: params then props, first-seen by name.
#[must_use]
pub fn contract(doc: &DocBlock) -> Vec<ContractMember<'_>> {
    let params = doc.params.iter().map(|p| ContractMember {
        name: &p.name,
        ty: p.ty.as_deref(),
        required: !p.optional && p.default.is_none(),
    });
    let props = doc.props.iter().map(|p| ContractMember {
        name: &p.name,
        ty: p.ty.as_deref(),
        required: true,
    });

    let mut members: Vec<ContractMember<'_>> = Vec::new();
    for member in params.chain(props) {
        if !members.iter().any(|m| m.name == member.name) {
            members.push(member);
        }
    }
    members
}

/// Checks every implementing declaration in the registry, plus includes.
#[must_use]
pub fn check_registry(registry: &ProjectRegistry, config: &AnalysisConfig) -> Vec<Diagnostic> {
    let declarations = registry.all_declarations();
    let mut diagnostics: Vec<Diagnostic> = declarations
        .par_iter()
        .flat_map_iter(|declaration| check_declaration(declaration, registry, config))
        .collect();
    diagnostics.extend(check_includes(registry, config));
    diagnostics
}

/// Checks one declaration against the interface it implements.
#[must_use]
pub fn check_declaration(
    declaration: &Declaration,
    registry: &ProjectRegistry,
    config: &AnalysisConfig,
) -> Vec<Diagnostic> {
    let Some(doc) = &declaration.doc else {
        return Vec::new();
    };
    let Some(interface_name) = doc.implements.as_deref() else {
        return Vec::new();
    };
    trace!(implementer = %declaration.name, interface = %interface_name, "checking conformance");

    let interface = match registry.lookup(interface_name) {
        Some(found) if found.kind == DeclKind::Interface => found,
        Some(found) => {
            let diagnostic = Diagnostic::new(
                config.unresolved_implements_severity(),
                DiagnosticCode::UnresolvedReference,
                format!(
                    "`{}` implements `{interface_name}`, which is a {} and not an interface",
                    declaration.name, found.kind
                ),
                declaration.span.clone(),
            )
            .with_related(found.span.clone(), format!("`{interface_name}` declared here"));
            return vec![diagnostic];
        }
        None => {
            return vec![Diagnostic::new(
                config.unresolved_implements_severity(),
                DiagnosticCode::UnresolvedReference,
                format!(
                    "`{}` implements unknown interface `{interface_name}`",
                    declaration.name
                ),
                declaration.span.clone(),
            )];
        }
    };

    let Some(interface_doc) = &interface.doc else {
        return Vec::new();
    };
    let related = |diagnostic: Diagnostic| {
        diagnostic.with_related(
            interface.span.clone(),
            format!("interface `{interface_name}` declared here"),
        )
    };

    let mut diagnostics = Vec::new();
    for member in contract(interface_doc) {
        if !doc.has_member(member.name) {
            let severity = if member.required {
                Severity::Error
            } else {
                Severity::Warning
            };
            diagnostics.push(related(Diagnostic::new(
                severity,
                DiagnosticCode::InterfaceConformance,
                format!(
                    "missing member: {} (`{}` implements `{interface_name}`)",
                    member.name, declaration.name
                ),
                declaration.span.clone(),
            )));
            continue;
        }
        if let (Some(expected), Some(actual)) = (member.ty, doc.member_type(member.name)) {
            if expected != actual {
                diagnostics.push(related(Diagnostic::new(
                    config.type_mismatch_severity,
                    DiagnosticCode::TypeMismatch,
                    format!(
                        "member `{}` has type `{actual}` but `{interface_name}` expects `{expected}`",
                        member.name
                    ),
                    declaration.span.clone(),
                )));
            }
        }
    }

    let modifiers = declaration.modifier_names();
    for modifier in &interface_doc.modifiers {
        if !modifiers.contains(&modifier.name.as_str()) {
            diagnostics.push(related(Diagnostic::error(
                DiagnosticCode::InterfaceConformance,
                format!(
                    "missing modifier: {} (`{}` implements `{interface_name}`)",
                    modifier.name, declaration.name
                ),
                declaration.span.clone(),
            )));
        }
    }

    diagnostics
}

/// Warns about `@include`s of prefixed names the registry does not know.
#[must_use]
pub fn check_includes(registry: &ProjectRegistry, config: &AnalysisConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for file in registry.files() {
        for include in &file.includes {
            // `theme.c-button` refers to `c-button` in the `theme` module.
            let name = include
                .name
                .rsplit_once('.')
                .map_or(include.name.as_str(), |(_, name)| name);
            let prefixed = name
                .split_once('-')
                .is_some_and(|(prefix, _)| config.is_allowed_prefix(prefix));
            if prefixed && !registry.contains(name) {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::UnresolvedInclude,
                    format!("`@include {}` refers to an undeclared mixin", include.name),
                    include.span.clone(),
                ));
            }
        }
    }
    diagnostics
}
