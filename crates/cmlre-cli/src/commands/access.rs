//! Authorization commands: permissions, check, action, modules.

use anyhow::{Context, Result};
use cmlre::{
    ActionGate, ActionOutcome, ClearanceLevel, EvaluationContext, EvaluationResult,
    Module, Permission, PermissionGate, Platform, Role, accessible_modules,
};
use comfy_table::Cell;

use super::require_user;
use crate::OutputFormat;
use crate::style::colors::SemanticStyle;
use crate::style::{grant_cell, print_data_table, print_denied, print_hint, print_success};

/// Contextual requirements taken from command-line flags.
pub struct ContextArgs {
    pub clearance: Option<String>,
    pub specialization: Option<String>,
    pub classification: Option<String>,
    pub project_id: Option<String>,
    pub owner: Option<String>,
}

impl ContextArgs {
    fn to_context(&self) -> Result<Option<EvaluationContext>> {
        let mut ctx = EvaluationContext::new();
        if let Some(level) = &self.clearance {
            let level: ClearanceLevel = level.parse().context("Invalid --clearance")?;
            ctx = ctx.requires_clearance(level);
        }
        if let Some(tag) = &self.specialization {
            ctx = ctx.requires_specialization(tag.as_str());
        }
        if let Some(class) = &self.classification {
            ctx = ctx.with_data_classification(class.as_str());
        }
        if let Some(project) = &self.project_id {
            ctx = ctx.with_project(project.as_str());
        }
        if let Some(owner) = &self.owner {
            ctx = ctx.with_owner(owner.as_str());
        }
        Ok((!ctx.is_empty()).then_some(ctx))
    }
}

/// Prints the capability table for one role or all of them.
pub fn permissions(role: Option<&str>) -> Result<()> {
    let roles: Vec<Role> = match role {
        Some(name) => vec![name.parse().context("Invalid --role")?],
        None => Role::ALL.to_vec(),
    };

    let mut columns = vec!["Permission"];
    columns.extend(roles.iter().map(Role::as_str));

    let rows = Permission::ALL
        .into_iter()
        .map(|permission| {
            let mut row = vec![Cell::new(permission.as_str())];
            row.extend(roles.iter().map(|r| grant_cell(r.has(permission))));
            row
        })
        .collect();

    print_data_table(&columns, rows, "permission");
    Ok(())
}

pub fn check(
    platform: &Platform,
    permission: &str,
    context: &ContextArgs,
    format: OutputFormat,
) -> Result<()> {
    let access = platform.access();
    let user = platform.auth().restore()?.user;
    let requirement = access.permission_requirement(permission)?;
    let context = context.to_context()?;

    let mut gate = PermissionGate::new(requirement).show_reason(true);
    if let Some(ctx) = context {
        gate = gate.with_context(ctx);
    }
    let outcome = gate.evaluate(access, user.as_ref());

    match format {
        OutputFormat::Json => {
            let result = EvaluationResult {
                allowed: outcome.is_rendered(),
                reason: outcome.notice().and_then(|n| n.reason.clone()),
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => match outcome.notice() {
            None => print_success(&format!("Allowed: {}", permission.code())),
            Some(notice) => print_denied(&notice.message),
        },
    }
    Ok(())
}

pub fn action(platform: &Platform, name: &str, owner: Option<String>) -> Result<()> {
    let access = platform.access();
    let user = require_user(platform)?;
    let requirement = access.action_requirement(name)?;

    let context = ContextArgs {
        clearance: None,
        specialization: None,
        classification: None,
        project_id: None,
        owner,
    }
    .to_context()?;

    let mut gate = ActionGate::from_requirement(requirement);
    if let Some(ctx) = context {
        gate = gate.with_context(ctx);
    }

    match gate.invoke(access, Some(&user), || ()) {
        ActionOutcome::Performed(()) => {
            print_success(&format!("Action {} permitted", name.code()));
        }
        ActionOutcome::Denied(notice) => print_denied(&notice.message),
        ActionOutcome::Ignored => print_hint("Action not available"),
    }
    Ok(())
}

pub fn modules(platform: &Platform, check: Option<&str>) -> Result<()> {
    let user = require_user(platform)?;

    if let Some(name) = check {
        let decision = platform.access().check_module_named(&user, name)?;
        match decision.reason() {
            None => print_success(&format!("Module {} accessible", name.code())),
            Some(reason) => print_denied(&format!("Module {name}: {reason}")),
        }
        return Ok(());
    }

    let open = accessible_modules(&user);
    let rows = Module::ALL
        .into_iter()
        .map(|module| {
            vec![
                Cell::new(module.as_str()),
                Cell::new(module.required_permission().as_str()),
                grant_cell(open.contains(&module)),
            ]
        })
        .collect();
    print_data_table(&["Module", "Requires", "Access"], rows, "module");
    Ok(())
}
