// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what actions an operator is permitted to perform
//! without leaking domain internals. They are advisory only and do not
//! replace backend authorization checks.

use accademia_persistence::{OperatorData, Persistence};

use crate::auth::{AuthenticatedActor, AuthorizationService, Role, WriteAction};
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::{Capability, GlobalCapabilities, OperatorCapabilities};
use crate::sections::{ACTION_DELETE, ACTION_EDIT, ACTION_PAYMENTS, ACTION_QUOTE, Section};

/// Computes global capabilities for an authenticated operator.
///
/// Disabled operators have no capabilities; otherwise they follow the role.
#[must_use]
pub const fn compute_global_capabilities(
    actor: &AuthenticatedActor,
    operator: &OperatorData,
) -> GlobalCapabilities {
    if operator.is_disabled {
        return GlobalCapabilities {
            can_manage_operators: Capability::Denied,
            can_edit_members: Capability::Denied,
            can_delete_members: Capability::Denied,
            can_edit_catalog: Capability::Denied,
            can_edit_pricing: Capability::Denied,
            can_record_payments: Capability::Denied,
            can_promote_quotes: Capability::Denied,
            can_export: Capability::Denied,
        };
    }

    let role: Role = actor.role;
    GlobalCapabilities {
        can_manage_operators: Capability::from_bool(matches!(role, Role::Admin)),
        can_edit_members: Capability::from_bool(AuthorizationService::can_write(
            role,
            Section::Members,
            WriteAction::Update,
        )),
        can_delete_members: Capability::from_bool(AuthorizationService::can_write(
            role,
            Section::Members,
            WriteAction::Delete,
        )),
        can_edit_catalog: Capability::from_bool(AuthorizationService::can_write(
            role,
            Section::Courses,
            WriteAction::Update,
        )),
        can_edit_pricing: Capability::from_bool(AuthorizationService::can_write(
            role,
            Section::PricingTiers,
            WriteAction::Update,
        )),
        can_record_payments: Capability::from_bool(AuthorizationService::can_write(
            role,
            Section::Payments,
            WriteAction::Create,
        )),
        can_promote_quotes: Capability::from_bool(!matches!(role, Role::Viewer)),
        can_export: Capability::Allowed,
    }
}

/// Computes what the actor may do to another operator account.
///
/// Only enabled admins act on operators, never on their own account, and
/// the last active admin can be neither disabled nor deleted.
///
/// # Errors
///
/// Returns an error if the admin count cannot be read.
pub fn compute_operator_capabilities(
    actor: &AuthenticatedActor,
    actor_operator: &OperatorData,
    target_operator: &OperatorData,
    persistence: &mut Persistence,
) -> Result<OperatorCapabilities, ApiError> {
    let denied: OperatorCapabilities = OperatorCapabilities {
        can_disable: Capability::Denied,
        can_delete: Capability::Denied,
    };
    if actor_operator.is_disabled
        || actor.role != Role::Admin
        || target_operator.operator_id == actor.operator_id
    {
        return Ok(denied);
    }

    let is_last_active_admin: bool =
        if target_operator.role == Role::Admin.as_str() && !target_operator.is_disabled {
            persistence
                .count_active_admin_operators()
                .map_err(translate_persistence_error)?
                <= 1
        } else {
            false
        };

    Ok(OperatorCapabilities {
        can_disable: Capability::from_bool(!target_operator.is_disabled && !is_last_active_admin),
        can_delete: Capability::from_bool(!is_last_active_admin),
    })
}

/// Whether a grid row action is shown to a role.
///
/// Edit and delete follow the write policy of the section. Opening a
/// member's quote or payments is a read and is offered to every role.
#[must_use]
pub fn row_action_visible(role: Role, section: Section, action: &str) -> bool {
    match action {
        ACTION_EDIT => AuthorizationService::can_write(role, section, WriteAction::Update),
        ACTION_DELETE => AuthorizationService::can_write(role, section, WriteAction::Delete),
        ACTION_QUOTE | ACTION_PAYMENTS => section == Section::Members,
        _ => false,
    }
}
