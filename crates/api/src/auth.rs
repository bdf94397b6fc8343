// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use accademia_audit::Actor;
use accademia_persistence::{OperatorData, Persistence, SessionData};
use std::str::FromStr;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::error::AuthError;
use crate::sections::Section;

/// Operator roles for authorization.
///
/// Roles apply only to operators of the application, never to members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Role {
    /// Full access, including operators and pricing.
    Admin,
    /// Front desk: may create and edit members and promote quotes.
    Contributor,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Contributor => "Contributor",
            Self::Viewer => "Viewer",
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Contributor" => Ok(Self::Contributor),
            "Viewer" => Ok(Self::Viewer),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {s}"),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of write an operator attempts on a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
    Delete,
}

impl WriteAction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// An authenticated operator with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    pub operator_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(
        operator_id: i64,
        login_name: String,
        display_name: String,
        role: Role,
    ) -> Self {
        Self {
            operator_id,
            login_name,
            display_name,
            role,
        }
    }

    /// Builds the actor from a stored operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored role is not recognised.
    pub fn from_operator(operator: &OperatorData) -> Result<Self, AuthError> {
        let role: Role = operator.role.parse()?;
        Ok(Self::new(
            operator.operator_id,
            operator.login_name.clone(),
            operator.display_name.clone(),
            role,
        ))
    }

    /// Converts this actor into the operator attribution used by the
    /// operations log.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.display_name.clone(), self.role.as_str().to_string())
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Whether a role may perform a write on a section.
    ///
    /// Admins may write everywhere. Contributors may create and edit
    /// members and nothing else. Viewers may not write. The operations log
    /// is never written directly.
    #[must_use]
    pub const fn can_write(role: Role, section: Section, action: WriteAction) -> bool {
        match (role, section) {
            (_, Section::OperationsLog) | (Role::Viewer, _) => false,
            (Role::Admin, _) => true,
            (Role::Contributor, Section::Members) => {
                matches!(action, WriteAction::Create | WriteAction::Update)
            }
            (Role::Contributor, _) => false,
        }
    }

    /// Checks if an actor may perform a write on a section.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor's role does not allow it.
    pub fn authorize_write(
        actor: &AuthenticatedActor,
        section: Section,
        action: WriteAction,
    ) -> Result<(), AuthError> {
        if Self::can_write(actor.role, section, action) {
            return Ok(());
        }
        let required_role: &str =
            if section == Section::Members && action != WriteAction::Delete {
                "Contributor"
            } else {
                "Admin"
            };
        Err(AuthError::Unauthorized {
            action: format!("{}_{}", action.as_str(), section.as_str()),
            required_role: String::from(required_role),
        })
    }

    /// Checks if an actor may write a quote into a member.
    ///
    /// Admin and Contributor actors may promote quotes.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is a Viewer.
    pub fn authorize_promote_quote(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin | Role::Contributor => Ok(()),
            Role::Viewer => Err(AuthError::Unauthorized {
                action: String::from("promote_quote"),
                required_role: String::from("Contributor"),
            }),
        }
    }

    /// Checks if an actor may manage operators.
    ///
    /// Only Admin actors may list, create, disable or delete operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_operators(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Contributor | Role::Viewer => Err(AuthError::Unauthorized {
                action: String::from("manage_operators"),
                required_role: String::from("Admin"),
            }),
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session lifetime (30 days).
    pub const DEFAULT_SESSION_DURATION: Duration = Duration::days(30);

    /// Authenticates an operator and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `login_name` - The operator login name (case-insensitive)
    /// * `password` - The operator password
    /// * `session_duration` - How long the new session stays valid
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `operator_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the operator is unknown or disabled, the
    /// password is wrong, or the session cannot be stored.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
        session_duration: Duration,
    ) -> Result<(String, AuthenticatedActor, OperatorData), AuthError> {
        let operator: OperatorData = persistence
            .get_operator_by_login(login_name)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid login name or password"),
            })?;

        if operator.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Operator is disabled"),
            });
        }

        let password_valid: bool = persistence
            .verify_password(password, &operator.password_hash)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Password verification failed: {e}"),
            })?;
        if !password_valid {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Invalid login name or password"),
            });
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_operator(&operator)?;

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let session_token: String = Self::generate_session_token(now);
        persistence
            .create_session(&session_token, operator.operator_id, now + session_duration)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(operator.operator_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        info!(login_name = %operator.login_name, role = %actor.role, "Operator logged in");
        Ok((session_token, actor, operator))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `operator_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or the
    /// operator has been disabled since it was created.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, OperatorData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        if session.is_expired_at(OffsetDateTime::now_utc()) {
            debug!(session_id = session.session_id, "Rejected expired session");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let operator: OperatorData = persistence
            .get_operator_by_id(session.operator_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Operator not found"),
            })?;

        if operator.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Operator is disabled"),
            });
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_operator(&operator)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update session activity: {e}"),
            })?;

        Ok((actor, operator))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    fn generate_session_token(now: OffsetDateTime) -> String {
        format!(
            "session_{}_{}",
            now.unix_timestamp_nanos(),
            rand::random::<u64>()
        )
    }
}
