// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use accademia_audit::OperationType;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::timestamps::parse_timestamp;

/// A stored operator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorData {
    pub operator_id: i64,
    /// Upper-cased login name.
    pub login_name: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_disabled: bool,
    pub created_at: String,
    pub disabled_at: Option<String>,
    pub last_login_at: Option<String>,
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub operator_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

impl SessionData {
    /// Whether the session has expired at `now`.
    ///
    /// An unreadable expiry counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        parse_timestamp(&self.expires_at).is_none_or(|expires_at| expires_at <= now)
    }
}

/// One row of the operations log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLogRecord {
    pub entry_id: i64,
    pub operator_name: String,
    pub operator_role: String,
    pub operation: OperationType,
    pub list_name: String,
    pub element_description: String,
    pub created_at: String,
}
