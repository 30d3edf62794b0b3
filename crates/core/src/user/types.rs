//! User domain types.

use punchcard_shared::types::UserId;
use serde::{Deserialize, Serialize};

/// Account access type.
///
/// The numeric codes are the ones stored in the `users.account_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Customer account (-1).
    Customer,
    /// General employee account (0).
    Employee,
    /// Restaurant owner account (1).
    Owner,
    /// Employee with admin rights (2).
    AdminEmployee,
}

impl AccountType {
    /// Returns the stored code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Customer => -1,
            Self::Employee => 0,
            Self::Owner => 1,
            Self::AdminEmployee => 2,
        }
    }

    /// Parses a stored code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Customer),
            0 => Some(Self::Employee),
            1 => Some(Self::Owner),
            2 => Some(Self::AdminEmployee),
            _ => None,
        }
    }

    /// Returns true for restaurant-side accounts.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        !matches!(self, Self::Customer)
    }

    /// Returns true if the account may create coupons and achievements.
    #[must_use]
    pub const fn can_manage_program(self) -> bool {
        matches!(self, Self::Owner)
    }

    /// Returns true if the account may scan customer codes.
    #[must_use]
    pub const fn can_scan(self) -> bool {
        self.is_staff()
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Employee => write!(f, "employee"),
            Self::Owner => write!(f, "owner"),
            Self::AdminEmployee => write!(f, "admin_employee"),
        }
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique.
    pub email: String,
    /// Password digest supplied at registration.
    #[serde(skip_serializing)]
    pub password_digest: String,
    /// Access type.
    pub account_type: AccountType,
}

impl User {
    /// Public fields of the account.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
}

/// Registration form as submitted.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Password digest.
    pub password1: String,
    /// Confirmation digest; must equal `password1`.
    pub password2: String,
    /// Requested access type.
    pub account_type: AccountType,
}

/// Validated account ready to insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Password digest.
    pub password_digest: String,
    /// Access type.
    pub account_type: AccountType,
}
