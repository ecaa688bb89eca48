//! Member domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use harvest_roster_core::{Email, MemberId, Role};

/// A roster member (domain type).
///
/// Carries the password hash for login verification; it never leaves the
/// auth service. Everything that crosses the HTTP boundary goes through
/// [`CurrentMember`] instead.
#[derive(Clone)]
pub struct Member {
    /// Unique member ID.
    pub id: MemberId,
    /// Member's email address (unique).
    pub email: Email,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Full name.
    pub name: String,
    /// Phone number.
    pub phone: String,
    /// Home address.
    pub address: String,
    /// Position held (e.g., "HOD", "Team Heads").
    pub designation: String,
    /// Team the member serves on.
    pub team: String,
    /// Department the member belongs to.
    pub department: String,
    /// Next of kin name.
    pub next_of_kin_name: String,
    /// Next of kin contact number.
    pub next_of_kin_contact: String,
    /// Next of kin address.
    pub next_of_kin_address: String,
    /// Path to the avatar image.
    pub avatar: String,
    /// Member role (worker or admin).
    pub role: Role,
    /// When the member was created.
    pub created_at: DateTime<Utc>,
    /// When the member was last updated.
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// The password-free projection of a member.
///
/// This is what the auth gate attaches to the request context after token
/// verification and what profile endpoints return to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentMember {
    pub id: MemberId,
    pub email: Email,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub designation: String,
    pub team: String,
    pub department: String,
    pub next_of_kin_name: String,
    pub next_of_kin_contact: String,
    pub next_of_kin_address: String,
    pub avatar: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Member> for CurrentMember {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            email: member.email,
            name: member.name,
            phone: member.phone,
            address: member.address,
            designation: member.designation,
            team: member.team,
            department: member.department,
            next_of_kin_name: member.next_of_kin_name,
            next_of_kin_contact: member.next_of_kin_contact,
            next_of_kin_address: member.next_of_kin_address,
            avatar: member.avatar,
            role: member.role,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_member() -> Member {
        Member {
            id: MemberId::new(1),
            email: Email::parse("a@x.com").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            name: "Ada".to_string(),
            phone: "08012345678".to_string(),
            address: "12 Some Street".to_string(),
            designation: "Team Heads".to_string(),
            team: "Membership".to_string(),
            department: "Membership".to_string(),
            next_of_kin_name: "Grace".to_string(),
            next_of_kin_contact: "08087654321".to_string(),
            next_of_kin_address: "12 Some Street".to_string(),
            avatar: "https://i.ibb.co/4pDNDk1/avatar.png".to_string(),
            role: Role::Worker,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_debug_redacts_password_hash() {
        let member = sample_member();
        let debug_output = format!("{member:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("argon2id"));
    }

    #[test]
    fn test_current_member_excludes_password() {
        let member = sample_member();
        let current = CurrentMember::from(member);
        let json = serde_json::to_value(&current).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["role"], "worker");
    }
}
