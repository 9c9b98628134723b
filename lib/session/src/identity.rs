//! The authenticated identity mirrored from the bank API.
//!
//! An `Identity` is issued by the backend and never assembled by the client.
//! It is immutable for the lifetime of a session; a new login replaces it
//! wholesale.

use bank_portal_core::{Role, UserId};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A user identity as returned by the session endpoint.
///
/// The wire shape is flat: `username` and `role` sit next to the
/// role-dependent profile fields. `id` and `email` are optional; the
/// dashboard endpoint omits them. The role is read from the profile variant
/// so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<UserId>,
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(flatten)]
    profile: Profile,
}

/// Role-dependent profile attributes, tagged by the `role` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    /// Account holder.
    Customer {
        /// Savings account number.
        #[serde(default, deserialize_with = "string_or_number")]
        account_number: Option<String>,
        /// Postal address.
        #[serde(default)]
        address: Option<String>,
        /// National identity number.
        #[serde(default, deserialize_with = "string_or_number")]
        national_id: Option<String>,
        /// Current savings balance.
        #[serde(default)]
        savings_balance: Option<f64>,
    },
    /// Bank employee.
    Staff {
        /// Staff employee number.
        #[serde(default, deserialize_with = "string_or_number")]
        employee_id: Option<String>,
        /// Department the employee works in.
        #[serde(default)]
        department: Option<String>,
    },
    /// Platform administrator.
    Admin {
        /// Administrative access level.
        #[serde(default, deserialize_with = "string_or_number")]
        access_level: Option<String>,
        /// Whether the administrator has unrestricted access.
        #[serde(default)]
        is_superuser: bool,
    },
}

impl Profile {
    /// A customer profile with no attributes filled in.
    #[must_use]
    pub fn customer() -> Self {
        Self::Customer {
            account_number: None,
            address: None,
            national_id: None,
            savings_balance: None,
        }
    }

    /// A staff profile with no attributes filled in.
    #[must_use]
    pub fn staff() -> Self {
        Self::Staff {
            employee_id: None,
            department: None,
        }
    }

    /// An admin profile with no attributes filled in.
    #[must_use]
    pub fn admin() -> Self {
        Self::Admin {
            access_level: None,
            is_superuser: false,
        }
    }

    /// Returns the role this profile belongs to.
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Customer { .. } => Role::Customer,
            Self::Staff { .. } => Role::Staff,
            Self::Admin { .. } => Role::Admin,
        }
    }
}

impl Identity {
    /// Creates an identity from already-validated parts.
    ///
    /// Only backends and tests construct identities; the session flows take
    /// whatever the backend returned.
    #[must_use]
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        profile: Profile,
    ) -> Self {
        Self {
            id: Some(id),
            username: username.into(),
            email: Some(email.into()),
            profile,
        }
    }

    /// Parses an identity from a session endpoint payload.
    ///
    /// # Errors
    ///
    /// Returns the serde error if required fields are missing, the role is
    /// not a known role, or a field has the wrong type.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Returns the server-issued user ID, if the payload carried one.
    #[must_use]
    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email address used to log in, if the payload carried one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the role-dependent profile.
    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Returns the identity's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Returns the greeting shown on the dashboard.
    #[must_use]
    pub fn welcome_message(&self) -> String {
        format!("Welcome {}!", self.username)
    }
}

/// Accepts either a JSON string or a JSON number for identifier-like fields.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_customer_payload() {
        let identity = Identity::from_json(json!({
            "id": 7,
            "username": "alice",
            "email": "alice@example.com",
            "role": "customer",
            "account_number": 100200300,
            "savings_balance": 1250.5,
            "message": "Welcome alice!"
        }))
        .expect("customer payload");

        assert_eq!(identity.id(), Some(UserId::new(7)));
        assert_eq!(identity.email(), Some("alice@example.com"));
        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.role(), Role::Customer);
        match identity.profile() {
            Profile::Customer {
                account_number,
                savings_balance,
                address,
                ..
            } => {
                assert_eq!(account_number.as_deref(), Some("100200300"));
                assert_eq!(*savings_balance, Some(1250.5));
                assert!(address.is_none());
            }
            other => panic!("expected customer profile, got {other:?}"),
        }
    }

    #[test]
    fn parses_admin_payload() {
        let identity = Identity::from_json(json!({
            "id": 1,
            "username": "root",
            "email": "root@bank.test",
            "role": "admin",
            "access_level": "full",
            "is_superuser": true
        }))
        .expect("admin payload");

        assert_eq!(identity.role(), Role::Admin);
        assert_eq!(
            identity.profile(),
            &Profile::Admin {
                access_level: Some("full".to_string()),
                is_superuser: true,
            }
        );
    }

    #[test]
    fn staff_payload_without_profile_fields() {
        let identity = Identity::from_json(json!({
            "id": 3,
            "username": "sam",
            "email": "sam@bank.test",
            "role": "staff"
        }))
        .expect("staff payload");

        assert_eq!(identity.profile(), &Profile::staff());
    }

    #[test]
    fn username_and_role_are_enough() {
        let identity = Identity::from_json(json!({"username": "alice", "role": "customer"}))
            .expect("minimal payload");

        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.role(), Role::Customer);
        assert_eq!(identity.id(), None);
        assert_eq!(identity.email(), None);
    }

    #[test]
    fn dashboard_payload_without_id_or_email() {
        let identity = Identity::from_json(json!({
            "message": "Welcome sam!",
            "username": "sam",
            "role": "staff",
            "employee_id": 4411,
            "department": "Loans"
        }))
        .expect("dashboard payload");

        assert_eq!(
            identity.profile(),
            &Profile::Staff {
                employee_id: Some("4411".to_string()),
                department: Some("Loans".to_string()),
            }
        );
        assert!(identity.id().is_none());
    }

    #[test]
    fn missing_username_is_malformed() {
        let result = Identity::from_json(json!({"id": 3, "role": "staff"}));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_role_is_malformed() {
        let result = Identity::from_json(json!({
            "id": 3,
            "username": "sam",
            "email": "sam@bank.test",
            "role": "manager"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn missing_role_is_malformed() {
        let result = Identity::from_json(json!({
            "id": 3,
            "username": "sam",
            "email": "sam@bank.test"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn welcome_message_uses_username() {
        let identity = Identity::new(UserId::new(1), "bob", "bob@b.com", Profile::customer());
        assert_eq!(identity.welcome_message(), "Welcome bob!");
    }

    #[test]
    fn serializes_flat_with_role_tag() {
        let identity = Identity::new(UserId::new(9), "eve", "eve@b.com", Profile::staff());
        let value = serde_json::to_value(&identity).expect("serialize");
        assert_eq!(value["role"], "staff");
        assert_eq!(value["id"], 9);
        assert_eq!(value["username"], "eve");
    }

    #[test]
    fn absent_id_and_email_are_not_serialized() {
        let identity =
            Identity::from_json(json!({"username": "eve", "role": "admin"})).expect("payload");
        let value = serde_json::to_value(&identity).expect("serialize");
        assert!(value.get("id").is_none());
        assert!(value.get("email").is_none());
        assert_eq!(
            Identity::from_json(value).expect("reparse"),
            identity,
        );
    }
}
