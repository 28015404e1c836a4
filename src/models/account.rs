use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Buyer,
    Farmer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Buyer => "buyer",
            UserRole::Farmer => "farmer",
        }
    }

    pub fn login_endpoint(&self) -> &'static str {
        match self {
            UserRole::Buyer => "/buyer/login",
            UserRole::Farmer => "/farmer/login",
        }
    }

    /// Buyers have no server-side logout; their session is dropped locally.
    pub fn logout_endpoint(&self) -> Option<&'static str> {
        match self {
            UserRole::Buyer => None,
            UserRole::Farmer => Some("/farmer/logout"),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buyer" => Ok(UserRole::Buyer),
            "farmer" => Ok(UserRole::Farmer),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

/// User returned by a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    #[serde(default)]
    pub id: Option<i64>,
    pub email: String,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default, alias = "userType")]
    pub user_type: Option<UserRole>,
    #[serde(default, alias = "farmName", skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
    #[serde(default, alias = "farmSize", skip_serializing_if = "Option::is_none")]
    pub farm_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl AuthenticatedUser {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.email.clone(),
        }
    }
}

/// Authenticated farmer's own record from `GET /farmer/dashboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub farm_name: String,
    #[serde(default)]
    pub farm_size: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPreferences {
    pub contactless: bool,
    pub preferred_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyerRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub delivery_preferences: DeliveryPreferences,
}

/// Buyer record echoed back by `POST /buyer/register`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisteredBuyer {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmerRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub farm_name: String,
    pub farm_size: String,
    pub location: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_endpoints() {
        assert_eq!(UserRole::Farmer.login_endpoint(), "/farmer/login");
        assert_eq!(UserRole::Buyer.logout_endpoint(), None);
        assert_eq!(UserRole::Farmer.logout_endpoint(), Some("/farmer/logout"));
        assert_eq!("FARMER".parse::<UserRole>().unwrap(), UserRole::Farmer);
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_accepts_camel_case_fields() {
        let user: AuthenticatedUser = serde_json::from_value(json!({
            "id": 4,
            "email": "ana@example.com",
            "firstName": "Ana",
            "lastName": "Silva",
            "userType": "farmer",
            "farmName": "Green Acres",
        }))
        .unwrap();

        assert_eq!(user.user_type, Some(UserRole::Farmer));
        assert_eq!(user.farm_name.as_deref(), Some("Green Acres"));
        assert_eq!(user.display_name(), "Ana Silva");
    }

    #[test]
    fn test_buyer_registration_wire_format() {
        let registration = BuyerRegistration {
            email: "b@example.com".to_string(),
            password: "secret".to_string(),
            first_name: "Bo".to_string(),
            last_name: "Lee".to_string(),
            delivery_preferences: DeliveryPreferences {
                contactless: true,
                preferred_time: "morning".to_string(),
            },
        };

        assert_eq!(
            serde_json::to_value(&registration).unwrap(),
            json!({
                "email": "b@example.com",
                "password": "secret",
                "first_name": "Bo",
                "last_name": "Lee",
                "delivery_preferences": { "contactless": true, "preferred_time": "morning" },
            })
        );
    }
}
