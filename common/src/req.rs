// keep in sync with the backend API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A selectable dispenser as returned by `/devices` and `/admindevices`.
///
/// Some deployments report `device_id` as a number, others as a string;
/// both are normalised to a string at the wire boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(deserialize_with = "string_or_number")]
    pub device_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<i64>,
}

/// One timestamped dispense measurement from `/data/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub volume_ml: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// PUT/POST body for organisation mutations; `notes` is sent as an
/// explicit null when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganisationPayload {
    pub name: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub organisation_id: Option<i64>,
    #[serde(default)]
    pub roles_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub id: i64,
    pub name: String,
}

/// Role carried by the login/registration response and the persisted
/// session. Anything other than `admin` is a plain user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn from_wire(s: &str) -> Self {
        if s.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Success body of `/login` and `/register`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub email: String,
    #[serde(default)]
    pub org: Option<String>,
    pub role: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Error body the backend attaches to non-success statuses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub detail: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_accepts_string_and_number() {
        let d: Device = serde_json::from_str(r#"{"device_id": "fountain-7", "name": "Lobby"}"#)
            .expect("string id");
        assert_eq!(d.device_id, "fountain-7");
        assert_eq!(d.organisation_id, None);

        let d: Device =
            serde_json::from_str(r#"{"device_id": 42, "name": "Atrium", "organisation_id": 3}"#)
                .expect("numeric id");
        assert_eq!(d.device_id, "42");
        assert_eq!(d.organisation_id, Some(3));
    }

    #[test]
    fn reading_parses_rfc3339_timestamps() {
        let r: Reading =
            serde_json::from_str(r#"{"timestamp": "2024-01-01T08:00:00Z", "volume_ml": 250}"#)
                .expect("reading");
        assert_eq!(r.volume_ml, 250.0);
        assert_eq!(r.timestamp.to_rfc3339(), "2024-01-01T08:00:00+00:00");
    }

    #[test]
    fn role_parsing_defaults_to_user() {
        assert_eq!(Role::from_wire("admin"), Role::Admin);
        assert_eq!(Role::from_wire("Admin"), Role::Admin);
        assert_eq!(Role::from_wire("user"), Role::User);
        assert_eq!(Role::from_wire("superintendent"), Role::User);
        assert_eq!(Role::from_wire(""), Role::User);
    }

    #[test]
    fn organisation_payload_sends_null_notes() {
        let p = OrganisationPayload {
            name: "Acme".into(),
            notes: None,
        };
        assert_eq!(
            serde_json::to_string(&p).expect("json"),
            r#"{"name":"Acme","notes":null}"#
        );
    }
}
