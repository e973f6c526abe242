use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate::{is_valid_email, is_valid_url, non_empty, FieldError};

/// Stored user document. The password stays an opaque string, persisted as
/// given and echoed back on login — reproduced from the original service,
/// not a security design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub password: String,
    pub username: String,
    pub avatar: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl RegisterRequest {
    /// Evaluates the registration schema against a decoded payload,
    /// collecting one error per offending field.
    pub fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let email = match body.get("email").and_then(Value::as_str) {
            Some(v) if is_valid_email(v) => Some(v.to_string()),
            _ => {
                errors.push(FieldError::new("email", "Debe ser un email válido."));
                None
            }
        };

        let password = match body.get("password").and_then(Value::as_str) {
            Some(v) if v.len() >= 6 => Some(v.to_string()),
            _ => {
                errors.push(FieldError::new(
                    "password",
                    "La contraseña debe tener al menos 6 caracteres.",
                ));
                None
            }
        };

        let username = match body.get("username").and_then(Value::as_str) {
            Some(v) if non_empty(v) => Some(v.to_string()),
            _ => {
                errors.push(FieldError::new(
                    "username",
                    "El nombre de usuario es obligatorio.",
                ));
                None
            }
        };

        let avatar = body
            .get("avatar")
            .and_then(Value::as_str)
            .map(str::to_string);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self {
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
            username: username.unwrap_or_default(),
            avatar,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Absent fields cannot match any stored record, so they fall straight
    /// into the invalid-credentials path instead of erroring.
    pub fn from_value(body: &Value) -> Option<Self> {
        let email = body.get("email")?.as_str()?.to_string();
        let password = body.get("password")?.as_str()?.to_string();
        Some(Self { email, password })
    }
}

/// The supplied subset of profile fields. `None` means "leave untouched".
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileChanges {
    pub fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut changes = Self::default();

        match body.get("username") {
            None | Some(Value::Null) => {}
            Some(v) => match v.as_str() {
                Some(s) if non_empty(s) => changes.username = Some(s.to_string()),
                _ => errors.push(FieldError::new(
                    "username",
                    "El username no puede estar vacío.",
                )),
            },
        }

        match body.get("avatar") {
            None | Some(Value::Null) => {}
            Some(v) => match v.as_str() {
                Some(s) if is_valid_url(s) => changes.avatar = Some(s.to_string()),
                _ => errors.push(FieldError::new(
                    "avatar",
                    "El avatar debe ser una URL válida.",
                )),
            },
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(changes)
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.avatar.is_none()
    }
}
