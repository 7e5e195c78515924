use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// The signed-in user of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl CurrentUser {
    pub fn new(id: &str, email: &str, name: Option<&str>) -> AppResult<Self> {
        let id = id.trim();
        let email = email.trim();

        if id.is_empty() {
            return Err(AppError::InvalidInput("user id must not be empty".to_string()));
        }
        if !email.contains('@') {
            return Err(AppError::InvalidInput(format!(
                "`{email}` is not an email address"
            )));
        }

        Ok(Self {
            id: id.to_string(),
            email: email.to_string(),
            name: name
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned),
        })
    }
}
