use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AdminStatusResponse {
    pub admin: bool,
}

/// Returned instead of an insert result when the email is already taken.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExistsResponse {
    pub message: &'static str,
    pub inserted_id: Option<i64>,
}

impl Default for UserExistsResponse {
    fn default() -> Self {
        Self { message: "User already exists", inserted_id: None }
    }
}
