use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub email: Option<String>,
}
