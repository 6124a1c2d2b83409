use crate::model::role::Role;
use serde::{Deserialize, Serialize};

/// Claims of the bearer tokens issued by the auth platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (UUID).
    pub sub: String,
    pub company_id: String,
    pub role: Role,
    pub exp: usize,
}
