use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use clientele_core::CustomerId;
use clientele_customers::CustomerDetails;

// -------------------------
// Request DTOs
// -------------------------

/// Login body. PascalCase field names are accepted too.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "Username")]
    pub username: String,
    #[serde(alias = "Password")]
    pub password: String,
}

/// PUT body: a full customer record. `id` may be omitted; when present it
/// must equal the path id.
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    pub id: Option<CustomerId>,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub birthday: NaiveDate,
}

impl From<UpdateCustomerRequest> for CustomerDetails {
    fn from(req: UpdateCustomerRequest) -> Self {
        CustomerDetails {
            name: req.name,
            address: req.address,
            phone: req.phone,
            birthday: req.birthday,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub subject: String,
    pub role: String,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}
