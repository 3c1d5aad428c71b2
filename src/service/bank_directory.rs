//! 银行列表服务（透传 Flutterwave 银行列表）

use crate::{domain::Failure, service::bank::FlutterwaveClient};

pub struct BankDirectory {
    client: Option<FlutterwaveClient>,
    country: String,
}

impl BankDirectory {
    pub fn new(client: Option<FlutterwaveClient>, country: impl Into<String>) -> Self {
        Self {
            client,
            country: country.into(),
        }
    }

    pub async fn list_banks(&self) -> Result<Vec<serde_json::Value>, Failure> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| Failure::service_unavailable("Bank list service is not configured"))?;

        client.list_banks(&self.country).await
    }
}
