//! Settlement client methods
//!
//! The settlement itself is computed and executed by the backend; these calls
//! only start it and read back the result.

use super::{ApiClient, ClientError, Endpoint, RequestOptions};
use crate::types::{ExecuteSettlementResponse, Settlement, SettlementRequest, SettlementSummary};

impl ApiClient {
    /// Ask the backend to compute a settlement for a group
    pub async fn calculate_settlement(
        &self,
        group_id: impl Into<String>,
    ) -> Result<SettlementSummary, ClientError> {
        let request = SettlementRequest {
            group_id: group_id.into(),
        };
        self.call(
            &Endpoint::CalculateSettlement,
            RequestOptions::post_json(&request)?,
        )
        .await
    }

    pub async fn get_settlement(&self, settlement_id: &str) -> Result<Settlement, ClientError> {
        let endpoint = Endpoint::Settlement {
            id: settlement_id.to_string(),
        };
        self.call(&endpoint, RequestOptions::get()).await
    }

    /// Execute a pending settlement (group creator only)
    pub async fn execute_settlement(
        &self,
        settlement_id: &str,
    ) -> Result<ExecuteSettlementResponse, ClientError> {
        let endpoint = Endpoint::ExecuteSettlement {
            id: settlement_id.to_string(),
        };
        self.call(&endpoint, RequestOptions::post()).await
    }
}
