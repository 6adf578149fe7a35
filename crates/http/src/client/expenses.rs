//! Expense client methods

use super::{ApiClient, ClientError, Endpoint, RequestOptions};
use crate::types::{CreateExpenseRequest, Expense};

impl ApiClient {
    /// Record an expense paid by the signed-in user
    pub async fn add_expense(
        &self,
        group_id: &str,
        amount: f64,
        description: impl Into<String>,
    ) -> Result<Expense, ClientError> {
        let endpoint = Endpoint::AddExpense {
            group_id: group_id.to_string(),
        };
        let request = CreateExpenseRequest {
            group_id: group_id.to_string(),
            amount,
            description: description.into(),
        };
        self.call(&endpoint, RequestOptions::post_json(&request)?)
            .await
    }

    /// All expenses recorded in a group
    pub async fn list_expenses(&self, group_id: &str) -> Result<Vec<Expense>, ClientError> {
        let endpoint = Endpoint::ListExpenses {
            group_id: group_id.to_string(),
        };
        self.call(&endpoint, RequestOptions::get()).await
    }
}
