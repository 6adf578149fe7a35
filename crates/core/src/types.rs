//! Request and response bodies exchanged with the SplitAlgo API
//!
//! Timestamps stay as the strings the backend sends. Collections the backend
//! produces from its settlement engine are kept as loosely typed JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// Registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Login request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login and registration response
///
/// `user` is cached verbatim; the client places no requirements on its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: JsonValue,
}

/// User profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Wallet connection request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectWalletRequest {
    pub wallet_address: String,
}

/// Wallet connection response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectWalletResponse {
    pub message: String,
    pub user: User,
}

/// Group creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Expense group summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub creator_id: String,
    /// On-chain vault address, once one has been deployed
    #[serde(default)]
    pub vault_address: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub member_count: u32,
}

/// Group with its members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: Group,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub expense_count: u32,
}

/// Membership record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub wallet_address: Option<String>,
    pub trust_score: f64,
    pub joined_at: String,
    pub warning_count: u32,
    pub is_active: bool,
}

/// Member addition request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: String,
}

/// Plain acknowledgement; any extra fields are kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Expense creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    pub group_id: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

/// Recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub group_id: String,
    pub paid_by_id: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
    pub settled: bool,
}

/// Settlement calculation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub group_id: String,
}

/// Result of a settlement calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub settlement_id: String,
    #[serde(default)]
    pub settlements: Vec<JsonValue>,
    #[serde(default)]
    pub risk_scores: HashMap<String, f64>,
    #[serde(default)]
    pub warnings: HashMap<String, String>,
    #[serde(default)]
    pub excluded_members: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}

/// Stored settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: String,
    pub group_id: String,
    #[serde(default)]
    pub settlements: Vec<JsonValue>,
    #[serde(default)]
    pub risk_scores: HashMap<String, f64>,
    #[serde(default)]
    pub warnings: HashMap<String, String>,
    #[serde(default)]
    pub excluded_members: Vec<String>,
    #[serde(default)]
    pub governance_actions: JsonValue,
    #[serde(default)]
    pub onchain_results: JsonValue,
    #[serde(default)]
    pub explanation: Option<String>,
    pub status: String,
    pub created_at: String,
    #[serde(default)]
    pub executed_at: Option<String>,
}

/// Settlement execution acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSettlementResponse {
    pub status: String,
    pub settlement_id: String,
    pub message: String,
}
