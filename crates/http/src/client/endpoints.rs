//! Endpoint templates
//!
//! Each variant knows its path relative to the API base. Identifiers are
//! inserted as single percent-encoded path segments.

use super::ClientError;
use std::fmt;
use url::Url;

/// API endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Register,
    Login,
    Me,
    ConnectWallet,
    ListGroups,
    CreateGroup,
    Group { id: String },
    GroupMembers { group_id: String },
    GroupMember { group_id: String, member_id: String },
    AddExpense { group_id: String },
    ListExpenses { group_id: String },
    CalculateSettlement,
    Settlement { id: String },
    ExecuteSettlement { id: String },
}

impl Endpoint {
    /// Path segments below the API base
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Register => vec!["auth", "register"],
            Self::Login => vec!["auth", "login"],
            Self::Me => vec!["auth", "me"],
            Self::ConnectWallet => vec!["auth", "wallet", "connect"],
            Self::ListGroups => vec!["groups"],
            Self::CreateGroup => vec!["groups", "create"],
            Self::Group { id } => vec!["groups", id],
            Self::GroupMembers { group_id } => vec!["groups", group_id, "members"],
            Self::GroupMember {
                group_id,
                member_id,
            } => vec!["groups", group_id, "members", member_id],
            Self::AddExpense { group_id } => vec!["expenses", group_id, "add"],
            Self::ListExpenses { group_id } => vec!["expenses", group_id],
            Self::CalculateSettlement => vec!["settlements", "calculate"],
            Self::Settlement { id } => vec!["settlements", id],
            Self::ExecuteSettlement { id } => vec!["settlements", id, "execute"],
        }
    }

    /// Identifiers substituted into the template
    fn identifiers(&self) -> Vec<&str> {
        match self {
            Self::Group { id } | Self::Settlement { id } | Self::ExecuteSettlement { id } => {
                vec![id.as_str()]
            }
            Self::GroupMembers { group_id }
            | Self::AddExpense { group_id }
            | Self::ListExpenses { group_id } => vec![group_id.as_str()],
            Self::GroupMember {
                group_id,
                member_id,
            } => vec![group_id.as_str(), member_id.as_str()],
            _ => Vec::new(),
        }
    }

    /// Absolute URL of the endpoint under `base`
    ///
    /// `base` must be able to carry a path (any `http`/`https` URL can);
    /// the client builder rejects anything else.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidIdentifier`] for an empty, `.` or `..`
    /// identifier, which would otherwise address a different endpoint
    pub fn url(&self, base: &Url) -> Result<Url, ClientError> {
        if let Some(bad) = self
            .identifiers()
            .into_iter()
            .find(|id| matches!(*id, "" | "." | ".."))
        {
            return Err(ClientError::InvalidIdentifier(bad.to_string()));
        }

        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(self.segments());
        }
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments() {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
