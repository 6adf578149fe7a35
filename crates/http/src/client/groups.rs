//! Group management client methods

use super::{ApiClient, ClientError, Endpoint, RequestOptions};
use crate::types::{AddMemberRequest, CreateGroupRequest, Group, GroupDetail, MessageResponse};

impl ApiClient {
    /// Groups the signed-in user belongs to
    pub async fn list_groups(&self) -> Result<Vec<Group>, ClientError> {
        self.call(&Endpoint::ListGroups, RequestOptions::get()).await
    }

    /// Create a group; the creator becomes its first member
    pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<Group, ClientError> {
        self.call(&Endpoint::CreateGroup, RequestOptions::post_json(request)?)
            .await
    }

    /// Group details including members
    pub async fn get_group(&self, group_id: &str) -> Result<GroupDetail, ClientError> {
        let endpoint = Endpoint::Group {
            id: group_id.to_string(),
        };
        self.call(&endpoint, RequestOptions::get()).await
    }

    /// Add a user to a group (group creator only)
    pub async fn add_member(
        &self,
        group_id: &str,
        user_id: impl Into<String>,
    ) -> Result<MessageResponse, ClientError> {
        let endpoint = Endpoint::GroupMembers {
            group_id: group_id.to_string(),
        };
        let request = AddMemberRequest {
            user_id: user_id.into(),
        };
        self.call(&endpoint, RequestOptions::post_json(&request)?)
            .await
    }

    /// Remove a membership record from a group (group creator only)
    pub async fn remove_member(
        &self,
        group_id: &str,
        member_id: &str,
    ) -> Result<MessageResponse, ClientError> {
        let endpoint = Endpoint::GroupMember {
            group_id: group_id.to_string(),
            member_id: member_id.to_string(),
        };
        self.call(&endpoint, RequestOptions::delete()).await
    }
}
