/**
 * Canvas API Types
 *
 * Request and response bodies for the canvas endpoints, plus request
 * validation. Validation here is pure; checks that need the database (do
 * these user IDs exist) stay in the handlers.
 */

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::UserRef;
use crate::error::ApiError;

/// Longest accepted canvas name, in characters
const MAX_NAME_LENGTH: usize = 256;

/// One entry in the caller's canvas list
///
/// Owners see the full sharing state; for shared canvases the member lists
/// are omitted from the JSON entirely rather than sent empty.
#[derive(Debug, Clone, Serialize)]
pub struct CanvasSummary {
    pub id: String,
    pub name: String,
    pub owner: UserRef,
    pub is_owner: bool,
    pub editable: bool,
    #[serde(rename = "lastModifiedAt")]
    pub last_modified_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Vec<UserRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewers: Option<Vec<UserRef>>,
}

/// Body of `POST /api/canvas`
#[derive(Debug, Deserialize)]
pub struct CreateCanvasRequest {
    pub name: String,
}

impl CreateCanvasRequest {
    /// Validate the request, returning the trimmed name
    ///
    /// # Errors
    /// 400 when the name is empty after trimming or longer than 256
    /// characters
    pub fn validate(&self) -> Result<String, ApiError> {
        validate_name(&self.name)
    }
}

/// Body of `PUT /api/canvas/details/{id}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCanvasDetailsRequest {
    pub name: String,
    pub collaborator_ids: Vec<String>,
    pub viewer_ids: Vec<String>,
}

/// A details request that passed pure validation
#[derive(Debug, Clone)]
pub struct DetailsUpdate {
    pub name: String,
    pub collaborator_ids: Vec<String>,
    pub viewer_ids: Vec<String>,
}

impl UpdateCanvasDetailsRequest {
    /// Validate the request against the owner performing it
    ///
    /// Checks, in order: the name, that every member ID is a well-formed
    /// UUID, that neither list holds duplicates, that the lists do not
    /// overlap, and that the owner put themselves in neither. Whether the
    /// IDs belong to existing users is checked by the handler against the
    /// database.
    ///
    /// # Arguments
    /// * `owner_id` - The canvas owner making the change
    ///
    /// # Errors
    /// 400 with a details message naming the first failed check
    pub fn validate(self, owner_id: &str) -> Result<DetailsUpdate, ApiError> {
        let name = validate_name(&self.name)?;

        for id in self.collaborator_ids.iter().chain(self.viewer_ids.iter()) {
            if Uuid::parse_str(id).is_err() {
                return Err(ApiError::bad_request_with("invalid user id"));
            }
        }

        let collaborators: HashSet<&String> = self.collaborator_ids.iter().collect();
        let viewers: HashSet<&String> = self.viewer_ids.iter().collect();
        if collaborators.len() != self.collaborator_ids.len()
            || viewers.len() != self.viewer_ids.len()
        {
            return Err(ApiError::bad_request_with("duplicate user id"));
        }

        if collaborators.intersection(&viewers).next().is_some() {
            return Err(ApiError::bad_request_with(
                "a user cannot be both collaborator and viewer",
            ));
        }

        if self.collaborator_ids.iter().any(|id| id == owner_id)
            || self.viewer_ids.iter().any(|id| id == owner_id)
        {
            return Err(ApiError::bad_request_with(
                "the owner cannot be added as a member",
            ));
        }

        Ok(DetailsUpdate {
            name,
            collaborator_ids: self.collaborator_ids,
            viewer_ids: self.viewer_ids,
        })
    }
}

/// Body of `POST /api/canvas` responses
#[derive(Debug, Serialize)]
pub struct CreateCanvasResponse {
    pub id: String,
}

/// Plain `{"success": true}` acknowledgement
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Trim a canvas name and check its bounds
fn validate_name(name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request_with("name must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ApiError::bad_request_with(
            "name must be at most 256 characters",
        ));
    }
    Ok(trimmed.to_string())
}
