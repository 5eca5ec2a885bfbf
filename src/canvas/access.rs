/**
 * Canvas Access Control
 *
 * Role resolution for the sharing model. A caller's role on a canvas is
 * computed per request from the canvas row and their membership row:
 *
 * | role | read data | write data | edit details / delete |
 * |--------------|-----------|------------|-----------------------|
 * | Owner        | yes       | yes        | yes                   |
 * | Collaborator | yes       | yes        | no                    |
 * | Viewer       | yes       | no         | no                    |
 *
 * A caller with no role must not learn that the canvas exists at all;
 * handlers answer 404 for them. A caller with a role but without the needed
 * right gets 403. The admin flag on a user record gates the management API
 * only and grants nothing here.
 */

/// A caller's role on one canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasRole {
    /// Creator of the canvas, full rights
    Owner,
    /// Shared with write access to the drawing data
    Collaborator,
    /// Shared read-only
    Viewer,
}

impl CanvasRole {
    /// Resolve the caller's role from the owner column and their membership
    /// row, if any
    ///
    /// # Arguments
    /// * `owner_id` - The canvas's `owner_id` column
    /// * `member_role` - The caller's `canvas_members.role`, when a row exists
    /// * `user_id` - The caller
    ///
    /// # Returns
    /// The role, or `None` when the caller has no relationship with the
    /// canvas
    pub fn resolve(owner_id: &str, member_role: Option<&str>, user_id: &str) -> Option<Self> {
        if owner_id == user_id {
            return Some(Self::Owner);
        }

        match member_role {
            Some("collaborator") => Some(Self::Collaborator),
            Some("viewer") => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Whether this role may read the drawing data
    pub fn can_read_data(self) -> bool {
        true
    }

    /// Whether this role may overwrite the drawing data
    pub fn can_write_data(self) -> bool {
        matches!(self, Self::Owner | Self::Collaborator)
    }

    /// Whether this role may edit details (name, sharing) or delete
    pub fn can_manage(self) -> bool {
        matches!(self, Self::Owner)
    }
}
