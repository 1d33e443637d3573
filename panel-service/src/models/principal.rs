use super::Grant;

/// The authenticated actor of one request.
///
/// Built by the authentication middleware and shared read-only for the
/// remainder of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub is_admin: bool,
    pub is_super_admin: bool,
    /// Ordered as loaded; lookups take the first match.
    pub grants: Vec<Grant>,
}

impl Principal {
    /// Global roles bypass per-server grants.
    pub fn is_global_admin(&self) -> bool {
        self.is_admin || self.is_super_admin
    }

    pub fn grant_for(&self, resource_id: &str) -> Option<&Grant> {
        self.grants.iter().find(|g| g.resource_id == resource_id)
    }

    /// Whether the principal may see `resource_id` at all.
    pub fn can_see(&self, resource_id: &str) -> bool {
        self.is_global_admin() || self.grant_for(resource_id).is_some()
    }
}
