use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{map_status, PlatformClient, PlatformError};

/// Placement group shared by its databases.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub delete_protection: bool,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GroupConfiguration {
    #[serde(default)]
    pub delete_protection: bool,
}

/// Body of a create-group request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateGroup {
    pub name: String,
    /// Primary location code, e.g. `"fra"`.
    pub location: String,
    /// `"all"` or a list of extension names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<String>,
}

impl CreateGroup {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            extensions: None,
        }
    }
}

#[derive(Deserialize)]
struct GroupList {
    groups: Vec<Group>,
}

#[derive(Deserialize)]
struct GroupEnvelope {
    group: Group,
}

impl PlatformClient {
    /// `GET /v1/organizations/{org}/groups`
    pub async fn list_groups(&self) -> Result<Vec<Group>, PlatformError> {
        let url = self.org_endpoint(&["groups"])?;
        let list: GroupList = self.get(url).await?;
        Ok(list.groups)
    }

    /// `GET /v1/organizations/{org}/groups/{name}`
    pub async fn retrieve_group(&self, name: &str) -> Result<Group, PlatformError> {
        let url = self.org_endpoint(&["groups", name])?;
        let envelope: GroupEnvelope = map_status(self.get(url).await, group_not_found(name))?;
        Ok(envelope.group)
    }

    /// `GET /v1/organizations/{org}/groups/{name}/configuration`
    pub async fn group_configuration(
        &self,
        name: &str,
    ) -> Result<GroupConfiguration, PlatformError> {
        let url = self.org_endpoint(&["groups", name, "configuration"])?;
        map_status(self.get(url).await, group_not_found(name))
    }

    /// `POST /v1/organizations/{org}/groups`
    pub async fn create_group(&self, request: &CreateGroup) -> Result<Group, PlatformError> {
        let url = self.org_endpoint(&["groups"])?;
        let result = self
            .request::<_, GroupEnvelope>(Method::POST, url, Some(request))
            .await;
        let envelope = map_status(result, |status| match status {
            409 => Some(PlatformError::GroupAlreadyExists(request.name.clone())),
            400 => Some(PlatformError::InvalidGroupRequest(request.name.clone())),
            _ => None,
        })?;
        Ok(envelope.group)
    }

    /// `DELETE /v1/organizations/{org}/groups/{name}`
    ///
    /// Returns the deleted group.
    pub async fn delete_group(&self, name: &str) -> Result<Group, PlatformError> {
        let url = self.org_endpoint(&["groups", name])?;
        let envelope: GroupEnvelope = map_status(self.delete(url).await, group_not_found(name))?;
        Ok(envelope.group)
    }
}

fn group_not_found(name: &str) -> impl FnOnce(u16) -> Option<PlatformError> + '_ {
    move |status| (status == 404).then(|| PlatformError::GroupNotFound(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CreateGroup, Group};

    #[test]
    fn group_defaults_missing_fields() {
        let group: Group = serde_json::from_value(json!({
            "name": "default",
            "locations": ["fra", "iad"],
            "primary": "fra"
        }))
        .expect("must decode");
        assert_eq!(group.locations, vec!["fra", "iad"]);
        assert_eq!(group.primary.as_deref(), Some("fra"));
        assert!(!group.delete_protection);
        assert!(group.uuid.is_none());
    }

    #[test]
    fn create_group_omits_extensions_when_unset() {
        let body = serde_json::to_value(CreateGroup::new("edge", "ams")).expect("must serialize");
        assert_eq!(body, json!({ "name": "edge", "location": "ams" }));
    }
}
