use chrono::{DateTime, Utc};

/// How many tags are spelled out before the list is elided.
const TAG_DISPLAY_MAX: usize = 3;

#[derive(Debug, Clone, serde::Deserialize)]
#[allow(dead_code)] // Fields are part of the GitHub API contract
pub struct Package {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub package_type: String,
    pub visibility: String,
    #[serde(default)]
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version_count: u64,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[allow(dead_code)]
pub struct PackageVersion {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: VersionMetadata,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct VersionMetadata {
    #[serde(default)]
    pub package_type: String,
    #[serde(default)]
    pub container: ContainerMetadata,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ContainerMetadata {
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PackageVersion {
    pub fn tags(&self) -> &[String] {
        &self.metadata.container.tags
    }

    /// Comma-joined tag list capped at three entries, `...` suffix when more
    /// exist, `<untagged>` when there are none.
    pub fn tags_string(&self) -> String {
        let tags = self.tags();
        if tags.is_empty() {
            return "<untagged>".to_string();
        }
        let mut out = tags
            .iter()
            .take(TAG_DISPLAY_MAX)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if tags.len() > TAG_DISPLAY_MAX {
            out.push_str("...");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn version_with_tags(tags: &[&str]) -> PackageVersion {
        PackageVersion {
            id: 1,
            name: "sha256:abcdef".to_string(),
            url: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            metadata: VersionMetadata {
                package_type: "container".to_string(),
                container: ContainerMetadata {
                    tags: tags.iter().map(ToString::to_string).collect(),
                },
            },
        }
    }

    #[test]
    fn tags_string_untagged_placeholder() {
        assert_eq!(version_with_tags(&[]).tags_string(), "<untagged>");
    }

    #[test]
    fn tags_string_single() {
        assert_eq!(version_with_tags(&["latest"]).tags_string(), "latest");
    }

    #[test]
    fn tags_string_joins_up_to_three() {
        assert_eq!(
            version_with_tags(&["latest", "v1.2", "stable"]).tags_string(),
            "latest, v1.2, stable"
        );
    }

    #[test]
    fn tags_string_elides_past_three() {
        assert_eq!(
            version_with_tags(&["a", "b", "c", "d", "e"]).tags_string(),
            "a, b, c..."
        );
    }

    #[test]
    fn parse_package_from_api_json() {
        let json = r#"{
            "id": 1234,
            "name": "web-app",
            "package_type": "container",
            "visibility": "private",
            "url": "https://api.github.com/user/packages/container/web-app",
            "created_at": "2024-01-15T10:00:00Z",
            "updated_at": "2024-06-01T08:30:00Z",
            "version_count": 42
        }"#;
        let pkg: Package = serde_json::from_str(json).unwrap();
        assert_eq!(pkg.id, 1234);
        assert_eq!(pkg.name, "web-app");
        assert_eq!(pkg.visibility, "private");
        assert_eq!(pkg.version_count, 42);
    }

    #[test]
    fn parse_version_with_container_tags() {
        let json = r#"{
            "id": 98765,
            "name": "sha256:deadbeef",
            "url": "https://api.github.com/user/packages/container/web-app/versions/98765",
            "created_at": "2024-03-01T12:00:00Z",
            "updated_at": "2024-03-01T12:00:00Z",
            "metadata": {
                "package_type": "container",
                "container": {"tags": ["latest", "v2"]}
            }
        }"#;
        let v: PackageVersion = serde_json::from_str(json).unwrap();
        assert_eq!(v.id, 98765);
        assert_eq!(v.tags(), ["latest", "v2"]);
        assert_eq!(v.tags_string(), "latest, v2");
    }

    #[test]
    fn parse_version_without_metadata() {
        let json = r#"{
            "id": 5,
            "name": "0.1.0",
            "created_at": "2024-03-01T12:00:00Z",
            "updated_at": "2024-03-01T12:00:00Z"
        }"#;
        let v: PackageVersion = serde_json::from_str(json).unwrap();
        assert!(v.tags().is_empty());
        assert_eq!(v.tags_string(), "<untagged>");
    }
}
