//! GitHub contents API payloads
//!
//! See: https://docs.github.com/en/rest/repos/contents

use serde::{Deserialize, Serialize};

/// Subset of the content object returned by `GET /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    /// Blob sha, used as the version token for replacement
    pub sha: String,

    #[serde(default)]
    pub path: Option<String>,

    /// `file`, `dir`, `symlink` or `submodule`
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Serialize)]
pub struct PutContentsBody<'a> {
    pub message: &'a str,

    /// Base64-encoded file content
    pub content: String,

    pub branch: &'a str,

    /// Required when replacing an existing file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_content_entry() {
        let json = r#"{
            "type": "file",
            "encoding": "base64",
            "size": 5,
            "name": "2026-02-23_weekly-sync_abcdef12.txt",
            "path": "transcripts/2026-02-23_weekly-sync_abcdef12.txt",
            "content": "aGVsbG8=\n",
            "sha": "3a0f86fb8db8eea7ccbb9a95f325ddbedfb25e15"
        }"#;

        let entry: ContentEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.sha, "3a0f86fb8db8eea7ccbb9a95f325ddbedfb25e15");
        assert_eq!(entry.entry_type.as_deref(), Some("file"));
    }

    #[test]
    fn test_put_body_omits_missing_sha() {
        let body = PutContentsBody {
            message: "Add transcript: Weekly Sync",
            content: "aGVsbG8=".to_string(),
            branch: "main",
            sha: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["branch"], "main");

        let with_sha = PutContentsBody {
            sha: Some("abc"),
            ..body
        };
        assert_eq!(serde_json::to_value(&with_sha).unwrap()["sha"], "abc");
    }
}
