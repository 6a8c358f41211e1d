//! Workflow API request and response types.
//!
//! Responses are a flat `Children` list of loosely-typed UI nodes. Every
//! field is optional because the server omits whatever a node does not use.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level response document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowResponse {
    /// Rendered page nodes, in server order.
    #[serde(rename = "Children", default)]
    pub children: Vec<Fragment>,
}

/// One node of a workflow response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Node identifier, e.g. `lchs_searchresult_7_link`.
    #[serde(rename = "ID", default)]
    pub id: Option<String>,

    /// Node type, e.g. `Node.Link` or `Node.Media.Image`.
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,

    /// Label or caption.
    #[serde(rename = "Name", default)]
    pub name: Option<String>,

    #[serde(rename = "Subtitle", default)]
    pub subtitle: Option<String>,

    /// Key/value tags. Usually an object of strings.
    #[serde(rename = "Tags", default)]
    pub tags: Option<Value>,
}

impl Fragment {
    /// Create a fragment with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Add a string tag, creating the tag object if needed.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let tags = self
            .tags
            .get_or_insert_with(|| Value::Object(Default::default()));
        if let Value::Object(map) = tags {
            map.insert(key.into(), Value::String(value.into()));
        }
        self
    }

    /// The identifier, or `""` when absent.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Look up a tag. Numbers are rendered as text; other JSON values and
    /// empty strings count as absent.
    pub fn tag(&self, key: &str) -> Option<String> {
        let value = self.tags.as_ref()?.as_object()?.get(key)?;
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }
}

/// A remote operation the workflow API can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Press "Confirm hire" for a terminal, which issues a release code.
    ConfirmHire {
        terminal_id: String,
        point_name: String,
    },

    /// Free-text docking station search.
    Search { text: String },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ConfirmHire {
                terminal_id,
                point_name,
            } => write!(f, "confirm hire at '{point_name}' (terminal {terminal_id})"),
            Operation::Search { text } => write!(f, "station search '{text}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_response() {
        let json = r#"{
            "Children": [
                {
                    "ID": "lchs_searchresult_7_link",
                    "Type": "Node.Link",
                    "Name": "King's Cross",
                    "Subtitle": "12 bikes",
                    "Tags": { "LCHS.StationID": "7", "LCHS.DockLocation": "51.53,-0.12" }
                },
                { "ID": "page_title", "Name": "Search" },
                { "Type": "Node.Spacer", "Tags": [] }
            ],
            "Title": "ignored"
        }"#;

        let response: WorkflowResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.children.len(), 3);

        let link = &response.children[0];
        assert_eq!(link.id(), "lchs_searchresult_7_link");
        assert_eq!(link.kind.as_deref(), Some("Node.Link"));
        assert_eq!(link.tag("LCHS.StationID").as_deref(), Some("7"));
        assert_eq!(link.tag("LCHS.DockLocation").as_deref(), Some("51.53,-0.12"));
        assert_eq!(link.tag("Missing"), None);

        assert_eq!(response.children[1].subtitle, None);
        assert_eq!(response.children[2].id(), "");
        assert_eq!(response.children[2].tag("anything"), None);
    }

    #[test]
    fn missing_children_is_empty() {
        let response: WorkflowResponse = serde_json::from_str("{}").unwrap();
        assert!(response.children.is_empty());
    }

    #[test]
    fn numeric_and_empty_tags() {
        let fragment: Fragment = serde_json::from_str(
            r#"{ "Tags": { "Terminal": 300100, "PointName": "", "Flag": true } }"#,
        )
        .unwrap();

        assert_eq!(fragment.tag("Terminal").as_deref(), Some("300100"));
        assert_eq!(fragment.tag("PointName"), None);
        assert_eq!(fragment.tag("Flag"), None);
    }

    #[test]
    fn builder_sets_fields() {
        let fragment = Fragment::new("x_unlockbar")
            .with_kind("Node.Text")
            .with_name("Release code 9013 issued")
            .with_subtitle("sub")
            .with_tag("Terminal", "300100");

        assert_eq!(fragment.id(), "x_unlockbar");
        assert_eq!(fragment.name.as_deref(), Some("Release code 9013 issued"));
        assert_eq!(fragment.tag("Terminal").as_deref(), Some("300100"));
    }

    #[test]
    fn operation_display() {
        let op = Operation::ConfirmHire {
            terminal_id: "300205".into(),
            point_name: "Cromer Street, Bloomsbury".into(),
        };
        assert_eq!(
            op.to_string(),
            "confirm hire at 'Cromer Street, Bloomsbury' (terminal 300205)"
        );

        let op = Operation::Search {
            text: "King".into(),
        };
        assert_eq!(op.to_string(), "station search 'King'");
    }
}
