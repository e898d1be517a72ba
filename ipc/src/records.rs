//! JSON record shapes returned by `GET_TREE`, `GET_WORKSPACES`, `GET_OUTPUTS`,
//! `GET_VERSION` and `RUN_COMMAND`, matching the field names i3/sway clients
//! already parse.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectRecord {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeLayout {
    SplitH,
    SplitV,
    Stacked,
    Tabbed,
    Output,
    Dockarea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Root,
    Output,
    Con,
    FloatingCon,
    Workspace,
    Dockarea,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: i64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub border: String,
    pub current_border_width: i32,
    pub layout: NodeLayout,
    pub percent: Option<f64>,
    pub rect: RectRecord,
    pub window_rect: RectRecord,
    pub deco_rect: RectRecord,
    pub geometry: RectRecord,
    pub urgent: bool,
    pub sticky: bool,
    pub focused: bool,
    pub focus: Vec<i64>,
    pub nodes: Vec<TreeNode>,
    pub floating_nodes: Vec<TreeNode>,
    pub fullscreen_mode: i32,
    pub marks: Vec<String>,
    pub app_id: Option<String>,
    pub window_properties_class: Option<String>,
    pub pid: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceRecord {
    pub id: i64,
    pub num: i32,
    pub name: String,
    pub visible: bool,
    pub focused: bool,
    pub urgent: bool,
    pub rect: RectRecord,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub name: String,
    pub active: bool,
    pub primary: bool,
    pub rect: RectRecord,
    pub current_workspace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
    pub human_readable: String,
    pub loaded_config_file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when `success` is false because the command text itself didn't
    /// parse, as opposed to parsing fine and failing to apply (i3/sway
    /// distinguish the two so clients can tell a typo from a runtime
    /// rejection).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<bool>,
}

impl CommandOutcome {
    pub fn ok() -> Self {
        Self { success: true, error: None, parse_error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()), parse_error: None }
    }

    pub fn parse_failed(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()), parse_error: Some(true) }
    }
}

/// The `RUN_COMMAND` reply is a JSON array with one outcome per
/// semicolon-separated command in the request.
pub type CommandReply = Vec<CommandOutcome>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change")]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceEvent {
    Focus {
        current: Option<WorkspaceRecord>,
        old: Option<WorkspaceRecord>,
    },
    Init {
        current: WorkspaceRecord,
    },
    Empty {
        current: WorkspaceRecord,
    },
    Urgent {
        current: WorkspaceRecord,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change")]
#[serde(rename_all = "snake_case")]
pub enum WindowEvent {
    New { container: TreeNode },
    Close { container: TreeNode },
    Focus { container: TreeNode },
    Title { container: TreeNode },
    FullscreenMode { container: TreeNode },
    Move { container: TreeNode },
    Floating { container: TreeNode },
    Urgent { container: TreeNode },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_reply_serializes_as_array() {
        let reply: CommandReply = vec![
            CommandOutcome::ok(),
            CommandOutcome::failed("no such workspace"),
        ];
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(
            json,
            r#"[{"success":true},{"success":false,"error":"no such workspace"}]"#
        );
    }

    #[test]
    fn workspace_event_tags_on_change_field() {
        let ws = WorkspaceRecord {
            id: 1,
            num: 1,
            name: "1".to_string(),
            visible: true,
            focused: true,
            urgent: false,
            rect: RectRecord {
                x: 0,
                y: 0,
                width: 1280,
                height: 720,
            },
            output: "eDP-1".to_string(),
        };
        let event = WorkspaceEvent::Init { current: ws };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["change"], "init");
    }
}
