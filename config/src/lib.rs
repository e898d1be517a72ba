//! Frozen configuration consumed by the tiling core.
//!
//! The core never reads a config *file*: loading YAML, watching it with
//! inotify, and showing notification bubbles on reload are a collaborator's
//! job (see spec §1 Non-goals). What lives here is the finite set of options
//! the core actually reads, typed, plus a thin TOML loader used by tests and
//! by the standalone binary for local experimentation — mirroring how
//! `core-config` in the `oxidized` editor loads its own TOML, not a
//! full-blown schema system.

pub mod easing;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

pub use easing::{Curve, EasingParams};

/// The modifier the compositor treats as "the" modifier for default binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Alt,
    Ctrl,
    Shift,
    Meta,
}

/// Inner/outer gap sizes, in pixels, on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    pub inner_x: i32,
    pub inner_y: i32,
    pub outer_x: i32,
    pub outer_y: i32,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            inner_x: 0,
            inner_y: 0,
            outer_x: 0,
            outer_y: 0,
        }
    }
}

/// RGBA color, each channel in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Rgba {
    fn default() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    pub size: i32,
    pub focus_color: Rgba,
    pub unfocused_color: Rgba,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            size: 2,
            focus_color: Rgba {
                r: 0.3,
                g: 0.6,
                b: 1.0,
                a: 1.0,
            },
            unfocused_color: Rgba {
                r: 0.2,
                g: 0.2,
                b: 0.2,
                a: 1.0,
            },
        }
    }
}

/// Which animation behavior an animatable event gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    Disabled,
    Slide,
    Grow,
    Shrink,
}

/// A screen edge, used as a slide animation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationDefinition {
    pub kind: AnimationKind,
    pub easing: Curve,
    pub params: EasingParams,
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    pub slide_from: Option<Edge>,
    pub slide_to: Option<Edge>,
}

impl Default for AnimationDefinition {
    fn default() -> Self {
        Self {
            kind: AnimationKind::Disabled,
            easing: Curve::default(),
            params: EasingParams::default(),
            duration: Duration::from_millis(200),
            slide_from: None,
            slide_to: None,
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs.max(0.0)))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationsConfig {
    pub enabled: bool,
    pub window_open: AnimationDefinition,
    pub window_move: AnimationDefinition,
    pub window_close: AnimationDefinition,
    pub workspace_show: AnimationDefinition,
    pub workspace_hide: AnimationDefinition,
}

impl Default for AnimationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_open: AnimationDefinition::default(),
            window_move: AnimationDefinition::default(),
            window_close: AnimationDefinition::default(),
            workspace_show: AnimationDefinition::default(),
            workspace_hide: AnimationDefinition::default(),
        }
    }
}

impl AnimationsConfig {
    /// The definition that applies to a given animatable event, honoring the
    /// master `enabled` flag.
    pub fn for_event(&self, event: AnimatedEvent) -> Option<&AnimationDefinition> {
        if !self.enabled {
            return None;
        }
        let def = match event {
            AnimatedEvent::WindowOpen => &self.window_open,
            AnimatedEvent::WindowMove => &self.window_move,
            AnimatedEvent::WindowClose => &self.window_close,
            AnimatedEvent::WorkspaceShow => &self.workspace_show,
            AnimatedEvent::WorkspaceHide => &self.workspace_hide,
        };
        (def.kind != AnimationKind::Disabled).then_some(def)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatedEvent {
    WindowOpen,
    WindowMove,
    WindowClose,
    WorkspaceShow,
    WorkspaceHide,
}

/// Per-workspace default layout: tiled windows, or a floating-first default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutHint {
    Tiled,
    Floating,
}

impl Default for LayoutHint {
    fn default() -> Self {
        LayoutHint::Tiled
    }
}

/// The enumerable set of default key commands spec §6 names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommand {
    Terminal,
    RequestVertical,
    RequestHorizontal,
    ToggleResize,
    ResizeUp,
    ResizeDown,
    ResizeLeft,
    ResizeRight,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    SelectUp,
    SelectDown,
    SelectLeft,
    SelectRight,
    QuitActiveWindow,
    QuitCompositor,
    Fullscreen,
    SelectWorkspace(u8),
    MoveToWorkspace(u8),
    ToggleFloating,
    TogglePinnedToWorkspace,
}

/// A keyboard chord: modifier bitset + raw keycode, matched against a
/// toolkit keyboard action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct KeyBinding {
    pub action: KeyboardAction,
    pub modifiers: u32,
    pub keycode: u32,
    pub command: KeyCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardAction {
    Press,
    Release,
}

/// A user-defined `(keyboard action, modifiers, keycode) -> shell command`
/// binding, dispatched through the `Launcher` capability (see
/// SPEC_FULL.md §2 NEW).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomCommand {
    pub action: KeyboardAction,
    pub modifiers: u32,
    pub keycode: u32,
    pub shell_command: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub primary_modifier: Modifier,
    pub gaps: GapConfig,
    pub animations: AnimationsConfig,
    pub workspace_layout_hints: BTreeMap<u8, LayoutHint>,
    pub border: BorderConfig,
    pub keybindings: Vec<KeyBinding>,
    pub custom_commands: Vec<CustomCommand>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_modifier: Modifier::Meta,
            gaps: GapConfig::default(),
            animations: AnimationsConfig::default(),
            workspace_layout_hints: BTreeMap::new(),
            border: BorderConfig::default(),
            keybindings: Vec::new(),
            custom_commands: Vec::new(),
        }
    }
}

impl Config {
    /// The layout hint for a workspace key, falling back to `Tiled`.
    pub fn layout_hint_for(&self, workspace_key: u8) -> LayoutHint {
        self.workspace_layout_hints
            .get(&workspace_key)
            .copied()
            .unwrap_or_default()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parse a frozen `Config` from a TOML document already resident in memory.
///
/// This is the "frozen value" boundary spec §1 describes: whatever loads the
/// real YAML file (out of scope here) is expected to hand the core something
/// equivalent to this struct.
pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Convenience loader for local experimentation and integration tests.
/// Falls back to [`Config::default`] when the file is absent, the way
/// `core-config`'s `load_from` does for the editor's own config.
pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => from_toml_str(&contents),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Ok(Config::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: path.display().to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let cfg = Config::default();
        assert_eq!(cfg.border.size, 2);
        assert_eq!(cfg.layout_hint_for(3), LayoutHint::Tiled);
    }

    #[test]
    fn reads_and_parses_a_real_file_on_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[gaps]\ninner_x = 4\ninner_y = 4\n").unwrap();

        let cfg = from_file(file.path()).unwrap();
        assert_eq!(cfg.gaps.inner_x, 4);
        assert_eq!(cfg.gaps.inner_y, 4);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let cfg = from_file(Path::new("/nonexistent/path/for/tests.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parses_gaps_and_animation_kind() {
        let toml = r#"
            [gaps]
            inner_x = 8
            inner_y = 8
            outer_x = 10
            outer_y = 10

            [animations.window_open]
            kind = "grow"
            easing = "ease_out_cubic"
            duration = 0.25
        "#;
        let cfg = from_toml_str(toml).unwrap();
        assert_eq!(cfg.gaps.inner_x, 8);
        assert_eq!(cfg.animations.window_open.kind, AnimationKind::Grow);
        assert_eq!(
            cfg.animations.window_open.duration,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn for_event_respects_master_flag() {
        let mut cfg = Config::default();
        cfg.animations.window_open.kind = AnimationKind::Slide;
        assert!(cfg.animations.for_event(AnimatedEvent::WindowOpen).is_some());
        cfg.animations.enabled = false;
        assert!(cfg.animations.for_event(AnimatedEvent::WindowOpen).is_none());
    }

    #[test]
    fn parses_key_bindings_with_parameterized_command() {
        let toml = r#"
            [[keybindings]]
            action = "press"
            modifiers = 64
            keycode = 28
            command = "terminal"

            [[keybindings]]
            action = "press"
            modifiers = 64
            keycode = 2
            command = { select_workspace = 1 }
        "#;
        let cfg = from_toml_str(toml).unwrap();
        assert_eq!(cfg.keybindings.len(), 2);
        assert_eq!(cfg.keybindings[0].command, KeyCommand::Terminal);
        assert_eq!(cfg.keybindings[1].command, KeyCommand::SelectWorkspace(1));
    }
}
