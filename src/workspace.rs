//! A `Workspace`: one tiling tree, its floating windows, and the pinned /
//! fullscreen state spec §3 assigns to it.

use crate::container::{Container, ContainerId, LayoutDirection, WindowHandle};
use crate::geometry::Rectangle;
use crate::tree::TilingWindowTree;
use wm_config::LayoutHint;

/// The key a user addresses a workspace by: conventionally `1..9, 0`, but
/// spec §3 only requires "integer in the closed range the user may
/// address" so any `u8` is accepted.
pub type WorkspaceKey = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceVisibility {
    Active,
    Hidden,
}

/// A window parked in the workspace's floating list: either free-standing
/// or pinned (visible across workspace switches on its Output).
#[derive(Debug, Clone)]
pub struct FloatingEntry {
    pub container: ContainerId,
}

pub struct Workspace {
    key: WorkspaceKey,
    tree: TilingWindowTree,
    floating: Vec<FloatingEntry>,
    visibility: WorkspaceVisibility,
    /// Containers whose `saved_rect`/sizing-mode were captured on the last
    /// `active -> hidden` transition, restored on `hidden -> active`.
    hidden_leaves: Vec<ContainerId>,
}

impl Workspace {
    pub fn new(key: WorkspaceKey, area: Rectangle, hint: LayoutHint) -> Self {
        let default_direction = match hint {
            LayoutHint::Tiled => LayoutDirection::Horizontal,
            LayoutHint::Floating => LayoutDirection::Horizontal,
        };
        Self {
            key,
            tree: TilingWindowTree::new(area, default_direction),
            floating: Vec::new(),
            visibility: WorkspaceVisibility::Hidden,
            hidden_leaves: Vec::new(),
        }
    }

    pub fn key(&self) -> WorkspaceKey {
        self.key
    }

    pub fn tree(&self) -> &TilingWindowTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TilingWindowTree {
        &mut self.tree
    }

    pub fn floating(&self) -> &[FloatingEntry] {
        &self.floating
    }

    pub fn push_floating(&mut self, container: ContainerId) {
        self.floating.push(FloatingEntry { container });
    }

    pub fn remove_floating(&mut self, container: ContainerId) -> bool {
        let before = self.floating.len();
        self.floating.retain(|f| f.container != container);
        self.floating.len() != before
    }

    pub fn is_active(&self) -> bool {
        self.visibility == WorkspaceVisibility::Active
    }

    pub fn visibility(&self) -> WorkspaceVisibility {
        self.visibility
    }

    /// Is this workspace a candidate for destruction: no tiled windows, no
    /// (non-pinned) floats, not currently active (spec §4.B state machine:
    /// "all windows closed -> empty -> destroyed", entered only once
    /// switched away from).
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty() && self.floating.iter().all(|f| self.is_pinned(f.container))
    }

    fn is_pinned(&self, id: ContainerId) -> bool {
        self.tree
            .arena()
            .get(id)
            .is_some_and(Container::is_pinned)
    }

    /// `active -> hidden`: saves every visible (non-pinned) window's state
    /// and marks it hidden; pinned floats are left untouched so the caller
    /// (Output) can transfer them to the incoming workspace (spec §4.C).
    pub fn hide(&mut self, window_controller: &mut dyn crate::window_controller::WindowController) {
        self.visibility = WorkspaceVisibility::Hidden;
        self.hidden_leaves.clear();
        for leaf_id in self.tree.all_leaves() {
            if let Some(leaf) = self.tree.arena_mut().get_mut(leaf_id).and_then(Container::as_leaf_mut) {
                leaf.saved_rect = Some(leaf.common.logical_area);
            }
            if let Some(window) = self.tree.arena().get(leaf_id).and_then(Container::window_handle) {
                window_controller.change_state(window, crate::window_controller::ToolkitWindowState::Hidden);
            }
            self.hidden_leaves.push(leaf_id);
        }
        for entry in &self.floating {
            if self.is_pinned(entry.container) {
                continue;
            }
            if let Some(window) = self
                .tree
                .arena()
                .get(entry.container)
                .and_then(Container::window_handle)
            {
                window_controller.change_state(window, crate::window_controller::ToolkitWindowState::Hidden);
            }
        }
    }

    /// `hidden -> active`: restores previously saved state for every
    /// non-pinned window; pinned floats are already visible and untouched.
    pub fn show(&mut self, window_controller: &mut dyn crate::window_controller::WindowController) {
        self.visibility = WorkspaceVisibility::Active;
        for leaf_id in self.hidden_leaves.drain(..) {
            if let Some(window) = self.tree.arena().get(leaf_id).and_then(Container::window_handle) {
                window_controller.change_state(window, crate::window_controller::ToolkitWindowState::Restored);
            }
        }
        for entry in &self.floating {
            if self.is_pinned(entry.container) {
                continue;
            }
            if let Some(window) = self
                .tree
                .arena()
                .get(entry.container)
                .and_then(Container::window_handle)
            {
                window_controller.change_state(window, crate::window_controller::ToolkitWindowState::Restored);
            }
        }
    }

    pub fn pinned_floats(&self) -> Vec<ContainerId> {
        self.floating
            .iter()
            .map(|f| f.container)
            .filter(|&id| self.is_pinned(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window_controller::RecordingWindowController;

    fn area() -> Rectangle {
        Rectangle::new(0, 0, 1280, 720)
    }

    #[test]
    fn new_workspace_starts_hidden_and_empty() {
        let ws = Workspace::new(1, area(), LayoutHint::Tiled);
        assert!(!ws.is_active());
        assert!(ws.is_empty());
    }

    #[test]
    fn hide_then_show_restores_window_state() {
        let mut ws = Workspace::new(1, area(), LayoutHint::Tiled);
        ws.tree_mut().insert_window(WindowHandle(1));
        let mut wc = RecordingWindowController::default();

        ws.hide(&mut wc);
        assert!(wc.calls.iter().any(|c| c.contains("Hidden")));
        ws.show(&mut wc);
        assert!(wc.calls.iter().any(|c| c.contains("Restored")));
    }

    #[test]
    fn pinned_float_is_excluded_from_emptiness_check() {
        let mut ws = Workspace::new(1, area(), LayoutHint::Tiled);
        let mut arena_container = Container::new_floating_window(WindowHandle(9));
        arena_container.set_pinned(true);
        let id = ws.tree_mut().arena_mut().insert(arena_container);
        ws.push_floating(id);
        assert!(ws.is_empty());
    }
}
