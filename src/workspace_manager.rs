//! `WorkspaceManager`: the global map from workspace key to `Output` (spec
//! §2 component E).
//!
//! One instance owns every `Output` the compositor currently drives. It
//! does not itself decide layout — that is the `TilingWindowTree`'s job —
//! it only routes a workspace key to the `Output` that currently hosts it.

use std::collections::HashMap;

use crate::container::{ContainerId, WindowHandle};
use crate::output::{Output, OutputId, WorkspaceObserver};
use crate::workspace::WorkspaceKey;

/// Where a live window currently lives, for fast `WindowHandle -> location`
/// lookups (closing a window, IPC criteria matching, focus routing all
/// need this without walking every output).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowLocation {
    Tiled { output: OutputId, workspace: WorkspaceKey, container: ContainerId },
    Floating { output: OutputId, workspace: WorkspaceKey, container: ContainerId },
}

impl WindowLocation {
    pub fn container(self) -> ContainerId {
        match self {
            WindowLocation::Tiled { container, .. } => container,
            WindowLocation::Floating { container, .. } => container,
        }
    }
}

#[derive(Default)]
pub struct WorkspaceManager {
    outputs: Vec<Output>,
    focused_output: Option<OutputId>,
    window_index: HashMap<WindowHandle, WindowLocation>,
}

impl WorkspaceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_output(&mut self, output: Output) -> OutputId {
        let id = output.id();
        self.outputs.push(output);
        if self.focused_output.is_none() {
            self.focused_output = Some(id);
        }
        id
    }

    pub fn remove_output(&mut self, id: OutputId) -> Option<Output> {
        let idx = self.outputs.iter().position(|o| o.id() == id)?;
        let removed = self.outputs.remove(idx);
        if self.focused_output == Some(id) {
            self.focused_output = self.outputs.first().map(Output::id);
        }
        Some(removed)
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn output(&self, id: OutputId) -> Option<&Output> {
        self.outputs.iter().find(|o| o.id() == id)
    }

    pub fn output_mut(&mut self, id: OutputId) -> Option<&mut Output> {
        self.outputs.iter_mut().find(|o| o.id() == id)
    }

    pub fn focused_output(&self) -> Option<OutputId> {
        self.focused_output
    }

    pub fn set_focused_output(&mut self, id: OutputId) {
        if self.outputs.iter().any(|o| o.id() == id) {
            self.focused_output = Some(id);
        }
    }

    pub fn focused_output_ref(&self) -> Option<&Output> {
        self.focused_output.and_then(|id| self.output(id))
    }

    pub fn focused_output_mut_ref(&mut self) -> Option<&mut Output> {
        let id = self.focused_output?;
        self.output_mut(id)
    }

    pub fn locate(&self, window: WindowHandle) -> Option<WindowLocation> {
        self.window_index.get(&window).copied()
    }

    pub fn register(&mut self, window: WindowHandle, location: WindowLocation) {
        self.window_index.insert(window, location);
    }

    pub fn unregister(&mut self, window: WindowHandle) {
        self.window_index.remove(&window);
    }

    /// Every window the manager currently tracks, tiled or floating, for
    /// IPC criteria matching and `GET_TREE`/`GET_WORKSPACES` enumeration.
    pub fn window_locations(&self) -> impl Iterator<Item = (WindowHandle, WindowLocation)> + '_ {
        self.window_index.iter().map(|(&w, &l)| (w, l))
    }

    /// Notifies all registered observers that `from -> to` just happened on
    /// `output`; called by `Output::request_workspace`'s caller, which owns
    /// the observer list (kept here so a single `WorkspaceManager` can fan
    /// a switch out to IPC subscribers and any other interested party).
    pub fn request_workspace(
        &mut self,
        output: OutputId,
        key: WorkspaceKey,
        config: &wm_config::Config,
        window_controller: &mut dyn crate::window_controller::WindowController,
        animator: &crate::animator::AnimatorHandle,
        observer: &mut dyn WorkspaceObserver,
    ) -> bool {
        let Some(out) = self.output_mut(output) else {
            return false;
        };
        out.request_workspace(key, config, window_controller, animator, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;

    #[test]
    fn add_output_becomes_focused_when_first() {
        let mut mgr = WorkspaceManager::new();
        let out = Output::new("eDP-1", Rectangle::new(0, 0, 1280, 720));
        let id = mgr.add_output(out);
        assert_eq!(mgr.focused_output(), Some(id));
    }

    #[test]
    fn removing_output_reassigns_focus() {
        let mut mgr = WorkspaceManager::new();
        let first = mgr.add_output(Output::new("eDP-1", Rectangle::new(0, 0, 1280, 720)));
        let second = mgr.add_output(Output::new("HDMI-1", Rectangle::new(1280, 0, 1920, 1080)));
        mgr.set_focused_output(first);
        mgr.remove_output(first);
        assert_eq!(mgr.focused_output(), Some(second));
    }

    #[test]
    fn window_index_round_trips() {
        let mut mgr = WorkspaceManager::new();
        let out = mgr.add_output(Output::new("eDP-1", Rectangle::new(0, 0, 1280, 720)));
        let window = WindowHandle(42);
        let container = ContainerId::default();
        mgr.register(window, WindowLocation::Tiled { output: out, workspace: 1, container });
        assert_eq!(mgr.locate(window), Some(WindowLocation::Tiled { output: out, workspace: 1, container }));
        mgr.unregister(window);
        assert_eq!(mgr.locate(window), None);
    }
}
