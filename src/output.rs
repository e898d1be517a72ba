//! `Output`: one physical display, its ordered `Workspace`s, and the
//! animated workspace-switch logic of spec §4.C.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use wm_config::{AnimatedEvent, AnimationKind as ConfigAnimationKind, Config};

use crate::animator::AnimatorHandle;
use crate::container::{ContainerId, Transform, IDENTITY_TRANSFORM};
use crate::geometry::Rectangle;
use crate::window_controller::WindowController;
use crate::workspace::{Workspace, WorkspaceKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputId(pub u64);

static NEXT_OUTPUT_ID: AtomicU64 = AtomicU64::new(1);

impl OutputId {
    pub fn next() -> Self {
        Self(NEXT_OUTPUT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Fired before a workspace-switch animation starts (spec §4.C: "Observers
/// are fired before animation starts").
pub trait WorkspaceObserver {
    fn on_focused(
        &mut self,
        previous: Option<&Workspace>,
        previous_key: Option<WorkspaceKey>,
        current: &Workspace,
        current_key: WorkspaceKey,
    );
}

pub struct Output {
    id: OutputId,
    name: String,
    area: Rectangle,
    workspaces: Vec<Workspace>,
    active_key: Option<WorkspaceKey>,
    position_offset: f64,
    transform: Transform,
    /// Temporarily `true` for every workspace while a switch animation is
    /// in flight, so the animator can render the scroll (spec §4.C step
    /// 3: "Show all workspaces on this Output (temporarily)").
    all_visible_during_switch: bool,
}

impl Output {
    pub fn new(name: impl Into<String>, area: Rectangle) -> Self {
        Self {
            id: OutputId::next(),
            name: name.into(),
            area,
            workspaces: Vec::new(),
            active_key: None,
            position_offset: 0.0,
            transform: IDENTITY_TRANSFORM,
            all_visible_during_switch: false,
        }
    }

    pub fn id(&self) -> OutputId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn area(&self) -> Rectangle {
        self.area
    }

    pub fn position_offset(&self) -> f64 {
        self.position_offset
    }

    pub fn active_key(&self) -> Option<WorkspaceKey> {
        self.active_key
    }

    pub fn active_workspace(&self) -> Option<&Workspace> {
        self.active_key.and_then(|k| self.workspace(k))
    }

    pub fn active_workspace_mut(&mut self) -> Option<&mut Workspace> {
        self.active_key.and_then(move |k| self.workspace_mut(k))
    }

    pub fn workspace(&self, key: WorkspaceKey) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.key() == key)
    }

    pub fn workspace_mut(&mut self, key: WorkspaceKey) -> Option<&mut Workspace> {
        self.workspaces.iter_mut().find(|w| w.key() == key)
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    /// Inserts a newly-created workspace keeping the list sorted by key
    /// (spec §3: "An ordered list of Workspaces, kept sorted by key").
    fn insert_sorted(&mut self, workspace: Workspace) {
        let idx = self.workspaces.partition_point(|w| w.key() < workspace.key());
        self.workspaces.insert(idx, workspace);
    }

    pub fn remove_workspace(&mut self, key: WorkspaceKey) -> Option<Workspace> {
        let idx = self.workspaces.iter().position(|w| w.key() == key)?;
        Some(self.workspaces.remove(idx))
    }

    /// Creates `key` if it doesn't exist yet, without switching to it or
    /// firing observers. Used by `move to workspace <name>`, which (unlike
    /// `workspace <name>`) must not change which workspace is visible.
    pub fn ensure_workspace(&mut self, key: WorkspaceKey, config: &Config) {
        if self.workspace(key).is_none() {
            let hint = config.layout_hint_for(key);
            self.insert_sorted(Workspace::new(key, self.area, hint));
        }
    }

    /// `request_workspace(k)` (spec §4.C). Returns `true` if a switch (or
    /// creation) happened, `false` on the already-active no-op.
    #[allow(clippy::too_many_arguments)]
    pub fn request_workspace(
        &mut self,
        key: WorkspaceKey,
        config: &Config,
        window_controller: &mut dyn WindowController,
        animator: &AnimatorHandle,
        observer: &mut dyn WorkspaceObserver,
    ) -> bool {
        self.ensure_workspace(key, config);

        if self.active_key == Some(key) {
            return false;
        }

        let previous_key = self.active_key;
        let from_index = previous_key
            .and_then(|k| self.workspaces.iter().position(|w| w.key() == k));
        let to_index = self.workspaces.iter().position(|w| w.key() == key).unwrap();

        // Transfer pinned floats from `from` to `to` before firing
        // observers (spec §4.C step 3).
        if let Some(from_idx) = from_index {
            let pinned = self.workspaces[from_idx].pinned_floats();
            for container in pinned {
                self.workspaces[from_idx].remove_floating(container);
                self.workspaces[to_index.min(self.workspaces.len() - 1)].push_floating(container);
            }
        }

        {
            let (before, after) = self.workspaces.split_at_mut(to_index);
            let current = &after[0];
            let previous = from_index.map(|i| if i < to_index { &before[i] } else { &after[i - to_index] });
            observer.on_focused(previous, previous_key, current, key);
        }

        let from_empty_after_transfer = from_index
            .map(|i| self.workspaces[i].is_empty())
            .unwrap_or(false);

        self.active_key = Some(key);
        self.all_visible_during_switch = true;

        // `position_offset` always animates from the current rest position
        // (0) towards the new workspace's displacement: sliding to a
        // higher-indexed workspace pulls content left, hence negative.
        let delta_indices = to_index as i32 - from_index.map(|i| i as i32).unwrap_or(to_index as i32);
        let dst_x = -(delta_indices * self.area.width);

        for ws in self.workspaces.iter_mut() {
            if ws.key() != key {
                ws.show(window_controller);
            }
        }
        if let Some(ws) = self.workspace_mut(key) {
            ws.show(window_controller);
        }

        let def = config.animations.for_event(AnimatedEvent::WorkspaceShow).cloned();
        let output_id = self.id;
        match def.filter(|d| d.kind != ConfigAnimationKind::Disabled) {
            Some(def) => {
                let to_remove_key = if from_empty_after_transfer { previous_key } else { None };
                animator.submit_workspace_offset(
                    output_id,
                    0,
                    dst_x,
                    def.easing,
                    def.params,
                    def.duration,
                    Some(Box::new(move |policy: &mut crate::policy::Policy| {
                        policy.finish_workspace_switch(output_id, key, to_remove_key);
                    })),
                );
            }
            None => {
                let to_remove = from_empty_after_transfer.then_some(previous_key).flatten();
                self.finish_switch_now(key, to_remove, window_controller);
            }
        }
        true
    }

    /// Hides every workspace except `except_key` and drops `self.position_offset`
    /// back to zero baseline for the now-active workspace; called either
    /// immediately (animations disabled) or from the animation's
    /// completion callback (spec §4.C: "on completion, all workspaces
    /// except `to` are hidden").
    pub fn finish_switch_now(
        &mut self,
        except_key: WorkspaceKey,
        to_remove: Option<WorkspaceKey>,
        window_controller: &mut dyn WindowController,
    ) {
        self.position_offset = 0.0;
        self.all_visible_during_switch = false;
        for ws in self.workspaces.iter_mut() {
            if ws.key() != except_key && ws.is_active() {
                ws.hide(window_controller);
            }
        }
        if let Some(remove_key) = to_remove {
            if remove_key != except_key {
                self.remove_workspace(remove_key);
            }
        }
    }

    pub fn set_position_offset(&mut self, x: f64) {
        self.position_offset = x;
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Draws the fullscreen leaf of the active workspace (if any) at full
    /// Output extent, above everything else (spec §4.B fullscreen rule).
    pub fn fullscreen_rect_for_active(&self) -> Option<(ContainerId, Rectangle)> {
        let ws = self.active_workspace()?;
        let leaf = ws.tree().fullscreen_leaf()?;
        Some((leaf, self.area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window_controller::RecordingWindowController;
    use wm_config::Config;

    struct NullObserver {
        calls: usize,
    }
    impl WorkspaceObserver for NullObserver {
        fn on_focused(
            &mut self,
            _previous: Option<&Workspace>,
            _previous_key: Option<WorkspaceKey>,
            _current: &Workspace,
            _current_key: WorkspaceKey,
        ) {
            self.calls += 1;
        }
    }

    #[test]
    fn creates_workspace_on_first_request() {
        let mut output = Output::new("eDP-1", Rectangle::new(0, 0, 1280, 720));
        let config = Config::default();
        let mut wc = RecordingWindowController::default();
        let animator = crate::animator::Animator::spawn(|_, _| {});
        let handle = animator.handle();
        let mut observer = NullObserver { calls: 0 };

        assert!(output.workspace(1).is_none());
        output.request_workspace(1, &config, &mut wc, &handle, &mut observer);
        assert!(output.workspace(1).is_some());
        assert_eq!(output.active_key(), Some(1));
        assert_eq!(observer.calls, 1);
    }

    #[test]
    fn requesting_already_active_workspace_is_noop() {
        let mut output = Output::new("eDP-1", Rectangle::new(0, 0, 1280, 720));
        let config = Config::default();
        let mut wc = RecordingWindowController::default();
        let animator = crate::animator::Animator::spawn(|_, _| {});
        let handle = animator.handle();
        let mut observer = NullObserver { calls: 0 };

        output.request_workspace(1, &config, &mut wc, &handle, &mut observer);
        let switched = output.request_workspace(1, &config, &mut wc, &handle, &mut observer);
        assert!(!switched);
        assert_eq!(observer.calls, 1);
    }

    #[test]
    fn workspaces_stay_sorted_by_key() {
        let mut output = Output::new("eDP-1", Rectangle::new(0, 0, 1280, 720));
        let config = Config::default();
        let mut wc = RecordingWindowController::default();
        let animator = crate::animator::Animator::spawn(|_, _| {});
        let handle = animator.handle();
        let mut observer = NullObserver { calls: 0 };

        // A non-empty workspace survives being switched away from
        // (`is_empty()` gates the destroy-on-switch-away behavior), so
        // give each one a window before moving on to the next.
        output.request_workspace(3, &config, &mut wc, &handle, &mut observer);
        output.active_workspace_mut().unwrap().tree_mut().insert_window(crate::container::WindowHandle(3));
        output.request_workspace(1, &config, &mut wc, &handle, &mut observer);
        output.active_workspace_mut().unwrap().tree_mut().insert_window(crate::container::WindowHandle(1));
        output.request_workspace(2, &config, &mut wc, &handle, &mut observer);
        output.active_workspace_mut().unwrap().tree_mut().insert_window(crate::container::WindowHandle(2));

        let keys: Vec<_> = output.workspaces().iter().map(Workspace::key).collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[test]
    fn empty_workspace_is_destroyed_on_switch_away() {
        let mut output = Output::new("eDP-1", Rectangle::new(0, 0, 1280, 720));
        let config = Config::default();
        let mut wc = RecordingWindowController::default();
        let animator = crate::animator::Animator::spawn(|_, _| {});
        let handle = animator.handle();
        let mut observer = NullObserver { calls: 0 };

        output.request_workspace(3, &config, &mut wc, &handle, &mut observer);
        output.request_workspace(1, &config, &mut wc, &handle, &mut observer);
        output.request_workspace(2, &config, &mut wc, &handle, &mut observer);

        let keys: Vec<_> = output.workspaces().iter().map(Workspace::key).collect();
        assert_eq!(keys, vec![2]);
    }
}
