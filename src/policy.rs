//! `Policy`: the top-level event sink (spec §2 component F).
//!
//! Every toolkit callback (new/ready/focus/modify/close), key/pointer
//! intent, IPC command and animation completion reaches the container tree
//! by running here, on the single-threaded compositor queue (spec §5: "the
//! compositor queue is the single writer"; "every externally triggered
//! callback ... reaches the tree only by enqueueing onto this queue").

use std::collections::VecDeque;
use std::sync::mpsc;

use wm_config::Config;

use crate::animator::{AnimatorHandle, StepResult};
use crate::container::{Container, ContainerId, LayoutDirection, WindowHandle};
use crate::geometry::{Direction, Rectangle};
use crate::launcher::Launcher;
use crate::output::{Output, OutputId, WorkspaceObserver};
use crate::window_controller::{ModifySpec, WindowController};
use crate::workspace::WorkspaceKey;
use crate::workspace_manager::{WindowLocation, WorkspaceManager};

/// A closure posted onto the compositor queue; the only way any other
/// thread (animator, IPC accept) is allowed to touch `Policy` (spec §5).
pub type QueuedAction = Box<dyn FnOnce(&mut Policy) + Send>;

/// The sending half, freely cloned and handed to the animator and the IPC
/// server thread.
#[derive(Clone)]
pub struct CompositorQueueSender(mpsc::Sender<QueuedAction>);

impl CompositorQueueSender {
    pub fn post(&self, action: QueuedAction) {
        // The receiver only goes away at process shutdown; a dropped send
        // here means the main loop already exited, nothing to log.
        let _ = self.0.send(action);
    }
}

/// The receiving half; owned by whoever runs the compositor's main loop.
pub struct CompositorQueueReceiver(mpsc::Receiver<QueuedAction>);

pub fn compositor_queue() -> (CompositorQueueSender, CompositorQueueReceiver) {
    let (tx, rx) = mpsc::channel();
    (CompositorQueueSender(tx), CompositorQueueReceiver(rx))
}

impl CompositorQueueReceiver {
    /// Drains every action currently queued, applying each to `policy` in
    /// order. Does not block: an empty queue returns immediately (spec §5:
    /// "the compositor queue is expected to never block").
    pub fn drain(&self, policy: &mut Policy) {
        while let Ok(action) = self.0.try_recv() {
            action(policy);
        }
    }
}

/// Events the IPC layer fans out to subscribers (spec §4.F event codes);
/// `Policy` only produces them, the IPC server owns delivery.
#[derive(Debug, Clone)]
pub enum IpcEvent {
    WorkspaceFocus { previous: Option<WorkspaceKey>, current: WorkspaceKey },
    WorkspaceInit { key: WorkspaceKey },
    WorkspaceEmpty { key: WorkspaceKey },
    WindowNew { window: WindowHandle },
    WindowClose { window: WindowHandle },
    WindowFocus { window: WindowHandle },
    WindowFullscreenMode { window: WindowHandle },
    WindowMove { window: WindowHandle },
    Shutdown,
}

/// The top-level event sink: receives toolkit callbacks and user intents,
/// routes them to the right `Output`/`Workspace`/`TilingWindowTree` (spec
/// §2 component F).
pub struct Policy {
    manager: WorkspaceManager,
    config: Config,
    window_controller: Box<dyn WindowController>,
    launcher: Box<dyn Launcher>,
    animator: AnimatorHandle,
    focused_window: Option<WindowHandle>,
    /// Non-empty only while a multi-select Group is active; spec §9 open
    /// question 1's resolution: entering a Group clears `focused_window`,
    /// and any direct focus event dissolves the Group.
    active_group: Vec<ContainerId>,
    events: VecDeque<IpcEvent>,
}

impl Policy {
    pub fn new(
        config: Config,
        window_controller: Box<dyn WindowController>,
        launcher: Box<dyn Launcher>,
        animator: AnimatorHandle,
    ) -> Self {
        Self {
            manager: WorkspaceManager::new(),
            config,
            window_controller,
            launcher,
            animator,
            focused_window: None,
            active_group: Vec::new(),
            events: VecDeque::new(),
        }
    }

    pub fn manager(&self) -> &WorkspaceManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut WorkspaceManager {
        &mut self.manager
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn add_output(&mut self, output: Output) -> OutputId {
        self.manager.add_output(output)
    }

    pub fn drain_events(&mut self) -> Vec<IpcEvent> {
        self.events.drain(..).collect()
    }

    pub fn focused_window(&self) -> Option<WindowHandle> {
        self.focused_window
    }

    /// Makes `window` the focused window without going through the toolkit
    /// `select_active`/`WindowFocus` side effects a real focus change
    /// carries — used by the IPC command executor to retarget a
    /// criteria-scoped command at something other than whatever the
    /// pointer/keyboard last focused.
    pub fn set_focused_window_for_command(&mut self, window: WindowHandle) {
        self.focused_window = Some(window);
        let Some(location) = self.manager.locate(window) else { return };
        if let WindowLocation::Tiled { output, workspace, container }
        | WindowLocation::Floating { output, workspace, container } = location
        {
            if let Some(ws) = self.manager.output_mut(output).and_then(|o| o.workspace_mut(workspace)) {
                ws.tree_mut().set_focused(Some(container));
            }
        }
    }

    fn emit(&mut self, event: IpcEvent) {
        self.events.push_back(event);
    }

    // --- Window lifecycle (spec §3 Lifecycles, §4.B insertion) ----------

    /// Toolkit reports a new tileable window: associates it to the
    /// currently-selected Parent on the focused Output's active workspace
    /// (spec §4.B step 1).
    pub fn on_window_new(&mut self, window: WindowHandle) -> Option<ContainerId> {
        let output_id = self.manager.focused_output()?;
        let output = self.manager.output_mut(output_id)?;
        let key = output.active_key().unwrap_or(1);
        // `request_workspace` creates the workspace on demand and is a
        // no-op if `key` is already active, so it's safe to call
        // unconditionally before the first window ever lands.
        output.request_workspace(
            key,
            &self.config,
            self.window_controller.as_mut(),
            &self.animator,
            &mut IpcObserver(&mut self.events),
        );
        let output = self.manager.output_mut(output_id)?;
        let ws = output.workspace_mut(key)?;
        let container = ws.tree_mut().insert_window(window);
        self.animator.set_alive(container, true);
        self.manager.register(window, WindowLocation::Tiled { output: output_id, workspace: key, container });
        self.window_controller.open(window);
        self.commit_workspace(output_id, key);
        self.focus_window(window);
        self.emit(IpcEvent::WindowNew { window });
        Some(container)
    }

    /// Toolkit reports the window is ready to be shown: flush its initial
    /// geometry, optionally animated per the `window_open` config.
    pub fn on_window_ready(&mut self, window: WindowHandle) {
        let Some(WindowLocation::Tiled { output, workspace, container }) = self.manager.locate(window) else {
            return;
        };
        let Some(ws) = self.manager.output(output).and_then(|o| o.workspace(workspace)) else {
            return;
        };
        let Some(rect) = ws.tree().get(container).map(Container::logical_area) else {
            return;
        };
        if let Some(def) = self.config.animations.for_event(wm_config::AnimatedEvent::WindowOpen).cloned() {
            self.animator.submit_geometry(container, window, rect, rect, rect, def.easing, def.params, def.duration, None);
        }
        self.window_controller.modify(window, ModifySpec { rect, border_width: self.config.border.size });
        self.window_controller.select_active(window);
    }

    /// Toolkit reports the window is gone: removes it from wherever it
    /// lives (tiled tree or floating list), triggering invariant-2 collapse
    /// (spec §3 Lifecycles).
    pub fn on_window_closed(&mut self, window: WindowHandle) {
        let Some(location) = self.manager.locate(window) else { return };
        self.animator.set_alive(location.container(), false);
        match location {
            WindowLocation::Tiled { output, workspace, container } => {
                if let Some(ws) = self.manager.output_mut(output).and_then(|o| o.workspace_mut(workspace)) {
                    ws.tree_mut().remove(container);
                }
                self.commit_workspace(output, workspace);
                self.maybe_destroy_workspace(output, workspace);
            }
            WindowLocation::Floating { output, workspace, container } => {
                if let Some(ws) = self.manager.output_mut(output).and_then(|o| o.workspace_mut(workspace)) {
                    ws.remove_floating(container);
                }
                self.maybe_destroy_workspace(output, workspace);
            }
        }
        self.manager.unregister(window);
        if self.focused_window == Some(window) {
            self.focused_window = None;
        }
        self.window_controller.close(window);
        self.emit(IpcEvent::WindowClose { window });
    }

    /// Toolkit reports external focus change (e.g. pointer click): per
    /// spec §9 open question 1, any direct focus event dissolves an active
    /// Group.
    pub fn on_focus_changed(&mut self, window: WindowHandle) {
        self.active_group.clear();
        self.focus_window(window);
    }

    fn focus_window(&mut self, window: WindowHandle) {
        self.focused_window = Some(window);
        let Some(location) = self.manager.locate(window) else { return };
        if let WindowLocation::Tiled { output, workspace, container }
        | WindowLocation::Floating { output, workspace, container } = location
        {
            if let Some(ws) = self.manager.output_mut(output).and_then(|o| o.workspace_mut(workspace)) {
                ws.tree_mut().set_focused(Some(container));
            }
        }
        self.window_controller.select_active(window);
        self.emit(IpcEvent::WindowFocus { window });
    }

    /// Toolkit `modify` callback: tile geometry is authoritative (spec
    /// §4.B failure semantics / §7 kind 2), so a reported size that
    /// disagrees with the tree's computed size is silently overridden
    /// rather than applied.
    pub fn on_modify(&mut self, window: WindowHandle, _reported: Rectangle) {
        let Some(location) = self.manager.locate(window) else { return };
        let (output, workspace, container) = match location {
            WindowLocation::Tiled { output, workspace, container } => (output, workspace, container),
            WindowLocation::Floating { output, workspace, container } => (output, workspace, container),
        };
        let Some(ws) = self.manager.output(output).and_then(|o| o.workspace(workspace)) else { return };
        let Some(rect) = ws.tree().get(container).map(Container::visible_area) else { return };
        self.window_controller.modify(window, ModifySpec { rect, border_width: self.config.border.size });
    }

    // --- Commit: flush tree geometry to the toolkit ----------------------

    /// Applies configured gaps and pushes every Leaf's (and non-pinned
    /// float's) current rectangle to the `WindowController`; idempotent if
    /// nothing changed (spec §4.A `commit_changes`).
    fn commit_workspace(&mut self, output_id: OutputId, key: WorkspaceKey) {
        let Some(output) = self.manager.output_mut(output_id) else { return };
        let area = output.area();
        let gaps = self.config.gaps;
        let border = self.config.border.size;
        let Some(ws) = output.workspace_mut(key) else { return };
        ws.tree_mut().apply_gaps(area, gaps.inner_x, gaps.inner_y, gaps.outer_x, gaps.outer_y);

        let fullscreen = ws.tree().fullscreen_leaf();
        for leaf_id in ws.tree().all_leaves() {
            let Some(leaf) = ws.tree().get(leaf_id).and_then(Container::as_leaf) else { continue };
            let window = leaf.window;
            if Some(leaf_id) == fullscreen {
                self.window_controller.modify(window, ModifySpec { rect: area, border_width: 0 });
                self.window_controller.raise(window);
                continue;
            }
            if fullscreen.is_some() {
                // spec §4.B: "ignores geometry updates for non-fullscreen
                // Leaves while any fullscreen Leaf is visible".
                continue;
            }
            let rect = ws.tree().get(leaf_id).map(Container::visible_area).unwrap_or_default();
            self.window_controller.modify(window, ModifySpec { rect, border_width: border });
        }
    }

    fn maybe_destroy_workspace(&mut self, output_id: OutputId, key: WorkspaceKey) {
        let Some(output) = self.manager.output_mut(output_id) else { return };
        let is_active = output.active_key() == Some(key);
        let Some(ws) = output.workspace(key) else { return };
        if !is_active && ws.is_empty() {
            output.remove_workspace(key);
        }
    }

    // --- User intents (spec §4.A/4.B) ------------------------------------

    fn focused_location(&self) -> Option<(OutputId, WorkspaceKey, ContainerId)> {
        let window = self.focused_window?;
        match self.manager.locate(window)? {
            WindowLocation::Tiled { output, workspace, container } => Some((output, workspace, container)),
            WindowLocation::Floating { output, workspace, container } => Some((output, workspace, container)),
        }
    }

    /// `move(direction)` on the focused container (spec §4.B 4-step move).
    pub fn move_focused(&mut self, direction: Direction) -> bool {
        let Some((output, key, container)) = self.focused_location() else { return false };
        let moved = self
            .manager
            .output_mut(output)
            .and_then(|o| o.workspace_mut(key))
            .is_some_and(|ws| ws.tree_mut().move_direction(container, direction));
        if moved {
            self.commit_workspace(output, key);
        } else {
            tracing::debug!(?direction, "move rejected: no room in that direction");
        }
        moved
    }

    /// `resize(direction)` by the default step (spec §4.B resize
    /// algorithm, 50px minimum).
    pub fn resize_focused(&mut self, direction: Direction, amount: i32) -> bool {
        let Some((output, key, container)) = self.focused_location() else { return false };
        let resized = self
            .manager
            .output_mut(output)
            .and_then(|o| o.workspace_mut(key))
            .is_some_and(|ws| ws.tree_mut().resize(container, direction, amount));
        if resized {
            self.commit_workspace(output, key);
        } else {
            tracing::debug!(?direction, amount, "resize rejected: would pass the minimum extent");
        }
        resized
    }

    /// `select_next(direction)` / "focus-next" (spec §4.B selection).
    pub fn select_next(&mut self, direction: Direction) -> bool {
        let Some((output, key, container)) = self.focused_location() else { return false };
        let Some(ws) = self.manager.output(output).and_then(|o| o.workspace(key)) else { return false };
        let Some(target) = ws.tree().select_next(container, direction) else {
            tracing::debug!(?direction, "focus-next rejected: no neighbor");
            return false;
        };
        let window = ws.tree().get(target).and_then(Container::window_handle);
        if let Some(window) = window {
            self.focus_window(window);
            true
        } else {
            false
        }
    }

    /// `kill`: asks the toolkit to close the focused window. The tree
    /// itself is only updated once the toolkit reports back through
    /// `on_window_closed` — a request to close is not a guarantee.
    pub fn close_focused(&mut self) -> bool {
        let Some(window) = self.focused_window else { return false };
        self.window_controller.close(window);
        true
    }

    pub fn toggle_fullscreen_focused(&mut self) {
        let Some((output, key, container)) = self.focused_location() else { return };
        if let Some(ws) = self.manager.output_mut(output).and_then(|o| o.workspace_mut(key)) {
            ws.tree_mut().toggle_fullscreen(container);
        }
        self.commit_workspace(output, key);
        self.emit(IpcEvent::WindowFullscreenMode {
            window: self.focused_window.expect("location implies a focused window"),
        });
    }

    pub fn request_horizontal_layout(&mut self) {
        self.set_layout_direction(LayoutDirection::Horizontal);
    }

    pub fn request_vertical_layout(&mut self) {
        self.set_layout_direction(LayoutDirection::Vertical);
    }

    pub fn request_stacked_layout(&mut self) {
        self.set_layout_direction(LayoutDirection::Stacked);
    }

    pub fn request_tabbed_layout(&mut self) {
        self.set_layout_direction(LayoutDirection::Tabbed);
    }

    /// `layout <direction>` (spec §4.A split-promotion operation), covering
    /// all four `LayoutDirection` variants — `layout stacking`/`layout
    /// tabbed` included, not just the `splith`/`splitv` pair.
    pub fn set_layout_direction(&mut self, direction: LayoutDirection) {
        let Some((output, key, container)) = self.focused_location() else { return };
        if let Some(ws) = self.manager.output_mut(output).and_then(|o| o.workspace_mut(key)) {
            ws.tree_mut().request_layout(container, direction);
        }
        self.commit_workspace(output, key);
    }

    pub fn toggle_layout(&mut self) {
        let Some((output, key, container)) = self.focused_location() else { return };
        if let Some(ws) = self.manager.output_mut(output).and_then(|o| o.workspace_mut(key)) {
            ws.tree_mut().toggle_layout(container);
        }
        self.commit_workspace(output, key);
    }

    /// `switch_workspace(other)` intent, routed to the focused Output
    /// (spec §4.C).
    pub fn switch_workspace(&mut self, key: WorkspaceKey) -> bool {
        let Some(output_id) = self.manager.focused_output() else { return false };
        let mut events = VecDeque::new();
        let switched = {
            let Some(output) = self.manager.output_mut(output_id) else { return false };
            let mut observer = IpcObserver(&mut events);
            output.request_workspace(key, &self.config, self.window_controller.as_mut(), &self.animator, &mut observer)
        };
        self.events.extend(events);
        if switched {
            self.commit_workspace(output_id, key);
        }
        switched
    }

    /// `move [container] to workspace <name>`: detaches the focused
    /// container and reinserts it into `key`'s tree, without switching the
    /// active workspace on either Output (spec.md reserves the `workspace`
    /// keyword in the move grammar; unlike `workspace <name>` this never
    /// fires a `WorkspaceFocus` event). Creates `key` on the focused Output
    /// if no Output currently hosts it.
    pub fn move_focused_to_workspace(&mut self, key: WorkspaceKey) -> bool {
        let Some((src_output, src_key, container)) = self.focused_location() else { return false };
        let dest_output = self
            .manager
            .outputs()
            .iter()
            .find(|o| o.workspace(key).is_some())
            .map(Output::id)
            .unwrap_or(src_output);
        if dest_output == src_output && src_key == key {
            return false;
        }

        let Some(ws) = self.manager.output(src_output).and_then(|o| o.workspace(src_key)) else { return false };
        let Some(existing) = ws.tree().get(container).cloned() else { return false };
        let (window, area, was_floating) = match &existing {
            Container::Leaf(l) => (l.window, l.common.logical_area, false),
            Container::FloatingWindow(f) => (f.window, f.common.logical_area, true),
            _ => return false,
        };

        if was_floating {
            if let Some(ws) = self.manager.output_mut(src_output).and_then(|o| o.workspace_mut(src_key)) {
                ws.remove_floating(container);
                ws.tree_mut().arena_mut().remove(container);
            }
        } else if let Some(ws) = self.manager.output_mut(src_output).and_then(|o| o.workspace_mut(src_key)) {
            ws.tree_mut().remove(container);
        }
        self.animator.set_alive(container, false);

        if let Some(out) = self.manager.output_mut(dest_output) {
            out.ensure_workspace(key, &self.config);
        }
        let Some(dest_ws) = self.manager.output_mut(dest_output).and_then(|o| o.workspace_mut(key)) else {
            return false;
        };
        let new_container = if was_floating {
            let mut floating = Container::new_floating_window(window);
            floating.common_mut().logical_area = area;
            floating.common_mut().visible_area = area;
            let id = dest_ws.tree_mut().arena_mut().insert(floating);
            dest_ws.push_floating(id);
            id
        } else {
            dest_ws.tree_mut().insert_window(window)
        };
        self.animator.set_alive(new_container, true);
        self.manager.register(
            window,
            if was_floating {
                WindowLocation::Floating { output: dest_output, workspace: key, container: new_container }
            } else {
                WindowLocation::Tiled { output: dest_output, workspace: key, container: new_container }
            },
        );

        self.commit_workspace(src_output, src_key);
        self.maybe_destroy_workspace(src_output, src_key);
        if self.manager.output(dest_output).and_then(Output::active_key) == Some(key) {
            self.commit_workspace(dest_output, key);
        }
        true
    }

    /// Completion callback for an animated workspace switch (spec §4.C):
    /// hides every non-active workspace on `output` and drops the
    /// now-empty `from` workspace if one was queued for removal.
    pub fn finish_workspace_switch(&mut self, output: OutputId, key: WorkspaceKey, to_remove: Option<WorkspaceKey>) {
        if let Some(out) = self.manager.output_mut(output) {
            out.finish_switch_now(key, to_remove, self.window_controller.as_mut());
        }
    }

    /// Applies one animator step batch (spec §4.D step 2: "batched updates
    /// are enqueued as a single closure ... on the compositor queue").
    pub fn apply_animation_batch(&mut self, results: Vec<StepResult>, callbacks: Vec<QueuedAction>) {
        for result in results {
            match result {
                StepResult::Geometry { window, rect, .. } => {
                    self.window_controller.modify(window, ModifySpec { rect, border_width: self.config.border.size });
                }
                StepResult::WorkspaceOffset { output, offset_x, .. } => {
                    if let Some(out) = self.manager.output_mut(output) {
                        out.set_position_offset(offset_x);
                    }
                }
                // spec §4.D edge case: vanished target, terminal rect
                // already implied, no toolkit call.
                StepResult::Vanished { .. } => {}
            }
        }
        for cb in callbacks {
            cb(self);
        }
    }

    // --- Floating / pinning (spec §4.A `pinned`, §4.C pinned transfer) --

    /// `floating toggle`: promotes a tiled Leaf to a floating window, or
    /// demotes a floating window back into the tiling tree.
    pub fn toggle_float_focused(&mut self) -> bool {
        let Some((output, key, container)) = self.focused_location() else { return false };
        let Some(ws) = self.manager.output_mut(output).and_then(|o| o.workspace_mut(key)) else { return false };
        match ws.tree().get(container).cloned() {
            Some(Container::Leaf(leaf)) => {
                let rect = leaf.common.logical_area;
                ws.tree_mut().remove(container);
                let mut floating = Container::new_floating_window(leaf.window);
                floating.common_mut().logical_area = rect;
                floating.common_mut().visible_area = rect;
                let new_id = ws.tree_mut().arena_mut().insert(floating);
                ws.push_floating(new_id);
                self.manager.register(leaf.window, WindowLocation::Floating { output, workspace: key, container: new_id });
                self.animator.set_alive(new_id, true);
                self.animator.set_alive(container, false);
                self.commit_workspace(output, key);
                true
            }
            Some(Container::FloatingWindow(floating)) => {
                ws.remove_floating(container);
                ws.tree_mut().arena_mut().remove(container);
                let new_id = ws.tree_mut().insert_window(floating.window);
                self.manager.register(floating.window, WindowLocation::Tiled { output, workspace: key, container: new_id });
                self.animator.set_alive(new_id, true);
                self.animator.set_alive(container, false);
                self.commit_workspace(output, key);
                true
            }
            _ => false,
        }
    }

    pub fn pin_focused(&mut self, pinned: bool) -> bool {
        let Some((output, key, container)) = self.focused_location() else { return false };
        self.manager
            .output_mut(output)
            .and_then(|o| o.workspace_mut(key))
            .and_then(|ws| ws.tree_mut().get_mut(container))
            .is_some_and(|c| c.set_pinned(pinned))
    }

    // --- exec / Terminal (SPEC_FULL.md §2 NEW) ---------------------------

    pub fn exec(&mut self, shell_command: &str) {
        self.launcher.spawn(shell_command);
    }
}

/// Bridges `Output`'s `on_focused` callback into queued `IpcEvent`s (spec
/// §4.C: "Observers are fired before animation starts").
struct IpcObserver<'a>(&'a mut VecDeque<IpcEvent>);

impl WorkspaceObserver for IpcObserver<'_> {
    fn on_focused(
        &mut self,
        _previous: Option<&crate::workspace::Workspace>,
        previous_key: Option<WorkspaceKey>,
        _current: &crate::workspace::Workspace,
        current_key: WorkspaceKey,
    ) {
        self.0.push_back(IpcEvent::WorkspaceFocus { previous: previous_key, current: current_key });
        if previous_key.is_none() {
            self.0.push_back(IpcEvent::WorkspaceInit { key: current_key });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window_controller::RecordingWindowController;
    use crate::launcher::RecordingLauncher;
    use crate::geometry::Rectangle;

    fn new_policy() -> Policy {
        let handle = crate::animator::Animator::spawn(|_, _| {}).handle();
        let mut policy = Policy::new(
            Config::default(),
            Box::new(RecordingWindowController::default()),
            Box::new(RecordingLauncher::default()),
            handle,
        );
        policy.add_output(Output::new("eDP-1", Rectangle::new(0, 0, 1280, 720)));
        policy
    }

    #[test]
    fn new_window_is_tiled_and_focused() {
        let mut policy = new_policy();
        let container = policy.on_window_new(WindowHandle(1));
        assert!(container.is_some());
        assert_eq!(policy.focused_window, Some(WindowHandle(1)));
    }

    #[test]
    fn closing_focused_window_clears_focus() {
        let mut policy = new_policy();
        policy.on_window_new(WindowHandle(1));
        policy.on_window_closed(WindowHandle(1));
        assert_eq!(policy.focused_window, None);
        assert_eq!(policy.manager.locate(WindowHandle(1)), None);
    }

    #[test]
    fn move_focused_with_one_window_is_rejected() {
        let mut policy = new_policy();
        policy.on_window_new(WindowHandle(1));
        assert!(!policy.move_focused(Direction::Left));
    }

    #[test]
    fn two_windows_select_next_swaps_focus() {
        let mut policy = new_policy();
        policy.on_window_new(WindowHandle(1));
        policy.on_window_new(WindowHandle(2));
        assert!(policy.select_next(Direction::Left));
        assert_eq!(policy.focused_window, Some(WindowHandle(1)));
    }

    #[test]
    fn move_to_workspace_creates_target_and_leaves_source_active() {
        let mut policy = new_policy();
        policy.on_window_new(WindowHandle(1));
        assert!(policy.move_focused_to_workspace(2));
        assert!(matches!(
            policy.manager.locate(WindowHandle(1)),
            Some(WindowLocation::Tiled { workspace: 2, .. })
        ));
        let output_id = policy.manager.focused_output().unwrap();
        // Moving away didn't switch which workspace is active.
        assert_eq!(policy.manager.output(output_id).and_then(Output::active_key), Some(1));
    }

    #[test]
    fn toggle_float_round_trips_leaf_to_floating_and_back() {
        let mut policy = new_policy();
        policy.on_window_new(WindowHandle(1));
        assert!(policy.toggle_float_focused());
        assert!(matches!(policy.manager.locate(WindowHandle(1)), Some(WindowLocation::Floating { .. })));
        assert!(policy.toggle_float_focused());
        assert!(matches!(policy.manager.locate(WindowHandle(1)), Some(WindowLocation::Tiled { .. })));
    }

    #[test]
    fn kill_requests_close_only_when_something_is_focused() {
        let mut policy = new_policy();
        assert!(!policy.close_focused());
        policy.on_window_new(WindowHandle(1));
        assert!(policy.close_focused());
    }

}
