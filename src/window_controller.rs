//! `WindowController`: the capability interface the core calls out through
//! to mutate actual toolkit windows (spec §4.E). The core never talks to
//! the display-server toolkit directly — every mutation of a real window
//! goes through this trait, which the compositor binary implements and
//! tests substitute with [`RecordingWindowController`].

use crate::container::{Transform, WindowHandle};
use crate::geometry::Rectangle;

/// The toolkit-visible sizing state of a window, mirroring [`crate::container::SizingMode`]
/// but expressed at the `WindowController` boundary (spec §4.B: "tile
/// geometry is authoritative", the toolkit is told, not asked).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolkitWindowState {
    Restored,
    Fullscreen,
    Minimized,
    Hidden,
}

/// A geometry/decoration change to apply to a window in one `modify` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifySpec {
    pub rect: Rectangle,
    pub border_width: i32,
}

/// What the toolkit currently reports back for a window (spec §7 kind 2:
/// used to detect a "toolkit-reported inconsistency").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolkitWindowInfo {
    pub rect: Rectangle,
    pub is_fullscreen: bool,
}

/// Every operation here is specified to execute on the compositor's serial
/// queue (spec §5); the trait itself is synchronous, the queueing
/// discipline is the caller's (`Policy`'s) responsibility.
pub trait WindowController: Send {
    fn open(&mut self, window: WindowHandle);
    fn close(&mut self, window: WindowHandle);
    fn modify(&mut self, window: WindowHandle, spec: ModifySpec);
    fn change_state(&mut self, window: WindowHandle, state: ToolkitWindowState);
    fn raise(&mut self, window: WindowHandle);
    fn send_to_back(&mut self, window: WindowHandle);
    fn select_active(&mut self, window: WindowHandle);
    /// Initiates a move animation from `from` to `to`; the actual
    /// per-frame interpolation is the `Animator`'s job (spec §4.D) — this
    /// call just registers the intent with the toolkit/renderer.
    fn set_rectangle(&mut self, window: WindowHandle, from: Rectangle, to: Rectangle);
    fn clip(&mut self, window: WindowHandle, rect: Rectangle);
    fn noclip(&mut self, window: WindowHandle);
    fn set_transform(&mut self, window: WindowHandle, transform: Transform);
    fn is_fullscreen(&self, window: WindowHandle) -> bool;
    fn get_state(&self, window: WindowHandle) -> Option<ToolkitWindowState>;
    fn info_for(&self, window: WindowHandle) -> Option<ToolkitWindowInfo>;
}

/// Test double that records every call instead of touching a real toolkit;
/// used by workspace/output/policy unit tests, mirroring how the pack's
/// examples substitute a fake backend in headless tests.
#[derive(Debug, Default)]
pub struct RecordingWindowController {
    pub calls: Vec<String>,
    states: std::collections::HashMap<WindowHandle, ToolkitWindowState>,
    infos: std::collections::HashMap<WindowHandle, ToolkitWindowInfo>,
}

impl WindowController for RecordingWindowController {
    fn open(&mut self, window: WindowHandle) {
        self.calls.push(format!("open({window:?})"));
    }

    fn close(&mut self, window: WindowHandle) {
        self.calls.push(format!("close({window:?})"));
    }

    fn modify(&mut self, window: WindowHandle, spec: ModifySpec) {
        self.calls.push(format!("modify({window:?}, {spec:?})"));
        self.infos.insert(
            window,
            ToolkitWindowInfo { rect: spec.rect, is_fullscreen: false },
        );
    }

    fn change_state(&mut self, window: WindowHandle, state: ToolkitWindowState) {
        self.calls.push(format!("change_state({window:?}, {state:?})"));
        self.states.insert(window, state);
    }

    fn raise(&mut self, window: WindowHandle) {
        self.calls.push(format!("raise({window:?})"));
    }

    fn send_to_back(&mut self, window: WindowHandle) {
        self.calls.push(format!("send_to_back({window:?})"));
    }

    fn select_active(&mut self, window: WindowHandle) {
        self.calls.push(format!("select_active({window:?})"));
    }

    fn set_rectangle(&mut self, window: WindowHandle, from: Rectangle, to: Rectangle) {
        self.calls.push(format!("set_rectangle({window:?}, {from:?} -> {to:?})"));
    }

    fn clip(&mut self, window: WindowHandle, rect: Rectangle) {
        self.calls.push(format!("clip({window:?}, {rect:?})"));
    }

    fn noclip(&mut self, window: WindowHandle) {
        self.calls.push(format!("noclip({window:?})"));
    }

    fn set_transform(&mut self, window: WindowHandle, _transform: Transform) {
        self.calls.push(format!("set_transform({window:?})"));
    }

    fn is_fullscreen(&self, window: WindowHandle) -> bool {
        self.states.get(&window) == Some(&ToolkitWindowState::Fullscreen)
    }

    fn get_state(&self, window: WindowHandle) -> Option<ToolkitWindowState> {
        self.states.get(&window).copied()
    }

    fn info_for(&self, window: WindowHandle) -> Option<ToolkitWindowInfo> {
        self.infos.get(&window).copied()
    }
}

/// Production stand-in used by the `tilewm` binary: a real Wayland/DRM
/// backend is out of scope here (spec §1 Non-goals), so this logs every
/// mutation at debug level and tracks just enough state
/// (`is_fullscreen`/`get_state`/`info_for`) for the core's own logic to stay
/// consistent when driven without a toolkit attached.
#[derive(Debug, Default)]
pub struct HeadlessWindowController {
    states: std::collections::HashMap<WindowHandle, ToolkitWindowState>,
    infos: std::collections::HashMap<WindowHandle, ToolkitWindowInfo>,
}

impl WindowController for HeadlessWindowController {
    fn open(&mut self, window: WindowHandle) {
        tracing::debug!(?window, "open");
    }

    fn close(&mut self, window: WindowHandle) {
        tracing::debug!(?window, "close");
        self.states.remove(&window);
        self.infos.remove(&window);
    }

    fn modify(&mut self, window: WindowHandle, spec: ModifySpec) {
        tracing::trace!(?window, ?spec, "modify");
        let is_fullscreen = self.states.get(&window) == Some(&ToolkitWindowState::Fullscreen);
        self.infos.insert(window, ToolkitWindowInfo { rect: spec.rect, is_fullscreen });
    }

    fn change_state(&mut self, window: WindowHandle, state: ToolkitWindowState) {
        tracing::debug!(?window, ?state, "change_state");
        self.states.insert(window, state);
    }

    fn raise(&mut self, window: WindowHandle) {
        tracing::trace!(?window, "raise");
    }

    fn send_to_back(&mut self, window: WindowHandle) {
        tracing::trace!(?window, "send_to_back");
    }

    fn select_active(&mut self, window: WindowHandle) {
        tracing::debug!(?window, "select_active");
    }

    fn set_rectangle(&mut self, window: WindowHandle, from: Rectangle, to: Rectangle) {
        tracing::trace!(?window, ?from, ?to, "set_rectangle");
    }

    fn clip(&mut self, window: WindowHandle, rect: Rectangle) {
        tracing::trace!(?window, ?rect, "clip");
    }

    fn noclip(&mut self, window: WindowHandle) {
        tracing::trace!(?window, "noclip");
    }

    fn set_transform(&mut self, window: WindowHandle, _transform: Transform) {
        tracing::trace!(?window, "set_transform");
    }

    fn is_fullscreen(&self, window: WindowHandle) -> bool {
        self.states.get(&window) == Some(&ToolkitWindowState::Fullscreen)
    }

    fn get_state(&self, window: WindowHandle) -> Option<ToolkitWindowState> {
        self.states.get(&window).copied()
    }

    fn info_for(&self, window: WindowHandle) -> Option<ToolkitWindowInfo> {
        self.infos.get(&window).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_controller_tracks_last_state() {
        let mut wc = RecordingWindowController::default();
        let window = WindowHandle(1);
        wc.change_state(window, ToolkitWindowState::Fullscreen);
        assert!(wc.is_fullscreen(window));
        wc.change_state(window, ToolkitWindowState::Restored);
        assert!(!wc.is_fullscreen(window));
        assert_eq!(wc.calls.len(), 2);
    }
}
