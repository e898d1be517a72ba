//! The i3-ipc Unix-domain-socket server (spec §4.F / §6).
//!
//! Every request a client sends is answered by posting a closure onto the
//! compositor queue and blocking the client's own thread on a one-shot
//! channel for the reply (spec §5: the compositor queue is the single
//! writer, so this is the only way an IPC thread ever touches [`Policy`]).
//! `SUBSCRIBE`d clients get a dedicated writer thread that drains a
//! per-client channel the compositor main loop feeds via [`IpcServer::broadcast`].

use std::collections::HashSet;
use std::io::Write;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};

use parking_lot::Mutex;

use wm_ipc::command::{self, Command, LayoutKind, ResizeSign, ScopedCommand, SplitKind};
use wm_ipc::criteria::{CriteriaList, MatchTarget};
use wm_ipc::message::{EventType, MessageType};
use wm_ipc::records::{
    CommandOutcome, CommandReply, NodeLayout, NodeType, OutputRecord, RectRecord, TreeNode,
    VersionRecord, WindowEvent, WorkspaceEvent, WorkspaceRecord,
};
use wm_ipc::wire::{self, Frame};

use crate::container::{Container, ContainerArena, ContainerId, LayoutDirection, WindowHandle};
use crate::geometry::{Direction as CoreDirection, Rectangle};
use crate::output::{Output, OutputId};
use crate::policy::{CompositorQueueSender, IpcEvent, Policy};
use crate::workspace::WorkspaceKey;
use crate::workspace_manager::WindowLocation;

/// A slow subscriber's outstanding queue past this size gets disconnected
/// rather than allowed to back up the broadcaster indefinitely (spec §5).
const MAX_SUBSCRIBER_BUFFER_BYTES: usize = 4 * 1024 * 1024;

/// Resolves the socket path the way i3/sway do: an explicit `SWAYSOCK` or
/// `I3SOCK` override wins (so `swaymsg`/`i3-msg` keep working unmodified),
/// otherwise a fresh path under `XDG_RUNTIME_DIR` (or `/tmp` if that's
/// unset) named after the pid so concurrent instances never collide.
pub fn socket_path() -> PathBuf {
    if let Ok(path) = std::env::var("SWAYSOCK") {
        return PathBuf::from(path);
    }
    if let Ok(path) = std::env::var("I3SOCK") {
        return PathBuf::from(path);
    }
    let dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    let uid = unsafe { libc::getuid() };
    let pid = std::process::id();
    PathBuf::from(dir).join(format!("tilewm-ipc.{uid}.{pid}.sock"))
}

struct Subscriber {
    events: HashSet<EventType>,
    sender: mpsc::Sender<Vec<u8>>,
    queued_bytes: Arc<AtomicU64>,
}

struct IpcServerInner {
    path: PathBuf,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl Drop for IpcServerInner {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Owns the listening socket and the live subscriber list. Cheap to clone;
/// every clone shares the same accept thread and subscriber set, and the
/// socket file is unlinked once the last clone is dropped.
#[derive(Clone)]
pub struct IpcServer {
    inner: Arc<IpcServerInner>,
}

impl IpcServer {
    /// Binds `path` and spawns the accept thread. `queue` is cloned into
    /// every per-client thread so each can post request closures onto the
    /// compositor (spec §5).
    pub fn spawn(path: impl AsRef<Path>, queue: CompositorQueueSender) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        // A stale socket from a prior crash would otherwise make bind fail.
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path)?;

        let inner = Arc::new(IpcServerInner { path, subscribers: Mutex::new(Vec::new()) });

        let accept_inner = inner.clone();
        std::thread::Builder::new()
            .name("wm-ipc-accept".into())
            .spawn(move || {
                for stream in listener.incoming() {
                    let Ok(stream) = stream else { continue };
                    let queue = queue.clone();
                    let inner = accept_inner.clone();
                    std::thread::spawn(move || handle_client(stream, queue, inner));
                }
            })
            .expect("failed to spawn IPC accept thread");

        Ok(Self { inner })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Fans one internal event out to every subscriber that asked for its
    /// kind (spec §4.F). Called from the compositor main loop after each
    /// `Policy::drain_events()`.
    pub fn broadcast(&self, event: &IpcEvent, policy: &Policy) {
        let Some((event_type, payload)) = encode_event(event, policy) else { return };
        let frame = Frame::new(event_type.wire_code(), payload);
        let mut encoded = Vec::new();
        if wire::write_frame(&mut encoded, &frame).is_err() {
            return;
        }

        let mut subs = self.inner.subscribers.lock();
        subs.retain(|sub| {
            if !sub.events.contains(&event_type) {
                return true;
            }
            let queued = sub.queued_bytes.load(Ordering::Relaxed) as usize;
            if queued + encoded.len() > MAX_SUBSCRIBER_BUFFER_BYTES {
                tracing::warn!("disconnecting slow IPC subscriber: write buffer exceeded 4MB");
                return false;
            }
            sub.queued_bytes.fetch_add(encoded.len() as u64, Ordering::Relaxed);
            sub.sender.send(encoded.clone()).is_ok()
        });
    }
}

fn reply_json<T: serde::Serialize>(stream: &UnixStream, message_type: MessageType, value: &T) {
    let payload = serde_json::to_vec(value).unwrap_or_default();
    let frame = Frame::new(message_type.code(), payload);
    let _ = wire::write_frame(stream, &frame);
}

/// Blocks the calling (client) thread until `f` has run on the compositor
/// queue and produced a result (spec §5: the compositor queue never
/// blocks, but a client waiting for its own reply is expected to).
fn request<T: Send + 'static>(
    queue: &CompositorQueueSender,
    f: impl FnOnce(&mut Policy) -> T + Send + 'static,
) -> T {
    let (tx, rx) = mpsc::channel();
    queue.post(Box::new(move |policy: &mut Policy| {
        let _ = tx.send(f(policy));
    }));
    rx.recv().expect("compositor queue receiver dropped before replying")
}

fn handle_client(stream: UnixStream, queue: CompositorQueueSender, inner: Arc<IpcServerInner>) {
    loop {
        let frame = match wire::read_frame(&stream) {
            Ok(frame) => frame,
            Err(_) => return,
        };
        let Some(message_type) = MessageType::from_code(frame.type_code()) else {
            continue;
        };

        match message_type {
            MessageType::RunCommand => {
                let script = String::from_utf8_lossy(&frame.payload).into_owned();
                let reply = request(&queue, move |policy| run_command_script(policy, &script));
                reply_json(&stream, message_type, &reply);
            }
            MessageType::GetWorkspaces => {
                let reply = request(&queue, |policy| build_workspace_records(policy));
                reply_json(&stream, message_type, &reply);
            }
            MessageType::GetOutputs => {
                let reply = request(&queue, |policy| build_output_records(policy));
                reply_json(&stream, message_type, &reply);
            }
            MessageType::GetTree => {
                let reply = request(&queue, |policy| build_tree(policy));
                reply_json(&stream, message_type, &reply);
            }
            MessageType::GetVersion => {
                reply_json(&stream, message_type, &version_record());
            }
            MessageType::GetBindingModes => {
                reply_json(&stream, message_type, &vec!["default".to_string()]);
            }
            MessageType::GetBindingState => {
                reply_json(&stream, message_type, &serde_json::json!({ "name": "default" }));
            }
            MessageType::GetMarks => {
                reply_json(&stream, message_type, &Vec::<String>::new());
            }
            MessageType::GetBarConfig => {
                reply_json(&stream, message_type, &serde_json::json!({}));
            }
            MessageType::GetConfig => {
                reply_json(&stream, message_type, &serde_json::json!({ "config": "" }));
            }
            MessageType::SendTick => {
                reply_json(&stream, message_type, &serde_json::json!({ "success": true }));
            }
            MessageType::Sync => {
                reply_json(&stream, message_type, &serde_json::json!({ "success": true }));
            }
            MessageType::GetInputs => {
                reply_json(&stream, message_type, &Vec::<String>::new());
            }
            MessageType::GetSeats => {
                reply_json(&stream, message_type, &Vec::<String>::new());
            }
            MessageType::Subscribe => {
                let names: Vec<String> = serde_json::from_slice(&frame.payload).unwrap_or_default();
                let events: HashSet<EventType> =
                    names.iter().filter_map(|n| EventType::from_subscribe_name(n)).collect();
                let (tx, rx) = mpsc::channel::<Vec<u8>>();
                let queued_bytes = Arc::new(AtomicU64::new(0));
                inner
                    .subscribers
                    .lock()
                    .push(Subscriber { events, sender: tx, queued_bytes: queued_bytes.clone() });
                reply_json(&stream, message_type, &serde_json::json!({ "success": true }));

                // From here the connection is event-only: drain pushed
                // frames until the peer disconnects.
                let Ok(mut writer) = stream.try_clone() else { return };
                for encoded in rx {
                    if writer.write_all(&encoded).is_err() {
                        return;
                    }
                    queued_bytes.fetch_sub(encoded.len() as u64, Ordering::Relaxed);
                }
                return;
            }
        }
    }
}

// --- RUN_COMMAND dispatch --------------------------------------------------

/// Splits `script` on `;` itself rather than delegating the whole string to
/// `wm_ipc::command::parse` so a malformed scope reports its own
/// `parse_error` outcome without discarding the outcomes of its siblings
/// (spec §7 kind 5: "other commands in the same script continue").
fn run_command_script(policy: &mut Policy, script: &str) -> CommandReply {
    let mut reply = Vec::new();
    for segment in script.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        match command::parse(segment) {
            Ok(scopes) => {
                for scope in scopes {
                    for scoped in &scope {
                        reply.push(execute_command(policy, scoped));
                    }
                }
            }
            Err(err) => reply.push(CommandOutcome::parse_failed(err.to_string())),
        }
    }
    if reply.is_empty() {
        reply.push(CommandOutcome::parse_failed("empty command"));
    }
    reply
}

fn execute_command(policy: &mut Policy, scoped: &ScopedCommand) -> CommandOutcome {
    if resolve_target(policy, &scoped.criteria).is_none() {
        return CommandOutcome::failed("no matching window");
    }

    match &scoped.command {
        Command::Focus(dir) => {
            ok_if(policy.select_next(core_direction(*dir)), "no window in that direction")
        }
        Command::Move(dir) => {
            ok_if(policy.move_focused(core_direction(*dir)), "no room in that direction")
        }
        Command::MoveToWorkspace(name) => match name.parse::<WorkspaceKey>() {
            Ok(key) => ok_if(policy.move_focused_to_workspace(key), "already on that workspace"),
            Err(_) => CommandOutcome::failed("named (non-numeric) workspaces aren't supported"),
        },
        Command::Workspace(name) => match name.parse::<WorkspaceKey>() {
            Ok(key) => {
                policy.switch_workspace(key);
                CommandOutcome::ok()
            }
            Err(_) => CommandOutcome::failed("named (non-numeric) workspaces aren't supported"),
        },
        Command::Layout(kind) => {
            match kind {
                LayoutKind::SplitH => policy.request_horizontal_layout(),
                LayoutKind::SplitV => policy.request_vertical_layout(),
                LayoutKind::Stacking => policy.request_stacked_layout(),
                LayoutKind::Tabbed => policy.request_tabbed_layout(),
                LayoutKind::Toggle => policy.toggle_layout(),
            }
            CommandOutcome::ok()
        }
        Command::Split(kind) => {
            match kind {
                SplitKind::Horizontal => policy.request_horizontal_layout(),
                SplitKind::Vertical => policy.request_vertical_layout(),
                SplitKind::Toggle => policy.toggle_layout(),
            }
            CommandOutcome::ok()
        }
        Command::Fullscreen(_) => {
            policy.toggle_fullscreen_focused();
            CommandOutcome::ok()
        }
        Command::Kill => ok_if(policy.close_focused(), "nothing focused"),
        Command::FloatingToggle | Command::FloatingEnable | Command::FloatingDisable => {
            policy.toggle_float_focused();
            CommandOutcome::ok()
        }
        Command::Sticky(pinned) => {
            ok_if(policy.pin_focused(*pinned), "pin rejected on a tiled window")
        }
        Command::Exec { shell_command, .. } => {
            policy.exec(shell_command);
            CommandOutcome::ok()
        }
        Command::Resize { sign, direction, amount, .. } => {
            let dir = direction.map(core_direction).unwrap_or(CoreDirection::Right);
            let signed_amount = if *sign == ResizeSign::Shrink { -amount } else { *amount };
            ok_if(policy.resize_focused(dir, signed_amount), "would pass the minimum extent")
        }
        // Recognized by the grammar (so a client script using them doesn't
        // get `unknown command`) but carrying no tiling-tree effect: marks,
        // titles, borders, bar config, process lifecycle and logging level
        // are toolkit/session-manager concerns this core never tracks.
        // `scratchpad`/`move scratchpad` belong here too: i3 recognizes
        // the keyword but this core keeps no hidden-window list for it.
        Command::Mark(_)
        | Command::Unmark(_)
        | Command::TitleFormat(_)
        | Command::TitleWindowIcon(_)
        | Command::Border(_)
        | Command::ShmLog(_)
        | Command::DebugLog(_)
        | Command::Restart
        | Command::Reload
        | Command::Exit
        | Command::Nop(_)
        | Command::Swap { .. }
        | Command::MoveToOutput(_)
        | Command::WorkspaceNext
        | Command::WorkspacePrev
        | Command::WorkspaceBackAndForth
        | Command::FocusParent
        | Command::FocusChild
        | Command::FocusTiling
        | Command::FocusFloating
        | Command::FocusModeToggle
        | Command::MoveToScratchpad
        | Command::ScratchpadShow
        | Command::Gaps { .. } => CommandOutcome::ok(),
    }
}

fn ok_if(success: bool, failure_reason: &str) -> CommandOutcome {
    if success {
        CommandOutcome::ok()
    } else {
        CommandOutcome::failed(failure_reason)
    }
}

fn core_direction(dir: command::Direction) -> CoreDirection {
    match dir {
        command::Direction::Up => CoreDirection::Up,
        command::Direction::Down => CoreDirection::Down,
        command::Direction::Left => CoreDirection::Left,
        command::Direction::Right => CoreDirection::Right,
    }
}

/// Picks the window a command applies to: the focused window when the
/// scope carries no criteria (i3's default), or the first window matching
/// the criteria block otherwise, re-focusing it so the rest of the scope's
/// commands (each written against "the focused window") land on it.
///
/// Criteria keys the core has no data for (`class`, `instance`, `title`,
/// `app_id`, `pid`, `window_role`, `con_mark`, `window_type`) simply never
/// match, since those attributes live on the toolkit side of
/// `WindowController` and never reach `MatchTarget` here — this mirrors
/// the spec's scoping of toolkit attributes out of the core's state.
fn resolve_target(policy: &mut Policy, criteria: &Option<CriteriaList>) -> Option<WindowHandle> {
    let Some(list) = criteria else { return policy.focused_window() };
    if list.is_empty() {
        return policy.focused_window();
    }
    let found = policy
        .manager()
        .window_locations()
        .find(|(_, location)| list.matches(&match_target_for(*location)))
        .map(|(window, _)| window);
    if let Some(window) = found {
        policy.set_focused_window_for_command(window);
    }
    found
}

fn match_target_for(location: WindowLocation) -> MatchTarget {
    use slotmap::Key;
    match location {
        WindowLocation::Tiled { workspace, container, .. } => MatchTarget {
            con_id: Some(container.data().as_ffi() as i64),
            is_floating: false,
            workspace_name: Some(workspace.to_string()),
            ..Default::default()
        },
        WindowLocation::Floating { workspace, container, .. } => MatchTarget {
            con_id: Some(container.data().as_ffi() as i64),
            is_floating: true,
            workspace_name: Some(workspace.to_string()),
            ..Default::default()
        },
    }
}

// --- GET_TREE / GET_WORKSPACES / GET_OUTPUTS / GET_VERSION -----------------

fn rect_record(r: Rectangle) -> RectRecord {
    RectRecord { x: r.x, y: r.y, width: r.width, height: r.height }
}

fn layout_record(direction: LayoutDirection) -> NodeLayout {
    match direction {
        LayoutDirection::Horizontal => NodeLayout::SplitH,
        LayoutDirection::Vertical => NodeLayout::SplitV,
        LayoutDirection::Stacked => NodeLayout::Stacked,
        LayoutDirection::Tabbed => NodeLayout::Tabbed,
    }
}

fn container_numeric_id(id: ContainerId) -> i64 {
    use slotmap::Key;
    id.data().as_ffi() as i64
}

fn blank_node(id: i64, name: Option<String>, node_type: NodeType, rect: RectRecord) -> TreeNode {
    TreeNode {
        id,
        name,
        node_type,
        border: "normal".to_string(),
        current_border_width: 0,
        layout: NodeLayout::SplitH,
        percent: None,
        rect,
        window_rect: rect,
        deco_rect: RectRecord { x: 0, y: 0, width: 0, height: 0 },
        geometry: rect,
        urgent: false,
        sticky: false,
        focused: false,
        focus: Vec::new(),
        nodes: Vec::new(),
        floating_nodes: Vec::new(),
        fullscreen_mode: 0,
        marks: Vec::new(),
        app_id: None,
        window_properties_class: None,
        pid: None,
    }
}

fn build_node(
    arena: &ContainerArena,
    id: ContainerId,
    focused: Option<ContainerId>,
    fullscreen: Option<ContainerId>,
) -> TreeNode {
    let container = arena.get(id);
    let rect = match container {
        Some(c) => rect_record(c.logical_area()),
        None => rect_record(Rectangle::default()),
    };
    let node_type = match container {
        Some(Container::FloatingWindow(_)) => NodeType::FloatingCon,
        _ => NodeType::Con,
    };
    let mut node = blank_node(container_numeric_id(id), None, node_type, rect);
    node.focused = Some(id) == focused;
    node.fullscreen_mode = if Some(id) == fullscreen { 1 } else { 0 };

    match container {
        Some(Container::Parent(p)) => {
            node.layout = layout_record(p.direction);
            node.nodes = p.children.iter().map(|&c| build_node(arena, c, focused, fullscreen)).collect();
            node.focus = p.focused_child.into_iter().map(container_numeric_id).collect();
        }
        Some(Container::FloatingTree(ft)) => {
            let tree = &ft.tree;
            node.nodes = vec![build_node(tree.arena(), tree.root(), tree.focused(), tree.fullscreen_leaf())];
        }
        Some(Container::Group(g)) => {
            node.nodes = g.members.iter().map(|&m| build_node(arena, m, focused, fullscreen)).collect();
        }
        Some(Container::Leaf(_)) | Some(Container::FloatingWindow(_)) | Some(Container::Shell(_)) | None => {}
    }
    node
}

fn build_workspace_node(output: &Output, ws: &crate::workspace::Workspace, is_focused_output: bool) -> TreeNode {
    let mut node = blank_node(
        ws.key() as i64,
        Some(ws.key().to_string()),
        NodeType::Workspace,
        rect_record(output.area()),
    );
    node.layout = NodeLayout::SplitH;
    node.focused = is_focused_output && output.active_key() == Some(ws.key());

    let tree = ws.tree();
    node.nodes.push(build_node(tree.arena(), tree.root(), tree.focused(), tree.fullscreen_leaf()));
    for entry in ws.floating() {
        node.floating_nodes.push(build_node(tree.arena(), entry.container, tree.focused(), tree.fullscreen_leaf()));
    }
    node
}

fn build_output_node(output: &Output, focused_output: Option<OutputId>) -> TreeNode {
    let mut node = blank_node(
        output.id().0 as i64,
        Some(output.name().to_string()),
        NodeType::Output,
        rect_record(output.area()),
    );
    node.layout = NodeLayout::Output;
    let is_focused_output = Some(output.id()) == focused_output;
    for ws in output.workspaces() {
        node.nodes.push(build_workspace_node(output, ws, is_focused_output));
    }
    node
}

fn build_tree(policy: &Policy) -> TreeNode {
    let mut root = blank_node(0, Some("root".to_string()), NodeType::Root, RectRecord { x: 0, y: 0, width: 0, height: 0 });
    let focused_output = policy.manager().focused_output();
    for output in policy.manager().outputs() {
        root.nodes.push(build_output_node(output, focused_output));
    }
    root
}

fn find_workspace_record(policy: &Policy, key: WorkspaceKey) -> Option<WorkspaceRecord> {
    let focused_output = policy.manager().focused_output();
    for output in policy.manager().outputs() {
        if let Some(ws) = output.workspace(key) {
            return Some(WorkspaceRecord {
                id: key as i64,
                num: key as i32,
                name: key.to_string(),
                visible: ws.is_active(),
                focused: Some(output.id()) == focused_output && output.active_key() == Some(key),
                urgent: false,
                rect: rect_record(output.area()),
                output: output.name().to_string(),
            });
        }
    }
    None
}

fn build_workspace_records(policy: &Policy) -> Vec<WorkspaceRecord> {
    let focused_output = policy.manager().focused_output();
    policy
        .manager()
        .outputs()
        .iter()
        .flat_map(|output| {
            let is_focused_output = Some(output.id()) == focused_output;
            output.workspaces().iter().map(move |ws| WorkspaceRecord {
                id: ws.key() as i64,
                num: ws.key() as i32,
                name: ws.key().to_string(),
                visible: ws.is_active(),
                focused: is_focused_output && output.active_key() == Some(ws.key()),
                urgent: false,
                rect: rect_record(output.area()),
                output: output.name().to_string(),
            })
        })
        .collect()
}

fn build_output_records(policy: &Policy) -> Vec<OutputRecord> {
    let focused_output = policy.manager().focused_output();
    policy
        .manager()
        .outputs()
        .iter()
        .map(|output| OutputRecord {
            name: output.name().to_string(),
            active: true,
            primary: Some(output.id()) == focused_output,
            rect: rect_record(output.area()),
            current_workspace: output.active_key().map(|k| k.to_string()),
        })
        .collect()
}

fn version_record() -> VersionRecord {
    VersionRecord {
        major: 4,
        minor: 0,
        patch: 0,
        human_readable: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        loaded_config_file_name: String::new(),
    }
}

fn window_event(
    policy: &Policy,
    window: WindowHandle,
    wrap: impl FnOnce(TreeNode) -> WindowEvent,
) -> Option<(EventType, Vec<u8>)> {
    let location = policy.manager().locate(window)?;
    let container_id = location.container();
    let arena: &ContainerArena = match location {
        WindowLocation::Tiled { output, workspace, .. } | WindowLocation::Floating { output, workspace, .. } => {
            policy.manager().output(output)?.workspace(workspace)?.tree().arena()
        }
    };
    let node = build_node(arena, container_id, None, None);
    let payload = wrap(node);
    serde_json::to_vec(&payload).ok().map(|bytes| (EventType::Window, bytes))
}

fn encode_event(event: &IpcEvent, policy: &Policy) -> Option<(EventType, Vec<u8>)> {
    match event {
        IpcEvent::WorkspaceFocus { previous, current } => {
            let current_record = find_workspace_record(policy, *current)?;
            let old_record = previous.and_then(|k| find_workspace_record(policy, k));
            let payload = WorkspaceEvent::Focus { current: Some(current_record), old: old_record };
            serde_json::to_vec(&payload).ok().map(|bytes| (EventType::Workspace, bytes))
        }
        IpcEvent::WorkspaceInit { key } => {
            let current = find_workspace_record(policy, *key)?;
            let payload = WorkspaceEvent::Init { current };
            serde_json::to_vec(&payload).ok().map(|bytes| (EventType::Workspace, bytes))
        }
        IpcEvent::WorkspaceEmpty { key } => {
            let current = find_workspace_record(policy, *key)?;
            let payload = WorkspaceEvent::Empty { current };
            serde_json::to_vec(&payload).ok().map(|bytes| (EventType::Workspace, bytes))
        }
        IpcEvent::WindowNew { window } => window_event(policy, *window, |c| WindowEvent::New { container: c }),
        IpcEvent::WindowClose { window } => window_event(policy, *window, |c| WindowEvent::Close { container: c }),
        IpcEvent::WindowFocus { window } => window_event(policy, *window, |c| WindowEvent::Focus { container: c }),
        IpcEvent::WindowFullscreenMode { window } => {
            window_event(policy, *window, |c| WindowEvent::FullscreenMode { container: c })
        }
        IpcEvent::WindowMove { window } => window_event(policy, *window, |c| WindowEvent::Move { container: c }),
        IpcEvent::Shutdown => {
            serde_json::to_vec(&serde_json::json!({ "change": "exit" })).ok().map(|b| (EventType::Shutdown, b))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::RecordingLauncher;
    use crate::window_controller::RecordingWindowController;
    use crate::geometry::Rectangle as CoreRect;

    fn new_policy() -> Policy {
        let handle = crate::animator::Animator::spawn(|_, _| {}).handle();
        let mut policy = Policy::new(
            wm_config::Config::default(),
            Box::new(RecordingWindowController::default()),
            Box::new(RecordingLauncher::default()),
            handle,
        );
        policy.add_output(Output::new("eDP-1", CoreRect::new(0, 0, 1280, 720)));
        policy
    }

    #[test]
    fn socket_path_honors_swaysock_override() {
        std::env::set_var("SWAYSOCK", "/tmp/explicit-test.sock");
        assert_eq!(socket_path(), PathBuf::from("/tmp/explicit-test.sock"));
        std::env::remove_var("SWAYSOCK");
    }

    #[test]
    fn run_command_script_reports_one_outcome_per_semicolon_segment() {
        let mut policy = new_policy();
        policy.on_window_new(WindowHandle(1));
        policy.on_window_new(WindowHandle(2));

        let reply = run_command_script(&mut policy, "focus left; bogus; focus right");
        assert_eq!(reply.len(), 3);
        assert!(reply[0].success);
        assert!(!reply[1].success);
        assert_eq!(reply[1].parse_error, Some(true));
        assert!(reply[2].success);
    }

    #[test]
    fn move_to_named_workspace_fails_cleanly() {
        let mut policy = new_policy();
        policy.on_window_new(WindowHandle(1));
        let reply = run_command_script(&mut policy, "move to workspace web");
        assert_eq!(reply.len(), 1);
        assert!(!reply[0].success);
        assert_eq!(reply[0].parse_error, None);
    }

    #[test]
    fn build_tree_nests_outputs_workspaces_and_leaves() {
        let mut policy = new_policy();
        policy.on_window_new(WindowHandle(1));
        let tree = build_tree(&policy);
        assert_eq!(tree.node_type, NodeType::Root);
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.nodes[0].node_type, NodeType::Output);
        assert_eq!(tree.nodes[0].nodes.len(), 1);
        assert_eq!(tree.nodes[0].nodes[0].node_type, NodeType::Workspace);
    }

    #[test]
    fn get_workspaces_reports_the_active_workspace_as_focused() {
        let mut policy = new_policy();
        policy.on_window_new(WindowHandle(1));
        let records = build_workspace_records(&policy);
        assert_eq!(records.len(), 1);
        assert!(records[0].focused);
        assert!(records[0].visible);
    }
}
