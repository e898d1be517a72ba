//! `tilewm`: standalone entry point wiring the tiling core to a headless
//! window controller and the i3-ipc socket.
//!
//! A real Wayland/DRM backend is out of scope for this crate (spec §1
//! Non-goals); what's wired here is everything the core itself owns — the
//! compositor queue, the fixed-timestep animator, and the IPC server — so
//! the tree, layout and IPC surface can be exercised end-to-end without one.

use std::path::PathBuf;

use clap::Parser;

use tilewm::animator::Animator;
use tilewm::ipc_server::{self, IpcServer};
use tilewm::launcher::ShellLauncher;
use tilewm::output::Output;
use tilewm::policy::{compositor_queue, Policy};
use tilewm::window_controller::HeadlessWindowController;

#[derive(Parser, Debug)]
#[command(version, about = "Tiling layout core for an i3-compatible Wayland compositor")]
struct Args {
    /// Path to a TOML config file; falls back to built-in defaults when
    /// absent (wm-config's `from_file` convention).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the i3-ipc socket path instead of deriving one from
    /// `$SWAYSOCK`/`$I3SOCK`/`$XDG_RUNTIME_DIR`.
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Logical size of the single headless output this binary drives,
    /// `<width>x<height>`.
    #[arg(long, default_value = "1920x1080")]
    output_size: String,
}

fn parse_output_size(s: &str) -> (i32, i32) {
    s.split_once('x')
        .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
        .unwrap_or((1920, 1080))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => wm_config::from_file(path)?,
        None => wm_config::Config::default(),
    };

    let (queue_tx, queue_rx) = compositor_queue();

    let animator_queue = queue_tx.clone();
    let animator = Animator::spawn(move |results, callbacks| {
        animator_queue.post(Box::new(move |policy: &mut Policy| {
            policy.apply_animation_batch(results, callbacks);
        }));
    });

    let mut policy = Policy::new(
        config,
        Box::new(HeadlessWindowController::default()),
        Box::new(ShellLauncher),
        animator.handle(),
    );

    let (width, height) = parse_output_size(&args.output_size);
    policy.add_output(Output::new("headless-0", tilewm::geometry::Rectangle::new(0, 0, width, height)));

    let socket_path = args.socket.unwrap_or_else(ipc_server::socket_path);
    let ipc = IpcServer::spawn(&socket_path, queue_tx.clone())?;
    tracing::info!(path = %ipc.path().display(), "listening for i3-ipc clients");

    // i3-msg checks I3SOCK, swaymsg and most status bars check SWAYSOCK;
    // exporting both lets either find this socket without extra flags
    // (spec §6).
    std::env::set_var("I3SOCK", &socket_path);
    std::env::set_var("SWAYSOCK", &socket_path);

    run_compositor_loop(queue_rx, &mut policy, &ipc);
    Ok(())
}

/// The compositor's single-threaded main loop (spec §5: "the compositor
/// queue is the single writer"). Without a real toolkit driving it, this
/// just drains the queue and fans out IPC events at a steady cadence — a
/// real backend would instead drive this off its own event loop (DRM vblank,
/// Wayland dispatch) and call `queue_rx.drain` once per iteration.
fn run_compositor_loop(
    queue_rx: tilewm::policy::CompositorQueueReceiver,
    policy: &mut Policy,
    ipc: &IpcServer,
) {
    loop {
        queue_rx.drain(policy);
        for event in policy.drain_events() {
            let shutdown = matches!(event, tilewm::policy::IpcEvent::Shutdown);
            ipc.broadcast(&event, policy);
            if shutdown {
                return;
            }
        }
        std::thread::sleep(std::time::Duration::from_millis(8));
    }
}
