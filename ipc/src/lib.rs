//! i3-compatible IPC surface: wire framing, message/event type codes, JSON
//! reply records, window-matching criteria and the command grammar. Nothing
//! in this crate opens a socket — that belongs to the core's IPC server,
//! which frames requests with [`wire`], dispatches on [`message`], parses
//! command text with [`command`], and serializes [`records`] back out.

pub mod command;
pub mod criteria;
pub mod message;
pub mod records;
pub mod wire;

pub use command::{parse as parse_commands, Command, CommandError, ScopedCommand, ScopedCommandList};
pub use criteria::{Criterion, CriteriaError, CriteriaList, MatchTarget};
pub use message::{EventType, MessageType};
pub use records::{
    CommandOutcome, CommandReply, NodeLayout, NodeType, OutputRecord, RectRecord, TreeNode,
    VersionRecord, WindowEvent, WorkspaceEvent, WorkspaceRecord,
};
pub use wire::{read_frame, write_frame, Frame, FrameError, EVENT_BIT, HEADER_LEN, MAGIC};
