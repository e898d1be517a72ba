//! Message and event type codes, matching the i3 IPC protocol numbering.

use crate::wire::EVENT_BIT;

/// Request message types a client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    RunCommand,
    GetWorkspaces,
    Subscribe,
    GetOutputs,
    GetTree,
    GetMarks,
    GetBarConfig,
    GetVersion,
    GetBindingModes,
    GetConfig,
    SendTick,
    Sync,
    GetBindingState,
    GetInputs,
    GetSeats,
}

impl MessageType {
    pub fn code(self) -> u32 {
        match self {
            MessageType::RunCommand => 0,
            MessageType::GetWorkspaces => 1,
            MessageType::Subscribe => 2,
            MessageType::GetOutputs => 3,
            MessageType::GetTree => 4,
            MessageType::GetMarks => 5,
            MessageType::GetBarConfig => 6,
            MessageType::GetVersion => 7,
            MessageType::GetBindingModes => 8,
            MessageType::GetConfig => 9,
            MessageType::SendTick => 10,
            MessageType::Sync => 11,
            MessageType::GetBindingState => 12,
            MessageType::GetInputs => 13,
            MessageType::GetSeats => 14,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => MessageType::RunCommand,
            1 => MessageType::GetWorkspaces,
            2 => MessageType::Subscribe,
            3 => MessageType::GetOutputs,
            4 => MessageType::GetTree,
            5 => MessageType::GetMarks,
            6 => MessageType::GetBarConfig,
            7 => MessageType::GetVersion,
            8 => MessageType::GetBindingModes,
            9 => MessageType::GetConfig,
            10 => MessageType::SendTick,
            11 => MessageType::Sync,
            12 => MessageType::GetBindingState,
            13 => MessageType::GetInputs,
            14 => MessageType::GetSeats,
            _ => return None,
        })
    }
}

/// Event types pushed to subscribers; these set the top bit of the wire's
/// message-type word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Workspace,
    Output,
    Mode,
    Window,
    BarConfigUpdate,
    Binding,
    Shutdown,
    Tick,
}

impl EventType {
    fn base_code(self) -> u32 {
        match self {
            EventType::Workspace => 0,
            EventType::Output => 1,
            EventType::Mode => 2,
            EventType::Window => 3,
            EventType::BarConfigUpdate => 4,
            EventType::Binding => 5,
            EventType::Shutdown => 6,
            EventType::Tick => 7,
        }
    }

    /// The wire-level type word, event bit set.
    pub fn wire_code(self) -> u32 {
        EVENT_BIT | self.base_code()
    }

    pub fn from_wire_code(code: u32) -> Option<Self> {
        if code & EVENT_BIT == 0 {
            return None;
        }
        Some(match code & !EVENT_BIT {
            0 => EventType::Workspace,
            1 => EventType::Output,
            2 => EventType::Mode,
            3 => EventType::Window,
            4 => EventType::BarConfigUpdate,
            5 => EventType::Binding,
            6 => EventType::Shutdown,
            7 => EventType::Tick,
            _ => return None,
        })
    }

    /// The subscription name used in a `"subscribe"` request payload, e.g.
    /// `["workspace", "window"]`.
    pub fn subscribe_name(self) -> &'static str {
        match self {
            EventType::Workspace => "workspace",
            EventType::Output => "output",
            EventType::Mode => "mode",
            EventType::Window => "window",
            EventType::BarConfigUpdate => "barconfig_update",
            EventType::Binding => "binding",
            EventType::Shutdown => "shutdown",
            EventType::Tick => "tick",
        }
    }

    pub fn from_subscribe_name(name: &str) -> Option<Self> {
        Some(match name {
            "workspace" => EventType::Workspace,
            "output" => EventType::Output,
            "mode" => EventType::Mode,
            "window" => EventType::Window,
            "barconfig_update" => EventType::BarConfigUpdate,
            "binding" => EventType::Binding,
            "shutdown" => EventType::Shutdown,
            "tick" => EventType::Tick,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_codes_match_i3_numbering() {
        assert_eq!(MessageType::RunCommand.code(), 0);
        assert_eq!(MessageType::GetWorkspaces.code(), 1);
        assert_eq!(MessageType::Subscribe.code(), 2);
        assert_eq!(MessageType::GetOutputs.code(), 3);
        assert_eq!(MessageType::GetTree.code(), 4);
        assert_eq!(MessageType::GetVersion.code(), 7);
        assert_eq!(MessageType::GetBindingModes.code(), 8);
        assert_eq!(MessageType::GetBindingState.code(), 12);
    }

    #[test]
    fn event_wire_codes_set_top_bit() {
        assert_eq!(EventType::Workspace.wire_code(), EVENT_BIT);
        assert_eq!(EventType::Tick.wire_code(), EVENT_BIT | 7);
        assert_eq!(
            EventType::from_wire_code(EVENT_BIT | 3),
            Some(EventType::Window)
        );
        assert_eq!(EventType::from_wire_code(3), None);
    }

    #[test]
    fn subscribe_name_round_trips() {
        for ty in [
            EventType::Workspace,
            EventType::Output,
            EventType::Mode,
            EventType::Window,
            EventType::BarConfigUpdate,
            EventType::Binding,
            EventType::Shutdown,
            EventType::Tick,
        ] {
            assert_eq!(EventType::from_subscribe_name(ty.subscribe_name()), Some(ty));
        }
    }
}
