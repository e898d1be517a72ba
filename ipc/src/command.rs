//! Parser for the i3 command grammar: a `;`-separated list of commands, each
//! optionally preceded by a `[criteria]` block that scopes it, with
//! individual commands inside one scope separated by `,`.

use crate::criteria::{CriteriaError, CriteriaList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "up" => Direction::Up,
            "down" => Direction::Down,
            "left" => Direction::Left,
            "right" => Direction::Right,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    Horizontal,
    Vertical,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    SplitH,
    SplitV,
    Stacking,
    Tabbed,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeUnit {
    Px,
    Ppt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeSign {
    Grow,
    Shrink,
    Set,
}

/// A single command, already stripped of its scoping criteria.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Exec { shell_command: String, no_startup_id: bool },
    Split(SplitKind),
    Layout(LayoutKind),
    Focus(Direction),
    FocusParent,
    FocusChild,
    FocusTiling,
    FocusFloating,
    FocusModeToggle,
    Move(Direction),
    MoveToWorkspace(String),
    MoveToOutput(String),
    MoveToScratchpad,
    Swap { con_id: i64 },
    Sticky(bool),
    Workspace(String),
    WorkspaceNext,
    WorkspacePrev,
    WorkspaceBackAndForth,
    Mark(String),
    Unmark(Option<String>),
    TitleFormat(String),
    TitleWindowIcon(bool),
    Border(String),
    ShmLog(bool),
    DebugLog(bool),
    Restart,
    Reload,
    Exit,
    ScratchpadShow,
    Nop(String),
    Gaps { inner: Option<i32>, outer: Option<i32> },
    Fullscreen(Option<bool>),
    Kill,
    FloatingToggle,
    FloatingEnable,
    FloatingDisable,
    Resize { sign: ResizeSign, direction: Option<Direction>, amount: i32, unit: ResizeUnit },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("malformed arguments to {command}: {detail}")]
    MalformedArgs { command: String, detail: String },
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
}

/// A command paired with the criteria block (if any) scoping it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedCommand {
    pub criteria: Option<CriteriaList>,
    pub command: Command,
}

/// One `;`-delimited scope: criteria stick until the next `;`, while `,`
/// chains further commands under the same scope.
pub type ScopedCommandList = Vec<ScopedCommand>;

/// Parse a full command-line payload, as sent verbatim in a `RUN_COMMAND`
/// request, into the scoped command lists it denotes.
pub fn parse(input: &str) -> Result<Vec<ScopedCommandList>, CommandError> {
    input
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_scope)
        .collect()
}

fn parse_scope(scope: &str) -> Result<ScopedCommandList, CommandError> {
    let mut rest = scope.trim();
    let mut criteria = None;

    if rest.starts_with('[') {
        let close = rest
            .find(']')
            .ok_or(CommandError::Criteria(CriteriaError::Unterminated))?;
        criteria = Some(CriteriaList::parse(&rest[1..close])?);
        rest = rest[close + 1..].trim();
    }

    rest.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|cmd_str| {
            Ok(ScopedCommand {
                criteria: criteria.clone(),
                command: parse_one(cmd_str)?,
            })
        })
        .collect()
}

fn parse_one(cmd: &str) -> Result<Command, CommandError> {
    let mut parts = cmd.split_whitespace();
    let head = parts.next().ok_or(CommandError::Empty)?;
    let rest: Vec<&str> = parts.collect();

    let malformed = |detail: &str| CommandError::MalformedArgs {
        command: head.to_string(),
        detail: detail.to_string(),
    };

    Ok(match head {
        "exec" => {
            let no_startup_id = rest.first() == Some(&"--no-startup-id");
            let shell_command = if no_startup_id { &rest[1..] } else { &rest[..] }.join(" ");
            if shell_command.is_empty() {
                return Err(malformed("missing shell command"));
            }
            Command::Exec { shell_command, no_startup_id }
        }
        "split" => Command::Split(match rest.first().copied() {
            Some("h" | "horizontal") => SplitKind::Horizontal,
            Some("v" | "vertical") => SplitKind::Vertical,
            Some("toggle") => SplitKind::Toggle,
            _ => return Err(malformed("expected h, v, or toggle")),
        }),
        "layout" => Command::Layout(match rest.first().copied() {
            Some("splith") => LayoutKind::SplitH,
            Some("splitv") => LayoutKind::SplitV,
            Some("stacking") => LayoutKind::Stacking,
            Some("tabbed") => LayoutKind::Tabbed,
            Some("toggle") => LayoutKind::Toggle,
            _ => return Err(malformed("unknown layout")),
        }),
        "focus" => match rest.first().copied() {
            Some("parent") => Command::FocusParent,
            Some("child") => Command::FocusChild,
            Some("tiling") => Command::FocusTiling,
            Some("floating") => Command::FocusFloating,
            Some("mode_toggle") => Command::FocusModeToggle,
            Some(dir) => Command::Focus(Direction::parse(dir).ok_or_else(|| malformed("unknown direction"))?),
            None => return Err(malformed("missing direction")),
        },
        "move" => parse_move(&rest).map_err(|d| malformed(&d))?,
        "swap" => {
            let con_id = rest
                .iter()
                .position(|&w| w == "con_id")
                .and_then(|i| rest.get(i + 1))
                .ok_or_else(|| malformed("expected 'with con_id <id>'"))?
                .parse()
                .map_err(|_| malformed("con_id must be an integer"))?;
            Command::Swap { con_id }
        }
        "sticky" => Command::Sticky(parse_toggle(rest.first().copied()).ok_or_else(|| malformed("expected enable/disable/toggle"))?),
        "workspace" => match rest.first().copied() {
            Some("next") | Some("next_on_output") => Command::WorkspaceNext,
            Some("prev") | Some("prev_on_output") => Command::WorkspacePrev,
            Some("back_and_forth") => Command::WorkspaceBackAndForth,
            Some(name) => Command::Workspace(name.to_string()),
            None => return Err(malformed("missing workspace name")),
        },
        "mark" => Command::Mark(rest.first().ok_or_else(|| malformed("missing mark name"))?.to_string()),
        "unmark" => Command::Unmark(rest.first().map(|s| s.to_string())),
        "title_format" => Command::TitleFormat(rest.join(" ")),
        "title_window_icon" => Command::TitleWindowIcon(parse_toggle(rest.first().copied()).unwrap_or(true)),
        "border" => Command::Border(rest.first().ok_or_else(|| malformed("missing border style"))?.to_string()),
        "shm_log" => Command::ShmLog(parse_toggle(rest.first().copied()).unwrap_or(true)),
        "debuglog" | "debug_log" => Command::DebugLog(parse_toggle(rest.first().copied()).unwrap_or(true)),
        "restart" => Command::Restart,
        "reload" => Command::Reload,
        "exit" => Command::Exit,
        "scratchpad" => match rest.first().copied() {
            Some("show") => Command::ScratchpadShow,
            _ => return Err(malformed("expected 'show'")),
        },
        "nop" => Command::Nop(rest.join(" ")),
        "gaps" => parse_gaps(&rest).map_err(|d| malformed(&d))?,
        "fullscreen" => Command::Fullscreen(match rest.first().copied() {
            None | Some("toggle") => None,
            Some("enable") => Some(true),
            Some("disable") => Some(false),
            _ => return Err(malformed("expected enable, disable, or toggle")),
        }),
        "kill" => Command::Kill,
        "floating" => match rest.first().copied() {
            Some("enable") => Command::FloatingEnable,
            Some("disable") => Command::FloatingDisable,
            Some("toggle") | None => Command::FloatingToggle,
            _ => return Err(malformed("expected enable, disable, or toggle")),
        },
        "resize" => parse_resize(&rest).map_err(|d| malformed(&d))?,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    })
}

fn parse_toggle(word: Option<&str>) -> Option<bool> {
    match word {
        Some("enable") => Some(true),
        Some("disable") => Some(false),
        Some("toggle") => None,
        _ => None,
    }
}

fn parse_move(rest: &[&str]) -> Result<Command, String> {
    match rest.first().copied() {
        Some(dir) if Direction::parse(dir).is_some() => {
            Ok(Command::Move(Direction::parse(dir).unwrap()))
        }
        Some("scratchpad") => Ok(Command::MoveToScratchpad),
        Some("to") => match rest.get(1).copied() {
            Some("workspace") => {
                let name = rest.get(2..).filter(|s| !s.is_empty())
                    .map(|s| s.join(" "))
                    .ok_or("missing workspace name")?;
                Ok(Command::MoveToWorkspace(name))
            }
            Some("output") => {
                let name = rest.get(2).ok_or("missing output name")?.to_string();
                Ok(Command::MoveToOutput(name))
            }
            Some("scratchpad") => Ok(Command::MoveToScratchpad),
            _ => Err("expected 'to workspace <name>' or 'to output <name>'".to_string()),
        },
        _ => Err("expected a direction or 'to workspace/output'".to_string()),
    }
}

fn parse_gaps(rest: &[&str]) -> Result<Command, String> {
    let mut inner = None;
    let mut outer = None;
    let mut iter = rest.iter();
    while let Some(&kind) = iter.next() {
        let amount: i32 = iter
            .next()
            .ok_or("missing gap amount")?
            .trim_end_matches("px")
            .parse()
            .map_err(|_| "gap amount must be an integer")?;
        match kind {
            "inner" => inner = Some(amount),
            "outer" => outer = Some(amount),
            _ => return Err(format!("unknown gap target {kind}")),
        }
    }
    Ok(Command::Gaps { inner, outer })
}

fn parse_resize(rest: &[&str]) -> Result<Command, String> {
    let sign = match rest.first().copied() {
        Some("grow") => ResizeSign::Grow,
        Some("shrink") => ResizeSign::Shrink,
        Some("set") => ResizeSign::Set,
        _ => return Err("expected grow, shrink, or set".to_string()),
    };
    let mut idx = 1;
    let direction = match sign {
        ResizeSign::Set => None,
        _ => {
            let d = Direction::parse(rest.get(idx).copied().unwrap_or(""));
            if d.is_some() {
                idx += 1;
            }
            d
        }
    };
    if matches!(rest.get(idx).copied(), Some("width" | "height")) {
        idx += 1;
    }
    let amount_str = rest.get(idx).ok_or("missing resize amount")?;
    let (amount, unit) = if let Some(stripped) = amount_str.strip_suffix("ppt") {
        (stripped.parse().map_err(|_| "amount must be an integer")?, ResizeUnit::Ppt)
    } else {
        (
            amount_str.trim_end_matches("px").parse().map_err(|_| "amount must be an integer")?,
            ResizeUnit::Px,
        )
    };
    Ok(Command::Resize { sign, direction, amount, unit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_focus_chain() {
        let scopes = parse("focus left; focus right").unwrap();
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes[0][0].command, Command::Focus(Direction::Left));
        assert_eq!(scopes[1][0].command, Command::Focus(Direction::Right));
    }

    #[test]
    fn parses_criteria_scoped_command() {
        let scopes = parse(r#"[class="Firefox"] kill"#).unwrap();
        assert_eq!(scopes.len(), 1);
        assert!(scopes[0][0].criteria.is_some());
        assert_eq!(scopes[0][0].command, Command::Kill);
    }

    #[test]
    fn comma_chains_share_one_scope() {
        let scopes = parse(r#"[class="Firefox"] floating enable, move to workspace 2"#).unwrap();
        assert_eq!(scopes.len(), 1);
        assert_eq!(scopes[0].len(), 2);
        assert!(scopes[0][0].criteria.is_some());
        assert!(scopes[0][1].criteria.is_some());
        assert_eq!(scopes[0][1].command, Command::MoveToWorkspace("2".to_string()));
    }

    #[test]
    fn parses_move_to_workspace() {
        let scopes = parse("move to workspace 3").unwrap();
        assert_eq!(scopes[0][0].command, Command::MoveToWorkspace("3".to_string()));
    }

    #[test]
    fn parses_resize_grow() {
        let scopes = parse("resize grow width 10 px").unwrap();
        assert_eq!(
            scopes[0][0].command,
            Command::Resize {
                sign: ResizeSign::Grow,
                direction: None,
                amount: 10,
                unit: ResizeUnit::Px
            }
        );
    }

    #[test]
    fn rejects_unknown_command() {
        let err = parse("frobnicate").unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("frobnicate".to_string()));
    }

    #[test]
    fn parses_gaps_command() {
        let scopes = parse("gaps inner 8px outer 10px").unwrap();
        assert_eq!(
            scopes[0][0].command,
            Command::Gaps { inner: Some(8), outer: Some(10) }
        );
    }
}
