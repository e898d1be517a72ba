//! The `[class="regex" ...]` criteria blocks that scope i3 commands to a
//! subset of windows.

use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowTypeCriterion {
    Normal,
    Dialog,
    Utility,
    Toolbar,
    Splash,
    Menu,
    DropdownMenu,
    PopupMenu,
    Tooltip,
    Notification,
}

impl WindowTypeCriterion {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "normal" => Self::Normal,
            "dialog" => Self::Dialog,
            "utility" => Self::Utility,
            "toolbar" => Self::Toolbar,
            "splash" => Self::Splash,
            "menu" => Self::Menu,
            "dropdown_menu" => Self::DropdownMenu,
            "popup_menu" => Self::PopupMenu,
            "tooltip" => Self::Tooltip,
            "notification" => Self::Notification,
            _ => return None,
        })
    }
}

/// One `key=value` term inside a `[...]` criteria block. A regex-valued term
/// is compiled eagerly so a malformed pattern is rejected at parse time
/// rather than on first match attempt.
#[derive(Debug, Clone)]
pub enum Criterion {
    Class(Regex),
    Instance(Regex),
    Title(Regex),
    AppId(Regex),
    ConId(i64),
    ConMark(Regex),
    Pid(i32),
    Floating,
    Tiling,
    Urgent(bool),
    WindowRole(Regex),
    WindowType(WindowTypeCriterion),
    Workspace(Regex),
}

impl PartialEq for Criterion {
    fn eq(&self, other: &Self) -> bool {
        use Criterion::*;
        match (self, other) {
            (Class(a), Class(b))
            | (Instance(a), Instance(b))
            | (Title(a), Title(b))
            | (AppId(a), AppId(b))
            | (ConMark(a), ConMark(b))
            | (WindowRole(a), WindowRole(b))
            | (Workspace(a), Workspace(b)) => a.as_str() == b.as_str(),
            (ConId(a), ConId(b)) => a == b,
            (Pid(a), Pid(b)) => a == b,
            (Floating, Floating) | (Tiling, Tiling) => true,
            (Urgent(a), Urgent(b)) => a == b,
            (WindowType(a), WindowType(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CriteriaError {
    #[error("unknown criterion key: {0}")]
    UnknownKey(String),
    #[error("invalid regex in criterion {key}: {source}")]
    BadRegex { key: String, source: String },
    #[error("invalid integer value for criterion {key}: {value}")]
    BadInt { key: String, value: String },
    #[error("unterminated criteria block, expected a closing ']'")]
    Unterminated,
    #[error("malformed criterion term: {0}")]
    MalformedTerm(String),
}

/// A parsed `[...]` block: every criterion must match a window for a scoped
/// command to apply to it.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaList {
    pub criteria: Vec<Criterion>,
}

impl CriteriaList {
    /// Parse the contents between (but not including) the surrounding
    /// brackets, e.g. `class="Firefox" title="Mozilla.*"`.
    pub fn parse(input: &str) -> Result<Self, CriteriaError> {
        let mut criteria = Vec::new();
        for term in split_terms(input) {
            criteria.push(parse_term(term)?);
        }
        Ok(CriteriaList { criteria })
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

/// Splits on whitespace that is not inside a quoted value.
fn split_terms(input: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let bytes = input.as_bytes();
    let mut start = 0usize;
    let mut in_quotes = false;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => in_quotes = !in_quotes,
            b' ' | b'\t' if !in_quotes => {
                if i > start {
                    terms.push(input[start..i].trim());
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < input.len() {
        let rest = input[start..].trim();
        if !rest.is_empty() {
            terms.push(rest);
        }
    }
    terms.retain(|t| !t.is_empty());
    terms
}

fn parse_term(term: &str) -> Result<Criterion, CriteriaError> {
    let (key, value) = term
        .split_once('=')
        .ok_or_else(|| CriteriaError::MalformedTerm(term.to_string()))?;
    let key = key.trim();
    let value = value.trim().trim_matches('"');

    let compile = |key: &str, value: &str| -> Result<Regex, CriteriaError> {
        Regex::new(value).map_err(|e| CriteriaError::BadRegex {
            key: key.to_string(),
            source: e.to_string(),
        })
    };

    Ok(match key {
        "class" => Criterion::Class(compile(key, value)?),
        "instance" => Criterion::Instance(compile(key, value)?),
        "title" => Criterion::Title(compile(key, value)?),
        "app_id" => Criterion::AppId(compile(key, value)?),
        "con_mark" => Criterion::ConMark(compile(key, value)?),
        "window_role" => Criterion::WindowRole(compile(key, value)?),
        "workspace" => Criterion::Workspace(compile(key, value)?),
        "con_id" => Criterion::ConId(value.parse().map_err(|_| CriteriaError::BadInt {
            key: key.to_string(),
            value: value.to_string(),
        })?),
        "pid" => Criterion::Pid(value.parse().map_err(|_| CriteriaError::BadInt {
            key: key.to_string(),
            value: value.to_string(),
        })?),
        "floating" => Criterion::Floating,
        "tiling" => Criterion::Tiling,
        "urgent" => Criterion::Urgent(value == "latest" || value == "true"),
        "window_type" => {
            let ty = WindowTypeCriterion::parse(value)
                .ok_or_else(|| CriteriaError::MalformedTerm(term.to_string()))?;
            Criterion::WindowType(ty)
        }
        other => return Err(CriteriaError::UnknownKey(other.to_string())),
    })
}

impl fmt::Display for CriteriaList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} criteria]", self.criteria.len())
    }
}

/// The minimal view of a window that criteria are evaluated against; the
/// compositor's real window state is owned by `WindowController`
/// implementors and mapped into this shape for matching.
#[derive(Debug, Clone, Default)]
pub struct MatchTarget {
    pub class: Option<String>,
    pub instance: Option<String>,
    pub title: Option<String>,
    pub app_id: Option<String>,
    pub con_id: Option<i64>,
    pub con_mark: Option<String>,
    pub pid: Option<i32>,
    pub is_floating: bool,
    pub is_urgent: bool,
    pub window_role: Option<String>,
    pub workspace_name: Option<String>,
}

impl Criterion {
    pub fn matches(&self, target: &MatchTarget) -> bool {
        match self {
            Criterion::Class(re) => target.class.as_deref().is_some_and(|v| re.is_match(v)),
            Criterion::Instance(re) => target.instance.as_deref().is_some_and(|v| re.is_match(v)),
            Criterion::Title(re) => target.title.as_deref().is_some_and(|v| re.is_match(v)),
            Criterion::AppId(re) => target.app_id.as_deref().is_some_and(|v| re.is_match(v)),
            Criterion::ConMark(re) => target.con_mark.as_deref().is_some_and(|v| re.is_match(v)),
            Criterion::WindowRole(re) => {
                target.window_role.as_deref().is_some_and(|v| re.is_match(v))
            }
            Criterion::Workspace(re) => {
                target.workspace_name.as_deref().is_some_and(|v| re.is_match(v))
            }
            Criterion::ConId(id) => target.con_id == Some(*id),
            Criterion::Pid(pid) => target.pid == Some(*pid),
            Criterion::Floating => target.is_floating,
            Criterion::Tiling => !target.is_floating,
            Criterion::Urgent(want) => target.is_urgent == *want,
            Criterion::WindowType(_) => false,
        }
    }
}

impl CriteriaList {
    pub fn matches(&self, target: &MatchTarget) -> bool {
        self.criteria.iter().all(|c| c.matches(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_and_title() {
        let list = CriteriaList::parse(r#"class="Firefox" title="Mozilla.*""#).unwrap();
        assert_eq!(list.criteria.len(), 2);

        let target = MatchTarget {
            class: Some("Firefox".to_string()),
            title: Some("Mozilla Firefox".to_string()),
            ..Default::default()
        };
        assert!(list.matches(&target));
    }

    #[test]
    fn all_criteria_must_match() {
        let list = CriteriaList::parse(r#"class="Firefox" floating"#).unwrap();
        let target = MatchTarget {
            class: Some("Firefox".to_string()),
            is_floating: false,
            ..Default::default()
        };
        assert!(!list.matches(&target));
    }

    #[test]
    fn rejects_unknown_key() {
        let err = CriteriaList::parse("bogus=\"x\"").unwrap_err();
        assert_eq!(err, CriteriaError::UnknownKey("bogus".to_string()));
    }

    #[test]
    fn rejects_bad_regex() {
        let err = CriteriaList::parse(r#"class="[""#).unwrap_err();
        assert!(matches!(err, CriteriaError::BadRegex { .. }));
    }
}
