//! The `Container` sum type and its arena.
//!
//! Containers live in a [`slotmap::SlotMap`] keyed by [`ContainerId`] rather
//! than behind `Rc`/`RefCell` or raw indices: a stale ID is rejected by the
//! map itself instead of relying on convention, and "weak reference" simply
//! means "look it up, it might not be there any more".

use slotmap::{new_key_type, SlotMap};

use crate::geometry::Rectangle;

new_key_type! {
    pub struct ContainerId;
}

/// Opaque identity for a toolkit-owned window. The core never interprets
/// this value; it is handed to `WindowController` calls and compared for
/// equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub u64);

/// A Parent's split direction, also used as the default for children it
/// receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutDirection {
    Horizontal,
    Vertical,
    Stacked,
    Tabbed,
}

impl LayoutDirection {
    pub fn axis(self) -> crate::geometry::Axis {
        match self {
            LayoutDirection::Horizontal => crate::geometry::Axis::Horizontal,
            LayoutDirection::Vertical
            | LayoutDirection::Stacked
            | LayoutDirection::Tabbed => crate::geometry::Axis::Vertical,
        }
    }

    /// `true` for the two directions that lay siblings side-by-side or
    /// stacked, rather than overlapping as in Stacked/Tabbed. Only
    /// Horizontal/Vertical siblings get a sub-rectangle each; Stacked and
    /// Tabbed siblings all receive the full content rectangle (the caller
    /// decides how much of it — title bar vs. content — to give the
    /// non-selected children).
    pub fn tiles_children_side_by_side(self) -> bool {
        matches!(self, LayoutDirection::Horizontal | LayoutDirection::Vertical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingMode {
    Restored,
    Fullscreen,
    Minimized,
    Hidden,
}

pub type Transform = [[f32; 4]; 4];

pub const IDENTITY_TRANSFORM: Transform = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Fields every Container variant carries, factored out so the common
/// accessors (`logical_area`, `parent`, `transform`, ...) don't need a full
/// match in every caller.
#[derive(Debug, Clone)]
pub struct CommonState {
    pub parent: Option<ContainerId>,
    pub logical_area: Rectangle,
    pub visible_area: Rectangle,
    pub transform: Transform,
}

impl Default for CommonState {
    fn default() -> Self {
        Self {
            parent: None,
            logical_area: Rectangle::default(),
            visible_area: Rectangle::default(),
            transform: IDENTITY_TRANSFORM,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeafState {
    pub common: CommonState,
    pub window: WindowHandle,
    pub state: SizingMode,
    pub saved_rect: Option<Rectangle>,
}

#[derive(Debug, Clone)]
pub struct ParentState {
    pub common: CommonState,
    pub children: Vec<ContainerId>,
    /// Main-axis share of each child, parallel to `children`, normalized to
    /// sum to 1.0. Insertion and resize mutate these directly; layout
    /// multiplies by the available extent and gives any rounding slack to
    /// the last child (spec invariant 3).
    pub child_weights: Vec<f64>,
    pub direction: LayoutDirection,
    pub default_direction: LayoutDirection,
    pub focused_child: Option<ContainerId>,
}

#[derive(Debug, Clone)]
pub struct FloatingWindowState {
    pub common: CommonState,
    pub window: WindowHandle,
    pub pinned: bool,
    pub saved_rect: Option<Rectangle>,
}

#[derive(Debug, Clone)]
pub struct FloatingTreeState {
    pub common: CommonState,
    pub tree: Box<crate::tree::TilingWindowTree>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupState {
    pub common: CommonState,
    pub members: Vec<ContainerId>,
}

#[derive(Debug, Clone)]
pub struct ShellState {
    pub common: CommonState,
    pub window: WindowHandle,
}

#[derive(Debug, Clone)]
pub enum Container {
    Leaf(LeafState),
    Parent(ParentState),
    FloatingWindow(FloatingWindowState),
    FloatingTree(FloatingTreeState),
    Group(GroupState),
    Shell(ShellState),
}

impl Container {
    pub fn new_leaf(window: WindowHandle) -> Self {
        Container::Leaf(LeafState {
            common: CommonState::default(),
            window,
            state: SizingMode::Restored,
            saved_rect: None,
        })
    }

    pub fn new_parent(direction: LayoutDirection) -> Self {
        Container::Parent(ParentState {
            common: CommonState::default(),
            children: Vec::new(),
            direction,
            default_direction: direction,
            focused_child: None,
        })
    }

    pub fn new_floating_window(window: WindowHandle) -> Self {
        Container::FloatingWindow(FloatingWindowState {
            common: CommonState::default(),
            window,
            pinned: false,
            saved_rect: None,
        })
    }

    pub fn new_shell(window: WindowHandle) -> Self {
        Container::Shell(ShellState {
            common: CommonState::default(),
            window,
        })
    }

    pub fn common(&self) -> &CommonState {
        match self {
            Container::Leaf(s) => &s.common,
            Container::Parent(s) => &s.common,
            Container::FloatingWindow(s) => &s.common,
            Container::FloatingTree(s) => &s.common,
            Container::Group(s) => &s.common,
            Container::Shell(s) => &s.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut CommonState {
        match self {
            Container::Leaf(s) => &mut s.common,
            Container::Parent(s) => &mut s.common,
            Container::FloatingWindow(s) => &mut s.common,
            Container::FloatingTree(s) => &mut s.common,
            Container::Group(s) => &mut s.common,
            Container::Shell(s) => &mut s.common,
        }
    }

    pub fn parent(&self) -> Option<ContainerId> {
        self.common().parent
    }

    pub fn set_parent(&mut self, parent: Option<ContainerId>) {
        self.common_mut().parent = parent;
    }

    pub fn logical_area(&self) -> Rectangle {
        self.common().logical_area
    }

    pub fn visible_area(&self) -> Rectangle {
        self.common().visible_area
    }

    pub fn transform(&self) -> Transform {
        self.common().transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.common_mut().transform = transform;
    }

    pub fn window_handle(&self) -> Option<WindowHandle> {
        match self {
            Container::Leaf(s) => Some(s.window),
            Container::FloatingWindow(s) => Some(s.window),
            Container::Shell(s) => Some(s.window),
            Container::Parent(_) | Container::FloatingTree(_) | Container::Group(_) => None,
        }
    }

    pub fn as_parent(&self) -> Option<&ParentState> {
        match self {
            Container::Parent(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_parent_mut(&mut self) -> Option<&mut ParentState> {
        match self {
            Container::Parent(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafState> {
        match self {
            Container::Leaf(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafState> {
        match self {
            Container::Leaf(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Container::Leaf(_))
    }

    /// Every Container may be `pinned`, but only Floating variants accept it
    /// (spec §4.A: "rejects on tiled"). Returns `false` when rejected.
    pub fn set_pinned(&mut self, pinned: bool) -> bool {
        match self {
            Container::FloatingWindow(s) => {
                s.pinned = pinned;
                true
            }
            _ => false,
        }
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, Container::FloatingWindow(s) if s.pinned)
    }
}

pub type ContainerArena = SlotMap<ContainerId, Container>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_is_rejected_on_non_floating() {
        let mut leaf = Container::new_leaf(WindowHandle(1));
        assert!(!leaf.set_pinned(true));

        let mut float = Container::new_floating_window(WindowHandle(2));
        assert!(float.set_pinned(true));
        assert!(float.is_pinned());
    }

    #[test]
    fn new_parent_starts_empty_with_default_direction() {
        let parent = Container::new_parent(LayoutDirection::Horizontal);
        let p = parent.as_parent().unwrap();
        assert!(p.children.is_empty());
        assert_eq!(p.default_direction, LayoutDirection::Horizontal);
    }
}
