//! `TilingWindowTree`: the per-workspace arena of [`Container`]s plus the
//! insertion/move/resize/select/fullscreen algorithms that decide every
//! window's rectangle.
//!
//! One tree backs a `Workspace`'s root layout; a `FloatingTree` container
//! also owns one of these, nested inside a free-floating rectangle.

use crate::container::{
    Container, ContainerArena, ContainerId, LayoutDirection, SizingMode, WindowHandle,
};
use crate::error::invariant_violation;
use crate::geometry::{Axis, Direction, Rectangle};

/// Minimum extent (px) a sibling may be resized down to, per spec §4.B step 2.
pub const MIN_EXTENT: i32 = 50;

#[derive(Debug, Clone)]
pub struct TilingWindowTree {
    arena: ContainerArena,
    root: ContainerId,
    focused: Option<ContainerId>,
    fullscreen: Option<ContainerId>,
}

impl TilingWindowTree {
    pub fn new(area: Rectangle, default_direction: LayoutDirection) -> Self {
        let mut arena: ContainerArena = ContainerArena::default();
        let mut root_container = Container::new_parent(default_direction);
        root_container.common_mut().logical_area = area;
        root_container.common_mut().visible_area = area;
        let root = arena.insert(root_container);
        Self {
            arena,
            root,
            focused: None,
            fullscreen: None,
        }
    }

    fn root_id(&self) -> ContainerId {
        self.root
    }

    pub fn root(&self) -> ContainerId {
        self.root_id()
    }

    pub fn arena(&self) -> &ContainerArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut ContainerArena {
        &mut self.arena
    }

    pub fn get(&self, id: ContainerId) -> Option<&Container> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.arena.get_mut(id)
    }

    pub fn focused(&self) -> Option<ContainerId> {
        self.focused
    }

    pub fn set_focused(&mut self, id: Option<ContainerId>) {
        self.focused = id;
    }

    pub fn fullscreen_leaf(&self) -> Option<ContainerId> {
        self.fullscreen
    }

    pub fn is_empty(&self) -> bool {
        self.arena
            .get(self.root_id())
            .and_then(Container::as_parent)
            .is_some_and(|p| p.children.is_empty())
    }

    /// Resolve the insertion Parent: the Parent of the focused Leaf, or the
    /// root if nothing is focused (spec §4.B step 1).
    fn insertion_parent(&self) -> ContainerId {
        self.focused()
            .and_then(|id| self.arena.get(id))
            .and_then(Container::parent)
            .unwrap_or_else(|| self.root_id())
    }

    /// Insert a new window as a Leaf under the insertion Parent, splitting
    /// its main-axis share with existing siblings per spec §4.B.
    pub fn insert_window(&mut self, window: WindowHandle) -> ContainerId {
        let parent_id = self.insertion_parent();
        let leaf = self.arena.insert(Container::new_leaf(window));

        let focused_sibling = self.focused().filter(|&f| {
            self.arena.get(f).and_then(Container::parent) == Some(parent_id)
        });

        {
            let parent = self
                .arena
                .get_mut(parent_id)
                .and_then(Container::as_parent_mut)
                .unwrap_or_else(|| invariant_violation("insertion parent is not a Parent"));
            let n = parent.children.len();
            let new_share = 1.0 / (n as f64 + 1.0);
            for w in parent.child_weights.iter_mut() {
                *w *= 1.0 - new_share;
            }
            let index = focused_sibling
                .and_then(|f| parent.children.iter().position(|&c| c == f))
                .map(|i| i + 1)
                .unwrap_or(parent.children.len());
            parent.children.insert(index, leaf);
            parent.child_weights.insert(index, new_share);
            parent.focused_child = Some(leaf);
        }
        self.arena.get_mut(leaf).unwrap().set_parent(Some(parent_id));
        self.set_focused(Some(leaf));
        self.recompute_layout(parent_id);
        leaf
    }

    /// Remove a container (a Leaf closing, or any subtree being detached)
    /// from its parent, applying invariant-2 collapse. Returns whether the
    /// container was found and removed.
    pub fn remove(&mut self, id: ContainerId) -> bool {
        let Some(parent_id) = self.arena.get(id).and_then(Container::parent) else {
            return false;
        };
        self.detach_from_parent(id, parent_id);
        self.arena.remove(id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        if self.fullscreen == Some(id) {
            self.fullscreen = None;
        }
        self.collapse_from(parent_id);
        true
    }

    fn detach_from_parent(&mut self, child: ContainerId, parent_id: ContainerId) {
        let parent = self
            .arena
            .get_mut(parent_id)
            .and_then(Container::as_parent_mut)
            .unwrap_or_else(|| invariant_violation("parent reference does not point at a Parent"));
        if let Some(idx) = parent.children.iter().position(|&c| c == child) {
            parent.children.remove(idx);
            let freed = parent.child_weights.remove(idx);
            let remaining: f64 = parent.child_weights.iter().sum();
            if remaining > 0.0 {
                for w in parent.child_weights.iter_mut() {
                    *w += *w / remaining * freed;
                }
            }
            if parent.focused_child == Some(child) {
                parent.focused_child = parent.children.first().copied();
            }
        } else {
            invariant_violation("leaf's parent does not list it");
        }
    }

    /// Invariant 2: an emptied non-root Parent is removed from its own
    /// parent (recursing upward); a Parent left with exactly one Parent
    /// child collapses, absorbing the grandchild's children and direction.
    fn collapse_from(&mut self, id: ContainerId) {
        if id == self.root_id() {
            self.recompute_layout(id);
            return;
        }
        let Some(parent) = self.arena.get(id).and_then(Container::as_parent) else {
            return;
        };
        if parent.children.is_empty() {
            let grandparent = self
                .arena
                .get(id)
                .and_then(Container::parent)
                .unwrap_or_else(|| invariant_violation("non-root Parent has no parent"));
            self.detach_from_parent(id, grandparent);
            self.arena.remove(id);
            if self.focused == Some(id) {
                self.focused = None;
            }
            self.collapse_from(grandparent);
        } else if parent.children.len() == 1 {
            let only_child = parent.children[0];
            if let Some(Container::Parent(_)) = self.arena.get(only_child) {
                self.absorb_only_child(id, only_child);
            }
            self.recompute_layout(id);
        } else {
            self.recompute_layout(id);
        }
    }

    /// Replaces `parent_id`'s contents with its sole Parent child's
    /// contents in place, preserving the child's direction (spec invariant
    /// 2) so `parent_id`'s `ContainerId` (and anything still referencing
    /// it, e.g. focus) keeps pointing at a live node.
    fn absorb_only_child(&mut self, parent_id: ContainerId, only_child: ContainerId) {
        let child_state = match self.arena.remove(only_child) {
            Some(Container::Parent(s)) => s,
            _ => invariant_violation("absorbed child vanished or was not a Parent"),
        };
        for &grandchild in &child_state.children {
            self.arena
                .get_mut(grandchild)
                .unwrap_or_else(|| invariant_violation("collapsing parent's child vanished"))
                .set_parent(Some(parent_id));
        }
        let parent = self
            .arena
            .get_mut(parent_id)
            .and_then(Container::as_parent_mut)
            .unwrap_or_else(|| invariant_violation("parent vanished during collapse"));
        parent.children = child_state.children;
        parent.child_weights = child_state.child_weights;
        parent.direction = child_state.direction;
        parent.focused_child = child_state.focused_child;
        if self.focused == Some(only_child) {
            self.focused = Some(parent_id);
        }
    }

    /// Recomputes logical (and visible) areas for `id` and its whole
    /// subtree, per spec invariant 3: sibling extents tile the parent's
    /// visible area along its split axis; the last sibling absorbs
    /// rounding slack.
    pub fn recompute_layout(&mut self, id: ContainerId) {
        let area = self
            .arena
            .get(id)
            .map(Container::logical_area)
            .unwrap_or_else(|| invariant_violation("recompute_layout on missing container"));
        self.set_logical_area(id, area);
    }

    pub fn set_logical_area(&mut self, id: ContainerId, area: Rectangle) {
        let Some(container) = self.arena.get_mut(id) else {
            return;
        };
        container.common_mut().logical_area = area;
        container.common_mut().visible_area = area;

        let Container::Parent(parent) = container else {
            return;
        };
        let direction = parent.direction;
        let children = parent.children.clone();
        let weights = parent.child_weights.clone();
        if children.is_empty() {
            return;
        }

        if !direction.tiles_children_side_by_side() {
            // Stacked/Tabbed: every child gets the full content rectangle.
            for &child in &children {
                self.set_logical_area(child, area);
            }
            return;
        }

        let axis = direction.axis();
        let extent = match axis {
            Axis::Horizontal => area.width,
            Axis::Vertical => area.height,
        };
        let mut offset = match axis {
            Axis::Horizontal => area.x,
            Axis::Vertical => area.y,
        };
        let mut used = 0;
        let last = children.len() - 1;
        for (i, &child) in children.iter().enumerate() {
            let child_extent = if i == last {
                extent - used
            } else {
                let w = (extent as f64 * weights.get(i).copied().unwrap_or(0.0)).floor() as i32;
                used += w;
                w
            };
            let child_rect = match axis {
                Axis::Horizontal => Rectangle::new(offset, area.y, child_extent, area.height),
                Axis::Vertical => Rectangle::new(area.x, offset, area.width, child_extent),
            };
            offset += child_extent;
            self.set_logical_area(child, child_rect);
        }
    }

    /// Applies gap subtraction to every Leaf's `visible_area`, per spec
    /// invariant 5: a Leaf's visible area is its logical area minus
    /// half-gaps on sides that border a sibling Leaf, and the outer gap on
    /// sides that border the workspace edge.
    pub fn apply_gaps(&mut self, output_area: Rectangle, inner_x: i32, inner_y: i32, outer_x: i32, outer_y: i32) {
        self.apply_gaps_rec(self.root_id(), output_area, inner_x, inner_y, outer_x, outer_y);
    }

    fn apply_gaps_rec(
        &mut self,
        id: ContainerId,
        output_area: Rectangle,
        inner_x: i32,
        inner_y: i32,
        outer_x: i32,
        outer_y: i32,
    ) {
        let Some(container) = self.arena.get(id) else { return };
        let children: Vec<ContainerId> = match container {
            Container::Parent(p) => p.children.clone(),
            _ => {
                let area = container.logical_area();
                let touches_left = area.x <= output_area.x;
                let touches_top = area.y <= output_area.y;
                let touches_right = area.right() >= output_area.right();
                let touches_bottom = area.bottom() >= output_area.bottom();
                let half_x = (inner_x + 1) / 2;
                let half_y = (inner_y + 1) / 2;
                let outer_shrunk = area.shrink_by_gaps(
                    outer_x, outer_y, touches_left, touches_right, touches_top, touches_bottom,
                );
                let visible = outer_shrunk.shrink_by_gaps(
                    half_x, half_y, !touches_left, !touches_right, !touches_top, !touches_bottom,
                );
                self.arena.get_mut(id).unwrap().common_mut().visible_area = visible;
                return;
            }
        };
        for child in children {
            self.apply_gaps_rec(child, output_area, inner_x, inner_y, outer_x, outer_y);
        }
    }

    /// Split promotion: a Leaf under a Parent with direction `d` requests
    /// direction `d'` != `d`. If the Leaf has siblings, wraps it in a new
    /// Parent of direction `d'`; otherwise just changes the existing
    /// Parent's direction (matching the §4.A table: "otherwise sets Parent
    /// direction").
    pub fn request_layout(&mut self, leaf_id: ContainerId, requested: LayoutDirection) {
        let Some(parent_id) = self.arena.get(leaf_id).and_then(Container::parent) else {
            return;
        };
        let Some(parent) = self.arena.get(parent_id).and_then(Container::as_parent) else {
            return;
        };
        if parent.direction == requested {
            return;
        }
        if parent.children.len() == 1 {
            let parent_mut = self.arena.get_mut(parent_id).and_then(Container::as_parent_mut).unwrap();
            parent_mut.direction = requested;
            self.recompute_layout(parent_id);
            return;
        }

        let area = self.arena.get(leaf_id).unwrap().logical_area();
        let mut new_parent = Container::new_parent(requested);
        if let Container::Parent(p) = &mut new_parent {
            p.common.logical_area = area;
            p.common.visible_area = area;
            p.children.push(leaf_id);
            p.child_weights.push(1.0);
            p.focused_child = Some(leaf_id);
        }
        let new_parent_id = self.arena.insert(new_parent);

        let old_parent = self.arena.get_mut(parent_id).and_then(Container::as_parent_mut).unwrap();
        let idx = old_parent
            .children
            .iter()
            .position(|&c| c == leaf_id)
            .unwrap_or_else(|| invariant_violation("leaf's parent does not list it"));
        old_parent.children[idx] = new_parent_id;
        if old_parent.focused_child == Some(leaf_id) {
            old_parent.focused_child = Some(new_parent_id);
        }

        self.arena.get_mut(new_parent_id).unwrap().set_parent(Some(parent_id));
        self.arena.get_mut(leaf_id).unwrap().set_parent(Some(new_parent_id));
        if self.focused == Some(leaf_id) {
            // Focus stays on the Leaf; only its parent chain changed.
        }
        self.recompute_layout(parent_id);
    }

    pub fn toggle_layout(&mut self, leaf_id: ContainerId) {
        let Some(parent_id) = self.arena.get(leaf_id).and_then(Container::parent) else {
            return;
        };
        let current = self
            .arena
            .get(parent_id)
            .and_then(Container::as_parent)
            .map(|p| p.direction)
            .unwrap_or(LayoutDirection::Horizontal);
        let next = match current {
            LayoutDirection::Horizontal => LayoutDirection::Vertical,
            LayoutDirection::Vertical => LayoutDirection::Horizontal,
            LayoutDirection::Stacked => LayoutDirection::Tabbed,
            LayoutDirection::Tabbed => LayoutDirection::Stacked,
        };
        self.request_layout(leaf_id, next);
    }

    /// `select_next`: ascend from `id`, find the nearest ancestor whose
    /// direction aligns with `d`'s axis with a sibling in that direction,
    /// then descend into that sibling to a Leaf (spec §4.B).
    pub fn select_next(&self, id: ContainerId, d: Direction) -> Option<ContainerId> {
        let mut current = id;
        loop {
            let parent_id = self.arena.get(current).and_then(Container::parent)?;
            let parent = self.arena.get(parent_id).and_then(Container::as_parent)?;
            if parent.direction.axis() == d.axis() && parent.direction.tiles_children_side_by_side() {
                let idx = parent.children.iter().position(|&c| c == current)?;
                let sibling_idx = if d.is_positive() {
                    if idx + 1 < parent.children.len() { Some(idx + 1) } else { None }
                } else if idx > 0 {
                    Some(idx - 1)
                } else {
                    None
                };
                if let Some(sibling_idx) = sibling_idx {
                    let sibling = parent.children[sibling_idx];
                    return Some(self.descend_toward(sibling, d));
                }
            }
            current = parent_id;
        }
    }

    /// Descends from `id` to a Leaf, at each Parent picking the child
    /// closest to the edge being moved toward (spec: "last child on the
    /// axis when moving toward that edge, first otherwise").
    fn descend_toward(&self, mut id: ContainerId, d: Direction) -> ContainerId {
        loop {
            match self.arena.get(id) {
                Some(Container::Parent(p)) if !p.children.is_empty() => {
                    id = if p.direction.axis() == d.axis() && p.direction.tiles_children_side_by_side() {
                        if d.is_positive() {
                            *p.children.first().unwrap()
                        } else {
                            *p.children.last().unwrap()
                        }
                    } else {
                        p.focused_child.unwrap_or(p.children[0])
                    };
                }
                _ => return id,
            }
        }
    }

    /// Move `source` in direction `d` (spec §4.B 4-step algorithm).
    /// Returns `false` if there was nowhere to move it (rejected).
    pub fn move_direction(&mut self, source: ContainerId, d: Direction) -> bool {
        let Some(target) = self.select_next(source, d) else {
            return self.move_to_root_edge(source, d);
        };
        let source_parent = self.arena.get(source).and_then(Container::parent);
        let target_parent = self.arena.get(target).and_then(Container::parent);

        if source_parent == target_parent {
            let Some(parent_id) = source_parent else { return false };
            let parent = self.arena.get_mut(parent_id).and_then(Container::as_parent_mut).unwrap();
            let si = parent.children.iter().position(|&c| c == source).unwrap();
            let ti = parent.children.iter().position(|&c| c == target).unwrap();
            parent.children.swap(si, ti);
            parent.child_weights.swap(si, ti);
            self.recompute_layout(parent_id);
            return true;
        }

        let Some(target_parent) = target_parent else { return false };
        let old_parent = source_parent.unwrap_or_else(|| invariant_violation("source has no parent"));
        self.detach_from_parent(source, old_parent);
        let index_after_target = {
            let tp = self.arena.get(target_parent).and_then(Container::as_parent).unwrap();
            tp.children.iter().position(|&c| c == target).map(|i| i + 1).unwrap_or(tp.children.len())
        };
        self.graft(source, target_parent, index_after_target);
        self.collapse_from(old_parent);
        true
    }

    /// Step 4: the edge-of-tree case. If the root's direction matches `d`'s
    /// axis, prepend/append `source` at the root; otherwise reject.
    fn move_to_root_edge(&mut self, source: ContainerId, d: Direction) -> bool {
        let root = self.root_id();
        if source == root {
            return false;
        }
        let root_direction = self
            .arena
            .get(root)
            .and_then(Container::as_parent)
            .map(|p| p.direction);
        if root_direction != Some(LayoutDirection::from_axis(d.axis())) {
            return false;
        }
        let Some(old_parent) = self.arena.get(source).and_then(Container::parent) else {
            return false;
        };
        if old_parent == root {
            // Already a direct root child; a reorder within root via swap
            // with the edge-most sibling is the natural reading of "append
            // at the root edge" when source is already there.
            let parent = self.arena.get_mut(root).and_then(Container::as_parent_mut).unwrap();
            if parent.children.len() < 2 {
                return false;
            }
            let si = parent.children.iter().position(|&c| c == source).unwrap();
            let edge = if d.is_positive() { parent.children.len() - 1 } else { 0 };
            if si == edge {
                return false;
            }
            parent.children.swap(si, edge);
            parent.child_weights.swap(si, edge);
            self.recompute_layout(root);
            return true;
        }
        self.detach_from_parent(source, old_parent);
        let index = if d.is_positive() {
            self.arena.get(root).and_then(Container::as_parent).unwrap().children.len()
        } else {
            0
        };
        self.graft(source, root, index);
        self.collapse_from(old_parent);
        true
    }

    fn graft(&mut self, child: ContainerId, new_parent: ContainerId, index: usize) {
        let parent = self.arena.get_mut(new_parent).and_then(Container::as_parent_mut).unwrap();
        let n = parent.children.len();
        let share = 1.0 / (n as f64 + 1.0);
        for w in parent.child_weights.iter_mut() {
            *w *= 1.0 - share;
        }
        parent.children.insert(index.min(parent.children.len()), child);
        parent.child_weights.insert(index.min(parent.child_weights.len()), share);
        parent.focused_child = Some(child);
        self.arena.get_mut(child).unwrap().set_parent(Some(new_parent));
        self.recompute_layout(new_parent);
    }

    /// Resize `source`'s main-axis extent by `amount` in direction `d`
    /// (spec §4.B resize algorithm). Returns `false` if rejected.
    pub fn resize(&mut self, source: ContainerId, d: Direction, amount: i32) -> bool {
        let mut current = source;
        loop {
            let Some(parent_id) = self.arena.get(current).and_then(Container::parent) else {
                return false;
            };
            let aligned = self
                .arena
                .get(parent_id)
                .and_then(Container::as_parent)
                .is_some_and(|p| p.direction.axis() == d.axis() && p.children.len() >= 2);
            if aligned {
                return self.resize_within(parent_id, current, d, amount);
            }
            current = parent_id;
        }
    }

    fn resize_within(&mut self, parent_id: ContainerId, child: ContainerId, d: Direction, amount: i32) -> bool {
        let parent = self.arena.get(parent_id).and_then(Container::as_parent).unwrap();
        let extent = match parent.direction.axis() {
            Axis::Horizontal => parent.logical_area().width,
            Axis::Vertical => parent.logical_area().height,
        };
        let idx = parent.children.iter().position(|&c| c == child).unwrap();
        let n = parent.children.len();
        let signed_amount = if d.is_positive() { amount } else { -amount };
        let delta_weight = signed_amount as f64 / extent as f64;

        let current_extents: Vec<i32> = parent
            .child_weights
            .iter()
            .map(|w| (extent as f64 * w) as i32)
            .collect();
        if current_extents[idx] + signed_amount < MIN_EXTENT {
            return false;
        }
        let others: Vec<usize> = (0..n).filter(|&i| i != idx).collect();
        let other_total: i32 = others.iter().map(|&i| current_extents[i]).sum();
        if other_total == 0 {
            return false;
        }
        for &i in &others {
            let share_of_shrink = current_extents[i] as f64 / other_total as f64;
            let shrink = signed_amount as f64 * share_of_shrink;
            if current_extents[i] as f64 - shrink < MIN_EXTENT as f64 {
                return false;
            }
        }

        let parent = self.arena.get_mut(parent_id).and_then(Container::as_parent_mut).unwrap();
        parent.child_weights[idx] += delta_weight;
        for &i in &others {
            let share_of_shrink = current_extents[i] as f64 / other_total as f64;
            parent.child_weights[i] -= delta_weight * share_of_shrink;
        }
        self.recompute_layout(parent_id);
        true
    }

    /// Toggles fullscreen on a Leaf. Entering fullscreen records the prior
    /// rectangle (already held in `logical_area`, left untouched) and kicks
    /// out any other fullscreen Leaf on this tree, since at most one may be
    /// visible per Workspace (spec §4.B).
    pub fn toggle_fullscreen(&mut self, leaf_id: ContainerId) {
        let Some(leaf) = self.arena.get_mut(leaf_id).and_then(Container::as_leaf_mut) else {
            return;
        };
        if leaf.state == SizingMode::Fullscreen {
            leaf.state = SizingMode::Restored;
            self.fullscreen = None;
        } else {
            leaf.state = SizingMode::Fullscreen;
            if let Some(prev) = self.fullscreen.take() {
                if let Some(prev_leaf) = self.arena.get_mut(prev).and_then(Container::as_leaf_mut) {
                    prev_leaf.state = SizingMode::Restored;
                }
            }
            self.fullscreen = Some(leaf_id);
        }
    }

    /// Sweeps a Group's member list, dropping references to containers
    /// that no longer exist in this tree (spec invariant 5).
    pub fn sweep_group(&self, members: &mut Vec<ContainerId>) {
        members.retain(|&id| self.arena.contains_key(id));
    }

    /// Depth-first walk, parents before children, used by IPC tree
    /// serialization.
    pub fn walk(&self, mut visit: impl FnMut(ContainerId, &Container)) {
        fn rec(tree: &TilingWindowTree, id: ContainerId, visit: &mut dyn FnMut(ContainerId, &Container)) {
            let Some(c) = tree.arena.get(id) else { return };
            visit(id, c);
            if let Container::Parent(p) = c {
                for &child in &p.children {
                    rec(tree, child, visit);
                }
            }
        }
        rec(self, self.root_id(), &mut visit);
    }

    pub fn all_leaves(&self) -> Vec<ContainerId> {
        let mut out = Vec::new();
        self.walk(|id, c| {
            if c.is_leaf() {
                out.push(id);
            }
        });
        out
    }
}

impl LayoutDirection {
    fn from_axis(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => LayoutDirection::Horizontal,
            Axis::Vertical => LayoutDirection::Vertical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::WindowHandle;

    fn root_area() -> Rectangle {
        Rectangle::new(0, 0, 1280, 720)
    }

    #[test]
    fn scenario_1_single_window_fills_root() {
        let mut tree = TilingWindowTree::new(root_area(), LayoutDirection::Horizontal);
        let leaf = tree.insert_window(WindowHandle(1));
        assert_eq!(tree.get(leaf).unwrap().logical_area(), Rectangle::new(0, 0, 1280, 720));
    }

    #[test]
    fn scenario_2_two_windows_split_horizontally() {
        let mut tree = TilingWindowTree::new(root_area(), LayoutDirection::Horizontal);
        let a = tree.insert_window(WindowHandle(1));
        let b = tree.insert_window(WindowHandle(2));
        assert_eq!(tree.get(a).unwrap().logical_area(), Rectangle::new(0, 0, 640, 720));
        assert_eq!(tree.get(b).unwrap().logical_area(), Rectangle::new(640, 0, 640, 720));
    }

    #[test]
    fn scenario_3_vertical_split_promotion() {
        let mut tree = TilingWindowTree::new(root_area(), LayoutDirection::Horizontal);
        let _a = tree.insert_window(WindowHandle(1));
        let b = tree.insert_window(WindowHandle(2));
        tree.request_layout(b, LayoutDirection::Vertical);
        let c = tree.insert_window(WindowHandle(3));

        let leaves = tree.all_leaves();
        assert_eq!(leaves.len(), 3);
        assert_eq!(tree.get(b).unwrap().logical_area(), Rectangle::new(640, 0, 640, 360));
        assert_eq!(tree.get(c).unwrap().logical_area(), Rectangle::new(640, 360, 640, 360));
    }

    #[test]
    fn scenario_4_closing_collapses_redundant_parent() {
        let mut tree = TilingWindowTree::new(root_area(), LayoutDirection::Horizontal);
        let a = tree.insert_window(WindowHandle(1));
        let b = tree.insert_window(WindowHandle(2));
        tree.request_layout(b, LayoutDirection::Vertical);
        let c = tree.insert_window(WindowHandle(3));

        tree.remove(a);

        assert_eq!(tree.get(b).unwrap().logical_area(), Rectangle::new(0, 0, 1280, 360));
        assert_eq!(tree.get(c).unwrap().logical_area(), Rectangle::new(0, 360, 1280, 360));
        let root = tree.get(tree.root()).unwrap().as_parent().unwrap();
        assert_eq!(root.direction, LayoutDirection::Vertical);
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn resize_leftmost_child_of_horizontal_root_rejected() {
        let mut tree = TilingWindowTree::new(root_area(), LayoutDirection::Horizontal);
        let a = tree.insert_window(WindowHandle(1));
        let _b = tree.insert_window(WindowHandle(2));
        assert!(!tree.resize(a, Direction::Left, 50));
    }

    #[test]
    fn move_up_on_roots_only_child_rejected() {
        let mut tree = TilingWindowTree::new(root_area(), LayoutDirection::Horizontal);
        let a = tree.insert_window(WindowHandle(1));
        assert!(!tree.move_direction(a, Direction::Up));
    }

    #[test]
    fn move_right_then_left_restores_original_tree() {
        let mut tree = TilingWindowTree::new(root_area(), LayoutDirection::Horizontal);
        let a = tree.insert_window(WindowHandle(1));
        let b = tree.insert_window(WindowHandle(2));
        let before: Vec<_> = tree.all_leaves();

        assert!(tree.move_direction(a, Direction::Right));
        assert!(tree.move_direction(b, Direction::Left));

        let after: Vec<_> = tree.all_leaves();
        assert_eq!(before, after);
        assert_eq!(tree.get(a).unwrap().logical_area(), Rectangle::new(0, 0, 640, 720));
    }

    #[test]
    fn toggle_fullscreen_is_idempotent_pair() {
        let mut tree = TilingWindowTree::new(root_area(), LayoutDirection::Horizontal);
        let a = tree.insert_window(WindowHandle(1));
        let before = tree.get(a).unwrap().logical_area();
        tree.toggle_fullscreen(a);
        assert!(tree.fullscreen_leaf().is_some());
        tree.toggle_fullscreen(a);
        assert!(tree.fullscreen_leaf().is_none());
        assert_eq!(tree.get(a).unwrap().logical_area(), before);
    }

    #[test]
    fn entering_fullscreen_on_new_leaf_restores_previous() {
        let mut tree = TilingWindowTree::new(root_area(), LayoutDirection::Horizontal);
        let a = tree.insert_window(WindowHandle(1));
        let b = tree.insert_window(WindowHandle(2));
        tree.toggle_fullscreen(a);
        tree.toggle_fullscreen(b);
        assert_eq!(tree.fullscreen_leaf(), Some(b));
        assert_eq!(tree.get(a).unwrap().as_leaf().unwrap().state, SizingMode::Restored);
    }

    #[test]
    fn adding_three_windows_sums_exactly_to_root_width() {
        let mut tree = TilingWindowTree::new(root_area(), LayoutDirection::Horizontal);
        tree.insert_window(WindowHandle(1));
        tree.insert_window(WindowHandle(2));
        tree.insert_window(WindowHandle(3));
        let total: i32 = tree.all_leaves().iter().map(|&id| tree.get(id).unwrap().logical_area().width).sum();
        assert_eq!(total, 1280);
    }

    #[test]
    fn select_next_walks_up_and_down_the_tree() {
        let mut tree = TilingWindowTree::new(root_area(), LayoutDirection::Horizontal);
        let a = tree.insert_window(WindowHandle(1));
        let b = tree.insert_window(WindowHandle(2));
        assert_eq!(tree.select_next(a, Direction::Right), Some(b));
        assert_eq!(tree.select_next(b, Direction::Left), Some(a));
        assert_eq!(tree.select_next(a, Direction::Left), None);
    }
}
