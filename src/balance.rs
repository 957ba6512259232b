// =============================================================================
// Red-black rebalancing
// =============================================================================
//
// A node is red exactly when the link pointing at it is red. All routines work
// bottom-up over a recorded `Path`, since nodes carry no parent index. The
// anchor is treated as black and is never rotated; the root link is kept black.

use crate::arena::{Arena, Link, Path, LEFT, RIGHT};
use crate::{Augment, SlotIndex};

impl<K, V, I: SlotIndex, A: Augment> Arena<K, V, I, A> {
    /// Restores the red-black invariants after a red leaf was linked below
    /// the last entry of `path`.
    ///
    /// Subtree sizes along `path` must already count the new leaf.
    pub(crate) fn fix_insert(&mut self, path: &Path<I>) {
        let mut top = path.len();

        // The link out of path[top - 1] is red. Stop once its source is the
        // root or the anchor: the root is black by definition.
        while top >= 3 {
            let (parent, parent_dir) = path[top - 1];
            let (grand, grand_dir) = path[top - 2];
            let (above, above_dir) = path[top - 3];

            if !self.link(grand, grand_dir).red {
                break;
            }

            let inv = grand_dir ^ 1;
            let uncle = self.node(grand).children[inv];
            if uncle.red {
                // Push the red up two levels.
                let g = self.node_mut(grand);
                g.children[LEFT].red = false;
                g.children[RIGHT].red = false;
                if top > 3 {
                    self.link_mut(above, above_dir).red = true;
                }
                top -= 2;
                continue;
            }

            if parent_dir == grand_dir {
                // Outer child: single rotation, parent takes grand's place.
                let inner = self.node(parent).children[inv];
                self.node_mut(grand).children[grand_dir] = inner;
                self.node_mut(parent).children[inv] = Link::red(grand);
                *self.link_mut(above, above_dir) = Link::black(parent);
                self.update_size(grand);
                self.update_size(parent);
            } else {
                // Inner child: double rotation, child takes grand's place.
                let child = self.node(parent).children[parent_dir].index;
                let [toward, away] = {
                    let c = self.node(child);
                    [c.children[grand_dir], c.children[inv]]
                };
                self.node_mut(grand).children[grand_dir] = away;
                self.node_mut(parent).children[parent_dir] = toward;
                let c = self.node_mut(child);
                c.children[inv] = Link::red(grand);
                c.children[grand_dir] = Link::red(parent);
                *self.link_mut(above, above_dir) = Link::black(child);
                self.update_size(grand);
                self.update_size(parent);
                self.update_size(child);
            }
            break;
        }

        self.link_mut(I::ZERO, RIGHT).red = false;
    }

    /// Detaches `target` (the child of the last entry of `path`) from the
    /// tree without freeing its slot.
    ///
    /// A node with two children is replaced by its in-order successor, which
    /// is relinked into `target`'s position and inherits its children, color
    /// and size. On return `path` ends at the parent of the vacated link.
    /// Returns whether a black link was lost, i.e. whether
    /// [`fix_remove`](Self::fix_remove) must run.
    pub(crate) fn unlink(&mut self, target: I, path: &mut Path<I>) -> bool {
        let (parent, parent_dir) = path[path.len() - 1];
        let target_link = self.link(parent, parent_dir);
        let [left, right] = self.node(target).children;

        if left.is_none() || right.is_none() {
            let child = if left.is_none() { right } else { left };
            *self.link_mut(parent, parent_dir) = Link::black(child.index);
            return !target_link.red && !child.red;
        }

        let target_pos = path.len();
        path.push((target, RIGHT));
        let mut succ = right.index;
        loop {
            let next = self.node(succ).children[LEFT];
            if next.is_none() {
                break;
            }
            path.push((succ, LEFT));
            succ = next.index;
        }

        let (succ_parent, succ_dir) = path[path.len() - 1];
        let succ_link = self.link(succ_parent, succ_dir);
        let succ_right = self.node(succ).children[RIGHT];
        *self.link_mut(succ_parent, succ_dir) = Link::black(succ_right.index);
        let must_fix = !succ_link.red && !succ_right.red;

        let (children, size) = {
            let t = self.node(target);
            (t.children, t.size)
        };
        let s = self.node_mut(succ);
        s.children = children;
        s.size = size;
        *self.link_mut(parent, parent_dir) = Link {
            index: succ,
            red: target_link.red,
        };
        path[target_pos] = (succ, RIGHT);

        must_fix
    }

    /// Repairs the black-height deficit below the last entry of `path`.
    ///
    /// Subtree sizes along `path` must already exclude the removed node.
    pub(crate) fn fix_remove(&mut self, path: &mut Path<I>) {
        while path.len() >= 2 {
            let (parent, dir) = path[path.len() - 1];
            let (mut above, mut above_dir) = path[path.len() - 2];
            let inv = dir ^ 1;

            let mut sibling = self.node(parent).children[inv];
            debug_assert!(!sibling.is_none(), "deficient side has no sibling");

            if sibling.red {
                // Rotate the red sibling above parent; parent turns red and
                // the new sibling is black.
                let s = sibling.index;
                let near = self.node(s).children[dir];
                self.node_mut(parent).children[inv] = near;
                self.node_mut(s).children[dir] = Link::red(parent);
                *self.link_mut(above, above_dir) = Link::black(s);
                self.update_size(parent);
                self.update_size(s);
                above = s;
                above_dir = dir;
                sibling = near;
            }

            let s = sibling.index;
            let [near, far] = {
                let n = self.node(s);
                [n.children[dir], n.children[inv]]
            };
            let parent_red = self.link(above, above_dir).red;

            if far.red {
                *self.link_mut(above, above_dir) = Link {
                    index: s,
                    red: parent_red,
                };
                self.node_mut(parent).children[inv] = near;
                let sn = self.node_mut(s);
                sn.children[dir] = Link::black(parent);
                sn.children[inv].red = false;
                self.update_size(parent);
                self.update_size(s);
                return;
            }

            if near.red {
                let n = near.index;
                let [n_toward, n_away] = {
                    let nn = self.node(n);
                    [nn.children[dir], nn.children[inv]]
                };
                *self.link_mut(above, above_dir) = Link {
                    index: n,
                    red: parent_red,
                };
                self.node_mut(parent).children[inv] = n_toward;
                self.node_mut(s).children[dir] = n_away;
                let nn = self.node_mut(n);
                nn.children[dir] = Link::black(parent);
                nn.children[inv] = Link::black(s);
                self.update_size(parent);
                self.update_size(s);
                self.update_size(n);
                return;
            }

            // Sibling and both its children are black.
            self.node_mut(parent).children[inv].red = true;
            if parent_red {
                self.link_mut(above, above_dir).red = false;
                return;
            }
            path.pop();
        }
    }
}
