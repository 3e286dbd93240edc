//! Reconciles a freshly parsed tree against the current one after an edit.
//!
//! The smallest similar subtree around the edit is swapped in; every node
//! outside it keeps its id. When no candidate is safe, the whole tree is
//! re-imported.

use tracing::{debug, trace};
use verso_text::TextChange;

use crate::tree::NodeData;
use crate::{NodeId, NodeKind, SyntaxTree};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PatchOutcome {
    /// `old` was replaced by `new`; everything else kept its id.
    Spliced { old: NodeId, new: NodeId, token_diff: i64, line_diff: i64 },
    /// Every node was rebuilt.
    Replaced,
    /// The edit could not be tokenized; the previous tree is still in place.
    Retained,
}

impl PatchOutcome {
    pub fn is_spliced(&self) -> bool {
        matches!(self, Self::Spliced { .. })
    }
}

#[derive(Clone, Copy, Debug)]
struct Splice {
    old: NodeId,
    new: NodeId,
    token_diff: i64,
    line_diff: i64,
}

impl SyntaxTree {
    /// Brings this tree in line with `new_tree`, the parse of the text after
    /// `change`. `edited` is the node that enclosed the removed range before
    /// the edit.
    pub fn patch(&mut self, edited: NodeId, new_tree: Self, change: &TextChange) -> PatchOutcome {
        let new_node = new_tree.find_node_including_span(change.inserted_range());
        let new_parent = new_tree.data(new_node).parent;
        let edited_parent = self.nodes.get(edited).and_then(|node| node.parent);

        let candidates = [
            (Some(new_node), Some(edited)),
            (new_parent, Some(edited)),
            (Some(new_node), edited_parent),
            (new_parent, edited_parent),
        ];

        let splice = candidates.into_iter().find_map(|pair| match pair {
            (Some(new), Some(old)) => self.check(old, &new_tree, new, change),
            _ => None,
        });

        let Some(splice) = splice else {
            debug!(edited = ?edited, "no reusable subtree, replacing tree");
            self.replace(new_tree);
            return PatchOutcome::Replaced;
        };

        debug!(
            old = ?splice.old,
            kind = new_tree.data(splice.new).kind.name(),
            token_diff = splice.token_diff,
            line_diff = splice.line_diff,
            "splicing subtree"
        );
        let new = self.splice(splice, &new_tree);
        self.adopt_root(new_tree);

        PatchOutcome::Spliced {
            old: splice.old,
            new,
            token_diff: splice.token_diff,
            line_diff: splice.line_diff,
        }
    }

    /// Discards every node and imports `new_tree` with fresh ids.
    pub fn replace(&mut self, new_tree: Self) {
        self.remove_subtree(self.root);
        self.root = self.import(&new_tree, new_tree.root, None);
        self.tokens = new_tree.tokens;
        self.text_len = new_tree.text_len;
    }

    /// Decides whether `old` may be swapped for `new`.
    fn check(&self, old: NodeId, new_tree: &Self, new: NodeId, change: &TextChange) -> Option<Splice> {
        let old_data = self.nodes.get(old)?;
        let new_data = new_tree.data(new);

        if !old_data.kind.is_similar(&new_data.kind) {
            return None;
        }
        if old == self.root || new == new_tree.root || !new_tree.is_complete(new) {
            trace!(kind = new_data.kind.name(), "candidate is the root or incomplete");
            return None;
        }
        if old_data.token_base != new_data.token_base || old_data.start_line != new_data.start_line {
            trace!(kind = new_data.kind.name(), "candidate starts elsewhere");
            return None;
        }

        let token_diff = i64::from(new_data.last_token()) - i64::from(old_data.last_token());
        let line_diff = i64::from(new_tree.end_line(new)) - i64::from(self.end_line(old));
        let global_tokens = new_tree.tokens.len() as i64 - self.tokens.len() as i64;
        let global_lines =
            i64::from(new_tree.data(new_tree.root).line_count) - i64::from(self.data(self.root).line_count);
        if token_diff != global_tokens || line_diff != global_lines {
            trace!(token_diff, global_tokens, line_diff, global_lines, "candidate does not account for the edit");
            return None;
        }

        let base = old_data.token_base as usize;
        if self.tokens[..base] != new_tree.tokens[..base] {
            return None;
        }

        let old_suffix = &self.tokens[old_data.last_token() as usize + 1..];
        let new_suffix = &new_tree.tokens[new_data.last_token() as usize + 1..];
        let delta = change.delta();
        let suffix_matches = old_suffix.iter().zip(new_suffix).all(|(old, new)| {
            old.kind == new.kind
                && old.len == new.len
                && i64::from(u32::from(old.start)) + delta == i64::from(u32::from(new.start))
        });
        if !suffix_matches {
            trace!(kind = new_data.kind.name(), "tokens after the candidate changed");
            return None;
        }

        let splice = Splice { old, new, token_diff, line_diff };
        let ancestors: Vec<NodeId> = std::iter::successors(old_data.parent, |&id| self.data(id).parent).collect();
        if !self.outside_matches(self.root, new_tree, new_tree.root, &splice, &ancestors) {
            trace!(kind = new_data.kind.name(), "nodes around the candidate parse differently");
            return None;
        }

        Some(splice)
    }

    /// Walks both trees in parallel outside the spliced subtrees and checks
    /// that every old node, adjusted the way the splice adjusts it, equals its
    /// counterpart in the new tree.
    fn outside_matches(
        &self,
        old: NodeId,
        new_tree: &Self,
        new: NodeId,
        splice: &Splice,
        ancestors: &[NodeId],
    ) -> bool {
        if old == splice.old || new == splice.new {
            return old == splice.old && new == splice.new;
        }

        let old_data = self.data(old);
        let new_data = new_tree.data(new);
        if old_data.closed != new_data.closed || old_data.children.len() != new_data.children.len() {
            return false;
        }

        let same = if old == self.root {
            old_data.kind == new_data.kind
        } else {
            let expected = self.adjusted(old, splice, ancestors.contains(&old));
            expected
                == (new_data.kind, new_data.token_base, new_data.extent, new_data.start_line, new_data.line_count)
        };

        same && old_data
            .children
            .iter()
            .zip(&new_data.children)
            .all(|(&old_child, &new_child)| self.outside_matches(old_child, new_tree, new_child, splice, ancestors))
    }

    /// Kind, token base, extent, start line and line count of `id` once
    /// `splice` has been applied.
    fn adjusted(&self, id: NodeId, splice: &Splice, is_ancestor: bool) -> (NodeKind, u32, u32, u32, u32) {
        let node = self.data(id);
        let old_end = self.data(splice.old).last_token();
        let mut kind = node.kind;

        if is_ancestor {
            kind.shift_slots_from(old_end - node.token_base, splice.token_diff);
            (
                kind,
                node.token_base,
                shift(node.extent, splice.token_diff),
                node.start_line,
                shift(node.line_count, splice.line_diff),
            )
        } else if node.token_base > old_end {
            (
                kind,
                shift(node.token_base, splice.token_diff),
                node.extent,
                shift(node.start_line, splice.line_diff),
                node.line_count,
            )
        } else {
            (kind, node.token_base, node.extent, node.start_line, node.line_count)
        }
    }

    fn splice(&mut self, splice: Splice, new_tree: &Self) -> NodeId {
        let Splice { old, new, token_diff, line_diff } = splice;
        let old_end = self.data(old).last_token();
        let Some(parent) = self.data(old).parent else {
            unreachable!("the root is never spliced");
        };
        let Some(position) = self.data(parent).children.iter().position(|&id| id == old) else {
            unreachable!("a node is always among its parent's children");
        };

        self.remove_subtree(old);
        let new = self.import(new_tree, new, Some(parent));
        self.nodes[parent].children[position] = new;

        if token_diff == 0 && line_diff == 0 {
            return new;
        }

        let mut child = new;
        let mut current = parent;
        loop {
            let later: Vec<NodeId> = {
                let siblings = &self.data(current).children;
                let Some(position) = siblings.iter().position(|&id| id == child) else {
                    unreachable!("a node is always among its parent's children");
                };
                siblings[position + 1..].to_vec()
            };
            for sibling in later {
                self.shift_subtree(sibling, token_diff, line_diff);
            }

            if current == self.root {
                break;
            }

            let node = &mut self.nodes[current];
            let threshold = old_end - node.token_base;
            node.extent = shift(node.extent, token_diff);
            node.line_count = shift(node.line_count, line_diff);
            node.kind.shift_slots_from(threshold, token_diff);
            trace!(kind = node.kind.name(), extent = node.extent, "ancestor adjusted");

            child = current;
            match node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }

        new
    }

    fn shift_subtree(&mut self, id: NodeId, token_diff: i64, line_diff: i64) {
        let node = &mut self.nodes[id];
        node.token_base = shift(node.token_base, token_diff);
        node.start_line = shift(node.start_line, line_diff);
        for child in node.children.clone() {
            self.shift_subtree(child, token_diff, line_diff);
        }
    }

    fn adopt_root(&mut self, new_tree: Self) {
        let source = new_tree.data(new_tree.root);
        let root = &mut self.nodes[self.root];
        root.kind = source.kind;
        root.extent = source.extent;
        root.closed = source.closed;
        root.line_count = source.line_count;
        self.tokens = new_tree.tokens;
        self.text_len = new_tree.text_len;
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(id) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    /// Copies `id` and its descendants from `source` into this tree's arena.
    fn import(&mut self, source: &Self, id: NodeId, parent: Option<NodeId>) -> NodeId {
        let data = source.data(id);
        let new = self.nodes.alloc(NodeData { parent, children: Vec::new(), ..data.clone() });
        let children = data.children.iter().map(|&child| self.import(source, child, Some(new))).collect();
        self.nodes[new].children = children;
        new
    }
}

fn shift(value: u32, diff: i64) -> u32 {
    (i64::from(value) + diff) as u32
}
