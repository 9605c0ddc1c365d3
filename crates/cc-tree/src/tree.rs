//! Best-first search tree and engine — §4.5.

use std::collections::HashMap;

use cold_clear_core::{generate, place, Bag, Board, Placement};
use cold_clear_eval::{static_value, transition_reward, Weights};
use cold_clear_types::{MovementMode, PcLoop, PieceKind, SpawnRule};

use crate::node::{Node, NodeId, NodeKind};

/// Priority bonus per ply of depth, added to a node's backed-up value when
/// ranking frontier nodes — §5(b): "a monotone function of depth".
const DEPTH_BONUS_PER_PLY: i64 = 2;

/// A committed move: the path/placement chosen at the (former) root, and
/// the id of the node that is now the new root.
#[derive(Debug, Clone)]
pub struct CommitResult {
    pub path: cold_clear_core::Path,
    pub placement: Placement,
    pub used_hold: bool,
    pub new_root: NodeId,
}

pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    /// Pieces known to follow the root's piece, in order. A node at depth
    /// `d` (d >= 1) knows its own piece iff `upcoming.len() >= d`, in which
    /// case it is `upcoming[d - 1]`; otherwise it is a `Chance` node.
    upcoming: Vec<PieceKind>,
    mode: MovementMode,
    spawn_rule: SpawnRule,
    hold_enabled: bool,
}

impl Tree {
    pub fn new(
        board: Board,
        piece: PieceKind,
        held: Option<PieceKind>,
        bag: Bag,
        b2b: bool,
        combo: u32,
        upcoming: Vec<PieceKind>,
        mode: MovementMode,
        spawn_rule: SpawnRule,
        hold_enabled: bool,
        weights: &Weights,
        incoming_garbage: i32,
        pcloop: PcLoop,
    ) -> Self {
        let root_value = static_value(&board, weights, b2b, incoming_garbage, pcloop);
        let root = Node::root(board, piece, held, bag, b2b, combo, root_value);
        Self {
            nodes: vec![root],
            root: 0,
            upcoming,
            mode,
            spawn_rule,
            hold_enabled,
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_root_dead(&self) -> bool {
        self.nodes[self.root].dead
    }

    /// Number of plies beyond the root whose piece is already known (i.e.
    /// `self.upcoming.len()`). A node at this depth can itself be expanded
    /// (its own piece is known), but its *children* would need a piece
    /// beyond what's known — callers that don't want to speculate should
    /// leave such nodes unexpanded until `reveal_piece` grows this further.
    pub fn known_depth(&self) -> usize {
        self.upcoming.len()
    }

    /// Deepest ply reached by any node currently in the arena, a diagnostic
    /// for `Move::depth` at commit time.
    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    fn priority(&self, id: NodeId) -> i64 {
        let node = &self.nodes[id];
        node.backed_value + node.depth as i64 * DEPTH_BONUS_PER_PLY
    }

    /// Pick the most promising unexpanded, non-busy, non-dead node. Ties
    /// break deeper first, then higher static value, then insertion order
    /// (the scan keeps the first node seen on a full tie).
    pub fn select_frontier(&self) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for id in 0..self.nodes.len() {
            let node = &self.nodes[id];
            if node.expanded || node.dead || node.busy {
                continue;
            }
            let Some(current_best) = best else {
                best = Some(id);
                continue;
            };
            let better = (
                self.priority(id),
                node.depth,
                node.static_value,
            ) > (
                self.priority(current_best),
                self.nodes[current_best].depth,
                self.nodes[current_best].static_value,
            );
            if better {
                best = Some(id);
            }
        }
        best
    }

    pub fn mark_busy(&mut self, id: NodeId, busy: bool) {
        self.nodes[id].busy = busy;
    }

    /// Expand one frontier node: enumerate its children in one step,
    /// evaluate each, and back up the new values to the root.
    pub fn expand(&mut self, id: NodeId, weights: &Weights, incoming_garbage: i32, pcloop: PcLoop) {
        match self.nodes[id].kind {
            NodeKind::Decision => self.expand_decision(id, weights, incoming_garbage, pcloop),
            NodeKind::Chance => self.expand_chance(id, weights, incoming_garbage, pcloop),
        }
        self.nodes[id].expanded = true;
        if self.nodes[id].children.is_empty() {
            self.nodes[id].dead = true;
        }
        self.backup(id);
    }

    fn expand_decision(&mut self, id: NodeId, weights: &Weights, incoming_garbage: i32, pcloop: PcLoop) {
        let node = self.nodes[id].clone();
        let current_piece = match node.piece {
            Some(p) => p,
            None => {
                log::warn!("decision node {id} has no piece; treating as dead");
                return;
            }
        };

        let mut attempts: Vec<(PieceKind, bool, Option<PieceKind>)> = vec![(current_piece, false, node.held)];
        if self.hold_enabled {
            if let Some(held) = node.held {
                attempts.push((held, true, Some(current_piece)));
            }
        }

        let mut new_children = Vec::new();
        for (piece_used, used_hold, new_held) in attempts {
            for candidate in generate(&node.board, piece_used, self.mode, self.spawn_rule) {
                let Ok((new_board, placement)) = place(&candidate.final_state, &node.board, candidate.spin) else {
                    continue;
                };
                let (reward, new_b2b, new_combo) =
                    transition_reward(weights, &placement, &new_board, candidate.path.len(), node.b2b, node.combo);
                let new_static = static_value(&new_board, weights, new_b2b, incoming_garbage, pcloop);

                let mut new_bag = node.bag;
                new_bag.consume(piece_used);

                let child_depth = node.depth + 1;
                let next_piece = self.upcoming.get(node.depth as usize).copied();

                let child = match next_piece {
                    Some(known) => Node {
                        kind: NodeKind::Decision,
                        parent: Some(id),
                        children: Vec::new(),
                        depth: child_depth,
                        board: new_board,
                        held: new_held,
                        bag: new_bag,
                        b2b: new_b2b,
                        combo: new_combo,
                        piece: Some(known),
                        path: Some(candidate.path.clone()),
                        placement: Some(placement),
                        used_hold,
                        reward_from_parent: reward,
                        static_value: new_static,
                        backed_value: new_static,
                        busy: false,
                        dead: false,
                        expanded: false,
                    },
                    None => Node {
                        kind: NodeKind::Chance,
                        parent: Some(id),
                        children: Vec::new(),
                        depth: child_depth,
                        board: new_board,
                        held: new_held,
                        bag: new_bag,
                        b2b: new_b2b,
                        combo: new_combo,
                        piece: None,
                        path: Some(candidate.path.clone()),
                        placement: Some(placement),
                        used_hold,
                        reward_from_parent: reward,
                        static_value: new_static,
                        backed_value: new_static,
                        busy: false,
                        dead: false,
                        expanded: false,
                    },
                };

                let child_id = self.push_node(child);
                new_children.push(child_id);
            }
        }

        self.nodes[id].children = new_children;
    }

    /// One `Decision` child per piece remaining in the bag, weighted
    /// equally at backup time (a plain mean over children).
    fn expand_chance(&mut self, id: NodeId, weights: &Weights, incoming_garbage: i32, pcloop: PcLoop) {
        let node = self.nodes[id].clone();
        let static_value_here = static_value(&node.board, weights, node.b2b, incoming_garbage, pcloop);

        let mut new_children = Vec::new();
        for assumed in node.bag.remaining() {
            let mut bag = node.bag;
            bag.consume(assumed);
            let child = Node {
                kind: NodeKind::Decision,
                parent: Some(id),
                children: Vec::new(),
                depth: node.depth + 1,
                board: node.board.clone(),
                held: node.held,
                bag,
                b2b: node.b2b,
                combo: node.combo,
                piece: Some(assumed),
                path: None,
                placement: None,
                used_hold: false,
                reward_from_parent: 0,
                static_value: static_value_here,
                backed_value: static_value_here,
                busy: false,
                dead: false,
                expanded: false,
            };
            new_children.push(self.push_node(child));
        }

        self.nodes[id].children = new_children;
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }

    /// Recompute `backed_value`/`dead` for `id` and every ancestor, given
    /// its current children.
    fn backup(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(cur) = current {
            self.recompute_one(cur);
            current = self.nodes[cur].parent;
        }
    }

    fn recompute_one(&mut self, id: NodeId) {
        let node = &self.nodes[id];
        if node.dead {
            self.nodes[id].backed_value = i64::MIN / 2;
            return;
        }
        if node.children.is_empty() {
            // Leaf (unexpanded, or expanded with a non-empty set pending):
            // its own static evaluation stands in until expansion.
            self.nodes[id].backed_value = node.static_value;
            return;
        }

        let live_children: Vec<NodeId> = node
            .children
            .iter()
            .copied()
            .filter(|&c| !self.nodes[c].dead)
            .collect();

        if live_children.is_empty() {
            self.nodes[id].dead = true;
            self.nodes[id].backed_value = i64::MIN / 2;
            return;
        }

        let backed = match node.kind {
            NodeKind::Decision => live_children
                .iter()
                .map(|&c| {
                    let child = &self.nodes[c];
                    child.reward_from_parent + child.backed_value
                })
                .max()
                .unwrap(),
            NodeKind::Chance => {
                let sum: i64 = live_children.iter().map(|&c| self.nodes[c].backed_value).sum();
                sum / live_children.len() as i64
            }
        };
        self.nodes[id].backed_value = backed;
    }

    /// Choose the root's best live child by `reward + backed_value` and
    /// re-root the tree there, reclaiming every other subtree.
    pub fn commit(&mut self) -> Option<CommitResult> {
        let root = &self.nodes[self.root];
        if root.dead || root.children.is_empty() {
            return None;
        }

        let best = root
            .children
            .iter()
            .copied()
            .filter(|&c| !self.nodes[c].dead)
            .max_by_key(|&c| {
                let child = &self.nodes[c];
                child.reward_from_parent + child.backed_value
            })?;

        let path = self.nodes[best].path.clone().unwrap_or_default();
        let placement = self.nodes[best].placement.clone()?;
        let used_hold = self.nodes[best].used_hold;

        self.advance_root(best);

        Some(CommitResult {
            path,
            placement,
            used_hold,
            new_root: self.root,
        })
    }

    /// Rebuild the arena to contain only the subtree rooted at
    /// `new_root_old_id`, with depths and the `upcoming` lookahead shifted
    /// by one ply. Every node outside that subtree is reclaimed.
    fn advance_root(&mut self, new_root_old_id: NodeId) {
        let mut new_nodes = Vec::new();
        let mut mapping: HashMap<NodeId, NodeId> = HashMap::new();
        let new_root = self.copy_subtree(new_root_old_id, None, &mut new_nodes, &mut mapping);

        self.nodes = new_nodes;
        self.root = new_root;
        self.nodes[self.root].parent = None;
        if !self.upcoming.is_empty() {
            self.upcoming.remove(0);
        }
    }

    fn copy_subtree(
        &self,
        old_id: NodeId,
        new_parent: Option<NodeId>,
        out: &mut Vec<Node>,
        mapping: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        let mut cloned = self.nodes[old_id].clone();
        cloned.parent = new_parent;
        cloned.depth = self.nodes[old_id].depth.saturating_sub(1);
        let old_children = std::mem::take(&mut cloned.children);

        let new_id = out.len();
        out.push(cloned);
        mapping.insert(old_id, new_id);

        let mut new_children = Vec::with_capacity(old_children.len());
        for old_child in old_children {
            new_children.push(self.copy_subtree(old_child, Some(new_id), out, mapping));
        }
        out[new_id].children = new_children;
        new_id
    }

    /// Splice a just-revealed piece into every `Chance` node at the
    /// now-resolved depth: keep only the matching `Decision` child, and
    /// mark the rest of that chance node's subtree (including itself)
    /// dead so it drops out of frontier selection — §5's "all other
    /// chance children are reclaimed".
    pub fn reveal_piece(&mut self, piece: PieceKind) {
        self.upcoming.push(piece);
        let resolved_depth = self.upcoming.len() as u32;

        let chance_ids: Vec<NodeId> = (0..self.nodes.len())
            .filter(|&id| !self.nodes[id].dead && matches!(self.nodes[id].kind, NodeKind::Chance) && self.nodes[id].depth == resolved_depth)
            .collect();

        for chance_id in chance_ids {
            let Some(match_child) = self.nodes[chance_id]
                .children
                .iter()
                .copied()
                .find(|&c| self.nodes[c].piece == Some(piece))
            else {
                continue;
            };

            for &sibling in &self.nodes[chance_id].children.clone() {
                if sibling != match_child {
                    self.mark_subtree_dead(sibling);
                }
            }

            let parent_id = self.nodes[chance_id].parent;
            if let Some(pid) = parent_id {
                if let Some(slot) = self.nodes[pid].children.iter_mut().find(|c| **c == chance_id) {
                    *slot = match_child;
                }
                self.nodes[match_child].parent = Some(pid);
                self.nodes[chance_id].dead = true;
                self.backup(pid);
            }
        }
    }

    fn mark_subtree_dead(&mut self, id: NodeId) {
        self.nodes[id].dead = true;
        for child in self.nodes[id].children.clone() {
            self.mark_subtree_dead(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_tree(board: Board, upcoming: Vec<PieceKind>) -> Tree {
        Tree::new(
            board,
            PieceKind::T,
            None,
            Bag::full(),
            false,
            0,
            upcoming,
            MovementMode::ZeroG,
            SpawnRule::Row19Or20,
            true,
            &Weights::default(),
            0,
            PcLoop::Off,
        )
    }

    #[test]
    fn root_expansion_produces_placement_children() {
        let mut tree = new_tree(Board::new(), vec![PieceKind::O]);
        let root = tree.root_id();
        tree.expand(root, &Weights::default(), 0, PcLoop::Off);
        assert!(!tree.node(root).children.is_empty());
        for &child in &tree.node(root).children {
            assert!(tree.node(child).placement.is_some());
        }
    }

    #[test]
    fn unknown_next_piece_creates_chance_children() {
        let mut tree = new_tree(Board::new(), Vec::new());
        let root = tree.root_id();
        tree.expand(root, &Weights::default(), 0, PcLoop::Off);
        let any_chance = tree
            .node(root)
            .children
            .iter()
            .any(|&c| matches!(tree.node(c).kind, NodeKind::Chance));
        assert!(any_chance);
    }

    #[test]
    fn commit_advances_root_and_reclaims_siblings() {
        let mut tree = new_tree(Board::new(), vec![PieceKind::O]);
        let root = tree.root_id();
        tree.expand(root, &Weights::default(), 0, PcLoop::Off);
        let child_count = tree.node(root).children.len();
        assert!(child_count > 1);

        let result = tree.commit().expect("root has legal children");
        assert_eq!(tree.root_id(), result.new_root);
        assert_eq!(tree.node(tree.root_id()).parent, None);
    }

    #[test]
    fn topped_out_root_has_no_children_and_is_dead() {
        let mut board = Board::new();
        let spawn = cold_clear_core::PieceState::spawn(PieceKind::T);
        for &(x, y) in spawn.cells().iter() {
            board.set(x, y, Some(PieceKind::L));
        }
        let mut tree = new_tree(board, vec![PieceKind::O]);
        let root = tree.root_id();
        tree.expand(root, &Weights::default(), 0, PcLoop::Off);
        assert!(tree.is_root_dead());
    }

    #[test]
    fn reveal_piece_prunes_chance_node_to_matching_branch() {
        let mut tree = new_tree(Board::new(), Vec::new());
        let root = tree.root_id();
        tree.expand(root, &Weights::default(), 0, PcLoop::Off);
        let chance_id = tree
            .node(root)
            .children
            .iter()
            .copied()
            .find(|&c| matches!(tree.node(c).kind, NodeKind::Chance))
            .expect("an unknown-next-piece branch exists");

        tree.reveal_piece(PieceKind::I);

        // The chance node's slot in root's children now points directly at
        // the Decision node assuming an I piece.
        let still_present = tree.node(root).children.iter().any(|&c| c == chance_id);
        assert!(!still_present || tree.node(chance_id).dead);
        let revealed = tree
            .node(root)
            .children
            .iter()
            .find(|&&c| tree.node(c).piece == Some(PieceKind::I) && !tree.node(c).dead);
        assert!(revealed.is_some());
    }
}
