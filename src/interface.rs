//! The client boundary — §6: `Bot` handle, `Move`/`Plan`, `launch*` and the
//! rest of the command surface.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;
use parking_lot::Mutex;

use cold_clear_core::{Bag, Board, Path};
use cold_clear_eval::Weights;
use cold_clear_tree::{CommitResult, NodeId, NodeKind, Tree};
use cold_clear_types::{PieceKind, SpinStatus};

use crate::board_codec;
use crate::command::Command;
use crate::error::BotResult;
use crate::options::Options;
use crate::worker::{self, Shared};

/// Longest principal variation `block_next_move`/`poll_next_move` report.
pub const PLAN_LEN: usize = 8;

/// One committed placement, in the client's coordinate system.
#[derive(Debug, Clone)]
pub struct Move {
    pub hold: bool,
    pub expected_x: [i32; 4],
    pub expected_y: [i32; 4],
    pub movements: Path,
    pub movement_count: u32,
    pub nodes: u64,
    pub depth: u32,
    /// Rank of this move among the root's live children at commit time,
    /// `0` being best. This implementation always commits the argmax
    /// child, so this is always `0`; the field is carried for clients that
    /// compare it against other engines' diagnostics.
    pub original_rank: u32,
}

/// One step of a principal variation.
#[derive(Debug, Clone)]
pub struct PlanStep {
    pub piece: PieceKind,
    pub spin: SpinStatus,
    pub cells_x: [i32; 4],
    pub cells_y: [i32; 4],
    /// Cleared row indices, `-1`-padded past the actual count.
    pub cleared_rows: [i32; 4],
}

#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub steps: arrayvec::ArrayVec<PlanStep, PLAN_LEN>,
}

#[derive(Debug, Clone)]
pub(crate) struct MoveResult {
    pub mv: Move,
    pub plan: Option<Plan>,
}

/// `poll_next_move`/`block_next_move`'s result — §6.
#[derive(Debug, Clone)]
pub enum PollResult {
    Provided { mv: Move, plan: Option<Plan> },
    Waiting,
    Dead,
}

fn client_cells(cells: [(i8, i8); 4]) -> ([i32; 4], [i32; 4]) {
    let mut xs = [0i32; 4];
    let mut ys = [0i32; 4];
    for (i, &(x, y)) in cells.iter().enumerate() {
        let (cx, cy) = board_codec::to_client_xy(x, y);
        xs[i] = cx;
        ys[i] = cy;
    }
    (xs, ys)
}

fn build_move(commit: &CommitResult, nodes_before: usize, max_depth: u32) -> Move {
    let (expected_x, expected_y) = client_cells(commit.placement.final_state.cells());
    Move {
        hold: commit.used_hold,
        expected_x,
        expected_y,
        movements: commit.path.clone(),
        movement_count: commit.path.len() as u32,
        nodes: nodes_before as u64,
        depth: max_depth,
        original_rank: 0,
    }
}

/// Walk the principal variation from `start` (the new root after a
/// commit): at each step take the live `Decision` child with the greatest
/// `reward + backed_value`, stopping at a `Chance` node (an unresolved next
/// piece) or once `PLAN_LEN` steps have been collected.
fn build_plan(tree: &Tree, start: NodeId) -> Plan {
    let mut plan = Plan::default();
    let mut current = start;

    while !plan.steps.is_full() {
        let node = tree.node(current);
        let best = node
            .children
            .iter()
            .copied()
            .filter(|&c| matches!(tree.node(c).kind, NodeKind::Decision) && !tree.node(c).dead)
            .max_by_key(|&c| {
                let child = tree.node(c);
                child.reward_from_parent + child.backed_value
            });

        let Some(best) = best else { break };
        let child = tree.node(best);
        let Some(placement) = child.placement.as_ref() else {
            break;
        };

        let (cells_x, cells_y) = client_cells(placement.final_state.cells());
        let mut cleared_rows = [-1i32; 4];
        for (i, &row) in placement.cleared_rows.iter().enumerate().take(4) {
            cleared_rows[i] = row as i32;
        }

        plan.steps.push(PlanStep {
            piece: placement.kind,
            spin: placement.spin,
            cells_x,
            cells_y,
            cleared_rows,
        });
        current = best;
    }

    plan
}

pub(crate) fn build_move_result(
    tree: &Tree,
    commit: &CommitResult,
    nodes_before: usize,
    max_depth: u32,
) -> MoveResult {
    let mv = build_move(commit, nodes_before, max_depth);
    let plan = Some(build_plan(tree, tree.root_id()));
    MoveResult { mv, plan }
}

/// A running bot: an expansion thread pool plus a coordinator, both
/// reachable only through the command inbox and the shared, lock-guarded
/// state.
pub struct Bot {
    shared: Arc<Shared>,
    command_tx: Sender<Command>,
    threads: Mutex<Vec<thread::JoinHandle<()>>>,
}

impl Bot {
    fn spawn(
        options: Options,
        weights: Weights,
        board: Board,
        held: Option<PieceKind>,
        bag_bits: u8,
        b2b: bool,
        combo: u32,
    ) -> Self {
        let shared = Shared::new(options, weights, board, held, bag_bits, b2b, combo);
        let (command_tx, command_rx) = crossbeam_channel::unbounded();

        let mut threads = Vec::with_capacity(options.threads.max(1) as usize + 1);
        {
            let shared = Arc::clone(&shared);
            threads.push(thread::spawn(move || worker::run_coordinator(shared, command_rx)));
        }
        for index in 0..options.threads.max(1) {
            let shared = Arc::clone(&shared);
            threads.push(thread::spawn(move || {
                worker::run_expansion_worker(shared, index as usize)
            }));
        }

        Self {
            shared,
            command_tx,
            threads: Mutex::new(threads),
        }
    }

    /// Append one known piece to the queue. Under speculation this is
    /// expected to be in the current bag; per §9(c) this is never rejected,
    /// only refilled-then-consumed if it isn't.
    pub fn add_next_piece(&self, piece: PieceKind) {
        let _ = self.command_tx.send(Command::AddNextPiece(piece));
    }

    /// Signal that a move should be committed once the search budget is
    /// satisfied. At most one request may be outstanding at a time.
    pub fn request_next_move(&self, incoming_garbage: i32) {
        let _ = self
            .command_tx
            .send(Command::RequestNextMove { incoming_garbage });
    }

    /// Barrier reset: keeps `options`/`weights`, discards board, queue,
    /// hold, and any outstanding request (§9(a)).
    pub fn reset(&self, field: &[bool], b2b: bool, combo: u32) -> BotResult<()> {
        let board = board_codec::decode(field)?;
        let _ = self.command_tx.send(Command::Reset { board, b2b, combo });
        Ok(())
    }

    pub fn poll_next_move(&self) -> PollResult {
        let mut state = self.shared.state.lock();
        if let Some(result) = state.result.take() {
            return PollResult::Provided {
                mv: result.mv,
                plan: result.plan,
            };
        }
        if state.dead {
            return PollResult::Dead;
        }
        PollResult::Waiting
    }

    pub fn block_next_move(&self) -> PollResult {
        let mut state = self.shared.state.lock();
        loop {
            if let Some(result) = state.result.take() {
                return PollResult::Provided {
                    mv: result.mv,
                    plan: result.plan,
                };
            }
            if state.dead {
                return PollResult::Dead;
            }
            self.shared.cv.wait(&mut state);
        }
    }

    /// Terminate expansion threads and free the tree. Consuming `self`
    /// makes re-use after destruction a compile error rather than a
    /// runtime one.
    pub fn destroy(self) {}
}

impl Drop for Bot {
    fn drop(&mut self) {
        self.shared.terminate.store(true, std::sync::atomic::Ordering::Release);
        let _ = self.command_tx.send(Command::Terminate);
        self.shared.cv.notify_all();
        for handle in self.threads.lock().drain(..) {
            let _ = handle.join();
        }
    }
}

/// Create a worker with an empty board, empty queue, and a full bag.
pub fn launch(options: Options, weights: Weights) -> Bot {
    Bot::spawn(options, weights, Board::new(), None, Bag::full().bits(), false, 0)
}

/// As [`launch`], but with a supplied starting state. `bag_bits` is a 7-bit
/// mask of which piece kinds remain in the current bag.
pub fn launch_with_board(
    options: Options,
    weights: Weights,
    field: &[bool],
    bag_bits: u8,
    held: Option<PieceKind>,
    b2b: bool,
    combo: u32,
) -> BotResult<Bot> {
    let board = board_codec::decode(field)?;
    Ok(Bot::spawn(options, weights, board, held, bag_bits, b2b, combo))
}
