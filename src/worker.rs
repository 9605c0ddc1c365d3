//! Shared state, the command coordinator, and expansion threads — §4.6/§5.
//!
//! One coarse `parking_lot::Mutex` guards everything the search touches,
//! with a `Condvar` for move-ready/death signalling — the "single coarse
//! lock... is acceptable" option the spec names. Because every mutation of
//! the tree needs `&mut Tree`, and that borrow only exists while a thread
//! holds the guard, the lock is necessarily held for an entire expansion
//! step: the design doesn't attempt the finer per-node locking scheme the
//! spec also allows.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use parking_lot::{Condvar, Mutex};

use cold_clear_core::{Bag, Board, Queue};
use cold_clear_eval::Weights;
use cold_clear_tree::Tree;
use cold_clear_types::PieceKind;

use crate::command::Command;
use crate::interface::build_move_result;
use crate::options::Options;

/// How long an idle thread sleeps between rechecks of the termination flag.
/// Any real wake-up (a command applied, an expansion completed) happens
/// through `Condvar::notify_all` well before this elapses; it only bounds
/// how long `destroy` can take to be noticed.
const IDLE_POLL: Duration = Duration::from_millis(50);

pub(crate) struct State {
    /// The board a future `Tree` should be seeded with: either the
    /// just-launched/just-reset starting position, while no piece is known
    /// yet to become the root's piece, or (once `tree` exists) a stale
    /// leftover that nothing reads.
    pub board: Board,
    pub tree: Option<Tree>,
    /// Ground-truth bag/queue ledger, kept in sync independently of the
    /// search tree's own per-branch speculative bags (`Node::bag`).
    pub queue: Queue,
    pub held: Option<PieceKind>,
    pub b2b: bool,
    pub combo: u32,
    /// `Some(incoming_garbage)` while a move request is outstanding and not
    /// yet answered.
    pub pending: Option<i32>,
    pub result: Option<crate::interface::MoveResult>,
    pub dead: bool,
}

impl State {
    fn fresh(board: Board, held: Option<PieceKind>, bag_bits: u8, b2b: bool, combo: u32) -> Self {
        Self {
            board,
            tree: None,
            queue: Queue::new(Bag::from_bits(bag_bits)),
            held,
            b2b,
            combo,
            pending: None,
            result: None,
            dead: false,
        }
    }
}

pub(crate) struct Shared {
    pub options: Options,
    pub weights: Weights,
    pub state: Mutex<State>,
    pub cv: Condvar,
    pub terminate: AtomicBool,
}

impl Shared {
    pub fn new(
        options: Options,
        weights: Weights,
        board: Board,
        held: Option<PieceKind>,
        bag_bits: u8,
        b2b: bool,
        combo: u32,
    ) -> Arc<Self> {
        Arc::new(Self {
            options,
            weights,
            state: Mutex::new(State::fresh(board, held, bag_bits, b2b, combo)),
            cv: Condvar::new(),
            terminate: AtomicBool::new(false),
        })
    }
}

/// Applies one command to `state`. Only ever called by the coordinator
/// thread, so command application itself is already serialized; FIFO order
/// across commands comes from the channel plus this single consumer.
fn apply_command(shared: &Shared, state: &mut State, cmd: Command) {
    match cmd {
        Command::Reset { board, b2b, combo } => {
            state.board = board;
            state.b2b = b2b;
            state.combo = combo;
            state.tree = None;
            state.queue = Queue::new(Bag::full());
            state.held = None;
            state.pending = None;
            state.result = None;
            state.dead = false;
            log::debug!("bot reset");
        }
        Command::AddNextPiece(piece) => {
            state.queue.add(piece);
            match state.tree.as_mut() {
                Some(tree) => tree.reveal_piece(piece),
                None => {
                    let bag = state.queue.bag();
                    let root_value_board = state.board.clone();
                    let tree = Tree::new(
                        root_value_board,
                        piece,
                        state.held,
                        bag,
                        state.b2b,
                        state.combo,
                        Vec::new(),
                        shared.options.mode,
                        shared.options.spawn_rule,
                        shared.options.use_hold,
                        &shared.weights,
                        0,
                        shared.options.pcloop,
                    );
                    state.tree = Some(tree);
                }
            }
        }
        Command::RequestNextMove { incoming_garbage } => {
            if state.pending.is_some() || state.result.is_some() {
                log::warn!("request_next_move ignored: a request is already outstanding");
            } else {
                state.pending = Some(incoming_garbage);
            }
        }
        Command::Terminate => {
            shared.terminate.store(true, Ordering::Release);
        }
    }
}

pub(crate) fn run_coordinator(shared: Arc<Shared>, inbox: Receiver<Command>) {
    log::debug!("coordinator thread starting");
    loop {
        match inbox.recv() {
            Ok(cmd) => {
                let mut state = shared.state.lock();
                apply_command(&shared, &mut state, cmd);
                drop(state);
                shared.cv.notify_all();
            }
            Err(_) => break,
        }
        if shared.terminate.load(Ordering::Acquire) {
            break;
        }
    }
    log::debug!("coordinator thread stopping");
}

/// Commit a move if a request is outstanding, the root has enough nodes
/// under it, and the root isn't dead. Called with the lock already held,
/// from both the coordinator (so a request arriving after the budget is
/// already satisfied resolves immediately) and every expansion thread
/// (so one that just crossed `min_nodes` resolves without waiting for
/// another wake-up).
fn try_commit_locked(shared: &Shared, state: &mut State) {
    if state.pending.is_none() {
        return;
    }
    let Some(tree) = state.tree.as_mut() else {
        return;
    };

    if tree.is_root_dead() {
        state.dead = true;
        state.pending = None;
        log::warn!("root has no legal children; bot is dead");
        return;
    }

    if tree.len() < shared.options.min_nodes as usize {
        return;
    }

    let nodes_before = tree.len();
    let max_depth = tree.max_depth();
    let Some(commit) = tree.commit() else {
        return;
    };

    let result = build_move_result(tree, &commit, nodes_before, max_depth);
    state.result = Some(result);
    state.pending = None;
    state.queue.advance();
    log::debug!(
        "committed move: hold={} nodes={} depth={}",
        commit.used_hold,
        nodes_before,
        max_depth
    );
}

pub(crate) fn run_expansion_worker(shared: Arc<Shared>, worker_index: usize) {
    log::debug!("expansion thread {worker_index} starting");
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        expansion_loop(&shared);
    }));
    if outcome.is_err() {
        log::warn!("expansion thread {worker_index} panicked; marking bot dead");
        let mut state = shared.state.lock();
        state.dead = true;
        drop(state);
        shared.cv.notify_all();
    }
    log::debug!("expansion thread {worker_index} stopping");
}

fn expansion_loop(shared: &Arc<Shared>) {
    loop {
        if shared.terminate.load(Ordering::Acquire) {
            return;
        }

        let mut guard = shared.state.lock();
        try_commit_locked(shared, &mut guard);

        if guard.dead {
            shared.cv.wait_for(&mut guard, IDLE_POLL);
            continue;
        }

        let incoming_garbage = guard.pending.unwrap_or(0);
        let options = &shared.options;
        let expand_target = guard.tree.as_ref().and_then(|tree| {
            let id = tree.select_frontier()?;
            let node_depth = tree.node(id).depth as usize;
            if !options.speculate && node_depth >= tree.known_depth() {
                return None;
            }
            if tree.len() as u32 >= options.max_nodes {
                return None;
            }
            Some(id)
        });

        let Some(id) = expand_target else {
            shared.cv.wait_for(&mut guard, IDLE_POLL);
            continue;
        };

        let tree = guard.tree.as_mut().expect("expand_target implies a tree exists");
        tree.mark_busy(id, true);
        tree.expand(id, &shared.weights, incoming_garbage, options.pcloop);
        tree.mark_busy(id, false);

        drop(guard);
        shared.cv.notify_all();
    }
}
