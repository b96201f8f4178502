// Simulation search (MCTS with UCT selection)
//
// One decision call builds an arena tree of TurnState nodes, bounded by a
// wall-clock deadline and an iteration cap, whichever triggers first. The
// budget is shared across the whole turn: after the first action is chosen
// its child becomes the new root for the second and third. Rollout workers
// run Selection -> Expansion -> Simulation independently and synchronize
// backpropagation through a mutex on the tree, so concurrent updates to a
// node's statistics are never lost. In-flight rollouts finish after the
// deadline; no new iteration starts.

use log::debug;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::config::{SearchConfig, Weights};
use crate::heuristic::HeuristicStrategy;
use crate::state::TurnState;
use crate::types::{Move, Position};

/// Search budget and shape, resolved from configuration
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub iterations: usize,
    pub time_budget: Duration,
    pub exploration: f64,
    pub max_rollout_depth: usize,
    pub threads: usize,
}

impl SearchParams {
    pub fn from_config(cfg: &SearchConfig) -> Self {
        SearchParams {
            iterations: cfg.iterations,
            time_budget: Duration::from_millis(cfg.time_budget_ms),
            exploration: cfg.exploration_constant,
            max_rollout_depth: cfg.max_rollout_depth,
            threads: cfg.threads,
        }
    }
}

struct Node {
    state: TurnState,
    parent: Option<usize>,
    /// Edge move that produced this node from its parent
    mv: Option<Move>,
    children: Vec<usize>,
    untried: Vec<Move>,
    visits: u64,
    reward: f64,
}

impl Node {
    fn new(state: TurnState, parent: Option<usize>, mv: Option<Move>) -> Self {
        let untried = if state.is_terminal() {
            Vec::new()
        } else {
            state.board.legal_moves(state.current_player)
        };
        Node {
            state,
            parent,
            mv,
            children: Vec::new(),
            untried,
            visits: 0,
            reward: 0.0,
        }
    }
}

struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn new(root_state: TurnState) -> Self {
        let mut root = Node::new(root_state, None, None);
        // The root's own initial visit; children account for every later one
        root.visits = 1;
        Tree { nodes: vec![root] }
    }
}

/// Monte Carlo tree search strategy
pub struct MctsStrategy {
    params: SearchParams,
    weights: Weights,
    seed: u64,
}

impl MctsStrategy {
    /// Creates a search strategy with an entropy-derived rollout seed
    pub fn new(search: &SearchConfig, weights: Weights) -> Self {
        Self::with_seed(search, weights, rand::random::<u64>())
    }

    /// Creates a search strategy with a fixed rollout seed; each worker
    /// derives its generator from `seed` plus its index, so single-threaded
    /// runs are fully reproducible
    pub fn with_seed(search: &SearchConfig, weights: Weights, seed: u64) -> Self {
        MctsStrategy {
            params: SearchParams::from_config(search),
            weights,
            seed,
        }
    }

    /// Selects up to `count` actions for the acting player via tree search.
    /// Short-circuits when no more legal moves exist than requested; falls
    /// back to the heuristic evaluator when the budget yields no statistics.
    pub fn decide_moves(&self, state: &TurnState, count: usize) -> Vec<Move> {
        if !state.is_my_turn() || count == 0 {
            return Vec::new();
        }
        let player_id = match state.acting() {
            Some(p) => p.id,
            None => return Vec::new(),
        };

        let legal = state.board.legal_moves(player_id);
        if legal.is_empty() {
            return Vec::new();
        }
        if legal.len() <= count {
            return legal;
        }

        let deadline = Instant::now() + self.params.time_budget;
        let iterations = AtomicUsize::new(0);
        let tree = Mutex::new(Tree::new(skip_blocked_players(state.clone())));

        let mut root = 0usize;
        let mut chosen = Vec::with_capacity(count);

        for _ in 0..count {
            self.run_iterations(&tree, root, deadline, &iterations);

            let t = tree.lock();
            if t.nodes[root].state.current_player != player_id {
                break;
            }
            let best = t.nodes[root]
                .children
                .iter()
                .copied()
                .filter(|&c| t.nodes[c].visits > 0)
                .max_by_key(|&c| t.nodes[c].visits);
            match best {
                Some(c) => {
                    if let Some(mv) = t.nodes[c].mv {
                        chosen.push(mv);
                    }
                    root = c;
                }
                None => break,
            }
        }

        debug!(
            "search finished: {} iterations, {} of {} actions",
            iterations.load(Ordering::Relaxed),
            chosen.len(),
            count
        );

        if chosen.is_empty() {
            // Budget already spent before any statistics accumulated
            return HeuristicStrategy::new(self.weights.clone()).decide_moves(state, count);
        }
        chosen
    }

    /// Block placement is a rare, low-branching, one-time decision; it
    /// always delegates to the heuristic evaluator
    pub fn decide_blocks(&self, state: &TurnState) -> Vec<Position> {
        HeuristicStrategy::new(self.weights.clone()).decide_blocks(state)
    }

    fn run_iterations(
        &self,
        tree: &Mutex<Tree>,
        root: usize,
        deadline: Instant,
        iterations: &AtomicUsize,
    ) {
        let workers = if self.params.threads == 0 {
            rayon::current_num_threads()
        } else {
            self.params.threads
        };

        if workers <= 1 {
            self.worker_loop(tree, root, deadline, iterations, self.seed);
            return;
        }

        rayon::scope(|s| {
            for w in 0..workers {
                let seed = self.seed.wrapping_add(w as u64);
                s.spawn(move |_| self.worker_loop(tree, root, deadline, iterations, seed));
            }
        });
    }

    fn worker_loop(
        &self,
        tree: &Mutex<Tree>,
        root: usize,
        deadline: Instant,
        iterations: &AtomicUsize,
        seed: u64,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);

        loop {
            if Instant::now() >= deadline {
                break;
            }
            if iterations.fetch_add(1, Ordering::Relaxed) >= self.params.iterations {
                break;
            }

            let (node_idx, sim_state, acting) = {
                let mut t = tree.lock();
                let idx = self.select_and_expand(&mut t, root);
                let node = &t.nodes[idx];
                (idx, node.state.clone(), node.state.acting_player)
            };

            let reward = self.simulate(sim_state, acting, &mut rng);

            let mut t = tree.lock();
            backpropagate(&mut t, node_idx, reward);
        }
    }

    /// Descends by UCT until a node with unexpanded moves or a terminal
    /// state, then instantiates one new child. Returns the node to simulate
    /// from.
    fn select_and_expand(&self, tree: &mut Tree, root: usize) -> usize {
        let mut cur = root;
        loop {
            if tree.nodes[cur].state.is_terminal() {
                return cur;
            }
            if let Some(mv) = tree.nodes[cur].untried.pop() {
                let child_state = skip_blocked_players(tree.nodes[cur].state.apply(&mv));
                let child = tree.nodes.len();
                tree.nodes.push(Node::new(child_state, Some(cur), Some(mv)));
                tree.nodes[cur].children.push(child);
                return child;
            }
            if tree.nodes[cur].children.is_empty() {
                // Nobody can move from here; treat as a leaf
                return cur;
            }
            cur = self.best_uct_child(tree, cur);
        }
    }

    fn best_uct_child(&self, tree: &Tree, node: usize) -> usize {
        let parent_visits = tree.nodes[node].visits as f64;
        let mut best = tree.nodes[node].children[0];
        let mut best_value = f64::NEG_INFINITY;

        for &child in &tree.nodes[node].children {
            let value = self.uct(
                tree.nodes[child].reward,
                tree.nodes[child].visits as f64,
                parent_visits,
            );
            if value > best_value {
                best_value = value;
                best = child;
            }
        }
        best
    }

    /// Upper Confidence Bound for Trees; unvisited children sort first
    fn uct(&self, reward: f64, visits: f64, parent_visits: f64) -> f64 {
        if visits == 0.0 {
            return f64::INFINITY;
        }
        reward / visits + self.params.exploration * (parent_visits.ln() / visits).sqrt()
    }

    /// Uniform-random playout until a sole survivor remains or the depth cap
    /// is hit. Reward is 1.0 iff the acting player is the sole survivor.
    fn simulate(&self, mut sim: TurnState, acting: u8, rng: &mut StdRng) -> f64 {
        let mut depth = 0;
        let mut skips = 0;

        while depth < self.params.max_rollout_depth && !sim.is_terminal() {
            let moves = sim.board.legal_moves(sim.current_player);
            if moves.is_empty() {
                // Blocked players forfeit their turn
                sim.advance_player();
                skips += 1;
                if skips >= sim.players.len() {
                    break;
                }
                continue;
            }
            skips = 0;

            let mv = moves[rng.random_range(0..moves.len())];
            sim = sim.apply(&mv);
            depth += 1;
        }

        let alive = sim.alive_players();
        if alive.len() == 1 && alive[0].id == acting {
            1.0
        } else {
            0.0
        }
    }
}

/// Advances past players with no legal moves so every node's current player
/// can actually act; stops at terminal states or after a full blocked lap
fn skip_blocked_players(mut state: TurnState) -> TurnState {
    let mut laps = 0;
    while !state.is_terminal()
        && laps <= state.players.len()
        && state.board.legal_moves(state.current_player).is_empty()
    {
        state.advance_player();
        laps += 1;
    }
    state
}

fn backpropagate(tree: &mut Tree, mut idx: usize, reward: f64) {
    loop {
        tree.nodes[idx].visits += 1;
        tree.nodes[idx].reward += reward;
        match tree.nodes[idx].parent {
            Some(p) => idx = p,
            None => break,
        }
    }
}
