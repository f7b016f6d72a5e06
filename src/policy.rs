use crate::precomp::PrecompData;
use crate::types::{
    PairRequest, PairingKey, BYE_PLAYER_INDEX, CONTROL_LOSS_LOWEST_CONTENDER_ONLY_ROUNDS,
    MAJOR_PENALTY, MINOR_PENALTY,
};
use std::collections::HashMap;

/// Players already assigned in a partially recorded final round
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Prepaired {
    pub round_idx: Option<usize>,
    /// Player index to opponent index; a bye maps a player to itself
    pub opponents: HashMap<usize, usize>,
    pub num_forced_byes: usize,
}

impl Prepaired {
    pub fn from_request(req: &PairRequest) -> Self {
        let Some(round_idx) = req.prepaired_round_idx() else {
            return Self::default();
        };
        let removed = req.removed_set();
        let mut out = Self {
            round_idx: Some(round_idx),
            ..Self::default()
        };
        for (player_idx, &opp) in req.division_pairings[round_idx].iter().enumerate() {
            if opp < 0 || (opp as usize) < player_idx {
                continue;
            }
            let opp_idx = opp as usize;
            if removed.contains(&player_idx) || removed.contains(&opp_idx) {
                continue;
            }
            out.opponents.insert(player_idx, opp_idx);
            out.opponents.insert(opp_idx, player_idx);
            if opp_idx == player_idx {
                out.num_forced_byes += 1;
            }
        }
        out
    }

    pub fn opponent(&self, player_idx: usize) -> Option<usize> {
        self.opponents.get(&player_idx).copied()
    }

    pub fn has_bye(&self, player_idx: usize) -> bool {
        self.opponent(player_idx) == Some(player_idx)
    }
}

/// Read-only context shared by every policy
pub struct PolicyArgs<'a> {
    pub req: &'a PairRequest,
    pub precomp: &'a PrecompData,
    /// Player index per node; the bye node holds `BYE_PLAYER_INDEX`
    pub player_nodes: Vec<usize>,
    /// Pairing rounds left, counting the one being paired
    pub rounds_remaining: usize,
    pub gibson_gets_bye: bool,
    pub prepaired: &'a Prepaired,
}

impl<'a> PolicyArgs<'a> {
    pub fn new(req: &'a PairRequest, precomp: &'a PrecompData, prepaired: &'a Prepaired) -> Self {
        let num_ranks = precomp.standings.len();
        let mut player_nodes: Vec<usize> = (0..num_ranks)
            .map(|rank| precomp.standings.player_index(rank))
            .collect();
        let add_bye = (num_ranks - prepaired.num_forced_byes.min(num_ranks)) % 2 == 1;
        if add_bye {
            player_nodes.push(BYE_PLAYER_INDEX);
        }
        let gibson_gets_bye = add_bye
            && (0..num_ranks).any(|rank| precomp.is_gibsonized(rank) && precomp.gibson_group(rank) == 0);
        Self {
            req,
            precomp,
            player_nodes,
            rounds_remaining: req.pairing_rounds_remaining(),
            gibson_gets_bye,
            prepaired,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.player_nodes.len()
    }

    /// Ranked players, excluding the bye node
    pub fn num_ranks(&self) -> usize {
        self.precomp.standings.len()
    }

    pub fn bye_node(&self) -> Option<usize> {
        (self.num_nodes() > self.num_ranks()).then(|| self.num_ranks())
    }

    pub fn is_bye(&self, node: usize) -> bool {
        self.player_nodes.get(node) == Some(&BYE_PLAYER_INDEX)
    }

    pub fn node_of(&self, player_idx: usize) -> Option<usize> {
        self.player_nodes.iter().position(|&p| p == player_idx)
    }

    pub fn pairing_key(&self, ri: usize, rj: usize) -> PairingKey {
        PairingKey::new(self.player_nodes[ri], self.player_nodes[rj])
    }

    fn gibsonized(&self, node: usize) -> bool {
        !self.is_bye(node) && self.precomp.is_gibsonized(node)
    }

    fn group(&self, node: usize) -> usize {
        if self.is_bye(node) {
            0
        } else {
            self.precomp.gibson_group(node)
        }
    }

    fn abs_casher(&self) -> usize {
        self.precomp.lowest_possible_abs_casher
    }

    fn hope_casher(&self) -> usize {
        self.precomp.lowest_possible_hope_casher
    }

    fn lowest_casher_index(&self) -> usize {
        (self.req.place_prizes.max(1) - 1) as usize
    }
}

/// Node pairs a constraint policy forces or forbids
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Constraints {
    pub forced: Vec<(usize, usize)>,
    pub disallowed: Vec<(usize, usize)>,
}

impl Constraints {
    fn forced(forced: Vec<(usize, usize)>) -> Self {
        Self {
            forced,
            disallowed: Vec::new(),
        }
    }

    fn disallowed(disallowed: Vec<(usize, usize)>) -> Self {
        Self {
            forced: Vec::new(),
            disallowed,
        }
    }
}

pub struct ConstraintPolicy {
    pub name: &'static str,
    pub handler: fn(&PolicyArgs) -> Constraints,
}

pub struct WeightPolicy {
    pub name: &'static str,
    pub handler: fn(&PolicyArgs, usize, usize) -> i64,
}

pub const CONSTRAINT_POLICIES: &[ConstraintPolicy] = &[
    ConstraintPolicy {
        name: "PP",
        handler: prepaired_players,
    },
    ConstraintPolicy {
        name: "KH",
        handler: king_of_the_hill,
    },
    ConstraintPolicy {
        name: "KC",
        handler: king_of_the_hill_class_prizes,
    },
    ConstraintPolicy {
        name: "CL",
        handler: control_loss,
    },
    ConstraintPolicy {
        name: "GG",
        handler: gibson_groups,
    },
    ConstraintPolicy {
        name: "GB",
        handler: gibson_bye,
    },
    ConstraintPolicy {
        name: "TB",
        handler: top_down_byes,
    },
];

pub const WEIGHT_POLICIES: &[WeightPolicy] = &[
    WeightPolicy {
        name: "RD",
        handler: rank_difference,
    },
    WeightPolicy {
        name: "PC",
        handler: pair_with_casher,
    },
    WeightPolicy {
        name: "GC",
        handler: gibson_cashers,
    },
    WeightPolicy {
        name: "RE",
        handler: repeats,
    },
    WeightPolicy {
        name: "BB",
        handler: back_to_back,
    },
    WeightPolicy {
        name: "TR",
        handler: total_repeats,
    },
    WeightPolicy {
        name: "BR",
        handler: bye_repeats,
    },
];

fn node_pair(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Runs every constraint policy and returns the disallowed node pairs with
/// the name of the policy that disallowed each one.
pub fn disallowed_pairs(args: &PolicyArgs) -> HashMap<(usize, usize), &'static str> {
    let num_nodes = args.num_nodes();
    let mut out = HashMap::new();
    for policy in CONSTRAINT_POLICIES {
        let constraints = (policy.handler)(args);
        for &(a, b) in &constraints.disallowed {
            out.entry(node_pair(a, b)).or_insert(policy.name);
        }
        for &(a, b) in &constraints.forced {
            let forced = node_pair(a, b);
            for ri in 0..num_nodes {
                for rj in ri + 1..num_nodes {
                    if (ri, rj) == forced {
                        continue;
                    }
                    if ri == a || ri == b || rj == a || rj == b {
                        out.entry((ri, rj)).or_insert(policy.name);
                    }
                }
            }
        }
    }
    out
}

/// Sum of every weight policy for an allowed pair, `ri < rj`
pub fn weights(args: &PolicyArgs, ri: usize, rj: usize) -> Vec<i64> {
    WEIGHT_POLICIES.iter().map(|p| (p.handler)(args, ri, rj)).collect()
}

fn prepaired_players(args: &PolicyArgs) -> Constraints {
    let mut out = Constraints::default();
    if args.prepaired.round_idx.is_none() {
        return out;
    }
    for (node, &player_idx) in args.player_nodes.iter().enumerate() {
        let Some(opp_idx) = args.prepaired.opponent(player_idx) else {
            continue;
        };
        if opp_idx == player_idx {
            out.disallowed
                .extend((0..args.num_nodes()).filter(|&o| o != node).map(|o| (node, o)));
        } else if player_idx < opp_idx {
            if let Some(opp_node) = args.node_of(opp_idx) {
                out.forced.push((node, opp_node));
            }
        }
    }
    out
}

fn king_of_the_hill(args: &PolicyArgs) -> Constraints {
    if args.rounds_remaining != 1 {
        return Constraints::default();
    }
    let num_nodes = args.num_nodes();
    let mut forced = Vec::new();
    let mut rank = 0;
    while rank + 1 < num_nodes && rank <= args.abs_casher() {
        let next = rank + 1;
        if args.is_bye(rank) || args.is_bye(next) || args.gibsonized(rank) || args.gibsonized(next) {
            rank += 1;
            continue;
        }
        forced.push((rank, next));
        rank += 2;
    }
    Constraints::forced(forced)
}

fn king_of_the_hill_class_prizes(args: &PolicyArgs) -> Constraints {
    if args.rounds_remaining != 1 {
        return Constraints::default();
    }
    let num_ranks = args.num_ranks();
    let standings = &args.precomp.standings;
    let place_prizes = args.req.place_prizes.max(0) as usize;
    let cume = args.req.cumulative_gibson_spread(1).saturating_mul(2);
    let class_of = |rank: usize| args.req.player_class(args.player_nodes[rank]);
    let mut forced = Vec::new();

    for (prizes_idx, &prizes) in args.req.class_prizes.iter().enumerate() {
        let class = prizes_idx + 1;
        let mut available = prizes as i64;
        for rank in 0..=args.abs_casher().min(num_ranks.saturating_sub(1)) {
            if class_of(rank) == class && args.precomp.lowest_rank_absolutely[rank] >= place_prizes {
                available -= 1;
            }
        }
        if available < 1 {
            continue;
        }

        let mut ri = args.abs_casher() + 1;
        let mut ahead = 0;
        let mut player_to_catch: Option<usize> = None;
        loop {
            while ri < num_ranks && class_of(ri) != class {
                ri += 1;
            }
            let mut rj = ri + 1;
            while rj < num_ranks && class_of(rj) != class {
                rj += 1;
            }
            if rj >= num_ranks {
                break;
            }
            if !standings.can_catch(1, cume, ri, rj) {
                ri = rj;
                ahead += 1;
                if ahead == available {
                    break;
                }
                continue;
            }
            match available - ahead {
                2 => player_to_catch = Some(rj),
                1 => player_to_catch = Some(ri),
                _ => {
                    if let Some(target) = player_to_catch {
                        if !standings.can_catch(1, cume, target, rj) {
                            break;
                        }
                    }
                }
            }
            forced.push((ri, rj));
            ahead += 2;
            ri = rj + 1;
        }
    }
    Constraints::forced(forced)
}

fn control_loss(args: &PolicyArgs) -> Constraints {
    let Some(child) = args.precomp.destinys_child else {
        return Constraints::default();
    };
    let runner_up_allowed = args.rounds_remaining > CONTROL_LOSS_LOWEST_CONTENDER_ONLY_ROUNDS
        && args.req.control_loss_activation_round.max(0) as usize != args.precomp.complete_pairings;
    let disallowed = (1..args.num_nodes())
        .filter(|&rank| rank != child && !(runner_up_allowed && rank + 1 == child))
        .map(|rank| (0, rank))
        .collect();
    Constraints::disallowed(disallowed)
}

fn gibson_groups(args: &PolicyArgs) -> Constraints {
    let num_ranks = args.num_ranks();
    let mut disallowed = Vec::new();
    for ri in 0..num_ranks {
        for rj in ri + 1..num_ranks {
            if args.group(ri) != args.group(rj) {
                disallowed.push((ri, rj));
            }
        }
    }
    Constraints::disallowed(disallowed)
}

fn gibson_bye(args: &PolicyArgs) -> Constraints {
    let Some(bye) = args.bye_node().filter(|_| args.gibson_gets_bye) else {
        return Constraints::default();
    };
    Constraints::disallowed(
        (0..args.num_ranks())
            .filter(|&rank| !args.gibsonized(rank))
            .map(|rank| (rank, bye))
            .collect(),
    )
}

fn top_down_byes(args: &PolicyArgs) -> Constraints {
    let Some(bye) = args.bye_node().filter(|_| args.req.top_down_byes) else {
        return Constraints::default();
    };
    let candidate = (0..args.num_ranks())
        .filter(|&rank| args.prepaired.opponent(args.player_nodes[rank]).is_none())
        .min_by_key(|&rank| args.precomp.pairing_count(PairingKey::Bye(args.player_nodes[rank])));
    match candidate {
        Some(rank) => Constraints::forced(vec![(rank, bye)]),
        None => Constraints::default(),
    }
}

fn rank_difference(args: &PolicyArgs, ri: usize, rj: usize) -> i64 {
    let diff = rj.abs_diff(ri) as i64;
    if ri <= args.abs_casher() && !args.gibsonized(ri) && !args.gibsonized(rj) {
        diff * diff * diff
    } else {
        diff
    }
}

fn pair_with_casher(args: &PolicyArgs, ri: usize, rj: usize) -> i64 {
    if args.gibsonized(ri) || args.gibsonized(rj) || ri > args.hope_casher() {
        return 0;
    }
    if ri > args.lowest_casher_index() {
        let band = (args.num_ranks() + 2) / 3;
        return if rj - ri <= band { 0 } else { MAJOR_PENALTY };
    }
    let hope_nth = args.precomp.lowest_possible_hope_nth[ri];
    if rj <= hope_nth || (hope_nth == ri && ri + 1 == rj) {
        let dist = hope_nth.abs_diff(rj) as i64;
        return 2 * dist * dist * dist;
    }
    MAJOR_PENALTY
}

fn gibson_cashers(args: &PolicyArgs, ri: usize, rj: usize) -> i64 {
    let (gi, gj) = (args.gibsonized(ri), args.gibsonized(rj));
    if args.group(ri) != 0 || args.group(rj) != 0 || (gi && gj) {
        return 0;
    }
    if (gi && rj <= args.abs_casher()) || (gj && ri <= args.abs_casher()) {
        return MAJOR_PENALTY;
    }
    0
}

fn repeats(args: &PolicyArgs, ri: usize, rj: usize) -> i64 {
    let times = args.precomp.pairing_count(args.pairing_key(ri, rj)) as i64;
    let unit = (args.num_ranks() as f64 / 3.0).powi(3).floor() as i64;
    times * times * unit
}

fn back_to_back(args: &PolicyArgs, ri: usize, rj: usize) -> i64 {
    if ri <= args.hope_casher() {
        return 0;
    }
    let Some(last) = args.precomp.complete_pairings.checked_sub(1) else {
        return 0;
    };
    let pi = args.player_nodes[ri];
    let pj = args.player_nodes[rj];
    let expected = if pj == BYE_PLAYER_INDEX { pi } else { pj };
    let previous = args
        .req
        .division_pairings
        .get(last)
        .and_then(|round| round.get(pi))
        .copied();
    if previous == Some(expected as i32) {
        MINOR_PENALTY
    } else {
        0
    }
}

fn total_repeats(args: &PolicyArgs, ri: usize, rj: usize) -> i64 {
    if args.is_bye(ri) || args.is_bye(rj) {
        return 0;
    }
    let repeats = &args.precomp.repeat_counts;
    let count = |node: usize| repeats.get(args.player_nodes[node]).copied().unwrap_or(0) as i64;
    2 * (count(ri) + count(rj))
}

fn bye_repeats(args: &PolicyArgs, ri: usize, rj: usize) -> i64 {
    if args.req.allow_repeat_byes || !args.is_bye(rj) {
        return 0;
    }
    if args.precomp.pairing_count(PairingKey::Bye(args.player_nodes[ri])) > 0 {
        MAJOR_PENALTY
    } else {
        0
    }
}
