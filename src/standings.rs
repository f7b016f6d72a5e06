use crate::types::{PairRequest, BYE_PLAYER_INDEX, MAX_SIM_SPREAD};
use rand::Rng;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

/// Record of one player. Wins are counted in half-points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerRecord {
    pub wins: u32,
    pub spread: i32,
    pub player_index: usize,
}

impl PlayerRecord {
    pub fn new(player_index: usize) -> Self {
        Self {
            wins: 0,
            spread: 0,
            player_index,
        }
    }

    /// Filler that evens out an odd field during simulation
    pub fn bye() -> Self {
        Self::new(BYE_PLAYER_INDEX)
    }

    pub fn is_bye(&self) -> bool {
        self.player_index == BYE_PLAYER_INDEX
    }
}

/// Standings order: most wins first, then highest spread. The bye always sorts last.
pub fn compare_records(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    a.is_bye()
        .cmp(&b.is_bye())
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| b.spread.cmp(&a.spread))
}

/// Effect of one simulated game on the winner and loser records
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordDelta {
    pub winner_wins: u32,
    pub loser_wins: u32,
    pub spread: i32,
}

fn simulated_results() -> Vec<RecordDelta> {
    (0..=MAX_SIM_SPREAD)
        .map(|spread| {
            if spread == 0 {
                RecordDelta {
                    winner_wins: 1,
                    loser_wins: 1,
                    spread,
                }
            } else {
                RecordDelta {
                    winner_wins: 2,
                    loser_wins: 0,
                    spread,
                }
            }
        })
        .collect()
}

/// Parameters shared by every simulation run
#[derive(Clone, Copy, Debug)]
pub struct SimConfig<'a> {
    pub sims: usize,
    pub max_factor: usize,
    pub rounds_remaining: usize,
    /// Clinched flag per rank of the real standings
    pub gibsonized: &'a [bool],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimResults {
    /// `final_ranks[starting_rank][final_rank]` = number of trials
    pub final_ranks: Vec<Vec<u32>>,
    pub gibson_groups: Vec<usize>,
    pub segment_round_factors: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlLossResults {
    pub highest_control_loss_rank: Option<usize>,
    pub lowest_factor_pair_wins: u32,
    /// Tournament wins per tested rank; `None` when the rank failed to win
    /// every trial while always facing the leader
    pub all_control_losses: BTreeMap<usize, Option<u32>>,
}

/// Synthetic pairings used to drive the simulation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentPlan {
    /// `pairings[round]` lists ranks in slot order; slots `2k` and `2k+1` play
    pub pairings: Vec<Vec<usize>>,
    pub sort_ranges: Vec<Range<usize>>,
    pub gibson_groups: Vec<usize>,
    pub round_factors: Vec<usize>,
}

impl SegmentPlan {
    /// Splits the ranks at every clinched rank and factor-pairs each segment.
    ///
    /// A run of non-clinched ranks closed by a clinched rank becomes its own
    /// group. An odd run absorbs the clinched rank so that it can be paired;
    /// otherwise the clinched rank is left over and plays at the bottom.
    pub fn build(gibsonized: &[bool], rounds_remaining: usize, max_factor: usize) -> Self {
        let num_ranks = gibsonized.len();
        let mut plan = SegmentPlan {
            pairings: vec![Vec::with_capacity(num_ranks); rounds_remaining],
            sort_ranges: Vec::new(),
            gibson_groups: vec![0; num_ranks],
            round_factors: Vec::new(),
        };
        let mut next_group = 1;
        let mut start = 0;
        let mut leftovers = Vec::new();
        for end in 0..num_ranks {
            if !gibsonized[end] {
                continue;
            }
            if end > start {
                let size = end - start;
                let segment = if size % 2 == 1 { start..end + 1 } else { start..end };
                for rank in segment.clone() {
                    plan.gibson_groups[rank] = next_group;
                }
                next_group += 1;
                plan.add_segment(segment, &[], rounds_remaining, max_factor);
                if size % 2 == 0 {
                    leftovers.push(end);
                }
            } else {
                leftovers.push(end);
            }
            start = end + 1;
        }
        plan.add_segment(start..num_ranks, &leftovers, rounds_remaining, max_factor);
        plan
    }

    fn add_segment(
        &mut self,
        segment: Range<usize>,
        leftovers: &[usize],
        rounds_remaining: usize,
        max_factor: usize,
    ) {
        let size = segment.len();
        for (round_idx, rounds_left) in (1..=rounds_remaining).rev().enumerate() {
            let factor = rounds_left.min(max_factor).min(size / 2);
            self.round_factors.push(factor);
            let slots = &mut self.pairings[round_idx];
            for k in 0..factor {
                slots.push(segment.start + k);
                slots.push(segment.start + k + factor);
            }
            // Adjacent pairs follow; an odd remainder meets the first leftover
            slots.extend(segment.start + 2 * factor..segment.end);
            slots.extend_from_slice(leftovers);
        }
        if size > 1 {
            self.sort_ranges.push(segment);
        }
    }
}

#[derive(Clone, Debug)]
pub struct Standings {
    records: Vec<PlayerRecord>,
    backup: Vec<PlayerRecord>,
    possible_results: Vec<RecordDelta>,
    tie_results: usize,
}

impl Standings {
    pub fn from_records(records: Vec<PlayerRecord>) -> Self {
        let possible_results = simulated_results();
        let tie_results = possible_results.iter().filter(|r| r.spread == 0).count();
        let mut standings = Self {
            backup: Vec::with_capacity(records.len() + 1),
            records,
            possible_results,
            tie_results,
        };
        standings.sort();
        standings
    }

    /// Replays every recorded result and ranks the players still in the event
    pub fn from_request(req: &PairRequest) -> Self {
        let num_players = req.all_players.max(0) as usize;
        let mut records: Vec<PlayerRecord> = (0..num_players).map(PlayerRecord::new).collect();

        for (round_idx, scores) in req.division_results.iter().enumerate() {
            let Some(pairings) = req.division_pairings.get(round_idx) else {
                continue;
            };
            for (player_idx, &score) in scores.iter().enumerate().take(num_players) {
                let Some(&opp) = pairings.get(player_idx) else {
                    continue;
                };
                if opp < 0 {
                    continue;
                }
                let opp_idx = opp as usize;
                if opp_idx == player_idx {
                    let record = &mut records[player_idx];
                    if score >= 0 {
                        record.wins += 2;
                    }
                    record.spread = record.spread.saturating_add(score);
                } else if player_idx < opp_idx && opp_idx < num_players {
                    let diff = score.saturating_sub(scores.get(opp_idx).copied().unwrap_or(0));
                    match diff.cmp(&0) {
                        Ordering::Greater => records[player_idx].wins += 2,
                        Ordering::Less => records[opp_idx].wins += 2,
                        Ordering::Equal => {
                            records[player_idx].wins += 1;
                            records[opp_idx].wins += 1;
                        }
                    }
                    records[player_idx].spread = records[player_idx].spread.saturating_add(diff);
                    records[opp_idx].spread = records[opp_idx].spread.saturating_sub(diff);
                }
            }
        }

        let removed = req.removed_set();
        records.retain(|r| !removed.contains(&r.player_index));
        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn player_index(&self, rank: usize) -> usize {
        self.records[rank].player_index
    }

    pub fn wins(&self, rank: usize) -> f64 {
        self.records[rank].wins as f64 / 2.0
    }

    pub fn spread(&self, rank: usize) -> i32 {
        self.records[rank].spread
    }

    pub fn rank_of(&self, player_idx: usize) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.player_index == player_idx)
    }

    pub fn sort(&mut self) {
        self.records.sort_by(compare_records);
    }

    pub fn backup(&mut self) {
        self.backup.clear();
        self.backup.extend_from_slice(&self.records);
    }

    pub fn restore(&mut self) {
        self.records.clear();
        self.records.extend_from_slice(&self.backup);
    }

    /// Whether rank `j` can still finish ahead of rank `i` (`i` above `j`).
    pub fn can_catch(&self, rounds_remaining: usize, cume_gibson_spread: i32, i: usize, j: usize) -> bool {
        let ri = &self.records[i];
        let rj = &self.records[j];
        let win_diff = ri.wins as i64 - rj.wins as i64;
        let max_swing = rounds_remaining as i64 * 2;
        if win_diff != max_swing {
            return win_diff < max_swing;
        }
        if rj.spread >= ri.spread {
            return true;
        }
        (ri.spread as i64 - rj.spread as i64) <= cume_gibson_spread as i64
    }

    /// Ranks inside the place prizes that can neither be caught from below
    /// nor catch the rank above.
    pub fn gibsonized(&self, rounds_remaining: usize, cume_gibson_spread: i32, place_prizes: usize) -> Vec<bool> {
        let num_ranks = self.len();
        let mut gibsonized = vec![false; num_ranks];
        for rank in 0..place_prizes.min(num_ranks) {
            let catches_above =
                rank > 0 && self.can_catch(rounds_remaining, cume_gibson_spread, rank - 1, rank);
            let caught_from_below = rank + 1 < num_ranks
                && self.can_catch(rounds_remaining, cume_gibson_spread, rank, rank + 1);
            gibsonized[rank] = !catches_above && !caught_from_below;
        }
        gibsonized
    }

    /// Row of the standings table used throughout the report
    pub fn row_strings(&self, req: &PairRequest, rank: usize) -> Vec<String> {
        let player_idx = self.player_index(rank);
        vec![
            (rank + 1).to_string(),
            (player_idx + 1).to_string(),
            req.player_name(player_idx).to_string(),
            format!("{:.1}", self.wins(rank)),
            self.spread(rank).to_string(),
        ]
    }

    /// Projects final ranks by factor pairing each clinched segment.
    ///
    /// Returns `None` when `previous_factors` matches the plan this run would
    /// use, since the outcome would not differ from the previous run.
    pub fn sim_factor_pair<R: Rng>(
        &mut self,
        rng: &mut R,
        config: &SimConfig,
        previous_factors: Option<&[usize]>,
    ) -> Option<SimResults> {
        let num_players = self.len();
        let mut results = self.with_evener(config.gibsonized, |standings, gibsonized| {
            let plan = SegmentPlan::build(gibsonized, config.rounds_remaining, config.max_factor);
            if previous_factors == Some(plan.round_factors.as_slice()) {
                return None;
            }
            let final_ranks = standings.run_trials(rng, &plan, config);
            Some(SimResults {
                final_ranks,
                gibson_groups: plan.gibson_groups,
                segment_round_factors: plan.round_factors,
            })
        })?;
        results.final_ranks.truncate(num_players);
        for row in &mut results.final_ranks {
            row.truncate(num_players);
        }
        results.gibson_groups.truncate(num_players);
        Some(results)
    }

    /// Binary search for the lowest-ranked contender that wins the event
    /// whenever it wins out, and records how often it wins under factor pairing.
    pub fn sim_control_loss<R: Rng>(
        &mut self,
        rng: &mut R,
        config: &SimConfig,
        cume_gibson_spread: i32,
    ) -> ControlLossResults {
        let sims = config.sims as u32;
        let mut out = ControlLossResults {
            highest_control_loss_rank: None,
            lowest_factor_pair_wins: sims + 1,
            all_control_losses: BTreeMap::new(),
        };
        let num_players = self.len();
        if num_players < 2 {
            return out;
        }

        let mut right = 1;
        while right < num_players && self.can_catch(config.rounds_remaining, cume_gibson_spread, 0, right) {
            right += 1;
        }
        let mut right = right as isize - 1;
        let mut left: isize = 1;

        self.with_evener(config.gibsonized, |standings, gibsonized| {
            let mut plan = SegmentPlan::build(gibsonized, config.rounds_remaining, config.max_factor);
            standings.backup();
            while left <= right {
                let rank = ((left + right) / 2) as usize;
                let player_idx = standings.player_index(rank);
                let vs_first = standings.sim_force_winner(rng, &mut plan, config, player_idx, true);
                if vs_first < sims {
                    out.all_control_losses.insert(rank, None);
                    right = rank as isize - 1;
                    continue;
                }
                let factor_wins = standings.sim_force_winner(rng, &mut plan, config, player_idx, false);
                out.all_control_losses.insert(rank, Some(factor_wins));
                if factor_wins < out.lowest_factor_pair_wins {
                    out.lowest_factor_pair_wins = factor_wins;
                    out.highest_control_loss_rank = Some(rank);
                    left = rank as isize + 1;
                } else {
                    right = rank as isize - 1;
                }
            }
        });
        out
    }

    fn with_evener<T>(&mut self, gibsonized: &[bool], run: impl FnOnce(&mut Self, &[bool]) -> T) -> T {
        let mut evened_gibsonized = gibsonized.to_vec();
        evened_gibsonized.resize(self.len(), false);
        let evener_added = self.len() % 2 == 1;
        if evener_added {
            self.records.push(PlayerRecord::bye());
            evened_gibsonized.push(false);
        }
        let out = run(self, &evened_gibsonized);
        if evener_added {
            self.records.retain(|r| !r.is_bye());
        }
        out
    }

    fn run_trials<R: Rng>(&mut self, rng: &mut R, plan: &SegmentPlan, config: &SimConfig) -> Vec<Vec<u32>> {
        let num_ranks = self.len();
        let starting_rank: HashMap<usize, usize> = self
            .records
            .iter()
            .enumerate()
            .map(|(rank, r)| (r.player_index, rank))
            .collect();
        let mut final_ranks = vec![vec![0u32; num_ranks]; num_ranks];
        self.backup();
        for _ in 0..config.sims {
            for round_idx in 0..config.rounds_remaining {
                self.sim_round(rng, &plan.pairings[round_idx], &plan.sort_ranges, None);
            }
            for (final_rank, record) in self.records.iter().enumerate() {
                if let Some(&start) = starting_rank.get(&record.player_index) {
                    final_ranks[start][final_rank] += 1;
                }
            }
            self.restore();
        }
        final_ranks
    }

    fn sim_round<R: Rng>(
        &mut self,
        rng: &mut R,
        slots: &[usize],
        sort_ranges: &[Range<usize>],
        forced_winner: Option<usize>,
    ) {
        let num_results = self.possible_results.len();
        for pair in slots.chunks_exact(2) {
            let (a, b) = (pair[0], pair[1]);
            let (winner, loser, result_idx) = match forced_winner {
                Some(forced) if forced == a || forced == b => {
                    let other = if forced == a { b } else { a };
                    // The forced winner never ties
                    (forced, other, rng.gen_range(self.tie_results..num_results))
                }
                _ => {
                    let (winner, loser) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
                    (winner, loser, rng.gen_range(0..num_results))
                }
            };
            let delta = self.possible_results[result_idx];
            self.records[winner].wins += delta.winner_wins;
            self.records[winner].spread = self.records[winner].spread.saturating_add(delta.spread);
            self.records[loser].wins += delta.loser_wins;
            self.records[loser].spread = self.records[loser].spread.saturating_sub(delta.spread);
        }
        for range in sort_ranges {
            self.records[range.clone()].sort_by(compare_records);
        }
    }

    /// Counts the trials in which `player_idx` finishes first while winning every game.
    ///
    /// With `vs_first` the player is moved into the leader's pairing each
    /// round, and the count stops at the first trial the player fails to win.
    fn sim_force_winner<R: Rng>(
        &mut self,
        rng: &mut R,
        plan: &mut SegmentPlan,
        config: &SimConfig,
        player_idx: usize,
        vs_first: bool,
    ) -> u32 {
        let mut tournament_wins = 0;
        for _ in 0..config.sims {
            for round_idx in 0..config.rounds_remaining {
                let Some(forced_rank) = self.rank_of(player_idx) else {
                    break;
                };
                let slots = &mut plan.pairings[round_idx];
                let switch_idx = if vs_first {
                    slots.iter().position(|&rank| rank == forced_rank)
                } else {
                    None
                };
                if let Some(idx) = switch_idx {
                    slots.swap(1, idx);
                }
                self.sim_round(rng, &plan.pairings[round_idx], &plan.sort_ranges, Some(forced_rank));
                if let Some(idx) = switch_idx {
                    plan.pairings[round_idx].swap(1, idx);
                }
            }
            let won = self.records.first().map(|r| r.player_index) == Some(player_idx);
            if won {
                tournament_wins += 1;
            }
            self.restore();
            if vs_first && !won {
                return 0;
            }
        }
        tournament_wins
    }
}
