use crate::report::{header, Report};
use crate::standings::{SimConfig, SimResults, Standings};
use crate::types::{PairRequest, PairingKey};
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

const STANDINGS_HEADER: [&str; 5] = ["Rank", "Num", "Name", "Wins", "Spr"];

#[derive(Clone, Debug)]
pub struct PrecompData {
    pub standings: Standings,
    /// Times each pairing has been recorded, including the prepaired round
    pub pairing_counts: HashMap<PairingKey, u32>,
    /// Per player index, how many of their pairings were repeats
    pub repeat_counts: Vec<u32>,
    pub highest_rank_hopefully: Vec<usize>,
    pub highest_rank_absolutely: Vec<usize>,
    pub lowest_rank_absolutely: Vec<usize>,
    /// `lowest_possible_hope_nth[n]`: lowest rank that can still hope to finish `n`th or better
    pub lowest_possible_hope_nth: Vec<usize>,
    pub lowest_possible_abs_casher: usize,
    pub lowest_possible_hope_casher: usize,
    pub highest_control_loss_rank: Option<usize>,
    /// Rank the leader is steered toward once control loss applies
    pub destinys_child: Option<usize>,
    /// Per rank
    pub gibson_groups: Vec<usize>,
    /// Per rank
    pub gibsonized: Vec<bool>,
    pub complete_pairings: usize,
}

impl PrecompData {
    pub fn pairing_count(&self, key: PairingKey) -> u32 {
        self.pairing_counts.get(&key).copied().unwrap_or(0)
    }

    pub fn is_gibsonized(&self, rank: usize) -> bool {
        self.gibsonized.get(rank).copied().unwrap_or(false)
    }

    pub fn gibson_group(&self, rank: usize) -> usize {
        self.gibson_groups.get(rank).copied().unwrap_or(0)
    }

    /// Gibsonized players of the whole division, indexed by player index
    pub fn gibsonized_players(&self, all_players: usize) -> Vec<bool> {
        let mut out = vec![false; all_players];
        for (rank, &clinched) in self.gibsonized.iter().enumerate() {
            let player_idx = self.standings.player_index(rank);
            if let Some(slot) = out.get_mut(player_idx) {
                *slot = clinched;
            }
        }
        out
    }
}

/// Runs the projections and derives everything the policy engine needs.
///
/// The request must already have passed verification.
pub fn compute<R: Rng>(req: &PairRequest, rng: &mut R, report: &mut Report) -> PrecompData {
    let mut standings = Standings::from_request(req);
    let num_ranks = standings.len();
    let place_prizes = req.place_prizes.max(1) as usize;
    let rounds_remaining = req.standings_rounds_remaining();
    let cume_gibson_spread = req.cumulative_gibson_spread(rounds_remaining);
    let gibsonized = standings.gibsonized(rounds_remaining, cume_gibson_spread, place_prizes);
    let division_sims = req.division_sims.max(1) as usize;
    let min_hopeful_trials = ((division_sims as f64 * req.hopefulness_threshold).round() as u32).max(1);

    let initial_config = SimConfig {
        sims: division_sims,
        max_factor: rounds_remaining,
        rounds_remaining,
        gibsonized: &gibsonized,
    };
    let initial = standings
        .sim_factor_pair(rng, &initial_config, None)
        .unwrap_or_else(|| empty_results(num_ranks));
    write_final_ranks(
        report,
        &format!("Initial Sim Results (factor ceiling of {})", rounds_remaining),
        &initial.final_ranks,
        &standings,
        req,
    );

    let highest_open_rank = gibsonized.iter().position(|&g| !g).unwrap_or(0);
    let max_factor = (highest_open_rank + 1..num_ranks)
        .take_while(|&rank| initial.final_ranks[rank][highest_open_rank] >= min_hopeful_trials)
        .count();
    let open_group = initial.gibson_groups.get(highest_open_rank).copied().unwrap_or(0);
    let open_group_size = initial.gibson_groups[highest_open_rank.min(num_ranks)..]
        .iter()
        .take_while(|&&g| g == open_group)
        .count();
    debug!(max_factor, open_group_size, "tightened factor ceiling");

    let mut improved = None;
    if max_factor * 2 < open_group_size {
        let config = SimConfig {
            max_factor,
            ..initial_config
        };
        improved = standings.sim_factor_pair(rng, &config, Some(initial.segment_round_factors.as_slice()));
    }
    let sim = match improved {
        Some(results) => {
            write_final_ranks(
                report,
                &format!("Improved Factor Sim Results (factor ceiling of {})", max_factor),
                &results.final_ranks,
                &standings,
                req,
            );
            results
        }
        None => {
            report.line("No factor improvement made.");
            report.line("");
            initial
        }
    };

    let (highest_rank_hopefully, highest_rank_absolutely, lowest_rank_absolutely) =
        rank_bounds(&sim.final_ranks, min_hopeful_trials);

    let lowest_possible_hope_nth: Vec<usize> = (0..num_ranks)
        .map(|nth| {
            highest_rank_hopefully
                .iter()
                .rposition(|&hrh| hrh <= nth)
                .map_or(nth, |rank| rank.max(nth))
        })
        .collect();
    let lowest_possible_abs_casher = highest_rank_absolutely
        .iter()
        .rposition(|&hra| hra < place_prizes)
        .unwrap_or(0);
    let lowest_possible_hope_casher = lowest_possible_hope_nth
        .get(place_prizes - 1)
        .copied()
        .unwrap_or(num_ranks.saturating_sub(1));

    let complete_pairings = req.complete_pairings();
    let control_loss_active = req.use_control_loss
        && complete_pairings >= req.control_loss_activation_round.max(0) as usize
        && !gibsonized.first().copied().unwrap_or(false);

    let mut all_control_losses = None;
    let mut highest_control_loss_rank = None;
    if control_loss_active {
        let control_loss_sims = req.control_loss_sims.max(1) as usize;
        let config = SimConfig {
            sims: control_loss_sims,
            max_factor,
            rounds_remaining,
            gibsonized: &gibsonized,
        };
        let results = standings.sim_control_loss(rng, &config, cume_gibson_spread);
        let loss_rate = 1.0 - results.lowest_factor_pair_wins as f64 / control_loss_sims as f64;
        if results.highest_control_loss_rank.is_some() && loss_rate >= req.control_loss_threshold {
            highest_control_loss_rank = results.highest_control_loss_rank;
        }
        debug!(?highest_control_loss_rank, loss_rate, "control loss simulated");
        all_control_losses = Some(results.all_control_losses);
    }

    let destinys_child = highest_control_loss_rank
        .map(|rank| rank.min(lowest_possible_hope_nth.first().copied().unwrap_or(0)))
        .filter(|&rank| rank >= 1);

    let (pairing_counts, repeat_counts) = count_pairings(req);

    write_precomp_data(
        report,
        &standings,
        req,
        &sim,
        &gibsonized,
        &highest_rank_hopefully,
        &highest_rank_absolutely,
        all_control_losses.as_ref(),
    );

    debug!(
        lowest_possible_abs_casher,
        lowest_possible_hope_casher,
        ?destinys_child,
        "precomputation finished"
    );

    PrecompData {
        standings,
        pairing_counts,
        repeat_counts,
        highest_rank_hopefully,
        highest_rank_absolutely,
        lowest_rank_absolutely,
        lowest_possible_hope_nth,
        lowest_possible_abs_casher,
        lowest_possible_hope_casher,
        highest_control_loss_rank,
        destinys_child,
        gibson_groups: sim.gibson_groups,
        gibsonized,
        complete_pairings,
    }
}

fn empty_results(num_ranks: usize) -> SimResults {
    SimResults {
        final_ranks: vec![vec![0; num_ranks]; num_ranks],
        gibson_groups: vec![0; num_ranks],
        segment_round_factors: Vec::new(),
    }
}

/// Highest hopeful, highest absolute and lowest absolute final rank per starting rank
fn rank_bounds(final_ranks: &[Vec<u32>], min_hopeful_trials: u32) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
    let num_ranks = final_ranks.len();
    let last = num_ranks.saturating_sub(1);
    let mut hopefully = Vec::with_capacity(num_ranks);
    let mut absolutely = Vec::with_capacity(num_ranks);
    let mut lowest = Vec::with_capacity(num_ranks);
    for row in final_ranks {
        let mut running = 0;
        let hope = row
            .iter()
            .position(|&count| {
                running += count;
                running >= min_hopeful_trials
            })
            .unwrap_or(last);
        hopefully.push(hope);
        absolutely.push(row.iter().position(|&c| c > 0).unwrap_or(last));
        lowest.push(row.iter().rposition(|&c| c > 0).unwrap_or(0));
    }
    (hopefully, absolutely, lowest)
}

/// Counts every recorded pairing, and how often each player has repeated an opponent
pub fn count_pairings(req: &PairRequest) -> (HashMap<PairingKey, u32>, Vec<u32>) {
    let mut counts: HashMap<PairingKey, u32> = HashMap::new();
    let mut repeats = vec![0u32; req.all_players.max(0) as usize];
    for round in &req.division_pairings {
        for (player_idx, &opp) in round.iter().enumerate() {
            if opp < 0 || opp as usize > player_idx {
                continue;
            }
            let opp_idx = opp as usize;
            let count = counts.entry(PairingKey::new(player_idx, opp_idx)).or_insert(0);
            if *count > 0 {
                repeats[player_idx] += 1;
                if player_idx != opp_idx {
                    repeats[opp_idx] += 1;
                }
            }
            *count += 1;
        }
    }
    (counts, repeats)
}

fn with_standings(standings: &Standings, req: &PairRequest, rank: usize, extra: Vec<String>) -> Vec<String> {
    let mut row = standings.row_strings(req, rank);
    row.extend(extra);
    row
}

fn write_final_ranks(
    report: &mut Report,
    title: &str,
    final_ranks: &[Vec<u32>],
    standings: &Standings,
    req: &PairRequest,
) {
    let num_ranks = standings.len();
    let mut cols = header(&STANDINGS_HEADER);
    cols.extend((1..=num_ranks).map(|r| r.to_string()));
    let rows: Vec<Vec<String>> = (0..num_ranks)
        .map(|rank| {
            let counts = final_ranks
                .get(rank)
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .unwrap_or_else(|| vec![String::new(); num_ranks]);
            with_standings(standings, req, rank, counts)
        })
        .collect();
    report.table(title, &cols, &rows);
}

#[allow(clippy::too_many_arguments)]
fn write_precomp_data(
    report: &mut Report,
    standings: &Standings,
    req: &PairRequest,
    sim: &SimResults,
    gibsonized: &[bool],
    highest_rank_hopefully: &[usize],
    highest_rank_absolutely: &[usize],
    all_control_losses: Option<&BTreeMap<usize, Option<u32>>>,
) {
    let mut cols = header(&STANDINGS_HEADER);
    cols.extend(header(&["Gb", "Gr", "H", "A"]));
    if all_control_losses.is_some() {
        cols.push("CLf".to_string());
    }
    let rows: Vec<Vec<String>> = (0..standings.len())
        .map(|rank| {
            let mut extra = vec![
                if gibsonized[rank] { "Yes" } else { "" }.to_string(),
                (sim.gibson_groups[rank] + 1).to_string(),
                (highest_rank_hopefully[rank] + 1).to_string(),
                (highest_rank_absolutely[rank] + 1).to_string(),
            ];
            if let Some(losses) = all_control_losses {
                extra.push(match losses.get(&rank) {
                    Some(Some(wins)) => wins.to_string(),
                    Some(None) => "-".to_string(),
                    None => String::new(),
                });
            }
            with_standings(standings, req, rank, extra)
        })
        .collect();
    report.table("Precomp Data", &cols, &rows);
}
