use crate::clock;
use crate::matching::{self, Edge};
use crate::policy::{self, PolicyArgs, Prepaired, WEIGHT_POLICIES};
use crate::precomp::{self, PrecompData};
use crate::report::{header, Report};
use crate::types::{PairError, PairErrorCode, PairRequest, PairResponse, BYE_PLAYER_INDEX, UNPAIRED};
use crate::verify::verify;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::{debug, info, warn};

const MATCHUP_HEADER: [&str; 6] = ["Player", "W", "S", "Player", "W", "S"];

struct Paired {
    pairings: Vec<i32>,
    gibsonized_players: Vec<bool>,
}

/// Pairs the next round of a division.
///
/// Never panics on bad input: rejected requests and failed pairings come back
/// as a response with a non-success error code, and the report is always filled.
pub fn cop_pair(req: &PairRequest) -> PairResponse {
    let started = clock::now_millis();
    let seed = if req.seed == 0 { clock::clock_seed() } else { req.seed };

    let mut report = Report::new();
    report.json("Abridged pair request", &req.abridged());
    report.line(format!("Seed: {}", seed));
    report.line("");

    let outcome = pair_with_report(req, seed, &mut report);
    let finished = clock::now_millis();

    let mut resp = match outcome {
        Ok(paired) => {
            info!(seed, players = req.all_players, "pairing finished");
            report.line("COP finished successfully.");
            PairResponse {
                error_code: PairErrorCode::Success,
                pairings: paired.pairings,
                gibsonized_players: paired.gibsonized_players,
                ..PairResponse::default()
            }
        }
        Err(err) => {
            warn!(seed, code = %err.code, message = %err.message, "pairing failed");
            report.line(format!("COP finished with error:\n\n{}", err.message));
            PairResponse {
                error_code: err.code,
                error_message: err.message,
                ..PairResponse::default()
            }
        }
    };

    report.line("");
    report.line(format!("Started:  {}", clock::format_timestamp(started)));
    report.line(format!("Finished: {}", clock::format_timestamp(finished)));
    report.line(format!("Duration: {}ms", finished - started));
    report.line("");
    report.json("Pair request", req);

    resp.seed = seed;
    resp.log = report.into_string();
    resp
}

fn pair_with_report(req: &PairRequest, seed: u64, report: &mut Report) -> Result<Paired, PairError> {
    verify(req)?;
    debug!("request verified");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let precomp = precomp::compute(req, &mut rng, report);
    let pairings = min_weight_pairings(req, &precomp, report)?;
    Ok(Paired {
        pairings,
        gibsonized_players: precomp.gibsonized_players(req.all_players.max(0) as usize),
    })
}

fn player_label(req: &PairRequest, player_idx: usize) -> String {
    if player_idx == BYE_PLAYER_INDEX {
        "BYE".to_string()
    } else {
        format!("(#{}) {}", player_idx + 1, req.player_name(player_idx))
    }
}

/// `Player`, `W`, `S` cells for one node
fn node_cells(args: &PolicyArgs, node: usize) -> Vec<String> {
    if args.is_bye(node) {
        return vec!["BYE".to_string(), String::new(), String::new()];
    }
    let row = args.precomp.standings.row_strings(args.req, node);
    vec![
        format!("{} (#{}) {}", row[0], row[1], row[2]),
        row[3].clone(),
        row[4].clone(),
    ]
}

fn matchup_cells(args: &PolicyArgs, ri: usize, rj: usize) -> Vec<String> {
    let mut cells = node_cells(args, ri);
    cells.extend(node_cells(args, rj));
    cells
}

fn min_weight_pairings(req: &PairRequest, precomp: &PrecompData, report: &mut Report) -> Result<Vec<i32>, PairError> {
    let prepaired = Prepaired::from_request(req);
    let mut forced_players: Vec<(usize, usize)> = prepaired
        .opponents
        .iter()
        .filter(|(p, o)| p <= o)
        .map(|(&p, &o)| (p, o))
        .collect();
    forced_players.sort_unstable();
    for &(player_idx, opp_idx) in &forced_players {
        let opp = if player_idx == opp_idx {
            "BYE".to_string()
        } else {
            player_label(req, opp_idx)
        };
        report.line(format!("Forcing {} vs {}", player_label(req, player_idx), opp));
    }
    report.line("");
    report.line(format!("Forcing {} bye(s)", prepaired.num_forced_byes));
    report.line("");

    let args = PolicyArgs::new(req, precomp, &prepaired);
    let num_nodes = args.num_nodes();
    let node_name = |node: Option<usize>| {
        node.and_then(|n| args.player_nodes.get(n))
            .map(|&p| req.player_name(p).to_string())
            .unwrap_or_else(|| "(none)".to_string())
    };

    report.line(format!("Control Loss Sims: {}", req.control_loss_sims));
    report.line(format!(
        "Lowest Hopeful Casher: {}",
        node_name(Some(precomp.lowest_possible_hope_casher))
    ));
    report.line(format!(
        "Lowest Absolute Casher: {}",
        node_name(Some(precomp.lowest_possible_abs_casher))
    ));
    report.line(format!(
        "Number of Pairings (including prepaired): {}",
        req.division_pairings.len()
    ));
    report.line(format!("Number of Results: {}", req.division_results.len()));
    report.line(format!("Rounds Remaining: {}", args.rounds_remaining));
    report.line(format!("Using Unforced Bye: {}", args.bye_node().is_some()));
    report.line(format!("Gibson Gets Bye: {}", args.gibson_gets_bye));
    report.line(format!(
        "Prepaired Round (0 for none): {}",
        prepaired.round_idx.map_or(0, |idx| idx + 1)
    ));
    report.line(format!("Destinys Child: {}", node_name(precomp.destinys_child)));
    report.line("");

    let disallowed = policy::disallowed_pairs(&args);
    debug!(num_nodes, disallowed = disallowed.len(), "constraints applied");

    let mut cols = header(&MATCHUP_HEADER);
    cols.extend(header(&["S", "C", "PTP", "Total"]));
    cols.extend(WEIGHT_POLICIES.iter().map(|p| p.name.to_string()));
    let selected_col = MATCHUP_HEADER.len();

    let mut edges = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row_of: HashMap<(usize, usize), usize> = HashMap::new();
    for ri in 0..num_nodes {
        for rj in ri + 1..num_nodes {
            let mut row = matchup_cells(&args, ri, rj);
            row.push(String::new());
            match disallowed.get(&(ri, rj)) {
                Some(reason) => {
                    row.push(reason.to_string());
                    row.resize(cols.len(), String::new());
                }
                None => {
                    let weights = policy::weights(&args, ri, rj);
                    let total: i64 = weights.iter().sum();
                    row.push(String::new());
                    row.push(precomp.pairing_count(args.pairing_key(ri, rj)).to_string());
                    row.push(total.to_string());
                    row.extend(weights.iter().map(|w| w.to_string()));
                    edges.push(Edge::new(ri, rj, total));
                }
            }
            row_of.insert((ri, rj), rows.len());
            rows.push(row);
        }
        if ri + 2 < num_nodes {
            rows.push(vec![String::new(); cols.len()]);
        }
    }

    let matched = matching::solve(num_nodes, &edges, true).map_err(|e| {
        PairError::new(
            PairErrorCode::MinWeightMatching,
            format!("min weight matching error: {}", e),
        )
    })?;
    if matched.mates.len() != num_nodes {
        return Err(PairError::new(
            PairErrorCode::InvalidPairingsLength,
            format!(
                "invalid pairings length {} for {} players",
                matched.mates.len(),
                num_nodes
            ),
        ));
    }
    debug!(total_weight = matched.total_weight, "matching solved");

    let chosen: Vec<(usize, usize)> = matched
        .mates
        .iter()
        .enumerate()
        .filter_map(|(ri, mate)| mate.filter(|&rj| rj > ri).map(|rj| (ri, rj)))
        .collect();
    for pair in &chosen {
        if let Some(&idx) = row_of.get(pair) {
            rows[idx][selected_col] = "*".to_string();
        }
    }
    report.table("Pairing Weights", &cols, &rows);

    let mut final_cols = header(&MATCHUP_HEADER);
    final_cols.push("Previous Times Played".to_string());
    let final_rows: Vec<Vec<String>> = chosen
        .iter()
        .map(|&(ri, rj)| {
            let mut row = matchup_cells(&args, ri, rj);
            row.push(precomp.pairing_count(args.pairing_key(ri, rj)).to_string());
            row
        })
        .collect();
    report.table("Final COP Pairings", &final_cols, &final_rows);
    report.line(format!("Total Weight: {}", matched.total_weight));

    assemble(req, &args.player_nodes, &prepaired, &matched.mates, report)
}

/// Converts node mates into opponents by player index
fn assemble(
    req: &PairRequest,
    player_nodes: &[usize],
    prepaired: &Prepaired,
    mates: &[Option<usize>],
    report: &mut Report,
) -> Result<Vec<i32>, PairError> {
    let mut pairings = vec![UNPAIRED; req.all_players.max(0) as usize];
    let mut unpaired = Vec::new();
    let mut prepaired_lines = Vec::new();

    for (node, &player_idx) in player_nodes.iter().enumerate() {
        if player_idx == BYE_PLAYER_INDEX {
            continue;
        }
        let mate = mates.get(node).copied().flatten();
        let opp_idx = match (mate, prepaired.opponent(player_idx)) {
            (Some(mate), Some(prepaired_opp)) if player_nodes[mate] != prepaired_opp => {
                return Err(PairError::new(
                    PairErrorCode::Overconstrained,
                    format!(
                        "player {} is prepaired but was still paired by COP",
                        req.player_name(player_idx)
                    ),
                ));
            }
            (_, Some(prepaired_opp)) => {
                if player_idx <= prepaired_opp {
                    let opp = if player_idx == prepaired_opp {
                        "BYE".to_string()
                    } else {
                        player_label(req, prepaired_opp)
                    };
                    prepaired_lines.push(format!("{} vs {}", player_label(req, player_idx), opp));
                }
                prepaired_opp
            }
            (Some(mate), None) => match player_nodes[mate] {
                BYE_PLAYER_INDEX => player_idx,
                opp => opp,
            },
            (None, None) => {
                unpaired.push(player_idx);
                continue;
            }
        };
        pairings[player_idx] = opp_idx as i32;
    }

    if !prepaired_lines.is_empty() {
        report.line("");
        report.line("Prepaired players:");
        report.line("");
        for line in prepaired_lines {
            report.line(line);
        }
    }

    let removed = req.removed_set();
    if !removed.is_empty() {
        let mut removed: Vec<usize> = removed.into_iter().collect();
        removed.sort_unstable();
        report.line("");
        report.line("Removed players:");
        report.line("");
        for player_idx in removed {
            report.line(player_label(req, player_idx));
        }
    }
    report.line("");

    if !unpaired.is_empty() {
        let names: String = unpaired
            .iter()
            .map(|&p| format!("{}\n", req.player_name(p)))
            .collect();
        return Err(PairError::new(
            PairErrorCode::Overconstrained,
            format!(
                "COP pairings could not be completed because there were too many constraints. The unpaired players are:\n\n{}",
                names
            ),
        ));
    }
    Ok(pairings)
}
