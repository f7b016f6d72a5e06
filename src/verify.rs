use crate::types::{PairError, PairErrorCode, PairRequest, MAX_PLAYER_COUNT, UNPAIRED};
use std::collections::HashSet;

fn fail<T>(code: PairErrorCode, message: String) -> Result<T, PairError> {
    Err(PairError::new(code, message))
}

pub fn verify(req: &PairRequest) -> Result<(), PairError> {
    verify_counts(req)?;
    verify_names_and_classes(req)?;
    verify_pairings(req)?;
    verify_results(req)?;
    verify_settings(req)?;
    verify_removed_players(req)
}

fn verify_counts(req: &PairRequest) -> Result<(), PairError> {
    if req.valid_players < 2 || req.all_players < 2 {
        return fail(
            PairErrorCode::PlayerCountInsufficient,
            format!(
                "not enough players ({} valid of {})",
                req.valid_players, req.all_players
            ),
        );
    }
    if req.all_players > MAX_PLAYER_COUNT {
        return fail(
            PairErrorCode::PlayerCountTooLarge,
            format!("too many players ({})", req.all_players),
        );
    }
    if req.rounds < 1 {
        return fail(
            PairErrorCode::RoundCountInsufficient,
            format!("not enough rounds ({})", req.rounds),
        );
    }
    Ok(())
}

fn verify_names_and_classes(req: &PairRequest) -> Result<(), PairError> {
    let num_players = req.all_players as usize;
    if req.player_names.len() != num_players {
        return fail(
            PairErrorCode::PlayerNameCountInsufficient,
            format!(
                "player name count ({}) does not match number of players ({})",
                req.player_names.len(),
                num_players
            ),
        );
    }
    if let Some(idx) = req.player_names.iter().position(|name| name.is_empty()) {
        return fail(
            PairErrorCode::PlayerNameEmpty,
            format!("player name is empty for player {}", idx + 1),
        );
    }

    if req.player_classes.len() != num_players {
        return fail(
            PairErrorCode::InvalidPlayerClassCount,
            format!(
                "player class count ({}) does not match number of players ({})",
                req.player_classes.len(),
                num_players
            ),
        );
    }
    let num_classes = req.class_prizes.len() as i32;
    for (idx, &class) in req.player_classes.iter().enumerate() {
        if class < 0 || class > num_classes {
            return fail(
                PairErrorCode::InvalidPlayerClass,
                format!("invalid class {} for player {}", class, idx + 1),
            );
        }
    }
    if let Some(&prize) = req.class_prizes.iter().find(|&&prize| prize < 1) {
        return fail(
            PairErrorCode::InvalidClassPrize,
            format!("invalid class prize {}", prize),
        );
    }
    Ok(())
}

fn verify_pairings(req: &PairRequest) -> Result<(), PairError> {
    let num_players = req.all_players as usize;
    let num_rounds = req.rounds as usize;
    let num_pairings = req.division_pairings.len();
    let num_results = req.division_results.len();
    if num_pairings > num_rounds {
        return fail(
            PairErrorCode::MorePairingsThanRounds,
            format!("more pairings ({}) than rounds ({})", num_pairings, num_rounds),
        );
    }
    if req.complete_pairings() == num_rounds {
        return fail(
            PairErrorCode::AllRoundsPaired,
            format!("all {} rounds are already paired", num_rounds),
        );
    }

    for (round_idx, round) in req.division_pairings.iter().enumerate() {
        if round.len() != num_players {
            return fail(
                PairErrorCode::InvalidRoundPairingsCount,
                format!(
                    "round pairings length ({}) for round {} does not match number of players ({})",
                    round.len(),
                    round_idx + 1,
                    num_players
                ),
            );
        }
        for (player_idx, &opp) in round.iter().enumerate() {
            if opp < UNPAIRED || opp >= req.all_players {
                return fail(
                    PairErrorCode::PlayerIndexOutOfBounds,
                    format!(
                        "opponent ({}) for player {} in round {} is out of bounds",
                        opp + 1,
                        player_idx + 1,
                        round_idx + 1
                    ),
                );
            }
            if opp == UNPAIRED {
                if round_idx + 1 != num_pairings || round_idx < num_results {
                    return fail(
                        PairErrorCode::UnpairedPlayer,
                        format!("player {} not paired in round {}", player_idx + 1, round_idx + 1),
                    );
                }
                continue;
            }
            let opp_idx = opp as usize;
            if opp_idx != player_idx && round[opp_idx] != player_idx as i32 {
                return fail(
                    PairErrorCode::InvalidPairing,
                    format!(
                        "player {} is paired with player {} in round {}, but not the other way around",
                        player_idx + 1,
                        opp_idx + 1,
                        round_idx + 1
                    ),
                );
            }
        }
    }

    Ok(())
}

fn verify_results(req: &PairRequest) -> Result<(), PairError> {
    let num_results = req.division_results.len();
    if num_results > req.rounds as usize {
        return fail(
            PairErrorCode::MoreResultsThanRounds,
            format!("more results ({}) than rounds ({})", num_results, req.rounds),
        );
    }
    if num_results > req.division_pairings.len() {
        return fail(
            PairErrorCode::MoreResultsThanPairings,
            format!(
                "more results ({}) than pairings ({})",
                num_results,
                req.division_pairings.len()
            ),
        );
    }
    for (round_idx, results) in req.division_results.iter().enumerate() {
        if results.len() != req.all_players as usize {
            return fail(
                PairErrorCode::InvalidRoundResultsCount,
                format!(
                    "round results length ({}) for round {} does not match number of players ({})",
                    results.len(),
                    round_idx + 1,
                    req.all_players
                ),
            );
        }
    }
    Ok(())
}

fn verify_settings(req: &PairRequest) -> Result<(), PairError> {
    if req.control_loss_activation_round < 0 {
        return fail(
            PairErrorCode::InvalidControlLossActivationRound,
            format!(
                "invalid control loss activation round {}",
                req.control_loss_activation_round
            ),
        );
    }
    if let Some(&spread) = req.gibson_spreads.iter().find(|&&s| s < 0) {
        return fail(
            PairErrorCode::InvalidGibsonSpread,
            format!("invalid gibson spread {}", spread),
        );
    }
    if !(0.0..=1.0).contains(&req.control_loss_threshold) {
        return fail(
            PairErrorCode::InvalidControlLossThreshold,
            format!("invalid control loss threshold {}", req.control_loss_threshold),
        );
    }
    if !(req.hopefulness_threshold > 0.0 && req.hopefulness_threshold <= 1.0) {
        return fail(
            PairErrorCode::InvalidHopefulnessThreshold,
            format!("invalid hopefulness threshold {}", req.hopefulness_threshold),
        );
    }
    if req.division_sims < 1 {
        return fail(
            PairErrorCode::InvalidDivisionSims,
            format!("invalid division sims {}", req.division_sims),
        );
    }
    if req.control_loss_sims < 1 {
        return fail(
            PairErrorCode::InvalidControlLossSims,
            format!("invalid control loss sims {}", req.control_loss_sims),
        );
    }
    if req.place_prizes < 1 || req.place_prizes > req.valid_players {
        return fail(
            PairErrorCode::InvalidPlacePrizes,
            format!("invalid place prizes {}", req.place_prizes),
        );
    }
    Ok(())
}

fn verify_removed_players(req: &PairRequest) -> Result<(), PairError> {
    let mut seen = HashSet::with_capacity(req.removed_players.len());
    for &player in &req.removed_players {
        if player < 0 || player >= req.all_players {
            return fail(
                PairErrorCode::InvalidRemovedPlayer,
                format!("removed player {} is out of range", player + 1),
            );
        }
        if !seen.insert(player) {
            return fail(
                PairErrorCode::InvalidRemovedPlayer,
                format!("removed player {} is listed more than once", player + 1),
            );
        }
    }
    if (req.all_players - req.valid_players) as usize != req.removed_players.len() {
        return fail(
            PairErrorCode::InvalidValidPlayerCount,
            format!(
                "valid players ({}) plus removed players ({}) does not equal all players ({})",
                req.valid_players,
                req.removed_players.len(),
                req.all_players
            ),
        );
    }
    Ok(())
}
