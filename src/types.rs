use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Cost that dominates every other weight term
pub const MAJOR_PENALTY: i64 = 1_000_000_000;
/// Cost that dominates ordinary rank-distance terms
pub const MINOR_PENALTY: i64 = MAJOR_PENALTY / 1000;
/// Largest division the pairing engine accepts
pub const MAX_PLAYER_COUNT: i32 = 50_000;
/// Simulated games draw a spread uniformly from `0..=MAX_SIM_SPREAD`
pub const MAX_SIM_SPREAD: i32 = 300;
/// With this many rounds left (or fewer) the leader only faces the lowest contender
pub const CONTROL_LOSS_LOWEST_CONTENDER_ONLY_ROUNDS: usize = 4;
/// Player index used for the synthetic bye
pub const BYE_PLAYER_INDEX: usize = usize::MAX;
/// Opponent marker for a prepaired round that has not been fully assigned
pub const UNPAIRED: i32 = -1;

/// Everything the engine needs to pair one round of one division
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairRequest {
    /// Display names, indexed by player index
    pub player_names: Vec<String>,
    /// Number of players ever registered in the division
    pub all_players: i32,
    /// Number of players still taking part
    pub valid_players: i32,
    /// Total rounds in the event
    pub rounds: i32,
    /// Class of each player (0 means no class)
    pub player_classes: Vec<i32>,
    /// Number of prizes for class 1, class 2, ...
    pub class_prizes: Vec<i32>,
    /// Number of prizes awarded by final place
    pub place_prizes: i32,
    /// Per-round Gibson spread, starting from the final round and working backward
    pub gibson_spreads: Vec<i32>,
    /// Minimum fraction of lost tournaments that counts as control loss
    pub control_loss_threshold: f64,
    /// Number of complete rounds after which control loss may apply
    pub control_loss_activation_round: i32,
    /// Minimum fraction of simulations for a placement to count as hopeful
    pub hopefulness_threshold: f64,
    /// Trials used to project final standings
    pub division_sims: i32,
    /// Trials used for each control-loss candidate
    pub control_loss_sims: i32,
    /// Opponent of each player, per recorded round
    pub division_pairings: Vec<Vec<i32>>,
    /// Score of each player, per recorded round
    pub division_results: Vec<Vec<i32>>,
    /// Players withdrawn from the event
    pub removed_players: Vec<i32>,
    /// Random seed; 0 means derive one from the clock
    pub seed: u64,
    pub use_control_loss: bool,
    pub allow_repeat_byes: bool,
    /// Give the bye to the highest ranked player with the fewest byes
    pub top_down_byes: bool,
}

impl Default for PairRequest {
    fn default() -> Self {
        Self {
            player_names: Vec::new(),
            all_players: 0,
            valid_players: 0,
            rounds: 0,
            player_classes: Vec::new(),
            class_prizes: vec![2],
            place_prizes: 2,
            gibson_spreads: vec![300, 250, 200],
            control_loss_threshold: 0.25,
            control_loss_activation_round: 0,
            hopefulness_threshold: 0.02,
            division_sims: 1000,
            control_loss_sims: 1000,
            division_pairings: Vec::new(),
            division_results: Vec::new(),
            removed_players: Vec::new(),
            seed: 0,
            use_control_loss: false,
            allow_repeat_byes: false,
            top_down_byes: false,
        }
    }
}

impl PairRequest {
    /// Index of the last pairing round if it still contains unassigned players
    pub fn prepaired_round_idx(&self) -> Option<usize> {
        let last = self.division_pairings.len().checked_sub(1)?;
        self.division_pairings[last]
            .contains(&UNPAIRED)
            .then_some(last)
    }

    /// Number of recorded pairing rounds with every player assigned
    pub fn complete_pairings(&self) -> usize {
        self.division_pairings
            .iter()
            .filter(|round| !round.contains(&UNPAIRED))
            .count()
    }

    /// Rounds still to be played from the point of view of the standings
    pub fn standings_rounds_remaining(&self) -> usize {
        (self.rounds.max(0) as usize).saturating_sub(self.division_results.len())
    }

    /// Rounds still to be paired, including the one being paired now
    pub fn pairing_rounds_remaining(&self) -> usize {
        (self.rounds.max(0) as usize).saturating_sub(self.complete_pairings())
    }

    /// Largest spread a player could still make up over `rounds_remaining` rounds.
    ///
    /// The schedule is read from the final round backward; rounds past the end
    /// of the schedule reuse its last value.
    pub fn cumulative_gibson_spread(&self, rounds_remaining: usize) -> i32 {
        let Some(&last) = self.gibson_spreads.last() else {
            return 0;
        };
        (0..rounds_remaining)
            .map(|k| self.gibson_spreads.get(k).copied().unwrap_or(last))
            .fold(0i32, i32::saturating_add)
    }

    pub fn removed_set(&self) -> HashSet<usize> {
        self.removed_players
            .iter()
            .filter(|&&p| p >= 0)
            .map(|&p| p as usize)
            .collect()
    }

    pub fn player_name(&self, player_idx: usize) -> &str {
        if player_idx == BYE_PLAYER_INDEX {
            return "BYE";
        }
        self.player_names
            .get(player_idx)
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub fn player_class(&self, player_idx: usize) -> usize {
        self.player_classes
            .get(player_idx)
            .map(|&c| c.max(0) as usize)
            .unwrap_or(0)
    }

    /// Copy of the request without the per-player arrays, for the report header
    pub fn abridged(&self) -> PairRequest {
        PairRequest {
            player_names: Vec::new(),
            player_classes: Vec::new(),
            division_pairings: Vec::new(),
            division_results: Vec::new(),
            ..self.clone()
        }
    }
}

/// Outcome of a pairing call
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PairResponse {
    pub error_code: PairErrorCode,
    pub error_message: String,
    /// Opponent per player index; a bye is a self-pairing and removed players get -1
    pub pairings: Vec<i32>,
    /// Clinched status per player index
    pub gibsonized_players: Vec<bool>,
    /// Seed actually used for the simulations
    pub seed: u64,
    /// Human-readable report
    pub log: String,
}

/// Stable identifiers callers branch on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PairErrorCode {
    #[default]
    Success,
    PlayerCountInsufficient,
    PlayerCountTooLarge,
    RoundCountInsufficient,
    PlayerNameCountInsufficient,
    PlayerNameEmpty,
    InvalidPlayerClassCount,
    InvalidPlayerClass,
    InvalidClassPrize,
    MorePairingsThanRounds,
    AllRoundsPaired,
    InvalidRoundPairingsCount,
    PlayerIndexOutOfBounds,
    UnpairedPlayer,
    InvalidPairing,
    MoreResultsThanRounds,
    MoreResultsThanPairings,
    InvalidRoundResultsCount,
    InvalidControlLossActivationRound,
    InvalidGibsonSpread,
    InvalidControlLossThreshold,
    InvalidHopefulnessThreshold,
    InvalidDivisionSims,
    InvalidControlLossSims,
    InvalidPlacePrizes,
    InvalidRemovedPlayer,
    InvalidValidPlayerCount,
    MinWeightMatching,
    InvalidPairingsLength,
    Overconstrained,
}

impl PairErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairErrorCode::Success => "SUCCESS",
            PairErrorCode::PlayerCountInsufficient => "PLAYER_COUNT_INSUFFICIENT",
            PairErrorCode::PlayerCountTooLarge => "PLAYER_COUNT_TOO_LARGE",
            PairErrorCode::RoundCountInsufficient => "ROUND_COUNT_INSUFFICIENT",
            PairErrorCode::PlayerNameCountInsufficient => "PLAYER_NAME_COUNT_INSUFFICIENT",
            PairErrorCode::PlayerNameEmpty => "PLAYER_NAME_EMPTY",
            PairErrorCode::InvalidPlayerClassCount => "INVALID_PLAYER_CLASS_COUNT",
            PairErrorCode::InvalidPlayerClass => "INVALID_PLAYER_CLASS",
            PairErrorCode::InvalidClassPrize => "INVALID_CLASS_PRIZE",
            PairErrorCode::MorePairingsThanRounds => "MORE_PAIRINGS_THAN_ROUNDS",
            PairErrorCode::AllRoundsPaired => "ALL_ROUNDS_PAIRED",
            PairErrorCode::InvalidRoundPairingsCount => "INVALID_ROUND_PAIRINGS_COUNT",
            PairErrorCode::PlayerIndexOutOfBounds => "PLAYER_INDEX_OUT_OF_BOUNDS",
            PairErrorCode::UnpairedPlayer => "UNPAIRED_PLAYER",
            PairErrorCode::InvalidPairing => "INVALID_PAIRING",
            PairErrorCode::MoreResultsThanRounds => "MORE_RESULTS_THAN_ROUNDS",
            PairErrorCode::MoreResultsThanPairings => "MORE_RESULTS_THAN_PAIRINGS",
            PairErrorCode::InvalidRoundResultsCount => "INVALID_ROUND_RESULTS_COUNT",
            PairErrorCode::InvalidControlLossActivationRound => {
                "INVALID_CONTROL_LOSS_ACTIVATION_ROUND"
            }
            PairErrorCode::InvalidGibsonSpread => "INVALID_GIBSON_SPREAD",
            PairErrorCode::InvalidControlLossThreshold => "INVALID_CONTROL_LOSS_THRESHOLD",
            PairErrorCode::InvalidHopefulnessThreshold => "INVALID_HOPEFULNESS_THRESHOLD",
            PairErrorCode::InvalidDivisionSims => "INVALID_DIVISION_SIMS",
            PairErrorCode::InvalidControlLossSims => "INVALID_CONTROL_LOSS_SIMS",
            PairErrorCode::InvalidPlacePrizes => "INVALID_PLACE_PRIZES",
            PairErrorCode::InvalidRemovedPlayer => "INVALID_REMOVED_PLAYER",
            PairErrorCode::InvalidValidPlayerCount => "INVALID_VALID_PLAYER_COUNT",
            PairErrorCode::MinWeightMatching => "MIN_WEIGHT_MATCHING",
            PairErrorCode::InvalidPairingsLength => "INVALID_PAIRINGS_LENGTH",
            PairErrorCode::Overconstrained => "OVERCONSTRAINED",
        }
    }
}

impl fmt::Display for PairErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected request or a pairing that could not be completed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct PairError {
    pub code: PairErrorCode,
    pub message: String,
}

impl PairError {
    pub fn new(code: PairErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Unordered key for a pairing between two players, or a player and the bye
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PairingKey {
    Bye(usize),
    /// Higher player index first
    Players(usize, usize),
}

impl PairingKey {
    pub fn new(player_idx: usize, opp_idx: usize) -> Self {
        if player_idx == opp_idx || opp_idx == BYE_PLAYER_INDEX {
            PairingKey::Bye(player_idx)
        } else if player_idx == BYE_PLAYER_INDEX {
            PairingKey::Bye(opp_idx)
        } else {
            PairingKey::Players(player_idx.max(opp_idx), player_idx.min(opp_idx))
        }
    }
}

impl fmt::Display for PairingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingKey::Bye(p) => write!(f, "{}:BYE", p),
            PairingKey::Players(p, o) => write!(f, "{}:{}", p, o),
        }
    }
}
