use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum BetStatus {
    #[default]
    Pending,
    Won,
    Lost,
    Void,
    CashedOut,
}

impl BetStatus {
    /// Parse a loosely written status. Unknown text settles as pending.
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "won" | "win" | "winner" | "hit" => BetStatus::Won,
            "lost" | "loss" | "lose" | "miss" => BetStatus::Lost,
            "void" | "push" | "cancelled" | "canceled" | "refund" | "refunded" => {
                BetStatus::Void
            }
            "cashed_out" | "cashed out" | "cashout" | "cash_out" | "cashed-out" => {
                BetStatus::CashedOut
            }
            _ => BetStatus::Pending,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, BetStatus::Pending)
    }
}

impl std::fmt::Display for BetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BetStatus::Pending => "pending",
            BetStatus::Won => "won",
            BetStatus::Lost => "lost",
            BetStatus::Void => "void",
            BetStatus::CashedOut => "cashed_out",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WagerKind {
    #[default]
    Straight,
    Parlay,
}

impl WagerKind {
    /// Parse a stored bet type, falling back to the leg count when the text is unknown
    pub fn parse(raw: Option<&str>, leg_count: usize) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("parlay") | Some("multi") | Some("accumulator") => WagerKind::Parlay,
            Some("straight") | Some("single") => WagerKind::Straight,
            _ => Self::from_leg_count(leg_count),
        }
    }

    pub fn from_leg_count(leg_count: usize) -> Self {
        if leg_count > 1 {
            WagerKind::Parlay
        } else {
            WagerKind::Straight
        }
    }
}

/// One side of one proposition bet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub id: String,
    /// Correlation key linking the legs of one parlay
    pub parlay_id: Option<String>,
    pub player: String,
    pub prop: String,
    pub line: f64,
    /// Over / Under / free text
    pub selection: String,
    /// American odds, sign-significant
    pub odds: i32,
    pub status: BetStatus,
    pub team: String,
    pub matchup: String,
    pub week: u32,
    pub game_date: String,
}

/// One placed bet, straight or parlay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wager {
    pub id: String,
    pub user_id: String,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds
    pub updated_at: i64,
    pub status: BetStatus,
    pub stake: f64,
    /// Aggregate American odds
    pub odds: i32,
    /// Stored payout, 0 when unknown
    pub payout: f64,
    #[serde(rename = "type")]
    pub kind: WagerKind,
    pub boost: bool,
    /// 0-100, applied to profit only
    pub boost_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_out: Option<f64>,
    pub legs: Vec<Leg>,
}

impl Wager {
    /// Boost percentage actually in effect: zero unless the boost flag is set
    pub fn effective_boost_pct(&self) -> f64 {
        if self.boost {
            self.boost_pct
        } else {
            0.0
        }
    }
}
