use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::WagerError;
use crate::odds::american_to_decimal;
use crate::types::{BetStatus, Wager};

/// What a payout figure means to the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayoutLabel {
    Won,
    WonBoosted,
    /// Informational only for a lost bet, no money moves
    WouldHavePaid,
    CashedOut,
    Refunded,
    Potential,
    PotentialBoosted,
}

impl PayoutLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutLabel::Won => "Payout",
            PayoutLabel::WonBoosted => "Boosted Payout",
            PayoutLabel::WouldHavePaid => "Would Have Paid",
            PayoutLabel::CashedOut => "Cashed Out",
            PayoutLabel::Refunded => "Refunded",
            PayoutLabel::Potential => "Potential Payout",
            PayoutLabel::PotentialBoosted => "Potential Boosted Payout",
        }
    }
}

impl std::fmt::Display for PayoutLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every optional input has a default: stake 0, odds from config, boost 0
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayoutInput {
    pub stake: Option<f64>,
    pub odds: Option<i32>,
    pub status: BetStatus,
    pub boost_pct: Option<f64>,
    /// Externally stored payout, authoritative for won bets when > 0
    pub stored_payout: Option<f64>,
    pub cash_out: Option<f64>,
}

impl PayoutInput {
    pub fn new(stake: f64, odds: i32, status: BetStatus) -> Self {
        Self {
            stake: Some(stake),
            odds: Some(odds),
            status,
            ..Default::default()
        }
    }

    pub fn with_boost(mut self, boost_pct: f64) -> Self {
        self.boost_pct = Some(boost_pct);
        self
    }

    pub fn with_stored_payout(mut self, payout: f64) -> Self {
        self.stored_payout = Some(payout);
        self
    }

    pub fn with_cash_out(mut self, amount: f64) -> Self {
        self.cash_out = Some(amount);
        self
    }
}

impl From<&Wager> for PayoutInput {
    fn from(wager: &Wager) -> Self {
        Self {
            stake: Some(wager.stake),
            odds: Some(wager.odds),
            status: wager.status,
            boost_pct: Some(wager.effective_boost_pct()),
            stored_payout: Some(wager.payout),
            cash_out: wager.cash_out,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Payout {
    pub amount: f64,
    /// amount minus stake for realized outcomes, boosted profit for pending/lost
    pub profit: f64,
    pub label: PayoutLabel,
}

/// Boosted profit on top of the stake. Boost applies to the profit, never the stake.
fn boosted_profit(stake: f64, odds: i32, boost_pct: f64) -> Result<f64, WagerError> {
    let base_profit = stake * (american_to_decimal(odds)? - 1.0);
    Ok(base_profit * (1.0 + boost_pct / 100.0))
}

pub fn get_payout(input: &PayoutInput, config: &EngineConfig) -> Result<Payout, WagerError> {
    let stake = input.stake.unwrap_or(0.0);
    let odds = input.odds.unwrap_or(config.default_odds);
    let boost_pct = input.boost_pct.filter(|b| b.is_finite()).unwrap_or(0.0);
    let boosted = boost_pct > 0.0;

    match input.status {
        BetStatus::Won => {
            let amount = match input.stored_payout {
                Some(stored) if stored > 0.0 => stored,
                _ => {
                    require_stake(stake)?;
                    stake + boosted_profit(stake, odds, boost_pct)?
                }
            };
            Ok(Payout {
                amount,
                profit: amount - stake,
                label: if boosted { PayoutLabel::WonBoosted } else { PayoutLabel::Won },
            })
        }
        BetStatus::Lost => {
            require_stake(stake)?;
            let profit = boosted_profit(stake, odds, boost_pct)?;
            Ok(Payout {
                amount: stake + profit,
                profit,
                label: PayoutLabel::WouldHavePaid,
            })
        }
        BetStatus::CashedOut => {
            let amount = input.cash_out.unwrap_or(0.0);
            Ok(Payout {
                amount,
                profit: amount - stake,
                label: PayoutLabel::CashedOut,
            })
        }
        BetStatus::Void => Ok(Payout {
            amount: stake,
            profit: 0.0,
            label: PayoutLabel::Refunded,
        }),
        BetStatus::Pending => {
            let profit = boosted_profit(stake, odds, boost_pct)?;
            Ok(Payout {
                amount: stake + profit,
                profit,
                label: if boosted {
                    PayoutLabel::PotentialBoosted
                } else {
                    PayoutLabel::Potential
                },
            })
        }
    }
}

fn require_stake(stake: f64) -> Result<(), WagerError> {
    if stake.is_finite() && stake > 0.0 {
        Ok(())
    } else {
        Err(WagerError::InvalidStake { value: stake })
    }
}

impl Wager {
    pub fn payout(&self, config: &EngineConfig) -> Result<Payout, WagerError> {
        get_payout(&PayoutInput::from(self), config)
    }
}
