use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EngineConfig;
use crate::types::{BetStatus, Wager};

/// Settlement performance across a set of wagers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total: usize,
    pub pending: usize,
    pub won: usize,
    pub lost: usize,
    pub void: usize,
    pub cashed_out: usize,
    /// Wagers whose payout could not be computed
    pub skipped: usize,
    /// Stake across settled wagers
    pub total_staked: f64,
    /// Money returned across settled wagers (lost bets return nothing)
    pub total_returned: f64,
    pub net_profit: f64,
    /// won / (won + lost)
    pub win_rate: Option<f64>,
    /// net_profit / total_staked
    pub roi: Option<f64>,
}

impl PerformanceSummary {
    pub fn from_wagers(wagers: &[Wager], config: &EngineConfig) -> Self {
        let mut summary = Self {
            total: wagers.len(),
            ..Default::default()
        };

        for wager in wagers {
            if !wager.status.is_settled() {
                summary.pending += 1;
                continue;
            }

            let payout = match wager.payout(config) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Excluding wager {} from summary: {}", wager.id, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let returned = match wager.status {
                BetStatus::Won => {
                    summary.won += 1;
                    payout.amount
                }
                BetStatus::Lost => {
                    summary.lost += 1;
                    0.0
                }
                BetStatus::Void => {
                    summary.void += 1;
                    payout.amount
                }
                BetStatus::CashedOut => {
                    summary.cashed_out += 1;
                    payout.amount
                }
                BetStatus::Pending => 0.0,
            };

            summary.total_staked += wager.stake;
            summary.total_returned += returned;
        }

        summary.net_profit = summary.total_returned - summary.total_staked;

        let decided = summary.won + summary.lost;
        if decided > 0 {
            summary.win_rate = Some(summary.won as f64 / decided as f64);
        }
        if summary.total_staked > 0.0 {
            summary.roi = Some(summary.net_profit / summary.total_staked);
        }

        summary
    }
}
