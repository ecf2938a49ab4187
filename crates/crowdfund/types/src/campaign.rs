//! Campaign parameters and lifecycle state
//!
//! A campaign is fixed at construction: who gets the money, how much is
//! enough, and when the outcome is decided. Only the state moves.

use crate::{Address, Amount, Timestamp};
use serde::{Deserialize, Serialize};

/// Unique identifier for a deployed campaign
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub String);

impl CampaignId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable campaign parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignParams {
    /// Funded in one lump sum on success
    pub recipient: Address,
    /// Minimum total contribution for success
    pub threshold: Amount,
    /// Resolution becomes possible at this instant
    pub deadline: Timestamp,
}

impl CampaignParams {
    pub fn new(recipient: Address, threshold: Amount, deadline: Timestamp) -> Self {
        Self {
            recipient,
            threshold,
            deadline,
        }
    }
}

/// Lifecycle state of a campaign
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CampaignState {
    /// Before resolution
    #[default]
    Pending,
    /// Threshold met; custody forwarded to the recipient
    Succeeded,
    /// Threshold missed; contributors reclaim their balances
    FailedOpenForWithdrawal,
}

impl CampaignState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, CampaignState::Pending)
    }

    pub fn is_open_to_withdraw(&self) -> bool {
        matches!(self, CampaignState::FailedOpenForWithdrawal)
    }
}

impl std::fmt::Display for CampaignState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CampaignState::Pending => "pending",
            CampaignState::Succeeded => "succeeded",
            CampaignState::FailedOpenForWithdrawal => "failed (open for withdrawal)",
        };
        f.write_str(label)
    }
}

/// Whether value is still accepted once the campaign has resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContributionPolicy {
    /// Contributions are accepted in every state
    #[default]
    AcceptAlways,
    /// Contributions are rejected once the campaign has resolved
    RejectAfterResolution,
}

impl ContributionPolicy {
    pub fn accepts(&self, state: CampaignState) -> bool {
        match self {
            ContributionPolicy::AcceptAlways => true,
            ContributionPolicy::RejectAfterResolution => !state.is_resolved(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_helpers() {
        assert!(!CampaignState::Pending.is_resolved());
        assert!(CampaignState::Succeeded.is_resolved());
        assert!(CampaignState::FailedOpenForWithdrawal.is_resolved());

        assert!(!CampaignState::Pending.is_open_to_withdraw());
        assert!(!CampaignState::Succeeded.is_open_to_withdraw());
        assert!(CampaignState::FailedOpenForWithdrawal.is_open_to_withdraw());
    }

    #[test]
    fn test_contribution_policy() {
        let always = ContributionPolicy::AcceptAlways;
        assert!(always.accepts(CampaignState::Pending));
        assert!(always.accepts(CampaignState::Succeeded));

        let strict = ContributionPolicy::RejectAfterResolution;
        assert!(strict.accepts(CampaignState::Pending));
        assert!(!strict.accepts(CampaignState::Succeeded));
        assert!(!strict.accepts(CampaignState::FailedOpenForWithdrawal));
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&ContributionPolicy::RejectAfterResolution).unwrap();
        assert_eq!(json, "\"reject_after_resolution\"");
        let state: CampaignState = serde_json::from_str("\"failed_open_for_withdrawal\"").unwrap();
        assert_eq!(state, CampaignState::FailedOpenForWithdrawal);
    }
}
