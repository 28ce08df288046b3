//! Premium subscription state

use serde::{Deserialize, Serialize};

use crate::models::SubscriptionDetails;

/// Premium tier state consumed by the presentation layer.
///
/// Prediction requests are gated on `is_subscribed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionState {
    subscribed: bool,
    details: Option<SubscriptionDetails>,
}

impl SubscriptionState {
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn details(&self) -> Option<&SubscriptionDetails> {
        self.details.as_ref()
    }

    pub fn set_subscription(&mut self, details: SubscriptionDetails) {
        self.subscribed = true;
        self.details = Some(details);
    }

    pub fn cancel(&mut self) {
        self.subscribed = false;
        self.details = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_details() -> SubscriptionDetails {
        SubscriptionDetails {
            plan: "Premium".to_string(),
            renewal_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        }
    }

    #[test]
    fn test_default_not_subscribed() {
        let state = SubscriptionState::default();
        assert!(!state.is_subscribed());
        assert!(state.details().is_none());
    }

    #[test]
    fn test_set_subscription() {
        let mut state = SubscriptionState::default();
        state.set_subscription(test_details());

        assert!(state.is_subscribed());
        assert_eq!(state.details().unwrap().plan, "Premium");
    }

    #[test]
    fn test_cancel_clears_details() {
        let mut state = SubscriptionState::default();
        state.set_subscription(test_details());

        state.cancel();

        assert!(!state.is_subscribed());
        assert!(state.details().is_none());
    }
}
