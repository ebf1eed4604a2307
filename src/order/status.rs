//! Order status model
//!
//! Statuses are stored as their kebab-case names (`picked-up`, ...) in a
//! VARCHAR column. The forward sequence is:
//!
//! ```text
//! pending → confirmed → picked-up → washing → drying → ironing → ready → delivered → completed
//!    └──────────┴──→ cancelled
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Initial state - created by the customer
    Pending,
    Confirmed,
    PickedUp,
    Washing,
    Drying,
    Ironing,
    Ready,
    Delivered,
    /// Terminal: order finished
    Completed,
    /// Terminal: order withdrawn
    Cancelled,
}

/// Forward sequence; `Cancelled` sits outside it
const FORWARD: [OrderStatus; 9] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::PickedUp,
    OrderStatus::Washing,
    OrderStatus::Drying,
    OrderStatus::Ironing,
    OrderStatus::Ready,
    OrderStatus::Delivered,
    OrderStatus::Completed,
];

impl OrderStatus {
    pub const ALL: [OrderStatus; 10] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::PickedUp,
        OrderStatus::Washing,
        OrderStatus::Drying,
        OrderStatus::Ironing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::PickedUp => "picked-up",
            OrderStatus::Washing => "washing",
            OrderStatus::Drying => "drying",
            OrderStatus::Ironing => "ironing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// No transition leaves a terminal state
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Customer-initiated cancel is only possible before pickup
    #[inline]
    pub fn is_cancellable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    fn position(&self) -> Option<usize> {
        FORWARD.iter().position(|s| s == self)
    }

    /// Transition table for forward-only progress.
    ///
    /// Any strictly later step is allowed (a laundry may skip drying or
    /// ironing); `cancelled` only from a cancellable state.
    pub fn can_advance_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == OrderStatus::Cancelled {
            return self.is_cancellable();
        }
        match (self.position(), next.position()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// How owner-initiated status updates are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Follow [`OrderStatus::can_advance_to`]
    #[default]
    ForwardOnly,
    /// Accept any known status, including leaving a terminal state
    Membership,
}

impl StatusPolicy {
    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            StatusPolicy::ForwardOnly => from.can_advance_to(to),
            StatusPolicy::Membership => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        for status in &OrderStatus::ALL[..8] {
            assert!(!status.is_terminal(), "{} should not be terminal", status);
        }
    }

    #[test]
    fn test_cancellable_states() {
        let cancellable: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(|s| s.is_cancellable())
            .collect();
        assert_eq!(
            cancellable,
            vec![OrderStatus::Pending, OrderStatus::Confirmed]
        );
    }

    #[test]
    fn test_parse_and_display() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
            assert_eq!(status.to_string(), status.as_str());
        }
        assert_eq!("picked-up".parse(), Ok(OrderStatus::PickedUp));
        assert!("picked_up".parse::<OrderStatus>().is_err());
        assert!("PENDING".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&OrderStatus::PickedUp).unwrap();
        assert_eq!(json, r#""picked-up""#);
        let back: OrderStatus = serde_json::from_str(r#""ironing""#).unwrap();
        assert_eq!(back, OrderStatus::Ironing);
    }

    #[test]
    fn test_forward_transitions() {
        assert!(OrderStatus::Pending.can_advance_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Washing.can_advance_to(OrderStatus::Ironing));
        assert!(OrderStatus::Delivered.can_advance_to(OrderStatus::Completed));
        assert!(OrderStatus::Pending.can_advance_to(OrderStatus::Completed));

        assert!(!OrderStatus::Ready.can_advance_to(OrderStatus::Washing));
        assert!(!OrderStatus::Ready.can_advance_to(OrderStatus::Ready));
    }

    #[test]
    fn test_cancel_transitions() {
        assert!(OrderStatus::Pending.can_advance_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Confirmed.can_advance_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::PickedUp.can_advance_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for next in OrderStatus::ALL {
            assert!(!OrderStatus::Completed.can_advance_to(next));
            assert!(!OrderStatus::Cancelled.can_advance_to(next));
        }
    }

    #[test]
    fn test_membership_policy_accepts_everything() {
        let policy = StatusPolicy::Membership;
        assert!(policy.allows(OrderStatus::Completed, OrderStatus::Pending));
        assert!(policy.allows(OrderStatus::Cancelled, OrderStatus::Washing));
        assert!(!StatusPolicy::ForwardOnly.allows(OrderStatus::Completed, OrderStatus::Pending));
    }

    #[test]
    fn test_policy_deserializes_from_config() {
        let p: StatusPolicy = serde_yaml::from_str("membership").unwrap();
        assert_eq!(p, StatusPolicy::Membership);
        let p: StatusPolicy = serde_yaml::from_str("forward_only").unwrap();
        assert_eq!(p, StatusPolicy::ForwardOnly);
    }
}
