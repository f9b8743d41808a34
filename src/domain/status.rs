use sea_orm::Iterable;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "ACCEPTED")]
    Accepted,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "READY")]
    Ready,
    #[sea_orm(string_value = "DELIVERING")]
    Delivering,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivering => "DELIVERING",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMethod {
    #[sea_orm(string_value = "DELIVERY")]
    Delivery,
    #[sea_orm(string_value = "TAKE_OUT")]
    TakeOut,
}

/// One row of the admin status table: what the "advance" button says and
/// where it leads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusStep {
    pub status: OrderStatus,
    pub label: String,
    pub next: Option<OrderStatus>,
}

/// Forward progression for an order.
///
/// Delivery orders go `READY -> DELIVERING -> DELIVERED -> COMPLETED`; take-out
/// orders are picked up, so `READY -> COMPLETED`. `DELIVERING` and `DELIVERED`
/// never occur for take-out orders in practice, but still advance so that only
/// terminal statuses have no successor.
pub fn transition(status: OrderStatus, method: DeliveryMethod) -> StatusStep {
    use OrderStatus::*;

    let (label, next) = match (status, method) {
        (Pending, _) => ("Accept order", Some(Accepted)),
        (Accepted, _) => ("Start preparing", Some(InProgress)),
        (InProgress, _) => ("Mark as ready", Some(Ready)),
        (Ready, DeliveryMethod::Delivery) => ("Send out for delivery", Some(Delivering)),
        (Ready, DeliveryMethod::TakeOut) => ("Mark as picked up", Some(Completed)),
        (Delivering, _) => ("Mark as delivered", Some(Delivered)),
        (Delivered, _) => ("Complete order", Some(Completed)),
        (Completed, _) => ("Completed", None),
        (Cancelled, _) => ("Cancelled", None),
    };

    StatusStep {
        status,
        label: label.to_string(),
        next,
    }
}

/// Admin edits may only move one step forward or cancel a live order.
pub fn can_transition(from: OrderStatus, to: OrderStatus, method: DeliveryMethod) -> bool {
    if from.is_terminal() {
        return false;
    }
    to == OrderStatus::Cancelled || transition(from, method).next == Some(to)
}

pub fn status_table(method: DeliveryMethod) -> Vec<StatusStep> {
    OrderStatus::iter()
        .map(|status| transition(status, method))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHODS: [DeliveryMethod; 2] = [DeliveryMethod::Delivery, DeliveryMethod::TakeOut];

    #[test]
    fn only_terminal_statuses_have_no_next() {
        for method in METHODS {
            for status in OrderStatus::iter() {
                let step = transition(status, method);
                assert_eq!(
                    step.next.is_none(),
                    status.is_terminal(),
                    "{status:?} / {method:?}"
                );
            }
        }
    }

    #[test]
    fn delivery_orders_pass_through_delivering() {
        let mut status = OrderStatus::Pending;
        let mut path = vec![status];
        while let Some(next) = transition(status, DeliveryMethod::Delivery).next {
            status = next;
            path.push(status);
        }
        assert_eq!(
            path,
            vec![
                OrderStatus::Pending,
                OrderStatus::Accepted,
                OrderStatus::InProgress,
                OrderStatus::Ready,
                OrderStatus::Delivering,
                OrderStatus::Delivered,
                OrderStatus::Completed,
            ]
        );
    }

    #[test]
    fn take_out_orders_complete_from_ready() {
        let step = transition(OrderStatus::Ready, DeliveryMethod::TakeOut);
        assert_eq!(step.next, Some(OrderStatus::Completed));
        assert_eq!(step.label, "Mark as picked up");
    }

    #[test]
    fn cancel_allowed_only_before_terminal() {
        assert!(can_transition(
            OrderStatus::InProgress,
            OrderStatus::Cancelled,
            DeliveryMethod::Delivery
        ));
        assert!(!can_transition(
            OrderStatus::Completed,
            OrderStatus::Cancelled,
            DeliveryMethod::Delivery
        ));
        assert!(!can_transition(
            OrderStatus::Cancelled,
            OrderStatus::Pending,
            DeliveryMethod::TakeOut
        ));
    }

    #[test]
    fn skipping_steps_is_rejected() {
        assert!(!can_transition(
            OrderStatus::Pending,
            OrderStatus::Ready,
            DeliveryMethod::Delivery
        ));
        assert!(!can_transition(
            OrderStatus::Ready,
            OrderStatus::Delivering,
            DeliveryMethod::TakeOut
        ));
        assert!(can_transition(
            OrderStatus::Ready,
            OrderStatus::Delivering,
            DeliveryMethod::Delivery
        ));
    }

    #[test]
    fn status_table_covers_every_status() {
        assert_eq!(status_table(DeliveryMethod::Delivery).len(), 8);
    }
}
