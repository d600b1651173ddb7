use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ComandaError;

/// Lifecycle of an order. Stored as its wire string in SQLite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivered,
    Canceled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Delivered => write!(f, "DELIVERED"),
            OrderStatus::Canceled => write!(f, "CANCELED"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELED" => Ok(OrderStatus::Canceled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::User => write!(f, "USER"),
            UserRole::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(format!("unknown user role: {}", other)),
        }
    }
}

/// Parse a delivery-window time. Accepts exactly `HH:MM`, 24-hour clock —
/// `09:30` is valid, `9:30` and `25:00` are not.
pub fn parse_delivery_time(s: &str) -> crate::error::Result<NaiveTime> {
    // chrono's %H accepts single-digit hours; the wire format does not.
    if s.len() != 5 || s.as_bytes()[2] != b':' {
        return Err(ComandaError::InvalidTime(s.to_string()));
    }
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| ComandaError::InvalidTime(s.to_string()))
}
