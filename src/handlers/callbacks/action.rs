//! Callback data carried by inline buttons
//!
//! Telegram limits callback data to 64 bytes, so actions are encoded as short
//! colon-separated tokens and the listing itself lives in state storage.

use std::fmt;
use std::str::FromStr;
use crate::listing::FilterKey;
use crate::models::{ApprovalAction, Role};
use crate::utils::errors::Event360Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSection {
    Pending,
    Users,
    Orders,
    Stats,
    Seed,
}

impl AdminSection {
    fn as_str(&self) -> &'static str {
        match self {
            AdminSection::Pending => "pending",
            AdminSection::Users => "users",
            AdminSection::Orders => "orders",
            AdminSection::Stats => "stats",
            AdminSection::Seed => "seed",
        }
    }
}

impl FromStr for AdminSection {
    type Err = Event360Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AdminSection::Pending),
            "users" => Ok(AdminSection::Users),
            "orders" => Ok(AdminSection::Orders),
            "stats" => Ok(AdminSection::Stats),
            "seed" => Ok(AdminSection::Seed),
            other => Err(invalid(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Page(usize),
    /// Open the choices of a filter
    Filter(FilterKey),
    /// Index into the filter's choices; `None` resets it
    SetFilter(FilterKey, Option<usize>),
    ClearFilters,
    Event(i64),
    WishAdd(i64),
    WishRemove(i64),
    Buy { ticket_type_id: i64, quantity: u32 },
    RegisterFor(i64),
    Review(i64),
    Order(i64),
    Pay(i64),
    CancelOrder(i64),
    MarkRead(i64),
    Admin(AdminSection),
    Decide(i64, ApprovalAction),
    User(i64),
    SetRole(i64, Role),
    SetStatus(i64, bool),
}

fn invalid(data: &str) -> Event360Error {
    Event360Error::InvalidInput(format!("Unknown callback data: {}", data))
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::Page(page) => write!(f, "page:{}", page),
            CallbackAction::Filter(key) => write!(f, "filter:{}", key),
            CallbackAction::SetFilter(key, Some(index)) => write!(f, "set:{}:{}", key, index),
            CallbackAction::SetFilter(key, None) => write!(f, "set:{}:-", key),
            CallbackAction::ClearFilters => f.write_str("clear"),
            CallbackAction::Event(id) => write!(f, "event:{}", id),
            CallbackAction::WishAdd(id) => write!(f, "wish:+:{}", id),
            CallbackAction::WishRemove(id) => write!(f, "wish:-:{}", id),
            CallbackAction::Buy { ticket_type_id, quantity } => write!(f, "buy:{}:{}", ticket_type_id, quantity),
            CallbackAction::RegisterFor(id) => write!(f, "reg:{}", id),
            CallbackAction::Review(id) => write!(f, "review:{}", id),
            CallbackAction::Order(id) => write!(f, "order:{}", id),
            CallbackAction::Pay(id) => write!(f, "pay:{}", id),
            CallbackAction::CancelOrder(id) => write!(f, "cxl:{}", id),
            CallbackAction::MarkRead(id) => write!(f, "read:{}", id),
            CallbackAction::Admin(section) => write!(f, "admin:{}", section.as_str()),
            CallbackAction::Decide(id, action) => write!(f, "decide:{}:{}", action.as_str(), id),
            CallbackAction::User(id) => write!(f, "user:{}", id),
            CallbackAction::SetRole(id, role) => write!(f, "role:{}:{}", id, role),
            CallbackAction::SetStatus(id, active) => write!(f, "status:{}:{}", id, u8::from(*active)),
        }
    }
}

impl FromStr for CallbackAction {
    type Err = Event360Error;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = data.split(':').collect();
        let id = |i: usize| -> Result<i64, Event360Error> {
            parts.get(i).and_then(|p| p.parse().ok()).ok_or_else(|| invalid(data))
        };

        let action = match parts.as_slice() {
            ["page", page] => CallbackAction::Page(page.parse().map_err(|_| invalid(data))?),
            ["filter", key] => CallbackAction::Filter(key.parse()?),
            ["set", key, "-"] => CallbackAction::SetFilter(key.parse()?, None),
            ["set", key, index] => {
                CallbackAction::SetFilter(key.parse()?, Some(index.parse().map_err(|_| invalid(data))?))
            }
            ["clear"] => CallbackAction::ClearFilters,
            ["event", _] => CallbackAction::Event(id(1)?),
            ["wish", "+", _] => CallbackAction::WishAdd(id(2)?),
            ["wish", "-", _] => CallbackAction::WishRemove(id(2)?),
            ["buy", _, quantity] => CallbackAction::Buy {
                ticket_type_id: id(1)?,
                quantity: quantity.parse().map_err(|_| invalid(data))?,
            },
            ["reg", _] => CallbackAction::RegisterFor(id(1)?),
            ["review", _] => CallbackAction::Review(id(1)?),
            ["order", _] => CallbackAction::Order(id(1)?),
            ["pay", _] => CallbackAction::Pay(id(1)?),
            ["cxl", _] => CallbackAction::CancelOrder(id(1)?),
            ["read", _] => CallbackAction::MarkRead(id(1)?),
            ["admin", section] => CallbackAction::Admin(section.parse()?),
            ["decide", "approve", _] => CallbackAction::Decide(id(2)?, ApprovalAction::Approve),
            ["decide", "reject", _] => CallbackAction::Decide(id(2)?, ApprovalAction::Reject),
            ["user", _] => CallbackAction::User(id(1)?),
            ["role", _, role] => CallbackAction::SetRole(id(1)?, role.parse()?),
            ["status", _, "1"] => CallbackAction::SetStatus(id(1)?, true),
            ["status", _, "0"] => CallbackAction::SetStatus(id(1)?, false),
            _ => return Err(invalid(data)),
        };
        Ok(action)
    }
}
