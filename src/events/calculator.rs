//! Party cost estimate for event bookings.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::submission::SubmissionDraft;

pub const MIN_GUESTS: u32 = 4;
pub const MAX_GUESTS: u32 = 45;
pub const MIN_HOURS: u32 = 1;
pub const MAX_HOURS: u32 = 8;

/// Euro cents, to keep the arithmetic exact.
const PIZZA_CENTS: u32 = 1050;
const DRINK_CENTS: u32 = 350;
const CAKE_CENTS: u32 = 2500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Birthday,
    Corporate,
    Kids,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Birthday => "birthday",
            EventType::Corporate => "corporate",
            EventType::Kids => "kids",
            EventType::Other => "other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "birthday" => Ok(EventType::Birthday),
            "corporate" => Ok(EventType::Corporate),
            "kids" => Ok(EventType::Kids),
            "other" => Ok(EventType::Other),
            other => Err(format!("unknown event type {other:?}")),
        }
    }
}

/// The set menu has a price; a custom menu is quoted by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuType {
    #[default]
    Standard,
    Custom,
}

impl MenuType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuType::Standard => "standard",
            MenuType::Custom => "custom",
        }
    }
}

impl FromStr for MenuType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(MenuType::Standard),
            "custom" => Ok(MenuType::Custom),
            other => Err(format!("unknown menu type {other:?}")),
        }
    }
}

/// Calculator state behind an event booking form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPlan {
    pub event_type: EventType,
    /// ISO date as picked in the form, free text.
    pub event_date: String,
    guests: u32,
    duration_hours: u32,
    pub menu: MenuType,
    pub pizzas: u32,
    pub drinks: u32,
    pub cake: bool,
    /// Whole euros the visitor is willing to spend.
    pub budget: Option<u32>,
}

impl Default for EventPlan {
    fn default() -> Self {
        Self {
            event_type: EventType::Birthday,
            event_date: String::new(),
            guests: 10,
            duration_hours: 3,
            menu: MenuType::Standard,
            pizzas: 8,
            drinks: 10,
            cake: false,
            budget: None,
        }
    }
}

impl EventPlan {
    pub fn guests(&self) -> u32 {
        self.guests
    }

    pub fn duration_hours(&self) -> u32 {
        self.duration_hours
    }

    /// Set the head count (clamped). On the set menu this also resizes the
    /// order: 0.8 pizzas and one drink per guest.
    pub fn set_guests(&mut self, guests: u32) {
        self.guests = guests.clamp(MIN_GUESTS, MAX_GUESTS);
        if self.menu == MenuType::Standard {
            self.pizzas = (self.guests * 4).div_ceil(5);
            self.drinks = self.guests;
        }
    }

    pub fn set_duration(&mut self, hours: u32) {
        self.duration_hours = hours.clamp(MIN_HOURS, MAX_HOURS);
    }

    /// Whole euros, rounded half up and capped at `u32::MAX`. `None` for a
    /// custom menu.
    pub fn estimated_cost(&self) -> Option<u32> {
        if self.menu == MenuType::Custom {
            return None;
        }
        let cents = u64::from(self.pizzas) * u64::from(PIZZA_CENTS)
            + u64::from(self.drinks) * u64::from(DRINK_CENTS)
            + if self.cake { u64::from(CAKE_CENTS) } else { 0 };
        Some(u32::try_from((cents + 50) / 100).unwrap_or(u32::MAX))
    }

    /// The visitor's budget is below the estimate.
    pub fn is_over_budget(&self) -> bool {
        match (self.budget, self.estimated_cost()) {
            (Some(budget), Some(cost)) => cost != 0 && budget < cost,
            _ => false,
        }
    }

    /// Copy the event details into a contact draft.
    pub fn apply_to(&self, draft: &mut SubmissionDraft) {
        draft.event_type = self.event_type.as_str().to_string();
        draft.event_date = self.event_date.clone();
        draft.budget = self.budget.map(|b| format!("{b}€")).unwrap_or_default();
        draft.guests = Some(self.guests);
        draft.duration = Some(self.duration_hours);
        draft.pizzas = Some(self.pizzas);
        draft.drinks = Some(self.drinks);
        draft.has_cake = Some(self.cake);
        draft.menu_type = Some(self.menu.as_str().to_string());
        draft.estimated_cost = self.estimated_cost().filter(|c| *c != 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_estimate() {
        // 8 × 10.50 + 10 × 3.50 = 119
        assert_eq!(EventPlan::default().estimated_cost(), Some(119));
    }

    #[test]
    fn test_cake_and_rounding() {
        let mut plan = EventPlan::default();
        plan.pizzas = 1;
        plan.drinks = 0;
        assert_eq!(plan.estimated_cost(), Some(11)); // 10.50 rounds up

        plan.cake = true;
        assert_eq!(plan.estimated_cost(), Some(36));
    }

    #[test]
    fn test_huge_order_does_not_overflow() {
        let mut plan = EventPlan::default();
        plan.pizzas = 5_000_000;
        plan.drinks = 0;
        assert_eq!(plan.estimated_cost(), Some(52_500_000));

        plan.pizzas = u32::MAX;
        plan.drinks = u32::MAX;
        plan.cake = true;
        assert_eq!(plan.estimated_cost(), Some(u32::MAX));
    }

    #[test]
    fn test_guests_resize_standard_order() {
        let mut plan = EventPlan::default();
        plan.set_guests(13);
        assert_eq!(plan.pizzas, 11); // ceil(10.4)
        assert_eq!(plan.drinks, 13);

        plan.set_guests(100);
        assert_eq!(plan.guests(), MAX_GUESTS);
        assert_eq!(plan.pizzas, 36);

        plan.set_guests(1);
        assert_eq!(plan.guests(), MIN_GUESTS);
    }

    #[test]
    fn test_custom_menu_keeps_order_and_has_no_estimate() {
        let mut plan = EventPlan::default();
        plan.menu = MenuType::Custom;
        plan.set_guests(30);
        assert_eq!(plan.pizzas, 8);
        assert_eq!(plan.estimated_cost(), None);
        plan.budget = Some(1);
        assert!(!plan.is_over_budget());
    }

    #[test]
    fn test_duration_is_clamped() {
        let mut plan = EventPlan::default();
        plan.set_duration(0);
        assert_eq!(plan.duration_hours(), 1);
        plan.set_duration(12);
        assert_eq!(plan.duration_hours(), 8);
    }

    #[test]
    fn test_budget_check() {
        let mut plan = EventPlan::default();
        plan.budget = Some(100);
        assert!(plan.is_over_budget());
        plan.budget = Some(119);
        assert!(!plan.is_over_budget());
    }

    #[test]
    fn test_apply_to_draft() {
        let mut plan = EventPlan::default();
        plan.event_type = EventType::Kids;
        plan.event_date = "2026-12-05".into();
        plan.budget = Some(150);
        plan.cake = true;

        let mut draft = SubmissionDraft::contact("Mari", "5555", "");
        plan.apply_to(&mut draft);

        assert_eq!(draft.name, "Mari");
        assert_eq!(draft.event_type, "kids");
        assert_eq!(draft.budget, "150€");
        assert_eq!(draft.guests, Some(10));
        assert_eq!(draft.has_cake, Some(true));
        assert_eq!(draft.menu_type.as_deref(), Some("standard"));
        assert_eq!(draft.estimated_cost, Some(144));
        assert!(draft.is_event_booking());
    }

    #[test]
    fn test_parse_types() {
        assert_eq!("corporate".parse::<EventType>(), Ok(EventType::Corporate));
        assert!("wedding".parse::<EventType>().is_err());
        assert_eq!("custom".parse::<MenuType>(), Ok(MenuType::Custom));
    }
}
