//! Wire names of the submission fields.

pub const NAME: &str = "name";
pub const PHONE: &str = "phone";
pub const EMAIL: &str = "email";
pub const BUDGET: &str = "budget";
pub const MESSAGE: &str = "message";
pub const EVENT_TYPE: &str = "eventType";
pub const EVENT_DATE: &str = "eventDate";
pub const GUESTS: &str = "guests";
pub const DURATION: &str = "duration";
pub const PIZZAS: &str = "pizzas";
pub const DRINKS: &str = "drinks";
pub const HAS_CAKE: &str = "hasCake";
pub const MENU_TYPE: &str = "menuType";
pub const ESTIMATED_COST: &str = "estimatedCost";
pub const SOURCE: &str = "source";

/// Honeypot. Hidden from people, must arrive empty.
pub const HONEYPOT: &str = "_gotcha";
/// Epoch milliseconds at which the form became interactive.
pub const LOAD_TIME: &str = "_loadTime";

/// Fields that are used by the edge checks and never forwarded.
pub const INTERNAL: [&str; 2] = [HONEYPOT, LOAD_TIME];
