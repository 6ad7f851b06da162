//! The editable state of one contact form.

/// Form fields as typed by the visitor.
///
/// Text fields are empty strings when untouched. The event extras are only
/// set by event booking forms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub budget: String,
    pub message: String,

    pub event_type: String,
    pub event_date: String,
    pub guests: Option<u32>,
    pub duration: Option<u32>,
    pub pizzas: Option<u32>,
    pub drinks: Option<u32>,
    pub has_cake: Option<bool>,
    pub menu_type: Option<String>,
    pub estimated_cost: Option<u32>,

    /// Hidden honeypot input. Anything typed here marks the session as a bot.
    pub honeypot: String,
}

impl SubmissionDraft {
    /// Draft with just the contact basics filled in.
    pub fn contact(name: &str, phone: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            ..Self::default()
        }
    }

    pub fn is_event_booking(&self) -> bool {
        !self.event_type.is_empty()
    }

    /// Back to the initial empty state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
