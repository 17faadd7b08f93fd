//! Deferred-configuration reminders shown at the end of a run.

/// Ordered, append-only list of things the user postponed.
///
/// Owned by whoever drives the run and handed to the collector by `&mut`;
/// nothing else can add to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderList {
    items: Vec<String>,
}

impl ReminderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reminder: impl Into<String>) {
        self.items.push(reminder.into());
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// The closing notice, or `None` when nothing was postponed.
    pub fn render(&self) -> Option<String> {
        if self.items.is_empty() {
            return None;
        }
        let mut block = String::from("Attention! Some settings were postponed.\n\nDon't forget to:\n");
        for item in &self.items {
            block.push_str("- ");
            block.push_str(item);
            block.push('\n');
        }
        Some(block)
    }
}
