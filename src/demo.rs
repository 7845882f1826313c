//! Scaffold demo: a ticking counter and a guest name form
//!
//! The UI owns these and drives them from its timer and form events.

/// Cells in the numbered demo grid
pub const GRID_CELLS: usize = 10;

/// Counter bumped once per timer tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    pub count: u64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one and return the new value
    pub fn tick(&mut self) -> u64 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    /// Heading text shown above the grid
    pub fn heading(&self) -> String {
        format!("Welcome, edit me! {}", self.count)
    }
}

/// Guest name form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestForm {
    guest: String,
}

impl GuestForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the submitted name as typed
    pub fn submit(&mut self, name: &str) {
        self.guest = name.to_string();
    }

    pub fn reset(&mut self) {
        self.guest.clear();
    }

    pub fn guest(&self) -> &str {
        &self.guest
    }

    pub fn greeting(&self) -> String {
        greeting(&self.guest)
    }
}

/// Greeting for `name`, or a prompt when nobody has signed in
pub fn greeting(name: &str) -> String {
    if name.is_empty() {
        "who are you?".to_string()
    } else {
        format!("Hello, {name}")
    }
}

/// Labels of the numbered grid cells
pub fn grid_labels(cells: usize) -> impl Iterator<Item = String> {
    (0..cells).map(|i| i.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_ticks() {
        let mut counter = Counter::new();
        assert_eq!(counter.heading(), "Welcome, edit me! 0");
        assert_eq!(counter.tick(), 1);
        assert_eq!(counter.tick(), 2);
        assert_eq!(counter.heading(), "Welcome, edit me! 2");
    }

    #[test]
    fn test_counter_saturates() {
        let mut counter = Counter { count: u64::MAX };
        assert_eq!(counter.tick(), u64::MAX);
    }

    #[test]
    fn test_guest_form() {
        let mut form = GuestForm::new();
        assert_eq!(form.greeting(), "who are you?");

        form.submit("Ada");
        assert_eq!(form.guest(), "Ada");
        assert_eq!(form.greeting(), "Hello, Ada");

        form.reset();
        assert_eq!(form.guest(), "");
        assert_eq!(form.greeting(), "who are you?");
    }

    #[test]
    fn test_grid_labels() {
        let labels: Vec<String> = grid_labels(GRID_CELLS).collect();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels.first().map(String::as_str), Some("0"));
        assert_eq!(labels.last().map(String::as_str), Some("9"));
    }
}
