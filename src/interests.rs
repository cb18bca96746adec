use std::collections::BTreeSet;

/// Tags offered on the About step.
pub const CATALOG: &[&str] = &[
    "Travel", "Music", "Movies", "Cooking", "Fitness", "Reading",
    "Photography", "Gaming", "Hiking", "Dancing", "Art", "Yoga",
    "Sports", "Pets", "Fashion", "Foodie", "Technology", "Nature",
    "Volunteering", "Coffee", "Wine", "Camping", "Running", "Swimming",
];

/// Profiles need at least this many interests before leaving the About step.
pub const MIN_INTERESTS: usize = 5;

/// The set of selected interest tags. Toggling a tag twice returns the set to
/// its prior state.
#[derive(Debug, Clone, Default)]
pub struct InterestPicker {
    selected: BTreeSet<String>,
}

impl InterestPicker {
    /// Add the tag if absent, remove it if present. Returns whether the tag is
    /// selected afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.selected.remove(tag) {
            false
        } else {
            self.selected.insert(tag.to_string());
            true
        }
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected.contains(tag)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// How many more selections are needed to reach the minimum.
    pub fn remaining(&self) -> usize {
        MIN_INTERESTS.saturating_sub(self.selected.len())
    }

    /// Running prompt shown under the tag grid; `None` once the minimum is met.
    pub fn remaining_label(&self) -> Option<String> {
        match self.remaining() {
            0 => None,
            1 => Some("Select 1 more interest".to_string()),
            n => Some(format!("Select {n} more interests")),
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut picker = InterestPicker::default();
        assert!(picker.toggle("Travel"));
        assert!(picker.is_selected("Travel"));
        assert_eq!(picker.count(), 1);
        assert!(!picker.toggle("Travel"));
        assert!(!picker.is_selected("Travel"));
        assert_eq!(picker.count(), 0);
    }

    #[test]
    fn double_toggle_restores_original_set() {
        let mut picker = InterestPicker::default();
        picker.toggle("Music");
        picker.toggle("Hiking");
        let before: Vec<String> = picker.selected().map(String::from).collect();
        picker.toggle("Travel");
        picker.toggle("Travel");
        let after: Vec<String> = picker.selected().map(String::from).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        let mut picker = InterestPicker::default();
        assert_eq!(picker.remaining(), 5);
        for tag in &CATALOG[..4] {
            picker.toggle(tag);
        }
        assert_eq!(picker.remaining(), 1);
        picker.toggle(CATALOG[4]);
        assert_eq!(picker.remaining(), 0);
        picker.toggle(CATALOG[5]);
        assert_eq!(picker.remaining(), 0);
    }

    #[test]
    fn remaining_label_pluralizes() {
        let mut picker = InterestPicker::default();
        assert_eq!(picker.remaining_label().as_deref(), Some("Select 5 more interests"));
        for tag in &CATALOG[..4] {
            picker.toggle(tag);
        }
        assert_eq!(picker.remaining_label().as_deref(), Some("Select 1 more interest"));
        picker.toggle(CATALOG[4]);
        assert!(picker.remaining_label().is_none());
    }

    #[test]
    fn catalog_has_no_duplicates() {
        let unique: BTreeSet<&str> = CATALOG.iter().copied().collect();
        assert_eq!(unique.len(), CATALOG.len());
        assert!(CATALOG.len() >= MIN_INTERESTS);
    }
}
