/// Change to an optional card field.
///
/// ```
/// use trellis_domain::FieldUpdate;
///
/// let mut description = Some("draft".to_string());
/// FieldUpdate::from_input("final").apply_to(&mut description);
/// assert_eq!(description.as_deref(), Some("final"));
///
/// FieldUpdate::from_input("").apply_to(&mut description);
/// assert_eq!(description, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    NoChange,
    Set(T),
    Clear,
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }
}

impl FieldUpdate<String> {
    /// Text typed by a user: empty clears the field.
    pub fn from_input(text: &str) -> Self {
        if text.is_empty() {
            FieldUpdate::Clear
        } else {
            FieldUpdate::Set(text.to_string())
        }
    }
}
