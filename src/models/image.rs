/// What an update does to a stored `image_url`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageChange {
    /// Leave the stored reference untouched.
    #[default]
    Keep,
    /// Overwrite the stored reference; `None` clears it.
    Replace(Option<String>),
}

impl ImageChange {
    pub fn is_keep(&self) -> bool {
        matches!(self, ImageChange::Keep)
    }

    pub fn apply(&self, current: &mut Option<String>) {
        if let ImageChange::Replace(value) = self {
            *current = value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_leaves_current_value() {
        let mut current = Some("/old.jpg".to_string());
        ImageChange::Keep.apply(&mut current);
        assert_eq!(current.as_deref(), Some("/old.jpg"));
    }

    #[test]
    fn replace_with_none_clears() {
        let mut current = Some("/old.jpg".to_string());
        ImageChange::Replace(None).apply(&mut current);
        assert_eq!(current, None);
    }
}
