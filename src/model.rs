//! Value-tag association model.

/// A single value-tag association.
///
/// `tag_index` is the position the tag had in the list supplied when the value was
/// tagged. Lower positions describe the value more strongly.
///
/// # Example
/// ```rust
/// use tagstash::Entry;
///
/// let entry = Entry::new("https://www.example.org", "foo", 0);
/// assert_eq!(entry.tag, "foo");
/// assert_eq!(entry.tag_index, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    /// The tagged value.
    pub value: String,
    /// The tag associated with the value.
    pub tag: String,
    /// Position of the tag at association time.
    pub tag_index: usize,
}

impl Entry {
    /// Creates an association.
    pub fn new(value: impl Into<String>, tag: impl Into<String>, tag_index: usize) -> Self {
        Self {
            value: value.into(),
            tag: tag.into(),
            tag_index,
        }
    }

    /// Returns `true` if this entry associates the same value with the same tag.
    #[inline]
    pub fn same_pair(&self, other: &Entry) -> bool {
        self.value == other.value && self.tag == other.tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_new_accepts_borrowed_and_owned() {
        let owned = Entry::new(String::from("v"), String::from("t"), 3);
        let borrowed = Entry::new("v", "t", 3);
        assert_eq!(owned, borrowed);
    }

    #[test]
    fn test_same_pair_ignores_tag_index() {
        let a = Entry::new("v", "t", 0);
        let b = Entry::new("v", "t", 7);
        assert!(a.same_pair(&b));
        assert_ne!(a, b);
        assert!(!a.same_pair(&Entry::new("v", "other", 0)));
    }
}
