//! Element attributes.

use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;

/// A `name=value` pair inside an element's `[...]` list.
///
/// Either half may be missing: `[flag]` has no value and `[=value]` has no
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct Attribute {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl Attribute {
    /// Create an attribute with both a name and a value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }

    /// Create a name-only attribute, e.g. `[flag]`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: None,
        }
    }

    /// Create a value-only attribute, e.g. `[=value]`.
    pub fn nameless(value: impl Into<String>) -> Self {
        Self {
            name: None,
            value: Some(value.into()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether the attribute has a non-empty value.
    pub fn has_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// `true` for the value `"true"`, `false` for `"false"`.
    pub fn as_bool(&self) -> Option<bool> {
        match self.value()? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value()?.parse().ok()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value()?.parse().ok()
    }

    fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// Ordered attribute list. Names may repeat; lookups by name search in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attribute: Attribute) {
        self.0.push(attribute);
    }

    /// Append a `name=value` attribute, even when `name` is already present.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.push(Attribute::new(name, value));
    }

    /// Overwrite the value of the first attribute called `name`, or append a
    /// new one.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        match self.index_of(name) {
            Some(index) => self.0[index].value = Some(value.into()),
            None => self.push(Attribute::new(name, value)),
        }
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.0.iter().any(|attr| attr.is_named(name))
    }

    /// Index of the first attribute called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|attr| attr.is_named(name))
    }

    /// Index of the last attribute called `name`.
    pub fn last_index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().rposition(|attr| attr.is_named(name))
    }

    /// First attribute called `name`.
    pub fn find(&self, name: &str) -> Option<&Attribute> {
        self.0.iter().find(|attr| attr.is_named(name))
    }

    /// Value of the first attribute called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(Attribute::value)
    }

    /// Value of the first attribute called `name`, or `fallback` when there
    /// is no such attribute or it has no value.
    pub fn get_or<'a>(&'a self, name: &str, fallback: &'a str) -> &'a str {
        self.get(name).unwrap_or(fallback)
    }

    /// Values of every attribute called `name`, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.0
            .iter()
            .filter(move |attr| attr.is_named(name))
            .map(Attribute::value)
    }

    /// Name to value map. The first attribute with a given name wins and
    /// the map keeps first-seen order. Nameless attributes are skipped.
    pub fn to_map(&self) -> IndexMap<&str, Option<&str>> {
        let mut map = IndexMap::with_capacity(self.0.len());
        for attr in &self.0 {
            if let Some(name) = attr.name() {
                map.entry(name).or_insert(attr.value());
            }
        }
        map
    }

    pub fn into_vec(self) -> Vec<Attribute> {
        self.0
    }
}

impl Deref for Attributes {
    type Target = Vec<Attribute>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Attributes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Attribute>> for Attributes {
    fn from(attributes: Vec<Attribute>) -> Self {
        Self(attributes)
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn sample() -> Attributes {
        let mut attrs = Attributes::new();
        attrs.add("a", "1");
        attrs.add("b", "2");
        attrs.add("a", "3");
        attrs.push(Attribute::named("flag"));
        attrs.push(Attribute::nameless("anon"));
        attrs
    }

    #[test]
    fn test_duplicate_names_keep_order() {
        let attrs = sample();
        assert_eq!(attrs.index_of("a"), Some(0));
        assert_eq!(attrs.last_index_of("a"), Some(2));
        assert_eq!(attrs.index_of("missing"), None);
        assert_eq!(attrs.get("a"), Some("1"));
        assert_eq!(attrs.get_all("a").collect::<Vec<_>>(), vec![Some("1"), Some("3")]);
        assert!(attrs.contains_name("flag"));
        assert_eq!(attrs.get("flag"), None);
        assert_eq!(attrs.get_or("flag", "off"), "off");
    }

    #[test]
    fn test_set_overwrites_first_match() {
        let mut attrs = sample();
        attrs.set("a", "9");
        attrs.set("c", "4");
        assert_eq!(attrs.get_all("a").collect::<Vec<_>>(), vec![Some("9"), Some("3")]);
        assert_eq!(attrs.last().map(Attribute::name), Some(Some("c")));
    }

    #[test]
    fn test_to_map_first_wins() {
        let attrs = sample();
        let map = attrs.to_map();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["a", "b", "flag"]);
        assert_eq!(map["a"], Some("1"));
        assert_eq!(map["flag"], None);
    }

    #[test]
    fn test_coercions() {
        assert_eq!(Attribute::new("x", "true").as_bool(), Some(true));
        assert_eq!(Attribute::new("x", "yes").as_bool(), None);
        assert_eq!(Attribute::new("x", "-42").as_i64(), Some(-42));
        assert_eq!(Attribute::new("x", "2.5").as_f64(), Some(2.5));
        assert_eq!(Attribute::named("x").as_i64(), None);
        assert!(!Attribute::new("x", "").has_value());
    }
}
