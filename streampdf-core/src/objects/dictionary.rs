use crate::objects::Object;
use indexmap::IndexMap;

/// A PDF dictionary that keeps its keys in insertion order, so two runs that
/// build the same document emit identical bytes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    entries: IndexMap<String, Object>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Builds a dictionary with a `/Type` entry, the usual first key.
    pub fn typed(type_name: &str) -> Self {
        let mut dict = Self::new();
        dict.set("Type", Object::name(type_name));
        dict
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.entries.iter()
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Object::as_dict)
    }

    /// Returns the nested dictionary under `key`, inserting an empty one when
    /// the key is missing or holds something else.
    pub fn dict_entry(&mut self, key: &str) -> &mut Dictionary {
        let slot = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Object::Dictionary(Dictionary::new()));
        if !matches!(slot, Object::Dictionary(_)) {
            *slot = Object::Dictionary(Dictionary::new());
        }
        match slot {
            Object::Dictionary(dict) => dict,
            _ => unreachable!("slot was just replaced with a dictionary"),
        }
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Object::as_integer)
    }

    /// Adds `delta` to an integer entry, treating a missing entry as zero.
    pub fn increment(&mut self, key: &str, delta: i64) -> i64 {
        let value = self.get_integer(key).unwrap_or(0) + delta;
        self.set(key, value);
        value
    }
}

impl FromIterator<(String, Object)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (String, Object)>>(iter: T) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dictionary() {
        let dict = Dictionary::new();
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut dict = Dictionary::new();
        dict.set("Name", "Test");
        dict.set("Age", 42);
        dict.set("Active", true);

        assert_eq!(dict.get("Name"), Some(&Object::String("Test".to_string())));
        assert_eq!(dict.get("Age"), Some(&Object::Integer(42)));
        assert_eq!(dict.get("Active"), Some(&Object::Boolean(true)));
        assert_eq!(dict.get("Missing"), None);
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut dict = Dictionary::typed("Pages");
        dict.set("Count", 0);
        dict.set("Kids", Vec::<Object>::new());
        dict.set("Count", 1);

        let keys: Vec<_> = dict.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Type", "Count", "Kids"]);
    }

    #[test]
    fn test_remove_preserves_order_of_rest() {
        let mut dict = Dictionary::new();
        dict.set("A", 1);
        dict.set("B", 2);
        dict.set("C", 3);

        assert_eq!(dict.remove("B"), Some(Object::Integer(2)));
        let keys: Vec<_> = dict.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "C"]);
        assert_eq!(dict.remove("B"), None);
    }

    #[test]
    fn test_dict_entry_creates_and_reuses() {
        let mut resources = Dictionary::new();
        resources.dict_entry("Font").set("F1", Object::Reference(crate::objects::ObjectId::new(9, 0)));
        resources.dict_entry("Font").set("F2", Object::Reference(crate::objects::ObjectId::new(10, 0)));

        let fonts = resources.get_dict("Font").unwrap();
        assert_eq!(fonts.len(), 2);
    }

    #[test]
    fn test_dict_entry_replaces_non_dictionary() {
        let mut dict = Dictionary::new();
        dict.set("XObject", "oops");
        dict.dict_entry("XObject").set("Im1", 1);
        assert_eq!(dict.get_dict("XObject").unwrap().get_integer("Im1"), Some(1));
    }

    #[test]
    fn test_increment() {
        let mut dict = Dictionary::new();
        assert_eq!(dict.increment("Count", 1), 1);
        assert_eq!(dict.increment("Count", 1), 2);
        assert_eq!(dict.get_integer("Count"), Some(2));
    }

    #[test]
    fn test_from_iterator() {
        let items = vec![
            ("Name".to_string(), Object::String("Test".to_string())),
            ("Count".to_string(), Object::Integer(5)),
        ];

        let dict: Dictionary = items.into_iter().collect();

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get_integer("Count"), Some(5));
    }

    #[test]
    fn test_nested_dictionaries() {
        let mut root = Dictionary::new();
        let mut level1 = Dictionary::new();
        let mut level2 = Dictionary::new();

        level2.set("DeepValue", "Found");
        level1.set("Level2", Object::Dictionary(level2));
        root.set("Level1", Object::Dictionary(level1));

        let deep_value = root
            .get_dict("Level1")
            .and_then(|l1| l1.get_dict("Level2"))
            .and_then(|l2| l2.get("DeepValue"));

        assert_eq!(deep_value, Some(&Object::String("Found".to_string())));
    }
}
