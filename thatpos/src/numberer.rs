use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// Numberer for categorical values, such as labels.
///
/// Numbers are assigned in order of first appearance, starting at 0.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Numberer<T>
where
    T: Eq + Hash,
{
    values: Vec<T>,
    numbers: HashMap<T, usize>,
}

impl<T> Numberer<T>
where
    T: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Numberer {
            values: Vec::new(),
            numbers: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Add a value. If the value has already been encountered before,
    /// the corresponding number is returned.
    pub fn add(&mut self, value: T) -> usize {
        match self.numbers.entry(value.clone()) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let number = self.values.len();
                self.values.push(value);
                e.insert(number);
                number
            }
        }
    }

    /// Return the number for a value.
    pub fn number(&self, item: &T) -> Option<usize> {
        self.numbers.get(item).cloned()
    }

    /// Return the value for a number.
    pub fn value(&self, number: usize) -> Option<&T> {
        self.values.get(number)
    }

    /// Values in order of appearance.
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T> Numberer<T>
where
    T: Clone + Eq + Hash + Ord,
{
    /// Values in sorted order.
    pub fn sorted_values(&self) -> Vec<T> {
        let mut values = self.values.clone();
        values.sort();
        values
    }
}

#[cfg(test)]
mod tests {
    use super::Numberer;

    #[test]
    fn numbers_in_order_of_appearance() {
        let mut numberer = Numberer::new();
        assert!(numberer.is_empty());
        assert_eq!(numberer.add("WPR"), 0);
        assert_eq!(numberer.add("CJT"), 1);
        assert_eq!(numberer.add("WPR"), 0);

        assert_eq!(numberer.len(), 2);
        assert_eq!(numberer.number(&"CJT"), Some(1));
        assert_eq!(numberer.number(&"RA"), None);
        assert_eq!(numberer.value(0), Some(&"WPR"));
        assert_eq!(numberer.value(2), None);
        assert_eq!(numberer.values(), &["WPR", "CJT"]);
        assert_eq!(numberer.sorted_values(), vec!["CJT", "WPR"]);
    }
}
