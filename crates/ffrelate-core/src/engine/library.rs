use crate::core::ids::ParamId;

/// Storage for concrete parameter values addressed by [`ParamId`].
///
/// The relationship engine only ever deals in ids; this is where callers keep
/// the values those ids stand for.
#[derive(Debug, Clone)]
pub struct ParameterLibrary<T> {
    values: Vec<T>,
}

impl<T> Default for ParameterLibrary<T> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<T> ParameterLibrary<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: T) -> ParamId {
        self.values.push(value);
        ParamId::new(self.values.len() as u32)
    }

    pub fn get(&self, id: ParamId) -> Option<&T> {
        if id.is_null() {
            return None;
        }
        self.values.get(id.get() as usize - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamId, &T)> {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (ParamId::new(index as u32 + 1), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T: PartialEq> ParameterLibrary<T> {
    /// Returns the id of an equal value if one is stored, otherwise adds it.
    pub fn add_unique(&mut self, value: T) -> ParamId {
        match self.values.iter().position(|existing| *existing == value) {
            Some(index) => ParamId::new(index as u32 + 1),
            None => self.add(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_null_is_never_stored() {
        let mut library = ParameterLibrary::new();
        let id = library.add(0.25);
        assert_eq!(id, ParamId::new(1));
        assert_eq!(library.get(id), Some(&0.25));
        assert_eq!(library.get(ParamId::NULL), None);
    }

    #[test]
    fn add_unique_reuses_equal_values() {
        let mut library = ParameterLibrary::new();
        let first = library.add_unique(-0.18);
        let second = library.add_unique(-0.18);
        let third = library.add_unique(0.5);
        assert_eq!(first, second);
        assert_ne!(first, third);
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn iter_yields_ids_in_insertion_order() {
        let mut library = ParameterLibrary::new();
        library.add("a");
        library.add("b");
        let ids: Vec<_> = library.iter().map(|(id, value)| (id.get(), *value)).collect();
        assert_eq!(ids, vec![(1, "a"), (2, "b")]);
    }
}
