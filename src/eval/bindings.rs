use crate::eval::protocol::ExpressionResult;
use std::collections::HashMap;

/// Variable bindings accumulated across evaluation rounds. Grows
/// monotonically until reset; a snapshot rides along with every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingStore {
    values: HashMap<String, String>,
}

impl BindingStore {
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.clone()
    }

    /// Fold every assignment result of a response into the store. Later
    /// assignments to the same name win within a batch.
    pub fn fold_assignments(&mut self, results: &[ExpressionResult]) {
        for result in results {
            if result.is_assignment {
                self.bind(result.expression.clone(), result.answer.clone());
            }
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
