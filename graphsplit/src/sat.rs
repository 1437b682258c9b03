use crate::cnf::{Literal, Variable};

/// The answer reported by a SAT solver.
#[derive(Clone, Debug)]
pub enum Solution {
    Satisfiable(VariableResults),
    Unsatisfiable,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VariableValue {
    False = 0,
    True = 1,
    Unset,
}

/// A (possibly partial) truth assignment, indexed by variable number.
#[derive(Clone, Debug)]
pub struct VariableResults(Vec<VariableValue>);

impl VariableResults {
    pub fn new_unset(variable_count: usize) -> Self {
        // We allocate one extra element to make indexing trivial.
        VariableResults(vec![VariableValue::Unset; variable_count + 1])
    }

    /// Builds an assignment from the literals it makes true.
    /// Variables not mentioned stay unset, variables beyond `variable_count` are ignored.
    pub fn from_literals(
        variable_count: usize,
        literals: impl IntoIterator<Item = Literal>,
    ) -> Self {
        let mut results = Self::new_unset(variable_count);
        for literal in literals {
            if results.contains(literal.variable()) {
                results.set_to_literal(literal);
            }
        }
        results
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &VariableValue> {
        self.0.iter()
    }

    /// Returns the value of a variable, `Unset` for variables outside of the assignment.
    #[inline]
    pub fn get(&self, variable: Variable) -> VariableValue {
        self.0
            .get(variable.number() as usize)
            .copied()
            .unwrap_or(VariableValue::Unset)
    }

    #[inline]
    pub(crate) fn set(&mut self, variable: Variable, new_state: VariableValue) {
        self.0[variable.number() as usize] = new_state
    }

    #[inline]
    pub(crate) fn set_to_literal(&mut self, literal: Literal) {
        self.set(literal.variable(), literal.value().into())
    }

    #[inline]
    pub fn contains(&self, variable: Variable) -> bool {
        (variable.number() as usize) < self.0.len()
    }

    /// Returns the number of variables covered by the assignment.
    #[inline]
    pub fn variable_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Returns the number of variables that have a value.
    pub fn assigned_count(&self) -> usize {
        self.0
            .iter()
            .skip(1)
            .filter(|&&value| value != VariableValue::Unset)
            .count()
    }
}

impl From<bool> for VariableValue {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            VariableValue::True
        } else {
            VariableValue::False
        }
    }
}
