use crate::dimacs;
use crate::dimacs::Dimacs;
use crate::sat::{VariableResults, VariableValue};
use std::fmt;

/// The underlying type that is used to handle variables.
/// This is a signed integer type.
pub type VariableType = i32;

pub const MAX_VARIABLE_COUNT: usize = (VariableType::MAX - 1) as usize;

/// Represents a boolean variable without a value.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct Variable(VariableType);

/// Represents a literal, i.e. a variable with a set value (true or false).
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Literal(VariableType);

/// Represents a CNF clause (a disjunction of literals).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Clause {
    literals: Vec<Literal>,
}

/// Represents a formula in a Conjunctive normal form (a conjunction of disjunction clauses)
/// over the variables `1..=variable_count`.
#[derive(Clone, Debug)]
pub struct CNF {
    variable_count: usize,
    clauses: Vec<Clause>,
}

impl From<Dimacs> for CNF {
    fn from(dimacs: Dimacs) -> Self {
        let mut cnf = CNF::new(dimacs.variable_count());

        for dimacs_clause in dimacs.clauses() {
            let clause = dimacs_clause
                .literals()
                .iter()
                .map(|literal| match *literal {
                    // The parser bounds variables by the header count, which fits the underlying type.
                    dimacs::Literal::Positive(variable) => {
                        Literal::new(Variable::new(variable as VariableType), true)
                    }
                    dimacs::Literal::Negative(variable) => {
                        Literal::new(Variable::new(variable as VariableType), false)
                    }
                })
                .collect();

            cnf.add_clause(clause);
        }

        cnf
    }
}

impl Variable {
    /// Creates a new variable with a given **positive** number.
    ///
    /// # Panics
    /// Panics if `number <= 0` with a debug assert.
    /// The value is not checked when debug asserts are disabled.
    #[inline]
    pub const fn new(number: VariableType) -> Self {
        debug_assert!(number > 0);
        Variable(number)
    }

    #[inline]
    pub fn number(&self) -> VariableType {
        self.0
    }
}

impl Literal {
    /// Creates a new literal for a variable with a set value.
    #[inline]
    pub const fn new(variable: Variable, is_true: bool) -> Self {
        if is_true {
            Literal(variable.0)
        } else {
            Literal(-variable.0)
        }
    }

    /// Returns `true` if the literal asserts its variable to be true.
    #[inline]
    pub fn value(self) -> bool {
        self.0 > 0
    }

    /// Returns the variable of the literal.
    #[inline]
    pub fn variable(self) -> Variable {
        Variable(self.0.abs())
    }

    /// Returns the signed DIMACS representation.
    #[inline]
    pub fn as_raw(self) -> VariableType {
        self.0
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    /// Returns a negated version of this literal.
    #[inline]
    fn not(self) -> Self::Output {
        Literal(-self.0)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Clause {
    /// Creates a new empty clause.
    pub fn new() -> Self {
        Self {
            literals: Vec::new(),
        }
    }

    /// Adds a literal to the clause.
    pub fn add_literal(&mut self, literal: Literal) {
        self.literals.push(literal)
    }

    /// Adds a literal to the clause.
    pub fn add_variable(&mut self, variable: Variable, value: bool) {
        self.literals.push(Literal::new(variable, value))
    }

    /// Provides the literals contained within the clause.
    #[inline]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Returns the number of literals contained within the clause.
    #[inline]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Returns `true` if at least one literal agrees with the assignment.
    /// Unset variables satisfy nothing.
    pub fn is_satisfied_by(&self, values: &VariableResults) -> bool {
        self.literals
            .iter()
            .any(|&literal| values.get(literal.variable()) == VariableValue::from(literal.value()))
    }
}

impl Default for Clause {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self {
            literals: iter.into_iter().collect(),
        }
    }
}

impl CNF {
    /// Creates a new CNF with zero clauses over `variable_count` variables.
    /// An empty CNF is considered to be satisfied.
    ///
    /// # Panics
    /// Panics if `variable_count` exceeds [`MAX_VARIABLE_COUNT`].
    pub fn new(variable_count: usize) -> Self {
        assert!(variable_count <= MAX_VARIABLE_COUNT);
        CNF {
            variable_count,
            clauses: Vec::new(),
        }
    }

    /// Adds a clause to the CNF.
    ///
    /// # Panics
    /// Panics with a debug assert if the clause mentions a variable outside of the declared range.
    pub fn add_clause(&mut self, clause: Clause) {
        debug_assert!(clause
            .literals()
            .iter()
            .all(|literal| literal.variable().number() as usize <= self.variable_count));
        self.clauses.push(clause)
    }

    /// Provides the disjunctive clauses contained within the CNF.
    #[inline]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    #[inline]
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    #[inline]
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Returns the maximum variable used within the CNF.
    ///
    /// Runs in O(literals) time.
    pub fn max_variable(&self) -> Option<Variable> {
        self.clauses
            .iter()
            .flat_map(|x| x.literals.iter().map(|x| x.variable()))
            .max()
    }

    /// Returns `true` if every clause is satisfied by the assignment.
    pub fn is_satisfied_by(&self, values: &VariableResults) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.is_satisfied_by(values))
    }
}
