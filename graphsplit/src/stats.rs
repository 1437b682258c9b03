pub trait StatsStorage: Default {
    fn increment_non_empty_clauses(&mut self);
    fn increment_exactly_one_clauses(&mut self);
    fn increment_positive_edges(&mut self);
    fn increment_positive_edge_clauses(&mut self);
    fn increment_negative_edges(&mut self);
    fn increment_negative_edge_clauses(&mut self);
}

#[derive(Default)]
pub struct NoStats;

/// Clause counts per encoding rule.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Stats {
    non_empty_clauses: u64,
    exactly_one_clauses: u64,
    positive_edges: u64,
    positive_edge_clauses: u64,
    negative_edges: u64,
    negative_edge_clauses: u64,
}

impl Stats {
    pub fn non_empty_clauses(&self) -> u64 {
        self.non_empty_clauses
    }

    pub fn exactly_one_clauses(&self) -> u64 {
        self.exactly_one_clauses
    }

    pub fn positive_edges(&self) -> u64 {
        self.positive_edges
    }

    pub fn positive_edge_clauses(&self) -> u64 {
        self.positive_edge_clauses
    }

    pub fn negative_edges(&self) -> u64 {
        self.negative_edges
    }

    pub fn negative_edge_clauses(&self) -> u64 {
        self.negative_edge_clauses
    }

    pub fn total_clauses(&self) -> u64 {
        self.non_empty_clauses
            + self.exactly_one_clauses
            + self.positive_edge_clauses
            + self.negative_edge_clauses
    }
}

impl StatsStorage for NoStats {
    #[inline(always)]
    fn increment_non_empty_clauses(&mut self) {}
    #[inline(always)]
    fn increment_exactly_one_clauses(&mut self) {}
    #[inline(always)]
    fn increment_positive_edges(&mut self) {}
    #[inline(always)]
    fn increment_positive_edge_clauses(&mut self) {}
    #[inline(always)]
    fn increment_negative_edges(&mut self) {}
    #[inline(always)]
    fn increment_negative_edge_clauses(&mut self) {}
}

impl StatsStorage for Stats {
    #[inline(always)]
    fn increment_non_empty_clauses(&mut self) {
        self.non_empty_clauses += 1;
    }
    #[inline(always)]
    fn increment_exactly_one_clauses(&mut self) {
        self.exactly_one_clauses += 1;
    }
    #[inline(always)]
    fn increment_positive_edges(&mut self) {
        self.positive_edges += 1;
    }
    #[inline(always)]
    fn increment_positive_edge_clauses(&mut self) {
        self.positive_edge_clauses += 1;
    }
    #[inline(always)]
    fn increment_negative_edges(&mut self) {
        self.negative_edges += 1;
    }
    #[inline(always)]
    fn increment_negative_edge_clauses(&mut self) {
        self.negative_edge_clauses += 1;
    }
}
