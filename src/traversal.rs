use std::{
    collections::{HashSet, VecDeque},
    fmt::Display,
    iter::FusedIterator,
};

use crate::fsm::{State, StateId};

pub const EPSILON: char = 'ε';

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Symbol(char),
    Epsilon,
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbol(symbol) => write!(f, "{}", symbol),
            Self::Epsilon => write!(f, "{}", EPSILON),
        }
    }
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: StateId,
    pub label: Label,
    pub target: StateId,
}

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -- {} --> {}", self.source, self.label, self.target)
    }
}

/// Iterative depth-first walk over the automaton.
///
/// A state is expanded the first time it is popped: all of its symbol
/// transitions are reported, then its epsilon transitions, and every
/// destination is pushed. Closure cycles end at the visited set.
#[derive(Debug, Clone)]
pub struct Edges<'a> {
    states: &'a [State],
    stack: Vec<StateId>,
    visited: HashSet<StateId>,
    pending: VecDeque<Edge>,
}

impl<'a> Edges<'a> {
    pub(crate) fn new(states: &'a [State], start: StateId) -> Self {
        Edges {
            states,
            stack: vec![start],
            visited: HashSet::new(),
            pending: VecDeque::new(),
        }
    }

    fn expand(&mut self, source: StateId, state: &State) {
        for (&symbol, targets) in state.transitions() {
            for &target in targets {
                self.report(source, Label::Symbol(symbol), target);
            }
        }
        for &target in state.epsilon() {
            self.report(source, Label::Epsilon, target);
        }
    }

    fn report(&mut self, source: StateId, label: Label, target: StateId) {
        self.pending.push_back(Edge {
            source,
            label,
            target,
        });
        self.stack.push(target);
    }
}

impl<'a> Iterator for Edges<'a> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        loop {
            if let Some(edge) = self.pending.pop_front() {
                return Some(edge);
            }
            let source = self.stack.pop()?;
            if !self.visited.insert(source) {
                continue;
            }
            let states = self.states;
            if let Some(state) = states.get(source) {
                self.expand(source, state);
            }
        }
    }
}

impl<'a> FusedIterator for Edges<'a> {}
