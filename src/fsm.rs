use colored::Colorize;
use indexmap::IndexMap;
use itertools::Itertools;
use log::{log, trace};
use thiserror::Error;

use crate::{
    lexer::{Kind, Token},
    parser::{render_diagnostic, run_parse, ParserError},
    traversal::{Edge, Edges, Label},
    utils::CompileFlags,
};

pub type StateId = usize;

/// A node of the automaton. Symbol transitions keep their insertion order,
/// and so do the destinations recorded for each symbol.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct State {
    transitions: IndexMap<char, Vec<StateId>>,
    epsilon: Vec<StateId>,
}

impl State {
    pub fn transitions(&self) -> &IndexMap<char, Vec<StateId>> {
        &self.transitions
    }

    pub fn epsilon(&self) -> &[StateId] {
        &self.epsilon
    }

    pub fn is_terminal(&self) -> bool {
        self.transitions.is_empty() && self.epsilon.is_empty()
    }
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReError {
    #[error(transparent)]
    ParsingFailed(#[from] ParserError),
    #[error("{}", missing_operand_message(.operator))]
    MissingOperand {
        operator: Option<char>,
        offset: usize,
    },
    #[error("{count} fragments left after evaluation, expected one")]
    ExcessOperands { count: usize },
}

fn missing_operand_message(operator: &Option<char>) -> String {
    match operator {
        Some(operator) => format!("missing operand for {:?}", operator),
        None => String::from("missing operand at end of expression"),
    }
}

impl ReError {
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::ParsingFailed(parsing_error) => Some(parsing_error.offset()),
            Self::MissingOperand { offset, .. } => Some(*offset),
            Self::ExcessOperands { .. } => None,
        }
    }

    pub fn diagnostic(&self, pattern: &str) -> String {
        match self {
            Self::ParsingFailed(parsing_error) => parsing_error.diagnostic(pattern),
            Self::MissingOperand { offset, .. } => {
                render_diagnostic(3, &self.to_string(), pattern, *offset)
            }
            Self::ExcessOperands { .. } => {
                render_diagnostic(4, &self.to_string(), pattern, pattern.len())
            }
        }
    }
}

/// Arena the construction primitives allocate into. States are only ever
/// appended, and so are their transitions.
#[derive(Debug, Default)]
pub(crate) struct Builder {
    states: Vec<State>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    fn gen_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    fn fragment(&mut self) -> Fragment {
        Fragment {
            start: self.gen_state(),
            end: self.gen_state(),
        }
    }

    fn add_transition(&mut self, start: StateId, end: StateId, symbol: char) {
        self.states[start]
            .transitions
            .entry(symbol)
            .or_default()
            .push(end);
    }

    fn epsilon(&mut self, start: StateId, end: StateId) {
        self.states[start].epsilon.push(end);
    }

    pub fn literal(&mut self, symbol: char) -> Fragment {
        let fragment = self.fragment();
        self.add_transition(fragment.start, fragment.end, symbol);
        fragment
    }

    pub fn concatenate(&mut self, left: Fragment, right: Fragment) -> Fragment {
        self.epsilon(left.end, right.start);
        Fragment {
            start: left.start,
            end: right.end,
        }
    }

    pub fn union(&mut self, left: Fragment, right: Fragment) -> Fragment {
        let fragment = self.fragment();
        self.epsilon(fragment.start, left.start);
        self.epsilon(fragment.start, right.start);
        self.epsilon(left.end, fragment.end);
        self.epsilon(right.end, fragment.end);
        fragment
    }

    pub fn closure(&mut self, inner: Fragment) -> Fragment {
        let fragment = self.fragment();
        self.epsilon(fragment.start, inner.start);
        self.epsilon(fragment.start, fragment.end);
        self.epsilon(inner.end, inner.start);
        self.epsilon(inner.end, fragment.end);
        fragment
    }

    /// Folds a postfix token stream into a single fragment. `end_offset` is
    /// reported when the stream runs out of operands at its end.
    pub fn evaluate(&mut self, postfix: &[Token], end_offset: usize) -> Result<Fragment, ReError> {
        let mut stack: Vec<Fragment> = Vec::new();
        for token in postfix {
            trace!("evaluating {} at offset {}", token, token.offset);
            let fragment = match token.kind {
                Kind::Symbol(symbol) => self.literal(symbol),
                Kind::Concat => {
                    let (left, right) = pop_pair(&mut stack, token)?;
                    self.concatenate(left, right)
                }
                Kind::Union => {
                    let (left, right) = pop_pair(&mut stack, token)?;
                    self.union(left, right)
                }
                Kind::Star => {
                    let inner = pop_operand(&mut stack, token)?;
                    self.closure(inner)
                }
                Kind::LeftParen | Kind::RightParen => {
                    return Err(ParserError::UnmatchedParenthesis {
                        offset: token.offset,
                    }
                    .into())
                }
            };
            stack.push(fragment);
        }

        let fragment = stack.pop().ok_or(ReError::MissingOperand {
            operator: None,
            offset: end_offset,
        })?;
        if stack.is_empty() {
            Ok(fragment)
        } else {
            Err(ReError::ExcessOperands {
                count: stack.len() + 1,
            })
        }
    }

    pub fn finish(self, pattern: &str, fragment: Fragment) -> Nfa {
        Nfa {
            pattern: String::from(pattern),
            states: self.states,
            start: fragment.start,
            accept: fragment.end,
        }
    }
}

fn pop_operand(stack: &mut Vec<Fragment>, operator: &Token) -> Result<Fragment, ReError> {
    stack.pop().ok_or(ReError::MissingOperand {
        operator: Some(operator.kind.as_char()),
        offset: operator.offset,
    })
}

fn pop_pair(stack: &mut Vec<Fragment>, operator: &Token) -> Result<(Fragment, Fragment), ReError> {
    let right = pop_operand(stack, operator)?;
    let left = pop_operand(stack, operator)?;
    Ok((left, right))
}

/// A compiled automaton. Owns every state reachable from `start`; nothing
/// else lives in the arena.
#[derive(Debug, Clone)]
pub struct Nfa {
    pattern: String,
    states: Vec<State>,
    start: StateId,
    accept: StateId,
}

impl Nfa {
    pub fn compile(pattern: &str) -> Result<Nfa, ReError> {
        Self::compile_with_flags(pattern, CompileFlags::NO_FLAG)
    }

    pub fn compile_with_flags(pattern: &str, flags: CompileFlags) -> Result<Nfa, ReError> {
        let postfix = run_parse(pattern, flags)?;
        let mut builder = Builder::new();
        let fragment = builder.evaluate(&postfix, pattern.len())?;
        let nfa = builder.finish(pattern, fragment);
        log!(
            flags.stage_level(),
            "compiled {:?} into {} states (start {}, accept {})",
            pattern,
            nfa.state_count(),
            nfa.start,
            nfa.accept
        );
        Ok(nfa)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Depth-first enumeration of every transition reachable from the
    /// start state.
    pub fn edges(&self) -> Edges<'_> {
        self.edges_from(self.start)
    }

    pub fn edges_from(&self, start: StateId) -> Edges<'_> {
        Edges::new(&self.states, start)
    }

    /// The transition listing, one `src -- label --> dst` line per edge.
    pub fn transitions(&self) -> String {
        format!("NFA Transitions:\n{}\n", self.edges().join("\n"))
    }

    /// Convert the automaton to GraphViz Dot code for debugging purposes.
    pub fn to_dot(&self) -> String {
        let opts = "[fillcolor=\"#EEEEEE\" fontcolor=\"#888888\"]";
        let mut out = String::new();
        let node = |id: StateId| -> String {
            if id == self.start {
                format!("node_{}[label=\"{}\"][fillcolor=green]\n", id, id)
            } else if id == self.accept {
                format!("node_{}[label=\"{}\" shape=doublecircle]\n", id, id)
            } else {
                format!("node_{}[label=\"{}\"]{}\n", id, id, opts)
            }
        };

        out += &node(self.start);
        let mut seen = vec![false; self.states.len()];
        seen[self.start] = true;
        for Edge {
            source,
            label,
            target,
        } in self.edges()
        {
            if !seen[target] {
                out += &node(target);
                seen[target] = true;
            }
            match label {
                Label::Epsilon => {
                    out += &format!("node_{} -> node_{}[style=dashed]\n", source, target)
                }
                Label::Symbol(symbol) => {
                    out += &format!(
                        "node_{} -> node_{}[label=\"{}\"]\n",
                        source, target, symbol
                    )
                }
            }
        }

        let opts = "node [shape=circle style=filled fillcolor=\"#4385f5\" fontcolor=\"#FFFFFF\" \
        color=white penwidth=5.0 margin=0.1 width=0.5 height=0.5 fixedsize=true]";
        format!(
            "digraph G {{  rankdir=\"LR\" graph [fontname = \"Courier New\"];
                node [fontname = \"verdana\", style = rounded];
                edge [fontname = \"verdana\"];
                {{\n{}\n{}\n}}}}",
            opts, out
        )
    }

    /// Short colored summary used by the command line front end.
    pub fn summary(&self) -> String {
        format!(
            "{} {} states, start {}, accept {}",
            self.pattern.bold(),
            self.state_count(),
            self.start.to_string().green(),
            self.accept.to_string().blue()
        )
    }
}
