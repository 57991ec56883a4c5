//! Epsilon-closure simulation, used to check compiled automata against the
//! `regex` crate.

use std::collections::HashSet;

use crate::fsm::{Nfa, StateId};

fn epsilon_closure(nfa: &Nfa, states: impl IntoIterator<Item = StateId>) -> HashSet<StateId> {
    let mut closure = HashSet::new();
    let mut stack: Vec<StateId> = states.into_iter().collect();
    while let Some(id) = stack.pop() {
        if closure.insert(id) {
            if let Some(state) = nfa.state(id) {
                stack.extend(state.epsilon().iter().copied());
            }
        }
    }
    closure
}

pub fn accepts(nfa: &Nfa, input: &str) -> bool {
    let mut current = epsilon_closure(nfa, [nfa.start()]);
    for c in input.chars() {
        let moved: Vec<StateId> = current
            .iter()
            .filter_map(|&id| nfa.state(id))
            .filter_map(|state| state.transitions().get(&c))
            .flatten()
            .copied()
            .collect();
        current = epsilon_closure(nfa, moved);
        if current.is_empty() {
            return false;
        }
    }
    current.contains(&nfa.accept())
}

mod tests {
    use std::fmt::Display;

    use itertools::Itertools;
    use proptest::{collection::vec, prelude::*};

    use super::accepts;
    use crate::fsm::{Nfa, StateId};

    #[derive(Debug, Clone)]
    enum Ast {
        Symbol(char),
        Concat(Box<Ast>, Box<Ast>),
        Union(Box<Ast>, Box<Ast>),
        Star(Box<Ast>),
    }

    impl Ast {
        /// The same language in `regex` crate syntax.
        fn to_regex(&self) -> String {
            match self {
                Self::Symbol(symbol) => symbol.to_string(),
                Self::Concat(left, right) => format!("{}{}", left.to_regex(), right.to_regex()),
                Self::Union(left, right) => {
                    format!("(?:{}|{})", left.to_regex(), right.to_regex())
                }
                Self::Star(inner) => format!("(?:{})*", inner.to_regex()),
            }
        }
    }

    impl Display for Ast {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Symbol(symbol) => write!(f, "{}", symbol),
                Self::Concat(left, right) => write!(f, "{}{}", left, right),
                Self::Union(left, right) => write!(f, "({}|{})", left, right),
                Self::Star(inner) => match **inner {
                    Self::Symbol(symbol) => write!(f, "{}*", symbol),
                    _ => write!(f, "({})*", inner),
                },
            }
        }
    }

    fn ast() -> impl Strategy<Value = Ast> {
        let leaf = prop_oneof![Just('a'), Just('b'), Just('c')].prop_map(Ast::Symbol);
        leaf.prop_recursive(4, 24, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone())
                    .prop_map(|(left, right)| Ast::Concat(Box::new(left), Box::new(right))),
                (inner.clone(), inner.clone())
                    .prop_map(|(left, right)| Ast::Union(Box::new(left), Box::new(right))),
                inner.prop_map(|inner| Ast::Star(Box::new(inner))),
            ]
        })
    }

    #[test]
    fn test_star_then_symbol_language() {
        let nfa = Nfa::compile("(a|b)*c").unwrap();
        for accepted in ["c", "ac", "abbac", "bc"] {
            assert!(accepts(&nfa, accepted), "{}", accepted);
        }
        for rejected in ["ab", "", "ca", "abc c", "cc"] {
            assert!(!accepts(&nfa, rejected), "{}", rejected);
        }
    }

    #[test]
    fn test_double_star_language() {
        let nfa = Nfa::compile("a**").unwrap();
        assert!(accepts(&nfa, ""));
        assert!(accepts(&nfa, "aaa"));
        assert!(!accepts(&nfa, "ab"));
    }

    proptest! {
        #[test]
        fn compiled_nfa_agrees_with_regex(
            ast in ast(),
            inputs in vec("[abc]{0,6}", 1..8),
        ) {
            let pattern = ast.to_string();
            let nfa = Nfa::compile(&pattern).unwrap();
            let expected = regex::Regex::new(&format!("^(?:{})$", ast.to_regex())).unwrap();
            for input in &inputs {
                prop_assert_eq!(
                    accepts(&nfa, input),
                    expected.is_match(input),
                    "pattern {:?} on {:?}",
                    pattern,
                    input
                );
            }
        }

        #[test]
        fn traversal_is_stable_and_complete(ast in ast()) {
            let nfa = Nfa::compile(&ast.to_string()).unwrap();
            let first = nfa.edges().collect_vec();
            let second = nfa.edges().collect_vec();
            prop_assert_eq!(&first, &second);

            let mut reached: Vec<StateId> = first.iter().map(|edge| edge.target).collect();
            reached.push(nfa.start());
            prop_assert_eq!(reached.into_iter().unique().count(), nfa.state_count());
        }
    }
}
