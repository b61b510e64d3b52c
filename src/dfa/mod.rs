//! Subset construction (spec §4.C), partition-refinement minimization
//! (spec §4.D), and the linear scanner (spec §4.E).

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::nfa::Nfa;

/// One state of a *total* DFA: every one of the 256 byte values has a
/// defined successor (spec §8 property 8), stored densely so a step is a
/// single array index.
#[derive(Debug, Clone)]
pub struct DfaState {
    pub accepting: bool,
    pub transitions: Box<[u32; 256]>,
}

/// A deterministic automaton over the full byte alphabet. States live in a
/// single arena and are referred to by index; `start` is the entry point.
#[derive(Debug, Clone)]
pub struct Dfa {
    pub states: Vec<DfaState>,
    pub start: usize,
}

/// Subset-constructs a total DFA from `nfa` (spec §4.C). The empty NFA-state
/// subset is interned like any other and becomes the dead state: every byte
/// from it loops back to itself, and it never accepts.
pub fn from_nfa(nfa: &Nfa) -> Dfa {
    let mut states: Vec<DfaState> = Vec::new();
    let mut index_of: HashMap<BTreeSet<usize>, u32> = HashMap::new();
    let mut queue: VecDeque<BTreeSet<usize>> = VecDeque::new();

    let start_set = nfa.closure([nfa.start]);
    index_of.insert(start_set.clone(), 0);
    states.push(DfaState {
        accepting: start_set.contains(&nfa.accept),
        transitions: Box::new([0; 256]),
    });
    queue.push_back(start_set);

    while let Some(set) = queue.pop_front() {
        let from = index_of[&set];
        for b in 0u8..=255 {
            let next_set = nfa.step(&set, b);
            let next = match index_of.get(&next_set) {
                Some(&idx) => idx,
                None => {
                    let idx = states.len() as u32;
                    index_of.insert(next_set.clone(), idx);
                    states.push(DfaState {
                        accepting: next_set.contains(&nfa.accept),
                        transitions: Box::new([0; 256]),
                    });
                    queue.push_back(next_set);
                    idx
                }
            };
            states[from as usize].transitions[b as usize] = next;
        }
    }

    debug_assert_total(&states);
    Dfa { states, start: 0 }
}

fn debug_assert_total(states: &[DfaState]) {
    debug_assert!(
        states.iter().all(|s| s.transitions.len() == 256),
        "every DFA state must define all 256 byte transitions"
    );
}

impl Dfa {
    /// Hopcroft-style partition refinement (spec §4.D): repeatedly splits
    /// blocks until every state in a block has the same accepting-ness and
    /// the same per-byte *block* image as every other state in that block,
    /// then collapses each surviving block to a single state.
    pub fn minimize(&mut self) {
        let n = self.states.len();
        if n == 0 {
            return;
        }
        let mut block_of: Vec<usize> = self
            .states
            .iter()
            .map(|s| if s.accepting { 1 } else { 0 })
            .collect();
        let mut num_blocks = block_of.iter().copied().collect::<BTreeSet<_>>().len();

        loop {
            let mut sig_to_block: HashMap<Vec<usize>, usize> = HashMap::new();
            let mut next_block_of = vec![0usize; n];
            for (i, next_id) in next_block_of.iter_mut().enumerate() {
                let mut sig = Vec::with_capacity(257);
                sig.push(block_of[i]);
                sig.extend(
                    self.states[i]
                        .transitions
                        .iter()
                        .map(|&t| block_of[t as usize]),
                );
                let len = sig_to_block.len();
                *next_id = *sig_to_block.entry(sig).or_insert(len);
            }
            let next_num_blocks = sig_to_block.len();
            block_of = next_block_of;
            if next_num_blocks == num_blocks {
                break;
            }
            num_blocks = next_num_blocks;
        }

        let mut rep_of_block: Vec<usize> = vec![usize::MAX; num_blocks];
        for (i, &blk) in block_of.iter().enumerate() {
            if rep_of_block[blk] == usize::MAX {
                rep_of_block[blk] = i;
            }
        }

        let mut new_states = Vec::with_capacity(num_blocks);
        for &rep in &rep_of_block {
            let mut transitions = Box::new([0u32; 256]);
            for (b, slot) in transitions.iter_mut().enumerate() {
                *slot = block_of[self.states[rep].transitions[b] as usize] as u32;
            }
            new_states.push(DfaState {
                accepting: self.states[rep].accepting,
                transitions,
            });
        }

        self.start = block_of[self.start];
        self.states = new_states;
        debug_assert_total(&self.states);
    }

    /// The linear scanner (spec §4.E): walks the total transition function
    /// byte by byte and reports whether the final state accepts. There is no
    /// partial-match or error channel, only `true`/`false`.
    pub fn accepts(&self, input: &[u8]) -> bool {
        let mut current = self.start;
        for &b in input {
            current = self.states[current].transitions[b as usize] as usize;
        }
        self.states[current].accepting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{nfa, parser};

    fn dfa_for(pattern: &[u8]) -> Dfa {
        let ast = parser::parse(pattern).unwrap();
        from_nfa(&nfa::compile(&ast))
    }

    #[test]
    fn every_state_has_256_transitions() {
        let dfa = dfa_for(b"a(b|c)*d");
        for s in &dfa.states {
            assert_eq!(s.transitions.len(), 256);
        }
    }

    #[test]
    fn dead_state_loops_to_itself_and_rejects() {
        let dfa = dfa_for(b"abc");
        // Feed a byte that cannot start a match: the walk should land on a
        // permanently-rejecting state for everything after it.
        assert!(!dfa.accepts(b"xabc"));
        assert!(!dfa.accepts(b"xyzxyzxyz"));
    }

    #[test]
    fn subset_construction_matches_scenarios() {
        let dfa = dfa_for(b"a(b|c)*d");
        assert!(dfa.accepts(b"abcbcd"));
        assert!(!dfa.accepts(b"abcbce"));
    }

    #[test]
    fn minimize_does_not_increase_state_count() {
        let mut dfa = dfa_for(b"(ab|ac)*d");
        let before = dfa.states.len();
        dfa.minimize();
        assert!(dfa.states.len() <= before);
    }

    #[test]
    fn minimize_preserves_language_on_sample_inputs() {
        let unminimized = dfa_for(b"[a-z]*(ing|ed)");
        let mut minimized = unminimized.clone();
        minimized.minimize();
        for text in [
            &b""[..],
            b"go",
            b"going",
            b"played",
            b"playeding",
            b"xyzing",
        ] {
            assert_eq!(
                unminimized.accepts(text),
                minimized.accepts(text),
                "disagreement on {text:?}"
            );
        }
    }

    #[test]
    fn all_rejecting_pattern_minimizes_to_one_state() {
        // An empty character class cannot be written directly, but a
        // deliberately unsatisfiable pattern exercises the same "no
        // accepting state anywhere reachable"-adjacent shape: here it's the
        // dead state dominating after minimization collapses every
        // non-accepting configuration together.
        let mut dfa = dfa_for(b"a");
        dfa.minimize();
        assert!(!dfa.accepts(b"b"));
        assert!(dfa.accepts(b"a"));
    }
}
