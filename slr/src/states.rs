//! Canonical LR(0) state construction: closure, goto grouping, and the
//! deduplicated state graph.

use std::collections::{BTreeSet, VecDeque};

use grammar::{Grammar, Map, RuleId, Symbol};

use crate::item::Item;

/// A closure-complete item set with its outgoing transitions.
#[derive(Debug, Clone)]
pub struct State {
  pub items: BTreeSet<Item>,
  pub transitions: Map<Symbol, u32>,
}

/// The canonical collection. States are numbered in creation order and
/// unique by item-set equality.
#[derive(Debug, Clone)]
pub struct StateGraph {
  pub states: Vec<State>,
  pub start: u32,
}

pub fn build_states<V>(grammar: &Grammar<V>, start_rule: RuleId) -> StateGraph {
  let mut states: Vec<State> = vec![];
  let mut ids = Map::<BTreeSet<Item>, u32>::default();
  let mut queue = VecDeque::new();

  let mut start_set = BTreeSet::new();
  start_set.insert(Item::initial(start_rule));
  closure(grammar, &mut start_set);
  let start = intern(&mut states, &mut ids, &mut queue, start_set);

  while let Some(state_ix) = queue.pop_front() {
    let items = states[state_ix as usize].items.clone();

    for (sym, mut to_set) in transitions_of(grammar, &items) {
      closure(grammar, &mut to_set);
      let to_state = intern(&mut states, &mut ids, &mut queue, to_set);
      states[state_ix as usize].transitions.insert(sym, to_state);
    }
  }

  StateGraph { states, start }
}

/// Extends `items` with the initial item of every rule of each nonterminal
/// that appears after a dot, until nothing new is added.
pub fn closure<V>(grammar: &Grammar<V>, items: &mut BTreeSet<Item>) {
  let mut work: Vec<Item> = items.iter().copied().collect();

  while let Some(item) = work.pop() {
    if let Some(Symbol::Nonterminal(nt)) = item.next_symbol(grammar) {
      for &rule in grammar.rules_of(nt) {
        let new_item = Item::initial(rule);
        if items.insert(new_item) {
          work.push(new_item);
        }
      }
    }
  }
}

/// Groups the advanced counterpart of every non-final item by the symbol
/// the dot moves over. The returned sets are kernels; callers close them.
pub fn transitions_of<V>(
  grammar: &Grammar<V>,
  items: &BTreeSet<Item>,
) -> Map<Symbol, BTreeSet<Item>> {
  let mut transitions = Map::<Symbol, BTreeSet<Item>>::default();

  for &item in items {
    if let Some(sym) = item.next_symbol(grammar) {
      transitions.entry(sym).or_default().insert(item.advanced());
    }
  }

  transitions
}

fn intern(
  states: &mut Vec<State>,
  ids: &mut Map<BTreeSet<Item>, u32>,
  queue: &mut VecDeque<u32>,
  items: BTreeSet<Item>,
) -> u32 {
  if let Some(&state) = ids.get(&items) {
    return state;
  }

  let state = states.len() as u32;
  ids.insert(items.clone(), state);
  states.push(State {
    items,
    transitions: Map::default(),
  });
  queue.push_back(state);

  state
}

pub(crate) fn state_items<V>(grammar: &Grammar<V>, state: &State) -> Vec<String> {
  state.items.iter().map(|item| item.to_string(grammar)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use grammar::{GrammarBuilder, TerminalId};
  use pretty_assertions::assert_eq;

  fn sample() -> (grammar::Grammar<()>, RuleId, TerminalId) {
    let mut builder = GrammarBuilder::<()>::new();
    let x = builder.terminal("x");
    let plus = builder.terminal("plus");
    let s = builder.nonterminal("S");
    let e = builder.nonterminal("E");
    let t = builder.nonterminal("T");
    let start = builder.rule(s, vec![e.into()]).id();
    builder.rule(e, vec![t.into(), plus.into(), e.into()]);
    builder.rule(e, vec![t.into()]);
    builder.rule(t, vec![x.into()]);
    (builder.build(s), start, plus)
  }

  #[test]
  fn closure_pulls_in_reachable_rules() {
    let (grammar, start, _) = sample();

    let mut items = BTreeSet::new();
    items.insert(Item::initial(start));
    closure(&grammar, &mut items);

    // S -> . E drags in both E rules, which drag in T -> . x.
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|item| item.is_initial()));
  }

  #[test]
  fn canonical_collection_deduplicates() {
    let (grammar, start, plus) = sample();

    let graph = build_states(&grammar, start);

    // s0, S-target, T-target, x-target, "T plus ." target, "T plus E ." target
    assert_eq!(graph.states.len(), 6);
    assert_eq!(graph.start, 0);

    let sets: BTreeSet<&BTreeSet<Item>> =
      graph.states.iter().map(|state| &state.items).collect();
    assert_eq!(sets.len(), graph.states.len());

    // The state after "T plus" re-derives E and must land back on the
    // existing T-target and x-target states instead of minting new ones.
    let t_state = graph.states[graph.start as usize]
      .transitions
      .values()
      .find(|&&to| {
        graph.states[to as usize]
          .transitions
          .contains_key(&Symbol::Terminal(plus))
      })
      .copied()
      .unwrap();
    let after_plus =
      graph.states[t_state as usize].transitions[&Symbol::Terminal(plus)];
    let reused = graph.states[after_plus as usize]
      .transitions
      .values()
      .filter(|&&to| to == t_state)
      .count();
    assert_eq!(reused, 1);
  }

  #[test]
  fn transitions_cover_every_next_symbol() {
    let (grammar, start, _) = sample();

    let graph = build_states(&grammar, start);
    let s0 = &graph.states[graph.start as usize];

    // E, T and x all appear after a dot in the start state.
    assert_eq!(s0.transitions.len(), 3);
    for (&sym, &to) in &s0.transitions {
      let target = &graph.states[to as usize];
      assert!(target
        .items
        .iter()
        .any(|item| !item.is_initial()), "target of {:?} has no kernel item", sym);
    }
  }
}
