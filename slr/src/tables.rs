//! SLR action placement and conflict resolution.
//!
//! Every (state, terminal) pair first collects all proposed actions as a
//! map from action to contributing items (so literal duplicates merge up
//! front), then runs the priority filter and the associativity tie-break
//! over the survivors. Whatever is still plural after that is a hard
//! construction failure.

use indexmap::IndexMap;

use grammar::{Assoc, Grammar, RuleId, Symbol};

use crate::ffn::Ffn;
use crate::item::Item;
use crate::states::{self, State, StateGraph};
use crate::Conflict;

/// A build-time action proposal. `Error` has no representation here; it is
/// simply the absence of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Candidate {
  Shift(u32),
  Reduce(RuleId),
  Accept,
}

/// action -> the items proposing it. The first pusher is the record's
/// primary item; the rest are duplicates kept for diagnostics.
type Records = IndexMap<Candidate, Vec<Item>>;

/// Generates the ACTION and GOTO tables.
///
/// entry in `ACTION[state][terminal]`:
/// - positive: shift (n - 1)
/// - zero: error
/// - negative: reduce (-n - 1)
/// - MIN: accept
///
/// entry in `GOTO[state][nt]`:
/// - positive: goto (n - 1)
/// - zero: error
pub fn gen_tables<V>(
  grammar: &Grammar<V>,
  ffn: &Ffn,
  graph: &StateGraph,
  start_rule: RuleId,
) -> Result<(Vec<Vec<i32>>, Vec<Vec<u32>>), Vec<Conflict>> {
  let num_states = graph.states.len();
  let mut action = vec![vec![0i32; grammar.num_terminals()]; num_states];
  let mut goto = vec![vec![0u32; grammar.num_nonterminals()]; num_states];
  let mut conflicts = vec![];

  for (from_state, state) in graph.states.iter().enumerate() {
    for (&sym, &to_state) in &state.transitions {
      if let Symbol::Nonterminal(nt) = sym {
        goto[from_state][nt.index()] = to_state + 1;
      }
    }

    for (terminal, records) in collect_records(grammar, ffn, state, start_rule) {
      match resolve(grammar, records) {
        Ok(candidate) => action[from_state][terminal] = encode(candidate),
        Err(survivors) => conflicts.push(make_conflict(
          grammar,
          from_state as u32,
          terminal,
          state,
          &survivors,
        )),
      }
    }
  }

  if conflicts.is_empty() {
    Ok((action, goto))
  } else {
    Err(conflicts)
  }
}

fn collect_records<V>(
  grammar: &Grammar<V>,
  ffn: &Ffn,
  state: &State,
  start_rule: RuleId,
) -> IndexMap<usize, Records> {
  let mut cells = IndexMap::<usize, Records>::new();

  for &item in &state.items {
    if item.is_final(grammar) {
      if item.rule() == start_rule {
        cells
          .entry(grammar.eof().index())
          .or_default()
          .entry(Candidate::Accept)
          .or_default()
          .push(item);
      } else {
        // SLR placement: reduce on every terminal in FOLLOW of the head.
        let head = grammar.rule(item.rule()).nt;
        for terminal in ffn.follow[&head].iter() {
          cells
            .entry(terminal)
            .or_default()
            .entry(Candidate::Reduce(item.rule()))
            .or_default()
            .push(item);
        }
      }
    } else if let Some(Symbol::Terminal(term)) = item.next_symbol(grammar) {
      if let Some(&to_state) = state.transitions.get(&Symbol::Terminal(term)) {
        cells
          .entry(term.index())
          .or_default()
          .entry(Candidate::Shift(to_state))
          .or_default()
          .push(item);
      }
    }
  }

  cells
}

/// Disambiguates one cell. Duplicate merging already happened when the
/// records map was keyed by action; the two remaining stages run in order,
/// each over the previous stage's survivors.
fn resolve<V>(
  grammar: &Grammar<V>,
  records: Records,
) -> Result<Candidate, Vec<(Candidate, Vec<Item>)>> {
  let mut records: Vec<(Candidate, Vec<Item>)> = records.into_iter().collect();

  // Priority filter: only applicable when every record's rule declares one.
  if records.len() > 1 {
    let precs: Option<Vec<u32>> = records
      .iter()
      .map(|(_, items)| grammar.rule(items[0].rule()).prec)
      .collect();

    if let Some(precs) = precs {
      let highest = *precs.iter().max().unwrap();
      records = records
        .into_iter()
        .zip(precs)
        .filter(|(_, prec)| *prec == highest)
        .map(|(record, _)| record)
        .collect();
    }
  }

  // Associativity tie-break: only when everything left stems from the same
  // associativity-declaring rule. LEFT prefers the item that has consumed
  // more, RIGHT the one that has consumed less.
  if records.len() > 1 {
    let rule = records[0].1[0].rule();
    let same_rule = records.iter().all(|(_, items)| items[0].rule() == rule);

    if same_rule {
      if let Some(assoc) = grammar.rule(rule).assoc {
        let (ix, _) = match assoc {
          Assoc::Left => records
            .iter()
            .enumerate()
            .max_by_key(|(_, (_, items))| items[0].dot())
            .unwrap(),
          Assoc::Right => records
            .iter()
            .enumerate()
            .min_by_key(|(_, (_, items))| items[0].dot())
            .unwrap(),
        };
        return Ok(records.swap_remove(ix).0);
      }
    }
  }

  if records.len() == 1 {
    Ok(records.pop().unwrap().0)
  } else {
    Err(records)
  }
}

fn encode(candidate: Candidate) -> i32 {
  match candidate {
    Candidate::Shift(state) => state as i32 + 1,
    Candidate::Reduce(rule) => !(rule.index() as i32),
    Candidate::Accept => std::i32::MIN,
  }
}

fn make_conflict<V>(
  grammar: &Grammar<V>,
  state: u32,
  terminal: usize,
  state_data: &State,
  survivors: &[(Candidate, Vec<Item>)],
) -> Conflict {
  let terminal = grammar
    .terminals()
    .nth(terminal)
    .map(|term| grammar.terminal_name(term).to_owned())
    .unwrap_or_else(|| "$".to_owned());

  let actions = survivors
    .iter()
    .map(|(candidate, items)| match candidate {
      Candidate::Shift(_) => format!("shift {}", items[0].to_string(grammar)),
      Candidate::Reduce(rule) => {
        format!("reduce {}", grammar.rule(*rule).to_string(grammar))
      }
      Candidate::Accept => "accept".to_owned(),
    })
    .collect();

  Conflict {
    state,
    terminal,
    state_items: states::state_items(grammar, state_data),
    actions,
  }
}
