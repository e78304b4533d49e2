//! SLR table construction and the table-driven parsing engine.
//!
//! `build` turns a `grammar::Grammar` into a `Parser`: it runs the
//! nullable/FIRST/FOLLOW analysis, constructs the canonical LR(0) state
//! collection, places SLR actions with priority/associativity
//! disambiguation, and exports the result into the compact `ParseTable`
//! the runtime engine drives.

pub mod ffn;
pub mod item;
pub mod report;
pub mod states;
pub mod tables;

mod parser;

pub use self::parser::{run, ParseError, Parser};

use grammar::{Grammar, NonterminalId, RuleId, Symbol, TerminalId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  StartRule(#[from] StartRuleError),
  #[error("grammar is ambiguous: {} unresolved conflicts", .0.len())]
  Conflicts(Vec<Conflict>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartRuleError {
  #[error("start symbol {name} must have exactly one rule, but has {count}")]
  RuleCount { name: String, count: usize },
  #[error("the start rule of {name} must consist of a single nonterminal")]
  Body { name: String },
}

/// One (state, terminal) pair whose action records survived every
/// disambiguation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
  pub state: u32,
  pub terminal: String,
  pub state_items: Vec<String>,
  pub actions: Vec<String>,
}

/// What the runtime table answers for a (state, terminal) query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Shift(u32),
  Reduce(RuleId),
  Accept,
  Error,
}

/// The immutable runtime table. No item sets survive into it; parse calls
/// may share one table freely.
#[derive(Debug, Clone)]
pub struct ParseTable {
  /// positive: shift (n - 1)
  /// zero: error
  /// negative: reduce (-n - 1)
  /// MIN: accept
  action: Vec<Vec<i32>>,
  /// positive: goto (n - 1)
  /// zero: error
  goto: Vec<Vec<u32>>,
  /// (length of RHS of the rule, nonterminal index, rule)
  prods: Vec<(usize, u32, RuleId)>,
  start_state: u32,
  eof_index: usize,
  terminals: Vec<String>,
}

impl ParseTable {
  /// A query that hits no table entry is `Action::Error`, never a panic.
  pub fn action(&self, state: u32, terminal: TerminalId) -> Action {
    self.action_at(state, terminal.index())
  }

  pub fn goto_state(&self, state: u32, nt: NonterminalId) -> Option<u32> {
    self.goto_at(state, nt.index())
  }

  pub fn start_state(&self) -> u32 {
    self.start_state
  }

  pub fn num_states(&self) -> usize {
    self.action.len()
  }

  pub(crate) fn action_at(&self, state: u32, terminal: usize) -> Action {
    let entry = self
      .action
      .get(state as usize)
      .and_then(|row| row.get(terminal))
      .copied()
      .unwrap_or(0);

    if entry > 0 {
      Action::Shift(entry as u32 - 1)
    } else if entry == std::i32::MIN {
      Action::Accept
    } else if entry < 0 {
      Action::Reduce(self.prods[(!entry) as usize].2)
    } else {
      Action::Error
    }
  }

  pub(crate) fn goto_at(&self, state: u32, nt: usize) -> Option<u32> {
    let entry = self
      .goto
      .get(state as usize)
      .and_then(|row| row.get(nt))
      .copied()
      .unwrap_or(0);

    if entry > 0 {
      Some(entry - 1)
    } else {
      None
    }
  }

  pub(crate) fn prod(&self, rule: RuleId) -> (usize, u32) {
    let (rhs_len, nt, _) = self.prods[rule.index()];
    (rhs_len, nt)
  }

  pub(crate) fn eof_index(&self) -> usize {
    self.eof_index
  }

  pub(crate) fn terminal_name(&self, terminal: usize) -> &str {
    self.terminals.get(terminal).map(|name| name.as_str()).unwrap_or("$")
  }
}

/// Builds the runtime table and pairs it with the grammar's semantic
/// actions.
pub fn build<V>(grammar: Grammar<V>) -> Result<Parser<V>, Error> {
  let table = build_table(&grammar)?;
  Ok(Parser::new(grammar, table))
}

/// Builds just the runtime table. One-shot and single-threaded; the
/// build-time state graph is discarded before returning.
pub fn build_table<V>(grammar: &Grammar<V>) -> Result<ParseTable, Error> {
  let start_rule = check_start_rule(grammar)?;
  let ffn = ffn::compute(grammar);
  let graph = states::build_states(grammar, start_rule);
  let (action, goto) =
    tables::gen_tables(grammar, &ffn, &graph, start_rule).map_err(Error::Conflicts)?;

  let prods = grammar
    .rules()
    .map(|(rule, data)| (data.symbols.len(), data.nt.id(), rule))
    .collect();
  let terminals = grammar
    .terminals()
    .map(|term| grammar.terminal_name(term).to_owned())
    .collect();

  Ok(ParseTable {
    action,
    goto,
    prods,
    start_state: graph.start,
    eof_index: grammar.eof().index(),
    terminals,
  })
}

/// The start nonterminal must have exactly one rule, whose body is a single
/// nonterminal; the accept action hangs off that rule. Checked before any
/// state exploration.
fn check_start_rule<V>(grammar: &Grammar<V>) -> Result<RuleId, StartRuleError> {
  let start = grammar.start();
  let rules = grammar.rules_of(start);

  if rules.len() != 1 {
    return Err(StartRuleError::RuleCount {
      name: grammar.nonterminal_name(start).to_owned(),
      count: rules.len(),
    });
  }

  match grammar.rule(rules[0]).symbols.as_slice() {
    [Symbol::Nonterminal(_)] => Ok(rules[0]),
    _ => Err(StartRuleError::Body {
      name: grammar.nonterminal_name(start).to_owned(),
    }),
  }
}
