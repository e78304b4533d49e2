use crate::action::SemanticAction;
use crate::{BiMap, Map};

mod build;

pub use self::build::{GrammarBuilder, RuleBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TerminalId(u32);

impl TerminalId {
  pub fn id(self) -> u32 {
    self.0
  }

  pub fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonterminalId(u32);

impl NonterminalId {
  pub fn id(self) -> u32 {
    self.0
  }

  pub fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(u32);

impl RuleId {
  pub fn id(self) -> u32 {
    self.0
  }

  pub fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Default)]
pub(crate) struct TerminalIdGen(u32);

impl TerminalIdGen {
  pub(crate) fn gen(&mut self) -> TerminalId {
    let i = self.0;
    self.0 += 1;
    TerminalId(i)
  }
}

#[derive(Default)]
pub(crate) struct NonterminalIdGen(u32);

impl NonterminalIdGen {
  pub(crate) fn gen(&mut self) -> NonterminalId {
    let i = self.0;
    self.0 += 1;
    NonterminalId(i)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
  Terminal(TerminalId),
  Nonterminal(NonterminalId),
}

impl From<TerminalId> for Symbol {
  fn from(term: TerminalId) -> Symbol {
    Symbol::Terminal(term)
  }
}

impl From<NonterminalId> for Symbol {
  fn from(nt: NonterminalId) -> Symbol {
    Symbol::Nonterminal(nt)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
  Left,
  Right,
}

/// One production of a nonterminal. An empty symbol sequence is an epsilon
/// rule.
pub struct Rule<V> {
  pub nt: NonterminalId,
  pub symbols: Vec<Symbol>,
  pub prec: Option<u32>,
  pub assoc: Option<Assoc>,
  pub action: Option<SemanticAction<V>>,
}

impl<V> Rule<V> {
  pub fn to_string(&self, grammar: &Grammar<V>) -> String {
    let mut buf = format!("{} ->", grammar.nonterminal_name(self.nt));
    for &sym in &self.symbols {
      buf.push(' ');
      buf.push_str(grammar.symbol_name(sym));
    }
    buf
  }
}

/// An immutable grammar: rules, name tables, the distinguished start
/// nonterminal and the end-of-input terminal.
///
/// Built once through `GrammarBuilder`; nothing here changes afterwards.
/// Analysis results live in side tables computed downstream, not in the
/// grammar itself.
pub struct Grammar<V> {
  rules: Vec<Rule<V>>,
  nt_rules: Map<NonterminalId, Vec<RuleId>>,
  terms: BiMap<TerminalId, String>,
  nts: BiMap<NonterminalId, String>,
  start: NonterminalId,
  eof: TerminalId,
}

impl<V> Grammar<V> {
  pub fn start(&self) -> NonterminalId {
    self.start
  }

  /// The end-of-input sentinel, appended automatically at build time.
  pub fn eof(&self) -> TerminalId {
    self.eof
  }

  pub fn rule(&self, rule: RuleId) -> &Rule<V> {
    &self.rules[rule.index()]
  }

  pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule<V>)> {
    self.rules.iter().enumerate().map(|(i, rule)| (RuleId(i as u32), rule))
  }

  /// The rules of `nt`, in declaration order. Empty for a nonterminal that
  /// never got any.
  pub fn rules_of(&self, nt: NonterminalId) -> &[RuleId] {
    self.nt_rules.get(&nt).map(|rules| rules.as_slice()).unwrap_or(&[])
  }

  pub fn num_rules(&self) -> usize {
    self.rules.len()
  }

  pub fn num_terminals(&self) -> usize {
    self.terms.len()
  }

  pub fn num_nonterminals(&self) -> usize {
    self.nts.len()
  }

  pub fn terminals(&self) -> impl Iterator<Item = TerminalId> {
    (0..self.terms.len() as u32).map(TerminalId)
  }

  pub fn nonterminals(&self) -> impl Iterator<Item = NonterminalId> {
    (0..self.nts.len() as u32).map(NonterminalId)
  }

  pub fn terminal_name(&self, term: TerminalId) -> &str {
    self.terms.get_by_left(&term).map(|name| name.as_str()).unwrap_or("$")
  }

  pub fn nonterminal_name(&self, nt: NonterminalId) -> &str {
    self.nts.get_by_left(&nt).map(|name| name.as_str()).unwrap_or("?")
  }

  pub fn symbol_name(&self, sym: Symbol) -> &str {
    match sym {
      Symbol::Terminal(term) => self.terminal_name(term),
      Symbol::Nonterminal(nt) => self.nonterminal_name(nt),
    }
  }
}
