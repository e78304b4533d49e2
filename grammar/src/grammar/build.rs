use super::{
  Assoc, Grammar, NonterminalId, NonterminalIdGen, Rule, RuleId, Symbol,
  TerminalId, TerminalIdGen,
};
use crate::action::{Reduction, SemanticError};
use crate::{BiMap, Map};

/// Accumulates symbols and rules, then freezes them into a `Grammar`.
///
/// Ids are allocated densely in declaration order and stay valid in the
/// built grammar.
pub struct GrammarBuilder<V> {
  rules: Vec<Rule<V>>,
  nt_rules: Map<NonterminalId, Vec<RuleId>>,
  terms: BiMap<TerminalId, String>,
  nts: BiMap<NonterminalId, String>,
  term_ids: TerminalIdGen,
  nt_ids: NonterminalIdGen,
}

impl<V> GrammarBuilder<V> {
  pub fn new() -> Self {
    GrammarBuilder {
      rules: vec![],
      nt_rules: Map::default(),
      terms: BiMap::new(),
      nts: BiMap::new(),
      term_ids: TerminalIdGen::default(),
      nt_ids: NonterminalIdGen::default(),
    }
  }

  /// Declares a terminal. Declaring the same name twice yields the same id.
  pub fn terminal(&mut self, name: impl Into<String>) -> TerminalId {
    let name = name.into();
    if let Some(&term) = self.terms.get_by_right(&name) {
      return term;
    }
    let term = self.term_ids.gen();
    self.terms.insert(term, name);
    term
  }

  /// Declares a nonterminal. Declaring the same name twice yields the same
  /// id.
  pub fn nonterminal(&mut self, name: impl Into<String>) -> NonterminalId {
    let name = name.into();
    if let Some(&nt) = self.nts.get_by_right(&name) {
      return nt;
    }
    let nt = self.nt_ids.gen();
    self.nts.insert(nt, name);
    nt
  }

  /// Adds a rule for `nt`. Priority, associativity and the semantic action
  /// are attached through the returned `RuleBuilder`.
  pub fn rule(
    &mut self,
    nt: NonterminalId,
    symbols: impl IntoIterator<Item = Symbol>,
  ) -> RuleBuilder<'_, V> {
    let rule = RuleId(self.rules.len() as u32);
    self.rules.push(Rule {
      nt,
      symbols: symbols.into_iter().collect(),
      prec: None,
      assoc: None,
      action: None,
    });
    self.nt_rules.entry(nt).or_default().push(rule);

    RuleBuilder {
      rules: &mut self.rules,
      rule,
    }
  }

  /// Freezes the grammar with `start` as its start nonterminal and appends
  /// the end-of-input terminal.
  pub fn build(mut self, start: NonterminalId) -> Grammar<V> {
    let eof = self.terminal("$");

    Grammar {
      rules: self.rules,
      nt_rules: self.nt_rules,
      terms: self.terms,
      nts: self.nts,
      start,
      eof,
    }
  }
}

impl<V> Default for GrammarBuilder<V> {
  fn default() -> Self {
    GrammarBuilder::new()
  }
}

/// Write access to one freshly added rule.
pub struct RuleBuilder<'g, V> {
  rules: &'g mut Vec<Rule<V>>,
  rule: RuleId,
}

impl<'g, V> RuleBuilder<'g, V> {
  pub fn prec(self, prec: u32) -> Self {
    self.rules[self.rule.index()].prec = Some(prec);
    self
  }

  pub fn assoc(self, assoc: Assoc) -> Self {
    self.rules[self.rule.index()].assoc = Some(assoc);
    self
  }

  pub fn action<F>(self, action: F) -> Self
  where
    F: for<'p> Fn(Reduction<'p, V>) -> Result<V, SemanticError> + 'static,
  {
    self.rules[self.rule.index()].action = Some(Box::new(action));
    self
  }

  pub fn id(&self) -> RuleId {
    self.rule
  }
}
