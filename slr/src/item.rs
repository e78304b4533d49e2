use std::fmt::{self, Write};

use grammar::{Grammar, RuleId, Symbol};

/// An LR(0) item: a rule plus a dot position marking parse progress.
///
/// Items are plain values; advancing produces a new item, nothing is
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
  rule: RuleId,
  dot: usize,
}

impl Item {
  pub fn initial(rule: RuleId) -> Item {
    Item { rule, dot: 0 }
  }

  pub fn rule(self) -> RuleId {
    self.rule
  }

  pub fn dot(self) -> usize {
    self.dot
  }

  /// The same item with the dot moved over one symbol.
  pub fn advanced(self) -> Item {
    Item {
      rule: self.rule,
      dot: self.dot + 1,
    }
  }

  pub fn is_initial(self) -> bool {
    self.dot == 0
  }

  pub fn is_final<V>(self, grammar: &Grammar<V>) -> bool {
    self.dot == grammar.rule(self.rule).symbols.len()
  }

  /// Kernel items are everything except the non-start initial items that
  /// closure adds; they determine a state's identity.
  pub fn is_kernel<V>(self, grammar: &Grammar<V>) -> bool {
    self.dot > 0 || grammar.rule(self.rule).nt == grammar.start()
  }

  /// The symbol right after the dot; `None` for a final item.
  pub fn next_symbol<V>(self, grammar: &Grammar<V>) -> Option<Symbol> {
    grammar.rule(self.rule).symbols.get(self.dot).copied()
  }

  pub fn fmt<V>(self, grammar: &Grammar<V>, f: &mut impl Write) -> fmt::Result {
    let rule = grammar.rule(self.rule);

    write!(f, "{} ->", grammar.nonterminal_name(rule.nt))?;

    for (i, &sym) in rule.symbols.iter().enumerate() {
      if i == self.dot {
        write!(f, " .")?;
      }
      write!(f, " {}", grammar.symbol_name(sym))?;
    }

    if self.dot == rule.symbols.len() {
      write!(f, " .")?;
    }

    Ok(())
  }

  pub fn to_string<V>(self, grammar: &Grammar<V>) -> String {
    let mut buf = String::new();
    self.fmt(grammar, &mut buf).unwrap();
    buf
  }
}
