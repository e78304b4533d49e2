//! compute FIRST, FOLLOW, and NULLABLE sets.

use bit_set::BitSet;
use grammar::{Grammar, Map, NonterminalId, Symbol};

/// Immutable result of the grammar analysis pass.
///
/// `nullable` holds nonterminal indices; `first` and `follow` hold terminal
/// indices. All three are least fixpoints: recomputing over an unchanged
/// grammar yields equal sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Ffn {
  pub nullable: BitSet,
  pub first: Map<NonterminalId, BitSet>,
  pub follow: Map<NonterminalId, BitSet>,
}

pub fn compute<V>(grammar: &Grammar<V>) -> Ffn {
  let nullable = compute_nullable(grammar);
  let first = compute_first(grammar, &nullable);
  let follow = compute_follow(grammar, &nullable, &first);

  Ffn {
    nullable,
    first,
    follow,
  }
}

/// Adds the FIRST set of `symbols` to `out`, walking left to right and
/// stopping at the first non-nullable symbol (inclusive). Returns true if
/// every symbol was nullable.
pub(crate) fn symbols_first(
  out: &mut BitSet,
  first: &Map<NonterminalId, BitSet>,
  nullable: &BitSet,
  symbols: &[Symbol],
) -> bool {
  for sym in symbols {
    match sym {
      Symbol::Terminal(term) => {
        out.insert(term.index());
        return false;
      }
      Symbol::Nonterminal(nt) => {
        out.union_with(&first[nt]);
        if !nullable.contains(nt.index()) {
          return false;
        }
      }
    }
  }

  true
}

fn compute_nullable<V>(grammar: &Grammar<V>) -> BitSet {
  let mut nullable = BitSet::new();

  loop {
    let mut changed = false;

    for (_, rule) in grammar.rules() {
      if nullable.contains(rule.nt.index()) {
        continue;
      }

      let all_nullable = rule.symbols.iter().all(|sym| match sym {
        Symbol::Terminal(_) => false,
        Symbol::Nonterminal(nt) => nullable.contains(nt.index()),
      });

      if all_nullable {
        nullable.insert(rule.nt.index());
        changed = true;
      }
    }

    if !changed {
      break;
    }
  }

  nullable
}

fn compute_first<V>(grammar: &Grammar<V>, nullable: &BitSet) -> Map<NonterminalId, BitSet> {
  let mut first = grammar
    .nonterminals()
    .map(|nt| (nt, BitSet::new()))
    .collect::<Map<_, _>>();

  loop {
    let mut changed = false;

    for (_, rule) in grammar.rules() {
      let mut rule_first = BitSet::new();
      symbols_first(&mut rule_first, &first, nullable, &rule.symbols);

      let nt_first = first.get_mut(&rule.nt).unwrap();
      if !rule_first.is_subset(nt_first) {
        nt_first.union_with(&rule_first);
        changed = true;
      }
    }

    if !changed {
      break;
    }
  }

  first
}

fn compute_follow<V>(
  grammar: &Grammar<V>,
  nullable: &BitSet,
  first: &Map<NonterminalId, BitSet>,
) -> Map<NonterminalId, BitSet> {
  let mut follow = grammar
    .nonterminals()
    .map(|nt| (nt, BitSet::new()))
    .collect::<Map<_, _>>();
  follow.get_mut(&grammar.start()).unwrap().insert(grammar.eof().index());

  loop {
    let mut changed = false;

    for (_, rule) in grammar.rules() {
      for (dot, sym) in rule.symbols.iter().enumerate() {
        let nt = match sym {
          Symbol::Terminal(_) => continue,
          Symbol::Nonterminal(nt) => *nt,
        };

        let mut add = BitSet::new();
        let rest_nullable =
          symbols_first(&mut add, first, nullable, &rule.symbols[dot + 1..]);
        if rest_nullable {
          add.union_with(&follow[&rule.nt]);
        }

        let nt_follow = follow.get_mut(&nt).unwrap();
        if !add.is_subset(nt_follow) {
          nt_follow.union_with(&add);
          changed = true;
        }
      }
    }

    if !changed {
      break;
    }
  }

  follow
}
