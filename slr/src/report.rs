//! Renders construction failures as human-readable text.

use std::fmt::Write;

use itertools::Itertools;

use crate::{Conflict, Error};

pub fn report(err: &Error) -> String {
  match err {
    Error::StartRule(err) => format!("{}\n", err),
    Error::Conflicts(conflicts) => {
      conflicts.iter().map(render_conflict).join("\n")
    }
  }
}

fn render_conflict(conflict: &Conflict) -> String {
  let mut buf = String::new();

  writeln!(
    &mut buf,
    "unresolved conflict in state {} on {}:\n",
    conflict.state, conflict.terminal,
  )
  .unwrap();

  for item in &conflict.state_items {
    writeln!(&mut buf, "  {}", item).unwrap();
  }

  writeln!(&mut buf, "\nthe surviving actions are:\n").unwrap();

  for action in &conflict.actions {
    writeln!(&mut buf, "  {}", action).unwrap();
  }

  buf
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::build_table;
  use grammar::GrammarBuilder;

  #[test]
  fn conflict_report_lists_state_and_actions() {
    let mut builder = GrammarBuilder::<()>::new();
    let id = builder.terminal("id");
    let plus = builder.terminal("plus");
    let s = builder.nonterminal("S");
    let e = builder.nonterminal("E");
    builder.rule(s, vec![e.into()]);
    builder.rule(e, vec![e.into(), plus.into(), e.into()]);
    builder.rule(e, vec![id.into()]);
    let grammar = builder.build(s);

    let err = build_table(&grammar).unwrap_err();
    let text = report(&err);

    assert!(text.contains("unresolved conflict in state"));
    assert!(text.contains("on plus"));
    assert!(text.contains("E -> E plus E ."));
    assert!(text.contains("reduce E -> E plus E"));
  }

  #[test]
  fn start_rule_report() {
    let mut builder = GrammarBuilder::<()>::new();
    let x = builder.terminal("x");
    let s = builder.nonterminal("S");
    builder.rule(s, vec![x.into()]);
    let grammar = builder.build(s);

    let err = build_table(&grammar).unwrap_err();
    let text = report(&err);

    assert!(text.contains("start rule of S"));
  }
}
