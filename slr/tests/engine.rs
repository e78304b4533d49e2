use std::cell::RefCell;
use std::rc::Rc;

use grammar::{Assoc, GrammarBuilder, Param, Params, SemanticError, Span};
use pretty_assertions::assert_eq;
use slr::ParseError;

#[test]
fn reduce_merges_spans() {
  let captured: Rc<RefCell<Vec<(Span, Span)>>> = Rc::new(RefCell::new(vec![]));

  let mut builder = GrammarBuilder::<String>::new();
  let id = builder.terminal("id");
  let plus = builder.terminal("plus");
  let s = builder.nonterminal("S");
  let e = builder.nonterminal("E");
  builder.rule(s, vec![e.into()]);
  {
    let captured = Rc::clone(&captured);
    builder
      .rule(e, vec![e.into(), plus.into(), e.into()])
      .prec(0)
      .assoc(Assoc::Left)
      .action(move |mut reduction| {
        captured
          .borrow_mut()
          .push((reduction.children[0].span, reduction.children[2].span));
        let right = reduction.children.pop().unwrap().value;
        reduction.children.pop();
        let left = reduction.children.pop().unwrap().value;
        Ok(format!("({} + {})", left, right))
      });
  }
  builder.rule(e, vec![id.into()]);
  let parser = slr::build(builder.build(s)).unwrap();

  let out = parser
    .parse(vec![
      (id, "id".to_owned()),
      (plus, "+".to_owned()),
      (id, "id".to_owned()),
    ])
    .unwrap();

  assert_eq!(out.value, "(id + id)");
  assert_eq!(out.span, Span::new(0, 3));
  assert_eq!(
    captured.borrow().as_slice(),
    &[(Span::new(0, 1), Span::new(2, 3))]
  );
}

#[test]
fn epsilon_grammar_accepts_empty_input() {
  let mut builder = GrammarBuilder::<&'static str>::new();
  let x = builder.terminal("x");
  let s = builder.nonterminal("S");
  let e = builder.nonterminal("E");
  builder.rule(s, vec![e.into()]);
  builder.rule(e, vec![]).action(|_| Ok("empty"));
  let parser = slr::build(builder.build(s)).unwrap();

  let out = parser.parse(vec![]).unwrap();
  assert_eq!(out.value, "empty");
  assert_eq!(out.span, Span::empty(0));

  let err = parser.parse(vec![(x, "x")]).unwrap_err();
  assert_eq!(
    err,
    ParseError::UnexpectedToken {
      terminal: "x".to_owned(),
      at: 0,
    }
  );
}

#[test]
fn rejection_reports_position_and_terminal() {
  let mut builder = GrammarBuilder::<String>::new();
  let id = builder.terminal("id");
  let plus = builder.terminal("plus");
  let s = builder.nonterminal("S");
  let e = builder.nonterminal("E");
  builder.rule(s, vec![e.into()]);
  builder
    .rule(e, vec![e.into(), plus.into(), e.into()])
    .prec(0)
    .assoc(Assoc::Left)
    .action(|reduction| Ok(reduction.into_values().join(" ")));
  builder.rule(e, vec![id.into()]);
  let parser = slr::build(builder.build(s)).unwrap();

  let err = parser
    .parse(vec![(id, "id".to_owned()), (id, "id".to_owned())])
    .unwrap_err();
  assert_eq!(
    err,
    ParseError::UnexpectedToken {
      terminal: "id".to_owned(),
      at: 1,
    }
  );

  let err = parser
    .parse(vec![(id, "id".to_owned()), (plus, "+".to_owned())])
    .unwrap_err();
  assert_eq!(err, ParseError::UnexpectedEof);
}

#[test]
fn recognize_checks_without_building_values() {
  let mut builder = GrammarBuilder::<String>::new();
  let id = builder.terminal("id");
  let plus = builder.terminal("plus");
  let s = builder.nonterminal("S");
  let e = builder.nonterminal("E");
  builder.rule(s, vec![e.into()]);
  builder
    .rule(e, vec![e.into(), plus.into(), e.into()])
    .prec(0)
    .assoc(Assoc::Left);
  builder.rule(e, vec![id.into()]);
  let parser = slr::build(builder.build(s)).unwrap();

  assert!(parser.recognize(vec![id]));
  assert!(parser.recognize(vec![id, plus, id]));
  assert!(parser.recognize(vec![id, plus, id, plus, id]));
  assert!(!parser.recognize(vec![plus]));
  assert!(!parser.recognize(vec![id, plus]));
  assert!(!parser.recognize(vec![]));
}

#[test]
fn params_reach_actions() {
  let scale: Param<i64> = Param::new();

  let mut builder = GrammarBuilder::<i64>::new();
  let num = builder.terminal("num");
  let s = builder.nonterminal("S");
  let e = builder.nonterminal("E");
  builder.rule(s, vec![e.into()]);
  builder.rule(e, vec![num.into()]).action(move |reduction| {
    let factor = reduction.params.get(scale).copied().unwrap_or(1);
    Ok(reduction.children[0].value * factor)
  });
  let parser = slr::build(builder.build(s)).unwrap();

  let mut params = Params::new();
  params.set(scale, 2);
  let out = parser.parse_with_params(vec![(num, 21)], &params).unwrap();
  assert_eq!(out.value, 42);

  let out = parser.parse(vec![(num, 21)]).unwrap();
  assert_eq!(out.value, 21);
}

#[test]
fn action_failure_aborts_the_parse() {
  let mut builder = GrammarBuilder::<i64>::new();
  let num = builder.terminal("num");
  let s = builder.nonterminal("S");
  let e = builder.nonterminal("E");
  builder.rule(s, vec![e.into()]);
  builder
    .rule(e, vec![num.into()])
    .action(|_| Err(SemanticError::new("boom")));
  let parser = slr::build(builder.build(s)).unwrap();

  let err = parser.parse(vec![(num, 1)]).unwrap_err();
  assert_eq!(err, ParseError::Action(SemanticError::new("boom")));
}

#[test]
fn handler_provider_swaps_per_call() {
  let mut builder = GrammarBuilder::<i64>::new();
  let num = builder.terminal("num");
  let plus = builder.terminal("plus");
  let s = builder.nonterminal("S");
  let e = builder.nonterminal("E");
  builder.rule(s, vec![e.into()]);
  builder
    .rule(e, vec![e.into(), plus.into(), e.into()])
    .prec(0)
    .assoc(Assoc::Left)
    .action(|mut reduction| {
      let right = reduction.children.pop().unwrap().value;
      reduction.children.pop();
      let left = reduction.children.pop().unwrap().value;
      Ok(left + right)
    });
  builder.rule(e, vec![num.into()]);
  let parser = slr::build(builder.build(s)).unwrap();

  let tokens = vec![(num, 2), (plus, 0), (num, 3)];

  let out = parser.parse(tokens.clone()).unwrap();
  assert_eq!(out.value, 5);

  // Same table, different semantics: multiply instead of add.
  let out = parser
    .parse_with_handlers(tokens, &Params::new(), |_, mut reduction| {
      if reduction.children.len() == 3 {
        let right = reduction.children.pop().unwrap().value;
        reduction.children.pop();
        let left = reduction.children.pop().unwrap().value;
        Ok(left * right)
      } else {
        Ok(reduction.children.pop().map(|child| child.value).unwrap_or(0))
      }
    })
    .unwrap();
  assert_eq!(out.value, 6);
}

#[test]
fn missing_action_on_wide_rule_is_an_error() {
  let mut builder = GrammarBuilder::<i64>::new();
  let num = builder.terminal("num");
  let s = builder.nonterminal("S");
  let e = builder.nonterminal("E");
  builder.rule(s, vec![e.into()]);
  builder.rule(e, vec![num.into(), num.into()]);
  let parser = slr::build(builder.build(s)).unwrap();

  let err = parser.parse(vec![(num, 1), (num, 2)]).unwrap_err();
  match err {
    ParseError::Action(semantic) => {
      assert!(semantic.to_string().contains("no semantic action"));
    }
    other => panic!("expected an action error, got {:?}", other),
  }
}

#[test]
fn table_is_shareable() {
  fn assert_shareable<T: Send + Sync + Clone>() {}
  assert_shareable::<slr::ParseTable>();
}
