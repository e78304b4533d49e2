//! The shift-reduce runtime engine.
//!
//! `run` drives a `ParseTable` over a lexeme list with an explicit frame
//! stack. It owns no shared state: one table can serve any number of
//! concurrent calls.

use grammar::{Grammar, Params, Reduction, RuleId, SemanticError, Span, Spanned, TerminalId};

use crate::{Action, ParseTable};

/// Parse failure. An ordinary result value, never a panic: interactive
/// callers treat invalid-so-far input as a normal state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
  #[error("unexpected token {terminal} at {at}")]
  UnexpectedToken { terminal: String, at: usize },
  #[error("unexpected end of input")]
  UnexpectedEof,
  #[error(transparent)]
  Action(#[from] SemanticError),
}

struct StackEntry<V> {
  /// The state the machine was in when this entry was pushed.
  state: u32,
  span: Span,
  value: V,
}

/// Drives `table` over `input`, dispatching every reduce through
/// `reduce_fn`. The dispatcher is keyed by rule, so alternate semantic
/// actions can run over one table without rebuilding it.
pub fn run<V, I, F>(
  table: &ParseTable,
  input: I,
  params: &Params,
  mut reduce_fn: F,
) -> Result<Spanned<V>, ParseError>
where
  I: IntoIterator<Item = (TerminalId, V)>,
  F: FnMut(RuleId, Reduction<'_, V>) -> Result<V, SemanticError>,
{
  let mut stack: Vec<StackEntry<V>> = vec![];
  let mut state = table.start_state();
  let mut input = input.into_iter();
  let mut lookahead = input.next();
  let mut pos = 0;

  loop {
    let terminal = lookahead
      .as_ref()
      .map(|(term, _)| term.index())
      .unwrap_or_else(|| table.eof_index());

    match table.action_at(state, terminal) {
      Action::Shift(to_state) => {
        let value = match lookahead.take() {
          Some((_, value)) => value,
          None => return Err(ParseError::UnexpectedEof),
        };
        stack.push(StackEntry {
          state,
          span: Span::new(pos, pos + 1),
          value,
        });
        state = to_state;
        lookahead = input.next();
        pos += 1;
      }
      Action::Reduce(rule) => {
        let (rhs_len, nt) = table.prod(rule);
        let state0 = if rhs_len == 0 {
          state
        } else {
          stack[stack.len() - rhs_len].state
        };

        let children: Vec<Spanned<V>> = stack
          .drain(stack.len() - rhs_len..)
          .map(|entry| Spanned::new(entry.value, entry.span))
          .collect();
        let span = children
          .iter()
          .map(|child| child.span)
          .fold(None, |merged: Option<Span>, span| match merged {
            Some(merged) => Some(merged.merge(span)),
            None => Some(span),
          })
          .unwrap_or_else(|| Span::empty(pos));

        let value = reduce_fn(
          rule,
          Reduction {
            children,
            span,
            params,
          },
        )?;

        state = match table.goto_at(state0, nt as usize) {
          Some(to_state) => to_state,
          None => return Err(unexpected(&lookahead, table, terminal, pos)),
        };
        stack.push(StackEntry {
          state: state0,
          span,
          value,
        });
      }
      Action::Accept => {
        let entry = stack.pop().unwrap();
        return Ok(Spanned::new(entry.value, entry.span));
      }
      Action::Error => {
        return Err(unexpected(&lookahead, table, terminal, pos));
      }
    }
  }
}

fn unexpected<V>(
  lookahead: &Option<(TerminalId, V)>,
  table: &ParseTable,
  terminal: usize,
  at: usize,
) -> ParseError {
  match lookahead {
    Some(_) => ParseError::UnexpectedToken {
      terminal: table.terminal_name(terminal).to_owned(),
      at,
    },
    None => ParseError::UnexpectedEof,
  }
}

/// A constructed parser: the immutable runtime table plus the grammar whose
/// rules carry the semantic actions.
pub struct Parser<V> {
  grammar: Grammar<V>,
  table: ParseTable,
}

impl<V> Parser<V> {
  pub(crate) fn new(grammar: Grammar<V>, table: ParseTable) -> Self {
    Parser { grammar, table }
  }

  pub fn grammar(&self) -> &Grammar<V> {
    &self.grammar
  }

  pub fn table(&self) -> &ParseTable {
    &self.table
  }

  /// Parses a list of (terminal, token value) lexemes with the grammar's
  /// own semantic actions and no parameters.
  pub fn parse<I>(&self, input: I) -> Result<Spanned<V>, ParseError>
  where
    I: IntoIterator<Item = (TerminalId, V)>,
  {
    self.parse_with_params(input, &Params::new())
  }

  pub fn parse_with_params<I>(
    &self,
    input: I,
    params: &Params,
  ) -> Result<Spanned<V>, ParseError>
  where
    I: IntoIterator<Item = (TerminalId, V)>,
  {
    run(&self.table, input, params, |rule, reduction| {
      match &self.grammar.rule(rule).action {
        Some(action) => action(reduction),
        None => default_action(&self.grammar, rule, reduction),
      }
    })
  }

  /// Parses with a caller-supplied dispatcher instead of the grammar's
  /// actions.
  pub fn parse_with_handlers<I, F>(
    &self,
    input: I,
    params: &Params,
    reduce_fn: F,
  ) -> Result<Spanned<V>, ParseError>
  where
    I: IntoIterator<Item = (TerminalId, V)>,
    F: FnMut(RuleId, Reduction<'_, V>) -> Result<V, SemanticError>,
  {
    run(&self.table, input, params, reduce_fn)
  }

  /// Checks whether a terminal sequence parses, without building any
  /// values.
  pub fn recognize<I>(&self, terminals: I) -> bool
  where
    I: IntoIterator<Item = TerminalId>,
  {
    let params = Params::new();
    run(
      &self.table,
      terminals.into_iter().map(|term| (term, ())),
      &params,
      |_, _| Ok(()),
    )
    .is_ok()
  }
}

/// A rule without an action passes its sole child through; any other arity
/// is a missing action.
fn default_action<V>(
  grammar: &Grammar<V>,
  rule: RuleId,
  mut reduction: Reduction<'_, V>,
) -> Result<V, SemanticError> {
  if reduction.children.len() == 1 {
    Ok(reduction.children.pop().unwrap().value)
  } else {
    Err(SemanticError::new(format!(
      "no semantic action for rule {}",
      grammar.rule(rule).to_string(grammar)
    )))
  }
}
