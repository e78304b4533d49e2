use crate::params::Params;
use crate::span::{Span, Spanned};

/// Everything a semantic action sees when the engine reduces by its rule.
pub struct Reduction<'p, V> {
  /// Child values in rule order, each with the input range it covers.
  pub children: Vec<Spanned<V>>,
  /// The merged range of all children; empty at the current position for an
  /// epsilon rule.
  pub span: Span,
  /// Caller-supplied parameters of this parse call.
  pub params: &'p Params,
}

impl<'p, V> Reduction<'p, V> {
  /// The child values without their spans.
  pub fn into_values(self) -> Vec<V> {
    self.children.into_iter().map(|child| child.value).collect()
  }
}

pub type SemanticAction<V> =
  Box<dyn for<'p> Fn(Reduction<'p, V>) -> Result<V, SemanticError>>;

/// Failure signalled by a semantic action. The engine aborts the parse and
/// forwards it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct SemanticError(String);

impl SemanticError {
  pub fn new(message: impl Into<String>) -> Self {
    SemanticError(message.into())
  }
}
