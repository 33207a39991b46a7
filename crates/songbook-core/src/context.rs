use tracing::Span;
use uuid::Uuid;

/// Per-call observability handle.
///
/// Front ends create one per request and pass it into every service call;
/// all events the core emits for that request are recorded inside its span,
/// which carries a fresh `request_id`.
#[derive(Debug, Clone)]
pub struct OpContext {
  span: Span,
}

impl OpContext {
  pub fn new(operation: &'static str) -> Self {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("catalog", op = operation, request_id = %request_id);
    Self { span }
  }

  pub fn span(&self) -> &Span {
    &self.span
  }
}
