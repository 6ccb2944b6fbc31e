//! One persistent interpreter session: a rhai engine, a shared scope, and
//! the function definitions accumulated across evaluations.
//!
//! Variables persist between submissions through the scope itself; function
//! definitions persist by folding every evaluated unit's functions into a
//! session-wide AST that is merged back in on each evaluation. Together
//! they give the REPL environment where `fn f(x) { 1000 * x }` stays
//! callable from every later submission.

use rhai::{Dynamic, Engine, Scope, AST};

/// Reserved scope slot used to ask the interpreter for a value's own
/// textual representation. Must be a plain identifier: rhai refuses to
/// compile references to names with leading double underscores. Pushed for
/// the duration of the representation call and rewound immediately after,
/// so a user binding of the same name is shadowed for one expression and
/// untouched afterwards.
const REPR_SLOT: &str = "scrawl_repr_subject";

/// Representation expression evaluated against [`REPR_SLOT`]. `to_debug`
/// is the interpreter's canonical human-readable rendering, so strings
/// come back quoted and nested structures use the language's own notation.
const REPR_EXPR: &str = "to_debug(scrawl_repr_subject)";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The interpreter rejected or failed to run the snippet. Carries the
    /// interpreter's own human-readable message.
    #[error("{0}")]
    Eval(String),
}

/// A stateful evaluator with one scope for its whole lifetime.
pub struct Session {
    engine: Engine,
    scope: Scope<'static>,
    definitions: AST,
}

impl Session {
    pub fn new() -> Self {
        Session {
            engine: Engine::new(),
            scope: Scope::new(),
            definitions: AST::empty(),
        }
    }

    /// Evaluate one snippet in the shared scope.
    ///
    /// Returns `Ok(Some(text))` with the interpreter's rendering of the
    /// result value, `Ok(None)` when the snippet produced the unit value,
    /// and the interpreter's message on any parse or runtime failure.
    pub fn eval(&mut self, code: &str) -> Result<Option<String>, SessionError> {
        let unit = self
            .engine
            .compile(code)
            .map_err(|e| SessionError::Eval(e.to_string()))?;

        let combined = self.definitions.merge(&unit);
        let value = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut self.scope, &combined)
            .map_err(|e| SessionError::Eval(e.to_string()))?;
        self.definitions += unit.clone_functions_only();

        if value.is_unit() {
            return Ok(None);
        }
        self.repr(value).map(Some)
    }

    /// Ask the interpreter for its own rendering of `value` by binding it
    /// to a reserved name and evaluating a representation expression
    /// against it. The host never formats interpreter values directly.
    fn repr(&mut self, value: Dynamic) -> Result<String, SessionError> {
        let mark = self.scope.len();
        self.scope.push(REPR_SLOT, value);
        let rendered = self
            .engine
            .eval_with_scope::<String>(&mut self.scope, REPR_EXPR)
            .map_err(|e| SessionError::Eval(e.to_string()));
        self.scope.rewind(mark);
        rendered
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}
