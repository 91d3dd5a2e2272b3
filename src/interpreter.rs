//! Tree-walking interpreter for Blanket
//!
//! Evaluates an [`Expr`] against an execution [`Context`]. Evaluation yields
//! `Ok(Some(value))`, or `Ok(None)` for a conditional where no branch ran.
//!
//! Operator chains such as `1 + 2 + 3` parse into left-leaning trees. Their
//! left spine is walked in a loop, so only real nesting (parentheses,
//! prefix operators, right operands, conditionals) counts towards the
//! recursion limit.

use std::rc::Rc;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::context::Context;
use crate::error::{BlanketError, ErrorKind, Result};
use crate::token::Span;
use crate::value::Value;

/// Maximum recursion depth while evaluating. Fits a 2 MiB thread stack in
/// unoptimized builds.
pub const DEFAULT_EVAL_DEPTH: usize = 128;

/// Walks expressions, tracking recursion depth
#[derive(Debug)]
pub struct Interpreter {
    depth: usize,
    max_depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_EVAL_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { depth: 0, max_depth }
    }

    /// Evaluate `expr` in `context`
    pub fn evaluate(&mut self, expr: &Expr, context: &Rc<Context>) -> Result<Option<Value>> {
        if self.depth >= self.max_depth {
            return Err(runtime_error(
                ErrorKind::EvaluationTooDeep(self.max_depth),
                expr.span(),
                context,
            ));
        }

        self.depth += 1;
        let result = self.visit(expr, context);
        self.depth -= 1;
        result
    }

    fn visit(&mut self, expr: &Expr, context: &Rc<Context>) -> Result<Option<Value>> {
        match expr {
            Expr::Number { value, span } => {
                Ok(Some(Value::new(*value).with_span(*span).with_context(context)))
            }

            Expr::Variable { name, span } => {
                let value = context.lookup(name).ok_or_else(|| {
                    runtime_error(ErrorKind::UndefinedVariable(name.clone()), *span, context)
                })?;
                Ok(Some(value.with_span(*span).with_context(context)))
            }

            Expr::Assign { name, value, span } => {
                let value = self.value_of(value, context)?;
                context.assign(name, &value);
                Ok(Some(value.with_span(*span)))
            }

            Expr::Unary { op, operand, span } => {
                let operand = self.value_of(operand, context)?;
                let number = match op {
                    UnaryOp::Plus => operand.number,
                    UnaryOp::Neg => operand.number * -1.0,
                    UnaryOp::Not => bool_number(!operand.is_truthy()),
                };
                Ok(Some(Value::new(number).with_span(*span).with_context(context)))
            }

            Expr::Binary { .. } => self.chain(expr, context).map(Some),

            Expr::Conditional { cases, else_branch, .. } => {
                for (condition, result) in cases {
                    if self.value_of(condition, context)?.is_truthy() {
                        return self.evaluate(result, context);
                    }
                }

                match else_branch {
                    Some(branch) => self.evaluate(branch, context),
                    None => Ok(None),
                }
            }
        }
    }

    /// Evaluate a run of binary operations down the left spine of `expr`,
    /// innermost (leftmost) first
    fn chain(&mut self, expr: &Expr, context: &Rc<Context>) -> Result<Value> {
        let mut links = Vec::new();
        let mut first = expr;
        while let Expr::Binary { left, op, right, span } = first {
            links.push((*op, right.as_ref(), *span));
            first = left;
        }

        let mut lhs = self.value_of(first, context)?;
        for (op, right, span) in links.into_iter().rev() {
            let rhs = self.value_of(right, context)?;
            let number = binary(op, &lhs, &rhs, right.span(), context)?;
            lhs = Value::new(number).with_span(span).with_context(context);
        }

        Ok(lhs)
    }

    /// Evaluate a sub-expression that has to produce a number
    fn value_of(&mut self, expr: &Expr, context: &Rc<Context>) -> Result<Value> {
        self.evaluate(expr, context)?
            .ok_or_else(|| runtime_error(ErrorKind::NoValue, expr.span(), context))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn binary(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    rhs_span: Span,
    context: &Rc<Context>,
) -> Result<f64> {
    let (a, b) = (lhs.number, rhs.number);

    let number = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                let origin = lhs.context.as_ref().unwrap_or(context);
                let span = rhs.span.unwrap_or(rhs_span);
                return Err(runtime_error(ErrorKind::DivisionByZero, span, origin));
            }
            a / b
        }
        BinaryOp::Pow => a.powf(b),
        BinaryOp::Eq => bool_number(a == b),
        BinaryOp::Ne => bool_number(a != b),
        BinaryOp::Lt => bool_number(a < b),
        BinaryOp::Le => bool_number(a <= b),
        BinaryOp::Gt => bool_number(a > b),
        BinaryOp::Ge => bool_number(a >= b),
        BinaryOp::And => bool_number(lhs.is_truthy() && rhs.is_truthy()),
        // by value, not normalized to 0/1
        BinaryOp::Or => {
            if lhs.is_truthy() {
                a
            } else {
                b
            }
        }
    };

    Ok(number)
}

fn bool_number(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn runtime_error(kind: ErrorKind, span: Span, context: &Context) -> BlanketError {
    BlanketError::runtime(kind, span, context.traceback(span.start))
}
