//! Runtime values for Blanket

use std::fmt;
use std::rc::Rc;

use crate::context::Context;
use crate::token::Span;

/// The single runtime value type: a number, plus where it came from
#[derive(Clone)]
pub struct Value {
    pub number: f64,

    /// Span of the node that produced this value
    pub span: Option<Span>,

    /// Context the value was produced in, used to attribute errors raised
    /// by later operations on it
    pub context: Option<Rc<Context>>,
}

impl Value {
    pub fn new(number: f64) -> Self {
        Self {
            number,
            span: None,
            context: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, context: &Rc<Context>) -> Self {
        self.context = Some(Rc::clone(context));
        self
    }

    /// A copy with no span or context, suitable for storing in a symbol table
    pub fn detached(&self) -> Self {
        Self::new(self.number)
    }

    pub fn is_truthy(&self) -> bool {
        self.number != 0.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // -0 prints as 0
        if self.number == 0.0 {
            write!(f, "0")
        } else {
            write!(f, "{}", self.number)
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_drops_integral_fraction() {
        assert_eq!(Value::new(7.0).to_string(), "7");
        assert_eq!(Value::new(2.5).to_string(), "2.5");
        assert_eq!(Value::new(-0.25).to_string(), "-0.25");
        assert_eq!(Value::new(-0.0).to_string(), "0");
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::new(-1.0).is_truthy());
        assert!(Value::new(0.5).is_truthy());
        assert!(!Value::new(0.0).is_truthy());
    }

    #[test]
    fn test_detached_drops_origin() {
        let context = Context::root("<program>");
        let value = Value::new(3.0).with_span(Span::default()).with_context(&context);
        let stored = value.detached();
        assert!(stored.span.is_none());
        assert!(stored.context.is_none());
        assert_eq!(stored, value);
    }
}
