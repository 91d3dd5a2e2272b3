//! Symbol tables and execution contexts for Blanket
//!
//! A [`SymbolTable`] maps names to values and falls back to its parent on a
//! miss. A [`Context`] is a logical call frame: it owns a table, knows which
//! context it was entered from, and is walked to build runtime tracebacks.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Frame;
use crate::token::Position;
use crate::value::Value;

/// Variable storage with parent-chain lookup
#[derive(Debug, Default)]
pub struct SymbolTable {
    values: HashMap<String, Value>,
    parent: Option<Rc<RefCell<SymbolTable>>>,
}

impl SymbolTable {
    /// Create a table with no parent
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a child table that falls back to `parent`
    pub fn with_parent(parent: Rc<RefCell<SymbolTable>>) -> Self {
        Self {
            values: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Look a name up here, then along the parent chain
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            Some(value.clone())
        } else if let Some(parent) = &self.parent {
            parent.borrow().get(name)
        } else {
            None
        }
    }

    /// Bind a name in this table only; an existing local binding is replaced
    pub fn set(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }
}

/// A logical call frame
#[derive(Debug)]
pub struct Context {
    pub label: String,
    pub parent: Option<Rc<Context>>,
    /// Where in the parent this context was entered
    pub entry: Option<Position>,
    pub symbols: Rc<RefCell<SymbolTable>>,
}

impl Context {
    /// Create a top-level context with an empty table
    pub fn root(label: &str) -> Rc<Self> {
        Rc::new(Self {
            label: label.to_string(),
            parent: None,
            entry: None,
            symbols: Rc::new(RefCell::new(SymbolTable::new())),
        })
    }

    /// Create a context entered from `parent` at `entry`. Its table falls
    /// back to the parent's.
    pub fn child(parent: &Rc<Context>, label: &str, entry: Position) -> Rc<Self> {
        let symbols = SymbolTable::with_parent(Rc::clone(&parent.symbols));
        Rc::new(Self {
            label: label.to_string(),
            parent: Some(Rc::clone(parent)),
            entry: Some(entry),
            symbols: Rc::new(RefCell::new(symbols)),
        })
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.symbols.borrow().get(name)
    }

    /// Bind `name` in this context's own table
    pub fn assign(&self, name: &str, value: &Value) {
        // stored values drop their context so a table never points back at
        // the context that owns it
        self.symbols.borrow_mut().set(name.to_string(), value.detached());
    }

    /// Frames from the outermost context down to this one. `position` is
    /// where execution currently is inside `self`.
    pub fn traceback(&self, position: Position) -> Vec<Frame> {
        let mut frames = Vec::new();
        let mut position = Some(position);
        let mut context = Some(self);

        while let Some(ctx) = context {
            frames.push(Frame {
                label: ctx.label.clone(),
                position,
            });
            position = ctx.entry;
            context = ctx.parent.as_deref();
        }

        frames.reverse();
        frames
    }
}
