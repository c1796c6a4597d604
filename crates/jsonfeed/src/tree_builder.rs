//! Assembles tokens into document trees.
//!
//! Open containers live in an arena of nodes addressed by index, and the
//! stack holds the indices of the containers from the root to the innermost
//! one. Every token touches only the top of the stack, so the cost per token
//! does not grow with nesting depth. The builder owns the whole partial tree
//! and can be suspended between any two tokens for as long as the caller
//! likes.
//!
//! A container is linked into its parent as soon as its start token arrives:
//! the parent records a [`Slot::Node`] pointing into the arena. An end token
//! therefore only pops the stack. Popping the root turns the arena into the
//! finished [`Value`].

use indexmap::IndexMap;

use crate::{error::StructuralError, token::Token, value::Value};

/// A member of an open container.
#[derive(Debug, Clone)]
enum Slot {
    Leaf(Value),
    /// Index of a container node in the arena.
    Node(usize),
}

#[derive(Debug, Clone)]
enum Node {
    Object(IndexMap<String, Slot>),
    Array(Vec<Slot>),
}

#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    /// Every container of the document under construction, in the order they
    /// started. Empty between documents.
    nodes: Vec<Node>,
    /// Arena indices of the open containers, innermost last.
    stack: Vec<usize>,
    /// Name of the next object member.
    ///
    /// A single slot is enough: a field name is always followed by exactly
    /// one value, and a container value consumes the name when it starts,
    /// before any of its own members are named.
    pending_field: Option<String>,
    max_depth: Option<usize>,
}

impl TreeBuilder {
    pub(crate) fn new(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Number of open containers.
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Applies one token. Returns the document when `token` closed its root.
    pub(crate) fn apply(&mut self, token: Token) -> Result<Option<Value>, StructuralError> {
        let kind = token.kind();
        match token {
            Token::FieldName(name) => self.name_field(name, kind),
            Token::StartObject => self.open(Node::Object(IndexMap::new()), kind),
            Token::StartArray => self.open(Node::Array(Vec::new()), kind),
            Token::EndObject => self.close(|node| matches!(node, Node::Object(_)), kind),
            Token::EndArray => self.close(|node| matches!(node, Node::Array(_)), kind),
            Token::String(s) => self.push_scalar(Value::String(s), kind),
            Token::Integer(n) => self.push_scalar(Value::Integer(n), kind),
            Token::Float(n) => self.push_scalar(Value::Float(n), kind),
            Token::True => self.push_scalar(Value::Boolean(true), kind),
            Token::False => self.push_scalar(Value::Boolean(false), kind),
            Token::Null => self.push_scalar(Value::Null, kind),
            Token::NotAvailable => Err(StructuralError::UnrecognizedToken(kind)),
        }
    }

    fn name_field(&mut self, name: String, kind: &'static str) -> Result<Option<Value>, StructuralError> {
        let &top = self.stack.last().ok_or(StructuralError::EmptyStack(kind))?;
        if self.pending_field.is_some() || !matches!(self.nodes[top], Node::Object(_)) {
            return Err(StructuralError::UnexpectedFieldName(name));
        }
        self.pending_field = Some(name);
        Ok(None)
    }

    fn open(&mut self, node: Node, kind: &'static str) -> Result<Option<Value>, StructuralError> {
        if let Some(max) = self.max_depth {
            if self.depth() >= max {
                return Err(StructuralError::DepthLimitExceeded(max));
            }
        }

        let index = self.nodes.len();
        if !self.stack.is_empty() {
            self.attach(Slot::Node(index), kind)?;
        }
        self.nodes.push(node);
        self.stack.push(index);
        Ok(None)
    }

    fn close(
        &mut self,
        matches: fn(&Node) -> bool,
        kind: &'static str,
    ) -> Result<Option<Value>, StructuralError> {
        let &top = self.stack.last().ok_or(StructuralError::EmptyStack(kind))?;
        if !matches(&self.nodes[top]) {
            return Err(StructuralError::MismatchedEnd(kind));
        }

        self.stack.pop();
        if self.stack.is_empty() {
            Ok(assemble(self.nodes.drain(..)))
        } else {
            Ok(None)
        }
    }

    fn push_scalar(&mut self, value: Value, kind: &'static str) -> Result<Option<Value>, StructuralError> {
        self.attach(Slot::Leaf(value), kind)?;
        Ok(None)
    }

    /// Links `slot` into the innermost container.
    fn attach(&mut self, slot: Slot, kind: &'static str) -> Result<(), StructuralError> {
        let &top = self.stack.last().ok_or(StructuralError::EmptyStack(kind))?;
        match &mut self.nodes[top] {
            Node::Object(map) => {
                let name = self
                    .pending_field
                    .take()
                    .ok_or(StructuralError::MissingFieldName)?;
                // A repeated name keeps its original position.
                map.insert(name, slot);
            }
            Node::Array(items) => items.push(slot),
        }
        Ok(())
    }

    #[cfg(test)]
    fn partial(&self) -> Option<Value> {
        assemble(self.nodes.iter().cloned())
    }
}

/// Folds arena nodes, listed in start order, into the tree rooted at the
/// first one.
///
/// A child always starts after its parent, so walking the nodes backwards
/// meets every child before the container that holds it.
fn assemble<I>(nodes: I) -> Option<Value>
where
    I: DoubleEndedIterator<Item = Node> + ExactSizeIterator,
{
    let mut built: Vec<Option<Value>> = Vec::new();
    built.resize_with(nodes.len(), || None);

    for (index, node) in nodes.enumerate().rev() {
        let value = match node {
            Node::Object(members) => Value::Object(
                members
                    .into_iter()
                    .map(|(name, slot)| (name, resolve(slot, &mut built)))
                    .collect(),
            ),
            Node::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|slot| resolve(slot, &mut built))
                    .collect(),
            ),
        };
        built[index] = Some(value);
    }
    built.first_mut().and_then(Option::take)
}

fn resolve(slot: Slot, built: &mut [Option<Value>]) -> Value {
    match slot {
        Slot::Leaf(value) => value,
        Slot::Node(index) => built[index].take().unwrap_or_default(),
    }
}
