//! Tree-structured representation of a license template.
//!
//! Instructions live in an arena and refer to each other by
//! [`InstructionId`]. Only [`TreeBuilder`] can add to the arena; once
//! [`TreeBuilder::finish`] has run the tree is read-only.

use itertools::Itertools;

use crate::rule::VariableRule;

/// Stable index of an instruction in its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstructionId(usize);

/// What a template element asks of the text.
#[derive(Debug)]
pub enum InstructionKind {
    /// Text that must appear (modulo normalization and skippable tokens).
    Literal(String),
    /// A placeholder whose text must satisfy the rule's pattern.
    Variable(VariableRule),
    /// A region that may be present or absent; its content is the children.
    Optional,
}

#[derive(Debug)]
pub struct Instruction {
    pub kind: InstructionKind,
    parent: Option<InstructionId>,
    children: Vec<InstructionId>,
}

impl Instruction {
    fn new(kind: InstructionKind, parent: Option<InstructionId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
        }
    }

    pub fn literal_text(&self) -> Option<&str> {
        match &self.kind {
            InstructionKind::Literal(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.kind, InstructionKind::Optional)
    }

    pub fn children(&self) -> &[InstructionId] {
        &self.children
    }
}

/// A frozen template: instructions in document order.
#[derive(Debug, Default)]
pub struct InstructionTree {
    nodes: Vec<Instruction>,
    roots: Vec<InstructionId>,
}

impl InstructionTree {
    pub fn get(&self, id: InstructionId) -> &Instruction {
        &self.nodes[id.0]
    }

    /// Top-level instructions in document order.
    pub fn roots(&self) -> &[InstructionId] {
        &self.roots
    }

    pub fn children(&self, id: InstructionId) -> impl Iterator<Item = &Instruction> {
        self.get(id).children.iter().map(|&c| self.get(c))
    }

    /// Total number of instructions at any depth.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if every child of `id` is literal text.
    ///
    /// A block with no children is vacuously literal-only.
    pub fn is_literal_only(&self, id: InstructionId) -> bool {
        self.children(id).all(|c| c.literal_text().is_some())
    }

    /// Concatenated text of the literal children of `id`.
    pub fn joined_text(&self, id: InstructionId) -> String {
        self.children(id).filter_map(Instruction::literal_text).join("")
    }
}

/// Accumulates template events into an [`InstructionTree`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: InstructionTree,
    /// Open optional block receiving new instructions, if any.
    current: Option<InstructionId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: InstructionKind) -> InstructionId {
        let id = InstructionId(self.tree.nodes.len());
        self.tree.nodes.push(Instruction::new(kind, self.current));
        match self.current {
            Some(parent) => self.tree.nodes[parent.0].children.push(id),
            None => self.tree.roots.push(id),
        }
        id
    }

    pub fn literal(&mut self, text: &str) -> InstructionId {
        self.push(InstructionKind::Literal(text.to_string()))
    }

    pub fn variable(&mut self, rule: VariableRule) -> InstructionId {
        self.push(InstructionKind::Variable(rule))
    }

    pub fn begin_optional(&mut self) -> InstructionId {
        let id = self.push(InstructionKind::Optional);
        self.current = Some(id);
        id
    }

    /// Close the innermost open optional block. Ignored when none is open.
    pub fn end_optional(&mut self) {
        if let Some(id) = self.current {
            self.current = self.tree.get(id).parent;
        }
    }

    /// Depth of currently open optional blocks.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = self.current;
        while let Some(id) = cur {
            depth += 1;
            cur = self.tree.get(id).parent;
        }
        depth
    }

    /// Freeze the tree. Blocks still open are closed implicitly.
    pub fn finish(self) -> InstructionTree {
        if self.current.is_some() {
            tracing::debug!(
                open = self.depth(),
                "finishing template with unclosed optional blocks"
            );
        }
        self.tree
    }
}
