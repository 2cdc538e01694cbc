//! Tree traversal utilities for the SQL AST.
//!
//! Nodes own their children exclusively through `Box`/`Vec`, so there are no
//! parent pointers inside the tree. Upward navigation goes through
//! [`TreeContext`], a side table built on demand that maps each expression
//! (by pre-order [`NodeId`]) to its parent, or through [`find_parent`] /
//! [`find_ancestor`], which locate a node by pointer identity.
//!
//! # Traversal
//!
//! - [`DfsIter`] -- pre-order, stack based. `a + b` yields `Binary`, `a`, `b`.
//! - [`BfsIter`] -- level order, queue based.
//!
//! Both come from the [`ExpressionWalk`] extension trait, together with
//! `find`, `find_all`, `contains`, `count`, `children` and `tree_depth`.
//!
//! Only fields typed `Expression` are children. Helper structs that are not
//! themselves expressions (select items, order items, `OVER`, `GROUP BY`, ...)
//! are flattened: their expression fields become children of the enclosing
//! expression, keyed by a path like `"group_by.having"`.

use crate::expressions::*;
use std::collections::{HashMap, VecDeque};

/// Pre-order index of an expression inside a [`TreeContext`]
pub type NodeId = usize;

/// Where a node sits relative to its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentInfo {
    /// Parent node, `None` for the root
    pub parent_id: Option<NodeId>,
    /// Field of the parent holding this node
    pub arg_key: &'static str,
    /// Position when the field is a list
    pub index: Option<usize>,
}

/// Parent side table for one expression tree.
///
/// Ids are assigned in the same pre-order as [`ExpressionWalk::dfs`], so the
/// n-th node yielded by `dfs()` has id `n`.
#[derive(Debug, Default)]
pub struct TreeContext {
    nodes: HashMap<NodeId, ParentInfo>,
    next_id: NodeId,
}

impl TreeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the context for the tree rooted at `root`
    pub fn build(root: &Expression) -> Self {
        let mut ctx = Self::new();
        ctx.visit(root, None, "", None);
        ctx
    }

    fn visit(
        &mut self,
        expr: &Expression,
        parent_id: Option<NodeId>,
        arg_key: &'static str,
        index: Option<usize>,
    ) {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            ParentInfo {
                parent_id,
                arg_key,
                index,
            },
        );

        for child in iter_children(expr) {
            self.visit(child.expr, Some(id), child.key, child.index);
        }
    }

    /// Number of nodes recorded
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&ParentInfo> {
        self.nodes.get(&id)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|info| info.parent_id)
    }

    /// Depth of a node, 0 for the root
    pub fn depth_of(&self, id: NodeId) -> usize {
        self.ancestors_of(id).len()
    }

    /// Parent, grandparent, ... up to the root
    pub fn ancestors_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = id;
        while let Some(parent_id) = self.parent_of(current) {
            ancestors.push(parent_id);
            current = parent_id;
        }
        ancestors
    }
}

/// A direct child of an expression
#[derive(Debug, Clone, Copy)]
pub struct Child<'a> {
    pub key: &'static str,
    pub index: Option<usize>,
    pub expr: &'a Expression,
}

struct Children<'a> {
    out: Vec<Child<'a>>,
}

impl<'a> Children<'a> {
    fn one(&mut self, key: &'static str, expr: &'a Expression) {
        self.out.push(Child {
            key,
            index: None,
            expr,
        });
    }

    fn opt(&mut self, key: &'static str, expr: &'a Option<Expression>) {
        if let Some(expr) = expr {
            self.one(key, expr);
        }
    }

    fn list(&mut self, key: &'static str, exprs: &'a [Expression]) {
        for (i, expr) in exprs.iter().enumerate() {
            self.out.push(Child {
                key,
                index: Some(i),
                expr,
            });
        }
    }

    fn hints(&mut self, key: &'static str, hints: &'a [Hint]) {
        for (i, hint) in hints.iter().enumerate() {
            self.out.push(Child {
                key,
                index: Some(i),
                expr: &hint.body,
            });
        }
    }

    fn order_by(&mut self, key: &'static str, order_by: &'a OrderBy) {
        for (i, item) in order_by.items.iter().enumerate() {
            self.out.push(Child {
                key,
                index: Some(i),
                expr: &item.expr,
            });
        }
    }

    fn function(&mut self, f: &'a FunctionCall) {
        self.list("arguments", &f.arguments);
        if let Some(within_group) = &f.within_group {
            self.order_by("within_group", &within_group.order_by);
        }
        if let Some(over) = &f.over {
            if let Some(partition_by) = &over.partition_by {
                self.list("over.partition_by", &partition_by.items);
            }
            if let Some(order_by) = &over.order_by {
                self.order_by("over.order_by", order_by);
            }
        }
    }
}

/// Direct expression children of `expr`, in source order
pub fn iter_children(expr: &Expression) -> Vec<Child<'_>> {
    let mut c = Children { out: Vec::new() };

    match expr {
        Expression::Select(s) => c.one("query", &s.query),
        Expression::SelectQuery(q) => {
            for (i, cte) in q.with_sub_queries.iter().enumerate() {
                c.out.push(Child {
                    key: "with",
                    index: Some(i),
                    expr: &cte.query,
                });
            }
            c.hints("hints", &q.hints);
            if let Some(top) = &q.top {
                c.one("top", &top.count);
            }
            for (i, item) in q.columns.iter().enumerate() {
                c.out.push(Child {
                    key: "columns",
                    index: Some(i),
                    expr: &item.body,
                });
            }
            c.opt("into", &q.into);
            c.opt("from", &q.from);
            c.opt("where", &q.where_clause);
            if let Some(connect_by) = &q.connect_by {
                c.opt("connect_by.start_with", &connect_by.start_with);
                c.one("connect_by", &connect_by.condition);
            }
            if let Some(group_by) = &q.group_by {
                c.list("group_by", &group_by.items);
                c.opt("group_by.having", &group_by.having);
            }
            if let Some(order_by) = &q.order_by {
                c.order_by("order_by", order_by);
            }
            if let Some(limit) = &q.limit {
                c.opt("limit.offset", &limit.offset);
                c.opt("limit.row_count", &limit.row_count);
            }
        }
        Expression::Union(u) => {
            for (i, cte) in u.with_sub_queries.iter().enumerate() {
                c.out.push(Child {
                    key: "with",
                    index: Some(i),
                    expr: &cte.query,
                });
            }
            c.one("left", &u.left);
            c.one("right", &u.right);
        }
        Expression::Table(t) => c.hints("hints", &t.hints),
        Expression::JoinTable(j) => {
            c.one("left", &j.left);
            c.one("right", &j.right);
            c.opt("on", &j.on);
        }
        Expression::ReferenceTable(r) => c.function(&r.function),
        Expression::PivotTable(p) => {
            c.one("source", &p.source);
            c.list("aggregate", &p.aggregate.arguments);
            c.one("pivot_column", &p.pivot_column);
            for (i, item) in p.pivot_values.iter().enumerate() {
                c.out.push(Child {
                    key: "pivot_values",
                    index: Some(i),
                    expr: &item.body,
                });
            }
        }
        Expression::Identifier(_)
        | Expression::Property(_)
        | Expression::AllColumns(_)
        | Expression::Variable(_)
        | Expression::Number(_)
        | Expression::String(_)
        | Expression::Bool(_)
        | Expression::Null(_) => {}
        Expression::Interval(i) => c.one("value", &i.value),
        Expression::Array(a) => c.list("elements", &a.elements),
        Expression::Binary(b) => {
            c.one("left", &b.left);
            c.one("right", &b.right);
        }
        Expression::Not(n) => c.one("expr", &n.expr),
        Expression::Negate(n) => c.one("expr", &n.expr),
        Expression::BetweenAnd(b) => {
            c.one("expr", &b.expr);
            c.one("low", &b.low);
            c.one("high", &b.high);
        }
        Expression::In(i) => {
            c.one("expr", &i.expr);
            c.list("targets", &i.targets);
            c.opt("query", &i.query);
        }
        Expression::Exists(e) => c.one("query", &e.query),
        Expression::Any(a) => c.one("query", &a.query),
        Expression::All(a) => c.one("query", &a.query),
        Expression::Regex(r) => {
            c.one("expr", &r.expr);
            c.one("pattern", &r.pattern);
        }
        Expression::Case(case) => {
            c.opt("operand", &case.operand);
            for (i, item) in case.items.iter().enumerate() {
                c.out.push(Child {
                    key: "when",
                    index: Some(i),
                    expr: &item.when,
                });
                c.out.push(Child {
                    key: "then",
                    index: Some(i),
                    expr: &item.then,
                });
            }
            c.opt("else", &case.else_);
        }
        Expression::FunctionCall(f) => c.function(f),
        Expression::AtTimeZone(a) => {
            c.one("expr", &a.expr);
            c.one("zone", &a.zone);
        }
        Expression::ArrayIndex(a) => {
            c.one("array", &a.array);
            c.one("index", &a.index);
        }
        Expression::ArraySlice(a) => {
            c.one("array", &a.array);
            c.opt("lower", &a.lower);
            c.opt("upper", &a.upper);
        }
        Expression::Insert(i) => {
            c.hints("hints", &i.hints);
            c.one("table", &i.table);
            for (row, values) in i.values.iter().enumerate() {
                for expr in values {
                    c.out.push(Child {
                        key: "values",
                        index: Some(row),
                        expr,
                    });
                }
            }
            c.opt("query", &i.query);
        }
        Expression::Update(u) => {
            c.hints("hints", &u.hints);
            c.one("table", &u.table);
            c.list("set", &u.set);
            c.opt("from", &u.from);
            c.opt("where", &u.where_clause);
        }
        Expression::Delete(d) => {
            c.hints("hints", &d.hints);
            c.one("table", &d.table);
            c.opt("from", &d.from);
            c.opt("where", &d.where_clause);
        }
    }

    c.out
}

/// Pre-order depth-first iterator
pub struct DfsIter<'a> {
    stack: Vec<&'a Expression>,
}

impl<'a> DfsIter<'a> {
    pub fn new(root: &'a Expression) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = &'a Expression;

    fn next(&mut self) -> Option<Self::Item> {
        let expr = self.stack.pop()?;
        // Reverse so children come out in source order
        self.stack
            .extend(iter_children(expr).into_iter().rev().map(|c| c.expr));
        Some(expr)
    }
}

/// Level-order breadth-first iterator
pub struct BfsIter<'a> {
    queue: VecDeque<&'a Expression>,
}

impl<'a> BfsIter<'a> {
    pub fn new(root: &'a Expression) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(root);
        Self { queue }
    }
}

impl<'a> Iterator for BfsIter<'a> {
    type Item = &'a Expression;

    fn next(&mut self) -> Option<Self::Item> {
        let expr = self.queue.pop_front()?;
        self.queue.extend(iter_children(expr).into_iter().map(|c| c.expr));
        Some(expr)
    }
}

/// Traversal and search methods on [`Expression`]
pub trait ExpressionWalk {
    /// Pre-order iterator over this node and all descendants
    fn dfs(&self) -> DfsIter<'_>;

    /// Level-order iterator over this node and all descendants
    fn bfs(&self) -> BfsIter<'_>;

    /// First node matching `predicate`, depth-first
    fn find<F>(&self, predicate: F) -> Option<&Expression>
    where
        F: Fn(&Expression) -> bool;

    /// Every node matching `predicate`, depth-first
    fn find_all<F>(&self, predicate: F) -> Vec<&Expression>
    where
        F: Fn(&Expression) -> bool;

    fn contains<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Expression) -> bool;

    fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Expression) -> bool;

    /// Direct children
    fn children(&self) -> Vec<&Expression>;

    /// Height of the subtree; a leaf has depth 0
    fn tree_depth(&self) -> usize;
}

impl ExpressionWalk for Expression {
    fn dfs(&self) -> DfsIter<'_> {
        DfsIter::new(self)
    }

    fn bfs(&self) -> BfsIter<'_> {
        BfsIter::new(self)
    }

    fn find<F>(&self, predicate: F) -> Option<&Expression>
    where
        F: Fn(&Expression) -> bool,
    {
        self.dfs().find(|e| predicate(e))
    }

    fn find_all<F>(&self, predicate: F) -> Vec<&Expression>
    where
        F: Fn(&Expression) -> bool,
    {
        self.dfs().filter(|e| predicate(e)).collect()
    }

    fn contains<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Expression) -> bool,
    {
        self.dfs().any(|e| predicate(e))
    }

    fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Expression) -> bool,
    {
        self.dfs().filter(|e| predicate(e)).count()
    }

    fn children(&self) -> Vec<&Expression> {
        iter_children(self).into_iter().map(|c| c.expr).collect()
    }

    fn tree_depth(&self) -> usize {
        iter_children(self)
            .into_iter()
            .map(|c| c.expr.tree_depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

pub fn is_column(expr: &Expression) -> bool {
    matches!(expr, Expression::Identifier(_) | Expression::Property(_))
}

pub fn is_literal(expr: &Expression) -> bool {
    matches!(
        expr,
        Expression::Number(_) | Expression::String(_) | Expression::Bool(_) | Expression::Null(_)
    )
}

pub fn is_function(expr: &Expression) -> bool {
    matches!(expr, Expression::FunctionCall(_))
}

pub fn is_window_function(expr: &Expression) -> bool {
    matches!(expr, Expression::FunctionCall(f) if f.over.is_some())
}

/// A `Select` wrapper below the root: derived table or sub-select
pub fn is_subquery(expr: &Expression) -> bool {
    matches!(expr, Expression::Select(_))
}

pub fn is_table(expr: &Expression) -> bool {
    matches!(expr, Expression::Table(_))
}

/// Every column reference below `expr`
pub fn get_columns(expr: &Expression) -> Vec<&Expression> {
    expr.find_all(is_column)
}

/// Every named table below `expr`
pub fn get_tables(expr: &Expression) -> Vec<&Expression> {
    expr.find_all(is_table)
}

/// Parent of `target` in the tree rooted at `root`.
///
/// `target` must be a reference into the same tree (from `find`, `dfs`, ...);
/// it is matched by pointer identity. `None` for the root or an outside node.
pub fn find_parent<'a>(root: &'a Expression, target: &Expression) -> Option<&'a Expression> {
    fn search<'a>(node: &'a Expression, target: *const Expression) -> Option<&'a Expression> {
        for child in iter_children(node) {
            if std::ptr::eq(child.expr, target) {
                return Some(node);
            }
            if let Some(found) = search(child.expr, target) {
                return Some(found);
            }
        }
        None
    }

    search(root, target as *const Expression)
}

/// Nearest ancestor of `target` matching `predicate`, walking toward the root
pub fn find_ancestor<'a, F>(
    root: &'a Expression,
    target: &Expression,
    predicate: F,
) -> Option<&'a Expression>
where
    F: Fn(&Expression) -> bool,
{
    fn build_path<'a>(
        node: &'a Expression,
        target: *const Expression,
        path: &mut Vec<&'a Expression>,
    ) -> bool {
        if std::ptr::eq(node, target) {
            return true;
        }
        path.push(node);
        for child in iter_children(node) {
            if build_path(child.expr, target, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    let mut path = Vec::new();
    if !build_path(root, target as *const Expression, &mut path) {
        return None;
    }
    path.into_iter().rev().find(|ancestor| predicate(ancestor))
}
