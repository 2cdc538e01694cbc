//! Double-dispatch hook for external consumers of the AST.
//!
//! Renderers, pretty-printers and analysers implement [`Visitor`], which has
//! one method per node kind. Every node implements [`Node`], whose `accept`
//! calls back into the matching `visit_*` method. Rendering logic lives in the
//! visitor, never in the node types.

use crate::dialects::DialectType;
use crate::expressions::*;

/// One method per concrete node kind
pub trait Visitor {
    type Output;

    fn visit_select(&mut self, node: &Select) -> Self::Output;
    fn visit_select_query(&mut self, node: &SelectQuery) -> Self::Output;
    fn visit_select_item(&mut self, node: &SelectItem) -> Self::Output;
    fn visit_union_query(&mut self, node: &UnionQuery) -> Self::Output;
    fn visit_with_sub_query(&mut self, node: &WithSubQuery) -> Self::Output;
    fn visit_table(&mut self, node: &Table) -> Self::Output;
    fn visit_join_table(&mut self, node: &JoinTable) -> Self::Output;
    fn visit_reference_table(&mut self, node: &ReferenceTable) -> Self::Output;
    fn visit_pivot_table(&mut self, node: &PivotTable) -> Self::Output;
    fn visit_property(&mut self, node: &Property) -> Self::Output;
    fn visit_identifier(&mut self, node: &Identifier) -> Self::Output;
    fn visit_all_columns(&mut self, node: &AllColumns) -> Self::Output;
    fn visit_variable(&mut self, node: &Variable) -> Self::Output;
    fn visit_number(&mut self, node: &NumberLiteral) -> Self::Output;
    fn visit_string(&mut self, node: &StringLiteral) -> Self::Output;
    fn visit_bool(&mut self, node: &BoolLiteral) -> Self::Output;
    fn visit_null(&mut self, node: &NullLiteral) -> Self::Output;
    fn visit_binary(&mut self, node: &BinaryExpression) -> Self::Output;
    fn visit_not(&mut self, node: &Not) -> Self::Output;
    fn visit_negate(&mut self, node: &Negate) -> Self::Output;
    fn visit_between_and(&mut self, node: &BetweenAnd) -> Self::Output;
    fn visit_in(&mut self, node: &In) -> Self::Output;
    fn visit_exists(&mut self, node: &Exists) -> Self::Output;
    fn visit_any(&mut self, node: &Any) -> Self::Output;
    fn visit_all(&mut self, node: &All) -> Self::Output;
    fn visit_regex(&mut self, node: &Regex) -> Self::Output;
    fn visit_case(&mut self, node: &Case) -> Self::Output;
    fn visit_case_item(&mut self, node: &CaseItem) -> Self::Output;
    fn visit_function_call(&mut self, node: &FunctionCall) -> Self::Output;
    fn visit_over(&mut self, node: &Over) -> Self::Output;
    fn visit_partition_by(&mut self, node: &PartitionBy) -> Self::Output;
    fn visit_within_group(&mut self, node: &WithinGroup) -> Self::Output;
    fn visit_group_by(&mut self, node: &GroupBy) -> Self::Output;
    fn visit_order_by(&mut self, node: &OrderBy) -> Self::Output;
    fn visit_order_by_item(&mut self, node: &OrderByItem) -> Self::Output;
    fn visit_limit(&mut self, node: &Limit) -> Self::Output;
    fn visit_top(&mut self, node: &Top) -> Self::Output;
    fn visit_hint(&mut self, node: &Hint) -> Self::Output;
    fn visit_connect_by(&mut self, node: &ConnectBy) -> Self::Output;
    fn visit_collate(&mut self, node: &Collate) -> Self::Output;
    fn visit_at_time_zone(&mut self, node: &AtTimeZone) -> Self::Output;
    fn visit_interval(&mut self, node: &Interval) -> Self::Output;
    fn visit_time_unit(&mut self, node: &TimeUnit) -> Self::Output;
    fn visit_array(&mut self, node: &ArrayLiteral) -> Self::Output;
    fn visit_array_index(&mut self, node: &ArrayIndex) -> Self::Output;
    fn visit_array_slice(&mut self, node: &ArraySlice) -> Self::Output;
    fn visit_insert(&mut self, node: &Insert) -> Self::Output;
    fn visit_update(&mut self, node: &Update) -> Self::Output;
    fn visit_delete(&mut self, node: &Delete) -> Self::Output;
}

/// Common surface of every AST node
pub trait Node {
    fn kind(&self) -> NodeKind;

    /// Dialect the node was parsed with
    fn dialect(&self) -> Option<DialectType>;

    /// Dispatch to the visitor method for this node's kind
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output;
}

macro_rules! impl_node {
    ($($ty:ident => $kind:ident, $visit:ident;)*) => {
        $(
            impl Node for $ty {
                fn kind(&self) -> NodeKind {
                    NodeKind::$kind
                }

                fn dialect(&self) -> Option<DialectType> {
                    self.dialect.get()
                }

                fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                    visitor.$visit(self)
                }
            }
        )*
    };
}

impl_node! {
    Select => Select, visit_select;
    SelectQuery => SelectQuery, visit_select_query;
    SelectItem => SelectItem, visit_select_item;
    UnionQuery => UnionQuery, visit_union_query;
    WithSubQuery => WithSubQuery, visit_with_sub_query;
    Table => Table, visit_table;
    JoinTable => JoinTable, visit_join_table;
    ReferenceTable => ReferenceTable, visit_reference_table;
    PivotTable => PivotTable, visit_pivot_table;
    Property => Property, visit_property;
    Identifier => Identifier, visit_identifier;
    AllColumns => AllColumns, visit_all_columns;
    Variable => Variable, visit_variable;
    NumberLiteral => Number, visit_number;
    StringLiteral => String, visit_string;
    BoolLiteral => Bool, visit_bool;
    NullLiteral => Null, visit_null;
    BinaryExpression => Binary, visit_binary;
    Not => Not, visit_not;
    Negate => Negate, visit_negate;
    BetweenAnd => BetweenAnd, visit_between_and;
    In => In, visit_in;
    Exists => Exists, visit_exists;
    Any => Any, visit_any;
    All => All, visit_all;
    Regex => Regex, visit_regex;
    Case => Case, visit_case;
    CaseItem => CaseItem, visit_case_item;
    FunctionCall => FunctionCall, visit_function_call;
    Over => Over, visit_over;
    PartitionBy => PartitionBy, visit_partition_by;
    WithinGroup => WithinGroup, visit_within_group;
    GroupBy => GroupBy, visit_group_by;
    OrderBy => OrderBy, visit_order_by;
    OrderByItem => OrderByItem, visit_order_by_item;
    Limit => Limit, visit_limit;
    Top => Top, visit_top;
    Hint => Hint, visit_hint;
    ConnectBy => ConnectBy, visit_connect_by;
    Collate => Collate, visit_collate;
    AtTimeZone => AtTimeZone, visit_at_time_zone;
    Interval => Interval, visit_interval;
    TimeUnit => TimeUnit, visit_time_unit;
    ArrayLiteral => Array, visit_array;
    ArrayIndex => ArrayIndex, visit_array_index;
    ArraySlice => ArraySlice, visit_array_slice;
    Insert => Insert, visit_insert;
    Update => Update, visit_update;
    Delete => Delete, visit_delete;
}

impl Node for Expression {
    fn kind(&self) -> NodeKind {
        Expression::kind(self)
    }

    fn dialect(&self) -> Option<DialectType> {
        Expression::dialect(self)
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expression::Select(e) => visitor.visit_select(e),
            Expression::SelectQuery(e) => visitor.visit_select_query(e),
            Expression::Union(e) => visitor.visit_union_query(e),
            Expression::Table(e) => visitor.visit_table(e),
            Expression::JoinTable(e) => visitor.visit_join_table(e),
            Expression::ReferenceTable(e) => visitor.visit_reference_table(e),
            Expression::PivotTable(e) => visitor.visit_pivot_table(e),
            Expression::Identifier(e) => visitor.visit_identifier(e),
            Expression::Property(e) => visitor.visit_property(e),
            Expression::AllColumns(e) => visitor.visit_all_columns(e),
            Expression::Variable(e) => visitor.visit_variable(e),
            Expression::Number(e) => visitor.visit_number(e),
            Expression::String(e) => visitor.visit_string(e),
            Expression::Bool(e) => visitor.visit_bool(e),
            Expression::Null(e) => visitor.visit_null(e),
            Expression::Interval(e) => visitor.visit_interval(e),
            Expression::Array(e) => visitor.visit_array(e),
            Expression::Binary(e) => visitor.visit_binary(e),
            Expression::Not(e) => visitor.visit_not(e),
            Expression::Negate(e) => visitor.visit_negate(e),
            Expression::BetweenAnd(e) => visitor.visit_between_and(e),
            Expression::In(e) => visitor.visit_in(e),
            Expression::Exists(e) => visitor.visit_exists(e),
            Expression::Any(e) => visitor.visit_any(e),
            Expression::All(e) => visitor.visit_all(e),
            Expression::Regex(e) => visitor.visit_regex(e),
            Expression::Case(e) => visitor.visit_case(e),
            Expression::FunctionCall(e) => visitor.visit_function_call(e),
            Expression::AtTimeZone(e) => visitor.visit_at_time_zone(e),
            Expression::ArrayIndex(e) => visitor.visit_array_index(e),
            Expression::ArraySlice(e) => visitor.visit_array_slice(e),
            Expression::Insert(e) => visitor.visit_insert(e),
            Expression::Update(e) => visitor.visit_update(e),
            Expression::Delete(e) => visitor.visit_delete(e),
        }
    }
}
