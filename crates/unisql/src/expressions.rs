//! SQL Expression AST (Abstract Syntax Tree).
//!
//! This module defines the dialect-neutral node types produced by the parser.
//!
//! # Architecture
//!
//! The central type is [`Expression`], a tagged enum with one variant per
//! construct that can appear in an expression, table-source or statement
//! position. Inner structs carry the fields for each variant and are boxed to
//! keep the enum small. Clause-shaped nodes that only ever appear inside a
//! parent (`SelectItem`, `GroupBy`, `Limit`, `Over`, ...) are plain structs
//! held directly by their owner.
//!
//! # Ownership, equality and cloning
//!
//! Children are owned exclusively through `Box`/`Vec`, so `Clone` is a deep
//! copy and never shares a subtree. There is no stored parent pointer; upward
//! lookup goes through [`crate::traversal::TreeContext`].
//!
//! `PartialEq`, `Eq` and `Hash` are structural. The per-node [`DialectTag`]
//! is carried along by `Clone` but ignored by equality and hashing, so trees
//! parsed from different dialects compare equal when their shape matches.
//!
//! | Group | Variants |
//! |---|---|
//! | **Queries** | `Select`, `SelectQuery`, `Union` |
//! | **Sources** | `Table`, `JoinTable`, `ReferenceTable`, `PivotTable` |
//! | **Names** | `Identifier`, `Property`, `AllColumns`, `Variable` |
//! | **Literals** | `Number`, `String`, `Bool`, `Null`, `Interval`, `Array` |
//! | **Operators** | `Binary`, `Not`, `Negate`, `BetweenAnd`, `In`, `Regex`, `Exists`, `Any`, `All` |
//! | **Other** | `Case`, `FunctionCall`, `AtTimeZone`, `ArrayIndex`, `ArraySlice` |
//! | **DML** | `Insert`, `Update`, `Delete` |

use crate::dialects::DialectType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Dialect a node was parsed with.
///
/// The tag rides along with the node for dialect-aware rendering but takes no
/// part in equality or hashing: two tags always compare equal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialectTag(pub Option<DialectType>);

impl DialectTag {
    pub fn new(dialect: DialectType) -> Self {
        Self(Some(dialect))
    }

    pub fn get(&self) -> Option<DialectType> {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl PartialEq for DialectTag {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for DialectTag {}

impl Hash for DialectTag {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl From<Option<DialectType>> for DialectTag {
    fn from(dialect: Option<DialectType>) -> Self {
        Self(dialect)
    }
}

/// Closed set of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Select,
    SelectQuery,
    SelectItem,
    UnionQuery,
    WithSubQuery,
    Table,
    JoinTable,
    ReferenceTable,
    PivotTable,
    Property,
    Identifier,
    AllColumns,
    Variable,
    Number,
    String,
    Bool,
    Null,
    Binary,
    Not,
    Negate,
    BetweenAnd,
    In,
    Exists,
    Any,
    All,
    Regex,
    Case,
    CaseItem,
    FunctionCall,
    Over,
    PartitionBy,
    WithinGroup,
    GroupBy,
    OrderBy,
    OrderByItem,
    Limit,
    Top,
    Hint,
    ConnectBy,
    Collate,
    AtTimeZone,
    Interval,
    TimeUnit,
    Array,
    ArrayIndex,
    ArraySlice,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Any SQL expression, table source or statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    // Queries
    Select(Box<Select>),
    SelectQuery(Box<SelectQuery>),
    Union(Box<UnionQuery>),

    // Table sources
    Table(Box<Table>),
    JoinTable(Box<JoinTable>),
    ReferenceTable(Box<ReferenceTable>),
    PivotTable(Box<PivotTable>),

    // Names
    Identifier(Identifier),
    Property(Box<Property>),
    AllColumns(Box<AllColumns>),
    Variable(Box<Variable>),

    // Literals
    Number(NumberLiteral),
    String(StringLiteral),
    Bool(BoolLiteral),
    Null(NullLiteral),
    Interval(Box<Interval>),
    Array(Box<ArrayLiteral>),

    // Operators and predicates
    Binary(Box<BinaryExpression>),
    Not(Box<Not>),
    Negate(Box<Negate>),
    BetweenAnd(Box<BetweenAnd>),
    In(Box<In>),
    Exists(Box<Exists>),
    Any(Box<Any>),
    All(Box<All>),
    Regex(Box<Regex>),

    Case(Box<Case>),
    FunctionCall(Box<FunctionCall>),
    AtTimeZone(Box<AtTimeZone>),
    ArrayIndex(Box<ArrayIndex>),
    ArraySlice(Box<ArraySlice>),

    // DML
    Insert(Box<Insert>),
    Update(Box<Update>),
    Delete(Box<Delete>),
}

impl Expression {
    /// Create an unqualified identifier
    pub fn identifier(value: impl Into<String>) -> Self {
        Expression::Identifier(Identifier::new(value))
    }

    /// Create a numeric literal from its source text
    pub fn number(value: impl Into<String>) -> Self {
        Expression::Number(NumberLiteral::new(value))
    }

    /// Create a string literal
    pub fn string(value: impl Into<String>) -> Self {
        Expression::String(StringLiteral::new(value))
    }

    pub fn boolean(value: bool) -> Self {
        Expression::Bool(BoolLiteral {
            value,
            dialect: DialectTag::default(),
        })
    }

    pub fn null() -> Self {
        Expression::Null(NullLiteral::default())
    }

    /// Create a binary expression
    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::Binary(Box::new(BinaryExpression::new(left, op, right)))
    }

    /// The node kind of this expression
    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::Select(_) => NodeKind::Select,
            Expression::SelectQuery(_) => NodeKind::SelectQuery,
            Expression::Union(_) => NodeKind::UnionQuery,
            Expression::Table(_) => NodeKind::Table,
            Expression::JoinTable(_) => NodeKind::JoinTable,
            Expression::ReferenceTable(_) => NodeKind::ReferenceTable,
            Expression::PivotTable(_) => NodeKind::PivotTable,
            Expression::Identifier(_) => NodeKind::Identifier,
            Expression::Property(_) => NodeKind::Property,
            Expression::AllColumns(_) => NodeKind::AllColumns,
            Expression::Variable(_) => NodeKind::Variable,
            Expression::Number(_) => NodeKind::Number,
            Expression::String(_) => NodeKind::String,
            Expression::Bool(_) => NodeKind::Bool,
            Expression::Null(_) => NodeKind::Null,
            Expression::Interval(_) => NodeKind::Interval,
            Expression::Array(_) => NodeKind::Array,
            Expression::Binary(_) => NodeKind::Binary,
            Expression::Not(_) => NodeKind::Not,
            Expression::Negate(_) => NodeKind::Negate,
            Expression::BetweenAnd(_) => NodeKind::BetweenAnd,
            Expression::In(_) => NodeKind::In,
            Expression::Exists(_) => NodeKind::Exists,
            Expression::Any(_) => NodeKind::Any,
            Expression::All(_) => NodeKind::All,
            Expression::Regex(_) => NodeKind::Regex,
            Expression::Case(_) => NodeKind::Case,
            Expression::FunctionCall(_) => NodeKind::FunctionCall,
            Expression::AtTimeZone(_) => NodeKind::AtTimeZone,
            Expression::ArrayIndex(_) => NodeKind::ArrayIndex,
            Expression::ArraySlice(_) => NodeKind::ArraySlice,
            Expression::Insert(_) => NodeKind::Insert,
            Expression::Update(_) => NodeKind::Update,
            Expression::Delete(_) => NodeKind::Delete,
        }
    }

    /// Dialect tag of this node, if it was produced by the parser
    pub fn dialect(&self) -> Option<DialectType> {
        match self {
            Expression::Select(e) => e.dialect.get(),
            Expression::SelectQuery(e) => e.dialect.get(),
            Expression::Union(e) => e.dialect.get(),
            Expression::Table(e) => e.dialect.get(),
            Expression::JoinTable(e) => e.dialect.get(),
            Expression::ReferenceTable(e) => e.dialect.get(),
            Expression::PivotTable(e) => e.dialect.get(),
            Expression::Identifier(e) => e.dialect.get(),
            Expression::Property(e) => e.dialect.get(),
            Expression::AllColumns(e) => e.dialect.get(),
            Expression::Variable(e) => e.dialect.get(),
            Expression::Number(e) => e.dialect.get(),
            Expression::String(e) => e.dialect.get(),
            Expression::Bool(e) => e.dialect.get(),
            Expression::Null(e) => e.dialect.get(),
            Expression::Interval(e) => e.dialect.get(),
            Expression::Array(e) => e.dialect.get(),
            Expression::Binary(e) => e.dialect.get(),
            Expression::Not(e) => e.dialect.get(),
            Expression::Negate(e) => e.dialect.get(),
            Expression::BetweenAnd(e) => e.dialect.get(),
            Expression::In(e) => e.dialect.get(),
            Expression::Exists(e) => e.dialect.get(),
            Expression::Any(e) => e.dialect.get(),
            Expression::All(e) => e.dialect.get(),
            Expression::Regex(e) => e.dialect.get(),
            Expression::Case(e) => e.dialect.get(),
            Expression::FunctionCall(e) => e.dialect.get(),
            Expression::AtTimeZone(e) => e.dialect.get(),
            Expression::ArrayIndex(e) => e.dialect.get(),
            Expression::ArraySlice(e) => e.dialect.get(),
            Expression::Insert(e) => e.dialect.get(),
            Expression::Update(e) => e.dialect.get(),
            Expression::Delete(e) => e.dialect.get(),
        }
    }

    /// Whether this is a query (`Select`, `SelectQuery` or `Union`)
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Expression::Select(_) | Expression::SelectQuery(_) | Expression::Union(_)
        )
    }

    /// Whether this is a root statement node
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Expression::Select(_)
                | Expression::Insert(_)
                | Expression::Update(_)
                | Expression::Delete(_)
        )
    }
}

// ============================================================================
// Queries
// ============================================================================

/// A query used as a statement, sub-select or derived table.
///
/// `query` is either a [`SelectQuery`] or a [`UnionQuery`] chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Select {
    pub query: Expression,
    /// Alias when used as a derived table: `(SELECT ...) AS t`
    pub alias: Option<Identifier>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

impl Select {
    pub fn new(query: Expression) -> Self {
        Self {
            query,
            alias: None,
            dialect: DialectTag::default(),
        }
    }
}

/// `ALL` / `DISTINCT` / `UNIQUE` after `SELECT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultSetOption {
    All,
    Distinct,
    Unique,
}

impl ResultSetOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSetOption::All => "ALL",
            ResultSetOption::Distinct => "DISTINCT",
            ResultSetOption::Unique => "UNIQUE",
        }
    }
}

/// A single `SELECT ... FROM ... WHERE ...` block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SelectQuery {
    /// Common table expressions bound ahead of the query
    pub with_sub_queries: Vec<WithSubQuery>,
    pub hints: Vec<Hint>,
    pub option: Option<ResultSetOption>,
    /// SQL Server `TOP n`
    pub top: Option<Top>,
    pub columns: Vec<SelectItem>,
    /// SQL Server `SELECT ... INTO target`
    pub into: Option<Expression>,
    pub from: Option<Expression>,
    pub where_clause: Option<Expression>,
    pub group_by: Option<GroupBy>,
    /// Oracle hierarchical query clause
    pub connect_by: Option<ConnectBy>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<Limit>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// One entry of the select list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectItem {
    pub body: Expression,
    pub alias: Option<Identifier>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

impl SelectItem {
    pub fn new(body: Expression) -> Self {
        Self {
            body,
            alias: None,
            dialect: DialectTag::default(),
        }
    }
}

/// Set operator joining two queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnionKind {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
    Except,
    ExceptAll,
    Minus,
}

impl UnionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnionKind::Union => "UNION",
            UnionKind::UnionAll => "UNION ALL",
            UnionKind::Intersect => "INTERSECT",
            UnionKind::IntersectAll => "INTERSECT ALL",
            UnionKind::Except => "EXCEPT",
            UnionKind::ExceptAll => "EXCEPT ALL",
            UnionKind::Minus => "MINUS",
        }
    }
}

impl fmt::Display for UnionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `left <set operator> right`. Chains are left-associative: in
/// `a UNION b UNION c` the left side of the root is `a UNION b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnionQuery {
    /// CTEs of a `WITH ... <chain>` statement attach to the root of the chain
    pub with_sub_queries: Vec<WithSubQuery>,
    pub left: Expression,
    pub right: Expression,
    pub kind: UnionKind,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `name [(col, ...)] AS (subselect)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithSubQuery {
    pub name: Identifier,
    pub columns: Vec<Identifier>,
    pub query: Expression,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

// ============================================================================
// Table sources
// ============================================================================

/// A (possibly qualified) table reference: `[database.][schema.]name[@dblink] [AS alias]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Table {
    pub database: Option<Identifier>,
    pub schema: Option<Identifier>,
    pub name: Identifier,
    /// Oracle database link: `name@link`
    pub db_link: Option<Identifier>,
    pub alias: Option<Identifier>,
    /// SQL Server table hints: `WITH (NOLOCK)`
    pub hints: Vec<Hint>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            database: None,
            schema: None,
            name: Identifier::new(name),
            db_link: None,
            alias: None,
            hints: Vec::new(),
            dialect: DialectTag::default(),
        }
    }
}

/// Join kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two sources joined together. Join trees are left-deep.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinTable {
    pub left: Expression,
    pub right: Expression,
    pub kind: JoinKind,
    /// `ON` condition; absent for `CROSS JOIN` and comma joins
    pub on: Option<Expression>,
    /// `FROM a, b`: an inner join whose condition lives in WHERE
    pub is_comma_join: bool,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// A table-valued function in FROM position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceTable {
    pub function: FunctionCall,
    pub alias: Option<Identifier>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `source PIVOT (agg(x) FOR column IN (v1, v2, ...)) [AS] alias`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PivotTable {
    pub source: Expression,
    pub aggregate: FunctionCall,
    pub pivot_column: Expression,
    pub pivot_values: Vec<SelectItem>,
    pub alias: Option<Identifier>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

// ============================================================================
// Names
// ============================================================================

/// `COLLATE name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collate {
    pub name: String,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

impl Collate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dialect: DialectTag::default(),
        }
    }
}

/// A name. Escaped names keep their delimiters in `value` (`[System]`) and
/// record them in `left_qualifier`/`right_qualifier`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub value: String,
    pub left_qualifier: Option<String>,
    pub right_qualifier: Option<String>,
    pub collate: Option<Collate>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            left_qualifier: None,
            right_qualifier: None,
            collate: None,
            dialect: DialectTag::default(),
        }
    }

    /// Build an escaped identifier from text that still carries its
    /// delimiters, e.g. `[Order Details]`.
    pub fn escaped(text: impl Into<String>) -> Self {
        let value: String = text.into();
        let mut chars = value.chars();
        let left = chars.next().map(String::from);
        let right = chars.next_back().map(String::from);
        Self {
            value,
            left_qualifier: left,
            right_qualifier: right,
            collate: None,
            dialect: DialectTag::default(),
        }
    }

    pub fn is_escaped(&self) -> bool {
        self.left_qualifier.is_some()
    }

    /// The name without its escape delimiters
    pub fn unescaped(&self) -> &str {
        match (&self.left_qualifier, &self.right_qualifier) {
            (Some(l), Some(r)) => self
                .value
                .strip_prefix(l.as_str())
                .and_then(|v| v.strip_suffix(r.as_str()))
                .unwrap_or(&self.value),
            _ => &self.value,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Qualified column reference: `[schema.]table.name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub schema: Option<Identifier>,
    /// Owning table or alias
    pub table: Identifier,
    pub name: Identifier,
    pub collate: Option<Collate>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `*` or `owner.*`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AllColumns {
    /// Qualifier path before the star, outermost first
    pub owner: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `@name`, `@@name`, `:name` or `:1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub prefix: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

// ============================================================================
// Literals
// ============================================================================

/// Numeric literal, kept as its source text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberLiteral {
    pub value: String,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

impl NumberLiteral {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            dialect: DialectTag::default(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringLiteral {
    /// Unescaped content
    pub value: String,
    /// SQL Server `N'...'`
    pub is_national: bool,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

impl StringLiteral {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_national: false,
            dialect: DialectTag::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoolLiteral {
    pub value: bool,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NullLiteral {
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// Unit keyword of an interval, upper-cased (`DAY`, `MONTH`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeUnit {
    pub unit: String,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// Time unit names accepted after `INTERVAL <value>`
pub const TIME_UNITS: &[&str] = &[
    "MICROSECOND",
    "MILLISECOND",
    "SECOND",
    "MINUTE",
    "HOUR",
    "DAY",
    "WEEK",
    "MONTH",
    "QUARTER",
    "YEAR",
];

/// `INTERVAL value [unit]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub value: Expression,
    pub unit: Option<TimeUnit>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `ARRAY[e1, e2, ...]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `array[index]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayIndex {
    pub array: Expression,
    pub index: Expression,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `array[lower:upper]`; either bound may be omitted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArraySlice {
    pub array: Expression,
    pub lower: Option<Expression>,
    pub upper: Option<Expression>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

// ============================================================================
// Operators
// ============================================================================

/// Binary operators, each with a canonical SQL spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    // Comparison
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Like,
    NotLike,
    ILike,
    NotILike,
    Is,
    IsNot,
    // Boolean
    And,
    Or,
    Xor,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Concat,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
            BinaryOperator::Less => "<",
            BinaryOperator::LessOrEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterOrEqual => ">=",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::NotLike => "NOT LIKE",
            BinaryOperator::ILike => "ILIKE",
            BinaryOperator::NotILike => "NOT ILIKE",
            BinaryOperator::Is => "IS",
            BinaryOperator::IsNot => "IS NOT",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::Xor => "XOR",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::Concat => "||",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::Less
                | BinaryOperator::LessOrEqual
                | BinaryOperator::Greater
                | BinaryOperator::GreaterOrEqual
                | BinaryOperator::Like
                | BinaryOperator::NotLike
                | BinaryOperator::ILike
                | BinaryOperator::NotILike
                | BinaryOperator::Is
                | BinaryOperator::IsNot
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(
            self,
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Xor
        )
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub left: Expression,
    pub op: BinaryOperator,
    pub right: Expression,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

impl BinaryExpression {
    pub fn new(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Self {
            left,
            op,
            right,
            dialect: DialectTag::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Not {
    pub expr: Expression,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// Arithmetic negation `-expr` of anything but a numeric literal, which
/// carries its own sign
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Negate {
    pub expr: Expression,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `expr [NOT] BETWEEN low AND high`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BetweenAnd {
    pub expr: Expression,
    pub low: Expression,
    pub high: Expression,
    pub not: bool,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `expr [NOT] IN (v1, v2, ...)` or `expr [NOT] IN (subselect)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct In {
    pub expr: Expression,
    pub targets: Vec<Expression>,
    pub query: Option<Expression>,
    pub not: bool,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `EXISTS (subselect)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exists {
    pub query: Expression,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `ANY (subselect)`, the right operand of a comparison. Under PostgreSQL
/// the operand may also be an array expression (`x = ANY(tags)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Any {
    pub query: Expression,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `ALL (subselect)` or `ALL (array)`, the right operand of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct All {
    pub query: Expression,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// Regular-expression match: PostgreSQL `~`/`~*`/`!~`/`!~*`, MySQL `[NOT] REGEXP`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Regex {
    pub expr: Expression,
    pub pattern: Expression,
    pub case_insensitive: bool,
    pub not: bool,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `expr AT TIME ZONE zone`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtTimeZone {
    pub expr: Expression,
    pub zone: Expression,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Case {
    /// The operand for simple CASE, or `None` for searched CASE.
    pub operand: Option<Expression>,
    pub items: Vec<CaseItem>,
    pub else_: Option<Expression>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseItem {
    pub when: Expression,
    pub then: Expression,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

// ============================================================================
// Functions and windows
// ============================================================================

/// `[owner.]name([DISTINCT] args) [WITHIN GROUP (...)] [OVER (...)]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Schema/package qualifiers, outermost first
    pub owner: Vec<Identifier>,
    pub name: Identifier,
    pub distinct: bool,
    pub arguments: Vec<Expression>,
    pub within_group: Option<WithinGroup>,
    pub over: Option<Over>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self {
            owner: Vec::new(),
            name: Identifier::new(name),
            distinct: false,
            arguments,
            within_group: None,
            over: None,
            dialect: DialectTag::default(),
        }
    }
}

/// `OVER ([PARTITION BY ...] [ORDER BY ...])`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Over {
    pub partition_by: Option<PartitionBy>,
    pub order_by: Option<OrderBy>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PartitionBy {
    pub items: Vec<Expression>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `WITHIN GROUP (ORDER BY ...)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithinGroup {
    pub order_by: OrderBy,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

// ============================================================================
// Clauses
// ============================================================================

/// `GROUP BY items [HAVING condition]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GroupBy {
    pub items: Vec<Expression>,
    pub having: Option<Expression>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OrderBy {
    pub items: Vec<OrderByItem>,
    /// Oracle `ORDER SIBLINGS BY`
    pub siblings: bool,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderByItem {
    pub expr: Expression,
    /// Explicit direction; `None` when omitted
    pub order: Option<SortOrder>,
    pub nulls: Option<NullsOrder>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// Row limiting, normalised across dialects.
///
/// MySQL `LIMIT 5, 10`, `LIMIT 10 OFFSET 5`, SQL Server
/// `OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY` and PostgreSQL
/// `LIMIT 10 OFFSET 5` all produce `Limit { offset: 5, row_count: 10 }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Limit {
    pub offset: Option<Expression>,
    pub row_count: Option<Expression>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// SQL Server `TOP n [PERCENT] [WITH TIES]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Top {
    pub count: Expression,
    pub percent: bool,
    pub with_ties: bool,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// Optimizer or table hint. Comment hints (`/*+ ... */`) carry their text as
/// a string literal; table hints carry an identifier or function call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hint {
    pub body: Expression,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// Oracle `[START WITH cond] CONNECT BY [NOCYCLE] [PRIOR] cond`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectBy {
    pub start_with: Option<Expression>,
    pub condition: Expression,
    pub nocycle: bool,
    /// `PRIOR` directly after `CONNECT BY`
    pub prior: bool,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

// ============================================================================
// DML
// ============================================================================

/// `INSERT INTO table [(columns)] VALUES (...), ...` or `INSERT INTO table [(columns)] <query>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Insert {
    pub hints: Vec<Hint>,
    pub table: Expression,
    pub columns: Vec<Identifier>,
    pub values: Vec<Vec<Expression>>,
    pub query: Option<Expression>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `UPDATE table SET a = e, ... [FROM source] [WHERE cond]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Update {
    pub hints: Vec<Hint>,
    pub table: Expression,
    /// Assignments, each a `Binary` with the `Equal` operator
    pub set: Vec<Expression>,
    pub from: Option<Expression>,
    pub where_clause: Option<Expression>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}

/// `DELETE [FROM] table [WHERE cond]`, or SQL Server `DELETE t FROM source [WHERE cond]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delete {
    pub hints: Vec<Hint>,
    pub table: Expression,
    pub from: Option<Expression>,
    pub where_clause: Option<Expression>,
    #[serde(default, skip_serializing_if = "DialectTag::is_none")]
    pub dialect: DialectTag,
}
