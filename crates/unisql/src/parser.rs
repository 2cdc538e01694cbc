//! SQL Parser -- recursive descent over the normalized token stream.
//!
//! One parser serves every dialect. Dialect differences are confined to the
//! keyword set seen by the tokenizer and to a handful of branches driven by
//! [`ParserConfig`]: the LIMIT sub-grammar, SQL Server `TOP`/`INTO`/table
//! hints, and Oracle database links.
//!
//! Precedence, lowest first:
//!
//! | Level | Constructs |
//! |---|---|
//! | logical | `OR`, `XOR`, `AND`, prefix `NOT` |
//! | relational | `= <> < <= > >= LIKE ILIKE`, `IS [NOT] NULL`, `[NOT] BETWEEN`, `[NOT] IN`, regex |
//! | additive | `+ - \|\| & \| ^` |
//! | multiplicative | `* / %` |
//! | unary | prefix `-`/`+`, folded into numeric literals |
//! | unit | literals, names, calls, `CASE`, sub-selects, variables, `ARRAY[...]`, `INTERVAL` |
//!
//! Errors are fatal: the first missing or unexpected token aborts the parse.

use crate::dialects::{DialectType, LimitStyle};
use crate::error::{Error, Result};
use crate::expressions::*;
use crate::tokens::{Token, TokenType};

/// Default cap on iterations of list-parsing loops
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Default cap on nesting of parentheses, sub-queries, `NOT` and unary operators.
/// Sized to stay inside a 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Words that are never taken as a bare (AS-less) alias
const NON_ALIAS_WORDS: &[&str] = &["OFFSET", "ROW", "ROWS", "FETCH"];

/// Parser configuration
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Dialect stamped on every node
    pub dialect: Option<DialectType>,
    /// LIMIT sub-grammar; `None` means no limit clause is recognised
    pub limit_style: Option<LimitStyle>,
    /// Hard cap on iterations of GROUP BY / ORDER BY / PARTITION BY and other
    /// list loops; exceeding it is a fatal error naming the construct
    pub max_iterations: usize,
    /// Hard cap on recursive nesting; exceeding it is a fatal error instead
    /// of a stack overflow
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            dialect: None,
            limit_style: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// SQL Parser
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    config: ParserConfig,
}

impl Parser {
    /// Create a parser over a normalized token stream
    pub fn new(tokens: Vec<Token>, config: ParserConfig) -> Self {
        Self {
            tokens,
            current: 0,
            depth: 0,
            config,
        }
    }

    /// Parse exactly one statement, optionally terminated by `;`.
    ///
    /// Any token left after the statement is a syntax error.
    pub fn parse_statement(&mut self) -> Result<Expression> {
        let token_type = match self.peek() {
            Some(token) => token.token_type,
            None => return Err(Error::parse("Unrecognized statement: empty input")),
        };

        let statement = match token_type {
            TokenType::Select | TokenType::With | TokenType::LParen => {
                let query = self.parse_query()?;
                Expression::Select(Box::new(Select {
                    query,
                    alias: None,
                    dialect: self.tag(),
                }))
            }
            TokenType::Insert => self.parse_insert()?,
            TokenType::Update => self.parse_update()?,
            TokenType::Delete => self.parse_delete()?,
            _ => {
                return Err(self.error_here(format!(
                    "Unrecognized statement starting with {}",
                    self.describe_current()
                )))
            }
        };

        self.match_token(TokenType::Semicolon);
        if !self.is_at_end() {
            return Err(self.error_here(format!(
                "Unexpected {} after end of statement",
                self.describe_current()
            )));
        }

        Ok(statement)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Parse `[WITH ctes] primary {set-op primary}`.
    ///
    /// Returns a `SelectQuery`, a `Union` chain, or a `Select` wrapper for a
    /// parenthesized operand that was not part of a chain.
    fn parse_query(&mut self) -> Result<Expression> {
        self.enter()?;
        let query = self.parse_query_chain();
        self.exit();
        query
    }

    fn parse_query_chain(&mut self) -> Result<Expression> {
        let ctes = if self.match_token(TokenType::With) {
            self.parse_with_list()?
        } else {
            Vec::new()
        };

        let mut query = self.parse_primary_select()?;

        while let Some(kind) = self.parse_union_kind() {
            let right = self.parse_primary_select()?;
            query = Expression::Union(Box::new(UnionQuery {
                with_sub_queries: Vec::new(),
                left: query,
                right,
                kind,
                dialect: self.tag(),
            }));
        }

        // A lone parenthesized query needs no wrapper of its own
        if let Expression::Select(select) = query {
            query = if select.alias.is_none() {
                select.query
            } else {
                Expression::Select(select)
            };
        }

        if !ctes.is_empty() {
            attach_ctes(&mut query, ctes)?;
        }
        Ok(query)
    }

    fn parse_union_kind(&mut self) -> Option<UnionKind> {
        let token_type = self.peek()?.token_type;
        let kind = match token_type {
            TokenType::Union => {
                self.advance();
                if self.match_token(TokenType::All) {
                    UnionKind::UnionAll
                } else {
                    self.match_token(TokenType::Distinct);
                    UnionKind::Union
                }
            }
            TokenType::Intersect => {
                self.advance();
                if self.match_token(TokenType::All) {
                    UnionKind::IntersectAll
                } else {
                    UnionKind::Intersect
                }
            }
            TokenType::Except => {
                self.advance();
                if self.match_token(TokenType::All) {
                    UnionKind::ExceptAll
                } else {
                    UnionKind::Except
                }
            }
            TokenType::Minus => {
                self.advance();
                UnionKind::Minus
            }
            _ => return None,
        };
        Some(kind)
    }

    /// Parse `name [(col, ...)] AS (query), ...` after `WITH`
    fn parse_with_list(&mut self) -> Result<Vec<WithSubQuery>> {
        self.parse_comma_separated("WITH", |p| {
            let name = p.parse_name_part()?;
            let columns = if p.match_token(TokenType::LParen) {
                let columns = p.parse_comma_separated("CTE column list", |p| p.parse_name_part())?;
                p.expect(TokenType::RParen)?;
                columns
            } else {
                Vec::new()
            };
            p.expect(TokenType::As)?;
            p.expect(TokenType::LParen)?;
            let query = p.parse_query()?;
            p.expect(TokenType::RParen)?;
            Ok(WithSubQuery {
                name,
                columns,
                query,
                dialect: p.tag(),
            })
        })
    }

    /// Parse a `SELECT` block or a parenthesized query
    fn parse_primary_select(&mut self) -> Result<Expression> {
        if self.match_token(TokenType::LParen) {
            let query = self.parse_query()?;
            self.expect(TokenType::RParen)?;
            return Ok(Expression::Select(Box::new(Select {
                query,
                alias: None,
                dialect: self.tag(),
            })));
        }

        self.expect(TokenType::Select)?;

        let mut query = SelectQuery {
            dialect: self.tag(),
            ..SelectQuery::default()
        };

        query.hints = self.parse_comment_hints();

        query.option = if self.match_token(TokenType::All) {
            Some(ResultSetOption::All)
        } else if self.match_token(TokenType::Distinct) {
            Some(ResultSetOption::Distinct)
        } else if self.match_token(TokenType::Unique) {
            Some(ResultSetOption::Unique)
        } else {
            None
        };

        if self.check(TokenType::Top) {
            query.top = Some(self.parse_top()?);
        }

        query.columns = self.parse_comma_separated("select list", |p| p.parse_select_item())?;

        if self.is_dialect(DialectType::SqlServer) && self.match_token(TokenType::Into) {
            query.into = Some(self.parse_table_name()?);
        }

        if self.match_token(TokenType::From) {
            query.from = Some(self.parse_table_source()?);
        }

        if self.match_token(TokenType::Where) {
            query.where_clause = Some(self.parse_expression()?);
        }

        if self.check(TokenType::Start) || self.check(TokenType::Connect) {
            query.connect_by = Some(self.parse_connect_by()?);
        }

        if self.match_token(TokenType::Group) {
            query.group_by = Some(self.parse_group_by()?);
        }

        if query.connect_by.is_none()
            && (self.check(TokenType::Start) || self.check(TokenType::Connect))
        {
            query.connect_by = Some(self.parse_connect_by()?);
        }

        if self.match_token(TokenType::Order) {
            query.order_by = Some(self.parse_order_by()?);
        }

        query.limit = self.parse_limit()?;

        Ok(Expression::SelectQuery(Box::new(query)))
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        let body = self.parse_expression()?;
        let alias = self.parse_alias()?;
        Ok(SelectItem {
            body,
            alias,
            dialect: self.tag(),
        })
    }

    /// Collect consecutive `/*+ ... */` hint tokens
    fn parse_comment_hints(&mut self) -> Vec<Hint> {
        let mut hints = Vec::new();
        while self.check(TokenType::Hint) {
            let token = self.advance();
            hints.push(Hint {
                body: Expression::String(StringLiteral {
                    value: token.text,
                    is_national: false,
                    dialect: self.tag(),
                }),
                dialect: self.tag(),
            });
        }
        hints
    }

    /// `TOP n | TOP (expr) [PERCENT] [WITH TIES]`
    fn parse_top(&mut self) -> Result<Top> {
        self.expect(TokenType::Top)?;
        let count = if self.match_token(TokenType::LParen) {
            let count = self.parse_expression()?;
            self.expect(TokenType::RParen)?;
            count
        } else {
            let token = self.expect(TokenType::Number)?;
            self.number(token.text)
        };
        let percent = self.match_word("PERCENT");
        let with_ties = if self.check(TokenType::With) && self.check_next_word("TIES") {
            self.advance();
            self.advance();
            true
        } else {
            false
        };
        Ok(Top {
            count,
            percent,
            with_ties,
            dialect: self.tag(),
        })
    }

    /// `GROUP BY items [HAVING cond]`, after `GROUP`
    fn parse_group_by(&mut self) -> Result<GroupBy> {
        self.expect(TokenType::By)?;
        let items = self.parse_comma_separated("GROUP BY", |p| p.parse_expression())?;
        let having = if self.match_token(TokenType::Having) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(GroupBy {
            items,
            having,
            dialect: self.tag(),
        })
    }

    /// `ORDER [SIBLINGS] BY items`, after `ORDER`
    fn parse_order_by(&mut self) -> Result<OrderBy> {
        let siblings = self.match_token(TokenType::Siblings);
        self.expect(TokenType::By)?;
        let items = self.parse_order_by_items()?;
        Ok(OrderBy {
            items,
            siblings,
            dialect: self.tag(),
        })
    }

    fn parse_order_by_items(&mut self) -> Result<Vec<OrderByItem>> {
        self.parse_comma_separated("ORDER BY", |p| {
            let expr = p.parse_expression()?;
            let order = if p.match_token(TokenType::Asc) {
                Some(SortOrder::Asc)
            } else if p.match_token(TokenType::Desc) {
                Some(SortOrder::Desc)
            } else {
                None
            };
            let nulls = if p.match_word("NULLS") {
                if p.match_word("FIRST") {
                    Some(NullsOrder::First)
                } else if p.match_word("LAST") {
                    Some(NullsOrder::Last)
                } else {
                    return Err(p.error_here(format!(
                        "Expected FIRST or LAST after NULLS, got {}",
                        p.describe_current()
                    )));
                }
            } else {
                None
            };
            Ok(OrderByItem {
                expr,
                order,
                nulls,
                dialect: p.tag(),
            })
        })
    }

    /// Oracle `[START WITH cond] CONNECT BY [NOCYCLE] [PRIOR] cond [START WITH cond]`
    fn parse_connect_by(&mut self) -> Result<ConnectBy> {
        let mut start_with = self.parse_start_with()?;
        self.expect(TokenType::Connect)?;
        self.expect(TokenType::By)?;
        let nocycle = self.match_token(TokenType::NoCycle);
        let prior = self.match_token(TokenType::Prior);
        let condition = self.parse_expression()?;
        if start_with.is_none() {
            start_with = self.parse_start_with()?;
        }
        Ok(ConnectBy {
            start_with,
            condition,
            nocycle,
            prior,
            dialect: self.tag(),
        })
    }

    fn parse_start_with(&mut self) -> Result<Option<Expression>> {
        if !self.match_token(TokenType::Start) {
            return Ok(None);
        }
        self.expect(TokenType::With)?;
        Ok(Some(self.parse_expression()?))
    }

    // ========================================================================
    // LIMIT / OFFSET / FETCH
    // ========================================================================

    fn parse_limit(&mut self) -> Result<Option<Limit>> {
        let (offset, row_count) = match self.config.limit_style {
            Some(LimitStyle::LimitOffset) => self.parse_limit_offset()?,
            Some(LimitStyle::OffsetFetch) => self.parse_offset_fetch()?,
            Some(LimitStyle::FetchFirst) => self.parse_fetch_first()?,
            Some(LimitStyle::PostgresLimit) => self.parse_postgres_limit()?,
            None => (None, None),
        };

        if offset.is_none() && row_count.is_none() {
            return Ok(None);
        }
        Ok(Some(Limit {
            offset,
            row_count,
            dialect: self.tag(),
        }))
    }

    /// MySQL/SQLite: `LIMIT offset, count` or `LIMIT count [OFFSET offset]`
    fn parse_limit_offset(&mut self) -> Result<(Option<Expression>, Option<Expression>)> {
        if !self.match_token(TokenType::Limit) {
            return Ok((None, None));
        }
        let first = self.parse_additive()?;
        if self.match_token(TokenType::Comma) {
            let count = self.parse_additive()?;
            return Ok((Some(first), Some(count)));
        }
        if self.match_word("OFFSET") {
            let offset = self.parse_additive()?;
            return Ok((Some(offset), Some(first)));
        }
        Ok((None, Some(first)))
    }

    /// SQL Server: `OFFSET n ROWS [FETCH NEXT|FIRST m ROWS ONLY]`
    fn parse_offset_fetch(&mut self) -> Result<(Option<Expression>, Option<Expression>)> {
        if !self.match_token(TokenType::Offset) {
            return Ok((None, None));
        }
        let offset = self.parse_additive()?;
        self.expect_rows()?;

        let mut row_count = None;
        if self.match_token(TokenType::Fetch) {
            if !(self.match_token(TokenType::Next) || self.match_word("FIRST")) {
                return Err(self.error_here(format!(
                    "Expected NEXT or FIRST after FETCH, got {}",
                    self.describe_current()
                )));
            }
            row_count = Some(self.parse_additive()?);
            self.expect_rows()?;
            self.expect(TokenType::Only)?;
        }
        Ok((Some(offset), row_count))
    }

    /// Oracle: `[OFFSET n ROWS] [FETCH FIRST|NEXT m ROWS ONLY]`
    fn parse_fetch_first(&mut self) -> Result<(Option<Expression>, Option<Expression>)> {
        let mut offset = None;
        if self.match_word("OFFSET") {
            offset = Some(self.parse_additive()?);
            self.expect_rows()?;
        }

        let mut row_count = None;
        if self.match_token(TokenType::Fetch) {
            if !(self.match_token(TokenType::First) || self.match_word("NEXT")) {
                return Err(self.error_here(format!(
                    "Expected FIRST or NEXT after FETCH, got {}",
                    self.describe_current()
                )));
            }
            row_count = Some(self.parse_additive()?);
            self.expect_rows()?;
            self.expect(TokenType::Only)?;
        }
        Ok((offset, row_count))
    }

    /// PostgreSQL: `LIMIT n` and `OFFSET m [ROWS]` in either order
    fn parse_postgres_limit(&mut self) -> Result<(Option<Expression>, Option<Expression>)> {
        let mut offset = None;
        let mut row_count = None;
        loop {
            if row_count.is_none() && self.match_token(TokenType::Limit) {
                if !self.match_token(TokenType::All) {
                    row_count = Some(self.parse_additive()?);
                }
            } else if offset.is_none() && self.match_token(TokenType::Offset) {
                offset = Some(self.parse_additive()?);
                if !self.match_word("ROWS") {
                    self.match_word("ROW");
                }
            } else {
                break;
            }
        }
        Ok((offset, row_count))
    }

    fn expect_rows(&mut self) -> Result<()> {
        if self.match_token(TokenType::Rows) || self.match_word("ROW") {
            Ok(())
        } else {
            Err(self.error_here(format!(
                "Expected ROWS, got {}",
                self.describe_current()
            )))
        }
    }

    // ========================================================================
    // Table sources
    // ========================================================================

    /// Parse a left-deep join tree
    fn parse_table_source(&mut self) -> Result<Expression> {
        let mut left = self.parse_table_factor()?;
        let mut iterations = 0;

        loop {
            iterations += 1;
            self.check_iterations("FROM", iterations)?;

            if self.match_token(TokenType::Comma) {
                let right = self.parse_table_factor()?;
                left = self.join(left, right, JoinKind::Inner, None, true);
                continue;
            }

            if self.match_token(TokenType::Cross) {
                self.expect(TokenType::Join)?;
                let right = self.parse_table_factor()?;
                left = self.join(left, right, JoinKind::Cross, None, false);
                continue;
            }

            let kind = match self.peek().map(|t| t.token_type) {
                Some(TokenType::Join) => JoinKind::Inner,
                Some(TokenType::Inner) => {
                    self.advance();
                    JoinKind::Inner
                }
                Some(TokenType::Left) => {
                    self.advance();
                    self.match_token(TokenType::Outer);
                    JoinKind::Left
                }
                Some(TokenType::Right) => {
                    self.advance();
                    self.match_token(TokenType::Outer);
                    JoinKind::Right
                }
                Some(TokenType::Full) => {
                    self.advance();
                    self.match_token(TokenType::Outer);
                    JoinKind::Full
                }
                _ => break,
            };

            self.expect(TokenType::Join)?;
            let right = self.parse_table_factor()?;
            self.expect(TokenType::On)?;
            let on = self.parse_expression()?;
            left = self.join(left, right, kind, Some(on), false);
        }

        Ok(left)
    }

    fn join(
        &self,
        left: Expression,
        right: Expression,
        kind: JoinKind,
        on: Option<Expression>,
        is_comma_join: bool,
    ) -> Expression {
        Expression::JoinTable(Box::new(JoinTable {
            left,
            right,
            kind,
            on,
            is_comma_join,
            dialect: self.tag(),
        }))
    }

    /// A single source: table, derived table, nested join or table function,
    /// optionally followed by PIVOT
    fn parse_table_factor(&mut self) -> Result<Expression> {
        self.enter()?;
        let source = self.parse_table_factor_inner();
        self.exit();
        source
    }

    fn parse_table_factor_inner(&mut self) -> Result<Expression> {
        let mut source = if self.check(TokenType::LParen) {
            if self.query_at(self.current + 1) {
                self.advance();
                let query = self.parse_query()?;
                self.expect(TokenType::RParen)?;
                let alias = self.parse_alias()?;
                Expression::Select(Box::new(Select {
                    query,
                    alias,
                    dialect: self.tag(),
                }))
            } else {
                self.advance();
                let inner = self.parse_table_source()?;
                self.expect(TokenType::RParen)?;
                inner
            }
        } else {
            self.parse_named_source()?
        };

        while self.check(TokenType::Pivot) {
            source = self.parse_pivot(source)?;
        }
        Ok(source)
    }

    /// `[db.][schema.]name[@link] [AS alias] [WITH (hints)]` or `[owner.]func(args) [AS alias]`
    fn parse_named_source(&mut self) -> Result<Expression> {
        if !self.check_name_start() {
            return Err(self.error_here(format!(
                "Expected table name, got {}",
                self.describe_current()
            )));
        }

        let mut parts = vec![self.parse_name_part()?];
        while self.match_token(TokenType::Dot) {
            parts.push(self.parse_name_part()?);
        }

        if self.check(TokenType::LParen) {
            let name = pop_last(&mut parts)?;
            let function = self.parse_function_call(parts, name)?;
            let alias = self.parse_alias()?;
            return Ok(Expression::ReferenceTable(Box::new(ReferenceTable {
                function,
                alias,
                dialect: self.tag(),
            })));
        }

        let mut table = self.table_from_parts(parts)?;

        if self.is_dialect(DialectType::Oracle) && self.match_token(TokenType::At) {
            let mut link = self.parse_name_part()?;
            while self.match_token(TokenType::Dot) {
                let next = self.parse_name_part()?;
                link.value = format!("{}.{}", link.value, next.value);
            }
            table.db_link = Some(link);
        }

        table.alias = self.parse_alias()?;

        if self.is_dialect(DialectType::SqlServer)
            && self.check(TokenType::With)
            && self.check_next(TokenType::LParen)
        {
            self.advance();
            self.advance();
            let hints = self.parse_comma_separated("table hints", |p| p.parse_unit())?;
            self.expect(TokenType::RParen)?;
            table.hints = hints
                .into_iter()
                .map(|body| Hint {
                    body,
                    dialect: self.tag(),
                })
                .collect();
        }

        Ok(Expression::Table(Box::new(table)))
    }

    /// Plain qualified table name, no alias (INSERT/INTO targets)
    fn parse_table_name(&mut self) -> Result<Expression> {
        if !self.check_name_start() {
            return Err(self.error_here(format!(
                "Expected table name, got {}",
                self.describe_current()
            )));
        }
        let mut parts = vec![self.parse_name_part()?];
        while self.match_token(TokenType::Dot) {
            parts.push(self.parse_name_part()?);
        }
        Ok(Expression::Table(Box::new(self.table_from_parts(parts)?)))
    }

    fn table_from_parts(&self, mut parts: Vec<Identifier>) -> Result<Table> {
        if parts.len() > 3 {
            return Err(self.error_here(format!(
                "Table name has too many qualifiers: {}",
                parts
                    .iter()
                    .map(|p| p.value.as_str())
                    .collect::<Vec<_>>()
                    .join(".")
            )));
        }
        let name = pop_last(&mut parts)?;
        let schema = parts.pop();
        let database = parts.pop();
        Ok(Table {
            database,
            schema,
            name,
            db_link: None,
            alias: None,
            hints: Vec::new(),
            dialect: self.tag(),
        })
    }

    /// `source PIVOT (agg(x) FOR col IN (v [AS a], ...)) [AS] alias`
    fn parse_pivot(&mut self, source: Expression) -> Result<Expression> {
        self.expect(TokenType::Pivot)?;
        self.expect(TokenType::LParen)?;

        let name = self.parse_name_part()?;
        let aggregate = self.parse_function_call(Vec::new(), name)?;

        if !self.match_word("FOR") {
            return Err(self.error_here(format!(
                "Expected FOR in PIVOT, got {}",
                self.describe_current()
            )));
        }
        let pivot_column = self.parse_additive()?;

        self.expect(TokenType::In)?;
        self.expect(TokenType::LParen)?;
        let pivot_values = self.parse_comma_separated("PIVOT values", |p| p.parse_select_item())?;
        self.expect(TokenType::RParen)?;
        self.expect(TokenType::RParen)?;

        let alias = self.parse_alias()?;
        Ok(Expression::PivotTable(Box::new(PivotTable {
            source,
            aggregate,
            pivot_column,
            pivot_values,
            alias,
            dialect: self.tag(),
        })))
    }

    /// Optional alias. `AS` is optional; a bare identifier is taken as the
    /// alias unless it is a keyword or a clause word.
    fn parse_alias(&mut self) -> Result<Option<Identifier>> {
        if self.match_token(TokenType::As) {
            let token = match self.peek() {
                Some(t) if t.is_word() || t.token_type == TokenType::QuotedIdentifier => {
                    self.advance()
                }
                Some(t) if t.token_type == TokenType::String => self.advance(),
                _ => {
                    return Err(self.error_here(format!(
                        "Expected alias after AS, got {}",
                        self.describe_current()
                    )))
                }
            };
            return Ok(Some(self.identifier_from(&token)));
        }

        let is_alias = match self.peek() {
            Some(t) if t.token_type == TokenType::QuotedIdentifier => true,
            Some(t) if t.token_type == TokenType::Identifier => !NON_ALIAS_WORDS
                .iter()
                .any(|w| t.text.eq_ignore_ascii_case(w)),
            _ => false,
        };
        if is_alias {
            let token = self.advance();
            return Ok(Some(self.identifier_from(&token)));
        }
        Ok(None)
    }

    // ========================================================================
    // DML
    // ========================================================================

    fn parse_insert(&mut self) -> Result<Expression> {
        self.expect(TokenType::Insert)?;
        let hints = self.parse_comment_hints();
        self.match_token(TokenType::Into);
        let table = self.parse_table_name()?;

        let mut columns = Vec::new();
        if self.check(TokenType::LParen) && !self.query_at(self.current + 1) {
            self.advance();
            columns = self.parse_comma_separated("INSERT column list", |p| p.parse_name_part())?;
            self.expect(TokenType::RParen)?;
        }

        let mut values = Vec::new();
        let mut query = None;
        if self.match_token(TokenType::Values) {
            values = self.parse_comma_separated("VALUES", |p| {
                p.expect(TokenType::LParen)?;
                let row = p.parse_comma_separated("VALUES row", |p| p.parse_expression())?;
                p.expect(TokenType::RParen)?;
                Ok(row)
            })?;
        } else if self.check(TokenType::Select)
            || self.check(TokenType::With)
            || self.check(TokenType::LParen)
        {
            let inner = self.parse_query()?;
            query = Some(Expression::Select(Box::new(Select {
                query: inner,
                alias: None,
                dialect: self.tag(),
            })));
        } else {
            return Err(self.error_here(format!(
                "Expected VALUES or SELECT, got {}",
                self.describe_current()
            )));
        }

        Ok(Expression::Insert(Box::new(Insert {
            hints,
            table,
            columns,
            values,
            query,
            dialect: self.tag(),
        })))
    }

    fn parse_update(&mut self) -> Result<Expression> {
        self.expect(TokenType::Update)?;
        let hints = self.parse_comment_hints();
        let table = self.parse_table_factor()?;
        self.expect(TokenType::Set)?;

        let set = self.parse_comma_separated("SET", |p| {
            let target = p.parse_unit()?;
            p.expect(TokenType::Eq)?;
            let value = p.parse_expression()?;
            Ok(p.binary(target, BinaryOperator::Equal, value))
        })?;

        let from = if self.match_token(TokenType::From) {
            Some(self.parse_table_source()?)
        } else {
            None
        };
        let where_clause = if self.match_token(TokenType::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Expression::Update(Box::new(Update {
            hints,
            table,
            set,
            from,
            where_clause,
            dialect: self.tag(),
        })))
    }

    fn parse_delete(&mut self) -> Result<Expression> {
        self.expect(TokenType::Delete)?;
        let hints = self.parse_comment_hints();

        let (table, from) = if self.match_token(TokenType::From) {
            (self.parse_table_factor()?, None)
        } else {
            let table = self.parse_table_factor()?;
            let from = if self.match_token(TokenType::From) {
                Some(self.parse_table_source()?)
            } else {
                None
            };
            (table, from)
        };

        let where_clause = if self.match_token(TokenType::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Expression::Delete(Box::new(Delete {
            hints,
            table,
            from,
            where_clause,
            dialect: self.tag(),
        })))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Parse a full expression (lowest precedence: `OR`)
    pub fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_xor()?;
        while self.match_token(TokenType::Or) {
            let right = self.parse_xor()?;
            left = self.binary(left, BinaryOperator::Or, right);
        }
        Ok(left)
    }

    fn parse_xor(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;
        while self.match_token(TokenType::Xor) {
            let right = self.parse_and()?;
            left = self.binary(left, BinaryOperator::Xor, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_not()?;
        while self.match_token(TokenType::And) {
            let right = self.parse_not()?;
            left = self.binary(left, BinaryOperator::And, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expression> {
        if self.match_token(TokenType::Not) {
            self.enter()?;
            let expr = self.parse_not();
            self.exit();
            return Ok(Expression::Not(Box::new(Not {
                expr: expr?,
                dialect: self.tag(),
            })));
        }
        self.parse_relational()
    }

    /// Comparisons chain; `IS`, `BETWEEN`, `IN` and regex matches are one-shot
    fn parse_relational(&mut self) -> Result<Expression> {
        let mut left = self.parse_additive()?;

        loop {
            let Some(token_type) = self.peek().map(|t| t.token_type) else {
                break;
            };

            if let Some(op) = comparison_operator(token_type) {
                self.advance();
                let right = self.parse_additive()?;
                left = self.binary(left, op, right);
                continue;
            }

            if token_type == TokenType::Is {
                self.advance();
                let op = if self.match_token(TokenType::Not) {
                    BinaryOperator::IsNot
                } else {
                    BinaryOperator::Is
                };
                let right = match self.peek().map(|t| t.token_type) {
                    Some(TokenType::Null) => {
                        self.advance();
                        self.null()
                    }
                    Some(TokenType::True) => {
                        self.advance();
                        self.boolean(true)
                    }
                    Some(TokenType::False) => {
                        self.advance();
                        self.boolean(false)
                    }
                    _ => {
                        return Err(self.error_here(format!(
                            "Expected NULL after IS, got {}",
                            self.describe_current()
                        )))
                    }
                };
                return Ok(self.binary(left, op, right));
            }

            if let Some((case_insensitive, not)) = pg_regex_operator(token_type) {
                self.advance();
                let pattern = self.parse_additive()?;
                return Ok(self.regex(left, pattern, case_insensitive, not));
            }

            let not = self.check(TokenType::Not)
                && matches!(
                    self.peek_nth(1).map(|t| t.token_type),
                    Some(
                        TokenType::Between
                            | TokenType::In
                            | TokenType::Like
                            | TokenType::ILike
                            | TokenType::Regexp
                    )
                );
            if not {
                self.advance();
            }

            match self.peek().map(|t| t.token_type) {
                Some(TokenType::Like) => {
                    self.advance();
                    let right = self.parse_additive()?;
                    let op = if not {
                        BinaryOperator::NotLike
                    } else {
                        BinaryOperator::Like
                    };
                    left = self.binary(left, op, right);
                }
                Some(TokenType::ILike) => {
                    self.advance();
                    let right = self.parse_additive()?;
                    let op = if not {
                        BinaryOperator::NotILike
                    } else {
                        BinaryOperator::ILike
                    };
                    left = self.binary(left, op, right);
                }
                Some(TokenType::Between) => {
                    self.advance();
                    let low = self.parse_additive()?;
                    self.expect(TokenType::And)?;
                    let high = self.parse_additive()?;
                    return Ok(Expression::BetweenAnd(Box::new(BetweenAnd {
                        expr: left,
                        low,
                        high,
                        not,
                        dialect: self.tag(),
                    })));
                }
                Some(TokenType::In) => {
                    self.advance();
                    return self.parse_in(left, not);
                }
                Some(TokenType::Regexp) => {
                    self.advance();
                    let pattern = self.parse_additive()?;
                    return Ok(self.regex(left, pattern, false, not));
                }
                _ => break,
            }
        }

        Ok(left)
    }

    /// `IN (list)` or `IN (subselect)`, after `IN`
    fn parse_in(&mut self, expr: Expression, not: bool) -> Result<Expression> {
        self.expect(TokenType::LParen)?;

        let (targets, query) = if self.query_at(self.current) {
            let inner = self.parse_query()?;
            (Vec::new(), Some(self.sub_select(inner)))
        } else {
            let targets = self.parse_comma_separated("IN list", |p| p.parse_additive())?;
            (targets, None)
        };

        self.expect(TokenType::RParen)?;
        Ok(Expression::In(Box::new(In {
            expr,
            targets,
            query,
            not,
            dialect: self.tag(),
        })))
    }

    /// `+ - || & | ^`
    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().map(|t| t.token_type) {
                Some(TokenType::Plus) => BinaryOperator::Add,
                Some(TokenType::Dash) => BinaryOperator::Sub,
                Some(TokenType::DPipe) => BinaryOperator::Concat,
                Some(TokenType::Amp) => BinaryOperator::BitwiseAnd,
                Some(TokenType::Pipe) => BinaryOperator::BitwiseOr,
                Some(TokenType::Caret) => BinaryOperator::BitwiseXor,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(left, op, right);
        }
        Ok(left)
    }

    /// `* / %`
    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().map(|t| t.token_type) {
                Some(TokenType::Star) => BinaryOperator::Mul,
                Some(TokenType::Slash) => BinaryOperator::Div,
                Some(TokenType::Percent) => BinaryOperator::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(left, op, right);
        }
        Ok(left)
    }

    /// Unary `-`/`+` and postfix operators; every nesting level of an
    /// expression passes through here.
    fn parse_unary(&mut self) -> Result<Expression> {
        self.enter()?;
        let expr = self.parse_signed();
        self.exit();
        expr
    }

    /// Minus before a numeric literal folds into the literal (`-5`); before
    /// anything else it becomes a `Negate` node.
    fn parse_signed(&mut self) -> Result<Expression> {
        while self.match_token(TokenType::Plus) {}

        if self.match_token(TokenType::Dash) {
            if self.check(TokenType::Number) {
                let token = self.advance();
                return Ok(self.number(format!("-{}", token.text)));
            }
            let expr = self.parse_unary()?;
            return Ok(Expression::Negate(Box::new(Negate {
                expr,
                dialect: self.tag(),
            })));
        }

        let unit = self.parse_unit()?;
        self.parse_postfix(unit)
    }

    /// `[i]`, `[i:j]`, `AT TIME ZONE z`, `COLLATE name`
    fn parse_postfix(&mut self, mut expr: Expression) -> Result<Expression> {
        loop {
            if self.match_token(TokenType::LBracket) {
                expr = self.parse_subscript(expr)?;
            } else if self.check_word("AT") && self.check_next_word("TIME") {
                self.advance();
                self.advance();
                if !self.match_word("ZONE") {
                    return Err(self.error_here(format!(
                        "Expected ZONE after AT TIME, got {}",
                        self.describe_current()
                    )));
                }
                let zone = self.parse_unit()?;
                expr = Expression::AtTimeZone(Box::new(AtTimeZone {
                    expr,
                    zone,
                    dialect: self.tag(),
                }));
            } else if self.match_token(TokenType::Collate) {
                let collate = self.parse_collate()?;
                match &mut expr {
                    Expression::Identifier(id) => id.collate = Some(collate),
                    Expression::Property(prop) => prop.collate = Some(collate),
                    _ => {
                        return Err(Error::unsupported(
                            format!("COLLATE on {}", expr.kind()),
                            self.dialect_name(),
                        ))
                    }
                }
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_subscript(&mut self, array: Expression) -> Result<Expression> {
        let lower = if self.check(TokenType::Colon) {
            None
        } else {
            Some(self.parse_additive()?)
        };

        if self.match_token(TokenType::Colon) {
            let upper = if self.check(TokenType::RBracket) {
                None
            } else {
                Some(self.parse_additive()?)
            };
            self.expect(TokenType::RBracket)?;
            return Ok(Expression::ArraySlice(Box::new(ArraySlice {
                array,
                lower,
                upper,
                dialect: self.tag(),
            })));
        }

        self.expect(TokenType::RBracket)?;
        let index = match lower {
            Some(index) => index,
            None => return Err(self.error_here("Expected array index")),
        };
        Ok(Expression::ArrayIndex(Box::new(ArrayIndex {
            array,
            index,
            dialect: self.tag(),
        })))
    }

    fn parse_collate(&mut self) -> Result<Collate> {
        let name = match self.peek() {
            Some(t)
                if t.is_word()
                    || t.token_type == TokenType::QuotedIdentifier
                    || t.token_type == TokenType::String =>
            {
                self.advance().text
            }
            _ => {
                return Err(self.error_here(format!(
                    "Expected collation name, got {}",
                    self.describe_current()
                )))
            }
        };
        Ok(Collate {
            name,
            dialect: self.tag(),
        })
    }

    /// Base unit of an expression
    fn parse_unit(&mut self) -> Result<Expression> {
        let token_type = match self.peek() {
            Some(token) => token.token_type,
            None => return Err(self.error_here("Expected expression, got end of input")),
        };

        match token_type {
            TokenType::LParen => {
                self.advance();
                if self.query_at(self.current) {
                    let inner = self.parse_query()?;
                    self.expect(TokenType::RParen)?;
                    Ok(self.sub_select(inner))
                } else {
                    let expr = self.parse_expression()?;
                    self.expect(TokenType::RParen)?;
                    Ok(expr)
                }
            }
            TokenType::Number => {
                let token = self.advance();
                Ok(self.number(token.text))
            }
            TokenType::String | TokenType::NationalString => {
                let token = self.advance();
                Ok(Expression::String(StringLiteral {
                    value: token.text,
                    is_national: token_type == TokenType::NationalString,
                    dialect: self.tag(),
                }))
            }
            TokenType::Null => {
                self.advance();
                Ok(self.null())
            }
            TokenType::True | TokenType::False => {
                self.advance();
                Ok(self.boolean(token_type == TokenType::True))
            }
            TokenType::Star => {
                self.advance();
                Ok(Expression::AllColumns(Box::new(AllColumns {
                    owner: Vec::new(),
                    dialect: self.tag(),
                })))
            }
            TokenType::Not => {
                self.advance();
                let expr = self.parse_not()?;
                Ok(Expression::Not(Box::new(Not {
                    expr,
                    dialect: self.tag(),
                })))
            }
            TokenType::Case => self.parse_case(),
            TokenType::Exists => {
                self.advance();
                let query = self.parse_parenthesized_query()?;
                Ok(Expression::Exists(Box::new(Exists {
                    query,
                    dialect: self.tag(),
                })))
            }
            TokenType::Any if self.check_next(TokenType::LParen) => {
                self.advance();
                let query = self.parse_quantified_operand()?;
                Ok(Expression::Any(Box::new(Any {
                    query,
                    dialect: self.tag(),
                })))
            }
            TokenType::All if self.check_next(TokenType::LParen) => {
                self.advance();
                let query = self.parse_quantified_operand()?;
                Ok(Expression::All(Box::new(All {
                    query,
                    dialect: self.tag(),
                })))
            }
            TokenType::At | TokenType::Colon => self.parse_variable(),
            TokenType::Array if self.check_next(TokenType::LBracket) => self.parse_array(),
            TokenType::Interval => self.parse_interval(),
            TokenType::Left | TokenType::Right if self.check_next(TokenType::LParen) => {
                self.parse_identifier_path()
            }
            _ if self.check_name_start() => self.parse_identifier_path(),
            _ => Err(self.error_here(format!(
                "Unexpected {} in expression",
                self.describe_current()
            ))),
        }
    }

    /// `(query)` for EXISTS
    fn parse_parenthesized_query(&mut self) -> Result<Expression> {
        self.expect(TokenType::LParen)?;
        let inner = self.parse_query()?;
        self.expect(TokenType::RParen)?;
        Ok(self.sub_select(inner))
    }

    /// `(query)` or, for PostgreSQL arrays, `(expr)` after ANY/ALL
    fn parse_quantified_operand(&mut self) -> Result<Expression> {
        if self.query_at(self.current + 1) {
            return self.parse_parenthesized_query();
        }
        self.expect(TokenType::LParen)?;
        let expr = self.parse_expression()?;
        self.expect(TokenType::RParen)?;
        Ok(expr)
    }

    /// Name path: identifier, property, `owner.*`, or function call
    fn parse_identifier_path(&mut self) -> Result<Expression> {
        let mut parts = vec![self.parse_name_part()?];

        while self.check(TokenType::Dot) {
            if self.check_next(TokenType::Star) {
                self.advance();
                self.advance();
                return Ok(Expression::AllColumns(Box::new(AllColumns {
                    owner: parts,
                    dialect: self.tag(),
                })));
            }
            self.advance();
            parts.push(self.parse_name_part()?);
        }

        if self.check(TokenType::LParen) {
            let name = pop_last(&mut parts)?;
            let call = self.parse_function_call(parts, name)?;
            return Ok(Expression::FunctionCall(Box::new(call)));
        }

        match parts.len() {
            1 => Ok(Expression::Identifier(pop_last(&mut parts)?)),
            2 | 3 => {
                let name = pop_last(&mut parts)?;
                let table = pop_last(&mut parts)?;
                let schema = parts.pop();
                Ok(Expression::Property(Box::new(Property {
                    schema,
                    table,
                    name,
                    collate: None,
                    dialect: self.tag(),
                })))
            }
            _ => Err(self.error_here(format!(
                "Column reference has too many qualifiers: {}",
                parts
                    .iter()
                    .map(|p| p.value.as_str())
                    .collect::<Vec<_>>()
                    .join(".")
            ))),
        }
    }

    /// `name([DISTINCT] args) [WITHIN GROUP (ORDER BY ...)] [OVER (...)]`
    fn parse_function_call(&mut self, owner: Vec<Identifier>, name: Identifier) -> Result<FunctionCall> {
        self.expect(TokenType::LParen)?;
        let distinct = self.match_token(TokenType::Distinct);
        let arguments = if self.check(TokenType::RParen) {
            Vec::new()
        } else {
            self.parse_comma_separated("function arguments", |p| p.parse_expression())?
        };
        self.expect(TokenType::RParen)?;

        let within_group = if self.check_word("WITHIN") && self.check_next(TokenType::Group) {
            self.advance();
            self.advance();
            self.expect(TokenType::LParen)?;
            self.expect(TokenType::Order)?;
            let order_by = self.parse_order_by()?;
            self.expect(TokenType::RParen)?;
            Some(WithinGroup {
                order_by,
                dialect: self.tag(),
            })
        } else {
            None
        };

        let over = if self.match_token(TokenType::Over) {
            Some(self.parse_over()?)
        } else {
            None
        };

        Ok(FunctionCall {
            owner,
            name,
            distinct,
            arguments,
            within_group,
            over,
            dialect: self.tag(),
        })
    }

    /// `([PARTITION BY ...] [ORDER BY ...])`, after `OVER`
    fn parse_over(&mut self) -> Result<Over> {
        self.expect(TokenType::LParen)?;

        let partition_by = if self.match_token(TokenType::Partition) {
            self.expect(TokenType::By)?;
            let items = self.parse_comma_separated("PARTITION BY", |p| p.parse_expression())?;
            Some(PartitionBy {
                items,
                dialect: self.tag(),
            })
        } else {
            None
        };

        let order_by = if self.match_token(TokenType::Order) {
            Some(self.parse_order_by()?)
        } else {
            None
        };

        self.expect(TokenType::RParen)?;
        Ok(Over {
            partition_by,
            order_by,
            dialect: self.tag(),
        })
    }

    /// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`
    fn parse_case(&mut self) -> Result<Expression> {
        self.expect(TokenType::Case)?;

        let operand = if self.check(TokenType::When)
            || self.check(TokenType::Else)
            || self.check(TokenType::End)
        {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let mut items = Vec::new();
        while self.match_token(TokenType::When) {
            let when = self.parse_expression()?;
            self.expect(TokenType::Then)?;
            let then = self.parse_expression()?;
            items.push(CaseItem {
                when,
                then,
                dialect: self.tag(),
            });
            self.check_iterations("CASE", items.len())?;
        }
        if items.is_empty() {
            return Err(self.error_here(format!(
                "Expected WHEN in CASE, got {}",
                self.describe_current()
            )));
        }

        let else_ = if self.match_token(TokenType::Else) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenType::End)?;

        Ok(Expression::Case(Box::new(Case {
            operand,
            items,
            else_,
            dialect: self.tag(),
        })))
    }

    /// `@name`, `@@name`, `:name`, `:1`
    fn parse_variable(&mut self) -> Result<Expression> {
        let first = self.advance();
        let prefix = if first.token_type == TokenType::At && self.match_token(TokenType::At) {
            "@@"
        } else if first.token_type == TokenType::At {
            "@"
        } else {
            ":"
        };

        let name = match self.peek() {
            Some(t) if t.is_word() || t.token_type == TokenType::Number => self.advance().text,
            _ => {
                return Err(self.error_here(format!(
                    "Expected variable name after '{}', got {}",
                    prefix,
                    self.describe_current()
                )))
            }
        };

        Ok(Expression::Variable(Box::new(Variable {
            prefix: prefix.to_string(),
            name,
            dialect: self.tag(),
        })))
    }

    /// `ARRAY[e, ...]`
    fn parse_array(&mut self) -> Result<Expression> {
        self.expect(TokenType::Array)?;
        self.expect(TokenType::LBracket)?;
        let elements = if self.check(TokenType::RBracket) {
            Vec::new()
        } else {
            self.parse_comma_separated("ARRAY", |p| p.parse_expression())?
        };
        self.expect(TokenType::RBracket)?;
        Ok(Expression::Array(Box::new(ArrayLiteral {
            elements,
            dialect: self.tag(),
        })))
    }

    /// `INTERVAL value [unit]`
    fn parse_interval(&mut self) -> Result<Expression> {
        self.expect(TokenType::Interval)?;
        self.enter()?;
        let value = self.parse_unit();
        self.exit();
        let value = value?;

        let unit = match self.peek() {
            Some(t)
                if t.token_type == TokenType::Identifier
                    && TIME_UNITS
                        .iter()
                        .any(|u| t.text.eq_ignore_ascii_case(u)) =>
            {
                let token = self.advance();
                Some(TimeUnit {
                    unit: token.text.to_ascii_uppercase(),
                    dialect: self.tag(),
                })
            }
            _ => None,
        };

        Ok(Expression::Interval(Box::new(Interval {
            value,
            unit,
            dialect: self.tag(),
        })))
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Whether the current token can start a name
    fn check_name_start(&self) -> bool {
        match self.peek() {
            Some(t) => matches!(
                t.token_type,
                TokenType::Identifier | TokenType::QuotedIdentifier
            ) || is_name_keyword(t.token_type),
            None => false,
        }
    }

    /// One component of a dotted name. After the first component any word,
    /// keyword or not, is accepted.
    fn parse_name_part(&mut self) -> Result<Identifier> {
        let after_dot = self.current > 0
            && self.tokens[self.current - 1].token_type == TokenType::Dot;
        let accepted = match self.peek() {
            Some(t) => {
                matches!(
                    t.token_type,
                    TokenType::Identifier | TokenType::QuotedIdentifier
                ) || is_name_keyword(t.token_type)
                    || (after_dot && t.token_type.is_keyword())
                    || (matches!(t.token_type, TokenType::Left | TokenType::Right)
                        && self.check_next(TokenType::LParen))
            }
            None => false,
        };
        if !accepted {
            return Err(self.error_here(format!(
                "Expected identifier, got {}",
                self.describe_current()
            )));
        }
        let token = self.advance();
        Ok(self.identifier_from(&token))
    }

    fn identifier_from(&self, token: &Token) -> Identifier {
        let mut id = if token.token_type == TokenType::QuotedIdentifier {
            Identifier::escaped(token.text.clone())
        } else {
            Identifier::new(token.text.clone())
        };
        id.dialect = self.tag();
        id
    }

    // ========================================================================
    // Node helpers
    // ========================================================================

    fn tag(&self) -> DialectTag {
        DialectTag(self.config.dialect)
    }

    fn dialect_name(&self) -> String {
        self.config
            .dialect
            .map(|d| d.to_string())
            .unwrap_or_else(|| "generic".to_string())
    }

    fn is_dialect(&self, dialect: DialectType) -> bool {
        self.config.dialect == Some(dialect)
    }

    fn binary(&self, left: Expression, op: BinaryOperator, right: Expression) -> Expression {
        Expression::Binary(Box::new(BinaryExpression {
            left,
            op,
            right,
            dialect: self.tag(),
        }))
    }

    fn regex(&self, expr: Expression, pattern: Expression, case_insensitive: bool, not: bool) -> Expression {
        Expression::Regex(Box::new(Regex {
            expr,
            pattern,
            case_insensitive,
            not,
            dialect: self.tag(),
        }))
    }

    fn number(&self, value: String) -> Expression {
        Expression::Number(NumberLiteral {
            value,
            dialect: self.tag(),
        })
    }

    fn null(&self) -> Expression {
        Expression::Null(NullLiteral {
            dialect: self.tag(),
        })
    }

    fn boolean(&self, value: bool) -> Expression {
        Expression::Bool(BoolLiteral {
            value,
            dialect: self.tag(),
        })
    }

    fn sub_select(&self, query: Expression) -> Expression {
        Expression::Select(Box::new(Select {
            query,
            alias: None,
            dialect: self.tag(),
        }))
    }

    /// Parse `item {, item}` with the defensive iteration cap
    fn parse_comma_separated<T, F>(&mut self, construct: &str, mut item: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let mut items = Vec::new();
        loop {
            self.check_iterations(construct, items.len() + 1)?;
            items.push(item(self)?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        Ok(items)
    }

    fn check_iterations(&self, construct: &str, iterations: usize) -> Result<()> {
        if iterations > self.config.max_iterations {
            return Err(Error::parse(format!(
                "{} exceeded the maximum of {} iterations",
                construct, self.config.max_iterations
            )));
        }
        Ok(())
    }

    /// Enter one nesting level
    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.config.max_depth {
            return Err(Error::parse(format!(
                "expression nesting exceeded the maximum of {} levels",
                self.config.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Whether a query starts at `start`: `SELECT`, `WITH`, or a run of `(`
    /// leading to one where every parenthesized operand is followed by a set
    /// operator or `)`. Distinguishes `((SELECT ..) UNION (SELECT ..))` from
    /// `((SELECT ..) + 1)` and from nested joins.
    fn query_at(&self, start: usize) -> bool {
        let token_type = |pos: usize| self.tokens.get(pos).map(|t| t.token_type);

        let mut pos = start;
        while token_type(pos) == Some(TokenType::LParen) {
            pos += 1;
        }
        if !matches!(token_type(pos), Some(TokenType::Select | TokenType::With)) {
            return false;
        }

        let mut open = pos - start;
        let mut lowest = open;
        while open > 0 {
            pos += 1;
            match token_type(pos) {
                Some(TokenType::LParen) => open += 1,
                Some(TokenType::RParen) => {
                    open -= 1;
                    if open < lowest {
                        lowest = open;
                        let operand_ends = matches!(
                            token_type(pos + 1),
                            Some(
                                TokenType::Union
                                    | TokenType::Intersect
                                    | TokenType::Except
                                    | TokenType::Minus
                                    | TokenType::RParen
                            )
                        );
                        if !operand_ends {
                            return false;
                        }
                    }
                }
                Some(_) => {}
                None => return false,
            }
        }
        true
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    /// Look ahead by n positions (0 = current token)
    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.current + n)
    }

    /// Consume the current token. Callers check before advancing, so running
    /// past the end only happens on an internal bug and yields an empty token.
    fn advance(&mut self) -> Token {
        match self.tokens.get(self.current) {
            Some(token) => {
                let token = token.clone();
                self.current += 1;
                token
            }
            None => Token::new(TokenType::Semicolon, "", Default::default()),
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().map_or(false, |t| t.token_type == token_type)
    }

    fn check_next(&self, token_type: TokenType) -> bool {
        self.peek_nth(1).map_or(false, |t| t.token_type == token_type)
    }

    fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Whether the current token is the word `word` (identifier or keyword,
    /// case-insensitive). Used for contextual words that are not keywords in
    /// every dialect.
    fn check_word(&self, word: &str) -> bool {
        self.peek()
            .map_or(false, |t| t.is_word() && t.text.eq_ignore_ascii_case(word))
    }

    fn check_next_word(&self, word: &str) -> bool {
        self.peek_nth(1)
            .map_or(false, |t| t.is_word() && t.text.eq_ignore_ascii_case(word))
    }

    fn match_word(&mut self, word: &str) -> bool {
        if self.check_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token type
    fn expect(&mut self, token_type: TokenType) -> Result<Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!(
                "Expected {:?}, got {}",
                token_type,
                self.describe_current()
            )))
        }
    }

    fn describe_current(&self) -> String {
        match self.peek() {
            Some(t) => format!("{:?} '{}'", t.token_type, t.text),
            None => "end of input".to_string(),
        }
    }

    /// Syntax error positioned at the current token, or just past the last one
    fn error_here(&self, message: impl Into<String>) -> Error {
        let (line, column) = match self.peek() {
            Some(t) => (t.span.line, t.span.column),
            None => match self.tokens.last() {
                Some(t) => (t.span.line, t.span.column + (t.span.end - t.span.start)),
                None => (1, 1),
            },
        };
        Error::syntax(message, line, column)
    }
}

fn comparison_operator(token_type: TokenType) -> Option<BinaryOperator> {
    match token_type {
        TokenType::Eq => Some(BinaryOperator::Equal),
        TokenType::Neq => Some(BinaryOperator::NotEqual),
        TokenType::Lt => Some(BinaryOperator::Less),
        TokenType::Lte => Some(BinaryOperator::LessOrEqual),
        TokenType::Gt => Some(BinaryOperator::Greater),
        TokenType::Gte => Some(BinaryOperator::GreaterOrEqual),
        _ => None,
    }
}

/// `(case_insensitive, not)` for the PostgreSQL regex operators
fn pg_regex_operator(token_type: TokenType) -> Option<(bool, bool)> {
    match token_type {
        TokenType::Tilde => Some((false, false)),
        TokenType::TildeStar => Some((true, false)),
        TokenType::NotTilde => Some((false, true)),
        TokenType::NotTildeStar => Some((true, true)),
        _ => None,
    }
}

/// Keywords that double as ordinary names (`FROM dual`, a column named `first`)
fn is_name_keyword(token_type: TokenType) -> bool {
    matches!(
        token_type,
        TokenType::Dual
            | TokenType::First
            | TokenType::Next
            | TokenType::Only
            | TokenType::Rows
            | TokenType::Offset
            | TokenType::Siblings
            | TokenType::NoCycle
    )
}

fn pop_last(parts: &mut Vec<Identifier>) -> Result<Identifier> {
    parts
        .pop()
        .ok_or_else(|| Error::internal("empty name path"))
}

/// Bind CTEs to the root of a query chain
fn attach_ctes(query: &mut Expression, ctes: Vec<WithSubQuery>) -> Result<()> {
    match query {
        Expression::SelectQuery(q) => {
            q.with_sub_queries.splice(0..0, ctes);
            Ok(())
        }
        Expression::Union(u) => {
            u.with_sub_queries.splice(0..0, ctes);
            Ok(())
        }
        Expression::Select(s) => attach_ctes(&mut s.query, ctes),
        other => Err(Error::internal(format!(
            "cannot attach WITH clause to {}",
            other.kind()
        ))),
    }
}
