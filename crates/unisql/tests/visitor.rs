//! Visitor Tests
//!
//! A complete SQL renderer written against the public `Visitor` trait. Parsing
//! the rendered text again must give back an equal tree.

use unisql::expressions::*;
use unisql::{parse, DialectType, ExpressionWalk, Node, Visitor};

/// Renders a tree as PostgreSQL-flavoured SQL, fully parenthesized
struct Renderer;

impl Renderer {
    fn render(&mut self, node: &impl Node) -> String {
        node.accept(self)
    }

    fn list<T: Node>(&mut self, items: &[T]) -> String {
        items
            .iter()
            .map(|item| item.accept(self))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn alias(&mut self, alias: &Option<Identifier>) -> String {
        match alias {
            Some(a) => format!(" AS {}", a.accept(self)),
            None => String::new(),
        }
    }

    fn with(&mut self, ctes: &[WithSubQuery]) -> String {
        if ctes.is_empty() {
            String::new()
        } else {
            format!("WITH {} ", self.list(ctes))
        }
    }

    /// Sub-queries already render their parentheses; array operands do not
    fn quantified(&mut self, operand: &Expression) -> String {
        match operand {
            Expression::Select(_) => operand.accept(self),
            other => format!("({})", other.accept(self)),
        }
    }

    fn owner(owner: &[Identifier]) -> String {
        owner.iter().map(|o| format!("{}.", o.value)).collect()
    }

    fn assignment(&mut self, expr: &Expression) -> String {
        match expr {
            Expression::Binary(b) => format!("{} = {}", b.left.accept(self), b.right.accept(self)),
            other => other.accept(self),
        }
    }
}

impl Visitor for Renderer {
    type Output = String;

    fn visit_select(&mut self, node: &Select) -> String {
        format!("({}){}", node.query.accept(self), self.alias(&node.alias))
    }

    fn visit_select_query(&mut self, node: &SelectQuery) -> String {
        let mut sql = self.with(&node.with_sub_queries);
        sql.push_str("SELECT ");
        for hint in &node.hints {
            if let Expression::String(s) = &hint.body {
                sql.push_str(&format!("/*+ {} */ ", s.value));
            }
        }
        if let Some(option) = node.option {
            sql.push_str(option.as_str());
            sql.push(' ');
        }
        if let Some(top) = &node.top {
            sql.push_str(&top.accept(self));
            sql.push(' ');
        }
        sql.push_str(&self.list(&node.columns));
        if let Some(into) = &node.into {
            sql.push_str(&format!(" INTO {}", into.accept(self)));
        }
        if let Some(from) = &node.from {
            sql.push_str(&format!(" FROM {}", from.accept(self)));
        }
        if let Some(w) = &node.where_clause {
            sql.push_str(&format!(" WHERE {}", w.accept(self)));
        }
        if let Some(c) = &node.connect_by {
            sql.push_str(&format!(" {}", c.accept(self)));
        }
        if let Some(g) = &node.group_by {
            sql.push_str(&format!(" {}", g.accept(self)));
        }
        if let Some(o) = &node.order_by {
            sql.push_str(&format!(" {}", o.accept(self)));
        }
        if let Some(l) = &node.limit {
            sql.push_str(&format!(" {}", l.accept(self)));
        }
        sql
    }

    fn visit_select_item(&mut self, node: &SelectItem) -> String {
        format!("{}{}", node.body.accept(self), self.alias(&node.alias))
    }

    fn visit_union_query(&mut self, node: &UnionQuery) -> String {
        format!(
            "{}{} {} {}",
            self.with(&node.with_sub_queries),
            node.left.accept(self),
            node.kind,
            node.right.accept(self)
        )
    }

    fn visit_with_sub_query(&mut self, node: &WithSubQuery) -> String {
        let columns = if node.columns.is_empty() {
            String::new()
        } else {
            format!(" ({})", self.list(&node.columns))
        };
        format!(
            "{}{} AS ({})",
            node.name.accept(self),
            columns,
            node.query.accept(self)
        )
    }

    fn visit_table(&mut self, node: &Table) -> String {
        let mut sql = String::new();
        for part in [&node.database, &node.schema].into_iter().flatten() {
            sql.push_str(&format!("{}.", part.accept(self)));
        }
        sql.push_str(&node.name.accept(self));
        if let Some(link) = &node.db_link {
            sql.push_str(&format!("@{}", link.value));
        }
        sql.push_str(&self.alias(&node.alias));
        if !node.hints.is_empty() {
            sql.push_str(&format!(" WITH ({})", self.list(&node.hints)));
        }
        sql
    }

    fn visit_join_table(&mut self, node: &JoinTable) -> String {
        if node.is_comma_join {
            return format!("{}, {}", node.left.accept(self), node.right.accept(self));
        }
        let on = match &node.on {
            Some(on) => format!(" ON {}", on.accept(self)),
            None => String::new(),
        };
        format!(
            "{} {} {}{}",
            node.left.accept(self),
            node.kind,
            node.right.accept(self),
            on
        )
    }

    fn visit_reference_table(&mut self, node: &ReferenceTable) -> String {
        format!("{}{}", node.function.accept(self), self.alias(&node.alias))
    }

    fn visit_pivot_table(&mut self, node: &PivotTable) -> String {
        format!(
            "{} PIVOT ({} FOR {} IN ({})){}",
            node.source.accept(self),
            node.aggregate.accept(self),
            node.pivot_column.accept(self),
            self.list(&node.pivot_values),
            self.alias(&node.alias)
        )
    }

    fn visit_property(&mut self, node: &Property) -> String {
        let mut sql = String::new();
        if let Some(schema) = &node.schema {
            sql.push_str(&format!("{}.", schema.accept(self)));
        }
        sql.push_str(&format!("{}.{}", node.table.accept(self), node.name.accept(self)));
        if let Some(collate) = &node.collate {
            sql.push_str(&format!(" {}", collate.accept(self)));
        }
        sql
    }

    fn visit_identifier(&mut self, node: &Identifier) -> String {
        match &node.collate {
            Some(collate) => format!("{} {}", node.value, collate.accept(self)),
            None => node.value.clone(),
        }
    }

    fn visit_all_columns(&mut self, node: &AllColumns) -> String {
        format!("{}*", Renderer::owner(&node.owner))
    }

    fn visit_variable(&mut self, node: &Variable) -> String {
        format!("{}{}", node.prefix, node.name)
    }

    fn visit_number(&mut self, node: &NumberLiteral) -> String {
        node.value.clone()
    }

    fn visit_string(&mut self, node: &StringLiteral) -> String {
        let prefix = if node.is_national { "N" } else { "" };
        format!("{}'{}'", prefix, node.value.replace('\'', "''"))
    }

    fn visit_bool(&mut self, node: &BoolLiteral) -> String {
        if node.value { "TRUE" } else { "FALSE" }.to_string()
    }

    fn visit_null(&mut self, _node: &NullLiteral) -> String {
        "NULL".to_string()
    }

    fn visit_binary(&mut self, node: &BinaryExpression) -> String {
        format!(
            "({} {} {})",
            node.left.accept(self),
            node.op,
            node.right.accept(self)
        )
    }

    fn visit_not(&mut self, node: &Not) -> String {
        format!("NOT {}", node.expr.accept(self))
    }

    fn visit_negate(&mut self, node: &Negate) -> String {
        format!("-({})", node.expr.accept(self))
    }

    fn visit_between_and(&mut self, node: &BetweenAnd) -> String {
        format!(
            "({} {}BETWEEN {} AND {})",
            node.expr.accept(self),
            if node.not { "NOT " } else { "" },
            node.low.accept(self),
            node.high.accept(self)
        )
    }

    fn visit_in(&mut self, node: &In) -> String {
        let targets = match &node.query {
            Some(query) => query.accept(self),
            None => format!("({})", self.list(&node.targets)),
        };
        format!(
            "({} {}IN {})",
            node.expr.accept(self),
            if node.not { "NOT " } else { "" },
            targets
        )
    }

    fn visit_exists(&mut self, node: &Exists) -> String {
        format!("EXISTS {}", node.query.accept(self))
    }

    fn visit_any(&mut self, node: &Any) -> String {
        format!("ANY {}", self.quantified(&node.query))
    }

    fn visit_all(&mut self, node: &All) -> String {
        format!("ALL {}", self.quantified(&node.query))
    }

    fn visit_regex(&mut self, node: &Regex) -> String {
        let op = match (node.not, node.case_insensitive) {
            (false, false) => "~",
            (false, true) => "~*",
            (true, false) => "!~",
            (true, true) => "!~*",
        };
        format!("({} {} {})", node.expr.accept(self), op, node.pattern.accept(self))
    }

    fn visit_case(&mut self, node: &Case) -> String {
        let mut sql = "CASE".to_string();
        if let Some(operand) = &node.operand {
            sql.push_str(&format!(" {}", operand.accept(self)));
        }
        for item in &node.items {
            sql.push_str(&format!(" {}", item.accept(self)));
        }
        if let Some(else_) = &node.else_ {
            sql.push_str(&format!(" ELSE {}", else_.accept(self)));
        }
        sql.push_str(" END");
        sql
    }

    fn visit_case_item(&mut self, node: &CaseItem) -> String {
        format!("WHEN {} THEN {}", node.when.accept(self), node.then.accept(self))
    }

    fn visit_function_call(&mut self, node: &FunctionCall) -> String {
        let mut sql = format!(
            "{}{}({}{})",
            Renderer::owner(&node.owner),
            node.name.accept(self),
            if node.distinct { "DISTINCT " } else { "" },
            self.list(&node.arguments)
        );
        if let Some(within_group) = &node.within_group {
            sql.push_str(&format!(" {}", within_group.accept(self)));
        }
        if let Some(over) = &node.over {
            sql.push_str(&format!(" {}", over.accept(self)));
        }
        sql
    }

    fn visit_over(&mut self, node: &Over) -> String {
        let parts: Vec<String> = [
            node.partition_by.as_ref().map(|p| p.accept(self)),
            node.order_by.as_ref().map(|o| o.accept(self)),
        ]
        .into_iter()
        .flatten()
        .collect();
        format!("OVER ({})", parts.join(" "))
    }

    fn visit_partition_by(&mut self, node: &PartitionBy) -> String {
        format!("PARTITION BY {}", self.list(&node.items))
    }

    fn visit_within_group(&mut self, node: &WithinGroup) -> String {
        format!("WITHIN GROUP ({})", node.order_by.accept(self))
    }

    fn visit_group_by(&mut self, node: &GroupBy) -> String {
        let mut sql = format!("GROUP BY {}", self.list(&node.items));
        if let Some(having) = &node.having {
            sql.push_str(&format!(" HAVING {}", having.accept(self)));
        }
        sql
    }

    fn visit_order_by(&mut self, node: &OrderBy) -> String {
        format!(
            "ORDER {}BY {}",
            if node.siblings { "SIBLINGS " } else { "" },
            self.list(&node.items)
        )
    }

    fn visit_order_by_item(&mut self, node: &OrderByItem) -> String {
        let mut sql = node.expr.accept(self);
        match node.order {
            Some(SortOrder::Asc) => sql.push_str(" ASC"),
            Some(SortOrder::Desc) => sql.push_str(" DESC"),
            None => {}
        }
        match node.nulls {
            Some(NullsOrder::First) => sql.push_str(" NULLS FIRST"),
            Some(NullsOrder::Last) => sql.push_str(" NULLS LAST"),
            None => {}
        }
        sql
    }

    fn visit_limit(&mut self, node: &Limit) -> String {
        let mut parts = Vec::new();
        if let Some(count) = &node.row_count {
            parts.push(format!("LIMIT {}", count.accept(self)));
        }
        if let Some(offset) = &node.offset {
            parts.push(format!("OFFSET {}", offset.accept(self)));
        }
        parts.join(" ")
    }

    fn visit_top(&mut self, node: &Top) -> String {
        format!(
            "TOP ({}){}{}",
            node.count.accept(self),
            if node.percent { " PERCENT" } else { "" },
            if node.with_ties { " WITH TIES" } else { "" }
        )
    }

    fn visit_hint(&mut self, node: &Hint) -> String {
        node.body.accept(self)
    }

    fn visit_connect_by(&mut self, node: &ConnectBy) -> String {
        let start = match &node.start_with {
            Some(s) => format!("START WITH {} ", s.accept(self)),
            None => String::new(),
        };
        format!(
            "{}CONNECT BY {}{}{}",
            start,
            if node.nocycle { "NOCYCLE " } else { "" },
            if node.prior { "PRIOR " } else { "" },
            node.condition.accept(self)
        )
    }

    fn visit_collate(&mut self, node: &Collate) -> String {
        format!("COLLATE {}", node.name)
    }

    fn visit_at_time_zone(&mut self, node: &AtTimeZone) -> String {
        format!("{} AT TIME ZONE {}", node.expr.accept(self), node.zone.accept(self))
    }

    fn visit_interval(&mut self, node: &Interval) -> String {
        match &node.unit {
            Some(unit) => format!("INTERVAL {} {}", node.value.accept(self), unit.accept(self)),
            None => format!("INTERVAL {}", node.value.accept(self)),
        }
    }

    fn visit_time_unit(&mut self, node: &TimeUnit) -> String {
        node.unit.clone()
    }

    fn visit_array(&mut self, node: &ArrayLiteral) -> String {
        format!("ARRAY[{}]", self.list(&node.elements))
    }

    fn visit_array_index(&mut self, node: &ArrayIndex) -> String {
        format!("{}[{}]", node.array.accept(self), node.index.accept(self))
    }

    fn visit_array_slice(&mut self, node: &ArraySlice) -> String {
        let lower = node.lower.as_ref().map(|l| l.accept(self)).unwrap_or_default();
        let upper = node.upper.as_ref().map(|u| u.accept(self)).unwrap_or_default();
        format!("{}[{}:{}]", node.array.accept(self), lower, upper)
    }

    fn visit_insert(&mut self, node: &Insert) -> String {
        let mut sql = format!("INSERT INTO {}", node.table.accept(self));
        if !node.columns.is_empty() {
            sql.push_str(&format!(" ({})", self.list(&node.columns)));
        }
        if let Some(query) = &node.query {
            sql.push_str(&format!(" {}", query.accept(self)));
        } else {
            let rows: Vec<String> = node
                .values
                .iter()
                .map(|row| format!("({})", self.list(row)))
                .collect();
            sql.push_str(&format!(" VALUES {}", rows.join(", ")));
        }
        sql
    }

    fn visit_update(&mut self, node: &Update) -> String {
        let set: Vec<String> = node.set.iter().map(|s| self.assignment(s)).collect();
        let mut sql = format!("UPDATE {} SET {}", node.table.accept(self), set.join(", "));
        if let Some(from) = &node.from {
            sql.push_str(&format!(" FROM {}", from.accept(self)));
        }
        if let Some(w) = &node.where_clause {
            sql.push_str(&format!(" WHERE {}", w.accept(self)));
        }
        sql
    }

    fn visit_delete(&mut self, node: &Delete) -> String {
        let mut sql = match &node.from {
            Some(from) => format!("DELETE {} FROM {}", node.table.accept(self), from.accept(self)),
            None => format!("DELETE FROM {}", node.table.accept(self)),
        };
        if let Some(w) = &node.where_clause {
            sql.push_str(&format!(" WHERE {}", w.accept(self)));
        }
        sql
    }
}

fn assert_round_trip(sql: &str, dialect: DialectType) {
    let first = parse(sql, dialect).unwrap().statement;
    let rendered = Renderer.render(&first);
    let second = match parse(&rendered, dialect) {
        Ok(parsed) => parsed.statement,
        Err(e) => panic!("rendered SQL {:?} failed to parse: {}", rendered, e),
    };
    assert_eq!(first, second, "\n  original: {}\n  rendered: {}", sql, rendered);
}

// ============================================================================
// Rendering Through the Visitor
// ============================================================================

mod rendering {
    use super::*;

    #[test]
    fn test_render_simple_select() {
        let statement = parse("select a, b as x from t where a = 1", DialectType::Pgsql)
            .unwrap()
            .statement;
        assert_eq!(
            Renderer.render(&statement),
            "(SELECT a, b AS x FROM t WHERE (a = 1))"
        );
    }

    #[test]
    fn test_round_trip_postgres() {
        for sql in [
            "SELECT DISTINCT a.*, b.c AS d FROM a LEFT JOIN b ON a.id = b.id WHERE b.c IS NOT NULL",
            "SELECT x FROM t, u WHERE t.id = u.id ORDER BY x DESC NULLS LAST LIMIT 10 OFFSET 5",
            "WITH c (n) AS (SELECT 1) SELECT n FROM c UNION ALL SELECT 2 EXCEPT SELECT 3",
            "SELECT CASE WHEN a BETWEEN 1 AND 2 THEN 'x''y' ELSE NULL END FROM t",
            "SELECT COUNT(DISTINCT a), SUM(b) OVER (PARTITION BY c ORDER BY d) FROM t GROUP BY a HAVING COUNT(*) > 1",
            "SELECT * FROM t WHERE a NOT IN (1, 2) AND EXISTS (SELECT 1 FROM u) OR b > ALL (SELECT c FROM v)",
            "SELECT ARRAY[1, 2][1], a[1:2], a[:3], name ~* '^x' FROM generate_series(1, 3) AS g",
            "SELECT ts AT TIME ZONE 'UTC', INTERVAL '1' DAY, :p, -5 FROM (SELECT 1) AS s",
            "SELECT a FROM t WHERE NOT a = 1 AND a ILIKE 'x%'",
            "SELECT -price, - -a * 2 FROM t WHERE x = ANY(tags) AND y <> ALL(ARRAY[1, 2])",
            "SELECT * FROM ((SELECT a FROM x) UNION (SELECT a FROM y)) u WHERE a IN ((SELECT a FROM x) INTERSECT (SELECT a FROM y))",
        ] {
            assert_round_trip(sql, DialectType::Pgsql);
        }
    }

    #[test]
    fn test_round_trip_dml() {
        for sql in [
            "INSERT INTO t (a, b) VALUES (1, 2), (3, 4)",
            "INSERT INTO t SELECT * FROM u",
            "UPDATE t SET a = a + 1, b = 'x' FROM u WHERE t.id = u.id",
            "DELETE FROM t WHERE a IN (SELECT a FROM u)",
        ] {
            assert_round_trip(sql, DialectType::Pgsql);
        }
    }

    #[test]
    fn test_round_trip_mysql() {
        for sql in [
            "SELECT `order`, @v, @@version FROM `select` WHERE a REGEXP 'x' XOR b LIMIT 3",
            "SELECT NOW() + INTERVAL 1 DAY",
        ] {
            assert_round_trip(sql, DialectType::MySql);
        }
    }

    #[test]
    fn test_round_trip_oracle() {
        assert_round_trip(
            "SELECT /*+ FULL(e) */ UNIQUE LISTAGG(ename, ',') WITHIN GROUP (ORDER BY ename) \
             FROM emp@remote e START WITH mgr IS NULL CONNECT BY PRIOR empno = mgr ORDER SIBLINGS BY ename",
            DialectType::Oracle,
        );
    }

    #[test]
    fn test_round_trip_sqlserver() {
        assert_round_trip(
            "SELECT TOP 10 PERCENT [Order ID], N'x' INTO archive FROM dbo.orders o WITH (NOLOCK) \
             PIVOT (SUM(qty) FOR yr IN ([2019], [2020])) p",
            DialectType::SqlServer,
        );
    }
}

// ============================================================================
// Dispatch
// ============================================================================

mod dispatch {
    use super::*;

    #[test]
    fn test_accept_reaches_struct_nodes() {
        let statement = parse("SELECT a x FROM t ORDER BY a", DialectType::MySql)
            .unwrap()
            .statement;
        let Expression::Select(select) = &statement else {
            panic!("expected Select");
        };
        let Expression::SelectQuery(query) = &select.query else {
            panic!("expected SelectQuery");
        };

        assert_eq!(query.columns[0].kind(), NodeKind::SelectItem);
        assert_eq!(Renderer.render(&query.columns[0]), "a AS x");

        let order_by = query.order_by.as_ref().unwrap();
        assert_eq!(order_by.kind(), NodeKind::OrderBy);
        assert_eq!(order_by.items[0].kind(), NodeKind::OrderByItem);
        assert_eq!(Node::dialect(order_by), Some(DialectType::MySql));
    }

    #[test]
    fn test_expression_kinds_match_node_kinds() {
        let statement = parse(
            "SELECT a, -a, 1, 'x', TRUE, NULL, f(a) FROM t WHERE a = ANY(b) AND a IN (1) AND b BETWEEN 1 AND 2",
            DialectType::Pgsql,
        )
        .unwrap()
        .statement;
        for expr in statement.dfs() {
            assert_eq!(Node::kind(expr), Expression::kind(expr));
        }
    }
}
