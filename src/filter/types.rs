use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::database::descriptor::FieldType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    ILike,
}

impl FilterOp {
    pub fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "eq" => FilterOp::Eq,
            "ne" => FilterOp::Ne,
            "gt" => FilterOp::Gt,
            "gte" => FilterOp::Gte,
            "lt" => FilterOp::Lt,
            "lte" => FilterOp::Lte,
            "like" => FilterOp::Like,
            "ilike" => FilterOp::ILike,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::Like => "like",
            FilterOp::ILike => "ilike",
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "<>",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::Like => "LIKE",
            FilterOp::ILike => "ILIKE",
        }
    }

    /// Operators a field of the given type may be filtered with
    pub fn allowed_for(field_type: FieldType) -> &'static [FilterOp] {
        use FilterOp::*;
        match field_type {
            FieldType::Int | FieldType::Decimal => &[Eq, Ne, Gt, Gte, Lt, Lte],
            FieldType::Text => &[Eq, Ne, Like, ILike],
        }
    }
}

/// A typed value that is only ever sent to the database as a bound parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
    Decimal(Decimal),
    Null(FieldType),
}

impl SqlValue {
    /// Coerce a raw query-string value to the declared field type
    pub fn coerce(field_type: FieldType, raw: &str) -> Option<Self> {
        match field_type {
            FieldType::Int => raw.trim().parse().ok().map(SqlValue::Int),
            FieldType::Decimal => Decimal::from_str(raw.trim()).ok().map(SqlValue::Decimal),
            FieldType::Text => is_storable_text(raw).then(|| SqlValue::Text(raw.to_string())),
        }
    }
}

/// Postgres TEXT cannot hold NUL, and U+FFFD is what undecodable
/// percent-escapes turn into
fn is_storable_text(raw: &str) -> bool {
    !raw.contains(|c: char| c == '\0' || c == char::REPLACEMENT_CHARACTER)
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<Option<&str>> for SqlValue {
    fn from(v: Option<&str>) -> Self {
        v.map_or(SqlValue::Null(FieldType::Text), SqlValue::from)
    }
}

impl From<Option<Decimal>> for SqlValue {
    fn from(v: Option<Decimal>) -> Self {
        v.map_or(SqlValue::Null(FieldType::Decimal), SqlValue::Decimal)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Int(i) => write!(f, "{}", i),
            SqlValue::Text(s) => write!(f, "{:?}", s),
            SqlValue::Decimal(d) => write!(f, "{}", d),
            SqlValue::Null(_) => write!(f, "NULL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// Query-string key the condition came from
    pub key: String,
    pub column: &'static str,
    pub operator: FilterOp,
    pub value: SqlValue,
}

/// Conditions combined with AND; empty matches every row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterClause {
    pub conditions: Vec<FilterCondition>,
}

impl FilterClause {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: &'static str,
    pub direction: SortDirection,
}

/// Caller sort keys in order; the primary key breaks ties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub keys: Vec<SortKey>,
    pub primary_key: &'static str,
}

impl SortClause {
    pub fn by_primary_key(primary_key: &'static str) -> Self {
        Self { keys: vec![], primary_key }
    }
}

/// Generated SQL text plus its parameters, in `$n` order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlValue>,
}

/// Decoded query string. Keys are unique: a repeated key keeps the position
/// of its first occurrence and the value of its last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Invalid UTF-8 decodes to U+FFFD, which `SqlValue::coerce` refuses
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        url::form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (key, value) in iter {
            match positions.get(&key) {
                Some(&i) => pairs[i].1 = value,
                None => {
                    positions.insert(key.clone(), pairs.len());
                    pairs.push((key, value));
                }
            }
        }
        Self { pairs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_in_order() {
        let params = QueryParams::parse("?status_name=Active&sort=-status_id");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, [("status_name", "Active"), ("sort", "-status_id")]);
    }

    #[test]
    fn decodes_percent_and_plus() {
        let params = QueryParams::parse("plan_name=Gold%20Plus&feature_name=a+b");
        assert_eq!(params.get("plan_name"), Some("Gold Plus"));
        assert_eq!(params.get("feature_name"), Some("a b"));
    }

    #[test]
    fn duplicate_keys_last_value_wins() {
        let params = QueryParams::parse("a=1&b=2&a=3");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, [("a", "3"), ("b", "2")]);
    }

    #[test]
    fn empty_query_has_no_pairs() {
        assert!(QueryParams::parse("").is_empty());
        assert!(QueryParams::parse("?").is_empty());
    }

    #[test]
    fn coerces_by_field_type() {
        assert_eq!(SqlValue::coerce(FieldType::Int, "42"), Some(SqlValue::Int(42)));
        assert_eq!(SqlValue::coerce(FieldType::Int, "4x2"), None);
        assert_eq!(
            SqlValue::coerce(FieldType::Decimal, "9.99"),
            Some(SqlValue::Decimal(Decimal::new(999, 2)))
        );
        assert_eq!(SqlValue::coerce(FieldType::Decimal, "cheap"), None);
        assert_eq!(SqlValue::coerce(FieldType::Text, " x "), Some(SqlValue::Text(" x ".into())));
    }

    #[test]
    fn text_rejects_nul_and_undecodable_bytes() {
        let params = QueryParams::parse("status_name=a%00b&plan_name=%FF");
        assert_eq!(SqlValue::coerce(FieldType::Text, params.get("status_name").unwrap()), None);
        assert_eq!(SqlValue::coerce(FieldType::Text, params.get("plan_name").unwrap()), None);
        assert_eq!(
            SqlValue::coerce(FieldType::Text, "Caf\u{e9}"),
            Some(SqlValue::Text("Caf\u{e9}".into()))
        );
    }

    #[test]
    fn many_keys_keep_first_position_and_last_value() {
        let mut raw: Vec<String> = (0..50_000).map(|i| format!("k{}=v", i)).collect();
        raw.push("k0=last".into());
        let params = QueryParams::parse(&raw.join("&"));

        let mut iter = params.iter();
        assert_eq!(iter.next(), Some(("k0", "last")));
        assert_eq!(iter.next(), Some(("k1", "v")));
        assert_eq!(params.iter().count(), 50_000);
    }

    #[test]
    fn operator_allow_list_depends_on_type() {
        assert!(FilterOp::allowed_for(FieldType::Text).contains(&FilterOp::Like));
        assert!(!FilterOp::allowed_for(FieldType::Int).contains(&FilterOp::Like));
        assert!(FilterOp::allowed_for(FieldType::Decimal).contains(&FilterOp::Gte));
        assert!(!FilterOp::allowed_for(FieldType::Text).contains(&FilterOp::Gt));
    }
}
