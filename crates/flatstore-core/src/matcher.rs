//! Field filters with Exact and Contains match modes

use serde_json::Value;

use crate::document::Document;

/// Comparison strategy for one filter field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Strict equality of type and content
    #[default]
    Exact,
    /// Case-sensitive substring match on strings
    Contains,
}

impl MatchMode {
    /// Mode selected by a query token: `true` is Exact, `false` is Contains
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "true" => Some(Self::Exact),
            "false" => Some(Self::Contains),
            _ => None,
        }
    }
}

/// Expected value and match mode for one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub value: Value,
    pub mode: MatchMode,
}

impl FieldFilter {
    pub fn new(value: impl Into<Value>, mode: MatchMode) -> Self {
        Self {
            value: value.into(),
            mode,
        }
    }

    /// Parse `"<value>"` or `"<value>,<true|false>"`
    ///
    /// Only a trailing `,true` or `,false` selects a mode, so values that
    /// contain commas themselves survive intact.
    pub fn parse(raw: &str) -> Self {
        if let Some((value, token)) = raw.rsplit_once(',')
            && let Some(mode) = MatchMode::from_token(token)
        {
            return Self::new(value, mode);
        }
        Self::new(raw, MatchMode::Exact)
    }

    /// Whether `actual` satisfies this field filter
    pub fn matches(&self, actual: &Value) -> bool {
        match (self.mode, actual, &self.value) {
            (MatchMode::Contains, Value::String(haystack), Value::String(needle)) => {
                haystack.contains(needle.as_str())
            }
            _ => actual == &self.value,
        }
    }
}

/// Conjunction of field filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Vec<(String, FieldFilter)>,
}

impl Filter {
    /// Empty filter; matches every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an Exact field
    pub fn exact(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .push((field.into(), FieldFilter::new(value, MatchMode::Exact)));
        self
    }

    /// Add a Contains field
    pub fn contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .push((field.into(), FieldFilter::new(value, MatchMode::Contains)));
        self
    }

    /// Add a field with an explicit filter
    pub fn with_field(mut self, field: impl Into<String>, filter: FieldFilter) -> Self {
        self.fields.push((field.into(), filter));
        self
    }

    /// Build from query pairs such as `title=Foo,false`
    pub fn from_query<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let fields = pairs
            .into_iter()
            .map(|(field, raw)| (field.into(), FieldFilter::parse(raw.as_ref())))
            .collect();
        Self { fields }
    }

    /// Exact filter over every field of an equality map
    pub fn from_equality(equality: &Document) -> Self {
        let fields = equality
            .iter()
            .map(|(field, value)| {
                (
                    field.clone(),
                    FieldFilter::new(value.clone(), MatchMode::Exact),
                )
            })
            .collect();
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldFilter)> {
        self.fields.iter().map(|(name, filter)| (name.as_str(), filter))
    }

    /// Whether `document` satisfies every field; a missing field never matches
    pub fn matches(&self, document: &Document) -> bool {
        self.fields.iter().all(|(field, filter)| {
            document
                .get(field)
                .is_some_and(|actual| filter.matches(actual))
        })
    }
}

/// Exact equality on every field of `equality`
pub fn matches_all_exact(document: &Document, equality: &Document) -> bool {
    equality
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}
