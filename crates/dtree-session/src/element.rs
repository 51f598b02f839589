//! Renderable elements carried by leaves.

use dtree_core::{AppendError, Content};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest summary shown for an element in outlines.
const SUMMARY_MAX_CHARS: usize = 40;

/// One renderable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Text {
        body: String,
    },
    Markdown {
        body: String,
    },
    Code {
        body: String,
        #[serde(default)]
        language: Option<String>,
    },
    Table(TableData),
    Json {
        body: Value,
    },
    Progress {
        value: u8,
    },
    Button {
        id: String,
        label: String,
    },
    Checkbox {
        id: String,
        label: String,
        #[serde(default)]
        value: bool,
    },
    Slider {
        id: String,
        label: String,
        min: f64,
        max: f64,
        value: f64,
    },
    Empty,
}

/// Column names plus row-major cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl TableData {
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Copy of this table with `rows` appended.
    ///
    /// Every new row must have exactly one cell per column.
    pub fn with_rows(&self, rows: &[Vec<Value>]) -> Result<Self, AppendError> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.columns.len())
        {
            return Err(AppendError::new(format!(
                "row {i} has {} cells, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        let mut combined = self.rows.clone();
        combined.extend_from_slice(rows);
        Ok(Self {
            columns: self.columns.clone(),
            rows: combined,
        })
    }
}

impl Element {
    /// Plain text element.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text { body: body.into() }
    }

    /// Wire name of this element's type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Markdown { .. } => "markdown",
            Self::Code { .. } => "code",
            Self::Table(_) => "table",
            Self::Json { .. } => "json",
            Self::Progress { .. } => "progress",
            Self::Button { .. } => "button",
            Self::Checkbox { .. } => "checkbox",
            Self::Slider { .. } => "slider",
            Self::Empty => "empty",
        }
    }

    /// Id of an interactive element, if this is one.
    #[must_use]
    pub fn widget_id(&self) -> Option<&str> {
        match self {
            Self::Button { id, .. } | Self::Checkbox { id, .. } | Self::Slider { id, .. } => {
                Some(id)
            }
            _ => None,
        }
    }

    /// Short single-line description.
    #[must_use]
    pub fn summary(&self) -> String {
        let full = match self {
            Self::Text { body } | Self::Markdown { body } => body.clone(),
            Self::Code { body, language } => match language {
                Some(language) => format!("({language}) {body}"),
                None => body.clone(),
            },
            Self::Table(table) => format!(
                "{} cols x {} rows",
                table.columns.len(),
                table.rows.len()
            ),
            Self::Json { body } => body.to_string(),
            Self::Progress { value } => format!("{value}%"),
            Self::Button { id, label } => format!("{label} #{id}"),
            Self::Checkbox { id, label, value } => {
                let mark = if *value { 'x' } else { ' ' };
                format!("[{mark}] {label} #{id}")
            }
            Self::Slider {
                id,
                label,
                min,
                max,
                value,
            } => format!("{label} {value} in [{min}, {max}] #{id}"),
            Self::Empty => String::new(),
        };
        let single_line = full.replace('\n', "\\n");
        if single_line.chars().count() > SUMMARY_MAX_CHARS {
            let mut cut: String = single_line.chars().take(SUMMARY_MAX_CHARS - 1).collect();
            cut.push('…');
            cut
        } else {
            single_line
        }
    }
}

/// Incremental payload folded into an existing element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementDelta {
    /// Rows appended to a table.
    Rows { rows: Vec<Vec<Value>> },
    /// Text appended to a text, markdown or code element.
    Text { body: String },
}

impl ElementDelta {
    /// Wire name of this delta's type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Rows { .. } => "rows",
            Self::Text { .. } => "text",
        }
    }

    /// Single delta equivalent to applying `self` then `next`, when both
    /// are of the same type.
    #[must_use]
    pub fn combined(&self, next: &Self) -> Option<Self> {
        match (self, next) {
            (Self::Rows { rows: a }, Self::Rows { rows: b }) => Some(Self::Rows {
                rows: a.iter().chain(b).cloned().collect(),
            }),
            (Self::Text { body: a }, Self::Text { body: b }) => Some(Self::Text {
                body: format!("{a}{b}"),
            }),
            _ => None,
        }
    }
}

fn concat(base: &str, more: &str) -> String {
    let mut out = String::with_capacity(base.len() + more.len());
    out.push_str(base);
    out.push_str(more);
    out
}

impl Content for Element {
    type Increment = ElementDelta;
    /// Canonical JSON form, for consumers that inspect elements generically.
    type Derived = Value;

    fn append(&self, increment: &ElementDelta) -> Result<Self, AppendError> {
        match (self, increment) {
            (Self::Table(table), ElementDelta::Rows { rows }) => {
                Ok(Self::Table(table.with_rows(rows)?))
            }
            (Self::Text { body }, ElementDelta::Text { body: more }) => Ok(Self::Text {
                body: concat(body, more),
            }),
            (Self::Markdown { body }, ElementDelta::Text { body: more }) => Ok(Self::Markdown {
                body: concat(body, more),
            }),
            (Self::Code { body, language }, ElementDelta::Text { body: more }) => Ok(Self::Code {
                body: concat(body, more),
                language: language.clone(),
            }),
            (element, delta) => Err(AppendError::new(format!(
                "{} delta does not apply to a {} element",
                delta.kind(),
                element.kind()
            ))),
        }
    }

    fn derive(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> Element {
        Element::Table(TableData::new(["a", "b"]))
    }

    #[test]
    fn rows_append_to_tables() {
        let delta = ElementDelta::Rows {
            rows: vec![vec![json!(1), json!("x")], vec![json!(2), json!("y")]],
        };
        let grown = table().append(&delta).expect("matching width");
        let Element::Table(data) = grown else {
            panic!("still a table");
        };
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[1], vec![json!(2), json!("y")]);
    }

    #[test]
    fn rows_of_wrong_width_are_rejected() {
        let delta = ElementDelta::Rows {
            rows: vec![vec![json!(1), json!(2)], vec![json!(3)]],
        };
        let err = table().append(&delta).unwrap_err();
        assert_eq!(err.reason, "row 1 has 1 cells, table has 2 columns");
    }

    #[test]
    fn text_appends_to_text_like_elements() {
        let more = ElementDelta::Text { body: " world".into() };
        assert_eq!(
            Element::text("hello").append(&more).expect("text"),
            Element::text("hello world")
        );
        let code = Element::Code {
            body: "fn main()".into(),
            language: Some("rust".into()),
        };
        assert_eq!(
            code.append(&ElementDelta::Text { body: " {}".into() }).expect("code"),
            Element::Code {
                body: "fn main() {}".into(),
                language: Some("rust".into()),
            }
        );
    }

    #[test]
    fn mismatched_deltas_are_rejected() {
        let err = Element::text("x")
            .append(&ElementDelta::Rows { rows: vec![] })
            .unwrap_err();
        assert_eq!(err.reason, "rows delta does not apply to a text element");
        assert!(
            table()
                .append(&ElementDelta::Text { body: "x".into() })
                .is_err()
        );
    }

    #[test]
    fn derived_view_is_tagged_json() {
        let derived = Element::Progress { value: 40 }.derive();
        assert_eq!(derived, json!({"type": "progress", "value": 40}));
    }

    #[test]
    fn widget_ids() {
        let button = Element::Button {
            id: "go".into(),
            label: "Go".into(),
        };
        assert_eq!(button.widget_id(), Some("go"));
        assert_eq!(Element::text("x").widget_id(), None);
    }

    #[test]
    fn summaries_are_single_line_and_bounded() {
        assert_eq!(Element::text("a\nb").summary(), "a\\nb");
        let long = Element::text("x".repeat(100)).summary();
        assert_eq!(long.chars().count(), SUMMARY_MAX_CHARS);
        assert!(long.ends_with('…'));
    }

    #[test]
    fn deserializes_tagged_elements() {
        let element: Element =
            serde_json::from_value(json!({"type": "table", "columns": ["a"], "rows": [[1]]}))
                .expect("table decodes");
        assert_eq!(element.kind(), "table");
        let element: Element =
            serde_json::from_value(json!({"type": "empty"})).expect("empty decodes");
        assert_eq!(element, Element::Empty);
    }
}
