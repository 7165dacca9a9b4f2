use im::OrdMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_width::UnicodeWidthStr;

/// Indentation used by [`Value::pretty`].
pub const PRETTY_INDENT: usize = 4;
/// Column budget used by [`Value::pretty`].
pub const PRETTY_WIDTH: usize = 80;

/// Represents a test input, expected output, or candidate return value.
///
/// Values serialize untagged, so suite files stay plain JSON/YAML:
/// `null`, booleans, numbers, strings, arrays and objects.
///
/// # Examples
///
/// ```rust
/// use proctor::value::Value;
/// let n = Value::Int(16);
/// assert_eq!(n.type_name(), "Int");
/// let s = Value::from("hello");
/// assert_eq!(s.to_string(), "\"hello\"");
/// assert!(Value::default().is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(OrdMap<String, Value>),
}

impl Value {
    /// Returns the type name of the value as a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use proctor::value::Value;
    /// assert_eq!(Value::Bool(true).type_name(), "Bool");
    /// assert_eq!(Value::List(vec![]).type_name(), "List");
    /// ```
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "Str",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use proctor::value::Value;
    /// assert_eq!(Value::Int(2).as_float(), Some(2.0));
    /// assert_eq!(Value::Float(0.5).as_float(), Some(0.5));
    /// assert_eq!(Value::Nil.as_float(), None);
    /// ```
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Renders the value as width-bounded text, one element per line for
    /// containers that do not fit on a single line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use proctor::value::Value;
    /// let v = Value::List(vec![Value::Int(1), Value::Int(2)]);
    /// assert_eq!(v.pretty(), "[1, 2]");
    /// ```
    pub fn pretty(&self) -> String {
        self.pretty_with(PRETTY_INDENT, PRETTY_WIDTH)
    }

    pub fn pretty_with(&self, indent: usize, width: usize) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0, indent, width);
        out
    }

    // ------------------------------------------------------------------------
    // Formatting helpers
    // ------------------------------------------------------------------------

    fn write_pretty(&self, out: &mut String, level: usize, indent: usize, width: usize) {
        let flat = self.to_string();
        let fits = level * indent + flat.width() <= width;
        match self {
            Value::List(items) if !fits && !items.is_empty() => {
                out.push_str("[\n");
                for item in items {
                    push_indent(out, (level + 1) * indent);
                    item.write_pretty(out, level + 1, indent, width);
                    out.push_str(",\n");
                }
                push_indent(out, level * indent);
                out.push(']');
            }
            Value::Map(map) if !fits && !map.is_empty() => {
                out.push_str("{\n");
                for (key, value) in map.iter() {
                    push_indent(out, (level + 1) * indent);
                    out.push_str(&format!("{:?}: ", key));
                    value.write_pretty(out, level + 1, indent, width);
                    out.push_str(",\n");
                }
                push_indent(out, level * indent);
                out.push('}');
            }
            _ => out.push_str(&flat),
        }
    }

    fn fmt_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }

    fn fmt_map(f: &mut fmt::Formatter<'_>, map: &OrdMap<String, Value>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (k, v) in map.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: {}", k, v)?;
            first = false;
        }
        write!(f, "}}")
    }
}

fn push_indent(out: &mut String, columns: usize) {
    out.extend(std::iter::repeat(' ').take(columns));
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => Value::fmt_list(f, items),
            Value::Map(map) => Value::fmt_map(f, map),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
