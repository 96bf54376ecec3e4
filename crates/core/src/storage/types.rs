use std::collections::HashMap;
use std::fmt;

/// A stored attribute mapping: one row of the table.
pub type Item = HashMap<String, AttributeValue>;

/// Storage encoding of a single value.
///
/// Numbers are kept as their decimal string, the way the table store
/// transmits them, so no precision is lost in transit.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    S(String),
    N(String),
    Bool(bool),
    Null,
    M(HashMap<String, AttributeValue>),
    L(Vec<AttributeValue>),
    B(Vec<u8>),
}

impl AttributeValue {
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttributeValue::N(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_m(&self) -> Option<&HashMap<String, AttributeValue>> {
        match self {
            AttributeValue::M(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_l(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::L(l) => Some(l),
            _ => None,
        }
    }

    /// Short type descriptor used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::Null => "NULL",
            AttributeValue::M(_) => "M",
            AttributeValue::L(_) => "L",
            AttributeValue::B(_) => "B",
        }
    }
}

/// One half of a primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyAttribute {
    pub name: &'static str,
    pub value: AttributeValue,
}

/// Primary key of an item: partition attribute plus sort attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub partition: KeyAttribute,
    pub sort: KeyAttribute,
}

impl Key {
    /// Attribute names making up this key, partition first.
    pub fn attribute_names(&self) -> [&'static str; 2] {
        [self.partition.name, self.sort.name]
    }

    /// The key as a partial item, as the store expects it in requests.
    pub fn to_item(&self) -> Item {
        let mut item = HashMap::with_capacity(2);
        item.insert(self.partition.name.to_string(), self.partition.value.clone());
        item.insert(self.sort.name.to_string(), self.sort.value.clone());
        item
    }

    /// Whether `item` carries exactly this key.
    pub fn matches(&self, item: &Item) -> bool {
        item.get(self.partition.name) == Some(&self.partition.value)
            && item.get(self.sort.name) == Some(&self.sort.value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |value: &AttributeValue| match value {
            AttributeValue::S(s) | AttributeValue::N(s) => s.clone(),
            other => format!("<{}>", other.type_name()),
        };
        write!(
            f,
            "{} ({})",
            render(&self.partition.value),
            render(&self.sort.value)
        )
    }
}
