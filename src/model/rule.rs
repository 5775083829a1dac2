use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a branching rule measures about a candidate's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionType {
    TextLength,
    KeywordMatch,
    TimeTaken,
}

impl ConditionType {
    pub fn label(self) -> &'static str {
        match self {
            ConditionType::TextLength => "Text Length",
            ConditionType::KeywordMatch => "Keywords",
            ConditionType::TimeTaken => "Time Taken",
        }
    }

    /// Length and time conditions compare numbers; keyword conditions test membership.
    pub fn is_numeric(self) -> bool {
        !matches!(self, ConditionType::KeywordMatch)
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    GreaterThan,
    LessThan,
    Contains,
    NotContains,
}

const COMPARISON_OPERATORS: [Operator; 3] =
    [Operator::GreaterThan, Operator::LessThan, Operator::Equals];
const MEMBERSHIP_OPERATORS: [Operator; 2] = [Operator::Contains, Operator::NotContains];

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::Contains => "contains",
            Operator::NotContains => "!contains",
        }
    }

    /// The operators offered for a condition type, in menu order.
    pub fn allowed_for(condition: ConditionType) -> &'static [Operator] {
        if condition.is_numeric() {
            &COMPARISON_OPERATORS
        } else {
            &MEMBERSHIP_OPERATORS
        }
    }

    pub fn is_allowed_for(self, condition: ConditionType) -> bool {
        Self::allowed_for(condition).contains(&self)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The right-hand side of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Number(f64),
    Text(String),
    Set(Vec<String>),
}

impl RuleValue {
    /// Numeric reading of the value; form fields often store numbers as text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleValue::Number(n) => Some(*n),
            RuleValue::Text(s) => s.trim().parse().ok(),
            RuleValue::Set(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RuleValue::Number(_) => false,
            RuleValue::Text(s) => s.trim().is_empty(),
            RuleValue::Set(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Number(n) => {
                // Whole numbers print without a trailing ".0" while they fit an i64 exactly.
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            RuleValue::Text(s) => f.write_str(s),
            RuleValue::Set(items) => write!(f, "{}", items.iter().join(",")),
        }
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        RuleValue::Number(value)
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for RuleValue {
    fn from(value: Vec<String>) -> Self {
        RuleValue::Set(value)
    }
}

/// How a rule combines with its predecessor. Stored for the editor, not interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleLogic {
    And,
    Or,
}

/// A conditional branch owned by a response node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub condition_type: ConditionType,
    pub operator: Operator,
    pub value: RuleValue,
    pub target_node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<RuleLogic>,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        condition_type: ConditionType,
        operator: Operator,
        value: impl Into<RuleValue>,
        target_node_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            condition_type,
            operator,
            value: value.into(),
            target_node_id: target_node_id.into(),
            logic: None,
        }
    }

    /// Human-readable condition, e.g. `Text Length > 100`.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// Checks that the operator fits the condition type.
    pub fn check_operator(&self) -> Result<(), String> {
        if self.operator.is_allowed_for(self.condition_type) {
            Ok(())
        } else {
            Err(format!(
                "operator '{}' cannot be used with condition '{}'",
                self.operator, self.condition_type
            ))
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.condition_type, self.operator, self.value)
    }
}
