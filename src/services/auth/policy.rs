//! IAM-style policy documents returned to the gateway.

use std::fmt;

use serde::Serialize;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Allow => write!(f, "Allow"),
            Effect::Deny => write!(f, "Deny"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: &'static str,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub effect: Effect,
    pub action: &'static str,
    pub resource: Vec<String>,
}

/// Builds a single-statement policy for exactly `resource`.
///
/// Never a wildcard: a cached Allow for one route must not cover another.
pub fn build_policy(resource: &str, effect: Effect) -> PolicyDocument {
    PolicyDocument {
        version: POLICY_VERSION,
        statement: vec![PolicyStatement {
            effect,
            action: INVOKE_ACTION,
            resource: vec![resource.to_string()],
        }],
    }
}

impl PolicyDocument {
    pub fn effect(&self) -> Effect {
        // Deny unless every statement allows.
        if !self.statement.is_empty() && self.statement.iter().all(|s| s.effect == Effect::Allow) {
            Effect::Allow
        } else {
            Effect::Deny
        }
    }
}
