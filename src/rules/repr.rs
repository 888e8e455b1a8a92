//! JSON grammar for rules.
//!
//! A rule is either a bare string (a variable that must be set) or an object.
//! Object keys `env`, `any`, and `includes` (env rules) or `ne` (PR rules)
//! are reserved; every other key must map to a string and becomes an exact
//! equality requirement. A rule list is a single rule or an array of rules.
//!
//! When an object populates several fields, the variant is chosen by fixed
//! precedence, so e.g. `{"env":"A","any":["B"]}` is a presence check on `A`
//! for env rules but a value check on `A` for PR rules.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::rules::{EnvRule, EnvRules, PrRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    Env,
    Pr,
}

/// Fields of a rule object as written, before precedence is applied.
#[derive(Debug, Default)]
struct RawRule {
    env: String,
    includes: String,
    ne: String,
    any: Vec<String>,
    equals: BTreeMap<String, String>,
}

impl RawRule {
    fn from_key(key: &str) -> Self {
        Self {
            env: key.to_string(),
            ..Self::default()
        }
    }

    fn from_map<'de, A: MapAccess<'de>>(mut map: A, kind: RuleKind) -> Result<Self, A::Error> {
        let mut raw = Self::default();
        while let Some(key) = map.next_key::<String>()? {
            match (key.as_str(), kind) {
                ("env", _) => raw.env = map.next_value()?,
                ("any", _) => raw.any = map.next_value()?,
                ("includes", RuleKind::Env) => raw.includes = map.next_value()?,
                ("ne", RuleKind::Pr) => raw.ne = map.next_value()?,
                _ => {
                    let value: String = map.next_value()?;
                    raw.equals.insert(key, value);
                }
            }
        }
        Ok(raw)
    }

    fn into_env_rule(self) -> EnvRule {
        match self {
            RawRule { env, includes, .. } if !env.is_empty() && includes.is_empty() => {
                EnvRule::Present(env)
            }
            RawRule { env, includes, .. } if !env.is_empty() => EnvRule::Contains {
                key: env,
                substring: includes,
            },
            RawRule { any, .. } if !any.is_empty() => EnvRule::AnyPresent(any),
            RawRule { equals, .. } if !equals.is_empty() => EnvRule::AllEqual(equals),
            _ => EnvRule::Never,
        }
    }

    fn into_pr_rule(self) -> PrRule {
        match self {
            RawRule { env, any, ne, .. } if !env.is_empty() && any.is_empty() && ne.is_empty() => {
                PrRule::Present(env)
            }
            RawRule { env, any, .. } if !env.is_empty() && !any.is_empty() => PrRule::ValueIn {
                key: env,
                values: any,
            },
            RawRule { env, ne, .. } if !env.is_empty() => PrRule::NotEqual { key: env, value: ne },
            RawRule { any, .. } if !any.is_empty() => PrRule::AnyPresent(any),
            RawRule { equals, .. } if !equals.is_empty() => PrRule::AllEqual(equals),
            _ => PrRule::Never,
        }
    }
}

struct RawRuleVisitor(RuleKind);

impl<'de> Visitor<'de> for RawRuleVisitor {
    type Value = RawRule;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a variable name or a rule object")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawRule, E> {
        Ok(RawRule::from_key(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<RawRule, A::Error> {
        RawRule::from_map(map, self.0)
    }
}

impl<'de> Deserialize<'de> for EnvRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(RawRuleVisitor(RuleKind::Env))
            .map(RawRule::into_env_rule)
    }
}

impl<'de> Deserialize<'de> for PrRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(RawRuleVisitor(RuleKind::Pr))
            .map(RawRule::into_pr_rule)
    }
}

struct EnvRulesVisitor;

impl<'de> Visitor<'de> for EnvRulesVisitor {
    type Value = EnvRules;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a variable name, a rule object, or an array of rules")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<EnvRules, E> {
        Ok(RawRule::from_key(v).into_env_rule().into())
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<EnvRules, A::Error> {
        Ok(RawRule::from_map(map, RuleKind::Env)?.into_env_rule().into())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<EnvRules, A::Error> {
        let mut rules = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(rule) = seq.next_element::<EnvRule>()? {
            rules.push(rule);
        }
        Ok(EnvRules(rules))
    }
}

impl<'de> Deserialize<'de> for EnvRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EnvRulesVisitor)
    }
}

// ── Serialization ──

/// Serialize an object made of optional reserved fields plus equality pairs.
fn serialize_object<S: Serializer>(
    serializer: S,
    fields: &[(&str, FieldValue<'_>)],
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (key, value) in fields {
        match value {
            FieldValue::Str(s) => map.serialize_entry(key, s)?,
            FieldValue::List(l) => map.serialize_entry(key, l)?,
        }
    }
    map.end()
}

enum FieldValue<'a> {
    Str(&'a str),
    List(&'a [String]),
}

impl Serialize for EnvRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EnvRule::Present(key) => serializer.serialize_str(key),
            EnvRule::Contains { key, substring } if substring.is_empty() => {
                serializer.serialize_str(key)
            }
            EnvRule::Contains { key, substring } => serialize_object(
                serializer,
                &[("env", FieldValue::Str(key)), ("includes", FieldValue::Str(substring))],
            ),
            EnvRule::AnyPresent(keys) => {
                serialize_object(serializer, &[("any", FieldValue::List(keys))])
            }
            EnvRule::AllEqual(pairs) => pairs.serialize(serializer),
            EnvRule::Never => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

impl Serialize for PrRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PrRule::Present(key) => serializer.serialize_str(key),
            // Never matches, which has no shorter textual form.
            PrRule::ValueIn { key, .. } | PrRule::NotEqual { key, .. } if key.is_empty() => {
                serializer.serialize_map(Some(0))?.end()
            }
            PrRule::ValueIn { values, .. } if values.is_empty() => {
                serializer.serialize_map(Some(0))?.end()
            }
            PrRule::ValueIn { key, values } => serialize_object(
                serializer,
                &[("env", FieldValue::Str(key)), ("any", FieldValue::List(values))],
            ),
            // Present-and-differs-from-"" is the same check as presence.
            PrRule::NotEqual { key, value } if value.is_empty() => serializer.serialize_str(key),
            PrRule::NotEqual { key, value } => serialize_object(
                serializer,
                &[("env", FieldValue::Str(key)), ("ne", FieldValue::Str(value))],
            ),
            PrRule::AnyPresent(keys) => {
                serialize_object(serializer, &[("any", FieldValue::List(keys))])
            }
            PrRule::AllEqual(pairs) => pairs.serialize(serializer),
            PrRule::Never => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

impl Serialize for EnvRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for rule in &self.0 {
            seq.serialize_element(rule)?;
        }
        seq.end()
    }
}
