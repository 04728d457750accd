//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Suo.
//! The Suo project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Suo Analysis Nodes
//!
//! The analyzer and normalizer families. An analysis node is either a
//! BUILTIN one, referenced purely by name (`"standard"`, `"lowercase"`), or
//! a CUSTOM one carrying its own definition body. Inside a field mapping
//! both render as their bare name; the custom body is exposed separately
//! through [`SuoAnalysis::definition`] so index settings can be assembled
//! from the fields that use it.

use crate::dsl::{SuoDslData, SuoDslNode, SuoParamInput, SuoParamMap, SuoParamValue, SuoToValue};
use crate::errors::{Result, SuoError};
use crate::registry::{SuoClassDef, SuoRegistry};
use crate::value::SuoValue;

/// The two concrete shapes an analysis node takes.
#[derive(Debug, Clone)]
enum SuoAnalysisForm {
    Builtin,
    Custom {
        builtin_type: String,
        data: SuoDslData,
    },
}

/// One analyzer or normalizer.
#[derive(Debug, Clone)]
pub struct SuoAnalysis {
    family: &'static str,
    name: String,
    form: SuoAnalysisForm,
}

/// Analysis nodes render as their bare name, so equality follows suit:
/// same family, same form, same name. Definitions are looked up by name at
/// the settings layer and do not take part.
impl PartialEq for SuoAnalysis {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family
            && self.is_builtin() == other.is_builtin()
            && self.name == other.name
    }
}

impl SuoAnalysis {
    fn builtin(family: &'static str, name: String) -> SuoAnalysis {
        SuoAnalysis {
            family,
            name,
            form: SuoAnalysisForm::Builtin,
        }
    }

    fn custom(family: &'static str, name: String, builtin_type: String) -> SuoAnalysis {
        SuoAnalysis {
            family,
            name,
            form: SuoAnalysisForm::Custom {
                builtin_type,
                data: SuoDslData::new(),
            },
        }
    }

    /// A builtin analyzer referenced by name.
    pub fn analyzer(name: impl Into<String>) -> SuoAnalysis {
        SuoAnalysis::builtin("analyzer", name.into())
    }

    /// A builtin normalizer referenced by name.
    pub fn normalizer(name: impl Into<String>) -> SuoAnalysis {
        SuoAnalysis::builtin("normalizer", name.into())
    }

    /// A custom analyzer: `name` is what fields reference, `builtin_type`
    /// what its definition is based on (`"custom"` for tokenizer-based
    /// ones).
    pub fn custom_analyzer(name: impl Into<String>, builtin_type: impl Into<String>) -> SuoAnalysis {
        SuoAnalysis::custom("analyzer", name.into(), builtin_type.into())
    }

    /// A custom normalizer.
    pub fn custom_normalizer(
        name: impl Into<String>,
        builtin_type: impl Into<String>,
    ) -> SuoAnalysis {
        SuoAnalysis::custom("normalizer", name.into(), builtin_type.into())
    }

    /// The family this node belongs to: `"analyzer"` or `"normalizer"`.
    pub fn type_name(&self) -> &'static str {
        self.family
    }

    /// The name fields reference this node by.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.form, SuoAnalysisForm::Builtin)
    }

    /// The builtin type a custom node is based on.
    pub fn builtin_type(&self) -> Option<&str> {
        match &self.form {
            SuoAnalysisForm::Builtin => None,
            SuoAnalysisForm::Custom { builtin_type, .. } => Some(builtin_type),
        }
    }

    /// Sets a definition parameter. Builtin nodes have no definition and
    /// reject parameters.
    pub fn set_param(&mut self, name: &str, input: impl Into<SuoParamInput>) -> Result<()> {
        match &mut self.form {
            SuoAnalysisForm::Builtin => Err(SuoError::illegal_argument(format!(
                "a builtin {} does not take parameters",
                self.family
            ))),
            SuoAnalysisForm::Custom { data, .. } => data.set_param(&[], name, input.into()),
        }
    }

    pub fn param(&self, name: &str) -> Option<&SuoParamValue> {
        match &self.form {
            SuoAnalysisForm::Builtin => None,
            SuoAnalysisForm::Custom { data, .. } => data.param(name),
        }
    }

    /// The analysis definition body of a custom node
    /// (`{...params, "type": <builtin type>}`), `None` for builtin ones.
    pub fn definition(&self) -> Result<Option<SuoValue>> {
        match &self.form {
            SuoAnalysisForm::Builtin => Ok(None),
            SuoAnalysisForm::Custom { builtin_type, data } => {
                let rendered = data.params_to_value()?;
                if let SuoValue::Map(handle) = &rendered {
                    handle
                        .borrow_mut()
                        .insert("type".to_string(), SuoValue::from(builtin_type.as_str()));
                }
                Ok(Some(rendered))
            }
        }
    }
}

impl SuoToValue for SuoAnalysis {
    /// Analysis nodes appear by name only in field mappings, custom ones
    /// included.
    fn to_value(&self) -> Result<SuoValue> {
        Ok(SuoValue::Str(self.name.clone()))
    }
}

impl std::fmt::Display for SuoAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.form {
            SuoAnalysisForm::Builtin => write!(f, "{}('{}')", self.family, self.name),
            SuoAnalysisForm::Custom { builtin_type, data } => {
                write!(f, "custom_{}('{}', type='{}'", self.family, self.name, builtin_type)?;
                if !data.is_empty() {
                    write!(f, ", ")?;
                    data.fmt_params(f)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Coerces loose input into an analyzer node: a string names a builtin, a
/// mapping (with `name` and optional `type`) defines a custom one.
pub fn construct_analyzer(input: impl Into<SuoParamInput>) -> Result<SuoAnalysis> {
    construct_analysis("analyzer", input.into())
}

/// Coerces loose input into a normalizer node.
pub fn construct_normalizer(input: impl Into<SuoParamInput>) -> Result<SuoAnalysis> {
    construct_analysis("normalizer", input.into())
}

fn construct_analysis(family: &'static str, input: SuoParamInput) -> Result<SuoAnalysis> {
    match input {
        SuoParamInput::Node(node) => {
            let analysis = node.into_analysis()?;
            if analysis.family != family {
                return Err(SuoError::illegal_argument(format!(
                    "expected a {} node, got a {} node",
                    family, analysis.family
                )));
            }
            Ok(analysis)
        }
        SuoParamInput::Value(SuoValue::Str(name)) => Ok(SuoAnalysis::builtin(family, name)),
        SuoParamInput::Map(entries) => {
            let mut bag = SuoParamMap::new();
            for (name, entry) in entries {
                bag.insert(name, entry);
            }
            construct_custom(family, bag)
        }
        SuoParamInput::Value(value @ SuoValue::Map(_)) => {
            construct_custom(family, SuoParamMap::from_value(&value)?)
        }
        other => Err(SuoError::illegal_argument(format!(
            "cannot construct a {} from {:?}",
            family, other
        ))),
    }
}

/// Custom construction goes through the registry so the concrete class is
/// looked up by its builtin type, with `"custom"` as the registered
/// default.
fn construct_custom(family: &'static str, mut bag: SuoParamMap) -> Result<SuoAnalysis> {
    let builtin_type = bag
        .take_str("type")?
        .unwrap_or_else(|| "custom".to_string());
    let def = SuoRegistry::global().dsl_class_or(family, &builtin_type, "custom")?;
    bag.insert("type", SuoValue::from(builtin_type.as_str()));
    (def.factory)(bag)?.into_analysis()
}

fn build_builtin(family: &'static str, mut params: SuoParamMap) -> Result<SuoDslNode> {
    let name = params.take_str("name")?.ok_or_else(|| {
        SuoError::illegal_argument(format!("a builtin {} needs a 'name'", family))
    })?;
    if !params.is_empty() {
        return Err(SuoError::illegal_argument(format!(
            "a builtin {} only takes a name",
            family
        )));
    }
    Ok(SuoAnalysis::builtin(family, name).into())
}

fn build_custom(family: &'static str, mut params: SuoParamMap) -> Result<SuoDslNode> {
    let name = params.take_str("name")?.ok_or_else(|| {
        SuoError::illegal_argument(format!("a custom {} needs a 'name'", family))
    })?;
    let builtin_type = params
        .take_str("type")?
        .unwrap_or_else(|| "custom".to_string());
    let mut node = SuoAnalysis::custom(family, name, builtin_type);
    for (pname, input) in params.into_entries() {
        node.set_param(&pname, input)?;
    }
    Ok(node.into())
}

fn builtin_analyzer_node(params: SuoParamMap) -> Result<SuoDslNode> {
    build_builtin("analyzer", params)
}

fn custom_analyzer_node(params: SuoParamMap) -> Result<SuoDslNode> {
    build_custom("analyzer", params)
}

fn builtin_normalizer_node(params: SuoParamMap) -> Result<SuoDslNode> {
    build_builtin("normalizer", params)
}

fn custom_normalizer_node(params: SuoParamMap) -> Result<SuoDslNode> {
    build_custom("normalizer", params)
}

fn analyzer_shortcut(input: SuoParamInput) -> Result<SuoDslNode> {
    Ok(construct_analysis("analyzer", input)?.into())
}

fn normalizer_shortcut(input: SuoParamInput) -> Result<SuoDslNode> {
    Ok(construct_analysis("normalizer", input)?.into())
}

const ANALYZER_CLASSES: &[SuoClassDef] = &[
    SuoClassDef {
        name: "builtin",
        param_defs: &[],
        factory: builtin_analyzer_node,
    },
    SuoClassDef {
        name: "custom",
        param_defs: &[],
        factory: custom_analyzer_node,
    },
];

const NORMALIZER_CLASSES: &[SuoClassDef] = &[
    SuoClassDef {
        name: "builtin",
        param_defs: &[],
        factory: builtin_normalizer_node,
    },
    SuoClassDef {
        name: "custom",
        param_defs: &[],
        factory: custom_normalizer_node,
    },
];

pub(crate) fn register_defaults(registry: &mut SuoRegistry) {
    registry.register_family("analyzer", analyzer_shortcut);
    registry.register_family("normalizer", normalizer_shortcut);
    registry.register_classes("analyzer", ANALYZER_CLASSES);
    registry.register_classes("normalizer", NORMALIZER_CLASSES);
}
