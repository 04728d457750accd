//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Suo.
//! The Suo project belongs to the Dunimd project team.
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

//! # Suo DSL Registry
//!
//! The process-wide table of DSL families and their concrete classes. A
//! family ("field", "query", "analyzer", "normalizer") carries a shortcut
//! constructor that turns loose input into a node of that family; each
//! concrete class carries its registered name, its typed-parameter table,
//! and a factory building instances from a parameter bag.
//!
//! Registration happens once, at startup: [`SuoRegistry::with_defaults`]
//! builds the builtin table, [`SuoRegistry::install`] lets startup code swap
//! in an extended one BEFORE first use, and [`SuoRegistry::global`] hands out
//! the frozen table for lock-free lookups afterwards. Within a registry,
//! the FIRST registration of a name wins; later ones are ignored.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::dsl::{SuoDslNode, SuoParamDefs, SuoParamInput, SuoParamMap};
use crate::errors::{Result, SuoError};

/// Family shortcut constructor: loose input to a node of the family.
pub type SuoShortcut = fn(SuoParamInput) -> Result<SuoDslNode>;

/// Concrete class factory: a parameter bag to a node instance.
pub type SuoNodeFactory = fn(SuoParamMap) -> Result<SuoDslNode>;

/// One registered concrete class.
#[derive(Clone, Copy)]
pub struct SuoClassDef {
    /// The wire name the class is registered under (`"text"`, `"bool"`...).
    pub name: &'static str,
    /// Typed-parameter table driving the parameter engine.
    pub param_defs: SuoParamDefs,
    /// Builds an instance from a parameter bag.
    pub factory: SuoNodeFactory,
}

impl std::fmt::Debug for SuoClassDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuoClassDef").field("name", &self.name).finish()
    }
}

/// One registered family: its shortcut plus its class table.
pub struct SuoFamily {
    type_name: &'static str,
    shortcut: SuoShortcut,
    classes: HashMap<&'static str, SuoClassDef>,
}

impl SuoFamily {
    fn new(type_name: &'static str, shortcut: SuoShortcut) -> SuoFamily {
        SuoFamily {
            type_name,
            shortcut,
            classes: HashMap::new(),
        }
    }
}

/// The two-level DSL registry.
#[derive(Default)]
pub struct SuoRegistry {
    families: HashMap<&'static str, SuoFamily>,
}

static GLOBAL: OnceLock<SuoRegistry> = OnceLock::new();

impl SuoRegistry {
    /// An empty registry. Extension code usually starts from
    /// [`SuoRegistry::with_defaults`] instead.
    pub fn new() -> SuoRegistry {
        SuoRegistry {
            families: HashMap::new(),
        }
    }

    /// The builtin table: field, query, analyzer, and normalizer families
    /// with all their concrete classes.
    pub fn with_defaults() -> SuoRegistry {
        let mut registry = SuoRegistry::new();
        crate::fields::register_defaults(&mut registry);
        crate::query::register_defaults(&mut registry);
        crate::analysis::register_defaults(&mut registry);
        log::debug!(
            "DSL registry bootstrapped with {} families",
            registry.families.len()
        );
        registry
    }

    /// The process-wide registry, bootstrapping the builtin table on first
    /// use. Read-only once handed out.
    pub fn global() -> &'static SuoRegistry {
        GLOBAL.get_or_init(SuoRegistry::with_defaults)
    }

    /// Installs `registry` as the process-wide table. The first install (or
    /// first [`SuoRegistry::global`] call) wins; returns whether this call
    /// installed it.
    pub fn install(registry: SuoRegistry) -> bool {
        let installed = GLOBAL.set(registry).is_ok();
        if !installed {
            log::warn!("global DSL registry already initialized, install ignored");
        }
        installed
    }

    /// Registers a family and its shortcut constructor. First registration
    /// of a type name wins.
    pub fn register_family(&mut self, type_name: &'static str, shortcut: SuoShortcut) {
        if self.families.contains_key(type_name) {
            log::warn!(
                "DSL family '{}' already registered, keeping the first registration",
                type_name
            );
            return;
        }
        self.families
            .insert(type_name, SuoFamily::new(type_name, shortcut));
    }

    /// Registers a concrete class in `family`. First registration of a name
    /// wins; the family must exist.
    pub fn register_class(&mut self, family: &str, def: SuoClassDef) -> Result<()> {
        let entry = self
            .families
            .get_mut(family)
            .ok_or_else(|| SuoError::UnknownDslType(family.to_string()))?;
        if entry.classes.contains_key(def.name) {
            log::debug!(
                "DSL class '{}' already registered in {}, keeping the first registration",
                def.name,
                entry.type_name
            );
            return Ok(());
        }
        entry.classes.insert(def.name, def);
        Ok(())
    }

    /// Registers a table of classes in `family`, warning instead of failing
    /// when the family is missing.
    pub fn register_classes(&mut self, family: &str, defs: &[SuoClassDef]) {
        for def in defs {
            if let Err(err) = self.register_class(family, *def) {
                log::warn!("skipping DSL class registration: {}", err);
            }
        }
    }

    /// The shortcut constructor of a family.
    pub fn shortcut(&self, family: &str) -> Result<SuoShortcut> {
        self.families
            .get(family)
            .map(|entry| entry.shortcut)
            .ok_or_else(|| SuoError::UnknownDslType(family.to_string()))
    }

    /// Looks up a concrete class by name.
    pub fn dsl_class(&self, family: &str, name: &str) -> Result<&SuoClassDef> {
        let entry = self
            .families
            .get(family)
            .ok_or_else(|| SuoError::UnknownDslType(family.to_string()))?;
        entry
            .classes
            .get(name)
            .ok_or_else(|| SuoError::unknown_class(family, name))
    }

    /// Looks up a concrete class by name, falling back to a registered
    /// default name. The error still names the originally requested class.
    pub fn dsl_class_or(&self, family: &str, name: &str, default: &str) -> Result<&SuoClassDef> {
        let entry = self
            .families
            .get(family)
            .ok_or_else(|| SuoError::UnknownDslType(family.to_string()))?;
        entry
            .classes
            .get(name)
            .or_else(|| entry.classes.get(default))
            .ok_or_else(|| SuoError::unknown_class(family, name))
    }

    /// Constructs a node of `family`/`name` from a parameter bag.
    pub fn construct(&self, family: &str, name: &str, params: SuoParamMap) -> Result<SuoDslNode> {
        let def = self.dsl_class(family, name)?;
        (def.factory)(params)
    }

    /// Registered family names.
    pub fn family_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.families.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Registered class names of a family.
    pub fn class_names(&self, family: &str) -> Result<Vec<&'static str>> {
        let entry = self
            .families
            .get(family)
            .ok_or_else(|| SuoError::UnknownDslType(family.to_string()))?;
        let mut names: Vec<&'static str> = entry.classes.keys().copied().collect();
        names.sort_unstable();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_families_are_registered() {
        let registry = SuoRegistry::with_defaults();
        assert_eq!(
            registry.family_names(),
            vec!["analyzer", "field", "normalizer", "query"]
        );
    }

    #[test]
    fn unknown_names_error_with_context() {
        let registry = SuoRegistry::with_defaults();
        let err = registry.shortcut("aggregation").unwrap_err();
        assert_eq!(err.to_string(), "DSL type 'aggregation' does not exist");

        let err = registry.dsl_class("field", "hyperloglog").unwrap_err();
        assert_eq!(
            err.to_string(),
            "DSL class 'hyperloglog' does not exist in field"
        );
    }

    #[test]
    fn class_lookup_falls_back_to_default() {
        let registry = SuoRegistry::with_defaults();
        let def = registry
            .dsl_class_or("analyzer", "no_such_analyzer", "custom")
            .unwrap();
        assert_eq!(def.name, "custom");

        // The error still names the requested class when the default is
        // missing too.
        let err = registry
            .dsl_class_or("analyzer", "no_such_analyzer", "also_missing")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "DSL class 'no_such_analyzer' does not exist in analyzer"
        );
    }

    #[test]
    fn first_class_registration_wins() {
        let mut registry = SuoRegistry::with_defaults();
        let original_defs = registry.dsl_class("field", "text").unwrap().param_defs;
        let factory = registry.dsl_class("field", "keyword").unwrap().factory;
        registry
            .register_class(
                "field",
                SuoClassDef {
                    name: "text",
                    param_defs: &[],
                    factory,
                },
            )
            .unwrap();
        let kept = registry.dsl_class("field", "text").unwrap();
        assert_eq!(kept.param_defs.len(), original_defs.len());
        assert!(!kept.param_defs.is_empty());
    }
}
