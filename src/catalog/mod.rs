//! Skill catalog: role weights, aliases, clusters and action verbs
//!
//! Loaded once at startup (built-in defaults or a TOML file) and never
//! mutated afterwards. Each role is compiled into an Aho-Corasick matcher
//! over every lowercase surface form of its skills.

mod defaults;

use crate::error::{Result, RankerError};
use aho_corasick::AhoCorasick;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Serializable form of the catalog, as written in a catalog TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSpec {
    #[serde(default)]
    pub action_verbs: Vec<String>,
    #[serde(default)]
    pub roles: BTreeMap<String, BTreeMap<String, u8>>,
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub clusters: BTreeMap<String, Vec<String>>,
}

/// A role's weighted skills, ready for line matching
#[derive(Debug, Clone)]
pub struct RoleProfile {
    name: String,
    skills: Vec<(String, u8)>,
    matcher: Option<AhoCorasick>,
    // pattern id -> index into `skills`
    pattern_skill: Vec<usize>,
}

impl RoleProfile {
    fn compile(
        name: &str,
        weights: &BTreeMap<String, u8>,
        aliases: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self> {
        let mut skills = Vec::with_capacity(weights.len());
        let mut patterns = Vec::new();
        let mut pattern_skill = Vec::new();

        for (skill_idx, (skill, weight)) in weights.iter().enumerate() {
            if !(1..=5).contains(weight) {
                return Err(RankerError::Configuration(format!(
                    "Weight for '{}' in role '{}' must be between 1 and 5, got {}",
                    skill, name, weight
                )));
            }
            skills.push((skill.clone(), *weight));

            let forms = std::iter::once(skill)
                .chain(aliases.get(skill).into_iter().flatten());
            let mut seen = BTreeSet::new();
            for form in forms {
                let form = form.trim().to_lowercase();
                if !form.is_empty() && seen.insert(form.clone()) {
                    patterns.push(form);
                    pattern_skill.push(skill_idx);
                }
            }
        }

        let matcher = if patterns.is_empty() {
            None
        } else {
            Some(AhoCorasick::new(&patterns).map_err(|e| {
                RankerError::Configuration(format!("Failed to build matcher for role '{}': {}", name, e))
            })?)
        };

        Ok(Self {
            name: name.to_string(),
            skills,
            matcher,
            pattern_skill,
        })
    }

    /// Profile with no skills, used for roles missing from the catalog
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            skills: Vec::new(),
            matcher: None,
            pattern_skill: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skills(&self) -> &[(String, u8)] {
        &self.skills
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Canonical skills whose name or alias occurs in `line` (case-insensitive),
    /// each reported once, in catalog order.
    pub fn matched_skills(&self, line: &str) -> Vec<(&str, u8)> {
        let Some(matcher) = &self.matcher else {
            return Vec::new();
        };

        let lowered = line.to_lowercase();
        let mut hit = vec![false; self.skills.len()];
        for mat in matcher.find_overlapping_iter(&lowered) {
            hit[self.pattern_skill[mat.pattern().as_usize()]] = true;
        }

        self.skills
            .iter()
            .zip(hit)
            .filter(|(_, matched)| *matched)
            .map(|((skill, weight), _)| (skill.as_str(), *weight))
            .collect()
    }
}

/// Immutable role/alias/cluster tables shared by every scoring pass
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    roles: HashMap<String, RoleProfile>,
    aliases: BTreeMap<String, Vec<String>>,
    clusters: BTreeMap<String, Vec<String>>,
    action_verbs: Vec<String>,
    action_verb_regex: Option<Regex>,
}

impl SkillCatalog {
    pub fn from_spec(spec: CatalogSpec) -> Result<Self> {
        let mut roles = HashMap::with_capacity(spec.roles.len());
        for (name, weights) in &spec.roles {
            roles.insert(name.clone(), RoleProfile::compile(name, weights, &spec.aliases)?);
        }

        let verbs: Vec<String> = spec
            .action_verbs
            .iter()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect();

        let action_verb_regex = if verbs.is_empty() {
            None
        } else {
            let alternation = verbs.iter().map(|v| regex::escape(v)).collect::<Vec<_>>().join("|");
            Some(Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).map_err(|e| {
                RankerError::Configuration(format!("Invalid action verb list: {}", e))
            })?)
        };

        Ok(Self {
            roles,
            aliases: spec.aliases,
            clusters: spec.clusters,
            action_verbs: verbs,
            action_verb_regex,
        })
    }

    /// Read a catalog TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let spec: CatalogSpec = toml::from_str(&content).map_err(|e| {
            RankerError::Configuration(format!("Failed to parse catalog {}: {}", path.display(), e))
        })?;
        Self::from_spec(spec)
    }

    /// Catalog from the config's `catalog_path`, or the built-in one
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn builtin() -> Self {
        // The built-in tables are static and known to compile
        Self::from_spec(defaults::builtin_spec()).unwrap_or_else(|_| Self::empty())
    }

    pub fn empty() -> Self {
        Self {
            roles: HashMap::new(),
            aliases: BTreeMap::new(),
            clusters: BTreeMap::new(),
            action_verbs: Vec::new(),
            action_verb_regex: None,
        }
    }

    pub fn role(&self, name: &str) -> Option<&RoleProfile> {
        self.roles.get(name)
    }

    pub fn role_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn aliases(&self) -> &BTreeMap<String, Vec<String>> {
        &self.aliases
    }

    pub fn clusters(&self) -> &BTreeMap<String, Vec<String>> {
        &self.clusters
    }

    pub fn action_verbs(&self) -> &[String] {
        &self.action_verbs
    }

    pub fn has_action_verb(&self, line: &str) -> bool {
        self.action_verb_regex
            .as_ref()
            .is_some_and(|re| re.is_match(line))
    }

    /// Per-cluster count of cluster skills present in `matched`
    pub fn cluster_scores(&self, matched: &BTreeSet<String>) -> BTreeMap<String, usize> {
        self.clusters
            .iter()
            .map(|(cluster, skills)| {
                let count = skills.iter().filter(|s| matched.contains(*s)).count();
                (cluster.clone(), count)
            })
            .collect()
    }
}
