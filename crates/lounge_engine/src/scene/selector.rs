//! Node selectors
//!
//! A small subset of CSS selectors, enough to pick candidate nodes:
//! a comma-separated list of compound chains such as `a-box`, `#rig`,
//! `.room .prop`, `a-scene > [lounge-plinth]`, or
//! `a-entity.prop[lounge-staydown]`. Descendant (whitespace) and child (`>`)
//! combinators are supported; sibling combinators and pseudo-classes are not.

use std::fmt;
use std::str::FromStr;

use super::tree::SceneNode;
use super::SceneError;

fn invalid(whole: &str, reason: &str) -> SceneError {
    SceneError::InvalidSelector {
        selector: whole.to_string(),
        reason: reason.to_string(),
    }
}

/// One compound selector; every present part must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Required tag name
    pub tag: Option<String>,
    /// Required element id
    pub id: Option<String>,
    /// Required classes
    pub classes: Vec<String>,
    /// Required attached components
    pub components: Vec<String>,
}

impl CompoundSelector {
    /// Check a node against every part of the compound
    pub fn matches(&self, node: &SceneNode) -> bool {
        self.tag.as_deref().map_or(true, |tag| node.tag() == tag)
            && self.id.as_deref().map_or(true, |id| node.element_id() == Some(id))
            && self.classes.iter().all(|class| node.has_class(class))
            && self.components.iter().all(|name| node.has_component(name))
    }

    fn parse(text: &str, whole: &str) -> Result<Self, SceneError> {
        let invalid = |reason: &str| invalid(whole, reason);

        let mut compound = Self::default();
        let mut rest = text;

        let tag_len = name_len(rest);
        if tag_len > 0 {
            compound.tag = Some(rest[..tag_len].to_string());
            rest = &rest[tag_len..];
        }

        while let Some(marker) = rest.chars().next() {
            rest = &rest[marker.len_utf8()..];
            match marker {
                '#' | '.' => {
                    let len = name_len(rest);
                    if len == 0 {
                        return Err(invalid("expected a name after `#` or `.`"));
                    }
                    let name = rest[..len].to_string();
                    rest = &rest[len..];
                    if marker == '#' {
                        if compound.id.is_some() {
                            return Err(invalid("more than one id in a compound"));
                        }
                        compound.id = Some(name);
                    } else {
                        compound.classes.push(name);
                    }
                }
                '[' => {
                    let close = rest.find(']').ok_or_else(|| invalid("unclosed `[`"))?;
                    let name = rest[..close].trim();
                    if name.is_empty() || name_len(name) != name.len() {
                        return Err(invalid("expected a component name inside `[...]`"));
                    }
                    compound.components.push(name.to_string());
                    rest = &rest[close + 1..];
                }
                _ => return Err(invalid("unexpected character")),
            }
        }

        if compound == Self::default() {
            return Err(invalid("empty compound"));
        }
        Ok(compound)
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, "{tag}")?;
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for name in &self.components {
            write!(f, "[{name}]")?;
        }
        Ok(())
    }
}

/// Relation between a compound and the one to its left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Any ancestor (`a b`)
    Descendant,
    /// Direct parent (`a > b`)
    Child,
}

/// Chain of compounds; the last one is matched against the node itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    compounds: Vec<CompoundSelector>,
    /// `combinators[i]` links `compounds[i]` to `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

impl ComplexSelector {
    fn single(compound: CompoundSelector) -> Self {
        Self {
            compounds: vec![compound],
            combinators: Vec::new(),
        }
    }

    fn parse(text: &str, whole: &str) -> Result<Self, SceneError> {
        let spaced = text.replace('>', " > ");
        let mut compounds = Vec::new();
        let mut combinators = Vec::new();
        let mut pending = None;

        for token in spaced.split_whitespace() {
            if token == ">" {
                if compounds.is_empty() || pending.is_some() {
                    return Err(invalid(whole, "`>` needs a compound on each side"));
                }
                pending = Some(Combinator::Child);
                continue;
            }
            let compound = CompoundSelector::parse(token, whole)?;
            if !compounds.is_empty() {
                combinators.push(pending.take().unwrap_or(Combinator::Descendant));
            }
            compounds.push(compound);
        }

        if compounds.is_empty() {
            return Err(invalid(whole, "empty compound"));
        }
        if pending.is_some() {
            return Err(invalid(whole, "`>` needs a compound on each side"));
        }
        Ok(Self { compounds, combinators })
    }

    /// Compounds from outermost to the subject
    pub fn compounds(&self) -> &[CompoundSelector] {
        &self.compounds
    }

    /// Combinators between consecutive compounds
    pub fn combinators(&self) -> &[Combinator] {
        &self.combinators
    }

    /// Match against `path`: the node first, then its ancestors up to the root
    pub fn matches_path(&self, path: &[&SceneNode]) -> bool {
        self.compounds
            .len()
            .checked_sub(1)
            .is_some_and(|subject| self.matches_at(subject, path))
    }

    fn matches_at(&self, index: usize, path: &[&SceneNode]) -> bool {
        let Some((node, ancestors)) = path.split_first() else {
            return false;
        };
        if !self.compounds[index].matches(node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => self.matches_at(index - 1, ancestors),
            Combinator::Descendant => (0..ancestors.len()).any(|i| self.matches_at(index - 1, &ancestors[i..])),
        }
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, compound) in self.compounds.iter().enumerate() {
            if i > 0 {
                match self.combinators[i - 1] {
                    Combinator::Descendant => f.write_str(" ")?,
                    Combinator::Child => f.write_str(" > ")?,
                }
            }
            write!(f, "{compound}")?;
        }
        Ok(())
    }
}

/// Selector list; a node matches if any alternative matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<ComplexSelector>,
}

impl Selector {
    /// Parse a selector, treating blank text as "no selector"
    pub fn parse_optional(text: &str) -> Result<Option<Self>, SceneError> {
        if text.trim().is_empty() {
            Ok(None)
        } else {
            text.parse().map(Some)
        }
    }

    /// Selector matching nodes that carry `component`
    pub fn component(component: &str) -> Self {
        Self {
            alternatives: vec![ComplexSelector::single(CompoundSelector {
                components: vec![component.to_string()],
                ..Default::default()
            })],
        }
    }

    /// Selector matching the node with element id `id`
    pub fn id(id: &str) -> Self {
        Self {
            alternatives: vec![ComplexSelector::single(CompoundSelector {
                id: Some(id.to_string()),
                ..Default::default()
            })],
        }
    }

    /// Alternatives in this list
    pub fn alternatives(&self) -> &[ComplexSelector] {
        &self.alternatives
    }

    /// Match against `path`: the node first, then its ancestors up to the root
    pub fn matches_path(&self, path: &[&SceneNode]) -> bool {
        self.alternatives.iter().any(|complex| complex.matches_path(path))
    }
}

impl FromStr for Selector {
    type Err = SceneError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let alternatives = text
            .split(',')
            .map(|part| ComplexSelector::parse(part, text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { alternatives })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, complex) in self.alternatives.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{complex}")?;
        }
        Ok(())
    }
}

fn name_len(text: &str) -> usize {
    text.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(text.len())
}
