//! Translates between document variable names (`{attribute_subject}`) and wizard attribute
//! names (`subject_attribute`), and fills placeholders with personalization values.

use indexmap::IndexMap;
use log::{debug, warn};
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::models::variables::{HeroVariables, VariableKind, VariableMapping, VariableRef};

/// Tokens known to name a personalization subject.
const SUBJECT_TOKENS: &[&str] = &[
    "child", "kid", "baby", "hero", "mother", "mom", "mum", "father", "dad", "parent", "grandmother",
    "grandma", "grandfather", "grandpa", "sister", "brother", "sibling", "aunt", "uncle", "cousin",
    "friend", "partner", "teacher", "pet", "dog", "cat",
];

/// Tokens known to name an attribute of a subject.
const ATTRIBUTE_TOKENS: &[&str] = &[
    "name", "nickname", "age", "gender", "pronoun", "pronouns", "skin", "skintone", "hair",
    "haircolor", "hairstyle", "eyes", "eyecolor", "glasses", "beard", "outfit", "city", "hobby",
    "dedication",
];

fn is_subject(token: &str) -> bool {
    SUBJECT_TOKENS
        .iter()
        .any(|subject| subject.eq_ignore_ascii_case(token))
}

fn is_attribute(token: &str) -> bool {
    ATTRIBUTE_TOKENS
        .iter()
        .any(|attribute| attribute.eq_ignore_ascii_case(token))
}

/// Splits `token` on underscores into exactly two non-empty parts.
fn split_pair(token: &str) -> Option<(&str, &str)> {
    let mut parts = token.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) if !first.is_empty() && !second.is_empty() => {
            Some((first, second))
        }
        _ => None,
    }
}

/// Removes enclosing braces and surrounding whitespace from a variable token.
fn strip_braces(variable: &str) -> &str {
    variable
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .trim()
}

/// Decomposes a document variable such as `{name_child}` into subject and attribute.
///
/// Returns `None` when the token does not split into exactly two parts; callers then treat the
/// token as literal text. When neither part is a known subject or attribute, the first part is
/// taken as the attribute and the second as the subject.
pub fn parse_variable(variable: &str) -> Option<VariableRef> {
    let (first, second) = split_pair(strip_braces(variable))?;

    let (hero_id, attribute_id) = if is_subject(first) {
        (first, second)
    } else if is_subject(second) {
        (second, first)
    } else if is_attribute(first) {
        (second, first)
    } else if is_attribute(second) {
        (first, second)
    } else {
        debug!(
            "[parse_variable] Neither part of {} is a known token; assuming attribute_subject",
            variable
        );
        (second, first)
    };

    Some(VariableRef {
        hero_id: hero_id.to_string(),
        attribute_id: attribute_id.to_string(),
    })
}

/// The wizard attribute name for a variable: `heroId_attributeId`.
pub fn to_wizard_name(reference: &VariableRef) -> String {
    format!("{}_{}", reference.hero_id, reference.attribute_id)
}

/// The document variable for a wizard attribute name: `heroId_attributeId` -> `{attributeId_heroId}`.
/// The two conventions order the parts differently.
pub fn to_document_variable(wizard_name: &str) -> Option<String> {
    let (hero_id, attribute_id) = split_pair(wizard_name.trim())?;
    Some(format!("{{{}_{}}}", attribute_id, hero_id))
}

/// Classifies a variable for the wizard: `name` is free text, anything else is a choice.
pub fn variable_kind(reference: &VariableRef) -> VariableKind {
    if reference.attribute_id.eq_ignore_ascii_case("name") {
        VariableKind::Text
    } else {
        VariableKind::Characteristic
    }
}

/// A brace-delimited placeholder. Braces cannot nest, so an unclosed `{` before a placeholder
/// stays literal text.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^{}]+)\}").expect("BUG: invalid PLACEHOLDER_RE regex literal")
});

/// Lists the brace-delimited placeholders in `text`, without braces, in order of first appearance.
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();

    for captures in PLACEHOLDER_RE.captures_iter(text) {
        let name = captures[1].trim();
        if !name.is_empty() && seen.insert(name.to_string()) {
            found.push(name.to_string());
        }
    }

    found
}

/// Builds the wizard configuration for a set of document variables: one group per subject in
/// order of first appearance, each variable once. Unparseable names are skipped.
pub fn map_variables<'a, I>(variables: I) -> Vec<HeroVariables>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: IndexMap<String, Vec<VariableMapping>> = IndexMap::new();
    let mut seen = HashSet::new();

    for variable in variables {
        let document_name = strip_braces(variable).to_string();
        if !seen.insert(document_name.clone()) {
            continue;
        }
        let Some(reference) = parse_variable(&document_name) else {
            warn!("Skipping unparseable variable {}", variable);
            continue;
        };

        let mapping = VariableMapping {
            document_name,
            wizard_name: to_wizard_name(&reference),
            kind: variable_kind(&reference),
            reference,
        };
        groups
            .entry(mapping.reference.hero_id.clone())
            .or_default()
            .push(mapping);
    }

    groups
        .into_iter()
        .map(|(hero_id, variables)| HeroVariables { hero_id, variables })
        .collect()
}

/// Replaces each `{attribute_subject}` placeholder with the wizard value stored under its wizard
/// name. Placeholders are the ones `extract_variables` lists; those that do not parse or have no
/// value stay as written.
pub fn substitute_variables(text: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |captures: &Captures| {
            let token = &captures[0];
            let value = parse_variable(token)
                .map(|reference| to_wizard_name(&reference))
                .and_then(|wizard_name| values.get(&wizard_name));

            match value {
                Some(value) => value.clone(),
                None => {
                    debug!("[substitute_variables] Leaving {} unsubstituted", token);
                    token.to_string()
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_and_wizard_names_round_trip() {
        let reference = parse_variable("name_child").unwrap();
        assert_eq!(to_wizard_name(&reference), "child_name");
        assert_eq!(to_document_variable("child_name").unwrap(), "{name_child}");
    }

    #[test]
    fn braces_and_whitespace_are_stripped() {
        let reference = parse_variable(" {name_child} ").unwrap();
        assert_eq!(reference.hero_id, "child");
        assert_eq!(reference.attribute_id, "name");
    }

    #[test]
    fn wrong_part_count_is_unparseable() {
        assert_eq!(parse_variable("invalid"), None);
        assert_eq!(parse_variable("{hair_color_child}"), None);
        assert_eq!(parse_variable("name_"), None);
        assert_eq!(to_document_variable("child"), None);
    }

    #[test]
    fn subject_is_found_in_either_position() {
        let subject_first = parse_variable("mother_age").unwrap();
        assert_eq!(subject_first.hero_id, "mother");
        assert_eq!(subject_first.attribute_id, "age");

        let subject_second = parse_variable("age_mother").unwrap();
        assert_eq!(subject_second.hero_id, "mother");
        assert_eq!(subject_second.attribute_id, "age");
    }

    #[test]
    fn attribute_vocabulary_decides_by_elimination() {
        let attribute_first = parse_variable("hair_robot").unwrap();
        assert_eq!(attribute_first.hero_id, "robot");
        assert_eq!(attribute_first.attribute_id, "hair");

        let attribute_second = parse_variable("robot_hair").unwrap();
        assert_eq!(attribute_second.hero_id, "robot");
        assert_eq!(attribute_second.attribute_id, "hair");
    }

    #[test]
    fn unknown_tokens_fall_back_to_attribute_subject() {
        let reference = parse_variable("wand_wizard").unwrap();
        assert_eq!(reference.attribute_id, "wand");
        assert_eq!(reference.hero_id, "wizard");
    }

    #[test]
    fn placeholders_are_extracted_in_order() {
        let text = "{name_child} and {name_dog} saw {name_child}. {broken {age_child}}";
        // "{broken " never closes before the next brace, so it is not a placeholder.
        assert_eq!(
            extract_variables(text),
            vec!["name_child", "name_dog", "age_child"]
        );
    }

    #[test]
    fn batch_groups_by_subject_and_classifies() {
        let groups = map_variables([
            "{name_child}",
            "{hair_child}",
            "{name_dog}",
            "{name_child}",
            "nope",
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].hero_id, "child");
        assert_eq!(groups[0].variables.len(), 2);
        assert_eq!(groups[0].variables[0].kind, VariableKind::Text);
        assert_eq!(groups[0].variables[1].kind, VariableKind::Characteristic);
        assert_eq!(groups[0].variables[1].wizard_name, "child_hair");
        assert_eq!(groups[1].hero_id, "dog");
    }

    #[test]
    fn substitution_uses_wizard_names() {
        let mut values = HashMap::new();
        values.insert("child_name".to_string(), "Mia".to_string());

        assert_eq!(
            substitute_variables("Happy birthday, {name_child}! {age_child} {oops", &values),
            "Happy birthday, Mia! {age_child} {oops"
        );
    }

    #[test]
    fn substitution_matches_extraction_around_stray_braces() {
        let mut values = HashMap::new();
        values.insert("child_name".to_string(), "Mia".to_string());
        let text = "To {my {name_child}";

        assert_eq!(extract_variables(text), vec!["name_child"]);
        assert_eq!(substitute_variables(text, &values), "To {my Mia");
    }
}
