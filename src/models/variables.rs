use serde::{Deserialize, Serialize};

/// A document variable decomposed into the personalization subject and its attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRef {
    /// The personalization target, e.g. `child`.
    pub hero_id: String,
    /// The property of that target, e.g. `name`.
    pub attribute_id: String,
}

/// Whether the wizard collects a variable as free text or as a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// The attribute is `name`: a free-text field.
    Text,
    /// Any other attribute: a choice selector.
    Characteristic,
}

/// One document variable and its wizard-side equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableMapping {
    /// The variable as written in the document, without braces (`name_child`).
    pub document_name: String,
    #[serde(flatten)]
    pub reference: VariableRef,
    /// The wizard attribute name (`child_name`).
    pub wizard_name: String,
    pub kind: VariableKind,
}

/// All variables of one subject, for configuring that subject's wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroVariables {
    pub hero_id: String,
    pub variables: Vec<VariableMapping>,
}
