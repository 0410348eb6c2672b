use serde::{Deserialize, Serialize};

use crate::answers::AnswerState;
use crate::catalog::{Brand, User};

/// Answer fields feeding `Texto_Anuncio`, in lookup order.
pub const AD_TEXT_ALIASES: &[&str] = &["copy_anuncio", "texto_anuncio"];
/// Answer fields feeding `Presupuesto`, in lookup order.
pub const BUDGET_ALIASES: &[&str] = &["presupuesto_mensual", "presupuesto"];
/// Answer fields feeding `Comentarios`, in lookup order.
pub const COMMENTS_ALIASES: &[&str] = &["comentarios_adicionales", "comentarios"];

pub const DEFAULT_PRIORITY: &str = "Normal";

/// Fixed payload sent with `crearSolicitud`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionEnvelope {
    #[serde(rename = "ID_Usuario")]
    pub user_id: String,
    #[serde(rename = "Nombre_Usuario")]
    pub user_name: String,
    #[serde(rename = "ID_Marca")]
    pub brand_id: String,
    #[serde(rename = "Nombre_Marca")]
    pub brand_name: String,
    #[serde(rename = "Tipo_Materiales")]
    pub materials_type: String,
    #[serde(rename = "Prioridad")]
    pub priority: String,
    #[serde(rename = "Texto_Anuncio")]
    pub ad_text: String,
    #[serde(rename = "Presupuesto")]
    pub budget: String,
    #[serde(rename = "Comentarios")]
    pub comments: String,
    /// Every answer as entered, kept for audit.
    #[serde(rename = "datosDinamicos")]
    pub answers: AnswerState,
}

/// Envelope plus the number the store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedRequest {
    #[serde(flatten)]
    pub envelope: SubmissionEnvelope,
    #[serde(rename = "Numero_Solicitud")]
    pub number: String,
}

pub fn assemble(user: &User, brand: &Brand, answers: &AnswerState) -> SubmissionEnvelope {
    SubmissionEnvelope {
        user_id: user.id.clone(),
        user_name: user.full_name.clone(),
        brand_id: brand.id.clone(),
        brand_name: brand.name.clone(),
        materials_type: brand.materials_type.clone(),
        priority: DEFAULT_PRIORITY.to_string(),
        ad_text: first_alias(answers, AD_TEXT_ALIASES),
        budget: first_alias(answers, BUDGET_ALIASES),
        comments: first_alias(answers, COMMENTS_ALIASES),
        answers: answers.clone(),
    }
}

/// First non-empty value among `aliases`, or an empty string.
fn first_alias(answers: &AnswerState, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|alias| answers.get(alias))
        .find(|value| !value.is_empty())
        .map(|value| value.to_display())
        .unwrap_or_default()
}
