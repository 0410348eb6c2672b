use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use campaign_form::{
    AnswerValue, BackendFailure, Brand, FieldEdit, FieldInput, FormBackend, FormDocument,
    Model, Phase, REQUIRED_MESSAGE, RequestStore, SchemaLoader, SubmissionEnvelope,
    Transition, User, Wizard,
};

/// Request store double that answers with scripted outcomes and records
/// every envelope it receives.
struct ScriptedStore {
    outcomes: Mutex<Vec<Result<String, BackendFailure>>>,
    received: Mutex<Vec<SubmissionEnvelope>>,
}

impl ScriptedStore {
    fn new(mut outcomes: Vec<Result<String, BackendFailure>>) -> Self {
        outcomes.reverse();
        Self {
            outcomes: Mutex::new(outcomes),
            received: Mutex::new(Vec::new()),
        }
    }

    fn received(&self) -> Vec<SubmissionEnvelope> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestStore for ScriptedStore {
    async fn create_request(&self, envelope: &SubmissionEnvelope) -> Result<String, BackendFailure> {
        self.received.lock().unwrap().push(envelope.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Ok("SOL-0000".into()))
    }
}

struct SheetBackend {
    form: serde_json::Value,
    models: Vec<&'static str>,
}

#[async_trait]
impl FormBackend for SheetBackend {
    async fn form_document(&self, _brand_name: &str) -> Result<FormDocument, BackendFailure> {
        serde_json::from_value(self.form.clone()).map_err(|err| BackendFailure::new(err.to_string()))
    }

    async fn models(&self, _brand_id: &str) -> Result<Vec<Model>, BackendFailure> {
        Ok(self
            .models
            .iter()
            .map(|name| Model {
                name: (*name).to_string(),
            })
            .collect())
    }
}

fn two_step_form() -> serde_json::Value {
    json!({
        "success": true,
        "preguntas": [
            { "ID_Pregunta": 1, "Paso": 1, "Nombre_Campo": "texto_anuncio", "Tipo_Campo": "textarea",
              "Pregunta": "Texto del anuncio", "Obligatorio": "SI" },
            { "ID_Pregunta": 2, "Paso": 1, "Nombre_Campo": "comentarios", "Tipo_Campo": "textarea",
              "Pregunta": "Comentarios", "Obligatorio": "NO" },
            { "ID_Pregunta": 3, "Paso": 2, "Nombre_Campo": "tipo_material", "Tipo_Campo": "radio",
              "Pregunta": "Tipo de material", "Opciones": "Video, Imagen", "Obligatorio": "SI" },
            { "ID_Pregunta": 4, "Paso": 2, "Nombre_Campo": "duracion", "Tipo_Campo": "number",
              "Pregunta": "Duración", "Obligatorio": "SI", "Condicion": "tipo_material=Video" },
            { "ID_Pregunta": 5, "Paso": 2, "Nombre_Campo": "modelos", "Tipo_Campo": "multiselect",
              "Pregunta": "Modelos", "Opciones": "FROM_MODELOS", "Obligatorio": "NO" }
        ],
        "totalPasos": 2
    })
}

async fn ready_wizard() -> Wizard {
    let loader = SchemaLoader::new(SheetBackend {
        form: two_step_form(),
        models: vec!["Ranger", "Bronco", "Maverick"],
    });
    let brand = Brand::new("M-1", "Ford", "Digital + Impreso");
    let loaded = loader.load(&brand).await.expect("load is current");
    let mut wizard = Wizard::new(User::new("U-7", "Juan Pérez"), brand);
    wizard.apply_schema(loaded).expect("schema applies once");
    wizard
}

fn visible_fields(wizard: &Wizard) -> Vec<String> {
    wizard.view().fields.into_iter().map(|field| field.field).collect()
}

#[tokio::test]
async fn empty_required_field_blocks_the_first_step() {
    let mut wizard = ready_wizard().await;
    wizard
        .edit("comentarios", FieldEdit::Set("algo".into()))
        .unwrap();

    let Transition::Blocked(errors) = wizard.advance().unwrap() else {
        panic!("advance should be blocked");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("texto_anuncio"), Some(REQUIRED_MESSAGE));
    assert_eq!(wizard.step(), 1);

    let view = wizard.view();
    assert_eq!(view.fields[0].error.as_deref(), Some(REQUIRED_MESSAGE));
    assert_eq!(view.fields[1].error, None);

    wizard
        .edit("texto_anuncio", FieldEdit::Set("Nuevo Ranger".into()))
        .unwrap();
    assert!(wizard.errors().is_empty());
    assert_eq!(wizard.advance().unwrap(), Transition::Moved { step: 2 });
}

#[tokio::test]
async fn conditional_question_follows_its_controlling_answer() {
    let mut wizard = ready_wizard().await;
    wizard
        .edit("texto_anuncio", FieldEdit::Set("Hola".into()))
        .unwrap();
    wizard.advance().unwrap();

    assert_eq!(visible_fields(&wizard), ["tipo_material", "modelos"]);

    wizard
        .edit("tipo_material", FieldEdit::Set("Video".into()))
        .unwrap();
    assert_eq!(visible_fields(&wizard), ["tipo_material", "duracion", "modelos"]);
    wizard.edit("duracion", FieldEdit::Set("30".into())).unwrap();

    wizard
        .edit("tipo_material", FieldEdit::Set("Imagen".into()))
        .unwrap();
    assert_eq!(visible_fields(&wizard), ["tipo_material", "modelos"]);
    assert_eq!(wizard.answers().text("duracion"), Some("30"));

    assert!(matches!(wizard.advance().unwrap(), Transition::Submit(_)));
}

#[tokio::test]
async fn model_catalog_feeds_multiselect_and_payload() {
    let mut wizard = ready_wizard().await;
    wizard
        .edit("texto_anuncio", FieldEdit::Set("Hola".into()))
        .unwrap();
    wizard.advance().unwrap();

    let view = wizard.view();
    let modelos = view
        .fields
        .iter()
        .find(|field| field.field == "modelos")
        .expect("modelos is visible");
    let FieldInput::MultiToggle { toggles } = &modelos.input else {
        panic!("modelos should bind as toggles");
    };
    assert_eq!(toggles.len(), 3);

    wizard
        .edit("tipo_material", FieldEdit::Set("Imagen".into()))
        .unwrap();
    wizard.edit("modelos", FieldEdit::Toggle("Ranger".into())).unwrap();
    wizard
        .edit("modelos", FieldEdit::Toggle("Maverick".into()))
        .unwrap();

    let store = ScriptedStore::new(vec![Ok("SOL-2025-0042".into())]);
    let Transition::Submitted(submitted) = wizard.advance_with(&store).await.unwrap() else {
        panic!("submission should succeed");
    };
    assert_eq!(submitted.number, "SOL-2025-0042");
    assert_eq!(
        submitted.envelope.answers.get("modelos"),
        Some(&AnswerValue::Selection(vec![
            "Ranger".into(),
            "Maverick".into()
        ]))
    );
    assert_eq!(submitted.envelope.ad_text, "Hola");
    assert!(matches!(wizard.phase(), Phase::Done(_)));
    assert!(wizard.answers().is_empty());
    assert_eq!(store.received().len(), 1);
}

#[tokio::test]
async fn rejected_submission_keeps_answers_for_retry() {
    let mut wizard = ready_wizard().await;
    wizard
        .edit("texto_anuncio", FieldEdit::Set("Hola".into()))
        .unwrap();
    wizard.advance().unwrap();
    wizard
        .edit("tipo_material", FieldEdit::Set("Imagen".into()))
        .unwrap();
    let before = wizard.answers().clone();

    let store = ScriptedStore::new(vec![
        Err(BackendFailure::new("quota exceeded")),
        Ok("SOL-2025-0043".into()),
    ]);

    assert_eq!(
        wizard.advance_with(&store).await.unwrap(),
        Transition::SubmitFailed("quota exceeded".into())
    );
    assert_eq!(wizard.phase(), &Phase::Ready);
    assert_eq!(wizard.step(), 2);
    assert_eq!(wizard.last_error(), Some("quota exceeded"));
    assert_eq!(wizard.answers(), &before);

    let retried = wizard.advance_with(&store).await.unwrap();
    assert!(matches!(retried, Transition::Submitted(ref request) if request.number == "SOL-2025-0043"));
    assert_eq!(store.received().len(), 2);
    assert_eq!(store.received()[0], store.received()[1]);
}

#[tokio::test]
async fn unconfigured_brand_only_allows_leaving() {
    let loader = SchemaLoader::new(SheetBackend {
        form: json!({ "success": true, "preguntas": [], "totalPasos": 0 }),
        models: Vec::new(),
    });
    let brand = Brand::new("M-9", "Lada", "Digital");
    let loaded = loader.load(&brand).await.unwrap();
    assert!(!loaded.is_configured());

    let mut wizard = Wizard::new(User::new("U-7", "Juan"), brand);
    wizard.apply_schema(loaded).unwrap();
    assert_eq!(wizard.phase(), &Phase::NotConfigured);
    assert_eq!(wizard.back().unwrap(), Transition::Exited);
}

#[tokio::test]
async fn shared_field_name_follows_the_visible_question() {
    let rows = json!([
        { "ID_Pregunta": 1, "Paso": 1, "Nombre_Campo": "tipo_material", "Tipo_Campo": "radio",
          "Opciones": "Video, Imagen", "Obligatorio": "SI" },
        { "ID_Pregunta": 2, "Paso": 1, "Nombre_Campo": "formato_detalle", "Tipo_Campo": "radio",
          "Opciones": "Horizontal, Cuadrado", "Obligatorio": "SI",
          "Condicion": "tipo_material=Video" },
        { "ID_Pregunta": 3, "Paso": 1, "Nombre_Campo": "formato_detalle", "Tipo_Campo": "radio",
          "Opciones": "Vertical, Carrusel", "Obligatorio": "SI",
          "Condicion": "tipo_material=Imagen" }
    ]);
    let loader = SchemaLoader::new(SheetBackend {
        form: json!({
            "success": true,
            "preguntas": rows.clone(),
            "pasos": { "1": rows },
            "totalPasos": 1
        }),
        models: Vec::new(),
    });
    let brand = Brand::new("M-1", "Ford", "Digital");
    let loaded = loader.load(&brand).await.unwrap();
    let mut wizard = Wizard::new(User::new("U-7", "Juan"), brand);
    wizard.apply_schema(loaded).unwrap();
    assert_eq!(wizard.schema().step_questions(1).len(), 3);

    wizard
        .edit("tipo_material", FieldEdit::Set("Imagen".into()))
        .unwrap();
    let view = wizard.view();
    let detail = view
        .fields
        .iter()
        .find(|field| field.field == "formato_detalle")
        .expect("image detail is visible");
    assert_eq!(
        detail.input,
        FieldInput::Buttons {
            options: vec!["Vertical".into(), "Carrusel".into()],
            selected: None,
        }
    );

    let Transition::Blocked(errors) = wizard.advance().unwrap() else {
        panic!("the visible required detail must block");
    };
    assert_eq!(errors.get("formato_detalle"), Some(REQUIRED_MESSAGE));

    wizard
        .edit("formato_detalle", FieldEdit::Set("Vertical".into()))
        .unwrap();
    let Transition::Submit(envelope) = wizard.advance().unwrap() else {
        panic!("step should validate");
    };
    assert_eq!(
        envelope.answers.get("formato_detalle"),
        Some(&AnswerValue::Text("Vertical".into()))
    );
}
