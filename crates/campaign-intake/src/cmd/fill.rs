use std::collections::BTreeSet;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::Args;
use serde_json::Value;
use tracing::{debug, warn};

use campaign_client::ApiClient;
use campaign_form::{
    AnswerState, AnswerValue, FieldEdit, Phase, SchemaLoader, Transition, Wizard,
    render_text,
};

use crate::cmd::i18n::{tr, trf};
use crate::cmd::login::select_brand;
use crate::cmd::prompt::{Navigation, prompt_field, prompt_navigation};
use crate::cmd::{Context, EmailArg, emit_json};

#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    #[command(flatten)]
    pub email: EmailArg,
    /// Brand id or name.
    #[arg(long, value_name = "BRAND")]
    pub brand: String,
    /// JSON object of answers keyed by field name; disables prompting.
    #[arg(long, value_name = "answers.json")]
    pub answers: Option<PathBuf>,
}

pub async fn run(ctx: &Context, args: FillArgs) -> Result<()> {
    let prefilled = match &args.answers {
        Some(path) => Some(load_answers(path)?),
        None if io::stdin().is_terminal() && io::stdout().is_terminal() => None,
        None => bail!(tr("cli.fill.non_interactive_required")),
    };

    let client = ctx.client()?;
    let user = ctx.login(&client, &args.email).await?;
    let brand = select_brand(client.brands(&user.id).await?, &args.brand)?;

    if !ctx.json {
        eprintln!("{}", trf("cli.fill.loading", &[&brand.name]));
    }
    let loader = SchemaLoader::new(client);
    let mut wizard = Wizard::new(user, brand.clone());
    // A single load per run, so the ticket is always current.
    let Some(loaded) = loader.load(&brand).await else {
        bail!("schema load was superseded");
    };
    wizard.apply_schema(loaded)?;

    if wizard.phase() == &Phase::NotConfigured {
        println!("{}", trf("cli.fill.not_configured", &[&brand.name]));
        return Ok(());
    }

    let store = loader.backend();
    match prefilled {
        Some(answers) => run_scripted(ctx, &mut wizard, store, answers).await,
        None => run_interactive(ctx, &mut wizard, store).await,
    }
}

fn load_answers(path: &Path) -> Result<AnswerState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read answers {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("answers file {} is not JSON", path.display()))?;
    Ok(AnswerState::from_json(&value)?)
}

/// Drops answers for fields the form does not know, with a warning.
fn known_answers(wizard: &Wizard, answers: AnswerState) -> AnswerState {
    let mut known = AnswerState::new();
    for (field, value) in answers.iter() {
        if wizard.schema().question(field).is_some() {
            known.set(field, value.clone());
        } else {
            warn!(field = %field, "{}", trf("cli.fill.unknown_field", &[field]));
        }
    }
    known
}

/// Writes pending answers whose field is shown on the current step. Each
/// write can reveal more fields, so this runs until nothing applies.
fn apply_step_answers(wizard: &mut Wizard, pending: &mut AnswerState) -> Result<()> {
    loop {
        let Some(field) = wizard
            .view()
            .fields
            .into_iter()
            .map(|bound| bound.field)
            .find(|field| pending.get(field).is_some())
        else {
            return Ok(());
        };
        let Some(value) = pending.remove(&field) else {
            return Ok(());
        };
        let edits = match value {
            AnswerValue::Text(text) => vec![FieldEdit::Set(text)],
            AnswerValue::Selection(items) => {
                let mut edits = vec![FieldEdit::Clear];
                edits.extend(items.into_iter().map(FieldEdit::Toggle));
                edits
            }
        };
        for edit in edits {
            wizard.edit(&field, edit)?;
        }
    }
}

async fn run_scripted(
    ctx: &Context,
    wizard: &mut Wizard,
    store: &ApiClient,
    answers: AnswerState,
) -> Result<()> {
    let mut pending = known_answers(wizard, answers);
    loop {
        apply_step_answers(wizard, &mut pending)?;
        match wizard.advance_with(store).await? {
            Transition::Moved { .. } => continue,
            Transition::Blocked(errors) => {
                let fields = errors.fields().collect::<Vec<_>>().join(", ");
                bail!("{} {fields}", tr("cli.fill.blocked"));
            }
            Transition::Submitted(request) => {
                for (field, _) in pending.iter() {
                    debug!(field = %field, "answer never shown, not sent");
                }
                if ctx.json {
                    return emit_json(&request);
                }
                println!("{}", trf("cli.fill.submitted", &[&request.number]));
                return Ok(());
            }
            Transition::SubmitFailed(message) => {
                bail!(trf("cli.fill.submit_failed", &[&message]));
            }
            Transition::Submit(_) | Transition::Exited => {
                bail!("wizard stopped in state {}", wizard.phase().as_str());
            }
        }
    }
}

async fn run_interactive(ctx: &Context, wizard: &mut Wizard, store: &ApiClient) -> Result<()> {
    loop {
        println!();
        println!("{}", render_text(&wizard.view()));
        ask_step(wizard)?;

        let transition = match prompt_navigation(wizard.view().is_last)? {
            Navigation::Forward => {
                if wizard.view().is_last {
                    println!("{}", tr("cli.fill.submitting"));
                }
                wizard.advance_with(store).await?
            }
            Navigation::Back => wizard.back()?,
            Navigation::Quit => {
                println!("{}", tr("cli.fill.cancelled"));
                return Ok(());
            }
        };

        match transition {
            Transition::Blocked(_) => println!("{}", tr("cli.fill.blocked")),
            Transition::Submitted(request) => {
                if ctx.json {
                    return emit_json(&request);
                }
                println!("{}", trf("cli.fill.submitted", &[&request.number]));
                return Ok(());
            }
            Transition::SubmitFailed(message) => {
                println!("{}", trf("cli.fill.submit_failed", &[&message]));
            }
            Transition::Exited => {
                println!("{}", tr("cli.fill.cancelled"));
                return Ok(());
            }
            Transition::Moved { .. } | Transition::Submit(_) => {}
        }
    }
}

/// Prompts each visible field of the current step once. Fields that appear
/// after an answer changes a condition are asked too.
fn ask_step(wizard: &mut Wizard) -> Result<()> {
    let mut asked = BTreeSet::new();
    loop {
        let view = wizard.view();
        let Some(field) = view
            .fields
            .into_iter()
            .find(|field| !asked.contains(&field.field))
        else {
            return Ok(());
        };
        asked.insert(field.field.clone());
        for edit in prompt_field(&field)? {
            wizard.edit(&field.field, edit)?;
        }
    }
}
