use anyhow::{Result, bail};
use clap::Args;

use campaign_form::{Brand, User};

use crate::cmd::i18n::{tr, trf};
use crate::cmd::{Context, EmailArg, emit_json};

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    #[command(flatten)]
    pub email: EmailArg,
}

#[derive(Args, Debug, Clone)]
pub struct BrandsArgs {
    #[command(flatten)]
    pub email: EmailArg,
}

pub async fn run_login(ctx: &Context, args: LoginArgs) -> Result<()> {
    let client = ctx.client()?;
    let user = ctx.login(&client, &args.email).await?;
    if ctx.json {
        return emit_json(&user);
    }
    print_user(&user);
    Ok(())
}

fn print_user(user: &User) {
    println!("{}", trf("cli.login.welcome", &[user.first_name(), &user.role]));
    if !user.permissions.is_empty() {
        println!("{}", trf("cli.login.permissions", &[&user.permissions.join(", ")]));
    }
}

pub async fn run_brands(ctx: &Context, args: BrandsArgs) -> Result<()> {
    let client = ctx.client()?;
    let user = ctx.login(&client, &args.email).await?;
    let brands = client.brands(&user.id).await?;
    if ctx.json {
        return emit_json(&brands);
    }
    if brands.is_empty() {
        println!("{}", tr("cli.brands.none"));
        return Ok(());
    }
    println!("{}", tr("cli.brands.header"));
    for brand in &brands {
        println!("  {:<8} {} ({})", brand.id, brand.name, brand.materials_type);
    }
    Ok(())
}

/// Picks the brand named `key` (id or name) among those the user may use.
pub fn select_brand(brands: Vec<Brand>, key: &str) -> Result<Brand> {
    match brands.into_iter().find(|brand| brand.matches(key)) {
        Some(brand) => Ok(brand),
        None => bail!(trf("cli.brands.not_found", &[key])),
    }
}
