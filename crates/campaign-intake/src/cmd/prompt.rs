use std::io::{self, Write};

use anyhow::{Result, bail};

use campaign_form::{BoundField, FieldEdit, FieldInput};

use crate::cmd::i18n::tr;

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt} ");
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin().read_line(&mut input)?;
    if read == 0 {
        bail!("stdin closed");
    }
    Ok(input.trim().to_string())
}

/// Asks for one field. An empty list keeps the current value.
pub fn prompt_field(field: &BoundField) -> Result<Vec<FieldEdit>> {
    let marker = if field.required { " *" } else { "" };
    let label = format!("{}{}", field.prompt_or_name(), marker);
    if let Some(help) = &field.help {
        println!("  ({help})");
    }
    if let Some(error) = &field.error {
        println!("  ! {error}");
    }

    match &field.input {
        FieldInput::Text { value, placeholder }
        | FieldInput::Number { value, placeholder }
        | FieldInput::TextArea {
            value, placeholder, ..
        } => prompt_scalar(&label, value, placeholder),
        FieldInput::Date { value } => prompt_scalar(&label, value, "AAAA-MM-DD"),
        FieldInput::Buttons { options, selected }
        | FieldInput::Dropdown {
            options, selected, ..
        } => prompt_choice(&label, field.required, options, selected.as_deref()),
        FieldInput::MultiToggle { toggles } => {
            println!("{label}:");
            for (idx, toggle) in toggles.iter().enumerate() {
                let mark = if toggle.selected { "x" } else { " " };
                println!("  {}. [{mark}] {}", idx + 1, toggle.label);
            }
            let labels = toggles
                .iter()
                .map(|toggle| toggle.label.clone())
                .collect::<Vec<_>>();
            loop {
                let input = read_line(&tr("cli.prompt.toggle_numbers"))?;
                match parse_toggles(&input, &labels) {
                    Some(options) => {
                        return Ok(options.into_iter().map(FieldEdit::Toggle).collect());
                    }
                    None => println!("{}", tr("cli.prompt.invalid_choice")),
                }
            }
        }
    }
}

fn prompt_scalar(label: &str, current: &str, placeholder: &str) -> Result<Vec<FieldEdit>> {
    let hint = if !current.is_empty() {
        format!(" [{current}]")
    } else if !placeholder.is_empty() {
        format!(" ({placeholder})")
    } else {
        String::new()
    };
    let input = read_line(&format!("{label}{hint}:"))?;
    if input.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![FieldEdit::Set(input)])
}

fn prompt_choice(
    label: &str,
    required: bool,
    options: &[String],
    current: Option<&str>,
) -> Result<Vec<FieldEdit>> {
    println!("{label}:");
    for (idx, option) in options.iter().enumerate() {
        println!("  {}. {}", idx + 1, option);
    }
    loop {
        let prompt = match current {
            Some(value) => format!("{} [{value}]", tr("cli.prompt.select_number_or_value")),
            None => tr("cli.prompt.select_number_or_value"),
        };
        let input = read_line(&prompt)?;
        if input.is_empty() {
            if current.is_none() && required && !options.is_empty() {
                println!("{}", tr("cli.prompt.value_required"));
                continue;
            }
            return Ok(Vec::new());
        }
        match parse_choice(&input, options) {
            Some(choice) => return Ok(vec![FieldEdit::Set(choice)]),
            None => println!("{}", tr("cli.prompt.invalid_choice")),
        }
    }
}

/// A 1-based index or the exact option text.
pub fn parse_choice(input: &str, options: &[String]) -> Option<String> {
    let trimmed = input.trim();
    if let Ok(n) = trimmed.parse::<usize>()
        && n > 0
        && n <= options.len()
    {
        return Some(options[n - 1].clone());
    }
    options.iter().find(|option| *option == trimmed).cloned()
}

/// Comma-separated choices to flip; empty input flips nothing.
pub fn parse_toggles(input: &str, options: &[String]) -> Option<Vec<String>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| parse_choice(token, options))
        .collect()
}

pub enum Navigation {
    Forward,
    Back,
    Quit,
}

pub fn prompt_navigation(is_last: bool) -> Result<Navigation> {
    let action = if is_last {
        tr("cli.fill.nav_submit")
    } else {
        tr("cli.fill.nav_next")
    };
    loop {
        let input = read_line(&crate::cmd::i18n::trf("cli.fill.nav", &[&action]))?;
        match input.to_lowercase().as_str() {
            "" | "s" => return Ok(Navigation::Forward),
            "a" => return Ok(Navigation::Back),
            "q" => return Ok(Navigation::Quit),
            _ => println!("{}", tr("cli.prompt.invalid_choice")),
        }
    }
}
