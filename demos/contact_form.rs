use std::{env, fs::File, sync::Mutex};

use anyhow::Result;
use input_text::{FieldConfig, FieldStyles, FormUI, FormatSegment, UiOptions};
use serde_json::json;

fn init_logging() -> Result<()> {
    // The terminal belongs to the form, so logs only go to a file when asked for.
    let Ok(path) = env::var("INPUT_TEXT_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let fields = vec![
        FieldConfig::new("name")
            .with_label("Name")
            .required(true)
            .history_track(true),
        FieldConfig::new("code")
            .with_label("Customer code")
            .uppercase(true)
            .with_tooltip("Letters are stored in upper case")
            .with_styles(FieldStyles {
                fg: Some("lightcyan".into()),
                bold: true,
                ..FieldStyles::default()
            }),
        FieldConfig::new("phone")
            .with_label("Phone")
            .with_format(vec![
                FormatSegment::numeric(3, "-"),
                FormatSegment::numeric(4, ""),
            ]),
        FieldConfig::new("notes")
            .with_label("Notes")
            .with_placeholder("Anything we should know")
            .multiline(true),
        FieldConfig::new("bio")
            .with_label("Bio")
            .multiline(true)
            .rich_text(true),
    ];

    let values = FormUI::new(fields)
        .with_values(json!({"name": "Ada", "bio": "<p>Hello</p>"}))
        .with_options(
            UiOptions::default()
                .with_title("Contact")
                .with_confirm_exit(true),
        )
        .run()?;

    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}
