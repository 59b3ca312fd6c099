use std::{env, fs};

use anyhow::Context;
use idml_styles::{
    check_fonts, convert_document, ConversionConfig, FontRegistry, IdmlDocument, Personalization,
};

fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level.
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = env::args().skip(1);
    let document_path = args.next().unwrap_or_else(|| "demos/book.json".to_string());
    let personalization_path = args.next();

    log::info!("Loading document from {}...", document_path);
    let json = fs::read_to_string(&document_path)
        .with_context(|| format!("Unable to read {}", document_path))?;
    let document: IdmlDocument =
        serde_json::from_str(&json).context("Failed to deserialize document JSON")?;

    let personalization: Personalization = match personalization_path {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("Unable to read {}", path))?;
            serde_json::from_str(&json).context("Failed to deserialize personalization JSON")?
        }
        None => Personalization::default(),
    };

    let config = ConversionConfig::default();
    let conversion = convert_document(&document, &personalization, &config);

    let registry = FontRegistry::new(["Minion Pro", "Oswald"]);
    for missing in check_fonts(&conversion, &registry) {
        log::warn!("{}", missing);
    }

    println!("{}", serde_json::to_string_pretty(&conversion)?);
    Ok(())
}
