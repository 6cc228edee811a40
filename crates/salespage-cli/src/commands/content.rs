use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use salespage_core::storage::CONTENT_KEY;
use salespage_core::{AppConfig, Event, Section, SectionKey, TextField};
use serde_json::json;

use super::{ensure_persisted, open_database, open_store, print_json, CommandResult};

#[derive(Subcommand)]
pub enum ContentAction {
    /// Print the document, or one section of it, as JSON
    Show {
        /// Section key (e.g. "topBanner", "contentBlocker")
        #[arg(long)]
        section: Option<String>,
    },
    /// Print storage details: schema versions and when content was last saved
    Info,
    /// Export the document as pretty JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import a JSON document, merged with the current defaults
    Import {
        /// JSON file to import
        file: PathBuf,
    },
    /// Discard all edits and restore the default document
    Reset,
    /// Set one text field
    Set {
        /// Field name (see `content fields`)
        field: String,
        /// New value
        value: String,
    },
    /// List editable text fields with their current values
    Fields,
    /// Replace one section wholesale from a JSON file
    Section {
        /// Section key
        key: String,
        /// JSON file holding the section
        file: PathBuf,
    },
}

pub fn run(action: ContentAction, config: &AppConfig) -> CommandResult {
    let store = open_store(config)?;

    match action {
        ContentAction::Show { section: None } => {
            println!("{}", store.export_content());
        }
        ContentAction::Show {
            section: Some(key),
        } => {
            let key: SectionKey = key.parse()?;
            print_json(&store.read(|doc| doc.section_json(key)))?;
        }
        ContentAction::Info => {
            let db = open_database(config)?;
            print_json(&json!({
                "documentSchemaVersion": store.read(|doc| doc.schema_version),
                "storageSchemaVersion": db.schema_version(),
                "databaseFile": config.storage.database_file,
                "updatedAt": db.kv_updated_at(CONTENT_KEY)?,
            }))?;
        }
        ContentAction::Export { output: None } => {
            println!("{}", store.export_content());
        }
        ContentAction::Export {
            output: Some(path),
        } => {
            std::fs::write(&path, store.export_content())?;
            eprintln!("exported content to {}", path.display());
        }
        ContentAction::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            let outcome = store.try_import(&text)?;
            ensure_persisted(&store)?;
            print_json(&Event::ContentImported {
                migrated_from: outcome.migrated_from,
                fallback_sections: outcome.fallback_sections,
                at: Utc::now(),
            })?;
        }
        ContentAction::Reset => {
            store.reset_to_default();
            ensure_persisted(&store)?;
            print_json(&Event::ContentReset { at: Utc::now() })?;
        }
        ContentAction::Set { field, value } => {
            let field: TextField = field.parse()?;
            store.set_text(field, value);
            ensure_persisted(&store)?;
            let section = field.name().split('.').next().unwrap_or_default();
            print_json(&Event::ContentUpdated {
                sections: vec![section.to_string()],
                at: Utc::now(),
            })?;
        }
        ContentAction::Fields => {
            let fields: serde_json::Map<String, serde_json::Value> = store.read(|doc| {
                TextField::ALL
                    .iter()
                    .map(|f| (f.name().to_string(), f.get(doc).into()))
                    .collect()
            });
            print_json(&fields)?;
        }
        ContentAction::Section { key, file } => {
            let key: SectionKey = key.parse()?;
            let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let section = Section::from_json(key, value)?;
            store.update_section(section);
            ensure_persisted(&store)?;
            print_json(&Event::ContentUpdated {
                sections: vec![key.to_string()],
                at: Utc::now(),
            })?;
        }
    }
    Ok(())
}
