use clap::Subcommand;
use salespage_core::{AppConfig, CollectionItem, CollectionKind, ContentDocument};
use serde_json::json;

use super::{ensure_persisted, open_store, print_json, CommandResult};

#[derive(Subcommand)]
pub enum CollectionAction {
    /// List the items of a collection
    List {
        /// doctors, testimonials, articles or faq
        kind: String,
    },
    /// Append an item; prints the id it was given
    Add {
        kind: String,
        /// Item fields as JSON (any "id" is ignored)
        #[arg(long, default_value = "{}")]
        json: String,
    },
    /// Replace the item with the given id
    Update {
        kind: String,
        id: u32,
        /// Item fields as JSON
        #[arg(long)]
        json: String,
    },
    /// Remove an item by id
    Remove { kind: String, id: u32 },
}

fn items_json(doc: &ContentDocument, kind: CollectionKind) -> serde_json::Result<serde_json::Value> {
    match kind {
        CollectionKind::Doctors => serde_json::to_value(&doc.doctors.doctors),
        CollectionKind::Testimonials => serde_json::to_value(&doc.testimonials.customers),
        CollectionKind::Articles => serde_json::to_value(&doc.news.articles),
        CollectionKind::Faq => serde_json::to_value(&doc.faq.items),
    }
}

pub fn run(action: CollectionAction, config: &AppConfig) -> CommandResult {
    let store = open_store(config)?;

    match action {
        CollectionAction::List { kind } => {
            let kind: CollectionKind = kind.parse()?;
            let items = store.read(|doc| items_json(doc, kind))?;
            print_json(&items)?;
        }
        CollectionAction::Add { kind, json } => {
            let kind: CollectionKind = kind.parse()?;
            let item = CollectionItem::from_json(kind, serde_json::from_str(&json)?)?;
            let id = store.add_item(item);
            ensure_persisted(&store)?;
            print_json(&json!({ "collection": kind, "id": id }))?;
        }
        CollectionAction::Update { kind, id, json } => {
            let kind: CollectionKind = kind.parse()?;
            let mut value: serde_json::Value = serde_json::from_str(&json)?;
            if let Some(fields) = value.as_object_mut() {
                fields.insert("id".into(), id.into());
            }
            store.update_item(CollectionItem::from_json(kind, value)?)?;
            ensure_persisted(&store)?;
            print_json(&json!({ "collection": kind, "id": id }))?;
        }
        CollectionAction::Remove { kind, id } => {
            let kind: CollectionKind = kind.parse()?;
            store.remove_item(kind, id)?;
            ensure_persisted(&store)?;
            print_json(&json!({ "collection": kind, "removed": id }))?;
        }
    }
    Ok(())
}
