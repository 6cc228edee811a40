//! Typed edits the admin surface applies through the store.
//!
//! Each editable text field is a [`TextField`] variant with a fixed lens into
//! the document; there is no runtime path walking. Collections get add/remove
//! operations that hand out ids as `max + 1` and never reuse an id within one
//! store session.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::*;
use super::section::{Section, SectionKey};
use super::store::ContentStore;
use crate::error::ValidationError;

// ── Collections ──────────────────────────────────────────────────────

/// The id-bearing collections of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Doctors,
    Testimonials,
    Articles,
    Faq,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 4] = [
        CollectionKind::Doctors,
        CollectionKind::Testimonials,
        CollectionKind::Articles,
        CollectionKind::Faq,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Doctors => "doctors",
            CollectionKind::Testimonials => "testimonials",
            CollectionKind::Articles => "articles",
            CollectionKind::Faq => "faq",
        }
    }

    /// Section that owns this collection.
    pub fn section(self) -> SectionKey {
        match self {
            CollectionKind::Doctors => SectionKey::Doctors,
            CollectionKind::Testimonials => SectionKey::Testimonials,
            CollectionKind::Articles => SectionKey::News,
            CollectionKind::Faq => SectionKey::Faq,
        }
    }

    /// Ids currently present in `doc`, in display order.
    pub fn ids(self, doc: &ContentDocument) -> Vec<u32> {
        match self {
            CollectionKind::Doctors => doc.doctors.doctors.iter().map(|i| i.id).collect(),
            CollectionKind::Testimonials => {
                doc.testimonials.customers.iter().map(|i| i.id).collect()
            }
            CollectionKind::Articles => doc.news.articles.iter().map(|i| i.id).collect(),
            CollectionKind::Faq => doc.faq.items.iter().map(|i| i.id).collect(),
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCollection(s.to_string()))
    }
}

/// One collection entry. Its `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionItem {
    Doctor(Doctor),
    Testimonial(Testimonial),
    Article(NewsArticle),
    Faq(FaqItem),
}

impl CollectionItem {
    pub fn kind(&self) -> CollectionKind {
        match self {
            CollectionItem::Doctor(_) => CollectionKind::Doctors,
            CollectionItem::Testimonial(_) => CollectionKind::Testimonials,
            CollectionItem::Article(_) => CollectionKind::Articles,
            CollectionItem::Faq(_) => CollectionKind::Faq,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            CollectionItem::Doctor(i) => i.id,
            CollectionItem::Testimonial(i) => i.id,
            CollectionItem::Article(i) => i.id,
            CollectionItem::Faq(i) => i.id,
        }
    }

    fn set_id(&mut self, id: u32) {
        match self {
            CollectionItem::Doctor(i) => i.id = id,
            CollectionItem::Testimonial(i) => i.id = id,
            CollectionItem::Article(i) => i.id = id,
            CollectionItem::Faq(i) => i.id = id,
        }
    }

    /// Parse an item of `kind` from JSON. Missing fields are empty.
    pub fn from_json(kind: CollectionKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            CollectionKind::Doctors => CollectionItem::Doctor(serde_json::from_value(value)?),
            CollectionKind::Testimonials => {
                CollectionItem::Testimonial(serde_json::from_value(value)?)
            }
            CollectionKind::Articles => CollectionItem::Article(serde_json::from_value(value)?),
            CollectionKind::Faq => CollectionItem::Faq(serde_json::from_value(value)?),
        })
    }

    fn push_into(self, doc: &mut ContentDocument) {
        match self {
            CollectionItem::Doctor(i) => doc.doctors.doctors.push(i),
            CollectionItem::Testimonial(i) => doc.testimonials.customers.push(i),
            CollectionItem::Article(i) => doc.news.articles.push(i),
            CollectionItem::Faq(i) => doc.faq.items.push(i),
        }
    }

    /// Replace the entry with the same id. Returns false if none matched.
    fn replace_in(self, doc: &mut ContentDocument) -> bool {
        fn swap<T>(items: &mut [T], id: u32, item: T, id_of: impl Fn(&T) -> u32) -> bool {
            match items.iter_mut().find(|i| id_of(i) == id) {
                Some(slot) => {
                    *slot = item;
                    true
                }
                None => false,
            }
        }
        let id = self.id();
        match self {
            CollectionItem::Doctor(i) => swap(&mut doc.doctors.doctors, id, i, |d| d.id),
            CollectionItem::Testimonial(i) => {
                swap(&mut doc.testimonials.customers, id, i, |t| t.id)
            }
            CollectionItem::Article(i) => swap(&mut doc.news.articles, id, i, |a| a.id),
            CollectionItem::Faq(i) => swap(&mut doc.faq.items, id, i, |f| f.id),
        }
    }
}

fn remove_by_id(doc: &mut ContentDocument, kind: CollectionKind, id: u32) -> bool {
    fn take<T>(items: &mut Vec<T>, id: u32, id_of: impl Fn(&T) -> u32) -> bool {
        let before = items.len();
        items.retain(|i| id_of(i) != id);
        items.len() != before
    }
    match kind {
        CollectionKind::Doctors => take(&mut doc.doctors.doctors, id, |d| d.id),
        CollectionKind::Testimonials => take(&mut doc.testimonials.customers, id, |t| t.id),
        CollectionKind::Articles => take(&mut doc.news.articles, id, |a| a.id),
        CollectionKind::Faq => take(&mut doc.faq.items, id, |f| f.id),
    }
}

/// Per-collection high-water mark of handed-out and deleted ids.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    high_water: HashMap<CollectionKind, u32>,
}

impl IdAllocator {
    /// Next id for `kind`: one past the larger of the live maximum and every
    /// id this session has already seen.
    pub fn next_id(&mut self, kind: CollectionKind, live: &[u32]) -> u32 {
        let live_max = live.iter().copied().max().unwrap_or(0);
        let seen = self.high_water.get(&kind).copied().unwrap_or(0);
        let id = live_max.max(seen).saturating_add(1);
        self.high_water.insert(kind, id);
        id
    }

    /// Remember a deleted id so it is not handed out again.
    pub fn retire(&mut self, kind: CollectionKind, id: u32) {
        let seen = self.high_water.entry(kind).or_insert(0);
        *seen = (*seen).max(id);
    }
}

// ── Text fields ──────────────────────────────────────────────────────

macro_rules! text_fields {
    (|$d:ident| $( $variant:ident => $name:literal, $path:expr; )+) => {
        /// Every editable free-text field, with a fixed lens into the document.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TextField {
            $( $variant, )+
        }

        impl TextField {
            pub const ALL: &'static [TextField] = &[ $( TextField::$variant, )+ ];

            /// Dotted label, as it appears in the exported JSON.
            pub fn name(self) -> &'static str {
                match self {
                    $( TextField::$variant => $name, )+
                }
            }

            pub fn get(self, $d: &ContentDocument) -> &str {
                match self {
                    $( TextField::$variant => $path.as_str(), )+
                }
            }

            pub fn get_mut(self, $d: &mut ContentDocument) -> &mut String {
                match self {
                    $( TextField::$variant => &mut $path, )+
                }
            }
        }
    };
}

text_fields! {
    |d|
    TopBannerTitle => "topBanner.title", d.top_banner.title;
    TopBannerSubtitle => "topBanner.subtitle", d.top_banner.subtitle;
    TopBannerButtonText => "topBanner.buttonText", d.top_banner.button_text;
    TopBannerTitleColor => "topBanner.titleColor", d.top_banner.title_color;
    TopBannerSubtitleColor => "topBanner.subtitleColor", d.top_banner.subtitle_color;
    TopBannerButtonColor => "topBanner.buttonColor", d.top_banner.button_color;
    VideoEmbedCode => "video.embedCode", d.video.embed_code;
    VideoSoundWarning => "video.soundWarning", d.video.sound_warning;
    VideoUrgencyWarning => "video.urgencyWarning", d.video.urgency_warning;
    BlockedTitle => "contentBlocker.blockedTitle", d.content_blocker.blocked_title;
    BlockedSubtitle => "contentBlocker.blockedSubtitle", d.content_blocker.blocked_subtitle;
    BlockedMessage => "contentBlocker.blockedMessage", d.content_blocker.blocked_message;
    BlockerTimezone => "contentBlocker.timezone", d.content_blocker.timezone;
    MainOfferProductName => "mainOffer.productName", d.main_offer.product_name;
    MainOfferPackageName => "mainOffer.packageName", d.main_offer.package_name;
    MainOfferProductImage => "mainOffer.productImage", d.main_offer.product_image;
    MainOfferSavings => "mainOffer.savings", d.main_offer.savings;
    MainOfferButtonText => "mainOffer.buttonText", d.main_offer.button_text;
    MainOfferButtonUrl => "mainOffer.buttonUrl", d.main_offer.button_url;
    MainOfferPricePerBottle => "mainOffer.pricePerBottle", d.main_offer.price_per_bottle;
    MainOfferTotalPrice => "mainOffer.totalPrice", d.main_offer.total_price;
    Offer1TotalPrice => "alternativeOffers.offer1.totalPrice", d.alternative_offers.offer1.total_price;
    Offer1ButtonUrl => "alternativeOffers.offer1.buttonUrl", d.alternative_offers.offer1.button_url;
    Offer2TotalPrice => "alternativeOffers.offer2.totalPrice", d.alternative_offers.offer2.total_price;
    Offer2ButtonUrl => "alternativeOffers.offer2.buttonUrl", d.alternative_offers.offer2.button_url;
    DoctorsTitle => "doctors.title", d.doctors.title;
    DoctorsSubtitle => "doctors.subtitle", d.doctors.subtitle;
    TestimonialsTitle => "testimonials.title", d.testimonials.title;
    TestimonialsSubtitle => "testimonials.subtitle", d.testimonials.subtitle;
    NewsTitle => "news.title", d.news.title;
    NewsSubtitle => "news.subtitle", d.news.subtitle;
    GuaranteeDays => "guarantee.days", d.guarantee.days;
    GuaranteeTitle => "guarantee.title", d.guarantee.title;
    GuaranteeSubtitle => "guarantee.subtitle", d.guarantee.subtitle;
    FaqTitle => "faq.title", d.faq.title;
    FooterBrandName => "footer.brandName", d.footer.brand_name;
    FooterCopyright => "footer.copyright", d.footer.copyright;
    FooterDisclaimer => "footer.disclaimer", d.footer.disclaimer;
    BackgroundClass => "globalBackground.backgroundClass", d.global_background.background_class;
    DoctorTrustCtaText => "customCTAs.doctorTrustCTA.text", d.custom_ctas.doctor_trust_cta.text;
    DoctorTrustCtaUrl => "customCTAs.doctorTrustCTA.url", d.custom_ctas.doctor_trust_cta.url;
    SuccessStoryCtaText => "customCTAs.successStoryCTA.text", d.custom_ctas.success_story_cta.text;
    SuccessStoryCtaUrl => "customCTAs.successStoryCTA.url", d.custom_ctas.success_story_cta.url;
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextField::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

// ── Locker edits ─────────────────────────────────────────────────────

/// One change to the locker section.
#[derive(Debug, Clone, PartialEq)]
pub enum LockerEdit {
    Enabled(bool),
    UnlockMinutes(i64),
    UnlockSeconds(i64),
    Mode(ScheduleMode),
    ScheduledStart(Option<DateTime<Utc>>),
    TimerDisplay(bool),
}

impl LockerEdit {
    fn apply(&self, blocker: &mut ContentBlocker) -> Result<(), ValidationError> {
        match self {
            LockerEdit::Enabled(v) => blocker.enabled = *v,
            LockerEdit::UnlockMinutes(v) | LockerEdit::UnlockSeconds(v) if *v < 0 => {
                return Err(ValidationError::InvalidValue {
                    field: "contentBlocker.unlockTime".into(),
                    message: format!("{v} is negative"),
                });
            }
            LockerEdit::UnlockMinutes(v) => blocker.unlock_time_minutes = *v,
            LockerEdit::UnlockSeconds(v) => blocker.unlock_time_seconds = *v,
            LockerEdit::Mode(mode) => blocker.schedule_mode = *mode,
            LockerEdit::ScheduledStart(at) => {
                blocker.scheduled_start_time = at.map(|t| t.to_rfc3339())
            }
            LockerEdit::TimerDisplay(v) => blocker.timer_display = *v,
        }
        Ok(())
    }
}

// ── Store operations ─────────────────────────────────────────────────

impl ContentStore {
    /// Set one text field.
    pub fn set_text(&self, field: TextField, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(field = %field, "set_text");
        let committed = self.commit(|doc, _| {
            *field.get_mut(doc) = value;
            Ok::<(), Infallible>(())
        });
        if let Err(never) = committed {
            match never {}
        }
    }

    /// Apply locker edits as one change. Nothing is applied if any edit is invalid.
    pub fn edit_locker(&self, edits: &[LockerEdit]) -> Result<(), ValidationError> {
        let mut blocker = self.read(|doc| doc.content_blocker.clone());
        for edit in edits {
            edit.apply(&mut blocker)?;
        }
        self.update_section(Section::ContentBlocker(blocker));
        Ok(())
    }

    /// Append `item` to its collection under a freshly allocated id.
    pub fn add_item(&self, mut item: CollectionItem) -> u32 {
        let kind = item.kind();
        let result = self.commit(|doc, ids| {
            let id = ids.next_id(kind, &kind.ids(doc));
            item.set_id(id);
            item.push_into(doc);
            Ok::<u32, Infallible>(id)
        });
        let id = match result {
            Ok(id) => id,
            Err(never) => match never {},
        };
        tracing::info!(collection = %kind, id, "item added");
        id
    }

    /// Replace the item whose id matches `item`'s id.
    pub fn update_item(&self, item: CollectionItem) -> Result<(), ValidationError> {
        let kind = item.kind();
        let id = item.id();
        self.commit(|doc, _| {
            if item.replace_in(doc) {
                Ok(())
            } else {
                Err(ValidationError::ItemNotFound {
                    collection: kind.to_string(),
                    id,
                })
            }
        })
    }

    /// Delete the item with `id`. Its id is retired for the rest of the session.
    pub fn remove_item(&self, kind: CollectionKind, id: u32) -> Result<(), ValidationError> {
        self.commit(|doc, ids| {
            if remove_by_id(doc, kind, id) {
                ids.retire(kind, id);
                Ok(())
            } else {
                Err(ValidationError::ItemNotFound {
                    collection: kind.to_string(),
                    id,
                })
            }
        })?;
        tracing::info!(collection = %kind, id, "item removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn doctor(name: &str) -> CollectionItem {
        CollectionItem::Doctor(Doctor {
            name: name.into(),
            ..Doctor::default()
        })
    }

    #[test]
    fn text_field_names_are_unique_and_parse() {
        let mut names: Vec<&str> = TextField::ALL.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TextField::ALL.len());
        for field in TextField::ALL {
            assert_eq!(field.name().parse::<TextField>().unwrap(), *field);
        }
        assert!("topBanner.nope".parse::<TextField>().is_err());
    }

    #[test]
    fn text_field_names_match_exported_json() {
        let json = serde_json::to_value(ContentDocument::default()).unwrap();
        let doc = ContentDocument::default();
        for field in TextField::ALL {
            let mut node = &json;
            for part in field.name().split('.') {
                node = &node[part];
            }
            assert_eq!(node.as_str(), Some(field.get(&doc)), "{field}");
        }
    }

    #[test]
    fn each_lens_writes_only_its_own_field() {
        for field in TextField::ALL {
            let mut doc = ContentDocument::default();
            *field.get_mut(&mut doc) = format!("edited {field}");
            assert_eq!(field.get(&doc), format!("edited {field}"));
            for other in TextField::ALL.iter().filter(|o| *o != field) {
                assert_eq!(
                    other.get(&doc),
                    other.get(&ContentDocument::default()),
                    "{field} touched {other}"
                );
            }
        }
    }

    #[test]
    fn set_text_updates_and_notifies() {
        let store = ContentStore::in_memory();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let _sub = store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        store.set_text(TextField::TopBannerTitle, "New headline");
        assert_eq!(store.get_content().top_banner.title, "New headline");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn add_item_uses_max_plus_one() {
        let store = ContentStore::in_memory();
        assert_eq!(store.add_item(doctor("Dr. Four")), 4);
        assert_eq!(store.add_item(doctor("Dr. Five")), 5);
        let ids = CollectionKind::Doctors.ids(&store.get_content());
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let store = ContentStore::in_memory();
        let id = store.add_item(doctor("Dr. Temp"));
        store.remove_item(CollectionKind::Doctors, id).unwrap();
        let next = store.add_item(doctor("Dr. Next"));
        assert_eq!(next, id + 1);
    }

    #[test]
    fn ids_survive_reset_within_session() {
        let store = ContentStore::in_memory();
        assert_eq!(store.add_item(doctor("a")), 4);
        store.reset_to_default();
        assert_eq!(store.add_item(doctor("b")), 5);
    }

    #[test]
    fn retired_ids_outlive_an_emptied_collection() {
        let store = ContentStore::in_memory();
        for id in CollectionKind::Faq.ids(&store.get_content()) {
            store.remove_item(CollectionKind::Faq, id).unwrap();
        }
        let mut alloc = IdAllocator::default();
        assert_eq!(alloc.next_id(CollectionKind::Faq, &[]), 1);
        // The store remembers the retired ids.
        assert_eq!(
            store.add_item(CollectionItem::Faq(FaqItem::default())),
            4
        );
    }

    #[test]
    fn remove_unknown_item_is_an_error_and_silent() {
        let store = ContentStore::in_memory();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let _sub = store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let err = store.remove_item(CollectionKind::Articles, 99).unwrap_err();
        assert!(matches!(err, ValidationError::ItemNotFound { id: 99, .. }));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn update_item_replaces_by_id() {
        let store = ContentStore::in_memory();
        let mut article = store.get_content().news.articles[1].clone();
        article.title = "Edited".into();
        store
            .update_item(CollectionItem::Article(article))
            .unwrap();
        assert_eq!(store.get_content().news.articles[1].title, "Edited");
    }

    #[test]
    fn locker_edits_apply_atomically() {
        let store = ContentStore::in_memory();
        store
            .edit_locker(&[
                LockerEdit::Enabled(true),
                LockerEdit::UnlockMinutes(0),
                LockerEdit::UnlockSeconds(5),
                LockerEdit::Mode(ScheduleMode::AfterVideo),
            ])
            .unwrap();
        let blocker = store.get_content().content_blocker;
        assert!(blocker.enabled);
        assert_eq!(blocker.unlock_time_seconds, 5);
        assert_eq!(blocker.schedule_mode, ScheduleMode::AfterVideo);

        let err = store
            .edit_locker(&[LockerEdit::Enabled(false), LockerEdit::UnlockSeconds(-1)])
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
        assert!(store.get_content().content_blocker.enabled);
    }

    #[test]
    fn collection_kind_parses() {
        assert_eq!("articles".parse::<CollectionKind>().unwrap(), CollectionKind::Articles);
        assert!("news".parse::<CollectionKind>().is_err());
    }
}
