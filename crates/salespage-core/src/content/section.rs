//! Named top-level sections and whole-section replacement values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::document::*;
use crate::error::ValidationError;

/// Names a top-level section of the [`ContentDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKey {
    TopBanner,
    Video,
    ContentBlocker,
    MainOffer,
    AlternativeOffers,
    Doctors,
    Testimonials,
    News,
    Guarantee,
    Faq,
    Footer,
    TitleBlocks,
    GlobalTitleStyling,
    GlobalBackground,
    CustomCtas,
}

impl SectionKey {
    pub const ALL: [SectionKey; 15] = [
        SectionKey::TopBanner,
        SectionKey::Video,
        SectionKey::ContentBlocker,
        SectionKey::MainOffer,
        SectionKey::AlternativeOffers,
        SectionKey::Doctors,
        SectionKey::Testimonials,
        SectionKey::News,
        SectionKey::Guarantee,
        SectionKey::Faq,
        SectionKey::Footer,
        SectionKey::TitleBlocks,
        SectionKey::GlobalTitleStyling,
        SectionKey::GlobalBackground,
        SectionKey::CustomCtas,
    ];

    /// JSON key of the section in the serialized document.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::TopBanner => "topBanner",
            SectionKey::Video => "video",
            SectionKey::ContentBlocker => "contentBlocker",
            SectionKey::MainOffer => "mainOffer",
            SectionKey::AlternativeOffers => "alternativeOffers",
            SectionKey::Doctors => "doctors",
            SectionKey::Testimonials => "testimonials",
            SectionKey::News => "news",
            SectionKey::Guarantee => "guarantee",
            SectionKey::Faq => "faq",
            SectionKey::Footer => "footer",
            SectionKey::TitleBlocks => "titleBlocks",
            SectionKey::GlobalTitleStyling => "globalTitleStyling",
            SectionKey::GlobalBackground => "globalBackground",
            SectionKey::CustomCtas => "customCTAs",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSection(s.to_string()))
    }
}

/// A complete value for one section.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    TopBanner(TopBanner),
    Video(VideoSection),
    ContentBlocker(ContentBlocker),
    MainOffer(MainOffer),
    AlternativeOffers(AlternativeOffers),
    Doctors(DoctorsSection),
    Testimonials(TestimonialsSection),
    News(NewsSection),
    Guarantee(Guarantee),
    Faq(FaqSection),
    Footer(Footer),
    TitleBlocks(TitleBlocks),
    GlobalTitleStyling(GlobalTitleStyling),
    GlobalBackground(GlobalBackground),
    CustomCtas(CustomCtas),
}

impl Section {
    pub fn key(&self) -> SectionKey {
        match self {
            Section::TopBanner(_) => SectionKey::TopBanner,
            Section::Video(_) => SectionKey::Video,
            Section::ContentBlocker(_) => SectionKey::ContentBlocker,
            Section::MainOffer(_) => SectionKey::MainOffer,
            Section::AlternativeOffers(_) => SectionKey::AlternativeOffers,
            Section::Doctors(_) => SectionKey::Doctors,
            Section::Testimonials(_) => SectionKey::Testimonials,
            Section::News(_) => SectionKey::News,
            Section::Guarantee(_) => SectionKey::Guarantee,
            Section::Faq(_) => SectionKey::Faq,
            Section::Footer(_) => SectionKey::Footer,
            Section::TitleBlocks(_) => SectionKey::TitleBlocks,
            Section::GlobalTitleStyling(_) => SectionKey::GlobalTitleStyling,
            Section::GlobalBackground(_) => SectionKey::GlobalBackground,
            Section::CustomCtas(_) => SectionKey::CustomCtas,
        }
    }

    /// Parse a section value from JSON. Missing fields take their defaults.
    pub fn from_json(key: SectionKey, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match key {
            SectionKey::TopBanner => Section::TopBanner(serde_json::from_value(value)?),
            SectionKey::Video => Section::Video(serde_json::from_value(value)?),
            SectionKey::ContentBlocker => Section::ContentBlocker(serde_json::from_value(value)?),
            SectionKey::MainOffer => Section::MainOffer(serde_json::from_value(value)?),
            SectionKey::AlternativeOffers => {
                Section::AlternativeOffers(serde_json::from_value(value)?)
            }
            SectionKey::Doctors => Section::Doctors(serde_json::from_value(value)?),
            SectionKey::Testimonials => Section::Testimonials(serde_json::from_value(value)?),
            SectionKey::News => Section::News(serde_json::from_value(value)?),
            SectionKey::Guarantee => Section::Guarantee(serde_json::from_value(value)?),
            SectionKey::Faq => Section::Faq(serde_json::from_value(value)?),
            SectionKey::Footer => Section::Footer(serde_json::from_value(value)?),
            SectionKey::TitleBlocks => Section::TitleBlocks(serde_json::from_value(value)?),
            SectionKey::GlobalTitleStyling => {
                Section::GlobalTitleStyling(serde_json::from_value(value)?)
            }
            SectionKey::GlobalBackground => {
                Section::GlobalBackground(serde_json::from_value(value)?)
            }
            SectionKey::CustomCtas => Section::CustomCtas(serde_json::from_value(value)?),
        })
    }

    /// Write this section into `doc`, replacing the previous value wholesale.
    pub fn apply_to(self, doc: &mut ContentDocument) {
        match self {
            Section::TopBanner(v) => doc.top_banner = v,
            Section::Video(v) => doc.video = v,
            Section::ContentBlocker(v) => doc.content_blocker = v,
            Section::MainOffer(v) => doc.main_offer = v,
            Section::AlternativeOffers(v) => doc.alternative_offers = v,
            Section::Doctors(v) => doc.doctors = v,
            Section::Testimonials(v) => doc.testimonials = v,
            Section::News(v) => doc.news = v,
            Section::Guarantee(v) => doc.guarantee = v,
            Section::Faq(v) => doc.faq = v,
            Section::Footer(v) => doc.footer = v,
            Section::TitleBlocks(v) => doc.title_blocks = v,
            Section::GlobalTitleStyling(v) => doc.global_title_styling = v,
            Section::GlobalBackground(v) => doc.global_background = v,
            Section::CustomCtas(v) => doc.custom_ctas = v,
        }
    }
}

impl ContentDocument {
    /// Clone out one section.
    pub fn section(&self, key: SectionKey) -> Section {
        match key {
            SectionKey::TopBanner => Section::TopBanner(self.top_banner.clone()),
            SectionKey::Video => Section::Video(self.video.clone()),
            SectionKey::ContentBlocker => Section::ContentBlocker(self.content_blocker.clone()),
            SectionKey::MainOffer => Section::MainOffer(self.main_offer.clone()),
            SectionKey::AlternativeOffers => {
                Section::AlternativeOffers(self.alternative_offers.clone())
            }
            SectionKey::Doctors => Section::Doctors(self.doctors.clone()),
            SectionKey::Testimonials => Section::Testimonials(self.testimonials.clone()),
            SectionKey::News => Section::News(self.news.clone()),
            SectionKey::Guarantee => Section::Guarantee(self.guarantee.clone()),
            SectionKey::Faq => Section::Faq(self.faq.clone()),
            SectionKey::Footer => Section::Footer(self.footer.clone()),
            SectionKey::TitleBlocks => Section::TitleBlocks(self.title_blocks.clone()),
            SectionKey::GlobalTitleStyling => {
                Section::GlobalTitleStyling(self.global_title_styling.clone())
            }
            SectionKey::GlobalBackground => {
                Section::GlobalBackground(self.global_background.clone())
            }
            SectionKey::CustomCtas => Section::CustomCtas(self.custom_ctas.clone()),
        }
    }

    /// One section as JSON, keyed the way the export format keys it.
    pub fn section_json(&self, key: SectionKey) -> serde_json::Value {
        serde_json::to_value(self)
            .ok()
            .and_then(|mut v| v.get_mut(key.as_str()).map(serde_json::Value::take))
            .unwrap_or(serde_json::Value::Null)
    }
}

/// A partial document: every present section replaces the current one.
///
/// Sections are replaced wholesale; there is no field-level merge here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentPatch {
    pub top_banner: Option<TopBanner>,
    pub video: Option<VideoSection>,
    pub content_blocker: Option<ContentBlocker>,
    pub main_offer: Option<MainOffer>,
    pub alternative_offers: Option<AlternativeOffers>,
    pub doctors: Option<DoctorsSection>,
    pub testimonials: Option<TestimonialsSection>,
    pub news: Option<NewsSection>,
    pub guarantee: Option<Guarantee>,
    pub faq: Option<FaqSection>,
    pub footer: Option<Footer>,
    pub title_blocks: Option<TitleBlocks>,
    pub global_title_styling: Option<GlobalTitleStyling>,
    pub global_background: Option<GlobalBackground>,
    #[serde(rename = "customCTAs")]
    pub custom_ctas: Option<CustomCtas>,
}

impl ContentPatch {
    /// Add a section to the patch, replacing any earlier value for it.
    pub fn with(mut self, section: Section) -> Self {
        match section {
            Section::TopBanner(v) => self.top_banner = Some(v),
            Section::Video(v) => self.video = Some(v),
            Section::ContentBlocker(v) => self.content_blocker = Some(v),
            Section::MainOffer(v) => self.main_offer = Some(v),
            Section::AlternativeOffers(v) => self.alternative_offers = Some(v),
            Section::Doctors(v) => self.doctors = Some(v),
            Section::Testimonials(v) => self.testimonials = Some(v),
            Section::News(v) => self.news = Some(v),
            Section::Guarantee(v) => self.guarantee = Some(v),
            Section::Faq(v) => self.faq = Some(v),
            Section::Footer(v) => self.footer = Some(v),
            Section::TitleBlocks(v) => self.title_blocks = Some(v),
            Section::GlobalTitleStyling(v) => self.global_title_styling = Some(v),
            Section::GlobalBackground(v) => self.global_background = Some(v),
            Section::CustomCtas(v) => self.custom_ctas = Some(v),
        }
        self
    }

    /// Present sections, in document order.
    pub fn into_sections(self) -> Vec<Section> {
        [
            self.top_banner.map(Section::TopBanner),
            self.video.map(Section::Video),
            self.content_blocker.map(Section::ContentBlocker),
            self.main_offer.map(Section::MainOffer),
            self.alternative_offers.map(Section::AlternativeOffers),
            self.doctors.map(Section::Doctors),
            self.testimonials.map(Section::Testimonials),
            self.news.map(Section::News),
            self.guarantee.map(Section::Guarantee),
            self.faq.map(Section::Faq),
            self.footer.map(Section::Footer),
            self.title_blocks.map(Section::TitleBlocks),
            self.global_title_styling.map(Section::GlobalTitleStyling),
            self.global_background.map(Section::GlobalBackground),
            self.custom_ctas.map(Section::CustomCtas),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == ContentPatch::default()
    }
}

impl From<Section> for ContentPatch {
    fn from(section: Section) -> Self {
        ContentPatch::default().with(section)
    }
}
