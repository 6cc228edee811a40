//! The content document: every editable piece of the sales page.
//!
//! Field names serialize in camelCase so the JSON matches the export format
//! the admin panel reads and writes. Every struct carries `#[serde(default)]`
//! so a stored section that predates a field still deserializes; see
//! [`super::merge`] for the section-level rules.

use serde::{Deserialize, Serialize};

use super::migrate::CURRENT_SCHEMA_VERSION;

/// The full editable content of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentDocument {
    pub schema_version: u32,
    pub top_banner: TopBanner,
    pub video: VideoSection,
    pub content_blocker: ContentBlocker,
    pub main_offer: MainOffer,
    pub alternative_offers: AlternativeOffers,
    pub doctors: DoctorsSection,
    pub testimonials: TestimonialsSection,
    pub news: NewsSection,
    pub guarantee: Guarantee,
    pub faq: FaqSection,
    pub footer: Footer,
    pub title_blocks: TitleBlocks,
    pub global_title_styling: GlobalTitleStyling,
    pub global_background: GlobalBackground,
    #[serde(rename = "customCTAs")]
    pub custom_ctas: CustomCtas,
}

impl Default for ContentDocument {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            top_banner: TopBanner::default(),
            video: VideoSection::default(),
            content_blocker: ContentBlocker::default(),
            main_offer: MainOffer::default(),
            alternative_offers: AlternativeOffers::default(),
            doctors: DoctorsSection::default(),
            testimonials: TestimonialsSection::default(),
            news: NewsSection::default(),
            guarantee: Guarantee::default(),
            faq: FaqSection::default(),
            footer: Footer::default(),
            title_blocks: TitleBlocks::default(),
            global_title_styling: GlobalTitleStyling::default(),
            global_background: GlobalBackground::default(),
            custom_ctas: CustomCtas::default(),
        }
    }
}

// ── Banner & video ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopBanner {
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub title_color: String,
    pub subtitle_color: String,
    pub button_color: String,
}

impl Default for TopBanner {
    fn default() -> Self {
        Self {
            title: "The Morning Habit Doctors Keep Talking About".into(),
            subtitle: "Watch the short presentation below before it comes down".into(),
            button_text: "WATCH BELOW AND SEE HOW IT WORKS".into(),
            title_color: "text-blue-300".into(),
            subtitle_color: "text-blue-200".into(),
            button_color: "text-blue-300".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[default]
    #[serde(rename = "9:16")]
    Portrait,
}

/// Hero video. The embed code is opaque markup handed to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoSection {
    pub embed_code: String,
    pub aspect_ratio: AspectRatio,
    pub sound_warning: String,
    pub urgency_warning: String,
}

impl Default for VideoSection {
    fn default() -> Self {
        Self {
            embed_code: "<vturb-smartplayer id='vid-main' style='display: block; margin: 0 auto; width: 100%;'></vturb-smartplayer>".into(),
            aspect_ratio: AspectRatio::Portrait,
            sound_warning: "Please make sure your sound is on".into(),
            urgency_warning: "This video may be taken down at any time".into(),
        }
    }
}

// ── Locker section ───────────────────────────────────────────────────

/// What starts the locker countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Page-ready, after the configured auto-start delay.
    #[default]
    Immediate,
    /// Countdown reference is `scheduledStartTime`.
    SpecificTime,
    /// The video player's play/pause signals drive the countdown.
    AfterVideo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationType {
    #[default]
    Minutes,
    Hours,
    Days,
}

/// Stored locker configuration. See [`crate::timer::LockerConfig`] for the
/// derived value the timer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentBlocker {
    pub enabled: bool,
    pub schedule_mode: ScheduleMode,
    pub unlock_time_minutes: i64,
    pub unlock_time_seconds: i64,
    /// RFC 3339.
    pub scheduled_start_time: Option<String>,
    /// RFC 3339. Informational; the countdown does not relock after it.
    pub scheduled_end_time: Option<String>,
    pub duration_type: DurationType,
    pub duration_value: i64,
    pub timezone: String,
    pub blocked_title: String,
    pub blocked_subtitle: String,
    /// `{{time}}` is replaced with the configured duration.
    pub blocked_message: String,
    pub timer_display: bool,
}

impl Default for ContentBlocker {
    fn default() -> Self {
        Self {
            enabled: false,
            schedule_mode: ScheduleMode::Immediate,
            unlock_time_minutes: 1,
            unlock_time_seconds: 0,
            scheduled_start_time: None,
            scheduled_end_time: None,
            duration_type: DurationType::Minutes,
            duration_value: 1,
            timezone: "America/New_York".into(),
            blocked_title: String::new(),
            blocked_subtitle: String::new(),
            blocked_message: String::new(),
            timer_display: false,
        }
    }
}

// ── Offers ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OfferBadges {
    pub guarantee: String,
    pub shipping: String,
    pub security: String,
}

impl Default for OfferBadges {
    fn default() -> Self {
        Self {
            guarantee: "90-Day".into(),
            shipping: "Free Ship".into(),
            security: "Secure".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MainOffer {
    pub product_name: String,
    pub package_name: String,
    pub product_image: String,
    pub savings: String,
    pub button_text: String,
    pub button_url: String,
    pub price_per_bottle: String,
    pub total_price: String,
    pub badges: OfferBadges,
}

impl Default for MainOffer {
    fn default() -> Self {
        Self {
            product_name: "VITALCORE".into(),
            package_name: "6 BOTTLE PACKAGE".into(),
            product_image: "https://example.com/img/six-bottles.png".into(),
            savings: "YOU'RE SAVING $900".into(),
            button_text: "CLAIM OFFER NOW".into(),
            button_url: String::new(),
            price_per_bottle: "$49".into(),
            total_price: "$294".into(),
            badges: OfferBadges::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlternativeOffer {
    pub product_image: String,
    pub product_name: String,
    pub package_name: String,
    pub savings: String,
    pub price_per_bottle: String,
    pub total_price: String,
    pub shipping: String,
    pub guarantee: String,
    pub security: String,
    pub button_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlternativeOffers {
    pub offer1: AlternativeOffer,
    pub offer2: AlternativeOffer,
}

impl Default for AlternativeOffers {
    fn default() -> Self {
        Self {
            offer1: AlternativeOffer {
                product_image: "https://example.com/img/three-bottles.png".into(),
                product_name: "VITALCORE".into(),
                package_name: "3 BOTTLE PACKAGE".into(),
                savings: "SAVE $398".into(),
                price_per_bottle: "$66".into(),
                total_price: "$198".into(),
                shipping: "Free".into(),
                guarantee: "90d".into(),
                security: "Safe".into(),
                button_url: String::new(),
            },
            offer2: AlternativeOffer {
                product_image: "https://example.com/img/two-bottles.png".into(),
                product_name: "VITALCORE".into(),
                package_name: "2 BOTTLE PACKAGE".into(),
                savings: "SAVE $200".into(),
                price_per_bottle: "$69".into(),
                total_price: "$138".into(),
                shipping: "$9.99".into(),
                guarantee: "90d".into(),
                security: "Safe".into(),
                button_url: String::new(),
            },
        }
    }
}

// ── Collections ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Doctor {
    pub id: u32,
    pub name: String,
    pub title: String,
    pub institution: String,
    pub photo: String,
    pub recommendation: String,
    pub video_embed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoctorsSection {
    pub title: String,
    pub subtitle: String,
    pub drag_instruction: String,
    pub doctors: Vec<Doctor>,
}

impl Default for DoctorsSection {
    fn default() -> Self {
        let doctor = |id: u32, name: &str, title: &str, institution: &str, rec: &str| Doctor {
            id,
            name: name.into(),
            title: title.into(),
            institution: institution.into(),
            photo: format!("https://example.com/img/doctor-{id}.png"),
            recommendation: rec.into(),
            video_embed: String::new(),
        };
        Self {
            title: "Clinically Reviewed. Doctor Approved.".into(),
            subtitle: "What Doctors Say About VITALCORE".into(),
            drag_instruction: "Drag to navigate between doctors".into(),
            doctors: vec![
                doctor(
                    1,
                    "Dr. Alan Reyes",
                    "MD, Internal Medicine",
                    "Lakeside Medical Center",
                    "Simple ingredients and a routine patients actually stick to.",
                ),
                doctor(
                    2,
                    "Dr. Priya Natarajan",
                    "MD, Urology",
                    "Eastbay University Hospital",
                    "A sensible option that supports physical and mental wellness.",
                ),
                doctor(
                    3,
                    "Dr. Samuel Okafor",
                    "Cardiologist",
                    "Integrative Health Clinic",
                    "The formula reflects how I think about long-term vitality.",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimonial {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub photo: String,
    pub testimonial: String,
    pub rating: u8,
    pub video_embed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialsSection {
    pub title: String,
    pub subtitle: String,
    pub customers: Vec<Testimonial>,
}

impl Default for TestimonialsSection {
    fn default() -> Self {
        let customer = |id: u32, name: &str, location: &str, text: &str| Testimonial {
            id,
            name: name.into(),
            location: location.into(),
            photo: format!("https://example.com/img/customer-{id}.png"),
            testimonial: text.into(),
            rating: 5,
            video_embed: String::new(),
        };
        Self {
            title: "No Filters. Just Real Results.".into(),
            subtitle: "What Real Customers Are Saying About VITALCORE".into(),
            customers: vec![
                customer(1, "John O.", "Florida", "My wife noticed the difference before I told her."),
                customer(2, "Robert S.", "California", "After 50 I thought nothing would help. I was wrong."),
                customer(3, "Michael R.", "Texas", "I felt the difference in about two weeks."),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: u32,
    pub outlet: String,
    pub logo: String,
    pub redirect_url: String,
    pub title: String,
    pub description: String,
    pub video_embed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsSection {
    pub title: String,
    pub subtitle: String,
    pub drag_instruction: String,
    pub articles: Vec<NewsArticle>,
}

impl Default for NewsSection {
    fn default() -> Self {
        let article = |id: u32, outlet: &str, title: &str, description: &str| NewsArticle {
            id,
            outlet: outlet.into(),
            logo: format!("https://example.com/img/outlet-{id}.png"),
            redirect_url: String::new(),
            title: title.into(),
            description: description.into(),
            video_embed: String::new(),
        };
        Self {
            title: "As Seen In Major News Outlets".into(),
            subtitle: "Leading Health Publications Cover VITALCORE".into(),
            drag_instruction: "Drag to navigate between news articles".into(),
            articles: vec![
                article(
                    1,
                    "Health Daily",
                    "A Natural Approach Gaining Ground",
                    "Demand for natural routines keeps growing among men over 40.",
                ),
                article(
                    2,
                    "Wellness Review",
                    "The Science Behind Herbal Support",
                    "Researchers look at where natural approaches complement treatment.",
                ),
                article(
                    3,
                    "Men's Health Weekly",
                    "Simple Ingredients, Measurable Results",
                    "A roundup of studies on everyday ingredients and performance.",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqItem {
    pub id: u32,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_badge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqSection {
    pub title: String,
    pub items: Vec<FaqItem>,
}

impl Default for FaqSection {
    fn default() -> Self {
        Self {
            title: "Frequently Asked Questions".into(),
            items: vec![
                FaqItem {
                    id: 1,
                    question: "Is VITALCORE a genuine product?".into(),
                    answer: "Yes. Every batch is made from tested, high-quality ingredients.".into(),
                    has_badge: Some(true),
                    badge_text: Some("✓ 90-Day Guarantee".into()),
                },
                FaqItem {
                    id: 2,
                    question: "Can I take it alongside other supplements?".into(),
                    answer: "Check with a healthcare professional before combining supplements.".into(),
                    has_badge: None,
                    badge_text: None,
                },
                FaqItem {
                    id: 3,
                    question: "How soon will I notice a difference?".into(),
                    answer: "Most customers report changes within the first few weeks.".into(),
                    has_badge: Some(true),
                    badge_text: Some("✓ Results or your money back".into()),
                },
            ],
        }
    }
}

// ── Guarantee & footer ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Guarantee {
    pub days: String,
    pub title: String,
    pub subtitle: String,
    pub description: Vec<String>,
    pub brand_name: String,
}

impl Default for Guarantee {
    fn default() -> Self {
        Self {
            days: "90".into(),
            title: "90 Days Guarantee".into(),
            subtitle: "100% money-back guarantee".into(),
            description: vec![
                "Start as soon as your order arrives and track how you feel.".into(),
                "If you are not completely satisfied, we refund you in full.".into(),
            ],
            brand_name: "VITALCORE".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Footer {
    pub brand_name: String,
    pub copyright: String,
    pub disclaimer: String,
    pub links: Vec<String>,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            brand_name: "VITALCORE".into(),
            copyright: "Copyright ©2025 | VITALCORE".into(),
            disclaimer: "These statements have not been evaluated by the Food and Drug Administration. This product is not intended to diagnose, treat, cure, or prevent any disease.".into(),
            links: vec![
                "Privacy Policy".into(),
                "Terms of Service".into(),
                "Contact Us".into(),
            ],
        }
    }
}

// ── Title blocks & styling ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoFiltersBlock {
    pub title: String,
    pub subtitle: String,
    pub title_color: String,
    pub subtitle_color: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsOutletsBlock {
    pub title: String,
    pub subtitle: String,
    pub drag_instruction: String,
    pub title_color: String,
    pub subtitle_color: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformLifeBlock {
    pub title: String,
    pub subtitle1: String,
    pub subtitle2: String,
    pub title_color: String,
    pub subtitle1_color: String,
    pub subtitle2_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TitleBlocks {
    pub no_filters: NoFiltersBlock,
    pub news_outlets: NewsOutletsBlock,
    pub transform_life: TransformLifeBlock,
}

impl Default for TitleBlocks {
    fn default() -> Self {
        Self {
            no_filters: NoFiltersBlock {
                title: "No Filters. Just Real Results.".into(),
                subtitle: "What Real Customers Are Saying About VITALCORE".into(),
                title_color: "bg-gradient-to-r from-blue-400 to-purple-500 bg-clip-text text-transparent".into(),
                subtitle_color: "text-slate-300".into(),
            },
            news_outlets: NewsOutletsBlock {
                title: "As Seen In Major News Outlets".into(),
                subtitle: "Leading Health Publications Cover VITALCORE".into(),
                drag_instruction: "Drag to navigate between news articles".into(),
                title_color: "bg-gradient-to-r from-green-400 to-blue-500 bg-clip-text text-transparent".into(),
                subtitle_color: "text-slate-300".into(),
            },
            transform_life: TransformLifeBlock {
                title: "Ready to Transform Your Life?".into(),
                subtitle1: "Choose your VITALCORE package below".into(),
                subtitle2: "Don't miss this opportunity".into(),
                title_color: "bg-gradient-to-r from-orange-400 to-red-500 bg-clip-text text-transparent".into(),
                subtitle1_color: "text-slate-300".into(),
                subtitle2_color: "text-slate-400".into(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorKind {
    #[default]
    Solid,
    Gradient,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleColor {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: ColorKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalTitleStyling {
    pub available_colors: Vec<TitleColor>,
}

impl Default for GlobalTitleStyling {
    fn default() -> Self {
        let color = |name: &str, value: &str, kind: ColorKind| TitleColor {
            name: name.into(),
            value: value.into(),
            kind,
        };
        Self {
            available_colors: vec![
                color("Solid Blue", "text-blue-400", ColorKind::Solid),
                color("Solid Green", "text-green-400", ColorKind::Solid),
                color("Strong Red", "text-[#BE1D1E]", ColorKind::Solid),
                color("White", "text-white", ColorKind::Solid),
                color(
                    "Blue → Purple",
                    "bg-gradient-to-r from-blue-400 to-purple-500 bg-clip-text text-transparent",
                    ColorKind::Gradient,
                ),
                color(
                    "Orange → Red",
                    "bg-gradient-to-r from-orange-400 to-[#BE1D1E] bg-clip-text text-transparent",
                    ColorKind::Gradient,
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundOption {
    pub name: String,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalBackground {
    pub background_class: String,
    pub available_backgrounds: Vec<BackgroundOption>,
}

impl Default for GlobalBackground {
    fn default() -> Self {
        let bg = |name: &str, class: &str| BackgroundOption {
            name: name.into(),
            class: class.into(),
        };
        Self {
            background_class: "bg-gradient-to-br from-blue-900 via-purple-900 to-indigo-900".into(),
            available_backgrounds: vec![
                bg("Default Blue", "bg-gradient-to-br from-blue-900 via-blue-800 to-indigo-900"),
                bg("Dark Green", "bg-gradient-to-br from-green-900 via-green-800 to-emerald-900"),
                bg("Dark Gray", "bg-gradient-to-br from-gray-900 via-gray-800 to-slate-900"),
                bg("Solid Black", "bg-black"),
            ],
        }
    }
}

// ── Call-to-action blocks ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CtaColor {
    pub name: String,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaGlobalSettings {
    pub default_background_color: String,
    pub default_text_color: String,
    pub available_colors: Vec<CtaColor>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cta {
    pub enabled: bool,
    pub text: String,
    pub icon: String,
    pub background_color: String,
    pub text_color: String,
    pub use_pulse_animation: bool,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomCtas {
    pub global_settings: CtaGlobalSettings,
    #[serde(rename = "doctorTrustCTA")]
    pub doctor_trust_cta: Cta,
    #[serde(rename = "successStoryCTA")]
    pub success_story_cta: Cta,
}

impl Default for CustomCtas {
    fn default() -> Self {
        Self {
            global_settings: CtaGlobalSettings {
                default_background_color: "from-blue-600 to-purple-600".into(),
                default_text_color: "text-white".into(),
                available_colors: vec![
                    CtaColor {
                        name: "Blue to Purple".into(),
                        background: "from-blue-600 to-purple-600".into(),
                    },
                    CtaColor {
                        name: "Green to Blue".into(),
                        background: "from-green-500 to-blue-600".into(),
                    },
                ],
            },
            doctor_trust_cta: Cta {
                enabled: true,
                text: "Start Your Doctor-Approved Routine — Tap Now!".into(),
                icon: "👨‍⚕️".into(),
                background_color: "from-blue-600 to-purple-600".into(),
                text_color: "text-white".into(),
                use_pulse_animation: true,
                url: String::new(),
            },
            success_story_cta: Cta {
                enabled: true,
                text: "Ready to Be Our Next Success Story?".into(),
                icon: "🚀".into(),
                background_color: "from-green-500 to-blue-600".into(),
                text_color: "text-white".into(),
                use_pulse_animation: true,
                url: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_page_json_keys() {
        let json = serde_json::to_value(ContentDocument::default()).unwrap();
        assert!(json.get("topBanner").is_some());
        assert!(json.get("contentBlocker").is_some());
        assert!(json.get("customCTAs").is_some());
        assert!(json["customCTAs"].get("doctorTrustCTA").is_some());
        assert_eq!(json["video"]["aspectRatio"], "9:16");
        assert_eq!(json["contentBlocker"]["scheduleMode"], "immediate");
        assert_eq!(json["globalTitleStyling"]["availableColors"][0]["type"], "solid");
    }

    #[test]
    fn default_collections_have_unique_ids() {
        let doc = ContentDocument::default();
        let ids: Vec<u32> = doc.doctors.doctors.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let ids: Vec<u32> = doc.faq.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn item_missing_fields_default_to_empty() {
        let doctor: Doctor = serde_json::from_str(r#"{"id": 7, "name": "Dr. New"}"#).unwrap();
        assert_eq!(doctor.id, 7);
        assert_eq!(doctor.name, "Dr. New");
        assert!(doctor.photo.is_empty());
    }

    #[test]
    fn faq_badge_omitted_when_absent() {
        let item = FaqItem {
            id: 4,
            question: "q".into(),
            answer: "a".into(),
            has_badge: None,
            badge_text: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("hasBadge").is_none());
    }
}
